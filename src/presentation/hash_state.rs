//! URL fragment codec for [`UiState`].
//!
//! The fragment looks like `columns=3|imageOrder=cpu,errors,latency`. Ids are
//! written as-is: an id containing `|`, `=` or `,` does not survive a round
//! trip, and the codec does not try to escape them.
//!
//! Decoding never fails. Anything that cannot be understood is dropped and the
//! caller falls back to its defaults.

use crate::domain::ui_state::UiState;

const PAIR_SEPARATOR: char = '|';
const ORDER_SEPARATOR: char = ',';
const COLUMNS_KEY: &str = "columns";
const IMAGE_ORDER_KEY: &str = "imageOrder";

pub struct HashStateCodec;

impl HashStateCodec {
    /// Encodes the state without a leading `#`. `columns` is always written first.
    pub fn encode(state: &UiState) -> String {
        let mut pairs = Vec::with_capacity(2);
        if let Some(columns) = state.columns {
            pairs.push(format!("{COLUMNS_KEY}={columns}"));
        }
        if let Some(order) = &state.image_order {
            pairs.push(format!("{IMAGE_ORDER_KEY}={}", order.join(",")));
        }
        pairs.join("|")
    }

    pub fn decode(fragment: &str) -> UiState {
        let Ok(decoded) = urlencoding::decode(fragment) else {
            tracing::debug!("Ignoring fragment that is not valid percent-encoded UTF-8");
            return UiState::default();
        };

        let mut state = UiState::default();
        for pair in decoded.split(PAIR_SEPARATOR) {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key.strip_prefix('#').unwrap_or(key) {
                COLUMNS_KEY => {
                    state.columns = value
                        .trim()
                        .parse::<u8>()
                        .ok()
                        .filter(|columns| UiState::is_valid_columns(*columns));
                }
                IMAGE_ORDER_KEY => {
                    state.image_order = Some(if value.is_empty() {
                        Vec::new()
                    } else {
                        value.split(ORDER_SEPARATOR).map(str::to_string).collect()
                    });
                }
                _ => {}
            }
        }
        state
    }
}
