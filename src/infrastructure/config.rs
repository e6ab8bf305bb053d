use crate::application::status_poller::{
    PollerSettings, DEFAULT_COLUMNS, DEFAULT_POLL_INTERVAL, DEFAULT_RELOAD_COOLDOWN,
};
use crate::domain::dashboard::SortKey;
use crate::domain::ui_state::{UiState, MAX_COLUMNS, MIN_COLUMNS};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub server: ServerSettings,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub client: ModeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Context root of the watchboard server, e.g. `http://localhost:8080/watchboard/`
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollerConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_reload_cooldown_ms")]
    pub reload_cooldown_ms: u64,
    #[serde(default = "default_columns")]
    pub default_columns: u8,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ListingConfig {
    #[serde(default)]
    pub sort_key: SortKey,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModeConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub config_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    List,
    Watch,
    ShowConfig,
    SaveConfig,
}

impl ClientConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let columns = self.poller.default_columns;
        if !UiState::is_valid_columns(columns) {
            anyhow::bail!(
                "poller.default_columns must be between {MIN_COLUMNS} and {MAX_COLUMNS}, got {columns}"
            );
        }
        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            reload_cooldown_ms: default_reload_cooldown_ms(),
            default_columns: default_columns(),
        }
    }
}

impl PollerConfig {
    pub fn settings(&self) -> PollerSettings {
        PollerSettings {
            interval: Duration::from_millis(self.interval_ms.max(1)),
            reload_cooldown: Duration::from_millis(self.reload_cooldown_ms),
            default_columns: self.default_columns,
        }
    }
}

fn default_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_reload_cooldown_ms() -> u64 {
    DEFAULT_RELOAD_COOLDOWN.as_millis() as u64
}

fn default_columns() -> u8 {
    DEFAULT_COLUMNS
}

/// Reads `config/watchboard.*` (optional), then `WATCHBOARD__SECTION__KEY` overrides.
pub fn load_client_config() -> anyhow::Result<ClientConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/watchboard").required(false))
        .add_source(
            config::Environment::with_prefix("WATCHBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: ClientConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
