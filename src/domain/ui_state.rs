// UI state domain model - Column count and image order kept in the URL fragment

pub const MIN_COLUMNS: u8 = 1;
pub const MAX_COLUMNS: u8 = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub columns: Option<u8>,
    pub image_order: Option<Vec<String>>,
}

impl UiState {
    pub fn new(columns: Option<u8>, image_order: Option<Vec<String>>) -> Self {
        Self {
            columns,
            image_order,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_none() && self.image_order.is_none()
    }

    pub fn is_valid_columns(columns: u8) -> bool {
        (MIN_COLUMNS..=MAX_COLUMNS).contains(&columns)
    }
}

/// Orders items by their position in `order`. Items whose id is not in the
/// order keep their original relative order and go after the known ones.
pub fn arrange_by_order<T, F>(mut items: Vec<T>, order: &[String], id: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if order.is_empty() {
        return items;
    }
    items.sort_by_key(|item| {
        order
            .iter()
            .position(|known| known == id(item))
            .unwrap_or(usize::MAX)
    });
    items
}
