// Dashboard listing domain model
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub default_number_of_columns: Option<u8>,
}

impl DashboardSummary {
    pub fn new(id: String, title: String, default_number_of_columns: Option<u8>) -> Self {
        Self {
            id,
            title,
            default_number_of_columns,
        }
    }
}

/// Key the index page sorts dashboards by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Title,
    Id,
}

impl SortKey {
    /// Stable lexicographic sort on the selected key.
    pub fn sort(&self, dashboards: &mut [DashboardSummary]) {
        match self {
            SortKey::Title => dashboards.sort_by(|a, b| a.title.cmp(&b.title)),
            SortKey::Id => dashboards.sort_by(|a, b| a.id.cmp(&b.id)),
        }
    }
}
