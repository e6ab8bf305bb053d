// Dashboard list service - Use case for the index page
use crate::application::error::ClientError;
use crate::application::watchboard_api::WatchboardApi;
use crate::domain::dashboard::{DashboardSummary, SortKey};
use crate::presentation::index_page::{DashboardLink, IndexPage};
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct DashboardListService {
    api: Arc<dyn WatchboardApi>,
    sort_key: SortKey,
    base_url: Url,
}

impl DashboardListService {
    pub fn new(api: Arc<dyn WatchboardApi>, sort_key: SortKey, base_url: Url) -> Self {
        Self {
            api,
            sort_key,
            base_url,
        }
    }

    pub async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ClientError> {
        let mut dashboards = self.api.list_dashboards().await?;
        self.sort_key.sort(&mut dashboards);
        Ok(dashboards)
    }

    pub async fn index_page(&self) -> IndexPage {
        match self.list_dashboards().await {
            Ok(dashboards) if dashboards.is_empty() => IndexPage::Empty,
            Ok(dashboards) => IndexPage::Links(
                dashboards
                    .iter()
                    .map(|dashboard| DashboardLink::for_dashboard(&self.base_url, dashboard))
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!("Error fetching dashboards: {}", e);
                IndexPage::Failed(e.to_string())
            }
        }
    }
}
