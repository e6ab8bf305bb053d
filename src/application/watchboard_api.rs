// API trait for the watchboard server
use crate::application::error::ClientError;
use crate::domain::config_document::ConfigDocument;
use crate::domain::dashboard::DashboardSummary;
use crate::domain::status::DashboardStatus;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait WatchboardApi: Send + Sync {
    /// List all configured dashboards (unsorted, as served)
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ClientError>;

    /// Current rendering status of one dashboard
    async fn fetch_status(&self, dashboard_id: &str) -> Result<DashboardStatus, ClientError>;

    /// Raw configuration of all dashboards
    async fn fetch_config(&self) -> Result<ConfigDocument, ClientError>;

    /// Store a new configuration; the server answers with its stored copy
    async fn save_config(
        &self,
        config: &Value,
        updated_at: Option<&str>,
    ) -> Result<ConfigDocument, ClientError>;

    /// Server health message
    async fn health_check(&self) -> Result<String, ClientError>;
}
