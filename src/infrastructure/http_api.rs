// Watchboard HTTP API implementation
use crate::application::error::ClientError;
use crate::application::watchboard_api::WatchboardApi;
use crate::domain::config_document::ConfigDocument;
use crate::domain::dashboard::DashboardSummary;
use crate::domain::status::DashboardStatus;
use async_trait::async_trait;
use reqwest::{header, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

const API_PATH: &str = "api/v1/";

#[derive(Debug, Clone)]
pub struct HttpWatchboardApi {
    client: reqwest::Client,
    base_url: Url,
    api_root: Url,
}

#[derive(Debug, Deserialize)]
struct DashboardsResponse {
    #[serde(default)]
    dashboards: Vec<DashboardSummary>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveConfigRequest<'a> {
    config: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<&'a str>,
}

impl HttpWatchboardApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let api_root = base_url.join(API_PATH)?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_root,
        })
    }

    /// Context root the dashboard pages live under.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.api_root.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::read_json(url, response).await
    }

    async fn read_json<T: DeserializeOwned>(url: Url, response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl WatchboardApi for HttpWatchboardApi {
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ClientError> {
        let response: DashboardsResponse = self.get_json(self.endpoint("dashboards")?).await?;
        Ok(response.dashboards)
    }

    async fn fetch_status(&self, dashboard_id: &str) -> Result<DashboardStatus, ClientError> {
        let path = format!("status/{}", urlencoding::encode(dashboard_id));
        self.get_json(self.endpoint(&path)?).await
    }

    async fn fetch_config(&self) -> Result<ConfigDocument, ClientError> {
        self.get_json(self.endpoint("config")?).await
    }

    async fn save_config(
        &self,
        config: &Value,
        updated_at: Option<&str>,
    ) -> Result<ConfigDocument, ClientError> {
        let url = self.endpoint("config")?;
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .header(header::ACCEPT, "application/json")
            .json(&SaveConfigRequest { config, updated_at })
            .send()
            .await?;

        Self::read_json(url, response).await
    }

    async fn health_check(&self) -> Result<String, ClientError> {
        let response: HealthResponse = self.get_json(self.endpoint("healthcheck")?).await?;
        Ok(response.status)
    }
}
