// Dashboard status domain model
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatus {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub app_version: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub config_last_updated: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl DashboardStatus {
    /// Newest `lastModified` across all images.
    pub fn newest_image(&self) -> Option<i64> {
        self.images.iter().map(|image| image.last_modified).max()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub id: String,
    #[serde(default)]
    pub url: String,
    pub filename: String,
    pub last_modified: i64,
    #[serde(default, rename = "type")]
    pub graph_type: Option<GraphType>,
    #[serde(default)]
    pub components: Vec<String>,
}

impl ImageRef {
    pub fn new(id: String, url: String, filename: String, last_modified: i64) -> Self {
        Self {
            id,
            url,
            filename,
            last_modified,
            graph_type: None,
            components: Vec::new(),
        }
    }
}

/// Plugin that produced a graph image on the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum GraphType {
    CloudWatch,
    Performr,
    Disk,
    CloudWatchDashboard,
    Kibana,
    Kibana5,
    Sonar,
    Other(String),
}

impl From<String> for GraphType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "CLOUDWATCH" => GraphType::CloudWatch,
            "PERFORMR" => GraphType::Performr,
            "DISK" => GraphType::Disk,
            "CLOUDWATCH-DASHBOARD" | "CLOUDWATCH_DASHBOARD" => GraphType::CloudWatchDashboard,
            "KIBANA" => GraphType::Kibana,
            "KIBANA5" => GraphType::Kibana5,
            "SONAR" => GraphType::Sonar,
            _ => GraphType::Other(value),
        }
    }
}

impl GraphType {
    pub fn label(&self) -> &str {
        match self {
            GraphType::CloudWatch => "cloudwatch",
            GraphType::Performr => "performr",
            GraphType::Disk => "disk",
            GraphType::CloudWatchDashboard => "cloudwatch-dashboard",
            GraphType::Kibana => "kibana",
            GraphType::Kibana5 => "kibana5",
            GraphType::Sonar => "sonar",
            GraphType::Other(name) => name,
        }
    }
}

// Version and config tokens are opaque; some servers send them as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a string or number token, got {other}"
        ))),
    }
}
