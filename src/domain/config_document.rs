// Configuration document domain model
use serde::Deserialize;
use serde_json::{Map, Value};

const DASHBOARD_FIELD_ORDER: &[&str] = &["id", "title", "defaultNumberOfColumns"];
const GRAPH_FIELD_ORDER: &[&str] = &["id", "type", "url", "components", "browserWidth", "browserHeight"];

/// Configuration of all dashboards as served by the config endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub persistence_type: Option<String>,
}

impl ConfigDocument {
    /// Pretty-printed config with dashboards and graphs in canonical field order.
    pub fn canonical_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&canonicalize(&self.config))
    }
}

/// Reorders every dashboard and graph object so hand-edited configs diff cleanly.
pub fn canonicalize(config: &Value) -> Value {
    let mut config = config.clone();
    if let Some(dashboards) = config.get_mut("dashboards").and_then(Value::as_array_mut) {
        for dashboard in dashboards.iter_mut() {
            *dashboard = canonical_dashboard(dashboard);
        }
    }
    config
}

fn canonical_dashboard(dashboard: &Value) -> Value {
    let Some(fields) = dashboard.as_object() else {
        return dashboard.clone();
    };

    let mut ordered = reorder(fields, DASHBOARD_FIELD_ORDER);
    if let Some(graphs) = ordered.get_mut("graphs").and_then(Value::as_array_mut) {
        for graph in graphs.iter_mut() {
            if let Some(graph_fields) = graph.as_object() {
                *graph = Value::Object(reorder(graph_fields, GRAPH_FIELD_ORDER));
            }
        }
    }
    Value::Object(ordered)
}

fn reorder(fields: &Map<String, Value>, leading: &[&str]) -> Map<String, Value> {
    let mut ordered = Map::with_capacity(fields.len());
    for key in leading {
        if let Some(value) = fields.get(*key) {
            ordered.insert((*key).to_string(), value.clone());
        }
    }
    for (key, value) in fields {
        if !ordered.contains_key(key) {
            ordered.insert(key.clone(), value.clone());
        }
    }
    ordered
}
