// Config editor sync - Use case for loading and saving the raw dashboard configuration
use crate::application::error::ClientError;
use crate::application::watchboard_api::WatchboardApi;
use crate::domain::config_document::ConfigDocument;
use crate::presentation::editor::{ConfigEditorView, EditorStatus};
use serde_json::Value;
use std::sync::Arc;

pub struct ConfigEditorSync {
    api: Arc<dyn WatchboardApi>,
    view: ConfigEditorView,
}

impl ConfigEditorSync {
    pub fn new(api: Arc<dyn WatchboardApi>) -> Self {
        Self {
            api,
            view: ConfigEditorView::default(),
        }
    }

    pub fn view(&self) -> &ConfigEditorView {
        &self.view
    }

    pub async fn load_config(&mut self) -> Result<ConfigDocument, ClientError> {
        match self.api.fetch_config().await {
            Ok(document) => {
                self.show_document(&document)?;
                Ok(document)
            }
            Err(e) => {
                tracing::warn!("Error loading config: {}", e);
                self.view.show_error(format!("Error loading configuration: {e}"));
                Err(e)
            }
        }
    }

    /// Validates `raw_text` locally; invalid JSON never reaches the server.
    pub async fn save_config(
        &mut self,
        raw_text: &str,
        updated_at: Option<&str>,
    ) -> Result<ConfigDocument, ClientError> {
        let config: Value = match serde_json::from_str(raw_text) {
            Ok(config) => config,
            Err(e) => {
                self.view.show_error(format!("Invalid JSON: {e}"));
                return Err(ClientError::InvalidJson(e));
            }
        };

        match self.api.save_config(&config, updated_at).await {
            Ok(document) => {
                tracing::info!("Saved dashboard configuration");
                self.show_document(&document)?;
                Ok(document)
            }
            Err(e) => {
                tracing::warn!("Error saving config: {}", e);
                self.view.show_error(format!("Error saving configuration: {e}"));
                Err(e)
            }
        }
    }

    /// Saves over whatever the server currently holds, using its `updatedAt`
    /// token. A failed load is logged and the save goes out without a token.
    pub async fn replace_config(&mut self, raw_text: &str) -> Result<ConfigDocument, ClientError> {
        let updated_at = match self.load_config().await {
            Ok(document) => document.updated_at,
            Err(e) => {
                tracing::warn!("Saving without an updatedAt token, current config unavailable: {}", e);
                None
            }
        };
        self.save_config(raw_text, updated_at.as_deref()).await
    }

    fn show_document(&mut self, document: &ConfigDocument) -> Result<(), ClientError> {
        self.view.text = document.canonical_text()?;
        self.view.updated_at = document.updated_at.clone();
        self.view.persistence_type = document.persistence_type.clone();
        self.view.status = match &document.message {
            Some(message) => EditorStatus::Message(message.clone()),
            None => EditorStatus::Empty,
        };
        Ok(())
    }
}
