// Config editor view model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorStatus {
    #[default]
    Empty,
    Message(String),
    Error(String),
}

/// Text area contents plus the status fields shown next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEditorView {
    pub text: String,
    pub updated_at: Option<String>,
    pub persistence_type: Option<String>,
    pub status: EditorStatus,
}

impl ConfigEditorView {
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.status = EditorStatus::Error(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            EditorStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
