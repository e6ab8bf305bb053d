// Page location - The dashboard URL and the UI state stored in its fragment
use crate::application::error::ClientError;
use crate::domain::ui_state::UiState;
use crate::presentation::hash_state::HashStateCodec;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn parse(location: &str) -> Result<Self, ClientError> {
        Ok(Self {
            url: Url::parse(location)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Last path segment, ignoring a trailing slash, percent-decoded.
    pub fn dashboard_id(&self) -> Option<String> {
        let segment = self
            .url
            .path_segments()?
            .rfind(|segment| !segment.is_empty())?;
        let decoded = urlencoding::decode(segment).ok()?;
        Some(decoded.into_owned())
    }

    pub fn ui_state(&self) -> UiState {
        HashStateCodec::decode(self.url.fragment().unwrap_or_default())
    }

    pub fn set_ui_state(&mut self, state: &UiState) {
        if state.is_empty() {
            self.url.set_fragment(None);
        } else {
            self.url.set_fragment(Some(&HashStateCodec::encode(state)));
        }
    }

    /// Resolves a server-relative reference (image file, graph link) against this page.
    pub fn resolve(&self, reference: &str) -> Result<Url, ClientError> {
        Ok(self.url.join(reference)?)
    }
}
