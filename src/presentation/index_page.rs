// Index page view model - One link per dashboard
use crate::domain::dashboard::DashboardSummary;
use crate::domain::ui_state::UiState;
use crate::presentation::hash_state::HashStateCodec;
use url::Url;

pub const NO_DASHBOARDS_MESSAGE: &str = "No dashboards have been configured.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLink {
    pub id: String,
    pub title: String,
    pub href: String,
}

impl DashboardLink {
    /// Link to the dashboard page, carrying its default column count in the fragment.
    pub fn for_dashboard(base: &Url, dashboard: &DashboardSummary) -> Self {
        let fragment = dashboard
            .default_number_of_columns
            .map(|columns| HashStateCodec::encode(&UiState::new(Some(columns), None)));

        let mut url = base.clone();
        let pushed = url
            .path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().push(&dashboard.id);
            })
            .is_ok();

        let href = if pushed {
            url.set_fragment(fragment.as_deref());
            url.to_string()
        } else {
            let id = urlencoding::encode(&dashboard.id);
            match &fragment {
                Some(fragment) => format!("{base}{id}#{fragment}"),
                None => format!("{base}{id}"),
            }
        };

        Self {
            id: dashboard.id.clone(),
            title: dashboard.title.clone(),
            href,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexPage {
    Links(Vec<DashboardLink>),
    Empty,
    Failed(String),
}

impl IndexPage {
    /// Text shown instead of the link list, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            IndexPage::Links(_) => None,
            IndexPage::Empty => Some(NO_DASHBOARDS_MESSAGE.to_string()),
            IndexPage::Failed(reason) => Some(format!("Could not load dashboards: {reason}")),
        }
    }
}
