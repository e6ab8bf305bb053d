// Status poller - Keeps a dashboard view in sync with the server's status endpoint
use crate::application::error::ClientError;
use crate::application::watchboard_api::WatchboardApi;
use crate::domain::status::DashboardStatus;
use crate::domain::ui_state::{arrange_by_order, UiState};
use crate::presentation::location::PageLocation;
use crate::presentation::view::{DashboardView, ImageTile, ImageUpdate};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::ReceiverStream;

pub const DEFAULT_COLUMNS: u8 = 2;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_RELOAD_COOLDOWN: Duration = Duration::from_secs(30);

const EVENT_BUFFER: usize = 64;
const COMMAND_BUFFER: usize = 8;

type FetchResult = Result<DashboardStatus, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    pub interval: Duration,
    pub reload_cooldown: Duration,
    pub default_columns: u8,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            reload_cooldown: DEFAULT_RELOAD_COOLDOWN,
            default_columns: DEFAULT_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadReason {
    BackendChanged,
    ColumnsChanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Rendered(DashboardView),
    Reloading(ReloadReason),
    ImagesUpdated(Vec<ImageUpdate>),
    LastUpdatedChanged(i64),
    LayoutChanged(DashboardView),
    LocationChanged(String),
}

/// Result of applying one status response to the poller state.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Rendered,
    ReloadRequired,
    Updated {
        images: Vec<ImageUpdate>,
        last_updated: Option<i64>,
        layout_changed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Baseline {
    app_version: String,
    config_last_updated: String,
}

impl Baseline {
    fn of(status: &DashboardStatus) -> Self {
        Self {
            app_version: status.app_version.clone(),
            config_last_updated: status.config_last_updated.clone(),
        }
    }

    fn differs_from(&self, status: &DashboardStatus) -> bool {
        self.app_version != status.app_version
            || self.config_last_updated != status.config_last_updated
    }
}

/// Everything one dashboard session knows. Owned by the poller task.
#[derive(Debug)]
pub struct PollerState {
    location: PageLocation,
    dashboard_id: String,
    ui_state: UiState,
    default_columns: u8,
    baseline: Option<Baseline>,
    last_reload: Instant,
    last_seen: HashMap<String, i64>,
    view: Option<DashboardView>,
}

impl PollerState {
    pub fn new(
        location: PageLocation,
        default_columns: u8,
        now: Instant,
    ) -> Result<Self, ClientError> {
        let dashboard_id = location
            .dashboard_id()
            .ok_or_else(|| ClientError::MissingDashboardId(location.as_str().to_string()))?;
        let ui_state = location.ui_state();

        Ok(Self {
            location,
            dashboard_id,
            ui_state,
            default_columns,
            baseline: None,
            last_reload: now,
            last_seen: HashMap::new(),
            view: None,
        })
    }

    pub fn dashboard_id(&self) -> &str {
        &self.dashboard_id
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    pub fn columns(&self) -> u8 {
        self.ui_state.columns.unwrap_or(self.default_columns)
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn is_rendered(&self) -> bool {
        self.baseline.is_some()
    }

    /// Applies a status response. The first response after construction or a
    /// reload renders the page; later ones either request a reload or diff images.
    pub fn apply_status(
        &mut self,
        status: DashboardStatus,
        now: Instant,
        cooldown: Duration,
    ) -> PollOutcome {
        let Some(baseline) = &self.baseline else {
            self.render(status);
            return PollOutcome::Rendered;
        };

        if baseline.differs_from(&status)
            && now.saturating_duration_since(self.last_reload) > cooldown
        {
            self.begin_reload(now);
            return PollOutcome::ReloadRequired;
        }

        self.diff_images(status)
    }

    /// Drops the rendered page. The next status response renders it again.
    pub fn begin_reload(&mut self, now: Instant) {
        self.baseline = None;
        self.view = None;
        self.last_seen.clear();
        self.last_reload = now;
    }

    /// Returns false and leaves the state alone for an out-of-range count.
    pub fn set_columns(&mut self, columns: u8, now: Instant) -> bool {
        if !UiState::is_valid_columns(columns) {
            return false;
        }
        self.ui_state.columns = Some(columns);
        self.location.set_ui_state(&self.ui_state);
        self.begin_reload(now);
        true
    }

    pub fn reorder(&mut self, order: Vec<String>) {
        if let Some(view) = self.view.as_mut() {
            let tiles = std::mem::take(&mut view.tiles);
            view.tiles = arrange_by_order(tiles, &order, |tile| tile.id.as_str());
        }
        self.ui_state.image_order = Some(order);
        self.location.set_ui_state(&self.ui_state);
    }

    fn render(&mut self, status: DashboardStatus) {
        if let Some(id) = status.id.as_deref().filter(|id| *id != self.dashboard_id) {
            tracing::warn!(
                "Asked for dashboard {} but the server answered for {}",
                self.dashboard_id,
                id
            );
        }
        let baseline = Baseline::of(&status);
        let last_updated = status.newest_image();
        let tiles = self.arranged_tiles(&status);

        self.last_seen = status
            .images
            .iter()
            .map(|image| (image.id.clone(), image.last_modified))
            .collect();
        self.view = Some(DashboardView {
            title: status.title,
            columns: self.columns(),
            tiles,
            last_updated,
        });
        self.baseline = Some(baseline);
    }

    fn diff_images(&mut self, status: DashboardStatus) -> PollOutcome {
        let layout_changed = self.image_set_changed(&status);
        if layout_changed {
            let tiles = self.arranged_tiles(&status);
            if let Some(view) = self.view.as_mut() {
                view.tiles = tiles;
            }
            let current: HashSet<&str> = status.images.iter().map(|i| i.id.as_str()).collect();
            self.last_seen.retain(|id, _| current.contains(id.as_str()));
        }

        let mut images = Vec::new();
        for image in &status.images {
            if self.last_seen.get(&image.id) == Some(&image.last_modified) {
                continue;
            }
            self.last_seen.insert(image.id.clone(), image.last_modified);
            let update = ImageUpdate::from_image(&self.location, image);
            if let Some(view) = self.view.as_mut() {
                view.apply_update(&update);
            }
            images.push(update);
        }

        let mut last_updated = None;
        if let (Some(view), Some(newest)) = (self.view.as_mut(), status.newest_image()) {
            if view.last_updated.is_none_or(|shown| newest > shown) {
                view.last_updated = Some(newest);
                last_updated = Some(newest);
            }
        }

        PollOutcome::Updated {
            images,
            last_updated,
            layout_changed,
        }
    }

    fn image_set_changed(&self, status: &DashboardStatus) -> bool {
        let Some(view) = &self.view else {
            return false;
        };
        let shown: HashSet<&str> = view.tiles.iter().map(|tile| tile.id.as_str()).collect();
        let incoming: HashSet<&str> = status.images.iter().map(|i| i.id.as_str()).collect();
        shown != incoming
    }

    fn arranged_tiles(&self, status: &DashboardStatus) -> Vec<ImageTile> {
        let order = self.ui_state.image_order.as_deref().unwrap_or_default();
        arrange_by_order(status.images.clone(), order, |image| image.id.as_str())
            .iter()
            .map(|image| ImageTile::from_image(&self.location, image))
            .collect()
    }
}

#[derive(Debug)]
enum PollerCommand {
    SetColumns(u8),
    Reorder(Vec<String>),
}

/// Out-of-band controls for a running poller.
#[derive(Debug, Clone)]
pub struct PollerHandle {
    commands: mpsc::Sender<PollerCommand>,
}

impl PollerHandle {
    pub async fn set_columns(&self, columns: u8) -> Result<(), ClientError> {
        self.send(PollerCommand::SetColumns(columns)).await
    }

    pub async fn reorder(&self, order: Vec<String>) -> Result<(), ClientError> {
        self.send(PollerCommand::Reorder(order)).await
    }

    async fn send(&self, command: PollerCommand) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ClientError::PollerStopped)
    }
}

pub struct StatusPoller {
    api: Arc<dyn WatchboardApi>,
    settings: PollerSettings,
    state: PollerState,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn WatchboardApi>,
        location: PageLocation,
        settings: PollerSettings,
    ) -> Result<Self, ClientError> {
        let state = PollerState::new(location, settings.default_columns, Instant::now())?;
        Ok(Self {
            api,
            settings,
            state,
        })
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    /// Fetches the status once and renders the page from it.
    pub async fn initial_render(&mut self) -> Result<&DashboardView, ClientError> {
        let status = self.api.fetch_status(self.state.dashboard_id()).await?;
        self.state.render(status);
        tracing::info!(
            "Rendered dashboard {} with {} images",
            self.state.dashboard_id(),
            self.state.view.as_ref().map(|v| v.tiles.len()).unwrap_or(0)
        );
        self.state
            .view
            .as_ref()
            .ok_or_else(|| ClientError::NotFound(self.state.dashboard_id.clone()))
    }

    /// Spawns the poll loop. The loop stops once the event stream is dropped.
    pub fn start(self) -> (PollerHandle, ReceiverStream<PollEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);

        tokio::spawn(self.run(event_tx, command_rx));

        (
            PollerHandle {
                commands: command_tx,
            },
            ReceiverStream::new(event_rx),
        )
    }

    async fn run(
        mut self,
        events: mpsc::Sender<PollEvent>,
        mut commands: mpsc::Receiver<PollerCommand>,
    ) {
        let (result_tx, mut results) = mpsc::unbounded_channel::<FetchResult>();

        if let Some(view) = self.state.view() {
            if events.send(PollEvent::Rendered(view.clone())).await.is_err() {
                return;
            }
        }

        let mut ticker = tokio::time::interval_at(
            Instant::now() + self.settings.interval,
            self.settings.interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            let emitted = tokio::select! {
                _ = ticker.tick() => {
                    self.spawn_fetch(&result_tx);
                    Vec::new()
                }
                Some(result) = results.recv() => self.handle_fetch(result, &result_tx),
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command, &result_tx),
                    None => {
                        commands_open = false;
                        Vec::new()
                    }
                },
                _ = events.closed() => {
                    tracing::debug!("Event consumer gone, stopping poller for {}", self.state.dashboard_id());
                    return;
                }
            };

            for event in emitted {
                if events.send(event).await.is_err() {
                    return;
                }
            }
        }
    }

    // Ticks never wait for an in-flight fetch; responses are applied in arrival order.
    fn spawn_fetch(&self, results: &mpsc::UnboundedSender<FetchResult>) {
        let api = self.api.clone();
        let dashboard_id = self.state.dashboard_id().to_string();
        let results = results.clone();

        tokio::spawn(async move {
            let _ = results.send(api.fetch_status(&dashboard_id).await);
        });
    }

    fn handle_fetch(
        &mut self,
        result: FetchResult,
        results: &mpsc::UnboundedSender<FetchResult>,
    ) -> Vec<PollEvent> {
        let status = match result {
            Ok(status) => status,
            Err(e) if e.is_network() => {
                tracing::debug!("Ignoring failed poll for {}: {}", self.state.dashboard_id(), e);
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Unexpected poll failure for {}: {}", self.state.dashboard_id(), e);
                return Vec::new();
            }
        };

        match self
            .state
            .apply_status(status, Instant::now(), self.settings.reload_cooldown)
        {
            PollOutcome::Rendered => {
                tracing::info!("Rendered dashboard {}", self.state.dashboard_id());
                self.state
                    .view()
                    .map(|view| vec![PollEvent::Rendered(view.clone())])
                    .unwrap_or_default()
            }
            PollOutcome::ReloadRequired => {
                tracing::info!(
                    "App version or config changed, reloading dashboard {}",
                    self.state.dashboard_id()
                );
                self.spawn_fetch(results);
                vec![PollEvent::Reloading(ReloadReason::BackendChanged)]
            }
            PollOutcome::Updated {
                images,
                last_updated,
                layout_changed,
            } => {
                let mut emitted = Vec::new();
                if layout_changed {
                    if let Some(view) = self.state.view() {
                        emitted.push(PollEvent::LayoutChanged(view.clone()));
                    }
                }
                if !images.is_empty() {
                    tracing::debug!("{} images refreshed", images.len());
                    emitted.push(PollEvent::ImagesUpdated(images));
                }
                if let Some(newest) = last_updated {
                    emitted.push(PollEvent::LastUpdatedChanged(newest));
                }
                emitted
            }
        }
    }

    fn handle_command(
        &mut self,
        command: PollerCommand,
        results: &mpsc::UnboundedSender<FetchResult>,
    ) -> Vec<PollEvent> {
        match command {
            PollerCommand::SetColumns(columns) => {
                if !self.state.set_columns(columns, Instant::now()) {
                    tracing::warn!("Ignoring column count {} outside 1..=4", columns);
                    return Vec::new();
                }
                self.spawn_fetch(results);
                vec![
                    PollEvent::LocationChanged(self.state.location().as_str().to_string()),
                    PollEvent::Reloading(ReloadReason::ColumnsChanged),
                ]
            }
            PollerCommand::Reorder(order) => {
                self.state.reorder(order);
                let mut emitted = vec![PollEvent::LocationChanged(
                    self.state.location().as_str().to_string(),
                )];
                if let Some(view) = self.state.view() {
                    emitted.push(PollEvent::LayoutChanged(view.clone()));
                }
                emitted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config_document::ConfigDocument;
    use crate::domain::dashboard::DashboardSummary;
    use crate::domain::status::ImageRef;
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const COOLDOWN: Duration = Duration::from_millis(30_000);

    fn status(app_version: &str, images: &[(&str, i64)]) -> DashboardStatus {
        DashboardStatus {
            id: Some("ops".to_string()),
            title: "Operations".to_string(),
            app_version: app_version.to_string(),
            config_last_updated: "cfg-1".to_string(),
            images: images
                .iter()
                .map(|(id, ts)| {
                    ImageRef::new(
                        id.to_string(),
                        format!("https://graphs.example.com/{id}"),
                        format!("/watchboard/api/v1/images/{id}.png"),
                        *ts,
                    )
                })
                .collect(),
        }
    }

    fn state(location: &str, now: Instant) -> PollerState {
        PollerState::new(PageLocation::parse(location).unwrap(), DEFAULT_COLUMNS, now).unwrap()
    }

    fn rendered(images: &[(&str, i64)], now: Instant) -> PollerState {
        let mut state = state("http://localhost/watchboard/ops", now);
        assert_eq!(
            state.apply_status(status("1", images), now, COOLDOWN),
            PollOutcome::Rendered
        );
        state
    }

    #[test]
    fn test_missing_dashboard_id_is_an_error() {
        let location = PageLocation::parse("http://localhost/").unwrap();
        let result = PollerState::new(location, DEFAULT_COLUMNS, Instant::now());
        assert!(matches!(result, Err(ClientError::MissingDashboardId(_))));
    }

    #[test]
    fn test_initial_render_uses_defaults_without_fragment() {
        let state = rendered(&[("a", 100), ("b", 200)], Instant::now());
        let view = state.view().unwrap();

        assert_eq!(view.columns, DEFAULT_COLUMNS);
        assert_eq!(view.title, "Operations");
        assert_eq!(view.tile_ids(), vec!["a", "b"]);
        assert_eq!(view.last_updated, Some(200));
        assert!(view.tile("a").unwrap().source.ends_with("/images/a.png?100"));
    }

    #[test]
    fn test_initial_render_follows_stored_order() {
        let now = Instant::now();
        let mut state = state("http://localhost/watchboard/ops#columns=3|imageOrder=b,a", now);
        state.apply_status(status("1", &[("a", 100), ("b", 200)]), now, COOLDOWN);

        let view = state.view().unwrap();
        assert_eq!(view.columns, 3);
        assert_eq!(view.tile_ids(), vec!["b", "a"]);
    }

    #[test]
    fn test_initial_render_with_unknown_order_keeps_server_order() {
        let now = Instant::now();
        let mut state = state("http://localhost/watchboard/ops#imageOrder=x", now);
        state.apply_status(status("1", &[("a", 100), ("b", 200)]), now, COOLDOWN);

        assert_eq!(state.view().unwrap().tile_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_version_change_respects_cooldown() {
        let start = Instant::now();
        let mut state = rendered(&[("a", 100)], start);

        let outcome = state.apply_status(
            status("2", &[("a", 100)]),
            start + Duration::from_millis(30_000),
            COOLDOWN,
        );
        assert!(matches!(outcome, PollOutcome::Updated { .. }));
        assert!(state.is_rendered());

        let outcome = state.apply_status(
            status("2", &[("a", 100)]),
            start + Duration::from_millis(30_001),
            COOLDOWN,
        );
        assert_eq!(outcome, PollOutcome::ReloadRequired);
        assert!(!state.is_rendered());
    }

    #[test]
    fn test_config_change_triggers_reload_and_resets_cooldown() {
        let start = Instant::now();
        let mut state = rendered(&[("a", 100)], start);
        let mut changed = status("1", &[("a", 100)]);
        changed.config_last_updated = "cfg-2".to_string();

        let reload_at = start + Duration::from_secs(60);
        assert_eq!(
            state.apply_status(changed.clone(), reload_at, COOLDOWN),
            PollOutcome::ReloadRequired
        );
        assert_eq!(
            state.apply_status(changed, reload_at, COOLDOWN),
            PollOutcome::Rendered
        );

        let mut changed_again = status("1", &[("a", 100)]);
        changed_again.config_last_updated = "cfg-3".to_string();
        let outcome =
            state.apply_status(changed_again, reload_at + Duration::from_secs(10), COOLDOWN);
        assert!(matches!(outcome, PollOutcome::Updated { .. }));
    }

    #[test]
    fn test_only_changed_image_is_updated() {
        let now = Instant::now();
        let mut state = rendered(&[("a", 100), ("b", 200)], now);
        let b_before = state.view().unwrap().tile("b").cloned();

        let outcome = state.apply_status(status("1", &[("a", 150), ("b", 200)]), now, COOLDOWN);

        let PollOutcome::Updated {
            images,
            last_updated,
            layout_changed,
        } = outcome
        else {
            panic!("expected an image diff");
        };
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, "a");
        assert!(images[0].source.ends_with("/images/a.png?150"));
        assert_eq!(last_updated, None);
        assert!(!layout_changed);

        let view = state.view().unwrap();
        assert_eq!(view.tile("a").unwrap().last_modified, 150);
        assert_eq!(view.tile("b").cloned(), b_before);
        assert_eq!(view.last_updated, Some(200));
    }

    #[test]
    fn test_newer_image_moves_last_updated() {
        let now = Instant::now();
        let mut state = rendered(&[("a", 100), ("b", 200)], now);

        let outcome = state.apply_status(status("1", &[("a", 300), ("b", 200)]), now, COOLDOWN);

        assert!(matches!(
            outcome,
            PollOutcome::Updated {
                last_updated: Some(300),
                ..
            }
        ));
        assert_eq!(state.view().unwrap().last_updated, Some(300));
    }

    #[test]
    fn test_unchanged_poll_produces_no_updates() {
        let now = Instant::now();
        let mut state = rendered(&[("a", 100)], now);

        let outcome = state.apply_status(status("1", &[("a", 100)]), now, COOLDOWN);
        assert_eq!(
            outcome,
            PollOutcome::Updated {
                images: Vec::new(),
                last_updated: None,
                layout_changed: false
            }
        );
    }

    #[test]
    fn test_added_image_rebuilds_layout() {
        let now = Instant::now();
        let mut state = rendered(&[("a", 100), ("b", 200)], now);

        let outcome = state.apply_status(
            status("1", &[("c", 50), ("a", 100), ("b", 200)]),
            now,
            COOLDOWN,
        );

        let PollOutcome::Updated {
            images,
            layout_changed,
            ..
        } = outcome
        else {
            panic!("expected an image diff");
        };
        assert!(layout_changed);
        assert_eq!(images.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(state.view().unwrap().tile_ids(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_set_columns_rewrites_location_and_forces_reload() {
        let now = Instant::now();
        let mut state = rendered(&[("a", 100)], now);

        assert!(!state.set_columns(7, now));
        assert!(state.is_rendered());

        assert!(state.set_columns(3, now));
        assert!(!state.is_rendered());
        assert!(state.location().as_str().ends_with("#columns=3"));

        state.apply_status(status("1", &[("a", 100)]), now, COOLDOWN);
        assert_eq!(state.view().unwrap().columns, 3);
    }

    #[test]
    fn test_reorder_keeps_page_rendered() {
        let now = Instant::now();
        let mut state = rendered(&[("a", 100), ("b", 200), ("c", 300)], now);

        state.reorder(vec!["c".to_string(), "a".to_string(), "b".to_string()]);

        assert!(state.is_rendered());
        assert_eq!(state.view().unwrap().tile_ids(), vec!["c", "a", "b"]);
        assert!(state.location().as_str().ends_with("#imageOrder=c,a,b"));
    }

    // Serves statuses in order, then keeps repeating the last one.
    struct ScriptedApi {
        statuses: Mutex<VecDeque<DashboardStatus>>,
        last: Mutex<Option<DashboardStatus>>,
        failures: Mutex<usize>,
    }

    impl ScriptedApi {
        fn new(statuses: Vec<DashboardStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                last: Mutex::new(None),
                failures: Mutex::new(0),
            }
        }

        fn failing_first(self, failures: usize) -> Self {
            self.fail_next(failures);
            self
        }

        fn fail_next(&self, failures: usize) {
            *self.failures.lock().unwrap() = failures;
        }
    }

    #[async_trait]
    impl WatchboardApi for ScriptedApi {
        async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ClientError> {
            Ok(Vec::new())
        }

        async fn fetch_status(&self, dashboard_id: &str) -> Result<DashboardStatus, ClientError> {
            {
                let mut failures = self.failures.lock().unwrap();
                if *failures > 0 {
                    *failures -= 1;
                    return Err(ClientError::Status {
                        status: 503,
                        message: "unavailable".to_string(),
                    });
                }
            }
            let next = self.statuses.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            if let Some(status) = next {
                *last = Some(status);
            }
            last.clone()
                .ok_or_else(|| ClientError::NotFound(dashboard_id.to_string()))
        }

        async fn fetch_config(&self) -> Result<ConfigDocument, ClientError> {
            Err(ClientError::NotFound("config".to_string()))
        }

        async fn save_config(
            &self,
            _config: &Value,
            _updated_at: Option<&str>,
        ) -> Result<ConfigDocument, ClientError> {
            Err(ClientError::NotFound("config".to_string()))
        }

        async fn health_check(&self) -> Result<String, ClientError> {
            Ok("all is well.".to_string())
        }
    }

    fn poller(statuses: Vec<DashboardStatus>) -> StatusPoller {
        poller_with(Arc::new(ScriptedApi::new(statuses)))
    }

    fn poller_with(api: Arc<ScriptedApi>) -> StatusPoller {
        StatusPoller::new(
            api,
            PageLocation::parse("http://localhost/watchboard/ops").unwrap(),
            PollerSettings::default(),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_emits_image_updates() {
        let mut poller = poller(vec![
            status("1", &[("a", 100), ("b", 200)]),
            status("1", &[("a", 150), ("b", 200)]),
        ]);
        poller.initial_render().await.unwrap();

        let (_handle, mut events) = poller.start();

        let Some(PollEvent::Rendered(view)) = events.next().await else {
            panic!("expected the initial view first");
        };
        assert_eq!(view.tile_ids(), vec!["a", "b"]);

        let Some(PollEvent::ImagesUpdated(updates)) = events.next().await else {
            panic!("expected an image update");
        };
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, "a");
        assert_eq!(updates[0].last_modified, 150);
    }

    #[tokio::test(start_paused = true)]
    async fn test_column_change_reloads_through_handle() {
        let mut poller = poller(vec![status("1", &[("a", 100)])]);
        poller.initial_render().await.unwrap();

        let (handle, mut events) = poller.start();
        assert!(matches!(events.next().await, Some(PollEvent::Rendered(_))));

        handle.set_columns(4).await.unwrap();

        let Some(PollEvent::LocationChanged(location)) = events.next().await else {
            panic!("expected the location to change");
        };
        assert!(location.ends_with("#columns=4"));
        assert_eq!(
            events.next().await,
            Some(PollEvent::Reloading(ReloadReason::ColumnsChanged))
        );
        let Some(PollEvent::Rendered(view)) = events.next().await else {
            panic!("expected the page to render again");
        };
        assert_eq!(view.columns, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_initial_render_recovers_on_next_tick() {
        let api = ScriptedApi::new(vec![status("1", &[("a", 100)])]).failing_first(1);
        let mut poller = poller_with(Arc::new(api));
        assert!(poller.initial_render().await.is_err());
        assert!(!poller.state().is_rendered());

        let (_handle, mut events) = poller.start();
        let Some(PollEvent::Rendered(view)) = events.next().await else {
            panic!("expected the first successful poll to render");
        };
        assert_eq!(view.tile_ids(), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_poll_after_render_is_skipped() {
        let api = Arc::new(ScriptedApi::new(vec![
            status("1", &[("a", 100)]),
            status("1", &[("a", 150)]),
        ]));
        let mut poller = poller_with(api.clone());
        poller.initial_render().await.unwrap();

        let (_handle, mut events) = poller.start();
        assert!(matches!(events.next().await, Some(PollEvent::Rendered(_))));
        let started = Instant::now();
        api.fail_next(1);

        let Some(PollEvent::ImagesUpdated(updates)) = events.next().await else {
            panic!("expected the poll after the failure to update the image");
        };
        assert_eq!(updates[0].last_modified, 150);
        assert!(Instant::now() - started >= 2 * DEFAULT_POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_change_reloads_after_cooldown() {
        let mut poller = poller(vec![
            status("1", &[("a", 100)]),
            status("2", &[("a", 100)]),
        ]);
        poller.initial_render().await.unwrap();
        let rendered_at = Instant::now();

        let (_handle, mut events) = poller.start();
        assert!(matches!(events.next().await, Some(PollEvent::Rendered(_))));

        tokio::time::advance(DEFAULT_RELOAD_COOLDOWN).await;

        assert_eq!(
            events.next().await,
            Some(PollEvent::Reloading(ReloadReason::BackendChanged))
        );
        assert!(Instant::now() - rendered_at > DEFAULT_RELOAD_COOLDOWN);

        let Some(PollEvent::Rendered(view)) = events.next().await else {
            panic!("expected the page to render again");
        };
        assert_eq!(view.tile_ids(), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reorder_through_handle_keeps_page() {
        let mut poller = poller(vec![status("1", &[("a", 100), ("b", 200), ("c", 300)])]);
        poller.initial_render().await.unwrap();

        let (handle, mut events) = poller.start();
        assert!(matches!(events.next().await, Some(PollEvent::Rendered(_))));

        handle
            .reorder(vec!["c".to_string(), "a".to_string(), "b".to_string()])
            .await
            .unwrap();

        let Some(PollEvent::LocationChanged(location)) = events.next().await else {
            panic!("expected the location to change");
        };
        assert!(location.ends_with("#imageOrder=c,a,b"));
        let Some(PollEvent::LayoutChanged(view)) = events.next().await else {
            panic!("expected the layout to change");
        };
        assert_eq!(view.tile_ids(), vec!["c", "a", "b"]);

        // Unchanged polls after a reorder emit nothing, in particular no reload.
        let quiet = tokio::time::timeout(Duration::from_secs(5), events.next()).await;
        assert!(quiet.is_err());
    }
}
