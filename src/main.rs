// Main entry point - Dependency injection and mode dispatch
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use anyhow::Context;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::config_editor::ConfigEditorSync;
use crate::application::dashboard_list_service::DashboardListService;
use crate::application::status_poller::{PollEvent, PollerHandle, PollerSettings, StatusPoller};
use crate::application::watchboard_api::WatchboardApi;
use crate::infrastructure::config::{load_client_config, Mode};
use crate::infrastructure::http_api::HttpWatchboardApi;
use crate::presentation::editor::EditorStatus;
use crate::presentation::index_page::IndexPage;
use crate::presentation::location::PageLocation;
use crate::presentation::view::{format_timestamp, DashboardView};
use crate::presentation::watch_command::WatchCommand;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_client_config()?;

    // Create API client (infrastructure layer)
    let http_api = HttpWatchboardApi::new(&config.server.base_url)?;
    let base_url = http_api.base_url().clone();
    let api: Arc<dyn WatchboardApi> = Arc::new(http_api);

    match api.health_check().await {
        Ok(status) => tracing::info!("Watchboard server at {} reports: {}", base_url, status),
        Err(e) => tracing::warn!("Health check against {} failed: {}", base_url, e),
    }

    match config.client.mode {
        Mode::List => {
            let service = DashboardListService::new(api, config.listing.sort_key, base_url);
            show_index(&service.index_page().await);
        }
        Mode::Watch => {
            let location = config
                .client
                .location
                .as_deref()
                .context("client.location must point at a dashboard page in watch mode")?;
            watch(api, PageLocation::parse(location)?, config.poller.settings()).await?;
        }
        Mode::ShowConfig => {
            let mut editor = ConfigEditorSync::new(api);
            if editor.load_config().await.is_ok() {
                println!("{}", editor.view().text);
            }
            show_editor_status(&editor);
        }
        Mode::SaveConfig => {
            let path = config
                .client
                .config_file
                .as_deref()
                .context("client.config_file is required in save-config mode")?;
            let raw_text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {path}"))?;

            let mut editor = ConfigEditorSync::new(api);
            if editor.replace_config(&raw_text).await.is_ok() {
                println!("{}", editor.view().text);
            }
            show_editor_status(&editor);
        }
    }

    Ok(())
}

async fn watch(
    api: Arc<dyn WatchboardApi>,
    location: PageLocation,
    settings: PollerSettings,
) -> anyhow::Result<()> {
    let mut poller = StatusPoller::new(api, location, settings)?;
    if let Err(e) = poller.initial_render().await {
        tracing::warn!("Initial render failed, retrying on next poll: {}", e);
    }

    let (handle, mut events) = poller.start();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    loop {
        tokio::select! {
            event = events.next() => match event {
                Some(event) => show_event(&event),
                None => break,
            },
            line = input.next_line(), if input_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => run_command(&handle, &line).await?,
                Ok(None) => input_open = false,
                Err(e) => {
                    tracing::warn!("Stopped reading commands: {}", e);
                    input_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

async fn run_command(handle: &PollerHandle, line: &str) -> anyhow::Result<()> {
    match WatchCommand::parse(line) {
        Ok(WatchCommand::Columns(columns)) => handle.set_columns(columns).await?,
        Ok(WatchCommand::Order(order)) => handle.reorder(order).await?,
        Err(message) => eprintln!("{message}"),
    }
    Ok(())
}

fn show_index(page: &IndexPage) {
    match page {
        IndexPage::Links(links) => {
            for link in links {
                println!("{}\t{}\t{}", link.id, link.title, link.href);
            }
        }
        _ => {
            if let Some(message) = page.message() {
                eprintln!("{message}");
            }
        }
    }
}

fn show_view(view: &DashboardView) {
    println!(
        "{} ({} columns, last updated {})",
        view.title,
        view.columns,
        view.last_updated_label().unwrap_or_else(|| "never".to_string())
    );
    for tile in &view.tiles {
        let kind = tile.graph_type.as_ref().map(|t| t.label()).unwrap_or("graph");
        println!("  [{}] {} {}", kind, tile.id, tile.source);
        if !tile.link.is_empty() {
            println!("      link: {}", tile.link);
        }
        if !tile.components.is_empty() {
            println!("      components: {}", tile.components.join(", "));
        }
    }
}

fn show_event(event: &PollEvent) {
    match event {
        PollEvent::Rendered(view) | PollEvent::LayoutChanged(view) => show_view(view),
        PollEvent::Reloading(reason) => tracing::info!("Reloading dashboard ({:?})", reason),
        PollEvent::ImagesUpdated(updates) => {
            for update in updates {
                println!("  refreshed {} -> {}", update.id, update.source);
            }
        }
        PollEvent::LastUpdatedChanged(newest) => {
            if let Some(label) = format_timestamp(*newest) {
                println!("last updated {label}");
            }
        }
        PollEvent::LocationChanged(location) => tracing::info!("Location is now {}", location),
    }
}

fn show_editor_status(editor: &ConfigEditorSync) {
    let view = editor.view();
    if let Some(error) = view.error() {
        eprintln!("{error}");
        return;
    }
    if let EditorStatus::Message(message) = &view.status {
        eprintln!("{message}");
    }
    if let Some(updated_at) = &view.updated_at {
        eprintln!(
            "updatedAt: {} (persistence: {})",
            updated_at,
            view.persistence_type.as_deref().unwrap_or("unknown")
        );
    }
}
