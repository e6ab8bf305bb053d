// Dashboard view model - What a rendered dashboard page shows
use crate::domain::status::{GraphType, ImageRef};
use crate::presentation::location::PageLocation;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub columns: u8,
    pub tiles: Vec<ImageTile>,
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageTile {
    pub id: String,
    pub source: String,
    pub link: String,
    pub graph_type: Option<GraphType>,
    pub components: Vec<String>,
    pub last_modified: i64,
}

/// A single image whose displayed source must be refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpdate {
    pub id: String,
    pub source: String,
    pub last_modified: i64,
}

impl DashboardView {
    pub fn tile_ids(&self) -> Vec<&str> {
        self.tiles.iter().map(|tile| tile.id.as_str()).collect()
    }

    pub fn tile(&self, id: &str) -> Option<&ImageTile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }

    /// Returns false when no tile with that id is displayed.
    pub fn apply_update(&mut self, update: &ImageUpdate) -> bool {
        match self.tiles.iter_mut().find(|tile| tile.id == update.id) {
            Some(tile) => {
                tile.source = update.source.clone();
                tile.last_modified = update.last_modified;
                true
            }
            None => false,
        }
    }

    pub fn last_updated_label(&self) -> Option<String> {
        self.last_updated.and_then(format_timestamp)
    }
}

impl ImageTile {
    pub fn from_image(location: &PageLocation, image: &ImageRef) -> Self {
        Self {
            id: image.id.clone(),
            source: cache_busted_source(location, &image.filename, image.last_modified),
            link: image.url.clone(),
            graph_type: image.graph_type.clone(),
            components: image.components.clone(),
            last_modified: image.last_modified,
        }
    }
}

impl ImageUpdate {
    pub fn from_image(location: &PageLocation, image: &ImageRef) -> Self {
        Self {
            id: image.id.clone(),
            source: cache_busted_source(location, &image.filename, image.last_modified),
            last_modified: image.last_modified,
        }
    }
}

/// Image source with its query replaced by the modification token.
pub fn cache_busted_source(location: &PageLocation, filename: &str, token: i64) -> String {
    match location.resolve(filename) {
        Ok(mut resolved) => {
            resolved.set_query(Some(&token.to_string()));
            resolved.to_string()
        }
        Err(_) => {
            let path = filename.split('?').next().unwrap_or(filename);
            format!("{path}?{token}")
        }
    }
}

pub fn format_timestamp(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|ts| {
        ts.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
}
