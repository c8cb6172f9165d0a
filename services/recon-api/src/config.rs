//! Service configuration.
//!
//! Command-line and environment settings are collected in [`ServiceConfig`];
//! the map defaults handed to the front-end live in [`MapConfig`] and may be
//! overridden from a YAML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use recon_common::LatLon;

/// Where the catalog lives, relative to the site root.
pub const CATALOG_PATH: &str = "static/json/storm_catalog.json";

/// Storm auto-selected at startup.
pub const DEFAULT_STORM: &str = "Alberto";

/// Base map settings served to the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial center before any data is loaded.
    pub center: LatLon,

    /// Initial zoom level.
    pub zoom: u8,

    /// Zoom used when fitting the view to a loaded mission.
    pub marker_zoom: u8,

    /// XYZ tile URL template.
    pub tile_url: String,

    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLon::new(24.8, -87.8),
            zoom: 7,
            marker_zoom: 7,
            tile_url:
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}"
                    .to_string(),
            attribution: "© Esri".to_string(),
        }
    }
}

impl MapConfig {
    /// Load from a YAML file; a missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                "Map config {} does not exist, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config: MapConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse map config: {:?}", path))?;

        if config.tile_url.is_empty() {
            anyhow::bail!("Map config {:?} has an empty tile_url", path);
        }
        tracing::info!(tile_url = %config.tile_url, zoom = config.zoom, "Loaded map config");
        Ok(config)
    }
}

/// Resolved service settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory served under `/static`; mission paths `static/...` resolve inside it.
    pub static_dir: PathBuf,

    /// Remote site root; when set, data is fetched over HTTP instead of from `static_dir`.
    pub data_url: Option<String>,

    /// Catalog document path, relative to the site root.
    pub catalog_path: String,

    /// Storm selected at startup, if present in the catalog.
    pub default_storm: Option<String>,

    /// Optional color scheme override file.
    pub schemes_path: Option<PathBuf>,

    pub map: MapConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            data_url: None,
            catalog_path: CATALOG_PATH.to_string(),
            default_storm: Some(DEFAULT_STORM.to_string()),
            schemes_path: None,
            map: MapConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Config rooted at a local static directory, everything else default.
    pub fn for_static_dir(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            ..Default::default()
        }
    }
}
