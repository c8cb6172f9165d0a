//! Data loader and marker synchronization.
//!
//! A load fetches one mission document, classifies every valid record and
//! rebuilds the marker layer from scratch. Loads are sequence-stamped: when
//! several overlap, only the most recently issued one may touch the layer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use recon_common::{
    knots_to_mph, BoundingBox, FieldValue, LatLon, Level, Observation, ObservationSet,
    ReconError, ReconResult,
};
use recon_render::{render_marker_icon, ClassificationMode, ColorSchemeSet};

use crate::source::DataSource;

/// Sea-level pressure assumed for records without levels (hPa).
pub const DEFAULT_PRESSURE_HPA: f64 = 1013.0;

/// Marker arrow glyph size in pixels.
pub const ICON_SIZE: u32 = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerIcon {
    pub class_name: &'static str,
    pub html: String,
    /// Degrees clockwise; the glyph points east at 0
    pub rotation_deg: f64,
    pub size: [u32; 2],
    pub anchor: [u32; 2],
}

impl MarkerIcon {
    pub fn arrow(wind_dir: i64, color: &str) -> Self {
        let rotation_deg = wind_dir as f64 - 90.0;
        Self {
            class_name: "custom-arrow",
            html: render_marker_icon(rotation_deg, color),
            rotation_deg,
            size: [ICON_SIZE, ICON_SIZE],
            anchor: [ICON_SIZE / 2, ICON_SIZE / 2],
        }
    }
}

/// One observation on the map.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub id: usize,
    pub position: LatLon,
    /// Value the color was chosen from, in the mode's unit
    pub value: f64,
    pub color: String,
    pub icon: MarkerIcon,
    #[serde(skip)]
    pub observation: Arc<Observation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: u8,
}

/// Handlers attached to the map's popup-open event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupListener {
    /// Binds click-to-toggle on every `.collapsible-header` of the opened popup.
    CollapsibleToggle,
}

/// Mutable map state: markers, listeners, view and the open popup.
#[derive(Debug, Clone, Serialize)]
pub struct MapLayer {
    pub markers: Vec<Marker>,
    pub listeners: Vec<PopupListener>,
    pub viewport: Viewport,
    pub open_popup: Option<usize>,
    pub mode: ClassificationMode,
    /// Document the markers were built from
    pub source_path: Option<String>,
    /// Stamp of the load that produced this state
    pub stamp: u64,
    /// Set once a load has opened the initial popup
    #[serde(skip)]
    initial_popup_opened: bool,
}

impl MapLayer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            markers: Vec::new(),
            listeners: Vec::new(),
            viewport,
            open_popup: None,
            mode: ClassificationMode::default(),
            source_path: None,
            stamp: 0,
            initial_popup_opened: false,
        }
    }

    pub fn marker(&self, id: usize) -> ReconResult<&Marker> {
        self.markers
            .iter()
            .find(|m| m.id == id)
            .ok_or(ReconError::MarkerNotFound(id))
    }

    fn clear(&mut self) {
        self.markers.clear();
        self.listeners.clear();
        self.open_popup = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    Applied {
        stamp: u64,
        markers: usize,
        skipped: usize,
        opened_popup: Option<usize>,
    },
    /// A newer load was issued while this one was in flight.
    Stale { stamp: u64, latest: u64 },
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied { .. })
    }
}

fn first_level_f64(obs: &Observation, pick: impl Fn(&Level) -> &Option<FieldValue>) -> Option<f64> {
    obs.first_level()
        .and_then(|l| pick(l).as_ref())
        .and_then(FieldValue::as_leading_f64)
}

/// The value a record is colored by under `mode`.
///
/// Wind speed is read from the surface level in knots and converted to mph;
/// pressure defaults to [`DEFAULT_PRESSURE_HPA`] when the record has no levels;
/// heat fluxes prefer the surface level field, then the calculation of the
/// same name, then zero.
pub fn representative_value(obs: &Observation, mode: ClassificationMode) -> f64 {
    let has_levels = obs.first_level().is_some();
    match mode {
        ClassificationMode::WindSpeed => match obs.first_level() {
            Some(level) => level
                .wind_spd
                .as_ref()
                .and_then(FieldValue::as_i64)
                .map(|kt| knots_to_mph(kt as f64))
                .unwrap_or(f64::NAN),
            None => 0.0,
        },
        ClassificationMode::Pressure if has_levels => {
            first_level_f64(obs, |l| &l.pressure).unwrap_or(f64::NAN)
        }
        ClassificationMode::Pressure => DEFAULT_PRESSURE_HPA,
        ClassificationMode::LatentHeatFlux => first_level_f64(obs, |l| &l.latent_heat_flux)
            .or_else(|| obs.calculation("latent_heat_flux"))
            .unwrap_or(0.0),
        ClassificationMode::SensibleHeatFlux => first_level_f64(obs, |l| &l.sensible_heat_flux)
            .or_else(|| obs.calculation("sensible_heat_flux"))
            .unwrap_or(0.0),
    }
}

/// Surface wind direction in whole degrees, 0 when unknown.
pub fn wind_direction(obs: &Observation) -> i64 {
    obs.first_level()
        .and_then(|l| l.wind_dir.as_ref())
        .and_then(FieldValue::as_i64)
        .unwrap_or(0)
}

/// Markers for every valid record plus the number skipped.
pub fn build_markers(
    set: ObservationSet,
    mode: ClassificationMode,
    schemes: &ColorSchemeSet,
) -> (Vec<Marker>, usize) {
    let mut skipped = set.skipped.len();
    let mut markers = Vec::with_capacity(set.records.len());

    for (index, obs) in set.records.into_iter().enumerate() {
        let position = match (obs.basic_info.as_ref(), obs.position()) {
            (Some(_), Some(p)) if p.is_finite() => p,
            _ => {
                warn!(index, "Skipping record without identity or position");
                skipped += 1;
                continue;
            }
        };

        let value = representative_value(&obs, mode);
        let color = schemes.classify(mode, value).to_string();
        let icon = MarkerIcon::arrow(wind_direction(&obs), &color);

        markers.push(Marker {
            id: index,
            position,
            value,
            color,
            icon,
            observation: Arc::new(obs),
        });
    }

    (markers, skipped)
}

/// Owns the marker layer and serializes loads into it.
pub struct MarkerSync {
    layer: RwLock<MapLayer>,
    latest: AtomicU64,
    source: Arc<dyn DataSource>,
    schemes: Arc<ColorSchemeSet>,
    marker_zoom: u8,
}

impl MarkerSync {
    pub fn new(
        source: Arc<dyn DataSource>,
        schemes: Arc<ColorSchemeSet>,
        initial: Viewport,
        marker_zoom: u8,
    ) -> Self {
        Self {
            layer: RwLock::new(MapLayer::new(initial)),
            latest: AtomicU64::new(0),
            source,
            schemes,
            marker_zoom,
        }
    }

    /// Reserve the next stamp. Every stamp issued earlier becomes stale.
    pub fn issue_stamp(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest_stamp(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn layer(&self) -> &RwLock<MapLayer> {
        &self.layer
    }

    /// Fetch `path` and rebuild the layer from it.
    ///
    /// With `first_load` the first valid marker's popup is opened, at most
    /// once over the layer's lifetime. A fetch or parse failure leaves the
    /// layer as it was.
    pub async fn load(
        &self,
        path: &str,
        mode: ClassificationMode,
        first_load: bool,
    ) -> ReconResult<LoadOutcome> {
        let stamp = self.issue_stamp();
        self.load_stamped(stamp, path, mode, first_load).await
    }

    /// [`MarkerSync::load`] with a stamp reserved by the caller.
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn load_stamped(
        &self,
        stamp: u64,
        path: &str,
        mode: ClassificationMode,
        first_load: bool,
    ) -> ReconResult<LoadOutcome> {
        let start = Instant::now();

        let document = match self.source.fetch_json(path).await {
            Ok(doc) => doc,
            Err(e) => {
                error!(error = %e, "Error loading observations");
                counter!("recon_fetch_failures_total").increment(1);
                return Err(e.into());
            }
        };
        let set = ObservationSet::from_value(document).map_err(|e| {
            error!(error = %e, "Observation document rejected");
            counter!("recon_fetch_failures_total").increment(1);
            e
        })?;

        let (markers, skipped) = build_markers(set, mode, &self.schemes);
        let bounds = BoundingBox::from_points(markers.iter().map(|m| &m.position));

        let mut layer = self.layer.write().await;
        let latest = self.latest_stamp();
        if stamp != latest {
            warn!(stamp, latest, "Discarding stale load");
            counter!("recon_stale_loads_total").increment(1);
            return Ok(LoadOutcome::Stale { stamp, latest });
        }

        layer.clear();
        layer.markers = markers;
        layer.listeners.push(PopupListener::CollapsibleToggle);
        if let Some(bbox) = bounds.filter(BoundingBox::is_valid) {
            layer.viewport = Viewport {
                center: bbox.center(),
                zoom: self.marker_zoom,
            };
        }
        layer.open_popup = if first_load && !layer.initial_popup_opened {
            layer.markers.first().map(|m| m.id)
        } else {
            None
        };
        if layer.open_popup.is_some() {
            layer.initial_popup_opened = true;
        }
        layer.mode = mode;
        layer.source_path = Some(path.to_string());
        layer.stamp = stamp;

        let outcome = LoadOutcome::Applied {
            stamp,
            markers: layer.markers.len(),
            skipped,
            opened_popup: layer.open_popup,
        };
        drop(layer);

        counter!("recon_loads_total", "mode" => mode.as_str()).increment(1);
        counter!("recon_records_skipped_total").increment(skipped as u64);
        histogram!("recon_load_duration_ms").record(start.elapsed().as_secs_f64() * 1000.0);
        info!(?outcome, "Loaded observations");

        Ok(outcome)
    }
}
