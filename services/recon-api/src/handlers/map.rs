//! Map view handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use recon_render::{ClassificationMode, Legend};

use crate::config::MapConfig;
use crate::loader::{Marker, PopupListener, Viewport};
use crate::orchestrator::{MissionHeader, MissionOption, Selection};
use crate::state::AppState;

/// Everything the page needs to draw the map and its panels.
#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub map: MapConfig,
    pub viewport: Viewport,
    pub markers: Vec<Marker>,
    pub open_popup: Option<usize>,
    pub listeners: Vec<PopupListener>,
    pub legend: Legend,
    pub header: MissionHeader,
    pub selection: Selection,
    pub options: Vec<MissionOption>,
    /// Stamp of the load the markers came from
    pub stamp: u64,
}

/// GET /api/map - Current map state
pub async fn map_handler(Extension(state): Extension<Arc<AppState>>) -> Json<MapResponse> {
    let (legend, header, selection, options) = {
        let orchestrator = state.orchestrator.read().await;
        (
            orchestrator.legend(&state.schemes),
            orchestrator.header().clone(),
            orchestrator.selection().clone(),
            orchestrator.mission_options().to_vec(),
        )
    };
    let layer = state.markers.layer().read().await;

    Json(MapResponse {
        map: state.config.map.clone(),
        viewport: layer.viewport,
        markers: layer.markers.clone(),
        open_popup: layer.open_popup,
        listeners: layer.listeners.clone(),
        legend,
        header,
        selection,
        options,
        stamp: layer.stamp,
    })
}

#[derive(Debug, Deserialize)]
pub struct LegendQuery {
    pub mode: Option<String>,
}

/// GET /api/legend?mode= - Legend for a mode, or the selected one
pub async fn legend_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<LegendQuery>,
) -> Json<Legend> {
    let mode = match query.mode.as_deref() {
        Some(m) => ClassificationMode::parse_or_default(m),
        None => state.orchestrator.read().await.selection().mode,
    };
    Json(Legend::for_mode(mode, &state.schemes))
}
