//! Dropdown and mode selection handlers.
//!
//! Each handler updates the selection under the orchestrator lock and
//! reserves a load stamp before releasing it, so the last selection made is
//! the one whose markers end up on the map.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use recon_common::ReconError;
use recon_render::{ClassificationMode, Legend};

use super::ApiResult;
use crate::loader::LoadOutcome;
use crate::orchestrator::{LoadRequest, MissionHeader, MissionOption, ModeChange, Selection};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StormSelection {
    pub storm: String,
}

#[derive(Debug, Deserialize)]
pub struct MissionSelection {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeSelection {
    pub mode: String,
}

/// Selection state after a change, with the outcome of the load it triggered.
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selection: Selection,
    pub header: MissionHeader,
    pub options: Vec<MissionOption>,
    pub legend: Legend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadOutcome>,
}

async fn respond(
    state: &AppState,
    pending: Option<(u64, LoadRequest)>,
) -> ApiResult<Json<SelectionResponse>> {
    let load = match pending {
        Some((stamp, request)) => Some(state.execute(stamp, &request).await?),
        None => None,
    };

    let orchestrator = state.orchestrator.read().await;
    Ok(Json(SelectionResponse {
        selection: orchestrator.selection().clone(),
        header: orchestrator.header().clone(),
        options: orchestrator.mission_options().to_vec(),
        legend: orchestrator.legend(&state.schemes),
        load,
    }))
}

/// POST /api/selection/storm - Select a storm and load its first mission
pub async fn select_storm_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<StormSelection>,
) -> ApiResult<Json<SelectionResponse>> {
    let pending = {
        let mut orchestrator = state.orchestrator.write().await;
        orchestrator
            .select_storm(&body.storm)?
            .map(|request| (state.markers.issue_stamp(), request))
    };
    respond(&state, pending).await
}

/// POST /api/selection/mission - Select a mission of the current storm
pub async fn select_mission_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<MissionSelection>,
) -> ApiResult<Json<SelectionResponse>> {
    let pending = {
        let mut orchestrator = state.orchestrator.write().await;
        let request = orchestrator.select_mission(&body.path)?;
        Some((state.markers.issue_stamp(), request))
    };
    respond(&state, pending).await
}

/// POST /api/selection/mode - Change the classification mode
pub async fn select_mode_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<ModeSelection>,
) -> ApiResult<Json<SelectionResponse>> {
    let mode: ClassificationMode =
        body.mode
            .parse()
            .map_err(|e: recon_render::SchemeError| ReconError::InvalidParameter {
                param: "mode".to_string(),
                message: e.to_string(),
            })?;

    let pending = {
        let mut orchestrator = state.orchestrator.write().await;
        match orchestrator.set_mode(mode) {
            ModeChange::Reload(request) => Some((state.markers.issue_stamp(), request)),
            ModeChange::LegendOnly => None,
        }
    };
    respond(&state, pending).await
}

/// POST /api/refresh - Reload the selected mission
pub async fn refresh_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<SelectionResponse>> {
    let pending = {
        let mut orchestrator = state.orchestrator.write().await;
        let request = orchestrator.refresh()?;
        Some((state.markers.issue_stamp(), request))
    };
    respond(&state, pending).await
}
