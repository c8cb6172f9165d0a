//! Storm catalog handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;

use recon_common::MissionEntry;

use super::ApiResult;
use crate::orchestrator::MissionOption;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StormSummary {
    pub storm_name: String,
    pub missions: usize,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub storms: Vec<StormSummary>,
}

/// GET /api/catalog - Storms available for selection
pub async fn catalog_handler(Extension(state): Extension<Arc<AppState>>) -> Json<CatalogResponse> {
    let orchestrator = state.orchestrator.read().await;
    let storms = orchestrator
        .catalog()
        .storms
        .iter()
        .map(|s| StormSummary {
            storm_name: s.storm_name.clone(),
            missions: s.array_of_missions.len(),
        })
        .collect();
    Json(CatalogResponse { storms })
}

#[derive(Debug, Serialize)]
pub struct MissionsResponse {
    pub storm: String,
    pub options: Vec<MissionOption>,
    pub missions: Vec<MissionEntry>,
}

/// GET /api/storms/:storm/missions - Mission dropdown entries for a storm
pub async fn missions_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(storm): Path<String>,
) -> ApiResult<Json<MissionsResponse>> {
    let orchestrator = state.orchestrator.read().await;
    let options = orchestrator.missions_for(&storm)?;
    let missions = orchestrator
        .catalog()
        .storm(&storm)
        .map(|s| s.array_of_missions.clone())
        .unwrap_or_default();
    Ok(Json(MissionsResponse {
        storm,
        options,
        missions,
    }))
}
