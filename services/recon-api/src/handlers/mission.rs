//! Mission header and plot carousel handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use recon_render::html::render_carousel;

use super::ApiResult;
use crate::orchestrator::MissionHeader;
use crate::state::AppState;

/// GET /api/mission - Header for the selected mission
pub async fn mission_header_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<MissionHeader> {
    Json(state.orchestrator.read().await.header().clone())
}

#[derive(Debug, Deserialize)]
pub struct MissionCarouselQuery {
    #[serde(default)]
    pub page: usize,
    pub format: Option<String>,
}

/// GET /api/mission/carousel?page= - Mission plots, three per page, no wrap
pub async fn mission_carousel_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<MissionCarouselQuery>,
) -> ApiResult<Response> {
    let view = state
        .orchestrator
        .read()
        .await
        .mission_carousel(query.page)?;
    Ok(match query.format.as_deref() {
        Some("html") => Html(render_carousel(&view).into_string()).into_response(),
        _ => Json(view).into_response(),
    })
}
