//! Observation download handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use super::ApiResult;
use crate::download::{attachment_header, image_downloads, observation_download, ImageDownloads};
use crate::state::AppState;

/// GET /api/markers/:id/download - The observation record as a JSON attachment
pub async fn observation_download_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<usize>,
) -> ApiResult<Response> {
    let download = {
        let layer = state.markers.layer().read().await;
        observation_download(&layer.marker(id)?.observation)?
    };
    info!(marker = id, filename = %download.filename, "Observation download");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment_header(&download.filename),
            ),
        ],
        download.body,
    )
        .into_response())
}

/// GET /api/markers/:id/images - Plot locations and their save names
pub async fn image_downloads_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<usize>,
) -> ApiResult<Json<ImageDownloads>> {
    let layer = state.markers.layer().read().await;
    Ok(Json(image_downloads(&layer.marker(id)?.observation)?))
}
