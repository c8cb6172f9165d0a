//! Marker popup handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use recon_common::ReconError;
use recon_render::carousel::{Carousel, EdgePolicy};
use recon_render::html::render_carousel;
use recon_render::popup::observation_images;
use recon_render::{format_popup, render_popup_html};

use super::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

fn wants_html(format: Option<&str>) -> ApiResult<bool> {
    match format {
        None | Some("json") => Ok(false),
        Some("html") => Ok(true),
        Some(other) => Err(ReconError::InvalidParameter {
            param: "format".to_string(),
            message: format!("expected json or html, got '{}'", other),
        }
        .into()),
    }
}

/// GET /api/markers/:id/popup - Popup content for one marker
pub async fn popup_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<usize>,
    Query(query): Query<FormatQuery>,
) -> ApiResult<Response> {
    let html = wants_html(query.format.as_deref())?;
    let content = {
        let layer = state.markers.layer().read().await;
        let marker = layer.marker(id)?;
        format_popup(&marker.observation, &marker.color)
    };
    debug!(marker = id, error = content.is_error(), "Popup built");

    Ok(if html {
        Html(render_popup_html(&content)).into_response()
    } else {
        Json(content).into_response()
    })
}

#[derive(Debug, Deserialize)]
pub struct CarouselQuery {
    /// Page to show; ignored when `offset` is given
    pub page: Option<usize>,
    /// Arrow step relative to `from`
    pub offset: Option<isize>,
    #[serde(default)]
    pub from: usize,
    pub format: Option<String>,
}

/// GET /api/markers/:id/carousel - One page of a popup's image carousel
pub async fn popup_carousel_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<usize>,
    Query(query): Query<CarouselQuery>,
) -> ApiResult<Response> {
    let html = wants_html(query.format.as_deref())?;
    let images = {
        let layer = state.markers.layer().read().await;
        let marker = layer.marker(id)?;
        observation_images(&marker.observation)
            .ok_or_else(|| ReconError::InvalidData(format!("marker {} has no identity", id)))?
    };

    let mut carousel = Carousel::new(images.len(), EdgePolicy::Wrap);
    match query.offset {
        Some(offset) => {
            carousel.jump(query.from);
            carousel.move_by(offset);
        }
        None => {
            carousel.jump(query.page.unwrap_or(0));
        }
    }
    let view = carousel.view(&images);

    Ok(if html {
        Html(render_carousel(&view).into_string()).into_response()
    } else {
        Json(view).into_response()
    })
}
