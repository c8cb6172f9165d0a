//! Storm recon map service library.
//!
//! Serves the map page's data: the storm catalog, the current selection,
//! classified observation markers and their popups.

pub mod config;
pub mod download;
pub mod handlers;
pub mod loader;
pub mod orchestrator;
pub mod source;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use state::AppState;

/// Build the service router around shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Catalog
        .route("/api/catalog", get(handlers::catalog::catalog_handler))
        .route(
            "/api/storms/:storm/missions",
            get(handlers::catalog::missions_handler),
        )
        // Selection
        .route(
            "/api/selection/storm",
            post(handlers::selection::select_storm_handler),
        )
        .route(
            "/api/selection/mission",
            post(handlers::selection::select_mission_handler),
        )
        .route(
            "/api/selection/mode",
            post(handlers::selection::select_mode_handler),
        )
        .route("/api/refresh", post(handlers::selection::refresh_handler))
        // Map state
        .route("/api/map", get(handlers::map::map_handler))
        .route("/api/legend", get(handlers::map::legend_handler))
        .route(
            "/api/mission",
            get(handlers::mission::mission_header_handler),
        )
        .route(
            "/api/mission/carousel",
            get(handlers::mission::mission_carousel_handler),
        )
        // Markers
        .route(
            "/api/markers/:id/popup",
            get(handlers::popup::popup_handler),
        )
        .route(
            "/api/markers/:id/carousel",
            get(handlers::popup::popup_carousel_handler),
        )
        .route(
            "/api/markers/:id/download",
            get(handlers::download::observation_download_handler),
        )
        .route(
            "/api/markers/:id/images",
            get(handlers::download::image_downloads_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Site assets
        .nest_service("/static", static_dir)
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
