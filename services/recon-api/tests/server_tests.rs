//! Router tests: requests go through the full middleware stack against an
//! on-disk site.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use recon_api::build_router;
use recon_api::config::ServiceConfig;
use recon_api::source::{DataSource, FsSource};
use recon_api::state::AppState;
use recon_render::ColorSchemeSet;
use test_utils::StaticSite;

async fn state_for(site: &StaticSite, default_storm: Option<&str>) -> Arc<AppState> {
    let static_dir = site.root().join("static");
    let mut config = ServiceConfig::for_static_dir(&static_dir);
    config.default_storm = default_storm.map(str::to_string);
    let source: Arc<dyn DataSource> = Arc::new(FsSource::new(&static_dir));

    let state = AppState::with_source(config, source, ColorSchemeSet::builtin())
        .await
        .unwrap();
    state.startup().await;
    Arc::new(state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn test_startup_loads_default_storm() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let (status, map) = get_json(&app, "/api/map").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(map["selection"]["storm"], "Alberto");
    assert_eq!(
        map["selection"]["mission_path"],
        "static/json/Alberto/AL012024_01.json"
    );
    assert_eq!(map["markers"].as_array().unwrap().len(), 3);
    assert_eq!(map["open_popup"], 0);
    assert_eq!(map["listeners"], json!(["collapsible_toggle"]));
    assert_eq!(map["header"]["title"], "Alberto (Mission #01)");
    assert_eq!(map["legend"]["title"], "Wind Speed Legend");
    assert_eq!(map["options"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_default_storm_leaves_map_empty() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Chris")).await);

    let (_, map) = get_json(&app, "/api/map").await;
    assert!(map["markers"].as_array().unwrap().is_empty());
    assert_eq!(map["selection"]["storm"], Value::Null);
    assert_eq!(map["header"]["title"], "Storm Recon");
}

#[tokio::test]
async fn test_missing_catalog_fails_state() {
    let site = StaticSite::empty();
    let static_dir = site.root().join("static");
    let source: Arc<dyn DataSource> = Arc::new(FsSource::new(&static_dir));
    let result = AppState::with_source(
        ServiceConfig::for_static_dir(&static_dir),
        source,
        ColorSchemeSet::builtin(),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_loose_catalog_fields_fall_back() {
    let site = StaticSite::with_fixtures();
    site.write_json(
        "static/json/storm_catalog.json",
        &json!([{
            "storm_name": "Alberto",
            "array_of_missions": [{
                "filename": "AL012024_01.json",
                "mission_number": "01",
                "number_of_observations": "12",
                "start_time": "2024-06-19T1130",
                "central_coordinates": {"latitude": null, "longitude": 94.1}
            }]
        }]),
    );
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let (status, map) = get_json(&app, "/api/map").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(map["header"]["observations"], "12 observations");
    assert_eq!(map["header"]["coordinates"], "Lat: N/A, Lon: N/A");
    assert_eq!(map["header"]["plane"], "Plane: N/A");
    assert_eq!(
        map["options"][0]["label"],
        "Alberto - Mission #01 (12 observations)"
    );
    assert_eq!(map["markers"].as_array().unwrap().len(), 3);
}

// ============================================================================
// Catalog and selection
// ============================================================================

#[tokio::test]
async fn test_catalog_lists_storms() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, None).await);

    let (status, catalog) = get_json(&app, "/api/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        catalog["storms"],
        json!([
            {"storm_name": "Alberto", "missions": 2},
            {"storm_name": "Beryl", "missions": 0}
        ])
    );

    let (status, missions) = get_json(&app, "/api/storms/Alberto/missions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        missions["options"][1]["path"],
        "static/json/Alberto/AL012024_02.json"
    );

    let (status, err) = get_json(&app, "/api/storms/Zeta/missions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["type"], "NotFound");
}

#[tokio::test]
async fn test_select_storm_then_mission() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, None).await);

    let (status, body) = post_json(&app, "/api/selection/storm", json!({"storm": "Alberto"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["load"]["status"], "applied");
    assert_eq!(body["load"]["markers"], 3);
    assert_eq!(body["load"]["opened_popup"], 0);

    let (status, body) = post_json(
        &app,
        "/api/selection/mission",
        json!({"path": "static/json/Alberto/AL012024_02.json"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["load"]["markers"], 2);
    assert_eq!(body["load"]["opened_popup"], Value::Null);
    assert_eq!(body["header"]["plane"], "Plane: N43RF");
}

#[tokio::test]
async fn test_storm_without_missions_clears_selection() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let (status, body) = post_json(&app, "/api/selection/storm", json!({"storm": "Beryl"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selection"]["mission_path"], Value::Null);
    assert!(body.get("load").is_none());
    assert!(body["options"].as_array().unwrap().is_empty());

    let (status, _) = post_json(&app, "/api/refresh", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mode_change_reloads_and_updates_legend() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let (status, body) = post_json(&app, "/api/selection/mode", json!({"mode": "pressure"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["legend"]["title"], "Pressure Legend");
    assert_eq!(body["load"]["status"], "applied");

    let (_, map) = get_json(&app, "/api/map").await;
    assert_eq!(map["markers"][1]["value"], 995.0);

    let (status, _) = post_json(&app, "/api/selection/mode", json!({"mode": "humidity"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mode_change_without_mission_only_changes_legend() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, None).await);

    let (status, body) = post_json(
        &app,
        "/api/selection/mode",
        json!({"mode": "latent_heat_flux"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("load").is_none());
    assert_eq!(body["legend"]["title"], "Latent Heat Flux Legend");
}

#[tokio::test]
async fn test_legend_query_falls_back_to_wind() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, None).await);

    let (_, legend) = get_json(&app, "/api/legend?mode=bogus").await;
    assert_eq!(legend["mode"], "wind_speed");
    let (_, legend) = get_json(&app, "/api/legend?mode=sensible_heat_flux").await;
    assert_eq!(legend["title"], "Sensible Heat Flux Legend");
}

// ============================================================================
// Markers
// ============================================================================

#[tokio::test]
async fn test_popup_json_and_html() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let (status, popup) = get_json(&app, "/api/markers/0/popup").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(popup["kind"], "observation");
    assert_eq!(popup["header"]["storm_name"], "Alberto");
    assert_eq!(popup["carousel"]["page_count"], 3);

    let (status, html) = get(&app, "/api/markers/0/popup?format=html").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("material-popup"));
    assert!(html.contains("Surface Information"));

    let (status, _) = get(&app, "/api/markers/0/popup?format=xml").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, err) = get_json(&app, "/api/markers/99/popup").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["detail"], "Marker not found: 99");
}

#[tokio::test]
async fn test_popup_carousel_wraps() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let (_, view) = get_json(&app, "/api/markers/0/carousel?offset=-1&from=0").await;
    assert_eq!(view["page"], 2);
    assert_eq!(view["items"].as_array().unwrap().len(), 1);

    let (_, view) = get_json(&app, "/api/markers/0/carousel?offset=1&from=2").await;
    assert_eq!(view["page"], 0);

    let (_, view) = get_json(&app, "/api/markers/0/carousel?page=1").await;
    assert_eq!(view["page"], 1);
    assert_eq!(view["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_popup_carousel_page_jump_is_clamped() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let (status, view) = get_json(&app, "/api/markers/1/carousel?page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], 2);
    assert_eq!(view["policy"], "wrap");

    let (status, html) = get(&app, "/api/markers/1/carousel?page=1&format=html").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains(r#"class="carousel-page-btn active" data-page="1""#));
}

#[tokio::test]
async fn test_mission_carousel_stops_at_edges() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let (status, view) = get_json(&app, "/api/mission/carousel?page=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], 1);
    assert_eq!(view["next_enabled"], false);
    assert_eq!(view["prev_enabled"], true);
    assert_eq!(view["policy"], "stop");
}

#[tokio::test]
async fn test_observation_download_attachment() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, Some("Alberto")).await);

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/markers/1/download")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Alberto2024_01_02.json\""
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let record: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(record["basic_info"]["observation_id"], "02");

    let (_, images) = get_json(&app, "/api/markers/1/images").await;
    assert_eq!(
        images["images"][0]["download_name"],
        "Alberto2024_0102_skewt.png"
    );
}

// ============================================================================
// Health and assets
// ============================================================================

#[tokio::test]
async fn test_health_and_metrics() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, None).await);

    let (status, health) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["service"], "recon-api");

    let (status, _) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_static_files_are_served() {
    let site = StaticSite::with_fixtures();
    let app = build_router(state_for(&site, None).await);

    let (status, body) = get(&app, "/static/json/storm_catalog.json").await;
    assert_eq!(status, StatusCode::OK);
    let catalog: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(catalog[0]["storm_name"], "Alberto");
}
