//! Tests for popup content assembly and HTML rendering.

use recon_common::{BasicInfo, Observation};
use recon_render::popup::{format_popup, ObservationPopup, PopupContent};
use recon_render::render_popup_html;
use test_utils::fixtures::FULL_OBSERVATION;

fn full_popup() -> ObservationPopup {
    let obs = Observation::from_json(FULL_OBSERVATION).unwrap();
    match format_popup(&obs, "#00ba73") {
        PopupContent::Observation(popup) => *popup,
        PopupContent::Error { message } => panic!("unexpected error popup: {}", message),
    }
}

#[test]
fn test_missing_basic_info_is_error_placeholder() {
    let obs = Observation::default();
    let content = format_popup(&obs, "#000000");
    assert_eq!(
        content,
        PopupContent::Error {
            message: "Invalid data".to_string()
        }
    );
    assert!(render_popup_html(&content).contains("Error: Invalid data"));
}

#[test]
fn test_error_serializes_with_kind_tag() {
    let content = format_popup(&Observation::default(), "#000000");
    let value = serde_json::to_value(&content).unwrap();
    assert_eq!(value["kind"], "error");
    assert_eq!(value["message"], "Invalid data");
}

#[test]
fn test_header() {
    let popup = full_popup();
    assert_eq!(popup.color, "#00ba73");
    assert_eq!(popup.header.storm_name, "Alberto");
    assert_eq!(popup.header.storm_type, "Tropical Storm");
    assert_eq!(popup.header.mission, "Mission #01");
    assert_eq!(popup.header.observation, "Obs #07");
    let values: Vec<_> = popup.header.rows.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, ["N42RF", "22.35N, -94.12W", "2024-06-19 at 18:15"]);
}

#[test]
fn test_surface_section_uses_first_level() {
    let popup = full_popup();
    let values: Vec<_> = popup.surface.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(
        values,
        [
            "1002 hPa",
            "29.4°C",
            "27.8°C",
            "24.1°C",
            "45 knots (51.8 mph)",
            "95°"
        ]
    );
}

#[test]
fn test_null_dewpoint_renders_na() {
    let popup = full_popup();
    let main = &popup.sections[0];
    assert_eq!(main.heading(), "Main Levels (3)");
    assert_eq!(main.rows[2].cells[3], "N/A");
}

#[test]
fn test_calculation_order_and_formatting() {
    let popup = full_popup();
    let calcs = &popup.sections[3];
    assert_eq!(calcs.heading(), "Calculations (8)");
    let labels: Vec<_> = calcs.rows.iter().map(|r| r.cells[0].as_str()).collect();
    assert_eq!(
        labels,
        [
            "10 m Wind Speed",
            "Drag Coefficient",
            "Moisture Exchange Coefficient",
            "Sensible Heat Flux",
            "Latent Heat Flux",
            "Bowen Ratio",
            "0-3 km Bulk Shear",
            "custom_index",
        ]
    );
    let values: Vec<_> = calcs.rows.iter().map(|r| r.cells[1].as_str()).collect();
    assert_eq!(
        values,
        ["23.15", "1.50e-3", "1.23e-3", "18.90", "312.46", "0.06", "N/A", "4.20"]
    );
    assert!(calcs.rows[0].tooltip.is_some());
    assert!(calcs.rows[7].tooltip.is_none());
}

#[test]
fn test_carousel_first_page_and_downloads() {
    let popup = full_popup();
    assert_eq!(popup.carousel.page, 0);
    assert_eq!(popup.carousel.page_count, 3);
    assert_eq!(popup.carousel.items.len(), 3);
    assert_eq!(
        popup.carousel.items[0].src,
        "static/images/dropsonde/Alberto2024/0107_skewt.png"
    );
    assert_eq!(popup.downloads.json_name, "Alberto2024_01_07.json");
    assert_eq!(popup.downloads.images.len(), 7);
}

#[test]
fn test_html_escapes_text() {
    let obs = Observation {
        basic_info: Some(BasicInfo {
            storm_name: Some("alberto".into()),
            storm_type: Some("<script>alert(1)</script>".into()),
            ..Default::default()
        }),
        ..Default::default()
    };
    let html = render_popup_html(&format_popup(&obs, "#02418b"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains(r#"class="popup-section collapsible""#));
    assert!(html.contains("Main Levels (0)"));
}
