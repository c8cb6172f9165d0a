//! Popup content for one observation marker.
//!
//! [`format_popup`] builds a serializable tree; [`crate::html`] turns it into
//! markup. Absent values render as `N/A` everywhere, while zero stays `0`.

use serde::Serialize;

use recon_common::{knots_to_mph, FieldValue, Observation, ObservationTime, NOT_AVAILABLE};

use crate::assets::{ImageRef, ObservationImage, ObservationKey};
use crate::calculations::calculation_rows;
use crate::carousel::{Carousel, CarouselView, EdgePolicy};

/// Message shown for records without identity.
pub const INVALID_DATA: &str = "Invalid data";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PopupContent {
    Error { message: String },
    Observation(Box<ObservationPopup>),
}

impl PopupContent {
    pub fn is_error(&self) -> bool {
        matches!(self, PopupContent::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationPopup {
    /// Marker class color, used as the header background
    pub color: String,
    pub header: PopupHeader,
    pub carousel: CarouselView<ImageRef>,
    pub surface: Vec<PopupRow>,
    pub sections: Vec<TableSection>,
    pub downloads: Downloads,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupHeader {
    pub storm_name: String,
    pub storm_type: String,
    pub mission: String,
    pub observation: String,
    pub rows: Vec<PopupRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupRow {
    pub label: String,
    pub value: String,
}

impl PopupRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// A collapsible table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSection {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableSection {
    fn new(title: &str, columns: &[&str], rows: Vec<TableRow>) -> Self {
        Self {
            title: title.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Header text, e.g. `Main Levels (3)`.
    pub fn heading(&self) -> String {
        format!("{} ({})", self.title, self.rows.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    /// Hover text for the row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl TableRow {
    fn plain(cells: Vec<String>) -> Self {
        Self {
            cells,
            tooltip: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Downloads {
    pub json_name: String,
    pub images: Vec<ImageRef>,
}

fn cell(v: &Option<FieldValue>) -> String {
    v.as_ref()
        .map(FieldValue::as_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn with_unit(v: &Option<FieldValue>, unit: &str) -> String {
    match v {
        Some(f) => format!("{}{}", f, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Every image of an observation, or None when it has no identity.
pub fn observation_images(obs: &Observation) -> Option<Vec<ImageRef>> {
    let info = obs.basic_info.as_ref()?;
    Some(ObservationImage::all_references(&ObservationKey::from_basic_info(
        info,
    )))
}

/// Build the popup for `obs` with the marker's class `color`.
pub fn format_popup(obs: &Observation, color: &str) -> PopupContent {
    let Some(info) = obs.basic_info.as_ref() else {
        return PopupContent::Error {
            message: INVALID_DATA.to_string(),
        };
    };

    let key = ObservationKey::from_basic_info(info);
    let images = ObservationImage::all_references(&key);

    let coordinates = match (&info.lat, info.lon.as_ref().and_then(FieldValue::as_f64)) {
        (Some(lat), Some(lon)) => format!("{}N, -{}W", lat, lon.abs()),
        _ => NOT_AVAILABLE.to_string(),
    };

    let header = PopupHeader {
        storm_name: key.storm.clone(),
        storm_type: info
            .storm_type
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        mission: format!("Mission #{}", key.mission_id),
        observation: format!("Obs #{}", key.observation_id),
        rows: vec![
            PopupRow::new("Plane", cell(&info.plane_id)),
            PopupRow::new("Coordinates", coordinates),
            PopupRow::new(
                "Date/Time",
                ObservationTime::from_basic_info(info).display(),
            ),
        ],
    };

    let surface = surface_rows(obs);

    let carousel = Carousel::new(images.len(), EdgePolicy::Wrap).view(&images);

    PopupContent::Observation(Box::new(ObservationPopup {
        color: color.to_string(),
        header,
        carousel,
        surface,
        sections: table_sections(obs),
        downloads: Downloads {
            json_name: key.json_download_name(),
            images,
        },
    }))
}

fn surface_rows(obs: &Observation) -> Vec<PopupRow> {
    let first = obs.first_level().cloned().unwrap_or_default();
    let sst = obs.basic_info.as_ref().and_then(|i| i.sst_value.clone());

    let wind = match first.wind_spd.as_ref().and_then(FieldValue::as_f64) {
        Some(kt) => format!(
            "{} knots ({:.1} mph)",
            cell(&first.wind_spd),
            knots_to_mph(kt)
        ),
        None => cell(&first.wind_spd),
    };

    vec![
        PopupRow::new("Pressure", with_unit(&first.pressure, " hPa")),
        PopupRow::new("Sea Surface Temperature", with_unit(&sst, "°C")),
        PopupRow::new("Air Temperature", with_unit(&first.temperature, "°C")),
        PopupRow::new("Dewpoint", with_unit(&first.dewpoint, "°C")),
        PopupRow::new("Wind Speed", wind),
        PopupRow::new("Wind Direction", with_unit(&first.wind_dir, "°")),
    ]
}

fn table_sections(obs: &Observation) -> Vec<TableSection> {
    let levels = obs
        .levels
        .iter()
        .map(|l| {
            TableRow::plain(vec![
                cell(&l.pressure),
                cell(&l.height),
                cell(&l.temperature),
                cell(&l.dewpoint),
                cell(&l.wind_dir),
                cell(&l.wind_spd),
            ])
        })
        .collect();

    let temp_levels = obs
        .temp_levels
        .iter()
        .map(|l| TableRow::plain(vec![cell(&l.pressure), cell(&l.temperature), cell(&l.dewpoint)]))
        .collect();

    let wind_levels = obs
        .wind_levels
        .iter()
        .map(|l| TableRow::plain(vec![cell(&l.pressure), cell(&l.wind_dir), cell(&l.wind_spd)]))
        .collect();

    let calculations = calculation_rows(obs)
        .into_iter()
        .map(|r| TableRow {
            cells: vec![r.label, r.value, r.unit],
            tooltip: (!r.description.is_empty()).then_some(r.description),
        })
        .collect();

    vec![
        TableSection::new(
            "Main Levels",
            &[
                "Pressure (hPa)",
                "Height (m)",
                "Temp (°C)",
                "Dewpoint (°C)",
                "Wind Dir (°)",
                "Wind Spd (knots)",
            ],
            levels,
        ),
        TableSection::new(
            "Temperature Levels",
            &["Pressure (hPa)", "Temp (°C)", "Dewpoint (°C)"],
            temp_levels,
        ),
        TableSection::new(
            "Wind Levels",
            &["Pressure (hPa)", "Wind Dir (°)", "Wind Spd (knots)"],
            wind_levels,
        ),
        TableSection::new("Calculations", &["Parameter", "Value", "Unit"], calculations),
    ]
}
