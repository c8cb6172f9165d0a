//! Measurement-to-color classification.
//!
//! A [`ColorScheme`] is an ordered table of threshold bands. Two evaluation
//! rules exist:
//! - [`SchemeKind::MinimumDescending`]: bands are listed highest threshold
//!   first and the first band with `min <= value` wins (wind speed, heat flux).
//! - [`SchemeKind::BandedRange`]: the first band with `min <= value < max`
//!   wins (pressure).
//!
//! When nothing matches, the last band is the catch-all, so classification is
//! total over every `f64` including NaN.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The measurement that drives marker colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    #[default]
    WindSpeed,
    Pressure,
    LatentHeatFlux,
    SensibleHeatFlux,
}

impl ClassificationMode {
    pub const ALL: [ClassificationMode; 4] = [
        ClassificationMode::WindSpeed,
        ClassificationMode::Pressure,
        ClassificationMode::LatentHeatFlux,
        ClassificationMode::SensibleHeatFlux,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMode::WindSpeed => "wind_speed",
            ClassificationMode::Pressure => "pressure",
            ClassificationMode::LatentHeatFlux => "latent_heat_flux",
            ClassificationMode::SensibleHeatFlux => "sensible_heat_flux",
        }
    }

    /// Legend title.
    pub fn title(&self) -> &'static str {
        match self {
            ClassificationMode::WindSpeed => "Wind Speed",
            ClassificationMode::Pressure => "Pressure",
            ClassificationMode::LatentHeatFlux => "Latent Heat Flux",
            ClassificationMode::SensibleHeatFlux => "Sensible Heat Flux",
        }
    }

    /// Label used in the mode selector.
    pub fn option_label(&self) -> &'static str {
        match self {
            ClassificationMode::WindSpeed => "Wind Speed",
            ClassificationMode::Pressure => "Pressure",
            ClassificationMode::LatentHeatFlux => "Latent Heat Flux (Total)",
            ClassificationMode::SensibleHeatFlux => "Sensible Heat Flux (Total)",
        }
    }

    /// Parse a mode name, falling back to wind speed for anything unknown.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationMode {
    type Err = SchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassificationMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| SchemeError::UnknownMode(s.to_string()))
    }
}

/// How a scheme's bands are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    MinimumDescending,
    BandedRange,
}

/// One threshold entry of a color scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Inclusive lower bound, None for negative infinity
    #[serde(default)]
    pub min: Option<f64>,

    /// Exclusive upper bound, None for positive infinity (banded schemes only)
    #[serde(default)]
    pub max: Option<f64>,

    /// Display color, `#rrggbb`
    pub color: String,

    /// Legend label
    pub label: String,
}

impl Band {
    fn above(min: f64, color: &str, label: &str) -> Self {
        Self {
            min: Some(min),
            max: None,
            color: color.to_string(),
            label: label.to_string(),
        }
    }

    fn range(min: Option<f64>, max: Option<f64>, color: &str, label: &str) -> Self {
        Self {
            min,
            max,
            color: color.to_string(),
            label: label.to_string(),
        }
    }

    fn admits_min(&self, value: f64) -> bool {
        self.min.map_or(true, |m| value >= m)
    }

    fn admits_max(&self, value: f64) -> bool {
        self.max.map_or(true, |m| value < m)
    }
}

/// An ordered threshold table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub kind: SchemeKind,
    pub bands: Vec<Band>,
}

const CAT5: &str = "#ed098e";
const CAT4: &str = "#602778";
const CAT3: &str = "#f43445";
const CAT2: &str = "#ff8a02";
const CAT1: &str = "#fad716";
const TS: &str = "#00ba73";
const WEAK: &str = "#02418b";

impl ColorScheme {
    /// Saffir-Simpson categories on surface wind speed in mph.
    pub fn wind_speed() -> Self {
        Self {
            kind: SchemeKind::MinimumDescending,
            bands: vec![
                Band::above(157.5, CAT5, "Cat 5 (157.5+ mph)"),
                Band::above(130.0, CAT4, "Cat 4 (130-157 mph)"),
                Band::above(111.0, CAT3, "Cat 3 (111-129 mph)"),
                Band::above(96.0, CAT2, "Cat 2 (96-110 mph)"),
                Band::above(74.0, CAT1, "Cat 1 (74-95 mph)"),
                Band::above(39.0, TS, "Tropical Storm (39-73 mph)"),
                Band::above(0.0, WEAK, "Below TS (<39 mph)"),
            ],
        }
    }

    /// Surface pressure bands in hPa; lower is stronger.
    ///
    /// The extreme band starts at +inf: it is listed in the legend but never
    /// matches, so readings below 920 take the last band.
    pub fn pressure() -> Self {
        Self {
            kind: SchemeKind::BandedRange,
            bands: vec![
                Band::range(Some(f64::INFINITY), Some(920.0), CAT5, "<920 hPa (Extreme)"),
                Band::range(Some(920.0), Some(944.0), CAT4, "920-944 hPa (Cat 4+)"),
                Band::range(Some(944.0), Some(965.0), CAT3, "944-965 hPa (Cat 3)"),
                Band::range(Some(965.0), Some(980.0), CAT2, "965-980 hPa (Cat 2)"),
                Band::range(Some(980.0), Some(995.0), CAT1, "980-995 hPa (Cat 1)"),
                Band::range(Some(995.0), Some(1010.0), TS, "995-1010 hPa (TS)"),
                Band::range(Some(1010.0), None, WEAK, ">1010 hPa (Weak)"),
            ],
        }
    }

    pub fn latent_heat_flux() -> Self {
        Self {
            kind: SchemeKind::MinimumDescending,
            bands: vec![
                Band::above(400.0, CAT5, ">400 W/m² (Extreme)"),
                Band::above(300.0, CAT4, "300-400 W/m² (Very High)"),
                Band::above(200.0, CAT3, "200-300 W/m² (High)"),
                Band::above(100.0, CAT2, "100-200 W/m² (Moderate)"),
                Band::above(50.0, CAT1, "50-100 W/m² (Low)"),
                Band::above(25.0, TS, "25-50 W/m² (Very Low)"),
                Band::above(0.0, WEAK, "<25 W/m² (Minimal)"),
            ],
        }
    }

    pub fn sensible_heat_flux() -> Self {
        Self {
            kind: SchemeKind::MinimumDescending,
            bands: vec![
                Band::above(200.0, CAT5, ">200 W/m² (Extreme)"),
                Band::above(150.0, CAT4, "150-200 W/m² (Very High)"),
                Band::above(100.0, CAT3, "100-150 W/m² (High)"),
                Band::above(50.0, CAT2, "50-100 W/m² (Moderate)"),
                Band::above(25.0, CAT1, "25-50 W/m² (Low)"),
                Band::above(10.0, TS, "10-25 W/m² (Very Low)"),
                Band::above(0.0, WEAK, "<10 W/m² (Minimal)"),
            ],
        }
    }

    /// Built-in scheme for a mode.
    pub fn builtin(mode: ClassificationMode) -> Self {
        match mode {
            ClassificationMode::WindSpeed => Self::wind_speed(),
            ClassificationMode::Pressure => Self::pressure(),
            ClassificationMode::LatentHeatFlux => Self::latent_heat_flux(),
            ClassificationMode::SensibleHeatFlux => Self::sensible_heat_flux(),
        }
    }

    /// The band a value falls in. Empty schemes have no band.
    pub fn band_for(&self, value: f64) -> Option<&Band> {
        let last = self.bands.last()?;
        if value.is_nan() {
            return Some(last);
        }
        let hit = match self.kind {
            SchemeKind::MinimumDescending => self.bands.iter().find(|b| b.admits_min(value)),
            SchemeKind::BandedRange => self
                .bands
                .iter()
                .find(|b| b.admits_min(value) && b.admits_max(value)),
        };
        Some(hit.unwrap_or(last))
    }

    /// Color for a value; empty schemes give the default wind fallback color.
    pub fn classify(&self, value: f64) -> &str {
        self.band_for(value).map(|b| b.color.as_str()).unwrap_or(WEAK)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bands.is_empty() {
            return Err("Scheme must have at least 1 band".to_string());
        }
        for (i, band) in self.bands.iter().enumerate() {
            if !band.color.starts_with('#') {
                return Err(format!("Band {} color '{}' is not a hex color", i, band.color));
            }
            if let (Some(min), Some(max)) = (band.min, band.max) {
                // A band starting at +inf is legend-only.
                if min.is_finite() && min >= max {
                    return Err(format!("Band {} has min {} >= max {}", i, min, max));
                }
            }
        }
        if self.kind == SchemeKind::MinimumDescending {
            let mins: Vec<f64> = self.bands.iter().filter_map(|b| b.min).collect();
            if mins.windows(2).any(|w| w[0] < w[1]) {
                return Err("Minimum thresholds must be in descending order".to_string());
            }
        }
        Ok(())
    }
}

/// Classify a value with a scheme.
pub fn classify(value: f64, scheme: &ColorScheme) -> &str {
    scheme.classify(value)
}

/// Override file layout, e.g. `config/schemes.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemeFile {
    #[serde(default = "default_version")]
    version: String,
    schemes: HashMap<String, ColorScheme>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// The active scheme for every mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSchemeSet {
    schemes: HashMap<ClassificationMode, ColorScheme>,
}

impl Default for ColorSchemeSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ColorSchemeSet {
    pub fn builtin() -> Self {
        Self {
            schemes: ClassificationMode::ALL
                .into_iter()
                .map(|m| (m, ColorScheme::builtin(m)))
                .collect(),
        }
    }

    /// Load overrides from a JSON file; modes it omits keep the built-ins.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SchemeError::IoError(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, SchemeError> {
        let file: SchemeFile =
            serde_json::from_str(json).map_err(|e| SchemeError::ParseError(e.to_string()))?;
        let mut set = Self::builtin();
        for (name, scheme) in file.schemes {
            let mode: ClassificationMode = name.parse()?;
            scheme
                .validate()
                .map_err(|e| SchemeError::ValidationError(format!("{}: {}", name, e)))?;
            tracing::debug!(mode = %mode, bands = scheme.bands.len(), "Overriding color scheme");
            set.schemes.insert(mode, scheme);
        }
        Ok(set)
    }

    pub fn get(&self, mode: ClassificationMode) -> &ColorScheme {
        // Every mode is inserted by builtin()
        &self.schemes[&mode]
    }

    pub fn classify(&self, mode: ClassificationMode, value: f64) -> &str {
        self.get(mode).classify(value)
    }
}

/// Scheme-related errors.
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("Unknown classification mode: {0}")]
    UnknownMode(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
