//! Image asset references.
//!
//! Plots are pre-rendered static files laid out as
//! `static/images/<category>/<StormName><Year>/<MissionId><ObservationId>_<suffix>.png`
//! for observations and
//! `static/images/mission/<StormName><Year>/<MissionId>_<suffix>.png` for missions.

use serde::Serialize;

use recon_common::{BasicInfo, FieldValue, MissionEntry, NOT_AVAILABLE};

/// Root of the image tree, relative to the site root.
pub const IMAGE_ROOT: &str = "static/images";

/// Identifiers that name an observation's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservationKey {
    /// Storm name, capitalized
    pub storm: String,
    pub year: String,
    pub mission_id: String,
    pub observation_id: String,
}

fn text_or_na(v: &Option<FieldValue>) -> String {
    v.as_ref()
        .map(|f| f.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl ObservationKey {
    pub fn from_basic_info(info: &BasicInfo) -> Self {
        Self {
            storm: info
                .storm_name_normalized()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            year: text_or_na(&info.year),
            mission_id: text_or_na(&info.mission_id),
            observation_id: text_or_na(&info.observation_id),
        }
    }

    /// File name offered when saving the observation as JSON.
    pub fn json_download_name(&self) -> String {
        format!(
            "{}{}_{}_{}.json",
            self.storm, self.year, self.mission_id, self.observation_id
        )
    }
}

/// Per-observation plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationImage {
    SkewT,
    Winds,
    Hodograph,
    Shear,
    Theta,
    MoistureFlux,
    WindCorrection,
}

impl ObservationImage {
    pub const ALL: [ObservationImage; 7] = [
        ObservationImage::SkewT,
        ObservationImage::Winds,
        ObservationImage::Hodograph,
        ObservationImage::Shear,
        ObservationImage::Theta,
        ObservationImage::MoistureFlux,
        ObservationImage::WindCorrection,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            ObservationImage::SkewT => "skewt",
            ObservationImage::Winds => "winds",
            ObservationImage::Hodograph => "hodograph",
            ObservationImage::Shear => "shear",
            ObservationImage::Theta => "theta",
            ObservationImage::MoistureFlux => "mflux",
            ObservationImage::WindCorrection => "wind_profile",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ObservationImage::WindCorrection => "wind_correction",
            _ => "dropsonde",
        }
    }

    pub fn alt(&self) -> &'static str {
        match self {
            ObservationImage::SkewT => "Skew-T Diagram",
            ObservationImage::Winds => "Wind Profile",
            ObservationImage::Hodograph => "Hodograph",
            ObservationImage::Shear => "Shear Profile",
            ObservationImage::Theta => "Thermodynamics",
            ObservationImage::MoistureFlux => "Moisture Flux",
            ObservationImage::WindCorrection => "10 m Wind Correction",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            ObservationImage::SkewT => "Skew-T",
            ObservationImage::Theta => "Theta",
            ObservationImage::WindCorrection => "10 m Wind",
            other => other.alt(),
        }
    }

    pub fn reference(&self, key: &ObservationKey) -> ImageRef {
        ImageRef {
            src: format!(
                "{}/{}/{}{}/{}{}_{}.png",
                IMAGE_ROOT,
                self.category(),
                key.storm,
                key.year,
                key.mission_id,
                key.observation_id,
                self.suffix()
            ),
            alt: self.alt().to_string(),
            header: self.header().to_string(),
            download_name: format!(
                "{}{}_{}{}_{}.png",
                key.storm,
                key.year,
                key.mission_id,
                key.observation_id,
                self.suffix()
            ),
        }
    }

    /// Every plot of an observation, in carousel order.
    pub fn all_references(key: &ObservationKey) -> Vec<ImageRef> {
        Self::ALL.iter().map(|i| i.reference(key)).collect()
    }
}

/// Identifiers that name a mission's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionKey {
    pub storm: String,
    pub year: String,
    pub mission_id: String,
}

impl MissionKey {
    /// None when the mission has no number, as there is nothing to show.
    pub fn new(storm: &str, mission: &MissionEntry) -> Option<Self> {
        let mission_id = mission.mission_number.as_ref()?.to_string();
        if storm.is_empty() {
            return None;
        }
        Some(Self {
            storm: storm.to_string(),
            year: mission.year().unwrap_or(NOT_AVAILABLE).to_string(),
            mission_id,
        })
    }
}

/// Mission-wide plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionImage {
    Wind3d,
    Temperature3d,
    PressureGradient,
    MoistureGradient,
}

impl MissionImage {
    pub const ALL: [MissionImage; 4] = [
        MissionImage::Wind3d,
        MissionImage::Temperature3d,
        MissionImage::PressureGradient,
        MissionImage::MoistureGradient,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            MissionImage::Wind3d => "3dwind_lhf",
            MissionImage::Temperature3d => "3dtemp",
            MissionImage::PressureGradient => "ugradP",
            MissionImage::MoistureGradient => "ugradQL",
        }
    }

    pub fn alt(&self) -> &'static str {
        match self {
            MissionImage::Wind3d => "3D Wind LHF",
            MissionImage::Temperature3d => "3D Temperature",
            MissionImage::PressureGradient => "Pressure Gradient",
            MissionImage::MoistureGradient => "Moisture Gradient",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            MissionImage::Wind3d => "3D Wind",
            MissionImage::Temperature3d => "3D Temp",
            MissionImage::PressureGradient => "Pressure",
            MissionImage::MoistureGradient => "Moisture",
        }
    }

    pub fn reference(&self, key: &MissionKey) -> ImageRef {
        ImageRef {
            src: format!(
                "{}/mission/{}{}/{}_{}.png",
                IMAGE_ROOT,
                key.storm,
                key.year,
                key.mission_id,
                self.suffix()
            ),
            alt: self.alt().to_string(),
            header: self.header().to_string(),
            download_name: format!(
                "{}{}_{}_{}.png",
                key.storm,
                key.year,
                key.mission_id,
                self.suffix()
            ),
        }
    }

    pub fn all_references(key: &MissionKey) -> Vec<ImageRef> {
        Self::ALL.iter().map(|i| i.reference(key)).collect()
    }
}

/// A displayable image and the name it is saved under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
    pub header: String,
    pub download_name: String,
}
