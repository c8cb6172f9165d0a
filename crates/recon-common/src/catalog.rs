//! Storm catalog: the storms and missions the viewer can select.

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, ReconResult};
use crate::observation::FieldValue;

/// Root of `storm_catalog.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StormCatalog {
    pub storms: Vec<StormEntry>,
}

/// One storm and its reconnaissance missions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StormEntry {
    pub storm_name: String,
    #[serde(default)]
    pub array_of_missions: Vec<MissionEntry>,
}

/// One mission file of a storm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionEntry {
    pub filename: String,
    #[serde(default)]
    pub mission_number: Option<FieldValue>,
    #[serde(default)]
    pub number_of_observations: Option<FieldValue>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub plane_id: Option<FieldValue>,
    #[serde(default)]
    pub central_coordinates: Option<CentralCoordinates>,
}

/// Mission centroid. Either coordinate may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentralCoordinates {
    #[serde(default)]
    pub latitude: Option<FieldValue>,
    #[serde(default)]
    pub longitude: Option<FieldValue>,
}

impl CentralCoordinates {
    /// Both coordinates as numbers, when both are present.
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_ref()?.as_f64()?;
        let lon = self.longitude.as_ref()?.as_f64()?;
        Some((lat, lon))
    }
}

impl MissionEntry {
    /// Observation count, when it reads as a number.
    pub fn observation_count(&self) -> Option<i64> {
        self.number_of_observations.as_ref().and_then(FieldValue::as_i64)
    }

    /// Four-digit year taken from the mission start time.
    pub fn year(&self) -> Option<&str> {
        self.start_time
            .as_deref()
            .and_then(|t| t.get(..4))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }
}

impl StormCatalog {
    /// Parse the catalog from a JSON string.
    pub fn from_json(json: &str) -> ReconResult<Self> {
        serde_json::from_str(json).map_err(|e| ReconError::InvalidCatalog(e.to_string()))
    }

    /// Build the catalog from an already-parsed document.
    pub fn from_value(value: serde_json::Value) -> ReconResult<Self> {
        serde_json::from_value(value).map_err(|e| ReconError::InvalidCatalog(e.to_string()))
    }

    pub fn storm(&self, name: &str) -> Option<&StormEntry> {
        self.storms.iter().find(|s| s.storm_name == name)
    }

    pub fn storm_names(&self) -> impl Iterator<Item = &str> {
        self.storms.iter().map(|s| s.storm_name.as_str())
    }
}

impl StormEntry {
    /// Relative path of a mission's observation file.
    pub fn mission_path(&self, mission: &MissionEntry) -> String {
        format!("static/json/{}/{}", self.storm_name, mission.filename)
    }

    /// Find the mission whose observation file path matches.
    pub fn mission_by_path(&self, path: &str) -> Option<&MissionEntry> {
        self.array_of_missions
            .iter()
            .find(|m| self.mission_path(m) == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {
            "storm_name": "Alberto",
            "array_of_missions": [
                {
                    "filename": "20240619U1.json",
                    "mission_number": "01",
                    "number_of_observations": 12,
                    "start_time": "2024-06-19T1130",
                    "end_time": "2024-06-19T1845",
                    "plane_id": "N42RF",
                    "central_coordinates": {"latitude": 22.5, "longitude": 94.1}
                }
            ]
        },
        {"storm_name": "Beryl", "array_of_missions": []}
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = StormCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.storms.len(), 2);
        assert_eq!(catalog.storm_names().collect::<Vec<_>>(), vec!["Alberto", "Beryl"]);

        let alberto = catalog.storm("Alberto").unwrap();
        let mission = &alberto.array_of_missions[0];
        assert_eq!(mission.year(), Some("2024"));
        assert_eq!(
            alberto.mission_path(mission),
            "static/json/Alberto/20240619U1.json"
        );
        assert!(alberto
            .mission_by_path("static/json/Alberto/20240619U1.json")
            .is_some());
    }

    #[test]
    fn test_loose_mission_fields() {
        let catalog = StormCatalog::from_json(
            r#"[{"storm_name": "Chris", "array_of_missions": [
                {"filename": "a.json", "number_of_observations": "12",
                 "central_coordinates": {"latitude": null, "longitude": 95.2}},
                {"filename": "b.json", "central_coordinates": null}
            ]}]"#,
        )
        .unwrap();
        let missions = &catalog.storms[0].array_of_missions;
        assert_eq!(missions[0].observation_count(), Some(12));
        assert_eq!(missions[0].central_coordinates.as_ref().unwrap().lat_lon(), None);
        assert_eq!(missions[1].observation_count(), None);
        assert_eq!(missions[1].central_coordinates, None);
    }

    #[test]
    fn test_invalid_catalog() {
        assert!(matches!(
            StormCatalog::from_json("{}"),
            Err(ReconError::InvalidCatalog(_))
        ));
    }
}
