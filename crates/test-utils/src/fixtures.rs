//! Common test fixtures for recon map tests.
//!
//! Pre-defined observation records and catalogs that mirror the shape of the
//! JSON files produced by the dropsonde processing pipeline.

use serde_json::{json, Value};

/// A complete dropsonde observation with every section populated.
pub const FULL_OBSERVATION: &str = r#"{
    "basic_info": {
        "storm_name": "ALBERTO",
        "storm_type": "Tropical Storm",
        "year": 2024,
        "month": "06",
        "day": "19",
        "time": "1815",
        "mission_id": "01",
        "observation_id": "07",
        "plane_id": "N42RF",
        "lat": 22.35,
        "lon": 94.12,
        "sst_value": 29.4
    },
    "levels": [
        {"pressure": 1002, "height": 0, "temperature": 27.8, "dewpoint": 24.1, "wind_dir": 95, "wind_spd": 45},
        {"pressure": 1000, "height": 18, "temperature": 27.4, "dewpoint": 23.9, "wind_dir": 100, "wind_spd": 52},
        {"pressure": 925, "height": 782, "temperature": 22.0, "dewpoint": null, "wind_dir": 110, "wind_spd": 61}
    ],
    "temp_levels": [
        {"pressure": 850, "temperature": 18.2, "dewpoint": 15.0}
    ],
    "wind_levels": [
        {"pressure": 1002, "wind_dir": 95, "wind_spd": 45},
        {"pressure": 990, "wind_dir": 98, "wind_spd": 50}
    ],
    "calculations": {
        "latent_heat_flux": 312.456,
        "sensible_heat_flux": 18.9,
        "ce": 0.00123,
        "cd": 0.0015,
        "u10": 23.15,
        "bowen_ratio": 0.0605,
        "shear_0_3km": null,
        "custom_index": 4.2
    },
    "processing_notes": "QC passed"
}"#;

/// Observation JSON with the most common fields, built from parameters.
pub fn observation_json(
    storm: &str,
    mission: &str,
    obs: &str,
    lat: f64,
    lon: f64,
    wind_kt: i64,
    pressure: f64,
) -> Value {
    json!({
        "basic_info": {
            "storm_name": storm,
            "storm_type": "Hurricane",
            "year": 2024,
            "month": "07",
            "day": "01",
            "time": "1200",
            "mission_id": mission,
            "observation_id": obs,
            "plane_id": "N43RF",
            "lat": lat,
            "lon": lon,
            "sst_value": 29.0
        },
        "levels": [
            {"pressure": pressure, "height": 10, "temperature": 27.0, "dewpoint": 24.0, "wind_dir": 180, "wind_spd": wind_kt}
        ],
        "temp_levels": [],
        "wind_levels": [],
        "calculations": {"latent_heat_flux": 150.0, "sensible_heat_flux": 12.0}
    })
}

/// A two-storm catalog; the second storm has no missions.
pub fn catalog_json() -> Value {
    json!([
        {
            "storm_name": "Alberto",
            "array_of_missions": [
                {
                    "filename": "AL012024_01.json",
                    "mission_number": "01",
                    "number_of_observations": 3,
                    "start_time": "2024-06-19T1130",
                    "end_time": "2024-06-19T1845",
                    "plane_id": "N42RF",
                    "central_coordinates": {"latitude": 22.5, "longitude": 94.1}
                },
                {
                    "filename": "AL012024_02.json",
                    "mission_number": "02",
                    "number_of_observations": 2,
                    "start_time": "2024-06-20T0300",
                    "end_time": "2024-06-20T0915",
                    "plane_id": "N43RF",
                    "central_coordinates": {"latitude": 23.0, "longitude": 96.4}
                }
            ]
        },
        {"storm_name": "Beryl", "array_of_missions": []}
    ])
}
