//! Common types and utilities shared across the storm recon map crates.

pub mod bbox;
pub mod catalog;
pub mod error;
pub mod observation;
pub mod time;
pub mod units;

pub use bbox::{BoundingBox, LatLon};
pub use catalog::{CentralCoordinates, MissionEntry, StormCatalog, StormEntry};
pub use error::{ReconError, ReconResult};
pub use observation::{
    BasicInfo, FieldValue, Level, Observation, ObservationSet, TempLevel, WindLevel,
};
pub use time::{format_mission_timestamp, ObservationTime};
pub use units::{knots_to_mph, KNOTS_TO_MPH};

/// Display token used wherever a value is absent.
pub const NOT_AVAILABLE: &str = "N/A";
