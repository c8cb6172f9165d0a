//! Bounding box and map position types.

use serde::{Deserialize, Serialize};

/// A geographic position in degrees, as the map library expects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a map position from a recon record, where longitude is stored
    /// as a western-hemisphere magnitude.
    pub fn from_recon(lat: f64, lon_magnitude: f64) -> Self {
        Self {
            lat,
            lon: -lon_magnitude.abs(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A geographic bounding box in degrees (x = longitude, y = latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every finite position, or None when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LatLon>) -> Option<Self> {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<BoundingBox>, p| match acc {
                None => Some(BoundingBox::new(p.lon, p.lat, p.lon, p.lat)),
                Some(b) => Some(b.extend(p)),
            })
    }

    /// Grow the box to include a position.
    pub fn extend(self, p: &LatLon) -> Self {
        Self {
            min_x: self.min_x.min(p.lon),
            min_y: self.min_y.min(p.lat),
            max_x: self.max_x.max(p.lon),
            max_y: self.max_y.max(p.lat),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Centroid of the box.
    pub fn center(&self) -> LatLon {
        LatLon {
            lat: (self.min_y + self.max_y) / 2.0,
            lon: (self.min_x + self.max_x) / 2.0,
        }
    }
}
