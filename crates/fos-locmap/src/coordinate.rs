//! Coordinates and position fixes

use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Finite and inside the WGS84 latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A single reported position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub coordinate: Coordinate,
    /// Milliseconds since the Unix epoch, as reported by the source
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl Fix {
    pub const fn new(coordinate: Coordinate, timestamp_ms: u64) -> Self {
        Self { coordinate, timestamp_ms }
    }

    /// Fix at the given latitude/longitude with no timestamp
    pub const fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(Coordinate::new(latitude, longitude), 0)
    }
}
