//! Tracking configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LocMapError, Result};
use crate::location::{LocationRequest, Priority};
use crate::permissions::RequestCode;

/// Controller configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Base update interval (ms)
    pub interval_ms: u64,

    /// Fastest accepted update interval (ms)
    pub fastest_interval_ms: u64,

    /// Requested accuracy
    pub priority: Priority,

    /// Camera zoom used when centering on a fix
    pub zoom: f32,

    /// Marker title for fixes from the update stream
    pub tracking_title: String,

    /// Marker title for the last-known fix
    pub last_known_title: String,

    /// Correlation id sent with permission requests
    pub request_code: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            fastest_interval_ms: 2000,
            priority: Priority::HighAccuracy,
            zoom: 15.0,
            tracking_title: "current location".to_string(),
            last_known_title: "you are here".to_string(),
            request_code: RequestCode::LOCATION.0,
        }
    }
}

impl TrackingConfig {
    pub const MIN_ZOOM: f32 = 2.0;
    pub const MAX_ZOOM: f32 = 21.0;

    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(LocMapError::InvalidConfig("interval_ms must be positive".into()));
        }
        if self.fastest_interval_ms > self.interval_ms {
            return Err(LocMapError::InvalidConfig(format!(
                "fastest_interval_ms ({}) exceeds interval_ms ({})",
                self.fastest_interval_ms, self.interval_ms
            )));
        }
        if !(Self::MIN_ZOOM..=Self::MAX_ZOOM).contains(&self.zoom) {
            return Err(LocMapError::InvalidConfig(format!(
                "zoom {} outside {}..={}",
                self.zoom,
                Self::MIN_ZOOM,
                Self::MAX_ZOOM
            )));
        }
        Ok(())
    }

    /// Update subscription parameters derived from this config
    pub fn location_request(&self) -> LocationRequest {
        LocationRequest::new()
            .with_interval(Duration::from_millis(self.interval_ms))
            .with_fastest_interval(Duration::from_millis(self.fastest_interval_ms))
            .with_priority(self.priority)
    }

    pub fn request_code(&self) -> RequestCode {
        RequestCode(self.request_code)
    }
}
