//! Location source
//!
//! Update subscriptions and one-shot last-known location queries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coordinate::Fix;

/// Accuracy/power trade-off requested from the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[default]
    HighAccuracy,
    BalancedPowerAccuracy,
    LowPower,
    Passive,
}

/// Update subscription parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    /// Desired cadence of updates
    pub interval: Duration,
    /// Updates are never delivered faster than this
    pub fastest_interval: Duration,
    pub priority: Priority,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
            fastest_interval: Duration::from_millis(2000),
            priority: Priority::HighAccuracy,
        }
    }
}

impl LocationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_fastest_interval(mut self, fastest_interval: Duration) -> Self {
        self.fastest_interval = fastest_interval;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Handle of an active update registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Ordered batch of fixes delivered by one update callback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationResult {
    pub locations: Vec<Fix>,
}

impl LocationResult {
    pub fn new(locations: Vec<Fix>) -> Self {
        Self { locations }
    }

    /// Most recent fix of the batch
    pub fn last_location(&self) -> Option<&Fix> {
        self.locations.last()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl From<Vec<Fix>> for LocationResult {
    fn from(locations: Vec<Fix>) -> Self {
        Self::new(locations)
    }
}

/// Platform facility that emits position fixes
pub trait LocationSource {
    /// Register for periodic updates. Batches arrive through
    /// `LocationMapController::on_location_update` until the subscription is removed.
    fn request_updates(&mut self, request: &LocationRequest) -> SubscriptionId;

    /// Release a registration. Unknown ids are ignored.
    fn remove_updates(&mut self, subscription: SubscriptionId);

    /// Ask for the cached last-known fix. The answer, possibly absent, arrives
    /// through `LocationMapController::on_last_location`.
    fn request_last_location(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let req = LocationRequest::new();
        assert_eq!(req.interval, Duration::from_millis(5000));
        assert_eq!(req.fastest_interval, Duration::from_millis(2000));
        assert_eq!(req.priority, Priority::HighAccuracy);
    }

    #[test]
    fn test_request_builder() {
        let req = LocationRequest::new()
            .with_interval(Duration::from_secs(10))
            .with_fastest_interval(Duration::from_secs(1))
            .with_priority(Priority::LowPower);
        assert_eq!(req.interval, Duration::from_secs(10));
        assert_eq!(req.fastest_interval, Duration::from_secs(1));
        assert_eq!(req.priority, Priority::LowPower);
    }

    #[test]
    fn test_last_location_is_latest() {
        let result = LocationResult::from(vec![Fix::at(1.0, 1.0), Fix::at(2.0, 2.0)]);
        assert_eq!(result.last_location(), Some(&Fix::at(2.0, 2.0)));
        assert!(LocationResult::default().last_location().is_none());
    }
}
