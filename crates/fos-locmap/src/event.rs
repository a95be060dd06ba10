//! Platform events
//!
//! Asynchronous platform callbacks as values, so one loop can apply them in order.

use crate::coordinate::Fix;
use crate::location::{LocationResult, SubscriptionId};
use crate::permissions::RequestCode;

/// Callback delivered by a platform service
#[derive(Debug)]
pub enum PlatformEvent<M> {
    /// Answer to a permission request
    PermissionResult { code: RequestCode, granted: Vec<bool> },
    /// The renderer finished loading
    MapReady(M),
    /// A batch from an update subscription
    LocationUpdate { subscription: SubscriptionId, result: LocationResult },
    /// Answer to a last-known location query
    LastLocation(Option<Fix>),
}

impl<M> PlatformEvent<M> {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PermissionResult { .. } => "permission-result",
            Self::MapReady(_) => "map-ready",
            Self::LocationUpdate { .. } => "location-update",
            Self::LastLocation(_) => "last-location",
        }
    }
}
