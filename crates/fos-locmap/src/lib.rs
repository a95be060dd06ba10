//! fOS Location Map
//!
//! Keeps a single "current location" marker on a map, following the device
//! position reported by a location source once location permissions are granted.
//!
//! The platform is reached only through three capability traits:
//! - [`PermissionGateway`] - checks and requests location permissions
//! - [`MapRenderer`] / [`MapHandle`] - loads the map, places markers, moves the camera
//! - [`LocationSource`] - update subscriptions and last-known location
//!
//! [`LocationMapController`] is an explicit state machine over those traits.
//! Every platform callback is a method on the controller (or a [`PlatformEvent`]
//! passed to [`LocationMapController::handle`]), so the whole flow can be driven
//! without a live platform.
//!
//! # Example
//! ```rust,ignore
//! use fos_locmap::{LocationMapController, TrackingConfig};
//! use fos_locmap::sim::{SimLocationSource, SimPermissions, SimRenderer};
//!
//! let mut controller = LocationMapController::new(
//!     SimPermissions::granted(),
//!     SimRenderer::new(),
//!     SimLocationSource::new(),
//!     TrackingConfig::default(),
//! );
//! controller.start()?;
//! ```

mod config;
mod controller;
mod coordinate;
mod error;
mod event;
mod location;
mod permissions;
mod renderer;

#[cfg(feature = "sim")]
pub mod sim;

pub use config::TrackingConfig;
pub use controller::{ControllerState, LastLocationOutcome, LocationMapController};
pub use coordinate::{Coordinate, Fix};
pub use error::{LocMapError, Result};
pub use event::PlatformEvent;
pub use location::{LocationRequest, LocationResult, LocationSource, Priority, SubscriptionId};
pub use permissions::{Capability, PermissionGateway, PermissionState, RequestCode};
pub use renderer::{CameraUpdate, MapHandle, MapRenderer, MarkerId, MarkerOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
