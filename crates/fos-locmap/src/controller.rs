//! Location map controller
//!
//! Explicit state machine:
//!
//! ```text
//! Uninitialized -> AwaitingPermission -> MapLoading -> MapReady -> Tracking
//!                         |      ^                        ^          |
//!                         v      | retry                  +----------+ stop
//!                   PermissionDenied
//! ```
//!
//! Every state can move to `Disposed`, which releases the update subscription.

use crate::config::TrackingConfig;
use crate::coordinate::{Coordinate, Fix};
use crate::error::{LocMapError, Result};
use crate::event::PlatformEvent;
use crate::location::{LocationSource, SubscriptionId};
use crate::permissions::{Capability, PermissionGateway, PermissionState, RequestCode};
use crate::renderer::{CameraUpdate, MapHandle, MapRenderer, MarkerId, MarkerOptions};

/// Controller lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    AwaitingPermission,
    /// The permission request was answered with at least one denial
    PermissionDenied,
    MapLoading,
    MapReady,
    Tracking,
    Disposed,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::AwaitingPermission => "awaiting-permission",
            Self::PermissionDenied => "permission-denied",
            Self::MapLoading => "map-loading",
            Self::MapReady => "map-ready",
            Self::Tracking => "tracking",
            Self::Disposed => "disposed",
        }
    }
}

impl std::fmt::Display for ControllerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a last-known location answer led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastLocationOutcome {
    /// A cached fix was shown
    MarkerPlaced(MarkerId),
    /// No cached fix; continuous updates are running on this subscription
    TrackingStarted(SubscriptionId),
}

/// Keeps one "current location" marker in sync with the location source
pub struct LocationMapController<G, R, S>
where
    G: PermissionGateway,
    R: MapRenderer,
    S: LocationSource,
{
    gateway: G,
    renderer: R,
    source: S,
    config: TrackingConfig,
    state: ControllerState,
    map: Option<R::Map>,
    /// At most one marker exists at a time
    current_marker: Option<MarkerId>,
    subscription: Option<SubscriptionId>,
    pending_request: Option<RequestCode>,
    map_requested: bool,
}

impl<G, R, S> LocationMapController<G, R, S>
where
    G: PermissionGateway,
    R: MapRenderer,
    S: LocationSource,
{
    /// Create a controller. Nothing talks to the platform until [`start`](Self::start).
    pub fn new(gateway: G, renderer: R, source: S, config: TrackingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            gateway,
            renderer,
            source,
            config,
            state: ControllerState::Uninitialized,
            map: None,
            current_marker: None,
            subscription: None,
            pending_request: None,
            map_requested: false,
        })
    }

    // ------------------------------------------------------------------
    // Startup and permissions
    // ------------------------------------------------------------------

    /// Check permissions; load the map if both are granted, otherwise ask for them.
    pub fn start(&mut self) -> Result<ControllerState> {
        self.ensure_live()?;
        if self.state != ControllerState::Uninitialized {
            tracing::debug!("start ignored in state {}", self.state);
            return Ok(self.state);
        }
        self.transition(ControllerState::AwaitingPermission);
        self.check_location_permission();
        Ok(self.state)
    }

    /// Ask again after a denial
    pub fn retry_permissions(&mut self) -> Result<ControllerState> {
        self.ensure_live()?;
        match self.state {
            ControllerState::PermissionDenied | ControllerState::AwaitingPermission => {
                self.transition(ControllerState::AwaitingPermission);
                self.check_location_permission();
            }
            state => tracing::debug!("retry_permissions ignored in state {}", state),
        }
        Ok(self.state)
    }

    /// Request both location capabilities. The answer arrives through
    /// [`on_permission_result`](Self::on_permission_result).
    pub fn request_permissions(&mut self) -> Result<()> {
        self.ensure_live()?;
        let code = self.config.request_code();
        tracing::info!("Requesting location permissions (code {})", code.0);
        self.gateway.request(&Capability::ALL, code);
        self.pending_request = Some(code);
        Ok(())
    }

    /// Permission request answered. `granted` is ordered like [`Capability::ALL`].
    pub fn on_permission_result(&mut self, code: RequestCode, granted: &[bool]) -> Result<()> {
        self.ensure_live()?;
        if self.pending_request != Some(code) {
            tracing::debug!("Ignoring permission result for unknown request {}", code.0);
            return Ok(());
        }
        self.pending_request = None;

        if PermissionState::from_grants(granted).all() {
            self.load_map();
            Ok(())
        } else {
            tracing::warn!("Location permission denied: {:?}", granted);
            self.transition(ControllerState::PermissionDenied);
            Err(LocMapError::PermissionDenied)
        }
    }

    fn check_location_permission(&mut self) {
        if self.permissions().all() {
            self.load_map();
        } else if let Err(err) = self.request_permissions() {
            tracing::debug!("Permission request skipped: {}", err);
        }
    }

    fn load_map(&mut self) {
        if self.map_requested {
            tracing::debug!("Map already requested");
            return;
        }
        self.map_requested = true;
        self.renderer.load();
        self.transition(ControllerState::MapLoading);
    }

    // ------------------------------------------------------------------
    // Map and tracking
    // ------------------------------------------------------------------

    /// Renderer finished loading. Enables the overlay and starts tracking when
    /// at least one capability is granted.
    pub fn on_map_ready(&mut self, map: R::Map) -> Result<()> {
        self.ensure_live()?;
        if self.map.replace(map).is_some() {
            // The old marker belonged to the previous map
            self.current_marker = None;
        }
        self.transition(ControllerState::MapReady);

        if self.permissions().any() {
            if let Some(map) = self.map.as_mut() {
                map.set_my_location_enabled(true);
            }
        }

        self.start_tracking().map(|_| ())
    }

    /// Subscribe to location updates, reusing an active subscription.
    pub fn start_tracking(&mut self) -> Result<SubscriptionId> {
        self.ensure_live()?;
        if !self.permissions().any() {
            tracing::debug!("Not tracking: no location permission");
            return Err(LocMapError::PermissionDenied);
        }
        let subscription = match self.subscription {
            Some(subscription) => {
                tracing::debug!("Reusing subscription {}", subscription.0);
                subscription
            }
            None => {
                let request = self.config.location_request();
                let subscription = self.source.request_updates(&request);
                tracing::info!(
                    "Location updates started (subscription {}, every {:?}, fastest {:?}, {:?})",
                    subscription.0,
                    request.interval,
                    request.fastest_interval,
                    request.priority
                );
                self.subscription = Some(subscription);
                subscription
            }
        };
        if self.map.is_some() {
            self.transition(ControllerState::Tracking);
        }
        Ok(subscription)
    }

    /// Release the update subscription, if any.
    pub fn stop_tracking(&mut self) -> Option<SubscriptionId> {
        let subscription = self.subscription.take()?;
        self.source.remove_updates(subscription);
        tracing::info!("Location updates stopped (subscription {})", subscription.0);
        if self.state == ControllerState::Tracking {
            self.transition(ControllerState::MapReady);
        }
        Some(subscription)
    }

    /// Batch from an update subscription. Only the last fix is applied.
    /// Returns the new marker, or `None` when the batch was ignored.
    pub fn on_location_update(&mut self, subscription: SubscriptionId, fixes: &[Fix]) -> Option<MarkerId> {
        if self.state == ControllerState::Disposed || self.subscription != Some(subscription) {
            tracing::debug!("Ignoring update from inactive subscription {}", subscription.0);
            return None;
        }
        let Some(fix) = fixes.last() else {
            tracing::debug!("Ignoring empty update batch");
            return None;
        };

        let title = self.config.tracking_title.clone();
        match self.place_marker(fix.coordinate, title) {
            Ok(marker) => Some(marker),
            Err(err) => {
                tracing::debug!("Update dropped: {}", err);
                None
            }
        }
    }

    /// One-shot query for the last known fix. The answer arrives through
    /// [`on_last_location`](Self::on_last_location).
    pub fn get_current_location(&mut self) -> Result<()> {
        self.ensure_live()?;
        if !self.permissions().any() {
            return Err(LocMapError::PermissionDenied);
        }
        self.source.request_last_location();
        Ok(())
    }

    /// Last-known location answered. A present fix is shown; an absent one
    /// falls back to continuous updates.
    pub fn on_last_location(&mut self, fix: Option<Fix>) -> Result<LastLocationOutcome> {
        self.ensure_live()?;
        match fix {
            Some(fix) => {
                let title = self.config.last_known_title.clone();
                let marker = self.place_marker(fix.coordinate, title)?;
                Ok(LastLocationOutcome::MarkerPlaced(marker))
            }
            None => {
                tracing::debug!("No cached location, falling back to updates");
                let subscription = self.start_tracking()?;
                Ok(LastLocationOutcome::TrackingStarted(subscription))
            }
        }
    }

    /// Dispatch a platform callback
    pub fn handle(&mut self, event: PlatformEvent<R::Map>) -> Result<()> {
        tracing::trace!("Handling {}", event.kind());
        match event {
            PlatformEvent::PermissionResult { code, granted } => {
                self.on_permission_result(code, &granted)
            }
            PlatformEvent::MapReady(map) => self.on_map_ready(map),
            PlatformEvent::LocationUpdate { subscription, result } => {
                self.on_location_update(subscription, &result.locations);
                Ok(())
            }
            PlatformEvent::LastLocation(fix) => self.on_last_location(fix).map(|_| ()),
        }
    }

    /// Release the subscription and the map. Runs on drop as well.
    pub fn dispose(&mut self) {
        if self.state == ControllerState::Disposed {
            return;
        }
        self.stop_tracking();
        self.pending_request = None;
        self.current_marker = None;
        self.map = None;
        self.transition(ControllerState::Disposed);
    }

    fn place_marker(&mut self, position: Coordinate, title: String) -> Result<MarkerId> {
        let map = self.map.as_mut().ok_or(LocMapError::MapNotReady)?;
        if let Some(previous) = self.current_marker.take() {
            map.remove_marker(previous);
        }
        let marker = map.add_marker(MarkerOptions::new(position).with_title(title));
        map.move_camera(CameraUpdate::new_lat_lng_zoom(position, self.config.zoom));
        self.current_marker = Some(marker);
        tracing::debug!("Marker {} at {}", marker.0, position);
        Ok(marker)
    }

    fn transition(&mut self, next: ControllerState) {
        if self.state != next {
            tracing::info!("State {} -> {}", self.state, next);
            self.state = next;
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state == ControllerState::Disposed {
            Err(LocMapError::Disposed)
        } else {
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Current grants, read from the gateway
    pub fn permissions(&self) -> PermissionState {
        PermissionState::query(&self.gateway)
    }

    pub fn current_marker(&self) -> Option<MarkerId> {
        self.current_marker
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn map(&self) -> Option<&R::Map> {
        self.map.as_ref()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<G, R, S> Drop for LocationMapController<G, R, S>
where
    G: PermissionGateway,
    R: MapRenderer,
    S: LocationSource,
{
    fn drop(&mut self) {
        self.dispose();
    }
}
