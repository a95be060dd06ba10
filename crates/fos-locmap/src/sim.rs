//! Simulated platform services
//!
//! Recording, synchronous implementations of the capability traits. Clones
//! share state, so a caller can keep a handle for inspection while the
//! controller owns another.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::coordinate::{Coordinate, Fix};
use crate::location::{LocationRequest, LocationSource, SubscriptionId};
use crate::permissions::{Capability, PermissionGateway, RequestCode};
use crate::renderer::{CameraUpdate, MapHandle, MapRenderer, MarkerId, MarkerOptions};

// ============================================================================
// PERMISSIONS
// ============================================================================

#[derive(Debug, Default)]
struct PermissionLog {
    fine: bool,
    coarse: bool,
    requests: Vec<(Vec<Capability>, RequestCode)>,
}

/// Permission gateway with settable grants
#[derive(Debug, Clone, Default)]
pub struct SimPermissions {
    inner: Rc<RefCell<PermissionLog>>,
}

impl SimPermissions {
    pub fn new(fine: bool, coarse: bool) -> Self {
        let perms = Self::default();
        perms.set(fine, coarse);
        perms
    }

    pub fn granted() -> Self {
        Self::new(true, true)
    }

    pub fn denied() -> Self {
        Self::new(false, false)
    }

    /// Change grants, as if the user answered a dialog or edited settings
    pub fn set(&self, fine: bool, coarse: bool) {
        let mut log = self.inner.borrow_mut();
        log.fine = fine;
        log.coarse = coarse;
    }

    /// Requests received, oldest first
    pub fn requests(&self) -> Vec<(Vec<Capability>, RequestCode)> {
        self.inner.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests.len()
    }
}

impl PermissionGateway for SimPermissions {
    fn check(&self, capability: Capability) -> bool {
        let log = self.inner.borrow();
        match capability {
            Capability::FineLocation => log.fine,
            Capability::CoarseLocation => log.coarse,
        }
    }

    fn request(&mut self, capabilities: &[Capability], code: RequestCode) {
        self.inner.borrow_mut().requests.push((capabilities.to_vec(), code));
    }
}

// ============================================================================
// MAP
// ============================================================================

/// Command received by a [`SimMap`]
#[derive(Debug, Clone, PartialEq)]
pub enum MapOp {
    SetMyLocationEnabled(bool),
    AddMarker(MarkerId, Coordinate),
    RemoveMarker(MarkerId),
    MoveCamera(CameraUpdate),
}

#[derive(Debug, Default)]
struct MapLog {
    next_marker: u64,
    markers: BTreeMap<MarkerId, MarkerOptions>,
    my_location_enabled: bool,
    camera: Option<CameraUpdate>,
    ops: Vec<MapOp>,
}

/// In-memory map that records every command
#[derive(Debug, Clone, Default)]
pub struct SimMap {
    inner: Rc<RefCell<MapLog>>,
}

impl SimMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently on the map
    pub fn markers(&self) -> Vec<(MarkerId, MarkerOptions)> {
        self.inner
            .borrow()
            .markers
            .iter()
            .map(|(id, options)| (*id, options.clone()))
            .collect()
    }

    pub fn marker_count(&self) -> usize {
        self.inner.borrow().markers.len()
    }

    pub fn my_location_enabled(&self) -> bool {
        self.inner.borrow().my_location_enabled
    }

    /// Last camera move
    pub fn camera(&self) -> Option<CameraUpdate> {
        self.inner.borrow().camera
    }

    /// Commands received, oldest first
    pub fn ops(&self) -> Vec<MapOp> {
        self.inner.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.inner.borrow_mut().ops.clear();
    }
}

impl MapHandle for SimMap {
    fn set_my_location_enabled(&mut self, enabled: bool) {
        let mut log = self.inner.borrow_mut();
        log.my_location_enabled = enabled;
        log.ops.push(MapOp::SetMyLocationEnabled(enabled));
    }

    fn add_marker(&mut self, options: MarkerOptions) -> MarkerId {
        let mut log = self.inner.borrow_mut();
        log.next_marker += 1;
        let id = MarkerId(log.next_marker);
        log.ops.push(MapOp::AddMarker(id, options.position));
        log.markers.insert(id, options);
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        let mut log = self.inner.borrow_mut();
        log.markers.remove(&marker);
        log.ops.push(MapOp::RemoveMarker(marker));
    }

    fn move_camera(&mut self, update: CameraUpdate) {
        let mut log = self.inner.borrow_mut();
        log.camera = Some(update);
        log.ops.push(MapOp::MoveCamera(update));
    }
}

/// Renderer that only counts load requests; deliver the map yourself
/// through `on_map_ready`.
#[derive(Debug, Clone, Default)]
pub struct SimRenderer {
    loads: Rc<RefCell<usize>>,
}

impl SimRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_count(&self) -> usize {
        *self.loads.borrow()
    }
}

impl MapRenderer for SimRenderer {
    type Map = SimMap;

    fn load(&mut self) {
        *self.loads.borrow_mut() += 1;
    }
}

// ============================================================================
// LOCATION
// ============================================================================

#[derive(Debug, Default)]
struct SourceLog {
    next_subscription: u64,
    active: BTreeMap<SubscriptionId, LocationRequest>,
    requests: Vec<LocationRequest>,
    removed: Vec<SubscriptionId>,
    last_known: Option<Fix>,
    last_location_queries: usize,
}

/// Location source that records subscriptions and queries
#[derive(Debug, Clone, Default)]
pub struct SimLocationSource {
    inner: Rc<RefCell<SourceLog>>,
}

impl SimLocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source with a cached last-known fix
    pub fn with_last_known(fix: Fix) -> Self {
        let source = Self::default();
        source.set_last_known(Some(fix));
        source
    }

    pub fn set_last_known(&self, fix: Option<Fix>) {
        self.inner.borrow_mut().last_known = fix;
    }

    /// Answer the platform would give to a last-location query
    pub fn last_known(&self) -> Option<Fix> {
        self.inner.borrow().last_known
    }

    pub fn active_subscriptions(&self) -> Vec<SubscriptionId> {
        self.inner.borrow().active.keys().copied().collect()
    }

    /// Every update request received, oldest first
    pub fn requests(&self) -> Vec<LocationRequest> {
        self.inner.borrow().requests.clone()
    }

    pub fn removed(&self) -> Vec<SubscriptionId> {
        self.inner.borrow().removed.clone()
    }

    pub fn last_location_queries(&self) -> usize {
        self.inner.borrow().last_location_queries
    }
}

impl LocationSource for SimLocationSource {
    fn request_updates(&mut self, request: &LocationRequest) -> SubscriptionId {
        let mut log = self.inner.borrow_mut();
        log.next_subscription += 1;
        let id = SubscriptionId(log.next_subscription);
        log.active.insert(id, *request);
        log.requests.push(*request);
        id
    }

    fn remove_updates(&mut self, subscription: SubscriptionId) {
        let mut log = self.inner.borrow_mut();
        if log.active.remove(&subscription).is_some() {
            log.removed.push(subscription);
        }
    }

    fn request_last_location(&mut self) {
        self.inner.borrow_mut().last_location_queries += 1;
    }
}
