//! Map renderer
//!
//! The renderer loads asynchronously and hands back a map handle that accepts
//! marker and camera commands.

use crate::coordinate::Coordinate;

/// Opaque marker handle issued by a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Marker placement request
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    pub position: Coordinate,
    pub title: String,
}

impl MarkerOptions {
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            title: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Camera move: center on `target` at `zoom`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraUpdate {
    pub target: Coordinate,
    pub zoom: f32,
}

impl CameraUpdate {
    pub fn new_lat_lng_zoom(target: Coordinate, zoom: f32) -> Self {
        Self { target, zoom }
    }
}

/// A ready map
pub trait MapHandle {
    /// Toggle the built-in device position overlay
    fn set_my_location_enabled(&mut self, enabled: bool);

    fn add_marker(&mut self, options: MarkerOptions) -> MarkerId;

    fn remove_marker(&mut self, marker: MarkerId);

    fn move_camera(&mut self, update: CameraUpdate);
}

/// Platform facility that produces a map asynchronously
pub trait MapRenderer {
    type Map: MapHandle;

    /// Start loading. The map is delivered later through
    /// `LocationMapController::on_map_ready`.
    fn load(&mut self);
}
