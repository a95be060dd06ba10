//! Edge case tests for fos-locmap
//!
//! Stray callbacks, repeated lifecycle calls and configuration.

#![cfg(feature = "sim")]

use std::time::Duration;

use fos_locmap::sim::{SimLocationSource, SimMap, SimPermissions, SimRenderer};
use fos_locmap::*;

type SimController = LocationMapController<SimPermissions, SimRenderer, SimLocationSource>;

fn controller_with(perms: &SimPermissions, source: &SimLocationSource, config: TrackingConfig) -> SimController {
    LocationMapController::new(perms.clone(), SimRenderer::new(), source.clone(), config).unwrap()
}

// ============================================================================
// PERMISSION CALLBACKS
// ============================================================================

#[test]
fn test_unknown_request_code_ignored() {
    let perms = SimPermissions::denied();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();

    assert!(c.on_permission_result(RequestCode(7), &[true, true]).is_ok());
    assert_eq!(c.state(), ControllerState::AwaitingPermission);
    assert_eq!(c.renderer().load_count(), 0);
}

#[test]
fn test_result_without_request_ignored() {
    let perms = SimPermissions::denied();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());

    assert!(c.on_permission_result(RequestCode::LOCATION, &[true, true]).is_ok());
    assert_eq!(c.state(), ControllerState::Uninitialized);
}

#[test]
fn test_short_grant_vector_denied() {
    let perms = SimPermissions::denied();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();

    assert_eq!(c.on_permission_result(RequestCode::LOCATION, &[true]), Err(LocMapError::PermissionDenied));
    assert_eq!(c.state(), ControllerState::PermissionDenied);
}

#[test]
fn test_empty_grant_vector_denied() {
    let perms = SimPermissions::denied();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();

    assert_eq!(c.on_permission_result(RequestCode::LOCATION, &[]), Err(LocMapError::PermissionDenied));
}

#[test]
fn test_retry_after_denial() {
    let perms = SimPermissions::denied();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();
    let _ = c.on_permission_result(RequestCode::LOCATION, &[false, false]);

    // Granted from settings in the meantime
    perms.set(true, true);
    assert_eq!(c.retry_permissions().unwrap(), ControllerState::MapLoading);
    assert_eq!(c.renderer().load_count(), 1);
    assert_eq!(perms.request_count(), 1);
}

#[test]
fn test_retry_requests_again() {
    let perms = SimPermissions::denied();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();
    let _ = c.on_permission_result(RequestCode::LOCATION, &[true, false]);

    assert_eq!(c.retry_permissions().unwrap(), ControllerState::AwaitingPermission);
    assert_eq!(perms.request_count(), 2);

    perms.set(true, true);
    c.on_permission_result(RequestCode::LOCATION, &[true, true]).unwrap();
    assert_eq!(c.state(), ControllerState::MapLoading);
}

#[test]
fn test_retry_ignored_while_tracking() {
    let perms = SimPermissions::granted();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();
    c.on_map_ready(SimMap::new()).unwrap();

    assert_eq!(c.retry_permissions().unwrap(), ControllerState::Tracking);
    assert_eq!(perms.request_count(), 0);
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_start_twice() {
    let perms = SimPermissions::granted();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());

    c.start().unwrap();
    c.start().unwrap();
    assert_eq!(c.renderer().load_count(), 1);
}

#[test]
fn test_second_map_ready_keeps_one_subscription() {
    let perms = SimPermissions::granted();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();

    let first = SimMap::new();
    c.on_map_ready(first.clone()).unwrap();
    let sub = c.subscription().unwrap();
    c.on_location_update(sub, &[Fix::at(1.0, 1.0)]);

    let second = SimMap::new();
    c.on_map_ready(second.clone()).unwrap();
    assert_eq!(source.requests().len(), 1);
    assert_eq!(c.current_marker(), None);

    c.on_location_update(sub, &[Fix::at(2.0, 2.0)]);
    assert_eq!(second.marker_count(), 1);
    assert!(second.ops().iter().all(|op| !matches!(op, fos_locmap::sim::MapOp::RemoveMarker(_))));
}

#[test]
fn test_last_location_before_map() {
    let perms = SimPermissions::granted();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();

    assert_eq!(c.on_last_location(Some(Fix::at(1.0, 1.0))), Err(LocMapError::MapNotReady));
    assert_eq!(c.current_marker(), None);
}

#[test]
fn test_tracking_before_map_waits_for_map() {
    let perms = SimPermissions::granted();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();

    let sub = c.start_tracking().unwrap();
    assert_eq!(c.state(), ControllerState::MapLoading);
    assert_eq!(c.on_location_update(sub, &[Fix::at(1.0, 1.0)]), None);

    let map = SimMap::new();
    c.on_map_ready(map.clone()).unwrap();
    assert_eq!(c.subscription(), Some(sub));
    assert_eq!(c.state(), ControllerState::Tracking);
    assert!(c.on_location_update(sub, &[Fix::at(1.0, 1.0)]).is_some());
}

#[test]
fn test_update_from_foreign_subscription() {
    let perms = SimPermissions::granted();
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());
    c.start().unwrap();
    let map = SimMap::new();
    c.on_map_ready(map.clone()).unwrap();

    assert_eq!(c.on_location_update(SubscriptionId(999), &[Fix::at(1.0, 1.0)]), None);
    assert_eq!(map.marker_count(), 0);
}

#[test]
fn test_coarse_only_tracks() {
    let perms = SimPermissions::new(false, true);
    let source = SimLocationSource::new();
    let mut c = controller_with(&perms, &source, TrackingConfig::default());

    assert!(c.start_tracking().is_ok());
    assert_eq!(source.active_subscriptions().len(), 1);
    c.get_current_location().unwrap();
    assert_eq!(source.last_location_queries(), 1);
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_invalid_config_rejected() {
    let config = TrackingConfig { fastest_interval_ms: 10_000, ..Default::default() };
    let result = LocationMapController::new(
        SimPermissions::granted(),
        SimRenderer::new(),
        SimLocationSource::new(),
        config,
    );
    assert!(matches!(result, Err(LocMapError::InvalidConfig(_))));
}

#[test]
fn test_custom_config_flows_through() {
    let perms = SimPermissions::granted();
    let source = SimLocationSource::new();
    let config = TrackingConfig {
        interval_ms: 10_000,
        fastest_interval_ms: 1_000,
        priority: Priority::BalancedPowerAccuracy,
        zoom: 12.0,
        tracking_title: "here".to_string(),
        last_known_title: "cached".to_string(),
        request_code: 7,
    };
    let mut c = controller_with(&SimPermissions::denied(), &source, config.clone());
    c.start().unwrap();
    assert_eq!(c.gateway().requests()[0].1, RequestCode(7));
    drop(c);

    let mut c = controller_with(&perms, &source, config);
    c.start().unwrap();
    let map = SimMap::new();
    c.on_map_ready(map.clone()).unwrap();

    let request = *source.requests().last().unwrap();
    assert_eq!(request.interval, Duration::from_secs(10));
    assert_eq!(request.fastest_interval, Duration::from_secs(1));
    assert_eq!(request.priority, Priority::BalancedPowerAccuracy);

    let sub = c.subscription().unwrap();
    c.on_location_update(sub, &[Fix::at(1.0, 1.0)]);
    assert_eq!(map.markers()[0].1.title, "here");
    assert_eq!(map.camera().unwrap().zoom, 12.0);

    c.on_last_location(Some(Fix::at(2.0, 2.0))).unwrap();
    assert_eq!(map.markers()[0].1.title, "cached");
}
