//! fOS Location Map - Demo Entry Point
//!
//! Drives the controller through a simulated session: permission dialog, map
//! load, last-known query, then a route replayed as location updates. All
//! platform callbacks go through one channel and are applied in order.

mod cli;
mod platform;
mod route;

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use fos_locmap::{
    ControllerState, Fix, LocationMapController, MarkerOptions, PlatformEvent, TrackingConfig,
};
use smol::LocalExecutor;
use tracing_subscriber::EnvFilter;

use crate::cli::Options;
use crate::platform::{DemoLocationSource, DemoPermissions, DemoRenderer, Platform};
use crate::route::Route;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = Options::parse(std::env::args().skip(1))?;
    if options.help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let config = load_config(options.config.as_deref())?;
    let route = match &options.route {
        Some(path) => Route::load(path)?,
        None => Route::default(),
    };

    tracing::info!("fOS Location Map {} starting", fos_locmap::VERSION);

    let executor = Rc::new(LocalExecutor::new());
    let summary = smol::block_on(executor.run(run(executor.clone(), options, config, route)))?;

    tracing::info!(
        "Session ended in state {} after {} updates ({} streams left open)",
        summary.state,
        summary.updates,
        summary.active_streams
    );
    match summary.marker {
        Some(marker) => tracing::info!("Marker '{}' at {}", marker.title, marker.position),
        None => tracing::info!("No marker on the map"),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<TrackingConfig> {
    let Some(path) = path else {
        return Ok(TrackingConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: TrackingConfig = serde_json::from_str(&json)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Outcome of a demo session
#[derive(Debug)]
struct Summary {
    state: ControllerState,
    updates: usize,
    marker: Option<MarkerOptions>,
    active_streams: usize,
}

async fn run(
    executor: Rc<LocalExecutor<'static>>,
    options: Options,
    config: TrackingConfig,
    route: Route,
) -> Result<Summary> {
    let (events, inbox) = smol::channel::unbounded();
    let platform = Platform::new(executor, events, options.time_scale);

    let last_known = options
        .last_known
        .then(|| route.points().first().map(|c| Fix::new(*c, 0)))
        .flatten();
    let gateway = DemoPermissions::new(platform.clone(), options.granted, !options.deny);
    let renderer = DemoRenderer::new(platform.clone());
    let source = DemoLocationSource::new(platform, route.points().to_vec(), last_known);

    let mut controller = LocationMapController::new(gateway, renderer, source, config)?;
    controller.start()?;

    let limit = options.updates.unwrap_or(route.len());
    let mut updates = 0;
    while updates < limit {
        let event = inbox.recv().await.context("platform event channel closed")?;
        let kind = event.kind();
        let map_ready = matches!(event, PlatformEvent::MapReady(_));
        let is_update = matches!(event, PlatformEvent::LocationUpdate { .. });

        if let Err(err) = controller.handle(event) {
            tracing::warn!("{} not applied: {}", kind, err);
        }
        if map_ready {
            if let Err(err) = controller.get_current_location() {
                tracing::warn!("Last-known location unavailable: {}", err);
            }
        }
        if is_update {
            updates += 1;
        }
        if controller.state() == ControllerState::PermissionDenied {
            tracing::warn!("Location permission is required to show your position");
            break;
        }
    }

    let marker = controller
        .map()
        .and_then(|map| map.markers().into_iter().next())
        .map(|(_, options)| options);
    let state = controller.state();
    controller.dispose();

    Ok(Summary {
        state,
        updates,
        marker,
        active_streams: controller.source().active_streams(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_locmap::Coordinate;

    fn session(options: Options) -> Summary {
        let executor = Rc::new(LocalExecutor::new());
        let route = Route::default();
        smol::block_on(executor.run(run(executor.clone(), options, TrackingConfig::default(), route)))
            .unwrap()
    }

    fn fast() -> Options {
        Options { time_scale: 1000, ..Options::default() }
    }

    #[test]
    fn test_granted_session_follows_route() {
        let summary = session(fast());
        assert_eq!(summary.state, ControllerState::Tracking);
        assert_eq!(summary.updates, 5);
        let marker = summary.marker.unwrap();
        assert_eq!(marker.position, Coordinate::new(40.002, -2.998));
        assert_eq!(marker.title, "current location");
        assert_eq!(summary.active_streams, 0);
    }

    #[test]
    fn test_already_granted_session() {
        let summary = session(Options { granted: true, updates: Some(2), ..fast() });
        assert_eq!(summary.updates, 2);
        assert_eq!(summary.marker.unwrap().position, Coordinate::new(40.0005, -2.9995));
    }

    #[test]
    fn test_denied_session_has_no_map() {
        let summary = session(Options { deny: true, ..fast() });
        assert_eq!(summary.state, ControllerState::PermissionDenied);
        assert_eq!(summary.updates, 0);
        assert!(summary.marker.is_none());
    }

    #[test]
    fn test_last_known_then_updates() {
        let summary = session(Options { last_known: true, updates: Some(1), ..fast() });
        let marker = summary.marker.unwrap();
        assert_eq!(marker.title, "current location");
        assert_eq!(marker.position, Coordinate::new(40.0, -3.0));
    }

    #[test]
    fn test_load_config_default_and_file() {
        assert_eq!(load_config(None).unwrap(), TrackingConfig::default());
        assert!(load_config(Some(Path::new("/nonexistent/locmap.json"))).is_err());

        let sample = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/config.json"));
        assert_eq!(load_config(Some(sample)).unwrap(), TrackingConfig::default());
    }

    #[test]
    fn test_sample_route_loads() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/route.json"));
        let route = Route::load(path).unwrap();
        assert_eq!(route.len(), 5);
        assert_eq!(route.points()[0], Coordinate::new(40.4168, -3.7038));
    }
}
