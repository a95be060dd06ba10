//! Simulated platform services
//!
//! Each service answers asynchronously by posting a [`PlatformEvent`] onto the
//! event channel from a task on the local executor, the way a real platform
//! calls back on the UI thread.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use fos_locmap::sim::{SimMap, SimPermissions};
use fos_locmap::{
    Capability, Coordinate, Fix, LocationRequest, LocationResult, LocationSource, MapRenderer,
    PermissionGateway, PlatformEvent, RequestCode, SubscriptionId,
};
use smol::channel::Sender;
use smol::{LocalExecutor, Task, Timer};

/// Time the simulated user takes to answer the permission dialog
const DIALOG_DELAY: Duration = Duration::from_millis(800);

/// Time the simulated renderer takes to load the map
const MAP_LOAD_DELAY: Duration = Duration::from_millis(300);

pub type Event = PlatformEvent<SimMap>;

/// Shared handle to the executor and the event channel
#[derive(Clone)]
pub struct Platform {
    executor: Rc<LocalExecutor<'static>>,
    events: Sender<Event>,
    time_scale: u32,
}

impl Platform {
    pub fn new(executor: Rc<LocalExecutor<'static>>, events: Sender<Event>, time_scale: u32) -> Self {
        Self {
            executor,
            events,
            time_scale: time_scale.max(1),
        }
    }

    fn scaled(&self, delay: Duration) -> Duration {
        delay / self.time_scale
    }

    /// Deliver `event` after `delay`
    fn post_after(&self, delay: Duration, event: Event) {
        let delay = self.scaled(delay);
        let events = self.events.clone();
        self.executor
            .spawn(async move {
                Timer::after(delay).await;
                // Receiver gone means the session is over
                let _ = events.send(event).await;
            })
            .detach();
    }
}

// ============================================================================
// PERMISSIONS
// ============================================================================

/// Permission dialog that always gives the same answer
pub struct DemoPermissions {
    platform: Platform,
    grants: SimPermissions,
    answer: bool,
}

impl DemoPermissions {
    pub fn new(platform: Platform, already_granted: bool, answer: bool) -> Self {
        Self {
            platform,
            grants: SimPermissions::new(already_granted, already_granted),
            answer,
        }
    }
}

impl PermissionGateway for DemoPermissions {
    fn check(&self, capability: Capability) -> bool {
        self.grants.check(capability)
    }

    fn request(&mut self, capabilities: &[Capability], code: RequestCode) {
        self.grants.request(capabilities, code);
        tracing::info!(
            "Permission dialog shown for [{}], user will {}",
            capabilities.iter().map(Capability::as_str).collect::<Vec<_>>().join(", "),
            if self.answer { "allow" } else { "deny" }
        );
        if self.answer {
            self.grants.set(true, true);
        }
        self.platform.post_after(
            DIALOG_DELAY,
            PlatformEvent::PermissionResult {
                code,
                granted: vec![self.answer; capabilities.len()],
            },
        );
    }
}

// ============================================================================
// MAP
// ============================================================================

/// Renderer that produces an in-memory map after a short delay
pub struct DemoRenderer {
    platform: Platform,
}

impl DemoRenderer {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl MapRenderer for DemoRenderer {
    type Map = SimMap;

    fn load(&mut self) {
        tracing::info!("Loading map");
        self.platform.post_after(MAP_LOAD_DELAY, PlatformEvent::MapReady(SimMap::new()));
    }
}

// ============================================================================
// LOCATION
// ============================================================================

/// Location source that walks a route, one fix per interval
pub struct DemoLocationSource {
    platform: Platform,
    route: Vec<Coordinate>,
    last_known: Option<Fix>,
    next_subscription: u64,
    /// Dropping a task stops its stream
    streams: HashMap<SubscriptionId, Task<()>>,
}

impl DemoLocationSource {
    pub fn new(platform: Platform, route: Vec<Coordinate>, last_known: Option<Fix>) -> Self {
        Self {
            platform,
            route,
            last_known,
            next_subscription: 0,
            streams: HashMap::new(),
        }
    }

    pub fn active_streams(&self) -> usize {
        self.streams.len()
    }
}

impl LocationSource for DemoLocationSource {
    fn request_updates(&mut self, request: &LocationRequest) -> SubscriptionId {
        self.next_subscription += 1;
        let subscription = SubscriptionId(self.next_subscription);

        let interval = self.platform.scaled(request.interval);
        let events = self.platform.events.clone();
        let route = self.route.clone();
        let task = self.platform.executor.spawn(async move {
            for coordinate in route.into_iter().cycle() {
                Timer::after(interval).await;
                let result = LocationResult::from(vec![Fix::new(coordinate, now_ms())]);
                if events.send(PlatformEvent::LocationUpdate { subscription, result }).await.is_err() {
                    break;
                }
            }
        });
        self.streams.insert(subscription, task);
        subscription
    }

    fn remove_updates(&mut self, subscription: SubscriptionId) {
        if self.streams.remove(&subscription).is_some() {
            tracing::debug!("Stream {} cancelled", subscription.0);
        }
    }

    fn request_last_location(&mut self) {
        self.platform
            .post_after(Duration::ZERO, PlatformEvent::LastLocation(self.last_known));
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
