use parking_lot::Mutex;
use std::convert::Infallible;
use std::sync::Arc;

use robus_navigation::{MonotonicClock, PoseTracker, TrackerSnapshot};

use crate::sim::SimDriver;

pub type SimTracker = PoseTracker<SimDriver, MonotonicClock>;

/// Tracker shared between the control thread and the async tasks.
/// Every multi-field read or write goes through one lock acquisition.
pub type Blackboard = Arc<Mutex<SimTracker>>;

pub fn new_blackboard(tracker: SimTracker) -> Blackboard {
    Arc::new(Mutex::new(tracker))
}

pub fn snapshot(bb: &Blackboard) -> TrackerSnapshot {
    bb.lock().snapshot().unwrap_or_else(|never: Infallible| match never {})
}
