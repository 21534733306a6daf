use std::sync::Arc;
use std::time::Duration;

use robus_navigation::{MotionDriver, Point, TrackerSnapshot};
use tokio::sync::broadcast;
use tokio::time::{self, Instant};
use tracing::{info, warn};

use crate::blackboard::{Blackboard, snapshot};
use crate::settings::MissionSettings;

const POLL_PERIOD: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissionSummary {
    pub reached: usize,
    pub timed_out: usize,
}

/// Visit every waypoint in order.
///
/// For each waypoint the tracker's target is replaced and following is
/// enabled; the task then polls until the robot is within the arrival radius
/// or the waypoint times out. At the end following is cleared and the driver
/// is stopped, since the tracker leaves the last command in place.
pub async fn run_mission(bb: Blackboard, mission: &MissionSettings) -> anyhow::Result<MissionSummary> {
    info!(waypoints = mission.waypoints.len(), "Mission started.");
    let timeout = Duration::try_from_secs_f64(mission.waypoint_timeout_s)?;
    let mut summary = MissionSummary::default();

    for (index, &[x, y]) in mission.waypoints.iter().enumerate() {
        {
            let mut tracker = bb.lock();
            tracker.set_target(x, y);
            tracker.start_following_target();
        }
        info!(index, x, y, "Heading to waypoint");

        let deadline = Instant::now() + timeout;
        let mut ticker = time::interval(POLL_PERIOD);
        loop {
            ticker.tick().await;
            let distance = bb.lock().distance_to_target();
            if distance < mission.arrival_radius {
                info!(index, distance, "Waypoint reached");
                summary.reached += 1;
                break;
            }
            if Instant::now() >= deadline {
                let s = snapshot(&bb);
                warn!(index, distance, position = %s.position, "Waypoint timed out, moving on");
                summary.timed_out += 1;
                break;
            }
        }
    }

    {
        let mut tracker = bb.lock();
        tracker.stop_following_target();
        tracker.driver_mut().stop()?;
    }
    info!(reached = summary.reached, timed_out = summary.timed_out, "Mission finished.");
    Ok(summary)
}

/// Log every snapshot the control thread publishes, until the topic closes.
pub async fn run_telemetry(mut rx: broadcast::Receiver<Arc<TrackerSnapshot>>) {
    info!("Telemetry task started.");
    let mut last_position: Option<Point> = None;
    loop {
        match rx.recv().await {
            Ok(s) => {
                let travelled = last_position.map_or(0.0, |p| p.distance(&s.position));
                last_position = Some(s.position);
                info!(x = s.position.x, y = s.position.y, theta = s.orientation, travelled, following = s.following, "Pose");
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("Telemetry receiver lagged by {} snapshots.", n);
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("Snapshot channel closed. Telemetry task exiting.");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::new_blackboard;
    use crate::settings::SimSettings;
    use crate::sim::SimDriver;
    use robus_navigation::{MonotonicClock, PoseTracker};

    fn blackboard() -> Blackboard {
        let driver = SimDriver::new(&SimSettings::default());
        new_blackboard(PoseTracker::new(driver, MonotonicClock::new()))
    }

    #[tokio::test]
    async fn test_waypoint_at_current_position_is_reached() {
        let bb = blackboard();
        bb.lock().set_position(2.0, -1.0);
        let mission = MissionSettings {
            waypoints: vec![[2.0, -1.0]],
            arrival_radius: 0.1,
            waypoint_timeout_s: 5.0,
        };

        let summary = run_mission(bb.clone(), &mission).await.unwrap();
        assert_eq!(summary, MissionSummary { reached: 1, timed_out: 0 });

        let tracker = bb.lock();
        assert!(!tracker.is_following_target());
        assert_eq!(tracker.target(), Point::new(2.0, -1.0));
    }

    #[tokio::test]
    async fn test_unreachable_waypoint_times_out() {
        // Nobody ticks the tracker, so the robot never moves.
        let bb = blackboard();
        let mission = MissionSettings {
            waypoints: vec![[10.0, 0.0], [0.0, 0.0]],
            arrival_radius: 0.1,
            waypoint_timeout_s: 0.05,
        };

        let summary = run_mission(bb, &mission).await.unwrap();
        assert_eq!(summary, MissionSummary { reached: 1, timed_out: 1 });
    }
}
