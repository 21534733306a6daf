mod blackboard; // shared tracker behind a lock
mod bus; // broadcast topics
mod settings; // settings loading
mod mission; // waypoint mission and telemetry tasks
mod sim; // simulated motion driver

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use robus_navigation::{MonotonicClock, MotionDriver, PoseTracker, Steering, TrackerSnapshot};
use spin_sleep::SpinSleeper;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{self, EnvFilter};

use blackboard::{Blackboard, new_blackboard, snapshot};
use bus::Topic;
use settings::{DEFAULT_CONFIG_PATH, load_settings};
use sim::SimDriver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let settings = load_settings(&path)?;

    let driver = SimDriver::new(&settings.sim);
    let tracker = PoseTracker::with_config(driver, MonotonicClock::new(), &settings.tracker_config())?;
    info!(substeps = tracker.substeps(), params = ?tracker.params(), "Pose tracker ready.");
    let bb = new_blackboard(tracker);

    let snapshots: Topic<TrackerSnapshot> = Topic::new(16);
    let telemetry = tokio::spawn(mission::run_telemetry(snapshots.subscribe()));

    let running = Arc::new(AtomicBool::new(true));
    info!("Spawning control thread...");
    let control = spawn_control_thread(
        Arc::clone(&bb),
        snapshots,
        settings.control.period()?,
        settings.telemetry.log_every,
        Arc::clone(&running),
    )?;

    let outcome = tokio::select! {
        result = mission::run_mission(Arc::clone(&bb), &settings.mission) => result.map(Some),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping the robot.");
            Ok(None)
        }
    };

    running.store(false, Ordering::Relaxed);
    tokio::task::spawn_blocking(move || control.join())
        .await?
        .map_err(|_| anyhow::anyhow!("control thread panicked"))?;

    {
        let mut tracker = bb.lock();
        tracker.stop_following_target();
        tracker.driver_mut().stop()?;
        debug!(commanded = %tracker.driver().commanded(), "Driver stopped.");
    }
    telemetry.await?;

    let last = snapshot(&bb);
    match outcome? {
        Some(summary) => info!(reached = summary.reached, timed_out = summary.timed_out, %last, "Done."),
        None => info!(%last, "Aborted."),
    }
    Ok(())
}

/// Tick the tracker once per `period` on a dedicated thread until `running` clears.
fn spawn_control_thread(
    bb: Blackboard,
    snapshots: Topic<TrackerSnapshot>,
    period: Duration,
    log_every: u32,
    running: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new().name("control".into()).spawn(move || {
        info!(?period, "Control thread started.");
        let sleeper = SpinSleeper::new(100_000);
        let mut tick: u64 = 0;
        let mut arrivals: u64 = 0;

        while running.load(Ordering::Relaxed) {
            let started = Instant::now();
            let result = bb.lock().update();
            match result {
                Ok(report) => {
                    if let Some(Steering::Arrived { .. }) = report.steering {
                        arrivals += 1;
                    }
                    if log_every > 0 && tick % u64::from(log_every) == 0 {
                        snapshots.publish(snapshot(&bb));
                    }
                }
                Err(e) => error!("Tracker tick failed: {}", e),
            }
            tick += 1;

            if let Some(rest) = period.checked_sub(started.elapsed()) {
                sleeper.sleep(rest);
            }
        }
        debug!(tick, arrivals, "Control thread stopped.");
    })
}
