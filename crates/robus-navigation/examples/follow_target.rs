use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use robus_navigation::{Clock, MotionDriver, PoseTracker, Steering, TrackerConfig};

const TICK_US: u64 = 10_000; // 100 Hz

/// Unicycle that follows its commands instantly and integrates its own heading.
#[derive(Default)]
struct IdealDriver {
    velocity: f64,
    angular_velocity: f64,
    orientation: f64,
}

impl MotionDriver for IdealDriver {
    type Error = Infallible;

    fn velocity(&self) -> Result<f64, Infallible> {
        Ok(self.velocity)
    }

    fn angular_velocity(&self) -> Result<f64, Infallible> {
        Ok(self.angular_velocity)
    }

    fn compute_orientation(&self) -> Result<f64, Infallible> {
        Ok(self.orientation)
    }

    fn set_velocity(&mut self, velocity: f64) -> Result<(), Infallible> {
        self.velocity = velocity;
        Ok(())
    }

    fn set_angular_velocity(&mut self, angular_velocity: f64) -> Result<(), Infallible> {
        self.angular_velocity = angular_velocity;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Infallible> {
        self.velocity = 0.0;
        self.angular_velocity = 0.0;
        Ok(())
    }

    fn update(&mut self) -> Result<(), Infallible> {
        self.orientation += self.angular_velocity * TICK_US as f64 / 1_000_000.0;
        Ok(())
    }
}

#[derive(Clone, Default)]
struct StepClock(Rc<Cell<u64>>);

impl Clock for StepClock {
    fn micros(&self) -> u64 {
        self.0.get()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let clock = StepClock::default();
    let mut config = TrackerConfig { substeps: 4, ..TrackerConfig::default() };
    config.follow.follow_velocity = 0.5;
    config.follow.curve_tightness = 4.0;
    config.follow.arrival_epsilon = 0.05;

    let mut tracker = PoseTracker::with_config(IdealDriver::default(), clock.clone(), &config)?;
    tracker.set_target(2.0, 1.0);
    tracker.start_following_target();

    println!("Following target {} with {:?}", tracker.target(), tracker.params());

    for i in 0..3_000 {
        let report = tracker.update()?;
        if i % 100 == 0 {
            if let Some(steering) = report.steering {
                println!("t = {:>5.2} s: {} -> {}", i as f64 * TICK_US as f64 / 1e6, report.position, steering);
            }
        }
        if let Some(Steering::Arrived { distance }) = report.steering {
            println!("Arrived after {} ticks, {:.3} from target", i, distance);
            break;
        }
        clock.0.set(clock.0.get() + TICK_US);
    }

    println!("Final position: {}", tracker.position());
    Ok(())
}
