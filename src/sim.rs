use std::convert::Infallible;
use std::time::Instant;

use robus_kinematics::{Twist, normalize_angle};
use robus_navigation::MotionDriver;

use crate::settings::SimSettings;

/// Simulated differential-drive motion driver.
///
/// Velocity commands are tracked with bounded acceleration, and the heading
/// is integrated from the achieved angular velocity on every `update()`.
#[derive(Debug)]
pub struct SimDriver {
    max_accel: f64,
    max_angular_accel: f64,
    commanded: Twist,
    actual: Twist,
    orientation: f64,
    last_update: Option<Instant>,
}

impl SimDriver {
    pub fn new(settings: &SimSettings) -> Self {
        Self {
            max_accel: settings.max_accel.abs(),
            max_angular_accel: settings.max_angular_accel.abs(),
            commanded: Twist::default(),
            actual: Twist::default(),
            orientation: normalize_angle(settings.initial_orientation),
            last_update: None,
        }
    }

    pub fn commanded(&self) -> Twist {
        self.commanded
    }

    /// Advance the simulated drivetrain by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.actual.vx = approach(self.actual.vx, self.commanded.vx, self.max_accel * dt);
        self.actual.wz = approach(self.actual.wz, self.commanded.wz, self.max_angular_accel * dt);
        self.orientation = normalize_angle(self.orientation + self.actual.wz * dt);
    }
}

/// Move `current` toward `goal` by at most `max_delta`.
fn approach(current: f64, goal: f64, max_delta: f64) -> f64 {
    let delta = goal - current;
    if delta.abs() <= max_delta {
        goal
    } else {
        current + max_delta.copysign(delta)
    }
}

impl MotionDriver for SimDriver {
    type Error = Infallible;

    fn velocity(&self) -> Result<f64, Infallible> {
        Ok(self.actual.vx)
    }

    fn angular_velocity(&self) -> Result<f64, Infallible> {
        Ok(self.actual.wz)
    }

    fn compute_orientation(&self) -> Result<f64, Infallible> {
        Ok(self.orientation)
    }

    fn set_velocity(&mut self, velocity: f64) -> Result<(), Infallible> {
        self.commanded.vx = velocity;
        Ok(())
    }

    fn set_angular_velocity(&mut self, angular_velocity: f64) -> Result<(), Infallible> {
        self.commanded.wz = angular_velocity;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Infallible> {
        self.commanded = Twist::default();
        self.actual = Twist::default();
        Ok(())
    }

    fn update(&mut self) -> Result<(), Infallible> {
        let now = Instant::now();
        if let Some(prev) = self.last_update.replace(now) {
            self.advance((now - prev).as_secs_f64());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    const EPSILON: f64 = 1e-9;

    fn driver() -> SimDriver {
        SimDriver::new(&SimSettings {
            max_accel: 1.0,
            max_angular_accel: 2.0,
            initial_orientation: 0.0,
        })
    }

    #[test]
    fn test_acceleration_is_limited() {
        let mut sim = driver();
        sim.set_velocity(1.0).unwrap();
        sim.advance(0.25);
        assert!((sim.velocity().unwrap() - 0.25).abs() < EPSILON);
        sim.advance(1.0);
        assert!((sim.velocity().unwrap() - 1.0).abs() < EPSILON);

        sim.set_velocity(-1.0).unwrap();
        sim.advance(0.5);
        assert!((sim.velocity().unwrap() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_heading_integrates_and_wraps() {
        let mut sim = driver();
        sim.set_angular_velocity(PI).unwrap();
        sim.advance(10.0); // reaches PI rad/s immediately
        assert!((sim.angular_velocity().unwrap() - PI).abs() < EPSILON);
        let heading = sim.compute_orientation().unwrap();
        assert!((0.0..2.0 * PI).contains(&heading));
    }

    #[test]
    fn test_stop_is_immediate() {
        let mut sim = driver();
        sim.set_velocity(1.0).unwrap();
        sim.set_angular_velocity(1.0).unwrap();
        sim.advance(5.0);
        sim.stop().unwrap();
        assert_eq!(sim.velocity().unwrap(), 0.0);
        assert_eq!(sim.angular_velocity().unwrap(), 0.0);
        assert_eq!(sim.commanded(), Twist::default());
    }

    #[test]
    fn test_first_update_does_not_move() {
        let mut sim = driver();
        sim.set_velocity(1.0).unwrap();
        sim.update().unwrap();
        assert_eq!(sim.velocity().unwrap(), 0.0);
    }
}
