#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for planar dead-reckoning kinematics."]
#![doc = ""]
#![doc = "This crate provides points, twists, angle helpers and a sub-stepped"]
#![doc = "forward-Euler integrator that advances a robot position from its velocity."]

use core::fmt;
use core::num::NonZeroU32;
use libm::{cos, hypot, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod angle;
pub mod error;
pub use angle::{normalize_angle, smallest_signed_angle};
pub use error::KinematicsError;

/// A point `(x, y)` in the world frame, in the robot's length unit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// World-frame x coordinate.
    pub x: f64,
    /// World-frame y coordinate.
    pub y: f64,
}

impl Point {
    /// The world origin.
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    /// Construct a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        hypot(other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.3}, y: {:.3})", self.x, self.y)
    }
}

/// A twist expressed in the robot base frame.
/// A twist represents the linear and angular velocities of the robot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Twist {
    /// Linear velocity along the robot's heading (length unit per second).
    pub vx: f64,
    /// Angular velocity around the robot's vertical axis (rad/s).
    pub wz: f64,
}

impl Twist {
    /// Construct a new twist.
    ///
    /// # Arguments
    ///
    /// * `vx`: Linear velocity along the robot's heading.
    /// * `wz`: Angular velocity, counter-clockwise positive (rad/s).
    pub const fn new(vx: f64, wz: f64) -> Self {
        Twist { vx, wz }
    }
}

impl fmt::Display for Twist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(vx: {:.3}, ωz: {:.3} rad/s)", self.vx, self.wz)
    }
}

/// Forward-Euler integrator for the unicycle model.
///
/// A tick of length `dt` is split into `substeps` equal slices. Each slice
/// moves the position along the current heading and then advances the heading
/// by the angular velocity, so fast rotation bends the path within a tick
/// instead of producing one straight chord. Accuracy improves with more
/// sub-steps at proportional CPU cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integrator {
    substeps: NonZeroU32,
}

impl Integrator {
    /// Construct an integrator that splits every tick into `substeps` slices.
    pub const fn new(substeps: NonZeroU32) -> Self {
        Integrator { substeps }
    }

    /// Returns the number of slices per tick.
    pub fn substeps(&self) -> u32 {
        self.substeps.get()
    }

    /// Advance `position` by `dt` seconds of motion.
    ///
    /// # Arguments
    ///
    /// * `position`: The position at the start of the tick.
    /// * `twist`: Linear and angular velocity, held constant over the tick.
    /// * `orientation`: Heading at the start of the tick (rad). Only used as the
    ///   seed of a local running heading; it is not returned.
    /// * `dt`: The tick length in seconds.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    ///
    /// # Returns
    ///
    /// The position at the end of the tick.
    pub fn step(
        &self,
        position: Point,
        twist: Twist,
        orientation: f64,
        dt: f64,
    ) -> Result<Point, KinematicsError> {
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }

        let n = self.substeps.get();
        let slice = dt / f64::from(n);
        let mut next = position;
        let mut heading = orientation;
        for _ in 0..n {
            next.x += cos(heading) * twist.vx * slice;
            next.y += sin(heading) * twist.vx * slice;
            heading += twist.wz * slice;
        }
        Ok(next)
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Integrator::new(NonZeroU32::MIN)
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integrator ({} substeps)", self.substeps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;
    const EPSILON: f64 = 1e-9;

    fn integrator(n: u32) -> Integrator {
        Integrator::new(NonZeroU32::new(n).unwrap())
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert!((a.distance(&b) - 5.0).abs() < EPSILON);
        assert!((b.distance(&a) - 5.0).abs() < EPSILON);
        assert!(a.distance(&a).abs() < EPSILON);
    }

    #[test]
    fn test_default_integrator_has_one_substep() {
        assert_eq!(Integrator::default().substeps(), 1);
        assert_eq!(integrator(8).substeps(), 8);
    }

    #[test]
    fn test_step_straight_no_rotation() {
        let start = Point::new(0.0, 0.0);
        let twist = Twist::new(1.0, 0.0);

        // Expected: x = 0 + 1*cos(0)*1 = 1, y = 0
        let next = integrator(1).step(start, twist, 0.0, 1.0).unwrap();
        assert!((next.x - 1.0).abs() < EPSILON);
        assert!((next.y - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_step_straight_with_initial_rotation() {
        let start = Point::new(1.0, 1.0);
        let twist = Twist::new(1.0, 0.0);

        // Facing +y for 2 s at 1 unit/s: (1, 3)
        let next = integrator(1).step(start, twist, PI / 2.0, 2.0).unwrap();
        assert!((next.x - 1.0).abs() < EPSILON);
        assert!((next.y - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_straight_displacement_independent_of_substeps() {
        let start = Point::new(-2.0, 0.5);
        let twist = Twist::new(1.7, 0.0);
        let theta: f64 = 0.8;
        let t = 2.5;
        let expected_x = start.x + 1.7 * t * theta.cos();
        let expected_y = start.y + 1.7 * t * theta.sin();

        for n in [1, 2, 3, 7, 16, 100] {
            let next = integrator(n).step(start, twist, theta, t).unwrap();
            assert!((next.x - expected_x).abs() < 1e-9, "substeps {}", n);
            assert!((next.y - expected_y).abs() < 1e-9, "substeps {}", n);
        }
    }

    #[test]
    fn test_pure_rotation_does_not_translate() {
        let start = Point::new(3.0, -1.0);
        let next = integrator(10).step(start, Twist::new(0.0, 2.0), 0.3, 1.0).unwrap();
        assert_eq!(next, start);
    }

    #[test]
    fn test_first_slice_uses_seed_heading() {
        // One slice ignores the angular velocity for the position update.
        let next = integrator(1).step(Point::ORIGIN, Twist::new(1.0, PI), 0.0, 1.0).unwrap();
        assert!((next.x - 1.0).abs() < EPSILON);
        assert!(next.y.abs() < EPSILON);

        // Two slices bend the second half by the half-tick rotation.
        let next = integrator(2).step(Point::ORIGIN, Twist::new(1.0, PI), 0.0, 1.0).unwrap();
        assert!((next.x - 0.5).abs() < EPSILON);
        assert!((next.y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_substeps_converge_on_arc() {
        // Constant v and w trace an arc of radius v/w.
        let v: f64 = 1.0;
        let w: f64 = 1.2;
        let t: f64 = 1.0;
        let exact_x = v / w * (w * t).sin();
        let exact_y = v / w * (1.0 - (w * t).cos());

        let error = |n: u32| {
            let p = integrator(n).step(Point::ORIGIN, Twist::new(v, w), 0.0, t).unwrap();
            (p.x - exact_x).hypot(p.y - exact_y)
        };

        let coarse = error(1);
        let medium = error(10);
        let fine = error(100);
        assert!(medium < coarse);
        assert!(fine < medium);
        assert!(fine < 0.02);
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        let start = Point::new(5.0, 5.0);
        let next = integrator(4).step(start, Twist::new(10.0, 10.0), 1.0, 0.0).unwrap();
        assert_eq!(next, start);
    }

    #[test]
    fn test_step_negative_dt() {
        let result = integrator(1).step(Point::ORIGIN, Twist::new(1.0, 0.0), 0.0, -0.1);
        assert!(matches!(result, Err(KinematicsError::NegativeTimeDelta("must be non-negative"))));
    }
}
