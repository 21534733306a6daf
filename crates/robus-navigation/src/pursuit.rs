//! Proportional pursuit toward a single target point.
//!
//! The forward speed is shaped by how well the robot faces the target
//! (`alignment`, the cosine between heading and bearing), and the turn rate
//! is proportional to the signed heading error, clamped.

use std::fmt;

use robus_kinematics::{Point, Twist, smallest_signed_angle};

use crate::params::FollowParams;

/// Outcome of one pursuit computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steering {
    /// The target is within the arrival epsilon; the robot must stop.
    Arrived {
        /// Distance to the target when the decision was made.
        distance: f64,
    },
    /// Drive with the given command.
    Command(PursuitCommand),
}

/// A velocity command and the quantities it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitCommand {
    /// Commanded linear and angular velocity.
    pub twist: Twist,
    /// Distance to the target.
    pub distance: f64,
    /// Bearing from the robot to the target (rad).
    pub target_angle: f64,
    /// Cosine between the heading and the bearing, in `[-1, 1]`.
    pub alignment: f64,
    /// Signed heading error before scaling and clamping (rad).
    pub heading_error: f64,
}

impl fmt::Display for Steering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Steering::Arrived { distance } => write!(f, "arrived (distance {:.3})", distance),
            Steering::Command(cmd) => write!(
                f,
                "{} (distance {:.3}, alignment {:.3}, heading error {:.3} rad)",
                cmd.twist, cmd.distance, cmd.alignment, cmd.heading_error
            ),
        }
    }
}

/// Pursuit control law.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PursuitController {
    params: FollowParams,
}

impl PursuitController {
    pub fn new(params: FollowParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FollowParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut FollowParams {
        &mut self.params
    }

    /// Compute the steering decision for one tick.
    ///
    /// # Arguments
    ///
    /// * `position` - Current estimated position.
    /// * `target` - Point to drive toward.
    /// * `orientation` - Current heading in radians.
    pub fn steer(&self, position: Point, target: Point, orientation: f64) -> Steering {
        let p = &self.params;

        let distance = position.distance(&target);
        // The second test covers a zero or negative epsilon; the bearing
        // below divides by `distance`.
        if distance <= p.arrival_epsilon || distance <= 0.0 {
            return Steering::Arrived { distance };
        }

        let dir_x = (target.x - position.x) / distance;
        let dir_y = (target.y - position.y) / distance;
        let target_angle = dir_y.atan2(dir_x);

        let (heading_y, heading_x) = orientation.sin_cos();
        let alignment = heading_x * dir_x + heading_y * dir_y;

        // Facing away contributes no forward speed; this also keeps powf away
        // from negative bases.
        let vx = alignment.clamp(0.0, 1.0).powf(p.curve_tightness) * p.follow_velocity * p.direction_sign();

        let heading_error = smallest_signed_angle(orientation, target_angle);
        let bound = p.max_angular_velocity.abs();
        let wz = (heading_error * p.angular_velocity_scale).max(-bound).min(bound);

        Steering::Command(PursuitCommand {
            twist: Twist::new(vx, wz),
            distance,
            target_angle,
            alignment,
            heading_error,
        })
    }
}
