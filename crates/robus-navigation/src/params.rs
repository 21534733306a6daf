//! Tuning parameters for target following.

use core::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;

/// Default forward speed while following.
pub const DEFAULT_FOLLOW_VELOCITY: f64 = 3.0;
/// Default gain from heading error (rad) to angular velocity (rad/s).
pub const DEFAULT_ANGULAR_VELOCITY_SCALE: f64 = 3.0;
/// Default alignment exponent.
pub const DEFAULT_CURVE_TIGHTNESS: f64 = 50.0;
/// Default bound on the commanded angular velocity (rad/s).
pub const DEFAULT_MAX_ANGULAR_VELOCITY: f64 = 0.5;
/// Default distance under which the target counts as reached.
pub const DEFAULT_ARRIVAL_EPSILON: f64 = 0.01;

/// Tuning of the pursuit controller.
///
/// None of the fields are validated. Out-of-range values degrade the control
/// quality but are never rejected.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowParams {
    /// Forward speed when perfectly aligned with the target.
    pub follow_velocity: f64,
    /// Gain converting heading error into angular velocity.
    pub angular_velocity_scale: f64,
    /// Exponent applied to the alignment before scaling the forward speed.
    /// Large values make the robot turn in place until it faces the target;
    /// values near 1 slow it down linearly with misalignment.
    pub curve_tightness: f64,
    /// Flips the sign of the forward velocity, for a reversed drivetrain.
    pub inverted: bool,
    /// Symmetric bound on the commanded angular velocity.
    pub max_angular_velocity: f64,
    /// Distance at or under which the target is considered reached. A robot
    /// exactly on the target always counts as arrived, whatever this is set to.
    pub arrival_epsilon: f64,
}

impl FollowParams {
    /// `-1.0` when the drivetrain is inverted, `1.0` otherwise.
    pub fn direction_sign(&self) -> f64 {
        if self.inverted { -1.0 } else { 1.0 }
    }
}

impl Default for FollowParams {
    fn default() -> Self {
        FollowParams {
            follow_velocity: DEFAULT_FOLLOW_VELOCITY,
            angular_velocity_scale: DEFAULT_ANGULAR_VELOCITY_SCALE,
            curve_tightness: DEFAULT_CURVE_TIGHTNESS,
            inverted: false,
            max_angular_velocity: DEFAULT_MAX_ANGULAR_VELOCITY,
            arrival_epsilon: DEFAULT_ARRIVAL_EPSILON,
        }
    }
}

/// Everything needed to build a [`PoseTracker`](crate::PoseTracker) besides
/// its driver and clock.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Integration slices per tick. Must be at least 1.
    pub substeps: u32,
    /// Initial pursuit tuning.
    pub follow: FollowParams,
}

impl TrackerConfig {
    /// Returns the sub-step count as a checked non-zero value.
    ///
    /// # Errors
    ///
    /// Returns `Err(NavigationError::InvalidSubsteps)` if `substeps` is zero.
    pub fn substeps(&self) -> Result<NonZeroU32, NavigationError> {
        NonZeroU32::new(self.substeps).ok_or(NavigationError::InvalidSubsteps("must be at least 1"))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            substeps: 1,
            follow: FollowParams::default(),
        }
    }
}
