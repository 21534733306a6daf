//! Dead-reckoning pose tracker with optional target pursuit.
//!
//! [`PoseTracker`] owns the estimated position, the target, the following
//! flag and the pursuit tuning. The host calls [`PoseTracker::update`] once
//! per control cycle. Each tick:
//!
//! 1. measures the elapsed time since the previous tick,
//! 2. integrates the position from the driver's reported velocity,
//! 3. when following, steers the driver toward the target,
//! 4. lets the driver advance its own state.

use std::fmt;

use robus_kinematics::{Integrator, Point, Twist};
use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::driver::MotionDriver;
use crate::error::{NavigationError, TickError};
use crate::params::{FollowParams, TrackerConfig};
use crate::pursuit::{PursuitController, Steering};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// What a single call to [`PoseTracker::update`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Elapsed time integrated this tick, in seconds. Zero on the first tick.
    pub dt: f64,
    /// Position after integration.
    pub position: Point,
    /// Steering decision, or `None` when not following.
    pub steering: Option<Steering>,
}

/// Consistent copy of the tracker state, taken in a single borrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSnapshot {
    /// Estimated position.
    pub position: Point,
    /// Current target.
    pub target: Point,
    /// Heading reported by the driver (rad).
    pub orientation: f64,
    /// Whether the tracker is steering toward the target.
    pub following: bool,
    /// Whether the drivetrain is inverted.
    pub inverted: bool,
}

impl fmt::Display for TrackerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position {} θ {:.3} rad, target {} ({})",
            self.position,
            self.orientation,
            self.target,
            if self.following { "following" } else { "idle" }
        )
    }
}

/// Estimates the robot position and optionally drives it to a target.
///
/// The motion driver and the clock are injected, so the tracker can run
/// against hardware or against test doubles.
pub struct PoseTracker<D, C> {
    driver: D,
    clock: C,
    integrator: Integrator,
    pursuit: PursuitController,
    position: Point,
    target: Point,
    following: bool,
    arrived: bool,
    last_tick_us: Option<u64>,
}

impl<D: MotionDriver, C: Clock> PoseTracker<D, C> {
    /// Create a tracker at the origin with default tuning and one integration
    /// slice per tick.
    pub fn new(driver: D, clock: C) -> Self {
        Self::from_parts(driver, clock, Integrator::default(), FollowParams::default())
    }

    /// Create a tracker from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err(NavigationError::InvalidSubsteps)` if `config.substeps` is zero.
    pub fn with_config(driver: D, clock: C, config: &TrackerConfig) -> Result<Self, NavigationError> {
        let integrator = Integrator::new(config.substeps()?);
        Ok(Self::from_parts(driver, clock, integrator, config.follow))
    }

    fn from_parts(driver: D, clock: C, integrator: Integrator, params: FollowParams) -> Self {
        Self {
            driver,
            clock,
            integrator,
            pursuit: PursuitController::new(params),
            position: Point::ORIGIN,
            target: Point::ORIGIN,
            following: false,
            arrived: false,
            last_tick_us: None,
        }
    }

    /// Advance one tick.
    ///
    /// # Errors
    ///
    /// Returns `Err(TickError::Driver)` if the driver fails to report its state
    /// or to accept a command. The position and the tick time are only
    /// committed after the driver has been read successfully, so a failed
    /// read leaves its interval to the next tick.
    pub fn update(&mut self) -> Result<TickReport, TickError<D::Error>> {
        let now = self.clock.micros();
        let dt = match self.last_tick_us {
            Some(prev) => now.wrapping_sub(prev) as f64 / MICROS_PER_SECOND,
            None => 0.0,
        };

        let sign = self.pursuit.params().direction_sign();
        let twist = Twist::new(
            self.driver.velocity().map_err(TickError::Driver)? * sign,
            self.driver.angular_velocity().map_err(TickError::Driver)?,
        );
        let orientation = self.driver.compute_orientation().map_err(TickError::Driver)?;
        self.position = self.integrator.step(self.position, twist, orientation, dt)?;
        self.last_tick_us = Some(now);
        trace!(dt, x = self.position.x, y = self.position.y, vx = twist.vx, wz = twist.wz, "Integrated position");

        let steering = if self.following {
            Some(self.steer()?)
        } else {
            None
        };

        self.driver.update().map_err(TickError::Driver)?;

        Ok(TickReport {
            dt,
            position: self.position,
            steering,
        })
    }

    fn steer(&mut self) -> Result<Steering, TickError<D::Error>> {
        // The integrator's running heading is local; steer from a fresh reading.
        let orientation = self.driver.compute_orientation().map_err(TickError::Driver)?;
        let steering = self.pursuit.steer(self.position, self.target, orientation);

        match steering {
            Steering::Arrived { distance } => {
                self.driver.stop().map_err(TickError::Driver)?;
                if !self.arrived {
                    info!(distance, x = self.target.x, y = self.target.y, "Target reached, holding position");
                    self.arrived = true;
                }
            }
            Steering::Command(cmd) => {
                self.driver.set_velocity(cmd.twist.vx).map_err(TickError::Driver)?;
                self.driver.set_angular_velocity(cmd.twist.wz).map_err(TickError::Driver)?;
                self.arrived = false;
            }
        }
        debug!(%steering, "Steering toward target");

        Ok(steering)
    }

    /// Forget the previous tick time, so the next tick integrates nothing.
    ///
    /// Call this after the control loop was paused, to avoid one large step.
    pub fn reset_clock(&mut self) {
        self.last_tick_us = None;
    }

    /// Current heading estimate, straight from the driver.
    pub fn orientation(&self) -> Result<f64, D::Error> {
        self.driver.compute_orientation()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Overwrite the estimated position, e.g. after an external fix.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.set_position_point(Point::new(x, y));
    }

    pub fn set_position_point(&mut self, position: Point) {
        info!(x = position.x, y = position.y, "Position reset");
        self.position = position;
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Set the point to follow. Has no effect on the driver until following
    /// is enabled.
    pub fn set_target(&mut self, x: f64, y: f64) {
        self.set_target_point(Point::new(x, y));
    }

    pub fn set_target_point(&mut self, target: Point) {
        info!(x = target.x, y = target.y, "New target");
        self.target = target;
        self.arrived = false;
    }

    pub fn distance_to_target(&self) -> f64 {
        self.position.distance(&self.target)
    }

    pub fn is_following_target(&self) -> bool {
        self.following
    }

    pub fn start_following_target(&mut self) {
        self.set_following_target(true);
    }

    /// Stop steering. The driver keeps whatever command it was last given.
    pub fn stop_following_target(&mut self) {
        self.set_following_target(false);
    }

    pub fn set_following_target(&mut self, following: bool) {
        if self.following != following {
            info!(following, x = self.target.x, y = self.target.y, "Target following changed");
        }
        self.following = following;
        self.arrived = false;
    }

    pub fn params(&self) -> &FollowParams {
        self.pursuit.params()
    }

    pub fn set_params(&mut self, params: FollowParams) {
        debug!(?params, "Follow parameters replaced");
        *self.pursuit.params_mut() = params;
    }

    pub fn follow_angular_velocity_scale(&self) -> f64 {
        self.pursuit.params().angular_velocity_scale
    }

    pub fn set_follow_angular_velocity_scale(&mut self, scale: f64) {
        self.pursuit.params_mut().angular_velocity_scale = scale;
    }

    pub fn follow_velocity(&self) -> f64 {
        self.pursuit.params().follow_velocity
    }

    pub fn set_follow_velocity(&mut self, velocity: f64) {
        self.pursuit.params_mut().follow_velocity = velocity;
    }

    pub fn curve_tightness(&self) -> f64 {
        self.pursuit.params().curve_tightness
    }

    pub fn set_curve_tightness(&mut self, tightness: f64) {
        self.pursuit.params_mut().curve_tightness = tightness;
    }

    pub fn is_inverted(&self) -> bool {
        self.pursuit.params().inverted
    }

    /// Flip the forward direction, for both integration and commands.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.pursuit.params_mut().inverted = inverted;
    }

    pub fn max_angular_velocity(&self) -> f64 {
        self.pursuit.params().max_angular_velocity
    }

    pub fn set_max_angular_velocity(&mut self, bound: f64) {
        self.pursuit.params_mut().max_angular_velocity = bound;
    }

    pub fn arrival_epsilon(&self) -> f64 {
        self.pursuit.params().arrival_epsilon
    }

    pub fn set_arrival_epsilon(&mut self, epsilon: f64) {
        self.pursuit.params_mut().arrival_epsilon = epsilon;
    }

    pub fn substeps(&self) -> u32 {
        self.integrator.substeps()
    }

    pub fn snapshot(&self) -> Result<TrackerSnapshot, D::Error> {
        Ok(TrackerSnapshot {
            position: self.position,
            target: self.target,
            orientation: self.driver.compute_orientation()?,
            following: self.following,
            inverted: self.pursuit.params().inverted,
        })
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
