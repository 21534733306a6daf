//! Dead-reckoning position tracking and single-target pursuit for wheeled robots.
//!
//! The crate sits between a host control loop and a [`MotionDriver`]: every
//! tick, [`PoseTracker::update`] integrates the driver's reported motion into a
//! position estimate and, when following is enabled, commands the driver
//! toward the current target.

pub mod clock;
pub mod driver;
pub mod error;
pub mod params;
pub mod pursuit;
pub mod tracker;

pub use clock::{Clock, MonotonicClock};
pub use driver::MotionDriver;
pub use error::{NavigationError, TickError};
pub use params::{FollowParams, TrackerConfig};
pub use pursuit::{PursuitCommand, PursuitController, Steering};
pub use tracker::{PoseTracker, TickReport, TrackerSnapshot};

pub use robus_kinematics::{Point, Twist};
