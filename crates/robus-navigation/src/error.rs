//! This module defines the error types used by the `robus-navigation` crate.

#![warn(missing_docs)]

use core::fmt;

use robus_kinematics::KinematicsError;

/// Error type for building a pose tracker.
///
/// Only construction can fail; once built, the tracker's own computations
/// always succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Error for an invalid integration sub-step count.
    /// This variant is returned when the configured sub-step count is zero.
    InvalidSubsteps(&'static str),
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::InvalidSubsteps(msg) => write!(f, "Invalid sub-step count: {}", msg),
        }
    }
}

impl core::error::Error for NavigationError {}

/// Error returned by a single tracker tick.
///
/// `E` is the motion driver's error type; driver failures are passed through
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum TickError<E> {
    /// The motion driver failed to report state or accept a command.
    Driver(E),
    /// The integrator rejected the tick.
    Kinematics(KinematicsError),
}

impl<E> From<KinematicsError> for TickError<E> {
    fn from(err: KinematicsError) -> Self {
        TickError::Kinematics(err)
    }
}

impl<E: fmt::Display> fmt::Display for TickError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::Driver(err) => write!(f, "Motion driver error: {}", err),
            TickError::Kinematics(err) => write!(f, "Integration error: {}", err),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for TickError<E> {}
