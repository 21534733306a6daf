#![warn(missing_docs)]

//! Error types for the kinematics library.

use core::fmt;

/// Errors that can occur in kinematic calculations.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for negative time delta.
    /// This variant is returned when a negative time delta is used for position updates.
    NegativeTimeDelta(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::NegativeTimeDelta(msg) => write!(f, "Negative time delta: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
