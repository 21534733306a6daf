//! Angle helpers used by the integrator and the pursuit controller.
//!
//! Angles are in radians, counter-clockwise from the world x-axis.

use core::f64::consts::{PI, TAU};

/// Reduce an angle into `[0, 2π)`.
///
/// Uses remainder arithmetic, so the cost does not depend on how many turns
/// away from the range the input is. Non-finite inputs produce `NaN`.
///
/// # Arguments
///
/// * `angle`: The angle in radians to normalize.
///
/// # Returns
///
/// The equivalent angle in `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a < 0.0 {
        a += TAU;
    }
    // Tiny negative remainders round up to exactly TAU after the addition.
    if a >= TAU {
        a -= TAU;
    }
    a
}

/// Shortest signed rotation that takes `from` onto `to`.
///
/// Both angles are normalized first, then the difference is folded once into
/// `[-π, π]`. Positive results are counter-clockwise. When the two angles are
/// exactly half a turn apart the result is `+π`.
///
/// # Arguments
///
/// * `from`: The current heading in radians.
/// * `to`: The desired heading in radians.
pub fn smallest_signed_angle(from: f64, to: f64) -> f64 {
    let delta = normalize_angle(to) - normalize_angle(from);
    if delta > PI {
        delta - TAU
    } else if delta < -PI {
        delta + TAU
    } else {
        delta
    }
}
