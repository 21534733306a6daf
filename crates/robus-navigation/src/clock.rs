use std::time::Instant;

/// Monotonically increasing microsecond counter.
///
/// The counter may wrap; the tracker measures elapsed time with wrapping
/// subtraction.
pub trait Clock {
    /// Current time in microseconds since an arbitrary fixed origin.
    fn micros(&self) -> u64;
}

/// [`Clock`] backed by [`std::time::Instant`], counting from its creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock reading zero now.
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn micros(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}
