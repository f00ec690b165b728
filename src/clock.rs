//! Time sources for pause timing
//!
//! Pause durations are measured in elapsed processing time, read once per
//! classified chunk. The default [`SystemClock`] reads a monotonic clock, so
//! callers that feed audio faster or slower than real time get pause
//! durations in processing time, not audio time. Tests and offline replays
//! can inject a [`SteppedClock`] to get deterministic timestamps.

use std::cell::Cell;
use std::time::Instant;

/// A source of monotonically non-decreasing timestamps, in seconds
pub trait Clock {
    /// Seconds elapsed since an arbitrary fixed origin
    fn now(&self) -> f64;
}

/// Monotonic wall clock, origin at construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic clock: each read returns `start + k * step` for k = 0, 1, 2, ...
///
/// With `step` equal to the chunk duration this reproduces audio-domain timing.
#[derive(Debug)]
pub struct SteppedClock {
    next: Cell<f64>,
    step: f64,
}

impl SteppedClock {
    /// Create a stepped clock starting at `start` seconds
    pub fn new(start: f64, step: f64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }

    /// Step size in seconds
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Clock for SteppedClock {
    fn now(&self) -> f64 {
        let t = self.next.get();
        self.next.set(t + self.step);
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_clock_sequence() {
        let clock = SteppedClock::new(10.0, 0.5);
        assert_eq!(clock.now(), 10.0);
        assert_eq!(clock.now(), 10.5);
        assert_eq!(clock.now(), 11.0);
        assert_eq!(clock.step(), 0.5);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
