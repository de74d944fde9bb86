//! Platform abstraction layer
//!
//! Time sources for the simulation. The round clock only ever sees
//! timestamps, so play uses the platform's monotonic clock and tests or
//! headless runs drive a [`ManualClock`] by hand.

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic timestamps in seconds
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// The platform's monotonic clock
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// `performance.now()`, falling back to `Date.now()` without a window
    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
            / 1000.0
    }
}

/// Hand-driven clock. Clones share the same time, so a driver can keep one
/// handle and give another to the simulation.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let driver = ManualClock::new(5.0);
        let sim = driver.clone();
        driver.advance(1.5);
        assert_eq!(sim.now(), 6.5);
        driver.set(100.0);
        assert_eq!(sim.now(), 100.0);
    }

    #[test]
    fn test_monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
