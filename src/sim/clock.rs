//! Round clock: elapsed/remaining time and the difficulty factor
//!
//! Time comes in as timestamps from an injected source. Wall-clock spent
//! paused is subtracted so it never counts toward elapsed time.

/// Difficulty factor for a point in the round: 1.0 at the start, 2.0 at the end
#[inline]
pub fn difficulty_factor(elapsed: f64, duration: f64) -> f64 {
    1.0 + elapsed.clamp(0.0, duration) / duration
}

/// Tracks effective elapsed time for one round
#[derive(Debug, Clone)]
pub struct SimulationClock {
    duration: f64,
    started_at: f64,
    paused_at: Option<f64>,
    paused_total: f64,
    elapsed: f64,
}

impl SimulationClock {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration: f64::from(duration_secs),
            started_at: 0.0,
            paused_at: None,
            paused_total: 0.0,
            elapsed: 0.0,
        }
    }

    /// Reset for a new round starting at `now`
    pub fn start(&mut self, now: f64) {
        self.started_at = now;
        self.paused_at = None;
        self.paused_total = 0.0;
        self.elapsed = 0.0;
    }

    pub fn pause(&mut self, now: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: f64) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += (now - paused_at).max(0.0);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Recompute elapsed time at `now`. Never moves backwards.
    pub fn sample(&mut self, now: f64) -> f64 {
        let effective_now = self.paused_at.unwrap_or(now);
        let elapsed = (effective_now - self.started_at - self.paused_total).max(0.0);
        self.elapsed = self.elapsed.max(elapsed);
        self.elapsed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn remaining(&self) -> f64 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Round time is up
    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn difficulty_factor(&self) -> f64 {
        difficulty_factor(self.elapsed, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_factor_endpoints() {
        assert_eq!(difficulty_factor(0.0, 60.0), 1.0);
        assert_eq!(difficulty_factor(60.0, 60.0), 2.0);
        assert_eq!(difficulty_factor(30.0, 60.0), 1.5);
        assert_eq!(difficulty_factor(90.0, 60.0), 2.0);
        assert_eq!(difficulty_factor(7.0, 7.0), 2.0);
    }

    #[test]
    fn test_elapsed_and_remaining() {
        let mut clock = SimulationClock::new(60);
        clock.start(100.0);
        assert_eq!(clock.sample(100.0), 0.0);
        assert_eq!(clock.sample(115.0), 15.0);
        assert_eq!(clock.remaining(), 45.0);
        assert!(!clock.is_expired());

        clock.sample(160.0);
        assert!(clock.is_expired());
        assert_eq!(clock.remaining(), 0.0);
    }

    #[test]
    fn test_pause_excludes_wall_clock_gap() {
        let mut clock = SimulationClock::new(60);
        clock.start(0.0);
        clock.sample(10.0);

        clock.pause(10.0);
        // Sampling while paused stays frozen
        assert_eq!(clock.sample(500.0), 10.0);
        clock.resume(1_000.0);

        assert_eq!(clock.sample(1_000.0), 10.0);
        assert_eq!(clock.sample(1_005.0), 15.0);
        assert_eq!(clock.difficulty_factor(), 1.25);
        assert!(!clock.is_expired());
    }

    #[test]
    fn test_elapsed_never_rewinds() {
        let mut clock = SimulationClock::new(60);
        clock.start(50.0);
        clock.sample(60.0);
        assert_eq!(clock.sample(55.0), 10.0);
        assert_eq!(clock.sample(0.0), 10.0);
    }

    #[test]
    fn test_restart_resets() {
        let mut clock = SimulationClock::new(10);
        clock.start(0.0);
        clock.sample(20.0);
        assert!(clock.is_expired());

        clock.start(20.0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.difficulty_factor(), 1.0);
        assert!(!clock.is_expired());
    }

    proptest! {
        #[test]
        fn factor_is_non_decreasing(
            duration in 1_u32..600,
            a in 0.0_f64..1_000.0,
            b in 0.0_f64..1_000.0,
        ) {
            let duration = f64::from(duration);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let f_lo = difficulty_factor(lo, duration);
            let f_hi = difficulty_factor(hi, duration);
            prop_assert!(f_lo <= f_hi);
            prop_assert!((1.0..=2.0).contains(&f_lo));
            prop_assert!((1.0..=2.0).contains(&f_hi));
        }

        #[test]
        fn paused_gap_never_counts(gap in 0.0_f64..10_000.0, played in 0.0_f64..30.0) {
            let mut clock = SimulationClock::new(60);
            clock.start(0.0);
            clock.sample(played);
            clock.pause(played);
            clock.resume(played + gap);
            prop_assert!((clock.sample(played + gap) - played).abs() < 1e-9);
        }
    }
}
