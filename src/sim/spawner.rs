//! Spawning: decides when a new object drops and what it is

use rand::Rng;

use super::state::{DifficultyProfile, FallingObject, ObjectKind};
use crate::consts::{FIELD_WIDTH, OBJECT_RADIUS};

/// Uniform random draws in [0, 1)
///
/// Every `rand::Rng` is a source, so tests can hand in a seeded `Pcg32`
/// or a scripted sequence.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Map a unit draw onto [lo, hi]
#[inline]
fn lerp(lo: f32, hi: f32, t: f64) -> f32 {
    lo + (hi - lo) * t as f32
}

/// Emits at most one object per tick once the spawn interval has passed
#[derive(Debug, Clone)]
pub struct RandomSpawner {
    profile: DifficultyProfile,
    since_last_spawn: f64,
}

impl RandomSpawner {
    pub fn new(profile: DifficultyProfile) -> Self {
        Self {
            profile,
            since_last_spawn: 0.0,
        }
    }

    /// Reset for a new round
    pub fn reset(&mut self, profile: DifficultyProfile) {
        self.profile = profile;
        self.since_last_spawn = 0.0;
    }

    pub fn profile(&self) -> DifficultyProfile {
        self.profile
    }

    /// Seconds between spawns at the given difficulty factor
    pub fn interval(&self, factor: f64) -> f64 {
        f64::from(self.profile.base_spawn_interval_secs) / factor
    }

    /// Accumulate `elapsed_delta` seconds of round time and spawn if due
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        elapsed_delta: f64,
        factor: f64,
        rng: &mut R,
    ) -> Option<FallingObject> {
        self.since_last_spawn += elapsed_delta.max(0.0);
        if self.since_last_spawn > self.interval(factor) {
            self.since_last_spawn = 0.0;
            Some(self.spawn(factor, rng))
        } else {
            None
        }
    }

    /// Draw kind, column and speed for a new object
    pub fn spawn<R: RandomSource + ?Sized>(&self, factor: f64, rng: &mut R) -> FallingObject {
        let kind = ObjectKind::from_unit(rng.next_unit());
        let x = lerp(OBJECT_RADIUS, FIELD_WIDTH - OBJECT_RADIUS, rng.next_unit());

        let factor = factor as f32;
        let min_speed = self.profile.min_speed * factor;
        let max_speed = self.profile.max_speed * factor;
        let speed = lerp(min_speed, max_speed, rng.next_unit());

        log::debug!("Spawned {:?} at x={:.0} speed={:.0}", kind, x, speed);
        FallingObject::new(kind, x, speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Replays a fixed list of draws, cycling
    struct Scripted(Vec<f64>, usize);

    impl RandomSource for Scripted {
        fn next_unit(&mut self) -> f64 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    #[test]
    fn test_waits_for_interval() {
        let mut spawner = RandomSpawner::new(Difficulty::Easy.profile());
        let mut rng = Pcg32::seed_from_u64(1);

        // Easy spawns every 1.5s at factor 1.0
        assert!(spawner.update(1.0, 1.0, &mut rng).is_none());
        assert!(spawner.update(0.5, 1.0, &mut rng).is_none());
        assert!(spawner.update(0.01, 1.0, &mut rng).is_some());
        // Accumulator reset after a spawn
        assert!(spawner.update(0.5, 1.0, &mut rng).is_none());
    }

    #[test]
    fn test_interval_shrinks_with_factor() {
        let spawner = RandomSpawner::new(Difficulty::Medium.profile());
        assert_eq!(spawner.interval(1.0), 1.0);
        assert_eq!(spawner.interval(2.0), 0.5);

        let mut spawner = spawner;
        let mut rng = Pcg32::seed_from_u64(2);
        assert!(spawner.update(0.6, 2.0, &mut rng).is_some());
    }

    #[test]
    fn test_one_spawn_per_update() {
        let mut spawner = RandomSpawner::new(Difficulty::Hard.profile());
        let mut rng = Pcg32::seed_from_u64(3);
        // A huge gap still yields a single object
        assert!(spawner.update(30.0, 1.0, &mut rng).is_some());
        assert!(spawner.update(0.0, 1.0, &mut rng).is_none());
    }

    #[test]
    fn test_scripted_draws() {
        let spawner = RandomSpawner::new(Difficulty::Easy.profile());
        let mut rng = Scripted(vec![0.95, 0.0, 1.0 - f64::EPSILON], 0);
        let obj = spawner.spawn(2.0, &mut rng);
        assert_eq!(obj.kind, ObjectKind::Bomb);
        assert_eq!(obj.pos.x, OBJECT_RADIUS);
        assert_eq!(obj.pos.y, -OBJECT_RADIUS);
        assert!((obj.speed - 400.0).abs() < 1e-3);

        let mut rng = Scripted(vec![0.75, 0.5, 0.0], 0);
        let obj = spawner.spawn(1.0, &mut rng);
        assert_eq!(obj.kind, ObjectKind::Rock);
        assert_eq!(obj.pos.x, FIELD_WIDTH / 2.0);
        assert_eq!(obj.speed, 100.0);
    }

    #[test]
    fn test_spawn_ranges() {
        let spawner = RandomSpawner::new(Difficulty::Medium.profile());
        let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
        for factor in [1.0, 1.37, 2.0] {
            let f = factor as f32;
            for _ in 0..2_000 {
                let obj = spawner.spawn(factor, &mut rng);
                assert!(obj.pos.x >= OBJECT_RADIUS && obj.pos.x <= FIELD_WIDTH - OBJECT_RADIUS);
                assert!(obj.speed >= 150.0 * f - 1e-3 && obj.speed <= 250.0 * f + 1e-3);
            }
        }
    }

    #[test]
    fn test_kind_distribution() {
        let spawner = RandomSpawner::new(Difficulty::Easy.profile());
        let mut rng = Pcg32::from_os_rng();
        let n = 100_000;
        let mut counts = [0_u32; 3];
        for _ in 0..n {
            match spawner.spawn(1.0, &mut rng).kind {
                ObjectKind::Apple => counts[0] += 1,
                ObjectKind::Rock => counts[1] += 1,
                ObjectKind::Bomb => counts[2] += 1,
            }
        }
        // ~7 standard deviations of slack at n = 100k
        let expected = [0.70, 0.20, 0.10];
        for (count, p) in counts.iter().zip(expected) {
            let share = f64::from(*count) / f64::from(n);
            assert!((share - p).abs() < 0.01, "share {share} vs {p}");
        }
    }
}
