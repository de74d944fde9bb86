//! Round controller: the state machine and the per-frame tick
//!
//! One tick per rendered frame, variable dt. Each tick, in order: expiry
//! check, spawn, fall, resolve collisions, score, lives check.

use std::ops::ControlFlow;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::SimulationClock;
use super::collision::CollisionResolver;
use super::events::{EndReason, Feedback};
use super::ledger::ScoreLedger;
use super::registry::ObjectRegistry;
use super::spawner::{RandomSource, RandomSpawner};
use super::state::{Basket, Difficulty, FallingObject, RoundState, ScoreState};
use crate::consts::*;
use crate::error::SimError;
use crate::highscores::HighScore;
use crate::platform::{MonotonicClock, TimeSource};

/// Per-round settings, fixed while a round runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    pub round_secs: u32,
    pub initial_lives: i32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_secs: DEFAULT_ROUND_SECS,
            initial_lives: INITIAL_LIVES,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.round_secs == 0 {
            return Err(SimError::InvalidDuration {
                secs: self.round_secs,
            });
        }
        if self.initial_lives <= 0 {
            return Err(SimError::InvalidLives {
                lives: self.initial_lives,
            });
        }
        Ok(())
    }
}

/// Everything the presentation layer needs after a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub state: RoundState,
    pub score: ScoreState,
    /// Cues raised this tick, in the order they happened
    pub feedback: Vec<Feedback>,
    /// Live objects, for drawing
    pub objects: Vec<FallingObject>,
    pub remaining_secs: f64,
    pub difficulty_factor: f64,
}

/// Owns a round's state and drives it frame by frame
pub struct RoundController<C: TimeSource = MonotonicClock, R: RandomSource = Pcg32> {
    config: RoundConfig,
    time: C,
    rng: R,
    state: RoundState,
    difficulty: Difficulty,
    basket: Basket,
    clock: SimulationClock,
    spawner: RandomSpawner,
    registry: ObjectRegistry,
    resolver: CollisionResolver,
    ledger: ScoreLedger,
    high_score: HighScore,
}

impl RoundController {
    /// Controller on the platform clock with an unseeded RNG
    pub fn unseeded(config: RoundConfig, high_score: HighScore) -> Result<Self, SimError> {
        Self::new(config, MonotonicClock::new(), Pcg32::from_os_rng(), high_score)
    }
}

impl<C: TimeSource, R: RandomSource> RoundController<C, R> {
    pub fn new(
        config: RoundConfig,
        time: C,
        rng: R,
        high_score: HighScore,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let difficulty = Difficulty::default();
        Ok(Self {
            config,
            time,
            rng,
            state: RoundState::Menu,
            difficulty,
            basket: Basket::default(),
            clock: SimulationClock::new(config.round_secs),
            spawner: RandomSpawner::new(difficulty.profile()),
            registry: ObjectRegistry::new(),
            resolver: CollisionResolver::new(FIELD_HEIGHT),
            ledger: ScoreLedger::new(config.initial_lives),
            high_score,
        })
    }

    /// Change duration/lives for the next round
    pub fn set_config(&mut self, config: RoundConfig) -> Result<(), SimError> {
        if matches!(self.state, RoundState::Playing | RoundState::Paused) {
            return Err(self.invalid("reconfigure"));
        }
        config.validate()?;
        self.config = config;
        self.ledger.set_initial_lives(config.initial_lives);
        Ok(())
    }

    // === Transitions ===

    /// Menu/GameOver -> Playing with a fresh round
    pub fn start(&mut self, difficulty: Difficulty) -> Result<(), SimError> {
        if !matches!(self.state, RoundState::Menu | RoundState::GameOver) {
            return Err(self.invalid("start"));
        }

        self.difficulty = difficulty;
        self.ledger.reset();
        self.registry.clear();
        self.spawner.reset(difficulty.profile());
        self.clock = SimulationClock::new(self.config.round_secs);
        self.clock.start(self.time.now());
        self.state = RoundState::Playing;

        log::info!(
            "Round started: {} for {}s with {} lives",
            difficulty,
            self.config.round_secs,
            self.config.initial_lives
        );
        Ok(())
    }

    /// Playing -> Paused. The clock stops until `resume`.
    pub fn pause(&mut self) -> Result<(), SimError> {
        if self.state != RoundState::Playing {
            return Err(self.invalid("pause"));
        }
        self.clock.pause(self.time.now());
        self.state = RoundState::Paused;
        log::info!("Paused at {:.1}s", self.clock.elapsed());
        Ok(())
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> Result<(), SimError> {
        if self.state != RoundState::Paused {
            return Err(self.invalid("resume"));
        }
        self.clock.resume(self.time.now());
        self.state = RoundState::Playing;
        log::info!("Resumed");
        Ok(())
    }

    /// Back to the menu, dropping the round in progress. The high score is
    /// left as last committed.
    pub fn quit(&mut self) -> Result<(), SimError> {
        if self.state == RoundState::Menu {
            return Err(self.invalid("quit"));
        }
        self.registry.clear();
        self.ledger.reset();
        self.clock = SimulationClock::new(self.config.round_secs);
        self.state = RoundState::Menu;
        log::info!("Quit to menu");
        Ok(())
    }

    // === Simulation ===

    /// Tick against the injected time source
    pub fn step(&mut self, dt: f32, basket_x: f32) -> Result<TickResult, SimError> {
        let now = self.time.now();
        self.tick(dt, now, basket_x)
    }

    /// Advance the round by one frame.
    ///
    /// `dt` is the frame delta in seconds, `now` a timestamp from the same
    /// source the controller was built with, `basket_x` the basket center.
    pub fn tick(&mut self, dt: f32, now: f64, basket_x: f32) -> Result<TickResult, SimError> {
        if self.state != RoundState::Playing {
            return Err(SimError::NotPlaying { state: self.state });
        }

        let dt = clamp_frame_dt(dt);
        self.basket = Basket::at(basket_x);
        let mut feedback = Vec::new();

        let previous = self.clock.elapsed();
        self.clock.sample(now);
        if self.clock.is_expired() {
            self.finish(EndReason::TimeUp, &mut feedback);
            return Ok(self.result(feedback));
        }

        let factor = self.clock.difficulty_factor();
        if let Some(object) =
            self.spawner
                .update(self.clock.elapsed() - previous, factor, &mut self.rng)
        {
            self.registry.insert(object);
        }

        self.registry.advance(dt);

        let ledger = &mut self.ledger;
        let flow = self
            .resolver
            .resolve(&mut self.registry, &self.basket, |outcome| {
                if let Some(cue) = ledger.apply(outcome) {
                    feedback.push(cue);
                }
                if ledger.lives_exhausted() {
                    ControlFlow::Break(EndReason::LivesExhausted)
                } else {
                    ControlFlow::Continue(())
                }
            });

        if let ControlFlow::Break(reason) = flow {
            self.finish(reason, &mut feedback);
        }

        Ok(self.result(feedback))
    }

    /// Current state without advancing (for drawing while paused/over)
    pub fn snapshot(&self) -> TickResult {
        self.result(Vec::new())
    }

    fn finish(&mut self, reason: EndReason, feedback: &mut Vec<Feedback>) {
        self.state = RoundState::GameOver;
        let score = self.ledger.state().score;
        let new_high_score = self.high_score.commit(score);
        feedback.push(Feedback::RoundOver {
            reason,
            new_high_score,
        });
        log::info!(
            "Round over ({:?}): score {}, best {}",
            reason,
            score,
            self.high_score.best()
        );
    }

    fn result(&self, feedback: Vec<Feedback>) -> TickResult {
        TickResult {
            state: self.state,
            score: self.ledger.state(),
            feedback,
            objects: self.registry.as_slice().to_vec(),
            remaining_secs: self.clock.remaining(),
            difficulty_factor: self.clock.difficulty_factor(),
        }
    }

    fn invalid(&self, action: &'static str) -> SimError {
        SimError::InvalidTransition {
            from: self.state,
            action,
        }
    }

    // === Queries ===

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn score(&self) -> ScoreState {
        self.ledger.state()
    }

    pub fn objects(&self) -> &[FallingObject] {
        self.registry.as_slice()
    }

    pub fn basket(&self) -> Basket {
        self.basket
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> RoundConfig {
        self.config
    }

    pub fn difficulty_factor(&self) -> f64 {
        self.clock.difficulty_factor()
    }

    pub fn remaining_secs(&self) -> f64 {
        self.clock.remaining()
    }

    pub fn high_score(&self) -> i64 {
        self.high_score.best()
    }
}

/// Keep frame deltas sane: no negatives, no huge first-frame jumps
fn clamp_frame_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        0.0
    } else if dt > MAX_FRAME_DT {
        log::warn!("Frame delta {:.3}s clamped to {}s", dt, MAX_FRAME_DT);
        MAX_FRAME_DT
    } else {
        dt
    }
}
