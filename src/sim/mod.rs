//! Simulation core
//!
//! All gameplay logic lives here. Nothing in this module touches the DOM,
//! the canvas or audio:
//! - Time comes in through [`crate::platform::TimeSource`]
//! - Randomness comes in through [`RandomSource`]
//! - Results go out as a [`TickResult`] with [`Feedback`] cues

pub mod clock;
pub mod collision;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{SimulationClock, difficulty_factor};
pub use collision::{CollisionResolver, captures, exits};
pub use events::{EndReason, Feedback, Outcome, OutcomeKind};
pub use ledger::ScoreLedger;
pub use registry::ObjectRegistry;
pub use spawner::{RandomSource, RandomSpawner};
pub use state::{
    Basket, Difficulty, DifficultyProfile, FallingObject, ObjectKind, RoundState, ScoreState,
};
pub use tick::{RoundConfig, RoundController, TickResult};
