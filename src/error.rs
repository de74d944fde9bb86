//! Invalid-usage errors raised by the simulation core
//!
//! The core does no I/O, so every error here is a bug in the caller:
//! ticking outside a round, an illegal state transition, or a bad config.

use crate::sim::RoundState;

/// Errors returned by [`crate::sim::RoundController`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// `tick` called while the round is not running.
    #[error("tick called while {state}")]
    NotPlaying { state: RoundState },

    /// A transition that the round state machine does not allow.
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: RoundState,
        action: &'static str,
    },

    /// Round duration must be at least one second.
    #[error("round duration must be positive, got {secs}s")]
    InvalidDuration { secs: u32 },

    /// Rounds must start with at least one life.
    #[error("initial lives must be positive, got {lives}")]
    InvalidLives { lives: i32 },
}
