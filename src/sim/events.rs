//! Outcome and feedback events
//!
//! Outcomes flow from collision resolution into the score ledger. Feedback
//! flows out of the core to the presentation layer, which turns it into
//! sounds and visual cues.

use serde::{Deserialize, Serialize};

use super::state::ObjectKind;

/// How a falling object left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Overlapped the basket
    Captured,
    /// Fell past the bottom of the field
    Exited,
}

/// A resolved object, produced at most once per object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub object: ObjectKind,
}

impl Outcome {
    pub fn captured(object: ObjectKind) -> Self {
        Self {
            kind: OutcomeKind::Captured,
            object,
        }
    }

    pub fn exited(object: ObjectKind) -> Self {
        Self {
            kind: OutcomeKind::Exited,
            object,
        }
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    LivesExhausted,
}

/// Discrete cues for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    CatchApple,
    CatchRock,
    CatchBomb,
    MissApple,
    RoundOver {
        reason: EndReason,
        new_high_score: bool,
    },
}
