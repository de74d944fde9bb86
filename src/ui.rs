//! Text shown around the playfield
//!
//! Pure formatting so the canvas and DOM code only has to place strings.

use crate::sim::{Difficulty, ScoreState, TickResult};

/// In-round heads-up display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: String,
    pub time: String,
    pub lives: String,
    /// Hearts to draw under the lives counter
    pub hearts: u32,
    pub difficulty: String,
}

impl Hud {
    pub fn from_result(result: &TickResult, difficulty: Difficulty) -> Self {
        let remaining = result.remaining_secs.max(0.0).ceil() as u64;
        Self {
            score: format!("Score: {}", result.score.score),
            time: format!("Time: {}s", remaining),
            lives: format!("Lives: {}", result.score.lives),
            hearts: result.score.lives.max(0) as u32,
            difficulty: format!(
                "Difficulty: {} (x{:.1})",
                difficulty, result.difficulty_factor
            ),
        }
    }
}

/// Figures for the game-over screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverSummary {
    pub final_score: i64,
    pub high_score: i64,
    pub apples_caught: u32,
    pub rocks_avoided: u32,
    /// e.g. "Easy (60s)"
    pub difficulty: String,
}

impl GameOverSummary {
    pub fn new(score: &ScoreState, high_score: i64, difficulty: Difficulty, round_secs: u32) -> Self {
        Self {
            final_score: score.score,
            high_score,
            apples_caught: score.apples_caught,
            rocks_avoided: score.rocks_avoided,
            difficulty: format!("{} ({}s)", difficulty, round_secs),
        }
    }
}
