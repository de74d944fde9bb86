//! Round state and core simulation types

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundState {
    /// Main menu, no round in progress
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Round frozen, clock stopped
    Paused,
    /// Round ended, results frozen for display
    GameOver,
}

impl RoundState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundState::Menu => "in menu",
            RoundState::Playing => "playing",
            RoundState::Paused => "paused",
            RoundState::GameOver => "game over",
        }
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of thing is falling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Catch it: +10
    Apple,
    /// Avoid it: -5 when caught
    Rock,
    /// Avoid it: costs a life when caught
    Bomb,
}

impl ObjectKind {
    /// Pick a kind from a uniform [0, 1) draw (70% apple, 20% rock, 10% bomb)
    pub fn from_unit(roll: f64) -> Self {
        if roll < APPLE_THRESHOLD {
            ObjectKind::Apple
        } else if roll < ROCK_THRESHOLD {
            ObjectKind::Rock
        } else {
            ObjectKind::Bomb
        }
    }
}

/// A falling object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    /// Center position in field coordinates (y grows downward)
    pub pos: Vec2,
    /// Fall speed in units per second
    pub speed: f32,
    pub kind: ObjectKind,
    pub radius: f32,
}

impl FallingObject {
    pub fn new(kind: ObjectKind, x: f32, speed: f32) -> Self {
        Self {
            // Start just above the visible field
            pos: Vec2::new(x, -OBJECT_RADIUS),
            speed,
            kind,
            radius: OBJECT_RADIUS,
        }
    }

    /// Move down by one frame's worth of travel
    pub fn fall(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// The player's basket. Only `center_x` moves, driven by pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Basket {
    fn default() -> Self {
        Self::at(FIELD_WIDTH / 2.0)
    }
}

impl Basket {
    /// Basket of the standard size centered at `center_x` on the basket line
    pub fn at(center_x: f32) -> Self {
        Self {
            center_x,
            center_y: BASKET_Y,
            width: BASKET_WIDTH,
            height: BASKET_HEIGHT,
        }
    }

    pub fn left(&self) -> f32 {
        self.center_x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center_x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.center_y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center_y + self.height / 2.0
    }
}

/// Spawn cadence and fall-speed range for a difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Seconds between spawns at difficulty factor 1.0
    pub base_spawn_interval_secs: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

/// Difficulty presets selectable from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                base_spawn_interval_secs: 1.5,
                min_speed: 100.0,
                max_speed: 200.0,
            },
            Difficulty::Medium => DifficultyProfile {
                base_spawn_interval_secs: 1.0,
                min_speed: 150.0,
                max_speed: 250.0,
            },
            Difficulty::Hard => DifficultyProfile {
                base_spawn_interval_secs: 0.7,
                min_speed: 200.0,
                max_speed: 300.0,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score, lives and counters for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Unbounded, goes negative after enough rocks
    pub score: i64,
    pub lives: i32,
    pub apples_caught: u32,
    pub rocks_avoided: u32,
}

impl ScoreState {
    pub fn new(lives: i32) -> Self {
        Self {
            score: 0,
            lives,
            apples_caught: 0,
            rocks_avoided: 0,
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(INITIAL_LIVES)
    }
}
