//! Catch the Falling Objects - a canvas arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (spawning, falling, collisions, scoring, round flow)
//! - `platform`: Time sources (monotonic in play, manual in tests)
//! - `persistence`: Key-value storage backends for the high score
//! - `renderer`: Canvas 2D drawing (wasm only)
//! - `audio`: Feedback sounds

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::SimError;
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Basket defaults - the basket slides along a fixed line near the ground
    pub const BASKET_WIDTH: f32 = 100.0;
    pub const BASKET_HEIGHT: f32 = 50.0;
    pub const BASKET_Y: f32 = FIELD_HEIGHT - 50.0;

    /// Radius shared by apples, rocks and bombs
    pub const OBJECT_RADIUS: f32 = 20.0;

    /// Round defaults
    pub const INITIAL_LIVES: i32 = 3;
    pub const DEFAULT_ROUND_SECS: u32 = 60;

    /// Largest frame delta fed to the simulation (first frame, tab switches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scoring
    pub const APPLE_POINTS: i64 = 10;
    pub const ROCK_PENALTY: i64 = 5;

    /// Spawn mix as cumulative thresholds against a uniform [0, 1) draw
    pub const APPLE_THRESHOLD: f64 = 0.70;
    pub const ROCK_THRESHOLD: f64 = 0.90;
}
