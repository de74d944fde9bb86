//! Player preferences
//!
//! Read-only: the menu edits them in memory and the native binary reads them
//! from a JSON file, but they are never written back.

use serde::Deserialize;

use crate::audio::Music;
use crate::consts::{DEFAULT_ROUND_SECS, INITIAL_LIVES};
use crate::sim::{Difficulty, RoundConfig};

/// Shortest and longest round the menu slider offers
pub const MIN_ROUND_SECS: u32 = 10;
pub const MAX_ROUND_SECS: u32 = 300;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Round length in seconds
    pub round_secs: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0), applies to effects and music
    pub master_volume: f32,
    pub muted: bool,
    pub music: Music,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            round_secs: DEFAULT_ROUND_SECS,
            master_volume: 0.8,
            muted: false,
            music: Music::default(),
        }
    }
}

impl Settings {
    /// Environment variable naming a settings file (native)
    pub const ENV_VAR: &'static str = "CATCH_FALLING_SETTINGS";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Round length clamped to the slider range
    pub fn set_round_secs(&mut self, secs: u32) {
        self.round_secs = secs.clamp(MIN_ROUND_SECS, MAX_ROUND_SECS);
    }

    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            round_secs: self.round_secs,
            initial_lives: INITIAL_LIVES,
        }
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Output gain (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Load from the file named by `CATCH_FALLING_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring bad settings file {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// The page's menu controls own the settings on the web
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.difficulty, Difficulty::Easy);
        assert_eq!(s.round_config(), RoundConfig::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "difficulty": "Hard", "round_secs": 90 }"#).unwrap();
        assert_eq!(s.difficulty, Difficulty::Hard);
        assert_eq!(s.round_config().round_secs, 90);
        assert_eq!(s.master_volume, Settings::default().master_volume);

        let empty = Settings::from_json("{}").unwrap();
        assert_eq!(empty, Settings::default());
    }

    #[test]
    fn test_bad_json() {
        assert!(Settings::from_json("{ \"round_secs\": -3 }").is_err());
        assert!(Settings::from_json("nope").is_err());
    }

    #[test]
    fn test_round_secs_clamped() {
        let mut s = Settings::default();
        s.set_round_secs(0);
        assert_eq!(s.round_secs, MIN_ROUND_SECS);
        s.set_round_secs(10_000);
        assert_eq!(s.round_secs, MAX_ROUND_SECS);
        s.set_round_secs(45);
        assert_eq!(s.round_secs, 45);
    }

    #[test]
    fn test_music_setting() {
        assert_eq!(Settings::default().music, Music::Track1);
        let s = Settings::from_json(r#"{ "music": "Track3" }"#).unwrap();
        assert_eq!(s.music, Music::Track3);
        let s = Settings::from_json(r#"{ "music": "None" }"#).unwrap();
        assert_eq!(s.music.track(), None);
    }

    #[test]
    fn test_master_volume_clamped() {
        let mut s = Settings::default();
        s.set_master_volume(1.7);
        assert_eq!(s.master_volume, 1.0);
        s.set_master_volume(-0.2);
        assert_eq!(s.master_volume, 0.0);
        s.set_master_volume(0.35);
        assert_eq!(s.master_volume, 0.35);
    }

    #[test]
    fn test_mute_toggle_silences_output() {
        let mut s = Settings {
            master_volume: 0.5,
            ..Default::default()
        };
        assert_eq!(s.effective_volume(), 0.5);
        s.toggle_mute();
        assert!(s.muted);
        assert_eq!(s.effective_volume(), 0.0);
        s.toggle_mute();
        assert_eq!(s.effective_volume(), 0.5);

        // Out-of-range values from a hand-edited file still come out bounded
        let loud = Settings::from_json(r#"{ "master_volume": 3.0 }"#).unwrap();
        assert_eq!(loud.effective_volume(), 1.0);
    }
}
