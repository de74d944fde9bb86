//! Feedback sounds and background music
//!
//! `SoundEffect`, its tone table and the music tracks are plain data so the
//! feedback mapping and note sequencing can be tested natively. The Web Audio
//! synth that plays them only exists on wasm.

use serde::Deserialize;

use crate::sim::Feedback;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Apple caught
    Catch,
    /// Rock caught
    BadCatch,
    /// Bomb caught
    Bomb,
    /// Apple hit the ground
    Miss,
    /// Round over
    GameOver,
    /// Round over with a new high score
    HighScore,
}

/// A single sine blip: pitch, length and relative loudness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub secs: f64,
    pub gain: f32,
}

impl SoundEffect {
    /// The sound for a feedback cue
    pub fn for_feedback(feedback: &Feedback) -> Self {
        match feedback {
            Feedback::CatchApple => SoundEffect::Catch,
            Feedback::CatchRock => SoundEffect::BadCatch,
            Feedback::CatchBomb => SoundEffect::Bomb,
            Feedback::MissApple => SoundEffect::Miss,
            Feedback::RoundOver {
                new_high_score: true,
                ..
            } => SoundEffect::HighScore,
            Feedback::RoundOver { .. } => SoundEffect::GameOver,
        }
    }

    /// Base tone. `HighScore` plays an arpeggio on top of this.
    pub fn tone(&self) -> Tone {
        let (freq, secs, gain) = match self {
            SoundEffect::Catch => (600.0, 0.15, 0.8),
            SoundEffect::Miss => (200.0, 0.2, 0.5),
            SoundEffect::BadCatch => (300.0, 0.3, 0.7),
            SoundEffect::Bomb => (100.0, 0.4, 0.9),
            SoundEffect::GameOver | SoundEffect::HighScore => (150.0, 1.0, 0.8),
        };
        Tone { freq, secs, gain }
    }
}

/// Background music choice from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Music {
    #[default]
    Track1,
    Track2,
    Track3,
    None,
}

impl Music {
    pub const ALL: [Music; 4] = [Music::Track1, Music::Track2, Music::Track3, Music::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Music::Track1 => "music1",
            Music::Track2 => "music2",
            Music::Track3 => "music3",
            Music::None => "no-music",
        }
    }

    /// Menu button for this choice
    pub fn button_id(&self) -> String {
        format!("{}-button", self.as_str())
    }

    pub fn track(&self) -> Option<MusicTrack> {
        match self {
            Music::Track1 => Some(MusicTrack::TRACK1),
            Music::Track2 => Some(MusicTrack::TRACK2),
            Music::Track3 => Some(MusicTrack::TRACK3),
            Music::None => None,
        }
    }
}

/// A looping melody over a stepping bass line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicTrack {
    melody: &'static [f32],
    /// Melody notes per second
    tempo: f64,
    /// Melody drops an octave for the first quarter of every second
    octave_dips: bool,
    bass_root: f32,
    /// Bass walks root, 2x root, ... up to this many steps
    bass_steps: u32,
    /// Bass steps per second
    bass_tempo: f64,
}

/// One stretch of constant pitch, in track seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicNote {
    pub start: f64,
    pub secs: f64,
    pub melody: f32,
    pub bass: f32,
}

impl MusicTrack {
    /// Every track repeats after this long
    pub const LOOP_SECS: f64 = 10.0;

    /// C major scale
    pub const TRACK1: MusicTrack = MusicTrack {
        melody: &[261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88, 523.25],
        tempo: 2.0,
        octave_dips: true,
        bass_root: 65.41,
        bass_steps: 3,
        bass_tempo: 0.5,
    };

    /// A major-ish scale, slower
    pub const TRACK2: MusicTrack = MusicTrack {
        melody: &[440.00, 493.88, 523.25, 587.33, 659.25, 698.46, 783.99, 880.00],
        tempo: 1.5,
        octave_dips: false,
        bass_root: 110.0,
        bass_steps: 3,
        bass_tempo: 0.7,
    };

    /// C major arpeggio, faster
    pub const TRACK3: MusicTrack = MusicTrack {
        melody: &[261.63, 329.63, 392.00, 523.25],
        tempo: 3.0,
        octave_dips: false,
        bass_root: 65.41,
        bass_steps: 2,
        bass_tempo: 1.0,
    };

    pub fn melody_at(&self, t: f64) -> f32 {
        let t = t.rem_euclid(Self::LOOP_SECS);
        let freq = self.melody[(t * self.tempo) as usize % self.melody.len()];
        if self.octave_dips && (t * 4.0) as u64 % 4 == 0 {
            freq * 0.5
        } else {
            freq
        }
    }

    pub fn bass_at(&self, t: f64) -> f32 {
        let t = t.rem_euclid(Self::LOOP_SECS);
        let step = (t * self.bass_tempo) as u32 % self.bass_steps;
        self.bass_root * (1 + step) as f32
    }

    /// Notes covering `[from, to)`, split wherever melody or bass changes
    pub fn notes(&self, from: f64, to: f64) -> Vec<MusicNote> {
        if to <= from {
            return Vec::new();
        }

        let mut cuts = vec![from, to];
        let mut rates = vec![self.tempo, self.bass_tempo, 1.0 / Self::LOOP_SECS];
        if self.octave_dips {
            rates.push(4.0);
        }
        for rate in rates {
            let mut k = (from * rate).floor() + 1.0;
            while k / rate < to {
                cuts.push(k / rate);
                k += 1.0;
            }
        }
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

        cuts.windows(2)
            .map(|w| {
                // Sample mid-note so float error at the cut can't pick a neighbour
                let mid = (w[0] + w[1]) / 2.0;
                MusicNote {
                    start: w[0],
                    secs: w[1] - w[0],
                    melody: self.melody_at(mid),
                    bass: self.bass_at(mid),
                }
            })
            .collect()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

    use super::{Music, MusicTrack, SoundEffect, Tone};
    use crate::settings::Settings;

    /// Seconds of music kept scheduled ahead of the audio clock
    const MUSIC_LOOKAHEAD: f64 = 1.0;
    /// Music level relative to effects
    const MUSIC_LEVEL: f32 = 0.4;

    /// A playing (or paused) music loop
    struct MusicState {
        track: MusicTrack,
        /// Audio-clock time of track time 0
        origin: f64,
        /// Track time scheduled so far
        scheduled_until: f64,
        /// Track time the loop was paused at
        paused_at: Option<f64>,
        /// Live oscillators and their audio-clock end times
        nodes: Vec<(OscillatorNode, f64)>,
    }

    impl MusicState {
        fn silence(&mut self) {
            for (osc, _) in self.nodes.drain(..) {
                osc.stop().ok();
            }
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Bus every music oscillator feeds, so volume changes apply at once
        music_bus: Option<GainNode>,
        volume: f32,
        music: Option<MusicState>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    fn create_osc(
        ctx: &AudioContext,
        dest: &AudioNode,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(dest).ok()?;

        Some((osc, gain))
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let music_bus = ctx.as_ref().and_then(|ctx| {
                let bus = ctx.create_gain().ok()?;
                bus.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(bus)
            });
            let mut manager = Self {
                ctx,
                music_bus,
                volume: 0.0,
                music: None,
            };
            manager.apply_settings(&Settings::default());
            manager
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Pick up volume and mute from the current settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
            if let Some(bus) = &self.music_bus {
                bus.gain().set_value(self.volume * MUSIC_LEVEL);
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Bomb => self.play_bomb(ctx),
                SoundEffect::GameOver => self.play_game_over(ctx),
                SoundEffect::HighScore => self.play_high_score(ctx),
                other => self.play_tone(ctx, other.tone(), OscillatorType::Sine, 0.0),
            }
        }

        // === Music ===

        /// Start `music` from the top, replacing whatever was playing
        pub fn start_music(&mut self, music: Music) {
            self.stop_music();
            let (Some(ctx), Some(track)) = (&self.ctx, music.track()) else {
                return;
            };
            self.music = Some(MusicState {
                track,
                origin: ctx.current_time(),
                scheduled_until: 0.0,
                paused_at: None,
                nodes: Vec::new(),
            });
            log::info!("Music: {}", music.as_str());
            self.update_music();
        }

        pub fn stop_music(&mut self) {
            if let Some(mut state) = self.music.take() {
                state.silence();
            }
        }

        /// Silence the loop but remember where it was
        pub fn pause_music(&mut self) {
            let (Some(ctx), Some(state)) = (&self.ctx, self.music.as_mut()) else {
                return;
            };
            if state.paused_at.is_none() {
                state.paused_at = Some(ctx.current_time() - state.origin);
                state.silence();
            }
        }

        pub fn resume_music(&mut self) {
            let (Some(ctx), Some(state)) = (&self.ctx, self.music.as_mut()) else {
                return;
            };
            if let Some(at) = state.paused_at.take() {
                state.origin = ctx.current_time() - at;
                state.scheduled_until = at;
            }
            self.update_music();
        }

        /// Keep the loop scheduled ahead of the audio clock. Call every frame.
        pub fn update_music(&mut self) {
            let (Some(ctx), Some(bus), Some(state)) =
                (&self.ctx, &self.music_bus, self.music.as_mut())
            else {
                return;
            };
            if state.paused_at.is_some() {
                return;
            }

            let now = ctx.current_time();
            state.nodes.retain(|(_, end)| *end > now);

            let track_now = now - state.origin;
            if state.scheduled_until >= track_now + MUSIC_LOOKAHEAD / 2.0 {
                return;
            }
            let from = state.scheduled_until.max(track_now);
            let to = track_now + MUSIC_LOOKAHEAD;
            for note in state.track.notes(from, to) {
                let start = state.origin + note.start;
                let end = start + note.secs;
                for (freq, level) in [(note.melody, 0.3), (note.bass, 0.15)] {
                    let Some((osc, gain)) = create_osc(ctx, bus, freq, OscillatorType::Sine) else {
                        continue;
                    };
                    // Short ramps at both ends to keep note changes click-free
                    let edge = (note.secs / 4.0).min(0.01);
                    gain.gain().set_value_at_time(0.0, start).ok();
                    gain.gain().linear_ramp_to_value_at_time(level, start + edge).ok();
                    gain.gain().set_value_at_time(level, end - edge).ok();
                    gain.gain().linear_ramp_to_value_at_time(0.0, end).ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(end).ok();
                    state.nodes.push((osc, end));
                }
            }
            state.scheduled_until = to;
        }

        // === Effects ===

        /// One enveloped blip starting `delay` seconds from now
        fn play_tone(&self, ctx: &AudioContext, tone: Tone, osc_type: OscillatorType, delay: f64) {
            let Some((osc, gain)) = create_osc(ctx, &ctx.destination(), tone.freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(self.volume * tone.gain * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.secs)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.secs + 0.05).ok();
        }

        /// Bomb - low boom with a falling pitch
        fn play_bomb(&self, ctx: &AudioContext) {
            let tone = SoundEffect::Bomb.tone();
            let Some((osc, gain)) =
                create_osc(ctx, &ctx.destination(), tone.freq, OscillatorType::Sawtooth)
            else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(self.volume * tone.gain * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.secs)
                .ok();
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + tone.secs)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + tone.secs + 0.1).ok();
        }

        /// Game over - long low drone
        fn play_game_over(&self, ctx: &AudioContext) {
            self.play_tone(ctx, SoundEffect::GameOver.tone(), OscillatorType::Sine, 0.0);
        }

        /// High score - the game over drone, then a rising arpeggio
        fn play_high_score(&self, ctx: &AudioContext) {
            self.play_game_over(ctx);
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let tone = Tone {
                    freq: *freq,
                    secs: 0.25,
                    gain: 0.5,
                };
                self.play_tone(ctx, tone, OscillatorType::Triangle, 0.3 + i as f64 * 0.08);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EndReason;

    #[test]
    fn test_feedback_mapping() {
        assert_eq!(SoundEffect::for_feedback(&Feedback::CatchApple), SoundEffect::Catch);
        assert_eq!(SoundEffect::for_feedback(&Feedback::CatchRock), SoundEffect::BadCatch);
        assert_eq!(SoundEffect::for_feedback(&Feedback::CatchBomb), SoundEffect::Bomb);
        assert_eq!(SoundEffect::for_feedback(&Feedback::MissApple), SoundEffect::Miss);
        assert_eq!(
            SoundEffect::for_feedback(&Feedback::RoundOver {
                reason: EndReason::TimeUp,
                new_high_score: false,
            }),
            SoundEffect::GameOver
        );
        assert_eq!(
            SoundEffect::for_feedback(&Feedback::RoundOver {
                reason: EndReason::LivesExhausted,
                new_high_score: true,
            }),
            SoundEffect::HighScore
        );
    }

    #[test]
    fn test_tones() {
        assert_eq!(SoundEffect::Catch.tone().freq, 600.0);
        assert_eq!(SoundEffect::Miss.tone().freq, 200.0);
        assert_eq!(SoundEffect::BadCatch.tone().freq, 300.0);
        assert_eq!(SoundEffect::Bomb.tone().freq, 100.0);
        assert_eq!(SoundEffect::GameOver.tone().secs, 1.0);
    }

    #[test]
    fn test_music_tracks() {
        assert_eq!(Music::Track1.track(), Some(MusicTrack::TRACK1));
        assert_eq!(Music::Track2.track(), Some(MusicTrack::TRACK2));
        assert_eq!(Music::Track3.track(), Some(MusicTrack::TRACK3));
        assert_eq!(Music::None.track(), None);
        assert_eq!(Music::default(), Music::Track1);

        let ids: Vec<String> = Music::ALL.iter().map(Music::button_id).collect();
        assert_eq!(
            ids,
            ["music1-button", "music2-button", "music3-button", "no-music-button"]
        );
    }

    #[test]
    fn test_melody_and_bass() {
        let track = MusicTrack::TRACK1;
        // First quarter of each second is an octave down
        assert_eq!(track.melody_at(0.1), 261.63 * 0.5);
        assert_eq!(track.melody_at(0.3), 261.63);
        assert_eq!(track.melody_at(0.75), 293.66);
        assert_eq!(track.bass_at(0.5), 65.41);
        assert_eq!(track.bass_at(2.5), 65.41 * 2.0);

        let track = MusicTrack::TRACK3;
        assert_eq!(track.melody_at(0.7), 392.00);
        assert_eq!(track.bass_at(1.5), 65.41 * 2.0);
        // Loops every ten seconds
        assert_eq!(track.melody_at(10.1), track.melody_at(0.1));
        assert_eq!(track.bass_at(11.5), track.bass_at(1.5));
    }

    #[test]
    fn test_notes_split_on_changes() {
        let notes = MusicTrack::TRACK1.notes(0.0, 1.0);
        let starts: Vec<f64> = notes.iter().map(|n| n.start).collect();
        assert_eq!(starts, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(notes[0].melody, 261.63 * 0.5);
        assert_eq!(notes[1].melody, 261.63);
        assert_eq!(notes[2].melody, 293.66);
        assert_eq!(notes[3].melody, 293.66);
        assert!(notes.iter().all(|n| n.bass == 65.41));
        assert!((notes[3].secs - 0.25).abs() < 1e-9);

        assert!(MusicTrack::TRACK2.notes(3.0, 3.0).is_empty());
    }

    #[test]
    fn test_notes_cover_the_window() {
        for track in [MusicTrack::TRACK1, MusicTrack::TRACK2, MusicTrack::TRACK3] {
            let notes = track.notes(8.3, 12.9);
            assert_eq!(notes.first().map(|n| n.start), Some(8.3));
            let mut at = 8.3;
            for note in &notes {
                assert!((note.start - at).abs() < 1e-9);
                assert!(note.secs > 0.0);
                at = note.start + note.secs;
            }
            assert!((at - 12.9).abs() < 1e-9);
        }
    }
}
