//! Sound cues
//!
//! Tones are described as frequency sweeps and handed to the device's tone
//! player, which queues and plays them on its own. Nothing here waits for
//! playback.

use std::sync::Arc;

/// Note frequencies in Hz
pub mod notes {
    pub const NOTE_C2: u16 = 65;
    pub const NOTE_C3: u16 = 131;
    pub const NOTE_C4: u16 = 262;
    pub const NOTE_C5: u16 = 523;
}

use notes::*;

/// A single tone sweep (0 Hz = silence)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chirp {
    pub start_freq: u16,
    pub end_freq: u16,
    pub duration_ms: u32,
}

impl Chirp {
    pub const fn tone(freq: u16, duration_ms: u32) -> Self {
        Self {
            start_freq: freq,
            end_freq: freq,
            duration_ms,
        }
    }

    pub const fn sweep(start_freq: u16, end_freq: u16, duration_ms: u32) -> Self {
        Self {
            start_freq,
            end_freq,
            duration_ms,
        }
    }

    pub const fn rest(duration_ms: u32) -> Self {
        Self::tone(0, duration_ms)
    }
}

/// Device tone player. Calls return immediately; playback is queued.
pub trait AudioSink: Send + Sync {
    fn play(&self, chirp: Chirp);
    fn play_sequence(&self, chirps: &[Chirp]);
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle or wall
    Hit,
    /// Ball missed, or plane crashed
    Miss,
}

const HIT: [Chirp; 1] = [Chirp::tone(NOTE_C5, 50)];

const MISS: [Chirp; 3] = [
    Chirp::sweep(NOTE_C4, NOTE_C3, 200),
    Chirp::rest(100),
    Chirp::sweep(NOTE_C3, NOTE_C2, 300),
];

impl SoundEffect {
    pub fn chirps(&self) -> &'static [Chirp] {
        match self {
            SoundEffect::Hit => &HIT,
            SoundEffect::Miss => &MISS,
        }
    }
}

/// Audio manager for a game session
#[derive(Clone)]
pub struct AudioManager {
    sink: Arc<dyn AudioSink>,
    muted: bool,
}

impl AudioManager {
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self { sink, muted: false }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        match effect.chirps() {
            [single] => self.sink.play(*single),
            sequence => self.sink.play_sequence(sequence),
        }
    }
}
