//! Tilt Arcade - motion-controlled mini-games for a wrist-worn device
//!
//! Core modules:
//! - `sim`: Fixed-tick session core (filter, pool, collisions, progression, session)
//! - `games`: The two game instantiations (paddle/ball and dodging)
//! - `clock`: Dedicated tick thread with a fixed period
//! - `host`: Screen adapter binding a session to its collaborators
//! - `platform`, `audio`, `input`: Collaborator interfaces
//! - `settings`: Serializable session configuration

pub mod audio;
pub mod clock;
pub mod games;
pub mod host;
pub mod input;
pub mod platform;
pub mod settings;
pub mod sim;

pub use host::{Collaborators, HostError, SessionHost};
pub use settings::Settings;

/// Device and timing constants shared by every game
pub mod consts {
    /// Display width in pixels
    pub const SCREEN_WIDTH: f32 = 128.0;
    /// Display height in pixels
    pub const SCREEN_HEIGHT: f32 = 128.0;

    /// Default tick period in milliseconds (~60 Hz)
    pub const FRAME_TIME_MS: u64 = 16;

    /// Input event queue depth per screen
    pub const INPUT_QUEUE_CAPACITY: usize = 4;

    /// Tilt range mapped onto the control axis (±0.3 g)
    pub const TILT_HALF_RANGE: f32 = 0.3;
}
