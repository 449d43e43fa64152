//! Fixed-tick simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - One update pass per tick, no dt scaling
//! - Seeded RNG only
//! - Stable iteration order (pool index ascending)
//! - No rendering, audio or platform calls

pub mod collision;
pub mod filter;
pub mod pool;
pub mod progression;
pub mod session;
pub mod state;

pub use collision::{Aabb, CollisionResult, Contact, PaddleSpan, reflect_axis, spin};
pub use filter::{AxisMapping, FilteredAxis, PlayerActor};
pub use pool::{EntityPool, Slot};
pub use progression::{Progression, ProgressionRule};
pub use session::{ButtonCommand, Game, Session, StepContext};
pub use state::{Ball, Frame, GameEvent, GamePhase, Obstacle, Sprite, SpriteId};
