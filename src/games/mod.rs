//! The mini-games, each a `sim::Game` driven by the shared session core

pub mod dodger;
pub mod pong;

pub use dodger::Dodger;
pub use pong::Pong;
