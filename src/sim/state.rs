//! Session state and core simulation types
//!
//! Also holds the immutable per-tick `Frame` the tick thread hands to the
//! rendering context.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation running, input drives the actor
    Playing,
    /// Simulation frozen until a restart
    GameOver,
}

impl GamePhase {
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::GameOver)
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball returned by the paddle (scores)
    PaddleHit,
    /// Ball bounced off a wall (no score)
    WallBounce,
    /// Obstacle crossed the far edge without hitting the actor (scores)
    ObstaclePassed,
    /// Ball got past the paddle (terminal)
    Missed,
    /// Actor ran into an obstacle (terminal)
    Crashed,
    /// Difficulty went up a step
    DifficultyRaised,
}

impl GameEvent {
    /// Points awarded for this event
    pub fn points(&self) -> u32 {
        match self {
            GameEvent::PaddleHit | GameEvent::ObstaclePassed => 1,
            _ => 0,
        }
    }

    /// Whether this event ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Missed | GameEvent::Crashed)
    }
}

/// A moving ball (explicit Euler, one step per tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    /// Serve from `center` at `speed`, heading `angle_deg` off the +x axis
    pub fn serve(center: Vec2, speed: f32, angle_deg: f32) -> Self {
        let angle = angle_deg.to_radians();
        Self {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
        }
    }

    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

/// A falling obstacle held in a pool slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
}

/// Identifies a pre-created display object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    /// Paddle or plane
    Actor,
    Ball,
    /// Pool slot index
    Obstacle(usize),
}

/// Position and visibility of one display object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: SpriteId,
    pub x: i32,
    pub y: i32,
    pub visible: bool,
}

impl Sprite {
    pub fn shown(id: SpriteId, pos: Vec2) -> Self {
        Self {
            id,
            x: pos.x as i32,
            y: pos.y as i32,
            visible: true,
        }
    }

    pub fn hidden(id: SpriteId) -> Self {
        Self {
            id,
            x: 0,
            y: 0,
            visible: false,
        }
    }
}

/// Immutable view of one tick, consumed by the rendering context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Tick counter at the time of publishing
    pub tick: u64,
    pub score: u32,
    pub phase: GamePhase,
    pub sprites: Vec<Sprite>,
}

impl Frame {
    /// Score label text
    pub fn label(&self) -> String {
        match self.phase {
            GamePhase::Playing => format!("Score: {}", self.score),
            GamePhase::GameOver => format!("Score: {}\nGame Over!", self.score),
        }
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }
}
