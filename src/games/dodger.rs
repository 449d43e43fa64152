//! Bird dodger
//!
//! A plane near the bottom of the screen slides left/right with roll tilt.
//! Birds drop from the top out of a fixed pool; every bird that falls past
//! the bottom edge scores, touching one ends the round. Fall speed is the
//! session difficulty, which rises every ten points.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::platform::TiltAxis;
use crate::sim::{
    Aabb, EntityPool, Game, GameEvent, Obstacle, PlayerActor, ProgressionRule, Sprite, SpriteId,
    StepContext,
};

/// Dodger tuning
pub mod consts {
    pub const PLANE_SIZE: f32 = 8.0;
    pub const BIRD_SIZE: f32 = 6.0;
    /// Fixed plane row, near the bottom
    pub const PLANE_Y: f32 = 100.0;
    /// Bird pool capacity
    pub const MAX_BIRDS: usize = 5;
    /// Ticks between spawn attempts
    pub const SPAWN_INTERVAL: u64 = 60;
    /// Plane easing rate per tick
    pub const PLANE_SPEED: f32 = 0.03;
    /// Fall speed in pixels per tick
    pub const INITIAL_SPEED: f32 = 1.0;
    pub const SPEED_INCREMENT: f32 = 0.1;
    pub const MAX_SPEED: f32 = 3.0;
    /// Points between speed increases
    pub const SPEED_STEP_SCORE: u32 = 10;
}

use consts::*;

#[derive(Debug, Clone)]
pub struct Dodger {
    pub birds: EntityPool<Obstacle, MAX_BIRDS>,
}

impl Dodger {
    /// The plane's bounding box for a given actor position
    pub fn plane_box(actor: &PlayerActor) -> Aabb {
        let x = actor.edge(SCREEN_WIDTH, PLANE_SIZE);
        Aabb::square(Vec2::new(x, PLANE_Y), PLANE_SIZE)
    }

    pub fn bird_box(bird: &Obstacle) -> Aabb {
        Aabb::square(bird.pos, BIRD_SIZE)
    }

    /// Drop a bird in at a random column above the top edge.
    ///
    /// Silently does nothing when every slot is in use.
    fn spawn_bird(&mut self, rng: &mut Pcg32) -> Option<usize> {
        let columns = (SCREEN_WIDTH - BIRD_SIZE) as u32;
        let x = rng.random_range(0..columns) as f32;
        let slot = self
            .birds
            .spawn(|bird| bird.pos = Vec2::new(x, -BIRD_SIZE));
        if slot.is_none() {
            log::trace!("Bird pool full, spawn dropped");
        }
        slot
    }
}

impl Game for Dodger {
    const NAME: &'static str = "BirdDodger";
    const AXIS: TiltAxis = TiltAxis::Roll;
    const ACTOR_RATE: f32 = PLANE_SPEED;
    const PROGRESSION: ProgressionRule = ProgressionRule {
        threshold: SPEED_STEP_SCORE,
        increment: SPEED_INCREMENT,
        floor: INITIAL_SPEED,
        ceiling: MAX_SPEED,
    };

    fn new(_rng: &mut Pcg32) -> Self {
        Self {
            birds: EntityPool::new(Obstacle {
                pos: Vec2::new(0.0, -BIRD_SIZE),
            }),
        }
    }

    fn restart(&mut self, _rng: &mut Pcg32) {
        self.birds.clear();
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        for bird in self.birds.iter_active_mut() {
            bird.pos.y += ctx.difficulty;
        }

        // First contact in slot order ends the round
        let plane = Self::plane_box(&ctx.actor);
        if let Some((slot, _)) = self
            .birds
            .iter_active()
            .find(|(_, bird)| plane.overlaps(&Self::bird_box(bird)))
        {
            log::debug!("Plane hit bird in slot {}", slot);
            ctx.emit(GameEvent::Crashed);
            return;
        }

        let passed = self.birds.reap(|bird| bird.pos.y > SCREEN_HEIGHT);
        for _ in 0..passed {
            ctx.emit(GameEvent::ObstaclePassed);
        }

        if ctx.tick % SPAWN_INTERVAL == 0 {
            self.spawn_bird(ctx.rng);
        }
    }

    fn sprites(&self, actor: &PlayerActor, out: &mut Vec<Sprite>) {
        let plane = Self::plane_box(actor);
        out.push(Sprite::shown(SpriteId::Actor, plane.min));
        for (i, slot) in self.birds.slots().iter().enumerate() {
            let id = SpriteId::Obstacle(i);
            if slot.active {
                out.push(Sprite::shown(id, slot.entity.pos));
            } else {
                out.push(Sprite::hidden(id));
            }
        }
    }
}
