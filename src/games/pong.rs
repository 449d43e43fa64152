//! Paddle and ball
//!
//! The paddle rides the left wall and follows forward/back tilt. The ball
//! bounces off the other three walls; each paddle return scores a point and
//! letting it past the paddle ends the round.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::platform::TiltAxis;
use crate::sim::{
    Ball, CollisionResult, Contact, Game, GameEvent, PaddleSpan, PlayerActor, ProgressionRule,
    Sprite, SpriteId, StepContext, reflect_axis, spin,
};

/// Pong tuning
pub mod consts {
    pub const BALL_SIZE: f32 = 4.0;
    pub const PADDLE_WIDTH: f32 = 4.0;
    pub const PADDLE_HEIGHT: f32 = 24.0;
    /// Ball speed in pixels per tick
    pub const BALL_SPEED: f32 = 1.5;
    /// Paddle easing rate per tick
    pub const PADDLE_SPEED: f32 = 0.02;
    /// Lateral velocity added at the paddle's very edge is half of this
    pub const SPIN_FACTOR: f32 = 0.5;
    /// Serve angle is drawn from [-SERVE_SPREAD_DEG, SERVE_SPREAD_DEG) whole degrees
    pub const SERVE_SPREAD_DEG: i32 = 45;
}

use consts::*;

#[derive(Debug, Clone)]
pub struct Pong {
    pub ball: Ball,
}

impl Pong {
    /// Put the ball back in the middle with a random heading away from the paddle
    fn serve(&mut self, rng: &mut Pcg32) {
        let angle = rng.random_range(-SERVE_SPREAD_DEG..SERVE_SPREAD_DEG) as f32;
        let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
        self.ball = Ball::serve(center, BALL_SPEED, angle);
    }

    /// The paddle's span along the left wall
    pub fn paddle(actor: &PlayerActor) -> PaddleSpan {
        PaddleSpan {
            top: actor.edge(SCREEN_HEIGHT, PADDLE_HEIGHT),
            height: PADDLE_HEIGHT,
        }
    }
}

/// Resolve the ball against walls and paddle.
///
/// Checked in order: top/bottom walls, paddle side, far wall. The first
/// rule that applies is the only one resolved this tick.
pub fn resolve_ball(ball: &mut Ball, paddle: &PaddleSpan) -> CollisionResult {
    let bottom = SCREEN_HEIGHT - BALL_SIZE;
    if reflect_axis(&mut ball.pos.y, &mut ball.vel.y, 0.0, true)
        || reflect_axis(&mut ball.pos.y, &mut ball.vel.y, bottom, false)
    {
        return CollisionResult::Bounce(Contact::HorizontalWall);
    }

    if ball.pos.x <= PADDLE_WIDTH {
        if paddle.contains(ball.pos.y) {
            ball.vel.x = ball.vel.x.abs();
            ball.pos.x = PADDLE_WIDTH;
            ball.vel.y += spin(paddle.hit_fraction(ball.pos.y), SPIN_FACTOR);
            return CollisionResult::Bounce(Contact::Paddle);
        }
        if ball.pos.x <= 0.0 {
            return CollisionResult::Miss;
        }
        return CollisionResult::Clear;
    }

    let far = SCREEN_WIDTH - BALL_SIZE;
    if reflect_axis(&mut ball.pos.x, &mut ball.vel.x, far, false) {
        return CollisionResult::Bounce(Contact::FarWall);
    }
    CollisionResult::Clear
}

impl Game for Pong {
    const NAME: &'static str = "Pong";
    const AXIS: TiltAxis = TiltAxis::Pitch;
    const ACTOR_RATE: f32 = PADDLE_SPEED;
    const PROGRESSION: ProgressionRule = ProgressionRule::flat(1.0);

    fn new(rng: &mut Pcg32) -> Self {
        let mut pong = Self {
            ball: Ball {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
            },
        };
        pong.serve(rng);
        pong
    }

    fn restart(&mut self, rng: &mut Pcg32) {
        self.serve(rng);
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.ball.integrate();
        match resolve_ball(&mut self.ball, &Self::paddle(&ctx.actor)) {
            CollisionResult::Clear => {}
            CollisionResult::Bounce(Contact::Paddle) => ctx.emit(GameEvent::PaddleHit),
            CollisionResult::Bounce(_) => ctx.emit(GameEvent::WallBounce),
            CollisionResult::Miss => ctx.emit(GameEvent::Missed),
        }
    }

    fn sprites(&self, actor: &PlayerActor, out: &mut Vec<Sprite>) {
        let paddle = Vec2::new(0.0, actor.edge(SCREEN_HEIGHT, PADDLE_HEIGHT));
        out.push(Sprite::shown(SpriteId::Actor, paddle));
        out.push(Sprite::shown(SpriteId::Ball, self.ball.pos));
    }
}
