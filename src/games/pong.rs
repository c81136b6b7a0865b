//! Pong
//!
//! Player paddle on the left follows the pointer (or held up/down keys),
//! AI paddle on the right tracks the predicted ball height at a
//! difficulty-dependent speed. No win threshold: the rally runs until the
//! host resets it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{DrawList, colors};
use crate::settings::Difficulty;
use crate::sim::{Body, Cadence, Hud, Outcome, Rect, Simulation, TickInput};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 500.0;
pub const PADDLE_W: f32 = 10.0;
pub const PADDLE_H: f32 = 80.0;
pub const PLAYER_X: f32 = 20.0;
pub const AI_X: f32 = WIDTH - 30.0;
pub const BALL_RADIUS: f32 = 10.0;

const SERVE_SPEED_X: f32 = 5.0;
const SERVE_SPREAD_Y: f32 = 4.0;
/// x-speed multiplier per paddle return
const RETURN_GAIN: f32 = 1.1;
const MAX_SPEED_X: f32 = 14.0;
/// vy added at the paddle tip
const SPIN: f32 = 3.0;
const MAX_SPEED_Y: f32 = 8.0;
/// Fraction of the pointer distance covered per tick (before boost)
const FOLLOW_RATE: f32 = 0.1;
const KEY_SPEED: f32 = 6.0;

pub const ORB_SPAWN_CHANCE: f64 = 0.05;
pub const ORB_LIFETIME_TICKS: u32 = 300;
pub const ORB_RADIUS: f32 = 15.0;
const ORB_PICKUP_DIST: f32 = 25.0;
pub const BOOST: f32 = 1.5;
pub const BOOST_TICKS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Power-up orb sitting in the player's paddle lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orb {
    pub pos: Vec2,
    pub ticks_left: u32,
}

pub struct Pong {
    rng: Pcg32,
    ai_speed: f32,
    /// Top edge of each paddle
    player_y: f32,
    ai_y: f32,
    ball: Ball,
    orb: Option<Orb>,
    boost_ticks: u32,
    player_score: u32,
    ai_score: u32,
}

impl Pong {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        let mid = HEIGHT / 2.0 - PADDLE_H / 2.0;
        Self {
            rng: Pcg32::seed_from_u64(seed),
            ai_speed: difficulty.ai_speed(),
            player_y: mid,
            ai_y: mid,
            ball: Ball {
                pos: Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
                vel: Vec2::new(SERVE_SPEED_X, 3.0),
            },
            orb: None,
            boost_ticks: 0,
            player_score: 0,
            ai_score: 0,
        }
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.player_score, self.ai_score)
    }

    pub fn player_rect(&self) -> Rect {
        Rect::new(PLAYER_X, self.player_y, PADDLE_W, PADDLE_H)
    }

    pub fn ai_rect(&self) -> Rect {
        Rect::new(AI_X, self.ai_y, PADDLE_W, PADDLE_H)
    }

    pub fn boost(&self) -> f32 {
        if self.boost_ticks > 0 { BOOST } else { 1.0 }
    }

    fn serve(&mut self) {
        let dir = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let vy = (self.rng.random::<f32>() - 0.5) * SERVE_SPREAD_Y;
        self.ball = Ball {
            pos: Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
            vel: Vec2::new(dir * SERVE_SPEED_X, vy),
        };
    }

    fn move_player(&mut self, input: &TickInput) {
        let boost = self.boost();
        if let Some(pointer) = input.pointer {
            let target = pointer.y - PADDLE_H / 2.0;
            self.player_y += (target - self.player_y) * FOLLOW_RATE * boost;
        }
        if input.held.up {
            self.player_y -= KEY_SPEED * boost;
        }
        if input.held.down {
            self.player_y += KEY_SPEED * boost;
        }
        self.player_y = self.player_y.clamp(0.0, HEIGHT - PADDLE_H);
    }

    /// Ball height when it reaches the AI paddle face, folding wall bounces
    fn predict_ball_y(&self) -> f32 {
        let Ball { pos, vel } = self.ball;
        if vel.x <= 0.0 {
            return pos.y;
        }
        let t = (AI_X - BALL_RADIUS - pos.x).max(0.0) / vel.x;
        let lo = BALL_RADIUS;
        let span = HEIGHT - 2.0 * BALL_RADIUS;
        let raw = pos.y + vel.y * t - lo;
        let folded = raw.rem_euclid(2.0 * span);
        lo + if folded > span { 2.0 * span - folded } else { folded }
    }

    fn move_ai(&mut self) {
        // Only reacts once the ball is in its half
        if self.ball.pos.x <= WIDTH / 2.0 {
            return;
        }
        let target = self.predict_ball_y() - PADDLE_H / 2.0;
        let delta = target - self.ai_y;
        self.ai_y += delta.clamp(-self.ai_speed, self.ai_speed);
        self.ai_y = self.ai_y.clamp(0.0, HEIGHT - PADDLE_H);
    }

    fn bounce_walls(&mut self) {
        let ball = &mut self.ball;
        if ball.pos.y - BALL_RADIUS <= 0.0 && ball.vel.y < 0.0 {
            ball.pos.y = BALL_RADIUS;
            ball.vel.y = -ball.vel.y;
        } else if ball.pos.y + BALL_RADIUS >= HEIGHT && ball.vel.y > 0.0 {
            ball.pos.y = HEIGHT - BALL_RADIUS;
            ball.vel.y = -ball.vel.y;
        }
    }

    /// Reflect off a paddle; `facing` is the x direction the ball leaves in
    fn bounce_paddle(ball: &mut Ball, paddle: Rect, facing: f32) {
        // Only when travelling toward the paddle
        if ball.vel.x * facing >= 0.0 {
            return;
        }
        if !Body::circle(ball.pos, BALL_RADIUS).overlaps(&Body::Rect(paddle)) {
            return;
        }
        let offset = ((ball.pos.y - paddle.center().y) / (PADDLE_H / 2.0)).clamp(-1.0, 1.0);
        ball.vel.x = (ball.vel.x.abs() * RETURN_GAIN).min(MAX_SPEED_X) * facing;
        ball.vel.y = (ball.vel.y + offset * SPIN).clamp(-MAX_SPEED_Y, MAX_SPEED_Y);
        ball.pos.x = if facing > 0.0 {
            paddle.right() + BALL_RADIUS
        } else {
            paddle.left() - BALL_RADIUS
        };
    }

    fn update_orb(&mut self) {
        self.boost_ticks = self.boost_ticks.saturating_sub(1);

        let Some(mut orb) = self.orb else {
            if self.rng.random_bool(ORB_SPAWN_CHANCE) {
                let y = self.rng.random_range(50.0..HEIGHT - 50.0);
                self.orb = Some(Orb {
                    pos: Vec2::new(PLAYER_X + PADDLE_W / 2.0, y),
                    ticks_left: ORB_LIFETIME_TICKS,
                });
            }
            return;
        };

        orb.ticks_left = orb.ticks_left.saturating_sub(1);
        if orb.pos.distance(self.player_rect().center()) < ORB_PICKUP_DIST {
            log::debug!("Pong boost picked up");
            self.boost_ticks = BOOST_TICKS;
            self.orb = None;
        } else if orb.ticks_left == 0 {
            self.orb = None;
        } else {
            self.orb = Some(orb);
        }
    }
}

impl Simulation for Pong {
    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        self.move_player(input);

        self.ball.pos += self.ball.vel;
        self.bounce_walls();
        let (player, ai) = (self.player_rect(), self.ai_rect());
        Self::bounce_paddle(&mut self.ball, player, 1.0);
        Self::bounce_paddle(&mut self.ball, ai, -1.0);

        if self.ball.pos.x <= 0.0 {
            self.ai_score += 1;
            self.serve();
        } else if self.ball.pos.x >= WIDTH {
            self.player_score += 1;
            self.serve();
        }

        self.update_orb();
        self.move_ai();
    }

    fn cadence(&self) -> Cadence {
        Cadence::fixed(crate::consts::FRAME_MS)
    }

    fn outcome(&self) -> Option<Outcome> {
        None
    }

    fn hud(&self) -> Hud {
        Hud {
            opponent_score: Some(self.ai_score),
            ..Hud::score(self.player_score)
        }
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(WIDTH, HEIGHT)
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::BACKGROUND);

        // Dashed center line
        let mut y = 0.0;
        while y < HEIGHT {
            list.fill_rect(WIDTH / 2.0 - 1.0, y, 2.0, 10.0, colors::with_alpha(colors::PRIMARY, 0.3));
            y += 20.0;
        }

        let player_color = if self.boost_ticks > 0 {
            colors::YELLOW
        } else {
            colors::PRIMARY
        };
        list.rect(self.player_rect(), player_color);
        list.rect(self.ai_rect(), colors::ACCENT);

        if let Some(orb) = self.orb {
            // Halo fades as the orb runs out
            let fade = orb.ticks_left.min(ORB_LIFETIME_TICKS) as f32 / ORB_LIFETIME_TICKS as f32;
            list.ring(
                orb.pos,
                ORB_RADIUS + 2.0,
                ORB_RADIUS + 6.0,
                colors::with_alpha(colors::YELLOW, 0.6 * fade),
            );
            list.circle(orb.pos, ORB_RADIUS, colors::YELLOW);
        }
        list.circle(self.ball.pos, BALL_RADIUS, colors::GREEN);
    }
}
