//! Breakout
//!
//! 5x10 brick wall, one ball, a paddle that follows the pointer or the
//! held left/right keys, and falling power-ups. Consecutive brick hits build
//! a combo multiplier that decays after an idle window.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{DrawList, colors};
use crate::sim::{Body, Cadence, Grid, Hud, Outcome, Rect, Simulation, TickInput};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 500.0;

pub const BRICK_ROWS: usize = 5;
pub const BRICK_COLS: usize = 10;
pub const BRICK_W: f32 = 70.0;
pub const BRICK_H: f32 = 20.0;
const BRICK_PADDING: f32 = 5.0;
const BRICK_OFFSET_LEFT: f32 = 35.0;
const BRICK_OFFSET_TOP: f32 = 50.0;
const BRICK_POINTS: u32 = 10;

pub const PADDLE_W: f32 = 100.0;
pub const PADDLE_W_WIDE: f32 = 150.0;
pub const PADDLE_H: f32 = 15.0;
const PADDLE_Y: f32 = HEIGHT - PADDLE_H - 10.0;
const PADDLE_KEY_SPEED: f32 = 8.0;
/// vx per unit of contact offset from the paddle center (tips give +-4)
const PADDLE_ANGLE: f32 = 8.0;

pub const BALL_RADIUS: f32 = 8.0;
const BALL_START: Vec2 = Vec2::new(WIDTH / 2.0, HEIGHT - 30.0);
const BALL_START_VEL: Vec2 = Vec2::new(4.0, -4.0);

pub const START_LIVES: u32 = 3;
pub const MAX_COMBO: u32 = 10;
/// Ticks without a brick hit before the combo resets
pub const COMBO_IDLE_TICKS: u32 = 90;

pub const POWERUP_CHANCE: f64 = 0.15;
pub const POWERUP_RADIUS: f32 = 8.0;
const POWERUP_FALL_SPEED: f32 = 2.0;
pub const WIDE_PADDLE_TICKS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    ExtraLife,
    WidePaddle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

pub struct Breakout {
    rng: Pcg32,
    bricks: Grid<bool>,
    paddle_x: f32,
    ball: Ball,
    powerups: Vec<PowerUp>,
    wide_ticks: u32,
    score: u32,
    lives: u32,
    combo: u32,
    idle_ticks: u32,
    outcome: Option<Outcome>,
}

/// Score multiplier for the next brick
pub fn multiplier(combo: u32) -> u32 {
    combo.clamp(1, MAX_COMBO)
}

pub fn brick_rect(row: usize, col: usize) -> Rect {
    Rect::new(
        col as f32 * (BRICK_W + BRICK_PADDING) + BRICK_OFFSET_LEFT,
        row as f32 * (BRICK_H + BRICK_PADDING) + BRICK_OFFSET_TOP,
        BRICK_W,
        BRICK_H,
    )
}

impl Breakout {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            bricks: Grid::new(BRICK_ROWS, BRICK_COLS, true),
            paddle_x: (WIDTH - PADDLE_W) / 2.0,
            ball: Ball {
                pos: BALL_START,
                vel: BALL_START_VEL,
            },
            powerups: Vec::new(),
            wide_ticks: 0,
            score: 0,
            lives: START_LIVES,
            combo: 0,
            idle_ticks: 0,
            outcome: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.powerups
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.values().filter(|alive| **alive).count()
    }

    pub fn paddle_width(&self) -> f32 {
        if self.wide_ticks > 0 {
            PADDLE_W_WIDE
        } else {
            PADDLE_W
        }
    }

    pub fn paddle_rect(&self) -> Rect {
        Rect::new(self.paddle_x, PADDLE_Y, self.paddle_width(), PADDLE_H)
    }

    fn move_paddle(&mut self, input: &TickInput) {
        let w = self.paddle_width();
        if let Some(p) = input.pointer
            && p.x > 0.0
            && p.x < WIDTH
        {
            self.paddle_x = p.x - w / 2.0;
        }
        self.paddle_x += input.held.horizontal() * PADDLE_KEY_SPEED;
        self.paddle_x = self.paddle_x.clamp(0.0, WIDTH - w);
    }

    fn bounce_walls(&mut self) {
        let ball = &mut self.ball;
        if ball.pos.x - BALL_RADIUS < 0.0 {
            ball.pos.x = BALL_RADIUS;
            ball.vel.x = ball.vel.x.abs();
        } else if ball.pos.x + BALL_RADIUS > WIDTH {
            ball.pos.x = WIDTH - BALL_RADIUS;
            ball.vel.x = -ball.vel.x.abs();
        }
        if ball.pos.y - BALL_RADIUS < 0.0 {
            ball.pos.y = BALL_RADIUS;
            ball.vel.y = ball.vel.y.abs();
        }
    }

    fn bounce_paddle(&mut self) {
        let paddle = self.paddle_rect();
        let ball = &mut self.ball;
        if ball.vel.y <= 0.0 || !Body::circle(ball.pos, BALL_RADIUS).overlaps(&Body::Rect(paddle)) {
            return;
        }
        let hit = ((ball.pos.x - paddle.left()) / paddle.size.x - 0.5).clamp(-0.5, 0.5);
        ball.vel.y = -ball.vel.y.abs();
        ball.vel.x = hit * PADDLE_ANGLE;
        ball.pos.y = paddle.top() - BALL_RADIUS;
    }

    /// Break every brick the ball touches; vy flips at most once per tick
    fn hit_bricks(&mut self) {
        let ball = Body::circle(self.ball.pos, BALL_RADIUS);
        let mut flipped = false;

        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                if self.bricks.get(row, col) != Some(&true) {
                    continue;
                }
                let rect = brick_rect(row, col);
                if !ball.overlaps(&Body::Rect(rect)) {
                    continue;
                }
                self.bricks.set(row, col, false);
                self.score += BRICK_POINTS * multiplier(self.combo);
                self.combo += 1;
                self.idle_ticks = 0;
                if !flipped {
                    self.ball.vel.y = -self.ball.vel.y;
                    flipped = true;
                }
                self.maybe_spawn_powerup(rect.center());
            }
        }
    }

    fn maybe_spawn_powerup(&mut self, pos: Vec2) {
        if !self.rng.random_bool(POWERUP_CHANCE) {
            return;
        }
        let kind = if self.rng.random_bool(0.5) {
            PowerUpKind::ExtraLife
        } else {
            PowerUpKind::WidePaddle
        };
        log::debug!("Breakout power-up {kind:?} spawned");
        self.powerups.push(PowerUp { pos, kind });
    }

    fn update_powerups(&mut self) {
        let paddle = Body::Rect(self.paddle_rect());
        let mut caught = Vec::new();
        self.powerups.retain_mut(|p| {
            p.pos.y += POWERUP_FALL_SPEED;
            if Body::circle(p.pos, POWERUP_RADIUS).overlaps(&paddle) {
                caught.push(p.kind);
                return false;
            }
            p.pos.y - POWERUP_RADIUS <= HEIGHT
        });
        for kind in caught {
            match kind {
                PowerUpKind::ExtraLife => self.lives += 1,
                PowerUpKind::WidePaddle => self.wide_ticks = WIDE_PADDLE_TICKS,
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.combo = 0;
        if self.lives == 0 {
            self.outcome = Some(Outcome::GameOver);
            return;
        }
        log::debug!("Breakout ball lost, {} lives left", self.lives);
        self.ball = Ball {
            pos: BALL_START,
            vel: BALL_START_VEL,
        };
        self.paddle_x = (WIDTH - self.paddle_width()) / 2.0;
    }
}

impl Simulation for Breakout {
    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        if self.outcome.is_some() {
            return;
        }
        self.move_paddle(input);

        self.ball.pos += self.ball.vel;
        self.bounce_walls();
        self.bounce_paddle();
        self.hit_bricks();

        if self.ball.pos.y - BALL_RADIUS > HEIGHT {
            self.lose_life();
            if self.outcome.is_some() {
                return;
            }
        }

        self.update_powerups();

        self.idle_ticks += 1;
        if self.idle_ticks >= COMBO_IDLE_TICKS {
            self.combo = 0;
        }
        self.wide_ticks = self.wide_ticks.saturating_sub(1);

        if self.bricks_left() == 0 {
            self.outcome = Some(Outcome::Won);
        }
    }

    fn cadence(&self) -> Cadence {
        Cadence::fixed(crate::consts::FRAME_MS)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn hud(&self) -> Hud {
        Hud::score(self.score).with_lives(self.lives)
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(WIDTH, HEIGHT)
    }

    fn draw(&self, list: &mut DrawList) {
        const ROW_COLORS: [[f32; 4]; BRICK_ROWS] = [
            colors::CYAN,
            colors::ACCENT,
            colors::PRIMARY,
            colors::PURPLE,
            colors::PINK,
        ];

        list.clear(colors::BACKGROUND);
        for (row, col, alive) in self.bricks.iter() {
            if *alive {
                list.rect(brick_rect(row, col), ROW_COLORS[row]);
            }
        }
        for p in &self.powerups {
            let color = match p.kind {
                PowerUpKind::ExtraLife => colors::RED,
                PowerUpKind::WidePaddle => colors::YELLOW,
            };
            list.circle(p.pos, POWERUP_RADIUS, color);
        }
        list.circle(self.ball.pos, BALL_RADIUS, colors::GREEN);
        list.rect(self.paddle_rect(), colors::PRIMARY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn game() -> Breakout {
        Breakout::new(11)
    }

    #[test]
    fn test_multiplier_clamped() {
        assert_eq!(multiplier(0), 1);
        assert_eq!(multiplier(3), 3);
        assert_eq!(multiplier(25), 10);
    }

    #[test]
    fn test_combo_three_scores_thirty() {
        let mut g = game();
        g.combo = 3;
        let brick = brick_rect(4, 0);
        g.ball = Ball {
            pos: Vec2::new(brick.center().x, brick.bottom() + BALL_RADIUS + 1.0),
            vel: Vec2::new(0.0, -4.0),
        };
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.score(), 30);
        assert_eq!(g.combo(), 4);
        assert_eq!(g.bricks_left(), BRICK_ROWS * BRICK_COLS - 1);
        assert!(g.ball().vel.y > 0.0);
    }

    #[test]
    fn test_two_bricks_flip_once() {
        let mut g = game();
        // Straddle the gap between two horizontally adjacent bricks
        let left = brick_rect(4, 0);
        let x = left.right() + BRICK_PADDING / 2.0;
        g.ball = Ball {
            pos: Vec2::new(x, left.bottom() + BALL_RADIUS),
            vel: Vec2::new(0.0, -4.0),
        };
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.bricks_left(), BRICK_ROWS * BRICK_COLS - 2);
        assert_eq!(g.ball().vel.y, 4.0);
        // Second brick scored at the grown combo
        assert_eq!(g.score(), 10 + 10);
        assert_eq!(g.combo(), 2);
    }

    #[test]
    fn test_combo_decays_when_idle() {
        let mut g = game();
        g.combo = 5;
        g.ball = Ball {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::new(0.0, 0.0),
        };
        for _ in 0..COMBO_IDLE_TICKS {
            g.step(&TickInput::default(), 16.7);
        }
        assert_eq!(g.combo(), 0);
    }

    #[test]
    fn test_paddle_angle_from_contact() {
        let mut g = game();
        let paddle = g.paddle_rect();
        g.ball = Ball {
            pos: Vec2::new(paddle.right() - 5.0, paddle.top() - BALL_RADIUS - 1.0),
            vel: Vec2::new(0.0, 4.0),
        };
        g.step(&TickInput::default(), 16.7);
        assert!(g.ball().vel.y < 0.0);
        assert!(g.ball().vel.x > 3.0, "right edge sends the ball right");
    }

    #[test]
    fn test_miss_costs_life_then_game_over() {
        let mut g = game();
        for expected in (0..START_LIVES).rev() {
            g.ball = Ball {
                pos: Vec2::new(5.0, HEIGHT + BALL_RADIUS - 1.0),
                vel: Vec2::new(0.0, 4.0),
            };
            g.step(&TickInput::default(), 16.7);
            assert_eq!(g.lives(), expected);
        }
        assert_eq!(g.outcome(), Some(Outcome::GameOver));
        assert_eq!(g.hud().lives, Some(0));
    }

    #[test]
    fn test_clearing_wall_wins() {
        let mut g = game();
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                g.bricks.set(row, col, false);
            }
        }
        g.bricks.set(0, 0, true);
        let brick = brick_rect(0, 0);
        g.ball = Ball {
            pos: Vec2::new(brick.center().x, brick.bottom() + BALL_RADIUS + 1.0),
            vel: Vec2::new(0.0, -4.0),
        };
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_powerups_caught_and_dropped() {
        let mut g = game();
        g.ball = Ball {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::ZERO,
        };
        let paddle = g.paddle_rect();
        g.powerups.push(PowerUp {
            pos: Vec2::new(paddle.center().x, paddle.top() - POWERUP_RADIUS),
            kind: PowerUpKind::WidePaddle,
        });
        g.powerups.push(PowerUp {
            pos: Vec2::new(10.0, HEIGHT + POWERUP_RADIUS - 1.0),
            kind: PowerUpKind::ExtraLife,
        });
        g.step(&TickInput::default(), 16.7);
        assert!(g.powerups().is_empty());
        assert_eq!(g.paddle_width(), PADDLE_W_WIDE);
        assert_eq!(g.lives(), START_LIVES);
    }

    #[test]
    fn test_pointer_and_keys_move_paddle() {
        let mut g = game();
        g.step(&TickInput::pointer_at(100.0, 0.0), 16.7);
        assert_eq!(g.paddle_rect().left(), 50.0);

        let mut input = TickInput::default();
        input.held.right = true;
        g.step(&input, 16.7);
        assert_eq!(g.paddle_rect().left(), 50.0 + PADDLE_KEY_SPEED);
    }

    proptest! {
        #[test]
        fn prop_score_steps_follow_clamped_combo(
            seed in any::<u64>(),
            xs in prop::collection::vec(0.0f32..WIDTH, 1..600),
        ) {
            let mut g = Breakout::new(seed);
            for x in xs {
                let before_score = g.score();
                let before_bricks = g.bricks_left();
                g.step(&TickInput::pointer_at(x, 0.0), 16.7);

                let broken = (before_bricks - g.bricks_left()) as u32;
                let gained = g.score() - before_score;
                prop_assert!(gained >= broken * BRICK_POINTS);
                prop_assert!(gained <= broken * BRICK_POINTS * MAX_COMBO);
                prop_assert!((1..=MAX_COMBO).contains(&multiplier(g.combo())));
                if g.outcome().is_some() {
                    break;
                }
            }
        }
    }
}
