//! Flappy
//!
//! A bird under constant gravity flaps upward on action. Pipe pairs with a
//! random gap enter from the right every 90 ticks; passing one scores a point.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{DrawList, colors};
use crate::sim::{Cadence, Hud, Outcome, Rect, Simulation, TickInput};

pub const WIDTH: f32 = 400.0;
pub const HEIGHT: f32 = 600.0;

pub const GRAVITY: f32 = 0.5;
pub const FLAP_VELOCITY: f32 = -8.0;
pub const BIRD_X: f32 = 100.0;
const BIRD_START_Y: f32 = 300.0;
pub const BIRD_RADIUS: f32 = 15.0;

pub const PIPE_GAP: f32 = 150.0;
pub const PIPE_WIDTH: f32 = 50.0;
pub const PIPE_SPEED: f32 = 3.0;
pub const PIPE_EVERY_TICKS: u32 = 90;
/// Shortest top pipe; the bottom pipe is at least as tall
const PIPE_MIN_HEIGHT: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f32,
    /// Bottom edge of the top pipe
    pub gap_top: f32,
    pub scored: bool,
}

impl Pipe {
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + PIPE_GAP
    }

    fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, PIPE_WIDTH, self.gap_top)
    }

    fn bottom_rect(&self) -> Rect {
        Rect::new(self.x, self.gap_bottom(), PIPE_WIDTH, HEIGHT - self.gap_bottom())
    }
}

pub struct Flappy {
    rng: Pcg32,
    bird_y: f32,
    velocity: f32,
    pipes: Vec<Pipe>,
    ticks: u32,
    score: u32,
    outcome: Option<Outcome>,
}

impl Flappy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            bird_y: BIRD_START_Y,
            velocity: 0.0,
            pipes: Vec::new(),
            ticks: 0,
            score: 0,
            outcome: None,
        }
    }

    pub fn bird(&self) -> Vec2 {
        Vec2::new(BIRD_X, self.bird_y)
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn bird_rect(&self) -> Rect {
        Rect::from_center(self.bird(), Vec2::splat(BIRD_RADIUS * 2.0))
    }

    fn spawn_pipe(&mut self) {
        let max = HEIGHT - PIPE_GAP - PIPE_MIN_HEIGHT;
        let gap_top = self.rng.random_range(PIPE_MIN_HEIGHT..max);
        self.pipes.push(Pipe {
            x: WIDTH,
            gap_top,
            scored: false,
        });
    }

    fn update_bird(&mut self) {
        self.velocity += GRAVITY;
        self.bird_y += self.velocity;
        if self.bird_y + BIRD_RADIUS >= HEIGHT || self.bird_y - BIRD_RADIUS <= 0.0 {
            self.outcome = Some(Outcome::GameOver);
        }
    }

    fn update_pipes(&mut self) {
        if self.ticks % PIPE_EVERY_TICKS == 0 {
            self.spawn_pipe();
        }

        let bird = self.bird_rect();
        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
            if bird.overlaps(&pipe.top_rect()) || bird.overlaps(&pipe.bottom_rect()) {
                self.outcome = Some(Outcome::GameOver);
            }
            if !pipe.scored && BIRD_X > pipe.x + PIPE_WIDTH {
                pipe.scored = true;
                self.score += 1;
            }
        }
        self.pipes.retain(|p| p.x + PIPE_WIDTH > 0.0);
    }
}

impl Simulation for Flappy {
    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        if self.outcome.is_some() {
            return;
        }
        if input.action_or_up() {
            self.velocity = FLAP_VELOCITY;
        }
        self.ticks += 1;
        self.update_bird();
        self.update_pipes();
    }

    fn cadence(&self) -> Cadence {
        Cadence::fixed(crate::consts::FRAME_MS)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn hud(&self) -> Hud {
        Hud::score(self.score)
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(WIDTH, HEIGHT)
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear([0.53, 0.81, 0.92, 1.0]);
        for i in 0..3 {
            let c = Vec2::new(100.0 + i as f32 * 150.0, 100.0 + i as f32 * 50.0);
            list.circle(c, 30.0, colors::with_alpha(colors::WHITE, 0.5));
        }

        for pipe in &self.pipes {
            list.rect(pipe.top_rect(), colors::GREEN);
            list.rect(pipe.bottom_rect(), colors::GREEN);
            list.fill_rect(pipe.x, 0.0, 5.0, pipe.gap_top, colors::with_alpha(colors::WHITE, 0.3));
        }

        let bird = self.bird();
        list.circle(bird, BIRD_RADIUS, colors::YELLOW);
        list.circle(bird + Vec2::new(5.0, -3.0), 3.0, colors::BACKGROUND);
        list.triangle(
            bird + Vec2::new(BIRD_RADIUS, 0.0),
            bird + Vec2::new(BIRD_RADIUS + 10.0, -2.0),
            bird + Vec2::new(BIRD_RADIUS + 10.0, 2.0),
            colors::ORANGE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flap whenever the bird sinks below its start height
    fn hover(f: &mut Flappy) {
        let input = if f.bird().y > BIRD_START_Y {
            TickInput::action()
        } else {
            TickInput::default()
        };
        f.step(&input, 16.7);
    }

    #[test]
    fn test_gravity_and_flap() {
        let mut f = Flappy::new(1);
        f.step(&TickInput::default(), 16.7);
        assert_eq!(f.velocity(), GRAVITY);
        assert_eq!(f.bird().y, BIRD_START_Y + GRAVITY);

        f.step(&TickInput::action(), 16.7);
        assert_eq!(f.velocity(), FLAP_VELOCITY + GRAVITY);
    }

    #[test]
    fn test_falling_out_is_game_over() {
        let mut f = Flappy::new(1);
        for _ in 0..60 {
            f.step(&TickInput::default(), 16.7);
        }
        assert_eq!(f.outcome(), Some(Outcome::GameOver));
        assert!(f.bird().y + BIRD_RADIUS >= HEIGHT);
    }

    #[test]
    fn test_pipe_spawns_every_90_ticks() {
        let mut f = Flappy::new(4);
        for _ in 0..PIPE_EVERY_TICKS - 1 {
            hover(&mut f);
        }
        assert!(f.pipes().is_empty());
        hover(&mut f);
        assert_eq!(f.pipes().len(), 1);
        let pipe = f.pipes()[0];
        assert_eq!(pipe.x, WIDTH - PIPE_SPEED);
        assert!((PIPE_MIN_HEIGHT..HEIGHT - PIPE_GAP - PIPE_MIN_HEIGHT).contains(&pipe.gap_top));
        assert!(f.outcome().is_none());
    }

    #[test]
    fn test_passing_pipe_scores_once() {
        let mut f = Flappy::new(1);
        f.pipes.push(Pipe {
            x: 48.0,
            gap_top: 200.0,
            scored: false,
        });
        f.step(&TickInput::default(), 16.7);
        assert!(f.outcome().is_none());
        assert_eq!(f.score(), 1);
        f.step(&TickInput::default(), 16.7);
        assert_eq!(f.score(), 1);
    }

    #[test]
    fn test_pipe_hit_is_game_over() {
        let mut f = Flappy::new(1);
        f.pipes.push(Pipe {
            x: 100.0,
            gap_top: 350.0,
            scored: false,
        });
        f.step(&TickInput::default(), 16.7);
        assert_eq!(f.outcome(), Some(Outcome::GameOver));
    }

    #[test]
    fn test_offscreen_pipes_are_dropped() {
        let mut f = Flappy::new(1);
        f.pipes.push(Pipe {
            x: -49.0,
            gap_top: 200.0,
            scored: true,
        });
        f.step(&TickInput::default(), 16.7);
        assert!(f.pipes().is_empty());
    }
}
