//! Platformer
//!
//! Run and jump across fixed platforms, collect coins, dodge two patrolling
//! enemies and reach the goal flag. Landing happens only while falling and
//! only onto a platform the player was above on the previous tick.

use glam::Vec2;

use crate::renderer::{DrawList, colors};
use crate::sim::{Cadence, Hud, Outcome, Rect, Simulation, TickInput};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 500.0;

pub const GRAVITY: f32 = 0.6;
pub const JUMP_SPEED: f32 = 12.0;
pub const RUN_SPEED: f32 = 5.0;
pub const PLAYER_SIZE: Vec2 = Vec2::new(30.0, 40.0);
const SPAWN: Vec2 = Vec2::new(50.0, 350.0);

pub const COIN_RADIUS: f32 = 20.0;
pub const COIN_POINTS: u32 = 100;
pub const ENEMY_SPEED: f32 = 2.0;
pub const START_LIVES: u32 = 3;

const PLATFORMS: [Rect; 6] = [
    Rect::new(0.0, 450.0, 800.0, 50.0),
    Rect::new(150.0, 380.0, 100.0, 20.0),
    Rect::new(320.0, 320.0, 100.0, 20.0),
    Rect::new(490.0, 260.0, 100.0, 20.0),
    Rect::new(660.0, 200.0, 100.0, 20.0),
    Rect::new(200.0, 150.0, 150.0, 20.0),
];

const COINS: [Vec2; 5] = [
    Vec2::new(180.0, 340.0),
    Vec2::new(350.0, 280.0),
    Vec2::new(520.0, 220.0),
    Vec2::new(690.0, 160.0),
    Vec2::new(250.0, 110.0),
];

const GOAL: Rect = Rect::new(750.0, 370.0, 30.0, 80.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    start_x: f32,
    range: f32,
    dir: f32,
}

impl Enemy {
    const fn new(x: f32, range: f32) -> Self {
        Self {
            rect: Rect::new(x, 410.0, 30.0, 30.0),
            start_x: x,
            range,
            dir: 1.0,
        }
    }

    fn patrol(&mut self) {
        self.rect.min.x += self.dir * ENEMY_SPEED;
        let x = self.rect.min.x;
        if x > self.start_x + self.range || x < self.start_x {
            self.dir = -self.dir;
        }
    }
}

/// Pick the platform top the body lands on this tick, if any
///
/// A platform qualifies when the body overlaps it horizontally, was at or
/// above its top last tick (`prev_bottom`), has reached or crossed it now,
/// and is not rising. The highest qualifying top wins.
pub fn landing_top(body: Rect, prev_bottom: f32, vy: f32, platforms: &[Rect]) -> Option<f32> {
    if vy < 0.0 {
        return None;
    }
    platforms
        .iter()
        .filter(|p| body.left() < p.right() && body.right() > p.left())
        .map(|p| p.top())
        .filter(|top| prev_bottom <= *top && body.bottom() >= *top)
        .min_by(|a, b| a.total_cmp(b))
}

pub struct Platformer {
    pos: Vec2,
    vel: Vec2,
    grounded: bool,
    coins: [bool; COINS.len()],
    enemies: Vec<Enemy>,
    score: u32,
    lives: u32,
    outcome: Option<Outcome>,
}

impl Platformer {
    pub fn new() -> Self {
        Self {
            pos: SPAWN,
            vel: Vec2::ZERO,
            grounded: false,
            coins: [false; COINS.len()],
            enemies: vec![Enemy::new(300.0, 100.0), Enemy::new(600.0, 150.0)],
            score: 0,
            lives: START_LIVES,
            outcome: None,
        }
    }

    pub fn player_rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_SIZE.x, PLAYER_SIZE.y)
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn coins_left(&self) -> usize {
        self.coins.iter().filter(|taken| !**taken).count()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Life lost, {} left", self.lives);
        if self.lives == 0 {
            self.outcome = Some(Outcome::GameOver);
        } else {
            self.pos = SPAWN;
            self.vel = Vec2::ZERO;
            self.grounded = false;
        }
    }

    fn move_player(&mut self, input: &TickInput) {
        self.vel.x = input.held.horizontal() * RUN_SPEED;
        if input.action_or_up() && self.grounded {
            self.vel.y = -JUMP_SPEED;
            self.grounded = false;
        }

        let prev_bottom = self.player_rect().bottom();
        self.pos.x += self.vel.x;
        self.vel.y += GRAVITY;
        self.pos.y += self.vel.y;

        match landing_top(self.player_rect(), prev_bottom, self.vel.y, &PLATFORMS) {
            Some(top) => {
                self.pos.y = top - PLAYER_SIZE.y;
                self.vel.y = 0.0;
                self.grounded = true;
            }
            None => self.grounded = false,
        }

        self.pos.x = self.pos.x.clamp(0.0, WIDTH - PLAYER_SIZE.x);
    }

    fn collect_coins(&mut self) {
        let center = self.player_rect().center();
        for (taken, coin) in self.coins.iter_mut().zip(COINS) {
            if !*taken && center.distance(coin) < COIN_RADIUS {
                *taken = true;
                self.score += COIN_POINTS;
            }
        }
    }
}

impl Default for Platformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for Platformer {
    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        if self.outcome.is_some() {
            return;
        }
        self.move_player(input);

        if self.pos.y > HEIGHT {
            self.lose_life();
            if self.outcome.is_some() {
                return;
            }
        }

        self.collect_coins();

        let body = self.player_rect();
        if self.enemies.iter().any(|e| e.rect.overlaps(&body)) {
            self.lose_life();
            if self.outcome.is_some() {
                return;
            }
        }

        if self.player_rect().overlaps(&GOAL) {
            log::info!("Goal reached with {} points", self.score);
            self.outcome = Some(Outcome::Won);
            return;
        }

        for enemy in &mut self.enemies {
            enemy.patrol();
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
        list.clear([0.53, 0.81, 0.92, 1.0]);

        let soil = [0.545, 0.271, 0.075, 1.0];
        for p in &PLATFORMS {
            list.rect(*p, soil);
            list.fill_rect(p.left(), p.top(), p.size.x, 5.0, colors::GREEN);
        }

        for (taken, coin) in self.coins.iter().zip(COINS) {
            if !taken {
                list.circle(coin, 10.0, colors::GOLD);
            }
        }

        for e in &self.enemies {
            let r = e.rect;
            list.rect(r, colors::PURPLE);
            list.fill_rect(r.left() + 5.0, r.top() + 8.0, 6.0, 6.0, colors::RED);
            list.fill_rect(r.left() + 19.0, r.top() + 8.0, 6.0, 6.0, colors::RED);
        }

        list.rect(GOAL, colors::GREEN);
        let pole = GOAL.left() + GOAL.size.x / 2.0;
        list.triangle(
            Vec2::new(pole, GOAL.top()),
            Vec2::new(pole + 30.0, GOAL.top() + 15.0),
            Vec2::new(pole, GOAL.top() + 30.0),
            colors::YELLOW,
        );

        let p = self.player_rect();
        list.rect(p, colors::RED);
        list.fill_rect(p.left(), p.top() - 8.0, p.size.x, 8.0, colors::with_alpha(colors::RED, 0.7));
        list.fill_rect(p.left() + 8.0, p.top() + 10.0, 5.0, 5.0, colors::BACKGROUND);
        list.fill_rect(p.left() + 17.0, p.top() + 10.0, 5.0, 5.0, colors::BACKGROUND);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;
    use proptest::prelude::*;

    fn settle(p: &mut Platformer) {
        for _ in 0..60 {
            p.step(&TickInput::default(), 16.7);
        }
    }

    #[test]
    fn test_falls_onto_ground() {
        let mut p = Platformer::new();
        assert!(!p.is_grounded());
        settle(&mut p);
        assert!(p.is_grounded());
        assert_eq!(p.player_rect().bottom(), 450.0);
        assert_eq!(p.velocity().y, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut p = Platformer::new();
        p.step(&TickInput::action(), 16.7);
        assert!(p.velocity().y > 0.0);

        settle(&mut p);
        p.step(&TickInput::action(), 16.7);
        assert_eq!(p.velocity().y, -JUMP_SPEED + GRAVITY);
        assert!(!p.is_grounded());

        // Mid-air press does nothing
        p.step(&TickInput::press(Direction::Up), 16.7);
        assert!((p.velocity().y - (-JUMP_SPEED + 2.0 * GRAVITY)).abs() < 1e-4);
    }

    #[test]
    fn test_rising_passes_through_platform() {
        let mut p = Platformer::new();
        // Just under the first raised platform, moving up
        p.pos = Vec2::new(160.0, 400.0);
        p.vel = Vec2::new(0.0, -JUMP_SPEED);
        p.step(&TickInput::default(), 16.7);
        assert!(!p.is_grounded());
        assert!(p.player_rect().bottom() < 440.0);
    }

    #[test]
    fn test_lands_on_raised_platform() {
        let mut p = Platformer::new();
        p.pos = Vec2::new(160.0, 338.0);
        p.vel = Vec2::new(0.0, 3.0);
        p.step(&TickInput::default(), 16.7);
        assert!(p.is_grounded());
        assert_eq!(p.player_rect().bottom(), 380.0);
    }

    #[test]
    fn test_runs_and_clamps() {
        let mut p = Platformer::new();
        settle(&mut p);
        p.step(&TickInput::holding(Direction::Left), 16.7);
        assert_eq!(p.player_rect().left(), SPAWN.x - RUN_SPEED);
        for _ in 0..20 {
            p.step(&TickInput::holding(Direction::Left), 16.7);
        }
        assert_eq!(p.player_rect().left(), 0.0);
    }

    #[test]
    fn test_coin_pickup() {
        let mut p = Platformer::new();
        p.pos = Vec2::new(165.0, 320.0);
        p.step(&TickInput::default(), 16.7);
        assert_eq!(p.score(), COIN_POINTS);
        assert_eq!(p.coins_left(), COINS.len() - 1);
        p.step(&TickInput::default(), 16.7);
        assert_eq!(p.score(), COIN_POINTS);
    }

    #[test]
    fn test_enemy_touch_costs_life_and_respawns() {
        let mut p = Platformer::new();
        p.pos = Vec2::new(300.0, 400.0);
        p.step(&TickInput::default(), 16.7);
        assert_eq!(p.lives(), START_LIVES - 1);
        assert_eq!(p.player_rect().left(), SPAWN.x);
    }

    #[test]
    fn test_falling_out_costs_life() {
        let mut p = Platformer::new();
        p.pos = Vec2::new(100.0, 499.9);
        p.step(&TickInput::default(), 16.7);
        assert_eq!(p.lives(), START_LIVES - 1);

        p.lives = 1;
        p.pos = Vec2::new(100.0, 499.9);
        p.step(&TickInput::default(), 16.7);
        assert_eq!(p.outcome(), Some(Outcome::GameOver));
    }

    #[test]
    fn test_goal_wins() {
        let mut p = Platformer::new();
        p.pos = Vec2::new(740.0, 380.0);
        p.step(&TickInput::default(), 16.7);
        assert_eq!(p.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_enemy_patrol_turns_around() {
        let mut p = Platformer::new();
        p.lives = 1000;
        for _ in 0..51 {
            p.step(&TickInput::default(), 16.7);
        }
        // 51 steps of 2px carry the first enemy past its 100px range
        assert_eq!(p.enemies()[0].dir, -1.0);
        p.step(&TickInput::default(), 16.7);
        assert_eq!(p.enemies()[0].rect.left(), 400.0);
    }

    #[test]
    fn test_landing_picks_highest_top() {
        let platforms = [
            Rect::new(0.0, 100.0, 50.0, 10.0),
            Rect::new(0.0, 105.0, 50.0, 10.0),
        ];
        let body = Rect::new(10.0, 70.0, 30.0, 40.0);
        assert_eq!(landing_top(body, 95.0, 5.0, &platforms), Some(100.0));
        assert_eq!(landing_top(body, 95.0, -5.0, &platforms), None);
        // Started below the first top: only the second qualifies
        assert_eq!(landing_top(body, 101.0, 5.0, &platforms), Some(105.0));
    }

    proptest! {
        #[test]
        fn prop_landing_requires_falling_from_above(
            x in 0.0f32..800.0,
            y in 0.0f32..500.0,
            prev_dy in -20.0f32..20.0,
            vy in -15.0f32..15.0,
        ) {
            let body = Rect::new(x, y, PLAYER_SIZE.x, PLAYER_SIZE.y);
            let prev_bottom = body.bottom() - prev_dy;
            if let Some(top) = landing_top(body, prev_bottom, vy, &PLATFORMS) {
                prop_assert!(vy >= 0.0);
                prop_assert!(prev_bottom <= top);
                prop_assert!(body.bottom() >= top);
            }
        }
    }
}
