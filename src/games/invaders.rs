//! Wave shooter
//!
//! A 4x10 formation marches in lockstep, flips and steps down at the side
//! bounds, and fires at random. Clearing a wave brings a fresh formation
//! that marches faster.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{DrawList, colors};
use crate::sim::{Cadence, Grid, Hud, Outcome, Rect, Simulation, TickInput};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;

pub const FORMATION_ROWS: usize = 4;
pub const FORMATION_COLS: usize = 10;
const ORIGIN: Vec2 = Vec2::new(50.0, 50.0);
const SPACING: Vec2 = Vec2::new(70.0, 50.0);
pub const ENEMY_W: f32 = 40.0;
pub const ENEMY_H: f32 = 30.0;

pub const BASE_MARCH_SPEED: f32 = 1.0;
pub const MARCH_SPEEDUP: f32 = 0.5;
pub const STEP_DOWN: f32 = 20.0;
/// Chance per live enemy per tick
pub const ENEMY_FIRE_CHANCE: f64 = 0.001;

pub const SHIP_W: f32 = 40.0;
pub const SHIP_H: f32 = 30.0;
/// Top of the ship
pub const SHIP_Y: f32 = HEIGHT - 60.0;
const SHIP_SPEED: f32 = 5.0;

const PLAYER_BULLET_SPEED: f32 = 7.0;
const ENEMY_BULLET_SPEED: f32 = 5.0;
const BULLET_W: f32 = 3.0;
const BULLET_H: f32 = 10.0;

pub const START_LIVES: u32 = 3;
pub const KILL_POINTS: u32 = 100;

pub struct Invaders {
    rng: Pcg32,
    alive: Grid<bool>,
    /// Lockstep displacement of the whole formation from its origin
    offset: Vec2,
    march_dir: f32,
    march_speed: f32,
    /// Ship center x
    ship_x: f32,
    bullets: Vec<Vec2>,
    enemy_bullets: Vec<Vec2>,
    score: u32,
    lives: u32,
    wave: u32,
    outcome: Option<Outcome>,
}

impl Invaders {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            alive: Grid::new(FORMATION_ROWS, FORMATION_COLS, true),
            offset: Vec2::ZERO,
            march_dir: 1.0,
            march_speed: BASE_MARCH_SPEED,
            ship_x: WIDTH / 2.0,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            score: 0,
            lives: START_LIVES,
            wave: 1,
            outcome: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn march_speed(&self) -> f32 {
        self.march_speed
    }

    pub fn enemies_left(&self) -> usize {
        self.alive.values().filter(|a| **a).count()
    }

    pub fn enemy_rect(&self, row: usize, col: usize) -> Rect {
        let pos = ORIGIN + SPACING * Vec2::new(col as f32, row as f32) + self.offset;
        Rect::new(pos.x, pos.y, ENEMY_W, ENEMY_H)
    }

    fn ship_rect(&self) -> Rect {
        Rect::new(self.ship_x - SHIP_W / 2.0, SHIP_Y, SHIP_W, SHIP_H)
    }

    fn live_enemies(&self) -> impl Iterator<Item = Rect> + '_ {
        self.alive
            .iter()
            .filter(|(_, _, alive)| **alive)
            .map(|(r, c, _)| self.enemy_rect(r, c))
    }

    fn update_ship(&mut self, input: &TickInput) {
        let half = SHIP_W / 2.0;
        self.ship_x = (self.ship_x + input.held.horizontal() * SHIP_SPEED).clamp(half, WIDTH - half);
        if input.action {
            self.bullets.push(Vec2::new(self.ship_x, SHIP_Y));
        }
    }

    fn update_bullets(&mut self) {
        let mut bullets = std::mem::take(&mut self.bullets);
        bullets.retain_mut(|b| {
            b.y -= PLAYER_BULLET_SPEED;
            let hit = self
                .alive
                .iter()
                .filter(|(_, _, alive)| **alive)
                .map(|(r, c, _)| (r, c))
                .find(|(r, c)| self.enemy_rect(*r, *c).contains_point(*b));
            if let Some((r, c)) = hit {
                self.alive.set(r, c, false);
                self.score += KILL_POINTS;
                return false;
            }
            b.y > 0.0
        });
        self.bullets = bullets;

        let ship = self.ship_rect();
        let mut hits = 0;
        self.enemy_bullets.retain_mut(|b| {
            b.y += ENEMY_BULLET_SPEED;
            if ship.contains_point(*b) {
                hits += 1;
                return false;
            }
            b.y < HEIGHT
        });
        if hits > 0 {
            self.lives = self.lives.saturating_sub(hits);
            log::debug!("Ship hit, {} lives left", self.lives);
            if self.lives == 0 {
                self.outcome = Some(Outcome::GameOver);
            }
        }
    }

    fn update_formation(&mut self) {
        self.offset.x += self.march_dir * self.march_speed;

        let mut at_edge = false;
        let mut shots = Vec::new();
        let enemies: Vec<Rect> = self.live_enemies().collect();
        for rect in &enemies {
            if rect.left() <= 0.0 || rect.right() >= WIDTH {
                at_edge = true;
            }
            if self.rng.random_bool(ENEMY_FIRE_CHANCE) {
                shots.push(Vec2::new(rect.center().x, rect.bottom()));
            }
        }
        self.enemy_bullets.extend(shots);

        if at_edge {
            self.march_dir = -self.march_dir;
            self.offset.y += STEP_DOWN;
            if self.live_enemies().any(|r| r.bottom() >= SHIP_Y) {
                log::debug!("Formation landed");
                self.outcome = Some(Outcome::GameOver);
                return;
            }
        }

        if self.enemies_left() == 0 {
            self.next_wave();
        }
    }

    fn next_wave(&mut self) {
        self.wave += 1;
        self.march_speed += MARCH_SPEEDUP;
        self.alive = Grid::new(FORMATION_ROWS, FORMATION_COLS, true);
        self.offset = Vec2::ZERO;
        self.march_dir = 1.0;
        log::info!("Wave {} (speed {})", self.wave, self.march_speed);
    }
}

impl Simulation for Invaders {
    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        if self.outcome.is_some() {
            return;
        }
        self.update_ship(input);
        self.update_bullets();
        if self.outcome.is_some() {
            return;
        }
        self.update_formation();
    }

    fn cadence(&self) -> Cadence {
        Cadence::fixed(crate::consts::FRAME_MS)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn hud(&self) -> Hud {
        Hud::score(self.score)
            .with_lives(self.lives)
            .with_level(self.wave)
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(WIDTH, HEIGHT)
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::BACKGROUND);

        list.triangle(
            Vec2::new(self.ship_x, SHIP_Y),
            Vec2::new(self.ship_x - SHIP_W / 2.0, SHIP_Y + SHIP_H),
            Vec2::new(self.ship_x + SHIP_W / 2.0, SHIP_Y + SHIP_H),
            colors::GREEN,
        );

        for rect in self.live_enemies() {
            list.rect(rect, colors::PINK);
            list.fill_rect(rect.left() + 10.0, rect.top() + 10.0, 8.0, 8.0, colors::BACKGROUND);
            list.fill_rect(rect.left() + 22.0, rect.top() + 10.0, 8.0, 8.0, colors::BACKGROUND);
        }

        for b in &self.bullets {
            list.fill_rect(b.x, b.y, BULLET_W, BULLET_H, colors::CYAN);
        }
        for b in &self.enemy_bullets {
            list.fill_rect(b.x, b.y, BULLET_W, BULLET_H, colors::RED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;

    #[test]
    fn test_initial_formation() {
        let g = Invaders::new(1);
        assert_eq!(g.enemies_left(), 40);
        assert_eq!(g.enemy_rect(0, 0), Rect::new(50.0, 50.0, 40.0, 30.0));
        assert_eq!(g.enemy_rect(3, 9), Rect::new(680.0, 200.0, 40.0, 30.0));
        assert_eq!(g.hud().level, Some(1));
    }

    #[test]
    fn test_bullet_kills_enemy() {
        let mut g = Invaders::new(1);
        let target = g.enemy_rect(3, 4).center();
        // One tick of travel lands the bullet on the enemy center
        g.bullets.push(target + Vec2::new(0.0, PLAYER_BULLET_SPEED));
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.enemies_left(), 39);
        assert_eq!(g.score(), KILL_POINTS);
        assert!(g.bullets.is_empty());
    }

    #[test]
    fn test_action_fires_from_ship() {
        let mut g = Invaders::new(1);
        g.step(&TickInput::action(), 16.7);
        assert_eq!(g.bullets.len(), 1);
        assert_eq!(g.bullets[0], Vec2::new(WIDTH / 2.0, SHIP_Y - PLAYER_BULLET_SPEED));
    }

    #[test]
    fn test_bullet_leaves_top() {
        let mut g = Invaders::new(1);
        g.bullets.push(Vec2::new(10.0, 5.0));
        g.step(&TickInput::default(), 16.7);
        assert!(g.bullets.is_empty());
    }

    #[test]
    fn test_clearing_wave_spawns_faster_formation() {
        let mut g = Invaders::new(1);
        for a in g.alive.values_mut() {
            *a = false;
        }
        g.alive.set(0, 0, true);
        g.offset = Vec2::new(12.0, 40.0);
        let target = g.enemy_rect(0, 0).center();
        g.bullets.push(target + Vec2::new(0.0, PLAYER_BULLET_SPEED));

        g.step(&TickInput::default(), 16.7);

        assert_eq!(g.wave(), 2);
        assert_eq!(g.march_speed(), BASE_MARCH_SPEED + MARCH_SPEEDUP);
        assert_eq!(g.enemies_left(), 40);
        assert_eq!(g.enemy_rect(0, 0), Rect::new(50.0, 50.0, 40.0, 30.0));
        assert_eq!(g.score(), KILL_POINTS);
        assert_eq!(g.hud().level, Some(2));
    }

    #[test]
    fn test_flip_and_step_down_at_edge() {
        let mut g = Invaders::new(1);
        // Rightmost column ends at 720 + offset
        g.offset.x = 79.5;
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.march_dir, -1.0);
        assert_eq!(g.offset.y, STEP_DOWN);
        assert!(g.outcome().is_none());
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.offset.x, 79.5);
    }

    #[test]
    fn test_reaching_ship_row_is_game_over() {
        let mut g = Invaders::new(1);
        g.offset = Vec2::new(79.5, 310.0);
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.outcome(), Some(Outcome::GameOver));
    }

    #[test]
    fn test_enemy_bullet_costs_life() {
        let mut g = Invaders::new(1);
        g.enemy_bullets.push(Vec2::new(WIDTH / 2.0, SHIP_Y + 5.0 - ENEMY_BULLET_SPEED));
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.lives(), START_LIVES - 1);

        g.lives = 1;
        g.enemy_bullets = vec![Vec2::new(WIDTH / 2.0, SHIP_Y + 5.0 - ENEMY_BULLET_SPEED)];
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.outcome(), Some(Outcome::GameOver));
    }

    #[test]
    fn test_enemy_bullet_leaves_bottom() {
        let mut g = Invaders::new(1);
        g.enemy_bullets.push(Vec2::new(10.0, HEIGHT - 2.0));
        g.step(&TickInput::default(), 16.7);
        assert_eq!(g.lives(), START_LIVES);
        assert!(g.enemy_bullets.iter().all(|b| b.y < HEIGHT));
    }

    #[test]
    fn test_ship_moves_and_clamps() {
        let mut g = Invaders::new(1);
        g.lives = 1000;
        g.step(&TickInput::holding(Direction::Left), 16.7);
        assert_eq!(g.ship_x, WIDTH / 2.0 - SHIP_SPEED);
        for _ in 0..200 {
            g.step(&TickInput::holding(Direction::Right), 16.7);
        }
        assert_eq!(g.ship_x, WIDTH - SHIP_W / 2.0);
    }

    #[test]
    fn test_enemies_fire_eventually() {
        let mut g = Invaders::new(3);
        let mut fired = false;
        for _ in 0..500 {
            g.step(&TickInput::default(), 16.7);
            if !g.enemy_bullets.is_empty() {
                fired = true;
                break;
            }
        }
        assert!(fired);
    }
}
