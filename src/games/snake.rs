//! Snake
//!
//! Ordered body cells (head first) on a 25x25 board. The snake sits still
//! until the first directional input, then advances one cell per tick.
//! Food comes in three kinds; the fast kind permanently shortens the tick
//! interval and the invincible kind grants a short immunity window.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{DrawList, colors};
use crate::sim::{Cadence, Direction, GridPos, Hud, Outcome, Simulation, TickInput};

pub const COLS: i32 = 25;
pub const ROWS: i32 = 25;
/// Cell size in pixels
pub const CELL: f32 = 20.0;

pub const BASE_INTERVAL_MS: f32 = 100.0;
pub const MIN_INTERVAL_MS: f32 = 50.0;
/// Interval shaved off for every 50 points
const SCORE_STEP_MS: f32 = 2.0;
/// Permanent interval reduction per fast food
pub const FAST_FOOD_MS: f32 = 5.0;
/// Immunity window granted by invincible food
pub const INVINCIBLE_TICKS: u32 = 50;

const START: GridPos = GridPos::new(10, 10);
const FIRST_FOOD: GridPos = GridPos::new(15, 15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Normal,
    Fast,
    Invincible,
}

impl FoodKind {
    pub fn points(self) -> u32 {
        match self {
            FoodKind::Normal => 10,
            FoodKind::Fast => 50,
            FoodKind::Invincible => 30,
        }
    }

    /// 80% normal, 10% fast, 10% invincible
    fn roll(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..100) {
            0..80 => FoodKind::Normal,
            80..90 => FoodKind::Fast,
            _ => FoodKind::Invincible,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub pos: GridPos,
    pub kind: FoodKind,
}

pub struct Snake {
    rng: Pcg32,
    /// Head first
    body: VecDeque<GridPos>,
    heading: Option<Direction>,
    food: Option<Food>,
    score: u32,
    speedup_ms: f32,
    invincible_ticks: u32,
    outcome: Option<Outcome>,
}

impl Snake {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            body: VecDeque::from([START]),
            heading: None,
            food: Some(Food {
                pos: FIRST_FOOD,
                kind: FoodKind::Normal,
            }),
            score: 0,
            speedup_ms: 0.0,
            invincible_ticks: 0,
            outcome: None,
        }
    }

    pub fn body(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.body.iter().copied()
    }

    pub fn head(&self) -> GridPos {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Current tick interval, derived from score plus fast-food bonuses
    pub fn interval_ms(&self) -> f32 {
        let from_score = (self.score / 50) as f32 * SCORE_STEP_MS;
        (BASE_INTERVAL_MS - from_score - self.speedup_ms).max(MIN_INTERVAL_MS)
    }

    fn in_bounds(pos: GridPos) -> bool {
        (0..COLS).contains(&pos.col) && (0..ROWS).contains(&pos.row)
    }

    /// Apply a direction change, rejecting reversals
    fn turn(&mut self, dir: Direction) {
        match self.heading {
            Some(current) if dir == current.opposite() => {}
            _ => self.heading = Some(dir),
        }
    }

    fn eat(&mut self, kind: FoodKind) {
        self.score += kind.points();
        match kind {
            FoodKind::Normal => {}
            FoodKind::Fast => self.speedup_ms += FAST_FOOD_MS,
            FoodKind::Invincible => self.invincible_ticks = INVINCIBLE_TICKS,
        }
        log::debug!("Snake ate {kind:?}, score {}", self.score);
    }

    /// Place food on a random free cell; a full board is a win
    fn spawn_food(&mut self) {
        let free: Vec<GridPos> = (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| GridPos::new(col, row)))
            .filter(|p| !self.body.contains(p))
            .collect();

        if free.is_empty() {
            self.food = None;
            self.outcome = Some(Outcome::Won);
            return;
        }
        let pos = free[self.rng.random_range(0..free.len())];
        let kind = FoodKind::roll(&mut self.rng);
        self.food = Some(Food { pos, kind });
    }
}

impl Simulation for Snake {
    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(dir) = input.pressed {
            self.turn(dir);
        }
        let Some(heading) = self.heading else {
            return;
        };

        let head = self.head().step(heading);
        let blocked = !Self::in_bounds(head) || self.body.contains(&head);
        if blocked {
            if self.invincible_ticks > 0 {
                // Immune: hold position this tick instead of dying
                self.invincible_ticks -= 1;
                return;
            }
            self.outcome = Some(Outcome::GameOver);
            return;
        }

        self.body.push_front(head);
        match self.food {
            Some(food) if food.pos == head => {
                self.eat(food.kind);
                self.spawn_food();
            }
            _ => {
                self.body.pop_back();
            }
        }

        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
    }

    fn cadence(&self) -> Cadence {
        Cadence::fixed(self.interval_ms())
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn hud(&self) -> Hud {
        Hud::score(self.score)
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(COLS as f32 * CELL, ROWS as f32 * CELL)
    }

    fn draw(&self, list: &mut DrawList) {
        let size = self.viewport();
        list.clear(colors::BACKGROUND);
        for i in 0..COLS {
            list.fill_rect(i as f32 * CELL, 0.0, 1.0, size.y, colors::GRID_LINE);
        }
        for i in 0..ROWS {
            list.fill_rect(0.0, i as f32 * CELL, size.x, 1.0, colors::GRID_LINE);
        }

        if let Some(food) = self.food {
            let color = match food.kind {
                FoodKind::Normal => colors::ACCENT,
                FoodKind::Fast => colors::YELLOW,
                FoodKind::Invincible => colors::PURPLE,
            };
            list.fill_rect(
                food.pos.col as f32 * CELL,
                food.pos.row as f32 * CELL,
                CELL - 2.0,
                CELL - 2.0,
                color,
            );
        }

        for (i, seg) in self.body.iter().enumerate() {
            let mut color = if i == 0 {
                colors::PRIMARY
            } else {
                colors::PRIMARY_DARK
            };
            if self.is_invincible() {
                color = colors::with_alpha(colors::PURPLE, 0.6 + 0.4 * (i % 2) as f32);
            }
            list.fill_rect(
                seg.col as f32 * CELL + 1.0,
                seg.row as f32 * CELL + 1.0,
                CELL - 2.0,
                CELL - 2.0,
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn right() -> TickInput {
        TickInput::press(Direction::Right)
    }

    #[test]
    fn test_idle_until_first_direction() {
        let mut snake = Snake::new(1);
        for _ in 0..5 {
            snake.step(&TickInput::default(), BASE_INTERVAL_MS);
        }
        assert_eq!(snake.head(), START);
        assert!(snake.outcome().is_none());
    }

    #[test]
    fn test_three_steps_right() {
        let mut snake = Snake::new(1);
        snake.step(&right(), BASE_INTERVAL_MS);
        snake.step(&TickInput::default(), BASE_INTERVAL_MS);
        snake.step(&TickInput::default(), BASE_INTERVAL_MS);
        assert_eq!(snake.head(), GridPos::new(13, 10));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.score(), 0);
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut snake = Snake::new(1);
        snake.step(&right(), BASE_INTERVAL_MS);
        snake.step(&TickInput::press(Direction::Left), BASE_INTERVAL_MS);
        assert_eq!(snake.head(), GridPos::new(12, 10));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut snake = Snake::new(3);
        snake.food = Some(Food {
            pos: GridPos::new(11, 10),
            kind: FoodKind::Normal,
        });
        snake.step(&right(), BASE_INTERVAL_MS);
        assert_eq!(snake.score(), 10);
        assert_eq!(snake.len(), 2);

        let food = snake.food().expect("food respawned");
        assert!(!snake.body().any(|p| p == food.pos));
    }

    #[test]
    fn test_fast_food_shortens_interval() {
        let mut snake = Snake::new(3);
        snake.food = Some(Food {
            pos: GridPos::new(11, 10),
            kind: FoodKind::Fast,
        });
        snake.step(&right(), BASE_INTERVAL_MS);
        assert_eq!(snake.score(), 50);
        // 50 points also crosses the first score step
        assert_eq!(snake.interval_ms(), BASE_INTERVAL_MS - FAST_FOOD_MS - SCORE_STEP_MS);

        snake.speedup_ms = 1000.0;
        assert_eq!(snake.interval_ms(), MIN_INTERVAL_MS);
    }

    #[test]
    fn test_wall_hit_is_game_over() {
        let mut snake = Snake::new(1);
        snake.food = None;
        snake.step(&TickInput::press(Direction::Up), BASE_INTERVAL_MS);
        for _ in 0..20 {
            snake.step(&TickInput::default(), BASE_INTERVAL_MS);
        }
        assert_eq!(snake.outcome(), Some(Outcome::GameOver));
        assert_eq!(snake.head(), GridPos::new(10, 0));
    }

    #[test]
    fn test_invincibility_holds_at_wall() {
        let mut snake = Snake::new(1);
        snake.food = None;
        snake.body = VecDeque::from([GridPos::new(10, 0)]);
        snake.invincible_ticks = 3;
        snake.step(&TickInput::press(Direction::Up), BASE_INTERVAL_MS);
        assert!(snake.outcome().is_none());
        assert_eq!(snake.head(), GridPos::new(10, 0));

        snake.step(&TickInput::default(), BASE_INTERVAL_MS);
        snake.step(&TickInput::default(), BASE_INTERVAL_MS);
        snake.step(&TickInput::default(), BASE_INTERVAL_MS);
        assert_eq!(snake.outcome(), Some(Outcome::GameOver));
    }

    #[test]
    fn test_full_board_is_won() {
        let mut snake = Snake::new(1);
        snake.body = (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| GridPos::new(col, row)))
            .collect();
        snake.spawn_food();
        assert_eq!(snake.outcome(), Some(Outcome::Won));
        assert!(snake.food().is_none());
    }

    fn dir_from(n: u8) -> Direction {
        Direction::ALL[(n % 4) as usize]
    }

    proptest! {
        #[test]
        fn prop_body_unique_and_in_bounds(
            seed in any::<u64>(),
            moves in prop::collection::vec(prop::option::of(0u8..4), 1..400),
        ) {
            let mut snake = Snake::new(seed);
            for m in moves {
                let input = TickInput {
                    pressed: m.map(dir_from),
                    ..Default::default()
                };
                snake.step(&input, BASE_INTERVAL_MS);
                if snake.outcome().is_some() {
                    break;
                }
                let cells: HashSet<GridPos> = snake.body().collect();
                prop_assert_eq!(cells.len(), snake.len());
                prop_assert!(Snake::in_bounds(snake.head()));
            }
        }
    }
}
