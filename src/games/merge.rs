//! 2048
//!
//! 4x4 grid of powers of two. A move compresses each line toward the move
//! direction, merges each equal pair once, and compresses again. A move
//! that changes nothing spawns nothing.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{Color, DrawList};
use crate::sim::{Cadence, Direction, Grid, Hud, Outcome, Simulation, TickInput};

pub const SIZE: usize = 4;
pub const TARGET: u32 = 2048;
const TILE: f32 = 110.0;
const MARGIN: f32 = 15.0;
/// Probability that a spawned tile is a 2 (otherwise 4)
const TWO_CHANCE: f64 = 0.9;

/// Slide one line toward index 0; returns the new line and the merged total
pub fn slide_line(line: [u32; SIZE]) -> ([u32; SIZE], u32) {
    let tiles: Vec<u32> = line.into_iter().filter(|v| *v != 0).collect();
    let mut out = [0; SIZE];
    let mut gained = 0;
    let mut i = 0;
    let mut n = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            let merged = tiles[i] * 2;
            out[n] = merged;
            gained += merged;
            i += 2;
        } else {
            out[n] = tiles[i];
            i += 1;
        }
        n += 1;
    }
    (out, gained)
}

/// Cell coordinates of line `k`, ordered from the edge the tiles move toward
fn line_cells(dir: Direction, k: usize) -> [(usize, usize); SIZE] {
    let mut cells = [(0, 0); SIZE];
    for (i, cell) in cells.iter_mut().enumerate() {
        *cell = match dir {
            Direction::Left => (k, i),
            Direction::Right => (k, SIZE - 1 - i),
            Direction::Up => (i, k),
            Direction::Down => (SIZE - 1 - i, k),
        };
    }
    cells
}

/// Apply a move to a grid; returns the new grid and the merged total
pub fn apply_move(grid: &Grid<u32>, dir: Direction) -> (Grid<u32>, u32) {
    let mut out = grid.clone();
    let mut gained = 0;
    for k in 0..SIZE {
        let cells = line_cells(dir, k);
        let line = cells.map(|(r, c)| grid.get(r, c).copied().unwrap_or(0));
        let (slid, g) = slide_line(line);
        gained += g;
        for ((r, c), v) in cells.into_iter().zip(slid) {
            out.set(r, c, v);
        }
    }
    (out, gained)
}

/// No empty cell and no equal orthogonal neighbours
pub fn is_stuck(grid: &Grid<u32>) -> bool {
    if grid.values().any(|v| *v == 0) {
        return false;
    }
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = grid.get(r, c);
            if (c + 1 < SIZE && grid.get(r, c + 1) == v) || (r + 1 < SIZE && grid.get(r + 1, c) == v) {
                return false;
            }
        }
    }
    true
}

pub struct Merge {
    rng: Pcg32,
    grid: Grid<u32>,
    score: u32,
    won_banner: bool,
    outcome: Option<Outcome>,
}

impl Merge {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            rng: Pcg32::seed_from_u64(seed),
            grid: Grid::new(SIZE, SIZE, 0),
            score: 0,
            won_banner: false,
            outcome: None,
        };
        game.spawn_tile();
        game.spawn_tile();
        game
    }

    pub fn grid(&self) -> &Grid<u32> {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Place a 2 or 4 on a random empty cell; returns the spawned value
    fn spawn_tile(&mut self) -> Option<u32> {
        let empty: Vec<(usize, usize)> = self
            .grid
            .iter()
            .filter(|(_, _, v)| **v == 0)
            .map(|(r, c, _)| (r, c))
            .collect();
        if empty.is_empty() {
            return None;
        }
        let (r, c) = empty[self.rng.random_range(0..empty.len())];
        let value = if self.rng.random_bool(TWO_CHANCE) { 2 } else { 4 };
        self.grid.set(r, c, value);
        Some(value)
    }

    fn play(&mut self, dir: Direction) {
        let (next, gained) = apply_move(&self.grid, dir);
        if next == self.grid {
            return;
        }
        self.grid = next;
        self.score += gained;
        self.spawn_tile();

        if !self.won_banner && self.grid.values().any(|v| *v >= TARGET) {
            log::info!("2048 reached");
            self.won_banner = true;
        }
        if is_stuck(&self.grid) {
            self.outcome = Some(Outcome::GameOver);
        }
    }
}

fn tile_color(value: u32) -> Color {
    let hex: u32 = match value {
        0 => 0xcdc1b4,
        2 => 0xeee4da,
        4 => 0xede0c8,
        8 => 0xf2b179,
        16 => 0xf59563,
        32 => 0xf67c5f,
        64 => 0xf65e3b,
        128 => 0xedcf72,
        256 => 0xedcc61,
        512 => 0xedc850,
        1024 => 0xedc53f,
        2048 => 0xedc22e,
        _ => 0x3c3a32,
    };
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

impl Simulation for Merge {
    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(dir) = input.pressed {
            self.play(dir);
        }
    }

    fn cadence(&self) -> Cadence {
        Cadence::fixed(crate::consts::FRAME_MS)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn hud(&self) -> Hud {
        Hud {
            won_banner: self.won_banner,
            ..Hud::score(self.score)
        }
    }

    fn viewport(&self) -> Vec2 {
        Vec2::splat(MARGIN + SIZE as f32 * (TILE + MARGIN))
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear([0.733, 0.678, 0.627, 1.0]);
        for (r, c, v) in self.grid.iter() {
            let x = MARGIN + c as f32 * (TILE + MARGIN);
            let y = MARGIN + r as f32 * (TILE + MARGIN);
            list.fill_rect(x, y, TILE, TILE, tile_color(*v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_from(rows: [[u32; SIZE]; SIZE]) -> Grid<u32> {
        Grid::from_rows(rows.iter().map(|r| r.to_vec()).collect())
    }

    fn sum(grid: &Grid<u32>) -> u32 {
        grid.values().sum()
    }

    #[test]
    fn test_slide_line_merges_once() {
        assert_eq!(slide_line([2, 2, 4, 0]), ([4, 4, 0, 0], 4));
        assert_eq!(slide_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(slide_line([4, 0, 4, 8]), ([8, 8, 0, 0], 8));
        assert_eq!(slide_line([2, 4, 8, 16]), ([2, 4, 8, 16], 0));
    }

    #[test]
    fn test_directions() {
        let g = grid_from([[2, 0, 0, 2], [0, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0]]);
        let (right, _) = apply_move(&g, Direction::Right);
        assert_eq!(right.row(0), &[0, 0, 0, 4]);
        let (down, _) = apply_move(&g, Direction::Down);
        assert_eq!(down.get(3, 0), Some(&4));
        assert_eq!(down.get(3, 3), Some(&2));
    }

    #[test]
    fn test_left_move_scores_and_spawns() {
        let mut m = Merge::new(5);
        m.grid = grid_from([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
        m.step(&TickInput::press(Direction::Left), 16.7);
        assert_eq!(&m.grid().row(0)[..2], &[4, 4]);
        assert_eq!(m.score(), 4);
        let spawned = sum(m.grid()) - 8;
        assert!(spawned == 2 || spawned == 4);
    }

    #[test]
    fn test_noop_move_spawns_nothing() {
        let mut m = Merge::new(5);
        m.grid = grid_from([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = m.grid().clone();
        m.step(&TickInput::press(Direction::Left), 16.7);
        assert_eq!(m.grid(), &before);
        assert_eq!(m.score(), 0);
    }

    #[test]
    fn test_starts_with_two_tiles() {
        let m = Merge::new(8);
        assert_eq!(m.grid().values().filter(|v| **v != 0).count(), 2);
    }

    #[test]
    fn test_reaching_2048_raises_banner_without_ending() {
        let mut m = Merge::new(5);
        m.grid = grid_from([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        m.step(&TickInput::press(Direction::Left), 16.7);
        let hud = m.hud();
        assert!(hud.won_banner);
        assert!(m.outcome().is_none());
        assert_eq!(m.score(), 2048);
    }

    #[test]
    fn test_stuck_board_is_game_over() {
        let stuck = grid_from([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(is_stuck(&stuck));
        let mergeable = grid_from([[2, 2, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!is_stuck(&mergeable));

        // Row 0 slides left and the spawn at (0,3) (a 2 or 4) has no partner
        let mut m = Merge::new(5);
        m.grid = grid_from([
            [0, 8, 16, 8],
            [16, 32, 64, 32],
            [32, 64, 128, 64],
            [64, 128, 256, 128],
        ]);
        m.step(&TickInput::press(Direction::Left), 16.7);
        assert_eq!(&m.grid().row(0)[..3], &[8, 16, 8]);
        assert!(is_stuck(m.grid()));
        assert_eq!(m.outcome(), Some(Outcome::GameOver));

        // Frozen after game over
        let frozen = m.grid().clone();
        m.step(&TickInput::press(Direction::Right), 16.7);
        assert_eq!(m.grid(), &frozen);
    }

    proptest! {
        #[test]
        fn prop_move_conserves_sum_plus_spawn(
            seed in any::<u64>(),
            exps in prop::collection::vec(0u32..7, SIZE * SIZE),
            dir in 0usize..4,
        ) {
            let mut m = Merge::new(seed);
            let rows: Vec<Vec<u32>> = exps
                .chunks(SIZE)
                .map(|r| r.iter().map(|e| if *e == 0 { 0 } else { 1 << e }).collect())
                .collect();
            m.grid = Grid::from_rows(rows);
            let before = m.grid().clone();
            let (expected, gained) = apply_move(&before, Direction::ALL[dir]);

            m.step(&TickInput::press(Direction::ALL[dir]), 16.7);

            if expected == before {
                prop_assert_eq!(m.grid(), &before);
                prop_assert_eq!(m.score(), 0);
            } else {
                prop_assert_eq!(m.score(), gained);
                let spawned = sum(m.grid()) - sum(&before);
                prop_assert!(spawned == 2 || spawned == 4);
            }
        }
    }
}
