//! Falling-block stacking
//!
//! 10x20 board of color ids (0 = empty). Driven every frame: elapsed time
//! accumulates against a level-dependent drop interval, and input shifts,
//! rotates or soft-drops the active piece between drops.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{Color, DrawList, colors};
use crate::sim::{Cadence, Direction, Grid, Hud, Outcome, Simulation, TickInput};

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
pub const BLOCK: f32 = 25.0;

const LINE_POINTS: u32 = 100;
const LINES_PER_LEVEL: u32 = 10;

/// Drop interval for a level, floored at 100ms
pub fn drop_interval_ms(level: u32) -> f32 {
    (1000.0 - (level.saturating_sub(1)) as f32 * 100.0).max(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Shape {
    pub const ALL: [Shape; 7] = [Shape::I, Shape::O, Shape::T, Shape::S, Shape::Z, Shape::J, Shape::L];

    fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Board color id (1-based)
    pub fn id(self) -> u8 {
        match self {
            Shape::I => 1,
            Shape::O => 2,
            Shape::T => 3,
            Shape::S => 4,
            Shape::Z => 5,
            Shape::J => 6,
            Shape::L => 7,
        }
    }

    fn matrix(self) -> Vec<Vec<bool>> {
        let rows: &[&[u8]] = match self {
            Shape::I => &[&[1, 1, 1, 1]],
            Shape::O => &[&[1, 1], &[1, 1]],
            Shape::T => &[&[0, 1, 0], &[1, 1, 1]],
            Shape::S => &[&[0, 1, 1], &[1, 1, 0]],
            Shape::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Shape::J => &[&[1, 0, 0], &[1, 1, 1]],
            Shape::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        rows.iter().map(|r| r.iter().map(|c| *c == 1).collect()).collect()
    }
}

fn shape_color(id: u8) -> Color {
    match id {
        1 => [0.0, 0.96, 1.0, 1.0],
        2 => [1.0, 0.84, 0.0, 1.0],
        3 => [0.63, 0.13, 0.94, 1.0],
        4 => [0.0, 1.0, 0.0, 1.0],
        5 => [1.0, 0.0, 0.0, 1.0],
        6 => [0.0, 0.0, 1.0, 1.0],
        7 => [1.0, 0.53, 0.0, 1.0],
        _ => colors::PRIMARY,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub shape: Shape,
    pub cells: Vec<Vec<bool>>,
    pub col: i32,
    pub row: i32,
}

impl Piece {
    fn spawn(shape: Shape) -> Self {
        let cells = shape.matrix();
        let width = cells[0].len() as i32;
        Self {
            shape,
            cells,
            col: COLS as i32 / 2 - width / 2,
            row: 0,
        }
    }

    /// Occupied board coordinates as (col, row)
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (self.col + c as i32, self.row + r as i32))
        })
    }

    /// Clockwise quarter turn
    fn rotated(&self) -> Self {
        let h = self.cells.len();
        let w = self.cells[0].len();
        let cells = (0..w)
            .map(|i| (0..h).rev().map(|j| self.cells[j][i]).collect())
            .collect();
        Self {
            cells,
            ..self.clone()
        }
    }

    fn shifted(&self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
            ..self.clone()
        }
    }
}

/// Remove full rows, shifting everything above down; returns rows cleared
pub fn clear_full_rows(board: &mut Grid<u8>) -> usize {
    let cols = board.cols();
    let kept: Vec<Vec<u8>> = (0..board.rows())
        .map(|r| board.row(r))
        .filter(|row| row.iter().any(|c| *c == 0))
        .map(|row| row.to_vec())
        .collect();
    let cleared = board.rows() - kept.len();
    if cleared == 0 {
        return 0;
    }
    let mut rows = vec![vec![0u8; cols]; cleared];
    rows.extend(kept);
    *board = Grid::from_rows(rows);
    cleared
}

pub struct Tetris {
    rng: Pcg32,
    board: Grid<u8>,
    active: Option<Piece>,
    next: Shape,
    drop_counter_ms: f32,
    score: u32,
    lines: u32,
    level: u32,
    outcome: Option<Outcome>,
}

impl Tetris {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let first = Shape::random(&mut rng);
        let next = Shape::random(&mut rng);
        Self {
            rng,
            board: Grid::new(ROWS, COLS, 0),
            active: Some(Piece::spawn(first)),
            next,
            drop_counter_ms: 0.0,
            score: 0,
            lines: 0,
            level: 1,
            outcome: None,
        }
    }

    pub fn board(&self) -> &Grid<u8> {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next_shape(&self) -> Shape {
        self.next
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn drop_interval_ms(&self) -> f32 {
        drop_interval_ms(self.level)
    }

    /// Blocks may sit above the visible board but never outside the sides or floor
    fn collides(&self, piece: &Piece) -> bool {
        piece.blocks().any(|(col, row)| {
            if col < 0 || col >= COLS as i32 || row >= ROWS as i32 {
                return true;
            }
            row >= 0 && self.board.get(row as usize, col as usize).is_some_and(|c| *c != 0)
        })
    }

    /// Replace the active piece if the candidate fits
    fn try_move(&mut self, f: impl FnOnce(&Piece) -> Piece) -> bool {
        let Some(piece) = self.active.as_ref() else {
            return false;
        };
        let candidate = f(piece);
        if self.collides(&candidate) {
            return false;
        }
        self.active = Some(candidate);
        true
    }

    fn drop_piece(&mut self) {
        if self.try_move(|p| p.shifted(0, 1)) {
            return;
        }
        self.lock();
        if self.outcome.is_some() {
            return;
        }
        let cleared = clear_full_rows(&mut self.board) as u32;
        if cleared > 0 {
            self.score += cleared * LINE_POINTS * self.level;
            self.lines += cleared;
            let level = self.lines / LINES_PER_LEVEL + 1;
            if level != self.level {
                log::info!("Tetris level {level}");
            }
            self.level = level;
        }
        self.spawn();
    }

    /// Merge the active piece into the board
    fn lock(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        let id = piece.shape.id();
        // Pieces spawn on row 0 and only ever move down
        for (col, row) in piece.blocks() {
            self.board.set(row as usize, col as usize, id);
        }
    }

    fn spawn(&mut self) {
        let piece = Piece::spawn(self.next);
        self.next = Shape::random(&mut self.rng);
        if self.collides(&piece) {
            self.outcome = Some(Outcome::GameOver);
        }
        self.active = Some(piece);
    }
}

impl Simulation for Tetris {
    fn step(&mut self, input: &TickInput, dt_ms: f32) {
        if self.outcome.is_some() {
            return;
        }

        match input.pressed {
            Some(Direction::Left) => {
                self.try_move(|p| p.shifted(-1, 0));
            }
            Some(Direction::Right) => {
                self.try_move(|p| p.shifted(1, 0));
            }
            Some(Direction::Down) => self.drop_piece(),
            Some(Direction::Up) => {
                self.try_move(Piece::rotated);
            }
            None => {}
        }
        if input.action {
            self.try_move(Piece::rotated);
        }
        if self.outcome.is_some() {
            return;
        }

        self.drop_counter_ms += dt_ms;
        if self.drop_counter_ms > self.drop_interval_ms() {
            self.drop_piece();
            self.drop_counter_ms = 0.0;
        }
    }

    fn cadence(&self) -> Cadence {
        Cadence::Frame
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn hud(&self) -> Hud {
        Hud::score(self.score).with_level(self.level)
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(COLS as f32 * BLOCK, ROWS as f32 * BLOCK)
    }

    fn draw(&self, list: &mut DrawList) {
        let size = self.viewport();
        list.clear(colors::BACKGROUND);
        for i in 0..=COLS {
            list.fill_rect(i as f32 * BLOCK, 0.0, 1.0, size.y, colors::GRID_LINE);
        }
        for i in 0..=ROWS {
            list.fill_rect(0.0, i as f32 * BLOCK, size.x, 1.0, colors::GRID_LINE);
        }

        let mut block = |col: i32, row: i32, color: Color| {
            let (x, y) = (col as f32 * BLOCK, row as f32 * BLOCK);
            list.fill_rect(x, y, BLOCK - 1.0, BLOCK - 1.0, color);
            list.fill_rect(x, y, BLOCK - 1.0, 4.0, colors::with_alpha(colors::WHITE, 0.3));
        };

        for (row, col, id) in self.board.iter() {
            if *id != 0 {
                block(col as i32, row as i32, shape_color(*id));
            }
        }
        if let Some(piece) = &self.active {
            let color = shape_color(piece.shape.id());
            for (col, row) in piece.blocks().filter(|(_, row)| *row >= 0) {
                block(col, row, color);
            }
        }
    }
}
