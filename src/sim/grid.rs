//! Fixed-size grids and integer cell coordinates
//!
//! Used by the cell-based games (snake, tetris, 2048, maze chase) and by the
//! brick/formation layouts of breakout and the wave shooter.

use serde::{Deserialize, Serialize};

/// One of the four logical directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Cell delta as (dcol, drow); rows grow downward
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Integer cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub const fn step(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }
}

/// Fixed-size row-major 2D grid
///
/// Dimensions are set at construction and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Build from row vectors; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        debug_assert!(rows.iter().all(|r| r.len() == cols), "ragged grid rows");
        let n_rows = rows.len();
        Self {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.row >= 0 && pos.col >= 0 && (pos.row as usize) < self.rows && (pos.col as usize) < self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.index(row, col).map(|i| &mut self.cells[i])
    }

    /// Lookup by signed cell coordinate (None when out of bounds)
    pub fn at(&self, pos: GridPos) -> Option<&T> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.get(pos.row as usize, pos.col as usize)
    }

    pub fn at_mut(&mut self, pos: GridPos) -> Option<&mut T> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.get_mut(pos.row as usize, pos.col as usize)
    }

    /// Set a cell; returns false if out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: T) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Iterate `(row, col, value)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (i / cols, i % cols, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.cells.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds() {
        let grid = Grid::new(3, 4, 0u8);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert!(grid.in_bounds(GridPos::new(3, 2)));
        assert!(!grid.in_bounds(GridPos::new(4, 0)));
        assert!(!grid.in_bounds(GridPos::new(-1, 0)));
        assert_eq!(grid.at(GridPos::new(0, 3)), None);
    }

    #[test]
    fn test_grid_set_and_row() {
        let mut grid = Grid::new(2, 3, 0u8);
        assert!(grid.set(1, 2, 7));
        assert!(!grid.set(2, 0, 7));
        assert_eq!(grid.row(1), &[0, 0, 7]);
        assert_eq!(grid.at(GridPos::new(2, 1)), Some(&7));
    }

    #[test]
    fn test_from_rows_iter_order() {
        let grid = Grid::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let cells: Vec<_> = grid.iter().map(|(r, c, v)| (r, c, *v)).collect();
        assert_eq!(cells, vec![(0, 0, 1), (0, 1, 2), (1, 0, 3), (1, 1, 4)]);
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let p = GridPos::new(5, 5).step(dir).step(dir.opposite());
            assert_eq!(p, GridPos::new(5, 5));
        }
    }
}
