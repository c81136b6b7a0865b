//! Maze chase
//!
//! 20x20 maze with pellets, four power pellets and four ghosts that random-walk
//! out of a central house. The player keeps a buffered direction and falls
//! back to the current heading when the buffered turn is blocked. Row 9 is a
//! tunnel that wraps horizontally.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{DrawList, colors};
use crate::sim::{Cadence, Direction, Grid, GridPos, Hud, Outcome, Simulation, TickInput};

pub const SIZE: usize = 20;
pub const CELL: f32 = 30.0;
pub const TICK_MS: f32 = 200.0;
pub const START_LIVES: u32 = 3;
pub const PELLET_POINTS: u32 = 10;
pub const GHOST_POINTS: u32 = 200;
pub const POWER_TICKS: u32 = 40;

/// `#` wall, `.` pellet, `o` power pellet, `G` ghost house, `P` player start
const LAYOUT: [&str; SIZE] = [
    "####################",
    "#P.......##........#",
    "#o##.###.##.###.##o#",
    "#..................#",
    "#.##.#.######.#.##.#",
    "#....#...##...#....#",
    "####.###.##.###.####",
    "####.#........#.####",
    "####.#.##GG##.#.####",
    ".......#GGGG#.......",
    "####.#.######.#.####",
    "####.#........#.####",
    "####.#.######.#.####",
    "#........##........#",
    "#.##.###.##.###.##.#",
    "#..#............#..#",
    "##.#.#.######.#.#.##",
    "#o...#...##...#...o#",
    "#.######.##.######.#",
    "####################",
];

const GHOST_STARTS: [GridPos; 4] = [
    GridPos::new(9, 8),
    GridPos::new(10, 8),
    GridPos::new(9, 9),
    GridPos::new(10, 9),
];

const GHOST_COLORS: [[f32; 4]; 4] = [
    colors::RED,
    colors::CYAN,
    colors::PINK,
    colors::ORANGE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
    House,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pellet {
    None,
    Normal,
    Power,
}

pub struct MazeChase {
    rng: Pcg32,
    tiles: Grid<Tile>,
    pellets: Grid<Pellet>,
    start: GridPos,
    player: GridPos,
    heading: Option<Direction>,
    buffered: Direction,
    ghosts: Vec<GridPos>,
    score: u32,
    lives: u32,
    power_ticks: u32,
    outcome: Option<Outcome>,
}

fn parse_layout() -> (Grid<Tile>, Grid<Pellet>, GridPos) {
    let mut tiles = Grid::new(SIZE, SIZE, Tile::Wall);
    let mut pellets = Grid::new(SIZE, SIZE, Pellet::None);
    let mut start = GridPos::new(1, 1);
    for (r, line) in LAYOUT.iter().enumerate() {
        for (c, ch) in line.chars().enumerate() {
            let (tile, pellet) = match ch {
                '#' => (Tile::Wall, Pellet::None),
                '.' => (Tile::Open, Pellet::Normal),
                'o' => (Tile::Open, Pellet::Power),
                'G' => (Tile::House, Pellet::None),
                'P' => {
                    start = GridPos::new(c as i32, r as i32);
                    (Tile::Open, Pellet::None)
                }
                _ => (Tile::Open, Pellet::None),
            };
            tiles.set(r, c, tile);
            pellets.set(r, c, pellet);
        }
    }
    (tiles, pellets, start)
}

impl MazeChase {
    pub fn new(seed: u64) -> Self {
        let (tiles, pellets, start) = parse_layout();
        Self {
            rng: Pcg32::seed_from_u64(seed),
            tiles,
            pellets,
            start,
            player: start,
            heading: Some(Direction::Right),
            buffered: Direction::Right,
            ghosts: GHOST_STARTS.to_vec(),
            score: 0,
            lives: START_LIVES,
            power_ticks: 0,
            outcome: None,
        }
    }

    pub fn player(&self) -> GridPos {
        self.player
    }

    pub fn ghosts(&self) -> &[GridPos] {
        &self.ghosts
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_powered(&self) -> bool {
        self.power_ticks > 0
    }

    pub fn pellets_left(&self) -> usize {
        self.pellets.values().filter(|p| **p != Pellet::None).count()
    }

    /// Step one cell, wrapping through the side tunnel
    fn neighbour(pos: GridPos, dir: Direction) -> GridPos {
        let mut next = pos.step(dir);
        next.col = next.col.rem_euclid(SIZE as i32);
        next
    }

    fn tile(&self, pos: GridPos) -> Tile {
        self.tiles.at(pos).copied().unwrap_or(Tile::Wall)
    }

    /// The player may not enter walls or the ghost house
    fn player_can_enter(&self, pos: GridPos) -> bool {
        self.tile(pos) == Tile::Open
    }

    fn ghost_can_enter(&self, pos: GridPos) -> bool {
        self.tile(pos) != Tile::Wall
    }

    fn move_player(&mut self) {
        let buffered = Self::neighbour(self.player, self.buffered);
        if self.player_can_enter(buffered) {
            self.heading = Some(self.buffered);
            self.player = buffered;
        } else if let Some(heading) = self.heading {
            let ahead = Self::neighbour(self.player, heading);
            if self.player_can_enter(ahead) {
                self.player = ahead;
            } else {
                self.heading = None;
            }
        }

        let Some(pellet) = self.pellets.at_mut(self.player) else {
            return;
        };
        match std::mem::replace(pellet, Pellet::None) {
            Pellet::None => {}
            Pellet::Normal => self.score += PELLET_POINTS,
            Pellet::Power => {
                self.score += PELLET_POINTS;
                self.power_ticks = POWER_TICKS;
                log::debug!("Power mode");
            }
        }
        if self.pellets_left() == 0 {
            self.outcome = Some(Outcome::Won);
        }
    }

    fn move_ghosts(&mut self) {
        for i in 0..self.ghosts.len() {
            let ghost = self.ghosts[i];
            let options: Vec<GridPos> = Direction::ALL
                .iter()
                .map(|d| Self::neighbour(ghost, *d))
                .filter(|p| self.ghost_can_enter(*p))
                .collect();
            if !options.is_empty() {
                self.ghosts[i] = options[self.rng.random_range(0..options.len())];
            }
        }
    }

    /// Resolve player/ghost overlaps
    fn resolve_contacts(&mut self) {
        for i in 0..self.ghosts.len() {
            if self.outcome.is_some() {
                return;
            }
            if self.ghosts[i] != self.player {
                continue;
            }
            if self.is_powered() {
                self.ghosts[i] = GHOST_STARTS[self.rng.random_range(0..GHOST_STARTS.len())];
                self.score += GHOST_POINTS;
            } else {
                self.lives = self.lives.saturating_sub(1);
                log::debug!("Caught, {} lives left", self.lives);
                if self.lives == 0 {
                    self.outcome = Some(Outcome::GameOver);
                } else {
                    self.player = self.start;
                    self.ghosts = GHOST_STARTS.to_vec();
                    return;
                }
            }
        }
    }
}

impl Simulation for MazeChase {
    fn step(&mut self, input: &TickInput, _dt_ms: f32) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(dir) = input.pressed {
            self.buffered = dir;
        }

        self.move_player();
        if self.outcome.is_some() {
            return;
        }
        self.resolve_contacts();
        if self.outcome.is_some() {
            return;
        }
        self.move_ghosts();
        self.resolve_contacts();

        self.power_ticks = self.power_ticks.saturating_sub(1);
    }

    fn cadence(&self) -> Cadence {
        Cadence::fixed(TICK_MS)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn hud(&self) -> Hud {
        Hud::score(self.score).with_lives(self.lives)
    }

    fn viewport(&self) -> Vec2 {
        Vec2::splat(SIZE as f32 * CELL)
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::BACKGROUND);
        let center = |p: GridPos| {
            Vec2::new(
                p.col as f32 * CELL + CELL / 2.0,
                p.row as f32 * CELL + CELL / 2.0,
            )
        };

        for (r, c, tile) in self.tiles.iter() {
            if *tile == Tile::Wall {
                list.fill_rect(c as f32 * CELL, r as f32 * CELL, CELL, CELL, colors::WALL);
            }
        }
        for (r, c, pellet) in self.pellets.iter() {
            let radius = match pellet {
                Pellet::None => continue,
                Pellet::Normal => 3.0,
                Pellet::Power => 7.0,
            };
            list.circle(center(GridPos::new(c as i32, r as i32)), radius, colors::YELLOW);
        }

        list.circle(center(self.player), CELL / 2.0 - 2.0, colors::YELLOW);

        for (ghost, color) in self.ghosts.iter().zip(GHOST_COLORS.iter().cycle()) {
            let color = if self.is_powered() { colors::DIM } else { *color };
            let c = center(*ghost);
            list.circle(c - Vec2::new(0.0, 3.0), CELL / 2.0 - 2.0, color);
            list.fill_rect(c.x - CELL / 2.0 + 2.0, c.y - 3.0, CELL - 4.0, CELL / 2.0 + 1.0, color);
        }
    }
}
