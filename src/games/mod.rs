//! The nine playable simulations and the game-id registry
//!
//! Every module exposes a state struct implementing [`Simulation`]; the
//! registry maps catalog ids onto them.

pub mod breakout;
pub mod flappy;
pub mod invaders;
pub mod maze;
pub mod merge;
pub mod platformer;
pub mod pong;
pub mod snake;
pub mod tetris;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, Category};
use crate::settings::Settings;
use crate::sim::Simulation;

/// Which simulation a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Snake,
    Pong,
    Breakout,
    Tetris,
    Merge2048,
    MazeChase,
    WaveShooter,
    FlappyRunner,
    Platformer,
}

impl GameKind {
    pub const ALL: [GameKind; 9] = [
        GameKind::Snake,
        GameKind::Pong,
        GameKind::Breakout,
        GameKind::Tetris,
        GameKind::Merge2048,
        GameKind::MazeChase,
        GameKind::WaveShooter,
        GameKind::FlappyRunner,
        GameKind::Platformer,
    ];

    /// Catalog id that maps directly to this simulation
    pub fn id(&self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::Pong => "pong",
            GameKind::Breakout => "breakout",
            GameKind::Tetris => "tetris",
            GameKind::Merge2048 => "2048",
            GameKind::MazeChase => "pacman",
            GameKind::WaveShooter => "space",
            GameKind::FlappyRunner => "flappy",
            GameKind::Platformer => "mario",
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Simulation that stands in for a whole catalog category
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Arcade => GameKind::Breakout,
            Category::Puzzle => GameKind::Merge2048,
            Category::Adventure => GameKind::Platformer,
            Category::Platformer => GameKind::Platformer,
            Category::Sports => GameKind::Pong,
            Category::Racing => GameKind::FlappyRunner,
            Category::Fighting => GameKind::WaveShooter,
            Category::Strategy => GameKind::Tetris,
            Category::Shooter => GameKind::WaveShooter,
            Category::Card => GameKind::Merge2048,
            Category::Rhythm => GameKind::FlappyRunner,
            Category::Simulation => GameKind::Snake,
            Category::Classic => GameKind::MazeChase,
            Category::Casual => GameKind::FlappyRunner,
            Category::Bonus => GameKind::Snake,
        }
    }

    /// Fresh simulation state for one run
    pub fn build(&self, settings: &Settings, seed: u64) -> Box<dyn Simulation> {
        match self {
            GameKind::Snake => Box::new(snake::Snake::new(seed)),
            GameKind::Pong => Box::new(pong::Pong::new(seed, settings.difficulty)),
            GameKind::Breakout => Box::new(breakout::Breakout::new(seed)),
            GameKind::Tetris => Box::new(tetris::Tetris::new(seed)),
            GameKind::Merge2048 => Box::new(merge::Merge::new(seed)),
            GameKind::MazeChase => Box::new(maze::MazeChase::new(seed)),
            GameKind::WaveShooter => Box::new(invaders::Invaders::new(seed)),
            GameKind::FlappyRunner => Box::new(flappy::Flappy::new(seed)),
            GameKind::Platformer => Box::new(platformer::Platformer::new()),
        }
    }

    /// Play-field size, known before any run starts (hosts size the canvas with it)
    pub fn viewport(&self) -> Vec2 {
        self.build(&Settings::default(), 0).viewport()
    }
}

/// Resolve a catalog id to a simulation
///
/// Direct ids win; anything else in the catalog falls back by category.
/// Unknown ids resolve to nothing.
pub fn resolve(id: &str) -> Option<GameKind> {
    if let Some(kind) = GameKind::from_id(id) {
        return Some(kind);
    }
    let entry = catalog::find(id)?;
    let kind = GameKind::for_category(entry.category);
    log::debug!(
        "'{}' has no simulation, using {} for category {}",
        id,
        kind.id(),
        entry.category.as_str()
    );
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_ids() {
        for kind in GameKind::ALL {
            assert_eq!(resolve(kind.id()), Some(kind));
        }
    }

    #[test]
    fn test_category_fallback() {
        // Asteroids is an Arcade title without its own simulation
        assert_eq!(resolve("asteroids"), Some(GameKind::Breakout));
        assert_eq!(resolve("sudoku"), Some(GameKind::Merge2048));
        assert_eq!(resolve("retro1"), Some(GameKind::MazeChase));
        assert_eq!(resolve("nope"), None);
    }

    #[test]
    fn test_every_catalog_entry_resolves() {
        for entry in catalog::CATALOG {
            assert!(resolve(entry.id).is_some(), "{} did not resolve", entry.id);
        }
    }

    #[test]
    fn test_build_all() {
        let settings = Settings::default();
        for kind in GameKind::ALL {
            let sim = kind.build(&settings, 1);
            assert!(sim.outcome().is_none(), "{kind:?} starts terminal");
            assert_eq!(sim.hud().score, 0);
            let vp = sim.viewport();
            assert!(vp.x > 0.0 && vp.y > 0.0);
            assert_eq!(kind.viewport(), vp);
        }
    }
}
