//! Lifecycle states and HUD snapshots

use serde::{Deserialize, Serialize};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Mounted, waiting for an explicit start
    #[default]
    NotStarted,
    /// Ticking
    Playing,
    /// Terminal: loss
    GameOver,
    /// Terminal: win
    Won,
}

impl Lifecycle {
    pub fn is_terminal(self) -> bool {
        matches!(self, Lifecycle::GameOver | Lifecycle::Won)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::NotStarted => "not-started",
            Lifecycle::Playing => "playing",
            Lifecycle::GameOver => "game-over",
            Lifecycle::Won => "won",
        }
    }
}

/// Terminal result reported by a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    GameOver,
    Won,
}

impl From<Outcome> for Lifecycle {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::GameOver => Lifecycle::GameOver,
            Outcome::Won => Lifecycle::Won,
        }
    }
}

/// Read-only HUD snapshot pushed to the host shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    /// Second counter for head-to-head games (pong AI side)
    pub opponent_score: Option<u32>,
    pub lives: Option<u32>,
    /// Level or wave, 1-based
    pub level: Option<u32>,
    pub lifecycle: Lifecycle,
    /// Non-terminal "you won" banner (2048 reaching its target tile)
    pub won_banner: bool,
}

impl Hud {
    pub fn score(score: u32) -> Self {
        Self {
            score,
            ..Default::default()
        }
    }

    pub fn with_lives(mut self, lives: u32) -> Self {
        self.lives = Some(lives);
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }
}
