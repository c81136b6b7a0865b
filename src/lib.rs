//! Retro Arcade - nine playable retro game simulations
//!
//! Core modules:
//! - `sim`: Shared tick/lifecycle/input contract (scheduler, session, geometry, grids)
//! - `games`: The nine deterministic simulations and the game-id registry
//! - `renderer`: Immediate-mode draw lists and the WebGPU backend
//! - `platform`: Browser host (mount, listeners, frame loop, HUD bridge)
//! - `settings`: Host-settable configuration
//! - `catalog`: The full game catalog (ids, titles, categories)

pub mod catalog;
pub mod games;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use games::{GameKind, resolve};
pub use settings::{Difficulty, Settings};
pub use sim::{GameSession, Hud, Lifecycle};

/// Loop configuration constants
pub mod consts {
    /// Nominal 60 Hz tick used by most simulations (milliseconds)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest frame delta the host hands to the scheduler (ms)
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;
}
