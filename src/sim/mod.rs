//! Shared simulation contract
//!
//! Everything the nine games have in common lives here:
//! - Fixed-tick and frame-accumulated scheduling
//! - Input normalization (last-writer-wins directions, edge-triggered actions)
//! - Lifecycle state machine and HUD snapshots
//! - Geometry overlap tests and fixed-size grids
//!
//! Simulations are deterministic: seeded RNG only, no rendering or platform
//! dependencies.

pub mod geom;
pub mod grid;
pub mod input;
pub mod lifecycle;
pub mod scheduler;
pub mod session;

pub use geom::{Body, Rect};
pub use grid::{Direction, Grid, GridPos};
pub use input::{HeldDirections, InputAdapter, Key, TickInput};
pub use lifecycle::{Hud, Lifecycle, Outcome};
pub use scheduler::{Cadence, TickScheduler};
pub use session::{GameSession, Simulation, SurfaceSize};
