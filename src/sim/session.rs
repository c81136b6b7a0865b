//! Mounted game session
//!
//! Owns the lifecycle state machine, the scheduler, buffered input and the
//! active simulation. The host forwards frames and events; the session
//! decides whether anything steps.
//!
//! ```text
//! NotStarted --start()--> Playing --outcome--> GameOver | Won
//!      ^                                             |
//!      +------------------ reset() ------------------+
//! ```

use glam::Vec2;

use super::input::{InputAdapter, TickInput};
use super::lifecycle::{Hud, Lifecycle, Outcome};
use super::scheduler::{Cadence, TickScheduler};
use crate::games::GameKind;
use crate::renderer::DrawList;
use crate::settings::{Difficulty, Settings};

/// Contract every game simulation follows
///
/// Implementations are deterministic given their seed and the input sequence.
pub trait Simulation {
    /// Advance by one logical step
    fn step(&mut self, input: &TickInput, dt_ms: f32);

    fn cadence(&self) -> Cadence;

    /// Terminal result, once reached
    fn outcome(&self) -> Option<Outcome>;

    /// Score/lives/level; the session fills in the lifecycle
    fn hud(&self) -> Hud;

    /// Logical play-field size in pixels
    fn viewport(&self) -> Vec2;

    /// Emit draw commands for the current state (no mutation)
    fn draw(&self, list: &mut DrawList);
}

/// Drawing surface dimensions in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

pub struct GameSession {
    kind: GameKind,
    settings: Settings,
    base_seed: u64,
    runs: u64,
    lifecycle: Lifecycle,
    scheduler: TickScheduler,
    input: InputAdapter,
    sim: Option<Box<dyn Simulation>>,
    surface: Option<SurfaceSize>,
    pending_start: bool,
    last_hud: Option<Hud>,
}

impl GameSession {
    /// Mount a game; nothing is constructed until `start()`
    pub fn new(kind: GameKind, settings: Settings) -> Self {
        let base_seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Mounted {} (seed {base_seed})", kind.id());
        Self {
            kind,
            settings,
            base_seed,
            runs: 0,
            lifecycle: Lifecycle::NotStarted,
            scheduler: TickScheduler::new(),
            input: InputAdapter::new(),
            sim: None,
            surface: None,
            pending_start: false,
            last_hud: None,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Change difficulty; the running game keeps its own, the next run uses this
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        log::info!("Difficulty set to {}", difficulty.as_str());
        self.settings.difficulty = difficulty;
    }

    pub fn is_start_pending(&self) -> bool {
        self.pending_start
    }

    /// Event sink for the host's keyboard/pointer listeners
    pub fn input_mut(&mut self) -> &mut InputAdapter {
        &mut self.input
    }

    /// Record the drawing surface; completes a deferred start
    pub fn attach_surface(&mut self, width: u32, height: u32) {
        let size = SurfaceSize { width, height };
        self.surface = Some(size);
        if self.pending_start && size.is_valid() {
            log::debug!("Surface attached ({width}x{height}), completing deferred start");
            self.begin();
        }
    }

    pub fn start(&mut self) {
        if self.lifecycle != Lifecycle::NotStarted {
            log::debug!("start() ignored in {:?}", self.lifecycle);
            return;
        }
        if !self.surface.is_some_and(|s| s.is_valid()) {
            log::debug!("No drawing surface yet, deferring start");
            self.pending_start = true;
            return;
        }
        self.begin();
    }

    /// Throw the current run away and start a fresh one
    pub fn reset(&mut self) {
        log::info!("Reset {}", self.kind.id());
        self.teardown();
        self.start();
    }

    /// Release everything; no tick runs after this
    pub fn unmount(&mut self) {
        log::info!("Unmounted {}", self.kind.id());
        self.teardown();
        self.surface = None;
    }

    fn teardown(&mut self) {
        self.scheduler.stop();
        self.input.clear();
        self.sim = None;
        self.pending_start = false;
        self.lifecycle = Lifecycle::NotStarted;
    }

    fn begin(&mut self) {
        let seed = self.base_seed.wrapping_add(self.runs);
        self.runs += 1;
        self.sim = Some(self.kind.build(&self.settings, seed));
        self.pending_start = false;
        self.lifecycle = Lifecycle::Playing;
        self.input.clear();
        self.scheduler.start();
        log::info!("Started {} (run {})", self.kind.id(), self.runs);
    }

    /// Host frame callback; returns true if the simulation stepped
    pub fn frame(&mut self, elapsed_ms: f32) -> bool {
        if self.lifecycle != Lifecycle::Playing {
            return false;
        }
        let Some(sim) = self.sim.as_mut() else {
            return false;
        };
        let Some(dt_ms) = self.scheduler.advance(sim.cadence(), elapsed_ms) else {
            return false;
        };

        let input = self.input.sample();
        sim.step(&input, dt_ms);

        if let Some(outcome) = sim.outcome() {
            self.lifecycle = outcome.into();
            self.scheduler.stop();
            self.input.clear();
            log::info!(
                "{} ended: {} (score {})",
                self.kind.id(),
                self.lifecycle.as_str(),
                sim.hud().score
            );
        }
        true
    }

    /// Current HUD snapshot
    pub fn hud(&self) -> Hud {
        let mut hud = self.sim.as_ref().map(|s| s.hud()).unwrap_or_default();
        hud.lifecycle = self.lifecycle;
        hud
    }

    /// HUD snapshot if it changed since the last poll
    pub fn poll_hud(&mut self) -> Option<Hud> {
        let hud = self.hud();
        if self.last_hud == Some(hud) {
            return None;
        }
        self.last_hud = Some(hud);
        Some(hud)
    }

    /// Draw list for the current (possibly frozen) state
    pub fn draw(&self) -> Option<DrawList> {
        let sim = self.sim.as_ref()?;
        let mut list = DrawList::new(sim.viewport());
        sim.draw(&mut list);
        Some(list)
    }

    /// Drive the active simulation directly, bypassing the scheduler
    #[cfg(test)]
    pub(crate) fn step_with(&mut self, input: &TickInput) {
        if self.lifecycle != Lifecycle::Playing {
            return;
        }
        if let Some(sim) = self.sim.as_mut() {
            let dt = match sim.cadence() {
                Cadence::Fixed { interval_ms } => interval_ms,
                Cadence::Frame => crate::consts::FRAME_MS,
            };
            sim.step(input, dt);
            if let Some(outcome) = sim.outcome() {
                self.lifecycle = outcome.into();
                self.scheduler.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;

    fn session(kind: GameKind) -> GameSession {
        let settings = Settings {
            seed: Some(7),
            ..Default::default()
        };
        GameSession::new(kind, settings)
    }

    #[test]
    fn test_set_difficulty_applies_to_next_run() {
        let mut s = session(GameKind::Pong);
        s.attach_surface(800, 500);
        s.start();
        s.set_difficulty(Difficulty::Hard);
        assert_eq!(s.lifecycle(), Lifecycle::Playing);
        assert_eq!(s.settings().difficulty, Difficulty::Hard);

        s.reset();
        assert_eq!(s.lifecycle(), Lifecycle::Playing);
        assert_eq!(s.settings().difficulty, Difficulty::Hard);
        assert_eq!(s.settings().seed, Some(7));
    }

    #[test]
    fn test_start_without_surface_defers() {
        let mut s = session(GameKind::Snake);
        s.start();
        assert_eq!(s.lifecycle(), Lifecycle::NotStarted);
        assert!(s.is_start_pending());

        // Zero-sized surface is still not usable
        s.attach_surface(0, 300);
        assert_eq!(s.lifecycle(), Lifecycle::NotStarted);

        s.attach_surface(500, 500);
        assert_eq!(s.lifecycle(), Lifecycle::Playing);
        assert!(!s.is_start_pending());
    }

    #[test]
    fn test_start_while_playing_is_noop() {
        let mut s = session(GameKind::Breakout);
        s.attach_surface(800, 500);
        s.start();
        s.frame(20.0);
        let before = s.hud();
        s.start();
        assert_eq!(s.lifecycle(), Lifecycle::Playing);
        assert_eq!(s.hud(), before);
    }

    #[test]
    fn test_no_ticks_before_start_or_after_unmount() {
        let mut s = session(GameKind::Pong);
        s.attach_surface(800, 500);
        assert!(!s.frame(16.7));
        s.start();
        assert!(s.frame(16.7));
        s.unmount();
        assert!(!s.frame(16.7));
        assert!(s.draw().is_none());
    }

    #[test]
    fn test_terminal_state_freezes_and_reset_rebuilds() {
        let mut s = session(GameKind::Snake);
        s.attach_surface(500, 500);
        s.start();
        // Drive the snake into the top wall
        s.step_with(&TickInput::press(Direction::Up));
        for _ in 0..200 {
            s.step_with(&TickInput::default());
        }
        assert_eq!(s.lifecycle(), Lifecycle::GameOver);
        assert!(!s.frame(1000.0));
        assert!(s.draw().is_some(), "frozen frame is still drawable");

        s.reset();
        assert_eq!(s.lifecycle(), Lifecycle::Playing);
        assert_eq!(s.hud().score, 0);
    }

    #[test]
    fn test_poll_hud_reports_changes_only() {
        let mut s = session(GameKind::Merge2048);
        s.attach_surface(400, 400);
        assert!(s.poll_hud().is_some());
        assert!(s.poll_hud().is_none());
        s.start();
        let hud = s.poll_hud().expect("lifecycle changed");
        assert_eq!(hud.lifecycle, Lifecycle::Playing);
        assert!(s.poll_hud().is_none());
    }

    #[test]
    fn test_input_routed_through_frame() {
        let mut s = session(GameKind::Snake);
        s.attach_surface(500, 500);
        s.start();
        s.input_mut().key_down("ArrowRight");
        // Snake interval is 100ms: first frame is too short
        assert!(!s.frame(60.0));
        assert!(s.frame(60.0));
    }
}
