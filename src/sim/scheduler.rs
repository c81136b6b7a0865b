//! Tick scheduling
//!
//! The host calls in once per animation frame with the elapsed wall-clock
//! time. The scheduler decides whether the simulation steps this frame.
//! At most one logical step runs per frame; time beyond that is dropped,
//! never caught up.

use crate::consts::MAX_FRAME_DELTA_MS;

/// How a simulation wants to be driven
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// Step once every `interval_ms` of accumulated wall time
    Fixed { interval_ms: f32 },
    /// Step every frame with the (clamped) frame delta
    Frame,
}

impl Cadence {
    pub const fn fixed(interval_ms: f32) -> Self {
        Cadence::Fixed { interval_ms }
    }
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    running: bool,
    elapsed_ms: f32,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_ms = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_ms = 0.0;
    }

    /// Feed one frame's elapsed time; returns the step delta if a step is due
    pub fn advance(&mut self, cadence: Cadence, frame_ms: f32) -> Option<f32> {
        if !self.running {
            return None;
        }
        let frame_ms = frame_ms.clamp(0.0, MAX_FRAME_DELTA_MS);

        match cadence {
            Cadence::Frame => Some(frame_ms),
            Cadence::Fixed { interval_ms } => {
                self.elapsed_ms += frame_ms;
                if self.elapsed_ms < interval_ms {
                    return None;
                }
                self.elapsed_ms -= interval_ms;
                // More than one interval behind: drop the backlog
                if self.elapsed_ms >= interval_ms {
                    self.elapsed_ms = 0.0;
                }
                Some(interval_ms)
            }
        }
    }
}
