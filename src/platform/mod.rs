//! Platform abstraction layer
//!
//! Host-side glue shared by the browser host and the headless runner:
//! - Host error type
//! - Canvas sizing and pointer mapping
//! - HUD text formatting and query-string parsing
//!
//! The browser host itself lives in `web` (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;
use thiserror::Error;

use crate::settings::SettingsError;
use crate::sim::{Hud, Lifecycle, SurfaceSize};

/// Failures while mounting a game in a host
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element '#{0}' not found")]
    MissingElement(String),
    #[error("element '#{0}' is not a canvas")]
    NotACanvas(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("unknown game id '{0}'")]
    UnknownGame(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("surface reports no texture formats")]
    NoSurfaceFormat,
    #[error("cannot create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("cannot open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Backing-store size for a play field at the given device pixel ratio
pub fn surface_size(viewport: Vec2, device_pixel_ratio: f64) -> SurfaceSize {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    SurfaceSize {
        width: ((viewport.x as f64 * dpr).round() as u32).max(1),
        height: ((viewport.y as f64 * dpr).round() as u32).max(1),
    }
}

/// Map a pointer offset in CSS pixels onto play-field coordinates
///
/// The canvas may be scaled by page layout; a collapsed element maps 1:1.
pub fn map_pointer(offset: Vec2, css_size: Vec2, viewport: Vec2) -> Vec2 {
    if css_size.x <= 0.0 || css_size.y <= 0.0 {
        return offset;
    }
    offset * viewport / css_size
}

/// `game` parameter of a location query string (`?game=pong&x=1`)
pub fn game_from_query(search: &str) -> Option<&str> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "game")
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

/// HUD snapshot rendered to display strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub score: String,
    pub lives: Option<String>,
    pub level: Option<String>,
    /// Overlay message; hidden while simply playing
    pub status: Option<&'static str>,
}

impl From<&Hud> for HudText {
    fn from(hud: &Hud) -> Self {
        let score = match hud.opponent_score {
            Some(opponent) => format!("{} - {}", hud.score, opponent),
            None => hud.score.to_string(),
        };
        let status = match hud.lifecycle {
            Lifecycle::NotStarted => Some("Press Enter to start"),
            Lifecycle::Playing if hud.won_banner => Some("You win! Keep going"),
            Lifecycle::Playing => None,
            Lifecycle::GameOver => Some("Game over"),
            Lifecycle::Won => Some("You win!"),
        };
        Self {
            score,
            lives: hud.lives.map(|l| l.to_string()),
            level: hud.level.map(|l| l.to_string()),
            status,
        }
    }
}
