//! Retro Arcade entry point
//!
//! On wasm the page bootstrap mounts the game named by `?game=`. Natively this
//! is a headless runner that plays a game for a number of frames, optionally
//! with scripted key input, and prints the final HUD.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger unavailable: {e}").into());
    }

    log::info!("Retro Arcade starting...");
    if let Err(e) = retro_arcade::platform::web::boot().await {
        log::error!("Mount failed: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Result, anyhow};

    use retro_arcade::consts::FRAME_MS;
    use retro_arcade::{GameSession, Settings, resolve};

    pub const USAGE: &str = "usage: retro-arcade <game-id> [frames] [script]\n\
        script: comma-separated FRAME:KEY events, e.g. 10:ArrowUp,40:+Space,60:-Space\n\
        (plain KEY taps for one frame, +KEY holds, -KEY releases)";

    const DEFAULT_FRAMES: u32 = 600;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum KeyAction {
        /// Down at the frame, up one frame later
        Tap,
        Down,
        Up,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ScriptEvent {
        pub frame: u32,
        pub key: String,
        pub action: KeyAction,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RunConfig {
        pub game: String,
        pub frames: u32,
        pub script: Vec<ScriptEvent>,
    }

    /// Browser key name for a script token
    fn key_name(token: &str) -> &str {
        match token {
            "Space" | "space" => " ",
            other => other,
        }
    }

    pub fn parse_script(script: &str) -> Result<Vec<ScriptEvent>> {
        let mut events = Vec::new();
        for item in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (frame, key) = item
                .split_once(':')
                .ok_or_else(|| anyhow!("script: expected FRAME:KEY, got '{}'", item))?;
            let frame = frame
                .parse::<u32>()
                .map_err(|_| anyhow!("script: invalid frame number: {}", frame))?;
            let (action, key) = if let Some(k) = key.strip_prefix('+') {
                (KeyAction::Down, k)
            } else if let Some(k) = key.strip_prefix('-') {
                (KeyAction::Up, k)
            } else {
                (KeyAction::Tap, key)
            };
            if key.is_empty() {
                return Err(anyhow!("script: missing key in '{}'", item));
            }
            events.push(ScriptEvent {
                frame,
                key: key_name(key).to_string(),
                action,
            });
        }
        events.sort_by_key(|e| e.frame);
        Ok(events)
    }

    pub fn parse_args(args: &[String]) -> Result<RunConfig> {
        let game = args.first().ok_or_else(|| anyhow!("missing game id\n{}", USAGE))?;
        if game == "-h" || game == "--help" {
            return Err(anyhow!("{}", USAGE));
        }
        let frames = match args.get(1) {
            Some(v) => v
                .parse::<u32>()
                .map_err(|_| anyhow!("invalid frame count: {}", v))?,
            None => DEFAULT_FRAMES,
        };
        let script = match args.get(2) {
            Some(s) => parse_script(s)?,
            None => Vec::new(),
        };
        if let Some(extra) = args.get(3) {
            return Err(anyhow!("unknown argument: {}\n{}", extra, USAGE));
        }
        Ok(RunConfig {
            game: game.clone(),
            frames,
            script,
        })
    }

    /// Feed every event scheduled for `frame` into the session
    fn apply_script(session: &mut GameSession, script: &[ScriptEvent], frame: u32) {
        for event in script {
            let input = session.input_mut();
            match event.action {
                KeyAction::Tap if event.frame == frame => {
                    input.key_down(&event.key);
                }
                KeyAction::Tap if event.frame + 1 == frame => {
                    input.key_up(&event.key);
                }
                KeyAction::Down if event.frame == frame => {
                    input.key_down(&event.key);
                }
                KeyAction::Up if event.frame == frame => {
                    input.key_up(&event.key);
                }
                _ => {}
            }
        }
    }

    pub fn run(config: &RunConfig) -> Result<()> {
        let kind = resolve(&config.game).ok_or_else(|| anyhow!("unknown game id '{}'", config.game))?;
        let viewport = kind.viewport();

        let mut session = GameSession::new(kind, Settings::load());
        session.attach_surface(viewport.x as u32, viewport.y as u32);
        session.start();

        let mut ticks = 0u32;
        let mut frame = 0u32;
        while frame < config.frames {
            apply_script(&mut session, &config.script, frame);
            if session.frame(FRAME_MS) {
                ticks += 1;
            }
            if let Some(hud) = session.poll_hud() {
                log::debug!("frame {frame}: {hud:?}");
            }
            frame += 1;
            if session.lifecycle().is_terminal() {
                break;
            }
        }

        log::info!(
            "{} ran {frame} frames, {ticks} ticks, {}",
            kind.id(),
            session.lifecycle().as_str()
        );
        println!("{}", serde_json::to_string_pretty(&session.hud())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = headless::parse_args(&args)?;
    headless::run(&config)
}
