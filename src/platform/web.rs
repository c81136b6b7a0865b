//! Browser host
//!
//! Mounts one game on a `<canvas>`, feeds keyboard/pointer events into the
//! session, drives it from `requestAnimationFrame` and mirrors the HUD into
//! DOM elements. At most one game is mounted; mounting another tears the
//! previous one down first. Every listener and the pending frame request are
//! released when the mount is dropped.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use super::{HostError, HudText, game_from_query, map_pointer, surface_size};
use crate::consts::FRAME_MS;
use crate::games::{self, GameKind};
use crate::renderer::pipeline::init_canvas;
use crate::renderer::{DrawList, RenderState};
use crate::settings::{Difficulty, Settings};
use crate::sim::{GameSession, Lifecycle};

/// Canvas used when the page does not name one
pub const DEFAULT_CANVAS_ID: &str = "canvas";
/// Game mounted when the query string does not name one
pub const DEFAULT_GAME_ID: &str = "snake";

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

fn js_error(value: JsValue) -> HostError {
    HostError::Js(format!("{value:?}"))
}

fn to_js(err: HostError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Event listener that unregisters itself on drop
struct ListenerGuard {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl ListenerGuard {
    fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, HostError> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// HUD containers and their value elements
struct HudElements {
    score: Option<Element>,
    lives: Option<(Element, Element)>,
    level: Option<(Element, Element)>,
    status: Option<Element>,
}

impl HudElements {
    fn find(document: &Document) -> Self {
        let value_of = |id: &str| {
            let item = document.get_element_by_id(id)?;
            let value = item.query_selector(".hud-value").ok().flatten()?;
            Some((item, value))
        };
        Self {
            score: value_of("hud-score").map(|(_, v)| v),
            lives: value_of("hud-lives"),
            level: value_of("hud-level"),
            status: document.get_element_by_id("hud-status"),
        }
    }

    fn write(&self, text: &HudText) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&text.score));
        }
        for (slot, value) in [(&self.lives, &text.lives), (&self.level, &text.level)] {
            let Some((item, el)) = slot else { continue };
            match value {
                Some(v) => {
                    el.set_text_content(Some(v));
                    item.set_class_name("hud-item");
                }
                None => item.set_class_name("hud-item hidden"),
            }
        }
        if let Some(el) = &self.status {
            match text.status {
                Some(msg) => {
                    el.set_text_content(Some(msg));
                    el.set_class_name("");
                }
                None => el.set_class_name("hidden"),
            }
        }
    }
}

/// Everything the frame callback and listeners share
struct Host {
    session: GameSession,
    renderer: Option<RenderState>,
    hud: HudElements,
    viewport: Vec2,
    last_time: Option<f64>,
}

impl Host {
    fn on_frame(&mut self, time: f64) {
        let elapsed = self.last_time.map_or(FRAME_MS, |t| (time - t) as f32);
        self.last_time = Some(time);

        self.session.frame(elapsed);
        self.render();
        if let Some(hud) = self.session.poll_hud() {
            self.hud.write(&HudText::from(&hud));
        }
    }

    fn render(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let list = self
            .session
            .draw()
            .unwrap_or_else(|| DrawList::new(self.viewport));
        match renderer.render(&list) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = renderer.size;
                renderer.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, rendering disabled");
                self.renderer = None;
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }
}

/// Self-rescheduling `requestAnimationFrame` loop
struct FrameLoop {
    window: Window,
    stopped: Cell<bool>,
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameLoop {
    fn start(window: &Window, host: Rc<RefCell<Host>>) -> Rc<Self> {
        let frames = Rc::new(Self {
            window: window.clone(),
            stopped: Cell::new(false),
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });

        // Weak so the closure does not keep its own loop alive
        let weak: Weak<Self> = Rc::downgrade(&frames);
        let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(frames) = weak.upgrade() else {
                return;
            };
            frames.handle.set(None);
            if frames.stopped.get() {
                return;
            }
            host.borrow_mut().on_frame(time);
            frames.request();
        });
        *frames.callback.borrow_mut() = Some(closure);
        frames.request();
        frames
    }

    fn request(&self) {
        if self.stopped.get() {
            return;
        }
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.handle.set(Some(id)),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn stop(&self) {
        self.stopped.set(true);
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

/// A mounted game; dropping it tears the host down
struct Mounted {
    host: Rc<RefCell<Host>>,
    frames: Rc<FrameLoop>,
    _listeners: Vec<ListenerGuard>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.frames.stop();
        if let Ok(mut host) = self.host.try_borrow_mut() {
            host.session.unmount();
        }
    }
}

fn wire_listeners(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
    host: &Rc<RefCell<Host>>,
) -> Result<Vec<ListenerGuard>, HostError> {
    let mut listeners = Vec::new();

    {
        let host = host.clone();
        listeners.push(ListenerGuard::new(window, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = event.key();
            let mut host = host.borrow_mut();
            let handled = if key == "Enter" {
                let lifecycle = host.session.lifecycle();
                match lifecycle {
                    Lifecycle::NotStarted => host.session.start(),
                    Lifecycle::GameOver | Lifecycle::Won => host.session.reset(),
                    Lifecycle::Playing => {}
                }
                true
            } else {
                host.session.input_mut().key_down(&key)
            };
            if handled {
                event.prevent_default();
            }
        })?);
    }

    {
        let host = host.clone();
        listeners.push(ListenerGuard::new(window, "keyup", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if host.borrow_mut().session.input_mut().key_up(&event.key()) {
                event.prevent_default();
            }
        })?);
    }

    for kind in ["mousemove", "mousedown"] {
        let host = host.clone();
        let canvas_ref = canvas.clone();
        listeners.push(ListenerGuard::new(canvas, kind, move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let mut host = host.borrow_mut();
            let css = Vec2::new(
                canvas_ref.client_width() as f32,
                canvas_ref.client_height() as f32,
            );
            let offset = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            let pos = map_pointer(offset, css, host.viewport);
            let input = host.session.input_mut();
            if kind == "mousedown" {
                input.pointer_down(pos);
            } else {
                input.pointer_move(pos);
            }
        })?);
    }

    // Optional shell buttons
    if let Some(btn) = document.get_element_by_id("start-btn") {
        let host = host.clone();
        listeners.push(ListenerGuard::new(&btn, "click", move |_| {
            host.borrow_mut().session.start();
        })?);
    }
    if let Some(btn) = document.get_element_by_id("restart-btn") {
        let host = host.clone();
        listeners.push(ListenerGuard::new(&btn, "click", move |_| {
            host.borrow_mut().session.reset();
        })?);
    }

    Ok(listeners)
}

/// Mount a game on a canvas, replacing whatever was mounted before
///
/// Nothing ticks until `start()`. A renderer failure is logged and the
/// simulation runs without drawing.
pub async fn mount(canvas_id: &str, game_id: &str) -> Result<(), HostError> {
    unmount();

    let kind: GameKind =
        games::resolve(game_id).ok_or_else(|| HostError::UnknownGame(game_id.to_string()))?;

    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let document = window.document().ok_or(HostError::NoDocument)?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| HostError::MissingElement(canvas_id.to_string()))?
        .dyn_into()
        .map_err(|_| HostError::NotACanvas(canvas_id.to_string()))?;

    let viewport = kind.viewport();
    let size = surface_size(viewport, window.device_pixel_ratio());
    canvas.set_width(size.width);
    canvas.set_height(size.height);

    let renderer = match init_canvas(canvas.clone(), size.width, size.height).await {
        Ok(renderer) => Some(renderer),
        Err(e) => {
            log::error!("Renderer unavailable, running without drawing: {e}");
            None
        }
    };

    let mut session = GameSession::new(kind, Settings::load());
    session.attach_surface(size.width, size.height);

    let hud = HudElements::find(&document);
    hud.write(&HudText::from(&session.hud()));

    let host = Rc::new(RefCell::new(Host {
        session,
        renderer,
        hud,
        viewport,
        last_time: None,
    }));
    let listeners = wire_listeners(&window, &document, &canvas, &host)?;
    let frames = FrameLoop::start(&window, host.clone());

    let previous = MOUNTED.with(|m| {
        m.borrow_mut().replace(Mounted {
            host,
            frames,
            _listeners: listeners,
        })
    });
    drop(previous);

    log::info!("Mounted '{game_id}' on #{canvas_id} ({}x{})", size.width, size.height);
    Ok(())
}

/// Tear down the mounted game, if any
pub fn unmount() {
    let mounted = MOUNTED.with(|m| m.borrow_mut().take());
    drop(mounted);
}

fn with_session<R>(f: impl FnOnce(&mut GameSession) -> R) -> Option<R> {
    MOUNTED.with(|m| {
        let mounted = m.borrow();
        let mounted = mounted.as_ref()?;
        let mut host = mounted.host.borrow_mut();
        Some(f(&mut host.session))
    })
}

/// Page bootstrap: mount the game named by `?game=` on `#canvas`
pub async fn boot() -> Result<(), HostError> {
    let window = web_sys::window().ok_or(HostError::NoWindow)?;
    let search = window.location().search().map_err(js_error)?;
    let game_id = game_from_query(&search).unwrap_or(DEFAULT_GAME_ID).to_string();

    mount(DEFAULT_CANVAS_ID, &game_id).await?;

    if let Some(loading) = window
        .document()
        .and_then(|d| d.get_element_by_id("loading"))
    {
        loading.set_class_name("hidden");
    }
    Ok(())
}

#[wasm_bindgen(js_name = mountGame)]
pub async fn mount_game(canvas_id: String, game_id: String) -> Result<(), JsValue> {
    mount(&canvas_id, &game_id).await.map_err(to_js)
}

#[wasm_bindgen(js_name = startGame)]
pub fn start_game() {
    with_session(|s| s.start());
}

#[wasm_bindgen(js_name = resetGame)]
pub fn reset_game() {
    with_session(|s| s.reset());
}

#[wasm_bindgen(js_name = unmountGame)]
pub fn unmount_game() {
    unmount();
}

/// Persist a difficulty and hand it to the mounted session
///
/// Takes effect on the next start or reset.
pub fn set_difficulty(name: &str) -> Result<(), HostError> {
    let difficulty = Difficulty::parse(name)?;
    let mut settings = with_session(|s| {
        s.set_difficulty(difficulty);
        s.settings().clone()
    })
    .unwrap_or_else(Settings::load);
    settings.difficulty = difficulty;
    settings.save()?;
    Ok(())
}

#[wasm_bindgen(js_name = setDifficulty)]
pub fn set_difficulty_js(name: String) -> Result<(), JsValue> {
    set_difficulty(&name).map_err(to_js)
}

/// Current HUD as JSON, or undefined when nothing is mounted
#[wasm_bindgen(js_name = hudJson)]
pub fn hud_json() -> Option<String> {
    with_session(|s| serde_json::to_string(&s.hud()).ok()).flatten()
}
