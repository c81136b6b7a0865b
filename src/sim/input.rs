//! Input normalization
//!
//! Raw key names (browser `KeyboardEvent.key` values) and pointer events are
//! folded into a [`TickInput`] that the session samples once per tick.
//! Directions and the pointer are last-writer-wins; the primary action is
//! edge-triggered so a held key fires exactly once.

use glam::Vec2;

use super::grid::Direction;

/// A recognized logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Dir(Direction),
    /// Shoot / jump / flap / rotate
    Action,
}

impl Key {
    /// Map a raw key name; arrows and WASD share the four directions
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "ArrowUp" | "w" | "W" => Key::Dir(Direction::Up),
            "ArrowDown" | "s" | "S" => Key::Dir(Direction::Down),
            "ArrowLeft" | "a" | "A" => Key::Dir(Direction::Left),
            "ArrowRight" | "d" | "D" => Key::Dir(Direction::Right),
            " " | "Spacebar" => Key::Action,
            _ => return None,
        };
        Some(key)
    }
}

/// Directions currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// -1 for left, +1 for right, 0 for neither; left wins when both are held
    pub fn horizontal(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Most recent directional press since the previous tick
    pub pressed: Option<Direction>,
    /// Directions held at sample time
    pub held: HeldDirections,
    /// Primary action fired this tick (space/click)
    pub action: bool,
    /// Pointer position in surface coordinates
    pub pointer: Option<Vec2>,
}

impl TickInput {
    pub fn press(dir: Direction) -> Self {
        Self {
            pressed: Some(dir),
            ..Default::default()
        }
    }

    pub fn action() -> Self {
        Self {
            action: true,
            ..Default::default()
        }
    }

    pub fn pointer_at(x: f32, y: f32) -> Self {
        Self {
            pointer: Some(Vec2::new(x, y)),
            ..Default::default()
        }
    }

    pub fn holding(dir: Direction) -> Self {
        let mut held = HeldDirections::default();
        held.set(dir, true);
        Self {
            held,
            ..Default::default()
        }
    }

    /// Action fired or Up pressed (jump/flap/rotate all accept both)
    pub fn action_or_up(&self) -> bool {
        self.action || self.pressed == Some(Direction::Up)
    }
}

/// Buffers host events between ticks
#[derive(Debug, Default)]
pub struct InputAdapter {
    held: HeldDirections,
    pressed: Option<Direction>,
    action_down: bool,
    action_pending: bool,
    pointer: Option<Vec2>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the key was recognized (host may suppress scrolling)
    pub fn key_down(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(Key::Dir(dir)) => {
                self.held.set(dir, true);
                self.pressed = Some(dir);
                true
            }
            Some(Key::Action) => {
                // Auto-repeat keydowns arrive while the key is still down
                if !self.action_down {
                    self.action_pending = true;
                }
                self.action_down = true;
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(Key::Dir(dir)) => {
                self.held.set(dir, false);
                true
            }
            Some(Key::Action) => {
                self.action_down = false;
                true
            }
            None => false,
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
        self.action_pending = true;
    }

    /// Take this tick's input; one-shot signals are consumed
    pub fn sample(&mut self) -> TickInput {
        TickInput {
            pressed: self.pressed.take(),
            held: self.held,
            action: std::mem::take(&mut self.action_pending),
            pointer: self.pointer,
        }
    }

    /// Forget everything (used on teardown and reset)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
