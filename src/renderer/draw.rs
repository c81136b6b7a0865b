//! Immediate-mode draw lists
//!
//! Simulations describe a frame as an ordered list of filled primitives in
//! play-field pixels. The GPU backend tessellates the list; tests can
//! inspect it directly.

use glam::Vec2;

use crate::sim::Rect;

/// Linear RGBA
pub type Color = [f32; 4];

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Rect { rect: Rect, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Ring { center: Vec2, inner: f32, outer: f32, color: Color },
    Triangle { points: [Vec2; 3], color: Color },
}

#[derive(Debug, Clone)]
pub struct DrawList {
    viewport: Vec2,
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            commands: Vec::with_capacity(256),
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCmd::Clear(color));
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::Rect { rect, color });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.rect(Rect::new(x, y, w, h), color);
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn ring(&mut self, center: Vec2, inner: f32, outer: f32, color: Color) {
        self.commands.push(DrawCmd::Ring {
            center,
            inner,
            outer,
            color,
        });
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.commands.push(DrawCmd::Triangle {
            points: [a, b, c],
            color,
        });
    }

    /// Number of commands of a given variant (used by tests)
    pub fn count(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

/// Arcade palette
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.02, 0.02, 0.05, 1.0];
    pub const GRID_LINE: Color = [0.0, 0.6, 1.0, 0.1];
    pub const PRIMARY: Color = [0.0, 0.6, 1.0, 1.0];
    pub const PRIMARY_DARK: Color = [0.0, 0.4, 0.8, 1.0];
    pub const ACCENT: Color = [0.0, 0.78, 1.0, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const RED: Color = [1.0, 0.2, 0.3, 1.0];
    pub const ORANGE: Color = [1.0, 0.55, 0.1, 1.0];
    pub const YELLOW: Color = [1.0, 0.9, 0.2, 1.0];
    pub const GREEN: Color = [0.2, 0.9, 0.4, 1.0];
    pub const PURPLE: Color = [0.7, 0.3, 1.0, 1.0];
    pub const PINK: Color = [1.0, 0.5, 0.8, 1.0];
    pub const CYAN: Color = [0.2, 1.0, 1.0, 1.0];
    pub const GOLD: Color = [0.9, 0.85, 0.3, 1.0];
    pub const WALL: Color = [0.1, 0.2, 0.8, 1.0];
    pub const DIM: Color = [1.0, 1.0, 1.0, 0.3];

    pub fn with_alpha(color: Color, alpha: f32) -> Color {
        [color[0], color[1], color[2], alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_keep_order() {
        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        list.clear(colors::BACKGROUND);
        list.fill_rect(0.0, 0.0, 10.0, 10.0, colors::WHITE);
        list.circle(Vec2::splat(5.0), 2.0, colors::RED);

        assert_eq!(list.len(), 3);
        assert!(matches!(list.commands()[0], DrawCmd::Clear(_)));
        assert!(matches!(list.commands()[2], DrawCmd::Circle { .. }));
        assert_eq!(list.count(|c| matches!(c, DrawCmd::Rect { .. })), 1);
    }
}
