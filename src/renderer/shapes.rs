//! Tessellation of draw lists into triangle lists

use glam::Vec2;
use std::f32::consts::TAU;

use super::draw::{Color, DrawCmd, DrawList, colors};
use super::vertex::Vertex;
use crate::sim::Rect;

/// Segments used for a circle of the given radius
fn segments_for(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(8, 48)
}

/// Point on a circle at segment `i` of `n`
fn rim(center: Vec2, radius: f32, i: u32, n: u32) -> Vec2 {
    let theta = i as f32 / n as f32 * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

/// One frame ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear: Color,
    pub vertices: Vec<Vertex>,
}

/// Tessellate a draw list in play-field pixels into clip-space triangles
///
/// A `Clear` discards everything queued before it and becomes the frame's
/// clear color.
pub fn tessellate(list: &DrawList) -> Frame {
    let commands = list.commands();
    let start = commands
        .iter()
        .rposition(|c| matches!(c, DrawCmd::Clear(_)))
        .unwrap_or(0);
    let clear = match commands.get(start) {
        Some(DrawCmd::Clear(color)) => *color,
        _ => colors::BACKGROUND,
    };

    let mut out = Tessellator {
        viewport: list.viewport(),
        vertices: Vec::with_capacity(commands.len() * 6),
    };
    for cmd in &commands[start..] {
        match cmd {
            DrawCmd::Clear(_) => {}
            DrawCmd::Rect { rect, color } => out.rect(rect, *color),
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => out.circle(*center, *radius, *color),
            DrawCmd::Ring {
                center,
                inner,
                outer,
                color,
            } => out.ring(*center, *inner, *outer, *color),
            DrawCmd::Triangle { points, color } => out.triangle(*points, *color),
        }
    }

    Frame {
        clear,
        vertices: out.vertices,
    }
}

struct Tessellator {
    viewport: Vec2,
    vertices: Vec<Vertex>,
}

impl Tessellator {
    fn push(&mut self, p: Vec2, color: Color) {
        self.vertices
            .push(Vertex::from_surface(p, self.viewport, color));
    }

    fn triangle(&mut self, [a, b, c]: [Vec2; 3], color: Color) {
        self.push(a, color);
        self.push(b, color);
        self.push(c, color);
    }

    fn quad(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: Color) {
        self.triangle([a, b, c], color);
        self.triangle([c, b, d], color);
    }

    fn rect(&mut self, rect: &Rect, color: Color) {
        let tl = rect.min;
        let br = rect.min + rect.size;
        self.quad(
            tl,
            Vec2::new(br.x, tl.y),
            Vec2::new(tl.x, br.y),
            br,
            color,
        );
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let n = segments_for(radius);
        for i in 0..n {
            self.triangle(
                [center, rim(center, radius, i, n), rim(center, radius, i + 1, n)],
                color,
            );
        }
    }

    fn ring(&mut self, center: Vec2, inner: f32, outer: f32, color: Color) {
        let n = segments_for(outer);
        for i in 0..n {
            self.quad(
                rim(center, inner, i, n),
                rim(center, outer, i, n),
                rim(center, inner, i + 1, n),
                rim(center, outer, i + 1, n),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_two_triangles_in_clip_space() {
        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        list.fill_rect(0.0, 0.0, 50.0, 50.0, colors::RED);
        let frame = tessellate(&list);
        assert_eq!(frame.vertices.len(), 6);
        assert_eq!(frame.vertices[0].position, [-1.0, 1.0]);
        assert!(frame.vertices.iter().all(|v| v.color == colors::RED));
        assert!(
            frame
                .vertices
                .iter()
                .any(|v| v.position == [0.0, 0.0])
        );
    }

    #[test]
    fn test_clear_discards_earlier_commands() {
        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        list.fill_rect(0.0, 0.0, 10.0, 10.0, colors::RED);
        list.clear(colors::WHITE);
        list.triangle(Vec2::ZERO, Vec2::X, Vec2::Y, colors::GREEN);
        let frame = tessellate(&list);
        assert_eq!(frame.clear, colors::WHITE);
        assert_eq!(frame.vertices.len(), 3);
    }

    #[test]
    fn test_empty_list_uses_background() {
        let frame = tessellate(&DrawList::new(Vec2::ONE));
        assert_eq!(frame.clear, colors::BACKGROUND);
        assert!(frame.vertices.is_empty());
    }

    #[test]
    fn test_circle_and_ring_vertex_counts() {
        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        list.circle(Vec2::splat(50.0), 10.0, colors::YELLOW);
        let n = segments_for(10.0) as usize;
        assert_eq!(tessellate(&list).vertices.len(), n * 3);

        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        list.ring(Vec2::splat(50.0), 8.0, 10.0, colors::YELLOW);
        assert_eq!(tessellate(&list).vertices.len(), n * 6);
    }
}
