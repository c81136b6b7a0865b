//! Collision geometry for the continuous-space games
//!
//! Every game entity is either a circle (balls, birds, orbs) or an
//! axis-aligned rectangle (paddles, bricks, pipes, platforms). Overlap tests
//! are written once per geometry pair and shared by all modules.
//!
//! Coordinates are surface pixels with +y pointing down.

use glam::Vec2;

/// Axis-aligned rectangle stored as top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Strict containment (points on the edge are outside)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.left() && p.x < self.right() && p.y > self.top() && p.y < self.bottom()
    }

    /// Closest point inside the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.min + self.size)
    }
}

/// Position plus extent of an entity, used for generic overlap tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Body {
    Circle { center: Vec2, radius: f32 },
    Rect(Rect),
}

impl Body {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Body::Circle { center, radius }
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        match (self, other) {
            (Body::Circle { center: a, radius: ra }, Body::Circle { center: b, radius: rb }) => {
                circles_overlap(*a, *ra, *b, *rb)
            }
            (Body::Circle { center, radius }, Body::Rect(rect))
            | (Body::Rect(rect), Body::Circle { center, radius }) => {
                circle_rect_overlap(*center, *radius, rect)
            }
            (Body::Rect(a), Body::Rect(b)) => a.overlaps(b),
        }
    }
}

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance_squared(rect.clamp_point(center)) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let inside = Rect::new(5.0, 5.0, 10.0, 10.0);

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_body_overlap_dispatch() {
        let ball = Body::circle(Vec2::new(0.0, 0.0), 5.0);
        let near = Body::circle(Vec2::new(8.0, 0.0), 5.0);
        let far = Body::circle(Vec2::new(20.0, 0.0), 5.0);
        let wall = Body::Rect(Rect::new(3.0, -10.0, 4.0, 20.0));

        assert!(ball.overlaps(&near));
        assert!(!ball.overlaps(&far));
        assert!(ball.overlaps(&wall));
        assert!(wall.overlaps(&ball));
        assert!(!far.overlaps(&wall));
    }

    #[test]
    fn test_circle_rect_corner() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Diagonal distance to the corner is ~4.24
        assert!(circle_rect_overlap(Vec2::new(13.0, 13.0), 4.5, &rect));
        assert!(!circle_rect_overlap(Vec2::new(13.0, 13.0), 4.0, &rect));
        assert_eq!(rect.clamp_point(Vec2::new(-5.0, 4.0)), Vec2::new(0.0, 4.0));
    }
}
