use super::{Edges, Vec2};

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// `width` x `height` at the origin, e.g. a whole window.
    #[inline]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// True for points on the min edges and inside; max edges are excluded.
    pub fn contains(self, p: Vec2) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (lo.x..hi.x).contains(&p.x) && (lo.y..hi.y).contains(&p.y)
    }

    /// Moves every side inwards by `edges`, clamping the size at zero.
    pub fn inset(self, edges: Edges) -> Rect {
        Rect::new(
            self.origin.x + edges.left,
            self.origin.y + edges.top,
            (self.size.x - edges.h()).max(0.0),
            (self.size.y - edges.v()).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGINS: Edges = Edges::new(10.0, 10.0, 50.0, 10.0);

    #[test]
    fn inset_leaves_bottom_strip() {
        for (w, h) in [(640.0, 480.0), (21.0, 61.0), (1920.0, 1080.0)] {
            let inner = Rect::from_size(w, h).inset(MARGINS);
            assert_eq!(inner.min(), Vec2::new(10.0, 10.0));
            assert_eq!(inner.max(), Vec2::new(w - 10.0, h - 50.0));
        }
    }

    #[test]
    fn inset_inside_the_bottom_strip_has_zero_height() {
        let inner = Rect::from_size(640.0, 55.0).inset(MARGINS);
        assert!(inner.is_empty());
        assert_eq!(inner.min(), Vec2::new(10.0, 10.0));
        assert_eq!((inner.width(), inner.height()), (620.0, 0.0));
    }

    #[test]
    fn inset_past_the_edges_is_empty() {
        let inner = Rect::from_size(15.0, 30.0).inset(MARGINS);
        assert!(inner.is_empty());
        assert_eq!((inner.width(), inner.height()), (0.0, 0.0));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(29.5, 15.0)));
        assert!(!rect.contains(Vec2::new(30.0, 15.0)));
        assert!(!rect.contains(Vec2::new(15.0, 9.0)));
    }

    #[test]
    fn nothing_is_inside_an_empty_rect() {
        assert!(!Rect::from_size(0.0, 10.0).contains(Vec2::new(0.0, 5.0)));
    }
}
