#![forbid(unsafe_code)]

//! Geometric primitives.

/// A pixel position.
///
/// Signed so that pointer positions reported outside the surface (dragging
/// past the left or top edge) are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Multiply both coordinates by an integer factor.
    #[inline]
    pub const fn scale(self, factor: i32) -> Self {
        Self::new(self.x.saturating_mul(factor), self.y.saturating_mul(factor))
    }

    /// Check if the point lies inside `rect`.
    #[inline]
    pub fn is_in(self, rect: Rect) -> bool {
        rect.contains_point(self)
    }
}

/// An axis-aligned integer rectangle.
///
/// Used for buffer bounds, damage regions, and resize payloads. The left and
/// top edges are inclusive, the right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Create a rectangle from its `(x0, y0)-(x1, y1)` corners.
    ///
    /// Corners are normalized, so swapped arguments describe the same rectangle.
    #[inline]
    pub fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        Self::new(left, top, right - left, bottom - top)
    }

    /// Left edge (inclusive). Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> u32 {
        self.x
    }

    /// Top edge (inclusive). Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> u32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a pixel coordinate is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if a (possibly negative) point is inside the rectangle.
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        match (u32::try_from(p.x), u32::try_from(p.y)) {
            (Ok(x), Ok(y)) => self.contains(x, y),
            _ => false,
        }
    }

    /// Check if `other` lies entirely within this rectangle.
    ///
    /// The empty rectangle is contained in everything.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle that is the union of this rectangle and another.
    ///
    /// The result is the smallest rectangle that contains both. Empty
    /// rectangles contribute nothing, so `Rect::EMPTY` is the identity.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 7));
        assert!(!rect.contains(6, 3));
        assert!(!rect.contains(2, 8));
    }

    #[test]
    fn rect_from_corners_matches_new() {
        assert_eq!(Rect::from_corners(10, 10, 20, 20), Rect::new(10, 10, 10, 10));
        assert_eq!(Rect::from_corners(0, 0, 640, 480), Rect::from_size(640, 480));
        // Swapped corners normalize.
        assert_eq!(Rect::from_corners(20, 20, 10, 10), Rect::new(10, 10, 10, 10));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection(&b), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn rect_intersection_no_overlap_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(3, 3, 2, 2);
        assert_eq!(a.intersection(&b), Rect::default());
    }

    #[test]
    fn rect_intersection_adjacent_no_overlap() {
        // Rects share an edge but don't overlap (right edge is exclusive)
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(5, 0, 5, 5);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn rect_union_basic() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(3, 3, 5, 5);
        assert_eq!(a.union(&b), Rect::new(0, 0, 8, 8));
    }

    #[test]
    fn rect_union_disjoint() {
        let a = Rect::new(10, 10, 10, 10);
        let b = Rect::new(30, 5, 5, 5);
        assert_eq!(a.union(&b), Rect::new(10, 5, 25, 15));
    }

    #[test]
    fn rect_union_ignores_empty() {
        let r = Rect::new(10, 10, 10, 10);
        // An empty rect far away must not stretch the union toward it.
        let far_empty = Rect::new(500, 500, 0, 0);
        assert_eq!(r.union(&far_empty), r);
        assert_eq!(far_empty.union(&r), r);
        assert_eq!(Rect::EMPTY.union(&Rect::EMPTY), Rect::EMPTY);
    }

    #[test]
    fn rect_right_bottom_saturating() {
        let r = Rect::new(u32::MAX - 5, u32::MAX - 3, 100, 100);
        assert_eq!(r.right(), u32::MAX);
        assert_eq!(r.bottom(), u32::MAX);
    }

    #[test]
    fn rect_area_and_is_empty() {
        assert_eq!(Rect::new(0, 0, 10, 20).area(), 200);
        assert!(Rect::new(5, 5, 0, 10).is_empty());
        assert!(Rect::new(5, 5, 10, 0).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn rect_contains_rect() {
        let outer = Rect::new(0, 0, 10, 10);
        assert!(outer.contains_rect(&Rect::new(2, 2, 3, 3)));
        assert!(outer.contains_rect(&outer));
        assert!(!outer.contains_rect(&Rect::new(8, 8, 3, 3)));
        assert!(outer.contains_rect(&Rect::new(50, 50, 0, 0)));
    }

    #[test]
    fn point_in_rect() {
        let r = Rect::new(100, 100, 250, 150);
        assert!(Point::new(100, 100).is_in(r));
        assert!(Point::new(349, 249).is_in(r));
        assert!(!Point::new(350, 100).is_in(r));
        assert!(!Point::new(-1, 120).is_in(r));
    }

    #[test]
    fn point_scale() {
        assert_eq!(Point::new(3, -4).scale(2), Point::new(6, -8));
        assert_eq!(Point::new(i32::MAX, 0).scale(2), Point::new(i32::MAX, 0));
    }
}
