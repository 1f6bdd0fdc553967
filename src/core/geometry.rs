//! Shapes and Line Intersection
//!
//! Integer-only intersection of a line segment with axis-aligned segments
//! and squares. "No intersection" is `Ok(None)`; only arithmetic failures
//! are errors.

use serde::{Serialize, Deserialize};

use super::int::{min_max, Int, NumericResult};
use super::pt::Pt;

/// Line segment from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Line {
    /// First endpoint.
    pub start: Pt,
    /// Second endpoint.
    pub end: Pt,
}

/// Circle given by center and diameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Circle {
    /// Center point.
    pub center: Pt,
    /// Full width across the center.
    pub diameter: Int,
}

/// Axis-aligned square given by center and side length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Square {
    /// Center point.
    pub center: Pt,
    /// Side length.
    pub size: Int,
}

/// Axis-aligned rectangle given by two opposite corners, in any order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    /// One corner.
    pub corner1: Pt,
    /// The opposite corner.
    pub corner2: Pt,
}

impl Line {
    /// Segment from `start` to `end`.
    #[inline]
    pub const fn new(start: Pt, end: Pt) -> Self {
        Self { start, end }
    }
}

impl Circle {
    /// True if `pt` lies inside or on the circle.
    pub fn contains_pt(&self, pt: Pt) -> NumericResult<bool> {
        // d^2 <= (diameter/2)^2, compared as 4*d^2 <= diameter^2
        let dist_sq = self.center.squared_dist_to(pt)?;
        Ok(dist_sq.times(Int::new(4))?.leq(self.diameter.sqr()?))
    }
}

impl Square {
    /// The four corners, clockwise from the min corner.
    pub fn corners(&self) -> NumericResult<[Pt; 4]> {
        let half = self.size.div_by(Int::TWO)?;
        let min_x = self.center.x.minus(half)?;
        let max_x = self.center.x.plus(half)?;
        let min_y = self.center.y.minus(half)?;
        let max_y = self.center.y.plus(half)?;
        Ok([
            Pt::new(min_x, min_y),
            Pt::new(max_x, min_y),
            Pt::new(max_x, max_y),
            Pt::new(min_x, max_y),
        ])
    }

    /// Bounding rectangle of the square.
    pub fn to_rectangle(&self) -> NumericResult<Rectangle> {
        let [p1, _, p3, _] = self.corners()?;
        Ok(Rectangle::new(p1, p3))
    }
}

impl Rectangle {
    /// Rectangle spanned by two opposite corners.
    #[inline]
    pub const fn new(corner1: Pt, corner2: Pt) -> Self {
        Self { corner1, corner2 }
    }

    /// Extent along x.
    pub fn width(&self) -> NumericResult<Int> {
        self.corner1.x.minus(self.corner2.x)?.abs()
    }

    /// Extent along y.
    pub fn height(&self) -> NumericResult<Int> {
        self.corner1.y.minus(self.corner2.y)?.abs()
    }

    /// Corner with the smallest coordinates.
    pub fn min(&self) -> Pt {
        Pt::new(
            self.corner1.x.min(self.corner2.x),
            self.corner1.y.min(self.corner2.y),
        )
    }

    /// Corner with the largest coordinates.
    pub fn max(&self) -> Pt {
        Pt::new(
            self.corner1.x.max(self.corner2.x),
            self.corner1.y.max(self.corner2.y),
        )
    }

    /// True if `pt` lies inside or on the border.
    pub fn contains_pt(&self, pt: Pt) -> bool {
        pt.x.between(self.corner1.x, self.corner2.x) && pt.y.between(self.corner1.y, self.corner2.y)
    }

    /// `pt` clamped into the rectangle.
    pub fn closest_pt(&self, pt: Pt) -> Pt {
        let lo = self.min();
        let hi = self.max();
        Pt::new(lo.x.max(pt.x.min(hi.x)), lo.y.max(pt.y.min(hi.y)))
    }
}

/// Intersection of `l` with the vertical segment `vert`.
///
/// `vert.start.x` is taken as the segment's x; `vert.end.x` is assumed equal.
pub fn line_vertical_intersection(l: Line, vert: Line) -> NumericResult<Option<Pt>> {
    let (min_x, max_x) = min_max(l.start.x, l.end.x);
    let vert_x = vert.start.x;

    // `l` entirely left or right of the segment.
    if min_x.gt(vert_x) || max_x.lt(vert_x) {
        return Ok(None);
    }

    let (vert_min_y, vert_max_y) = min_max(vert.start.y, vert.end.y);

    // Walk along y in the same proportion as along x:
    // y = start.y + (vert_x - start.x) * (end.y - start.y) / (end.x - start.x)
    let y = if l.end.x.eq(l.start.x) {
        l.start.y
    } else {
        let dx = l.end.x.minus(l.start.x)?;
        let dy = l.end.y.minus(l.start.y)?;
        l.start.y.plus(vert_x.minus(l.start.x)?.times(dy)?.div_by(dx)?)?
    };

    if y.lt(vert_min_y) || y.gt(vert_max_y) {
        Ok(None)
    } else {
        Ok(Some(Pt::new(vert_x, y)))
    }
}

/// Intersection of `l` with the horizontal segment `horiz`.
///
/// `horiz.start.y` is taken as the segment's y; `horiz.end.y` is assumed equal.
pub fn line_horizontal_intersection(l: Line, horiz: Line) -> NumericResult<Option<Pt>> {
    let (min_y, max_y) = min_max(l.start.y, l.end.y);
    let horiz_y = horiz.start.y;

    if min_y.gt(horiz_y) || max_y.lt(horiz_y) {
        return Ok(None);
    }

    let (horiz_min_x, horiz_max_x) = min_max(horiz.start.x, horiz.end.x);

    let x = if l.end.y.eq(l.start.y) {
        l.start.x
    } else {
        let dx = l.end.x.minus(l.start.x)?;
        let dy = l.end.y.minus(l.start.y)?;
        l.start.x.plus(horiz_y.minus(l.start.y)?.times(dx)?.div_by(dy)?)?
    };

    if x.lt(horiz_min_x) || x.gt(horiz_max_x) {
        Ok(None)
    } else {
        Ok(Some(Pt::new(x, horiz_y)))
    }
}

/// Intersection of `l` with the border of `s` closest to `l.start`.
///
/// Edges are tested top, right, bottom, left; ties go to the first edge.
pub fn line_square_intersection(l: Line, s: Square) -> NumericResult<Option<Pt>> {
    let [p1, p2, p3, p4] = s.corners()?;

    let candidates = [
        line_horizontal_intersection(l, Line::new(p1, p2))?,
        line_vertical_intersection(l, Line::new(p2, p3))?,
        line_horizontal_intersection(l, Line::new(p3, p4))?,
        line_vertical_intersection(l, Line::new(p4, p1))?,
    ];
    let hits: Vec<Pt> = candidates.into_iter().flatten().collect();

    closest_point(&hits, l.start)
}

/// Closest intersection of `l` with any of `squares`.
pub fn line_squares_intersection(l: Line, squares: &[Square]) -> NumericResult<Option<Pt>> {
    let mut hits = Vec::new();
    for s in squares {
        if let Some(hit) = line_square_intersection(l, *s)? {
            hits.push(hit);
        }
    }
    closest_point(&hits, l.start)
}

/// Point of `pts` nearest to `reference`; the first one wins ties.
pub fn closest_point(pts: &[Pt], reference: Pt) -> NumericResult<Option<Pt>> {
    let Some((first, rest)) = pts.split_first() else {
        return Ok(None);
    };

    let mut best = *first;
    let mut best_dist = reference.squared_dist_to(best)?;
    for pt in rest {
        let dist = reference.squared_dist_to(*pt)?;
        if dist.lt(best_dist) {
            best = *pt;
            best_dist = dist;
        }
    }
    Ok(Some(best))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> Pt {
        Pt::from_ints(x, y)
    }

    fn line(x1: i64, y1: i64, x2: i64, y2: i64) -> Line {
        Line::new(p(x1, y1), p(x2, y2))
    }

    fn square(x: i64, y: i64, size: i64) -> Square {
        Square { center: p(x, y), size: Int::new(size) }
    }

    #[test]
    fn test_rectangle_normalizes_corners() {
        let r = Rectangle::new(p(10, 0), p(0, 20));
        assert_eq!(r.min(), p(0, 0));
        assert_eq!(r.max(), p(10, 20));
        assert_eq!(r.width(), Ok(Int::new(10)));
        assert_eq!(r.height(), Ok(Int::new(20)));
        assert!(r.contains_pt(p(5, 5)));
        assert!(r.contains_pt(p(10, 20)));
        assert!(!r.contains_pt(p(11, 5)));
        assert_eq!(r.closest_pt(p(-5, 30)), p(0, 20));
        assert_eq!(r.closest_pt(p(3, 4)), p(3, 4));
    }

    #[test]
    fn test_circle_contains() {
        let c = Circle { center: p(0, 0), diameter: Int::new(10) };
        assert_eq!(c.contains_pt(p(3, 4)), Ok(true));
        assert_eq!(c.contains_pt(p(5, 0)), Ok(true));
        assert_eq!(c.contains_pt(p(4, 4)), Ok(false));
    }

    #[test]
    fn test_vertical_intersection() {
        let vert = line(5, 0, 5, 10);
        assert_eq!(line_vertical_intersection(line(0, 0, 10, 10), vert), Ok(Some(p(5, 5))));
        assert_eq!(line_vertical_intersection(line(10, 4, 0, 4), vert), Ok(Some(p(5, 4))));
        // Entirely to one side.
        assert_eq!(line_vertical_intersection(line(6, 0, 10, 10), vert), Ok(None));
        assert_eq!(line_vertical_intersection(line(0, 0, 4, 10), vert), Ok(None));
        // Crosses x = 5 outside the segment's y range.
        assert_eq!(line_vertical_intersection(line(0, 20, 10, 30), vert), Ok(None));
    }

    #[test]
    fn test_vertical_intersection_with_vertical_line() {
        // The tested line is vertical and sits on the segment's x: no division.
        let vert = line(5, 0, 5, 10);
        assert_eq!(line_vertical_intersection(line(5, 3, 5, 30), vert), Ok(Some(p(5, 3))));
        assert_eq!(line_vertical_intersection(line(5, 30, 5, 3), vert), Ok(None));
    }

    #[test]
    fn test_horizontal_intersection() {
        let horiz = line(0, 5, 10, 5);
        assert_eq!(line_horizontal_intersection(line(0, 0, 10, 10), horiz), Ok(Some(p(5, 5))));
        assert_eq!(line_horizontal_intersection(line(2, 0, 2, 10), horiz), Ok(Some(p(2, 5))));
        assert_eq!(line_horizontal_intersection(line(0, 6, 10, 10), horiz), Ok(None));
        assert_eq!(line_horizontal_intersection(line(20, 0, 30, 10), horiz), Ok(None));
        assert_eq!(line_horizontal_intersection(line(3, 5, 8, 5), horiz), Ok(Some(p(3, 5))));
    }

    #[test]
    fn test_line_square_returns_entry_point() {
        let s = square(10, 0, 4);
        // Left to right through the middle: enters at x = 8.
        assert_eq!(line_square_intersection(line(0, 0, 20, 0), s), Ok(Some(p(8, 0))));
        // Right to left: enters at x = 12.
        assert_eq!(line_square_intersection(line(20, 0, 0, 0), s), Ok(Some(p(12, 0))));
        // From above.
        assert_eq!(line_square_intersection(line(10, -10, 10, 10), s), Ok(Some(p(10, -2))));
        // Misses.
        assert_eq!(line_square_intersection(line(0, 5, 20, 5), s), Ok(None));
        // Stops short.
        assert_eq!(line_square_intersection(line(0, 0, 7, 0), s), Ok(None));
    }

    #[test]
    fn test_line_square_corner_tie_prefers_first_edge() {
        // Passes exactly through the min corner: top and left edges both hit
        // it, the top edge is tested first.
        let s = square(10, 10, 4);
        let hit = line_square_intersection(line(0, 0, 20, 20), s).unwrap();
        assert_eq!(hit, Some(p(8, 8)));
    }

    #[test]
    fn test_line_squares_nearest() {
        let squares = [square(30, 0, 4), square(10, 0, 4), square(50, 0, 4)];
        assert_eq!(
            line_squares_intersection(line(0, 0, 60, 0), &squares),
            Ok(Some(p(8, 0)))
        );
        assert_eq!(
            line_squares_intersection(line(60, 0, 0, 0), &squares),
            Ok(Some(p(52, 0)))
        );
        assert_eq!(line_squares_intersection(line(0, 10, 60, 10), &squares), Ok(None));
        assert_eq!(line_squares_intersection(line(0, 0, 60, 0), &[]), Ok(None));
    }

    #[test]
    fn test_closest_point_first_wins_ties() {
        let pts = [p(5, 0), p(0, 5), p(1, 1)];
        assert_eq!(closest_point(&pts, p(0, 0)), Ok(Some(p(1, 1))));
        let tied = [p(5, 0), p(0, 5)];
        assert_eq!(closest_point(&tied, p(0, 0)), Ok(Some(p(5, 0))));
        assert_eq!(closest_point(&[], p(0, 0)), Ok(None));
    }

    #[test]
    fn test_intersection_overflow_is_error() {
        let vert = Line::new(Pt::new(Int::ZERO, Int::MIN), Pt::new(Int::ZERO, Int::MAX));
        let l = Line::new(Pt::new(Int::new(-10), Int::MIN), Pt::new(Int::new(10), Int::MAX));
        assert!(line_vertical_intersection(l, vert).is_err());
    }
}
