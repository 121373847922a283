//! Interval resolution: "outer minus inner" along one sampling ray.
//!
//! Both shapes cross the ray in at most two places, so the visible part is a
//! 1-D interval subtraction. Positions along the ray are compared as squared
//! distances from the ray origin. The origin is shared and lies outside
//! both shapes, so no square roots are needed.

use crate::geometry::{Point, Segment};

/// Visible part of one sampling ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interval {
    /// Nothing visible.
    Empty,
    Single(Segment),
    /// The inner shape cuts a hole in the middle.
    Split(Segment, Segment),
}

impl Interval {
    pub fn len(&self) -> usize {
        match self {
            Interval::Empty => 0,
            Interval::Single(_) => 1,
            Interval::Split(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Interval::Empty)
    }

    /// Segments in order along the ray.
    pub fn segments(self) -> impl Iterator<Item = Segment> {
        let (a, b) = match self {
            Interval::Empty => (None, None),
            Interval::Single(s) => (Some(s), None),
            Interval::Split(s, t) => (Some(s), Some(t)),
        };
        a.into_iter().chain(b)
    }
}

/// Order two points nearest-first by squared distance from `origin`.
///
/// Returns `((near, near_d2), (far, far_d2))`. Ties keep the input order.
#[inline]
fn order_by_distance(origin: Point, a: Point, b: Point) -> ((Point, f64), (Point, f64)) {
    let da = a.distance_squared(origin);
    let db = b.distance_squared(origin);
    if db < da { ((b, db), (a, da)) } else { ((a, da), (b, db)) }
}

/// Subtract the inner crossing interval from the outer one.
///
/// `outer` must have both crossings or the ray shows nothing. Either inner
/// crossing may be missing. A missing inner crossing stands at the origin
/// itself (distance 0), so a lone inner crossing acts like an interval that
/// runs from the origin to that crossing. Existing content depends on that
/// tie-break, so it is kept as is.
///
/// The comparisons are strict and checked in a fixed order. Touching
/// intervals (equal distances) fall through to the later cases.
pub fn resolve_interval(
    origin: Point,
    outer: (Option<Point>, Option<Point>),
    inner: (Option<Point>, Option<Point>),
) -> Interval {
    let (Some(outer_a), Some(outer_b)) = outer else {
        return Interval::Empty;
    };
    let ((out_near, out_near_d), (out_far, out_far_d)) = order_by_distance(origin, outer_a, outer_b);
    let outer_segment = Segment::new(out_near, out_far);

    if inner.0.is_none() && inner.1.is_none() {
        return Interval::Single(outer_segment);
    }

    let inner_a = inner.0.unwrap_or(origin);
    let inner_b = inner.1.unwrap_or(origin);
    let ((in_near, in_near_d), (in_far, in_far_d)) = order_by_distance(origin, inner_a, inner_b);

    if in_far_d > out_far_d && in_near_d < out_near_d {
        // Inner covers the whole outer interval
        Interval::Empty
    } else if in_near_d > out_far_d || in_far_d < out_near_d {
        // Disjoint
        Interval::Single(outer_segment)
    } else if in_far_d > out_far_d {
        // Inner runs past the far end
        Interval::Single(Segment::new(out_near, in_near))
    } else if in_near_d < out_near_d {
        // Inner starts before the near end
        Interval::Single(Segment::new(in_far, out_far))
    } else {
        Interval::Split(Segment::new(out_near, in_near), Segment::new(in_far, out_far))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const O: Point = Point::new(0.0, 0.0);

    fn at(x: f64) -> Option<Point> {
        Some(Point::new(x, 0.0))
    }

    fn seg(a: f64, b: f64) -> Segment {
        Segment::new(Point::new(a, 0.0), Point::new(b, 0.0))
    }

    #[test]
    fn missing_outer_crossing_shows_nothing() {
        assert_eq!(resolve_interval(O, (at(1.0), None), (None, None)), Interval::Empty);
        assert_eq!(resolve_interval(O, (None, at(1.0)), (at(2.0), at(3.0))), Interval::Empty);
    }

    #[test]
    fn no_inner_yields_outer_segment_nearest_first() {
        let r = resolve_interval(O, (at(20.0), at(10.0)), (None, None));
        assert_eq!(r, Interval::Single(seg(10.0, 20.0)));
    }

    #[test]
    fn inner_covering_outer_hides_everything() {
        let r = resolve_interval(O, (at(10.0), at(20.0)), (at(5.0), at(25.0)));
        assert_eq!(r, Interval::Empty);
    }

    #[test]
    fn disjoint_inner_keeps_outer() {
        assert_eq!(
            resolve_interval(O, (at(10.0), at(20.0)), (at(25.0), at(30.0))),
            Interval::Single(seg(10.0, 20.0))
        );
        assert_eq!(
            resolve_interval(O, (at(10.0), at(20.0)), (at(2.0), at(5.0))),
            Interval::Single(seg(10.0, 20.0))
        );
    }

    #[test]
    fn inner_past_far_end_trims_far_side() {
        let r = resolve_interval(O, (at(10.0), at(20.0)), (at(15.0), at(25.0)));
        assert_eq!(r, Interval::Single(seg(10.0, 15.0)));
    }

    #[test]
    fn inner_before_near_end_trims_near_side() {
        let r = resolve_interval(O, (at(10.0), at(20.0)), (at(5.0), at(15.0)));
        assert_eq!(r, Interval::Single(seg(15.0, 20.0)));
    }

    #[test]
    fn inner_inside_outer_splits() {
        let r = resolve_interval(O, (at(20.0), at(10.0)), (at(16.0), at(12.0)));
        assert_eq!(r, Interval::Split(seg(10.0, 12.0), seg(16.0, 20.0)));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn split_pieces_and_hole_rebuild_outer() {
        let r = resolve_interval(O, (at(10.0), at(20.0)), (at(12.0), at(16.0)));
        let Interval::Split(first, second) = r else {
            panic!("expected split, got {:?}", r);
        };
        assert_eq!(first.start, Point::new(10.0, 0.0));
        assert_eq!(first.end, Point::new(12.0, 0.0));
        assert_eq!(second.start, Point::new(16.0, 0.0));
        assert_eq!(second.end, Point::new(20.0, 0.0));
        assert_eq!(first.length() + (16.0 - 12.0) + second.length(), 10.0);
    }

    #[test]
    fn touching_intervals_are_not_disjoint() {
        // Inner ends exactly where outer begins. "Disjoint" needs a strict
        // gap, so the near-end trim handles it and keeps all of outer.
        let r = resolve_interval(O, (at(10.0), at(20.0)), (at(5.0), at(10.0)));
        assert_eq!(r, Interval::Single(seg(10.0, 20.0)));
    }

    #[test]
    fn equal_intervals_split_into_zero_length_pieces() {
        // Neither strict cover nor any strict overhang applies.
        let r = resolve_interval(O, (at(10.0), at(20.0)), (at(10.0), at(20.0)));
        assert_eq!(r, Interval::Split(seg(10.0, 10.0), seg(20.0, 20.0)));
    }

    #[test]
    fn lone_inner_crossing_ranks_missing_point_at_origin() {
        // The missing crossing sits at distance 0, so the inner interval
        // reads as [origin, 15]; it starts before the outer near end.
        let r = resolve_interval(O, (at(10.0), at(20.0)), (at(15.0), None));
        assert_eq!(r, Interval::Single(seg(15.0, 20.0)));

        // Same with the valid point in the second slot.
        let r = resolve_interval(O, (at(10.0), at(20.0)), (None, at(15.0)));
        assert_eq!(r, Interval::Single(seg(15.0, 20.0)));
    }

    #[test]
    fn lone_inner_crossing_past_far_end_hides_everything() {
        let r = resolve_interval(O, (at(10.0), at(20.0)), (None, at(25.0)));
        assert_eq!(r, Interval::Empty);
    }

    #[test]
    fn lone_inner_crossing_before_outer_keeps_outer() {
        let r = resolve_interval(O, (at(10.0), at(20.0)), (at(5.0), None));
        assert_eq!(r, Interval::Single(seg(10.0, 20.0)));
    }

    #[test]
    fn segments_iterate_in_ray_order() {
        let r = Interval::Split(seg(1.0, 2.0), seg(3.0, 4.0));
        let v: Vec<Segment> = r.segments().collect();
        assert_eq!(v, vec![seg(1.0, 2.0), seg(3.0, 4.0)]);
        assert_eq!(Interval::Empty.segments().count(), 0);
        assert!(Interval::Empty.is_empty());
    }
}
