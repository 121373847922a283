//! Ray intersection routines for the boundary shapes.
//!
//! This is the HOT PATH - every sampling ray hits these once per shape.
//! Everything here works on borrowed slices and pushes into caller-owned
//! buffers, so a whole stripe run allocates one scratch `Vec`.

use crate::geometry::Point;

/// Tolerance for treating an edge as parallel to the ray.
const PARALLEL_EPSILON: f64 = 1e-10;

/// Two crossings closer than this are the same crossing (shared vertex).
pub const DEDUP_EPSILON: f64 = 1e-9;

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================

/// Test if a point is inside a polygon using ray casting.
///
/// Casts a ray to the right and counts edge crossings.
/// Odd crossings = inside, even = outside.
#[inline]
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > p.y) != (yj > p.y)) && (p.x < (xj - xi) * (p.y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }

        j = i;
    }

    inside
}

// ============================================================================
// RAY-EDGE INTERSECTION
// ============================================================================

/// Result of a ray/edge intersection test.
///
/// ## Rust Lesson #10: Enums (Sum Types)
///
/// Rust enums can carry data, so "no hit" and "hit at t" are one type and
/// the compiler makes every caller handle both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    None,
    Point { point: Point, t: f64 },
}

/// Intersect the ray `origin + t * direction` (t >= 0) with the edge `a..b`.
///
/// `t` is in units of `direction`, so it orders hits along the ray.
#[inline]
pub fn ray_segment_intersection(origin: Point, direction: Point, a: Point, b: Point) -> Intersection {
    let edge = b - a;
    let denom = direction.cross(edge);

    // Parallel or coincident
    if denom.abs() < PARALLEL_EPSILON {
        return Intersection::None;
    }

    let w = a - origin;
    let t = w.cross(edge) / denom;
    let u = w.cross(direction) / denom;

    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Intersection::Point { point: origin + direction * t, t }
    } else {
        Intersection::None
    }
}

/// Push every crossing of the ray with the closed polygon outline into `hits`.
///
/// A ray through a vertex meets both adjacent edges at the same spot; those
/// duplicates are collapsed. Hits are left in edge order. Returns the number
/// of points pushed.
pub fn ray_polygon_crossings(
    origin: Point,
    direction: Point,
    polygon: &[Point],
    hits: &mut Vec<Point>,
) -> usize {
    let n = polygon.len();
    if n < 3 {
        return 0;
    }

    let first = hits.len();
    for i in 0..n {
        let j = (i + 1) % n;
        if let Intersection::Point { point, .. } =
            ray_segment_intersection(origin, direction, polygon[i], polygon[j])
        {
            let duplicate = hits[first..]
                .iter()
                .any(|h| h.approx_eq(point, DEDUP_EPSILON));
            if !duplicate {
                hits.push(point);
            }
        }
    }

    hits.len() - first
}

/// First and last crossing of a ray with a convex outline.
///
/// Convex outlines have at most two distinct crossings. When only one exists
/// (the ray starts inside, or grazes a vertex) the second slot is `None`.
pub fn ray_convex_crossings(
    origin: Point,
    direction: Point,
    polygon: &[Point],
) -> (Option<Point>, Option<Point>) {
    let mut nearest: Option<(f64, Point)> = None;
    let mut furthest: Option<(f64, Point)> = None;

    let n = polygon.len();
    if n < 3 {
        return (None, None);
    }

    for i in 0..n {
        let j = (i + 1) % n;
        if let Intersection::Point { point, t } =
            ray_segment_intersection(origin, direction, polygon[i], polygon[j])
        {
            if nearest.is_none_or(|(nt, _)| t < nt) {
                nearest = Some((t, point));
            }
            if furthest.is_none_or(|(ft, _)| t > ft) {
                furthest = Some((t, point));
            }
        }
    }

    match (nearest, furthest) {
        (Some((_, a)), Some((_, b))) if a.approx_eq(b, DEDUP_EPSILON) => (Some(a), None),
        (a, b) => (a.map(|(_, p)| p), b.map(|(_, p)| p)),
    }
}

/// Crossings of a ray with a circle, nearest first.
///
/// Tangent rays (zero discriminant) count as a miss: they touch the circle at
/// a single point and would produce a zero-length stripe.
pub fn ray_circle_crossings(
    origin: Point,
    direction: Point,
    center: Point,
    radius: f64,
) -> (Option<Point>, Option<Point>) {
    let a = direction.length_squared();
    if a == 0.0 {
        return (None, None);
    }

    let f = origin - center;
    let b = 2.0 * f.dot(direction);
    let c = f.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;

    if disc <= 0.0 {
        return (None, None);
    }

    let root = disc.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);

    let hit = |t: f64| (t >= 0.0).then(|| origin + direction * t);
    match (hit(t1), hit(t2)) {
        (None, second) => (second, None),
        pair => pair,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    /// A "U" shape: a horizontal ray through the arms crosses it four times.
    fn u_shape() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(20.0, 30.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 30.0),
            Point::new(0.0, 30.0),
        ]
    }

    #[test]
    fn point_inside_square() {
        let sq = square();
        assert!(point_in_polygon(Point::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(-1.0, 5.0), &sq));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert!(!point_in_polygon(Point::new(0.5, 0.5), &line));
    }

    #[test]
    fn ray_hits_edge() {
        let hit = ray_segment_intersection(
            Point::new(-5.0, 5.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
        );
        match hit {
            Intersection::Point { point, t } => {
                assert_abs_diff_eq!(point.x, 0.0, epsilon = 1e-12);
                assert_abs_diff_eq!(point.y, 5.0, epsilon = 1e-12);
                assert_abs_diff_eq!(t, 5.0, epsilon = 1e-12);
            }
            Intersection::None => panic!("Expected intersection"),
        }
    }

    #[test]
    fn ray_ignores_edges_behind_origin() {
        let hit = ray_segment_intersection(
            Point::new(5.0, 5.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
        );
        assert_eq!(hit, Intersection::None);
    }

    #[test]
    fn parallel_edge_is_a_miss() {
        let hit = ray_segment_intersection(
            Point::new(0.0, 5.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert_eq!(hit, Intersection::None);
    }

    #[test]
    fn convex_crossings_ordered_by_travel() {
        let (a, b) = ray_convex_crossings(Point::new(-5.0, 5.0), Point::new(1.0, 0.0), &square());
        assert!(a.unwrap().approx_eq(Point::new(0.0, 5.0), 1e-12));
        assert!(b.unwrap().approx_eq(Point::new(10.0, 5.0), 1e-12));
    }

    #[test]
    fn vertex_graze_yields_one_crossing() {
        // Ray along y = x - 10 touches only the (10, 0) corner.
        let (a, b) = ray_convex_crossings(Point::new(0.0, -10.0), Point::new(1.0, 1.0), &square());
        assert!(a.unwrap().approx_eq(Point::new(10.0, 0.0), 1e-9));
        assert_eq!(b, None);
    }

    #[test]
    fn concave_polygon_yields_four_crossings() {
        let mut hits = Vec::new();
        let count = ray_polygon_crossings(Point::new(-5.0, 20.0), Point::new(1.0, 0.0), &u_shape(), &mut hits);
        assert_eq!(count, 4);
        let mut xs: Vec<f64> = hits.iter().map(|p| p.x).collect();
        xs.sort_by(f64::total_cmp);
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn crossings_through_vertex_are_deduplicated() {
        let mut hits = Vec::new();
        // Diagonal through the (0,0) and (10,10) corners.
        let count = ray_polygon_crossings(Point::new(-5.0, -5.0), Point::new(1.0, 1.0), &square(), &mut hits);
        assert_eq!(count, 2);
    }

    #[test]
    fn crossings_append_after_existing_hits() {
        let mut hits = vec![Point::new(99.0, 99.0)];
        let count = ray_polygon_crossings(Point::new(-5.0, 5.0), Point::new(1.0, 0.0), &square(), &mut hits);
        assert_eq!(count, 2);
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn circle_chord() {
        let (a, b) = ray_circle_crossings(Point::new(-20.0, 0.0), Point::new(1.0, 0.0), Point::ZERO, 10.0);
        assert!(a.unwrap().approx_eq(Point::new(-10.0, 0.0), 1e-12));
        assert!(b.unwrap().approx_eq(Point::new(10.0, 0.0), 1e-12));
    }

    #[test]
    fn circle_tangent_is_a_miss() {
        let (a, b) = ray_circle_crossings(Point::new(-20.0, 10.0), Point::new(1.0, 0.0), Point::ZERO, 10.0);
        assert_eq!((a, b), (None, None));
    }

    #[test]
    fn circle_from_inside_has_one_crossing() {
        let (a, b) = ray_circle_crossings(Point::ZERO, Point::new(1.0, 0.0), Point::ZERO, 10.0);
        assert!(a.unwrap().approx_eq(Point::new(10.0, 0.0), 1e-12));
        assert_eq!(b, None);
    }
}
