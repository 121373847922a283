//! Point set reduction for boundaries that cross a ray more than twice.
//!
//! Polygons can enter and leave the ray any number of times, so the two-point
//! interval subtraction does not apply. Instead every crossing that bounds
//! visible stripe is collected, sorted along the ray, and paired up.

use tracing::trace;

use crate::geometry::{Point, Segment};
use crate::intersect::DEDUP_EPSILON;
use crate::shape::Boundary;

/// Reduce the crossings of one ray to visible segments.
///
/// * inner crossings survive only if they lie inside `outer`;
/// * outer crossings survive only if they lie outside `inner`;
/// * two survivors form one segment as gathered;
/// * more are sorted by distance from `origin` and paired `(0,1), (2,3), ...`.
///
/// "Inside" is judged on the ray next to the crossing, not at the crossing
/// itself: a crossing survives when the ray is visible on exactly one side of
/// it. Points on both boundaries (a shared edge) are therefore classified the
/// same way as any other crossing, and a crossing both shapes report is
/// merged into one first.
///
/// An odd survivor count means a tangent or vertex graze. The unpaired
/// furthest point is dropped.
///
/// `points` is scratch space. It is cleared on entry. Returns the number of
/// segments passed to `emit`.
pub fn reduce_point_set(
    origin: Point,
    direction: Point,
    outer: &dyn Boundary,
    inner: Option<&dyn Boundary>,
    points: &mut Vec<Point>,
    mut emit: impl FnMut(Segment),
) -> usize {
    points.clear();

    let length = direction.length_squared().sqrt();
    if !(length.is_finite() && length > 0.0) {
        return 0;
    }
    let unit = direction * (1.0 / length);

    if let Some(inner) = inner {
        inner.intersect_many(origin, direction, points);
    }
    let inner_count = points.len();
    outer.intersect_many(origin, direction, points);
    merge_shared(points, inner_count);

    if points.len() < 2 {
        return 0;
    }

    let visible = |p: Point| outer.contains_point(p) && inner.is_none_or(|b| !b.contains_point(p));

    // Survivors are appended behind the candidates, then the candidates go.
    let candidates = points.len();
    for i in 0..candidates {
        let keep = separates(points[i], &points[..candidates], origin, unit, &visible);
        if keep {
            let p = points[i];
            points.push(p);
        }
    }
    points.drain(..candidates);

    match points.len() {
        0 | 1 => 0,
        2 => {
            emit(Segment::new(points[0], points[1]));
            1
        }
        count => {
            points.sort_by(|a, b| a.distance_squared(origin).total_cmp(&b.distance_squared(origin)));
            if count % 2 == 1 {
                trace!(count, "odd crossing count, dropping furthest point");
            }
            let mut emitted = 0;
            for pair in points.chunks_exact(2) {
                emit(Segment::new(pair[0], pair[1]));
                emitted += 1;
            }
            emitted
        }
    }
}

/// Drop outer crossings (from `inner_count` on) that repeat an inner one.
fn merge_shared(points: &mut Vec<Point>, inner_count: usize) {
    let eps2 = DEDUP_EPSILON * DEDUP_EPSILON;
    let mut i = inner_count;
    while i < points.len() {
        let p = points[i];
        if points[..inner_count].iter().any(|q| q.distance_squared(p) <= eps2) {
            points.remove(i);
        } else {
            i += 1;
        }
    }
}

/// True when visibility along the ray differs on the two sides of `p`.
///
/// Both test points stay closer to `p` than any other candidate, so each sees
/// the open stretch of ray next to `p`.
fn separates(p: Point, all: &[Point], origin: Point, unit: Point, visible: &impl Fn(Point) -> bool) -> bool {
    let t = (p - origin).dot(unit);
    let gap = all
        .iter()
        .map(|q| ((*q - origin).dot(unit) - t).abs())
        .filter(|d| *d > DEDUP_EPSILON)
        .fold(f64::INFINITY, f64::min);
    if !gap.is_finite() {
        return false;
    }
    let step = unit * (gap * 0.5);
    visible(p - step) != visible(p + step)
}

// ============================================================================
// TESTS
// ============================================================================
