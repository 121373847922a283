//! Stripe generation and drawing.
//!
//! This is the main entry point. Every public function funnels into
//! [`stripe_into`], which walks the sampler, clips each ray against the outer
//! and inner boundaries and hands the visible pieces to a sink.

use tracing::trace;

use crate::emit::{LineRenderer, StripeSink, StyleCycle, StyledEmitter};
use crate::geometry::Segment;
use crate::reduce::reduce_point_set;
use crate::resolve::resolve_interval;
use crate::sampler::{LineSampler, StopReason, StripeConfig};
use crate::shape::Boundary;
use crate::style::LineStyle;

/// What one stripe run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripeSummary {
    /// Sampling rays cast
    pub lines_sampled: usize,
    /// Rays that produced at least one segment
    pub lines_emitting: usize,
    /// Segments handed to the sink
    pub segments: usize,
    pub stop: StopReason,
}

/// Clip every sampling ray of `config` against `outer` minus `inner` and
/// feed the visible segments to `sink`.
///
/// Two-crossing shapes go through the interval resolver. As soon as either
/// boundary can cross a ray more than twice, the point set reducer takes
/// over for the whole run.
pub fn stripe_into(
    outer: &dyn Boundary,
    inner: Option<&dyn Boundary>,
    config: &StripeConfig<'_>,
    sink: &mut dyn StripeSink,
) -> StripeSummary {
    let mut sampler = LineSampler::new(outer, config);
    let many = outer.yields_many() || inner.is_some_and(|b| b.yields_many());

    // Owned by this call, cleared per ray.
    let mut scratch = Vec::new();

    let mut lines_sampled = 0;
    let mut lines_emitting = 0;
    let mut segments = 0;

    for ray in sampler.by_ref() {
        let produced = if many {
            reduce_point_set(ray.origin, ray.direction, outer, inner, &mut scratch, |s| {
                sink.emit(ray.index, s)
            })
        } else {
            let outer_hits = outer.intersect(ray.origin, ray.direction);
            let inner_hits = inner.map_or((None, None), |b| b.intersect(ray.origin, ray.direction));
            let interval = resolve_interval(ray.origin, outer_hits, inner_hits);
            let produced = interval.len();
            for segment in interval.segments() {
                sink.emit(ray.index, segment);
            }
            produced
        };
        sink.end_line(ray.index, produced);

        lines_sampled += 1;
        segments += produced;
        if produced > 0 {
            lines_emitting += 1;
        }
    }

    let summary = StripeSummary {
        lines_sampled,
        lines_emitting,
        segments,
        stop: sampler.stop_reason().unwrap_or(StopReason::Exhausted),
    };
    trace!(?summary, many, "stripe run finished");
    summary
}

// ============================================================================
// GENERATE MODE
// ============================================================================

/// Stripes clipped to `outer`.
pub fn generate_stripes(outer: &dyn Boundary, config: &StripeConfig<'_>) -> Vec<Segment> {
    let mut segments = Vec::new();
    stripe_into(outer, None, config, &mut segments);
    segments
}

/// Stripes clipped to `outer`, with the interior of `inner` left empty.
pub fn generate_stripes_excluding(
    outer: &dyn Boundary,
    inner: &dyn Boundary,
    config: &StripeConfig<'_>,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    stripe_into(outer, Some(inner), config, &mut segments);
    segments
}

/// Crosshatch: stripes at the configured angle plus a perpendicular set.
pub fn generate_crosshatch(outer: &dyn Boundary, config: &StripeConfig<'_>) -> Vec<Segment> {
    let mut segments = generate_stripes(outer, config);
    segments.extend(generate_stripes(outer, &config.rotated(90.0)));
    segments
}

/// Crosshatch with the interior of `inner` left empty.
pub fn generate_crosshatch_excluding(
    outer: &dyn Boundary,
    inner: &dyn Boundary,
    config: &StripeConfig<'_>,
) -> Vec<Segment> {
    let mut segments = generate_stripes_excluding(outer, inner, config);
    segments.extend(generate_stripes_excluding(outer, inner, &config.rotated(90.0)));
    segments
}

// ============================================================================
// DRAW MODE
// ============================================================================

/// Draw stripes clipped to `outer`, cycling through `styles`.
pub fn draw_stripes<R: LineRenderer + ?Sized>(
    outer: &dyn Boundary,
    config: &StripeConfig<'_>,
    styles: &[LineStyle],
    cycle: StyleCycle,
    renderer: &mut R,
) -> StripeSummary {
    let mut emitter = StyledEmitter::new(renderer, styles, cycle);
    stripe_into(outer, None, config, &mut emitter)
}

/// Draw stripes clipped to `outer` minus `inner`, cycling through `styles`.
pub fn draw_stripes_excluding<R: LineRenderer + ?Sized>(
    outer: &dyn Boundary,
    inner: &dyn Boundary,
    config: &StripeConfig<'_>,
    styles: &[LineStyle],
    cycle: StyleCycle,
    renderer: &mut R,
) -> StripeSummary {
    let mut emitter = StyledEmitter::new(renderer, styles, cycle);
    stripe_into(outer, Some(inner), config, &mut emitter)
}

/// Draw stripes alternating between two styles by sampling position.
///
/// Rays that miss the shape still advance the alternation, so the pattern
/// stays anchored to the sweep rather than to the visible stripes.
pub fn draw_alternating_stripes<R: LineRenderer + ?Sized>(
    outer: &dyn Boundary,
    config: &StripeConfig<'_>,
    styles: [LineStyle; 2],
    renderer: &mut R,
) -> StripeSummary {
    draw_stripes(outer, config, &styles, StyleCycle::PerSampleLine, renderer)
}

/// [`draw_alternating_stripes`] with the interior of `inner` left empty.
pub fn draw_alternating_stripes_excluding<R: LineRenderer + ?Sized>(
    outer: &dyn Boundary,
    inner: &dyn Boundary,
    config: &StripeConfig<'_>,
    styles: [LineStyle; 2],
    renderer: &mut R,
) -> StripeSummary {
    draw_stripes_excluding(outer, inner, config, &styles, StyleCycle::PerSampleLine, renderer)
}

// ============================================================================
// TESTS
// ============================================================================
