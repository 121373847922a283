//! Sampling ray generation for stripe fills.
//!
//! Produces the parallel rays that get clipped against the outer and inner
//! boundaries. Stripes run along the configured angle. Successive rays step
//! along the normal, starting at one edge of the shape's extent.

use tracing::debug;

use crate::curve::SpacingCurve;
use crate::geometry::Point;
use crate::shape::Boundary;

/// How far apart consecutive stripes are.
#[derive(Clone, Copy)]
pub enum Spacing<'c> {
    Fixed(f64),
    /// Spacing resampled after every stripe at `traveled / max_dimension`.
    Curve(&'c dyn SpacingCurve),
}

/// Configuration for a stripe run.
#[derive(Clone, Copy)]
pub struct StripeConfig<'c> {
    pub spacing: Spacing<'c>,
    /// Stripe direction in degrees, counter-clockwise from +x
    pub angle_degrees: f64,
    /// Normalized shift of the pattern start, wrapped into [0, 1)
    pub phase_offset: f64,
}

impl<'c> StripeConfig<'c> {
    pub fn fixed(spacing: f64, angle_degrees: f64) -> Self {
        Self { spacing: Spacing::Fixed(spacing), angle_degrees, phase_offset: 0.0 }
    }

    pub fn curve(curve: &'c dyn SpacingCurve, angle_degrees: f64) -> Self {
        Self { spacing: Spacing::Curve(curve), angle_degrees, phase_offset: 0.0 }
    }

    pub fn with_phase(mut self, phase_offset: f64) -> Self {
        self.phase_offset = phase_offset;
        self
    }

    /// Same config rotated by `delta_degrees`.
    pub fn rotated(mut self, delta_degrees: f64) -> Self {
        self.angle_degrees += delta_degrees;
        self
    }
}

/// Why a sampling run ended.
///
/// Everything except `Exhausted` is an early exit, and the run's output is
/// whatever was produced before it. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every ray across the extent was produced.
    Exhausted,
    /// The outer shape has no usable extent.
    DegenerateShape,
    /// Fixed spacing was zero, negative or not finite.
    InvalidSpacing,
    /// Fixed spacing is larger than the shape, so no stripe fits.
    SpacingExceedsExtent,
    /// The spacing curve has no keys.
    UnkeyedCurve,
    /// The spacing curve returned nothing or a value <= 0.
    NonPositiveCurveSample,
}

impl StopReason {
    pub fn is_early(self) -> bool {
        self != StopReason::Exhausted
    }
}

/// One sampling ray: it starts outside the shape and travels across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRay {
    /// Position in the sampling sequence, starting at 0
    pub index: usize,
    pub origin: Point,
    pub direction: Point,
}

/// Wrap a phase offset into [0, 1). Non-finite input becomes 0.
pub fn wrap_phase(phase: f64) -> f64 {
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = phase.rem_euclid(1.0);
    // rem_euclid rounds tiny negatives up to exactly 1.0
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

#[derive(Clone, Copy)]
enum Mode<'c> {
    Fixed { spacing: f64, steps: usize },
    Curve { curve: &'c dyn SpacingCurve, traveled: f64, next_spacing: f64 },
    /// Emit nothing more, then report the reason.
    Stopping(StopReason),
    Done,
}

/// Iterator over the sampling rays of one stripe run.
///
/// ## Rust Lesson #26: Iterators
///
/// Implementing `Iterator` means writing one method, `next()`. Everything
/// else (`map`, `take`, `collect`, `for` loops) comes for free. The sampler
/// is lazy: a ray is computed only when the caller asks for it.
///
/// The sampler is `Clone`, so cloning one before iterating gives a fresh
/// copy of the same sequence.
#[derive(Clone)]
pub struct LineSampler<'c> {
    dir: Point,
    normal: Point,
    start: Point,
    max_dimension: f64,
    phase: f64,
    mode: Mode<'c>,
    index: usize,
    stop: Option<StopReason>,
}

impl<'c> LineSampler<'c> {
    /// Sampler sweeping across `outer` with the given configuration.
    pub fn new<B: Boundary + ?Sized>(outer: &B, config: &StripeConfig<'c>) -> Self {
        Self::from_extent(outer.center(), outer.max_dimension(), config)
    }

    /// Sampler sweeping a disc of diameter `max_dimension` around `center`.
    pub fn from_extent(center: Point, max_dimension: f64, config: &StripeConfig<'c>) -> Self {
        let dir = Point::from_angle_degrees(config.angle_degrees);
        let normal = dir.perp();
        let phase = wrap_phase(config.phase_offset);

        let mut sampler = Self {
            dir,
            normal,
            start: center - normal * (max_dimension / 2.0),
            max_dimension,
            phase,
            mode: Mode::Done,
            index: 0,
            stop: None,
        };

        sampler.mode = match sampler.initial_mode(config.spacing) {
            Ok(mode) => mode,
            Err(reason) => {
                debug!(?reason, max_dimension, "stripe sampling skipped");
                Mode::Stopping(reason)
            }
        };
        sampler
    }

    fn initial_mode(&self, spacing: Spacing<'c>) -> Result<Mode<'c>, StopReason> {
        if !(self.max_dimension.is_finite() && self.max_dimension > 0.0) || !self.start.is_finite() {
            return Err(StopReason::DegenerateShape);
        }

        match spacing {
            Spacing::Fixed(spacing) => {
                if !(spacing.is_finite() && spacing > 0.0) {
                    return Err(StopReason::InvalidSpacing);
                }
                if spacing > self.max_dimension {
                    return Err(StopReason::SpacingExceedsExtent);
                }
                let steps = ((self.max_dimension + self.phase * spacing) / spacing).floor() as usize;
                Ok(Mode::Fixed { spacing, steps })
            }
            Spacing::Curve(curve) => {
                if !curve.has_keys() {
                    return Err(StopReason::UnkeyedCurve);
                }
                let first = positive_sample(curve, 0.0).ok_or(StopReason::NonPositiveCurveSample)?;
                Ok(Mode::Curve {
                    curve,
                    traveled: -self.phase * first,
                    next_spacing: first,
                })
            }
        }
    }

    /// Why the run ended. `None` while rays remain.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Extent the sampler covers.
    pub fn max_dimension(&self) -> f64 {
        self.max_dimension
    }

    /// Ray whose stripe sits `offset` along the normal from the start edge.
    ///
    /// The origin is pulled back by a full `max_dimension` against the stripe
    /// direction, which puts it outside the shape's bounding disc, so every
    /// crossing lies ahead of it.
    fn ray_at(&self, index: usize, offset: f64) -> SampleRay {
        let on_line = self.start + self.normal * offset;
        SampleRay {
            index,
            origin: on_line - self.dir * self.max_dimension,
            direction: self.dir,
        }
    }

    fn finish(&mut self, reason: StopReason) -> Option<SampleRay> {
        if reason.is_early() {
            debug!(?reason, rays = self.index, "stripe sampling stopped early");
        }
        self.stop = Some(reason);
        self.mode = Mode::Done;
        None
    }
}

fn positive_sample(curve: &dyn SpacingCurve, t: f64) -> Option<f64> {
    curve.sample(t).filter(|s| s.is_finite() && *s > 0.0)
}

impl Iterator for LineSampler<'_> {
    type Item = SampleRay;

    fn next(&mut self) -> Option<SampleRay> {
        match self.mode {
            Mode::Done => None,
            Mode::Stopping(reason) => self.finish(reason),
            Mode::Fixed { spacing, steps } => {
                if self.index >= steps {
                    return self.finish(StopReason::Exhausted);
                }
                let index = self.index;
                self.index += 1;
                let offset = self.index as f64 * spacing - self.phase * spacing;
                Some(self.ray_at(index, offset))
            }
            Mode::Curve { curve, traveled, next_spacing } => {
                let traveled = traveled + next_spacing;
                if traveled >= self.max_dimension {
                    return self.finish(StopReason::Exhausted);
                }
                let index = self.index;
                self.index += 1;
                let ray = self.ray_at(index, traveled);

                let t = (traveled / self.max_dimension).clamp(0.0, 1.0);
                self.mode = match positive_sample(curve, t) {
                    Some(next_spacing) => Mode::Curve { curve, traveled, next_spacing },
                    None => Mode::Stopping(StopReason::NonPositiveCurveSample),
                };
                Some(ray)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.mode {
            Mode::Fixed { steps, .. } => {
                let left = steps.saturating_sub(self.index);
                (left, Some(left))
            }
            Mode::Curve { .. } => (0, None),
            Mode::Stopping(_) | Mode::Done => (0, Some(0)),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
