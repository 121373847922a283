//! # striper
//!
//! Stripe fills clipped to 2D shapes: parallel lines inside an outer shape,
//! with an optional inner shape cut out.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.
//!
//! The pipeline reads top to bottom: `sampler` casts rays, `shape` and
//! `intersect` find where they cross the boundaries, `resolve` and `reduce`
//! turn crossings into visible segments, `emit` delivers them.

pub mod curve;
pub mod emit;
pub mod geometry;
pub mod intersect;
pub mod reduce;
pub mod resolve;
pub mod sampler;
pub mod shape;
pub mod stripes;
pub mod style;
pub mod svg;

// Re-export common types at crate root for convenience.
pub use curve::{CurveKey, KeyedCurve, SpacingCurve};
pub use emit::{LineRenderer, RecordingRenderer, StripeSink, StyleCycle, StyledEmitter};
pub use geometry::{Point, Segment};
pub use sampler::{LineSampler, SampleRay, Spacing, StopReason, StripeConfig};
pub use shape::{Boundary, Circle, Polygon, Quad, Rect, Shape, ShapeError, Triangle};
pub use stripes::{
    StripeSummary, draw_alternating_stripes, draw_alternating_stripes_excluding, draw_stripes,
    draw_stripes_excluding, generate_crosshatch, generate_crosshatch_excluding, generate_stripes,
    generate_stripes_excluding, stripe_into,
};
pub use style::{CapType, LineStyle, Rgba, StyleError};
pub use svg::{SvgError, SvgRenderer, ViewBox, extract_polygons_from_svg, read_view_box};
