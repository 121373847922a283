//! Output side of the stripe engine: collect segments or draw them.

use serde::{Deserialize, Serialize};

use crate::geometry::Segment;
use crate::style::LineStyle;

/// Receives resolved segments in sampling order.
pub trait StripeSink {
    /// One visible segment of sampling ray `ray_index`.
    fn emit(&mut self, ray_index: usize, segment: Segment);

    /// Called after every sampling ray with the number of segments it produced.
    fn end_line(&mut self, _ray_index: usize, _produced: usize) {}
}

/// Generate mode: just keep the geometry.
impl StripeSink for Vec<Segment> {
    fn emit(&mut self, _ray_index: usize, segment: Segment) {
        self.push(segment);
    }
}

/// The rendering primitive draw mode hands segments to.
pub trait LineRenderer {
    fn draw_line(&mut self, segment: &Segment, style: &LineStyle);
}

/// Which counter picks the style when several are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleCycle {
    /// Counts only sampling rays that produced at least one segment, so the
    /// visible stripes alternate cleanly even where rays miss the shape.
    #[default]
    PerEmittingLine,
    /// Uses the sampling ray index, counting rays that produced nothing.
    /// Styles stay pinned to positions in the sweep.
    PerSampleLine,
}

/// Draw-mode sink: picks `styles[index % styles.len()]` for each segment.
pub struct StyledEmitter<'a, R: LineRenderer + ?Sized> {
    renderer: &'a mut R,
    styles: &'a [LineStyle],
    cycle: StyleCycle,
    emitting_lines: usize,
}

impl<'a, R: LineRenderer + ?Sized> StyledEmitter<'a, R> {
    pub fn new(renderer: &'a mut R, styles: &'a [LineStyle], cycle: StyleCycle) -> Self {
        Self { renderer, styles, cycle, emitting_lines: 0 }
    }

    fn style_for(&self, ray_index: usize) -> Option<&'a LineStyle> {
        if self.styles.is_empty() {
            return None;
        }
        let index = match self.cycle {
            StyleCycle::PerEmittingLine => self.emitting_lines,
            StyleCycle::PerSampleLine => ray_index,
        };
        self.styles.get(index % self.styles.len())
    }
}

impl<R: LineRenderer + ?Sized> StripeSink for StyledEmitter<'_, R> {
    fn emit(&mut self, ray_index: usize, segment: Segment) {
        if let Some(style) = self.style_for(ray_index) {
            self.renderer.draw_line(&segment, style);
        }
    }

    fn end_line(&mut self, _ray_index: usize, produced: usize) {
        if produced > 0 {
            self.emitting_lines += 1;
        }
    }
}

/// Renderer that records every call. Handy for tests and previews.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub lines: Vec<(Segment, LineStyle)>,
}

impl LineRenderer for RecordingRenderer {
    fn draw_line(&mut self, segment: &Segment, style: &LineStyle) {
        self.lines.push((*segment, *style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::style::Rgba;

    fn seg(y: f64) -> Segment {
        Segment::new(Point::new(0.0, y), Point::new(1.0, y))
    }

    fn styles() -> [LineStyle; 2] {
        [LineStyle::new(1.0, Rgba::BLACK), LineStyle::new(2.0, Rgba::WHITE)]
    }

    /// Rays 0 and 2 produce segments, ray 1 produces nothing.
    fn feed(sink: &mut dyn StripeSink) {
        sink.emit(0, seg(0.0));
        sink.end_line(0, 1);
        sink.end_line(1, 0);
        sink.emit(2, seg(2.0));
        sink.emit(2, seg(2.5));
        sink.end_line(2, 2);
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut out: Vec<Segment> = Vec::new();
        feed(&mut out);
        assert_eq!(out, vec![seg(0.0), seg(2.0), seg(2.5)]);
    }

    #[test]
    fn per_emitting_line_skips_empty_rays() {
        let mut renderer = RecordingRenderer::default();
        let styles = styles();
        let mut emitter = StyledEmitter::new(&mut renderer, &styles, StyleCycle::PerEmittingLine);
        feed(&mut emitter);
        let widths: Vec<f64> = renderer.lines.iter().map(|(_, s)| s.thickness).collect();
        // Second emitting ray gets the second style; both of its segments share it.
        assert_eq!(widths, vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn per_sample_line_counts_every_ray() {
        let mut renderer = RecordingRenderer::default();
        let styles = styles();
        let mut emitter = StyledEmitter::new(&mut renderer, &styles, StyleCycle::PerSampleLine);
        feed(&mut emitter);
        let widths: Vec<f64> = renderer.lines.iter().map(|(_, s)| s.thickness).collect();
        // Ray 2 wraps back to the first style.
        assert_eq!(widths, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn no_styles_draws_nothing() {
        let mut renderer = RecordingRenderer::default();
        let mut emitter = StyledEmitter::new(&mut renderer, &[], StyleCycle::PerEmittingLine);
        feed(&mut emitter);
        assert!(renderer.lines.is_empty());
    }
}
