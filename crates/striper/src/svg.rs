//! SVG I/O: polygons in, styled stripes out.
//!
//! Uses usvg for complete SVG resolution (CSS, shapes, etc.)
//! then walks the tree to extract path data as polygons.
//!
//! ## Curve Flattening
//!
//! SVG paths contain Bézier curves (cubic and quadratic). These must be
//! "flattened" into line segments before a ray can cross them. We use
//! lyon_geom for accurate curve approximation with a fixed tolerance.

use std::fmt;

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use thiserror::Error;
use tracing::debug;

use crate::emit::LineRenderer;
use crate::geometry::{Point, Segment, bounding_box};
use crate::shape::{Polygon, Shape};
use crate::style::{LineStyle, Rgba};

/// Error type for SVG import.
///
/// ## Rust Lesson #20: Error Handling
///
/// Rust uses `Result<T, E>` instead of exceptions. `thiserror` writes the
/// `Display` and `std::error::Error` impls from the `#[error]` attributes,
/// which is what we used to do by hand.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),
    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },
    #[error("No polygons found in SVG")]
    NoPolygons,
}

/// Extract all polygons from an SVG document.
///
/// Every closed outline becomes one polygon. A path with several subpaths
/// yields several polygons, all carrying the element's id.
///
/// ## Rust Lesson #21: The ? Operator
///
/// `expression?` is sugar for:
/// ```text
/// match expression {
///     Ok(v) => v,
///     Err(e) => return Err(e.into()),
/// }
/// ```
pub fn extract_polygons_from_svg(svg_content: &str) -> Result<Vec<Polygon>, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options).map_err(|e| SvgError::Parse(e.to_string()))?;

    let mut polygons = Vec::new();
    extract_from_group(tree.root(), &mut polygons);
    debug!(count = polygons.len(), "extracted polygons from SVG");

    if polygons.is_empty() {
        Err(SvgError::NoPolygons)
    } else {
        Ok(polygons)
    }
}

fn extract_from_group(group: &usvg::Group, polygons: &mut Vec<Polygon>) {
    for child in group.children() {
        // ## Rust Lesson #22: Pattern Matching on Enums with Data
        //
        // usvg::Node is an enum with variants that carry different data.
        // We match on the variant and destructure to get the inner data.
        match child {
            usvg::Node::Group(group) => extract_from_group(group, polygons),
            usvg::Node::Path(path) => path_to_polygons(path, polygons),
            // Ignore text, images, etc.
            _ => {}
        }
    }
}

/// Tolerance for curve flattening.
/// Lower = more points, smoother curves, slower.
const CURVE_TOLERANCE: f32 = 0.1;

/// Flatten a usvg path into polygons, one per subpath.
fn path_to_polygons(path: &usvg::Path, polygons: &mut Vec<Polygon>) {
    use usvg::tiny_skia_path::PathSegment;

    let id = (!path.id().is_empty()).then(|| path.id().to_string());
    let mut points: Vec<Point> = Vec::new();
    let mut last: Option<(f32, f32)> = None;

    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                finish_subpath(&mut points, &id, polygons);
                points.push(Point::new(p.x as f64, p.y as f64));
                last = Some((p.x, p.y));
            }
            PathSegment::LineTo(p) => {
                points.push(Point::new(p.x as f64, p.y as f64));
                last = Some((p.x, p.y));
            }
            PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        points.push(Point::new(line.to.x as f64, line.to.y as f64));
                    });
                } else {
                    points.push(Point::new(p.x as f64, p.y as f64));
                }
                last = Some((p.x, p.y));
            }
            PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        points.push(Point::new(line.to.x as f64, line.to.y as f64));
                    });
                } else {
                    points.push(Point::new(p.x as f64, p.y as f64));
                }
                last = Some((p.x, p.y));
            }
            PathSegment::Close => {}
        }
    }

    finish_subpath(&mut points, &id, polygons);
}

/// Turn the collected outline into a polygon if it has an area.
fn finish_subpath(points: &mut Vec<Point>, id: &Option<String>, polygons: &mut Vec<Polygon>) {
    // Flattening repeats points where curves meet
    points.dedup_by(|a, b| a.approx_eq(*b, 1e-6));
    if points.len() >= 2 && points[0].approx_eq(points[points.len() - 1], 1e-6) {
        points.pop();
    }

    let vertices = std::mem::take(points);
    if let Ok(polygon) = Polygon::with_id(vertices, id.clone()) {
        polygons.push(polygon);
    }
}

// ============================================================================
// VIEWBOX
// ============================================================================

/// The `viewBox` of an SVG document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self { min_x, min_y, width, height }
    }

    /// Parse `"min-x min-y width height"`, comma or space separated.
    pub fn parse(value: &str) -> Option<Self> {
        let nums: Vec<f64> = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        match nums.as_slice() {
            &[min_x, min_y, width, height] if width > 0.0 && height > 0.0 => {
                Some(Self::new(min_x, min_y, width, height))
            }
            _ => None,
        }
    }

    /// Smallest box around `points`, grown by `margin` on every side.
    pub fn around(points: &[Point], margin: f64) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = bounding_box(points)?;
        let vb = Self::new(
            min_x - margin,
            min_y - margin,
            max_x - min_x + 2.0 * margin,
            max_y - min_y + 2.0 * margin,
        );
        (vb.width > 0.0 && vb.height > 0.0).then_some(vb)
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1000.0, 1000.0)
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

/// Read the root element's `viewBox` without building a tree.
///
/// usvg folds the viewBox into its transforms, so this streams the raw XML
/// instead. Returns `Ok(None)` when the root has no usable viewBox.
pub fn read_view_box(svg_content: &str) -> Result<Option<ViewBox>, SvgError> {
    let mut reader = Reader::from_str(svg_content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() != b"svg" {
                    return Ok(None);
                }
                for attr in e.attributes().flatten() {
                    let key = attr.key.as_ref();
                    if key == b"viewBox" || key == b"viewbox" {
                        let value = std::str::from_utf8(&attr.value).unwrap_or("");
                        return Ok(ViewBox::parse(value));
                    }
                }
                return Ok(None);
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => {
                return Err(SvgError::Xml {
                    position: reader.error_position(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Draw-mode renderer that builds a standalone SVG document.
///
/// Segments are buffered in drawing order. Consecutive segments with the
/// same style share one `<g>` carrying the stroke attributes.
#[derive(Debug, Default, Clone)]
pub struct SvgRenderer {
    lines: Vec<(Segment, LineStyle)>,
    outlines: Vec<(Shape, LineStyle)>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `shape`'s outline under the stripes.
    pub fn add_outline(&mut self, shape: &Shape, style: LineStyle) {
        self.outlines.push((shape.clone(), style));
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Serialize everything drawn so far.
    pub fn to_svg(&self, view_box: &ViewBox, background: Option<Rgba>) -> String {
        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{}\" width=\"{}\" height=\"{}\">\n",
            view_box, view_box.width, view_box.height
        ));

        if let Some(bg) = background {
            svg.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                view_box.min_x,
                view_box.min_y,
                view_box.width,
                view_box.height,
                bg.to_hex_rgb()
            ));
        }

        for (shape, style) in &self.outlines {
            svg.push_str(&format!("<g {} fill=\"none\">\n", stroke_attrs(style)));
            match shape {
                Shape::Circle(c) => {
                    svg.push_str(&format!(
                        "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\"/>\n",
                        c.center.x, c.center.y, c.radius
                    ));
                }
                other => {
                    let points: String = other
                        .vertices()
                        .unwrap_or_default()
                        .iter()
                        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                        .collect::<Vec<_>>()
                        .join(" ");
                    svg.push_str(&format!("  <polygon points=\"{}\"/>\n", points));
                }
            }
            svg.push_str("</g>\n");
        }

        for run in self.lines.chunk_by(|a, b| a.1 == b.1) {
            let style = &run[0].1;
            svg.push_str(&format!("<g {} fill=\"none\">\n", stroke_attrs(style)));
            for (line, _) in run {
                svg.push_str(&format!(
                    "  <line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
                    line.start.x, line.start.y, line.end.x, line.end.y
                ));
            }
            svg.push_str("</g>\n");
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl LineRenderer for SvgRenderer {
    fn draw_line(&mut self, segment: &Segment, style: &LineStyle) {
        self.lines.push((*segment, *style));
    }
}

fn stroke_attrs(style: &LineStyle) -> String {
    let mut attrs = format!(
        "stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"{}\"",
        style.color.to_hex_rgb(),
        style.thickness,
        style.cap.svg_linecap()
    );
    if style.color.a < 255 {
        attrs.push_str(&format!(" stroke-opacity=\"{:.3}\"", style.color.opacity()));
    }
    attrs
}

// ============================================================================
// TESTS
// ============================================================================
