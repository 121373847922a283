//! Stripe recipes: declarative layer composition.
//!
//! A recipe is a YAML or JSON file listing stripe layers. Each layer names an
//! outer shape (inline or a polygon from an SVG file), an optional inner
//! shape to leave empty, and the spacing, angle, phase and styles of its
//! stripes. Layers render bottom to top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use striper::{
    Boundary, CapType, KeyedCurve, LineRenderer, LineStyle, Rgba, Segment, Shape, StripeConfig, StripeSummary,
    StyleCycle, StyleError, SvgRenderer, ViewBox, draw_stripes, draw_stripes_excluding, extract_polygons_from_svg,
    stripe_into,
};

use super::common::{CliError, combine_summaries};

/// A complete recipe defining a layered stripe composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name/title
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub canvas: Canvas,

    /// Default style applied to all layers (can be overridden)
    #[serde(default)]
    pub defaults: LayerStyle,

    /// Ordered list of stripe layers (rendered bottom to top)
    pub layers: Vec<Layer>,
}

/// Canvas/output configuration, in user units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,

    /// Background color (default: white)
    #[serde(default = "default_background")]
    pub background: String,

    /// Draw every layer's shape outlines under its stripes
    #[serde(default)]
    pub outlines: bool,
}

fn default_background() -> String {
    "white".to_string()
}

/// Where a layer's boundary comes from.
///
/// ## Rust Lesson #27: Untagged Enums
///
/// `#[serde(untagged)]` tries each variant in order and keeps the first one
/// that fits, so `{svg: art.svg}` and `{kind: circle, ...}` both parse into
/// the same field without a discriminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeSource {
    /// A polygon from an SVG file, picked by element id or by position.
    Svg {
        svg: PathBuf,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        index: usize,
    },
    Inline(Shape),
}

/// Stripe spacing: a plain number or a keyed curve over travel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpacingSpec {
    Fixed(f64),
    Curve { curve: KeyedCurve },
}

impl Default for SpacingSpec {
    fn default() -> Self {
        SpacingSpec::Fixed(5.0)
    }
}

/// A single stripe layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name (for identification)
    pub name: String,

    pub outer: ShapeSource,

    /// Region inside `outer` left without stripes
    #[serde(default)]
    pub inner: Option<ShapeSource>,

    #[serde(default)]
    pub spacing: SpacingSpec,

    /// Stripe angle (degrees)
    #[serde(default)]
    pub angle: f64,

    /// Pattern shift as a fraction of the first spacing
    #[serde(default)]
    pub phase: f64,

    /// Styles cycled across stripes; each is merged with the recipe defaults.
    /// Empty means the defaults alone.
    #[serde(default)]
    pub styles: Vec<LayerStyle>,

    #[serde(default)]
    pub cycle: StyleCycle,

    /// Add a perpendicular second pass
    #[serde(default)]
    pub crosshatch: bool,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Style properties for a layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    /// Stroke color, any SVG color string
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub stroke_width: Option<f64>,

    /// Opacity (0.0 to 1.0), multiplied into the color's alpha
    #[serde(default)]
    pub opacity: Option<f64>,

    #[serde(default)]
    pub cap: Option<CapType>,

    #[serde(default)]
    pub cap_points: Option<u32>,
}

impl LayerStyle {
    /// Merge this style with defaults, preferring self's values.
    pub fn merge_with(&self, defaults: &LayerStyle) -> LayerStyle {
        LayerStyle {
            color: self.color.clone().or_else(|| defaults.color.clone()),
            stroke_width: self.stroke_width.or(defaults.stroke_width),
            opacity: self.opacity.or(defaults.opacity),
            cap: self.cap.or(defaults.cap),
            cap_points: self.cap_points.or(defaults.cap_points),
        }
    }

    /// Resolve into a concrete line style, filling gaps from `LineStyle::default()`.
    pub fn to_line_style(&self) -> Result<LineStyle, StyleError> {
        let base = LineStyle::default();
        let mut color = match &self.color {
            Some(c) => c.parse::<Rgba>()?,
            None => base.color,
        };
        if let Some(opacity) = self.opacity {
            color.a = (color.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        }
        Ok(LineStyle {
            thickness: self.stroke_width.unwrap_or(base.thickness),
            color,
            cap: self.cap.unwrap_or(base.cap),
            cap_points: self.cap_points.unwrap_or(base.cap_points),
        })
    }
}

/// One rendered layer: its stripes and what the run reported.
#[derive(Debug)]
pub struct RenderedLayer {
    pub name: String,
    pub segments: Vec<Segment>,
    pub summary: StripeSummary,
}

impl Recipe {
    /// Load a recipe file. `.json` files are JSON, everything else YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    fn enabled_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| {
            if !layer.enabled {
                info!(layer = %layer.name, "skipping disabled layer");
            }
            layer.enabled
        })
    }

    /// Draw every enabled layer into an SVG document.
    ///
    /// Relative SVG paths in shape sources resolve against `base_dir`.
    pub fn render_svg(&self, base_dir: &Path) -> Result<(String, Vec<StripeSummary>), CliError> {
        let mut renderer = SvgRenderer::new();
        let mut summaries = Vec::new();

        for layer in self.enabled_layers() {
            let (outer, inner) = layer.resolve_shapes(base_dir)?;
            let styles = layer.line_styles(&self.defaults)?;

            if self.canvas.outlines {
                let outline = self.defaults.to_line_style()?;
                renderer.add_outline(&outer, outline);
                if let Some(inner) = &inner {
                    renderer.add_outline(inner, outline);
                }
            }

            let summary = layer.draw(&outer, inner.as_ref(), &styles, &mut renderer);
            info!(layer = %layer.name, segments = summary.segments, "drew layer");
            if summary.stop.is_early() {
                warn!(layer = %layer.name, stop = ?summary.stop, "layer stopped early");
            }
            summaries.push(summary);
        }

        let background: Rgba = self.canvas.background.parse()?;
        let view_box = ViewBox::new(0.0, 0.0, self.canvas.width, self.canvas.height);
        Ok((renderer.to_svg(&view_box, Some(background)), summaries))
    }

    /// Generate every enabled layer's stripes without styling.
    pub fn render_segments(&self, base_dir: &Path) -> Result<Vec<RenderedLayer>, CliError> {
        let mut rendered = Vec::new();
        for layer in self.enabled_layers() {
            let (outer, inner) = layer.resolve_shapes(base_dir)?;
            let (segments, summary) = layer.generate(&outer, inner.as_ref());
            info!(layer = %layer.name, segments = segments.len(), "generated layer");
            rendered.push(RenderedLayer { name: layer.name.clone(), segments, summary });
        }
        Ok(rendered)
    }
}

impl Layer {
    fn config(&self) -> StripeConfig<'_> {
        let config = match &self.spacing {
            SpacingSpec::Fixed(spacing) => StripeConfig::fixed(*spacing, self.angle),
            SpacingSpec::Curve { curve } => StripeConfig::curve(curve, self.angle),
        };
        config.with_phase(self.phase)
    }

    fn line_styles(&self, defaults: &LayerStyle) -> Result<Vec<LineStyle>, CliError> {
        if self.styles.is_empty() {
            return Ok(vec![defaults.to_line_style()?]);
        }
        self.styles
            .iter()
            .map(|s| s.merge_with(defaults).to_line_style().map_err(CliError::from))
            .collect()
    }

    fn resolve_shapes(&self, base_dir: &Path) -> Result<(Shape, Option<Shape>), CliError> {
        let outer = self.resolve(&self.outer, base_dir)?;
        let inner = self.inner.as_ref().map(|src| self.resolve(src, base_dir)).transpose()?;
        Ok((outer, inner))
    }

    fn resolve(&self, source: &ShapeSource, base_dir: &Path) -> Result<Shape, CliError> {
        let shape = match source {
            ShapeSource::Inline(shape) => shape.clone(),
            ShapeSource::Svg { svg, id, index } => {
                let path = base_dir.join(svg);
                let content = fs::read_to_string(&path).map_err(|source| CliError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                let mut polygons = extract_polygons_from_svg(&content)?;

                let position = match id {
                    Some(id) => polygons.iter().position(|p| p.id.as_deref() == Some(id.as_str())),
                    None => (*index < polygons.len()).then_some(*index),
                };
                let Some(position) = position else {
                    return Err(CliError::NoSuchPolygon {
                        layer: self.name.clone(),
                        selector: id.as_ref().map_or_else(|| format!("index {}", index), |id| format!("id '{}'", id)),
                        path: path.display().to_string(),
                    });
                };
                Shape::Polygon(polygons.swap_remove(position))
            }
        };

        shape.validate().map_err(|source| CliError::Shape { layer: self.name.clone(), source })?;
        Ok(shape)
    }

    fn draw<R: LineRenderer>(
        &self,
        outer: &Shape,
        inner: Option<&Shape>,
        styles: &[LineStyle],
        renderer: &mut R,
    ) -> StripeSummary {
        let config = self.config();
        let summary = self.draw_pass(outer, inner, &config, styles, renderer);
        if self.crosshatch {
            let second = self.draw_pass(outer, inner, &config.rotated(90.0), styles, renderer);
            combine_summaries(summary, second)
        } else {
            summary
        }
    }

    fn draw_pass<R: LineRenderer>(
        &self,
        outer: &Shape,
        inner: Option<&Shape>,
        config: &StripeConfig<'_>,
        styles: &[LineStyle],
        renderer: &mut R,
    ) -> StripeSummary {
        match inner {
            Some(inner) => draw_stripes_excluding(outer, inner, config, styles, self.cycle, renderer),
            None => draw_stripes(outer, config, styles, self.cycle, renderer),
        }
    }

    fn generate(&self, outer: &Shape, inner: Option<&Shape>) -> (Vec<Segment>, StripeSummary) {
        let config = self.config();
        let inner = inner.map(|s| s as &dyn Boundary);
        let mut segments = Vec::new();
        let mut summary = stripe_into(outer, inner, &config, &mut segments);
        if self.crosshatch {
            let second = stripe_into(outer, inner, &config.rotated(90.0), &mut segments);
            summary = combine_summaries(summary, second);
        }
        (segments, summary)
    }
}

pub const EXAMPLE_RECIPE: &str = r##"# Example striper recipe
name: "Ring and notch"
description: "Two layers: a striped ring and a crosshatched notch"

canvas:
  width: 200
  height: 200
  background: "white"
  outlines: false

defaults:
  color: "#333333"
  stroke_width: 0.5

layers:
  - name: ring
    outer: { kind: circle, center: { x: 100, y: 100 }, radius: 80 }
    inner: { kind: circle, center: { x: 100, y: 100 }, radius: 40 }
    spacing: 3
    angle: 30
    styles:
      - { color: "#1d3557", stroke_width: 1.0 }
      - { color: "#e63946" }

  - name: notch
    outer:
      kind: polygon
      vertices:
        - { x: 20, y: 20 }
        - { x: 80, y: 20 }
        - { x: 80, y: 80 }
        - { x: 60, y: 80 }
        - { x: 60, y: 40 }
        - { x: 40, y: 40 }
        - { x: 40, y: 80 }
        - { x: 20, y: 80 }
    spacing:
      curve:
        - { time: 0.0, value: 1.0 }
        - { time: 1.0, value: 4.0 }
    crosshatch: true
    cycle: per_sample_line
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use striper::{Circle, Point, RecordingRenderer, StopReason};

    fn example() -> Recipe {
        serde_yaml::from_str(EXAMPLE_RECIPE).unwrap()
    }

    #[test]
    fn example_recipe_parses() {
        let recipe = example();
        assert_eq!(recipe.layers.len(), 2);

        let ring = &recipe.layers[0];
        assert!(matches!(ring.outer, ShapeSource::Inline(Shape::Circle(_))));
        assert!(matches!(ring.inner, Some(ShapeSource::Inline(Shape::Circle(_)))));
        assert!(matches!(ring.spacing, SpacingSpec::Fixed(s) if s == 3.0));
        assert_eq!(ring.cycle, StyleCycle::PerEmittingLine);
        assert!(ring.enabled);

        let notch = &recipe.layers[1];
        assert!(matches!(notch.outer, ShapeSource::Inline(Shape::Polygon(_))));
        let SpacingSpec::Curve { curve } = &notch.spacing else {
            panic!("expected curve spacing");
        };
        assert_eq!(curve.keys().len(), 2);
        assert_eq!(notch.cycle, StyleCycle::PerSampleLine);
        assert!(notch.crosshatch);
    }

    #[test]
    fn svg_source_parses() {
        let layer: Layer = serde_yaml::from_str(
            "name: art\nouter: { svg: shapes.svg, id: logo }\nspacing: 2\n",
        )
        .unwrap();
        match layer.outer {
            ShapeSource::Svg { svg, id, index } => {
                assert_eq!(svg, PathBuf::from("shapes.svg"));
                assert_eq!(id.as_deref(), Some("logo"));
                assert_eq!(index, 0);
            }
            other => panic!("expected svg source, got {:?}", other),
        }
    }

    #[test]
    fn style_merge_prefers_layer_values() {
        let defaults = LayerStyle {
            color: Some("#333333".into()),
            stroke_width: Some(0.5),
            opacity: Some(0.5),
            ..Default::default()
        };
        let layer = LayerStyle { color: Some("red".into()), ..Default::default() };
        let merged = layer.merge_with(&defaults);
        assert_eq!(merged.color.as_deref(), Some("red"));
        assert_eq!(merged.stroke_width, Some(0.5));

        let style = merged.to_line_style().unwrap();
        assert_eq!(style.color, Rgba { r: 255, g: 0, b: 0, a: 128 });
        assert_eq!(style.thickness, 0.5);
        assert_eq!(style.cap, CapType::Butt);
    }

    #[test]
    fn bad_color_is_an_error() {
        let style = LayerStyle { color: Some("nope".into()), ..Default::default() };
        assert!(style.to_line_style().is_err());
    }

    #[test]
    fn render_svg_draws_every_enabled_layer() {
        let mut recipe = example();
        let (svg, summaries) = recipe.render_svg(Path::new(".")).unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.segments > 0));
        assert!(svg.contains("stroke=\"#1d3557\""));
        assert!(svg.contains("stroke=\"#e63946\""));

        recipe.layers[1].enabled = false;
        let (_, summaries) = recipe.render_svg(Path::new(".")).unwrap();
        assert_eq!(summaries.len(), 1);
    }

    #[test]
    fn render_segments_matches_draw_counts() {
        let rendered = example().render_segments(Path::new(".")).unwrap();
        assert_eq!(rendered.len(), 2);
        for layer in &rendered {
            assert_eq!(layer.segments.len(), layer.summary.segments);
        }
        // The ring never draws inside its hole.
        for s in &rendered[0].segments {
            assert!(s.midpoint().distance(Point::new(100.0, 100.0)) > 40.0);
        }
    }

    #[test]
    fn invalid_inline_shape_names_the_layer() {
        let layer = Layer {
            name: "broken".into(),
            outer: ShapeSource::Inline(Shape::Circle(Circle { center: Point::ZERO, radius: -1.0 })),
            inner: None,
            spacing: SpacingSpec::default(),
            angle: 0.0,
            phase: 0.0,
            styles: Vec::new(),
            cycle: StyleCycle::default(),
            crosshatch: false,
            enabled: true,
        };
        let err = layer.resolve_shapes(Path::new(".")).unwrap_err();
        assert!(err.to_string().starts_with("layer 'broken'"));
    }

    #[test]
    fn missing_svg_polygon_is_reported() {
        let dir = std::env::temp_dir().join(format!("striper-recipe-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("one.svg"),
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect id="a" width="5" height="5"/></svg>"#,
        )
        .unwrap();

        let source = |id: &str| ShapeSource::Svg { svg: "one.svg".into(), id: Some(id.into()), index: 0 };
        let mut layer: Layer = serde_yaml::from_str("name: art\nouter: { kind: circle, center: {x: 0, y: 0}, radius: 1 }").unwrap();

        layer.outer = source("a");
        let (outer, _) = layer.resolve_shapes(&dir).unwrap();
        assert_eq!(outer.kind(), "polygon");

        layer.outer = source("b");
        assert!(matches!(layer.resolve_shapes(&dir), Err(CliError::NoSuchPolygon { .. })));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unkeyed_curve_layer_draws_nothing() {
        let yaml = "name: empty\nouter: { kind: circle, center: {x: 0, y: 0}, radius: 5 }\nspacing: { curve: [] }\n";
        let layer: Layer = serde_yaml::from_str(yaml).unwrap();
        let (outer, inner) = layer.resolve_shapes(Path::new(".")).unwrap();
        let mut renderer = RecordingRenderer::default();
        let summary = layer.draw(&outer, inner.as_ref(), &[LineStyle::default()], &mut renderer);
        assert_eq!(summary.segments, 0);
        assert!(renderer.lines.is_empty());
        assert_eq!(summary.stop, StopReason::UnkeyedCurve);
    }
}
