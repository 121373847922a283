//! Fill command implementation.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use striper::{
    LineStyle, Point, Polygon, Rgba, Segment, StripeConfig, StripeSummary, StyleCycle, SvgRenderer, ViewBox,
    draw_stripes, extract_polygons_from_svg, generate_crosshatch, generate_stripes, read_view_box,
};

use super::common::{CliError, JsonLine, OutputFormat, combine_summaries, flag_number, flag_value, read_input, write_output};

/// A shape with its lines in JSON output.
#[derive(Serialize)]
struct JsonShape {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    index: usize,
    lines: Vec<JsonLine>,
}

#[derive(Serialize)]
struct JsonOutput {
    shapes: Vec<JsonShape>,
}

/// Options for the fill command.
#[derive(Debug, Clone, PartialEq)]
pub struct FillOptions {
    pub svg_path: String,
    pub output_path: Option<String>,
    pub spacing: f64,
    pub angle: f64,
    pub phase: f64,
    pub format: OutputFormat,
    pub crosshatch: bool,
    pub outline: bool,
    pub style: LineStyle,
}

impl FillOptions {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut svg_path: Option<String> = None;
        let mut options = FillOptions {
            svg_path: String::new(),
            output_path: None,
            spacing: 2.5,
            angle: 45.0,
            phase: 0.0,
            format: OutputFormat::Svg,
            crosshatch: false,
            outline: false,
            style: LineStyle::new(0.5, Rgba::BLACK),
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "-o" | "--output" => options.output_path = Some(flag_value(args, &mut i, "--output")?.to_string()),
                "-s" | "--spacing" => options.spacing = flag_number(args, &mut i, "--spacing")?,
                "-a" | "--angle" => options.angle = flag_number(args, &mut i, "--angle")?,
                "--phase" => options.phase = flag_number(args, &mut i, "--phase")?,
                "-f" | "--format" => options.format = OutputFormat::from_name(flag_value(args, &mut i, "--format")?)?,
                "--json" => options.format = OutputFormat::Json,
                "--crosshatch" => options.crosshatch = true,
                "--outline" => options.outline = true,
                "--color" => options.style.color = flag_value(args, &mut i, "--color")?.parse()?,
                "--width" => options.style.thickness = flag_number(args, &mut i, "--width")?,
                "-" if svg_path.is_none() => svg_path = Some("-".to_string()),
                path if !path.starts_with('-') && svg_path.is_none() => svg_path = Some(path.to_string()),
                unknown => return Err(CliError::Usage(format!("unknown option: {}", unknown))),
            }
            i += 1;
        }

        options.svg_path = svg_path.ok_or_else(|| CliError::Usage("SVG file required (use '-' for stdin)".into()))?;
        Ok(options)
    }
}

/// Execute the fill command.
pub fn cmd_fill(args: &[String]) -> Result<(), CliError> {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }
    let options = FillOptions::parse(args)?;

    info!(path = %options.svg_path, "loading SVG");
    let svg_content = read_input(&options.svg_path)?;
    let polygons = extract_polygons_from_svg(&svg_content)?;
    info!(count = polygons.len(), "loaded polygons");

    let start = Instant::now();
    let output = match options.format {
        OutputFormat::Json => fill_json(&polygons, &options)?,
        OutputFormat::Svg => {
            let view_box = match read_view_box(&svg_content)? {
                Some(vb) => vb,
                None => {
                    let all: Vec<Point> = polygons.iter().flat_map(|p| p.vertices.iter().copied()).collect();
                    ViewBox::around(&all, options.spacing).unwrap_or_default()
                }
            };
            fill_svg(&polygons, &options, &view_box)
        }
    };
    info!(elapsed = ?start.elapsed(), "fill finished");

    write_output(options.output_path.as_deref(), &output)
}

/// Stripe every polygon and render the result as SVG.
pub fn fill_svg(polygons: &[Polygon], options: &FillOptions, view_box: &ViewBox) -> String {
    let config = StripeConfig::fixed(options.spacing, options.angle).with_phase(options.phase);
    let styles = [options.style];
    let mut renderer = SvgRenderer::new();

    for polygon in polygons {
        if options.outline {
            renderer.add_outline(&polygon.clone().into(), options.style);
        }
        let mut summary = draw_stripes(polygon, &config, &styles, StyleCycle::default(), &mut renderer);
        if options.crosshatch {
            let second = draw_stripes(polygon, &config.rotated(90.0), &styles, StyleCycle::default(), &mut renderer);
            summary = combine_summaries(summary, second);
        }
        log_polygon(polygon, &summary);
    }

    renderer.to_svg(view_box, None)
}

/// Stripe every polygon and report lines per shape as JSON.
pub fn fill_json(polygons: &[Polygon], options: &FillOptions) -> Result<String, CliError> {
    let config = StripeConfig::fixed(options.spacing, options.angle).with_phase(options.phase);
    let shapes = polygons
        .iter()
        .enumerate()
        .map(|(index, polygon)| {
            let segments: Vec<Segment> = if options.crosshatch {
                generate_crosshatch(polygon, &config)
            } else {
                generate_stripes(polygon, &config)
            };
            JsonShape {
                id: polygon.id.clone(),
                index,
                lines: segments.iter().map(JsonLine::from).collect(),
            }
        })
        .collect();

    Ok(serde_json::to_string_pretty(&JsonOutput { shapes })?)
}

fn log_polygon(polygon: &Polygon, summary: &StripeSummary) {
    info!(
        id = polygon.id.as_deref().unwrap_or("-"),
        segments = summary.segments,
        stop = ?summary.stop,
        "filled polygon"
    );
}

pub fn print_usage() {
    eprintln!("striper fill - stripe every polygon in an SVG file");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    striper fill <svg|-> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -o, --output <file>    Output file (- for stdout, default: stdout)");
    eprintln!("    -s, --spacing <n>      Stripe spacing (default: 2.5)");
    eprintln!("    -a, --angle <deg>      Stripe angle (default: 45)");
    eprintln!("    --phase <p>            Pattern shift, fraction of a spacing (default: 0)");
    eprintln!("    -f, --format <fmt>     Output format: svg, json (default: svg)");
    eprintln!("    --json                 Same as --format json");
    eprintln!("    --crosshatch           Add a perpendicular pass");
    eprintln!("    --outline              Draw polygon outlines too (SVG only)");
    eprintln!("    --color <color>        Stroke color (default: black)");
    eprintln!("    --width <n>            Stroke width (default: 0.5)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn square() -> Polygon {
        Polygon::with_id(
            vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(20.0, 20.0), Point::new(0.0, 20.0)],
            Some("sq".into()),
        )
        .unwrap()
    }

    #[test]
    fn parses_fill_options() {
        let o = FillOptions::parse(&args(&["art.svg", "-s", "3", "-a", "0", "--phase", "0.5", "--json", "--color", "red"]))
            .unwrap();
        assert_eq!(o.svg_path, "art.svg");
        assert_eq!(o.spacing, 3.0);
        assert_eq!(o.angle, 0.0);
        assert_eq!(o.phase, 0.5);
        assert_eq!(o.format, OutputFormat::Json);
        assert_eq!(o.style.color, Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn svg_path_is_required() {
        assert!(matches!(FillOptions::parse(&args(&["-s", "3"])), Err(CliError::Usage(_))));
        assert!(matches!(FillOptions::parse(&args(&["a.svg", "--bogus"])), Err(CliError::Usage(_))));
    }

    #[test]
    fn json_groups_lines_by_shape() {
        let options = FillOptions::parse(&args(&["x.svg", "-s", "2", "-a", "0"])).unwrap();
        let json = fill_json(&[square()], &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let shape = &value["shapes"][0];
        assert_eq!(shape["id"], "sq");
        assert_eq!(shape["index"], 0);
        assert!(!shape["lines"].as_array().unwrap().is_empty());
    }

    #[test]
    fn crosshatch_adds_lines() {
        let plain = FillOptions::parse(&args(&["x.svg", "-s", "2"])).unwrap();
        let cross = FillOptions { crosshatch: true, ..plain.clone() };
        let vb = ViewBox::new(0.0, 0.0, 20.0, 20.0);
        let a = fill_svg(&[square()], &plain, &vb);
        let b = fill_svg(&[square()], &cross, &vb);
        assert!(b.matches("<line ").count() > a.matches("<line ").count());
    }
}
