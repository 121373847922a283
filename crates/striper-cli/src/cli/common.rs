//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use striper::{Segment, ShapeError, StopReason, StripeSummary, StyleError, SvgError};

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse recipe YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse recipe JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Svg(#[from] SvgError),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error("layer '{layer}': {source}")]
    Shape {
        layer: String,
        #[source]
        source: ShapeError,
    },
    #[error("layer '{layer}': no polygon matches {selector} in {path}")]
    NoSuchPolygon { layer: String, selector: String, path: String },
    #[error("{0}")]
    Usage(String),
}

/// Output format for generated stripes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self, CliError> {
        match name.to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::Usage(format!("unknown format: {}. Use 'svg' or 'json'.", other))),
        }
    }
}

/// A line in JSON output format.
#[derive(Debug, Serialize)]
pub struct JsonLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<&Segment> for JsonLine {
    fn from(s: &Segment) -> Self {
        Self { x1: s.start.x, y1: s.start.y, x2: s.end.x, y2: s.end.y }
    }
}

/// Run statistics in JSON output format.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub lines_sampled: usize,
    pub lines_emitting: usize,
    pub segments: usize,
    pub stop: &'static str,
}

impl From<&StripeSummary> for JsonSummary {
    fn from(s: &StripeSummary) -> Self {
        Self {
            lines_sampled: s.lines_sampled,
            lines_emitting: s.lines_emitting,
            segments: s.segments,
            stop: stop_name(s.stop),
        }
    }
}

pub fn stop_name(stop: StopReason) -> &'static str {
    match stop {
        StopReason::Exhausted => "exhausted",
        StopReason::DegenerateShape => "degenerate_shape",
        StopReason::InvalidSpacing => "invalid_spacing",
        StopReason::SpacingExceedsExtent => "spacing_exceeds_extent",
        StopReason::UnkeyedCurve => "unkeyed_curve",
        StopReason::NonPositiveCurveSample => "non_positive_curve_sample",
    }
}

/// Add two runs' counts together, keeping the first early stop.
pub fn combine_summaries(a: StripeSummary, b: StripeSummary) -> StripeSummary {
    StripeSummary {
        lines_sampled: a.lines_sampled + b.lines_sampled,
        lines_emitting: a.lines_emitting + b.lines_emitting,
        segments: a.segments + b.segments,
        stop: if a.stop.is_early() { a.stop } else { b.stop },
    }
}

/// Read a file, or stdin for `-`.
pub fn read_input(path: &str) -> Result<String, CliError> {
    let mut content = String::new();
    if path == "-" {
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|source| CliError::Read { path: "<stdin>".to_string(), source })?;
    } else {
        content = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_string(), source })?;
    }
    Ok(content)
}

/// Write to a file, or stdout for `None` and `-`.
pub fn write_output(path: Option<&str>, content: &str) -> Result<(), CliError> {
    match path {
        None | Some("-") => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|source| CliError::Write { path: "<stdout>".to_string(), source }),
        Some(path) => {
            fs::write(Path::new(path), content).map_err(|source| CliError::Write { path: path.to_string(), source })
        }
    }
}

/// Fetch the value after a flag, advancing `i`.
pub fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, CliError> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("{} needs a value", flag)))
}

/// Parse the numeric value after a flag.
pub fn flag_number(args: &[String], i: &mut usize, flag: &str) -> Result<f64, CliError> {
    let value = flag_value(args, i, flag)?;
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("{} expects a number, got '{}'", flag, value)))
}
