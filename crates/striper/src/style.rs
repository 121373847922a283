//! Line styles for draw mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    #[error("invalid color {input:?}: {reason}")]
    InvalidColor { input: String, reason: String },
}

/// 8-bit RGBA color.
///
/// Parses anything SVG accepts as a color: `#rgb`, `#rrggbb`, named colors,
/// `rgb(...)` and `rgba(...)`. Serializes as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb`, without alpha.
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as 0.0 to 1.0.
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.to_hex_rgb())
        } else {
            write!(f, "{}{:02x}", self.to_hex_rgb(), self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color = svgtypes::Color::from_str(s.trim()).map_err(|e| StyleError::InvalidColor {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { r: color.red, g: color.green, b: color.blue, a: color.alpha })
    }
}

impl TryFrom<String> for Rgba {
    type Error = StyleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

/// Line end shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapType {
    #[default]
    Butt,
    Round,
    Square,
}

impl CapType {
    /// Value for the SVG `stroke-linecap` attribute.
    pub fn svg_linecap(self) -> &'static str {
        match self {
            CapType::Butt => "butt",
            CapType::Round => "round",
            CapType::Square => "square",
        }
    }
}

/// How one stripe is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub thickness: f64,
    pub color: Rgba,
    pub cap: CapType,
    /// Vertices per round cap, for renderers that tessellate caps
    pub cap_points: u32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: Rgba::BLACK,
            cap: CapType::Butt,
            cap_points: 0,
        }
    }
}

impl LineStyle {
    pub fn new(thickness: f64, color: Rgba) -> Self {
        Self { thickness, color, ..Self::default() }
    }

    pub fn with_cap(mut self, cap: CapType, cap_points: u32) -> Self {
        self.cap = cap;
        self.cap_points = cap_points;
        self
    }
}
