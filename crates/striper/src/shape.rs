//! Boundary shapes and the capability interface the stripe engine clips
//! against.
//!
//! The engine never looks inside a shape. It asks three questions through
//! [`Boundary`]: where does a ray cross you, is this point inside you, and
//! how big are you. Any type answering those can be an outer or inner
//! boundary, so callers with their own intersection routines plug them in
//! by implementing the trait.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Point, max_vertex_distance, vertex_centroid};
use crate::intersect::{point_in_polygon, ray_circle_crossings, ray_convex_crossings, ray_polygon_crossings};

/// Capability interface over boundary shapes.
///
/// ## Rust Lesson #24: Traits
///
/// A trait is a set of methods a type promises to provide, like a TS
/// interface. Functions written against `&dyn Boundary` or `B: Boundary`
/// work for every shape without knowing which one they have.
pub trait Boundary {
    /// First and last crossing of the ray `origin + t * direction`, t >= 0.
    ///
    /// `None` marks a missing crossing.
    fn intersect(&self, origin: Point, direction: Point) -> (Option<Point>, Option<Point>);

    /// Every crossing of the ray, appended to `hits` in no particular order.
    ///
    /// Returns how many points were appended. The default forwards the valid
    /// points of [`Boundary::intersect`].
    fn intersect_many(&self, origin: Point, direction: Point, hits: &mut Vec<Point>) -> usize {
        let (a, b) = self.intersect(origin, direction);
        let before = hits.len();
        hits.extend(a);
        hits.extend(b);
        hits.len() - before
    }

    fn contains_point(&self, p: Point) -> bool;

    /// Center the sampler sweeps around.
    fn center(&self) -> Point;

    /// Extent the sampler has to cover: every point of the shape lies within
    /// `max_dimension / 2` of [`Boundary::center`].
    fn max_dimension(&self) -> f64;

    /// True when a single ray can cross the boundary more than twice.
    fn yields_many(&self) -> bool {
        false
    }
}

/// Errors from building a shape out of bad numbers.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("shape has a non-finite coordinate")]
    NonFinite,
    #[error("rect min corner ({min_x}, {min_y}) is not below max corner ({max_x}, {max_y})")]
    InvertedRect { min_x: f64, min_y: f64, max_x: f64, max_y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point; 3],
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

/// Convex quadrilateral. Vertices go around the outline in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub vertices: [Point; 4],
}

/// Simple polygon, convex or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
    /// Optional ID from the SVG element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Closed set of boundary shapes, dispatched once per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Circle(Circle),
    Triangle(Triangle),
    Rect(Rect),
    Quad(Quad),
    Polygon(Polygon),
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl Circle {
    pub fn new(center: Point, radius: f64) -> Result<Self, ShapeError> {
        let circle = Self { center, radius };
        circle.validate()?;
        Ok(circle)
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        if !self.center.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ShapeError::InvalidRadius(self.radius));
        }
        Ok(())
    }
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Result<Self, ShapeError> {
        let tri = Self { vertices: [a, b, c] };
        tri.validate()?;
        Ok(tri)
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        check_finite(&self.vertices)
    }
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Result<Self, ShapeError> {
        let rect = Self { min, max };
        rect.validate()?;
        Ok(rect)
    }

    /// Rectangle from its top-left corner and size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Result<Self, ShapeError> {
        Self::new(Point::new(x, y), Point::new(x + width, y + height))
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        check_finite(&[self.min, self.max])?;
        if self.min.x >= self.max.x || self.min.y >= self.max.y {
            return Err(ShapeError::InvertedRect {
                min_x: self.min.x,
                min_y: self.min.y,
                max_x: self.max.x,
                max_y: self.max.y,
            });
        }
        Ok(())
    }

    /// Corners counter-clockwise from `min`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

impl Quad {
    pub fn new(vertices: [Point; 4]) -> Result<Self, ShapeError> {
        let quad = Self { vertices };
        quad.validate()?;
        Ok(quad)
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        check_finite(&self.vertices)
    }
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Result<Self, ShapeError> {
        Self::with_id(vertices, None)
    }

    /// Create a polygon with an ID.
    pub fn with_id(vertices: Vec<Point>, id: Option<String>) -> Result<Self, ShapeError> {
        let poly = Self { vertices, id };
        poly.validate()?;
        Ok(poly)
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(self.vertices.len()));
        }
        check_finite(&self.vertices)
    }
}

impl Shape {
    /// Check the invariants the constructors enforce.
    ///
    /// Shapes that arrive through serde skip the constructors, so loaders
    /// call this before handing them to the engine.
    pub fn validate(&self) -> Result<(), ShapeError> {
        match self {
            Shape::Circle(s) => s.validate(),
            Shape::Triangle(s) => s.validate(),
            Shape::Rect(s) => s.validate(),
            Shape::Quad(s) => s.validate(),
            Shape::Polygon(s) => s.validate(),
        }
    }

    /// Short lowercase name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "circle",
            Shape::Triangle(_) => "triangle",
            Shape::Rect(_) => "rect",
            Shape::Quad(_) => "quad",
            Shape::Polygon(_) => "polygon",
        }
    }

    /// Outline vertices, or `None` for a circle.
    pub fn vertices(&self) -> Option<Vec<Point>> {
        match self {
            Shape::Circle(_) => None,
            Shape::Triangle(t) => Some(t.vertices.to_vec()),
            Shape::Rect(r) => Some(r.corners().to_vec()),
            Shape::Quad(q) => Some(q.vertices.to_vec()),
            Shape::Polygon(p) => Some(p.vertices.clone()),
        }
    }
}

fn check_finite(points: &[Point]) -> Result<(), ShapeError> {
    if points.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(ShapeError::NonFinite)
    }
}

fn vertex_center(vertices: &[Point]) -> Point {
    vertex_centroid(vertices).unwrap_or(Point::ZERO)
}

fn vertex_extent(vertices: &[Point]) -> f64 {
    2.0 * max_vertex_distance(vertex_center(vertices), vertices)
}

// ============================================================================
// BOUNDARY IMPLEMENTATIONS
// ============================================================================

impl Boundary for Circle {
    fn intersect(&self, origin: Point, direction: Point) -> (Option<Point>, Option<Point>) {
        ray_circle_crossings(origin, direction, self.center, self.radius)
    }

    fn contains_point(&self, p: Point) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }

    fn center(&self) -> Point {
        self.center
    }

    fn max_dimension(&self) -> f64 {
        2.0 * self.radius
    }
}

impl Boundary for Triangle {
    fn intersect(&self, origin: Point, direction: Point) -> (Option<Point>, Option<Point>) {
        ray_convex_crossings(origin, direction, &self.vertices)
    }

    fn contains_point(&self, p: Point) -> bool {
        point_in_polygon(p, &self.vertices)
    }

    fn center(&self) -> Point {
        vertex_center(&self.vertices)
    }

    fn max_dimension(&self) -> f64 {
        vertex_extent(&self.vertices)
    }
}

impl Boundary for Rect {
    fn intersect(&self, origin: Point, direction: Point) -> (Option<Point>, Option<Point>) {
        ray_convex_crossings(origin, direction, &self.corners())
    }

    // Inclusive, so crossings on the edge count as inside.
    fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    fn max_dimension(&self) -> f64 {
        self.min.distance(self.max)
    }
}

impl Boundary for Quad {
    fn intersect(&self, origin: Point, direction: Point) -> (Option<Point>, Option<Point>) {
        ray_convex_crossings(origin, direction, &self.vertices)
    }

    fn contains_point(&self, p: Point) -> bool {
        point_in_polygon(p, &self.vertices)
    }

    fn center(&self) -> Point {
        vertex_center(&self.vertices)
    }

    fn max_dimension(&self) -> f64 {
        vertex_extent(&self.vertices)
    }
}

impl Boundary for Polygon {
    fn intersect(&self, origin: Point, direction: Point) -> (Option<Point>, Option<Point>) {
        ray_convex_crossings(origin, direction, &self.vertices)
    }

    fn intersect_many(&self, origin: Point, direction: Point, hits: &mut Vec<Point>) -> usize {
        ray_polygon_crossings(origin, direction, &self.vertices, hits)
    }

    fn contains_point(&self, p: Point) -> bool {
        point_in_polygon(p, &self.vertices)
    }

    fn center(&self) -> Point {
        vertex_center(&self.vertices)
    }

    fn max_dimension(&self) -> f64 {
        vertex_extent(&self.vertices)
    }

    fn yields_many(&self) -> bool {
        true
    }
}

impl Boundary for Shape {
    fn intersect(&self, origin: Point, direction: Point) -> (Option<Point>, Option<Point>) {
        match self {
            Shape::Circle(s) => s.intersect(origin, direction),
            Shape::Triangle(s) => s.intersect(origin, direction),
            Shape::Rect(s) => s.intersect(origin, direction),
            Shape::Quad(s) => s.intersect(origin, direction),
            Shape::Polygon(s) => s.intersect(origin, direction),
        }
    }

    fn intersect_many(&self, origin: Point, direction: Point, hits: &mut Vec<Point>) -> usize {
        match self {
            Shape::Circle(s) => s.intersect_many(origin, direction, hits),
            Shape::Triangle(s) => s.intersect_many(origin, direction, hits),
            Shape::Rect(s) => s.intersect_many(origin, direction, hits),
            Shape::Quad(s) => s.intersect_many(origin, direction, hits),
            Shape::Polygon(s) => s.intersect_many(origin, direction, hits),
        }
    }

    fn contains_point(&self, p: Point) -> bool {
        match self {
            Shape::Circle(s) => s.contains_point(p),
            Shape::Triangle(s) => s.contains_point(p),
            Shape::Rect(s) => s.contains_point(p),
            Shape::Quad(s) => s.contains_point(p),
            Shape::Polygon(s) => s.contains_point(p),
        }
    }

    fn center(&self) -> Point {
        match self {
            Shape::Circle(s) => s.center(),
            Shape::Triangle(s) => s.center(),
            Shape::Rect(s) => s.center(),
            Shape::Quad(s) => s.center(),
            Shape::Polygon(s) => s.center(),
        }
    }

    fn max_dimension(&self) -> f64 {
        match self {
            Shape::Circle(s) => s.max_dimension(),
            Shape::Triangle(s) => s.max_dimension(),
            Shape::Rect(s) => s.max_dimension(),
            Shape::Quad(s) => s.max_dimension(),
            Shape::Polygon(s) => s.max_dimension(),
        }
    }

    fn yields_many(&self) -> bool {
        matches!(self, Shape::Polygon(_))
    }
}

// ## Rust Lesson #25: From conversions
//
// `impl From<Circle> for Shape` lets callers write `circle.into()` wherever a
// `Shape` is expected.

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<Triangle> for Shape {
    fn from(s: Triangle) -> Self {
        Shape::Triangle(s)
    }
}

impl From<Rect> for Shape {
    fn from(s: Rect) -> Self {
        Shape::Rect(s)
    }
}

impl From<Quad> for Shape {
    fn from(s: Quad) -> Self {
        Shape::Quad(s)
    }
}

impl From<Polygon> for Shape {
    fn from(s: Polygon) -> Self {
        Shape::Polygon(s)
    }
}

// ============================================================================
// TESTS
// ============================================================================
