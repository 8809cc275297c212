//! Segments and vectors: line algebra over two points.
//!
//! A [`Segment`] is an undirected pair of points; the same type tagged with
//! [`SegmentKind::Vector`] is directional. The tag matters for rendering
//! (arrowheads) and for the transformations that scale: a vector keeps its
//! initial point fixed and stretches toward the final one, a segment scales
//! symmetrically about its midpoint.

use std::fmt;

use glam::{DVec2, dvec2};

use super::angle::AngleMeasure;
use super::equation::{Equation, LineEquation};
use super::point::Point;
use crate::errors::{GeometryError, Warning};
use crate::types::{EPS_GEOMETRY, Scalar};

/// Below this length `normalize` refuses to rescale.
const NORMALIZE_MIN_LENGTH: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Segment,
    Vector,
}

/// Orientation class of a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
    Oblique,
    /// Both ends coincide (within `1e-4`).
    Degenerate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    start: Point,
    end: Point,
    kind: SegmentKind,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end, kind: SegmentKind::Segment }
    }

    pub fn vector(start: Point, end: Point) -> Self {
        Segment { start, end, kind: SegmentKind::Vector }
    }

    /// The vector `(dx, dy)` anchored at `origin`.
    pub fn from_components(origin: Point, dx: impl Into<Scalar>, dy: impl Into<Scalar>) -> Self {
        Segment::vector(origin, origin.translate(dx, dy))
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn is_vector(&self) -> bool {
        self.kind == SegmentKind::Vector
    }

    pub fn to_vector(&self) -> Segment {
        Segment::vector(self.start, self.end)
    }

    pub fn to_segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }

    fn with_ends(&self, start: Point, end: Point) -> Segment {
        Segment { start, end, kind: self.kind }
    }

    pub(crate) fn components(&self) -> DVec2 {
        self.end.to_dvec2() - self.start.to_dvec2()
    }

    pub fn dx(&self) -> Scalar {
        self.end.x() - self.start.x()
    }

    pub fn dy(&self) -> Scalar {
        self.end.y() - self.start.y()
    }

    pub fn length(&self) -> Scalar {
        Scalar(self.components().length())
    }

    /// Vertical when `|dx| < 1e-4`. A zero-length segment counts as vertical.
    pub fn is_vertical(&self) -> bool {
        self.dx().is_almost_zero(EPS_GEOMETRY)
    }

    /// Horizontal when `|dy| < 1e-4` and the segment is not vertical, so the
    /// two predicates are never both true.
    pub fn is_horizontal(&self) -> bool {
        self.dy().is_almost_zero(EPS_GEOMETRY) && !self.is_vertical()
    }

    pub fn is_degenerate(&self) -> bool {
        self.dx().is_almost_zero(EPS_GEOMETRY) && self.dy().is_almost_zero(EPS_GEOMETRY)
    }

    pub fn classify(&self) -> Orientation {
        if self.is_degenerate() {
            Orientation::Degenerate
        } else if self.is_vertical() {
            Orientation::Vertical
        } else if self.is_horizontal() {
            Orientation::Horizontal
        } else {
            Orientation::Oblique
        }
    }

    pub fn slope(&self) -> Result<Scalar, GeometryError> {
        if self.is_vertical() {
            return Err(GeometryError::VerticalSlope {
                x: self.start.x().raw(),
                y1: self.start.y().raw(),
                y2: self.end.y().raw(),
            });
        }
        Ok(Scalar(self.dy().raw() / self.dx().raw()))
    }

    /// The carrying line as `ax + by + c = 0`.
    pub fn equation(&self) -> Result<LineEquation, GeometryError> {
        if self.is_degenerate() {
            return Err(GeometryError::degenerate_with("line equation", format!("{self}")));
        }
        let (dx, dy) = (self.dx().raw(), self.dy().raw());
        let (x0, y0) = (self.start.x().raw(), self.start.y().raw());
        Ok(LineEquation::new(dy, -dx, dx * y0 - dy * x0))
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(&self.end)
    }

    /// Point at `proportion` of the way from start to end.
    pub fn point_at(&self, proportion: impl Into<Scalar>) -> Point {
        let t = proportion.into().raw();
        Point::from_dvec2(self.start.to_dvec2() + self.components() * t)
    }

    /// The `n + 1` points dividing the segment into `n` equal parts.
    pub fn divide_in_points(&self, n: usize) -> Result<Vec<Point>, GeometryError> {
        if n == 0 {
            return Err(GeometryError::degenerate("division into zero parts"));
        }
        Ok((0..=n).map(|k| self.point_at(k as f64 / n as f64)).collect())
    }

    /// Direction of the segment in `[0°, 360°)`.
    pub fn angle(&self) -> Result<AngleMeasure, GeometryError> {
        self.start.angle_to(&self.end)
    }

    pub fn inner_product(&self, other: &Segment) -> Scalar {
        Scalar(self.components().dot(other.components()))
    }

    /// z-component of the cross product.
    pub fn cross_product(&self, other: &Segment) -> Scalar {
        Scalar(self.components().perp_dot(other.components()))
    }

    /// Counter-clockwise angle from `self` to `other`, in `[0°, 360°)`.
    pub fn angle_between(&self, other: &Segment) -> Result<AngleMeasure, GeometryError> {
        let a = self.angle()?;
        let b = other.angle()?;
        Ok((b - a).positive())
    }

    /// Unit normal anchored at the midpoint.
    ///
    /// For a non-vertical segment the direction is `(slope, -1)` normalised;
    /// for a vertical one it is `(-1, 0)`.
    pub fn normal_vector(&self) -> Result<Segment, GeometryError> {
        if self.is_degenerate() {
            return Err(GeometryError::degenerate_with("normal vector", format!("{self}")));
        }
        let direction = if self.is_vertical() {
            dvec2(-1.0, 0.0)
        } else {
            dvec2(self.slope()?.raw(), -1.0).normalize()
        };
        let mid = self.midpoint();
        Ok(Segment::vector(mid, Point::from_dvec2(mid.to_dvec2() + direction)))
    }

    /// Same components, re-anchored at `origin`.
    pub fn fix_origin(&self, origin: Point) -> Segment {
        self.with_ends(origin, origin.translate(self.dx(), self.dy()))
    }

    /// Split into components parallel and orthogonal to `reference`.
    ///
    /// Both parts are vectors anchored at `self.start()` and sum to `self`.
    /// Only the direction of `reference` matters.
    pub fn decompose(&self, reference: &Segment) -> Result<(Segment, Segment), GeometryError> {
        if reference.is_degenerate() {
            return Err(GeometryError::degenerate_with(
                "decomposition",
                format!("reference {reference} has zero length"),
            ));
        }
        let v = self.components();
        let u = reference.components();
        let parallel = u * (v.dot(u) / u.length_squared());
        let orthogonal = v - parallel;
        let origin = self.start.to_dvec2();
        Ok((
            Segment::vector(self.start, Point::from_dvec2(origin + parallel)),
            Segment::vector(self.start, Point::from_dvec2(origin + orthogonal)),
        ))
    }

    /// Rescale to length `l`.
    ///
    /// A vector keeps its initial point, a segment keeps its midpoint. Below a
    /// length of `1e-3` the value is returned unchanged and a warning is
    /// logged.
    pub fn normalize(&self, l: impl Into<Scalar>) -> Segment {
        let length = self.length().raw();
        if length < NORMALIZE_MIN_LENGTH {
            crate::log::report(&Warning::DegenerateGeometry { operation: "normalize" });
            return *self;
        }
        self.dilate(l.into().raw() / length)
    }

    /// Scale by `coef`: toward the end for a vector, about the midpoint for a
    /// segment.
    pub fn dilate(&self, coef: impl Into<Scalar>) -> Segment {
        let k = coef.into().raw();
        let v = self.components();
        match self.kind {
            SegmentKind::Vector => {
                let start = self.start.to_dvec2();
                self.with_ends(self.start, Point::from_dvec2(start + v * k))
            }
            SegmentKind::Segment => {
                let mid = self.midpoint().to_dvec2();
                let half = v * (k / 2.0);
                self.with_ends(Point::from_dvec2(mid - half), Point::from_dvec2(mid + half))
            }
        }
    }

    /// Quarter turn: about the start for a vector, about the midpoint for a
    /// segment.
    pub fn orthogonal(&self) -> Segment {
        let quarter = AngleMeasure::from_degree(90);
        match self.kind {
            SegmentKind::Vector => self.rotate(quarter, self.start),
            SegmentKind::Segment => self.rotate(quarter, self.midpoint()),
        }
    }

    pub fn translate(&self, dx: impl Into<Scalar>, dy: impl Into<Scalar>) -> Segment {
        let (dx, dy) = (dx.into(), dy.into());
        self.with_ends(self.start.translate(dx, dy), self.end.translate(dx, dy))
    }

    pub fn rotate(&self, angle: AngleMeasure, about: Point) -> Segment {
        self.with_ends(self.start.rotate(angle, about), self.end.rotate(angle, about))
    }

    /// Parallel copy through `p`: starting at `p` for a vector, centred on `p`
    /// for a segment.
    pub fn parallel_through(&self, p: Point) -> Segment {
        match self.kind {
            SegmentKind::Vector => self.fix_origin(p),
            SegmentKind::Segment => {
                let half = self.components() * 0.5;
                let c = p.to_dvec2();
                self.with_ends(Point::from_dvec2(c - half), Point::from_dvec2(c + half))
            }
        }
    }

    pub fn reverse(&self) -> Segment {
        self.with_ends(self.end, self.start)
    }

    /// Same components, wherever they are anchored.
    pub fn equals_as_vector(&self, other: &Segment, epsilon: f64) -> bool {
        self.dx().is_almost_equal(other.dx(), epsilon) && self.dy().is_almost_equal(other.dy(), epsilon)
    }

    /// Intersection of the carrying lines, sorted by ascending x.
    ///
    /// Parallel lines give an empty list.
    pub fn intersection(&self, other: &Segment) -> Result<Vec<Point>, GeometryError> {
        self.intersection_with(&Equation::Line(other.equation()?))
    }

    /// Intersection of the carrying line with any curve exposing an equation.
    ///
    /// Solutions whose imaginary part exceeds `1e-4` are discarded.
    pub fn intersection_with(&self, equation: &Equation) -> Result<Vec<Point>, GeometryError> {
        let line = self.equation()?;
        Ok(equation.intersect_line(&line))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.kind {
            SegmentKind::Segment => "--",
            SegmentKind::Vector => "->",
        };
        write!(f, "{} {} {}", self.start, arrow, self.end)
    }
}
