//! Immutable 2-D points.

use std::fmt;
use std::ops::{Add, Sub};

use glam::{DVec2, dvec2};

use super::angle::AngleMeasure;
use super::segment::Segment;
use crate::errors::GeometryError;
use crate::types::{EPS_GEOMETRY, EPS_SNAP, Scalar};

/// A point of the plane.
///
/// Coordinates whose magnitude is below `1e-5` are snapped to exactly zero
/// when the point is built, so that float noise never reaches the markup.
/// Equality is exact; use [`Point::is_almost_equal`] for numeric comparison.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    x: Scalar,
    y: Scalar,
}

fn snap(value: f64) -> f64 {
    if value.abs() < EPS_SNAP { 0.0 } else { value }
}

impl Point {
    pub fn new(x: impl Into<Scalar>, y: impl Into<Scalar>) -> Self {
        Point {
            x: Scalar(snap(x.into().raw())),
            y: Scalar(snap(y.into().raw())),
        }
    }

    pub fn origin() -> Self {
        Point::default()
    }

    /// Point at `radius` from the origin in the direction `angle`.
    pub fn polar(radius: impl Into<Scalar>, angle: AngleMeasure) -> Self {
        let r = radius.into().raw();
        Point::new(r * angle.cos(), r * angle.sin())
    }

    pub fn x(&self) -> Scalar {
        self.x
    }

    pub fn y(&self) -> Scalar {
        self.y
    }

    pub(crate) fn to_dvec2(self) -> DVec2 {
        dvec2(self.x.raw(), self.y.raw())
    }

    pub(crate) fn from_dvec2(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }

    pub fn translate(&self, dx: impl Into<Scalar>, dy: impl Into<Scalar>) -> Self {
        Point::new(self.x + dx.into(), self.y + dy.into())
    }

    /// Translate by the components of a segment or vector.
    pub fn translate_by(&self, vector: &Segment) -> Self {
        self.translate(vector.dx(), vector.dy())
    }

    /// Rotate around `about` by `angle` (counter-clockwise).
    pub fn rotate(&self, angle: AngleMeasure, about: Point) -> Self {
        let rel = self.to_dvec2() - about.to_dvec2();
        let (sin, cos) = (angle.sin(), angle.cos());
        let rotated = dvec2(rel.x * cos - rel.y * sin, rel.x * sin + rel.y * cos);
        Point::from_dvec2(about.to_dvec2() + rotated)
    }

    /// Homothety of ratio `factor` centred at the origin.
    pub fn scale(&self, factor: impl Into<Scalar>) -> Self {
        let k = factor.into();
        Point::new(self.x * k, self.y * k)
    }

    /// Polar coordinates relative to the origin.
    pub fn to_polar(&self) -> Result<(Scalar, AngleMeasure), GeometryError> {
        self.to_polar_about(Point::origin())
    }

    /// Polar coordinates `(radius, angle in [0°, 360°))` relative to `origin`.
    pub fn to_polar_about(&self, origin: Point) -> Result<(Scalar, AngleMeasure), GeometryError> {
        let rel = self.to_dvec2() - origin.to_dvec2();
        let radius = rel.length();
        if radius < EPS_GEOMETRY {
            return Err(GeometryError::degenerate_with(
                "polar coordinates",
                format!("{self} coincides with the origin {origin}"),
            ));
        }
        let angle = AngleMeasure::from_radian(rel.y.atan2(rel.x)).positive();
        Ok((Scalar(radius), angle))
    }

    /// Project onto the line carried by `line`.
    ///
    /// Without `direction` the projection is orthogonal; otherwise the point
    /// slides along `direction` until it meets the line.
    pub fn project_onto(
        &self,
        line: &Segment,
        direction: Option<&Segment>,
    ) -> Result<Point, GeometryError> {
        if line.is_degenerate() {
            return Err(GeometryError::degenerate_with(
                "projection onto a line",
                format!("{line} has zero length"),
            ));
        }
        let origin = line.start().to_dvec2();
        let u = line.components();
        let rel = self.to_dvec2() - origin;

        let t = match direction {
            None => rel.dot(u) / u.length_squared(),
            Some(direction) => {
                if direction.is_degenerate() {
                    return Err(GeometryError::degenerate_with(
                        "projection direction",
                        format!("{direction} has zero length"),
                    ));
                }
                let d = direction.components();
                let cross = u.perp_dot(d);
                if cross.abs() < EPS_GEOMETRY * u.length() * d.length() {
                    return Err(GeometryError::ParallelProjection);
                }
                rel.perp_dot(d) / cross
            }
        };
        Ok(Point::from_dvec2(origin + u * t))
    }

    pub fn distance(&self, other: &Point) -> Scalar {
        Scalar(self.to_dvec2().distance(other.to_dvec2()))
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::from_dvec2((self.to_dvec2() + other.to_dvec2()) * 0.5)
    }

    /// The vector from `self` to `other`.
    pub fn vector_to(&self, other: &Point) -> Segment {
        Segment::vector(*self, *other)
    }

    pub fn segment_to(&self, other: &Point) -> Segment {
        Segment::new(*self, *other)
    }

    /// Direction of `other` seen from `self`, in `[0°, 360°)`.
    pub fn angle_to(&self, other: &Point) -> Result<AngleMeasure, GeometryError> {
        other.to_polar_about(*self).map(|(_, angle)| angle)
    }

    pub fn is_almost_equal(&self, other: &Point, epsilon: f64) -> bool {
        self.x.is_almost_equal(other.x, epsilon) && self.y.is_almost_equal(other.y, epsilon)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}
