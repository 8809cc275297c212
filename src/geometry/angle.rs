//! Dual degree/radian angle values.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::types::Scalar;

const DEG_PER_RAD: f64 = 180.0 / std::f64::consts::PI;
const RAD_PER_DEG: f64 = std::f64::consts::PI / 180.0;

/// Degree values this close to an integer are snapped to it.
const SNAP_EPSILON: f64 = 1e-8;

/// An angle carrying both its degree and radian values.
///
/// Construction does not normalise; call [`AngleMeasure::simplify`] (or
/// [`AngleMeasure::simplified`]) to reduce the value into `(-360°, 360°]`.
///
/// Exactly one of the two values is supplied by the caller; the other is
/// derived through the `180/π` factor.
#[derive(Clone, Copy, Debug)]
pub struct AngleMeasure {
    degree: f64,
    radian: f64,
}

impl AngleMeasure {
    pub const ZERO: AngleMeasure = AngleMeasure {
        degree: 0.0,
        radian: 0.0,
    };

    pub fn from_degree(value: impl Into<Scalar>) -> Self {
        let degree = value.into().raw();
        AngleMeasure {
            degree,
            radian: degree * RAD_PER_DEG,
        }
    }

    pub fn from_radian(value: impl Into<Scalar>) -> Self {
        let radian = value.into().raw();
        AngleMeasure {
            degree: radian * DEG_PER_RAD,
            radian,
        }
    }

    pub fn degree(&self) -> Scalar {
        Scalar(self.degree)
    }

    pub fn radian(&self) -> Scalar {
        Scalar(self.radian)
    }

    /// Reduce the angle into `(-360°, 360°]`.
    ///
    /// Whole turns collapse to 0 unless `keep_max` is set, in which case a
    /// non-zero multiple of 360° stays at 360°. `keep_large` disables the
    /// reduction (only the integer snapping applies).
    pub fn simplify(&self, keep_max: bool, keep_large: bool) -> Self {
        let raw = snap(self.degree);
        let mut reduced = if keep_large { raw } else { raw % 360.0 };
        if reduced == 0.0 {
            // also clears a negative zero
            reduced = 0.0;
            if keep_max && raw != 0.0 && !keep_large {
                reduced = 360.0;
            }
        }
        let reduced = snap(reduced);

        if reduced == self.degree {
            return *self;
        }
        AngleMeasure::from_degree(reduced)
    }

    /// Same as `simplify(false, false)`.
    pub fn simplified(&self) -> Self {
        self.simplify(false, false)
    }

    /// The representative in `[0°, 360°)`.
    pub fn positive(&self) -> Self {
        let reduced = self.simplified();
        if reduced.degree < 0.0 {
            let shifted = snap(reduced.degree + 360.0);
            if shifted >= 360.0 {
                return AngleMeasure::ZERO;
            }
            return AngleMeasure::from_degree(shifted);
        }
        reduced
    }

    pub fn cos(&self) -> f64 {
        self.radian.cos()
    }

    pub fn sin(&self) -> f64 {
        self.radian.sin()
    }

    pub fn tan(&self) -> f64 {
        self.radian.tan()
    }

    /// Compare two angles modulo a full turn.
    pub fn is_almost_equal(&self, other: &AngleMeasure, epsilon: f64) -> bool {
        let a = self.positive().degree;
        let b = other.positive().degree;
        let diff = (a - b).abs();
        diff < epsilon || (360.0 - diff).abs() < epsilon
    }
}

fn snap(degree: f64) -> f64 {
    let rounded = degree.round();
    if (degree - rounded).abs() < SNAP_EPSILON {
        rounded
    } else {
        degree
    }
}

impl PartialEq for AngleMeasure {
    fn eq(&self, other: &Self) -> bool {
        self.degree == other.degree
    }
}

impl fmt::Display for AngleMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degree)
    }
}

impl Add for AngleMeasure {
    type Output = AngleMeasure;
    fn add(self, rhs: AngleMeasure) -> AngleMeasure {
        AngleMeasure::from_degree(self.degree + rhs.degree)
    }
}

impl Sub for AngleMeasure {
    type Output = AngleMeasure;
    fn sub(self, rhs: AngleMeasure) -> AngleMeasure {
        AngleMeasure::from_degree(self.degree - rhs.degree)
    }
}

impl Neg for AngleMeasure {
    type Output = AngleMeasure;
    fn neg(self) -> AngleMeasure {
        AngleMeasure {
            degree: -self.degree,
            radian: -self.radian,
        }
    }
}

impl Mul<f64> for AngleMeasure {
    type Output = AngleMeasure;
    fn mul(self, rhs: f64) -> AngleMeasure {
        AngleMeasure {
            degree: self.degree * rhs,
            radian: self.radian * rhs,
        }
    }
}

impl Div<f64> for AngleMeasure {
    type Output = AngleMeasure;
    fn div(self, rhs: f64) -> AngleMeasure {
        AngleMeasure {
            degree: self.degree / rhs,
            radian: self.radian / rhs,
        }
    }
}
