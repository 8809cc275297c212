//! Numeric primitives for psgeom.
//!
//! `Scalar` stands in for the exact-arithmetic capability: an `f64` newtype
//! with the small surface geometry needs (arithmetic, comparison and
//! approximation to a number of digits). `Complex` carries the imaginary
//! residue some computations produce, and `Units` converts abstract
//! coordinates to centimetres.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Threshold for geometric decisions (vertical, horizontal, degenerate).
pub const EPS_GEOMETRY: f64 = 1e-4;

/// Imaginary parts up to this magnitude are treated as numerical noise.
pub const EPS_IMAGINARY: f64 = 1e-4;

/// Coordinates smaller than this are snapped to zero when a point is built.
pub const EPS_SNAP: f64 = 1e-5;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// A real number as seen by the geometry layer.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Scalar(pub f64);

impl Scalar {
    pub const ZERO: Scalar = Scalar(0.0);
    pub const ONE: Scalar = Scalar(1.0);

    /// Create a Scalar with validation (rejects NaN/infinite)
    #[inline]
    pub fn try_new(val: f64) -> Result<Scalar, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else {
            Ok(Scalar(val))
        }
    }

    /// Get the raw value
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Check if finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn abs(self) -> Scalar {
        Scalar(self.0.abs())
    }

    #[inline]
    pub fn min(self, other: Scalar) -> Scalar {
        Scalar(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Scalar) -> Scalar {
        Scalar(self.0.max(other.0))
    }

    /// Numeric approximation keeping `digits` significant decimal digits.
    pub fn approx(self, digits: u32) -> f64 {
        approx_digits(self.0, digits)
    }

    #[inline]
    pub fn is_almost_zero(self, epsilon: f64) -> bool {
        self.0.abs() < epsilon
    }

    #[inline]
    pub fn is_almost_equal(self, other: Scalar, epsilon: f64) -> bool {
        (self.0 - other.0).abs() < epsilon
    }

    /// Checked division returning None if the divisor is zero
    #[inline]
    pub fn checked_div(self, rhs: Scalar) -> Option<Scalar> {
        if rhs.0 == 0.0 {
            None
        } else {
            Some(Scalar(self.0 / rhs.0))
        }
    }
}

/// Round `value` to `digits` significant decimal digits.
pub fn approx_digits(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(digits as i32 - 1 - magnitude);
    (value * scale).round() / scale
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar(f64::from(v))
    }
}

impl From<Scalar> for f64 {
    fn from(s: Scalar) -> Self {
        s.0
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar { Scalar(self.0 + rhs.0) }
}
impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar { Scalar(self.0 - rhs.0) }
}
impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar { Scalar(self.0 * rhs.0) }
}
impl Mul<f64> for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: f64) -> Scalar { Scalar(self.0 * rhs) }
}
impl Div<f64> for Scalar {
    type Output = Scalar;
    fn div(self, rhs: f64) -> Scalar { Scalar(self.0 / rhs) }
}

// NOTE: Scalar / Scalar is intentionally NOT implemented as a trait.
// Use Scalar::checked_div() so a zero divisor cannot leak an infinity
// into the bounding boxes.

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar { Scalar(-self.0) }
}

impl AddAssign for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Scalar {
    fn sub_assign(&mut self, rhs: Scalar) {
        self.0 -= rhs.0;
    }
}

/// Result of a numeric evaluation that may carry an imaginary residue.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    pub const fn real(re: f64) -> Self {
        Complex { re, im: 0.0 }
    }

    /// The real part, or `None` when the imaginary residue exceeds `epsilon`.
    pub fn real_part(self, epsilon: f64) -> Option<f64> {
        if self.im.abs() > epsilon {
            None
        } else {
            Some(self.re)
        }
    }

    pub fn sqrt(self) -> Complex {
        let modulus = (self.re * self.re + self.im * self.im).sqrt();
        let re = ((modulus + self.re) / 2.0).sqrt();
        let im = ((modulus - self.re) / 2.0).sqrt();
        Complex { re, im: if self.im < 0.0 { -im } else { im } }
    }
}

impl From<f64> for Complex {
    fn from(v: f64) -> Self {
        Complex::real(v)
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;
    fn mul(self, rhs: f64) -> Complex {
        Complex::new(self.re * rhs, self.im * rhs)
    }
}

impl Div<f64> for Complex {
    type Output = Complex;
    fn div(self, rhs: f64) -> Complex {
        Complex::new(self.re / rhs, self.im / rhs)
    }
}

/// Scale factors from abstract coordinates to centimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Units {
    pub xunit: f64,
    pub yunit: f64,
}

impl Default for Units {
    fn default() -> Self {
        Units { xunit: 1.0, yunit: 1.0 }
    }
}

impl Units {
    /// Create Units with validation (rejects NaN, infinite, zero, negative)
    pub fn try_new(xunit: f64, yunit: f64) -> Result<Self, NumericError> {
        check_unit(xunit)?;
        check_unit(yunit)?;
        Ok(Units { xunit, yunit })
    }

    /// Horizontal length in centimetres to abstract coordinates.
    pub fn x_from_cm(&self, cm: f64) -> f64 {
        cm / self.xunit
    }

    /// Vertical length in centimetres to abstract coordinates.
    pub fn y_from_cm(&self, cm: f64) -> f64 {
        cm / self.yunit
    }
}

fn check_unit(value: f64) -> Result<(), NumericError> {
    if value.is_nan() {
        Err(NumericError::NaN)
    } else if value.is_infinite() {
        Err(NumericError::Infinite)
    } else if value == 0.0 {
        Err(NumericError::Zero)
    } else if value < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Scalar tests ====================

    #[test]
    fn scalar_try_new_rejects_nan() {
        assert_eq!(Scalar::try_new(f64::NAN), Err(NumericError::NaN));
    }

    #[test]
    fn scalar_try_new_rejects_infinity() {
        assert_eq!(Scalar::try_new(f64::INFINITY), Err(NumericError::Infinite));
        assert_eq!(Scalar::try_new(f64::NEG_INFINITY), Err(NumericError::Infinite));
    }

    #[test]
    fn scalar_arithmetic() {
        let a = Scalar(3.0);
        let b = Scalar(2.0);

        assert_eq!(a + b, Scalar(5.0));
        assert_eq!(a - b, Scalar(1.0));
        assert_eq!(a * b, Scalar(6.0));
        assert_eq!(a * 2.0, Scalar(6.0));
        assert_eq!(a / 2.0, Scalar(1.5));
        assert_eq!(-a, Scalar(-3.0));
    }

    #[test]
    fn scalar_checked_div_by_zero() {
        assert_eq!(Scalar(6.0).checked_div(Scalar(0.0)), None);
        assert_eq!(Scalar(6.0).checked_div(Scalar(2.0)), Some(Scalar(3.0)));
    }

    #[test]
    fn scalar_approx_keeps_significant_digits() {
        assert_eq!(Scalar(3.14159265).approx(3), 3.14);
        assert_eq!(Scalar(0.000123456).approx(2), 0.00012);
        assert_eq!(Scalar(0.0).approx(5), 0.0);
    }

    // ==================== Complex tests ====================

    #[test]
    fn complex_real_part_discards_residue() {
        assert_eq!(Complex::new(1.0, 1e-6).real_part(EPS_IMAGINARY), Some(1.0));
        assert_eq!(Complex::new(1.0, 0.01).real_part(EPS_IMAGINARY), None);
    }

    #[test]
    fn complex_sqrt_of_negative_is_imaginary() {
        let root = Complex::real(-4.0).sqrt();
        assert!(root.re.abs() < 1e-12);
        assert!((root.im - 2.0).abs() < 1e-12);
    }

    // ==================== Units tests ====================

    #[test]
    fn units_try_new_rejects_zero() {
        assert_eq!(Units::try_new(0.0, 1.0), Err(NumericError::Zero));
    }

    #[test]
    fn units_try_new_rejects_negative() {
        assert_eq!(Units::try_new(1.0, -2.0), Err(NumericError::Negative));
    }

    #[test]
    fn units_convert_centimetres() {
        let units = Units::try_new(2.0, 0.5).unwrap();
        assert_eq!(units.x_from_cm(1.0), 0.5);
        assert_eq!(units.y_from_cm(1.0), 2.0);
    }
}
