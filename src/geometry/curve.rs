//! Parametric curves and their sampling into polylines.
//!
//! A curve is a pair of component functions `t -> Complex`. Evaluations may
//! come back with a small imaginary residue (square roots of slightly
//! negative numbers, typically); residues up to `1e-4` are dropped, larger
//! ones mark the parameter as outside the real domain of the curve.

use std::fmt;
use std::rc::Rc;

use glam::{DVec2, dvec2};

use super::point::Point;
use super::segment::Segment;
use crate::errors::{GeometryError, Warning};
use crate::types::{Complex, EPS_GEOMETRY, EPS_IMAGINARY};

/// Step used by the central differences.
const DIFF_STEP: f64 = 1e-5;

/// Simpson intervals for `arc_length`.
const SIMPSON_INTERVALS: usize = 200;

/// Oversampling factor of the dense pass in arc-length mode.
const DENSE_FACTOR: usize = 10;

type Component = Rc<dyn Fn(f64) -> Complex>;

/// How sample parameters are chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// Evenly spaced parameters.
    #[default]
    Uniform,
    /// Parameters chosen so that consecutive points are (approximately)
    /// equidistant along the curve.
    ArcLength,
}

/// The polyline produced by [`ParametricCurve::sample`].
#[derive(Clone, Debug, PartialEq)]
pub struct Sampling {
    pub points: Vec<Point>,
    /// Parameters dropped for their imaginary residue.
    pub discarded: usize,
    /// Parameters dropped because a component was infinite or NaN.
    pub non_finite: usize,
}

impl Sampling {
    /// The warnings to surface for this run, one per cause of dropped samples.
    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.discarded > 0 {
            warnings.push(Warning::ImaginaryResidue { count: self.discarded });
        }
        if self.non_finite > 0 {
            warnings.push(Warning::NonFiniteSample { count: self.non_finite });
        }
        warnings
    }
}

/// Outcome of evaluating the curve at one parameter.
enum Evaluation {
    Real(DVec2),
    Imaginary,
    NonFinite,
}

#[derive(Clone)]
pub struct ParametricCurve {
    x: Component,
    y: Component,
    name: Option<String>,
}

impl fmt::Debug for ParametricCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParametricCurve")
            .field("name", &self.name.as_deref().unwrap_or("<anonymous>"))
            .finish_non_exhaustive()
    }
}

impl ParametricCurve {
    /// Curve from real-valued component functions.
    pub fn new(x: impl Fn(f64) -> f64 + 'static, y: impl Fn(f64) -> f64 + 'static) -> Self {
        ParametricCurve::from_complex(move |t| Complex::real(x(t)), move |t| Complex::real(y(t)))
    }

    /// Curve whose components may carry an imaginary residue.
    pub fn from_complex(
        x: impl Fn(f64) -> Complex + 'static,
        y: impl Fn(f64) -> Complex + 'static,
    ) -> Self {
        ParametricCurve {
            x: Rc::new(x),
            y: Rc::new(y),
            name: None,
        }
    }

    /// Graph of `y = f(x)`, parametrised by `x`.
    pub fn graph(f: impl Fn(f64) -> f64 + 'static) -> Self {
        ParametricCurve::new(|t| t, f)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn evaluate(&self, t: f64) -> Evaluation {
        let (x, y) = ((self.x)(t), (self.y)(t));
        if ![x.re, x.im, y.re, y.im].iter().all(|v| v.is_finite()) {
            return Evaluation::NonFinite;
        }
        match (x.real_part(EPS_IMAGINARY), y.real_part(EPS_IMAGINARY)) {
            (Some(x), Some(y)) => Evaluation::Real(dvec2(x, y)),
            _ => Evaluation::Imaginary,
        }
    }

    fn eval(&self, t: f64) -> Option<DVec2> {
        match self.evaluate(t) {
            Evaluation::Real(p) => Some(p),
            Evaluation::Imaginary | Evaluation::NonFinite => None,
        }
    }

    /// The point at `t`, or `None` outside the real domain.
    pub fn point(&self, t: f64) -> Option<Point> {
        self.eval(t).map(Point::from_dvec2)
    }

    /// First derivative by central differences.
    pub fn derivative(&self, t: f64) -> Option<DVec2> {
        let ahead = self.eval(t + DIFF_STEP)?;
        let behind = self.eval(t - DIFF_STEP)?;
        Some((ahead - behind) / (2.0 * DIFF_STEP))
    }

    pub fn second_derivative(&self, t: f64) -> Option<DVec2> {
        // a coarser step keeps the cancellation error in check
        let h = DIFF_STEP * 100.0;
        let ahead = self.eval(t + h)?;
        let here = self.eval(t)?;
        let behind = self.eval(t - h)?;
        Some((ahead - here * 2.0 + behind) / (h * h))
    }

    pub fn speed(&self, t: f64) -> Option<f64> {
        self.derivative(t).map(DVec2::length)
    }

    /// Unit tangent vector anchored at the point `t`.
    pub fn tangent_vector(&self, t: f64) -> Result<Segment, GeometryError> {
        let (anchor, d) = self.anchor_and_derivative(t, "tangent vector")?;
        Ok(unit_vector_at(anchor, d))
    }

    /// Unit normal vector anchored at the point `t`.
    ///
    /// Of the two normals, the one whose inner product with the second
    /// derivative is non-positive is returned. This picks the outer side for
    /// a locally convex arc; it says nothing global about closed or
    /// self-intersecting curves. On a straight stretch the second derivative
    /// vanishes and the tangent turned clockwise is returned.
    pub fn normal_vector(&self, t: f64) -> Result<Segment, GeometryError> {
        let (anchor, d) = self.anchor_and_derivative(t, "normal vector")?;
        let normal = dvec2(d.y, -d.x);
        let curvature = self.second_derivative(t).unwrap_or(DVec2::ZERO);
        let outward = if normal.dot(curvature) <= 0.0 { normal } else { -normal };
        Ok(unit_vector_at(anchor, outward))
    }

    fn anchor_and_derivative(&self, t: f64, operation: &'static str) -> Result<(DVec2, DVec2), GeometryError> {
        let anchor = self
            .eval(t)
            .ok_or_else(|| GeometryError::degenerate_with(operation, format!("t = {t} is outside the real domain")))?;
        let d = self
            .derivative(t)
            .filter(|d| d.length() >= EPS_GEOMETRY)
            .ok_or_else(|| GeometryError::degenerate_with(operation, format!("the curve is stationary at t = {t}")))?;
        Ok((anchor, d))
    }

    /// Length of the arc between `a` and `b`, by composite Simpson on the
    /// speed. Parameters outside the real domain contribute nothing.
    pub fn arc_length(&self, a: f64, b: f64) -> f64 {
        let n = SIMPSON_INTERVALS;
        let h = (b - a) / n as f64;
        let speed = |t: f64| self.speed(t).unwrap_or(0.0);
        let mut sum = speed(a) + speed(b);
        for k in 1..n {
            let weight = if k % 2 == 1 { 4.0 } else { 2.0 };
            sum += weight * speed(a + k as f64 * h);
        }
        (sum * h / 3.0).abs()
    }

    /// Sample `n` points over `[t_min, t_max]`.
    ///
    /// Samples with an imaginary residue are dropped and counted; one
    /// [`Warning::ImaginaryResidue`] is logged per call. Infinite or NaN
    /// samples are counted apart and reported as [`Warning::NonFiniteSample`].
    pub fn sample(
        &self,
        t_min: f64,
        t_max: f64,
        n: usize,
        smoothing: Smoothing,
    ) -> Result<Sampling, GeometryError> {
        if n < 2 {
            return Err(GeometryError::degenerate_with("curve sampling", format!("{n} sample(s) requested")));
        }
        let params = match smoothing {
            Smoothing::Uniform => uniform(t_min, t_max, n),
            Smoothing::ArcLength => self.arc_length_params(t_min, t_max, n),
        };

        let mut points = Vec::with_capacity(n);
        let mut discarded = 0;
        let mut non_finite = 0;
        for t in params {
            match self.evaluate(t) {
                Evaluation::Real(p) => points.push(Point::from_dvec2(p)),
                Evaluation::Imaginary => discarded += 1,
                Evaluation::NonFinite => non_finite += 1,
            }
        }

        let sampling = Sampling {
            points,
            discarded,
            non_finite,
        };
        for warning in sampling.warnings() {
            crate::log::report(&warning);
        }
        crate::log::debug!(
            curve = ?self.name,
            kept = sampling.points.len(),
            discarded = sampling.discarded,
            non_finite = sampling.non_finite,
            "sampled curve"
        );
        Ok(sampling)
    }

    /// Invert the cumulative chord length of a dense uniform pass.
    fn arc_length_params(&self, t_min: f64, t_max: f64, n: usize) -> Vec<f64> {
        let dense = uniform(t_min, t_max, n * DENSE_FACTOR);
        let real: Vec<(f64, DVec2)> = dense.iter().filter_map(|&t| self.eval(t).map(|p| (t, p))).collect();
        if real.len() < 2 {
            return uniform(t_min, t_max, n);
        }

        let mut cumulative = Vec::with_capacity(real.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in real.windows(2) {
            total += pair[0].1.distance(pair[1].1);
            cumulative.push(total);
        }
        if total < EPS_GEOMETRY {
            return uniform(t_min, t_max, n);
        }

        let mut params = Vec::with_capacity(n);
        let mut j = 0;
        for k in 0..n {
            let target = total * k as f64 / (n - 1) as f64;
            while j + 2 < cumulative.len() && cumulative[j + 1] < target {
                j += 1;
            }
            let (s0, s1) = (cumulative[j], cumulative[j + 1]);
            let (t0, t1) = (real[j].0, real[j + 1].0);
            let frac = if s1 > s0 { ((target - s0) / (s1 - s0)).clamp(0.0, 1.0) } else { 0.0 };
            params.push(t0 + frac * (t1 - t0));
        }
        params
    }
}

fn uniform(t_min: f64, t_max: f64, n: usize) -> Vec<f64> {
    let step = (t_max - t_min) / (n - 1) as f64;
    (0..n)
        .map(|k| if k == n - 1 { t_max } else { t_min + k as f64 * step })
        .collect()
}

fn unit_vector_at(anchor: DVec2, direction: DVec2) -> Segment {
    let start = Point::from_dvec2(anchor);
    Segment::vector(start, Point::from_dvec2(anchor + direction.normalize()))
}
