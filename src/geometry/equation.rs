//! Implicit equations of lines and conics, and their intersections.

use glam::dvec2;

use super::point::Point;
use crate::types::{Complex, EPS_GEOMETRY, EPS_IMAGINARY};

/// Determinants below this are treated as parallel lines.
const EPS_DETERMINANT: f64 = 1e-12;

/// `a·x + b·y + c = 0`, with `a² + b² = 1` and the first non-zero of `(a, b)`
/// positive, so that every line has exactly one representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineEquation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LineEquation {
    /// Normalise the given coefficients. `(a, b)` must not both be zero.
    pub(crate) fn new(a: f64, b: f64, c: f64) -> Self {
        let norm = a.hypot(b);
        let (mut a, mut b, mut c) = (a / norm, b / norm, c / norm);
        let leading = if a.abs() > EPS_DETERMINANT { a } else { b };
        if leading < 0.0 {
            a = -a;
            b = -b;
            c = -c;
        }
        LineEquation { a, b, c }
    }

    pub fn evaluate(&self, p: &Point) -> f64 {
        self.a * p.x().raw() + self.b * p.y().raw() + self.c
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.evaluate(p).abs() < EPS_GEOMETRY
    }

    /// Cramer's rule. Parallel (or identical) lines give `None`.
    pub fn intersect(&self, other: &LineEquation) -> Option<Point> {
        let det = self.a * other.b - other.a * self.b;
        if det.abs() < EPS_DETERMINANT {
            return None;
        }
        let x = (other.c * self.b - self.c * other.b) / det;
        let y = (other.a * self.c - self.a * other.c) / det;
        Some(Point::new(x, y))
    }
}

/// General conic `xx·x² + xy·xy + yy·y² + x·x + y·y + constant = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConicEquation {
    pub xx: f64,
    pub xy: f64,
    pub yy: f64,
    pub x: f64,
    pub y: f64,
    pub constant: f64,
}

impl ConicEquation {
    pub fn circle(center: Point, radius: f64) -> Self {
        let (cx, cy) = (center.x().raw(), center.y().raw());
        ConicEquation {
            xx: 1.0,
            xy: 0.0,
            yy: 1.0,
            x: -2.0 * cx,
            y: -2.0 * cy,
            constant: cx * cx + cy * cy - radius * radius,
        }
    }

    pub fn evaluate(&self, p: &Point) -> f64 {
        let (x, y) = (p.x().raw(), p.y().raw());
        self.xx * x * x + self.xy * x * y + self.yy * y * y + self.x * x + self.y * y + self.constant
    }

    /// Real intersections with a line; complex roots are discarded.
    pub fn intersect_line(&self, line: &LineEquation) -> Vec<Point> {
        // p(t) = p0 + t·d walks the line
        let p0 = dvec2(-line.a * line.c, -line.b * line.c);
        let d = dvec2(-line.b, line.a);

        let qa = self.xx * d.x * d.x + self.xy * d.x * d.y + self.yy * d.y * d.y;
        let qb = 2.0 * self.xx * p0.x * d.x
            + self.xy * (p0.x * d.y + p0.y * d.x)
            + 2.0 * self.yy * p0.y * d.y
            + self.x * d.x
            + self.y * d.y;
        let qc = self.evaluate(&Point::from_dvec2(p0));

        let roots: Vec<Complex> = if qa.abs() < EPS_DETERMINANT {
            if qb.abs() < EPS_DETERMINANT {
                Vec::new()
            } else {
                vec![Complex::real(-qc / qb)]
            }
        } else {
            let root = Complex::real(qb * qb - 4.0 * qa * qc).sqrt();
            let minus_b = Complex::real(-qb);
            vec![(minus_b - root) / (2.0 * qa), (minus_b + root) / (2.0 * qa)]
        };

        let points = roots
            .into_iter()
            .filter_map(|t| t.real_part(EPS_IMAGINARY))
            .map(|t| Point::from_dvec2(p0 + d * t))
            .collect();
        sorted_unique(points)
    }
}

/// The curves a segment can be intersected with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Equation {
    Line(LineEquation),
    Conic(ConicEquation),
}

impl Equation {
    /// Intersection points with `line`, sorted by ascending x.
    pub fn intersect_line(&self, line: &LineEquation) -> Vec<Point> {
        match self {
            Equation::Line(other) => other.intersect(line).into_iter().collect(),
            Equation::Conic(conic) => conic.intersect_line(line),
        }
    }
}

fn sorted_unique(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by(|p, q| {
        p.x()
            .raw()
            .total_cmp(&q.x().raw())
            .then_with(|| p.y().raw().total_cmp(&q.y().raw()))
    });
    points.dedup_by(|p, q| p.is_almost_equal(q, EPS_GEOMETRY));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_normalisation_prefers_positive_a() {
        let eq = LineEquation::new(-3.0, 4.0, 10.0);
        assert!((eq.a - 0.6).abs() < 1e-12);
        assert!((eq.b + 0.8).abs() < 1e-12);
        assert!((eq.c + 2.0).abs() < 1e-12);
    }

    #[test]
    fn line_contains_its_points() {
        let eq = LineEquation::new(1.0, 1.0, -2.0);
        assert!(eq.contains(&Point::new(1, 1)));
        assert!(!eq.contains(&Point::new(0, 0)));
    }

    #[test]
    fn identical_lines_have_no_single_intersection() {
        let eq = LineEquation::new(1.0, -1.0, 0.0);
        assert_eq!(eq.intersect(&eq), None);
    }

    #[test]
    fn tangent_line_touches_once() {
        let circle = ConicEquation::circle(Point::new(0, 0), 1.0);
        let tangent = LineEquation::new(0.0, 1.0, -1.0);
        let pts = circle.intersect_line(&tangent);
        assert_eq!(pts.len(), 1);
        assert!(pts[0].is_almost_equal(&Point::new(0, 1), 1e-9));
    }

    #[test]
    fn offset_circle_meets_diagonal() {
        let circle = ConicEquation::circle(Point::new(1, 1), 2f64.sqrt());
        let diagonal = LineEquation::new(1.0, -1.0, 0.0);
        let pts = Equation::Conic(circle).intersect_line(&diagonal);
        assert_eq!(pts.len(), 2);
        assert!(pts[0].is_almost_equal(&Point::new(0, 0), 1e-9));
        assert!(pts[1].is_almost_equal(&Point::new(2, 2), 1e-9));
        for p in &pts {
            assert!(circle.evaluate(p).abs() < 1e-9);
        }
    }

    #[test]
    fn degenerate_conic_behaves_like_a_line() {
        // x - 3 = 0 written as a conic
        let conic = ConicEquation { xx: 0.0, xy: 0.0, yy: 0.0, x: 1.0, y: 0.0, constant: -3.0 };
        let horizontal = LineEquation::new(0.0, 1.0, -2.0);
        let pts = conic.intersect_line(&horizontal);
        assert_eq!(pts.len(), 1);
        assert!(pts[0].is_almost_equal(&Point::new(3, 2), 1e-12));
    }
}
