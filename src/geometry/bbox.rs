//! Axis-aligned bounding rectangles.

use std::fmt;

use super::angle::AngleMeasure;
use super::point::Point;
use crate::errors::OversizedBoundingBox;

/// Axis-aligned rectangle `[xmin, xmax] × [ymin, ymax]`.
///
/// The empty box is the sentinel `xmin = 1000 > xmax = -1000`; it is the
/// identity of [`BoundingBox::union`]. Every operation keeps `xmin <= xmax`
/// and `ymin <= ymax` for a non-empty box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::EMPTY
    }
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        xmin: 1000.0,
        xmax: -1000.0,
        ymin: 1000.0,
        ymax: -1000.0,
    };

    /// Box spanning two corners given in any order.
    pub fn new(p: Point, q: Point) -> Self {
        let (px, py, qx, qy) = (p.x().raw(), p.y().raw(), q.x().raw(), q.y().raw());
        BoundingBox {
            xmin: px.min(qx),
            xmax: px.max(qx),
            ymin: py.min(qy),
            ymax: py.max(qy),
        }
    }

    pub fn from_point(p: Point) -> Self {
        BoundingBox::new(p, p)
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bbox = BoundingBox::EMPTY;
        for p in points {
            bbox.add_point(*p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Smallest box containing both. Commutative and associative.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => *other,
            (_, true) => *self,
            _ => BoundingBox {
                xmin: self.xmin.min(other.xmin),
                xmax: self.xmax.max(other.xmax),
                ymin: self.ymin.min(other.ymin),
                ymax: self.ymax.max(other.ymax),
            },
        }
    }

    pub fn add_point(&mut self, p: Point) {
        *self = self.union(&BoundingBox::from_point(p));
    }

    pub fn add_box(&mut self, other: &BoundingBox) {
        *self = self.union(other);
    }

    /// Copy grown by `dx` on the left and right and by `dy` at the top and
    /// bottom. A negative amount shrinks, collapsing onto the centre rather
    /// than inverting. The empty box stays empty.
    pub fn grow(&self, dx: f64, dy: f64) -> BoundingBox {
        let mut grown = *self;
        grown.extend(dx, dy);
        grown
    }

    /// In-place form of [`BoundingBox::grow`].
    pub fn extend(&mut self, dx: f64, dy: f64) {
        if self.is_empty() {
            return;
        }
        let (cx, cy) = ((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0);
        self.xmin = (self.xmin - dx).min(cx);
        self.xmax = (self.xmax + dx).max(cx);
        self.ymin = (self.ymin - dy).min(cy);
        self.ymax = (self.ymax + dy).max(cy);
    }

    pub fn contains(&self, p: &Point) -> bool {
        let (x, y) = (p.x().raw(), p.y().raw());
        !self.is_empty() && self.xmin <= x && x <= self.xmax && self.ymin <= y && y <= self.ymax
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.xmax - self.xmin }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.ymax - self.ymin }
    }

    pub fn center(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        Some(Point::new((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0))
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.xmin, self.ymin),
            Point::new(self.xmax, self.ymin),
            Point::new(self.xmax, self.ymax),
            Point::new(self.xmin, self.ymax),
        ]
    }

    /// Box of the four corners rotated about the origin.
    pub fn rotate(&self, angle: AngleMeasure) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        let rotated = self.corners().map(|c| c.rotate(angle, Point::origin()));
        BoundingBox::from_points(&rotated)
    }

    pub fn approx_eq(&self, other: &BoundingBox, epsilon: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.is_empty() == other.is_empty();
        }
        (self.xmin - other.xmin).abs() < epsilon
            && (self.xmax - other.xmax).abs() < epsilon
            && (self.ymin - other.ymin).abs() < epsilon
            && (self.ymax - other.ymax).abs() < epsilon
    }

    /// Fails when an edge lies outside `limits` (or is not finite).
    pub fn check_not_oversized(&self, limits: &BoundingBoxLimits) -> Result<(), OversizedBoundingBox> {
        if self.is_empty() {
            return Ok(());
        }
        let edges = [self.xmin, self.xmax, self.ymin, self.ymax];
        let inside = edges.iter().all(|e| e.is_finite())
            && self.xmin >= limits.xmin
            && self.xmax <= limits.xmax
            && self.ymin >= limits.ymin
            && self.ymax <= limits.ymax;
        if inside {
            Ok(())
        } else {
            Err(OversizedBoundingBox { bbox: *self })
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<empty>");
        }
        write!(f, "[{}, {}] x [{}, {}]", self.xmin, self.xmax, self.ymin, self.ymax)
    }
}

/// The region a drawable may occupy before it is considered runaway.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBoxLimits {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BoundingBoxLimits {
    /// Symmetric limits `[-extent, extent]²`.
    pub fn symmetric(extent: f64) -> Self {
        BoundingBoxLimits {
            xmin: -extent,
            xmax: extent,
            ymin: -extent,
            ymax: extent,
        }
    }
}

impl Default for BoundingBoxLimits {
    fn default() -> Self {
        BoundingBoxLimits::symmetric(crate::render::defaults::BBOX_LIMIT)
    }
}
