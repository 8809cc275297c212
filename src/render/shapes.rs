//! Drawable shapes
//!
//! Each shape knows how to:
//! - Calculate its math bounding box (geometry only)
//! - Calculate its full bounding box (geometry plus typeset text)
//! - Render itself to PSTricks markup

use enum_dispatch::enum_dispatch;

use crate::errors::GeometryError;
use crate::geometry::{BoundingBox, ParametricCurve, Point, Segment, Smoothing};

use super::context::RenderContext;
use super::defaults;
use super::markup::{psdots, psline, rput};
use super::types::{MarkupFragment, ObjectStyle};

/// Common behavior for all shapes
#[enum_dispatch]
pub trait Drawable {
    /// Bounding box of the geometry alone
    fn math_bounding_box(&self, ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError>;

    /// Bounding box including typeset text
    fn bounding_box(&self, ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        self.math_bounding_box(ctx)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<MarkupFragment, GeometryError>;

    /// Whether the math bounding box takes part in sizing the default axes
    fn takes_math_bounding_box(&self) -> bool {
        true
    }

    /// Reference point for marks attached to the shape
    fn anchor(&self) -> Point;
}

// ============================================================================
// Shape Types
// ============================================================================

/// A dot
#[derive(Debug, Clone, PartialEq)]
pub struct PointShape {
    pub point: Point,
    pub style: ObjectStyle,
}

impl PointShape {
    pub fn new(point: Point) -> Self {
        Self {
            point,
            style: ObjectStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ObjectStyle) -> Self {
        self.style = style;
        self
    }
}

impl Drawable for PointShape {
    fn math_bounding_box(&self, _ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        Ok(BoundingBox::from_point(self.point))
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<MarkupFragment, GeometryError> {
        if self.style.invisible {
            return Ok(MarkupFragment::new());
        }
        let options = format!("{},dotstyle={}", self.style.options(), defaults::DOT_STYLE);
        Ok(psdots(&options, &self.point))
    }

    fn anchor(&self) -> Point {
        self.point
    }
}

/// A segment, or an arrow when the segment is a vector
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentShape {
    pub segment: Segment,
    pub style: ObjectStyle,
}

impl SegmentShape {
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            style: ObjectStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ObjectStyle) -> Self {
        self.style = style;
        self
    }

    fn arrows(&self) -> Option<&str> {
        match &self.style.arrows {
            Some(arrows) => Some(arrows.as_str()),
            None if self.segment.is_vector() => Some(defaults::VECTOR_ARROWS),
            None => None,
        }
    }
}

impl Drawable for SegmentShape {
    fn math_bounding_box(&self, _ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        Ok(BoundingBox::new(self.segment.start(), self.segment.end()))
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<MarkupFragment, GeometryError> {
        if self.style.invisible {
            return Ok(MarkupFragment::new());
        }
        let points = [self.segment.start(), self.segment.end()];
        Ok(psline(&self.style.options(), self.arrows(), &points))
    }

    fn anchor(&self) -> Point {
        self.segment.midpoint()
    }
}

/// A parametric curve drawn as a sampled polyline
#[derive(Debug, Clone)]
pub struct CurveShape {
    pub curve: ParametricCurve,
    pub t_min: f64,
    pub t_max: f64,
    /// Sample count; `None` uses the canvas setting
    pub samples: Option<usize>,
    pub smoothing: Smoothing,
    pub style: ObjectStyle,
}

impl CurveShape {
    pub fn new(curve: ParametricCurve, t_min: f64, t_max: f64) -> Self {
        Self {
            curve,
            t_min,
            t_max,
            samples: None,
            smoothing: Smoothing::Uniform,
            style: ObjectStyle::default(),
        }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_style(mut self, style: ObjectStyle) -> Self {
        self.style = style;
        self
    }

    /// The real samples, at least two of them.
    fn polyline(&self, ctx: &RenderContext<'_>) -> Result<Vec<Point>, GeometryError> {
        let n = self.samples.unwrap_or(ctx.curve_samples);
        let sampling = self.curve.sample(self.t_min, self.t_max, n, self.smoothing)?;
        for warning in sampling.warnings() {
            ctx.warn(warning);
        }
        if sampling.points.len() < 2 {
            return Err(GeometryError::degenerate_with(
                "curve sampling",
                format!(
                    "{} real sample(s) on [{}, {}]",
                    sampling.points.len(),
                    self.t_min,
                    self.t_max
                ),
            ));
        }
        Ok(sampling.points)
    }
}

impl Drawable for CurveShape {
    fn math_bounding_box(&self, ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        Ok(BoundingBox::from_points(&self.polyline(ctx)?))
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<MarkupFragment, GeometryError> {
        if self.style.invisible {
            return Ok(MarkupFragment::new());
        }
        let points = self.polyline(ctx)?;
        Ok(psline(&self.style.options(), self.style.arrows.as_deref(), &points))
    }

    fn anchor(&self) -> Point {
        self.curve.point(self.t_min).unwrap_or_default()
    }
}

/// Typeset text centred on a point
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub position: Point,
    pub text: String,
    pub style: ObjectStyle,
}

impl TextShape {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            style: ObjectStyle::default(),
        }
    }
}

impl Drawable for TextShape {
    fn math_bounding_box(&self, _ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        Ok(BoundingBox::from_point(self.position))
    }

    fn bounding_box(&self, ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        Ok(ctx.text_box(&self.text, self.position))
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<MarkupFragment, GeometryError> {
        if self.style.invisible {
            return Ok(MarkupFragment::new());
        }
        Ok(rput(&self.position, &self.text))
    }

    fn takes_math_bounding_box(&self) -> bool {
        false
    }

    fn anchor(&self) -> Point {
        self.position
    }
}

/// A pair of arrowed axes crossing at `origin`
#[derive(Debug, Clone, PartialEq)]
pub struct AxesShape {
    pub origin: Point,
    /// The region spanned; the axes run along its full width and height
    pub span: BoundingBox,
    pub style: ObjectStyle,
}

impl AxesShape {
    /// Axes through `origin` covering `span` (grown to contain the origin).
    pub fn new(origin: Point, span: BoundingBox) -> Self {
        let mut span = span;
        span.add_point(origin);
        Self {
            origin,
            span,
            style: ObjectStyle::default().with_arrows(defaults::VECTOR_ARROWS),
        }
    }

    pub fn with_style(mut self, style: ObjectStyle) -> Self {
        self.style = style;
        self
    }
}

impl Drawable for AxesShape {
    fn math_bounding_box(&self, _ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        Ok(self.span)
    }

    fn render(&self, _ctx: &RenderContext<'_>) -> Result<MarkupFragment, GeometryError> {
        if self.style.invisible {
            return Ok(MarkupFragment::new());
        }
        let (ox, oy) = (self.origin.x().raw(), self.origin.y().raw());
        let options = self.style.options();
        let arrows = self.style.arrows.as_deref();
        let horizontal = [Point::new(self.span.xmin, oy), Point::new(self.span.xmax, oy)];
        let vertical = [Point::new(ox, self.span.ymin), Point::new(ox, self.span.ymax)];
        Ok(format!(
            "{}\n{}",
            psline(&options, arrows, &horizontal),
            psline(&options, arrows, &vertical)
        ))
    }

    /// Axes follow the math box; they never size it.
    fn takes_math_bounding_box(&self) -> bool {
        false
    }

    fn anchor(&self) -> Point {
        self.origin
    }
}

/// Several shapes drawn as one
#[derive(Debug, Clone)]
pub struct CompositeShape {
    pub children: Vec<Shape>,
}

impl CompositeShape {
    pub fn new(children: Vec<Shape>) -> Self {
        Self { children }
    }

    pub fn push(&mut self, child: impl Into<Shape>) {
        self.children.push(child.into());
    }
}

impl Drawable for CompositeShape {
    fn math_bounding_box(&self, ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        let mut bbox = BoundingBox::EMPTY;
        for child in self.children.iter().filter(|c| c.takes_math_bounding_box()) {
            bbox.add_box(&child.math_bounding_box(ctx)?);
        }
        Ok(bbox)
    }

    fn bounding_box(&self, ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        let mut bbox = BoundingBox::EMPTY;
        for child in &self.children {
            bbox.add_box(&child.bounding_box(ctx)?);
        }
        Ok(bbox)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<MarkupFragment, GeometryError> {
        let mut parts = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let fragment = child.render(ctx)?;
            if !fragment.is_empty() {
                parts.push(fragment);
            }
        }
        Ok(parts.join("\n"))
    }

    fn takes_math_bounding_box(&self) -> bool {
        self.children.iter().any(Drawable::takes_math_bounding_box)
    }

    fn anchor(&self) -> Point {
        self.children.first().map(Drawable::anchor).unwrap_or_default()
    }
}

// ============================================================================
// Shape Enum
// ============================================================================

/// A shape enum wrapping all shape types
#[enum_dispatch(Drawable)]
#[derive(Debug, Clone)]
pub enum Shape {
    PointShape,
    SegmentShape,
    CurveShape,
    TextShape,
    AxesShape,
    CompositeShape,
}

impl From<Point> for Shape {
    fn from(point: Point) -> Self {
        PointShape::new(point).into()
    }
}

impl From<Segment> for Shape {
    fn from(segment: Segment) -> Self {
        SegmentShape::new(segment).into()
    }
}
