//! psgeom: geometric value objects rendered to PSTricks.
//!
//! Build points, segments, vectors and parametric curves, draw them on a
//! [`Canvas`], and get back a `pspicture` ready to paste into a LaTeX
//! document. The canvas defers every layout decision (scale, default axes,
//! bounding box, text sizes) until all shapes are known:
//!
//! ```
//! use psgeom::{Canvas, Point, Segment};
//!
//! let mut canvas = Canvas::default();
//! canvas.draw(Segment::vector(Point::origin(), Point::new(1, 1)))?;
//! let markup = canvas.render_all()?;
//! assert!(markup.contains("\\psline[linecolor=black]{->}(0,0)(1,1)"));
//! # Ok::<(), psgeom::CanvasError>(())
//! ```
//!
//! Text sizes are only known to LaTeX. A canvas built with
//! [`TextMetrics::from_files`] emits the code that measures them and picks
//! the results up on the next run.

pub mod errors;
pub mod geometry;
pub mod log;
pub mod metrics;
pub mod render;
pub mod types;

pub use errors::{CanvasError, GeometryError, MetricsError, OversizedBoundingBox, Warning};
pub use geometry::{
    AngleMeasure, BoundingBox, BoundingBoxLimits, ConicEquation, Equation, LineEquation, Orientation,
    ParametricCurve, Point, Sampling, Segment, SegmentKind, Smoothing,
};
pub use metrics::{AuxFiles, MetricKind, TextMetrics, metric_id};
pub use render::{
    AxesShape, Canvas, CanvasOptions, CanvasState, CompositeShape, CurveShape, Decoration, Drawable, EntryId,
    LineStyle, MarkPosition, MarkupFragment, ObjectStyle, PointShape, RenderContext, SegmentShape, Shape,
    TextShape,
};
pub use types::{Complex, Scalar, Units};

/// Draw `shapes` on a default canvas and render it.
pub fn render_shapes<I, S>(shapes: I) -> Result<MarkupFragment, CanvasError>
where
    I: IntoIterator<Item = S>,
    S: Into<Shape>,
{
    let mut canvas = Canvas::default();
    for shape in shapes {
        canvas.draw(shape)?;
    }
    canvas.render_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_shapes_wraps_a_pspicture() {
        let out = render_shapes([Point::new(0, 0), Point::new(1, 1)]).unwrap();
        assert!(out.starts_with("\\psset{xunit=1cm,yunit=1cm}\n\\begin{pspicture}(-0.1,-0.1)(1.1,1.1)"));
        assert!(out.trim_end().ends_with("\\end{pspicture}"));
        assert_eq!(out.matches("\\psdots").count(), 2);
    }

    #[test]
    fn render_shapes_without_shapes() {
        let out = render_shapes(Vec::<Shape>::new()).unwrap();
        assert_eq!(
            out,
            "\\psset{xunit=1cm,yunit=1cm}\n\\begin{pspicture}(-0.1,-0.1)(0.1,0.1)\n\\end{pspicture}\n"
        );
    }
}
