//! Error and warning types with diagnostics using miette
//!
//! Fatal conditions are `GeometryError`, `CanvasError` and `MetricsError`.
//! Non-fatal conditions are `Warning`s: they are logged and collected on the
//! canvas, but never interrupt a render pass.

use miette::Diagnostic;
use thiserror::Error;

use crate::geometry::BoundingBox;
use crate::render::EntryId;
use crate::types::NumericError;

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors raised by the geometric value algebra
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("degenerate geometry: {operation}")]
    #[diagnostic(code(psgeom::geometry::degenerate))]
    Degenerate {
        operation: &'static str,
        #[help]
        details: Option<String>,
    },

    #[error("slope of a vertical segment from ({x}, {y1}) to ({x}, {y2})")]
    #[diagnostic(
        code(psgeom::geometry::vertical_slope),
        help("check `is_vertical()` first, or use `equation()` which handles vertical lines")
    )]
    VerticalSlope { x: f64, y1: f64, y2: f64 },

    #[error("projection direction is parallel to the target line")]
    #[diagnostic(code(psgeom::geometry::parallel_projection))]
    ParallelProjection,
}

impl GeometryError {
    pub(crate) fn degenerate(operation: &'static str) -> Self {
        GeometryError::Degenerate { operation, details: None }
    }

    pub(crate) fn degenerate_with(operation: &'static str, details: impl Into<String>) -> Self {
        GeometryError::Degenerate {
            operation,
            details: Some(details.into()),
        }
    }
}

// ============================================================================
// Canvas Errors
// ============================================================================

/// Errors raised by the canvas state machine
#[derive(Error, Diagnostic, Debug)]
pub enum CanvasError {
    #[error("scale changed after objects were drawn or the canvas was resolved")]
    #[diagnostic(
        code(psgeom::canvas::scale_after_draw),
        help("call `set_scale` once, before the first `draw`")
    )]
    ScaleAfterDraw,

    #[error("scale already set to xunit={xunit}, yunit={yunit}")]
    #[diagnostic(code(psgeom::canvas::scale_already_set))]
    ScaleAlreadySet { xunit: f64, yunit: f64 },

    #[error("invalid scale: {value} ({reason})")]
    #[diagnostic(code(psgeom::canvas::invalid_scale))]
    InvalidScale { value: f64, reason: NumericError },

    #[error("cannot {operation} while the canvas is {state}")]
    #[diagnostic(code(psgeom::canvas::invalid_state))]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("bounding box requested before `resolve()`")]
    #[diagnostic(code(psgeom::canvas::not_resolved))]
    NotResolved,

    #[error("unknown bucket: {name}")]
    #[diagnostic(
        code(psgeom::canvas::unknown_bucket),
        help("declare it with `Canvas::declare_bucket` first")
    )]
    UnknownBucket { name: String },

    #[error("bucket {name} is already part of a merged section")]
    #[diagnostic(code(psgeom::canvas::bucket_already_merged))]
    BucketAlreadyMerged { name: String },

    #[error("unknown entry: {entry}")]
    #[diagnostic(code(psgeom::canvas::unknown_entry))]
    UnknownEntry { entry: EntryId },

    #[error("bounding box of {entry} exceeds the acceptable limits: {bbox}")]
    #[diagnostic(code(psgeom::canvas::oversized_bounding_box))]
    Oversized {
        entry: EntryId,
        /// `Debug` rendering of the offending shape
        #[help]
        shape: String,
        bbox: BoundingBox,
    },

    #[error("bounding box of the default axes exceeds the acceptable limits: {bbox}")]
    #[diagnostic(
        code(psgeom::canvas::oversized_axes),
        help("widen `CanvasOptions::limits` or reduce `axes_margin`")
    )]
    AxesOversized { bbox: BoundingBox },

    #[error("geometry failure in the default axes")]
    #[diagnostic(code(psgeom::canvas::axes_geometry))]
    AxesGeometry {
        #[source]
        #[diagnostic_source]
        source: GeometryError,
    },

    #[error("geometry failure in {entry}")]
    #[diagnostic(code(psgeom::canvas::geometry))]
    Geometry {
        entry: EntryId,
        #[source]
        #[diagnostic_source]
        source: GeometryError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Metrics(#[from] MetricsError),
}

/// Raised by `BoundingBox::check_not_oversized` before an entry is known.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("bounding box {bbox} exceeds the acceptable limits")]
#[diagnostic(code(psgeom::bbox::oversized))]
pub struct OversizedBoundingBox {
    pub bbox: BoundingBox,
}

// ============================================================================
// Text Metrics Errors
// ============================================================================

/// Errors from the text-metrics side channel
#[derive(Error, Diagnostic, Debug)]
pub enum MetricsError {
    #[error("cannot access side-channel file {path}")]
    #[diagnostic(code(psgeom::metrics::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed side-channel file {path}: {message}")]
    #[diagnostic(
        code(psgeom::metrics::parse),
        help("delete the file and compile the document again")
    )]
    Parse { path: String, message: String },
}

// ============================================================================
// Warnings
// ============================================================================

/// Non-fatal conditions collected during a run
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("text metric {id} is not known yet")]
    #[diagnostic(
        code(psgeom::warning::missing_text_metric),
        severity(Warning),
        help("compile the LaTeX document and run again to pick up the measurement")
    )]
    MissingTextMetric { id: String },

    #[error("discarded {count} sample(s) with an imaginary part above tolerance")]
    #[diagnostic(
        code(psgeom::warning::imaginary_residue),
        severity(Warning),
        help("the curve is probably not real-valued on the whole parameter range")
    )]
    ImaginaryResidue { count: usize },

    #[error("discarded {count} sample(s) that evaluated to an infinite or NaN value")]
    #[diagnostic(
        code(psgeom::warning::non_finite_sample),
        severity(Warning),
        help("the curve probably has a pole or a division by zero in the parameter range")
    )]
    NonFiniteSample { count: usize },

    #[error("degenerate geometry in {operation}; value returned unchanged")]
    #[diagnostic(code(psgeom::warning::degenerate_geometry), severity(Warning))]
    DegenerateGeometry { operation: &'static str },
}
