//! Rendering context - the resolved parameters every drawable sees

use std::cell::RefCell;

use crate::errors::Warning;
use crate::geometry::{AngleMeasure, BoundingBox, Point};
use crate::metrics::{MetricKind, TextMetrics};
use crate::types::Units;

use super::defaults;

/// Rendering context
///
/// Built by the canvas once the scale is fixed. Drawables get it by shared
/// reference; the non-fatal warnings they raise are collected here and
/// drained by the canvas after each pass.
pub struct RenderContext<'a> {
    /// Resolved scale
    pub units: Units,
    /// Rotation applied to the whole picture
    pub rotation: AngleMeasure,
    /// Samples for curves that do not fix their own count
    pub curve_samples: usize,
    metrics: &'a TextMetrics,
    warnings: RefCell<Vec<Warning>>,
}

impl<'a> RenderContext<'a> {
    pub fn new(units: Units, metrics: &'a TextMetrics) -> Self {
        Self {
            units,
            rotation: AngleMeasure::ZERO,
            curve_samples: defaults::CURVE_SAMPLES,
            metrics,
            warnings: RefCell::new(Vec::new()),
        }
    }

    pub fn with_rotation(mut self, rotation: AngleMeasure) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_curve_samples(mut self, samples: usize) -> Self {
        self.curve_samples = samples;
        self
    }

    pub fn metrics(&self) -> &TextMetrics {
        self.metrics
    }

    /// Record a non-fatal warning
    pub fn warn(&self, warning: Warning) {
        self.warnings.borrow_mut().push(warning);
    }

    pub fn take_warnings(&self) -> Vec<Warning> {
        let mut warnings = self.warnings.take();
        warnings.extend(self.metrics.take_warnings());
        warnings
    }

    /// Box of `text` centred on `anchor`, in abstract coordinates.
    ///
    /// Width and height come from the text metrics in centimetres and are
    /// converted with the current units.
    pub fn text_box(&self, text: &str, anchor: Point) -> BoundingBox {
        let width = self.metrics.measure(text, MetricKind::Width);
        let height = self.metrics.measure(text, MetricKind::Height) + self.metrics.measure(text, MetricKind::Depth);
        let half_w = self.units.x_from_cm(width) / 2.0;
        let half_h = self.units.y_from_cm(height) / 2.0;
        BoundingBox::from_point(anchor).grow(half_w, half_h)
    }
}
