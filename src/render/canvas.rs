//! The canvas: accumulate draw requests, resolve the layout, render markup
//!
//! A canvas moves one way through three states:
//! - `Accumulating`: shapes are drawn into buckets, the scale may be set once
//!   before the first draw.
//! - `Resolved`: the math box, default axes, scale and final bounding box are
//!   fixed. Nothing can be drawn anymore.
//! - `Rendered`: the markup document is produced and cached.

use std::rc::Rc;

use crate::errors::{CanvasError, GeometryError, Warning};
use crate::geometry::{AngleMeasure, BoundingBox, BoundingBoxLimits, Point};
use crate::metrics::TextMetrics;
use crate::types::{EPS_GEOMETRY, Units};

use super::context::RenderContext;
use super::defaults;
use super::markup::{END_PSPICTURE, begin_pspicture, psset_units, rotate_about_origin, rput};
use super::separator::{self, Section, SeparatorList};
use super::shapes::{AxesShape, Drawable, Shape};
use super::types::{Decoration, DecorationSet, EntryId, MarkupFragment};

/// Canvas configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasOptions {
    /// Added around the final bounding box
    pub margin: f64,
    /// Draw default axes sized to the math bounding box
    pub axes: bool,
    /// Added around the math bounding box when sizing the axes
    pub axes_margin: f64,
    /// Where the default axes cross
    pub axes_origin: Point,
    /// Region every entry must stay within
    pub limits: BoundingBoxLimits,
    /// Samples for curves that do not fix their own count
    pub curve_samples: usize,
    /// Rotation of the whole picture about the origin
    pub rotation: AngleMeasure,
    /// Width in cm the math box is scaled to when no scale was set
    pub fit_width: Option<f64>,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            margin: defaults::MARGIN,
            axes: false,
            axes_margin: defaults::AXES_MARGIN,
            axes_origin: Point::origin(),
            limits: BoundingBoxLimits::default(),
            curve_samples: defaults::CURVE_SAMPLES,
            rotation: AngleMeasure::ZERO,
            fit_width: None,
        }
    }
}

impl CanvasOptions {
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_axes(mut self, axes: bool) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_axes_margin(mut self, axes_margin: f64) -> Self {
        self.axes_margin = axes_margin;
        self
    }

    pub fn with_axes_origin(mut self, origin: Point) -> Self {
        self.axes_origin = origin;
        self
    }

    pub fn with_limits(mut self, limits: BoundingBoxLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_curve_samples(mut self, samples: usize) -> Self {
        self.curve_samples = samples;
        self
    }

    pub fn with_rotation(mut self, rotation: AngleMeasure) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_fit_width(mut self, cm: f64) -> Self {
        self.fit_width = Some(cm);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasState {
    Accumulating,
    Resolved,
    Rendered,
}

impl CanvasState {
    fn name(self) -> &'static str {
        match self {
            CanvasState::Accumulating => "accumulating",
            CanvasState::Resolved => "resolved",
            CanvasState::Rendered => "rendered",
        }
    }
}

#[derive(Debug)]
struct Entry {
    id: EntryId,
    shape: Rc<Shape>,
    decorations: DecorationSet,
}

impl Entry {
    /// Shape box plus decoration boxes
    fn bounding_box(&self, ctx: &RenderContext<'_>) -> Result<BoundingBox, GeometryError> {
        let mut bbox = self.shape.bounding_box(ctx)?;
        let anchor = self.shape.anchor();
        for decoration in self.decorations.iter() {
            match decoration {
                Decoration::Mark { text, position } => {
                    bbox.add_box(&ctx.text_box(text, position.resolve(anchor)));
                }
            }
        }
        Ok(bbox)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<MarkupFragment, GeometryError> {
        let mut parts = Vec::with_capacity(1 + self.decorations.len());
        let body = self.shape.render(ctx)?;
        if !body.is_empty() {
            parts.push(body);
        }
        let anchor = self.shape.anchor();
        for decoration in self.decorations.iter() {
            match decoration {
                Decoration::Mark { text, position } => parts.push(rput(&position.resolve(anchor), text)),
            }
        }
        Ok(parts.join("\n"))
    }
}

#[derive(Debug, Clone, Copy)]
struct Resolution {
    bbox: BoundingBox,
    math_bbox: BoundingBox,
}

/// A picture under construction
pub struct Canvas {
    options: CanvasOptions,
    units: Units,
    scale_set: bool,
    entries: Vec<Entry>,
    separators: SeparatorList,
    metrics: TextMetrics,
    state: CanvasState,
    resolution: Option<Resolution>,
    output: Option<MarkupFragment>,
    warnings: Vec<Warning>,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new(CanvasOptions::default())
    }
}

impl Canvas {
    pub fn new(options: CanvasOptions) -> Self {
        Canvas::with_metrics(options, TextMetrics::in_memory())
    }

    pub fn with_metrics(options: CanvasOptions, metrics: TextMetrics) -> Self {
        Self {
            options,
            units: Units::default(),
            scale_set: false,
            entries: Vec::new(),
            separators: SeparatorList::new(),
            metrics,
            state: CanvasState::Accumulating,
            resolution: None,
            output: None,
            warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> CanvasState {
        self.state
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    /// Non-fatal diagnostics collected so far, without duplicates
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require_accumulating(&self, operation: &'static str) -> Result<(), CanvasError> {
        if self.state == CanvasState::Accumulating {
            Ok(())
        } else {
            Err(CanvasError::InvalidState {
                operation,
                state: self.state.name(),
            })
        }
    }

    /// Fix the scale. Only once, and only before the first draw.
    pub fn set_scale(&mut self, xunit: f64, yunit: f64) -> Result<(), CanvasError> {
        if self.state != CanvasState::Accumulating || !self.entries.is_empty() {
            return Err(CanvasError::ScaleAfterDraw);
        }
        if self.scale_set {
            return Err(CanvasError::ScaleAlreadySet {
                xunit: self.units.xunit,
                yunit: self.units.yunit,
            });
        }
        Units::try_new(xunit, 1.0).map_err(|reason| CanvasError::InvalidScale { value: xunit, reason })?;
        self.units =
            Units::try_new(xunit, yunit).map_err(|reason| CanvasError::InvalidScale { value: yunit, reason })?;
        self.scale_set = true;
        crate::log::debug!(xunit, yunit, "scale set");
        Ok(())
    }

    /// Draw into the `default` bucket
    pub fn draw(&mut self, shape: impl Into<Shape>) -> Result<EntryId, CanvasError> {
        self.draw_in(shape, separator::DEFAULT)
    }

    pub fn draw_in(&mut self, shape: impl Into<Shape>, bucket: &str) -> Result<EntryId, CanvasError> {
        self.draw_shared(Rc::new(shape.into()), bucket)
    }

    /// Draw a shape that may also be drawn elsewhere
    pub fn draw_shared(&mut self, shape: Rc<Shape>, bucket: &str) -> Result<EntryId, CanvasError> {
        self.require_accumulating("draw")?;
        if !self.separators.contains(bucket) {
            return Err(CanvasError::UnknownBucket {
                name: bucket.to_string(),
            });
        }
        Ok(self.push_entry(shape, bucket))
    }

    fn push_entry(&mut self, shape: Rc<Shape>, bucket: &str) -> EntryId {
        let id = EntryId(self.entries.len());
        self.separators.push(bucket, id);
        self.entries.push(Entry {
            id,
            shape,
            decorations: DecorationSet::default(),
        });
        id
    }

    /// Attach a decoration to a drawn entry
    pub fn decorate(&mut self, entry: EntryId, decoration: Decoration) -> Result<(), CanvasError> {
        self.require_accumulating("decorate")?;
        let target = self
            .entries
            .get_mut(entry.0)
            .ok_or(CanvasError::UnknownEntry { entry })?;
        target.decorations.push(decoration);
        Ok(())
    }

    /// Add a bucket rendered after `default` and previously declared buckets
    pub fn declare_bucket(&mut self, name: &str) -> Result<(), CanvasError> {
        self.require_accumulating("declare a bucket")?;
        self.separators.declare(name);
        Ok(())
    }

    /// Render `buckets` together as one section called `into`
    pub fn merge_buckets(&mut self, buckets: &[&str], into: &str) -> Result<(), CanvasError> {
        if self.state == CanvasState::Rendered {
            return Err(CanvasError::InvalidState {
                operation: "merge buckets",
                state: self.state.name(),
            });
        }
        for (i, name) in buckets.iter().enumerate() {
            if !self.separators.contains(name) {
                return Err(CanvasError::UnknownBucket { name: name.to_string() });
            }
            if self.separators.is_merged(name) || buckets[..i].contains(name) {
                return Err(CanvasError::BucketAlreadyMerged { name: name.to_string() });
            }
        }
        if !buckets.is_empty() {
            self.separators.merge(buckets, into);
        }
        Ok(())
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext::new(self.units, &self.metrics)
            .with_rotation(self.options.rotation)
            .with_curve_samples(self.options.curve_samples)
    }

    /// Keep `warnings` and whatever was reported through `log::report`
    /// meanwhile, without duplicates.
    fn push_warnings(&mut self, warnings: Vec<Warning>) {
        for warning in warnings.into_iter().chain(crate::log::take_reported()) {
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
    }

    fn math_pass(&self) -> (Result<BoundingBox, CanvasError>, Vec<Warning>) {
        let ctx = self.context();
        let mut math = BoundingBox::EMPTY;
        let mut result = Ok(());
        for entry in self.entries.iter().filter(|e| e.shape.takes_math_bounding_box()) {
            match entry.shape.math_bounding_box(&ctx) {
                Ok(bbox) => math.add_box(&bbox),
                Err(source) => {
                    result = Err(CanvasError::Geometry { entry: entry.id, source });
                    break;
                }
            }
        }
        (result.map(|()| math), ctx.take_warnings())
    }

    fn full_pass(&self, axes: Option<&Shape>) -> (Result<BoundingBox, CanvasError>, Vec<Warning>) {
        let ctx = self.context();
        let result = self.fold_full_boxes(&ctx, axes);
        (result, ctx.take_warnings())
    }

    /// Union of every entry box, plus the default axes not committed yet.
    fn fold_full_boxes(&self, ctx: &RenderContext<'_>, axes: Option<&Shape>) -> Result<BoundingBox, CanvasError> {
        let rotated = !self.options.rotation.degree().is_almost_zero(EPS_GEOMETRY);
        let mut total = BoundingBox::EMPTY;
        for entry in &self.entries {
            let mut bbox = entry
                .bounding_box(ctx)
                .map_err(|source| CanvasError::Geometry { entry: entry.id, source })?;
            if rotated {
                bbox = bbox.rotate(self.options.rotation);
            }
            bbox.check_not_oversized(&self.options.limits)
                .map_err(|e| CanvasError::Oversized {
                    entry: entry.id,
                    shape: format!("{:?}", entry.shape),
                    bbox: e.bbox,
                })?;
            total.add_box(&bbox);
        }
        if let Some(axes) = axes {
            let mut bbox = axes
                .bounding_box(ctx)
                .map_err(|source| CanvasError::AxesGeometry { source })?;
            if rotated {
                bbox = bbox.rotate(self.options.rotation);
            }
            bbox.check_not_oversized(&self.options.limits)
                .map_err(|e| CanvasError::AxesOversized { bbox: e.bbox })?;
            total.add_box(&bbox);
        }
        Ok(total)
    }

    /// Fix the layout: math box, scale, default axes and final box
    ///
    /// Resolving twice is a no-op returning the same box.
    pub fn resolve(&mut self) -> Result<BoundingBox, CanvasError> {
        if self.state != CanvasState::Accumulating {
            return self.bounding_box();
        }

        let (math, warnings) = self.math_pass();
        self.push_warnings(warnings);
        let math_bbox = math?;

        if let Some(width) = self.options.fit_width {
            if !self.scale_set && math_bbox.width() > EPS_GEOMETRY {
                let unit = width / math_bbox.width();
                self.units =
                    Units::try_new(unit, unit).map_err(|reason| CanvasError::InvalidScale { value: unit, reason })?;
                crate::log::debug!(unit, "scale fitted to width");
            }
        }

        // committed to the log only once the whole resolution succeeds
        let axes = self.options.axes.then(|| {
            let origin = self.options.axes_origin;
            let mut span = math_bbox;
            span.add_point(origin);
            let span = span.grow(self.options.axes_margin, self.options.axes_margin);
            Shape::from(AxesShape::new(origin, span))
        });

        let (full, warnings) = self.full_pass(axes.as_ref());
        self.push_warnings(warnings);
        let full = full?;
        if let Some(axes) = axes {
            self.push_entry(Rc::new(axes), separator::AXES);
        }

        let bbox = if full.is_empty() {
            BoundingBox::from_point(Point::origin())
        } else {
            full
        }
        .grow(self.options.margin, self.options.margin);

        crate::log::debug!(entries = self.entries.len(), %bbox, %math_bbox, "canvas resolved");
        self.resolution = Some(Resolution { bbox, math_bbox });
        self.state = CanvasState::Resolved;
        Ok(bbox)
    }

    /// The final bounding box; only after `resolve()`
    pub fn bounding_box(&self) -> Result<BoundingBox, CanvasError> {
        self.resolution.map(|r| r.bbox).ok_or(CanvasError::NotResolved)
    }

    /// Union of the math boxes that size the axes; only after `resolve()`
    pub fn math_bounding_box(&self) -> Result<BoundingBox, CanvasError> {
        self.resolution.map(|r| r.math_bbox).ok_or(CanvasError::NotResolved)
    }

    fn render_body(&self, ctx: &RenderContext<'_>) -> Result<Vec<String>, CanvasError> {
        let render_entries = |ids: &[EntryId], lines: &mut Vec<String>| -> Result<bool, CanvasError> {
            let mut any = false;
            for id in ids {
                let entry = &self.entries[id.0];
                let fragment = entry
                    .render(ctx)
                    .map_err(|source| CanvasError::Geometry { entry: entry.id, source })?;
                if !fragment.is_empty() {
                    lines.push(fragment);
                    any = true;
                }
            }
            Ok(any)
        };

        let mut lines = Vec::new();
        for section in self.separators.sections() {
            match section {
                Section::Single { name, entries } => {
                    let mut body = Vec::new();
                    if render_entries(entries, &mut body)? {
                        lines.push(format!("% {name}"));
                        lines.extend(body);
                    }
                }
                Section::Merged { name, parts } => {
                    let mut merged = Vec::new();
                    for (part, entries) in parts {
                        let mut body = Vec::new();
                        if render_entries(entries, &mut body)? {
                            merged.push(format!("% -- {part}"));
                            merged.extend(body);
                        }
                    }
                    if !merged.is_empty() {
                        lines.push(format!("% {name}"));
                        lines.extend(merged);
                    }
                }
            }
        }
        Ok(lines)
    }

    fn render_pass(&self) -> (Result<Vec<String>, CanvasError>, Vec<Warning>) {
        let ctx = self.context();
        let result = self.render_body(&ctx);
        (result, ctx.take_warnings())
    }

    /// Produce the markup document, resolving first if needed
    ///
    /// Sections, in order: text-metric requests (when any), unit settings,
    /// `\begin{pspicture}`, the buckets, `\end{pspicture}`. A file-backed
    /// metrics cache also gets its request file written. Calling it again
    /// returns the same document.
    pub fn render_all(&mut self) -> Result<MarkupFragment, CanvasError> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }
        let bbox = self.resolve()?;

        let (body, warnings) = self.render_pass();
        self.push_warnings(warnings);
        let body = body?;

        let mut document = Vec::new();
        if let Some(requests) = self.metrics.requests_markup() {
            document.push(requests);
        }
        document.push(psset_units(&self.units));
        document.push(begin_pspicture(&bbox));
        if !body.is_empty() {
            let body = body.join("\n");
            let degrees = self.options.rotation.degree().raw();
            if self.options.rotation.degree().is_almost_zero(EPS_GEOMETRY) {
                document.push(body);
            } else {
                document.push(rotate_about_origin(degrees, &body));
            }
        }
        document.push(END_PSPICTURE.to_string());
        self.metrics.write_requests()?;

        let mut output = document.join("\n");
        output.push('\n');
        self.output = Some(output.clone());
        self.state = CanvasState::Rendered;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use crate::render::shapes::TextShape;
    use crate::render::types::MarkPosition;

    // ==================== State machine tests ====================

    #[test]
    fn scale_only_before_first_draw() {
        let mut canvas = Canvas::default();
        canvas.draw(Point::origin()).unwrap();
        assert!(matches!(canvas.set_scale(2.0, 2.0), Err(CanvasError::ScaleAfterDraw)));
    }

    #[test]
    fn scale_only_once() {
        let mut canvas = Canvas::default();
        canvas.set_scale(2.0, 3.0).unwrap();
        assert!(matches!(
            canvas.set_scale(1.0, 1.0),
            Err(CanvasError::ScaleAlreadySet { xunit, yunit }) if xunit == 2.0 && yunit == 3.0
        ));
    }

    #[test]
    fn invalid_scale_names_the_value() {
        let mut canvas = Canvas::default();
        assert!(matches!(
            canvas.set_scale(1.0, -2.0),
            Err(CanvasError::InvalidScale { value, .. }) if value == -2.0
        ));
        assert!(matches!(
            canvas.set_scale(f64::NAN, 1.0),
            Err(CanvasError::InvalidScale { .. })
        ));
        assert!(canvas.set_scale(1.0, 1.0).is_ok());
    }

    #[test]
    fn unknown_bucket_is_rejected() {
        let mut canvas = Canvas::default();
        assert!(matches!(
            canvas.draw_in(Point::origin(), "labels"),
            Err(CanvasError::UnknownBucket { .. })
        ));
        canvas.declare_bucket("labels").unwrap();
        assert!(canvas.draw_in(Point::origin(), "labels").is_ok());
    }

    #[test]
    fn bounding_box_requires_resolve() {
        let mut canvas = Canvas::default();
        assert!(matches!(canvas.bounding_box(), Err(CanvasError::NotResolved)));
        canvas.resolve().unwrap();
        assert!(canvas.bounding_box().is_ok());
    }

    #[test]
    fn empty_canvas_resolves_around_origin() {
        let mut canvas = Canvas::default();
        let bbox = canvas.resolve().unwrap();
        assert!(bbox.approx_eq(&BoundingBox { xmin: -0.1, xmax: 0.1, ymin: -0.1, ymax: 0.1 }, 1e-12));
    }

    #[test]
    fn decorate_unknown_entry() {
        let mut canvas = Canvas::default();
        let err = canvas
            .decorate(EntryId(7), Decoration::mark("A", MarkPosition::At(Point::origin())))
            .unwrap_err();
        assert!(matches!(err, CanvasError::UnknownEntry { entry } if entry == EntryId(7)));
    }

    // ==================== Layout tests ====================

    #[test]
    fn text_does_not_size_axes() {
        let options = CanvasOptions::default().with_axes(true).with_axes_margin(0.0);
        let mut canvas = Canvas::new(options);
        canvas.draw(Segment::new(Point::new(0, 0), Point::new(2, 1))).unwrap();
        canvas.draw(TextShape::new(Point::new(50, 50), "far away")).unwrap();
        let bbox = canvas.resolve().unwrap();
        let math = canvas.math_bounding_box().unwrap();
        assert_eq!(math, BoundingBox { xmin: 0.0, xmax: 2.0, ymin: 0.0, ymax: 1.0 });
        assert!(bbox.contains(&Point::new(50, 50)));
    }

    #[test]
    fn marks_count_in_the_full_box_only() {
        let mut canvas = Canvas::default();
        let id = canvas.draw(Point::new(1, 1)).unwrap();
        canvas
            .decorate(id, Decoration::mark("$P$", MarkPosition::At(Point::new(3, 1))))
            .unwrap();
        let bbox = canvas.resolve().unwrap();
        assert!(bbox.xmax > 3.0);
        assert_eq!(
            canvas.math_bounding_box().unwrap(),
            BoundingBox::from_point(Point::new(1, 1))
        );
    }

    #[test]
    fn fit_width_scales_the_math_box() {
        let mut canvas = Canvas::new(CanvasOptions::default().with_fit_width(10.0));
        canvas.draw(Segment::new(Point::new(0, 0), Point::new(4, 1))).unwrap();
        canvas.resolve().unwrap();
        assert_eq!(canvas.units(), Units { xunit: 2.5, yunit: 2.5 });
    }

    #[test]
    fn rotation_rotates_entry_boxes() {
        let options = CanvasOptions::default()
            .with_margin(0.0)
            .with_rotation(AngleMeasure::from_degree(90));
        let mut canvas = Canvas::new(options);
        canvas.draw(Segment::new(Point::new(0, 0), Point::new(2, 0))).unwrap();
        let bbox = canvas.resolve().unwrap();
        assert!(bbox.approx_eq(&BoundingBox { xmin: 0.0, xmax: 0.0, ymin: 0.0, ymax: 2.0 }, 1e-9));
        let out = canvas.render_all().unwrap();
        assert!(out.contains("\\rput{90}(0,0){"));
    }
}
