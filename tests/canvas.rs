//! End-to-end canvas scenarios: resolve, render, state machine.

use std::rc::Rc;

use psgeom::{
    AngleMeasure, BoundingBox, BoundingBoxLimits, Canvas, CanvasError, CanvasOptions, CanvasState, Complex,
    CurveShape, Decoration, MarkPosition, ParametricCurve, Point, Segment, Shape, TextShape, Warning,
};

fn approx_box(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> BoundingBox {
    BoundingBox { xmin, xmax, ymin, ymax }
}

#[test]
fn single_point_at_origin() {
    let mut canvas = Canvas::default();
    canvas.draw(Point::origin()).unwrap();
    let bbox = canvas.resolve().unwrap();
    assert!(bbox.approx_eq(&approx_box(-0.1, 0.1, -0.1, 0.1), 1e-12), "{bbox}");

    let markup = canvas.render_all().unwrap();
    insta::assert_snapshot!(markup.trim_end(), @r"
    \psset{xunit=1cm,yunit=1cm}
    \begin{pspicture}(-0.1,-0.1)(0.1,0.1)
    % default
    \psdots[linecolor=black,dotstyle=*](0,0)
    \end{pspicture}
    ");
}

#[test]
fn draw_after_resolve_is_rejected() {
    let mut canvas = Canvas::default();
    canvas.draw(Point::new(1, 1)).unwrap();
    canvas.resolve().unwrap();

    let err = canvas.draw(Point::new(2, 2)).unwrap_err();
    assert!(matches!(
        err,
        CanvasError::InvalidState { operation: "draw", state: "resolved" }
    ));
    assert!(matches!(canvas.set_scale(2.0, 2.0), Err(CanvasError::ScaleAfterDraw)));
    assert_eq!(canvas.len(), 1);
}

#[test]
fn scale_after_resolve_on_empty_canvas() {
    let mut canvas = Canvas::default();
    canvas.resolve().unwrap();
    assert!(matches!(canvas.set_scale(2.0, 2.0), Err(CanvasError::ScaleAfterDraw)));
}

#[test]
fn scale_reaches_the_markup() {
    let mut canvas = Canvas::default();
    canvas.set_scale(2.0, 0.5).unwrap();
    canvas.draw(Segment::new(Point::new(0, 0), Point::new(3, 4))).unwrap();
    let markup = canvas.render_all().unwrap();
    assert!(markup.starts_with("\\psset{xunit=2cm,yunit=0.5cm}\n"));
    assert!(markup.contains("\\psline[linecolor=black](0,0)(3,4)"));
}

#[test]
fn default_axes_fit_the_math_box() {
    let mut canvas = Canvas::new(CanvasOptions::default().with_axes(true));
    canvas.draw(Point::new(1, 2)).unwrap();
    let markup = canvas.render_all().unwrap();
    insta::assert_snapshot!(markup.trim_end(), @r"
    \psset{xunit=1cm,yunit=1cm}
    \begin{pspicture}(-0.6,-0.6)(1.6,2.6)
    % axes
    \psline[linecolor=black]{->}(-0.5,0)(1.5,0)
    \psline[linecolor=black]{->}(0,-0.5)(0,2.5)
    % default
    \psdots[linecolor=black,dotstyle=*](1,2)
    \end{pspicture}
    ");
}

#[test]
fn merged_buckets_share_one_section() {
    let mut canvas = Canvas::default();
    canvas.declare_bucket("labels").unwrap();
    canvas
        .draw_in(Segment::new(Point::new(-1, -1), Point::new(1, -1)), "grid")
        .unwrap();
    canvas.draw(Point::origin()).unwrap();
    canvas.draw_in(TextShape::new(Point::new(0, 1), "$A$"), "labels").unwrap();
    canvas.merge_buckets(&["grid", "labels"], "background").unwrap();

    let markup = canvas.render_all().unwrap();
    insta::assert_snapshot!(markup.trim_end(), @r"
    \psset{xunit=1cm,yunit=1cm}
    \begin{pspicture}(-1.1,-1.1)(1.1,1.2)
    % background
    % -- grid
    \psline[linecolor=black](-1,-1)(1,-1)
    % -- labels
    \rput(0,1){$A$}
    % default
    \psdots[linecolor=black,dotstyle=*](0,0)
    \end{pspicture}
    ");
    assert_eq!(canvas.warnings().len(), 1);
    assert!(matches!(canvas.warnings()[0], Warning::MissingTextMetric { .. }));
}

#[test]
fn merging_twice_is_rejected() {
    let mut canvas = Canvas::default();
    canvas.merge_buckets(&["grid", "axes"], "frame").unwrap();
    assert!(matches!(
        canvas.merge_buckets(&["axes", "default"], "other"),
        Err(CanvasError::BucketAlreadyMerged { name }) if name == "axes"
    ));
    assert!(matches!(
        canvas.merge_buckets(&["nowhere"], "other"),
        Err(CanvasError::UnknownBucket { .. })
    ));
}

#[test]
fn bucket_listed_twice_in_one_merge_is_rejected() {
    let mut canvas = Canvas::default();
    canvas.draw_in(Point::new(1, 1), "grid").unwrap();
    assert!(matches!(
        canvas.merge_buckets(&["grid", "grid"], "background"),
        Err(CanvasError::BucketAlreadyMerged { name }) if name == "grid"
    ));
    let markup = canvas.render_all().unwrap();
    assert_eq!(markup.matches("\\psdots").count(), 1);
    assert!(!markup.contains("% background"));
}

#[test]
fn marks_follow_their_entry() {
    let mut canvas = Canvas::default();
    let id = canvas.draw(Point::new(1, 2)).unwrap();
    canvas
        .decorate(id, Decoration::mark("$P$", MarkPosition::towards(AngleMeasure::from_degree(90))))
        .unwrap();
    let markup = canvas.render_all().unwrap();
    assert!(markup.contains("\\psdots[linecolor=black,dotstyle=*](1,2)\n\\rput(1,2.3){$P$}"));
}

#[test]
fn oversized_entry_aborts_resolution() {
    let options = CanvasOptions::default().with_limits(BoundingBoxLimits::symmetric(10.0));
    let mut canvas = Canvas::new(options);
    canvas.draw(Point::new(1, 1)).unwrap();
    let runaway = canvas.draw(Segment::new(Point::new(0, 0), Point::new(20, 0))).unwrap();

    match canvas.resolve() {
        Err(CanvasError::Oversized { entry, shape, bbox }) => {
            assert_eq!(entry, runaway);
            assert!(shape.contains("SegmentShape"), "{shape}");
            assert_eq!(bbox.xmax, 20.0);
        }
        other => panic!("expected an oversized error, got {other:?}"),
    }
    assert_eq!(canvas.state(), CanvasState::Accumulating);
}

#[test]
fn oversized_default_axes_leave_the_canvas_untouched() {
    let options = CanvasOptions::default()
        .with_axes(true)
        .with_limits(BoundingBoxLimits::symmetric(0.1));
    let mut canvas = Canvas::new(options);

    for _ in 0..2 {
        match canvas.resolve() {
            Err(CanvasError::AxesOversized { bbox }) => {
                assert!(bbox.approx_eq(&approx_box(-0.5, 0.5, -0.5, 0.5), 1e-12), "{bbox}");
            }
            other => panic!("expected oversized axes, got {other:?}"),
        }
        assert_eq!(canvas.len(), 0);
        assert_eq!(canvas.state(), CanvasState::Accumulating);
    }
    assert!(canvas.set_scale(2.0, 2.0).is_ok());
}

#[test]
fn failed_resolution_adds_no_axes() {
    let options = CanvasOptions::default()
        .with_axes(true)
        .with_limits(BoundingBoxLimits::symmetric(10.0));
    let mut canvas = Canvas::new(options);
    let runaway = canvas.draw(Segment::new(Point::new(0, 0), Point::new(20, 0))).unwrap();

    for _ in 0..2 {
        assert!(matches!(
            canvas.resolve(),
            Err(CanvasError::Oversized { entry, .. }) if entry == runaway
        ));
        assert_eq!(canvas.len(), 1);
    }
}

#[test]
fn default_axes_are_added_once() {
    let mut canvas = Canvas::new(CanvasOptions::default().with_axes(true));
    canvas.draw(Point::new(1, 1)).unwrap();
    canvas.resolve().unwrap();
    canvas.resolve().unwrap();
    assert_eq!(canvas.len(), 2);
    let markup = canvas.render_all().unwrap();
    assert_eq!(markup.matches("{->}").count(), 2);
}

#[test]
fn degenerate_normalize_reaches_the_canvas_warnings() {
    psgeom::log::take_reported();
    let tiny = Segment::vector(Point::new(0, 0), Point::new(0.0001, 0.0));
    let mut canvas = Canvas::default();
    canvas.draw(tiny.normalize(1.0)).unwrap();
    canvas.resolve().unwrap();
    assert_eq!(
        canvas.warnings(),
        &[Warning::DegenerateGeometry { operation: "normalize" }]
    );
}

#[test]
fn pole_of_a_curve_is_reported_as_non_finite() {
    let options = CanvasOptions::default().with_curve_samples(5);
    let mut canvas = Canvas::new(options);
    canvas
        .draw(CurveShape::new(ParametricCurve::graph(|x| 1.0 / x), -1.0, 1.0))
        .unwrap();
    canvas.resolve().unwrap();
    assert!(canvas.warnings().contains(&Warning::NonFiniteSample { count: 1 }));
    assert!(
        !canvas
            .warnings()
            .iter()
            .any(|w| matches!(w, Warning::ImaginaryResidue { .. }))
    );
}

#[test]
fn geometry_failure_names_the_entry() {
    let nowhere = ParametricCurve::from_complex(|t| Complex::new(t, 1.0), |t| Complex::real(t));
    let mut canvas = Canvas::default();
    canvas.draw(Point::origin()).unwrap();
    let id = canvas.draw(CurveShape::new(nowhere, 0.0, 1.0)).unwrap();
    match canvas.render_all() {
        Err(CanvasError::Geometry { entry, .. }) => assert_eq!(entry, id),
        other => panic!("expected a geometry error, got {other:?}"),
    }
    assert!(canvas.warnings().contains(&Warning::ImaginaryResidue { count: 100 }));
}

#[test]
fn render_all_is_stable() {
    let mut canvas = Canvas::default();
    canvas.draw(Segment::vector(Point::new(0, 0), Point::new(1, 0))).unwrap();
    let first = canvas.render_all().unwrap();
    assert_eq!(canvas.state(), CanvasState::Rendered);
    let second = canvas.render_all().unwrap();
    assert_eq!(first, second);
    assert!(canvas.resolve().is_ok());
}

#[test]
fn shared_shape_in_two_canvases() {
    let shape: Rc<Shape> = Rc::new(Segment::new(Point::new(0, 0), Point::new(1, 1)).into());

    let mut small = Canvas::default();
    small.draw_shared(Rc::clone(&shape), "default").unwrap();
    let mut large = Canvas::default();
    large.set_scale(3.0, 3.0).unwrap();
    large.draw_shared(Rc::clone(&shape), "default").unwrap();

    let a = small.render_all().unwrap();
    let b = large.render_all().unwrap();
    assert_eq!(small.bounding_box().unwrap(), large.bounding_box().unwrap());
    assert!(a.contains("xunit=1cm"));
    assert!(b.contains("xunit=3cm"));
    assert_eq!(Rc::strong_count(&shape), 3);
}

#[test]
fn curve_renders_as_polyline() {
    let options = CanvasOptions::default().with_curve_samples(5);
    let mut canvas = Canvas::new(options);
    canvas
        .draw(CurveShape::new(ParametricCurve::graph(|x| 2.0 * x), 0.0, 1.0))
        .unwrap();
    let markup = canvas.render_all().unwrap();
    assert!(markup.contains("\\psline[linecolor=black](0,0)(0.25,0.5)(0.5,1)(0.75,1.5)(1,2)"));
}
