use psgeom::{
    AuxFiles, Canvas, CanvasOptions, Complex, CurveShape, ObjectStyle, ParametricCurve, Point, Smoothing, TextShape,
    TextMetrics,
};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Run twice, compiling the printed picture with LaTeX in between, to
    // get the label sizes right.
    let dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let metrics = TextMetrics::from_files(AuxFiles::in_dir(&dir, "curves"))?;

    let mut canvas = Canvas::with_metrics(CanvasOptions::default().with_axes(true).with_fit_width(8.0), metrics);
    canvas.declare_bucket("labels")?;

    let spiral = ParametricCurve::new(|t| t * t.cos() / 4.0, |t| t * t.sin() / 4.0).with_name("spiral");
    canvas.draw(CurveShape::new(spiral, 0.0, 4.0 * std::f64::consts::PI).with_smoothing(Smoothing::ArcLength))?;

    // only real on [-1, 1]
    let half_circle = ParametricCurve::from_complex(Complex::real, |t| Complex::real(1.0 - t * t).sqrt());
    canvas.draw(
        CurveShape::new(half_circle, -1.5, 1.5)
            .with_samples(61)
            .with_style(ObjectStyle::default().with_color("blue")),
    )?;

    canvas.draw_in(TextShape::new(Point::new(0, 1.3), "$y=\\sqrt{1-x^2}$"), "labels")?;

    println!("{}", canvas.render_all()?);
    for warning in canvas.warnings() {
        eprintln!("{:?}", miette::Report::new(warning.clone()));
    }
    Ok(())
}
