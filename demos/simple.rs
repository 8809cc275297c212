use psgeom::{AngleMeasure, Canvas, CanvasOptions, Decoration, MarkPosition, Point, Segment};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let a = Point::new(0, 0);
    let b = Point::new(4, 1);
    let c = Point::new(1, 3);

    let mut canvas = Canvas::new(CanvasOptions::default().with_axes(true));
    for (from, to) in [(a, b), (b, c), (c, a)] {
        canvas.draw(Segment::new(from, to))?;
    }
    let median = Segment::vector(c, Segment::new(a, b).midpoint());
    canvas.draw(median)?;

    for (name, p, angle) in [("A", a, 225), ("B", b, -30), ("C", c, 90)] {
        let entry = canvas.draw(p)?;
        let position = MarkPosition::towards(AngleMeasure::from_degree(angle));
        canvas.decorate(entry, Decoration::mark(format!("${name}$"), position))?;
    }

    println!("{}", canvas.render_all()?);
    Ok(())
}
