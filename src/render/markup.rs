//! PSTricks formatting helpers

use crate::geometry::{BoundingBox, Point};
use crate::types::Units;

use super::types::MarkupFragment;

/// Decimal places kept in emitted coordinates.
const DECIMALS: usize = 4;

/// Format a number with 4 decimals, trailing zeros trimmed.
///
/// Values that round to zero print as `0`, never `-0`.
pub(crate) fn fmt_num(value: f64) -> String {
    let s = format!("{:.prec$}", value, prec = DECIMALS);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// `(x,y)`
pub(crate) fn fmt_point(p: &Point) -> String {
    format!("({},{})", fmt_num(p.x().raw()), fmt_num(p.y().raw()))
}

fn fmt_arrows(arrows: Option<&str>) -> String {
    arrows.map(|a| format!("{{{a}}}")).unwrap_or_default()
}

/// `\psline[options]{arrows}(p1)(p2)...`
pub(crate) fn psline(options: &str, arrows: Option<&str>, points: &[Point]) -> MarkupFragment {
    let coords: String = points.iter().map(fmt_point).collect();
    format!("\\psline[{options}]{}{coords}", fmt_arrows(arrows))
}

/// `\psdots[options](p)`
pub(crate) fn psdots(options: &str, p: &Point) -> MarkupFragment {
    format!("\\psdots[{options}]{}", fmt_point(p))
}

/// `\rput(p){text}`
pub(crate) fn rput(p: &Point, text: &str) -> MarkupFragment {
    format!("\\rput{}{{{text}}}", fmt_point(p))
}

/// `\psset{xunit=..cm,yunit=..cm}`
pub(crate) fn psset_units(units: &Units) -> MarkupFragment {
    format!("\\psset{{xunit={}cm,yunit={}cm}}", fmt_num(units.xunit), fmt_num(units.yunit))
}

pub(crate) fn begin_pspicture(bbox: &BoundingBox) -> MarkupFragment {
    format!(
        "\\begin{{pspicture}}({},{})({},{})",
        fmt_num(bbox.xmin),
        fmt_num(bbox.ymin),
        fmt_num(bbox.xmax),
        fmt_num(bbox.ymax)
    )
}

pub(crate) const END_PSPICTURE: &str = "\\end{pspicture}";

/// Wrap `body` in a rotation about the origin.
pub(crate) fn rotate_about_origin(degrees: f64, body: &str) -> MarkupFragment {
    format!("\\rput{{{}}}(0,0){{\n{body}\n}}", fmt_num(degrees))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(-0.1), "-0.1");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.3333");
        assert_eq!(fmt_num(12.00004), "12");
    }

    #[test]
    fn negative_zero_is_positive() {
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(-0.00001), "0");
    }

    #[test]
    fn psline_with_arrows() {
        let pts = [Point::new(0, 0), Point::new(1, -2.5)];
        assert_eq!(psline("linecolor=red", Some("->"), &pts), "\\psline[linecolor=red]{->}(0,0)(1,-2.5)");
        assert_eq!(psline("linecolor=red", None, &pts), "\\psline[linecolor=red](0,0)(1,-2.5)");
    }

    #[test]
    fn rput_and_dots() {
        assert_eq!(rput(&Point::new(1, 2), "$A$"), "\\rput(1,2){$A$}");
        assert_eq!(psdots("dotstyle=*", &Point::origin()), "\\psdots[dotstyle=*](0,0)");
    }

    #[test]
    fn pspicture_header() {
        let bbox = BoundingBox { xmin: -0.1, xmax: 0.1, ymin: -0.1, ymax: 0.1 };
        assert_eq!(begin_pspicture(&bbox), "\\begin{pspicture}(-0.1,-0.1)(0.1,0.1)");
        assert_eq!(psset_units(&Units::default()), "\\psset{xunit=1cm,yunit=1cm}");
    }
}
