//! Default settings (lengths in abstract units unless stated otherwise)

/// Margin added around the final bounding box.
pub const MARGIN: f64 = 0.1;

/// Margin added around the math bounding box when sizing default axes.
pub const AXES_MARGIN: f64 = 0.5;

/// Half-extent of the region a single drawable may occupy.
pub const BBOX_LIMIT: f64 = 1000.0;

/// Samples per curve when the shape does not say.
pub const CURVE_SAMPLES: usize = 100;

/// Value (in cm) returned for a text metric that has not been measured yet.
pub const TEXT_METRIC: f64 = 0.1;

/// Distance of a polar mark from its anchor.
pub const MARK_DISTANCE: f64 = 0.3;

pub const LINE_COLOR: &str = "black";
pub const DOT_STYLE: &str = "*";
pub const VECTOR_ARROWS: &str = "->";
