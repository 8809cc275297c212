//! The geometric value algebra.
//!
//! Every type here is an immutable value: operations return new values and
//! never touch a canvas. Decisions about verticality, degeneracy and the like
//! use the tolerances in [`crate::types`].

pub mod angle;
pub mod bbox;
pub mod curve;
pub mod equation;
pub mod point;
pub mod segment;

pub use angle::AngleMeasure;
pub use bbox::{BoundingBox, BoundingBoxLimits};
pub use curve::{ParametricCurve, Sampling, Smoothing};
pub use equation::{ConicEquation, Equation, LineEquation};
pub use point::Point;
pub use segment::{Orientation, Segment, SegmentKind};
