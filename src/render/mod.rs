//! PSTricks rendering for psgeom pictures
//!
//! This module is organized into submodules:
//! - `defaults`: Default settings
//! - `types`: Entry handles, `ObjectStyle`, decorations
//! - `context`: `RenderContext` handed to every drawable
//! - `markup`: PSTricks formatting helpers
//! - `shapes`: The `Drawable` trait and the shapes implementing it
//! - `separator`: The bucket log flushed at render time
//! - `canvas`: The accumulate / resolve / render state machine

pub mod canvas;
pub mod context;
pub mod defaults;
pub mod markup;
pub mod separator;
pub mod shapes;
pub mod types;

// Re-export commonly used items
pub use canvas::{Canvas, CanvasOptions, CanvasState};
pub use context::RenderContext;
pub use separator::{Section, SeparatorList};
pub use shapes::{AxesShape, CompositeShape, CurveShape, Drawable, PointShape, SegmentShape, Shape, TextShape};
pub use types::*;
