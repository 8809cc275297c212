//! Core rendering types: entry handles, styles and decorations

use std::fmt;

use super::defaults;
use super::markup::fmt_num;
use crate::geometry::{AngleMeasure, Point};

/// A piece of PSTricks markup. The pipeline never interprets its content.
pub type MarkupFragment = String;

/// Handle to an entry of a [`Canvas`](super::Canvas).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry #{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    None,
}

impl LineStyle {
    fn keyword(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
            LineStyle::None => "none",
        }
    }
}

/// Drawing parameters shared by every shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStyle {
    pub linecolor: String,
    pub linestyle: LineStyle,
    /// Line width in cm; `None` keeps the PSTricks default.
    pub linewidth: Option<f64>,
    /// Fill colour; `None` leaves the shape unfilled.
    pub fill: Option<String>,
    /// Arrow specification such as `->` or `<->`.
    pub arrows: Option<String>,
    /// Invisible shapes still count in the bounding box but emit no markup.
    pub invisible: bool,
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            linecolor: defaults::LINE_COLOR.to_string(),
            linestyle: LineStyle::Solid,
            linewidth: None,
            fill: None,
            arrows: None,
            invisible: false,
        }
    }
}

impl ObjectStyle {
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.linecolor = color.into();
        self
    }

    pub fn with_linestyle(mut self, linestyle: LineStyle) -> Self {
        self.linestyle = linestyle;
        self
    }

    pub fn with_linewidth(mut self, cm: f64) -> Self {
        self.linewidth = Some(cm);
        self
    }

    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn with_arrows(mut self, arrows: impl Into<String>) -> Self {
        self.arrows = Some(arrows.into());
        self
    }

    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    /// The `key=value` list that goes between brackets.
    pub fn options(&self) -> String {
        let mut options = vec![format!("linecolor={}", self.linecolor)];
        if self.linestyle != LineStyle::Solid {
            options.push(format!("linestyle={}", self.linestyle.keyword()));
        }
        if let Some(width) = self.linewidth {
            options.push(format!("linewidth={}cm", fmt_num(width)));
        }
        if let Some(fill) = &self.fill {
            options.push("fillstyle=solid".to_string());
            options.push(format!("fillcolor={fill}"));
        }
        options.join(",")
    }
}

/// Where a mark sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkPosition {
    /// Absolute position.
    At(Point),
    /// Offset from the anchor of the decorated shape.
    Polar { distance: f64, angle: AngleMeasure },
}

impl MarkPosition {
    /// Polar position at the default distance.
    pub fn towards(angle: AngleMeasure) -> Self {
        MarkPosition::Polar {
            distance: defaults::MARK_DISTANCE,
            angle,
        }
    }

    pub fn resolve(&self, anchor: Point) -> Point {
        match *self {
            MarkPosition::At(p) => p,
            MarkPosition::Polar { distance, angle } => anchor + Point::polar(distance, angle),
        }
    }
}

/// Something attached to a drawn entry that counts in its full bounding box
/// only.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    Mark { text: String, position: MarkPosition },
}

impl Decoration {
    pub fn mark(text: impl Into<String>, position: MarkPosition) -> Self {
        Decoration::Mark {
            text: text.into(),
            position,
        }
    }
}

/// The decorations of one entry, in attachment order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationSet {
    items: Vec<Decoration>,
}

impl DecorationSet {
    pub fn push(&mut self, decoration: Decoration) {
        self.items.push(decoration);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
