//! Selection value types shared by the controller, the overlay and the
//! event bus.

use serde::{Deserialize, Serialize};

use crate::geometry::Aabb;
use crate::page::{Hint, Page};

/// A non-empty span of symbols `[sym_begin, sym_end)` within one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub para_index: usize,
    pub sym_begin: usize,
    pub sym_end: usize,
}

impl Selection {
    /// Builds a selection, refusing empty or inverted spans.
    pub fn new(para_index: usize, sym_begin: usize, sym_end: usize) -> Option<Self> {
        (sym_begin < sym_end).then_some(Self {
            para_index,
            sym_begin,
            sym_end,
        })
    }

    /// Builds a selection that must also fit inside the page's paragraph.
    pub fn within(page: &Page, para_index: usize, sym_begin: usize, sym_end: usize) -> Option<Self> {
        let len = page.paragraph(para_index)?.symbols.len();
        if sym_end > len {
            return None;
        }
        Self::new(para_index, sym_begin, sym_end)
    }

    /// Selection of exactly one symbol.
    pub fn single(para_index: usize, symbol: usize) -> Self {
        Self {
            para_index,
            sym_begin: symbol,
            sym_end: symbol + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.sym_end - self.sym_begin
    }

    pub fn is_empty(&self) -> bool {
        self.sym_end <= self.sym_begin
    }

    /// Index of the last symbol in the span.
    pub fn last(&self) -> usize {
        self.sym_end - 1
    }

    pub fn contains(&self, para_index: usize, symbol: usize) -> bool {
        para_index == self.para_index && symbol >= self.sym_begin && symbol < self.sym_end
    }

    /// Boxes of the selected symbols.
    pub fn boxes(&self, page: &Page) -> Vec<Aabb> {
        page.paragraph(self.para_index)
            .map(|p| p.span_boxes(self.sym_begin, self.sym_end))
            .unwrap_or_default()
    }
}

/// Anchor the floating panel tracks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub half_width: f64,
    pub visible: bool,
}

impl Target {
    /// Visible target centered on a box.
    pub fn around(bounds: &Aabb) -> Self {
        let c = bounds.center();
        Self {
            x: c.x,
            y: c.y,
            half_width: bounds.half_width(),
            visible: true,
        }
    }

    /// Same anchor, hidden.
    pub fn hidden(self) -> Self {
        Self {
            visible: false,
            ..self
        }
    }
}

/// What the content panel should show for a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    /// Primary dictionary hint for a clicked span.
    Hint(Hint),
    /// Alternative hint matching a dragged span exactly.
    AltHint(Hint),
    /// Translation of a whole cluster.
    Translation(String),
    /// A single symbol with no dictionary entry.
    Untranslated,
    /// A dragged multi-symbol span with no dictionary entry.
    NoTranslation,
    /// Nothing selected.
    Empty,
}

impl Content {
    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }
}

/// Direction of a page-turn gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageTurn {
    Previous,
    Next,
}

impl std::fmt::Display for PageTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageTurn::Previous => write!(f, "previous"),
            PageTurn::Next => write!(f, "next"),
        }
    }
}
