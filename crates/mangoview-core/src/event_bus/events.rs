//! Event type definitions for the event bus.
//!
//! This module defines all viewer events organized by category.
//! Events are cloneable and serializable for logging and replay.

use serde::{Deserialize, Serialize};

use crate::geometry::Aabb;
use crate::selection::{Content, PageTurn, Selection, Target};

/// Root event enum for all viewer events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Selection, highlight and anchor changes
    Selection(SelectionEvent),
    /// Page loading lifecycle
    Page(PageEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Selection(_) => EventCategory::Selection,
            AppEvent::Page(_) => EventCategory::Page,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Selection(e) => e.description(),
            AppEvent::Page(e) => e.description(),
        }
    }
}

impl From<SelectionEvent> for AppEvent {
    fn from(event: SelectionEvent) -> Self {
        AppEvent::Selection(event)
    }
}

impl From<PageEvent> for AppEvent {
    fn from(event: PageEvent) -> Self {
        AppEvent::Page(event)
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Selection controller output.
    Selection,
    /// Page loading events.
    Page,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Page => write!(f, "Page"),
        }
    }
}

/// Output of the selection controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// Selection replaced.
    SelectionChanged {
        /// New selection, `None` once dismissed or for cluster selections.
        selection: Option<Selection>,
        /// Content to display for it.
        content: Content,
    },
    /// Highlight rectangles replaced, in page-image coordinates.
    HighlightsChanged {
        /// Boxes to draw.
        rects: Vec<Aabb>,
    },
    /// Overlay anchor moved or changed visibility.
    TargetChanged(Target),
    /// Double-click in the page margin.
    PageTurnRequested(PageTurn),
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::SelectionChanged { selection, content } => match selection {
                Some(s) => format!(
                    "Selected paragraph {} [{}, {}) ({})",
                    s.para_index,
                    s.sym_begin,
                    s.sym_end,
                    content_label(content)
                ),
                None => format!("Selection cleared ({})", content_label(content)),
            },
            SelectionEvent::HighlightsChanged { rects } => {
                format!("{} highlight rects", rects.len())
            }
            SelectionEvent::TargetChanged(t) => {
                if t.visible {
                    format!("Target at ({:.1}, {:.1})", t.x, t.y)
                } else {
                    "Target hidden".to_string()
                }
            }
            SelectionEvent::PageTurnRequested(dir) => format!("Page turn: {}", dir),
        }
    }
}

fn content_label(content: &Content) -> &'static str {
    match content {
        Content::Hint(_) => "hint",
        Content::AltHint(_) => "alt hint",
        Content::Translation(_) => "translation",
        Content::Untranslated => "untranslated",
        Content::NoTranslation => "no translation",
        Content::Empty => "empty",
    }
}

/// Page loading events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageEvent {
    /// A load was issued.
    LoadStarted {
        /// Requested page index.
        index: usize,
        /// Token guarding the response.
        token: u64,
    },
    /// A page was applied.
    Loaded {
        /// Page index now displayed.
        index: usize,
        /// Number of symbols on the page.
        symbols: usize,
    },
    /// A response arrived for an abandoned request.
    StaleDiscarded {
        /// Page index of the stale response.
        index: usize,
        /// Token of the stale response.
        token: u64,
    },
    /// A load failed.
    LoadFailed {
        /// Requested page index.
        index: usize,
        /// Error message.
        reason: String,
    },
    /// The viewer fell back to the last good page.
    Recovered {
        /// Page index still displayed.
        index: usize,
    },
}

impl PageEvent {
    fn description(&self) -> String {
        match self {
            PageEvent::LoadStarted { index, token } => {
                format!("Loading page {} (token {})", index, token)
            }
            PageEvent::Loaded { index, symbols } => {
                format!("Page {} loaded ({} symbols)", index, symbols)
            }
            PageEvent::StaleDiscarded { index, token } => {
                format!("Discarded stale page {} (token {})", index, token)
            }
            PageEvent::LoadFailed { index, reason } => {
                format!("Page {} failed: {}", index, reason)
            }
            PageEvent::Recovered { index } => format!("Recovered to page {}", index),
        }
    }
}
