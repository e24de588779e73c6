//! Selection controller states.

use mangoview_core::{Content, Page, Selection, Target};
use serde::{Deserialize, Serialize};

use super::drag::DragEdges;

/// Identity of the pointer driving a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointerId::Mouse => write!(f, "mouse"),
            PointerId::Touch(id) => write!(f, "touch#{}", id),
        }
    }
}

/// An edge drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Pointer that started the drag; other pointers are ignored.
    pub pointer: PointerId,
    /// State to restore when the span returns to the anchor.
    pub anchor: Box<SelectionState>,
    pub anchor_span: Selection,
    /// Target shown before the drag started.
    pub anchor_target: Target,
    pub edges: DragEdges,
    /// Symbol pressed to start the drag, until the span first changes.
    pub tap_symbol: Option<usize>,
    pub current: Selection,
}

/// Selection controller state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    HintSelected {
        selection: Selection,
        /// Index into the paragraph's hints.
        hint: usize,
    },
    ClusterSelected {
        cluster: usize,
    },
    RangeSelected {
        selection: Selection,
        /// Index into the paragraph's alt hints.
        alt_hint: Option<usize>,
    },
    Dragging(DragState),
}

impl SelectionState {
    /// Symbol span currently selected, if the state has one.
    pub fn selection(&self) -> Option<Selection> {
        match self {
            SelectionState::HintSelected { selection, .. }
            | SelectionState::RangeSelected { selection, .. } => Some(*selection),
            SelectionState::Dragging(drag) => Some(drag.current),
            SelectionState::Idle | SelectionState::ClusterSelected { .. } => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, SelectionState::Dragging(_))
    }

    /// Content the panel shows for this state.
    pub fn content(&self, page: &Page) -> Content {
        match self {
            SelectionState::Idle => Content::Empty,
            SelectionState::HintSelected { selection, hint } => page
                .paragraph(selection.para_index)
                .and_then(|p| p.hints.get(*hint))
                .map(|h| Content::Hint(h.clone()))
                .unwrap_or(Content::Empty),
            SelectionState::ClusterSelected { cluster } => page
                .cluster(*cluster)
                .map(|c| Content::Translation(c.translation.clone()))
                .unwrap_or(Content::Empty),
            SelectionState::RangeSelected {
                selection,
                alt_hint,
            } => range_content(page, selection, *alt_hint),
            SelectionState::Dragging(drag) => {
                let alt_hint = page
                    .paragraph(drag.current.para_index)
                    .and_then(|p| p.alt_hint_for(drag.current.sym_begin, drag.current.sym_end));
                range_content(page, &drag.current, alt_hint)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SelectionState::Idle => "idle",
            SelectionState::HintSelected { .. } => "hint",
            SelectionState::ClusterSelected { .. } => "cluster",
            SelectionState::RangeSelected { .. } => "range",
            SelectionState::Dragging(_) => "dragging",
        }
    }
}

fn range_content(page: &Page, selection: &Selection, alt_hint: Option<usize>) -> Content {
    let hint = alt_hint.and_then(|i| {
        page.paragraph(selection.para_index)
            .and_then(|p| p.alt_hints.get(i))
    });
    match hint {
        Some(hint) => Content::AltHint(hint.clone()),
        None if selection.len() == 1 => Content::Untranslated,
        None => Content::NoTranslation,
    }
}
