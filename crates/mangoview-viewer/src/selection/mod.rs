//! Selection controller.
//!
//! Turns timestamped pointer input into selection changes. Every input
//! returns the [`SelectionEvent`]s it produced, in the order a view should
//! apply them. Single clicks are held back until the double-click window has
//! passed so a double-click never sees the effects of its first click.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mangoview_core::{Aabb, Cluster, Page, PageData, Paragraph, Point, SelectionEvent, Symbol};
//! use mangoview_viewer::SelectionController;
//!
//! let page = Page::from_data(PageData {
//!     paragraphs: vec![Paragraph {
//!         symbols: vec![Symbol::new(Aabb::new(0.0, 0.0, 10.0, 10.0))],
//!         ..Default::default()
//!     }],
//!     clusters: vec![Cluster {
//!         paragraphs: vec![0],
//!         bounds: Aabb::new(0.0, 0.0, 10.0, 10.0),
//!         translation: "hi".to_string(),
//!     }],
//!     resolution: None,
//! })
//! .unwrap();
//!
//! let mut controller = SelectionController::default();
//! controller.load_page(Arc::new(page));
//! assert!(controller.click(Point::new(5.0, 5.0), 0).is_empty());
//! let events = controller.advance(250);
//! assert!(matches!(events[0], SelectionEvent::SelectionChanged { .. }));
//! ```

mod drag;
mod state;

pub use drag::{extend, grab_edges, DragEdges};
pub use state::{DragState, PointerId, SelectionState};

use std::sync::Arc;

use mangoview_core::{
    constants, Aabb, Content, HitTester, LinearScan, Page, PageTurn, Point, Selection,
    SelectionEvent, SymbolHit, Target,
};
use mangoview_settings::SelectionSettings;
use tracing::debug;

/// Gesture recognition parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionConfig {
    pub hit_radius: f64,
    pub double_click_ms: u64,
    pub page_turn_margin: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            hit_radius: constants::HIT_RADIUS,
            double_click_ms: constants::DOUBLE_CLICK_MS,
            page_turn_margin: constants::PAGE_TURN_MARGIN,
        }
    }
}

impl From<&SelectionSettings> for SelectionConfig {
    fn from(settings: &SelectionSettings) -> Self {
        Self {
            hit_radius: settings.hit_radius,
            double_click_ms: settings.double_click_ms,
            page_turn_margin: settings.page_turn_margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingClick {
    point: Point,
    time: u64,
}

/// Selection state machine for one page.
pub struct SelectionController {
    config: SelectionConfig,
    hit_tester: Box<dyn HitTester>,
    page: Option<Arc<Page>>,
    state: SelectionState,
    target: Target,
    pending_click: Option<PendingClick>,
    last_click: Option<u64>,
    /// Release time of the last drag; the click it produces is dropped.
    drag_ended_at: Option<u64>,
}

impl SelectionController {
    pub fn new(config: SelectionConfig) -> Self {
        Self::with_hit_tester(config, Box::new(LinearScan))
    }

    pub fn with_hit_tester(config: SelectionConfig, hit_tester: Box<dyn HitTester>) -> Self {
        Self {
            config,
            hit_tester,
            page: None,
            state: SelectionState::Idle,
            target: Target::default(),
            pending_click: None,
            last_click: None,
            drag_ended_at: None,
        }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn page(&self) -> Option<&Arc<Page>> {
        self.page.as_ref()
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn selection(&self) -> Option<Selection> {
        self.state.selection()
    }

    /// Content for the current state.
    pub fn content(&self) -> Content {
        match &self.page {
            Some(page) => self.state.content(page),
            None => Content::Empty,
        }
    }

    /// True while a single click waits for the double-click window to close.
    pub fn has_pending_click(&self) -> bool {
        self.pending_click.is_some()
    }

    /// Replaces the page, dropping every piece of interaction state.
    pub fn load_page(&mut self, page: Arc<Page>) -> Vec<SelectionEvent> {
        self.page = Some(page);
        self.pending_click = None;
        self.last_click = None;
        self.drag_ended_at = None;
        self.clear()
    }

    /// Clears the selection and hides the target.
    pub fn clear(&mut self) -> Vec<SelectionEvent> {
        if !self.state.is_idle() {
            debug!("Selection {} -> idle", self.state.name());
        }
        self.state = SelectionState::Idle;
        self.target = self.target.hidden();
        vec![
            SelectionEvent::SelectionChanged {
                selection: None,
                content: Content::Empty,
            },
            SelectionEvent::HighlightsChanged { rects: Vec::new() },
            SelectionEvent::TargetChanged(self.target),
        ]
    }

    /// Registers a click.
    ///
    /// A click closer than the double-click window to the previous one is a
    /// double-click and resolves at once. Otherwise it is held until
    /// [`advance`](Self::advance) observes that the window has passed.
    ///
    /// The one click a pointer produces for a drag release is dropped. The
    /// release itself already counted as a click.
    pub fn click(&mut self, point: Point, time: u64) -> Vec<SelectionEvent> {
        if let Some(ended) = self.drag_ended_at.take() {
            if time.saturating_sub(ended) < self.config.double_click_ms {
                debug!("Click after drag swallowed");
                return Vec::new();
            }
        }

        let mut events = self.advance(time);
        if self.state.is_dragging() {
            return events;
        }

        let is_double = self.in_click_window(time);
        self.last_click = Some(time);

        if is_double {
            self.pending_click = None;
            events.extend(self.double_click(point));
        } else {
            self.pending_click = Some(PendingClick { point, time });
        }
        events
    }

    /// Commits a held single click once the double-click window has passed.
    pub fn advance(&mut self, now: u64) -> Vec<SelectionEvent> {
        match self.pending_click {
            Some(pending) if now.saturating_sub(pending.time) >= self.config.double_click_ms => {
                self.pending_click = None;
                self.single_click(pending.point)
            }
            _ => Vec::new(),
        }
    }

    /// Starts an edge drag when the press lands on a handle of the span.
    ///
    /// A press inside the double-click window of the previous click never
    /// starts a drag, so the click it ends with can complete a double-click.
    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        point: Point,
        time: u64,
    ) -> Vec<SelectionEvent> {
        let events = self.advance(time);
        if self.state.is_dragging()
            || self.pending_click.is_some()
            || self.in_click_window(time)
        {
            return events;
        }

        let Some(anchor_span) = (match &self.state {
            SelectionState::HintSelected { selection, .. }
            | SelectionState::RangeSelected { selection, .. } => Some(*selection),
            _ => None,
        }) else {
            return events;
        };

        let Some(hit) = self.hit(point) else {
            return events;
        };
        if hit.para_index != anchor_span.para_index {
            return events;
        }
        let Some(edges) = grab_edges(&anchor_span, hit.sym_index) else {
            return events;
        };

        debug!(
            "Drag start by {} on symbol {} (begin: {}, end: {})",
            pointer, hit.sym_index, edges.begin, edges.end
        );
        let anchor = std::mem::take(&mut self.state);
        self.state = SelectionState::Dragging(DragState {
            pointer,
            anchor: Box::new(anchor),
            anchor_span,
            anchor_target: self.target,
            edges,
            tap_symbol: Some(hit.sym_index),
            current: anchor_span,
        });
        events
    }

    /// Moves the active edges of a tracked drag.
    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        point: Point,
        time: u64,
    ) -> Vec<SelectionEvent> {
        let mut events = self.advance(time);

        let (anchor_span, edges) = match &self.state {
            SelectionState::Dragging(drag) if drag.pointer == pointer => {
                (drag.anchor_span, drag.edges)
            }
            _ => return events,
        };

        let Some(hit) = self.hit(point) else {
            return events;
        };
        let span = if hit.para_index == anchor_span.para_index {
            extend(&anchor_span, edges, hit.sym_index)
        } else {
            anchor_span
        };

        if let SelectionState::Dragging(drag) = &mut self.state {
            if drag.current == span {
                return events;
            }
            drag.current = span;
            drag.tap_symbol = None;
        }

        events.extend(self.emit_span(span));
        events
    }

    /// Finishes a tracked drag.
    pub fn pointer_up(
        &mut self,
        pointer: PointerId,
        _point: Point,
        time: u64,
    ) -> Vec<SelectionEvent> {
        let mut events = self.advance(time);

        let drag = match std::mem::take(&mut self.state) {
            SelectionState::Dragging(drag) if drag.pointer == pointer => drag,
            other => {
                self.state = other;
                return events;
            }
        };

        // The release counts as a click for double-click detection
        self.drag_ended_at = Some(time);
        self.last_click = Some(time);

        if let Some(symbol) = drag.tap_symbol {
            let selection = Selection::single(drag.anchor_span.para_index, symbol);
            debug!("Drag tap collapses to symbol {}", symbol);
            events.extend(self.select_range(selection));
        } else if drag.current == drag.anchor_span {
            self.state = *drag.anchor;
        } else {
            debug!(
                "Drag end on [{}, {})",
                drag.current.sym_begin, drag.current.sym_end
            );
            self.state = SelectionState::RangeSelected {
                selection: drag.current,
                alt_hint: self.alt_hint(&drag.current),
            };
        }
        events
    }

    /// Abandons a tracked drag, restoring the selection it started from.
    ///
    /// Used when the pointer is lost without a release, e.g. a cancelled
    /// touch.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Vec<SelectionEvent> {
        let drag = match std::mem::take(&mut self.state) {
            SelectionState::Dragging(drag) if drag.pointer == pointer => drag,
            other => {
                self.state = other;
                return Vec::new();
            }
        };

        debug!("Drag by {} cancelled", pointer);
        let changed = drag.current != drag.anchor_span;
        self.state = *drag.anchor;
        if !changed {
            return Vec::new();
        }

        let Some(page) = self.page.clone() else {
            return Vec::new();
        };
        let content = self.state.content(&page);
        self.emit(
            Some(drag.anchor_span),
            content,
            drag.anchor_span.boxes(&page),
            drag.anchor_target,
        )
    }

    fn in_click_window(&self, time: u64) -> bool {
        self.last_click
            .is_some_and(|last| time.saturating_sub(last) < self.config.double_click_ms)
    }

    fn hit(&self, point: Point) -> Option<SymbolHit> {
        let page = self.page.as_ref()?;
        self.hit_tester
            .nearest_symbol(page, point, self.config.hit_radius)
    }

    fn alt_hint(&self, selection: &Selection) -> Option<usize> {
        self.page
            .as_ref()?
            .paragraph(selection.para_index)?
            .alt_hint_for(selection.sym_begin, selection.sym_end)
    }

    fn single_click(&mut self, point: Point) -> Vec<SelectionEvent> {
        let Some(page) = self.page.clone() else {
            return Vec::new();
        };

        let Some(hit) = self.hit(point) else {
            if self.target.visible {
                return self.clear();
            }
            return Vec::new();
        };

        let Some(para) = page.paragraph(hit.para_index) else {
            return Vec::new();
        };
        let symbol_box = para.symbols[hit.sym_index].bounds;

        match para.hint_at(hit.sym_index) {
            Some(index) => {
                let hint = &para.hints[index];
                let Some(selection) = Selection::within(&page, hit.para_index, hint.begin, hint.end)
                else {
                    return Vec::new();
                };
                debug!(
                    "Hint {} selected in paragraph {}",
                    index, selection.para_index
                );
                self.state = SelectionState::HintSelected {
                    selection,
                    hint: index,
                };
                self.emit(
                    Some(selection),
                    Content::Hint(hint.clone()),
                    selection.boxes(&page),
                    Target::around(&symbol_box),
                )
            }
            None => {
                let selection = Selection::single(hit.para_index, hit.sym_index);
                self.select_range(selection)
            }
        }
    }

    fn double_click(&mut self, point: Point) -> Vec<SelectionEvent> {
        let Some(page) = self.page.clone() else {
            return Vec::new();
        };

        match self.hit(point) {
            Some(hit) => {
                let Some(index) = page.cluster_of(hit.para_index) else {
                    return Vec::new();
                };
                let Some(cluster) = page.cluster(index) else {
                    return Vec::new();
                };
                debug!("Cluster {} selected", index);
                self.state = SelectionState::ClusterSelected { cluster: index };
                self.emit(
                    None,
                    Content::Translation(cluster.translation.clone()),
                    page.cluster_symbol_boxes(index),
                    Target::around(&cluster.bounds),
                )
            }
            None => {
                let mut events = self.clear();
                let width = page.image_width();
                let margin = self.config.page_turn_margin * width;
                let turn = if width <= 0.0 {
                    None
                } else if point.x < margin {
                    Some(PageTurn::Previous)
                } else if point.x > width - margin {
                    Some(PageTurn::Next)
                } else {
                    None
                };
                if let Some(turn) = turn {
                    debug!("Page turn requested: {}", turn);
                    events.push(SelectionEvent::PageTurnRequested(turn));
                }
                events
            }
        }
    }

    fn select_range(&mut self, selection: Selection) -> Vec<SelectionEvent> {
        let alt_hint = self.alt_hint(&selection);
        self.state = SelectionState::RangeSelected {
            selection,
            alt_hint,
        };
        self.emit_span(selection)
    }

    /// Emits the events describing `span` as the live selection.
    ///
    /// During a drag a span equal to the anchor reports the anchor's content.
    fn emit_span(&mut self, span: Selection) -> Vec<SelectionEvent> {
        let Some(page) = self.page.clone() else {
            return Vec::new();
        };

        let content = match &self.state {
            SelectionState::Dragging(drag) if drag.anchor_span == span => drag.anchor.content(&page),
            state => state.content(&page),
        };
        let boxes = span.boxes(&page);
        let target = Aabb::enclosing(boxes.iter())
            .map(|b| Target::around(&b))
            .unwrap_or_else(|| self.target.hidden());

        self.emit(Some(span), content, boxes, target)
    }

    fn emit(
        &mut self,
        selection: Option<Selection>,
        content: Content,
        rects: Vec<Aabb>,
        target: Target,
    ) -> Vec<SelectionEvent> {
        self.target = target;
        vec![
            SelectionEvent::SelectionChanged { selection, content },
            SelectionEvent::HighlightsChanged { rects },
            SelectionEvent::TargetChanged(target),
        ]
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("target", &self.target)
            .field("pending_click", &self.pending_click)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mangoview_core::{Cluster, Hint, PageData, Paragraph, Symbol};

    fn row_page(count: usize) -> Arc<Page> {
        let symbols = (0..count)
            .map(|i| {
                let x = 100.0 + i as f64 * 30.0;
                Symbol::new(Aabb::new(x, 100.0, x + 20.0, 120.0))
            })
            .collect();
        let page = Page::from_data(PageData {
            paragraphs: vec![Paragraph {
                symbols,
                alt_hints: vec![Hint::new(0, 2)],
                ..Default::default()
            }],
            clusters: vec![Cluster {
                paragraphs: vec![0],
                bounds: Aabb::new(100.0, 100.0, 100.0 + count as f64 * 30.0, 120.0),
                translation: "row".to_string(),
            }],
            resolution: Some([1000.0, 400.0]),
        })
        .unwrap();
        Arc::new(page)
    }

    fn symbol(i: usize) -> Point {
        Point::new(110.0 + i as f64 * 30.0, 110.0)
    }

    #[test]
    fn test_click_waits_for_double_click_window() {
        let mut c = SelectionController::default();
        c.load_page(row_page(3));

        assert!(c.click(symbol(1), 1000).is_empty());
        assert!(c.has_pending_click());
        assert!(c.advance(1199).is_empty());

        let events = c.advance(1200);
        assert_eq!(events.len(), 3);
        assert_eq!(c.selection(), Selection::new(0, 1, 2));
        assert_eq!(c.content(), Content::Untranslated);
    }

    #[test]
    fn test_late_click_flushes_pending_click() {
        let mut c = SelectionController::default();
        c.load_page(row_page(3));

        c.click(symbol(0), 0);
        let events = c.click(symbol(2), 500);
        assert_eq!(events.len(), 3);
        assert_eq!(c.selection(), Selection::new(0, 0, 1));
        assert!(c.has_pending_click());
    }

    #[test]
    fn test_plain_symbol_selects_range() {
        let mut c = SelectionController::default();
        c.load_page(row_page(3));
        c.click(symbol(2), 0);
        c.advance(300);
        assert!(matches!(
            c.state(),
            SelectionState::RangeSelected { alt_hint: None, .. }
        ));
    }

    #[test]
    fn test_no_hit_without_selection_is_silent() {
        let mut c = SelectionController::default();
        c.load_page(row_page(3));
        c.click(Point::new(600.0, 300.0), 0);
        assert!(c.advance(300).is_empty());
        assert!(c.state().is_idle());
    }

    #[test]
    fn test_click_without_page_is_ignored() {
        let mut c = SelectionController::default();
        c.click(symbol(0), 0);
        assert!(c.advance(300).is_empty());
    }

    #[test]
    fn test_double_click_in_middle_band_only_clears() {
        let mut c = SelectionController::default();
        c.load_page(row_page(3));
        c.click(Point::new(500.0, 350.0), 0);
        let events = c.click(Point::new(500.0, 350.0), 100);
        assert_eq!(events.len(), 3);
        assert!(!events
            .iter()
            .any(|e| matches!(e, SelectionEvent::PageTurnRequested(_))));
        assert!(!c.has_pending_click());
    }

    #[test]
    fn test_double_click_turns_page_at_margins() {
        let mut c = SelectionController::default();
        c.load_page(row_page(3));

        c.click(Point::new(900.0, 350.0), 0);
        let events = c.click(Point::new(900.0, 350.0), 50);
        assert_eq!(
            events.last(),
            Some(&SelectionEvent::PageTurnRequested(PageTurn::Next))
        );

        c.click(Point::new(20.0, 350.0), 1000);
        let events = c.click(Point::new(20.0, 350.0), 1050);
        assert_eq!(
            events.last(),
            Some(&SelectionEvent::PageTurnRequested(PageTurn::Previous))
        );
    }

    #[test]
    fn test_drag_requires_selection() {
        let mut c = SelectionController::default();
        c.load_page(row_page(3));
        c.pointer_down(PointerId::Mouse, symbol(0), 0);
        assert!(c.state().is_idle());
    }

    #[test]
    fn test_drag_alt_hint_and_tap_cleared() {
        let mut c = SelectionController::default();
        c.load_page(row_page(4));
        c.click(symbol(1), 0);
        c.advance(300);

        c.pointer_down(PointerId::Mouse, symbol(1), 1000);
        let events = c.pointer_move(PointerId::Mouse, symbol(0), 1010);
        assert_eq!(
            events[0],
            SelectionEvent::SelectionChanged {
                selection: Selection::new(0, 0, 2),
                content: Content::AltHint(Hint::new(0, 2)),
            }
        );
        match c.state() {
            SelectionState::Dragging(drag) => assert_eq!(drag.tap_symbol, None),
            other => panic!("unexpected state {:?}", other),
        }

        c.pointer_up(PointerId::Mouse, symbol(0), 1020);
        assert!(matches!(
            c.state(),
            SelectionState::RangeSelected {
                alt_hint: Some(0),
                ..
            }
        ));
        // The click synthesised by the same release is swallowed
        assert!(c.click(symbol(0), 1030).is_empty());
        assert!(!c.has_pending_click());
    }

    #[test]
    fn test_drag_tap_collapses_to_symbol() {
        let mut c = SelectionController::default();
        c.load_page(row_page(4));
        c.click(symbol(1), 0);
        c.advance(300);
        c.pointer_down(PointerId::Mouse, symbol(1), 1000);
        c.pointer_move(PointerId::Mouse, symbol(1), 1010);
        c.pointer_up(PointerId::Mouse, symbol(1), 1020);
        assert_eq!(c.selection(), Selection::new(0, 1, 2));
        assert!(!c.state().is_dragging());
    }

    #[test]
    fn test_other_pointer_ignored_during_drag() {
        let mut c = SelectionController::default();
        c.load_page(row_page(4));
        c.click(symbol(1), 0);
        c.advance(300);
        c.pointer_down(PointerId::Touch(1), symbol(1), 1000);

        assert!(c.pointer_move(PointerId::Touch(2), symbol(3), 1010).is_empty());
        c.pointer_up(PointerId::Touch(2), symbol(3), 1020);
        assert!(c.state().is_dragging());

        c.pointer_move(PointerId::Touch(1), symbol(3), 1030);
        c.pointer_up(PointerId::Touch(1), symbol(3), 1040);
        assert_eq!(c.selection(), Selection::new(0, 1, 4));
    }

    #[test]
    fn test_miss_during_drag_keeps_span() {
        let mut c = SelectionController::default();
        c.load_page(row_page(4));
        c.click(symbol(1), 0);
        c.advance(300);
        c.pointer_down(PointerId::Mouse, symbol(1), 1000);
        c.pointer_move(PointerId::Mouse, symbol(2), 1010);
        assert!(c
            .pointer_move(PointerId::Mouse, Point::new(110.0, 380.0), 1020)
            .is_empty());
        assert_eq!(c.selection(), Selection::new(0, 1, 3));
    }

    #[test]
    fn test_press_inside_click_window_starts_no_drag() {
        let mut c = SelectionController::default();
        c.load_page(row_page(4));
        c.click(symbol(1), 0);
        c.advance(300);

        // A tap on the handle ends at 1020 and counts as a click
        c.pointer_down(PointerId::Mouse, symbol(1), 1000);
        c.pointer_up(PointerId::Mouse, symbol(1), 1020);

        c.pointer_down(PointerId::Mouse, symbol(1), 1100);
        assert!(!c.state().is_dragging());
        c.pointer_down(PointerId::Mouse, symbol(1), 1220);
        assert!(c.state().is_dragging());
    }

    #[test]
    fn test_cancel_without_change_is_silent() {
        let mut c = SelectionController::default();
        c.load_page(row_page(4));
        c.click(symbol(1), 0);
        c.advance(300);
        c.pointer_down(PointerId::Mouse, symbol(1), 1000);

        assert!(c.pointer_cancel(PointerId::Mouse).is_empty());
        assert!(matches!(c.state(), SelectionState::RangeSelected { .. }));
        assert!(!c.has_pending_click());
        // A cancel records no release, so the next click is not dropped
        c.click(symbol(2), 1010);
        assert!(c.has_pending_click());
    }

    #[test]
    fn test_load_page_resets_state() {
        let mut c = SelectionController::default();
        c.load_page(row_page(3));
        c.click(symbol(1), 0);
        c.advance(300);
        let events = c.load_page(row_page(2));
        assert_eq!(events.len(), 3);
        assert!(c.state().is_idle());
        assert!(!c.target().visible);
    }
}
