//! Viewer session.
//!
//! Owns one page view: the selection controller, the overlay positioner, the
//! page loader and the event bus the view bindings subscribe to. Hosts feed
//! pointer, scroll and resize input in and perform the page fetches the
//! session asks for.

use std::collections::VecDeque;
use std::sync::Arc;

use mangoview_core::{
    Aabb, AppEvent, EventBus, LoadError, Page, PageEvent, PageTurn, Point, SelectionEvent, Target,
};
use mangoview_settings::Config;
use tracing::{debug, trace};

use crate::loader::{LoadOutcome, LoadRequest, PageLoader, PageSource};
use crate::overlay::{OverlayConfig, OverlayPositioner, OverlayView, Viewport};
use crate::selection::{PointerId, SelectionConfig, SelectionController};

/// Where the page image sits in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Document position of the image's top-left corner.
    pub offset: Point,
    /// Document pixels per image pixel.
    pub scale: f64,
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            scale: 1.0,
        }
    }
}

impl ImagePlacement {
    pub fn to_document(&self, point: Point) -> Point {
        Point::new(
            self.offset.x + point.x * self.scale,
            self.offset.y + point.y * self.scale,
        )
    }

    pub fn to_image(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.offset.x) / self.scale,
            (point.y - self.offset.y) / self.scale,
        )
    }

    pub fn rect(&self, rect: &Aabb) -> Aabb {
        let min = self.to_document(rect.min);
        let max = self.to_document(rect.max);
        Aabb::new(min.x, min.y, max.x, max.y)
    }

    pub fn target(&self, target: &Target) -> Target {
        let center = self.to_document(Point::new(target.x, target.y));
        Target {
            x: center.x,
            y: center.y,
            half_width: target.half_width * self.scale,
            visible: target.visible,
        }
    }
}

/// One interactive page view.
pub struct ViewerSession<V: OverlayView> {
    controller: SelectionController,
    positioner: OverlayPositioner,
    loader: PageLoader,
    bus: Arc<EventBus>,
    view: V,
    placement: ImagePlacement,
    viewport: Viewport,
    highlight_scale: f64,
    target: Target,
    highlights: Vec<Aabb>,
    requests: VecDeque<LoadRequest>,
}

impl<V: OverlayView> ViewerSession<V> {
    pub fn new(config: &Config, view: V) -> Self {
        Self::with_bus(config, view, Arc::new(EventBus::new()))
    }

    pub fn with_bus(config: &Config, view: V, bus: Arc<EventBus>) -> Self {
        Self {
            controller: SelectionController::new(SelectionConfig::from(&config.selection)),
            positioner: OverlayPositioner::new(OverlayConfig::from(&config.overlay)),
            loader: PageLoader::new(),
            bus,
            view,
            placement: ImagePlacement::default(),
            viewport: Viewport::default(),
            highlight_scale: config.selection.highlight_scale,
            target: Target::default(),
            highlights: Vec::new(),
            requests: VecDeque::new(),
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn positioner(&self) -> &OverlayPositioner {
        &self.positioner
    }

    pub fn loader(&self) -> &PageLoader {
        &self.loader
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn placement(&self) -> ImagePlacement {
        self.placement
    }

    /// Panel target in document space.
    pub fn target(&self) -> Target {
        self.target
    }

    /// Highlighter rectangles in document space.
    pub fn highlights(&self) -> &[Aabb] {
        &self.highlights
    }

    pub fn current_page(&self) -> Option<usize> {
        self.loader.current_index()
    }

    /// Moves the page image inside the document.
    pub fn set_placement(&mut self, placement: ImagePlacement) {
        self.placement = placement;
        self.target = placement.target(&self.controller.target());
        self.request_overlay_update();
    }

    pub fn click(&mut self, point: Point, time: u64) {
        let events = self.controller.click(point, time);
        self.dispatch(events);
    }

    pub fn advance(&mut self, now: u64) {
        let events = self.controller.advance(now);
        self.dispatch(events);
    }

    pub fn pointer_down(&mut self, pointer: PointerId, point: Point, time: u64) {
        let events = self.controller.pointer_down(pointer, point, time);
        self.dispatch(events);
    }

    pub fn pointer_move(&mut self, pointer: PointerId, point: Point, time: u64) {
        let events = self.controller.pointer_move(pointer, point, time);
        self.dispatch(events);
        if matches!(pointer, PointerId::Touch(_)) {
            self.request_overlay_update();
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId, point: Point, time: u64) {
        let events = self.controller.pointer_up(pointer, point, time);
        self.dispatch(events);
    }

    /// Drops a drag whose pointer went away without a release.
    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        let events = self.controller.pointer_cancel(pointer);
        self.dispatch(events);
    }

    pub fn scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        self.viewport = self.viewport.scrolled(scroll_x, scroll_y);
        self.request_overlay_update();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.request_overlay_update();
    }

    /// Runs one overlay settle tick. Returns whether more ticks are due.
    pub fn tick(&mut self) -> bool {
        self.positioner.tick(&self.target, &self.viewport, &mut self.view)
    }

    /// Runs settle ticks at the configured cadence until the overlay rests.
    pub async fn settle(&mut self) {
        let mut interval = tokio::time::interval(self.positioner.config().tick_interval);
        while self.positioner.is_settling() {
            interval.tick().await;
            self.tick();
        }
    }

    /// Starts loading `index`. The returned request must be completed with
    /// [`finish_load`](Self::finish_load).
    pub fn navigate(&mut self, index: usize) -> LoadRequest {
        let request = self.loader.request(index);
        self.publish(PageEvent::LoadStarted {
            index,
            token: request.token.value(),
        });
        request
    }

    /// Requests queued by page-turn gestures.
    pub fn take_load_requests(&mut self) -> Vec<LoadRequest> {
        self.requests.drain(..).collect()
    }

    /// Completes a load started by [`navigate`](Self::navigate).
    pub fn finish_load(
        &mut self,
        request: LoadRequest,
        result: Result<Page, LoadError>,
    ) -> LoadOutcome {
        let outcome = self.loader.complete(request, result);
        match &outcome {
            LoadOutcome::Applied { index, page } => {
                let events = self.controller.load_page(Arc::clone(page));
                self.dispatch(events);
                self.publish(PageEvent::Loaded {
                    index: *index,
                    symbols: page.symbol_count(),
                });
            }
            LoadOutcome::Stale { index, token } => {
                self.publish(PageEvent::StaleDiscarded {
                    index: *index,
                    token: token.value(),
                });
            }
            LoadOutcome::Recovered { index, error } => {
                self.publish(PageEvent::LoadFailed {
                    index: error.index(),
                    reason: error.to_string(),
                });
                self.publish(PageEvent::Recovered { index: *index });
            }
            LoadOutcome::Failed { error } => {
                self.publish(PageEvent::LoadFailed {
                    index: error.index(),
                    reason: error.to_string(),
                });
            }
        }
        outcome
    }

    /// Navigates to `index` and completes the load from `source`.
    pub async fn load<S>(&mut self, source: &S, index: usize) -> LoadOutcome
    where
        S: PageSource + ?Sized,
    {
        let request = self.navigate(index);
        let result = source.fetch(index).await;
        self.finish_load(request, result)
    }

    /// Serves every queued page-turn request from `source`.
    pub async fn serve_requests<S>(&mut self, source: &S) -> Vec<LoadOutcome>
    where
        S: PageSource + ?Sized,
    {
        let mut outcomes = Vec::new();
        while let Some(request) = self.requests.pop_front() {
            let result = source.fetch(request.index).await;
            outcomes.push(self.finish_load(request, result));
        }
        outcomes
    }

    fn request_overlay_update(&mut self) {
        self.positioner.request_update(&self.target, &self.viewport, &mut self.view);
    }

    fn turn_page(&mut self, turn: PageTurn) {
        let Some(current) = self.loader.current_index() else {
            return;
        };
        let index = match turn {
            PageTurn::Next => current.checked_add(1),
            PageTurn::Previous => current.checked_sub(1),
        };
        match index {
            Some(index) => {
                let request = self.navigate(index);
                self.requests.push_back(request);
            }
            None => debug!("No {} page", turn),
        }
    }

    /// Publishes each event, then applies it.
    fn dispatch(&mut self, events: Vec<SelectionEvent>) {
        for event in events {
            self.publish(event.clone());
            match event {
                SelectionEvent::TargetChanged(target) => {
                    self.target = self.placement.target(&target);
                    self.request_overlay_update();
                }
                SelectionEvent::HighlightsChanged { rects } => {
                    self.highlights = rects
                        .iter()
                        .map(|r| self.placement.rect(&r.inflated_square(self.highlight_scale)))
                        .collect();
                }
                SelectionEvent::PageTurnRequested(turn) => self.turn_page(turn),
                SelectionEvent::SelectionChanged { .. } => {}
            }
        }
    }

    fn publish(&self, event: impl Into<AppEvent>) {
        if let Err(e) = self.bus.publish(event.into()) {
            trace!("Event dropped: {}", e);
        }
    }
}

impl<V: OverlayView> std::fmt::Debug for ViewerSession<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("page", &self.loader.current_index())
            .field("state", self.controller.state())
            .field("viewport", &self.viewport)
            .field("target", &self.target)
            .finish()
    }
}
