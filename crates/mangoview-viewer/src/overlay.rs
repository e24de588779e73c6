//! Floating panel placement.
//!
//! The positioner keeps the content panel beside the selection target while
//! the page scrolls or the window resizes. It runs a short settle loop: every
//! external trigger grants a fixed number of ticks, each tick recomputes the
//! placement and only writes to the view what moved by more than a small
//! epsilon, so the panel neither jitters nor floods the view with writes.

use std::time::Duration;

use mangoview_core::{Point, Target};
use mangoview_settings::OverlaySettings;
use tracing::{debug, trace};

/// Visible document region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn scrolled(self, scroll_x: f64, scroll_y: f64) -> Self {
        Self {
            scroll_x,
            scroll_y,
            ..self
        }
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Panel size in document pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Sink for panel writes.
pub trait OverlayView {
    fn set_visible(&mut self, visible: bool);
    fn set_size(&mut self, size: Size);
    fn set_font_size(&mut self, px: u32);
    fn set_position(&mut self, position: Point);
}

/// Placement parameters, fractions relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    pub panel_width: f64,
    pub panel_height: f64,
    pub edge_inset: f64,
    pub switch_right_at: f64,
    pub switch_left_at: f64,
    pub target_gap: f64,
    pub size_epsilon: f64,
    pub position_epsilon: f64,
    pub settle_ticks: u32,
    pub tick_interval: Duration,
    pub font_divisor: f64,
    pub font_step: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::from(&OverlaySettings::default())
    }
}

impl From<&OverlaySettings> for OverlayConfig {
    fn from(settings: &OverlaySettings) -> Self {
        Self {
            panel_width: settings.panel_width,
            panel_height: settings.panel_height,
            edge_inset: settings.edge_inset,
            switch_right_at: settings.switch_right_at,
            switch_left_at: settings.switch_left_at,
            target_gap: settings.target_gap,
            size_epsilon: settings.size_epsilon,
            position_epsilon: settings.position_epsilon,
            settle_ticks: settings.settle_ticks,
            tick_interval: Duration::from_millis(settings.tick_interval_ms.max(1)),
            font_divisor: settings.font_divisor,
            font_step: settings.font_step,
        }
    }
}

/// Last values written to the view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayState {
    pub position: Point,
    pub size: Size,
    pub font_size: u32,
    /// Panel sits on the right half of the viewport.
    pub on_right_side: bool,
    pub visible: bool,
    pub settle_ticks_remaining: u32,
}

/// Settle-loop driven panel placement.
#[derive(Debug, Clone)]
pub struct OverlayPositioner {
    config: OverlayConfig,
    state: OverlayState,
    running: bool,
}

impl OverlayPositioner {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            state: OverlayState::default(),
            running: false,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// True while the settle loop still has ticks to run.
    pub fn is_settling(&self) -> bool {
        self.running
    }

    /// Re-arms the settle loop.
    ///
    /// Resets the tick budget. When the loop is idle the first tick runs
    /// immediately; a running loop simply keeps going with the new budget.
    pub fn request_update(
        &mut self,
        target: &Target,
        viewport: &Viewport,
        view: &mut dyn OverlayView,
    ) {
        self.state.settle_ticks_remaining = self.config.settle_ticks;
        if !self.running {
            self.running = true;
            self.tick(target, viewport, view);
        }
    }

    /// Runs one settle tick. Returns whether the loop keeps running.
    pub fn tick(
        &mut self,
        target: &Target,
        viewport: &Viewport,
        view: &mut dyn OverlayView,
    ) -> bool {
        if !self.running {
            return false;
        }

        self.place(target, viewport, view);

        self.state.settle_ticks_remaining = self.state.settle_ticks_remaining.saturating_sub(1);
        if self.state.settle_ticks_remaining == 0 {
            self.running = false;
            trace!("Overlay settled");
        }
        self.running
    }

    fn place(&mut self, target: &Target, viewport: &Viewport, view: &mut dyn OverlayView) {
        let c = self.config;

        if target.visible != self.state.visible {
            self.state.visible = target.visible;
            view.set_visible(target.visible);
        }

        if viewport.is_degenerate() {
            return;
        }
        let (w, h) = (viewport.width, viewport.height);

        let size = Size {
            width: c.panel_width * w,
            height: c.panel_height * h,
        };

        let min_x = viewport.scroll_x + c.edge_inset * w;
        let min_y = viewport.scroll_y + c.edge_inset * h;
        let max_x = viewport.scroll_x + (1.0 - c.edge_inset - c.panel_width) * w;
        let max_y = viewport.scroll_y + (1.0 - c.edge_inset - c.panel_height) * h;

        if !self.state.on_right_side && target.x > viewport.scroll_x + c.switch_right_at * w {
            self.state.on_right_side = true;
            debug!("Overlay moves to the right side");
        } else if self.state.on_right_side && target.x < viewport.scroll_x + c.switch_left_at * w {
            self.state.on_right_side = false;
            debug!("Overlay moves to the left side");
        }

        let gap = c.target_gap * size.width;
        let x = if self.state.on_right_side {
            target.x - size.width - target.half_width - gap
        } else {
            target.x + target.half_width + gap
        };
        let y = target.y - size.height / 2.0;
        let position = Point::new(x.max(min_x).min(max_x), y.max(min_y).min(max_y));

        let dw = (size.width - self.state.size.width) / w;
        let dh = (size.height - self.state.size.height) / h;
        if dw * dw + dh * dh > c.size_epsilon * c.size_epsilon {
            self.state.size = size;
            view.set_size(size);

            let font = size.height / c.font_divisor;
            if (f64::from(self.state.font_size) - font).abs() > c.font_step {
                self.state.font_size = font.floor() as u32;
                view.set_font_size(self.state.font_size);
            }
        }

        let dx = (position.x - self.state.position.x) / w;
        let dy = (position.y - self.state.position.y) / h;
        if dx * dx + dy * dy > c.position_epsilon * c.position_epsilon {
            self.state.position = position;
            view.set_position(position);
        }
    }
}

impl Default for OverlayPositioner {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}
