//! Overlay view that reports panel writes through tracing.

use mangoview_core::Point;
use mangoview_viewer::{OverlayView, Size};
use tracing::debug;

/// Headless panel: remembers the last written values and logs every write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogView {
    pub visible: bool,
    pub size: Size,
    pub font_size: u32,
    pub position: Point,
    /// Number of writes received.
    pub writes: usize,
}

impl OverlayView for LogView {
    fn set_visible(&mut self, visible: bool) {
        debug!("panel visible: {}", visible);
        self.visible = visible;
        self.writes += 1;
    }

    fn set_size(&mut self, size: Size) {
        debug!("panel size: {:.1}x{:.1}", size.width, size.height);
        self.size = size;
        self.writes += 1;
    }

    fn set_font_size(&mut self, px: u32) {
        debug!("panel font: {}px", px);
        self.font_size = px;
        self.writes += 1;
    }

    fn set_position(&mut self, position: Point) {
        debug!("panel position: ({:.1}, {:.1})", position.x, position.y);
        self.position = position;
        self.writes += 1;
    }
}
