//! # MangoView Viewer
//!
//! Interaction engine for the MangoView page viewer:
//! - Selection controller (click, double-click and edge-drag gestures)
//! - Overlay positioner (anti-jitter settle loop for the floating panel)
//! - Page loader (load tokens, fallback to the last good page)
//! - Viewer session wiring them to the event bus

pub mod loader;
pub mod overlay;
pub mod selection;
pub mod session;

pub use loader::{DirectoryPageSource, LoadOutcome, LoadRequest, LoadToken, PageLoader, PageSource};
pub use overlay::{OverlayConfig, OverlayPositioner, OverlayState, OverlayView, Size, Viewport};
pub use selection::{
    DragEdges, DragState, PointerId, SelectionConfig, SelectionController, SelectionState,
};
pub use session::{ImagePlacement, ViewerSession};
