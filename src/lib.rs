//! # MangoView
//!
//! Page-image annotation viewer. A scanned page is overlaid with invisible
//! per-symbol hit regions; clicks, double-clicks and edge drags resolve to a
//! selection that drives highlight rectangles and a floating content panel.
//!
//! ## Architecture
//!
//! MangoView is organized as a workspace with multiple crates:
//!
//! 1. **mangoview-core** - Page geometry, hit testing, selection types, errors, events
//! 2. **mangoview-settings** - Configuration files and validation
//! 3. **mangoview-viewer** - Selection controller, overlay positioner, page loading
//! 4. **mangoview** - Script replay binary that integrates all crates

pub mod script;
pub mod view;

pub use mangoview_core::{
    Aabb, AppEvent, Content, EventBus, EventFilter, Page, PageEvent, PageTurn, Point,
    Selection, SelectionEvent, Target,
};
pub use mangoview_settings::Config;
pub use mangoview_viewer::{
    DirectoryPageSource, ImagePlacement, LoadOutcome, OverlayView, PageSource, PointerId,
    SelectionController, ViewerSession, Viewport,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("MANGOVIEW_BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging on stderr with:
/// - RUST_LOG environment variable support
/// - `default_level` as the filter when RUST_LOG is unset
///
/// Stdout is left free for the event stream.
pub fn init_logging(default_level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)?,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
