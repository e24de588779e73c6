//! Interaction constants shared across crates.

/// Click tolerance radius in image pixels.
pub const HIT_RADIUS: f64 = crate::hit_test::DEFAULT_HIT_RADIUS;

/// Maximum gap between two clicks forming a double-click.
pub const DOUBLE_CLICK_MS: u64 = 200;

/// Fraction of the image width on each side treated as a page-turn margin.
pub const PAGE_TURN_MARGIN: f64 = 0.25;

/// Settle ticks granted by every external overlay trigger.
pub const SETTLE_TICKS: u32 = 100;

/// Cadence of the overlay settle loop.
pub const SETTLE_TICK_MS: u64 = 10;

/// Scale applied to symbol boxes when drawing highlighters.
pub const HIGHLIGHT_SCALE: f64 = 1.3;
