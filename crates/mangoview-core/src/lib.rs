//! # MangoView Core
//!
//! Core types for the MangoView page annotation viewer.
//! Provides the page geometry model, nearest-symbol hit testing,
//! selection value types, errors and the event bus.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod hit_test;
pub mod page;
pub mod selection;

pub use error::{LoadError, PageError};
pub use event_bus::{
    AppEvent, EventBus, EventBusError, EventCategory, EventFilter, PageEvent, SelectionEvent,
    SubscriptionId,
};
pub use geometry::{Aabb, Point};
pub use hit_test::{nearest_symbol, HitTester, LinearScan, SymbolHit};
pub use page::{Cluster, Hint, HintResult, Page, PageData, Paragraph, Reading, Symbol};
pub use selection::{Content, PageTurn, Selection, Target};
