//! # Event Bus Module
//!
//! Decoupled delivery of viewer output to view bindings.
//!
//! ## Overview
//!
//! - The session publishes typed events without knowing who listens
//! - Bindings filter by category and receive events of interest
//! - Supports both sync handlers and async broadcast receivers
//!
//! ## Usage
//!
//! ```rust
//! use mangoview_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, SelectionEvent};
//! use mangoview_core::PageTurn;
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Selection]),
//!     |event| {
//!         if let AppEvent::Selection(SelectionEvent::PageTurnRequested(dir)) = event {
//!             println!("turn {}", dir);
//!         }
//!     },
//! );
//!
//! bus.publish(AppEvent::Selection(SelectionEvent::PageTurnRequested(PageTurn::Next)))
//!     .ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
