//! # Event Bus Module
//!
//! Provides the change-notification channel between an editing session and
//! any other consumer of the same stored document (a preview surface, a
//! second view).
//!
//! ## Usage
//!
//! ```rust
//! use easel_core::event_bus::{AppEvent, DocumentEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Document]),
//!     |event| {
//!         if let AppEvent::Document(DocumentEvent::Changed) = event {
//!             // re-read the stored document
//!         }
//!     },
//! );
//!
//! bus.publish(AppEvent::Document(DocumentEvent::Changed)).ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
