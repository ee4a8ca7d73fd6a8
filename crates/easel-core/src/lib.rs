//! # Easel Core
//!
//! Core types shared by every Easel crate:
//! - the error taxonomy used at the editor's boundaries
//! - the change-notification event bus
//! - the opaque key-value blob store the session persists into

pub mod error;
pub mod event_bus;
pub mod store;

pub use error::{ActionError, Error, InterchangeError, PersistenceError, Result, StoreError};

pub use event_bus::{
    AppEvent, DocumentEvent, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter,
    RestoreSource, SessionEvent, SubscriptionId,
};

pub use store::{BlobStore, MemoryStore};
