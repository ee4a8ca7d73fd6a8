//! Event type definitions for the event bus.
//!
//! Change notifications are deliberately payload-free: a listener that
//! receives `DocumentEvent::Changed` re-reads whatever it needs from the
//! store or the session.

use serde::{Deserialize, Serialize};

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Document change notifications
    Document(DocumentEvent),
    /// Editing session lifecycle
    Session(SessionEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Document(_) => EventCategory::Document,
            AppEvent::Session(_) => EventCategory::Session,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Document(e) => e.description(),
            AppEvent::Session(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Document change events.
    Document,
    /// Session lifecycle events.
    Session,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Document => write!(f, "Document"),
            EventCategory::Session => write!(f, "Session"),
        }
    }
}

/// Document-related events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// The persisted session changed; re-read it.
    Changed,
}

impl DocumentEvent {
    fn description(&self) -> String {
        match self {
            DocumentEvent::Changed => "Document changed".to_string(),
        }
    }
}

/// Where a restored session came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestoreSource {
    /// Full history blob
    History,
    /// Legacy bare-document blob
    LegacyDocument,
    /// Nothing usable was stored
    Empty,
}

impl std::fmt::Display for RestoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreSource::History => write!(f, "history"),
            RestoreSource::LegacyDocument => write!(f, "legacy document"),
            RestoreSource::Empty => write!(f, "empty default"),
        }
    }
}

/// Session lifecycle events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A session was opened from storage.
    Restored {
        /// Which stored blob the session was built from.
        source: RestoreSource,
    },
    /// A session was closed after its final persist.
    Closed,
}

impl SessionEvent {
    fn description(&self) -> String {
        match self {
            SessionEvent::Restored { source } => format!("Session restored from {}", source),
            SessionEvent::Closed => "Session closed".to_string(),
        }
    }
}
