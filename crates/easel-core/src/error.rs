//! Error handling for Easel
//!
//! Provides the error types for every boundary of the editor core:
//! - Interchange errors (import/export schema violations, user-facing)
//! - Persistence errors (session save/restore, logged only)
//! - Action errors (unknown or malformed actions at the JSON boundary)
//! - Store errors (blob store access)
//!
//! Reducer and history transitions never fail: invalid references and
//! invalid structural requests are no-ops, so none of these types appear
//! in their signatures.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Interchange error type
///
/// Raised when a whole-document import cannot be accepted. The message is
/// meant to be shown to the user verbatim; the document is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterchangeError {
    /// The payload is not valid JSON at all
    #[error("Import file is not valid JSON: {reason}")]
    InvalidJson {
        /// The parser's description of the problem.
        reason: String,
    },

    /// A required top-level field is missing
    #[error("Import file is missing required field '{field}'")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A field is present but has the wrong shape
    #[error("Import file field '{field}' is invalid: {reason}")]
    InvalidField {
        /// The name of the offending field.
        field: String,
        /// Why the field was rejected.
        reason: String,
    },

    /// The file was written by an incompatible format version
    #[error("Import file version {version} is not supported")]
    UnsupportedVersion {
        /// The version string found in the file.
        version: String,
    },
}

/// Persistence error type
///
/// Represents failures while saving or restoring a session. These are
/// never surfaced to the user; callers log them and fall back.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Session state could not be serialized
    #[error("Failed to serialize {key}: {source}")]
    Serialize {
        /// Storage key being written.
        key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Stored blob could not be deserialized
    #[error("Stored blob under {key} is malformed: {source}")]
    Malformed {
        /// Storage key being read.
        key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Stored history is structurally incomplete
    #[error("Stored history under {key} is inconsistent: {reason}")]
    Inconsistent {
        /// Storage key being read.
        key: String,
        /// What failed validation.
        reason: String,
    },

    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The background writer is no longer running
    #[error("Session writer stopped")]
    WriterStopped,
}

/// Action error type
///
/// Raised only when decoding actions from their JSON form. Typed actions
/// constructed in Rust cannot fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// The action kind is not part of the action set
    #[error("Unknown action kind: {kind}")]
    UnknownKind {
        /// The unrecognised kind tag.
        kind: String,
    },

    /// The kind is known but the payload does not match its shape
    #[error("Malformed {kind} action: {reason}")]
    Malformed {
        /// The action kind tag.
        kind: String,
        /// The decoder's description of the problem.
        reason: String,
    },

    /// The value is not an action envelope
    #[error("Not an action: {reason}")]
    NotAnAction {
        /// Why the value was rejected.
        reason: String,
    },
}

/// Blob store error type
#[derive(Error, Debug)]
pub enum StoreError {
    /// Read failed
    #[error("Failed to read {key}: {reason}")]
    Read {
        /// The key being read.
        key: String,
        /// The reason for the failure.
        reason: String,
    },

    /// Write failed
    #[error("Failed to write {key}: {reason}")]
    Write {
        /// The key being written.
        key: String,
        /// The reason for the failure.
        reason: String,
    },

    /// Key cannot be mapped onto the backing store
    #[error("Invalid storage key: {key}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for Easel
///
/// A unified error type that can represent any error from the core's
/// boundaries. This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Interchange error
    #[error(transparent)]
    Interchange(#[from] InterchangeError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Action decoding error
    #[error(transparent)]
    Action(#[from] ActionError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
