//! # Easel
//!
//! Headless driver for the Easel canvas editor core.
//!
//! ## Architecture
//!
//! Easel is organized as a workspace with multiple crates:
//!
//! 1. **easel-core** - Errors, the event bus and the blob store seam
//! 2. **easel-designer** - Document model, reducer, history, snapping, sessions
//! 3. **easel-settings** - Editor configuration and the file-backed store
//! 4. **easel** - This binary: restores a session, replays scripted actions
//!    and prints the history timeline

pub mod script;

pub use easel_core::{
    AppEvent, BlobStore, DocumentEvent, EventBus, MemoryStore, RestoreSource, SessionEvent,
};
pub use easel_designer::{
    Action, CanvasConfig, Document, History, HistoryEntry, Session, SessionOptions, Transition,
};
pub use easel_settings::{EditorConfig, FileStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr, keeping stdout for results
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Maps the editor configuration onto session options.
pub fn session_options(config: &EditorConfig) -> SessionOptions {
    SessionOptions {
        max_history: config.history.max_entries,
        history_key: config.storage.history_key.clone(),
        document_key: config.storage.document_key.clone(),
        default_canvas: CanvasConfig {
            width: config.canvas.width,
            height: config.canvas.height,
            background: config.canvas.background.clone(),
        },
        snap_enabled: config.snap.enabled,
        snap_tolerance: config.snap.tolerance,
    }
}
