//! Easel Settings Crate
//!
//! Handles editor configuration and the file-backed blob store sessions
//! persist into.

pub mod config;
pub mod error;
pub mod store;

pub use config::{
    CanvasSettings, EditorConfig, HistorySettings, SnapSettings, StorageSettings, APP_DIR_NAME,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use store::FileStore;
