//! Editor configuration
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML files; every section and field is optional in the file and falls
//! back to its default.
//!
//! Configuration is organized into sections:
//! - History (undo depth)
//! - Snapping (on/off, tolerance)
//! - Canvas defaults for new documents
//! - Storage (keys and directory for the session blobs)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "easel";

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undoable steps
    pub max_entries: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_entries: 50 }
    }
}

/// Drag snapping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Snap while dragging
    pub enabled: bool,
    /// Snap distance in canvas pixels
    pub tolerance: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance: 5.0,
        }
    }
}

/// Canvas used for new, empty documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    /// CSS color string
    pub background: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            background: "#ffffff".to_string(),
        }
    }
}

/// Session storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Key of the full history blob
    pub history_key: String,
    /// Key of the bare present document
    pub document_key: String,
    /// Directory holding the blobs; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            history_key: "easel.history".to_string(),
            document_key: "easel.document".to_string(),
            directory: None,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history: HistorySettings,
    pub snap: SnapSettings,
    pub canvas: CanvasSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("none").to_string()).into()),
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    }
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Loads `path` (or the default path when it exists), falling back to
    /// defaults on any error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => path,
                None => return Self::default(),
            },
        };

        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config, {} unusable: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.history.max_entries == 0 {
            return Err(invalid("history.max_entries", "must be > 0"));
        }

        if !self.snap.tolerance.is_finite() || self.snap.tolerance < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "snap.tolerance".to_string(),
                value: self.snap.tolerance.to_string(),
            }
            .into());
        }

        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(invalid("canvas", "width and height must be > 0"));
        }

        if self.storage.history_key.is_empty() || self.storage.document_key.is_empty() {
            return Err(invalid("storage", "keys must not be empty"));
        }
        if self.storage.history_key == self.storage.document_key {
            return Err(invalid("storage", "history and document keys must differ"));
        }

        Ok(())
    }

    /// Merge another config into this one
    ///
    /// Sections left at their defaults in `other` do not override.
    pub fn merge(&mut self, other: &EditorConfig) {
        if other.history != HistorySettings::default() {
            self.history = other.history.clone();
        }
        if other.snap != SnapSettings::default() {
            self.snap = other.snap.clone();
        }
        if other.canvas != CanvasSettings::default() {
            self.canvas = other.canvas.clone();
        }
        if other.storage != StorageSettings::default() {
            self.storage = other.storage.clone();
        }
    }

    /// Directory the session blobs live in
    pub fn storage_dir(&self) -> SettingsResult<PathBuf> {
        match &self.storage.directory {
            Some(directory) => Ok(directory.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| {
                    SettingsError::ConfigDirectory("no platform data directory".to_string())
                }),
        }
    }
}
