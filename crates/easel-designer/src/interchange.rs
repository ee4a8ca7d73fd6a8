//! Whole-document import and export.
//!
//! The interchange file is
//! `{version, timestamp, canvasConfig, components[], metadata}`. Imports are
//! validated field by field so that a bad file produces a message naming
//! what is wrong, and they never reach the reducer half-parsed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use easel_core::InterchangeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::Action;
use crate::model::{
    generate_group_id, generate_item_id, CanvasConfig, Document, GroupId, Item, ItemId,
};

/// Format version written by [`export_document`].
pub const FORMAT_VERSION: &str = "1.0";

const GENERATOR: &str = concat!("easel ", env!("CARGO_PKG_VERSION"));

/// Exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub canvas_config: CanvasConfig,
    pub components: Vec<Item>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub component_count: usize,
    pub generator: String,
}

impl ExportFile {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A validated import, ids not yet regenerated.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFile {
    pub version: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub canvas_config: CanvasConfig,
    pub components: Vec<Item>,
    /// Carried through untouched; other producers write other shapes here.
    pub metadata: Option<Value>,
}

impl ImportFile {
    /// The `IMPORT` action for this file, with every component id
    /// regenerated.
    pub fn into_action(self) -> Action {
        Action::Import {
            canvas_config: self.canvas_config,
            items: regenerate_ids(self.components),
        }
    }
}

/// Builds the export file for `doc`.
pub fn export_document(doc: &Document, name: Option<&str>) -> ExportFile {
    ExportFile {
        version: FORMAT_VERSION.to_string(),
        timestamp: Utc::now(),
        canvas_config: doc.canvas_config.clone(),
        components: doc.items.clone(),
        metadata: ExportMetadata {
            name: name.map(str::to_string),
            component_count: doc.items.len(),
            generator: GENERATOR.to_string(),
        },
    }
}

fn required<'a>(
    object: &'a serde_json::Map<String, Value>,
    field: &str,
) -> Result<&'a Value, InterchangeError> {
    object
        .get(field)
        .filter(|value| !value.is_null())
        .ok_or_else(|| InterchangeError::MissingField {
            field: field.to_string(),
        })
}

fn invalid(field: impl Into<String>, reason: impl ToString) -> InterchangeError {
    InterchangeError::InvalidField {
        field: field.into(),
        reason: reason.to_string(),
    }
}

/// Parses and validates an interchange file.
pub fn parse_import(json: &str) -> Result<ImportFile, InterchangeError> {
    let value: Value = serde_json::from_str(json).map_err(|e| InterchangeError::InvalidJson {
        reason: e.to_string(),
    })?;
    let Value::Object(object) = value else {
        return Err(InterchangeError::InvalidJson {
            reason: "top level must be an object".to_string(),
        });
    };

    let version = required(&object, "version")?
        .as_str()
        .ok_or_else(|| invalid("version", "must be a string"))?
        .to_string();
    if version.split('.').next() != Some("1") {
        return Err(InterchangeError::UnsupportedVersion { version });
    }

    let canvas_config: CanvasConfig =
        serde_json::from_value(required(&object, "canvasConfig")?.clone())
            .map_err(|e| invalid("canvasConfig", e))?;
    if !(canvas_config.width > 0.0 && canvas_config.height > 0.0) {
        return Err(invalid("canvasConfig", "width and height must be positive"));
    }

    let Value::Array(raw_components) = required(&object, "components")? else {
        return Err(invalid("components", "must be an array"));
    };
    let components = raw_components
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            serde_json::from_value::<Item>(raw.clone())
                .map_err(|e| invalid(format!("components[{}]", index), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let timestamp = match object.get("timestamp") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map_err(|e| invalid("timestamp", e))?
                .with_timezone(&Utc),
        ),
        Some(_) => return Err(invalid("timestamp", "must be an RFC 3339 string")),
    };

    Ok(ImportFile {
        version,
        timestamp,
        canvas_config,
        components,
        metadata: object.get("metadata").cloned(),
    })
}

/// Gives every item a fresh id and every group a fresh group id, and
/// rewrites `parentId` to the new item ids.
///
/// Item ids and group ids are remapped independently. Items repeating an
/// id still get distinct new ids; references resolve to the first of them.
/// A `parentId` naming no imported item is dropped.
pub fn regenerate_ids(items: Vec<Item>) -> Vec<Item> {
    let mut item_ids: HashMap<ItemId, ItemId> = HashMap::new();
    let fresh: Vec<ItemId> = items
        .iter()
        .map(|item| {
            let id = generate_item_id();
            item_ids.entry(item.id.clone()).or_insert_with(|| id.clone());
            id
        })
        .collect();
    let mut group_ids: HashMap<GroupId, GroupId> = HashMap::new();

    items
        .into_iter()
        .zip(fresh)
        .map(|(mut item, id)| {
            item.id = id;
            item.group_id = item.group_id.map(|group_id| {
                group_ids
                    .entry(group_id)
                    .or_insert_with(generate_group_id)
                    .clone()
            });
            item.parent_id = item
                .parent_id
                .and_then(|parent_id| item_ids.get(&parent_id).cloned());
            item
        })
        .collect()
}

/// Parses `json` and returns the `IMPORT` action it describes.
pub fn import_action(json: &str) -> Result<Action, InterchangeError> {
    let file = parse_import(json)?;
    tracing::info!(
        "Importing {} components (format {})",
        file.components.len(),
        file.version
    );
    Ok(file.into_action())
}
