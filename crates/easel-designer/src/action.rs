//! The closed set of actions the editor core accepts.
//!
//! Actions travel as `{"type": "MOVE", "payload": {...}}`. Decoding goes
//! through [`Action::from_json`], which rejects unknown kinds outright
//! instead of applying part of them.

use easel_core::ActionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    CanvasConfig, CanvasConfigPatch, Document, Item, ItemId, ItemPatch, Panel, SnapLine,
};

/// A typed state transition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Add {
        item: Item,
    },
    Update {
        id: ItemId,
        patch: ItemPatch,
    },
    Delete {
        id: ItemId,
    },
    DeleteBatch {
        ids: Vec<ItemId>,
    },
    Select {
        id: Option<ItemId>,
    },
    SelectMany {
        ids: Vec<ItemId>,
    },
    Move {
        id: ItemId,
        x: f64,
        y: f64,
    },
    Reorder {
        items: Vec<Item>,
    },
    ToggleVisibility {
        id: ItemId,
    },
    ToggleLock {
        id: ItemId,
    },
    Group {
        ids: Vec<ItemId>,
    },
    Ungroup {
        id: ItemId,
    },
    SetCanvasConfig {
        patch: CanvasConfigPatch,
    },
    SetScale {
        value: f64,
    },
    SetSnapLines {
        lines: Vec<SnapLine>,
    },
    SetPanelVisibility {
        panel: Panel,
        visible: bool,
    },
    Import {
        #[serde(rename = "canvasConfig")]
        canvas_config: CanvasConfig,
        items: Vec<Item>,
    },
    ReplaceWholeState {
        state: Box<Document>,
    },
}

/// Kind tag of an action, kept on history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Add,
    Update,
    Delete,
    DeleteBatch,
    Select,
    SelectMany,
    Move,
    Reorder,
    ToggleVisibility,
    ToggleLock,
    Group,
    Ungroup,
    SetCanvasConfig,
    SetScale,
    SetSnapLines,
    SetPanelVisibility,
    Import,
    ReplaceWholeState,
}

impl ActionKind {
    /// Parses a wire tag such as `"DELETE_BATCH"`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        serde_json::from_value(Value::String(tag.to_string())).ok()
    }
}

/// How the history treats a state-changing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    /// Structural change: recorded in history, persisted, notified.
    Recorded,
    /// View change: replaces the present only, persisted, notified.
    ViewOnly,
    /// Snapshot pushed from another view: replaces the present silently.
    SilentSync,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Add { .. } => ActionKind::Add,
            Action::Update { .. } => ActionKind::Update,
            Action::Delete { .. } => ActionKind::Delete,
            Action::DeleteBatch { .. } => ActionKind::DeleteBatch,
            Action::Select { .. } => ActionKind::Select,
            Action::SelectMany { .. } => ActionKind::SelectMany,
            Action::Move { .. } => ActionKind::Move,
            Action::Reorder { .. } => ActionKind::Reorder,
            Action::ToggleVisibility { .. } => ActionKind::ToggleVisibility,
            Action::ToggleLock { .. } => ActionKind::ToggleLock,
            Action::Group { .. } => ActionKind::Group,
            Action::Ungroup { .. } => ActionKind::Ungroup,
            Action::SetCanvasConfig { .. } => ActionKind::SetCanvasConfig,
            Action::SetScale { .. } => ActionKind::SetScale,
            Action::SetSnapLines { .. } => ActionKind::SetSnapLines,
            Action::SetPanelVisibility { .. } => ActionKind::SetPanelVisibility,
            Action::Import { .. } => ActionKind::Import,
            Action::ReplaceWholeState { .. } => ActionKind::ReplaceWholeState,
        }
    }

    pub fn class(&self) -> ActionClass {
        match self {
            Action::Add { .. }
            | Action::Update { .. }
            | Action::Delete { .. }
            | Action::DeleteBatch { .. }
            | Action::Move { .. }
            | Action::Reorder { .. }
            | Action::ToggleVisibility { .. }
            | Action::ToggleLock { .. }
            | Action::Group { .. }
            | Action::Ungroup { .. }
            | Action::SetCanvasConfig { .. }
            | Action::Import { .. } => ActionClass::Recorded,
            Action::Select { .. }
            | Action::SelectMany { .. }
            | Action::SetScale { .. }
            | Action::SetSnapLines { .. }
            | Action::SetPanelVisibility { .. } => ActionClass::ViewOnly,
            Action::ReplaceWholeState { .. } => ActionClass::SilentSync,
        }
    }

    /// Decodes an action from its JSON envelope.
    pub fn from_json(json: &str) -> Result<Self, ActionError> {
        let value: Value = serde_json::from_str(json).map_err(|e| ActionError::NotAnAction {
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Decodes an action from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ActionError> {
        let tag = match value.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(_) => {
                return Err(ActionError::NotAnAction {
                    reason: "\"type\" must be a string".to_string(),
                })
            }
            None => {
                return Err(ActionError::NotAnAction {
                    reason: "missing \"type\"".to_string(),
                })
            }
        };

        if ActionKind::from_tag(&tag).is_none() {
            return Err(ActionError::UnknownKind { kind: tag });
        }

        serde_json::from_value(value).map_err(|e| ActionError::Malformed {
            kind: tag,
            reason: e.to_string(),
        })
    }
}
