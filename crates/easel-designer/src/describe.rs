//! Human-readable descriptions for history entries.
//!
//! Descriptions carry no behavior. What an `UPDATE` changed is derived by
//! comparing the item before and after, never stored on the action.

use chrono::Utc;

use crate::action::Action;
use crate::history::HistoryEntry;
use crate::model::{Document, Item};

/// What an item update touched, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Only `x`/`y` changed.
    Position,
    /// `width`/`height` changed (possibly with `x`/`y`, as when resizing
    /// from a top or left handle).
    Size,
    /// Decorative style fields or `zIndex` changed.
    Style,
    /// Nothing in `style` changed: props, kind, flags.
    Property,
}

impl ChangeKind {
    fn verb(&self) -> &'static str {
        match self {
            ChangeKind::Position => "Moved",
            ChangeKind::Size => "Resized",
            ChangeKind::Style => "Restyled",
            ChangeKind::Property => "Edited",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ChangeKind::Position => "✥",
            ChangeKind::Size => "⤡",
            ChangeKind::Style => "🎨",
            ChangeKind::Property => "✎",
        }
    }
}

/// Classifies an update by which style sub-fields differ.
pub fn classify_update(before: &Item, after: &Item) -> ChangeKind {
    let (old, new) = (&before.style, &after.style);
    let position = old.x != new.x || old.y != new.y;
    let size = old.width != new.width || old.height != new.height;
    let decoration = old.z_index != new.z_index || old.extra != new.extra;

    if decoration {
        ChangeKind::Style
    } else if size {
        ChangeKind::Size
    } else if position {
        ChangeKind::Position
    } else {
        ChangeKind::Property
    }
}

fn name_of(doc: &Document, id: &str) -> String {
    doc.item(id)
        .map(Item::display_name)
        .unwrap_or_else(|| "item".to_string())
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "item"
    } else {
        "items"
    }
}

/// Produces the (description, icon) pair for a transition.
///
/// `before` and `after` are the documents on either side of `action`.
pub fn describe_action(action: &Action, before: &Document, after: &Document) -> (String, String) {
    let (description, icon) = match action {
        Action::Add { item } => (format!("Added {}", item.display_name()), "➕"),
        Action::Update { id, .. } => match (before.item(id), after.item(id)) {
            (Some(old), Some(new)) => {
                let change = classify_update(old, new);
                (
                    format!("{} {}", change.verb(), new.display_name()),
                    change.icon(),
                )
            }
            _ => (format!("Edited {}", name_of(before, id)), "✎"),
        },
        Action::Delete { id } => {
            let removed = before.items.len() - after.items.len();
            if removed > 1 {
                (format!("Deleted group of {} items", removed), "🗑")
            } else {
                (format!("Deleted {}", name_of(before, id)), "🗑")
            }
        }
        Action::DeleteBatch { .. } => {
            let removed = before.items.len() - after.items.len();
            (format!("Deleted {} {}", removed, plural(removed)), "🗑")
        }
        Action::Move { id, .. } => (format!("Moved {}", name_of(before, id)), "✥"),
        Action::Reorder { .. } => ("Reordered layers".to_string(), "☰"),
        Action::ToggleVisibility { id } => {
            let verb = match after.item(id) {
                Some(item) if item.visible => "Showed",
                _ => "Hid",
            };
            (format!("{} {}", verb, name_of(before, id)), "👁")
        }
        Action::ToggleLock { id } => match after.item(id) {
            Some(item) if item.locked => (format!("Locked {}", item.display_name()), "🔒"),
            _ => (format!("Unlocked {}", name_of(before, id)), "🔓"),
        },
        Action::Group { .. } => {
            let count = after
                .selected_id
                .as_deref()
                .and_then(|id| after.item(id))
                .and_then(|item| item.group_id.as_deref())
                .map(|group_id| after.group_members(group_id).len())
                .unwrap_or(0);
            (format!("Grouped {} {}", count, plural(count)), "⛓")
        }
        Action::Ungroup { .. } => {
            let count = after.selected_ids.len();
            (format!("Ungrouped {} {}", count, plural(count)), "⛓")
        }
        Action::SetCanvasConfig { .. } => ("Changed canvas settings".to_string(), "▭"),
        Action::Import { items, .. } => (
            format!("Imported {} {}", items.len(), plural(items.len())),
            "⤓",
        ),
        Action::Select { .. } | Action::SelectMany { .. } => {
            ("Changed selection".to_string(), "☐")
        }
        Action::SetScale { .. } => ("Changed zoom".to_string(), "🔍"),
        Action::SetSnapLines { .. } => ("Updated guides".to_string(), "┼"),
        Action::SetPanelVisibility { .. } => ("Toggled panel".to_string(), "▤"),
        Action::ReplaceWholeState { .. } => ("Synchronized document".to_string(), "⟳"),
    };
    (description, icon.to_string())
}

/// Builds the history entry recorded for `action`.
pub fn describe(action: &Action, before: &Document, after: &Document) -> HistoryEntry {
    let (description, icon) = describe_action(action, before, after);
    HistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        action_kind: action.kind(),
        description,
        timestamp: Utc::now(),
        icon,
    }
}
