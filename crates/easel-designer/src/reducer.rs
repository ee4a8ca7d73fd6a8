//! Document reducer.
//!
//! [`reduce`] maps a document snapshot and an action to the next snapshot.
//! Snapshots are shared as `Arc<Document>`; when an action has no effect
//! the reducer hands back the very same `Arc`, which is how the history
//! detects no-ops (`Arc::ptr_eq`).
//!
//! Invalid references (unknown ids) and invalid structural requests
//! (grouping fewer than two items) are no-ops, never errors.

use std::collections::HashSet;
use std::sync::Arc;

use crate::action::Action;
use crate::model::{
    generate_group_id, group_index, CanvasConfig, CanvasConfigPatch, Document, Item, ItemId,
    ItemPatch, Panel, SnapLine, DEFAULT_SCALE, MAX_SCALE, MIN_SCALE,
};

/// Applies `action` to `state`.
///
/// Returns `state` itself (same allocation) when nothing changed.
pub fn reduce(state: &Arc<Document>, action: &Action) -> Arc<Document> {
    let doc = state.as_ref();
    let next = match action {
        Action::Add { item } => add(doc, item),
        Action::Update { id, patch } => update(doc, id, patch),
        Action::Delete { id } => delete(doc, id),
        Action::DeleteBatch { ids } => delete_batch(doc, ids),
        Action::Select { id } => select(doc, id.as_deref()),
        Action::SelectMany { ids } => select_many(doc, ids),
        Action::Move { id, x, y } => move_to(doc, id, *x, *y),
        Action::Reorder { items } => reorder(doc, items),
        Action::ToggleVisibility { id } => toggle_visibility(doc, id),
        Action::ToggleLock { id } => toggle_lock(doc, id),
        Action::Group { ids } => group(doc, ids),
        Action::Ungroup { id } => ungroup(doc, id),
        Action::SetCanvasConfig { patch } => set_canvas_config(doc, patch),
        Action::SetScale { value } => set_scale(doc, *value),
        Action::SetSnapLines { lines } => set_snap_lines(doc, lines),
        Action::SetPanelVisibility { panel, visible } => {
            set_panel_visibility(doc, *panel, *visible)
        }
        Action::Import {
            canvas_config,
            items,
        } => import(doc, canvas_config, items),
        Action::ReplaceWholeState { state: replacement } => replace_whole_state(doc, replacement),
    };

    match next {
        Some(next) => Arc::new(next),
        None => Arc::clone(state),
    }
}

fn add(doc: &Document, item: &Item) -> Option<Document> {
    let mut next = doc.clone();
    next.items.push(item.clone());
    next.selected_id = Some(item.id.clone());
    next.selected_ids = vec![item.id.clone()];
    Some(next)
}

fn update(doc: &Document, id: &str, patch: &ItemPatch) -> Option<Document> {
    let index = doc.index_of(id)?;
    let merged = patch.apply(&doc.items[index]);
    if merged == doc.items[index] {
        return None;
    }

    let mut next = doc.clone();
    next.items[index] = merged;
    Some(next)
}

fn delete(doc: &Document, id: &str) -> Option<Document> {
    let target = doc.item(id)?;

    // Deleting any member of a group deletes the whole group.
    let doomed: HashSet<&str> = match target.group_id.as_deref() {
        Some(group_id) => doc
            .items
            .iter()
            .filter(|item| item.group_id.as_deref() == Some(group_id))
            .map(|item| item.id.as_str())
            .collect(),
        None => HashSet::from([id]),
    };

    let mut next = doc.clone();
    next.items.retain(|item| !doomed.contains(item.id.as_str()));
    next.selected_ids.retain(|selected| !doomed.contains(selected.as_str()));
    if next
        .selected_id
        .as_deref()
        .is_some_and(|selected| doomed.contains(selected))
    {
        next.selected_id = None;
    }
    Some(next)
}

fn delete_batch(doc: &Document, ids: &[ItemId]) -> Option<Document> {
    let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
    if !doc.items.iter().any(|item| doomed.contains(item.id.as_str())) {
        return None;
    }

    let mut next = doc.clone();
    next.items.retain(|item| !doomed.contains(item.id.as_str()));
    next.selected_id = None;
    next.selected_ids.clear();
    normalize_groups(&mut next.items);
    Some(next)
}

fn select(doc: &Document, id: Option<&str>) -> Option<Document> {
    let (selected_id, selected_ids) = match id {
        Some(id) => {
            if !doc.contains(id) {
                return None;
            }
            (Some(id.to_string()), vec![id.to_string()])
        }
        None => (None, Vec::new()),
    };
    with_selection(doc, selected_id, selected_ids)
}

fn select_many(doc: &Document, ids: &[ItemId]) -> Option<Document> {
    let mut seen = HashSet::new();
    let selected_ids: Vec<ItemId> = ids
        .iter()
        .filter(|id| doc.contains(id) && seen.insert(id.as_str()))
        .cloned()
        .collect();
    let selected_id = match selected_ids.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    };
    with_selection(doc, selected_id, selected_ids)
}

fn with_selection(
    doc: &Document,
    selected_id: Option<ItemId>,
    selected_ids: Vec<ItemId>,
) -> Option<Document> {
    if doc.selected_id == selected_id && doc.selected_ids == selected_ids {
        return None;
    }

    let mut next = doc.clone();
    next.selected_id = selected_id;
    next.selected_ids = selected_ids;
    Some(next)
}

fn move_to(doc: &Document, id: &str, x: f64, y: f64) -> Option<Document> {
    let index = doc.index_of(id)?;
    let style = &doc.items[index].style;
    if style.x == x && style.y == y {
        return None;
    }

    let mut next = doc.clone();
    next.items[index].style.x = x;
    next.items[index].style.y = y;
    Some(next)
}

fn reorder(doc: &Document, items: &[Item]) -> Option<Document> {
    if doc.items.as_slice() == items {
        return None;
    }

    if !is_permutation(&doc.items, items) {
        // Accepted as-is; layer operations are expected to send full permutations.
        tracing::warn!(
            "REORDER received {} items that are not a permutation of the {} current items",
            items.len(),
            doc.items.len()
        );
    }

    let mut next = doc.clone();
    next.items = items.to_vec();
    Some(next)
}

fn is_permutation(current: &[Item], proposed: &[Item]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let current_ids: HashSet<&str> = current.iter().map(|item| item.id.as_str()).collect();
    let proposed_ids: HashSet<&str> = proposed.iter().map(|item| item.id.as_str()).collect();
    proposed_ids.len() == proposed.len() && current_ids == proposed_ids
}

fn toggle_visibility(doc: &Document, id: &str) -> Option<Document> {
    let index = doc.index_of(id)?;
    let mut next = doc.clone();
    next.items[index].visible = !next.items[index].visible;
    Some(next)
}

fn toggle_lock(doc: &Document, id: &str) -> Option<Document> {
    let index = doc.index_of(id)?;
    let mut next = doc.clone();
    next.items[index].locked = !next.items[index].locked;
    Some(next)
}

fn group(doc: &Document, ids: &[ItemId]) -> Option<Document> {
    if ids.len() < 2 {
        return None;
    }

    let mut seen = HashSet::new();
    let members: Vec<&str> = ids
        .iter()
        .map(String::as_str)
        .filter(|id| doc.contains(id) && seen.insert(*id))
        .collect();
    if members.len() < 2 {
        return None;
    }

    let representative = members[0];
    let group_id = generate_group_id();

    let mut next = doc.clone();
    for item in next.items.iter_mut() {
        if seen.contains(item.id.as_str()) {
            item.group_id = Some(group_id.clone());
            item.is_group = item.id == representative;
        }
    }
    next.selected_id = Some(representative.to_string());
    next.selected_ids = vec![representative.to_string()];

    // Members may have been taken from another group.
    normalize_groups(&mut next.items);

    tracing::debug!("Grouped {} items into {}", members.len(), group_id);
    Some(next)
}

fn ungroup(doc: &Document, id: &str) -> Option<Document> {
    let group_id = doc.item(id)?.group_id.clone()?;

    let mut next = doc.clone();
    let mut former_members = Vec::new();
    for item in next.items.iter_mut() {
        if item.group_id.as_deref() == Some(group_id.as_str()) {
            item.group_id = None;
            item.is_group = false;
            former_members.push(item.id.clone());
        }
    }
    next.selected_id = match former_members.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    };
    next.selected_ids = former_members;
    Some(next)
}

fn set_canvas_config(doc: &Document, patch: &CanvasConfigPatch) -> Option<Document> {
    let merged = patch.apply(&doc.canvas_config);
    if merged == doc.canvas_config {
        return None;
    }

    let mut next = doc.clone();
    next.canvas_config = merged;
    Some(next)
}

fn set_scale(doc: &Document, value: f64) -> Option<Document> {
    if !value.is_finite() {
        return None;
    }
    let scale = value.clamp(MIN_SCALE, MAX_SCALE);
    if scale == doc.scale {
        return None;
    }

    let mut next = doc.clone();
    next.scale = scale;
    Some(next)
}

fn set_snap_lines(doc: &Document, lines: &[SnapLine]) -> Option<Document> {
    if doc.snap_lines.as_slice() == lines {
        return None;
    }

    let mut next = doc.clone();
    next.snap_lines = lines.to_vec();
    Some(next)
}

fn set_panel_visibility(doc: &Document, panel: Panel, visible: bool) -> Option<Document> {
    if doc.panels.get(panel) == visible {
        return None;
    }

    let mut next = doc.clone();
    next.panels.set(panel, visible);
    Some(next)
}

fn import(doc: &Document, canvas_config: &CanvasConfig, items: &[Item]) -> Option<Document> {
    let mut next = Document {
        items: items.to_vec(),
        selected_id: None,
        selected_ids: Vec::new(),
        scale: DEFAULT_SCALE,
        canvas_config: canvas_config.clone(),
        snap_lines: Vec::new(),
        panels: doc.panels,
    };
    normalize_groups(&mut next.items);

    if next == *doc {
        return None;
    }
    Some(next)
}

fn replace_whole_state(doc: &Document, replacement: &Document) -> Option<Document> {
    if *doc == *replacement {
        return None;
    }
    Some(replacement.clone())
}

/// Restores the group invariants after members were removed or moved:
/// a group with a single member is dissolved, and every remaining group
/// has exactly one representative (the first member keeps or takes it).
pub fn normalize_groups(items: &mut [Item]) {
    let index: Vec<(String, Vec<String>)> = group_index(items)
        .into_iter()
        .map(|(group_id, members)| {
            (
                group_id.to_string(),
                members.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();

    for (group_id, members) in index {
        if members.len() < 2 {
            for item in items
                .iter_mut()
                .filter(|item| item.group_id.as_deref() == Some(group_id.as_str()))
            {
                item.group_id = None;
                item.is_group = false;
            }
            tracing::debug!("Dissolved singleton group {}", group_id);
            continue;
        }

        let representative = items
            .iter()
            .find(|item| item.group_id.as_deref() == Some(group_id.as_str()) && item.is_group)
            .map(|item| item.id.clone())
            .unwrap_or_else(|| members[0].clone());

        for item in items
            .iter_mut()
            .filter(|item| item.group_id.as_deref() == Some(group_id.as_str()))
        {
            item.is_group = item.id == representative;
        }
    }
}
