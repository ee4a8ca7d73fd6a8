//! Item duplication.

use crate::action::Action;
use crate::layers::next_z_index;
use crate::model::{generate_item_id, Document, Item};

/// Offset applied to a duplicate so it does not sit exactly on its source.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Builds the copy of `id` that a duplicate command would add.
///
/// The copy gets a fresh id, a deep copy of the props, a position shifted
/// by `offset` on both axes and the top `zIndex`. It never joins the
/// source's group.
pub fn duplicate_item(doc: &Document, id: &str, offset: f64) -> Option<Item> {
    let source = doc.item(id)?;

    let mut copy = source.clone();
    copy.id = generate_item_id();
    copy.style.x += offset;
    copy.style.y += offset;
    copy.style.z_index = next_z_index(doc);
    copy.group_id = None;
    copy.is_group = false;
    Some(copy)
}

/// The `ADD` action for duplicating `id`, or `None` if it does not exist.
pub fn duplicate(doc: &Document, id: &str) -> Option<Action> {
    duplicate_item(doc, id, DUPLICATE_OFFSET).map(|item| Action::Add { item })
}
