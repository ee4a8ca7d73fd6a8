//! Layer (z-order) operations.
//!
//! These never mutate a document. They compute the full new ordering with
//! contiguous `zIndex` values 1..N and hand back the `REORDER` action that
//! commits it.

use crate::action::Action;
use crate::model::{Document, Item};

/// Direction of a layer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMove {
    /// One step toward the viewer.
    Forward,
    /// One step away from the viewer.
    Backward,
    /// To the top of the stack.
    ToFront,
    /// To the bottom of the stack.
    ToBack,
}

/// Builds the `REORDER` for moving `id` one way through the stack.
///
/// Returns `None` when the item does not exist or is already at the end of
/// the stack it is moving toward.
pub fn reorder_layers(doc: &Document, id: &str, movement: LayerMove) -> Option<Action> {
    let index = doc.index_of(id)?;
    let last = doc.items.len() - 1;

    let target = match movement {
        LayerMove::Forward | LayerMove::ToFront if index == last => return None,
        LayerMove::Backward | LayerMove::ToBack if index == 0 => return None,
        LayerMove::Forward => index + 1,
        LayerMove::Backward => index - 1,
        LayerMove::ToFront => last,
        LayerMove::ToBack => 0,
    };

    let mut items = doc.items.clone();
    let moved = items.remove(index);
    items.insert(target, moved);
    renumber_z_index(&mut items);

    Some(Action::Reorder { items })
}

pub fn bring_forward(doc: &Document, id: &str) -> Option<Action> {
    reorder_layers(doc, id, LayerMove::Forward)
}

pub fn send_backward(doc: &Document, id: &str) -> Option<Action> {
    reorder_layers(doc, id, LayerMove::Backward)
}

pub fn bring_to_front(doc: &Document, id: &str) -> Option<Action> {
    reorder_layers(doc, id, LayerMove::ToFront)
}

pub fn send_to_back(doc: &Document, id: &str) -> Option<Action> {
    reorder_layers(doc, id, LayerMove::ToBack)
}

/// Rewrites `zIndex` to match array order, starting at 1.
pub fn renumber_z_index(items: &mut [Item]) {
    for (position, item) in items.iter_mut().enumerate() {
        item.style.z_index = position as i64 + 1;
    }
}

/// Next free `zIndex` above every item in the document.
pub fn next_z_index(doc: &Document) -> i64 {
    doc.items
        .iter()
        .map(|item| item.style.z_index)
        .max()
        .unwrap_or(0)
        + 1
}
