//! Interactive drag bookkeeping.
//!
//! A drag calls the snap engine once per pointer move without touching the
//! committed document. Only [`DragSession::commit`] produces the actions to
//! dispatch; [`DragSession::cancel`] throws every candidate away.

use crate::action::Action;
use crate::model::{Document, ItemId};
use crate::snap::{snap, SnapResult, DEFAULT_SNAP_TOLERANCE};

/// State of one in-progress drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    item_id: ItemId,
    origin: (f64, f64),
    tolerance: f64,
    snapping: bool,
    candidate: Option<SnapResult>,
}

impl DragSession {
    /// Starts dragging `item_id`.
    ///
    /// Returns `None` for unknown or locked items: lock enforcement is the
    /// interaction layer's job, the reducer itself accepts any `MOVE`.
    pub fn begin(doc: &Document, item_id: &str) -> Option<Self> {
        let item = doc.item(item_id)?;
        if item.locked {
            tracing::debug!("Refusing to drag locked item {}", item_id);
            return None;
        }

        Some(Self {
            item_id: item.id.clone(),
            origin: (item.style.x, item.style.y),
            tolerance: DEFAULT_SNAP_TOLERANCE,
            snapping: true,
            candidate: None,
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_snapping(mut self, snapping: bool) -> Self {
        self.snapping = snapping;
        self
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Position of the item when the drag started.
    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    /// Latest candidate position, if the pointer has moved.
    pub fn candidate(&self) -> Option<&SnapResult> {
        self.candidate.as_ref()
    }

    /// Feeds a pointer position and returns the snapped candidate.
    pub fn update(&mut self, doc: &Document, x: f64, y: f64) -> &SnapResult {
        let result = if self.snapping {
            snap(
                &self.item_id,
                x,
                y,
                &doc.items,
                &doc.canvas_config,
                self.tolerance,
            )
        } else {
            SnapResult {
                x,
                y,
                guides: Vec::new(),
            }
        };
        self.candidate.insert(result)
    }

    /// Action that shows the current candidate's guides for this frame.
    pub fn guides_action(&self) -> Action {
        Action::SetSnapLines {
            lines: self
                .candidate
                .as_ref()
                .map(|candidate| candidate.guides.clone())
                .unwrap_or_default(),
        }
    }

    /// Finishes the drag: the committing `MOVE` (when the item actually
    /// moved) followed by clearing the guides.
    pub fn commit(self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        if let Some(candidate) = self.candidate {
            if (candidate.x, candidate.y) != self.origin {
                actions.push(Action::Move {
                    id: self.item_id,
                    x: candidate.x,
                    y: candidate.y,
                });
            }
        }
        actions.push(Action::SetSnapLines { lines: Vec::new() });
        actions
    }

    /// Aborts the drag. Only the guides need clearing.
    pub fn cancel(self) -> Action {
        tracing::debug!("Drag of {} cancelled", self.item_id);
        Action::SetSnapLines { lines: Vec::new() }
    }
}
