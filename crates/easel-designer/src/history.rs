//! Undo/redo history with jump-to-any-point time travel.
//!
//! The history owns the timeline `[past.., present, future..]`. Every
//! snapshot is an `Arc<Document>` shared with whoever last read it, so
//! moving along the timeline never copies documents.
//!
//! `future` is stored nearest-first: `future[0]` is what the next redo
//! restores. `past` is oldest-first. `past_entries[i]` describes the
//! transition out of `past[i]`, and `future_entries[i]` the transition into
//! `future[i]`.

use std::mem;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionClass, ActionKind};
use crate::describe::describe;
use crate::model::Document;
use crate::reducer::reduce;

/// Default cap on the number of undoable steps.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Display record for one recorded transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub action_kind: ActionKind,
    #[serde(rename = "humanDescription")]
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub icon: String,
}

/// Outcome of a history operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed at all.
    Unchanged,
    /// A history-worthy change was recorded and the future discarded.
    Recorded,
    /// The present changed without touching past or future.
    ViewUpdated,
    /// The present was replaced by a snapshot from another view.
    Synced,
    /// Undo, redo or jump moved along the timeline.
    Travelled,
}

impl Transition {
    /// Whether listeners and the store should hear about this transition.
    pub fn should_persist(&self) -> bool {
        matches!(
            self,
            Transition::Recorded | Transition::ViewUpdated | Transition::Travelled
        )
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

fn default_max_len() -> usize {
    DEFAULT_MAX_HISTORY
}

/// Past/present/future state machine wrapping the reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    past: Vec<Arc<Document>>,
    present: Arc<Document>,
    future: Vec<Arc<Document>>,
    past_entries: Vec<HistoryEntry>,
    future_entries: Vec<HistoryEntry>,
    #[serde(skip, default = "default_max_len")]
    max_len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl History {
    /// Creates a history whose only snapshot is `present`.
    pub fn new(present: Document) -> Self {
        Self {
            past: Vec::new(),
            present: Arc::new(present),
            future: Vec::new(),
            past_entries: Vec::new(),
            future_entries: Vec::new(),
            max_len: DEFAULT_MAX_HISTORY,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.set_max_len(max_len);
        self
    }

    /// Changes the cap, evicting the oldest steps if already over it.
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
        self.trim();
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn present(&self) -> &Arc<Document> {
        &self.present
    }

    pub fn document(&self) -> &Document {
        &self.present
    }

    pub fn past(&self) -> &[Arc<Document>] {
        &self.past
    }

    pub fn future(&self) -> &[Arc<Document>] {
        &self.future
    }

    pub fn past_entries(&self) -> &[HistoryEntry] {
        &self.past_entries
    }

    pub fn future_entries(&self) -> &[HistoryEntry] {
        &self.future_entries
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Timeline index of the present.
    pub fn current_index(&self) -> usize {
        self.past.len()
    }

    /// Length of `[past.., present, future..]`.
    pub fn timeline_len(&self) -> usize {
        self.past.len() + 1 + self.future.len()
    }

    /// Snapshot at a timeline index.
    pub fn snapshot_at(&self, index: usize) -> Option<&Arc<Document>> {
        let current = self.current_index();
        if index < current {
            self.past.get(index)
        } else if index == current {
            Some(&self.present)
        } else {
            self.future.get(index - current - 1)
        }
    }

    /// Runs `action` through the reducer and files the result.
    pub fn dispatch(&mut self, action: &Action) -> Transition {
        let next = reduce(&self.present, action);
        if Arc::ptr_eq(&next, &self.present) {
            tracing::trace!("{:?} had no effect", action.kind());
            return Transition::Unchanged;
        }

        match action.class() {
            ActionClass::Recorded => {
                let entry = describe(action, &self.present, &next);
                tracing::debug!("Recording {:?}: {}", entry.action_kind, entry.description);

                let previous = mem::replace(&mut self.present, next);
                self.past.push(previous);
                self.past_entries.push(entry);
                self.future.clear();
                self.future_entries.clear();
                self.trim();
                Transition::Recorded
            }
            ActionClass::ViewOnly => {
                self.present = next;
                Transition::ViewUpdated
            }
            ActionClass::SilentSync => {
                self.present = next;
                Transition::Synced
            }
        }
    }

    pub fn undo(&mut self) -> Transition {
        let Some(previous) = self.past.pop() else {
            return Transition::Unchanged;
        };

        let current = mem::replace(&mut self.present, previous);
        self.future.insert(0, current);
        if let Some(entry) = self.past_entries.pop() {
            self.future_entries.insert(0, entry);
        }
        Transition::Travelled
    }

    pub fn redo(&mut self) -> Transition {
        if self.future.is_empty() {
            return Transition::Unchanged;
        }

        let next = self.future.remove(0);
        let current = mem::replace(&mut self.present, next);
        self.past.push(current);
        if !self.future_entries.is_empty() {
            let entry = self.future_entries.remove(0);
            self.past_entries.push(entry);
        }
        self.trim();
        Transition::Travelled
    }

    /// Makes the snapshot at timeline `index` the present.
    ///
    /// Everything before it becomes the past and everything after it the
    /// future, in timeline order. The current index and out-of-range
    /// indices leave the history untouched.
    pub fn jump_to(&mut self, index: usize) -> Transition {
        let current = self.current_index();
        if index == current {
            return Transition::Unchanged;
        }
        if index >= self.timeline_len() {
            tracing::debug!(
                "Ignoring jump to {} outside timeline of {}",
                index,
                self.timeline_len()
            );
            return Transition::Unchanged;
        }

        if index < current {
            // past[index] becomes the present; past[index + 1..] and the
            // old present move to the front of the future.
            let mut rewound = self.past.split_off(index);
            let target = rewound.remove(0);
            let old_present = mem::replace(&mut self.present, target);
            rewound.push(old_present);
            rewound.append(&mut self.future);
            self.future = rewound;

            let mut entries = self.past_entries.split_off(index);
            entries.append(&mut self.future_entries);
            self.future_entries = entries;
        } else {
            let steps = index - current;
            let mut advanced: Vec<_> = self.future.drain(..steps).collect();
            let Some(target) = advanced.pop() else {
                return Transition::Unchanged;
            };
            let old_present = mem::replace(&mut self.present, target);
            self.past.push(old_present);
            self.past.append(&mut advanced);

            let moved = steps.min(self.future_entries.len());
            self.past_entries.extend(self.future_entries.drain(..moved));
            self.trim();
        }

        tracing::debug!("Jumped from {} to {}", current, index);
        Transition::Travelled
    }

    /// Drops past and future, keeping the present.
    pub fn clear(&mut self) -> bool {
        if self.past.is_empty() && self.future.is_empty() {
            return false;
        }
        self.past.clear();
        self.future.clear();
        self.past_entries.clear();
        self.future_entries.clear();
        true
    }

    /// Checks the shape invariants of a history that came from outside,
    /// typically the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.past.len() != self.past_entries.len() {
            return Err(format!(
                "{} past snapshots but {} past entries",
                self.past.len(),
                self.past_entries.len()
            ));
        }
        if self.future.len() != self.future_entries.len() {
            return Err(format!(
                "{} future snapshots but {} future entries",
                self.future.len(),
                self.future_entries.len()
            ));
        }
        Ok(())
    }

    fn trim(&mut self) {
        let excess = self.past.len().saturating_sub(self.max_len);
        if excess == 0 {
            return;
        }
        self.past.drain(..excess);
        let excess_entries = excess.min(self.past_entries.len());
        self.past_entries.drain(..excess_entries);
        tracing::trace!("Evicted {} oldest history steps", excess);
    }
}
