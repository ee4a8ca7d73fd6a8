//! Editing session: history plus its persistence and notification boundary.
//!
//! A [`Session`] is constructed once per editing session from a blob store
//! and an event bus, and closed explicitly. Every transition that should be
//! visible to others writes the full history under one key and the bare
//! present document under a second, legacy-compatible key, then publishes
//! [`DocumentEvent::Changed`]. Writes happen on a background thread so a
//! transition never waits on the store. Persistence and notification are
//! best effort: failures are logged and never undo the transition.

use std::sync::Arc;

use easel_core::{
    ActionError, AppEvent, BlobStore, DocumentEvent, EventBus, EventBusError, InterchangeError,
    PersistenceError, RestoreSource, SessionEvent,
};

use crate::action::Action;
use crate::drag::DragSession;
use crate::history::{History, HistoryEntry, Transition, DEFAULT_MAX_HISTORY};
use crate::interchange::{export_document, import_action, ExportFile};
use crate::model::{CanvasConfig, Document};
use crate::snap::DEFAULT_SNAP_TOLERANCE;
use crate::writer::SessionWriter;

/// Storage key of the full history blob.
pub const DEFAULT_HISTORY_KEY: &str = "easel.history";
/// Storage key of the bare present document.
pub const DEFAULT_DOCUMENT_KEY: &str = "easel.document";

/// Knobs for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub max_history: usize,
    pub history_key: String,
    pub document_key: String,
    /// Canvas used when nothing can be restored.
    pub default_canvas: CanvasConfig,
    pub snap_enabled: bool,
    pub snap_tolerance: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            document_key: DEFAULT_DOCUMENT_KEY.to_string(),
            default_canvas: CanvasConfig::default(),
            snap_enabled: true,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
        }
    }
}

/// Reads and writes session state through an opaque blob store.
#[derive(Clone)]
pub struct SessionPersistence {
    store: Arc<dyn BlobStore>,
    history_key: String,
    document_key: String,
}

impl SessionPersistence {
    pub fn new(
        store: Arc<dyn BlobStore>,
        history_key: impl Into<String>,
        document_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            history_key: history_key.into(),
            document_key: document_key.into(),
        }
    }

    /// Writes the history blob and the bare present document.
    pub fn save(&self, history: &History) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(history).map_err(|source| PersistenceError::Serialize {
            key: self.history_key.clone(),
            source,
        })?;
        self.store.set(&self.history_key, &blob)?;

        let document = serde_json::to_string(history.document()).map_err(|source| {
            PersistenceError::Serialize {
                key: self.document_key.clone(),
                source,
            }
        })?;
        self.store.set(&self.document_key, &document)?;
        Ok(())
    }

    /// Loads the stored history, if there is one and it is well formed.
    pub fn load_history(&self) -> Result<Option<History>, PersistenceError> {
        let Some(blob) = self.store.get(&self.history_key)? else {
            return Ok(None);
        };
        let history: History =
            serde_json::from_str(&blob).map_err(|source| PersistenceError::Malformed {
                key: self.history_key.clone(),
                source,
            })?;
        history
            .validate()
            .map_err(|reason| PersistenceError::Inconsistent {
                key: self.history_key.clone(),
                reason,
            })?;
        Ok(Some(history))
    }

    /// Loads the bare document stored under the legacy key.
    pub fn load_present(&self) -> Result<Option<Document>, PersistenceError> {
        let Some(blob) = self.store.get(&self.document_key)? else {
            return Ok(None);
        };
        serde_json::from_str(&blob)
            .map(Some)
            .map_err(|source| PersistenceError::Malformed {
                key: self.document_key.clone(),
                source,
            })
    }

    /// Restores the richest usable state, falling back from the history
    /// blob to the bare document to an empty document.
    ///
    /// Never fails: anything unreadable is logged and skipped.
    pub fn restore(&self, default_canvas: &CanvasConfig) -> (History, RestoreSource) {
        match self.load_history() {
            Ok(Some(history)) => return (history, RestoreSource::History),
            Ok(None) => tracing::debug!("No stored history under {}", self.history_key),
            Err(e) => tracing::warn!("Ignoring stored history: {}", e),
        }

        match self.load_present() {
            Ok(Some(document)) => {
                return (History::new(document), RestoreSource::LegacyDocument);
            }
            Ok(None) => tracing::debug!("No stored document under {}", self.document_key),
            Err(e) => tracing::warn!("Ignoring stored document: {}", e),
        }

        (
            History::new(Document::with_canvas(default_canvas.clone())),
            RestoreSource::Empty,
        )
    }
}

/// One editing session.
pub struct Session {
    history: History,
    persistence: SessionPersistence,
    writer: Option<SessionWriter>,
    bus: Arc<EventBus>,
    options: SessionOptions,
    source: RestoreSource,
}

impl Session {
    /// Opens a session from whatever `store` holds.
    pub fn open(store: Arc<dyn BlobStore>, bus: Arc<EventBus>, options: SessionOptions) -> Self {
        let persistence = SessionPersistence::new(
            store,
            options.history_key.clone(),
            options.document_key.clone(),
        );
        let (history, source) = persistence.restore(&options.default_canvas);
        let history = history.with_max_len(options.max_history);

        tracing::info!(
            "Session opened from {} ({} items, {} undo steps)",
            source,
            history.document().items.len(),
            history.past().len()
        );

        let writer = match SessionWriter::spawn(persistence.clone()) {
            Ok(writer) => Some(writer),
            Err(e) => {
                tracing::warn!("No background writer, saving inline: {}", e);
                None
            }
        };

        let session = Self {
            history,
            persistence,
            writer,
            bus,
            options,
            source,
        };
        session.publish(AppEvent::Session(SessionEvent::Restored { source }));
        session
    }

    pub fn document(&self) -> &Arc<Document> {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn source(&self) -> RestoreSource {
        self.source
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn past_entries(&self) -> &[HistoryEntry] {
        self.history.past_entries()
    }

    pub fn future_entries(&self) -> &[HistoryEntry] {
        self.history.future_entries()
    }

    pub fn dispatch(&mut self, action: &Action) -> Transition {
        let transition = self.history.dispatch(action);
        self.after(transition)
    }

    /// Decodes and dispatches an action in its JSON envelope.
    pub fn dispatch_json(&mut self, json: &str) -> Result<Transition, ActionError> {
        let action = Action::from_json(json)?;
        Ok(self.dispatch(&action))
    }

    pub fn undo(&mut self) -> Transition {
        let transition = self.history.undo();
        self.after(transition)
    }

    pub fn redo(&mut self) -> Transition {
        let transition = self.history.redo();
        self.after(transition)
    }

    pub fn jump_to(&mut self, index: usize) -> Transition {
        let transition = self.history.jump_to(index);
        self.after(transition)
    }

    /// Forgets every undo and redo step, keeping the present.
    pub fn clear_history(&mut self) -> Transition {
        let transition = if self.history.clear() {
            Transition::Travelled
        } else {
            Transition::Unchanged
        };
        self.after(transition)
    }

    /// Replaces the document with an interchange file.
    ///
    /// Schema violations are returned to the caller and leave the
    /// document untouched.
    pub fn import_json(&mut self, json: &str) -> Result<Transition, InterchangeError> {
        let action = import_action(json)?;
        Ok(self.dispatch(&action))
    }

    pub fn export(&self, name: Option<&str>) -> ExportFile {
        export_document(self.history.document(), name)
    }

    /// Starts a drag configured from the session's snap options.
    pub fn begin_drag(&self, id: &str) -> Option<DragSession> {
        DragSession::begin(self.history.document(), id).map(|drag| {
            drag.with_tolerance(self.options.snap_tolerance)
                .with_snapping(self.options.snap_enabled)
        })
    }

    /// Shows the drag's current guides.
    pub fn preview_drag(&mut self, drag: &DragSession) -> Transition {
        self.dispatch(&drag.guides_action())
    }

    /// Commits a drag: the move (when there is one) and the guide reset.
    pub fn finish_drag(&mut self, drag: DragSession) -> Transition {
        let mut outcome = Transition::Unchanged;
        for action in drag.commit() {
            let transition = self.dispatch(&action);
            if transition == Transition::Recorded || !outcome.is_change() {
                outcome = transition;
            }
        }
        outcome
    }

    pub fn cancel_drag(&mut self, drag: DragSession) -> Transition {
        self.dispatch(&drag.cancel())
    }

    /// Blocks until every queued write has reached the store.
    ///
    /// Returns the first write failure since the previous flush.
    pub fn flush(&self) -> Result<(), PersistenceError> {
        match &self.writer {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Persists one last time, waits for the writer and announces the close.
    pub fn close(mut self) {
        self.persist();
        if let Some(mut writer) = self.writer.take() {
            writer.shutdown();
        }
        self.publish(AppEvent::Session(SessionEvent::Closed));
        tracing::info!("Session closed");
    }

    fn after(&self, transition: Transition) -> Transition {
        if transition.should_persist() {
            self.persist();
            self.publish(AppEvent::Document(DocumentEvent::Changed));
        }
        transition
    }

    fn persist(&self) {
        if let Some(writer) = &self.writer {
            if writer.save(&self.history) {
                return;
            }
        }
        if let Err(e) = self.persistence.save(&self.history) {
            tracing::warn!("Failed to persist session: {}", e);
        }
    }

    fn publish(&self, event: AppEvent) {
        match self.bus.publish(event) {
            Ok(_) => {}
            Err(EventBusError::NoSubscribers) => {
                tracing::trace!("No listeners for session notification");
            }
        }
    }
}
