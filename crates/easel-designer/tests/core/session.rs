use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use easel_core::{
    AppEvent, BlobStore, DocumentEvent, EventBus, EventCategory, EventFilter, MemoryStore,
    RestoreSource, SessionEvent, StoreError,
};
use easel_designer::{
    Action, Document, History, Item, ItemKind, Session, SessionOptions, SnapLine, Style,
    Transition, DEFAULT_DOCUMENT_KEY, DEFAULT_HISTORY_KEY,
};

fn add(id: &str) -> Action {
    Action::Add {
        item: Item::new(id, ItemKind::Image, Style::new(0.0, 0.0, 10.0, 10.0)),
    }
}

fn count_changes(bus: &EventBus) -> Arc<AtomicUsize> {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Document]),
        move |event| {
            if event == AppEvent::Document(DocumentEvent::Changed) {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        },
    );
    counter
}

fn open(store: &Arc<MemoryStore>, bus: &Arc<EventBus>) -> Session {
    Session::open(
        Arc::clone(store) as Arc<dyn BlobStore>,
        Arc::clone(bus),
        SessionOptions::default(),
    )
}

#[test]
fn test_transitions_persist_and_notify() {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::new());
    let changes = count_changes(&bus);
    let mut session = open(&store, &bus);

    session.dispatch(&add("a"));
    session.dispatch(&Action::SetScale { value: 2.0 });
    session.undo();
    session.redo();
    session.jump_to(0);
    assert_eq!(changes.load(Ordering::SeqCst), 5);
    session.flush().unwrap();

    let stored: History =
        serde_json::from_str(&store.get(DEFAULT_HISTORY_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.document(), session.history().document());
    assert_eq!(stored.future().len(), 1);

    let legacy: Document =
        serde_json::from_str(&store.get(DEFAULT_DOCUMENT_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(&legacy, session.history().document());
}

#[test]
fn test_noops_and_silent_sync_stay_quiet() {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::new());
    let changes = count_changes(&bus);
    let mut session = open(&store, &bus);

    assert_eq!(session.undo(), Transition::Unchanged);
    assert_eq!(
        session.dispatch(&Action::Delete {
            id: "ghost".to_string()
        }),
        Transition::Unchanged
    );

    let mut other = (**session.document()).clone();
    other.scale = 4.0;
    let transition = session.dispatch(&Action::ReplaceWholeState {
        state: Box::new(other),
    });

    assert_eq!(transition, Transition::Synced);
    assert_eq!(session.document().scale, 4.0);
    assert_eq!(changes.load(Ordering::SeqCst), 0);
    session.flush().unwrap();
    assert!(store.get(DEFAULT_HISTORY_KEY).unwrap().is_none());
}

#[test]
fn test_reopen_restores_history() {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::new());

    let mut session = open(&store, &bus);
    session.dispatch(&add("a"));
    session.dispatch(&add("b"));
    session.undo();
    session.close();

    let session = open(&store, &bus);
    assert_eq!(session.source(), RestoreSource::History);
    assert_eq!(session.document().items.len(), 1);
    assert!(session.can_undo());
    assert!(session.can_redo());
    assert_eq!(session.future_entries().len(), 1);
}

#[test]
fn test_malformed_history_falls_back_to_document() {
    let store = Arc::new(MemoryStore::new());
    let mut document = Document::default();
    document.items.push(Item::new(
        "legacy",
        ItemKind::Text,
        Style::new(1.0, 2.0, 3.0, 4.0),
    ));
    store
        .set(
            DEFAULT_DOCUMENT_KEY,
            &serde_json::to_string(&document).unwrap(),
        )
        .unwrap();
    store
        .set(DEFAULT_HISTORY_KEY, r#"{"past":[],"present":{}}"#)
        .unwrap();

    let session = open(&store, &Arc::new(EventBus::new()));

    assert_eq!(session.source(), RestoreSource::LegacyDocument);
    assert_eq!(session.document().items[0].id, "legacy");
    assert!(!session.can_undo());
}

#[test]
fn test_inconsistent_history_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let mut history = History::default();
    history.dispatch(&add("a"));
    let mut value = serde_json::to_value(&history).unwrap();
    value["pastEntries"] = serde_json::json!([]);
    store
        .set(DEFAULT_HISTORY_KEY, &value.to_string())
        .unwrap();

    let session = open(&store, &Arc::new(EventBus::new()));

    assert_eq!(session.source(), RestoreSource::Empty);
    assert!(session.document().items.is_empty());
}

#[test]
fn test_garbage_everywhere_opens_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(DEFAULT_HISTORY_KEY, "{{{").unwrap();
    store.set(DEFAULT_DOCUMENT_KEY, "null?").unwrap();

    let options = SessionOptions {
        default_canvas: easel_designer::CanvasConfig {
            width: 320.0,
            height: 240.0,
            background: "#111111".to_string(),
        },
        ..Default::default()
    };
    let session = Session::open(store, Arc::new(EventBus::new()), options);

    assert_eq!(session.source(), RestoreSource::Empty);
    assert_eq!(session.document().canvas_config.width, 320.0);
}

#[test]
fn test_restore_applies_smaller_cap() {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::new());
    let mut session = open(&store, &bus);
    for id in ["a", "b", "c", "d"] {
        session.dispatch(&add(id));
    }
    session.close();

    let options = SessionOptions {
        max_history: 2,
        ..Default::default()
    };
    let session = Session::open(store, bus, options);
    assert_eq!(session.history().past().len(), 2);
    assert_eq!(session.past_entries().len(), 2);
}

#[test]
fn test_lifecycle_events() {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::new());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Session]),
        move |event| sink.lock().unwrap().push(event),
    );

    let session = open(&store, &bus);
    session.close();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            AppEvent::Session(SessionEvent::Restored {
                source: RestoreSource::Empty
            }),
            AppEvent::Session(SessionEvent::Closed),
        ]
    );
}

#[test]
fn test_import_errors_surface() {
    let store = Arc::new(MemoryStore::new());
    let mut session = open(&store, &Arc::new(EventBus::new()));
    session.dispatch(&add("a"));

    let err = session.import_json(r#"{"version":"1.0"}"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Import file is missing required field 'canvasConfig'"
    );
    assert_eq!(session.document().items.len(), 1);

    let exported = session.export(None).to_json().unwrap();
    assert_eq!(session.import_json(&exported), Ok(Transition::Recorded));
    assert_ne!(session.document().items[0].id, "a");
}

#[test]
fn test_dispatch_json_rejects_unknown_kinds() {
    let store = Arc::new(MemoryStore::new());
    let mut session = open(&store, &Arc::new(EventBus::new()));

    assert!(session
        .dispatch_json(r#"{"type":"TELEPORT","payload":{}}"#)
        .is_err());
    assert_eq!(
        session.dispatch_json(r#"{"type":"SET_SCALE","payload":{"value":0.01}}"#),
        Ok(Transition::ViewUpdated)
    );
    assert_eq!(session.document().scale, 0.1);
}

#[test]
fn test_drag_through_session() {
    let store = Arc::new(MemoryStore::new());
    let mut session = open(&store, &Arc::new(EventBus::new()));
    session.dispatch(&Action::Add {
        item: Item::new("anchor", ItemKind::Shape, Style::new(100.0, 0.0, 50.0, 50.0)),
    });
    session.dispatch(&Action::Add {
        item: Item::new("moving", ItemKind::Shape, Style::new(400.0, 300.0, 50.0, 50.0)),
    });

    let mut drag = session.begin_drag("moving").unwrap();
    drag.update(session.document(), 104.0, 300.0);
    assert_eq!(session.preview_drag(&drag), Transition::ViewUpdated);
    assert_eq!(session.finish_drag(drag), Transition::Recorded);

    let moved = session.document().item("moving").unwrap();
    assert_eq!(moved.style.x, 100.0);
    assert!(session.document().snap_lines.is_empty());
    assert_eq!(
        session.past_entries().last().map(|entry| entry.description.as_str()),
        Some("Moved Shape")
    );
}

/// Store whose writes take a while, counting completed writes.
struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
    writes: AtomicUsize,
}

impl BlobStore for SlowStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::thread::sleep(self.delay);
        self.inner.set(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}

#[test]
fn test_transitions_do_not_wait_for_the_store() {
    let store = Arc::new(SlowStore {
        inner: MemoryStore::new(),
        delay: Duration::from_millis(300),
        writes: AtomicUsize::new(0),
    });
    let mut session = Session::open(
        Arc::clone(&store) as Arc<dyn BlobStore>,
        Arc::new(EventBus::new()),
        SessionOptions::default(),
    );

    let started = Instant::now();
    assert_eq!(session.dispatch(&add("a")), Transition::Recorded);
    assert_eq!(
        session.dispatch(&Action::SetSnapLines {
            lines: vec![SnapLine::vertical(100.0)]
        }),
        Transition::ViewUpdated
    );
    assert!(started.elapsed() < Duration::from_millis(300));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);

    session.flush().unwrap();
    assert!(store.writes.load(Ordering::SeqCst) >= 2);
    let stored: History =
        serde_json::from_str(&store.get(DEFAULT_HISTORY_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.document().items, session.document().items);
    assert_eq!(stored.past().len(), 1);
}

#[test]
fn test_close_waits_for_pending_writes() {
    let store = Arc::new(SlowStore {
        inner: MemoryStore::new(),
        delay: Duration::from_millis(20),
        writes: AtomicUsize::new(0),
    });
    let mut session = Session::open(
        Arc::clone(&store) as Arc<dyn BlobStore>,
        Arc::new(EventBus::new()),
        SessionOptions::default(),
    );
    for id in ["a", "b", "c"] {
        session.dispatch(&add(id));
    }
    session.close();

    let stored: History =
        serde_json::from_str(&store.get(DEFAULT_HISTORY_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.document().items.len(), 3);
    assert_eq!(stored.past().len(), 3);
}
