//! # Easel Designer
//!
//! State core of the Easel canvas editor: the document model, the action
//! set and its reducer, undo/redo history with time travel, and the snap
//! engine used while dragging.
//!
//! ## Core Components
//!
//! - **Model**: items, canvas configuration and the document snapshot
//! - **Actions**: the closed set of transitions, with a JSON envelope
//! - **Reducer**: pure `(document, action) -> document`
//! - **History**: past/present/future with jump-to-index
//! - **Snap**: first-match alignment against siblings and the canvas center
//! - **Session**: persistence into a blob store and change notification
//!
//! ## Architecture
//!
//! ```text
//! Session (store + event bus)
//!   └── History (past / present / future, entries)
//!         └── Reducer (Action -> Document)
//!
//! DragSession
//!   └── Snap (candidate positions, never dispatched until commit)
//!
//! Layers / Duplicate / Interchange (build actions, never mutate)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use easel_designer::{Action, History, Item, ItemKind, Style};
//!
//! let mut history = History::default();
//! history.dispatch(&Action::Add {
//!     item: Item::new("box", ItemKind::Shape, Style::new(0.0, 0.0, 100.0, 50.0)),
//! });
//! history.dispatch(&Action::Move { id: "box".into(), x: 40.0, y: 40.0 });
//!
//! history.undo();
//! assert_eq!(history.document().items[0].style.x, 0.0);
//! ```

pub mod action;
pub mod describe;
pub mod drag;
pub mod duplicate;
pub mod history;
pub mod interchange;
pub mod layers;
pub mod model;
pub mod reducer;
pub mod session;
pub mod snap;
mod writer;

pub use action::{Action, ActionClass, ActionKind};
pub use describe::{classify_update, describe, ChangeKind};
pub use drag::DragSession;
pub use duplicate::{duplicate, duplicate_item, DUPLICATE_OFFSET};
pub use history::{History, HistoryEntry, Transition, DEFAULT_MAX_HISTORY};
pub use interchange::{
    export_document, import_action, parse_import, regenerate_ids, ExportFile, ExportMetadata,
    ImportFile, FORMAT_VERSION,
};
pub use layers::{
    bring_forward, bring_to_front, next_z_index, renumber_z_index, reorder_layers, send_backward,
    send_to_back, LayerMove,
};
pub use model::{
    CanvasConfig, CanvasConfigPatch, Document, GroupId, Item, ItemId, ItemKind, ItemPatch,
    Orientation, Panel, PanelFlags, SnapLine, Style, StylePatch, MAX_SCALE, MIN_SCALE,
};
pub use reducer::{normalize_groups, reduce};
pub use session::{
    Session, SessionOptions, SessionPersistence, DEFAULT_DOCUMENT_KEY, DEFAULT_HISTORY_KEY,
};
pub use snap::{snap, SnapResult, DEFAULT_SNAP_TOLERANCE};
