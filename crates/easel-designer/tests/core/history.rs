use easel_designer::{
    Action, ActionKind, History, Item, ItemKind, ItemPatch, Style, StylePatch, Transition,
};
use proptest::prelude::*;

fn add(id: &str) -> Action {
    Action::Add {
        item: Item::new(id, ItemKind::Shape, Style::new(0.0, 0.0, 10.0, 10.0)),
    }
}

fn history_with(ids: &[&str]) -> History {
    let mut history = History::default().with_max_len(1_000);
    for id in ids {
        history.dispatch(&add(id));
    }
    history
}

#[test]
fn test_new_history_is_empty() {
    let history = History::default();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.current_index(), 0);
    assert_eq!(history.timeline_len(), 1);
}

#[test]
fn test_undo_moves_entry_to_future() {
    let mut history = history_with(&["a", "b"]);

    assert_eq!(history.undo(), Transition::Travelled);

    assert_eq!(history.document().items.len(), 1);
    assert_eq!(history.past_entries().len(), 1);
    assert_eq!(history.future_entries().len(), 1);
    assert_eq!(history.future().len(), 1);
    assert_eq!(history.future()[0].items.len(), 2);
}

#[test]
fn test_undo_redo_at_edges_are_noops() {
    let mut history = History::default();
    assert_eq!(history.undo(), Transition::Unchanged);
    assert_eq!(history.redo(), Transition::Unchanged);
}

#[test]
fn test_view_actions_keep_future() {
    let mut history = history_with(&["a", "b"]);
    history.undo();
    assert_eq!(history.document().selected_id.as_deref(), Some("a"));

    assert_eq!(
        history.dispatch(&Action::Select {
            id: Some("a".to_string()),
        }),
        Transition::Unchanged
    );
    assert_eq!(
        history.dispatch(&Action::Select { id: None }),
        Transition::ViewUpdated
    );
    assert_eq!(
        history.dispatch(&Action::SetScale { value: 2.0 }),
        Transition::ViewUpdated
    );
    assert!(history.can_redo());
    assert_eq!(history.future().len(), 1);
}

#[test]
fn test_silent_sync_replaces_present_only() {
    let mut history = history_with(&["a"]);
    let mut other = history.document().clone();
    other.scale = 3.0;

    let transition = history.dispatch(&Action::ReplaceWholeState {
        state: Box::new(other),
    });

    assert_eq!(transition, Transition::Synced);
    assert!(!transition.should_persist());
    assert_eq!(history.document().scale, 3.0);
    assert_eq!(history.past().len(), 1);
}

#[test]
fn test_entries_describe_changes() {
    let mut history = history_with(&["a"]);
    history.dispatch(&Action::Move {
        id: "a".to_string(),
        x: 5.0,
        y: 5.0,
    });
    history.dispatch(&Action::Update {
        id: "a".to_string(),
        patch: ItemPatch::style(StylePatch::size(20.0, 20.0)),
    });
    history.dispatch(&Action::ToggleVisibility { id: "a".to_string() });

    let descriptions: Vec<(ActionKind, &str)> = history
        .past_entries()
        .iter()
        .map(|entry| (entry.action_kind, entry.description.as_str()))
        .collect();
    assert_eq!(
        descriptions,
        vec![
            (ActionKind::Add, "Added Shape"),
            (ActionKind::Move, "Moved Shape"),
            (ActionKind::Update, "Resized Shape"),
            (ActionKind::ToggleVisibility, "Hid Shape"),
        ]
    );
}

#[test]
fn test_jump_back_and_forward() {
    let mut history = history_with(&["a", "b", "c", "d"]);
    assert_eq!(history.current_index(), 4);

    assert_eq!(history.jump_to(1), Transition::Travelled);
    assert_eq!(history.document().items.len(), 1);
    assert_eq!(history.past().len(), 1);
    assert_eq!(history.future().len(), 3);
    assert_eq!(history.past_entries().len(), 1);
    assert_eq!(history.future_entries().len(), 3);

    assert_eq!(history.jump_to(3), Transition::Travelled);
    assert_eq!(history.document().items.len(), 3);
    assert_eq!(history.past().len(), 3);
    assert_eq!(history.future().len(), 1);
    assert_eq!(history.future_entries()[0].description, "Added Shape");
}

#[test]
fn test_jump_to_current_is_noop() {
    let mut history = history_with(&["a", "b"]);
    history.undo();
    let before = history.clone();

    assert_eq!(history.jump_to(history.current_index()), Transition::Unchanged);
    assert_eq!(history, before);
}

#[test]
fn test_cap_is_enforced() {
    let mut history = History::default().with_max_len(3);
    for index in 0..10 {
        history.dispatch(&add(&format!("item-{}", index)));
        assert!(history.past().len() <= 3);
        assert_eq!(history.past().len(), history.past_entries().len());
    }
    assert_eq!(history.past()[0].items.len(), 7);
}

#[test]
fn test_lowering_cap_trims() {
    let mut history = history_with(&["a", "b", "c", "d"]);
    history.set_max_len(2);
    assert_eq!(history.past().len(), 2);
    assert_eq!(history.past_entries().len(), 2);
    assert_eq!(history.document().items.len(), 4);
}

#[test]
fn test_clear_keeps_present() {
    let mut history = history_with(&["a", "b"]);
    history.undo();
    assert!(history.clear());
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.document().items.len(), 1);
    assert!(!history.clear());
}

#[test]
fn test_serialized_shape() {
    let history = history_with(&["a"]);
    let value = serde_json::to_value(&history).unwrap();

    for field in ["past", "present", "future", "pastEntries", "futureEntries"] {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    let entry = &value["pastEntries"][0];
    assert_eq!(entry["actionKind"], "ADD");
    assert_eq!(entry["humanDescription"], "Added Shape");

    let restored: History = serde_json::from_value(value).unwrap();
    assert_eq!(restored.document(), history.document());
    assert!(restored.validate().is_ok());
}

/// One step of a random editing session, resolved against the document.
#[derive(Debug, Clone)]
enum Op {
    Add,
    Move(usize, i32, i32),
    Resize(usize, i32),
    Toggle(usize),
    Delete(usize),
    Group(usize, usize),
    Select(usize),
    Scale(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Add),
        (0usize..8, -500i32..500, -500i32..500).prop_map(|(i, x, y)| Op::Move(i, x, y)),
        (0usize..8, 1i32..400).prop_map(|(i, w)| Op::Resize(i, w)),
        (0usize..8).prop_map(Op::Toggle),
        (0usize..8).prop_map(Op::Delete),
        (0usize..8, 0usize..8).prop_map(|(i, j)| Op::Group(i, j)),
        (0usize..8).prop_map(Op::Select),
        (1i32..40).prop_map(Op::Scale),
    ]
}

fn resolve(op: &Op, history: &History, counter: &mut usize) -> Action {
    let items = &history.document().items;
    let id = |index: usize| -> String {
        if items.is_empty() {
            "missing".to_string()
        } else {
            items[index % items.len()].id.clone()
        }
    };

    match op {
        Op::Add => {
            *counter += 1;
            add(&format!("item-{}", counter))
        }
        Op::Move(i, x, y) => Action::Move {
            id: id(*i),
            x: f64::from(*x),
            y: f64::from(*y),
        },
        Op::Resize(i, w) => Action::Update {
            id: id(*i),
            patch: ItemPatch::style(StylePatch {
                width: Some(f64::from(*w)),
                ..Default::default()
            }),
        },
        Op::Toggle(i) => Action::ToggleLock { id: id(*i) },
        Op::Delete(i) => Action::Delete { id: id(*i) },
        Op::Group(i, j) => Action::Group {
            ids: vec![id(*i), id(*j)],
        },
        Op::Select(i) => Action::Select { id: Some(id(*i)) },
        Op::Scale(s) => Action::SetScale {
            value: f64::from(*s) / 10.0,
        },
    }
}

fn play(ops: &[Op]) -> (History, usize) {
    let mut history = History::default().with_max_len(1_000);
    let mut counter = 0;
    let mut recorded = 0;
    for op in ops {
        let action = resolve(op, &history, &mut counter);
        if history.dispatch(&action) == Transition::Recorded {
            recorded += 1;
        }
    }
    (history, recorded)
}

proptest! {
    #[test]
    fn prop_undo_all_then_redo_all_round_trips(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let (mut history, recorded) = play(&ops);
        let final_present = history.document().clone();
        let entries = history.past_entries().to_vec();
        let oldest = history.past().first().cloned();

        for _ in 0..recorded {
            prop_assert_eq!(history.undo(), Transition::Travelled);
        }
        prop_assert!(!history.can_undo());
        if let Some(oldest) = oldest {
            prop_assert_eq!(history.document(), oldest.as_ref());
        }
        prop_assert_eq!(history.future_entries(), entries.as_slice());

        for _ in 0..recorded {
            prop_assert_eq!(history.redo(), Transition::Travelled);
        }
        prop_assert!(!history.can_redo());
        prop_assert_eq!(history.document(), &final_present);
        prop_assert_eq!(history.past_entries(), entries.as_slice());
    }

    #[test]
    fn prop_jump_is_path_independent(
        ops in prop::collection::vec(op_strategy(), 1..30),
        undos in 0usize..10,
        i in 0usize..40,
        j in 0usize..40,
    ) {
        let (mut history, _) = play(&ops);
        for _ in 0..undos {
            history.undo();
        }
        let len = history.timeline_len();
        let (i, j) = (i % len, j % len);

        let mut via = history.clone();
        via.jump_to(i);
        via.jump_to(j);

        let mut direct = history.clone();
        direct.jump_to(j);

        prop_assert_eq!(&via, &direct);
        prop_assert!(via.validate().is_ok());
        prop_assert_eq!(via.current_index(), j);
    }

    #[test]
    fn prop_lengths_stay_paired(ops in prop::collection::vec(op_strategy(), 0..60), cap in 1usize..10) {
        let mut history = History::default().with_max_len(cap);
        let mut counter = 0;
        for op in &ops {
            let action = resolve(op, &history, &mut counter);
            history.dispatch(&action);
            prop_assert!(history.past().len() <= cap);
            prop_assert!(history.validate().is_ok());
        }
    }
}
