use easel_core::InterchangeError;
use easel_designer::{
    export_document, import_action, parse_import, Action, History, Item, ItemKind, Style,
    Transition, FORMAT_VERSION,
};
use serde_json::json;

fn populated() -> History {
    let mut history = History::default();
    for id in ["a", "b", "c"] {
        history.dispatch(&Action::Add {
            item: Item::new(id, ItemKind::Text, Style::new(0.0, 0.0, 10.0, 10.0))
                .with_prop("text", json!(id)),
        });
    }
    history.dispatch(&Action::Group {
        ids: vec!["a".to_string(), "b".to_string()],
    });
    history
}

#[test]
fn test_export_shape() {
    let history = populated();
    let file = export_document(history.document(), Some("Landing page"));
    let value = serde_json::to_value(&file).unwrap();

    assert_eq!(value["version"], FORMAT_VERSION);
    assert!(value["timestamp"].is_string());
    assert_eq!(value["canvasConfig"]["width"], 1280.0);
    assert_eq!(value["components"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["metadata"]["componentCount"], 3);
    assert_eq!(value["metadata"]["name"], "Landing page");
}

#[test]
fn test_import_of_export_regenerates_ids() {
    let source = populated();
    let json = export_document(source.document(), None).to_json().unwrap();

    let mut target = populated();
    let action = import_action(&json).unwrap();
    assert_eq!(target.dispatch(&action), Transition::Recorded);

    let doc = target.document();
    assert_eq!(doc.items.len(), 3);
    for (imported, original) in doc.items.iter().zip(&source.document().items) {
        assert_ne!(imported.id, original.id);
        assert_eq!(imported.props, original.props);
    }
    assert!(doc.items[0].group_id.is_some());
    assert_eq!(doc.items[0].group_id, doc.items[1].group_id);
    assert_ne!(doc.items[0].group_id, source.document().items[0].group_id);
    assert!(doc.items[0].is_group);
    assert_eq!(
        target.past_entries().last().map(|entry| entry.description.as_str()),
        Some("Imported 3 items")
    );
}

#[test]
fn test_schema_violations_are_descriptive() {
    let cases = [
        ("not json", "not valid JSON"),
        ("[]", "not valid JSON"),
        (
            r#"{"canvasConfig":{"width":1,"height":1},"components":[]}"#,
            "missing required field 'version'",
        ),
        (
            r#"{"version":"1.0","components":[]}"#,
            "missing required field 'canvasConfig'",
        ),
        (
            r#"{"version":"1.0","canvasConfig":{"width":1,"height":1},"components":{}}"#,
            "field 'components' is invalid",
        ),
        (
            r#"{"version":"1.0","canvasConfig":{"width":0,"height":1},"components":[]}"#,
            "field 'canvasConfig' is invalid",
        ),
        (
            r#"{"version":"1.0","canvasConfig":{"width":1,"height":1},"components":[],"timestamp":"yesterday"}"#,
            "field 'timestamp' is invalid",
        ),
    ];

    for (json, expected) in cases {
        let err = parse_import(json).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "{:?} produced {}",
            json,
            err
        );
    }
}

#[test]
fn test_optional_fields() {
    let file = parse_import(
        r##"{"version":"1.2","canvasConfig":{"width":640,"height":480,"background":"#000"},"components":[]}"##,
    )
    .unwrap();
    assert_eq!(file.timestamp, None);
    assert_eq!(file.metadata, None);
    assert_eq!(file.canvas_config.background, "#000");
}

#[test]
fn test_failed_import_leaves_document() {
    let mut history = populated();
    let before = history.clone();

    let result = import_action(r#"{"version":"3.0","canvasConfig":{},"components":[]}"#)
        .map(|action| history.dispatch(&action));

    assert_eq!(
        result,
        Err(InterchangeError::UnsupportedVersion {
            version: "3.0".to_string()
        })
    );
    assert_eq!(history, before);
}
