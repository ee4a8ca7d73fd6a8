use easel_designer::{snap, CanvasConfig, Item, ItemKind, SnapLine, Style};

fn shape(id: &str, x: f64, y: f64, width: f64, height: f64) -> Item {
    Item::new(id, ItemKind::Shape, Style::new(x, y, width, height))
}

/// Two siblings well apart vertically and a mover parked below them.
fn scene() -> Vec<Item> {
    vec![
        shape("first", 100.0, 0.0, 50.0, 50.0),
        shape("second", 300.0, 200.0, 50.0, 50.0),
        shape("moving", 0.0, 400.0, 50.0, 50.0),
    ]
}

#[test]
fn test_left_edges_align() {
    let result = snap("moving", 103.0, 400.0, &scene(), &CanvasConfig::default(), 5.0);

    assert_eq!(result.x, 100.0);
    assert_eq!(result.y, 400.0);
    assert_eq!(result.guides, vec![SnapLine::vertical(100.0)]);
}

#[test]
fn test_left_edge_meets_right_edge() {
    let result = snap("moving", 148.0, 400.0, &scene(), &CanvasConfig::default(), 5.0);

    assert_eq!(result.x, 150.0);
    assert_eq!(result.guides, vec![SnapLine::vertical(150.0)]);
}

#[test]
fn test_canvas_center_fallback() {
    let canvas = CanvasConfig {
        width: 1050.0,
        ..Default::default()
    };

    let result = snap("moving", 502.0, 400.0, &scene(), &canvas, 5.0);

    assert_eq!(result.x, 500.0);
    assert_eq!(result.guides, vec![SnapLine::vertical(525.0)]);
}

#[test]
fn test_no_snap_passes_through() {
    let result = snap("moving", 500.0, 400.0, &scene(), &CanvasConfig::default(), 5.0);

    assert_eq!((result.x, result.y), (500.0, 400.0));
    assert!(!result.is_snapped());
}

#[test]
fn test_both_axes_snap_independently() {
    let result = snap("moving", 296.0, 223.0, &scene(), &CanvasConfig::default(), 5.0);

    // The mover's top edge is tested first, so it lands on the sibling's center line.
    assert_eq!((result.x, result.y), (300.0, 225.0));
    assert_eq!(
        result.guides,
        vec![SnapLine::vertical(300.0), SnapLine::horizontal(225.0)]
    );
}

#[test]
fn test_sibling_order_beats_distance() {
    let mut items = scene();
    items.insert(1, shape("closer", 102.0, 600.0, 50.0, 50.0));

    let result = snap("moving", 103.0, 400.0, &items, &CanvasConfig::default(), 5.0);
    assert_eq!(result.x, 100.0);

    items.swap(0, 1);
    let result = snap("moving", 103.0, 400.0, &items, &CanvasConfig::default(), 5.0);
    assert_eq!(result.x, 102.0);
}

#[test]
fn test_hidden_siblings_are_ignored() {
    let mut items = scene();
    items[0].visible = false;

    let result = snap("moving", 103.0, 400.0, &items, &CanvasConfig::default(), 5.0);

    assert_eq!(result.x, 103.0);
}

#[test]
fn test_tolerance_is_inclusive() {
    let result = snap("moving", 105.0, 400.0, &scene(), &CanvasConfig::default(), 5.0);
    assert_eq!(result.x, 100.0);

    let result = snap("moving", 105.5, 400.0, &scene(), &CanvasConfig::default(), 5.0);
    assert_eq!(result.x, 105.5);
}

#[test]
fn test_unknown_mover_passes_through() {
    let result = snap("ghost", 101.0, 1.0, &scene(), &CanvasConfig::default(), 5.0);
    assert_eq!((result.x, result.y), (101.0, 1.0));
    assert!(result.guides.is_empty());
}
