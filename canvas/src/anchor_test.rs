use super::*;
use crate::doc::ShapeKind;
use uuid::Uuid;

fn rect(a: (f64, f64), b: (f64, f64)) -> Shape {
    Shape {
        id: Uuid::new_v4(),
        kind: ShapeKind::Rectangle,
        points: [Point::new(a.0, a.1), Point::new(b.0, b.1)],
        color: "#22d3ee".to_owned(),
        stroke_width: 2.0,
    }
}

fn board_with(shapes: Vec<Shape>) -> Board {
    let mut board = Board::new("anchors");
    board.shapes = shapes;
    board
}

#[test]
fn shape_anchors_are_edge_midpoints() {
    let shape = rect((10.0, 20.0), (110.0, 80.0));
    let anchors = shape_anchors(&shape);
    assert_eq!(anchors[0], (AnchorSide::Left, Point::new(10.0, 50.0)));
    assert_eq!(anchors[1], (AnchorSide::Right, Point::new(110.0, 50.0)));
    assert_eq!(anchors[2], (AnchorSide::Bottom, Point::new(60.0, 80.0)));
}

#[test]
fn anchors_normalize_reversed_corners() {
    let shape = rect((110.0, 80.0), (10.0, 20.0));
    assert_eq!(anchor_point(&shape, AnchorSide::Left), Point::new(10.0, 50.0));
}

#[test]
fn resolve_follows_the_shape() {
    let mut shape = rect((0.0, 0.0), (100.0, 100.0));
    let id = shape.id;
    let board = board_with(vec![shape.clone()]);
    let anchor = Anchor::shape(id, AnchorSide::Right, Some(Point::new(-1.0, -1.0)));
    assert_eq!(resolve(&board, &anchor), Some(Point::new(100.0, 50.0)));

    // Move the shape; the anchor tracks it, ignoring the stale carried point.
    shape.points = [Point::new(50.0, 0.0), Point::new(150.0, 100.0)];
    let board = board_with(vec![shape]);
    assert_eq!(resolve(&board, &anchor), Some(Point::new(150.0, 50.0)));
}

#[test]
fn resolve_falls_back_to_carried_point_when_shape_is_gone() {
    let board = board_with(Vec::new());
    let anchor = Anchor::shape(Uuid::new_v4(), AnchorSide::Left, Some(Point::new(7.0, 8.0)));
    assert_eq!(resolve(&board, &anchor), Some(Point::new(7.0, 8.0)));

    let orphan = Anchor::shape(Uuid::new_v4(), AnchorSide::Left, None);
    assert_eq!(resolve(&board, &orphan), None);
}

#[test]
fn bare_point_deserializes_as_literal_position() {
    let anchor: Anchor = serde_json::from_str(r#"{"x":12.0,"y":34.0}"#).unwrap();
    let board = board_with(Vec::new());
    assert_eq!(resolve(&board, &anchor), Some(Point::new(12.0, 34.0)));
}

#[test]
fn shape_anchor_round_trips_with_camel_case_id() {
    let id = Uuid::new_v4();
    let anchor = Anchor::shape(id, AnchorSide::Bottom, Some(Point::new(1.0, 2.0)));
    let json = serde_json::to_value(&anchor).unwrap();
    assert_eq!(json.get("shapeId").and_then(|v| v.as_str()), Some(id.to_string().as_str()));
    assert_eq!(json.get("side").and_then(|v| v.as_str()), Some("bottom"));
    let back: Anchor = serde_json::from_value(json).unwrap();
    assert_eq!(back, anchor);
}

#[test]
fn snap_picks_nearest_anchor_within_tolerance() {
    let shape = rect((0.0, 0.0), (100.0, 100.0));
    let id = shape.id;
    let board = board_with(vec![shape]);
    let settings = SnapSettings::default();

    let snapped = snap_to_anchor(&board, Point::new(108.0, 52.0), &settings);
    assert_eq!(snapped.shape_id(), Some(id));
    assert_eq!(snapped.carried_point(), Some(Point::new(100.0, 50.0)));

    let free = snap_to_anchor(&board, Point::new(300.0, 300.0), &settings);
    assert_eq!(free.shape_id(), None);
    assert_eq!(free.carried_point(), Some(Point::new(300.0, 300.0)));
}

#[test]
fn snap_disabled_or_zero_tolerance_yields_literal() {
    let shape = rect((0.0, 0.0), (100.0, 100.0));
    let board = board_with(vec![shape]);
    let near = Point::new(101.0, 50.0);

    let off = SnapSettings { enabled: false, tolerance: 32.0 };
    assert_eq!(snap_to_anchor(&board, near, &off).shape_id(), None);

    let zero = SnapSettings { enabled: true, tolerance: 0.0 };
    assert_eq!(snap_to_anchor(&board, near, &zero).shape_id(), None);
}

#[test]
fn snap_tolerance_clamps_at_maximum() {
    let shape = rect((0.0, 0.0), (100.0, 100.0));
    let board = board_with(vec![shape]);
    let settings = SnapSettings { enabled: true, tolerance: 10_000.0 };
    // 300 world units from the nearest anchor: beyond the 240 clamp.
    let far = snap_to_anchor(&board, Point::new(400.0, 50.0), &settings);
    assert_eq!(far.shape_id(), None);
}

#[test]
fn connector_bounds_pads_the_segment_box() {
    let board = board_with(Vec::new());
    let conn = Connector {
        id: Uuid::new_v4(),
        from: Anchor::literal(Point::new(10.0, 10.0)),
        to: Anchor::literal(Point::new(50.0, 40.0)),
        color: "#fbbf24".to_owned(),
        width: 2.0,
        label: String::new(),
    };
    let b = connector_bounds(&board, &conn).unwrap();
    assert!((b.x - 4.0).abs() < f64::EPSILON);
    assert!((b.y - 4.0).abs() < f64::EPSILON);
    assert!((b.width - 52.0).abs() < f64::EPSILON);
    assert!((b.height - 42.0).abs() < f64::EPSILON);

    assert_eq!(connector_midpoint(&board, &conn), Some(Point::new(30.0, 25.0)));
}
