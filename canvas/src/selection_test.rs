use super::*;
use crate::anchor::Anchor;
use crate::doc::{
    CausalNode, Connector, NodeStatus, Note, Shape, ShapeKind, TextItem, note_bounds, shape_bounds,
};
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

fn note(x: f64, y: f64, w: f64, h: f64) -> Note {
    Note {
        id: Uuid::new_v4(),
        content: "note".to_owned(),
        position: Point::new(x, y),
        color: "#fcd34d".to_owned(),
        width: w,
        height: h,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn move_rewrites_from_initial_geometry_each_update() {
    let mut board = Board::new("sel");
    let shape = rect((0.0, 0.0), (100.0, 100.0));
    let id = shape.id;
    board.shapes = vec![shape];
    let snap = SnapSettings::default();

    let mut sel =
        Selection::from_target(&board, HitTarget::Shape(id), Point::new(50.0, 50.0), None).unwrap();
    sel.update(&mut board, Point::new(60.0, 70.0), &snap);
    sel.update(&mut board, Point::new(60.0, 70.0), &snap);

    // Same pointer position twice: the delta applies once, not cumulatively.
    let b = shape_bounds(board.find_shape(id).unwrap());
    assert!(approx(b.x, 10.0));
    assert!(approx(b.y, 20.0));
    assert!(sel.is_dirty());
}

#[test]
fn move_translates_every_member_kind() {
    let mut board = Board::new("sel");
    let shape = rect((0.0, 0.0), (50.0, 50.0));
    let n = note(200.0, 0.0, 120.0, 90.0);
    let text = TextItem {
        id: Uuid::new_v4(),
        content: "t".to_owned(),
        position: Point::new(400.0, 50.0),
        color: "#e5e7eb".to_owned(),
        font_size: 18.0,
    };
    let node = CausalNode {
        id: Uuid::new_v4(),
        position: Point::new(600.0, 60.0),
        label: "n".to_owned(),
        kind: "variable".to_owned(),
        color: "#38bdf8".to_owned(),
        status: NodeStatus::Unknown,
        confidence: 0.0,
        group: None,
        evidence: Vec::new(),
        status_updated_at: None,
    };
    let targets = [
        HitTarget::Shape(shape.id),
        HitTarget::Note(n.id),
        HitTarget::Text(text.id),
        HitTarget::CausalNode(node.id),
    ];
    let (note_id, text_id, node_id) = (n.id, text.id, node.id);
    board.shapes = vec![shape];
    board.notes = vec![n];
    board.texts = vec![text];
    board.causal_nodes = vec![node];

    let mut sel =
        Selection::from_targets(&board, &targets, Point::new(0.0, 0.0), None).unwrap();
    sel.update(&mut board, Point::new(30.0, -10.0), &SnapSettings::default());

    assert!(approx(board.find_note(note_id).unwrap().position.x, 230.0));
    assert!(approx(board.find_text(text_id).unwrap().position.y, 40.0));
    assert!(approx(board.find_causal_node(node_id).unwrap().position.x, 630.0));
    assert!(approx(board.find_causal_node(node_id).unwrap().position.y, 50.0));
}

#[test]
fn moved_connector_resnaps_endpoints_to_nearby_shapes() {
    let mut board = Board::new("sel");
    let dock = rect((200.0, -20.0), (300.0, 80.0));
    let dock_id = dock.id;
    let conn = Connector {
        id: Uuid::new_v4(),
        from: Anchor::literal(Point::new(0.0, 30.0)),
        to: Anchor::literal(Point::new(160.0, 30.0)),
        color: "#fbbf24".to_owned(),
        width: 2.0,
        label: String::new(),
    };
    let conn_id = conn.id;
    board.shapes = vec![dock];
    board.connectors = vec![conn];

    let target = HitTarget::Connector { id: conn_id, handle: None };
    let mut sel = Selection::from_target(&board, target, Point::new(80.0, 30.0), None).unwrap();
    // Drag right by 30: the `to` endpoint lands at (190, 30), within snap
    // range of the dock's left anchor at (200, 30).
    sel.update(&mut board, Point::new(110.0, 30.0), &SnapSettings::default());

    let conn = board.find_connector(conn_id).unwrap();
    assert_eq!(conn.to.shape_id(), Some(dock_id));
    assert_eq!(conn.from.shape_id(), None);
    assert_eq!(conn.from.carried_point(), Some(Point::new(30.0, 30.0)));
}

#[test]
fn resize_se_floors_at_minimum_size() {
    let mut board = Board::new("sel");
    let shape = rect((0.0, 0.0), (100.0, 100.0));
    let id = shape.id;
    board.shapes = vec![shape];

    let mut sel = Selection::from_target(
        &board,
        HitTarget::Shape(id),
        Point::new(100.0, 100.0),
        Some(HandleCorner::Se),
    )
    .unwrap();
    sel.update(&mut board, Point::new(2.0, 2.0), &SnapSettings::default());

    let b = shape_bounds(board.find_shape(id).unwrap());
    assert!(approx(b.width, MIN_ENTITY_SIZE));
    assert!(approx(b.height, MIN_ENTITY_SIZE));
    assert!(approx(b.x, 0.0));
    assert!(approx(b.y, 0.0));
}

#[test]
fn resize_nw_keeps_opposite_corner_fixed() {
    let mut board = Board::new("sel");
    let shape = rect((0.0, 0.0), (100.0, 100.0));
    let id = shape.id;
    board.shapes = vec![shape];

    let mut sel = Selection::from_target(
        &board,
        HitTarget::Shape(id),
        Point::new(0.0, 0.0),
        Some(HandleCorner::Nw),
    )
    .unwrap();
    sel.update(&mut board, Point::new(50.0, 20.0), &SnapSettings::default());

    let b = shape_bounds(board.find_shape(id).unwrap());
    assert!(approx(b.x, 50.0));
    assert!(approx(b.y, 20.0));
    assert!(approx(b.right(), 100.0));
    assert!(approx(b.bottom(), 100.0));
}

#[test]
fn group_resize_scales_members_about_the_union() {
    let mut board = Board::new("sel");
    let a = rect((0.0, 0.0), (100.0, 100.0));
    let b = rect((100.0, 100.0), (200.0, 200.0));
    let (a_id, b_id) = (a.id, b.id);
    board.shapes = vec![a, b];

    let targets = [HitTarget::Shape(a_id), HitTarget::Shape(b_id)];
    let mut sel = Selection::from_targets(
        &board,
        &targets,
        Point::new(200.0, 200.0),
        Some(HandleCorner::Se),
    )
    .unwrap();
    // Union is 200x200 at the origin; dragging SE to (400, 100) scales x by 2
    // and y by 0.5.
    sel.update(&mut board, Point::new(400.0, 100.0), &SnapSettings::default());

    let ba = shape_bounds(board.find_shape(a_id).unwrap());
    let bb = shape_bounds(board.find_shape(b_id).unwrap());
    assert!(approx(ba.x, 0.0));
    assert!(approx(ba.width, 200.0));
    assert!(approx(ba.height, 50.0));
    assert!(approx(bb.x, 200.0));
    assert!(approx(bb.y, 50.0));
    assert!(approx(bb.width, 200.0));
    assert!(approx(bb.height, 50.0));
}

#[test]
fn note_resize_scales_box_with_floor() {
    let mut board = Board::new("sel");
    let n = note(0.0, 0.0, 180.0, 120.0);
    let id = n.id;
    board.notes = vec![n];

    let mut sel = Selection::from_target(
        &board,
        HitTarget::Note(id),
        Point::new(180.0, 120.0),
        Some(HandleCorner::Se),
    )
    .unwrap();
    sel.update(&mut board, Point::new(90.0, 1.0), &SnapSettings::default());

    let b = note_bounds(board.find_note(id).unwrap());
    assert!(approx(b.width, 90.0));
    assert!(approx(b.height, MIN_ENTITY_SIZE));
}

#[test]
fn mixed_selection_resize_falls_back_to_move() {
    let mut board = Board::new("sel");
    let shape = rect((0.0, 0.0), (100.0, 100.0));
    let conn = Connector {
        id: Uuid::new_v4(),
        from: Anchor::literal(Point::new(200.0, 0.0)),
        to: Anchor::literal(Point::new(300.0, 0.0)),
        color: "#fbbf24".to_owned(),
        width: 2.0,
        label: String::new(),
    };
    let (shape_id, conn_id) = (shape.id, conn.id);
    board.shapes = vec![shape];
    board.connectors = vec![conn];

    let targets = [
        HitTarget::Shape(shape_id),
        HitTarget::Connector { id: conn_id, handle: None },
    ];
    let mut sel = Selection::from_targets(
        &board,
        &targets,
        Point::new(0.0, 0.0),
        Some(HandleCorner::Se),
    )
    .unwrap();
    let off = SnapSettings { enabled: false, tolerance: 0.0 };
    sel.update(&mut board, Point::new(10.0, 10.0), &off);

    // Translated, not scaled.
    let b = shape_bounds(board.find_shape(shape_id).unwrap());
    assert!(approx(b.x, 10.0));
    assert!(approx(b.width, 100.0));
}

#[test]
fn finish_reports_dirty_exactly_once() {
    let mut board = Board::new("sel");
    let shape = rect((0.0, 0.0), (100.0, 100.0));
    let id = shape.id;
    board.shapes = vec![shape];

    let mut sel =
        Selection::from_target(&board, HitTarget::Shape(id), Point::new(0.0, 0.0), None).unwrap();
    assert!(!sel.finish());

    sel.update(&mut board, Point::new(5.0, 5.0), &SnapSettings::default());
    assert!(sel.finish());
    assert!(!sel.finish());
}

#[test]
fn selection_drops_targets_that_no_longer_resolve() {
    let board = Board::new("sel");
    assert!(
        Selection::from_target(&board, HitTarget::Shape(Uuid::new_v4()), Point::default(), None)
            .is_none()
    );
}

#[test]
fn marquee_collects_overlapping_diagram_entities() {
    let mut board = Board::new("sel");
    let inside = rect((10.0, 10.0), (50.0, 50.0));
    let straddling = rect((90.0, 90.0), (150.0, 150.0));
    let outside = rect((300.0, 300.0), (340.0, 340.0));
    let n = note(20.0, 60.0, 40.0, 30.0);
    let (inside_id, straddle_id, note_id) = (inside.id, straddling.id, n.id);
    board.shapes = vec![inside, straddling, outside];
    board.notes = vec![n];

    let rect = marquee_rect(Point::new(100.0, 100.0), Point::new(0.0, 0.0));
    let targets = diagram_targets_in(&board, rect);
    assert_eq!(
        targets,
        vec![
            HitTarget::Shape(inside_id),
            HitTarget::Shape(straddle_id),
            HitTarget::Note(note_id),
        ]
    );
}

#[test]
fn causal_marquee_collects_only_nodes() {
    let mut board = Board::new("sel");
    let node = CausalNode {
        id: Uuid::new_v4(),
        position: Point::new(50.0, 50.0),
        label: "n".to_owned(),
        kind: "variable".to_owned(),
        color: "#38bdf8".to_owned(),
        status: NodeStatus::Unknown,
        confidence: 0.0,
        group: None,
        evidence: Vec::new(),
        status_updated_at: None,
    };
    let id = node.id;
    board.causal_nodes = vec![node];
    board.shapes = vec![rect((0.0, 0.0), (100.0, 100.0))];

    let rect = marquee_rect(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
    assert_eq!(causal_targets_in(&board, rect), vec![HitTarget::CausalNode(id)]);
}
