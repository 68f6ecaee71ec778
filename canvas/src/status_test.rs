use super::*;
use crate::camera::Point;
use crate::doc::{CausalLink, CausalNode};
use uuid::Uuid;

fn node(label: &str, status: NodeStatus, confidence: f64) -> CausalNode {
    CausalNode {
        id: Uuid::new_v4(),
        position: Point::new(0.0, 0.0),
        label: label.to_owned(),
        kind: "variable".to_owned(),
        color: "#38bdf8".to_owned(),
        status,
        confidence,
        group: None,
        evidence: Vec::new(),
        status_updated_at: None,
    }
}

fn link(from: EntityId, to: EntityId, polarity: Polarity, weight: f64) -> CausalLink {
    CausalLink { id: Uuid::new_v4(), from, to, polarity, weight, label: String::new() }
}

fn board_with(nodes: Vec<CausalNode>, links: Vec<CausalLink>) -> Board {
    let mut board = Board::new("status");
    board.causal_nodes = nodes;
    board.causal_links = links;
    board
}

#[test]
fn positive_source_drives_downstream_positive() {
    let src = node("cause", NodeStatus::Positive, 1.0);
    let dst = node("effect", NodeStatus::Unknown, 0.0);
    let (src_id, dst_id) = (src.id, dst.id);
    let mut board = board_with(vec![src, dst], vec![link(src_id, dst_id, Polarity::Positive, 1.0)]);

    assert!(propagate(&mut board, "2026-08-29T00:00:00Z"));
    let dst = board.find_causal_node(dst_id).unwrap();
    assert_eq!(dst.status, NodeStatus::Positive);
    assert!((dst.confidence - 1.0).abs() < 1e-9);
    assert_eq!(dst.status_updated_at.as_deref(), Some("2026-08-29T00:00:00Z"));
    assert_eq!(dst.evidence.len(), 1);
    assert_eq!(dst.evidence[0].source_id, src_id);
    assert!((dst.evidence[0].contribution - 1.0).abs() < 1e-9);
}

#[test]
fn negative_polarity_inverts_influence() {
    let src = node("cause", NodeStatus::Positive, 1.0);
    let dst = node("effect", NodeStatus::Unknown, 0.0);
    let (src_id, dst_id) = (src.id, dst.id);
    let mut board = board_with(vec![src, dst], vec![link(src_id, dst_id, Polarity::Negative, 1.0)]);

    propagate(&mut board, "t0");
    assert_eq!(board.find_causal_node(dst_id).unwrap().status, NodeStatus::Negative);
}

#[test]
fn opposing_sources_average_to_neutral() {
    let up = node("up", NodeStatus::Positive, 1.0);
    let down = node("down", NodeStatus::Negative, 1.0);
    let dst = node("effect", NodeStatus::Unknown, 0.0);
    let (up_id, down_id, dst_id) = (up.id, down.id, dst.id);
    let mut board = board_with(
        vec![up, down, dst],
        vec![
            link(up_id, dst_id, Polarity::Positive, 1.0),
            link(down_id, dst_id, Polarity::Positive, 1.0),
        ],
    );

    propagate(&mut board, "t0");
    let dst = board.find_causal_node(dst_id).unwrap();
    assert_eq!(dst.status, NodeStatus::Neutral);
    assert!(dst.confidence.abs() < 1e-9);
}

#[test]
fn weights_bias_the_average() {
    let up = node("up", NodeStatus::Positive, 1.0);
    let down = node("down", NodeStatus::Negative, 1.0);
    let dst = node("effect", NodeStatus::Unknown, 0.0);
    let (up_id, down_id, dst_id) = (up.id, down.id, dst.id);
    let mut board = board_with(
        vec![up, down, dst],
        vec![
            link(up_id, dst_id, Polarity::Positive, 3.0),
            link(down_id, dst_id, Polarity::Positive, 1.0),
        ],
    );

    propagate(&mut board, "t0");
    let dst = board.find_causal_node(dst_id).unwrap();
    // (3 - 1) / 4 = 0.5
    assert_eq!(dst.status, NodeStatus::Positive);
    assert!((dst.confidence - 0.5).abs() < 1e-9);
}

#[test]
fn zero_weight_counts_as_one() {
    let src = node("cause", NodeStatus::Negative, 1.0);
    let dst = node("effect", NodeStatus::Unknown, 0.0);
    let (src_id, dst_id) = (src.id, dst.id);
    let mut board = board_with(vec![src, dst], vec![link(src_id, dst_id, Polarity::Positive, 0.0)]);

    propagate(&mut board, "t0");
    let dst = board.find_causal_node(dst_id).unwrap();
    assert_eq!(dst.status, NodeStatus::Negative);
    assert!((dst.confidence - 1.0).abs() < 1e-9);
}

#[test]
fn unknown_sources_dilute_the_average() {
    let known = node("known", NodeStatus::Positive, 1.0);
    let open = node("open", NodeStatus::Unknown, 0.0);
    let dst = node("effect", NodeStatus::Unknown, 0.0);
    let (known_id, open_id, dst_id) = (known.id, open.id, dst.id);
    let mut board = board_with(
        vec![known, open, dst],
        vec![
            link(known_id, dst_id, Polarity::Positive, 1.0),
            link(open_id, dst_id, Polarity::Positive, 1.0),
        ],
    );

    propagate(&mut board, "t0");
    let dst = board.find_causal_node(dst_id).unwrap();
    // 1 / 2: the unknown row scores zero but its weight still counts.
    assert_eq!(dst.status, NodeStatus::Positive);
    assert!((dst.confidence - 0.5).abs() < 1e-9);
    assert_eq!(dst.evidence.len(), 2);
    let open_row = dst.evidence.iter().find(|e| e.source_id == open_id).unwrap();
    assert!(open_row.contribution.abs() < 1e-9);
}

#[test]
fn sole_unknown_source_pulls_node_to_neutral() {
    let src = node("cause", NodeStatus::Unknown, 0.0);
    let dst = node("effect", NodeStatus::Positive, 0.8);
    let (src_id, dst_id) = (src.id, dst.id);
    let mut board = board_with(vec![src, dst], vec![link(src_id, dst_id, Polarity::Positive, 1.0)]);

    assert!(propagate(&mut board, "t0"));
    let dst = board.find_causal_node(dst_id).unwrap();
    assert_eq!(dst.status, NodeStatus::Neutral);
    assert!(dst.confidence.abs() < 1e-9);
    assert_eq!(dst.evidence.len(), 1);
}

#[test]
fn neutral_polarity_carries_weight() {
    let src = node("cause", NodeStatus::Positive, 1.0);
    let dst = node("effect", NodeStatus::Unknown, 0.0);
    let (src_id, dst_id) = (src.id, dst.id);
    let mut board = board_with(vec![src, dst], vec![link(src_id, dst_id, Polarity::Neutral, 1.0)]);

    propagate(&mut board, "t0");
    let dst = board.find_causal_node(dst_id).unwrap();
    assert_eq!(dst.status, NodeStatus::Positive);
    assert!((dst.confidence - 1.0).abs() < 1e-9);
}

#[test]
fn roots_keep_manual_status() {
    let root = node("root", NodeStatus::Negative, 0.9);
    let id = root.id;
    let mut board = board_with(vec![root], Vec::new());

    assert!(!propagate(&mut board, "t0"));
    assert_eq!(board.find_causal_node(id).unwrap().status, NodeStatus::Negative);
}

#[test]
fn propagation_uses_pre_pass_snapshot() {
    // a -> b -> c where a is positive and b starts unknown: within one pass,
    // c sees b's snapshot (unknown, scoring zero) and lands neutral; a second
    // pass carries the positive signal through.
    let a = node("a", NodeStatus::Positive, 1.0);
    let b = node("b", NodeStatus::Unknown, 0.0);
    let c = node("c", NodeStatus::Unknown, 0.0);
    let (a_id, b_id, c_id) = (a.id, b.id, c.id);
    let mut board = board_with(
        vec![a, b, c],
        vec![
            link(a_id, b_id, Polarity::Positive, 1.0),
            link(b_id, c_id, Polarity::Positive, 1.0),
        ],
    );

    propagate(&mut board, "t0");
    assert_eq!(board.find_causal_node(b_id).unwrap().status, NodeStatus::Positive);
    assert_eq!(board.find_causal_node(c_id).unwrap().status, NodeStatus::Neutral);

    propagate(&mut board, "t1");
    assert_eq!(board.find_causal_node(c_id).unwrap().status, NodeStatus::Positive);
}

#[test]
fn repeated_propagation_is_stable() {
    let src = node("cause", NodeStatus::Positive, 1.0);
    let dst = node("effect", NodeStatus::Unknown, 0.0);
    let (src_id, dst_id) = (src.id, dst.id);
    let mut board = board_with(vec![src, dst], vec![link(src_id, dst_id, Polarity::Positive, 1.0)]);

    assert!(propagate(&mut board, "t0"));
    assert!(!propagate(&mut board, "t1"));
    assert_eq!(board.find_causal_node(dst_id).unwrap().status_updated_at.as_deref(), Some("t0"));
}
