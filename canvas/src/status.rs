//! Status propagation along causal links.
//!
//! Each node with incoming links derives its status from its upstream
//! neighbors: every link contributes `status_value(source) * weight`, with
//! negative-polarity links inverting the influence. The weighted average
//! lands in one of three bands (positive above 0.2, negative below -0.2,
//! neutral between), and its magnitude becomes the node's confidence.
//! Unknown sources score zero but their weight still enters the average, so
//! unresolved evidence pulls a node toward neutral. A node with no incoming
//! links keeps whatever status was set by hand.
//!
//! Propagation reads a snapshot of node states and applies all derivations
//! afterwards, so the result is independent of node order within a pass.

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;

use std::collections::HashMap;

use crate::doc::{Board, EntityId, NodeEvidence, NodeStatus, Polarity};

/// Score band edge separating neutral from positive/negative.
const STATUS_THRESHOLD: f64 = 0.2;
/// Confidence change below this does not count as an update.
const CONFIDENCE_EPSILON: f64 = 1e-4;

fn status_value(status: NodeStatus) -> f64 {
    match status {
        NodeStatus::Positive => 1.0,
        NodeStatus::Negative => -1.0,
        NodeStatus::Neutral | NodeStatus::Unknown => 0.0,
    }
}

/// Link weight as used for scoring: unset (zero) counts as 1, negative
/// polarity inverts, any other polarity passes the weight through.
fn signed_weight(polarity: Polarity, weight: f64) -> f64 {
    let weight = if weight == 0.0 { 1.0 } else { weight };
    if polarity == Polarity::Negative { -weight } else { weight }
}

fn band(score: f64) -> NodeStatus {
    if score > STATUS_THRESHOLD {
        NodeStatus::Positive
    } else if score < -STATUS_THRESHOLD {
        NodeStatus::Negative
    } else {
        NodeStatus::Neutral
    }
}

struct Derived {
    status: NodeStatus,
    confidence: f64,
    evidence: Vec<NodeEvidence>,
}

/// Recompute derived status for every node with incoming evidence. Stamps
/// `status_updated_at` with `now` on nodes whose status or confidence
/// actually changed. Returns whether anything changed.
pub fn propagate(board: &mut Board, now: &str) -> bool {
    let snapshot: HashMap<EntityId, (NodeStatus, f64, String)> = board
        .causal_nodes
        .iter()
        .map(|n| (n.id, (n.status, n.confidence, n.label.clone())))
        .collect();

    let mut derived: HashMap<EntityId, Derived> = HashMap::new();
    for node in &board.causal_nodes {
        let mut evidence = Vec::new();
        let mut score = 0.0;
        let mut total_weight = 0.0;
        for link in &board.causal_links {
            if link.to != node.id {
                continue;
            }
            let Some((status, confidence, label)) = snapshot.get(&link.from) else {
                continue;
            };
            let weight = signed_weight(link.polarity, link.weight);
            let contribution = status_value(*status) * weight;
            score += contribution;
            total_weight += weight.abs();
            evidence.push(NodeEvidence {
                source_id: link.from,
                source_label: label.clone(),
                status: *status,
                confidence: *confidence,
                polarity: link.polarity,
                weight: link.weight,
                contribution,
            });
        }
        if total_weight <= 0.0 {
            continue;
        }
        let average = score / total_weight;
        derived.insert(node.id, Derived {
            status: band(average),
            confidence: average.abs().clamp(0.0, 1.0),
            evidence,
        });
    }

    let mut changed = false;
    for node in &mut board.causal_nodes {
        let Some(result) = derived.remove(&node.id) else {
            continue;
        };
        let status_changed = node.status != result.status;
        let confidence_changed = (node.confidence - result.confidence).abs() > CONFIDENCE_EPSILON;
        node.evidence = result.evidence;
        if status_changed || confidence_changed {
            node.status = result.status;
            node.confidence = result.confidence;
            node.status_updated_at = Some(now.to_owned());
            changed = true;
        }
    }
    changed
}
