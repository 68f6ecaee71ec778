//! Deterministic auto-layout for the causal graph.
//!
//! Columns come from Kahn leveling: a node's column is the longest chain of
//! links leading into it. Cycles cannot be leveled, so any node left
//! unprocessed falls back to column 0 and the layout reports that a cycle was
//! seen. Rows come from lanes, one per group tag, stacked in a stable order;
//! within a lane, nodes order by (column, label) so the same document always
//! produces the same picture.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::{HashMap, VecDeque};

use crate::camera::Point;
use crate::consts::{COLUMN_SPACING, LANE_GAP, LANE_PADDING, NODE_SPACING};
use crate::doc::{Board, EntityId};

/// Lane nodes without a group tag land in.
pub const UNGROUPED_LANE: &str = "ungrouped";

/// Spacing knobs plus an optional preferred lane order.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub column_spacing: f64,
    pub node_spacing: f64,
    pub lane_padding: f64,
    pub lane_gap: f64,
    /// Lanes listed here come first, in this order; lanes discovered on the
    /// board follow in document order.
    pub groups: Vec<String>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            column_spacing: COLUMN_SPACING,
            node_spacing: NODE_SPACING,
            lane_padding: LANE_PADDING,
            lane_gap: LANE_GAP,
            groups: Vec::new(),
        }
    }
}

/// A computed layout, ready to apply.
#[derive(Debug, Clone, Default)]
pub struct CausalLayout {
    /// Target position per node.
    pub positions: HashMap<EntityId, Point>,
    /// Lane order used, top to bottom.
    pub groups: Vec<String>,
    /// Whether leveling hit a cycle (affected nodes sit in column 0).
    pub cyclic: bool,
}

fn lane_key(group: Option<&String>) -> String {
    match group {
        Some(g) if !g.is_empty() => g.clone(),
        _ => UNGROUPED_LANE.to_owned(),
    }
}

/// Topological levels for every node. Links whose endpoints are missing are
/// ignored; duplicate links between the same pair count once.
fn node_levels(board: &Board) -> (HashMap<EntityId, usize>, bool) {
    let ids: Vec<EntityId> = board.causal_nodes.iter().map(|n| n.id).collect();
    let mut outgoing: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
    let mut indegree: HashMap<EntityId, usize> = ids.iter().map(|id| (*id, 0)).collect();

    for link in &board.causal_links {
        if !indegree.contains_key(&link.from) || !indegree.contains_key(&link.to) {
            continue;
        }
        let out = outgoing.entry(link.from).or_default();
        if out.contains(&link.to) {
            continue;
        }
        out.push(link.to);
        if let Some(count) = indegree.get_mut(&link.to) {
            *count += 1;
        }
    }

    let mut levels: HashMap<EntityId, usize> = ids.iter().map(|id| (*id, 0)).collect();
    let mut queue: VecDeque<EntityId> = ids
        .iter()
        .filter(|id| indegree.get(id).copied() == Some(0))
        .copied()
        .collect();
    let mut processed = 0;

    while let Some(id) = queue.pop_front() {
        processed += 1;
        let level = levels.get(&id).copied().unwrap_or(0);
        let Some(targets) = outgoing.get(&id) else {
            continue;
        };
        for target in targets.clone() {
            if let Some(entry) = levels.get_mut(&target) {
                *entry = (*entry).max(level + 1);
            }
            if let Some(count) = indegree.get_mut(&target) {
                *count -= 1;
                if *count == 0 {
                    queue.push_back(target);
                }
            }
        }
    }

    // Nodes still holding indegree are on a cycle; they keep level 0.
    (levels, processed < ids.len())
}

/// Compute lane/column positions for every causal node on the board.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_causal_layout(board: &Board, options: &LayoutOptions) -> CausalLayout {
    if board.causal_nodes.is_empty() {
        return CausalLayout::default();
    }
    let (levels, cyclic) = node_levels(board);

    // Lane order: preferred first, then tags in discovery order, with the
    // implicit ungrouped lane appended after everything else.
    let mut groups: Vec<String> = Vec::new();
    for group in &options.groups {
        if !group.is_empty() && !groups.contains(group) {
            groups.push(group.clone());
        }
    }
    let mut has_untagged = false;
    for node in &board.causal_nodes {
        match node.group.as_deref() {
            Some(tag) if !tag.is_empty() => {
                if !groups.iter().any(|g| g == tag) {
                    groups.push(tag.to_owned());
                }
            }
            _ => has_untagged = true,
        }
    }
    if has_untagged && !groups.iter().any(|g| g == UNGROUPED_LANE) {
        groups.push(UNGROUPED_LANE.to_owned());
    }

    // Members per lane, sorted by (column, label) for determinism.
    let mut lanes: HashMap<String, Vec<(usize, &str, EntityId)>> = HashMap::new();
    for node in &board.causal_nodes {
        let key = lane_key(node.group.as_ref());
        let level = levels.get(&node.id).copied().unwrap_or(0);
        lanes.entry(key).or_default().push((level, node.label.as_str(), node.id));
    }
    for members in lanes.values_mut() {
        members.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    }

    let mut positions = HashMap::new();
    let mut cursor = 0.0;
    for group in &groups {
        let members = lanes.get(group).map_or(&[][..], Vec::as_slice);
        let offset = cursor + options.lane_padding;
        for (row, (level, _, id)) in members.iter().enumerate() {
            let x = options.column_spacing * (*level as f64) + options.column_spacing;
            let y = offset + options.node_spacing * (row as f64);
            positions.insert(*id, Point::new(x, y));
        }
        // An empty preferred lane still reserves one row of space.
        cursor += options.lane_padding * 2.0
            + options.node_spacing * (members.len().max(1) as f64)
            + options.lane_gap;
    }

    CausalLayout { positions, groups, cyclic }
}

/// Move nodes to their computed positions. Returns whether anything moved.
pub fn apply_causal_layout(board: &mut Board, layout: &CausalLayout) -> bool {
    let mut changed = false;
    for node in &mut board.causal_nodes {
        if let Some(target) = layout.positions.get(&node.id) {
            if node.position != *target {
                node.position = *target;
                changed = true;
            }
        }
    }
    changed
}
