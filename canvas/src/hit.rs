//! Hit-testing against board entities.
//!
//! Queries take a world-space point (already through the camera) and return
//! typed targets. Priority is fixed — text, then notes, then causal nodes,
//! then shapes, then connectors — and within a kind the last-drawn entity
//! wins, so iteration runs back-to-front. Comment pins and resize handles are
//! screen-space affordances with constant pixel radii, so those queries take
//! the camera.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::anchor;
use crate::camera::{Camera, Point};
use crate::consts::{
    CAUSAL_NODE_RADIUS, COMMENT_PIN_RADIUS_PX, HANDLE_HIT_RADIUS_PX, SEGMENT_HIT_TOLERANCE,
    TEXT_BASELINE_SLOP,
};
use crate::doc::{
    Board, Bounds, EntityId, causal_node_bounds, note_bounds, shape_bounds, text_bounds,
};

/// Which grab point of a connector was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorHandle {
    From,
    To,
    Midpoint,
}

/// A resolved hit: which entity, and for connectors, which part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Text(EntityId),
    Note(EntityId),
    CausalNode(EntityId),
    Shape(EntityId),
    Connector { id: EntityId, handle: Option<ConnectorHandle> },
}

impl HitTarget {
    /// The entity behind this target.
    #[must_use]
    pub fn id(&self) -> EntityId {
        match self {
            Self::Text(id)
            | Self::Note(id)
            | Self::CausalNode(id)
            | Self::Shape(id)
            | Self::Connector { id, .. } => *id,
        }
    }

    /// Only shapes and notes expose corner resize handles.
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        matches!(self, Self::Shape(_) | Self::Note(_))
    }
}

/// Corner of a selection's resize frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleCorner {
    Nw,
    Ne,
    Sw,
    Se,
}

/// A hit on a causal link's segment, with the midpoint for editor placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkHit {
    pub id: EntityId,
    pub midpoint: Point,
}

/// Distance from `p` to the segment `a`–`b`, clamping the projection to the
/// segment body so endpoints behave as round caps.
#[must_use]
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Find the topmost entity at a world point.
#[must_use]
pub fn hit_test(board: &Board, world: Point) -> Option<HitTarget> {
    for text in board.texts.iter().rev() {
        let b = text_bounds(text);
        if world.x >= b.x
            && world.x <= b.right()
            && world.y >= b.y
            && world.y <= b.bottom() + TEXT_BASELINE_SLOP
        {
            return Some(HitTarget::Text(text.id));
        }
    }
    for note in board.notes.iter().rev() {
        if note_bounds(note).contains(world) {
            return Some(HitTarget::Note(note.id));
        }
    }
    for node in board.causal_nodes.iter().rev() {
        if world.distance(node.position) <= CAUSAL_NODE_RADIUS {
            return Some(HitTarget::CausalNode(node.id));
        }
    }
    for shape in board.shapes.iter().rev() {
        if shape_bounds(shape).contains(world) {
            return Some(HitTarget::Shape(shape.id));
        }
    }
    for conn in board.connectors.iter().rev() {
        let Some((from, to)) = anchor::connector_points(board, conn) else {
            continue;
        };
        let handle = if world.distance(from) <= SEGMENT_HIT_TOLERANCE {
            Some(ConnectorHandle::From)
        } else if world.distance(to) <= SEGMENT_HIT_TOLERANCE {
            Some(ConnectorHandle::To)
        } else {
            let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
            if world.distance(mid) <= SEGMENT_HIT_TOLERANCE {
                Some(ConnectorHandle::Midpoint)
            } else {
                None
            }
        };
        if handle.is_some()
            || point_to_segment_distance(world, from, to) <= SEGMENT_HIT_TOLERANCE
        {
            return Some(HitTarget::Connector { id: conn.id, handle });
        }
    }
    None
}

/// Find the topmost causal link whose segment passes near a world point.
#[must_use]
pub fn hit_causal_link(board: &Board, world: Point) -> Option<LinkHit> {
    for link in board.causal_links.iter().rev() {
        let (Some(from), Some(to)) =
            (board.find_causal_node(link.from), board.find_causal_node(link.to))
        else {
            continue;
        };
        if point_to_segment_distance(world, from.position, to.position) <= SEGMENT_HIT_TOLERANCE {
            return Some(LinkHit {
                id: link.id,
                midpoint: Point::new(
                    (from.position.x + to.position.x) / 2.0,
                    (from.position.y + to.position.y) / 2.0,
                ),
            });
        }
    }
    None
}

/// Find the topmost comment pin under a world point. Pins render at constant
/// screen size, so the test runs in screen space.
#[must_use]
pub fn hit_comment(board: &Board, camera: &Camera, world: Point) -> Option<EntityId> {
    let screen = camera.world_to_screen(world);
    for comment in board.comments.iter().rev() {
        let pin = camera.world_to_screen(comment.position);
        if screen.distance(pin) <= COMMENT_PIN_RADIUS_PX {
            return Some(comment.id);
        }
    }
    None
}

/// Bounding box of whatever a hit target points at, if it still exists.
#[must_use]
pub fn target_bounds(board: &Board, target: &HitTarget) -> Option<Bounds> {
    match target {
        HitTarget::Text(id) => board.find_text(*id).map(text_bounds),
        HitTarget::Note(id) => board.find_note(*id).map(note_bounds),
        HitTarget::CausalNode(id) => board.find_causal_node(*id).map(causal_node_bounds),
        HitTarget::Shape(id) => board.find_shape(*id).map(shape_bounds),
        HitTarget::Connector { id, .. } => {
            board.find_connector(*id).and_then(|c| anchor::connector_bounds(board, c))
        }
    }
}

/// Screen positions of the four corner resize handles for a world box.
#[must_use]
pub fn handle_positions(camera: &Camera, bounds: &Bounds) -> [(HandleCorner, Point); 4] {
    let nw = camera.world_to_screen(Point::new(bounds.x, bounds.y));
    let se = camera.world_to_screen(Point::new(bounds.right(), bounds.bottom()));
    [
        (HandleCorner::Nw, nw),
        (HandleCorner::Ne, Point::new(se.x, nw.y)),
        (HandleCorner::Sw, Point::new(nw.x, se.y)),
        (HandleCorner::Se, se),
    ]
}

/// Which resize handle, if any, sits under a screen point.
#[must_use]
pub fn detect_handle_hit(camera: &Camera, bounds: &Bounds, screen: Point) -> Option<HandleCorner> {
    handle_positions(camera, bounds)
        .into_iter()
        .find(|(_, pos)| {
            (screen.x - pos.x).abs() <= HANDLE_HIT_RADIUS_PX
                && (screen.y - pos.y).abs() <= HANDLE_HIT_RADIUS_PX
        })
        .map(|(corner, _)| corner)
}
