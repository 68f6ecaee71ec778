//! Document model: the board and every entity kind that lives on it.
//!
//! A `Board` is the unit of persistence and of collaboration — the server
//! stores and broadcasts whole boards, and the engine edits one in place.
//! Entity collections are all `#[serde(default)]` so documents saved by older
//! builds (or hand-written fixtures) load with missing collections as empty
//! rather than failing to parse.
//!
//! Geometry helpers at the bottom compute the axis-aligned [`Bounds`] of each
//! entity kind; hit-testing, selection, and marquee collection all work in
//! terms of those.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchor::Anchor;
use crate::camera::Point;
use crate::consts::{
    CAUSAL_NODE_RADIUS, DEFAULT_STROKE_SMOOTHING, MIN_TEXT_WIDTH, TEXT_GLYPH_WIDTH_FACTOR,
};

/// Unique identifier for a board entity.
pub type EntityId = Uuid;

/// Geometric kind of a drawn shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle spanned by the two corner points.
    Rectangle,
    /// Ellipse inscribed in the rectangle spanned by the two corner points.
    Ellipse,
}

/// A two-corner shape. The corners are stored as drawn and may be in any
/// order; use [`shape_bounds`] for the normalized box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: EntityId,
    pub kind: ShapeKind,
    pub points: [Point; 2],
    pub color: String,
    pub stroke_width: f64,
}

/// A sticky note: top-left position plus explicit width/height.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EntityId,
    pub content: String,
    pub position: Point,
    pub color: String,
    pub width: f64,
    pub height: f64,
}

/// A free-standing text item. `position` is the baseline origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    pub id: EntityId,
    pub content: String,
    pub position: Point,
    pub color: String,
    pub font_size: f64,
}

/// A freehand pen stroke.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub id: EntityId,
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
    /// Exponential smoothing factor the stroke was captured with.
    #[serde(default = "default_stroke_smoothing")]
    pub smoothing: f64,
}

fn default_stroke_smoothing() -> f64 {
    DEFAULT_STROKE_SMOOTHING
}

/// Whether a comment pin is a discussion comment or a lightweight reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    #[default]
    Comment,
    Reaction,
}

/// A comment pin anchored at a world position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: EntityId,
    pub position: Point,
    #[serde(default)]
    pub author: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: CommentKind,
}

/// Derived state of a causal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Positive,
    Negative,
    Neutral,
    #[default]
    Unknown,
}

/// Direction of influence carried by a causal link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    #[default]
    Positive,
    Negative,
    Neutral,
}

/// One upstream contribution recorded on a node by status propagation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEvidence {
    pub source_id: EntityId,
    pub source_label: String,
    pub status: NodeStatus,
    pub confidence: f64,
    pub polarity: Polarity,
    pub weight: f64,
    pub contribution: f64,
}

/// A node in the causal graph, drawn as a fixed-radius disc at `position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalNode {
    pub id: EntityId,
    pub position: Point,
    pub label: String,
    #[serde(default = "default_node_kind")]
    pub kind: String,
    pub color: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub evidence: Vec<NodeEvidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<String>,
}

fn default_node_kind() -> String {
    "variable".to_owned()
}

/// A directed edge between two causal nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalLink {
    pub id: EntityId,
    pub from: EntityId,
    pub to: EntityId,
    #[serde(default)]
    pub polarity: Polarity,
    #[serde(default = "default_link_weight")]
    pub weight: f64,
    #[serde(default)]
    pub label: String,
}

fn default_link_weight() -> f64 {
    1.0
}

/// A connector between two [`Anchor`]s, each either shape-bound or a literal
/// world point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: EntityId,
    pub from: Anchor,
    pub to: Anchor,
    pub color: String,
    pub width: f64,
    #[serde(default)]
    pub label: String,
}

/// The whole document. Collections default to empty on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub texts: Vec<TextItem>,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default)]
    pub causal_nodes: Vec<CausalNode>,
    #[serde(default)]
    pub causal_links: Vec<CausalLink>,
    #[serde(default)]
    pub updated_at: String,
}

impl Board {
    /// Create an empty board with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            shapes: Vec::new(),
            notes: Vec::new(),
            texts: Vec::new(),
            strokes: Vec::new(),
            comments: Vec::new(),
            connectors: Vec::new(),
            causal_nodes: Vec::new(),
            causal_links: Vec::new(),
            updated_at: String::new(),
        }
    }

    #[must_use]
    pub fn find_shape(&self, id: EntityId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn find_shape_mut(&mut self, id: EntityId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    #[must_use]
    pub fn find_note(&self, id: EntityId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn find_note_mut(&mut self, id: EntityId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    pub fn find_text(&self, id: EntityId) -> Option<&TextItem> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn find_text_mut(&mut self, id: EntityId) -> Option<&mut TextItem> {
        self.texts.iter_mut().find(|t| t.id == id)
    }

    #[must_use]
    pub fn find_connector(&self, id: EntityId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    pub fn find_connector_mut(&mut self, id: EntityId) -> Option<&mut Connector> {
        self.connectors.iter_mut().find(|c| c.id == id)
    }

    #[must_use]
    pub fn find_comment(&self, id: EntityId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn find_comment_mut(&mut self, id: EntityId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == id)
    }

    #[must_use]
    pub fn find_causal_node(&self, id: EntityId) -> Option<&CausalNode> {
        self.causal_nodes.iter().find(|n| n.id == id)
    }

    pub fn find_causal_node_mut(&mut self, id: EntityId) -> Option<&mut CausalNode> {
        self.causal_nodes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    pub fn find_causal_link(&self, id: EntityId) -> Option<&CausalLink> {
        self.causal_links.iter().find(|l| l.id == id)
    }

    pub fn find_causal_link_mut(&mut self, id: EntityId) -> Option<&mut CausalLink> {
        self.causal_links.iter_mut().find(|l| l.id == id)
    }

    /// Remove the given entities and everything structurally dependent on
    /// them: connectors anchored to a removed shape and causal links touching
    /// a removed node go in the same operation, so a connector never outlives
    /// an anchored shape.
    pub fn remove_entities(&mut self, ids: &[EntityId]) {
        let doomed: HashSet<EntityId> = ids.iter().copied().collect();
        if doomed.is_empty() {
            return;
        }

        let removed_shapes: HashSet<EntityId> = self
            .shapes
            .iter()
            .filter(|s| doomed.contains(&s.id))
            .map(|s| s.id)
            .collect();
        let removed_nodes: HashSet<EntityId> = self
            .causal_nodes
            .iter()
            .filter(|n| doomed.contains(&n.id))
            .map(|n| n.id)
            .collect();

        self.shapes.retain(|s| !doomed.contains(&s.id));
        self.notes.retain(|n| !doomed.contains(&n.id));
        self.texts.retain(|t| !doomed.contains(&t.id));
        self.strokes.retain(|s| !doomed.contains(&s.id));
        self.comments.retain(|c| !doomed.contains(&c.id));
        self.causal_nodes.retain(|n| !doomed.contains(&n.id));
        self.connectors.retain(|c| {
            if doomed.contains(&c.id) {
                return false;
            }
            let from = c.from.shape_id().is_some_and(|id| removed_shapes.contains(&id));
            let to = c.to.shape_id().is_some_and(|id| removed_shapes.contains(&id));
            !from && !to
        });
        self.causal_links.retain(|l| {
            !doomed.contains(&l.id)
                && !removed_nodes.contains(&l.from)
                && !removed_nodes.contains(&l.to)
        });
    }
}

// === Bounds ===

/// An axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized box spanned by two corners in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self { x, y, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether the two boxes overlap (touching edges count).
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Smallest box covering both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self { x, y, width: right - x, height: bottom - y }
    }
}

/// Normalized bounding box of a shape.
#[must_use]
pub fn shape_bounds(shape: &Shape) -> Bounds {
    Bounds::from_corners(shape.points[0], shape.points[1])
}

/// Bounding box of a note.
#[must_use]
pub fn note_bounds(note: &Note) -> Bounds {
    Bounds::new(note.position.x, note.position.y, note.width, note.height)
}

/// Approximate width of rendered text. Glyph metrics are a rendering concern;
/// this heuristic keeps hit geometry host-independent.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn measure_text_width(content: &str, font_size: f64) -> f64 {
    let glyphs = content.chars().count() as f64;
    (glyphs * font_size * TEXT_GLYPH_WIDTH_FACTOR).max(MIN_TEXT_WIDTH)
}

/// Bounding box of a text item. `position` is the baseline origin, so the box
/// extends one font-size above it.
#[must_use]
pub fn text_bounds(text: &TextItem) -> Bounds {
    Bounds::new(
        text.position.x,
        text.position.y - text.font_size,
        measure_text_width(&text.content, text.font_size),
        text.font_size,
    )
}

/// Bounding box of a causal node's disc.
#[must_use]
pub fn causal_node_bounds(node: &CausalNode) -> Bounds {
    Bounds::new(
        node.position.x - CAUSAL_NODE_RADIUS,
        node.position.y - CAUSAL_NODE_RADIUS,
        CAUSAL_NODE_RADIUS * 2.0,
        CAUSAL_NODE_RADIUS * 2.0,
    )
}
