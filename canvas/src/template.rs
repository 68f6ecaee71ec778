//! Board templates: reusable entity bundles stamped onto a board.
//!
//! A template describes shapes, notes, texts, connectors, and comments in
//! coordinates relative to a drop point. Instantiation clones everything with
//! fresh ids, translates by the drop point, and rewires connector endpoints
//! that name a shape by `key` to the freshly minted shape ids.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchor::{Anchor, AnchorSide};
use crate::camera::Point;
use crate::doc::{Comment, CommentKind, Connector, Note, Shape, ShapeKind, TextItem};

/// A shape in a template, addressable by `key` from connectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateShape {
    pub key: String,
    pub kind: ShapeKind,
    pub points: [Point; 2],
    #[serde(default = "default_shape_color")]
    pub color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateNote {
    pub position: Point,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_note_color")]
    pub color: String,
    #[serde(default = "default_template_note_width")]
    pub width: f64,
    #[serde(default = "default_template_note_height")]
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateText {
    pub position: Point,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default = "default_template_font_size")]
    pub font_size: f64,
}

/// A connector endpoint in template space: either a keyed shape anchor or a
/// relative point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAnchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<AnchorSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConnector {
    pub from: TemplateAnchor,
    pub to: TemplateAnchor,
    #[serde(default = "default_connector_color")]
    pub color: String,
    #[serde(default = "default_stroke_width")]
    pub width: f64,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateComment {
    pub position: Point,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(rename = "type", default)]
    pub kind: CommentKind,
}

/// A reusable bundle of entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shapes: Vec<TemplateShape>,
    #[serde(default)]
    pub notes: Vec<TemplateNote>,
    #[serde(default)]
    pub texts: Vec<TemplateText>,
    #[serde(default)]
    pub connectors: Vec<TemplateConnector>,
    #[serde(default)]
    pub comments: Vec<TemplateComment>,
}

fn default_shape_color() -> String {
    crate::consts::DEFAULT_SHAPE_COLOR.to_owned()
}
fn default_note_color() -> String {
    crate::consts::DEFAULT_NOTE_COLOR.to_owned()
}
fn default_text_color() -> String {
    crate::consts::DEFAULT_TEXT_COLOR.to_owned()
}
fn default_connector_color() -> String {
    crate::consts::DEFAULT_CONNECTOR_COLOR.to_owned()
}
fn default_stroke_width() -> f64 {
    2.0
}
fn default_template_note_width() -> f64 {
    140.0
}
fn default_template_note_height() -> f64 {
    100.0
}
fn default_template_font_size() -> f64 {
    16.0
}

/// Freshly minted entities ready to push onto a board.
#[derive(Debug, Clone, Default)]
pub struct TemplateInstance {
    pub name: String,
    pub shapes: Vec<Shape>,
    pub notes: Vec<Note>,
    pub texts: Vec<TextItem>,
    pub connectors: Vec<Connector>,
    pub comments: Vec<Comment>,
}

fn translate(p: Point, offset: Point) -> Point {
    Point::new(p.x + offset.x, p.y + offset.y)
}

fn resolve_anchor(
    anchor: &TemplateAnchor,
    shape_ids: &HashMap<String, Uuid>,
    offset: Point,
) -> Anchor {
    if let Some(key) = &anchor.shape_key {
        if let Some(id) = shape_ids.get(key) {
            let side = anchor.side.unwrap_or(AnchorSide::Right);
            let point = anchor.point.map(|p| translate(p, offset));
            return Anchor::shape(*id, side, point);
        }
    }
    let point = anchor
        .point
        .or_else(|| match (anchor.x, anchor.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        })
        .unwrap_or_default();
    Anchor::literal(translate(point, offset))
}

/// Stamp a template at a drop point.
#[must_use]
pub fn instantiate(template: &Template, at: Point) -> TemplateInstance {
    let mut shape_ids: HashMap<String, Uuid> = HashMap::new();
    let shapes: Vec<Shape> = template
        .shapes
        .iter()
        .map(|s| {
            let id = Uuid::new_v4();
            shape_ids.insert(s.key.clone(), id);
            Shape {
                id,
                kind: s.kind,
                points: [translate(s.points[0], at), translate(s.points[1], at)],
                color: s.color.clone(),
                stroke_width: s.stroke_width,
            }
        })
        .collect();

    let notes = template
        .notes
        .iter()
        .map(|n| Note {
            id: Uuid::new_v4(),
            content: n.content.clone(),
            position: translate(n.position, at),
            color: n.color.clone(),
            width: n.width,
            height: n.height,
        })
        .collect();

    let texts = template
        .texts
        .iter()
        .map(|t| TextItem {
            id: Uuid::new_v4(),
            content: t.content.clone(),
            position: translate(t.position, at),
            color: t.color.clone(),
            font_size: t.font_size,
        })
        .collect();

    let connectors = template
        .connectors
        .iter()
        .map(|c| Connector {
            id: Uuid::new_v4(),
            from: resolve_anchor(&c.from, &shape_ids, at),
            to: resolve_anchor(&c.to, &shape_ids, at),
            color: c.color.clone(),
            width: c.width,
            label: c.label.clone(),
        })
        .collect();

    let comments = template
        .comments
        .iter()
        .map(|c| Comment {
            id: Uuid::new_v4(),
            position: translate(c.position, at),
            author: c.author.clone(),
            content: c.content.clone(),
            kind: c.kind,
        })
        .collect();

    TemplateInstance { name: template.name.clone(), shapes, notes, texts, connectors, comments }
}

/// The stock template catalog.
#[must_use]
pub fn builtin_templates() -> Vec<Template> {
    let catalog = serde_json::json!([
        {
            "id": "two-step-flow",
            "name": "Two step flow",
            "description": "Pair of rectangles with labels and a connecting arrow.",
            "shapes": [
                {
                    "key": "left",
                    "kind": "rectangle",
                    "points": [{ "x": -140.0, "y": -60.0 }, { "x": -20.0, "y": 40.0 }],
                    "color": "#22d3ee",
                    "strokeWidth": 2.0
                },
                {
                    "key": "right",
                    "kind": "rectangle",
                    "points": [{ "x": 40.0, "y": -40.0 }, { "x": 160.0, "y": 60.0 }],
                    "color": "#a78bfa",
                    "strokeWidth": 2.0
                }
            ],
            "texts": [
                { "content": "Idea", "position": { "x": -110.0, "y": -10.0 } },
                { "content": "Result", "position": { "x": 70.0, "y": 10.0 } }
            ],
            "connectors": [
                {
                    "from": { "shapeKey": "left", "side": "right" },
                    "to": { "shapeKey": "right", "side": "left" },
                    "label": "next"
                }
            ]
        },
        {
            "id": "sticky-cluster",
            "name": "Sticky cluster",
            "description": "A trio of sticky notes with a heading.",
            "notes": [
                { "position": { "x": -120.0, "y": -40.0 }, "width": 120.0, "height": 90.0, "content": "Research", "color": "#fbbf24" },
                { "position": { "x": 10.0, "y": -40.0 }, "width": 120.0, "height": 90.0, "content": "Ideas", "color": "#34d399" },
                { "position": { "x": -55.0, "y": 70.0 }, "width": 120.0, "height": 90.0, "content": "Next steps", "color": "#60a5fa" }
            ],
            "texts": [
                { "content": "Brainstorm", "position": { "x": -90.0, "y": -70.0 }, "color": "#f9fafb", "fontSize": 18.0 }
            ]
        },
        {
            "id": "comment-hub",
            "name": "Feedback hub",
            "description": "A central note with two connected callouts.",
            "notes": [
                { "position": { "x": -70.0, "y": -40.0 }, "width": 160.0, "height": 120.0, "content": "Feature sketch", "color": "#fcd34d" },
                { "position": { "x": -240.0, "y": -20.0 }, "width": 140.0, "height": 80.0, "content": "Edge cases", "color": "#f59e0b" },
                { "position": { "x": 150.0, "y": -10.0 }, "width": 140.0, "height": 80.0, "content": "Open questions", "color": "#fbbf24" }
            ],
            "connectors": [
                { "from": { "x": 10.0, "y": 20.0 }, "to": { "x": -100.0, "y": 20.0 }, "color": "#60a5fa" },
                { "from": { "x": 10.0, "y": 20.0 }, "to": { "x": 220.0, "y": 30.0 }, "color": "#60a5fa" }
            ],
            "comments": [
                { "position": { "x": -40.0, "y": -60.0 }, "content": "Consider mobile", "type": "reaction", "author": "UI" },
                { "position": { "x": 100.0, "y": 60.0 }, "content": "Need metric", "type": "comment", "author": "PM" }
            ]
        }
    ]);
    serde_json::from_value(catalog).unwrap_or_default()
}
