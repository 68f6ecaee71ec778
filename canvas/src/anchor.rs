//! Connector anchors: where a connector endpoint attaches and how it resolves
//! to a world point.
//!
//! An endpoint is either bound to a named anchor on a shape (and follows the
//! shape when it moves), or a literal world point. Shape-bound anchors carry a
//! last-resolved fallback point so a connector still renders somewhere
//! sensible if its shape disappears from an older document. Bare `{x, y}`
//! endpoints from legacy documents deserialize as literal points.

#[cfg(test)]
#[path = "anchor_test.rs"]
mod anchor_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{CONNECTOR_BOUNDS_PADDING, MAX_SNAP_TOLERANCE};
use crate::doc::{Board, Bounds, Connector, EntityId, Shape, shape_bounds};

/// Named attachment point on a shape's outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Left,
    Right,
    Bottom,
}

/// A connector endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Anchor {
    /// Bound to a named anchor on a shape. `point` is the last resolved
    /// position, kept as a fallback.
    Shape {
        #[serde(rename = "shapeId")]
        shape_id: EntityId,
        side: AnchorSide,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        point: Option<Point>,
    },
    /// A fixed world point.
    Literal { point: Point },
    /// Legacy form: the endpoint object is itself the point.
    Bare(Point),
}

impl Anchor {
    #[must_use]
    pub fn shape(shape_id: EntityId, side: AnchorSide, point: Option<Point>) -> Self {
        Self::Shape { shape_id, side, point }
    }

    #[must_use]
    pub fn literal(point: Point) -> Self {
        Self::Literal { point }
    }

    /// The shape this anchor is bound to, if any.
    #[must_use]
    pub fn shape_id(&self) -> Option<EntityId> {
        match self {
            Self::Shape { shape_id, .. } => Some(*shape_id),
            Self::Literal { .. } | Self::Bare(_) => None,
        }
    }

    /// The point stored on the anchor itself, without consulting the board.
    #[must_use]
    pub fn carried_point(&self) -> Option<Point> {
        match self {
            Self::Shape { point, .. } => *point,
            Self::Literal { point } => Some(*point),
            Self::Bare(point) => Some(*point),
        }
    }
}

/// The named anchor points of a shape: left, right, and bottom edge midpoints
/// of its normalized bounds.
#[must_use]
pub fn shape_anchors(shape: &Shape) -> [(AnchorSide, Point); 3] {
    let b = shape_bounds(shape);
    let mid_y = b.y + b.height / 2.0;
    [
        (AnchorSide::Left, Point::new(b.x, mid_y)),
        (AnchorSide::Right, Point::new(b.right(), mid_y)),
        (AnchorSide::Bottom, Point::new(b.x + b.width / 2.0, b.bottom())),
    ]
}

/// The world position of one named anchor on a shape.
#[must_use]
pub fn anchor_point(shape: &Shape, side: AnchorSide) -> Point {
    let b = shape_bounds(shape);
    match side {
        AnchorSide::Left => Point::new(b.x, b.y + b.height / 2.0),
        AnchorSide::Right => Point::new(b.right(), b.y + b.height / 2.0),
        AnchorSide::Bottom => Point::new(b.x + b.width / 2.0, b.bottom()),
    }
}

/// Resolve an anchor to a world point against the current board. A
/// shape-bound anchor whose shape is gone falls back to its carried point;
/// `None` only when there is no fallback either.
#[must_use]
pub fn resolve(board: &Board, anchor: &Anchor) -> Option<Point> {
    match anchor {
        Anchor::Shape { shape_id, side, point } => board
            .find_shape(*shape_id)
            .map(|shape| anchor_point(shape, *side))
            .or(*point),
        Anchor::Literal { point } => Some(*point),
        Anchor::Bare(point) => Some(*point),
    }
}

/// Resolve both endpoints of a connector.
#[must_use]
pub fn connector_points(board: &Board, conn: &Connector) -> Option<(Point, Point)> {
    let from = resolve(board, &conn.from)?;
    let to = resolve(board, &conn.to)?;
    Some((from, to))
}

/// Midpoint of a connector's resolved segment.
#[must_use]
pub fn connector_midpoint(board: &Board, conn: &Connector) -> Option<Point> {
    let (from, to) = connector_points(board, conn)?;
    Some(Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0))
}

/// Padded bounding box of a connector's resolved segment.
#[must_use]
pub fn connector_bounds(board: &Board, conn: &Connector) -> Option<Bounds> {
    let (from, to) = connector_points(board, conn)?;
    let b = Bounds::from_corners(from, to);
    Some(Bounds::new(
        b.x - CONNECTOR_BOUNDS_PADDING,
        b.y - CONNECTOR_BOUNDS_PADDING,
        b.width + CONNECTOR_BOUNDS_PADDING * 2.0,
        b.height + CONNECTOR_BOUNDS_PADDING * 2.0,
    ))
}

/// How connector endpoints snap to nearby shape anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapSettings {
    pub enabled: bool,
    /// Snap radius in world units. Values above 240 are clamped; zero or
    /// negative disables snapping outright.
    pub tolerance: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self { enabled: true, tolerance: crate::consts::SNAP_TOLERANCE }
    }
}

impl SnapSettings {
    /// Effective snap radius after clamping, or `None` when snapping is off.
    #[must_use]
    pub fn effective_tolerance(&self) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let tol = self.tolerance.min(MAX_SNAP_TOLERANCE);
        if tol <= 0.0 { None } else { Some(tol) }
    }
}

/// Snap a dropped endpoint to the nearest shape anchor within tolerance, or
/// keep it as a literal point.
#[must_use]
pub fn snap_to_anchor(board: &Board, point: Point, settings: &SnapSettings) -> Anchor {
    let Some(tolerance) = settings.effective_tolerance() else {
        return Anchor::literal(point);
    };
    let mut best: Option<(f64, EntityId, AnchorSide, Point)> = None;
    for shape in &board.shapes {
        for (side, candidate) in shape_anchors(shape) {
            let dist = point.distance(candidate);
            if dist <= tolerance && best.is_none_or(|(d, ..)| dist < d) {
                best = Some((dist, shape.id, side, candidate));
            }
        }
    }
    match best {
        Some((_, shape_id, side, resolved)) => Anchor::shape(shape_id, side, Some(resolved)),
        None => Anchor::literal(point),
    }
}
