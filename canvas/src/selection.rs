//! Multi-entity selection: move, group resize, and marquee collection.
//!
//! A `Selection` captures the geometry of its members at drag start and
//! rewrites the live document from that frozen state on every pointer move,
//! so drags are idempotent per-event rather than accumulating deltas. The
//! `dirty` flag records whether any update actually changed the document;
//! [`Selection::finish`] consumes it so a completed drag commits exactly once.
//!
//! Resize only applies when every member is a shape or a note; mixed
//! selections fall back to moving. Group resize maps every member through the
//! scale of the initial union box, anchored at the corner opposite the
//! dragged handle, with a per-axis minimum so nothing collapses.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::anchor::{self, SnapSettings};
use crate::camera::Point;
use crate::consts::MIN_ENTITY_SIZE;
use crate::doc::{Board, Bounds, EntityId, causal_node_bounds};
use crate::hit::{self, HandleCorner, HitTarget};

/// Geometry of one member at drag start.
#[derive(Debug, Clone, Copy)]
pub struct InitialGeometry {
    /// Bounding box at capture time.
    pub bounds: Bounds,
    /// Shape corner points, for shapes.
    pub points: Option<[Point; 2]>,
    /// Baseline origin, for text items.
    pub position: Option<Point>,
    /// Resolved endpoints, for connectors.
    pub endpoints: Option<(Point, Point)>,
}

/// One selected entity plus its captured geometry.
#[derive(Debug, Clone)]
pub struct SelectedItem {
    pub target: HitTarget,
    pub initial: InitialGeometry,
}

/// What a drag on the selection does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Move,
    Resize(HandleCorner),
}

/// An active selection with captured initial geometry.
#[derive(Debug, Clone)]
pub struct Selection {
    items: Vec<SelectedItem>,
    mode: SelectionMode,
    /// World point where the drag started.
    origin: Point,
    /// Union of member bounds at capture time.
    initial_union: Bounds,
    dirty: bool,
}

fn capture(board: &Board, target: &HitTarget) -> Option<InitialGeometry> {
    let bounds = hit::target_bounds(board, target)?;
    let points = match target {
        HitTarget::Shape(id) => board.find_shape(*id).map(|s| s.points),
        _ => None,
    };
    let position = match target {
        HitTarget::Text(id) => board.find_text(*id).map(|t| t.position),
        _ => None,
    };
    let endpoints = match target {
        HitTarget::Connector { id, .. } => {
            board.find_connector(*id).and_then(|c| anchor::connector_points(board, c))
        }
        _ => None,
    };
    Some(InitialGeometry { bounds, points, position, endpoints })
}

impl Selection {
    /// Begin a drag on a single target. `handle` switches the drag to resize.
    #[must_use]
    pub fn from_target(
        board: &Board,
        target: HitTarget,
        origin: Point,
        handle: Option<HandleCorner>,
    ) -> Option<Self> {
        Self::from_targets(board, &[target], origin, handle)
    }

    /// Begin a drag on a set of targets. Targets that no longer resolve are
    /// dropped; `None` when nothing remains.
    #[must_use]
    pub fn from_targets(
        board: &Board,
        targets: &[HitTarget],
        origin: Point,
        handle: Option<HandleCorner>,
    ) -> Option<Self> {
        let items: Vec<SelectedItem> = targets
            .iter()
            .filter_map(|target| {
                capture(board, target).map(|initial| SelectedItem { target: *target, initial })
            })
            .collect();
        let first = items.first()?;
        let initial_union = items
            .iter()
            .skip(1)
            .fold(first.initial.bounds, |acc, item| acc.union(&item.initial.bounds));
        Some(Self {
            items,
            mode: handle.map_or(SelectionMode::Move, SelectionMode::Resize),
            origin,
            initial_union,
            dirty: false,
        })
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Ids of all members.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|item| item.target.id()).collect()
    }

    #[must_use]
    pub fn targets(&self) -> Vec<HitTarget> {
        self.items.iter().map(|item| item.target).collect()
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.items.iter().any(|item| item.target.id() == id)
    }

    /// Union of current member bounds, recomputed against the live board.
    #[must_use]
    pub fn current_bounds(&self, board: &Board) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for item in &self.items {
            if let Some(b) = hit::target_bounds(board, &item.target) {
                bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
            }
        }
        bounds
    }

    /// Whether every member supports corner resizing.
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.target.is_resizable())
    }

    /// Apply the drag at the current pointer position. Geometry is always
    /// rewritten from the captured initial state.
    pub fn update(&mut self, board: &mut Board, world: Point, snap: &SnapSettings) {
        if self.items.is_empty() {
            return;
        }
        match self.mode {
            SelectionMode::Resize(corner) if self.is_resizable() => {
                self.apply_resize(board, corner, world);
            }
            SelectionMode::Move | SelectionMode::Resize(_) => {
                self.apply_move(board, world, snap);
            }
        }
    }

    /// End the drag, reporting whether the document changed. The dirty flag
    /// resets so a drag commits at most once.
    pub fn finish(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn apply_move(&mut self, board: &mut Board, world: Point, snap: &SnapSettings) {
        let dx = world.x - self.origin.x;
        let dy = world.y - self.origin.y;
        let mut changed = false;
        for item in &self.items {
            match item.target {
                HitTarget::Shape(id) => {
                    if let Some(points) = item.initial.points {
                        if let Some(shape) = board.find_shape_mut(id) {
                            shape.points = [
                                Point::new(points[0].x + dx, points[0].y + dy),
                                Point::new(points[1].x + dx, points[1].y + dy),
                            ];
                            changed = true;
                        }
                    }
                }
                HitTarget::Note(id) => {
                    let b = item.initial.bounds;
                    if let Some(note) = board.find_note_mut(id) {
                        note.position = Point::new(b.x + dx, b.y + dy);
                        changed = true;
                    }
                }
                HitTarget::Text(id) => {
                    if let Some(position) = item.initial.position {
                        if let Some(text) = board.find_text_mut(id) {
                            text.position = Point::new(position.x + dx, position.y + dy);
                            changed = true;
                        }
                    }
                }
                HitTarget::CausalNode(id) => {
                    let center = item.initial.bounds.center();
                    if let Some(node) = board.find_causal_node_mut(id) {
                        node.position = Point::new(center.x + dx, center.y + dy);
                        changed = true;
                    }
                }
                HitTarget::Connector { id, .. } => {
                    if let Some((from, to)) = item.initial.endpoints {
                        // Re-snap both translated endpoints before mutating.
                        let from =
                            anchor::snap_to_anchor(board, Point::new(from.x + dx, from.y + dy), snap);
                        let to =
                            anchor::snap_to_anchor(board, Point::new(to.x + dx, to.y + dy), snap);
                        if let Some(conn) = board.find_connector_mut(id) {
                            conn.from = from;
                            conn.to = to;
                            changed = true;
                        }
                    }
                }
            }
        }
        if changed {
            self.dirty = true;
        }
    }

    fn apply_resize(&mut self, board: &mut Board, corner: HandleCorner, world: Point) {
        let union = self.initial_union;
        let frame = resize_frame(union, corner, world);
        let old_w = if union.width == 0.0 { 1.0 } else { union.width };
        let old_h = if union.height == 0.0 { 1.0 } else { union.height };
        let scale_x = frame.width / old_w;
        let scale_y = frame.height / old_h;
        let map = |p: Point| {
            Point::new(
                frame.x + (p.x - union.x) * scale_x,
                frame.y + (p.y - union.y) * scale_y,
            )
        };
        let mut changed = false;
        for item in &self.items {
            match item.target {
                HitTarget::Shape(id) => {
                    if let Some(points) = item.initial.points {
                        if let Some(shape) = board.find_shape_mut(id) {
                            shape.points = [map(points[0]), map(points[1])];
                            changed = true;
                        }
                    }
                }
                HitTarget::Note(id) => {
                    let b = item.initial.bounds;
                    if let Some(note) = board.find_note_mut(id) {
                        note.position = map(Point::new(b.x, b.y));
                        note.width = (b.width * scale_x).max(MIN_ENTITY_SIZE);
                        note.height = (b.height * scale_y).max(MIN_ENTITY_SIZE);
                        changed = true;
                    }
                }
                _ => {}
            }
        }
        if changed {
            self.dirty = true;
        }
    }
}

/// New union box when `corner` of `union` is dragged to `world`. The opposite
/// corner stays fixed and each axis floors at the minimum entity size.
#[must_use]
pub fn resize_frame(union: Bounds, corner: HandleCorner, world: Point) -> Bounds {
    let right = union.right();
    let bottom = union.bottom();
    match corner {
        HandleCorner::Nw => {
            let x = world.x.min(right - MIN_ENTITY_SIZE);
            let y = world.y.min(bottom - MIN_ENTITY_SIZE);
            Bounds::new(x, y, right - x, bottom - y)
        }
        HandleCorner::Ne => {
            let y = world.y.min(bottom - MIN_ENTITY_SIZE);
            Bounds::new(union.x, y, (world.x - union.x).max(MIN_ENTITY_SIZE), bottom - y)
        }
        HandleCorner::Sw => {
            let x = world.x.min(right - MIN_ENTITY_SIZE);
            Bounds::new(x, union.y, right - x, (world.y - union.y).max(MIN_ENTITY_SIZE))
        }
        HandleCorner::Se => Bounds::new(
            union.x,
            union.y,
            (world.x - union.x).max(MIN_ENTITY_SIZE),
            (world.y - union.y).max(MIN_ENTITY_SIZE),
        ),
    }
}

// === Marquee ===

/// Normalized marquee rectangle between the drag corners.
#[must_use]
pub fn marquee_rect(start: Point, current: Point) -> Bounds {
    Bounds::from_corners(start, current)
}

/// Diagram entities (shapes, notes, texts) overlapping the marquee, in
/// document order.
#[must_use]
pub fn diagram_targets_in(board: &Board, rect: Bounds) -> Vec<HitTarget> {
    let mut targets = Vec::new();
    for shape in &board.shapes {
        if rect.intersects(&crate::doc::shape_bounds(shape)) {
            targets.push(HitTarget::Shape(shape.id));
        }
    }
    for note in &board.notes {
        if rect.intersects(&crate::doc::note_bounds(note)) {
            targets.push(HitTarget::Note(note.id));
        }
    }
    for text in &board.texts {
        if rect.intersects(&crate::doc::text_bounds(text)) {
            targets.push(HitTarget::Text(text.id));
        }
    }
    targets
}

/// Causal nodes overlapping the marquee, in document order.
#[must_use]
pub fn causal_targets_in(board: &Board, rect: Bounds) -> Vec<HitTarget> {
    board
        .causal_nodes
        .iter()
        .filter(|node| rect.intersects(&causal_node_bounds(node)))
        .map(|node| HitTarget::CausalNode(node.id))
        .collect()
}
