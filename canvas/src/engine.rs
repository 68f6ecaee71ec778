//! The editing engine: event ingestion, gesture dispatch, and actions.
//!
//! DESIGN
//!
//! `EngineCore` owns the live board, the camera, the active tool, the gesture
//! state machine, and the selection. The host feeds it pointer/wheel/key
//! events (screen coordinates, wall-clock milliseconds) and editor commits,
//! and receives a list of [`Action`]s to perform: repaint, persist the board,
//! broadcast a cursor, open an editor overlay. The engine never performs I/O
//! itself, which is what makes every interaction testable as plain function
//! calls.
//!
//! Collaboration rules live here too:
//!
//! - Outgoing cursor positions are rate-limited to one per 120 ms; remote
//!   cursors are pruned after 5 s of silence.
//! - A full-board replace arriving while a dirty drag is in flight is
//!   deferred. If the drag commits, the local sync supersedes the stale
//!   snapshot and the deferred board is dropped; if the drag ends without
//!   committing, the deferred board applies then.
//! - A drag commits (emits [`Action::Sync`]) at most once, on release.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchor::{self, SnapSettings};
use crate::camera::{Camera, Point};
use crate::consts::{
    CURSOR_SEND_INTERVAL_MS, CURSOR_TTL_MS, DEFAULT_CAUSAL_NODE_COLOR, DEFAULT_CONNECTOR_COLOR,
    DEFAULT_ELLIPSE_COLOR, DEFAULT_FONT_SIZE, DEFAULT_NOTE_COLOR, DEFAULT_NOTE_HEIGHT,
    DEFAULT_NOTE_WIDTH, DEFAULT_SHAPE_COLOR, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_SMOOTHING,
    DEFAULT_TEXT_COLOR, MIN_ENTITY_SIZE, MIN_STROKE_POINTS, ZOOM_IN_STEP, ZOOM_OUT_STEP,
};
use crate::doc::{
    Board, CausalLink, CausalNode, Comment, CommentKind, Connector, EntityId, NodeStatus, Note,
    Polarity, Shape, ShapeKind, Stroke, TextItem,
};
use crate::hit::{self, HitTarget};
use crate::input::{Button, Gesture, Tool, WheelDelta};
use crate::layout::{LayoutOptions, apply_causal_layout, compute_causal_layout};
use crate::selection::{self, Selection};
use crate::template::{Template, instantiate};

/// One participant's presence, as broadcast to peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorState {
    pub id: Uuid,
    pub label: String,
    pub color: String,
    pub position: Point,
}

#[derive(Debug, Clone)]
struct RemoteCursor {
    state: CursorState,
    last_seen_ms: f64,
}

/// Defaults applied to connectors created by drawing.
#[derive(Debug, Clone)]
pub struct ConnectorDefaults {
    pub color: String,
    pub width: f64,
    pub label: String,
}

impl Default for ConnectorDefaults {
    fn default() -> Self {
        Self { color: DEFAULT_CONNECTOR_COLOR.to_owned(), width: 2.0, label: "flow".to_owned() }
    }
}

/// Defaults applied to freehand strokes.
#[derive(Debug, Clone)]
pub struct StrokeDefaults {
    pub color: String,
    pub width: f64,
    /// Exponential smoothing factor in 0..1; higher follows the pointer
    /// less tightly.
    pub smoothing: f64,
}

impl Default for StrokeDefaults {
    fn default() -> Self {
        Self { color: DEFAULT_STROKE_COLOR.to_owned(), width: 3.0, smoothing: DEFAULT_STROKE_SMOOTHING }
    }
}

/// What the host must do after handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Repaint the scene.
    Render,
    /// Persist the current board to the server.
    Sync,
    /// Broadcast the local cursor to peers.
    SendCursor(CursorState),
    /// Show a transient status message.
    Status(String),
    /// Open the text editor (existing item, or new at `position`).
    EditText { id: Option<EntityId>, position: Point },
    /// Open the note editor.
    EditNote { id: Option<EntityId>, position: Point },
    /// Open the comment editor.
    EditComment { id: Option<EntityId>, position: Point },
    /// Open the causal node editor.
    EditCausalNode { id: EntityId },
    /// Open the causal link editor near the link's midpoint.
    EditCausalLink { id: EntityId, midpoint: Point },
}

/// The engine. See the module docs for the contract with the host.
#[derive(Debug)]
pub struct EngineCore {
    board: Option<Board>,
    camera: Camera,
    tool: Tool,
    gesture: Gesture,
    selection: Option<Selection>,
    snap: SnapSettings,
    connector_defaults: ConnectorDefaults,
    stroke_defaults: StrokeDefaults,
    me: CursorState,
    cursors: HashMap<Uuid, RemoteCursor>,
    last_cursor_sent_ms: f64,
    pending_remote: Option<Board>,
    armed_template: Option<Template>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: None,
            camera: Camera::default(),
            tool: Tool::default(),
            gesture: Gesture::default(),
            selection: None,
            snap: SnapSettings::default(),
            connector_defaults: ConnectorDefaults::default(),
            stroke_defaults: StrokeDefaults::default(),
            me: CursorState {
                id: Uuid::new_v4(),
                label: "Guest".to_owned(),
                color: DEFAULT_CAUSAL_NODE_COLOR.to_owned(),
                position: Point::default(),
            },
            cursors: HashMap::new(),
            last_cursor_sent_ms: f64::NEG_INFINITY,
            pending_remote: None,
            armed_template: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, abandoning any in-flight gesture.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.gesture.cancel();
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn snap_settings(&self) -> SnapSettings {
        self.snap
    }

    pub fn set_snap_settings(&mut self, snap: SnapSettings) {
        self.snap = snap;
    }

    pub fn set_connector_defaults(&mut self, defaults: ConnectorDefaults) {
        self.connector_defaults = defaults;
    }

    pub fn set_stroke_defaults(&mut self, defaults: StrokeDefaults) {
        self.stroke_defaults = defaults;
    }

    /// The local participant's presence record.
    #[must_use]
    pub fn local_cursor(&self) -> &CursorState {
        &self.me
    }

    pub fn set_identity(&mut self, label: impl Into<String>, color: impl Into<String>) {
        self.me.label = label.into();
        self.me.color = color.into();
    }

    /// Remote cursors currently considered live.
    #[must_use]
    pub fn remote_cursors(&self) -> Vec<&CursorState> {
        self.cursors.values().map(|c| &c.state).collect()
    }

    // === Board lifecycle ===

    /// Replace the working board (initial load or board switch).
    pub fn load_board(&mut self, board: Board) -> Vec<Action> {
        self.board = Some(board);
        self.selection = None;
        self.gesture.cancel();
        self.pending_remote = None;
        vec![Action::Render]
    }

    /// Apply a full-board replace pushed by a peer. Deferred while a dirty
    /// drag is in flight so remote state cannot clobber work mid-gesture.
    pub fn apply_remote_board(&mut self, board: Board) -> Vec<Action> {
        let drag_dirty = matches!(self.gesture, Gesture::DraggingSelection)
            && self.selection.as_ref().is_some_and(Selection::is_dirty);
        if drag_dirty {
            self.pending_remote = Some(board);
            return Vec::new();
        }
        self.board = Some(board);
        self.selection = None;
        vec![Action::Render]
    }

    /// Merge a peer's cursor broadcast. The local echo is ignored.
    pub fn apply_remote_cursor(&mut self, cursor: CursorState, now_ms: f64) -> Vec<Action> {
        if cursor.id == self.me.id {
            return Vec::new();
        }
        self.cursors.insert(cursor.id, RemoteCursor { state: cursor, last_seen_ms: now_ms });
        vec![Action::Render]
    }

    /// Drop remote cursors that have gone quiet.
    pub fn prune_cursors(&mut self, now_ms: f64) -> Vec<Action> {
        let before = self.cursors.len();
        self.cursors.retain(|_, c| now_ms - c.last_seen_ms <= CURSOR_TTL_MS);
        if self.cursors.len() == before { Vec::new() } else { vec![Action::Render] }
    }

    // === Templates ===

    /// Arm a template; the next primary click places it.
    pub fn arm_template(&mut self, template: Template) -> Vec<Action> {
        let name = template.name.clone();
        self.armed_template = Some(template);
        vec![Action::Status(format!("Click to place \u{201c}{name}\u{201d}"))]
    }

    fn place_template(&mut self, template: &Template, at: Point) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let mut instance = instantiate(template, at);
        board.shapes.append(&mut instance.shapes);
        board.notes.append(&mut instance.notes);
        board.texts.append(&mut instance.texts);
        board.connectors.append(&mut instance.connectors);
        board.comments.append(&mut instance.comments);
        self.selection = None;
        vec![
            Action::Render,
            Action::Sync,
            Action::Status(format!("Placed \u{201c}{}\u{201d}", instance.name)),
        ]
    }

    // === Pointer events ===

    pub fn pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if self.board.is_none() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen);

        if button == Button::Middle || (button == Button::Primary && self.tool == Tool::Pan) {
            self.gesture = Gesture::Panning {
                button,
                origin: screen,
                start_pan: (self.camera.pan_x, self.camera.pan_y),
            };
            return Vec::new();
        }
        if button != Button::Primary {
            return Vec::new();
        }
        if let Some(template) = self.armed_template.take() {
            return self.place_template(&template, world);
        }

        match self.tool {
            Tool::Pan => Vec::new(),
            Tool::Select => self.select_pointer_down(screen, world),
            Tool::Rectangle | Tool::Ellipse | Tool::Connector => {
                self.gesture = Gesture::Drawing { tool: self.tool, start: world, current: world };
                vec![Action::Render]
            }
            Tool::Pen => {
                self.gesture = Gesture::Stroking { points: vec![world] };
                vec![Action::Render]
            }
            Tool::Text => self.editor_action(world, |board, w| match hit::hit_test(board, w) {
                Some(HitTarget::Text(id)) => {
                    let position = board.find_text(id).map_or(w, |t| t.position);
                    Action::EditText { id: Some(id), position }
                }
                _ => Action::EditText { id: None, position: w },
            }),
            Tool::Note => self.editor_action(world, |board, w| match hit::hit_test(board, w) {
                Some(HitTarget::Note(id)) => {
                    let position = board.find_note(id).map_or(w, |n| n.position);
                    Action::EditNote { id: Some(id), position }
                }
                _ => Action::EditNote { id: None, position: w },
            }),
            Tool::Comment => {
                let Some(board) = self.board.as_ref() else {
                    return Vec::new();
                };
                match hit::hit_comment(board, &self.camera, world) {
                    Some(id) => {
                        let position = board.find_comment(id).map_or(world, |c| c.position);
                        vec![Action::EditComment { id: Some(id), position }]
                    }
                    None => vec![Action::EditComment { id: None, position: world }],
                }
            }
            Tool::CausalNode => self.causal_node_pointer_down(world),
            Tool::CausalLink => self.causal_link_pointer_down(world),
        }
    }

    fn editor_action(
        &mut self,
        world: Point,
        pick: impl FnOnce(&Board, Point) -> Action,
    ) -> Vec<Action> {
        match self.board.as_ref() {
            Some(board) => vec![pick(board, world)],
            None => Vec::new(),
        }
    }

    fn select_pointer_down(&mut self, screen: Point, world: Point) -> Vec<Action> {
        let Some(board) = self.board.as_ref() else {
            return Vec::new();
        };

        // Resize handles take priority over re-hit-testing the members.
        if let Some(sel) = self.selection.as_ref() {
            if sel.is_resizable() {
                if let Some(bounds) = sel.current_bounds(board) {
                    if let Some(corner) = hit::detect_handle_hit(&self.camera, &bounds, screen) {
                        let targets = sel.targets();
                        self.selection =
                            Selection::from_targets(board, &targets, world, Some(corner));
                        self.gesture = Gesture::DraggingSelection;
                        return vec![Action::Render];
                    }
                }
            }
        }

        if let Some(target) = hit::hit_test(board, world) {
            // Clicking a member of a multi-selection drags the whole group.
            let targets = match self.selection.as_ref() {
                Some(sel) if sel.contains(target.id()) => sel.targets(),
                _ => vec![target],
            };
            self.selection = Selection::from_targets(board, &targets, world, None);
            self.gesture = Gesture::DraggingSelection;
            return vec![Action::Render];
        }
        if let Some(link) = hit::hit_causal_link(board, world) {
            return vec![Action::EditCausalLink { id: link.id, midpoint: link.midpoint }];
        }
        if let Some(id) = hit::hit_comment(board, &self.camera, world) {
            let position = board.find_comment(id).map_or(world, |c| c.position);
            return vec![Action::EditComment { id: Some(id), position }];
        }

        self.selection = None;
        self.gesture = Gesture::Marquee { start: world, current: world };
        vec![Action::Render]
    }

    fn causal_node_pointer_down(&mut self, world: Point) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        if let Some(HitTarget::CausalNode(id)) = hit::hit_test(board, world) {
            return vec![Action::EditCausalNode { id }];
        }
        let node = CausalNode {
            id: Uuid::new_v4(),
            position: world,
            label: "New variable".to_owned(),
            kind: "variable".to_owned(),
            color: DEFAULT_CAUSAL_NODE_COLOR.to_owned(),
            status: NodeStatus::Unknown,
            confidence: 0.0,
            group: None,
            evidence: Vec::new(),
            status_updated_at: None,
        };
        let id = node.id;
        board.causal_nodes.push(node);
        vec![Action::Render, Action::Sync, Action::EditCausalNode { id }]
    }

    fn causal_link_pointer_down(&mut self, world: Point) -> Vec<Action> {
        let Some(board) = self.board.as_ref() else {
            return Vec::new();
        };
        if let Some(HitTarget::CausalNode(id)) = hit::hit_test(board, world) {
            self.gesture = Gesture::LinkDrawing { from_node: id, current: world };
            return vec![Action::Render];
        }
        if let Some(link) = hit::hit_causal_link(board, world) {
            return vec![Action::EditCausalLink { id: link.id, midpoint: link.midpoint }];
        }
        Vec::new()
    }

    pub fn pointer_move(&mut self, screen: Point, now_ms: f64) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        self.me.position = world;

        let mut actions = Vec::new();
        if now_ms - self.last_cursor_sent_ms >= CURSOR_SEND_INTERVAL_MS {
            self.last_cursor_sent_ms = now_ms;
            actions.push(Action::SendCursor(self.me.clone()));
        }

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { origin, start_pan, .. } => {
                self.camera.pan_x = start_pan.0 + (screen.x - origin.x);
                self.camera.pan_y = start_pan.1 + (screen.y - origin.y);
                actions.push(Action::Render);
            }
            Gesture::Drawing { current, .. }
            | Gesture::LinkDrawing { current, .. }
            | Gesture::Marquee { current, .. } => {
                *current = world;
                actions.push(Action::Render);
            }
            Gesture::Stroking { points } => {
                let smoothing = self.stroke_defaults.smoothing.clamp(0.0, 0.95);
                let next = match points.last() {
                    Some(last) => Point::new(
                        last.x + (world.x - last.x) * (1.0 - smoothing),
                        last.y + (world.y - last.y) * (1.0 - smoothing),
                    ),
                    None => world,
                };
                points.push(next);
                actions.push(Action::Render);
            }
            Gesture::DraggingSelection => {
                if let Some(board) = self.board.as_mut() {
                    if let Some(sel) = self.selection.as_mut() {
                        sel.update(board, world, &self.snap);
                    }
                }
                actions.push(Action::Render);
            }
        }
        actions
    }

    pub fn pointer_up(&mut self, screen: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Panning { .. } => Vec::new(),
            Gesture::Drawing { tool, start, .. } => self.finish_drawing(tool, start, world),
            Gesture::Stroking { points } => self.finish_stroke(points),
            Gesture::LinkDrawing { from_node, .. } => self.finish_link(from_node, world),
            Gesture::Marquee { start, .. } => self.finish_marquee(start, world),
            Gesture::DraggingSelection => {
                let mut actions = vec![Action::Render];
                if let Some(sel) = self.selection.as_mut() {
                    if sel.finish() {
                        // The local sync supersedes any deferred snapshot.
                        self.pending_remote = None;
                        actions.push(Action::Sync);
                    } else if let Some(remote) = self.pending_remote.take() {
                        self.board = Some(remote);
                        self.selection = None;
                    }
                }
                actions
            }
        }
    }

    /// The pointer left the surface: abandon the gesture without committing.
    pub fn pointer_leave(&mut self) -> Vec<Action> {
        let was_active = !self.gesture.is_idle();
        self.gesture.cancel();
        if let Some(sel) = self.selection.as_mut() {
            // Reset the dirty flag; an abandoned drag never commits.
            sel.finish();
        }
        if let Some(remote) = self.pending_remote.take() {
            self.board = Some(remote);
            self.selection = None;
            return vec![Action::Render];
        }
        if was_active { vec![Action::Render] } else { Vec::new() }
    }

    fn finish_drawing(&mut self, tool: Tool, start: Point, end: Point) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        if start.distance(end) < 2.0 {
            // A click, not a drag.
            return vec![Action::Render];
        }
        match tool {
            Tool::Rectangle | Tool::Ellipse => {
                let kind =
                    if tool == Tool::Rectangle { ShapeKind::Rectangle } else { ShapeKind::Ellipse };
                let color = if kind == ShapeKind::Rectangle {
                    DEFAULT_SHAPE_COLOR
                } else {
                    DEFAULT_ELLIPSE_COLOR
                };
                board.shapes.push(Shape {
                    id: Uuid::new_v4(),
                    kind,
                    points: [start, spread_corner(start, end)],
                    color: color.to_owned(),
                    stroke_width: 2.0,
                });
                vec![Action::Render, Action::Sync]
            }
            Tool::Connector => {
                let from = anchor::snap_to_anchor(board, start, &self.snap);
                let to = anchor::snap_to_anchor(board, end, &self.snap);
                board.connectors.push(Connector {
                    id: Uuid::new_v4(),
                    from,
                    to,
                    color: self.connector_defaults.color.clone(),
                    width: self.connector_defaults.width,
                    label: self.connector_defaults.label.clone(),
                });
                vec![Action::Render, Action::Sync]
            }
            _ => vec![Action::Render],
        }
    }

    fn finish_stroke(&mut self, points: Vec<Point>) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        if points.len() < MIN_STROKE_POINTS {
            return vec![Action::Render];
        }
        board.strokes.push(Stroke {
            id: Uuid::new_v4(),
            points,
            color: self.stroke_defaults.color.clone(),
            width: self.stroke_defaults.width,
            smoothing: self.stroke_defaults.smoothing,
        });
        vec![Action::Render, Action::Sync]
    }

    fn finish_link(&mut self, from_node: EntityId, world: Point) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let target = match hit::hit_test(board, world) {
            Some(HitTarget::CausalNode(id)) if id != from_node => id,
            _ => return vec![Action::Render],
        };
        board.causal_links.push(CausalLink {
            id: Uuid::new_v4(),
            from: from_node,
            to: target,
            polarity: Polarity::Positive,
            weight: 1.0,
            label: String::new(),
        });
        vec![Action::Render, Action::Sync]
    }

    fn finish_marquee(&mut self, start: Point, end: Point) -> Vec<Action> {
        let Some(board) = self.board.as_ref() else {
            return Vec::new();
        };
        let rect = selection::marquee_rect(start, end);
        let mut targets = selection::diagram_targets_in(board, rect);
        targets.extend(selection::causal_targets_in(board, rect));
        self.selection = Selection::from_targets(board, &targets, end, None);
        vec![Action::Render]
    }

    // === Wheel and keyboard ===

    pub fn wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        if delta.dy == 0.0 {
            return Vec::new();
        }
        let factor = if delta.dy > 0.0 { ZOOM_OUT_STEP } else { ZOOM_IN_STEP };
        self.camera.zoom_at(screen, factor);
        vec![Action::Render]
    }

    pub fn key_down(&mut self, key: &str) -> Vec<Action> {
        match key {
            "Delete" | "Backspace" => self.delete_selection(),
            "Escape" => {
                let mut acted = self.armed_template.take().is_some();
                if !self.gesture.is_idle() {
                    self.gesture.cancel();
                    acted = true;
                }
                if self.selection.take().is_some() {
                    acted = true;
                }
                if acted { vec![Action::Render] } else { Vec::new() }
            }
            _ => Vec::new(),
        }
    }

    /// Delete every selected entity (with dependent cascade).
    pub fn delete_selection(&mut self) -> Vec<Action> {
        let Some(sel) = self.selection.take() else {
            return Vec::new();
        };
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let ids = sel.ids();
        if ids.is_empty() {
            return Vec::new();
        }
        board.remove_entities(&ids);
        vec![Action::Render, Action::Sync]
    }

    // === Editor commits ===
    //
    // Each commit entry point mutates the document exactly once and returns
    // Sync; the host calls them when its overlay closes with a result.
    // An empty (whitespace-only) commit on an existing entity deletes it.

    pub fn commit_text(
        &mut self,
        id: Option<EntityId>,
        position: Point,
        content: &str,
    ) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let content = content.trim();
        match id {
            Some(id) => {
                if content.is_empty() {
                    board.remove_entities(&[id]);
                    return vec![Action::Render, Action::Sync];
                }
                match board.find_text_mut(id) {
                    Some(text) => {
                        text.content = content.to_owned();
                        vec![Action::Render, Action::Sync]
                    }
                    None => Vec::new(),
                }
            }
            None => {
                if content.is_empty() {
                    return Vec::new();
                }
                board.texts.push(TextItem {
                    id: Uuid::new_v4(),
                    content: content.to_owned(),
                    position,
                    color: DEFAULT_TEXT_COLOR.to_owned(),
                    font_size: DEFAULT_FONT_SIZE,
                });
                vec![Action::Render, Action::Sync]
            }
        }
    }

    pub fn commit_note(
        &mut self,
        id: Option<EntityId>,
        position: Point,
        content: &str,
    ) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let content = content.trim();
        match id {
            Some(id) => {
                if content.is_empty() {
                    board.remove_entities(&[id]);
                    return vec![Action::Render, Action::Sync];
                }
                match board.find_note_mut(id) {
                    Some(note) => {
                        note.content = content.to_owned();
                        vec![Action::Render, Action::Sync]
                    }
                    None => Vec::new(),
                }
            }
            None => {
                if content.is_empty() {
                    return Vec::new();
                }
                board.notes.push(Note {
                    id: Uuid::new_v4(),
                    content: content.to_owned(),
                    position,
                    color: DEFAULT_NOTE_COLOR.to_owned(),
                    width: DEFAULT_NOTE_WIDTH,
                    height: DEFAULT_NOTE_HEIGHT,
                });
                vec![Action::Render, Action::Sync]
            }
        }
    }

    pub fn commit_comment(
        &mut self,
        id: Option<EntityId>,
        position: Point,
        content: &str,
        kind: CommentKind,
    ) -> Vec<Action> {
        let author = self.me.label.clone();
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let content = content.trim();
        match id {
            Some(id) => {
                if content.is_empty() {
                    board.remove_entities(&[id]);
                    return vec![Action::Render, Action::Sync];
                }
                match board.find_comment_mut(id) {
                    Some(comment) => {
                        comment.content = content.to_owned();
                        comment.kind = kind;
                        vec![Action::Render, Action::Sync]
                    }
                    None => Vec::new(),
                }
            }
            None => {
                if content.is_empty() {
                    return Vec::new();
                }
                board.comments.push(Comment {
                    id: Uuid::new_v4(),
                    position,
                    author,
                    content: content.to_owned(),
                    kind,
                });
                vec![Action::Render, Action::Sync]
            }
        }
    }

    pub fn update_causal_node(
        &mut self,
        id: EntityId,
        label: &str,
        kind: &str,
        color: &str,
        status: NodeStatus,
        confidence: f64,
    ) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let Some(node) = board.find_causal_node_mut(id) else {
            return Vec::new();
        };
        node.label = label.trim().to_owned();
        node.kind = kind.trim().to_owned();
        node.color = color.to_owned();
        node.status = status;
        node.confidence = confidence.clamp(0.0, 1.0);
        vec![Action::Render, Action::Sync]
    }

    pub fn update_causal_link(
        &mut self,
        id: EntityId,
        polarity: Polarity,
        weight: f64,
        label: &str,
    ) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let Some(link) = board.find_causal_link_mut(id) else {
            return Vec::new();
        };
        link.polarity = polarity;
        link.weight = weight.max(0.0);
        link.label = label.trim().to_owned();
        vec![Action::Render, Action::Sync]
    }

    // === Causal graph operations ===

    /// Tag every selected causal node with a group (empty clears the tag).
    pub fn assign_group(&mut self, tag: &str) -> Vec<Action> {
        let Some(sel) = self.selection.as_ref() else {
            return Vec::new();
        };
        let ids = sel.ids();
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let tag = tag.trim();
        let group = if tag.is_empty() { None } else { Some(tag.to_owned()) };
        let mut changed = 0;
        for id in ids {
            if let Some(node) = board.find_causal_node_mut(id) {
                node.group.clone_from(&group);
                changed += 1;
            }
        }
        if changed == 0 {
            return Vec::new();
        }
        vec![Action::Render, Action::Sync]
    }

    /// Run the deterministic causal layout and move nodes into place.
    pub fn auto_layout(&mut self) -> Vec<Action> {
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        let layout = compute_causal_layout(board, &LayoutOptions::default());
        let moved = apply_causal_layout(board, &layout);
        let mut actions = vec![Action::Render];
        if layout.cyclic {
            actions.push(Action::Status(
                "Cycle detected; affected nodes placed in the first column".to_owned(),
            ));
        }
        if moved {
            actions.push(Action::Sync);
        }
        actions
    }
}

/// Push the end corner out so a drawn shape meets the minimum size on both
/// axes, preserving drag direction.
fn spread_corner(start: Point, end: Point) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let sx = if dx < 0.0 { -1.0 } else { 1.0 };
    let sy = if dy < 0.0 { -1.0 } else { 1.0 };
    Point::new(
        start.x + sx * dx.abs().max(MIN_ENTITY_SIZE),
        start.y + sy * dy.abs().max(MIN_ENTITY_SIZE),
    )
}
