//! Input model: tools, mouse buttons, and the gesture state machine.
//!
//! `Gesture` is a single tagged enum carrying everything the active gesture
//! needs between pointer-down and pointer-up. There are no boolean flag
//! combinations to keep consistent: transitioning to `Idle` structurally
//! discards all in-flight state, which is what makes cancellation (pointer
//! leaving the surface, Escape) safe to call from anywhere.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::EntityId;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag the camera (default).
    #[default]
    Pan,
    /// Select, move, and resize entities; drag empty space for a marquee.
    Select,
    /// Draw a rectangle.
    Rectangle,
    /// Draw an ellipse.
    Ellipse,
    /// Draw a connector between two points or shape anchors.
    Connector,
    /// Freehand pen stroke.
    Pen,
    /// Place or edit a text item.
    Text,
    /// Place or edit a sticky note.
    Note,
    /// Place or edit a comment pin.
    Comment,
    /// Place a causal node.
    CausalNode,
    /// Drag a causal link between two nodes.
    CausalLink,
}

impl Tool {
    /// Tools that rubber-band a two-corner drag.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Rectangle | Self::Ellipse | Self::Connector)
    }

    /// Tools that open an editor on click rather than dragging.
    #[must_use]
    pub fn is_editor(self) -> bool {
        matches!(self, Self::Text | Self::Note | Self::Comment)
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Scroll wheel movement in screen pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// The active gesture between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Dragging the camera.
    Panning {
        button: Button,
        /// Screen position at pointer-down.
        origin: Point,
        /// Camera pan at pointer-down.
        start_pan: (f64, f64),
    },
    /// Rubber-banding a shape or connector from `start` (world).
    Drawing { tool: Tool, start: Point, current: Point },
    /// Capturing a freehand stroke (world points, already smoothed).
    Stroking { points: Vec<Point> },
    /// Dragging a causal link out of a node.
    LinkDrawing { from_node: EntityId, current: Point },
    /// Rubber-banding a selection marquee (world corners).
    Marquee { start: Point, current: Point },
    /// Dragging the current selection (move or resize).
    DraggingSelection,
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Abandon whatever is in flight.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}
