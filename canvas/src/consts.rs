//! Shared numeric constants for geometry, interaction, and layout.

/// Minimum camera zoom factor.
pub const MIN_ZOOM: f64 = 0.25;
/// Maximum camera zoom factor.
pub const MAX_ZOOM: f64 = 4.0;
/// Multiplicative step applied per wheel tick when zooming in.
pub const ZOOM_IN_STEP: f64 = 1.1;
/// Multiplicative step applied per wheel tick when zooming out.
pub const ZOOM_OUT_STEP: f64 = 0.9;

/// Minimum width/height of a shape or note, in world units.
pub const MIN_ENTITY_SIZE: f64 = 16.0;

/// Default connector snap radius, in world units.
pub const SNAP_TOLERANCE: f64 = 32.0;
/// Upper clamp for a configured snap radius.
pub const MAX_SNAP_TOLERANCE: f64 = 240.0;

/// Distance from a connector segment within which it counts as hit.
pub const SEGMENT_HIT_TOLERANCE: f64 = 10.0;
/// Radius of a causal node disc, in world units.
pub const CAUSAL_NODE_RADIUS: f64 = 28.0;
/// Extra descender slop below a text baseline accepted by hit-testing.
pub const TEXT_BASELINE_SLOP: f64 = 4.0;
/// Approximate glyph advance as a fraction of font size.
pub const TEXT_GLYPH_WIDTH_FACTOR: f64 = 0.55;
/// Minimum hit width of a text item, in world units.
pub const MIN_TEXT_WIDTH: f64 = 16.0;
/// Padding added around connector endpoints when computing bounds.
pub const CONNECTOR_BOUNDS_PADDING: f64 = 6.0;
/// Half-size of a resize handle's hit box, in screen pixels.
pub const HANDLE_HIT_RADIUS_PX: f64 = 10.0;
/// Radius of a comment pin's hit disc, in screen pixels.
pub const COMMENT_PIN_RADIUS_PX: f64 = 14.0;

/// Horizontal spacing between causal layout columns.
pub const COLUMN_SPACING: f64 = 220.0;
/// Vertical spacing between nodes within a lane.
pub const NODE_SPACING: f64 = 140.0;
/// Padding from a lane boundary to its first node row.
pub const LANE_PADDING: f64 = 60.0;
/// Vertical gap between adjacent lanes.
pub const LANE_GAP: f64 = 120.0;

/// Minimum interval between outgoing cursor broadcasts, in milliseconds.
pub const CURSOR_SEND_INTERVAL_MS: f64 = 120.0;
/// Age after which a remote cursor is dropped, in milliseconds.
pub const CURSOR_TTL_MS: f64 = 5000.0;

/// Default sticky note width.
pub const DEFAULT_NOTE_WIDTH: f64 = 180.0;
/// Default sticky note height.
pub const DEFAULT_NOTE_HEIGHT: f64 = 120.0;
/// Default font size for text items created by the engine.
pub const DEFAULT_FONT_SIZE: f64 = 18.0;
/// Minimum number of captured points for a freehand stroke to persist.
pub const MIN_STROKE_POINTS: usize = 2;
/// Default exponential smoothing factor applied to freehand strokes.
pub const DEFAULT_STROKE_SMOOTHING: f64 = 0.45;

/// Default fill for rectangles.
pub const DEFAULT_SHAPE_COLOR: &str = "#22d3ee";
/// Default fill for ellipses.
pub const DEFAULT_ELLIPSE_COLOR: &str = "#a78bfa";
/// Default stroke color for connectors.
pub const DEFAULT_CONNECTOR_COLOR: &str = "#fbbf24";
/// Default color for text items.
pub const DEFAULT_TEXT_COLOR: &str = "#e5e7eb";
/// Default color for sticky notes.
pub const DEFAULT_NOTE_COLOR: &str = "#fcd34d";
/// Default color for freehand strokes.
pub const DEFAULT_STROKE_COLOR: &str = "#f472b6";
/// Default color for causal nodes.
pub const DEFAULT_CAUSAL_NODE_COLOR: &str = "#38bdf8";
