//! Pan/zoom camera and coordinate conversions.
//!
//! All board entities live in world coordinates; pointer events arrive in
//! screen coordinates. `Camera` is the single mapping between the two:
//! `world = (screen - pan) / zoom`. Zoom is anchored so the world point under
//! the cursor stays fixed while the scale changes.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};

/// A 2D point, in either screen or world coordinates depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The viewport transform: pan offset in screen pixels plus a zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Horizontal pan offset in screen pixels.
    pub pan_x: f64,
    /// Vertical pan offset in screen pixels.
    pub pan_y: f64,
    /// Scale factor from world units to screen pixels.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point to world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new((screen.x - self.pan_x) / self.zoom, (screen.y - self.pan_y) / self.zoom)
    }

    /// Convert a world-space point to screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(world.x * self.zoom + self.pan_x, world.y * self.zoom + self.pan_y)
    }

    /// Convert a screen-space distance to world units.
    #[must_use]
    pub fn screen_dist_to_world(&self, dist: f64) -> f64 {
        dist / self.zoom
    }

    /// Translate the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Scale the zoom by `factor`, keeping the world point under `anchor`
    /// (a screen-space point) stationary. The result is clamped to
    /// [`MIN_ZOOM`]..=[`MAX_ZOOM`]; at the clamp boundary the camera is
    /// unchanged.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let next = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (next - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let pivot = self.screen_to_world(anchor);
        self.zoom = next;
        self.pan_x = anchor.x - pivot.x * self.zoom;
        self.pan_y = anchor.y - pivot.y * self.zoom;
    }
}
