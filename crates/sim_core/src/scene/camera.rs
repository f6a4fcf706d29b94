//! # 2D Camera System
//!
//! Maps between world space and screen space for a top-down 2D view.
//! The camera owns position, viewport size and zoom; the visible world
//! rect it derives drives view culling and camera-view queries.
//!
//! ## Coordinate System
//! World space is X-right, Y-up with no axis flip; screen space shares the
//! same orientation with the origin at the viewport's bottom-left corner.
//! Presentation layers that draw Y-down apply their own flip.

use crate::config::CameraConfig;
use crate::foundation::math::{Rect, Vec2};

/// Camera for a 2D world view
///
/// Zoom is a magnification factor: zoom 2.0 shows half as much world per
/// screen unit, zoom 0.5 shows twice as much.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// World-space position at the center of the view
    pub position: Vec2,

    /// Viewport size in screen units
    pub viewport: Vec2,

    /// Magnification factor; always positive
    pub zoom: f32,
}

impl Camera2D {
    /// Create a camera centered on a position with zoom 1.0
    pub fn new(position: Vec2, viewport: Vec2) -> Self {
        Self {
            position,
            viewport,
            zoom: 1.0,
        }
    }

    /// Create a camera at the origin from configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec2::zeros(),
            viewport: config.viewport,
            zoom: config.zoom,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update the zoom factor
    ///
    /// Non-positive values would invert or collapse the view and are
    /// ignored with a warning.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom <= 0.0 {
            log::warn!("Ignoring non-positive camera zoom: {}", zoom);
            return;
        }
        self.zoom = zoom;
        log::trace!("Camera zoom updated to: {}", zoom);
    }

    /// Update viewport size for window resizes
    ///
    /// Only logs significant changes to reduce noise during live resizing.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        if (self.viewport - viewport).magnitude() > 1.0 {
            log::info!(
                "Camera viewport changed: {:?} -> {:?}",
                self.viewport,
                viewport
            );
        }
        self.viewport = viewport;
    }

    /// World-space rect currently visible through this camera
    pub fn visible_rect(&self) -> Rect {
        Rect::from_center_extents(self.position, self.viewport * (0.5 / self.zoom))
    }

    /// Visible rect grown by a world-space margin on every side
    pub fn visible_rect_with_margin(&self, margin: f32) -> Rect {
        self.visible_rect().expanded(margin)
    }

    /// Convert a screen-space point to world space
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.position + (screen - self.viewport * 0.5) / self.zoom
    }

    /// Convert a world-space point to screen space
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom + self.viewport * 0.5
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
