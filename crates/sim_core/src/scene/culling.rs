//! View culling against the spatial index
//!
//! Narrows per-frame rendering work to entities whose position falls inside
//! the camera's visible rect, optionally grown by a margin so large sprites
//! and fast movers do not pop at the screen edge. Non-renderable entities
//! (sensors, pure triggers) are filtered out of the result.

use crate::config::CameraConfig;
use crate::foundation::math::Rect;
use crate::scene::camera::Camera2D;
use crate::spatial::SpatialQueryService;
use crate::world::EntityId;

/// Culls entities outside the camera view
#[derive(Debug, Clone, Copy)]
pub struct ViewCuller {
    margin: f32,
}

impl ViewCuller {
    /// Create a culler with no margin
    pub fn new() -> Self {
        Self { margin: 0.0 }
    }

    /// Create a culler with a world-space margin around the view
    pub fn with_margin(margin: f32) -> Self {
        Self {
            margin: margin.max(0.0),
        }
    }

    /// Create a culler from camera configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::with_margin(config.margin)
    }

    /// Margin applied around the visible rect
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// World-space rect this culler tests against for the given camera
    pub fn cull_rect(&self, camera: &Camera2D) -> Rect {
        camera.visible_rect_with_margin(self.margin)
    }

    /// Renderable entities inside the camera view
    ///
    /// Entity ids come back in the index's traversal order; callers that
    /// need draw ordering sort by their own criteria.
    pub fn visible_entities(
        &self,
        service: &SpatialQueryService,
        camera: &Camera2D,
    ) -> Vec<EntityId> {
        let view = self.cull_rect(camera);
        service
            .query_rect(&view)
            .into_iter()
            .filter(|id| service.snapshot(*id).map_or(false, |s| s.renderable))
            .collect()
    }
}

impl Default for ViewCuller {
    fn default() -> Self {
        Self::new()
    }
}
