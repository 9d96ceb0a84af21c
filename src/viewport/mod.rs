//! Screen-space geometry: the rendered viewport, element bounds, and the
//! per-frame depth buffer used to resolve screen points to world points.

/// Per-frame depth buffer and feature map.
pub mod depth;

use glam::Vec2;

use crate::camera::Camera;
use crate::geometry::Ray;

pub use depth::{DepthBuffer, EntityType, FeatureMap};

/// Pixel dimensions of the rendered canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
}

impl Viewport {
    /// Viewport of the given size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width / height, or 1.0 for a degenerate viewport.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Center point in pixels.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Convert a pixel position (origin top-left, y down) to normalized
    /// device coordinates (origin center, y up, range `[-1, 1]`).
    #[must_use]
    pub fn to_ndc(&self, point: Vec2) -> Vec2 {
        let width = self.width.max(f32::EPSILON);
        let height = self.height.max(f32::EPSILON);
        Vec2::new(2.0 * point.x / width - 1.0, 1.0 - 2.0 * point.y / height)
    }

    /// World-space ray through `point` as seen by `camera`.
    #[must_use]
    pub fn transform_point_to_ray(&self, point: Vec2, camera: &Camera) -> Ray {
        camera.ray(self, point)
    }

    /// Map a viewport point into the pixel grid of a `width` x `height`
    /// image rendered for this viewport.
    #[must_use]
    pub fn transform_point_to_image(&self, point: Vec2, width: u32, height: u32) -> Vec2 {
        let sx = width as f32 / self.width.max(f32::EPSILON);
        let sy = height as f32 / self.height.max(f32::EPSILON);
        Vec2::new(point.x * sx, point.y * sy)
    }
}

/// Client-space rectangle of the element hosting the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Rectangle from its top-left corner and size.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Convert a client position into element-local (canvas) coordinates.
    #[must_use]
    pub fn to_local(&self, client: Vec2) -> Vec2 {
        client - self.origin()
    }
}

/// Anything that can report its client-space bounding rectangle.
///
/// Gestures query this once at drag start and reuse the result for the rest
/// of the drag, so layout changes mid-gesture do not shift the anchor.
pub trait ElementBounds {
    /// Current bounding rectangle in client coordinates.
    fn bounding_rect(&self) -> Rect;
}

impl ElementBounds for Rect {
    fn bounding_rect(&self) -> Rect {
        *self
    }
}
