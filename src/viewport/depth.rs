//! Depth buffer and feature map sampled from a received frame.
//!
//! Depth values are 16-bit, linear between the frame camera's near and far
//! planes. `u16::MAX` marks a pixel with no geometry. Both buffers are
//! immutable; a new frame replaces them wholesale.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::error::ViewerError;
use crate::viewport::Viewport;

/// Depth value written where no geometry was rendered.
pub const MAX_DEPTH_VALUE: u16 = u16::MAX;

/// Per-frame sampled depth map in image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    /// Camera the frame was rendered with; unprojection uses it, not the
    /// camera of an in-progress interaction.
    camera: Camera,
    depths: Vec<u16>,
}

impl DepthBuffer {
    /// Wrap `width * height` row-major depth samples.
    pub fn new(
        width: u32,
        height: u32,
        camera: Camera,
        depths: Vec<u16>,
    ) -> Result<Self, ViewerError> {
        let expected = width as usize * height as usize;
        if depths.len() != expected {
            return Err(ViewerError::InvalidFrameData(format!(
                "depth buffer has {} samples, expected {expected}",
                depths.len()
            )));
        }
        Ok(Self {
            width,
            height,
            camera,
            depths,
        })
    }

    /// Decode little-endian 16-bit samples from raw bytes.
    pub fn from_bytes(
        width: u32,
        height: u32,
        camera: Camera,
        bytes: &[u8],
    ) -> Result<Self, ViewerError> {
        if bytes.len() % 2 != 0 {
            return Err(ViewerError::InvalidFrameData(format!(
                "depth buffer byte length {} is not a multiple of 2",
                bytes.len()
            )));
        }
        let depths = bytemuck::pod_collect_to_vec::<u8, u16>(bytes)
            .into_iter()
            .map(u16::from_le)
            .collect();
        Self::new(width, height, camera, depths)
    }

    /// Width in image pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in image pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Camera the frame was rendered with.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Map a viewport point into this buffer's pixel grid.
    #[must_use]
    pub fn frame_point(&self, viewport: &Viewport, point: Vec2) -> Vec2 {
        viewport.transform_point_to_image(point, self.width, self.height)
    }

    /// Raw sample at a frame point, or `None` outside the buffer.
    #[must_use]
    pub fn depth_at(&self, frame_point: Vec2) -> Option<u16> {
        let x = frame_point.x.floor();
        let y = frame_point.y.floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.depths.get(index).copied()
    }

    /// Sample normalized to `[0, 1)`, or `None` where nothing was rendered.
    #[must_use]
    pub fn normalized_depth_at(&self, frame_point: Vec2) -> Option<f32> {
        self.depth_at(frame_point)
            .filter(|d| *d != MAX_DEPTH_VALUE)
            .map(|d| f32::from(d) / f32::from(MAX_DEPTH_VALUE))
    }

    /// Whether geometry was rendered at the frame point.
    #[must_use]
    pub fn hit_test(&self, frame_point: Vec2) -> bool {
        self.normalized_depth_at(frame_point).is_some()
    }

    /// World point for a viewport point at the given normalized depth.
    ///
    /// Depth is linear along the view axis between the near and far planes,
    /// so perspective rays are stretched by the angle they make with it.
    #[must_use]
    pub fn world_point(
        &self,
        viewport: &Viewport,
        point: Vec2,
        normalized_depth: f32,
    ) -> Vec3 {
        let camera = &self.camera;
        let view_depth = camera.near + normalized_depth * (camera.far - camera.near);
        let ray = camera.ray(viewport, point);
        if camera.is_orthographic() {
            return ray.at(view_depth);
        }
        let cos = ray.direction.dot(camera.direction());
        if cos <= f32::EPSILON {
            ray.at(view_depth)
        } else {
            ray.at(view_depth / cos)
        }
    }

    /// World point under a viewport point, or `None` if it misses geometry.
    #[must_use]
    pub fn world_point_at(&self, viewport: &Viewport, point: Vec2) -> Option<Vec3> {
        let frame_point = self.frame_point(viewport, point);
        self.normalized_depth_at(frame_point)
            .map(|depth| self.world_point(viewport, point, depth))
    }
}

/// Kind of entity rendered under a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// Background.
    NoGeometry,
    /// Surface with exact (B-rep) geometry.
    PreciseSurface,
    /// Tessellated surface.
    ImpreciseSurface,
    /// Edge with exact geometry.
    PreciseEdge,
    /// Tessellated edge.
    ImpreciseEdge,
    /// Cap of a cross-section.
    CrossSection,
}

impl EntityType {
    /// Decode a feature-map code; unknown codes read as background.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::PreciseSurface,
            2 => Self::ImpreciseSurface,
            3 => Self::PreciseEdge,
            4 => Self::ImpreciseEdge,
            5 => Self::CrossSection,
            _ => Self::NoGeometry,
        }
    }

    /// Whether anything was rendered.
    #[must_use]
    pub fn is_geometry(self) -> bool {
        self != Self::NoGeometry
    }
}

/// Per-frame map of [`EntityType`] codes in image pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMap {
    width: u32,
    height: u32,
    codes: Vec<u8>,
}

impl FeatureMap {
    /// Wrap `width * height` row-major entity codes.
    pub fn new(width: u32, height: u32, codes: Vec<u8>) -> Result<Self, ViewerError> {
        let expected = width as usize * height as usize;
        if codes.len() != expected {
            return Err(ViewerError::InvalidFrameData(format!(
                "feature map has {} samples, expected {expected}",
                codes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            codes,
        })
    }

    /// Entity type under a viewport point.
    #[must_use]
    pub fn entity_at(&self, viewport: &Viewport, point: Vec2) -> EntityType {
        let p = viewport.transform_point_to_image(point, self.width, self.height);
        if p.x < 0.0 || p.y < 0.0 || p.x >= self.width as f32 || p.y >= self.height as f32 {
            return EntityType::NoGeometry;
        }
        let index = p.y as usize * self.width as usize + p.x as usize;
        self.codes
            .get(index)
            .map_or(EntityType::NoGeometry, |code| EntityType::from_code(*code))
    }
}
