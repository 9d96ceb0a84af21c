use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::geometry::Plane;

/// Anchor of a point-based pan, fixed on its first tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanData {
    /// World point grabbed by the cursor.
    pub hit_pt: Vec3,
    /// Plane through `hit_pt` facing the starting view direction.
    pub hit_plane: Plane,
    /// Camera at the first tick; every tick offsets from it.
    pub starting_camera: Camera,
}

/// Anchor of a zoom-to-point gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomData {
    /// World point the zoom converges on.
    pub hit_pt: Vec3,
    /// Plane through `hit_pt` facing the view direction.
    pub hit_plane: Plane,
    /// Screen point that established the anchor.
    pub starting_screen_pt: Vec2,
}

/// Per-interaction anchor state.
///
/// Created empty when an interaction begins, filled lazily by the first
/// tick of each gesture, and dropped as a whole when the interaction ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Anchors {
    /// Point-pan anchor.
    pub pan: Option<PanData>,
    /// Zoom-to-point anchor.
    pub zoom: Option<ZoomData>,
    /// Pivot of rotate-at-point.
    pub rotation_point: Option<Vec3>,
    /// Screen angle of the previous twist-to-point tick, in radians.
    pub last_angle: Option<f32>,
}

impl Anchors {
    /// Forget every anchor.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
