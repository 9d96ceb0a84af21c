use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{rotate_about_axis, BoundingBox, Ray};
use crate::viewport::Viewport;

/// How the camera maps the scene onto the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// Pinhole projection.
    Perspective {
        /// Vertical field of view in degrees.
        fov_y: f32,
    },
    /// Parallel projection.
    Orthographic {
        /// World-space height of the visible region.
        fov_height: f32,
    },
}

/// Immutable camera state. Every transform returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    /// Projection mode and its field of view.
    pub projection: Projection,
}

/// Partial camera update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraUpdate {
    /// New eye position.
    pub position: Option<Vec3>,
    /// New look-at point.
    pub look_at: Option<Vec3>,
    /// New up vector.
    pub up: Option<Vec3>,
    /// New projection.
    pub projection: Option<Projection>,
}

impl Camera {
    /// Perspective camera with default clipping planes.
    #[must_use]
    pub fn perspective(position: Vec3, look_at: Vec3, up: Vec3, fov_y: f32) -> Self {
        Self {
            position,
            look_at,
            up,
            near: 0.1,
            far: 1000.0,
            projection: Projection::Perspective { fov_y },
        }
    }

    /// Orthographic camera with default clipping planes.
    #[must_use]
    pub fn orthographic(
        position: Vec3,
        look_at: Vec3,
        up: Vec3,
        fov_height: f32,
    ) -> Self {
        Self {
            projection: Projection::Orthographic { fov_height },
            ..Self::perspective(position, look_at, up, 45.0)
        }
    }

    /// Same camera with different clipping planes.
    #[must_use]
    pub fn with_clipping(self, near: f32, far: f32) -> Self {
        Self { near, far, ..self }
    }

    /// Whether this camera uses a parallel projection.
    #[must_use]
    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    /// Vector from the eye to the look-at point.
    #[must_use]
    pub fn view_vector(&self) -> Vec3 {
        self.look_at - self.position
    }

    /// Unit view direction.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.view_vector().normalize_or_zero()
    }

    /// Distance from the eye to the look-at point.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.view_vector().length()
    }

    /// Unit screen-right vector.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.direction().cross(self.up).normalize_or_zero()
    }

    /// Unit screen-up vector, orthogonal to the view direction.
    #[must_use]
    pub fn true_up(&self) -> Vec3 {
        self.right().cross(self.direction()).normalize_or_zero()
    }

    /// Copy with the given fields replaced.
    #[must_use]
    pub fn update(&self, update: CameraUpdate) -> Self {
        Self {
            position: update.position.unwrap_or(self.position),
            look_at: update.look_at.unwrap_or(self.look_at),
            up: update.up.unwrap_or(self.up),
            projection: update.projection.unwrap_or(self.projection),
            ..*self
        }
    }

    /// Translate eye and look-at together.
    #[must_use]
    pub fn move_by(&self, delta: Vec3) -> Self {
        self.update(CameraUpdate {
            position: Some(self.position + delta),
            look_at: Some(self.look_at + delta),
            ..Default::default()
        })
    }

    /// Orbit about the look-at point.
    #[must_use]
    pub fn rotate_around_axis(&self, angle: f32, axis: Vec3) -> Self {
        self.rotate_around_axis_at_point(angle, self.look_at, axis)
    }

    /// Rigidly rotate eye, look-at, and up about the line through `pivot`.
    #[must_use]
    pub fn rotate_around_axis_at_point(
        &self,
        angle: f32,
        pivot: Vec3,
        axis: Vec3,
    ) -> Self {
        if angle == 0.0 {
            return *self;
        }
        let up_position = self.position + self.up;
        let position = rotate_about_axis(angle, self.position, axis, pivot);
        let look_at = rotate_about_axis(angle, self.look_at, axis, pivot);
        let up = rotate_about_axis(angle, up_position, axis, pivot) - position;
        self.update(CameraUpdate {
            position: Some(position),
            look_at: Some(look_at),
            up: Some(up),
            ..Default::default()
        })
    }

    /// Ray from the eye through a viewport point (pixels, origin top-left).
    ///
    /// Orthographic rays start on the plane through the eye and run parallel
    /// to the view direction.
    #[must_use]
    pub fn ray(&self, viewport: &Viewport, point: Vec2) -> Ray {
        let ndc = viewport.to_ndc(point);
        let direction = self.direction();
        let right = self.right();
        let up = self.true_up();
        match self.projection {
            Projection::Perspective { fov_y } => {
                let half_h = (fov_y.to_radians() * 0.5).tan();
                let half_w = half_h * viewport.aspect_ratio();
                Ray::new(
                    self.position,
                    direction + right * (ndc.x * half_w) + up * (ndc.y * half_h),
                )
            }
            Projection::Orthographic { fov_height } => {
                let half_h = fov_height * 0.5;
                let half_w = half_h * viewport.aspect_ratio();
                let origin = self.position
                    + right * (ndc.x * half_w)
                    + up * (ndc.y * half_h);
                Ray::new(origin, direction)
            }
        }
    }

    /// Reposition so the whole bounding box is visible, keeping the current
    /// view direction and up vector.
    #[must_use]
    pub fn view_all(&self, bounding_box: &BoundingBox, viewport: &Viewport) -> Self {
        let center = bounding_box.center();
        let radius = bounding_box.radius().max(f32::EPSILON);
        let direction = self.direction();
        let direction = if direction == Vec3::ZERO {
            Vec3::NEG_Z
        } else {
            direction
        };
        let aspect = viewport.aspect_ratio();
        match self.projection {
            Projection::Perspective { fov_y } => {
                let half_y = fov_y.to_radians() * 0.5;
                let half_x = (half_y.tan() * aspect).atan();
                let distance = radius / half_y.min(half_x).sin();
                self.update(CameraUpdate {
                    position: Some(center - direction * distance),
                    look_at: Some(center),
                    ..Default::default()
                })
            }
            Projection::Orthographic { .. } => {
                let fov_height = 2.0 * radius * (1.0 / aspect).max(1.0);
                self.update(CameraUpdate {
                    position: Some(center - direction * (2.0 * radius)),
                    look_at: Some(center),
                    projection: Some(Projection::Orthographic { fov_height }),
                    ..Default::default()
                })
            }
        }
    }
}
