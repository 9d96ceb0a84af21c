//! Plane, ray, and bounding-box primitives used by the camera transforms.
//!
//! Everything here is pure math over `glam` types. Failure cases (a ray
//! parallel to a plane, a plane behind the ray origin) surface as `None`
//! rather than NaNs so callers can decide how to degrade.

use glam::{Quat, Vec2, Vec3};

/// Below this, a ray direction is treated as parallel to a plane.
const PARALLEL_EPSILON: f32 = 1.0e-6;

/// A plane in 3D space where `normal · p + distance = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed distance from origin (`n · p + d = 0`).
    pub distance: f32,
}

impl Plane {
    /// Plane with the given normal that contains `point`.
    ///
    /// The normal is normalized; a zero normal yields a degenerate plane
    /// that no ray intersects.
    #[must_use]
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Signed distance from point to plane (positive = in front, negative =
    /// behind)
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin` along `direction` (normalized).
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with `plane`, or `None` if the ray is parallel to it or
    /// the plane lies behind the origin.
    #[must_use]
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() <= PARALLEL_EPSILON {
            return None;
        }
        let t = -plane.distance_to_point(self.origin) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }
}

/// Axis-aligned world-space extent of the visible geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl BoundingBox {
    /// Box spanning the two corners (in any order).
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the sphere through all eight corners.
    #[must_use]
    pub fn radius(&self) -> f32 {
        (self.max - self.min).length() * 0.5
    }
}

/// Rotate `point` by `angle` radians about the line through `pivot` along
/// `axis`. A zero axis leaves the point where it is.
#[must_use]
pub fn rotate_about_axis(angle: f32, point: Vec3, axis: Vec3, pivot: Vec3) -> Vec3 {
    let axis = axis.normalize_or_zero();
    if axis == Vec3::ZERO {
        return point;
    }
    Quat::from_axis_angle(axis, angle) * (point - pivot) + pivot
}

/// Signed angle in radians that turns `from` onto `to`.
///
/// Uses the determinant/dot-product form, so the result is stable for the
/// tiny per-event angles produced by two-finger gestures.
#[must_use]
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to))
}

/// Wrap an angle in radians into `[-π, π]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
