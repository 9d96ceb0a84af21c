//! Camera transforms applied on each interaction tick.
//!
//! Each function maps the current camera (plus the frame it is drawn over)
//! to the next camera. None of them fail: a tick that cannot be resolved,
//! such as a ray running parallel to the anchor plane, returns the input
//! camera unchanged.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::camera::{Camera, CameraUpdate, Projection};
use crate::geometry::{wrap_angle, BoundingBox, Plane, Ray};
use crate::interaction::{Anchors, PanData, ZoomData};
use crate::renderer::Frame;
use crate::viewport::{DepthBuffer, Viewport};

/// Pixels the cursor may drift before an orthographic zoom re-anchors.
pub const ORTHOGRAPHIC_ZOOM_ANCHOR_TOLERANCE: f32 = 2.0;

/// Rotation per viewport width (or height) of drag.
const ROTATION_PER_VIEWPORT: f32 = 3.0 * PI;
/// Dolly per viewport height of delta zoom, in units of the view distance.
const ZOOM_SPEED: f32 = 3.0;
/// Dolly per viewport height of zoom-to-point.
const ZOOM_TO_POINT_SPEED: f32 = 6.0;
/// Field of view used for pivot steps under an orthographic camera.
const ORTHOGRAPHIC_PIVOT_FOV: f32 = 45.0;

/// Everything a transform may read.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Camera before this tick.
    pub camera: Camera,
    /// Canvas size of the latest frame.
    pub viewport: Viewport,
    /// Device pixel scale of the latest frame.
    pub scale: f32,
    /// Scene extent of the latest frame.
    pub bounding_box: BoundingBox,
    /// Latest frame.
    pub frame: &'a Frame,
    /// Depth buffer of the latest frame.
    pub depth_buffer: Option<&'a DepthBuffer>,
}

impl<'a> TransformContext<'a> {
    /// Context for transforming `camera` over `frame`.
    #[must_use]
    pub fn new(camera: Camera, frame: &'a Frame) -> Self {
        Self {
            camera,
            viewport: frame.viewport,
            scale: frame.scale,
            bounding_box: frame.bounding_box,
            frame,
            depth_buffer: frame.depth_buffer(),
        }
    }

    /// Geometry under a viewport point, if the depth buffer has any.
    #[must_use]
    pub fn world_point_at(&self, point: Vec2) -> Option<Vec3> {
        self.depth_buffer?.world_point_at(&self.viewport, point)
    }

    /// Ray through a viewport point from the current camera.
    #[must_use]
    pub fn ray(&self, point: Vec2) -> Ray {
        self.viewport.transform_point_to_ray(point, &self.camera)
    }

    fn height(&self) -> f32 {
        self.viewport.height.max(1.0)
    }

    fn width(&self) -> f32 {
        self.viewport.width.max(1.0)
    }
}

/// Rotation axis and angle for a screen-space drag.
///
/// The angle is `|3π·dx/w| + |3π·dy/h|`, a sum rather than a vector length.
/// For the few-pixel deltas of a drag tick this matches the true magnitude
/// closely; the direction lives entirely in the axis.
fn drag_rotation(ctx: &TransformContext<'_>, delta: Vec2) -> (Vec3, f32) {
    let camera = &ctx.camera;
    let view = camera.view_vector();
    let cross_x = camera.up.cross(view).normalize_or_zero();
    let cross_y = view.cross(cross_x).normalize_or_zero();
    let mouse_to_world =
        (cross_x * delta.x + cross_y * delta.y).normalize_or_zero();
    let axis = mouse_to_world.cross(view);

    let epsilon_x = ROTATION_PER_VIEWPORT * delta.x / ctx.width();
    let epsilon_y = ROTATION_PER_VIEWPORT * delta.y / ctx.height();
    (axis, epsilon_x.abs() + epsilon_y.abs())
}

/// Orbit the camera about its look-at point.
#[must_use]
pub fn rotate(ctx: &TransformContext<'_>, delta: Vec2) -> Camera {
    let (axis, angle) = drag_rotation(ctx, delta);
    ctx.camera.rotate_around_axis(angle, axis)
}

/// Orbit about the geometry under `point`, or the scene center when the
/// point misses. The pivot is fixed by the gesture's first tick.
#[must_use]
pub fn rotate_at_point(
    ctx: &TransformContext<'_>,
    anchors: &mut Anchors,
    delta: Vec2,
    point: Vec2,
) -> Camera {
    let pivot = *anchors.rotation_point.get_or_insert_with(|| {
        ctx.world_point_at(point)
            .unwrap_or_else(|| ctx.bounding_box.center())
    });
    let (axis, angle) = drag_rotation(ctx, delta);
    let rotated = ctx.camera.rotate_around_axis_at_point(angle, pivot, axis);

    // Keep looking as deep into the scene as before the rotation.
    let depth = ctx.camera.position.distance(ctx.bounding_box.center());
    rotated.update(CameraUpdate {
        look_at: Some(rotated.position + rotated.direction() * depth),
        ..Default::default()
    })
}

/// Turn the view direction about the eye (first-person look).
#[must_use]
pub fn pivot(ctx: &TransformContext<'_>, delta: Vec2) -> Camera {
    let fov_y = match ctx.camera.projection {
        Projection::Perspective { fov_y } => fov_y,
        Projection::Orthographic { .. } => ORTHOGRAPHIC_PIVOT_FOV,
    }
    .to_radians();
    let fov_x = 2.0 * ((fov_y * 0.5).tan() * ctx.viewport.aspect_ratio()).atan();

    let camera = ctx.camera;
    let yawed = camera.rotate_around_axis_at_point(
        fov_x * delta.x / ctx.width(),
        camera.position,
        camera.true_up(),
    );
    yawed.rotate_around_axis_at_point(
        fov_y * delta.y / ctx.height(),
        yawed.position,
        yawed.right(),
    )
}

/// Slide the camera parallel to the screen by a pixel delta.
#[must_use]
pub fn pan_by_delta(ctx: &TransformContext<'_>, delta: Vec2) -> Camera {
    let camera = ctx.camera;
    let extent = match camera.projection {
        Projection::Perspective { fov_y } => {
            camera.distance() * fov_y.to_radians().tan()
        }
        Projection::Orthographic { fov_height } => fov_height,
    };
    let direction = camera.direction();
    let x_vec = camera.up.cross(direction).normalize_or_zero();
    let y_vec = direction.cross(x_vec).normalize_or_zero();
    let per_pixel = extent / ctx.height();
    camera.move_by(x_vec * (delta.x * per_pixel) + y_vec * (delta.y * per_pixel))
}

/// World point and plane a pan or zoom anchors to.
///
/// Geometry under the cursor wins; otherwise the ray is cut with the plane
/// through the look-at point facing the view direction.
fn resolve_anchor(ctx: &TransformContext<'_>, point: Vec2) -> Option<(Vec3, Plane)> {
    let normal = ctx.camera.direction();
    if let Some(hit) = ctx.world_point_at(point) {
        return Some((hit, Plane::from_normal_and_point(normal, hit)));
    }
    let plane = Plane::from_normal_and_point(normal, ctx.camera.look_at);
    ctx.ray(point).intersect_plane(&plane).map(|hit| (hit, plane))
}

/// Drag the grabbed world point so it stays under the cursor.
///
/// Every tick is computed from the gesture's starting camera, so the path
/// never accumulates drift.
#[must_use]
pub fn pan_to_point(
    ctx: &TransformContext<'_>,
    anchors: &mut Anchors,
    point: Vec2,
) -> Camera {
    let pan = match anchors.pan {
        Some(pan) => pan,
        None => {
            let Some((hit_pt, hit_plane)) = resolve_anchor(ctx, point) else {
                log::warn!("pan anchor ray is parallel to the view plane");
                return ctx.camera;
            };
            *anchors.pan.insert(PanData {
                hit_pt,
                hit_plane,
                starting_camera: ctx.camera,
            })
        }
    };

    let ray = ctx
        .viewport
        .transform_point_to_ray(point, &pan.starting_camera);
    let Some(move_pt) = ray.intersect_plane(&pan.hit_plane) else {
        log::warn!("pan ray is parallel to the anchor plane");
        return ctx.camera;
    };
    pan.starting_camera.move_by(pan.hit_pt - move_pt)
}

/// Move the camera along the view direction (perspective) or scale the
/// view height (orthographic).
#[must_use]
pub fn zoom(ctx: &TransformContext<'_>, delta: f32, clamp_to_near: bool) -> Camera {
    let camera = ctx.camera;
    match camera.projection {
        Projection::Perspective { .. } => {
            let step = ZOOM_SPEED * camera.distance() * delta / ctx.height();
            let position = camera.position + camera.direction() * step;
            let remaining = (camera.look_at - position).dot(camera.direction());
            let limit = if clamp_to_near { camera.near } else { 0.0 };
            if remaining < limit {
                return camera;
            }
            camera.update(CameraUpdate {
                position: Some(position),
                ..Default::default()
            })
        }
        Projection::Orthographic { fov_height } => {
            let fov_height = fov_height * (1.0 - ZOOM_SPEED * delta / ctx.height());
            if fov_height <= 0.0 {
                return camera;
            }
            camera.update(CameraUpdate {
                projection: Some(Projection::Orthographic { fov_height }),
                ..Default::default()
            })
        }
    }
}

/// Zoom toward (positive `delta`) or away from the world point under the
/// cursor.
///
/// Perspective steps that would end closer than the near plane are refused
/// when `clamp_to_near` is set. Orthographic zoom keeps the anchor under
/// the cursor and re-anchors once the cursor drifts more than
/// [`ORTHOGRAPHIC_ZOOM_ANCHOR_TOLERANCE`] pixels.
#[must_use]
pub fn zoom_to_point(
    ctx: &TransformContext<'_>,
    anchors: &mut Anchors,
    point: Vec2,
    delta: f32,
    clamp_to_near: bool,
) -> Camera {
    if ctx.camera.is_orthographic()
        && anchors.zoom.is_some_and(|z| {
            z.starting_screen_pt.distance(point)
                > ORTHOGRAPHIC_ZOOM_ANCHOR_TOLERANCE
        })
    {
        anchors.zoom = None;
    }

    let anchor = match anchors.zoom {
        Some(anchor) => anchor,
        None => {
            let Some((hit_pt, hit_plane)) = resolve_anchor(ctx, point) else {
                log::warn!("zoom anchor ray is parallel to the view plane");
                return ctx.camera;
            };
            *anchors.zoom.insert(ZoomData {
                hit_pt,
                hit_plane,
                starting_screen_pt: point,
            })
        }
    };

    match ctx.camera.projection {
        Projection::Perspective { .. } => {
            zoom_perspective_to_point(ctx, &anchor, point, delta, clamp_to_near)
        }
        Projection::Orthographic { fov_height } => {
            zoom_orthographic_to_point(ctx, &anchor, point, delta, fov_height)
        }
    }
}

fn zoom_perspective_to_point(
    ctx: &TransformContext<'_>,
    anchor: &ZoomData,
    point: Vec2,
    delta: f32,
    clamp_to_near: bool,
) -> Camera {
    let camera = ctx.camera;
    let relative = ZOOM_TO_POINT_SPEED
        * camera.position.distance(anchor.hit_pt)
        * delta
        / ctx.height();
    let position = camera.position + ctx.ray(point).direction * relative;

    let view_ray = Ray::new(position, camera.view_vector());
    let Some(look_at) = view_ray.intersect_plane(&anchor.hit_plane) else {
        log::warn!("zoom view ray does not reach the anchor plane");
        return camera;
    };
    if clamp_to_near && position.distance(look_at) < camera.near {
        return camera;
    }
    camera.update(CameraUpdate {
        position: Some(position),
        look_at: Some(look_at),
        ..Default::default()
    })
}

fn zoom_orthographic_to_point(
    ctx: &TransformContext<'_>,
    anchor: &ZoomData,
    point: Vec2,
    delta: f32,
    fov_height: f32,
) -> Camera {
    let camera = ctx.camera;
    let new_height =
        fov_height * (1.0 - ZOOM_TO_POINT_SPEED * delta / ctx.height());
    if new_height <= 0.0 {
        return camera;
    }

    // Offset of the anchor from the view axis, in the screen plane.
    let right = camera.right();
    let up = camera.true_up();
    let relative = anchor.hit_pt - camera.position;
    let anchor_offset = right * relative.dot(right) + up * relative.dot(up);

    // Where the cursor sits relative to the view axis after scaling.
    let ndc = ctx.viewport.to_ndc(point);
    let half_h = new_height * 0.5;
    let half_w = half_h * ctx.viewport.aspect_ratio();
    let cursor_offset = right * (ndc.x * half_w) + up * (ndc.y * half_h);

    camera
        .move_by(anchor_offset - cursor_offset)
        .update(CameraUpdate {
            projection: Some(Projection::Orthographic {
                fov_height: new_height,
            }),
            ..Default::default()
        })
}

/// Roll the camera about its view vector; positive turns the scene
/// clockwise on screen.
#[must_use]
pub fn twist(ctx: &TransformContext<'_>, degrees: f32) -> Camera {
    ctx.camera
        .rotate_around_axis(-degrees.to_radians(), ctx.camera.view_vector())
}

/// Roll by the change in the cursor's angle about the viewport center.
///
/// The first tick after [`Anchors::last_angle`] is cleared only records the
/// baseline.
#[must_use]
pub fn twist_to_point(
    ctx: &TransformContext<'_>,
    anchors: &mut Anchors,
    point: Vec2,
) -> Camera {
    let offset = point - ctx.viewport.center();
    if offset.length_squared() <= f32::EPSILON {
        return ctx.camera;
    }
    let angle = offset.y.atan2(offset.x);
    match anchors.last_angle.replace(angle) {
        Some(previous) => twist(ctx, wrap_angle(angle - previous).to_degrees()),
        None => ctx.camera,
    }
}

/// Frame the whole scene.
#[must_use]
pub fn view_all(ctx: &TransformContext<'_>) -> Camera {
    ctx.camera.view_all(&ctx.bounding_box, &ctx.viewport)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    const EPS: f32 = 1e-4;

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y, 45.0)
    }

    fn frame_for(camera: Camera) -> Frame {
        Frame::new(
            camera,
            Viewport::new(100.0, 100.0),
            BoundingBox::new(Vec3::splat(-1.0), Vec3::ONE),
        )
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn horizontal_drag_orbits_about_vertical_axis() {
        let frame = frame_for(camera());
        let ctx = TransformContext::new(camera(), &frame);
        // 3π * dx / w = π/2 for dx = w / 6
        let rotated = rotate(&ctx, Vec2::new(100.0 / 6.0, 0.0));
        assert!(close(rotated.position, Vec3::new(-10.0, 0.0, 0.0)));
        assert!(close(rotated.look_at, Vec3::ZERO));
        assert!(close(rotated.up, Vec3::Y));
    }

    #[test]
    fn rotation_angle_sums_axis_magnitudes() {
        let frame = frame_for(camera());
        let ctx = TransformContext::new(camera(), &frame);
        let d = 100.0 / 12.0;
        let rotated = rotate(&ctx, Vec2::new(d, -d));
        let angle = rotated.position.angle_between(camera().position);
        assert!((angle - FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn rotate_at_point_falls_back_to_scene_center_and_caches() {
        let start = Camera::perspective(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::Y,
            45.0,
        );
        let frame = Frame::new(
            start,
            Viewport::new(100.0, 100.0),
            BoundingBox::new(Vec3::new(0.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0)),
        );
        let ctx = TransformContext::new(start, &frame);
        let mut anchors = Anchors::default();
        let rotated =
            rotate_at_point(&ctx, &mut anchors, Vec2::new(1.0, 0.0), Vec2::ZERO);
        assert_eq!(anchors.rotation_point, Some(Vec3::new(1.0, 0.0, 0.0)));
        let depth = start.position.distance(Vec3::new(1.0, 0.0, 0.0));
        assert!((rotated.distance() - depth).abs() < EPS);
    }

    #[test]
    fn delta_pan_moves_against_drag() {
        let frame = frame_for(camera());
        let ctx = TransformContext::new(camera(), &frame);
        let panned = pan_by_delta(&ctx, Vec2::new(10.0, 0.0));
        assert!(panned.position.x < 0.0);
        assert_eq!(panned.view_vector(), camera().view_vector());
        let expected = 10.0 * 10.0 * 45.0_f32.to_radians().tan() / 100.0;
        assert!((panned.position.x + expected).abs() < EPS);
    }

    #[test]
    fn point_pan_keeps_anchor_under_cursor() {
        let frame = frame_for(camera());
        let viewport = frame.viewport;
        let mut anchors = Anchors::default();
        let start = Vec2::new(50.0, 50.0);

        let ctx = TransformContext::new(camera(), &frame);
        let first = pan_to_point(&ctx, &mut anchors, start);
        assert!(close(first.position, camera().position));

        let ctx = TransformContext::new(first, &frame);
        let moved = pan_to_point(&ctx, &mut anchors, Vec2::new(70.0, 40.0));
        let ray = moved.ray(&viewport, Vec2::new(70.0, 40.0));
        let plane = anchors.pan.unwrap().hit_plane;
        assert!(close(ray.intersect_plane(&plane).unwrap(), Vec3::ZERO));

        let ctx = TransformContext::new(moved, &frame);
        let back = pan_to_point(&ctx, &mut anchors, start);
        assert!(close(back.position, camera().position));
        assert!(close(back.look_at, camera().look_at));
    }

    fn depth_camera() -> Camera {
        camera().with_clipping(1.0, 21.0)
    }

    /// 10x10 buffer with geometry about 15 units deep on its left half and
    /// background on its right half.
    fn depth_frame() -> Frame {
        let depths = (0..100)
            .map(|i| if i % 10 < 5 { 45_875 } else { u16::MAX })
            .collect();
        let buffer = DepthBuffer::new(10, 10, depth_camera(), depths).unwrap();
        frame_for(depth_camera()).with_depth_buffer(buffer)
    }

    #[test]
    fn point_pan_anchors_on_geometry_under_cursor() {
        let frame = depth_frame();
        let grab = Vec2::new(25.0, 50.0);
        let expected = frame
            .depth_buffer()
            .unwrap()
            .world_point_at(&frame.viewport, grab)
            .unwrap();
        assert!(expected.z < -4.0);

        let mut anchors = Anchors::default();
        let ctx = TransformContext::new(depth_camera(), &frame);
        let first = pan_to_point(&ctx, &mut anchors, grab);
        assert!(close(first.position, depth_camera().position));
        let pan = anchors.pan.unwrap();
        assert!(close(pan.hit_pt, expected));
        assert!(close(pan.hit_plane.normal, depth_camera().direction()));
        assert!(pan.hit_plane.distance_to_point(expected).abs() < EPS);

        let to = Vec2::new(40.0, 30.0);
        let ctx = TransformContext::new(first, &frame);
        let moved = pan_to_point(&ctx, &mut anchors, to);
        let ray = moved.ray(&frame.viewport, to);
        assert!(close(ray.intersect_plane(&pan.hit_plane).unwrap(), expected));
    }

    #[test]
    fn zoom_anchor_uses_depth_and_falls_back_on_background() {
        let frame = depth_frame();
        let depth = frame.depth_buffer().unwrap();
        let ctx = TransformContext::new(depth_camera(), &frame);

        let on_geometry = Vec2::new(25.0, 50.0);
        let mut anchors = Anchors::default();
        let _ = zoom_to_point(&ctx, &mut anchors, on_geometry, 1.0, true);
        let zoom = anchors.zoom.unwrap();
        let expected = depth.world_point_at(&frame.viewport, on_geometry).unwrap();
        assert!(close(zoom.hit_pt, expected));
        assert!(zoom.hit_plane.distance_to_point(expected).abs() < EPS);

        let background = Vec2::new(75.0, 50.0);
        assert!(depth.world_point_at(&frame.viewport, background).is_none());
        let mut anchors = Anchors::default();
        let _ = zoom_to_point(&ctx, &mut anchors, background, 1.0, true);
        let zoom = anchors.zoom.unwrap();
        assert!(zoom.hit_pt.z.abs() < EPS);
        assert!(zoom.hit_pt.x > 0.0);
        assert!(zoom.hit_plane.distance_to_point(Vec3::ZERO).abs() < EPS);
    }

    #[test]
    fn rotate_at_point_pivots_about_geometry_under_cursor() {
        let frame = depth_frame();
        let point = Vec2::new(25.0, 50.0);
        let expected = frame
            .depth_buffer()
            .unwrap()
            .world_point_at(&frame.viewport, point)
            .unwrap();
        let ctx = TransformContext::new(depth_camera(), &frame);
        let mut anchors = Anchors::default();
        let rotated =
            rotate_at_point(&ctx, &mut anchors, Vec2::new(1.0, 0.0), point);
        assert!(close(anchors.rotation_point.unwrap(), expected));
        let before = depth_camera().position.distance(expected);
        assert!((rotated.position.distance(expected) - before).abs() < 1e-3);
    }

    #[test]
    fn point_pan_gives_up_when_ray_misses_plane() {
        let frame = frame_for(camera());
        let mut anchors = Anchors {
            pan: Some(PanData {
                hit_pt: Vec3::ZERO,
                hit_plane: Plane::from_normal_and_point(Vec3::Y, Vec3::new(0.0, 50.0, 0.0)),
                starting_camera: camera(),
            }),
            ..Default::default()
        };
        let current = camera().move_by(Vec3::X);
        let ctx = TransformContext::new(current, &frame);
        assert_eq!(pan_to_point(&ctx, &mut anchors, Vec2::new(50.0, 60.0)), current);
    }

    #[test]
    fn zoom_to_point_refuses_to_pass_near_plane() {
        let near_cam = camera().with_clipping(9.5, 100.0);
        let frame = frame_for(near_cam);
        let ctx = TransformContext::new(near_cam, &frame);
        let mut anchors = Anchors::default();
        // 6 * 10 * 1 / 100 = 0.6 → 9.4 from the anchor, inside 9.5
        let zoomed =
            zoom_to_point(&ctx, &mut anchors, Vec2::new(50.0, 50.0), 1.0, true);
        assert_eq!(zoomed, near_cam);

        let unclamped =
            zoom_to_point(&ctx, &mut anchors, Vec2::new(50.0, 50.0), 1.0, false);
        assert!((unclamped.position.z - 9.4).abs() < EPS);
    }

    #[test]
    fn zoom_to_point_moves_along_cursor_ray() {
        let frame = frame_for(camera());
        let ctx = TransformContext::new(camera(), &frame);
        let mut anchors = Anchors::default();
        let point = Vec2::new(80.0, 50.0);
        let zoomed = zoom_to_point(&ctx, &mut anchors, point, 1.0, true);
        let hit = anchors.zoom.unwrap().hit_pt;
        assert!(hit.x > 0.0 && hit.z.abs() < EPS);
        // Still on the same ray, just closer.
        let towards = (hit - zoomed.position).normalize();
        assert!(close(towards, ctx.ray(point).direction));
        assert!(zoomed.position.distance(hit) < camera().position.distance(hit));
        assert!(zoomed.look_at.z.abs() < EPS);
    }

    #[test]
    fn delta_zoom_respects_near_plane() {
        let near_cam = camera().with_clipping(9.5, 100.0);
        let frame = frame_for(near_cam);
        let ctx = TransformContext::new(near_cam, &frame);
        assert_eq!(zoom(&ctx, 2.0, true), near_cam);
        let closer = zoom(&ctx, 1.0, true);
        assert!((closer.position.z - 9.7).abs() < EPS);
    }

    #[test]
    fn orthographic_zoom_scales_height_and_pins_anchor() {
        let ortho = Camera::orthographic(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y, 10.0);
        let frame = frame_for(ortho);
        let viewport = frame.viewport;
        let ctx = TransformContext::new(ortho, &frame);
        let mut anchors = Anchors::default();
        let point = Vec2::new(75.0, 25.0);
        let zoomed = zoom_to_point(&ctx, &mut anchors, point, 5.0, true);

        let fov_height = match zoomed.projection {
            Projection::Orthographic { fov_height } => fov_height,
            Projection::Perspective { .. } => f32::NAN,
        };
        assert!((fov_height - 7.0).abs() < EPS);
        let hit = anchors.zoom.unwrap().hit_pt;
        let ray = zoomed.ray(&viewport, point);
        let under_cursor = ray.origin + ray.direction * (ray.origin.z - hit.z);
        assert!((under_cursor.x - hit.x).abs() < EPS);
        assert!((under_cursor.y - hit.y).abs() < EPS);
    }

    #[test]
    fn orthographic_zoom_reanchors_after_cursor_drift() {
        let ortho = Camera::orthographic(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y, 10.0);
        let frame = frame_for(ortho);
        let ctx = TransformContext::new(ortho, &frame);
        let mut anchors = Anchors::default();
        let _ = zoom_to_point(&ctx, &mut anchors, Vec2::new(50.0, 50.0), 1.0, true);
        let first = anchors.zoom.unwrap();

        let _ = zoom_to_point(&ctx, &mut anchors, Vec2::new(52.0, 50.0), 1.0, true);
        assert_eq!(anchors.zoom.unwrap().starting_screen_pt, first.starting_screen_pt);

        let _ = zoom_to_point(&ctx, &mut anchors, Vec2::new(53.0, 50.0), 1.0, true);
        assert_eq!(anchors.zoom.unwrap().starting_screen_pt, Vec2::new(53.0, 50.0));
    }

    #[test]
    fn perspective_zoom_anchor_never_moves() {
        let frame = frame_for(camera());
        let ctx = TransformContext::new(camera(), &frame);
        let mut anchors = Anchors::default();
        let _ = zoom_to_point(&ctx, &mut anchors, Vec2::new(50.0, 50.0), 0.1, true);
        let _ = zoom_to_point(&ctx, &mut anchors, Vec2::new(90.0, 10.0), 0.1, true);
        assert_eq!(anchors.zoom.unwrap().starting_screen_pt, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn twist_rolls_up_vector_only() {
        let frame = frame_for(camera());
        let ctx = TransformContext::new(camera(), &frame);
        let twisted = twist(&ctx, 90.0);
        assert!(close(twisted.position, camera().position));
        assert!(close(twisted.up, Vec3::NEG_X));
    }

    #[test]
    fn twist_to_point_needs_a_baseline() {
        let frame = frame_for(camera());
        let ctx = TransformContext::new(camera(), &frame);
        let mut anchors = Anchors::default();
        assert_eq!(twist_to_point(&ctx, &mut anchors, Vec2::new(100.0, 50.0)), camera());
        // Quarter turn clockwise on screen (y grows downward).
        let twisted = twist_to_point(&ctx, &mut anchors, Vec2::new(50.0, 100.0));
        assert!(close(twisted.up, Vec3::NEG_X));
    }

    #[test]
    fn pivot_turns_view_about_eye() {
        let frame = frame_for(camera());
        let ctx = TransformContext::new(camera(), &frame);
        let pivoted = pivot(&ctx, Vec2::new(25.0, 0.0));
        assert!(close(pivoted.position, camera().position));
        assert!(pivoted.look_at.x < 0.0);
        assert!((pivoted.distance() - 10.0).abs() < EPS);
    }
}
