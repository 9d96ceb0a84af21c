use std::sync::Arc;

use glam::{Vec2, Vec3};
use web_time::Instant;

use super::{
    Anchors, Cursor, CursorHandle, CursorManager, CursorPriority,
    InteractionApi, TapDetails, ViewerEvent,
};
use crate::camera::{transform, Camera, TransformContext};
use crate::error::{RenderError, StreamError, ViewerError};
use crate::options::{ConfigProvider, Options};
use crate::renderer::{
    Frame, HitItemsFuture, HitItemsRequest, RenderTiming, Renderer, StreamApi,
};
use crate::util::timer::{Clock, SystemClock};
use crate::viewport::EntityType;

/// Camera snapshot and anchors of the open bracket.
#[derive(Debug, Clone, Copy)]
struct InteractionSession {
    camera: Camera,
    anchors: Anchors,
}

/// [`InteractionApi`] backed by a stream connection.
///
/// Holds the latest frame (through its [`Renderer`]), the open interaction
/// session, and the event queue for the host. Frames and reconnects are fed
/// in by the host; camera changes go out as render requests.
pub struct StreamInteractionApi<S> {
    stream: S,
    renderer: Renderer,
    config: Box<dyn ConfigProvider>,
    clock: Box<dyn Clock>,
    session: Option<InteractionSession>,
    events: Vec<ViewerEvent>,
    cursors: CursorManager,
    device_pixel_ratio: f32,
}

impl<S: StreamApi> StreamInteractionApi<S> {
    /// API over `stream`, reading options from `config`.
    #[must_use]
    pub fn new(stream: S, config: impl ConfigProvider + 'static) -> Self {
        Self::with_clock(stream, config, SystemClock)
    }

    /// API using `clock` to timestamp render requests.
    #[must_use]
    pub fn with_clock(
        stream: S,
        config: impl ConfigProvider + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            stream,
            renderer: Renderer::new(),
            config: Box::new(config),
            clock: Box::new(clock),
            session: None,
            events: Vec::new(),
            cursors: CursorManager::new(),
            device_pixel_ratio: 1.0,
        }
    }

    /// Use a specific renderer (e.g. with fixed correlation IDs).
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// The stream collaborator.
    #[must_use]
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Mutable access to the stream collaborator.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Request tracking and the latest frame.
    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Set the ratio of device to CSS pixels.
    pub fn set_device_pixel_ratio(&mut self, ratio: f32) {
        self.device_pixel_ratio = ratio.max(f32::EPSILON);
    }

    /// Camera of the open bracket.
    #[must_use]
    pub fn current_camera(&self) -> Option<Camera> {
        self.session.map(|s| s.camera)
    }

    /// Anchors of the open bracket.
    #[must_use]
    pub fn anchors(&self) -> Option<&Anchors> {
        self.session.as_ref().map(|s| &s.anchors)
    }

    /// Take every queued notification.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Accept a frame pushed by the stream.
    pub fn handle_frame(
        &mut self,
        frame: Frame,
        now: Instant,
    ) -> Option<RenderTiming> {
        self.renderer.accept_frame(frame, now)
    }

    /// Fail render requests whose deadline has passed.
    pub fn poll_timeouts(&mut self, now: Instant) -> Vec<RenderError> {
        self.renderer.expire(now)
    }

    /// Restore server state after the stream reconnected.
    ///
    /// Pending renders are cancelled. An open bracket is re-announced and
    /// its current camera rendered again.
    pub fn handle_reconnect(&mut self) -> Vec<RenderError> {
        let cancelled = self.renderer.reset();
        if let Some(session) = self.session {
            log::debug!("re-opening interaction after reconnect");
            if let Err(e) = self.stream.begin_interaction() {
                log::warn!("begin_interaction after reconnect failed: {e}");
            }
            self.render(session.camera);
        }
        cancelled
    }

    /// Items under a canvas point.
    pub fn hit_items(
        &mut self,
        point: Vec2,
        include_metadata: bool,
    ) -> HitItemsFuture {
        if self.renderer.latest_frame().is_none() {
            return Box::pin(std::future::ready(Err(
                StreamError::Rejected("no frame received yet".to_owned()),
            )));
        }
        let scale = self.frame_scale();
        self.stream.hit_items(&HitItemsRequest {
            point: point * scale,
            include_metadata,
        })
    }

    /// Kind of entity under a canvas point.
    ///
    /// Without a feature map any depth hit counts as an imprecise surface.
    #[must_use]
    pub fn get_entity_type_at_point(&self, point: Vec2) -> EntityType {
        let Some(frame) = self.renderer.latest_frame() else {
            return EntityType::NoGeometry;
        };
        if let Some(features) = &frame.feature_map {
            return features.entity_at(&frame.viewport, point);
        }
        match frame.depth_buffer() {
            Some(depth)
                if depth.hit_test(depth.frame_point(&frame.viewport, point)) =>
            {
                EntityType::ImpreciseSurface
            }
            _ => EntityType::NoGeometry,
        }
    }

    /// World point of the geometry under a canvas point.
    pub fn get_world_point_from_viewport(
        &self,
        point: Vec2,
    ) -> Result<Vec3, ViewerError> {
        let frame = self
            .renderer
            .latest_frame()
            .ok_or(ViewerError::DepthBufferUnavailable)?;
        let depth = frame
            .depth_buffer()
            .ok_or(ViewerError::DepthBufferUnavailable)?;
        depth
            .world_point_at(&frame.viewport, point)
            .ok_or(ViewerError::NoGeometry)
    }

    fn frame_scale(&self) -> f32 {
        self.renderer
            .latest_frame()
            .map_or(self.device_pixel_ratio, |f| f.scale)
    }

    /// Apply `f` to the session camera and render the result.
    ///
    /// Outside a bracket, or before the first frame, nothing happens. A
    /// transform that leaves the camera unchanged sends no request.
    fn transform_camera<F>(&mut self, f: F)
    where
        F: FnOnce(&TransformContext<'_>, &mut Anchors) -> Camera,
    {
        let Some(frame) = self.renderer.latest_frame().map(Arc::clone) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let ctx = TransformContext::new(session.camera, &frame);
        let camera = f(&ctx, &mut session.anchors);
        if camera == session.camera {
            return;
        }
        session.camera = camera;
        self.render(camera);
    }

    fn render(&mut self, camera: Camera) {
        let timeout = self.config.options().network.render_timeout();
        let now = self.clock.now();
        let request = self.renderer.request(camera, timeout, now);
        if let Err(e) = self.stream.replace_camera(&request) {
            log::warn!("replace_camera {} failed: {e}", request.correlation_id);
            self.renderer.cancel(&request.correlation_id);
        }
    }

    fn clamp_zoom(&self) -> bool {
        self.config
            .options()
            .interactions
            .use_minimum_perspective_zoom_distance
    }
}

impl<S: StreamApi> InteractionApi for StreamInteractionApi<S> {
    fn options(&self) -> Options {
        self.config.options()
    }

    fn begin_interaction(&mut self) {
        if self.session.is_some() {
            return;
        }
        let Some(frame) = self.renderer.latest_frame() else {
            log::warn!("begin_interaction before the first frame");
            return;
        };
        self.session = Some(InteractionSession {
            camera: frame.camera,
            anchors: Anchors::default(),
        });
        self.events.push(ViewerEvent::InteractionStarted);
        log::debug!("interaction started");
        if let Err(e) = self.stream.begin_interaction() {
            log::warn!("begin_interaction failed: {e}");
        }
    }

    fn end_interaction(&mut self) {
        if self.session.take().is_none() {
            return;
        }
        self.events.push(ViewerEvent::InteractionFinished);
        log::debug!("interaction finished");
        if let Err(e) = self.stream.end_interaction() {
            log::warn!("end_interaction failed: {e}");
        }
    }

    fn is_interacting(&self) -> bool {
        self.session.is_some()
    }

    fn rotate_camera(&mut self, delta: Vec2) {
        self.transform_camera(|ctx, _| transform::rotate(ctx, delta));
    }

    fn rotate_camera_at_point(&mut self, delta: Vec2, point: Vec2) {
        self.transform_camera(|ctx, anchors| {
            transform::rotate_at_point(ctx, anchors, delta, point)
        });
    }

    fn pivot_camera(&mut self, delta: Vec2) {
        self.transform_camera(|ctx, _| transform::pivot(ctx, delta));
    }

    fn pan_camera_by_delta(&mut self, delta: Vec2) {
        self.transform_camera(|ctx, _| transform::pan_by_delta(ctx, delta));
    }

    fn pan_camera_to_screen_point(&mut self, point: Vec2) {
        self.transform_camera(|ctx, anchors| {
            transform::pan_to_point(ctx, anchors, point)
        });
    }

    fn zoom_camera(&mut self, delta: f32) {
        let clamp = self.clamp_zoom();
        self.transform_camera(|ctx, _| transform::zoom(ctx, delta, clamp));
    }

    fn zoom_camera_to_point(&mut self, point: Vec2, delta: f32) {
        let clamp = self.clamp_zoom();
        self.transform_camera(|ctx, anchors| {
            transform::zoom_to_point(ctx, anchors, point, delta, clamp)
        });
    }

    fn twist_camera(&mut self, degrees: f32) {
        self.transform_camera(|ctx, _| transform::twist(ctx, degrees));
    }

    fn twist_camera_to_point(&mut self, point: Vec2) {
        self.transform_camera(|ctx, anchors| {
            transform::twist_to_point(ctx, anchors, point)
        });
    }

    fn reset_last_angle(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.anchors.last_angle = None;
        }
    }

    fn reset_anchors(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.anchors.clear();
        }
    }

    fn view_all(&mut self) {
        if self.session.is_some() {
            self.transform_camera(|ctx, _| transform::view_all(ctx));
            return;
        }
        let Some(frame) = self.renderer.latest_frame().map(Arc::clone) else {
            return;
        };
        let camera = transform::view_all(&TransformContext::new(frame.camera, &frame));
        self.render(camera);
    }

    fn pixel_threshold(&self, is_touch: bool) -> f32 {
        self.config.options().interactions.pointer_threshold(is_touch)
            * self.device_pixel_ratio
    }

    fn tap(&mut self, details: TapDetails) {
        self.events.push(ViewerEvent::Tap(details));
    }

    fn double_tap(&mut self, details: TapDetails) {
        self.events.push(ViewerEvent::DoubleTap(details));
    }

    fn long_press(&mut self, details: TapDetails) {
        self.events.push(ViewerEvent::LongPress(details));
    }

    fn add_cursor(
        &mut self,
        cursor: Cursor,
        priority: CursorPriority,
    ) -> CursorHandle {
        self.cursors.add(cursor, priority)
    }

    fn remove_cursor(&mut self, handle: CursorHandle) {
        let _ = self.cursors.remove(handle);
    }

    fn current_cursor(&self) -> Cursor {
        self.cursors.current()
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;
    use crate::geometry::BoundingBox;
    use crate::renderer::{CorrelationIds, Hit, ReplaceCameraRequest};
    use crate::util::timer::ManualClock;
    use crate::viewport::{DepthBuffer, FeatureMap, Viewport};

    #[derive(Debug, Default)]
    struct RecordingStream {
        begins: usize,
        ends: usize,
        cameras: Vec<ReplaceCameraRequest>,
        hits: Vec<HitItemsRequest>,
        fail_with: Option<StreamError>,
    }

    impl StreamApi for RecordingStream {
        fn begin_interaction(&mut self) -> Result<(), StreamError> {
            self.begins += 1;
            self.fail_with.clone().map_or(Ok(()), Err)
        }

        fn end_interaction(&mut self) -> Result<(), StreamError> {
            self.ends += 1;
            self.fail_with.clone().map_or(Ok(()), Err)
        }

        fn replace_camera(
            &mut self,
            request: &ReplaceCameraRequest,
        ) -> Result<(), StreamError> {
            self.cameras.push(request.clone());
            self.fail_with.clone().map_or(Ok(()), Err)
        }

        fn hit_items(&mut self, request: &HitItemsRequest) -> HitItemsFuture {
            self.hits.push(request.clone());
            Box::pin(std::future::ready(Ok(vec![Hit {
                item_id: "item-1".to_owned(),
                world_point: None,
                metadata: None,
            }])))
        }
    }

    fn start_camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y, 45.0)
    }

    fn frame() -> Frame {
        Frame::new(
            start_camera(),
            Viewport::new(100.0, 100.0),
            BoundingBox::new(Vec3::splat(-1.0), Vec3::ONE),
        )
    }

    fn api() -> (StreamInteractionApi<RecordingStream>, ManualClock) {
        let clock = ManualClock::default();
        let mut api = StreamInteractionApi::with_clock(
            RecordingStream::default(),
            Options::default(),
            clock.clone(),
        )
        .with_renderer(Renderer::with_ids(CorrelationIds::with_prefix(7)));
        let _ = api.handle_frame(frame(), clock.now());
        (api, clock)
    }

    #[test]
    fn begin_is_idempotent() {
        let (mut api, _) = api();
        api.begin_interaction();
        api.begin_interaction();
        assert!(api.is_interacting());
        assert_eq!(api.stream().begins, 1);
        assert_eq!(api.drain_events(), vec![ViewerEvent::InteractionStarted]);
        assert_eq!(api.current_camera(), Some(start_camera()));
    }

    #[test]
    fn end_without_begin_is_a_no_op() {
        let (mut api, _) = api();
        api.end_interaction();
        assert_eq!(api.stream().ends, 0);
        assert!(api.drain_events().is_empty());
    }

    #[test]
    fn camera_calls_outside_bracket_do_nothing() {
        let (mut api, _) = api();
        api.rotate_camera(Vec2::new(10.0, 0.0));
        api.pan_camera_by_delta(Vec2::new(10.0, 0.0));
        api.pan_camera_to_screen_point(Vec2::new(10.0, 10.0));
        api.zoom_camera(1.0);
        api.zoom_camera_to_point(Vec2::new(50.0, 50.0), 1.0);
        api.twist_camera(10.0);
        assert!(api.stream().cameras.is_empty());
        assert!(api.current_camera().is_none());
        assert_eq!(api.renderer().pending_count(), 0);
    }

    #[test]
    fn transform_renders_each_new_camera() {
        let (mut api, _) = api();
        api.begin_interaction();
        api.rotate_camera(Vec2::new(10.0, 0.0));
        api.rotate_camera(Vec2::new(5.0, 0.0));
        let sent = &api.stream().cameras;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].camera, api.current_camera().unwrap());
        assert_ne!(sent[0].correlation_id, sent[1].correlation_id);
        assert_eq!(api.renderer().pending_count(), 2);
    }

    #[test]
    fn end_clears_camera_and_anchors() {
        let (mut api, _) = api();
        api.begin_interaction();
        api.pan_camera_to_screen_point(Vec2::new(50.0, 50.0));
        api.rotate_camera_at_point(Vec2::new(1.0, 0.0), Vec2::new(50.0, 50.0));
        let anchors = api.anchors().unwrap();
        assert!(anchors.pan.is_some());
        assert!(anchors.rotation_point.is_some());

        api.end_interaction();
        assert!(api.anchors().is_none());
        assert_eq!(api.stream().ends, 1);

        api.begin_interaction();
        assert_eq!(api.anchors(), Some(&Anchors::default()));
    }

    #[test]
    fn reset_anchors_keeps_bracket_open() {
        let (mut api, _) = api();
        api.begin_interaction();
        api.pan_camera_to_screen_point(Vec2::new(50.0, 50.0));
        api.twist_camera_to_point(Vec2::new(90.0, 50.0));
        assert!(api.anchors().unwrap().last_angle.is_some());
        api.reset_last_angle();
        assert!(api.anchors().unwrap().last_angle.is_none());
        assert!(api.anchors().unwrap().pan.is_some());
        api.reset_anchors();
        assert_eq!(api.anchors(), Some(&Anchors::default()));
        assert!(api.is_interacting());
        assert_eq!(api.stream().ends, 0);
    }

    #[test]
    fn rejected_zoom_sends_nothing() {
        let clock = ManualClock::default();
        let mut api = StreamInteractionApi::with_clock(
            RecordingStream::default(),
            Options::default(),
            clock.clone(),
        );
        let near = Frame {
            camera: start_camera().with_clipping(9.5, 100.0),
            ..frame()
        };
        let _ = api.handle_frame(near, clock.now());
        api.begin_interaction();
        api.zoom_camera_to_point(Vec2::new(50.0, 50.0), 1.0);
        assert!(api.stream().cameras.is_empty());
        assert_eq!(api.current_camera().unwrap().position.z, 10.0);
    }

    #[test]
    fn view_all_renders_without_bracket() {
        let (mut api, _) = api();
        api.view_all();
        assert!(!api.is_interacting());
        let sent = &api.stream().cameras;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].camera.look_at, Vec3::ZERO);
        assert!(api.stream().begins == 0);
    }

    #[test]
    fn stream_failures_are_logged_not_raised() {
        let (mut api, _) = api();
        api.stream_mut().fail_with = Some(StreamError::Disconnected);
        api.begin_interaction();
        assert!(api.is_interacting());
        api.rotate_camera(Vec2::new(3.0, 0.0));
        // The failed send is not left waiting for a frame.
        assert_eq!(api.renderer().pending_count(), 0);
        api.end_interaction();
        assert!(!api.is_interacting());
    }

    #[test]
    fn render_timeout_is_reported() {
        let (mut api, clock) = api();
        api.begin_interaction();
        api.twist_camera(5.0);
        let id = api.stream().cameras[0].correlation_id.clone();

        clock.advance(Duration::from_millis(14_000));
        assert!(api.poll_timeouts(clock.now()).is_empty());
        clock.advance(Duration::from_millis(1_000));
        let errors = api.poll_timeouts(clock.now());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].correlation_id(), &id);
        assert!(matches!(errors[0], RenderError::Timeout { .. }));
    }

    #[test]
    fn matching_frame_reports_round_trip() {
        let (mut api, clock) = api();
        api.begin_interaction();
        api.twist_camera(5.0);
        let request = api.stream().cameras[0].clone();
        clock.advance(Duration::from_millis(42));
        let answered = Frame {
            camera: request.camera,
            ..frame()
        }
        .with_correlation_id(request.correlation_id.clone());
        let timing = api.handle_frame(answered, clock.now()).unwrap();
        assert_eq!(timing.correlation_id, request.correlation_id);
        assert_eq!(timing.round_trip, Duration::from_millis(42));
        assert!(api.poll_timeouts(clock.now() + Duration::from_secs(60)).is_empty());
    }

    #[test]
    fn reconnect_restores_open_bracket() {
        let (mut api, _) = api();
        api.begin_interaction();
        api.twist_camera(5.0);
        let cancelled = api.handle_reconnect();
        assert_eq!(cancelled.len(), 1);
        assert!(matches!(cancelled[0], RenderError::Cancelled { .. }));
        assert_eq!(api.stream().begins, 2);
        let sent = &api.stream().cameras;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].camera, sent[0].camera);
        assert_eq!(api.renderer().pending_count(), 1);
    }

    #[test]
    fn reconnect_while_idle_only_cancels() {
        let (mut api, _) = api();
        api.view_all();
        let cancelled = api.handle_reconnect();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(api.stream().begins, 0);
        assert_eq!(api.stream().cameras.len(), 1);
    }

    #[test]
    fn pixel_threshold_scales_with_device_ratio() {
        let (mut api, _) = api();
        assert_eq!(api.pixel_threshold(false), 2.0);
        assert_eq!(api.pixel_threshold(true), 4.0);
        api.set_device_pixel_ratio(2.0);
        assert_eq!(api.pixel_threshold(false), 4.0);
    }

    #[test]
    fn queries_without_depth_fail_fast() {
        let (api, _) = api();
        let center = Vec2::new(50.0, 50.0);
        assert_eq!(api.get_entity_type_at_point(center), EntityType::NoGeometry);
        assert!(matches!(
            api.get_world_point_from_viewport(center),
            Err(ViewerError::DepthBufferUnavailable)
        ));
    }

    #[test]
    fn queries_read_latest_depth_and_features() {
        let (mut api, clock) = api();
        let mut depths = vec![u16::MAX; 4];
        depths[0] = 5898; // ≈ 0.09 → 10 units in front of the eye
        let depth = DepthBuffer::new(2, 2, start_camera().with_clipping(1.0, 101.0), depths)
            .unwrap();
        let _ = api.handle_frame(frame().with_depth_buffer(depth), clock.now());

        let top_left = Vec2::new(10.0, 10.0);
        let bottom_right = Vec2::new(90.0, 90.0);
        assert_eq!(api.get_entity_type_at_point(top_left), EntityType::ImpreciseSurface);
        assert_eq!(api.get_entity_type_at_point(bottom_right), EntityType::NoGeometry);
        assert!(api.get_world_point_from_viewport(top_left).is_ok());
        assert!(matches!(
            api.get_world_point_from_viewport(bottom_right),
            Err(ViewerError::NoGeometry)
        ));

        let features = FeatureMap::new(2, 2, vec![0, 0, 0, 5]).unwrap();
        let _ = api.handle_frame(frame().with_feature_map(features), clock.now());
        assert_eq!(api.get_entity_type_at_point(bottom_right), EntityType::CrossSection);
    }

    #[test]
    fn hit_items_scales_to_frame_pixels() {
        let (mut api, clock) = api();
        let _ = api.handle_frame(frame().with_scale(2.0), clock.now());
        let hits = pollster::block_on(api.hit_items(Vec2::new(10.0, 20.0), true)).unwrap();
        assert_eq!(hits[0].item_id, "item-1");
        assert_eq!(api.stream().hits[0].point, Vec2::new(20.0, 40.0));
        assert!(api.stream().hits[0].include_metadata);
    }

    #[test]
    fn taps_are_queued_for_the_host() {
        let (mut api, _) = api();
        let details = TapDetails {
            position: Vec2::new(1.0, 2.0),
            button: crate::input::MouseButton::Left,
            pointer_type: crate::input::PointerType::Mouse,
            modifiers: crate::input::Modifiers::default(),
        };
        api.tap(details);
        api.long_press(details);
        assert_eq!(
            api.drain_events(),
            vec![ViewerEvent::Tap(details), ViewerEvent::LongPress(details)]
        );
        assert!(api.drain_events().is_empty());
    }

    #[test]
    fn cursor_stack_is_exposed() {
        let (mut api, _) = api();
        let handle = api.add_cursor(Cursor::Grabbing, CursorPriority::Medium);
        assert_eq!(api.current_cursor(), Cursor::Grabbing);
        api.remove_cursor(handle);
        assert_eq!(api.current_cursor(), Cursor::Default);
    }
}
