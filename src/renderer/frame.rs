use std::sync::Arc;

use crate::camera::Camera;
use crate::geometry::BoundingBox;
use crate::renderer::CorrelationId;
use crate::viewport::{DepthBuffer, FeatureMap, Viewport};

/// Snapshot of one frame received from the stream.
///
/// A new frame replaces the previous one wholesale; nothing patches a frame
/// in place. Depth and feature buffers are shared so interaction snapshots
/// can hold them without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// ID of the request this frame answers, if it answers one.
    pub correlation_id: Option<CorrelationId>,
    /// Camera the frame was rendered with.
    pub camera: Camera,
    /// Logical canvas size.
    pub viewport: Viewport,
    /// Device pixels per logical pixel.
    pub scale: f32,
    /// World-space extent of the visible geometry.
    pub bounding_box: BoundingBox,
    /// Depth map, when the server sent one.
    pub depth_buffer: Option<Arc<DepthBuffer>>,
    /// Entity-type map, when the server sent one.
    pub feature_map: Option<Arc<FeatureMap>>,
}

impl Frame {
    /// Frame without depth or feature data.
    #[must_use]
    pub fn new(
        camera: Camera,
        viewport: Viewport,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            correlation_id: None,
            camera,
            viewport,
            scale: 1.0,
            bounding_box,
            depth_buffer: None,
            feature_map: None,
        }
    }

    /// Tag the frame as the answer to a request.
    #[must_use]
    pub fn with_correlation_id(mut self, id: CorrelationId) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Set the device pixel scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Attach a depth buffer.
    #[must_use]
    pub fn with_depth_buffer(mut self, depth_buffer: DepthBuffer) -> Self {
        self.depth_buffer = Some(Arc::new(depth_buffer));
        self
    }

    /// Attach a feature map.
    #[must_use]
    pub fn with_feature_map(mut self, feature_map: FeatureMap) -> Self {
        self.feature_map = Some(Arc::new(feature_map));
        self
    }

    /// The depth buffer, if this frame has one.
    #[must_use]
    pub fn depth_buffer(&self) -> Option<&DepthBuffer> {
        self.depth_buffer.as_deref()
    }
}
