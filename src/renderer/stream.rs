//! Contract with the streaming collaborator that owns the server connection.
//!
//! The collaborator accepts interaction brackets and camera replacements and
//! pushes frames back asynchronously. Frames are matched to requests by
//! [`CorrelationId`], never by arrival order.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::StreamError;

/// Pending result of a hit query.
pub type HitItemsFuture =
    Pin<Box<dyn Future<Output = Result<Vec<Hit>, StreamError>>>>;

/// Operations the interaction core needs from the stream connection.
///
/// Bracket and camera calls are fire-and-forget from the caller's point of
/// view: a returned error is logged, never retried.
pub trait StreamApi {
    /// Open a server-side interactive session.
    fn begin_interaction(&mut self) -> Result<(), StreamError>;

    /// Close the server-side interactive session.
    fn end_interaction(&mut self) -> Result<(), StreamError>;

    /// Ask for a frame rendered with a new camera.
    fn replace_camera(
        &mut self,
        request: &ReplaceCameraRequest,
    ) -> Result<(), StreamError>;

    /// Query the items under a frame-space point.
    fn hit_items(&mut self, request: &HitItemsRequest) -> HitItemsFuture;
}

/// Client-generated ID tying a frame back to the request that asked for it.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wrap an ID received from the server.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generator of unique correlation IDs.
///
/// IDs carry a random per-session prefix so requests from two clients that
/// share a server session never collide.
#[derive(Debug, Clone)]
pub struct CorrelationIds {
    prefix: u32,
    next: u64,
}

impl Default for CorrelationIds {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationIds {
    /// Generator with a fresh random prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(rand::random())
    }

    /// Generator with a fixed prefix.
    #[must_use]
    pub fn with_prefix(prefix: u32) -> Self {
        Self { prefix, next: 0 }
    }

    /// Next unused ID.
    pub fn next_id(&mut self) -> CorrelationId {
        let id = CorrelationId(format!("{:08x}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Outbound request for a frame rendered with `camera`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceCameraRequest {
    /// Camera to render with.
    pub camera: Camera,
    /// ID the answering frame will carry.
    pub correlation_id: CorrelationId,
    /// ID of the frame this camera was derived from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_correlation_id: Option<CorrelationId>,
}

/// Outbound hit query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitItemsRequest {
    /// Point in frame (device) pixels.
    pub point: Vec2,
    /// Whether hits should carry item metadata.
    pub include_metadata: bool,
}

/// One item under a queried point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hit {
    /// Scene item ID.
    pub item_id: String,
    /// World position of the hit, when the server resolved one.
    #[serde(default)]
    pub world_point: Option<Vec3>,
    /// Item metadata, when requested.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}
