//! Render request correlation: tracks outstanding camera requests, matches
//! incoming frames to them, times them out, and measures round trips.
//!
//! The renderer never talks to the network itself. It produces
//! [`ReplaceCameraRequest`]s for the caller to send and consumes the frames
//! the caller receives.

/// Received frame snapshot.
pub mod frame;
/// Collaborator contract and wire types.
pub mod stream;
/// Round-trip latency tracking.
pub mod timing;

use std::sync::Arc;

pub use frame::Frame;
use rustc_hash::FxHashMap;
pub use stream::{
    CorrelationId, CorrelationIds, Hit, HitItemsFuture, HitItemsRequest,
    ReplaceCameraRequest, StreamApi,
};
pub use timing::RoundTripTiming;
use web_time::{Duration, Instant};

use crate::camera::Camera;
use crate::error::RenderError;

#[derive(Debug, Clone, Copy)]
struct PendingRender {
    sent_at: Instant,
    deadline: Instant,
}

/// Round trip of a request answered by an accepted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTiming {
    /// Request the frame answered.
    pub correlation_id: CorrelationId,
    /// Time from request to frame.
    pub round_trip: Duration,
}

/// Latest frame plus the set of requests still waiting for one.
#[derive(Debug, Default)]
pub struct Renderer {
    latest: Option<Arc<Frame>>,
    pending: FxHashMap<CorrelationId, PendingRender>,
    ids: CorrelationIds,
    timing: RoundTripTiming,
}

impl Renderer {
    /// Renderer with no frame yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer generating IDs from `ids`.
    #[must_use]
    pub fn with_ids(ids: CorrelationIds) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    /// Most recently accepted frame.
    #[must_use]
    pub fn latest_frame(&self) -> Option<&Arc<Frame>> {
        self.latest.as_ref()
    }

    /// Register a render of `camera` that must be answered within
    /// `timeout`, and build the request to send.
    pub fn request(
        &mut self,
        camera: Camera,
        timeout: Duration,
        now: Instant,
    ) -> ReplaceCameraRequest {
        let correlation_id = self.ids.next_id();
        let frame_correlation_id = self
            .latest
            .as_ref()
            .and_then(|frame| frame.correlation_id.clone());
        let _ = self.pending.insert(
            correlation_id.clone(),
            PendingRender {
                sent_at: now,
                deadline: now + timeout,
            },
        );
        ReplaceCameraRequest {
            camera,
            correlation_id,
            frame_correlation_id,
        }
    }

    /// Forget a request whose send failed.
    pub fn cancel(&mut self, id: &CorrelationId) {
        let _ = self.pending.remove(id);
    }

    /// Accept a frame as the latest one.
    ///
    /// Every frame replaces the previous snapshot. If it answers a pending
    /// request, that request completes and its round trip is returned.
    pub fn accept_frame(
        &mut self,
        frame: Frame,
        now: Instant,
    ) -> Option<RenderTiming> {
        let matched = frame.correlation_id.as_ref().and_then(|id| {
            let pending = self.pending.remove(id);
            if pending.is_none() {
                log::debug!("frame {id} matches no pending render");
            }
            pending.map(|p| (id.clone(), p))
        });
        self.latest = Some(Arc::new(frame));

        let (correlation_id, pending) = matched?;
        let round_trip = now.saturating_duration_since(pending.sent_at);
        self.timing.record(round_trip);
        log::debug!(
            "render {correlation_id} completed in {}ms",
            round_trip.as_millis()
        );
        Some(RenderTiming {
            correlation_id,
            round_trip,
        })
    }

    /// Fail every request whose deadline has passed.
    pub fn expire(&mut self, now: Instant) -> Vec<RenderError> {
        let mut expired: Vec<_> = self
            .pending
            .iter()
            .filter(|(_, p)| now >= p.deadline)
            .map(|(id, p)| (id.clone(), *p))
            .collect();
        expired.sort_by_key(|(_, p)| p.sent_at);

        expired
            .into_iter()
            .map(|(correlation_id, pending)| {
                let _ = self.pending.remove(&correlation_id);
                let elapsed = now.saturating_duration_since(pending.sent_at);
                log::warn!(
                    "render {correlation_id} timed out after {}ms",
                    elapsed.as_millis()
                );
                RenderError::Timeout {
                    correlation_id,
                    elapsed,
                }
            })
            .collect()
    }

    /// Cancel every pending request.
    pub fn reset(&mut self) -> Vec<RenderError> {
        let mut cancelled: Vec<_> = self.pending.drain().collect();
        cancelled.sort_by_key(|(_, p)| p.sent_at);
        cancelled
            .into_iter()
            .map(|(correlation_id, _)| RenderError::Cancelled { correlation_id })
            .collect()
    }

    /// Number of requests still waiting for a frame.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Round-trip statistics.
    #[must_use]
    pub fn timing(&self) -> &RoundTripTiming {
        &self.timing
    }
}
