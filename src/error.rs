//! Crate-level error types.

use std::fmt;

use web_time::Duration;

use crate::renderer::CorrelationId;

/// Failure reported by the stream connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The connection is down; the request was not delivered.
    Disconnected,
    /// The server refused the request.
    Rejected(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "stream disconnected"),
            Self::Rejected(msg) => write!(f, "stream rejected request: {msg}"),
        }
    }
}

impl std::error::Error for StreamError {}

/// Failure of a single camera render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No frame with the request's correlation ID arrived in time.
    Timeout {
        /// Request that timed out.
        correlation_id: CorrelationId,
        /// Time waited before giving up.
        elapsed: Duration,
    },
    /// The request was dropped, e.g. by a reconnect.
    Cancelled {
        /// Request that was dropped.
        correlation_id: CorrelationId,
    },
}

impl RenderError {
    /// Correlation ID of the failed request.
    #[must_use]
    pub fn correlation_id(&self) -> &CorrelationId {
        match self {
            Self::Timeout { correlation_id, .. }
            | Self::Cancelled { correlation_id } => correlation_id,
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout {
                correlation_id,
                elapsed,
            } => write!(
                f,
                "render {correlation_id} timed out after {}ms",
                elapsed.as_millis()
            ),
            Self::Cancelled { correlation_id } => {
                write!(f, "render {correlation_id} cancelled")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Errors produced by the viewkit crate.
#[derive(Debug)]
pub enum ViewerError {
    /// Stream connection failure.
    Stream(StreamError),
    /// Render request failure.
    Render(RenderError),
    /// The current frame carries no depth buffer.
    DepthBufferUnavailable,
    /// Nothing was rendered at the queried point.
    NoGeometry,
    /// A frame payload did not match its declared dimensions.
    InvalidFrameData(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(e) => write!(f, "stream error: {e}"),
            Self::Render(e) => write!(f, "render error: {e}"),
            Self::DepthBufferUnavailable => {
                write!(f, "no depth buffer for the current frame")
            }
            Self::NoGeometry => write!(f, "no geometry at point"),
            Self::InvalidFrameData(msg) => {
                write!(f, "invalid frame data: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stream(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StreamError> for ViewerError {
    fn from(e: StreamError) -> Self {
        Self::Stream(e)
    }
}

impl From<RenderError> for ViewerError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
