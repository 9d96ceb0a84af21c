//! Camera model for the streamed scene.
//!
//! The camera is an immutable value: gestures produce new cameras, and the
//! interaction layer decides which one becomes the render request.

/// Camera value type, projection modes, and basis/ray math.
pub mod core;
/// Per-tick camera transforms driven by gestures.
pub mod transform;

pub use self::core::{Camera, CameraUpdate, Projection};
pub use transform::TransformContext;
