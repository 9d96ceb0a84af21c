// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interaction core for a streamed 3D viewer.
//!
//! The scene is rendered remotely; this crate turns pointer, touch, wheel,
//! and key input into camera transforms and sends each new camera to the
//! renderer as a correlated request. Returned frames carry the camera they
//! were rendered with plus an optional depth buffer, which the transforms
//! ray-cast against so gestures anchor on real geometry.
//!
//! # Key entry points
//!
//! - [`input::BaseInteractionHandler`] - pointer state machine (delay,
//!   drag threshold, gesture arbitration, wheel smoothing, taps)
//! - [`input::TouchInteractionHandler`] - two-point pan, pinch, and twist
//! - [`interaction::StreamInteractionApi`] - camera transforms, interaction
//!   brackets, and render requests over a [`renderer::StreamApi`]
//! - [`camera::transform`] - the pure camera math
//! - [`options::Options`] - runtime configuration
//!
//! # Time
//!
//! Nothing here reads the clock on its own. Handlers take `now` and expose
//! `tick`/`next_deadline`; the API reads an injected [`util::timer::Clock`].

pub mod camera;
pub mod error;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod options;
pub mod renderer;
pub mod util;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;
