//! Shared utilities for the interaction core.

pub mod timer;
