//! Shared utilities for the motion engine.
//!
//! Helpers for frame timing and easing curves.

pub mod easing;
pub mod frame_timing;
