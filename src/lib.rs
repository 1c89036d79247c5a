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

//! Headless scroll-driven motion engine for layered portfolio pages.
//!
//! Folio Motion turns scroll position, viewport size and pointer input into
//! per-layer transforms: depth parallax, a scroll-scrubbed decorative
//! "bucket", reversible text reveals with a highlighter wipe, an ambient
//! swing, a testimonial carousel and an endlessly looping logo marquee.
//! Nothing here touches a DOM directly; hosts feed events with timestamps
//! and receive transforms through a [`section::TransformSink`].
//!
//! # Key entry points
//!
//! - [`engine::init`] - one-time runtime setup, returns the token the
//!   engine requires
//! - [`engine::MotionEngine`] - the composition root that routes
//!   [`engine::Event`]s and ticks every animation
//! - [`section::SectionController`] - per-section `bind()`/`unbind()`
//! - [`options::Options`] - TOML presets: breakpoints, per-section parallax
//!   rows, reveal timings, carousel and marquee behavior
//!
//! # Architecture
//!
//! A single [`viewport::ViewportClassifier`] owns the device class and the
//! reduced-motion preference. Every section looks up its
//! [`options::SectionConfig`] row for that class and installs
//! [`scroll::ScrollBinding`]s, a [`reveal::RevealSequencer`] and an
//! [`ambient::Swing`]. Each live listener, timer, frame loop and tween is
//! recorded in a [`dispose::Disposables`] arena and released in one call on
//! unmount or class change. Scroll, ambient and pointer motion write
//! separate [`transform::LayerTransform`] channels that compose additively.

pub mod ambient;
pub mod carousel;
pub mod dispose;
pub mod engine;
pub mod error;
pub mod input;
pub mod layer;
pub mod locale;
pub mod marquee;
pub mod options;
pub mod reveal;
pub mod scroll;
pub mod section;
pub mod transform;
pub mod util;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;

pub use engine::{Event, MotionEngine, Target, init};
pub use error::MotionError;
pub use options::Options;
