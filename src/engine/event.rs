//! The engine's complete input vocabulary.
//!
//! Hosts translate window, document and element events into [`Event`]s and
//! pass them to [`MotionEngine::handle_event`](super::MotionEngine::handle_event)
//! together with the time they occurred.

use crate::input::InputEvent;
use crate::options::SectionId;

// ── Event payload types ──────────────────────────────────────────────────

/// Interactive region an [`InputEvent`] is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The testimonial carousel.
    Carousel,
    /// The logo marquee.
    Marquee,
}

// ── Event ────────────────────────────────────────────────────────────────

/// Something the host observed.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Document scrolled.
    Scroll {
        /// Vertical scroll offset in CSS pixels.
        y: f32,
    },
    /// Window resized.
    Resize {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
    /// Device orientation changed.
    OrientationChange {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
    /// `prefers-reduced-motion` flipped.
    ReducedMotionChanged(bool),
    /// A section image finished loading or failed.
    ImageSettled {
        /// Owning section.
        section: SectionId,
        /// Image index within the section.
        index: usize,
        /// Loaded (`true`) or errored.
        ok: bool,
    },
    /// A testimonial avatar finished loading or failed.
    AvatarSettled {
        /// Testimonial index.
        index: usize,
        /// Loaded (`true`) or errored.
        ok: bool,
    },
    /// Pointer moved anywhere over the page (hero parallax).
    PointerMoved {
        /// Viewport x.
        x: f32,
        /// Viewport y.
        y: f32,
    },
    /// Pointer, focus or key input on an interactive region.
    Input {
        /// Region receiving the input.
        target: Target,
        /// What happened.
        input: InputEvent,
    },
    /// A carousel pagination dot was clicked.
    DotClicked(usize),
    /// Rendered widths of the marquee slides, in track order.
    MarqueeMeasured(Vec<f32>),
    /// An animation frame.
    Frame,
}
