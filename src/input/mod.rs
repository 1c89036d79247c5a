//! Input handling: event types and the drag gesture state machine shared by
//! the testimonial carousel and the logo marquee.

/// Platform-agnostic input events.
pub mod event;
/// Press/release swipe detection.
pub mod gesture;

pub use event::{InputEvent, Key};
pub use gesture::{DragGesture, Swipe};
