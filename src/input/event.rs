/// Platform-agnostic input events for an interactive region.
///
/// Hosts translate their pointer, focus and keyboard events into these and
/// feed them to the [`Carousel`](crate::carousel::Carousel) or
/// [`Marquee`](crate::marquee::Marquee) that owns the region.
///
/// # Example
///
/// ```ignore
/// carousel.handle_input(InputEvent::PointerDown { x: 312.0 }, now);
/// carousel.handle_input(InputEvent::PointerUp { x: 240.0 }, now);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary pointer pressed inside the region.
    PointerDown {
        /// Horizontal position in CSS pixels.
        x: f32,
    },
    /// Pointer moved while pressed.
    PointerMove {
        /// Horizontal position in CSS pixels.
        x: f32,
    },
    /// Primary pointer released.
    PointerUp {
        /// Horizontal position in CSS pixels.
        x: f32,
    },
    /// Press aborted (pointer left the window, touch cancelled).
    PointerCancel,
    /// Pointer entered the region (hover).
    PointerEnter,
    /// Pointer left the region.
    PointerLeave,
    /// Keyboard focus moved into the region.
    FocusIn,
    /// Keyboard focus left the region.
    FocusOut,
    /// Key pressed while the region has focus.
    Key(Key),
}

/// Keys the interactive regions respond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Step back.
    ArrowLeft,
    /// Step forward.
    ArrowRight,
    /// Anything else; ignored.
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_key_names() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("Right"), Key::ArrowRight);
        assert_eq!(Key::from_dom("Enter"), Key::Other);
    }
}
