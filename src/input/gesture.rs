/// Direction of a completed swipe, in content terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Dragged right-to-left: show the next item.
    Next,
    /// Dragged left-to-right: show the previous item.
    Prev,
}

/// Tracks one press/release pair and classifies it against a distance
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    threshold: f32,
    start_x: Option<f32>,
    last_x: f32,
}

impl DragGesture {
    /// Gesture with a minimum swipe distance in px.
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
            start_x: None,
            last_x: 0.0,
        }
    }

    /// Record the press position.
    pub fn press(&mut self, x: f32) {
        self.start_x = Some(x);
        self.last_x = x;
    }

    /// Track movement while pressed. Returns the delta since the previous
    /// position, or `None` when not pressed.
    pub fn motion(&mut self, x: f32) -> Option<f32> {
        if self.start_x.is_none() {
            return None;
        }
        let delta = x - self.last_x;
        self.last_x = x;
        Some(delta)
    }

    /// Finish the gesture. `Some` only when the signed distance reaches the
    /// threshold; a release without a press yields `None`.
    pub fn release(&mut self, x: f32) -> Option<Swipe> {
        let start = self.start_x.take()?;
        let delta = x - start;
        if delta.abs() < self.threshold {
            return None;
        }
        Some(if delta < 0.0 { Swipe::Next } else { Swipe::Prev })
    }

    /// Abort without classifying.
    pub fn cancel(&mut self) {
        self.start_x = None;
    }

    /// Whether a press is in progress.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.start_x.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_drags_do_not_swipe() {
        let mut g = DragGesture::new(48.0);
        g.press(200.0);
        assert_eq!(g.release(160.0), None);
        assert!(!g.is_pressed());
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut g = DragGesture::new(48.0);
        g.press(200.0);
        assert_eq!(g.release(152.0), Some(Swipe::Next));
        g.press(200.0);
        assert_eq!(g.release(248.0), Some(Swipe::Prev));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut g = DragGesture::new(48.0);
        assert_eq!(g.release(0.0), None);
        assert_eq!(g.motion(10.0), None);
    }

    #[test]
    fn motion_reports_incremental_deltas() {
        let mut g = DragGesture::new(48.0);
        g.press(100.0);
        assert_eq!(g.motion(90.0), Some(-10.0));
        assert_eq!(g.motion(85.0), Some(-5.0));
        g.cancel();
        assert_eq!(g.release(0.0), None);
    }
}
