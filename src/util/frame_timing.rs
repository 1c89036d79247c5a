//! Frame delta measurement for frame-driven motion.

use web_time::{Duration, Instant};

/// Per-frame elapsed time for frame-driven motion, with FPS smoothing.
///
/// The first tick after construction or [`reset`](Self::reset) reports zero
/// elapsed time so a freshly resumed loop never jumps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Largest delta a single frame may report
    max_delta: Duration,
    /// Last frame timestamp (None until the first tick)
    last_frame: Option<Instant>,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameClock {
    /// Create a frame clock that clamps frame gaps to `max_delta`.
    pub fn new(max_delta: Duration) -> Self {
        Self {
            max_delta,
            last_frame: None,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    /* 5% new value, 95% old value for smooth
                                 * display */
        }
    }

    /// Advance to `now` and return the elapsed time since the previous
    /// frame, clamped to the configured maximum.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let Some(last) = self.last_frame.replace(now) else {
            return Duration::ZERO;
        };
        let elapsed = now.saturating_duration_since(last);

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        elapsed.min(self.max_delta)
    }

    /// Forget the previous frame (used when a loop is paused or cancelled).
    pub fn reset(&mut self) {
        self.last_frame = None;
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::new(Duration::from_millis(100));
        assert_eq!(clock.tick(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let mut clock = FrameClock::new(Duration::from_millis(100));
        let t0 = Instant::now();
        let _ = clock.tick(t0);
        assert_eq!(
            clock.tick(t0 + Duration::from_millis(16)),
            Duration::from_millis(16)
        );
        assert_eq!(
            clock.tick(t0 + Duration::from_secs(30)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn reset_restarts_from_zero() {
        let mut clock = FrameClock::new(Duration::from_millis(100));
        let t0 = Instant::now();
        let _ = clock.tick(t0);
        clock.reset();
        assert_eq!(clock.tick(t0 + Duration::from_millis(50)), Duration::ZERO);
    }
}
