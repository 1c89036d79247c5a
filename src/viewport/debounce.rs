//! Trailing-edge debounce for resize-triggered re-binding.

use web_time::{Duration, Instant};

use crate::dispose::{Disposables, TimerKind};

/// Trailing-edge debouncer whose pending deadline is a timer in the
/// owner's [`Disposables`], so releasing the arena cancels it.
///
/// Every [`arm`](Self::arm) replaces the pending deadline;
/// [`poll`](Self::poll) fires exactly once after the input has been quiet
/// for the configured delay.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    timer: TimerKind,
    delay: Duration,
}

impl Debouncer {
    /// Debouncer over the `timer` slot with the given quiet period.
    #[must_use]
    pub fn new(timer: TimerKind, delay: Duration) -> Self {
        Self { timer, delay }
    }

    /// Record an event at `now`, restarting the quiet period.
    pub fn arm(&self, arena: &mut Disposables, now: Instant) {
        let _ = arena.arm(self.timer, now + self.delay);
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub fn is_armed(&self, arena: &Disposables) -> bool {
        arena.deadline(self.timer).is_some()
    }

    /// Fire if the quiet period has elapsed. Disarms on fire.
    pub fn poll(&self, arena: &mut Disposables, now: Instant) -> bool {
        arena.fire(self.timer, now)
    }

    /// Configured quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebind() -> Debouncer {
        Debouncer::new(TimerKind::Rebind, Duration::from_millis(200))
    }

    #[test]
    fn fires_once_after_quiet_period() {
        let d = rebind();
        let mut arena = Disposables::new();
        let t0 = Instant::now();
        d.arm(&mut arena, t0);
        assert!(!d.poll(&mut arena, t0 + Duration::from_millis(199)));
        assert!(d.poll(&mut arena, t0 + Duration::from_millis(200)));
        assert!(!d.poll(&mut arena, t0 + Duration::from_millis(400)));
    }

    #[test]
    fn rearming_pushes_deadline_back() {
        let d = rebind();
        let mut arena = Disposables::new();
        let t0 = Instant::now();
        d.arm(&mut arena, t0);
        d.arm(&mut arena, t0 + Duration::from_millis(150));
        assert_eq!(arena.timers(), 1);
        assert!(!d.poll(&mut arena, t0 + Duration::from_millis(250)));
        assert!(d.poll(&mut arena, t0 + Duration::from_millis(350)));
    }

    #[test]
    fn releasing_the_arena_prevents_fire() {
        let d = rebind();
        let mut arena = Disposables::new();
        let t0 = Instant::now();
        d.arm(&mut arena, t0);
        let _ = arena.release_all();
        assert!(!d.is_armed(&arena));
        assert!(!d.poll(&mut arena, t0 + Duration::from_secs(1)));
    }
}
