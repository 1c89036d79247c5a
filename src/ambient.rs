//! Ambient swing applied to decorative layers.
//!
//! The swing runs on its own clock, independent of scroll position, and
//! only writes the ambient rotation channel of a layer.

use web_time::Duration;

use crate::util::easing::EasingFunction;

/// Endless back-and-forth rotation between `-angle` and `+angle`.
///
/// One leg (extreme to extreme) takes `leg`; the curve is sine in-out so
/// the motion slows at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swing {
    angle: f32,
    leg: Duration,
    elapsed: Duration,
    running: bool,
}

impl Swing {
    /// Swing of `angle` degrees, `leg_secs` per leg. A leg that is not a
    /// finite non-negative duration gives a level, stopped swing.
    #[must_use]
    pub fn new(angle: f32, leg_secs: f32) -> Self {
        let Ok(leg) = Duration::try_from_secs_f32(leg_secs) else {
            log::warn!("swing leg {leg_secs}s is not a duration; swing stopped");
            return Self::stopped();
        };
        let angle = if angle.is_finite() { angle.abs() } else { 0.0 };
        Self {
            angle,
            leg,
            elapsed: Duration::ZERO,
            running: !leg.is_zero(),
        }
    }

    /// A swing that never moves (reduced motion).
    #[must_use]
    pub fn stopped() -> Self {
        Self {
            angle: 0.0,
            leg: Duration::ZERO,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Peak angle in degrees.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Full period (there and back).
    #[must_use]
    pub fn period(&self) -> Duration {
        self.leg * 2
    }

    /// Whether the swing is advancing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt` and return the rotation in degrees.
    pub fn tick(&mut self, dt: Duration) -> f32 {
        if self.running {
            let period = self.period();
            self.elapsed = if period.is_zero() {
                Duration::ZERO
            } else {
                let nanos = (self.elapsed + dt).as_nanos() % period.as_nanos();
                Duration::from_nanos(nanos as u64)
            };
        }
        self.rotation()
    }

    /// Rotation at the current phase, in degrees.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        if self.leg.is_zero() {
            return 0.0;
        }
        let leg = self.leg.as_secs_f32();
        let phase = self.elapsed.as_secs_f32() / leg;
        // First leg goes -angle → +angle, second comes back.
        let t = if phase <= 1.0 { phase } else { 2.0 - phase };
        -self.angle + 2.0 * self.angle * EasingFunction::SineInOut.evaluate(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_negative_extreme_and_reaches_positive() {
        let mut swing = Swing::new(4.0, 2.0);
        assert!((swing.rotation() + 4.0).abs() < 1e-5);
        let r = swing.tick(Duration::from_secs(1));
        assert!(r.abs() < 1e-4, "midpoint should be level, got {r}");
        let r = swing.tick(Duration::from_secs(1));
        assert!((r - 4.0).abs() < 1e-4);
    }

    #[test]
    fn loops_indefinitely() {
        let mut swing = Swing::new(3.0, 1.5);
        let start = swing.rotation();
        let r = swing.tick(swing.period() * 7);
        assert!((r - start).abs() < 1e-4);
    }

    #[test]
    fn stays_within_amplitude() {
        let mut swing = Swing::new(5.0, 0.7);
        for _ in 0..500 {
            let r = swing.tick(Duration::from_millis(13));
            assert!(r.abs() <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn stopped_swing_is_level() {
        let mut swing = Swing::stopped();
        assert_eq!(swing.tick(Duration::from_secs(3)), 0.0);
        assert!(!swing.is_running());
    }

    #[test]
    fn unrepresentable_leg_gives_stopped_swing() {
        for leg in [f32::INFINITY, f32::NAN, -1.0, f32::MAX] {
            let mut swing = Swing::new(4.0, leg);
            assert!(!swing.is_running());
            assert_eq!(swing.tick(Duration::from_secs(1)), 0.0);
        }
    }
}
