use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use super::finite_in;

/// When autoplay resumes after a pointer or keyboard interaction.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema,
)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResumePolicy {
    /// Resume on release.
    Immediate,
    /// Resume once the pointer has been released for `cooldown_ms`.
    After {
        /// Cooldown in milliseconds.
        cooldown_ms: u64,
    },
}

impl ResumePolicy {
    /// Delay before autoplay resumes.
    #[must_use]
    pub fn cooldown(self) -> Duration {
        match self {
            Self::Immediate => Duration::ZERO,
            Self::After { cooldown_ms } => Duration::from_millis(cooldown_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Testimonials", inline)]
#[serde(default)]
/// Testimonial carousel behavior.
pub struct CarouselOptions {
    /// Autoplay step interval in milliseconds.
    #[schemars(range(min = 1000, max = 30000))]
    pub autoplay_interval_ms: u64,
    /// Minimum horizontal drag (px) that counts as a swipe.
    #[schemars(range(min = 4.0, max = 400.0))]
    pub swipe_threshold_px: f32,
    /// Slots rendered fully; more items than this enables peek slides.
    #[schemars(range(min = 1, max = 7))]
    pub visible_slots: usize,
    /// Longest excerpt, in characters, before truncation.
    pub excerpt_max_chars: usize,
    /// Appended to truncated excerpts.
    pub excerpt_suffix: String,
    /// Resume behavior after a drag.
    pub resume: ResumePolicy,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: 6000,
            swipe_threshold_px: 48.0,
            visible_slots: 3,
            excerpt_max_chars: 180,
            excerpt_suffix: "…".to_owned(),
            resume: ResumePolicy::Immediate,
        }
    }
}

impl CarouselOptions {
    /// Autoplay interval as a `Duration`.
    #[must_use]
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    pub(super) fn sanitize(&mut self) {
        let d = Self::default();
        self.autoplay_interval_ms = self.autoplay_interval_ms.clamp(1000, 30_000);
        self.swipe_threshold_px =
            finite_in(self.swipe_threshold_px, 4.0, 400.0, d.swipe_threshold_px);
        self.visible_slots = self.visible_slots.clamp(1, 7);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Logo Marquee", inline)]
#[serde(default)]
/// Logo marquee behavior.
pub struct MarqueeOptions {
    /// Scroll speed in px per second.
    #[schemars(range(min = 0.0, max = 600.0))]
    pub speed_px_per_s: f32,
    /// Minimum horizontal drag (px) that steps the strip by one logo.
    pub swipe_threshold_px: f32,
    /// Copies of the logo set in the track (one real plus clones).
    #[schemars(range(min = 2, max = 5))]
    pub copies: usize,
    /// Largest frame delta (ms) applied in one step.
    pub max_frame_delta_ms: u64,
    /// Resume behavior after a drag.
    pub resume: ResumePolicy,
}

impl Default for MarqueeOptions {
    fn default() -> Self {
        Self {
            speed_px_per_s: 40.0,
            swipe_threshold_px: 50.0,
            copies: 3,
            max_frame_delta_ms: 100,
            resume: ResumePolicy::After { cooldown_ms: 3000 },
        }
    }
}

impl MarqueeOptions {
    pub(super) fn sanitize(&mut self) {
        let d = Self::default();
        self.speed_px_per_s =
            finite_in(self.speed_px_per_s, 0.0, 600.0, d.speed_px_per_s);
        self.swipe_threshold_px =
            finite_in(self.swipe_threshold_px, 1.0, 400.0, d.swipe_threshold_px);
        self.copies = self.copies.clamp(2, 5);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Pointer Parallax", inline)]
#[serde(default)]
/// Hero pointer-follow parallax.
pub struct PointerOptions {
    /// Whether the hero layers follow the pointer.
    pub enabled: bool,
    /// Largest offset (px) at the viewport edge.
    pub strength_px: f32,
    /// Fraction of the remaining distance covered per 60Hz frame.
    #[schemars(range(min = 0.01, max = 1.0))]
    pub follow: f32,
}

impl Default for PointerOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            strength_px: 18.0,
            follow: 0.08,
        }
    }
}

impl PointerOptions {
    pub(super) fn sanitize(&mut self) {
        let d = Self::default();
        self.strength_px = finite_in(self.strength_px, 0.0, 200.0, d.strength_px);
        self.follow = finite_in(self.follow, 0.01, 1.0, d.follow);
    }
}
