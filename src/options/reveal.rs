use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::finite_in;
use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Reveal", inline)]
#[serde(default)]
/// Timing for heading/text reveals and the highlight wipe.
pub struct RevealOptions {
    /// Viewport fraction the section top must reach to trigger (0.85 =
    /// 85% down the viewport).
    #[schemars(range(min = 0.0, max = 1.0))]
    pub trigger_viewport: f32,
    /// Delay between consecutive keywords' wipes (ms).
    pub keyword_stagger_ms: u64,
    /// Duration of one highlight bar wipe (ms).
    pub wipe_duration_ms: u64,
    /// Fraction of the wipe that elapses before the text color starts
    /// changing.
    #[schemars(range(min = 0.0, max = 1.0))]
    pub color_lag: f32,
    /// Duration of the text color change (ms).
    pub color_duration_ms: u64,
    /// Delay between consecutive content blocks (ms).
    pub block_stagger_ms: u64,
    /// Duration of a block fade/rise (ms).
    pub block_duration_ms: u64,
    /// Distance (px) a block rises while fading in.
    pub rise_px: f32,
    /// Easing of the wipe bar.
    #[schemars(skip)]
    pub wipe_easing: EasingFunction,
    /// Easing of block fades and rises.
    #[schemars(skip)]
    pub block_easing: EasingFunction,
    /// Keyword text color before the wipe.
    pub text_color: String,
    /// Keyword text color after the wipe.
    pub highlight_text_color: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            trigger_viewport: 0.85,
            keyword_stagger_ms: 250,
            wipe_duration_ms: 600,
            color_lag: 0.4,
            color_duration_ms: 350,
            block_stagger_ms: 120,
            block_duration_ms: 700,
            rise_px: 32.0,
            wipe_easing: EasingFunction::QuarticOut,
            block_easing: EasingFunction::CubicOut,
            text_color: "#1a1a1a".to_owned(),
            highlight_text_color: "#ffffff".to_owned(),
        }
    }
}

impl RevealOptions {
    pub(super) fn sanitize(&mut self) {
        let d = Self::default();
        self.trigger_viewport =
            finite_in(self.trigger_viewport, 0.0, 1.0, d.trigger_viewport);
        self.color_lag = finite_in(self.color_lag, 0.0, 1.0, d.color_lag);
        self.rise_px = finite_in(self.rise_px, -500.0, 500.0, d.rise_px);
    }
}
