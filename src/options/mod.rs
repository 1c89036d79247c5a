//! Centralized motion options with TOML preset support.
//!
//! All tweakable settings (breakpoints, per-section parallax rows, reveal
//! timing, carousel and marquee behavior, pointer parallax) are consolidated
//! here. Options serialize to/from TOML for motion presets.

mod interaction;
mod reveal;
mod section;

use std::path::Path;

pub use interaction::{
    CarouselOptions, MarqueeOptions, PointerOptions, ResumePolicy,
};
pub use reveal::RevealOptions;
use schemars::JsonSchema;
pub use section::{SectionConfig, SectionId, SectionProfile, SectionTable};
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::MotionError;
use crate::viewport::Breakpoints;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Viewport", inline)]
#[serde(default)]
/// Device classification and re-binding.
pub struct ViewportOptions {
    /// Width breakpoints.
    pub breakpoints: Breakpoints,
    /// Quiet period after the last resize before bindings are rebuilt (ms).
    #[schemars(range(min = 50, max = 1000))]
    pub rebind_debounce_ms: u64,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            rebind_debounce_ms: 200,
        }
    }
}

impl ViewportOptions {
    /// Debounce as a `Duration`.
    #[must_use]
    pub fn rebind_debounce(&self) -> Duration {
        Duration::from_millis(self.rebind_debounce_ms)
    }
}

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[carousel]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Breakpoints and resize handling.
    pub viewport: ViewportOptions,
    /// Per-section, per-class parallax rows.
    pub sections: SectionTable,
    /// Reveal sequencer timing.
    pub reveal: RevealOptions,
    /// Testimonial carousel.
    pub carousel: CarouselOptions,
    /// Logo marquee.
    pub marquee: MarqueeOptions,
    /// Hero pointer parallax.
    pub pointer: PointerOptions,
}

impl Options {
    /// Generate JSON Schema describing the tunable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults; the
    /// result is [sanitized](Self::sanitize).
    pub fn from_toml(content: &str) -> Result<Self, MotionError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| MotionError::OptionsParse(e.to_string()))?;
        options.sanitize();
        Ok(options)
    }

    /// Clamp every numeric option to its documented range. Non-finite
    /// values (TOML accepts `inf` and `nan`) fall back to the defaults.
    pub fn sanitize(&mut self) {
        let vp = &mut self.viewport;
        vp.rebind_debounce_ms = vp.rebind_debounce_ms.clamp(50, 1000);
        self.sections.sanitize();
        self.reveal.sanitize();
        self.carousel.sanitize();
        self.marquee.sanitize();
        self.pointer.sanitize();
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, MotionError> {
        let content = std::fs::read_to_string(path).map_err(MotionError::Io)?;
        let options = Self::from_toml(&content)?;
        log::info!("loaded motion preset {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), MotionError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MotionError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MotionError::Io)?;
        }
        std::fs::write(path, content).map_err(MotionError::Io)?;
        log::info!("saved motion preset {}", path.display());
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

/// `value` clamped to `[min, max]`, or `fallback` when not finite.
fn finite_in(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewportClass;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[carousel]
autoplay_interval_ms = 8000

[sections.discover.mobile]
bucket_speed = 0.3
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.carousel.autoplay_interval_ms, 8000);
        assert_eq!(opts.carousel.swipe_threshold_px, 48.0);
        let row = opts.sections.lookup(SectionId::Discover, ViewportClass::Mobile);
        assert_eq!(row.bucket_speed, 0.3);
        assert!(!row.split_layers);
        assert_eq!(opts.viewport.breakpoints.mobile_max, 767);
    }

    #[test]
    fn non_finite_preset_values_are_sanitized() {
        let toml_str = r"
[sections.discover.desktop]
swing_duration = inf

[reveal]
color_lag = nan

[marquee]
speed_px_per_s = -inf
";
        let opts = Options::from_toml(toml_str).unwrap();
        let defaults = Options::default();
        let row = opts.sections.lookup(SectionId::Discover, ViewportClass::Desktop);
        assert_eq!(
            row.swing_duration,
            defaults
                .sections
                .lookup(SectionId::Discover, ViewportClass::Desktop)
                .swing_duration
        );
        assert_eq!(opts.reveal.color_lag, defaults.reveal.color_lag);
        assert_eq!(opts.marquee.speed_px_per_s, defaults.marquee.speed_px_per_s);
    }

    #[test]
    fn invalid_toml_is_an_options_error() {
        let err = Options::from_toml("[carousel]\nvisible_slots = \"three\"")
            .unwrap_err();
        assert!(matches!(err, MotionError::OptionsParse(_)));
    }

    #[test]
    fn mobile_rows_disable_layer_split() {
        let table = SectionTable::default();
        for section in SectionId::ALL {
            assert!(!table.lookup(section, ViewportClass::Mobile).split_layers);
            assert!(table.lookup(section, ViewportClass::Desktop).split_layers);
        }
    }

    #[test]
    fn desktop_swings_wider_and_faster_than_mobile() {
        let table = SectionTable::default();
        for section in SectionId::ALL {
            let d = table.lookup(section, ViewportClass::Desktop);
            let m = table.lookup(section, ViewportClass::Mobile);
            assert!(d.swing_angle > m.swing_angle);
            assert!(d.swing_duration < m.swing_duration);
        }
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("folio-motion-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.marquee.speed_px_per_s = 64.0;
        opts.save(&dir.join("fast.toml")).unwrap();
        Options::default().save(&dir.join("calm.toml")).unwrap();

        let loaded = Options::load(&dir.join("fast.toml")).unwrap();
        assert_eq!(loaded.marquee.speed_px_per_s, 64.0);
        assert_eq!(Options::list_presets(&dir), vec!["calm", "fast"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("viewport"));
        assert!(props.contains_key("sections"));
        assert!(props.contains_key("reveal"));
        assert!(props.contains_key("carousel"));
        assert!(props.contains_key("marquee"));

        let reveal = &props["reveal"]["properties"];
        assert!(reveal.get("keyword_stagger_ms").is_some());
        assert!(reveal.get("wipe_easing").is_none());
    }
}
