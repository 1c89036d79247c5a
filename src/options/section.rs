//! Per-section parallax rows.
//!
//! Preset rows are partial: a field left out of `[sections.<id>.<class>]`
//! keeps the built-in value for that exact section and class, including
//! the per-section swing and bucket scaling.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::finite_in;
use crate::viewport::ViewportClass;

/// Page sections that carry the layered parallax treatment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    /// Landing hero.
    Hero,
    /// "Discover" band.
    Discover,
    /// "Design" band.
    Design,
    /// "Deliver" band.
    Deliver,
    /// Site footer.
    Footer,
}

impl SectionId {
    /// All sections in page order.
    pub const ALL: [Self; 5] = [
        Self::Hero,
        Self::Discover,
        Self::Design,
        Self::Deliver,
        Self::Footer,
    ];

    /// Lowercase label, matching the TOML keys.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Discover => "discover",
            Self::Design => "design",
            Self::Deliver => "deliver",
            Self::Footer => "footer",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
#[schemars(title = "Section", inline)]
#[serde(default)]
/// Parallax parameters for one section at one device class.
pub struct SectionConfig {
    /// Background travel as a fraction of viewport height over the region.
    pub background_speed: f32,
    /// Foreground travel as a fraction of viewport height over the region.
    pub foreground_speed: f32,
    /// Bucket descent as a fraction of viewport height over the region.
    pub bucket_speed: f32,
    /// Bucket vertical offset (px) at the start of the region.
    pub bucket_start_offset: f32,
    /// Seconds the scrubbed value takes to catch up with the scroll
    /// position. Zero follows the scrollbar exactly.
    #[schemars(range(min = 0.0, max = 3.0), extend("step" = 0.1))]
    pub scrub_factor: f32,
    /// Peak ambient swing in degrees.
    #[schemars(range(min = 0.0, max = 20.0), extend("step" = 0.5))]
    pub swing_angle: f32,
    /// Seconds for one swing from one extreme to the other.
    #[schemars(range(min = 0.2, max = 10.0), extend("step" = 0.1))]
    pub swing_duration: f32,
    /// Whether background and foreground move independently. When false
    /// the section renders one static composited image.
    pub split_layers: bool,
    /// Fraction of the region over which the bucket fades and scales in.
    #[schemars(range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub bucket_fade_span: f32,
    /// Distance (px) the title rises while it fades in.
    pub title_rise: f32,
}

impl SectionConfig {
    fn desktop() -> Self {
        Self {
            background_speed: -0.15,
            foreground_speed: 0.1,
            bucket_speed: 0.35,
            bucket_start_offset: -120.0,
            scrub_factor: 1.0,
            swing_angle: 4.0,
            swing_duration: 2.4,
            split_layers: true,
            bucket_fade_span: 0.4,
            title_rise: 40.0,
        }
    }

    fn tablet() -> Self {
        Self {
            background_speed: -0.1,
            foreground_speed: 0.06,
            bucket_speed: 0.25,
            bucket_start_offset: -80.0,
            scrub_factor: 0.8,
            swing_angle: 3.0,
            swing_duration: 2.8,
            title_rise: 32.0,
            ..Self::desktop()
        }
    }

    fn mobile() -> Self {
        Self {
            background_speed: 0.0,
            foreground_speed: 0.0,
            bucket_speed: 0.15,
            bucket_start_offset: -40.0,
            scrub_factor: 0.5,
            swing_angle: 2.0,
            swing_duration: 3.2,
            split_layers: false,
            bucket_fade_span: 0.4,
            title_rise: 24.0,
        }
    }
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

impl SectionConfig {
    /// Replace non-finite values with this row's fallback and clamp to the
    /// documented ranges.
    pub(super) fn sanitize(&mut self, fallback: &Self) {
        let speed = |v: f32, f: f32| finite_in(v, -2.0, 2.0, f);
        self.background_speed =
            speed(self.background_speed, fallback.background_speed);
        self.foreground_speed =
            speed(self.foreground_speed, fallback.foreground_speed);
        self.bucket_speed = speed(self.bucket_speed, fallback.bucket_speed);
        self.bucket_start_offset = finite_in(
            self.bucket_start_offset,
            -2000.0,
            2000.0,
            fallback.bucket_start_offset,
        );
        self.scrub_factor =
            finite_in(self.scrub_factor, 0.0, 3.0, fallback.scrub_factor);
        self.swing_angle =
            finite_in(self.swing_angle, 0.0, 20.0, fallback.swing_angle);
        self.swing_duration =
            finite_in(self.swing_duration, 0.2, 10.0, fallback.swing_duration);
        self.bucket_fade_span = finite_in(
            self.bucket_fade_span,
            0.05,
            1.0,
            fallback.bucket_fade_span,
        );
        self.title_rise =
            finite_in(self.title_rise, -500.0, 500.0, fallback.title_rise);
    }
}

/// Overlay one optional field per present value.
macro_rules! overlay {
    ($patch:expr, $row:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $row.$field = value;
            }
        )+
    };
}

/// A preset row as written in TOML: every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RowPatch {
    background_speed: Option<f32>,
    foreground_speed: Option<f32>,
    bucket_speed: Option<f32>,
    bucket_start_offset: Option<f32>,
    scrub_factor: Option<f32>,
    swing_angle: Option<f32>,
    swing_duration: Option<f32>,
    split_layers: Option<bool>,
    bucket_fade_span: Option<f32>,
    title_rise: Option<f32>,
}

impl RowPatch {
    fn apply(self, row: &mut SectionConfig) {
        overlay!(
            self,
            row,
            background_speed,
            foreground_speed,
            bucket_speed,
            bucket_start_offset,
            scrub_factor,
            swing_angle,
            swing_duration,
            split_layers,
            bucket_fade_span,
            title_rise,
        );
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfilePatch {
    mobile: Option<RowPatch>,
    tablet: Option<RowPatch>,
    desktop: Option<RowPatch>,
}

impl ProfilePatch {
    fn apply(self, profile: &mut SectionProfile) {
        for (patch, row) in [
            (self.mobile, &mut profile.mobile),
            (self.tablet, &mut profile.tablet),
            (self.desktop, &mut profile.desktop),
        ] {
            if let Some(patch) = patch {
                patch.apply(row);
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TablePatch {
    hero: Option<ProfilePatch>,
    discover: Option<ProfilePatch>,
    design: Option<ProfilePatch>,
    deliver: Option<ProfilePatch>,
    footer: Option<ProfilePatch>,
}

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
#[schemars(inline)]
#[serde(default)]
/// One [`SectionConfig`] row per device class.
pub struct SectionProfile {
    /// Row used below the tablet breakpoint.
    pub mobile: SectionConfig,
    /// Row used between the breakpoints.
    pub tablet: SectionConfig,
    /// Row used at and above the desktop breakpoint.
    pub desktop: SectionConfig,
}

impl SectionProfile {
    /// Row for a device class.
    #[must_use]
    pub fn row(&self, class: ViewportClass) -> &SectionConfig {
        match class {
            ViewportClass::Mobile => &self.mobile,
            ViewportClass::Tablet => &self.tablet,
            ViewportClass::Desktop => &self.desktop,
        }
    }

    /// Scale every row's swing amplitude and period.
    fn with_swing(mut self, angle_scale: f32, duration_scale: f32) -> Self {
        for row in [&mut self.mobile, &mut self.tablet, &mut self.desktop] {
            row.swing_angle *= angle_scale;
            row.swing_duration *= duration_scale;
        }
        self
    }

    fn with_bucket_speed_scale(mut self, scale: f32) -> Self {
        for row in [&mut self.mobile, &mut self.tablet, &mut self.desktop] {
            row.bucket_speed *= scale;
        }
        self
    }

    fn sanitize(&mut self, fallback: &Self) {
        self.mobile.sanitize(&fallback.mobile);
        self.tablet.sanitize(&fallback.tablet);
        self.desktop.sanitize(&fallback.desktop);
    }
}

impl<'de> Deserialize<'de> for SectionProfile {
    /// Missing rows and fields keep their per-class defaults.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut profile = Self::default();
        ProfilePatch::deserialize(deserializer)?.apply(&mut profile);
        Ok(profile)
    }
}

impl Default for SectionProfile {
    fn default() -> Self {
        Self {
            mobile: SectionConfig::mobile(),
            tablet: SectionConfig::tablet(),
            desktop: SectionConfig::desktop(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
#[schemars(title = "Sections", inline)]
#[serde(default)]
/// Static `(section, device class) → SectionConfig` table.
pub struct SectionTable {
    /// Landing hero.
    pub hero: SectionProfile,
    /// "Discover" band.
    pub discover: SectionProfile,
    /// "Design" band.
    pub design: SectionProfile,
    /// "Deliver" band.
    pub deliver: SectionProfile,
    /// Site footer.
    pub footer: SectionProfile,
}

impl SectionTable {
    /// Profile for a section.
    #[must_use]
    pub fn profile(&self, section: SectionId) -> &SectionProfile {
        match section {
            SectionId::Hero => &self.hero,
            SectionId::Discover => &self.discover,
            SectionId::Design => &self.design,
            SectionId::Deliver => &self.deliver,
            SectionId::Footer => &self.footer,
        }
    }

    /// Row for `(section, class)`.
    #[must_use]
    pub fn lookup(
        &self,
        section: SectionId,
        class: ViewportClass,
    ) -> &SectionConfig {
        self.profile(section).row(class)
    }

    fn profile_mut(&mut self, section: SectionId) -> &mut SectionProfile {
        match section {
            SectionId::Hero => &mut self.hero,
            SectionId::Discover => &mut self.discover,
            SectionId::Design => &mut self.design,
            SectionId::Deliver => &mut self.deliver,
            SectionId::Footer => &mut self.footer,
        }
    }

    /// Replace non-finite values with built-in ones and clamp every row to
    /// its documented ranges.
    pub(super) fn sanitize(&mut self) {
        let defaults = Self::default();
        for section in SectionId::ALL {
            self.profile_mut(section)
                .sanitize(defaults.profile(section));
        }
    }
}

impl<'de> Deserialize<'de> for SectionTable {
    /// Overlays the preset on [`SectionTable::default`], so a partial row
    /// keeps the scaled values of its own section and class.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let patch = TablePatch::deserialize(deserializer)?;
        let mut table = Self::default();
        for (section, profile) in [
            (SectionId::Hero, patch.hero),
            (SectionId::Discover, patch.discover),
            (SectionId::Design, patch.design),
            (SectionId::Deliver, patch.deliver),
            (SectionId::Footer, patch.footer),
        ] {
            if let Some(profile) = profile {
                profile.apply(table.profile_mut(section));
            }
        }
        Ok(table)
    }
}

impl Default for SectionTable {
    fn default() -> Self {
        Self {
            hero: SectionProfile::default().with_bucket_speed_scale(1.4),
            discover: SectionProfile::default(),
            design: SectionProfile::default().with_swing(1.25, 0.9),
            deliver: SectionProfile::default(),
            footer: SectionProfile::default()
                .with_swing(0.75, 1.25)
                .with_bucket_speed_scale(0.6),
        }
    }
}
