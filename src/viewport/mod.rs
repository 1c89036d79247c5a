//! Viewport classification: device class and motion preference.
//!
//! A single [`ViewportClassifier`] owns the breakpoint table and hands out
//! [`ViewportSnapshot`]s to every consumer, so no section repeats its own
//! media-query checks. Class reads are synchronous; the owner debounces
//! re-binding after a resize through [`Debouncer`].

pub mod debounce;

pub use debounce::Debouncer;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Device class derived from the viewport width.
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
pub enum ViewportClass {
    /// Up to the mobile breakpoint (≤767px by default).
    Mobile,
    /// Between the breakpoints (768–1023px by default).
    Tablet,
    /// At or above 1024px by default.
    Desktop,
}

impl ViewportClass {
    /// All classes, narrowest first.
    pub const ALL: [Self; 3] = [Self::Mobile, Self::Tablet, Self::Desktop];

    /// Whether this class is below the tablet breakpoint.
    #[must_use]
    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }

    /// Lowercase label, matching the TOML keys.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

/// The OS/browser reduced-motion accessibility signal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MotionPreference {
    /// No preference expressed; full motion.
    #[default]
    NoPreference,
    /// `prefers-reduced-motion: reduce`.
    Reduce,
}

impl MotionPreference {
    /// Build from the boolean `reducedMotion` flag.
    #[must_use]
    pub fn from_reduced(reduced: bool) -> Self {
        if reduced {
            Self::Reduce
        } else {
            Self::NoPreference
        }
    }

    /// Whether motion should be skipped entirely.
    #[must_use]
    pub fn is_reduced(self) -> bool {
        self == Self::Reduce
    }
}

/// Width breakpoints, inclusive upper bounds in CSS pixels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct Breakpoints {
    /// Widest viewport still classified as mobile.
    pub mobile_max: u32,
    /// Widest viewport still classified as tablet.
    pub tablet_max: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile_max: 767,
            tablet_max: 1023,
        }
    }
}

impl Breakpoints {
    /// Classify a viewport width.
    #[must_use]
    pub fn classify(&self, width: f32) -> ViewportClass {
        if width <= self.mobile_max as f32 {
            ViewportClass::Mobile
        } else if width <= self.tablet_max as f32 {
            ViewportClass::Tablet
        } else {
            ViewportClass::Desktop
        }
    }
}

/// Immutable view of the viewport handed to consumers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    /// Viewport width in CSS pixels.
    pub width: f32,
    /// Viewport height in CSS pixels.
    pub height: f32,
    /// Device class for `width`.
    pub class: ViewportClass,
    /// Reduced-motion preference.
    pub motion: MotionPreference,
}

impl ViewportSnapshot {
    /// Whether all motion is bypassed.
    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.motion.is_reduced()
    }
}

/// Raw viewport signals delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportChange {
    /// Window resized.
    Resize {
        /// New width in CSS pixels.
        width: f32,
        /// New height in CSS pixels.
        height: f32,
    },
    /// Device orientation flipped; reports the new dimensions.
    OrientationChange {
        /// New width in CSS pixels.
        width: f32,
        /// New height in CSS pixels.
        height: f32,
    },
    /// The reduced-motion media query changed.
    ReducedMotion(bool),
}

/// What a [`ViewportChange`] did to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportUpdate {
    /// The device class flipped.
    pub class_changed: bool,
    /// The reduced-motion preference flipped.
    pub motion_changed: bool,
    /// Width or height changed; bindings should be rebuilt once resizing
    /// settles.
    pub geometry_changed: bool,
}

/// Shared device-class and motion-preference source.
#[derive(Debug, Clone)]
pub struct ViewportClassifier {
    breakpoints: Breakpoints,
    snapshot: ViewportSnapshot,
}

impl ViewportClassifier {
    /// Classify the initial viewport synchronously.
    #[must_use]
    pub fn new(
        breakpoints: Breakpoints,
        width: f32,
        height: f32,
        reduced_motion: bool,
    ) -> Self {
        Self {
            breakpoints,
            snapshot: ViewportSnapshot {
                width,
                height,
                class: breakpoints.classify(width),
                motion: MotionPreference::from_reduced(reduced_motion),
            },
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ViewportSnapshot {
        self.snapshot
    }

    /// Current device class.
    #[must_use]
    pub fn class(&self) -> ViewportClass {
        self.snapshot.class
    }

    /// Current motion preference.
    #[must_use]
    pub fn motion(&self) -> MotionPreference {
        self.snapshot.motion
    }

    /// Apply a raw signal. The snapshot updates immediately.
    pub fn handle(&mut self, change: ViewportChange) -> ViewportUpdate {
        match change {
            ViewportChange::Resize { width, height }
            | ViewportChange::OrientationChange { width, height } => {
                let class = self.breakpoints.classify(width);
                let class_changed = class != self.snapshot.class;
                self.snapshot.width = width;
                self.snapshot.height = height;
                self.snapshot.class = class;
                if class_changed {
                    log::debug!("viewport class -> {}", class.label());
                }
                ViewportUpdate {
                    class_changed,
                    motion_changed: false,
                    geometry_changed: true,
                }
            }
            ViewportChange::ReducedMotion(reduced) => {
                let motion = MotionPreference::from_reduced(reduced);
                let motion_changed = motion != self.snapshot.motion;
                self.snapshot.motion = motion;
                ViewportUpdate {
                    motion_changed,
                    ..ViewportUpdate::default()
                }
            }
        }
    }
}
