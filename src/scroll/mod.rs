//! Scroll-to-transform mapping.
//!
//! A [`ScrollBinding`] ties one layer to a [`ScrollRegion`] of the page and
//! maps the region's progress in `[0, 1]` to layer properties through a set
//! of [`Track`]s. [`mapper::ParallaxMapper`] builds the bindings for a
//! section from its [`SectionConfig`](crate::options::SectionConfig) row.

pub mod mapper;

use crate::layer::LayerKind;
use crate::transform::{Property, Transform};
use crate::util::easing::EasingFunction;

/// Page scroll position and viewport height, shared read-only by every
/// binding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Document scroll offset (px).
    pub y: f32,
    /// Viewport height (px).
    pub viewport_height: f32,
}

/// A section's bounding box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionRect {
    /// Document offset of the section's top edge (px).
    pub top: f32,
    /// Section height (px).
    pub height: f32,
}

/// One boundary of a scroll region: the point `element` (fraction of the
/// section height from its top) meets the point `viewport` (fraction of the
/// viewport height from its top).
///
/// "top 85%" is `Edge { element: 0.0, viewport: 0.85 }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Fraction of the section height.
    pub element: f32,
    /// Fraction of the viewport height.
    pub viewport: f32,
}

impl Edge {
    /// Build an edge.
    #[must_use]
    pub const fn new(element: f32, viewport: f32) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which this edge is crossed.
    #[must_use]
    pub fn scroll_offset(&self, rect: SectionRect, viewport_height: f32) -> f32 {
        rect.top + self.element * rect.height - self.viewport * viewport_height
    }
}

/// The span of scroll positions over which a binding progresses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRegion {
    /// Where progress is 0.
    pub start: Edge,
    /// Where progress is 1.
    pub end: Edge,
}

impl ScrollRegion {
    /// From the section's top entering the bottom of the viewport to its
    /// bottom leaving the top.
    pub const ENTER_TO_EXIT: Self = Self {
        start: Edge::new(0.0, 1.0),
        end: Edge::new(1.0, 0.0),
    };

    /// Build a region.
    #[must_use]
    pub const fn new(start: Edge, end: Edge) -> Self {
        Self { start, end }
    }

    /// Progress of `scroll` through this region for a section at `rect`,
    /// clamped to `[0, 1]`. A zero-length region is a step at its start.
    #[must_use]
    pub fn progress(&self, rect: SectionRect, scroll: ScrollState) -> f32 {
        let start = self.start.scroll_offset(rect, scroll.viewport_height);
        let end = self.end.scroll_offset(rect, scroll.viewport_height);
        let span = end - start;
        if span.abs() < f32::EPSILON {
            return if scroll.y >= start { 1.0 } else { 0.0 };
        }
        ((scroll.y - start) / span).clamp(0.0, 1.0)
    }
}

/// Interpolates one property over a sub-range of region progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Property written.
    pub property: Property,
    /// Value at the start of the sub-range (and before it).
    pub from: f32,
    /// Value at the end of the sub-range (and after it).
    pub to: f32,
    /// Sub-range of region progress, `0.0 <= start < end <= 1.0`.
    pub span: (f32, f32),
    /// Curve applied within the sub-range.
    pub easing: EasingFunction,
}

impl Track {
    /// A linear track over the whole region.
    #[must_use]
    pub fn new(property: Property, from: f32, to: f32) -> Self {
        Self {
            property,
            from,
            to,
            span: (0.0, 1.0),
            easing: EasingFunction::Linear,
        }
    }

    /// Restrict the track to a sub-range of the region.
    #[must_use]
    pub fn within(mut self, start: f32, end: f32) -> Self {
        let start = start.clamp(0.0, 1.0);
        self.span = (start, end.clamp(start, 1.0));
        self
    }

    /// Use a curve within the sub-range.
    #[must_use]
    pub fn eased(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Value at region progress `p`.
    #[must_use]
    pub fn value_at(&self, p: f32) -> f32 {
        let (a, b) = self.span;
        let local = if b - a <= f32::EPSILON {
            if p >= b {
                1.0
            } else {
                0.0
            }
        } else {
            ((p - a) / (b - a)).clamp(0.0, 1.0)
        };
        self.from + (self.to - self.from) * self.easing.evaluate(local)
    }
}

/// Natural-layout value a property settles to when motion is skipped.
#[must_use]
pub fn resting_value(property: Property) -> f32 {
    match property {
        Property::TranslateX | Property::TranslateY | Property::Rotation => 0.0,
        Property::ScaleX
        | Property::ScaleY
        | Property::Scale
        | Property::Opacity
        | Property::ColorMix => 1.0,
    }
}

/// Smooths progress so the value trails the scrollbar.
///
/// `factor` is roughly the number of seconds the value takes to catch up;
/// zero follows the scroll position exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrub {
    factor: f32,
    current: Option<f32>,
}

impl Scrub {
    /// Scrub with the given catch-up time in seconds.
    #[must_use]
    pub fn new(factor: f32) -> Self {
        Self {
            factor: factor.max(0.0),
            current: None,
        }
    }

    /// Move toward `target` over `dt_secs` and return the smoothed value.
    /// The first sample jumps straight to the target.
    pub fn follow(&mut self, target: f32, dt_secs: f32) -> f32 {
        let next = match self.current {
            Some(current) if self.factor > 0.0 => {
                let alpha = 1.0 - (-dt_secs.max(0.0) / self.factor).exp();
                let value = current + (target - current) * alpha;
                if (target - value).abs() < 1e-4 {
                    target
                } else {
                    value
                }
            }
            _ => target,
        };
        self.current = Some(next);
        next
    }

    /// Whether the smoothed value still trails `target`.
    #[must_use]
    pub fn is_settling(&self, target: f32) -> bool {
        self.current.is_some_and(|c| (c - target).abs() >= 1e-4)
    }

    /// Catch-up time in seconds.
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }
}

/// Active association between a layer, a region and its tracks.
#[derive(Debug, Clone)]
pub struct ScrollBinding {
    layer: LayerKind,
    region: ScrollRegion,
    tracks: Vec<Track>,
    scrub: Scrub,
    once: bool,
    latched: bool,
    progress: f32,
}

impl ScrollBinding {
    /// Bind `layer` to `region` with the given tracks.
    #[must_use]
    pub fn new(
        layer: LayerKind,
        region: ScrollRegion,
        tracks: Vec<Track>,
        scrub: Scrub,
    ) -> Self {
        Self {
            layer,
            region,
            tracks,
            scrub,
            once: false,
            latched: false,
            progress: 0.0,
        }
    }

    /// Stop following the scroll once progress first reaches 1.
    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Layer driven by this binding.
    #[must_use]
    pub fn layer(&self) -> LayerKind {
        self.layer
    }

    /// Region this binding follows.
    #[must_use]
    pub fn region(&self) -> ScrollRegion {
        self.region
    }

    /// Tracks of this binding.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Whether any track writes `property`.
    #[must_use]
    pub fn drives(&self, property: Property) -> bool {
        self.tracks.iter().any(|t| t.property == property)
    }

    /// Smoothed progress from the last update.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether a single-shot binding has completed.
    #[must_use]
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Whether the scrub is still catching up with the last scroll target.
    #[must_use]
    pub fn is_settling(&self, rect: SectionRect, scroll: ScrollState) -> bool {
        !self.latched && self.scrub.is_settling(self.region.progress(rect, scroll))
    }

    /// Advance against the current scroll position and write the tracks
    /// into `out`.
    pub fn update(
        &mut self,
        rect: SectionRect,
        scroll: ScrollState,
        dt_secs: f32,
        out: &mut Transform,
    ) {
        if !self.latched {
            let target = self.region.progress(rect, scroll);
            self.progress = self.scrub.follow(target, dt_secs);
            if self.once && self.progress >= 1.0 {
                self.latched = true;
            }
        }
        self.write(self.progress, out);
    }

    /// Write the tracks at an explicit progress.
    pub fn write(&self, progress: f32, out: &mut Transform) {
        for track in &self.tracks {
            out.set(track.property, track.value_at(progress));
        }
    }

    /// Write every track's natural-layout value.
    pub fn write_resting(&self, out: &mut Transform) {
        for track in &self.tracks {
            out.set(track.property, resting_value(track.property));
        }
    }
}
