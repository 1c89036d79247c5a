//! Builds a section's scroll bindings from its configuration row.

use super::{Edge, ScrollBinding, ScrollRegion, Scrub, Track};
use crate::layer::{LayerKind, LayerSet};
use crate::options::SectionConfig;
use crate::transform::Property;
use crate::util::easing::EasingFunction;

/// Title reveal runs while the section top travels from 90% to 50% of the
/// viewport.
pub const TITLE_REGION: ScrollRegion =
    ScrollRegion::new(Edge::new(0.0, 0.9), Edge::new(0.0, 0.5));

/// Starting scale of the bucket before it grows in.
pub const BUCKET_START_SCALE: f32 = 0.8;

/// Turns a [`SectionConfig`] row into concrete [`ScrollBinding`]s.
#[derive(Debug, Clone, Copy)]
pub struct ParallaxMapper<'a> {
    config: &'a SectionConfig,
    viewport_height: f32,
}

impl<'a> ParallaxMapper<'a> {
    /// Mapper for one row at the current viewport height.
    #[must_use]
    pub fn new(config: &'a SectionConfig, viewport_height: f32) -> Self {
        Self {
            config,
            viewport_height,
        }
    }

    /// Bindings for every present layer. Missing layers are skipped; with
    /// `split_layers` off, background and foreground stay static.
    #[must_use]
    pub fn bindings<N>(&self, layers: &LayerSet<N>) -> Vec<ScrollBinding> {
        let mut out = Vec::with_capacity(4);
        if self.config.split_layers {
            if layers.is_present(LayerKind::Background) {
                out.push(self.depth_layer(
                    LayerKind::Background,
                    self.config.background_speed,
                ));
            }
            if layers.is_present(LayerKind::Foreground) {
                out.push(self.depth_layer(
                    LayerKind::Foreground,
                    self.config.foreground_speed,
                ));
            }
        }
        if layers.is_present(LayerKind::Bucket) {
            out.push(self.bucket());
        }
        if layers.is_present(LayerKind::Title) {
            out.push(self.title());
        }
        out
    }

    fn scrub(&self) -> Scrub {
        Scrub::new(self.config.scrub_factor)
    }

    fn depth_layer(&self, kind: LayerKind, speed: f32) -> ScrollBinding {
        ScrollBinding::new(
            kind,
            ScrollRegion::ENTER_TO_EXIT,
            vec![Track::new(
                Property::TranslateY,
                0.0,
                speed * self.viewport_height,
            )],
            self.scrub(),
        )
    }

    /// Descends across the whole region and fades/grows in over the
    /// leading `bucket_fade_span` of it.
    fn bucket(&self) -> ScrollBinding {
        let start = self.config.bucket_start_offset;
        let span = self.config.bucket_fade_span;
        ScrollBinding::new(
            LayerKind::Bucket,
            ScrollRegion::ENTER_TO_EXIT,
            vec![
                Track::new(
                    Property::TranslateY,
                    start,
                    start + self.config.bucket_speed * self.viewport_height,
                ),
                Track::new(Property::Opacity, 0.0, 1.0).within(0.0, span),
                Track::new(Property::Scale, BUCKET_START_SCALE, 1.0)
                    .within(0.0, span)
                    .eased(EasingFunction::QuadraticOut),
            ],
            self.scrub(),
        )
    }

    fn title(&self) -> ScrollBinding {
        ScrollBinding::new(
            LayerKind::Title,
            TITLE_REGION,
            vec![
                Track::new(Property::Opacity, 0.0, 1.0),
                Track::new(Property::TranslateY, self.config.title_rise, 0.0)
                    .eased(EasingFunction::CubicOut),
            ],
            self.scrub(),
        )
        .once()
    }
}
