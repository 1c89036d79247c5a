//! Per-section animation controller.
//!
//! A [`SectionController`] owns the layer handles of one page section and
//! everything animating them: scroll bindings, the reveal sequencer, the
//! bucket swing and (on the hero) pointer parallax. [`bind`] installs them
//! for the current device class; [`unbind`] releases every one of them
//! through the section's [`Disposables`]. Updates only drive what the arena
//! still holds: a binding needs the scroll listener and its layer's tween,
//! the swing needs the bucket tween and pointer parallax its frame loop.
//!
//! [`bind`]: SectionController::bind
//! [`unbind`]: SectionController::unbind

use glam::Vec2;
use web_time::Duration;

use crate::ambient::Swing;
use crate::dispose::{Disposables, FrameLoop, Resource};
use crate::layer::{ImageGate, LayerKind, LayerSet};
use crate::options::{PointerOptions, RevealOptions, SectionConfig, SectionId};
use crate::reveal::{RevealContent, RevealSequencer, RevealTarget};
use crate::scroll::mapper::ParallaxMapper;
use crate::scroll::{ScrollBinding, ScrollState, SectionRect};
use crate::transform::Transform;
use crate::viewport::ViewportSnapshot;

/// Receives the transforms a controller computes.
///
/// Implemented by the host adapter (DOM styles, a scene graph, or a
/// recording sink in tests).
pub trait TransformSink<N> {
    /// Render `transform` on a layer node.
    fn apply_layer(&mut self, node: &N, transform: &Transform);

    /// Render a reveal target (block, keyword or highlight bar) of a
    /// section. Hosts without reveal markup can ignore it.
    fn apply_reveal(
        &mut self,
        _section: SectionId,
        _target: RevealTarget,
        _transform: &Transform,
    ) {
    }
}

/// Everything [`SectionController::bind`] reads.
#[derive(Debug, Clone, Copy)]
pub struct BindContext<'a> {
    /// Current viewport.
    pub viewport: ViewportSnapshot,
    /// Row for this section at `viewport.class`.
    pub config: &'a SectionConfig,
    /// Reveal timings.
    pub reveal: &'a RevealOptions,
    /// Pointer parallax settings.
    pub pointer: &'a PointerOptions,
    /// Scroll position at bind time.
    pub scroll: ScrollState,
}

/// Binding lifecycle of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    /// Nothing installed.
    Unbound,
    /// `bind` was requested but images are still loading.
    AwaitingImages,
    /// Bindings installed and following the scroll.
    Bound,
    /// Reduced motion: resting values written, nothing installed.
    Static,
}

/// Eases hero layers toward an offset derived from the pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerParallax {
    strength: f32,
    follow: f32,
    target: Vec2,
    current: Vec2,
}

impl PointerParallax {
    /// Parallax of at most `strength` px, covering `follow` of the remaining
    /// distance per 60Hz frame.
    #[must_use]
    pub fn new(strength: f32, follow: f32) -> Self {
        Self {
            strength,
            follow: follow.clamp(0.0, 1.0),
            target: Vec2::ZERO,
            current: Vec2::ZERO,
        }
    }

    /// Aim at a pointer position within a viewport of `size`.
    pub fn aim(&mut self, pointer: Vec2, size: Vec2) {
        let half = size * 0.5;
        if half.x <= 0.0 || half.y <= 0.0 {
            return;
        }
        let normalized = ((pointer - half) / half).clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.target = normalized * self.strength;
    }

    /// Step toward the target. The rate is independent of frame rate.
    pub fn step(&mut self, dt: Duration) -> Vec2 {
        let frames = dt.as_secs_f32() * 60.0;
        let k = 1.0 - (1.0 - self.follow).powf(frames);
        self.current += (self.target - self.current) * k;
        self.current
    }

    /// Current offset.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.current
    }
}

/// Depth multiplier for pointer parallax per layer.
fn pointer_depth(kind: LayerKind) -> f32 {
    match kind {
        LayerKind::Background => -0.5,
        LayerKind::Foreground => 1.0,
        LayerKind::Bucket => 0.6,
        LayerKind::Title => 0.0,
    }
}

/// The animation controller of one section.
#[derive(Debug, Clone)]
pub struct SectionController<N> {
    id: SectionId,
    layers: LayerSet<N>,
    images: ImageGate,
    rect: SectionRect,
    content: RevealContent,
    state: SectionState,
    bindings: Vec<ScrollBinding>,
    sequencer: Option<RevealSequencer>,
    swing: Swing,
    pointer: Option<PointerParallax>,
    disposables: Disposables,
}

impl<N> SectionController<N> {
    /// Controller over `layers`, waiting on `image_count` images.
    pub fn new(
        id: SectionId,
        layers: LayerSet<N>,
        image_count: usize,
        rect: SectionRect,
        content: RevealContent,
    ) -> Self {
        Self {
            id,
            layers,
            images: ImageGate::new(image_count),
            rect,
            content,
            state: SectionState::Unbound,
            bindings: Vec::new(),
            sequencer: None,
            swing: Swing::stopped(),
            pointer: None,
            disposables: Disposables::new(),
        }
    }

    /// Section identity.
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Binding lifecycle.
    pub fn state(&self) -> SectionState {
        self.state
    }

    /// Layers with their current channels.
    pub fn layers(&self) -> &LayerSet<N> {
        &self.layers
    }

    /// Installed scroll bindings.
    pub fn bindings(&self) -> &[ScrollBinding] {
        &self.bindings
    }

    /// Live resources.
    pub fn disposables(&self) -> &Disposables {
        &self.disposables
    }

    /// Reveal sequencer, once bound.
    pub fn sequencer(&self) -> Option<&RevealSequencer> {
        self.sequencer.as_ref()
    }

    /// Ambient swing on the bucket.
    pub fn swing(&self) -> &Swing {
        &self.swing
    }

    /// Whether a scroll listener is installed.
    pub fn has_scroll_listener(&self) -> bool {
        self.disposables.contains(Resource::ScrollListener)
    }

    /// Whether the section wants animation frames.
    pub fn needs_frames(&self) -> bool {
        self.disposables.is_running(FrameLoop::Pointer)
    }

    /// Section bounds in document coordinates.
    pub fn rect(&self) -> SectionRect {
        self.rect
    }

    /// Update bounds after layout changes.
    pub fn set_rect(&mut self, rect: SectionRect) {
        self.rect = rect;
    }

    /// Record an image load or error. Returns true if this settled the
    /// batch; a pending bind should then be retried.
    pub fn image_settled(&mut self, index: usize, ok: bool) -> bool {
        let settled = self.images.settle(index, ok);
        if settled && self.images.failed() > 0 {
            log::debug!(
                "{}: {} image(s) failed, continuing",
                self.id.label(),
                self.images.failed()
            );
        }
        settled
    }

    /// Whether a bind is waiting on images.
    pub fn awaiting_images(&self) -> bool {
        self.state == SectionState::AwaitingImages
    }

    /// Install everything for the context's device class. Existing
    /// bindings are released first so repeated calls never stack.
    pub fn bind(&mut self, ctx: &BindContext<'_>) {
        self.unbind();
        if !self.images.is_settled() {
            log::debug!("{}: bind deferred until images settle", self.id.label());
            self.state = SectionState::AwaitingImages;
            return;
        }

        let class = ctx.viewport.class;
        let mut sequencer = (self.content != RevealContent::default())
            .then(|| RevealSequencer::new(self.content, ctx.reveal, class));

        if ctx.viewport.reduced_motion() {
            let resting = ParallaxMapper::new(ctx.config, ctx.scroll.viewport_height)
                .bindings(&self.layers);
            for binding in &resting {
                if let Some(layer) = self.layers.present_mut(binding.layer()) {
                    binding.write_resting(&mut layer.transform_mut().scroll);
                }
            }
            if let Some(seq) = sequencer.as_mut() {
                seq.finish();
            }
            self.sequencer = sequencer;
            self.state = SectionState::Static;
            log::debug!("{}: reduced motion, resting state", self.id.label());
            return;
        }

        self.bindings = ParallaxMapper::new(ctx.config, ctx.scroll.viewport_height)
            .bindings(&self.layers);
        let _ = self.disposables.register(Resource::ScrollListener);
        for binding in &self.bindings {
            let _ = self.disposables.register(Resource::Tween(binding.layer()));
        }

        if self.layers.is_present(LayerKind::Bucket) && ctx.config.swing_angle > 0.0 {
            self.swing = Swing::new(ctx.config.swing_angle, ctx.config.swing_duration);
            let _ = self.disposables.register(Resource::Tween(LayerKind::Bucket));
        }

        if self.id == SectionId::Hero && ctx.pointer.enabled && !class.is_mobile() {
            self.pointer = Some(PointerParallax::new(
                ctx.pointer.strength_px,
                ctx.pointer.follow,
            ));
            self.disposables.start(FrameLoop::Pointer);
        }

        self.sequencer = sequencer;
        self.state = SectionState::Bound;
        log::debug!(
            "{}: bound {} scroll binding(s) for {}",
            self.id.label(),
            self.bindings.len(),
            class.label()
        );
        self.update(ctx.scroll, Duration::ZERO);
    }

    /// Release every binding, timer and frame loop and return the layers
    /// to their natural layout.
    pub fn unbind(&mut self) {
        let released = self.disposables.release_all();
        if !released.is_empty() {
            log::debug!(
                "{}: released {} resource(s)",
                self.id.label(),
                released.len()
            );
        }
        self.bindings.clear();
        self.sequencer = None;
        self.swing = Swing::stopped();
        self.pointer = None;
        self.layers.reset();
        self.state = SectionState::Unbound;
    }

    /// Feed a pointer position for hero parallax.
    pub fn pointer_moved(&mut self, pointer: Vec2, viewport: Vec2) {
        if let Some(parallax) = self.pointer.as_mut() {
            parallax.aim(pointer, viewport);
        }
    }

    /// Advance scroll bindings, reveal, swing and pointer parallax.
    pub fn update(&mut self, scroll: ScrollState, dt: Duration) {
        if self.state != SectionState::Bound {
            return;
        }
        let dt_secs = dt.as_secs_f32();
        let live = &self.disposables;
        if live.contains(Resource::ScrollListener) {
            for binding in &mut self.bindings {
                if !live.contains(Resource::Tween(binding.layer())) {
                    continue;
                }
                if let Some(layer) = self.layers.present_mut(binding.layer()) {
                    binding.update(
                        self.rect,
                        scroll,
                        dt_secs,
                        &mut layer.transform_mut().scroll,
                    );
                }
            }
        }
        if self.swing.is_running() && live.contains(Resource::Tween(LayerKind::Bucket)) {
            let rotation = self.swing.tick(dt);
            if let Some(bucket) = self.layers.present_mut(LayerKind::Bucket) {
                bucket.transform_mut().ambient_rotation = rotation;
            }
        }
        if let Some(parallax) = self
            .pointer
            .as_mut()
            .filter(|_| live.is_running(FrameLoop::Pointer))
        {
            let offset = parallax.step(dt);
            for kind in LayerKind::ALL {
                if let Some(layer) = self.layers.present_mut(kind) {
                    layer.transform_mut().pointer = offset * pointer_depth(kind);
                }
            }
        }
        if let Some(seq) = self.sequencer.as_mut() {
            seq.update(self.rect, scroll, dt);
        }
    }

    /// Push the current composed transforms to `sink`.
    pub fn apply(&self, sink: &mut impl TransformSink<N>) {
        for layer in self.layers.iter() {
            if let Some(node) = layer.node() {
                sink.apply_layer(node, &layer.transform().compose());
            }
        }
        if let Some(seq) = &self.sequencer {
            let mut values: Vec<_> = seq.values().iter().collect();
            values.sort_by_key(|(target, _)| **target);
            for (target, transform) in values {
                sink.apply_reveal(self.id, *target, transform);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use rustc_hash::FxHashMap;

    use super::TransformSink;
    use crate::options::SectionId;
    use crate::reveal::RevealTarget;
    use crate::transform::Transform;

    /// Remembers the last transform written per node.
    #[derive(Default)]
    pub struct RecordingSink {
        pub layers: FxHashMap<&'static str, Transform>,
        pub reveals: FxHashMap<(SectionId, RevealTarget), Transform>,
    }

    impl TransformSink<&'static str> for RecordingSink {
        fn apply_layer(&mut self, node: &&'static str, transform: &Transform) {
            let _ = self.layers.insert(*node, *transform);
        }

        fn apply_reveal(
            &mut self,
            section: SectionId,
            target: RevealTarget,
            transform: &Transform,
        ) {
            let _ = self.reveals.insert((section, target), *transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::RecordingSink;
    use super::*;
    use crate::layer::LayerHandle;
    use crate::options::{Options, SectionTable};
    use crate::transform::LayerTransform;
    use crate::viewport::MotionPreference;

    const RECT: SectionRect = SectionRect {
        top: 1200.0,
        height: 1000.0,
    };

    fn layers() -> LayerSet<&'static str> {
        LayerSet::new([
            LayerHandle::new(LayerKind::Background, "bg"),
            LayerHandle::new(LayerKind::Foreground, "fg"),
            LayerHandle::new(LayerKind::Bucket, "bucket"),
            LayerHandle::new(LayerKind::Title, "title"),
        ])
    }

    fn controller(id: SectionId, images: usize) -> SectionController<&'static str> {
        SectionController::new(
            id,
            layers(),
            images,
            RECT,
            RevealContent {
                blocks: 2,
                keywords: 1,
            },
        )
    }

    fn snapshot(width: f32, reduced: bool) -> ViewportSnapshot {
        let options = Options::default();
        ViewportSnapshot {
            width,
            height: 800.0,
            class: options.viewport.breakpoints.classify(width),
            motion: MotionPreference::from_reduced(reduced),
        }
    }

    fn bind(
        c: &mut SectionController<&'static str>,
        table: &SectionTable,
        options: &Options,
        viewport: ViewportSnapshot,
        y: f32,
    ) {
        c.bind(&BindContext {
            viewport,
            config: table.lookup(c.id(), viewport.class),
            reveal: &options.reveal,
            pointer: &options.pointer,
            scroll: ScrollState {
                y,
                viewport_height: viewport.height,
            },
        });
    }

    #[test]
    fn bind_waits_for_images() {
        let options = Options::default();
        let mut c = controller(SectionId::Discover, 2);
        bind(&mut c, &options.sections, &options, snapshot(1280.0, false), 0.0);
        assert_eq!(c.state(), SectionState::AwaitingImages);
        assert!(!c.has_scroll_listener());
        assert!(!c.image_settled(0, true));
        assert!(c.image_settled(1, false));
        bind(&mut c, &options.sections, &options, snapshot(1280.0, false), 0.0);
        assert_eq!(c.state(), SectionState::Bound);
        assert!(c.has_scroll_listener());
    }

    #[test]
    fn rebinding_never_stacks_resources() {
        let options = Options::default();
        let mut c = controller(SectionId::Discover, 0);
        for _ in 0..3 {
            bind(&mut c, &options.sections, &options, snapshot(1280.0, false), 0.0);
        }
        assert_eq!(c.disposables().count(Resource::ScrollListener), 1);
        assert_eq!(c.bindings().len(), 4);
    }

    #[test]
    fn reduced_motion_writes_resting_values_without_listener() {
        let options = Options::default();
        let mut c = controller(SectionId::Design, 0);
        bind(&mut c, &options.sections, &options, snapshot(1280.0, true), 900.0);
        assert_eq!(c.state(), SectionState::Static);
        assert!(!c.has_scroll_listener());
        assert!(c.disposables().is_empty());
        assert!(!c.swing().is_running());

        let mut sink = RecordingSink::default();
        c.apply(&mut sink);
        for node in ["bg", "fg", "bucket", "title"] {
            assert_eq!(sink.layers[node], Transform::IDENTITY);
        }
        assert_eq!(sink.reveals[&(SectionId::Design, RevealTarget::Bar(0))].scale.x, 1.0);
        assert_eq!(sink.reveals[&(SectionId::Design, RevealTarget::Block(1))].opacity, 1.0);
    }

    #[test]
    fn swing_composes_with_scroll_translate() {
        let options = Options::default();
        let mut c = controller(SectionId::Discover, 0);
        bind(&mut c, &options.sections, &options, snapshot(1280.0, false), 1200.0);
        for _ in 0..30 {
            c.update(
                ScrollState {
                    y: 1200.0,
                    viewport_height: 800.0,
                },
                Duration::from_millis(16),
            );
        }
        let bucket = c.layers().get(LayerKind::Bucket).unwrap().transform();
        let composed = bucket.compose();
        assert_ne!(bucket.ambient_rotation, 0.0);
        assert_ne!(bucket.scroll.translate.y, 0.0);
        assert_eq!(composed.translate.y, bucket.scroll.translate.y);
        assert_eq!(
            composed.rotation,
            bucket.scroll.rotation + bucket.ambient_rotation
        );
    }

    #[test]
    fn mobile_leaves_depth_layers_static() {
        let options = Options::default();
        let mut c = controller(SectionId::Discover, 0);
        bind(&mut c, &options.sections, &options, snapshot(600.0, false), 1200.0);
        assert!(c
            .bindings()
            .iter()
            .all(|b| !matches!(b.layer(), LayerKind::Background | LayerKind::Foreground)));
        let mut sink = RecordingSink::default();
        c.apply(&mut sink);
        assert_eq!(sink.layers["bg"], Transform::IDENTITY);
        assert_eq!(sink.layers["fg"], Transform::IDENTITY);
    }

    #[test]
    fn hero_pointer_parallax_runs_a_frame_loop() {
        let options = Options::default();
        let mut hero = controller(SectionId::Hero, 0);
        bind(&mut hero, &options.sections, &options, snapshot(1280.0, false), 0.0);
        assert!(hero.needs_frames());
        hero.pointer_moved(Vec2::new(1280.0, 400.0), Vec2::new(1280.0, 800.0));
        for _ in 0..240 {
            hero.update(
                ScrollState {
                    y: 0.0,
                    viewport_height: 800.0,
                },
                Duration::from_millis(16),
            );
        }
        let fg = hero.layers().get(LayerKind::Foreground).unwrap().transform();
        assert!((fg.pointer.x - options.pointer.strength_px).abs() < 0.1);
        assert_eq!(fg.pointer.y, 0.0);
        hero.unbind();
        assert!(!hero.needs_frames());

        let mut other = controller(SectionId::Footer, 0);
        bind(&mut other, &options.sections, &options, snapshot(1280.0, false), 0.0);
        assert!(!other.needs_frames());
    }

    #[test]
    fn released_arena_stops_every_driver() {
        let options = Options::default();
        let mut hero = controller(SectionId::Hero, 0);
        bind(&mut hero, &options.sections, &options, snapshot(1280.0, false), 1200.0);
        hero.pointer_moved(Vec2::new(0.0, 0.0), Vec2::new(1280.0, 800.0));
        let before: Vec<LayerTransform> =
            hero.layers().iter().map(|l| *l.transform()).collect();
        let _ = hero.disposables.release_all();
        for _ in 0..60 {
            hero.update(
                ScrollState {
                    y: 1900.0,
                    viewport_height: 800.0,
                },
                Duration::from_millis(16),
            );
        }
        let after: Vec<LayerTransform> =
            hero.layers().iter().map(|l| *l.transform()).collect();
        assert_eq!(before, after);
        assert!(!hero.needs_frames());
        assert!(!hero.has_scroll_listener());
    }

    #[test]
    fn unbind_releases_everything() {
        let options = Options::default();
        let mut c = controller(SectionId::Deliver, 0);
        bind(&mut c, &options.sections, &options, snapshot(900.0, false), 1500.0);
        assert!(!c.disposables().is_empty());
        c.unbind();
        assert!(c.disposables().is_empty());
        assert!(c.bindings().is_empty());
        assert!(c.sequencer().is_none());
        assert_eq!(c.state(), SectionState::Unbound);
    }
}
