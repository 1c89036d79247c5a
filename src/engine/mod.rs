//! Composition root.
//!
//! [`MotionEngine`] owns the viewport classifier, every section controller,
//! the testimonial carousel and the logo marquee. The host feeds it
//! [`Event`]s with timestamps, calls [`MotionEngine::tick`] once per
//! animation frame and pushes the results out through a
//! [`TransformSink`].

mod event;
mod runtime;

use glam::Vec2;
use web_time::{Duration, Instant};

pub use self::event::{Event, Target};
pub use self::runtime::{Runtime, init, is_initialized};
use crate::carousel::{Carousel, parse_feed};
use crate::dispose::{Disposables, TimerKind};
use crate::error::MotionError;
use crate::marquee::Marquee;
use crate::options::{Options, SectionId};
use crate::scroll::{ScrollState, SectionRect};
use crate::section::{BindContext, SectionController, TransformSink};
use crate::util::frame_timing::FrameClock;
use crate::viewport::{
    Debouncer, ViewportChange, ViewportClassifier, ViewportSnapshot,
};

/// Largest step a single frame may advance scroll smoothing and ambient
/// motion.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Headless scroll/motion engine for one page.
#[derive(Debug)]
pub struct MotionEngine<N> {
    options: Options,
    viewport: ViewportClassifier,
    rebind: Debouncer,
    disposables: Disposables,
    scroll_y: f32,
    sections: Vec<SectionController<N>>,
    carousel: Option<Carousel>,
    marquee: Option<Marquee>,
    marquee_stale: bool,
    clock: FrameClock,
}

impl<N> MotionEngine<N> {
    /// Engine for a viewport of `width × height`, classified synchronously.
    pub fn new(
        _runtime: &Runtime,
        options: Options,
        width: f32,
        height: f32,
        reduced_motion: bool,
    ) -> Self {
        let viewport = ViewportClassifier::new(
            options.viewport.breakpoints,
            width,
            height,
            reduced_motion,
        );
        log::debug!(
            "motion engine: {}x{} {}{}",
            width,
            height,
            viewport.class().label(),
            if reduced_motion { " (reduced motion)" } else { "" }
        );
        let rebind =
            Debouncer::new(TimerKind::Rebind, options.viewport.rebind_debounce());
        Self {
            options,
            viewport,
            rebind,
            disposables: Disposables::new(),
            scroll_y: 0.0,
            sections: Vec::new(),
            carousel: None,
            marquee: None,
            marquee_stale: false,
            clock: FrameClock::new(MAX_FRAME_DELTA),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Options in effect.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current viewport.
    pub fn viewport(&self) -> ViewportSnapshot {
        self.viewport.snapshot()
    }

    /// Current scroll state.
    pub fn scroll(&self) -> ScrollState {
        ScrollState {
            y: self.scroll_y,
            viewport_height: self.viewport.snapshot().height,
        }
    }

    /// Mounted sections in mount order.
    pub fn sections(&self) -> &[SectionController<N>] {
        &self.sections
    }

    /// A mounted section.
    pub fn section(&self, id: SectionId) -> Option<&SectionController<N>> {
        self.sections.iter().find(|s| s.id() == id)
    }

    /// The testimonial carousel, if mounted.
    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    /// The logo marquee, if mounted.
    pub fn marquee(&self) -> Option<&Marquee> {
        self.marquee.as_ref()
    }

    /// Engine-level live resources (the debounced re-bind timer).
    pub fn disposables(&self) -> &Disposables {
        &self.disposables
    }

    /// Whether the marquee needs re-measuring after a resize.
    pub fn marquee_needs_measure(&self) -> bool {
        self.marquee.is_some() && self.marquee_stale
    }

    /// Whether the host should keep requesting animation frames.
    pub fn needs_frames(&self) -> bool {
        let scroll = self.scroll();
        self.rebind.is_armed(&self.disposables)
            || self.marquee.as_ref().is_some_and(Marquee::needs_frames)
            || self.carousel.as_ref().is_some_and(Carousel::autoplay_active)
            || self.sections.iter().any(|s| {
                s.needs_frames()
                    || s.swing().is_running()
                    || s.sequencer().is_some_and(|q| q.is_running())
                    || s.bindings().iter().any(|b| b.is_settling(s.rect(), scroll))
            })
    }

    // ── Mounting ─────────────────────────────────────────────────────────

    /// Mount a section and bind it for the current viewport. Binding is
    /// deferred if its images are still loading.
    pub fn mount_section(&mut self, mut section: SectionController<N>) {
        self.unmount_section(section.id());
        self.bind_one(&mut section);
        self.sections.push(section);
    }

    /// Unmount a section, releasing everything it owns.
    pub fn unmount_section(&mut self, id: SectionId) {
        if let Some(pos) = self.sections.iter().position(|s| s.id() == id) {
            let mut section = self.sections.remove(pos);
            section.unbind();
        }
    }

    /// Update a section's bounds after layout.
    pub fn set_section_rect(&mut self, id: SectionId, rect: SectionRect) {
        if let Some(section) = self.sections.iter_mut().find(|s| s.id() == id) {
            section.set_rect(rect);
        }
    }

    /// Mount the testimonial carousel in its loading state.
    pub fn mount_carousel(&mut self) {
        self.carousel = Some(Carousel::new(self.options.carousel.clone()));
    }

    /// Hand the fetched testimonial feed to the carousel. Fetch failures
    /// are passed as `Err` and end up as the carousel's failed phase.
    pub fn load_testimonials(
        &mut self,
        fetched: Result<&str, MotionError>,
        now: Instant,
    ) {
        let Some(carousel) = self.carousel.as_mut() else {
            return;
        };
        let parsed =
            fetched.and_then(|json| parse_feed(json, &self.options.carousel));
        carousel.load(parsed, now);
    }

    /// Mount the logo marquee over `logos` logos. It starts once measured.
    pub fn mount_marquee(&mut self, logos: usize) {
        let mut marquee = Marquee::new(logos, self.options.marquee.clone());
        if self.viewport.snapshot().reduced_motion() {
            marquee.stop();
        }
        self.marquee = Some(marquee);
        self.marquee_stale = true;
    }

    // ── Events ───────────────────────────────────────────────────────────

    /// Route one host event.
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Scroll { y } => self.scroll_y = y.max(0.0),
            Event::Resize { width, height } => {
                self.viewport_change(ViewportChange::Resize { width, height }, now);
            }
            Event::OrientationChange { width, height } => self.viewport_change(
                ViewportChange::OrientationChange { width, height },
                now,
            ),
            Event::ReducedMotionChanged(reduced) => {
                self.viewport_change(ViewportChange::ReducedMotion(reduced), now);
            }
            Event::ImageSettled { section, index, ok } => {
                self.image_settled(section, index, ok);
            }
            Event::AvatarSettled { index, ok } => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.image_settled(index, ok, now);
                }
            }
            Event::PointerMoved { x, y } => {
                let snapshot = self.viewport.snapshot();
                let size = Vec2::new(snapshot.width, snapshot.height);
                for section in &mut self.sections {
                    section.pointer_moved(Vec2::new(x, y), size);
                }
            }
            Event::Input {
                target: Target::Carousel,
                input,
            } => {
                if let Some(carousel) = self.carousel.as_mut() {
                    if carousel.handle_input(input, now) {
                        log::trace!("carousel -> {}", carousel.current());
                    }
                }
            }
            Event::Input {
                target: Target::Marquee,
                input,
            } => {
                if let Some(marquee) = self.marquee.as_mut() {
                    let _ = marquee.handle_input(input, now);
                }
            }
            Event::DotClicked(index) => {
                if let Some(carousel) = self.carousel.as_mut() {
                    let _ = carousel.go_to(index, now);
                }
            }
            Event::MarqueeMeasured(widths) => {
                if let Some(marquee) = self.marquee.as_mut() {
                    marquee.measure(&widths);
                    self.marquee_stale = false;
                }
            }
            Event::Frame => self.tick(now),
        }
    }

    fn viewport_change(&mut self, change: ViewportChange, now: Instant) {
        let update = self.viewport.handle(change);
        if update.geometry_changed {
            self.rebind.arm(&mut self.disposables, now);
            self.marquee_stale = true;
        }
        if update.motion_changed {
            let reduced = self.viewport.snapshot().reduced_motion();
            log::debug!("reduced motion -> {reduced}, rebinding now");
            if let Some(marquee) = self.marquee.as_mut() {
                if reduced {
                    marquee.stop();
                } else {
                    marquee.start();
                }
            }
            self.rebind_all();
        }
    }

    fn image_settled(&mut self, id: SectionId, index: usize, ok: bool) {
        let mut sections = std::mem::take(&mut self.sections);
        if let Some(section) = sections.iter_mut().find(|s| s.id() == id) {
            if section.image_settled(index, ok) && section.awaiting_images() {
                self.bind_one(section);
            }
        }
        self.sections = sections;
    }

    fn bind_one(&self, section: &mut SectionController<N>) {
        let viewport = self.viewport.snapshot();
        section.bind(&BindContext {
            viewport,
            config: self.options.sections.lookup(section.id(), viewport.class),
            reveal: &self.options.reveal,
            pointer: &self.options.pointer,
            scroll: self.scroll(),
        });
    }

    /// Tear down and rebuild every section for the current viewport.
    fn rebind_all(&mut self) {
        let mut sections = std::mem::take(&mut self.sections);
        for section in &mut sections {
            self.bind_one(section);
        }
        self.sections = sections;
    }

    // ── Frame ────────────────────────────────────────────────────────────

    /// Advance everything to `now`: fire the debounced re-bind, step
    /// sections, carousel timers and the marquee.
    pub fn tick(&mut self, now: Instant) {
        if self.rebind.poll(&mut self.disposables, now) {
            log::debug!(
                "rebinding {} section(s) for {}",
                self.sections.len(),
                self.viewport.class().label()
            );
            self.rebind_all();
        }
        let dt = self.clock.tick(now);
        let scroll = self.scroll();
        for section in &mut self.sections {
            section.update(scroll, dt);
        }
        if let Some(carousel) = self.carousel.as_mut() {
            let _ = carousel.tick(now);
        }
        if let Some(marquee) = self.marquee.as_mut() {
            let _ = marquee.tick(now);
        }
    }

    /// Push every section's transforms to `sink`.
    pub fn apply(&self, sink: &mut impl TransformSink<N>) {
        for section in &self.sections {
            section.apply(sink);
        }
    }

    /// Release every binding, listener, timer and frame loop, then unmount
    /// the carousel and marquee. Sections stay mounted but unbound.
    pub fn teardown(&mut self) {
        let _ = self.disposables.release_all();
        for section in &mut self.sections {
            section.unbind();
        }
        if let Some(mut carousel) = self.carousel.take() {
            carousel.teardown();
        }
        if let Some(mut marquee) = self.marquee.take() {
            marquee.teardown();
        }
        self.marquee_stale = false;
        self.clock.reset();
        log::debug!("motion engine torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::CarouselPhase;
    use crate::input::{InputEvent, Key};
    use crate::layer::{LayerHandle, LayerKind, LayerSet};
    use crate::reveal::RevealContent;
    use crate::section::SectionState;
    use crate::section::recording::RecordingSink;
    use crate::transform::Transform;
    use crate::viewport::ViewportClass;

    const FRAME: Duration = Duration::from_millis(16);

    fn engine(width: f32, reduced: bool) -> MotionEngine<&'static str> {
        MotionEngine::new(&init(), Options::default(), width, 800.0, reduced)
    }

    fn discover(images: usize) -> SectionController<&'static str> {
        SectionController::new(
            SectionId::Discover,
            LayerSet::new([
                LayerHandle::new(LayerKind::Background, "bg"),
                LayerHandle::new(LayerKind::Foreground, "fg"),
                LayerHandle::new(LayerKind::Bucket, "bucket"),
                LayerHandle::new(LayerKind::Title, "title"),
            ]),
            images,
            SectionRect {
                top: 1200.0,
                height: 1000.0,
            },
            RevealContent {
                blocks: 3,
                keywords: 2,
            },
        )
    }

    fn run(
        e: &mut MotionEngine<&'static str>,
        from: Instant,
        frames: u32,
    ) -> Instant {
        let mut now = from;
        for _ in 0..frames {
            now += FRAME;
            e.handle_event(Event::Frame, now);
        }
        now
    }

    fn layers_of(e: &MotionEngine<&'static str>) -> RecordingSink {
        let mut sink = RecordingSink::default();
        e.apply(&mut sink);
        sink
    }

    #[test]
    fn scenario_a_resize_to_mobile_drops_depth_bindings() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_section(discover(0));
        e.handle_event(Event::Scroll { y: 1500.0 }, t0);
        let t1 = run(&mut e, t0, 60);

        let section = e.section(SectionId::Discover).unwrap();
        assert_eq!(section.bindings().len(), 4);
        let before = layers_of(&e);
        assert_ne!(before.layers["bg"].translate.y, 0.0);
        assert_ne!(before.layers["fg"].translate.y, 0.0);

        e.handle_event(
            Event::Resize {
                width: 600.0,
                height: 800.0,
            },
            t1,
        );
        assert_eq!(e.viewport().class, ViewportClass::Mobile);
        // still debouncing: old bindings stay until the quiet period ends
        e.tick(t1 + Duration::from_millis(100));
        assert_eq!(e.section(SectionId::Discover).unwrap().bindings().len(), 4);

        let _ = run(&mut e, t1 + Duration::from_millis(200), 30);
        let section = e.section(SectionId::Discover).unwrap();
        assert_eq!(section.state(), SectionState::Bound);
        let kinds: Vec<LayerKind> =
            section.bindings().iter().map(|b| b.layer()).collect();
        assert_eq!(kinds, vec![LayerKind::Bucket, LayerKind::Title]);
        let after = layers_of(&e);
        assert_eq!(after.layers["bg"], Transform::IDENTITY);
        assert_eq!(after.layers["fg"], Transform::IDENTITY);
        assert_ne!(after.layers["bucket"], Transform::IDENTITY);
    }

    #[test]
    fn scenario_b_empty_testimonials() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_carousel();
        e.load_testimonials(Ok("[]"), t0);
        let carousel = e.carousel().unwrap();
        assert_eq!(carousel.phase(), &CarouselPhase::Empty);
        assert_eq!(carousel.phase().status_key(), Some("testimonials.empty"));
        assert!(!carousel.can_navigate());
        assert!(!carousel.autoplay_active());

        e.handle_event(Event::DotClicked(2), t0);
        e.handle_event(
            Event::Input {
                target: Target::Carousel,
                input: InputEvent::Key(Key::ArrowRight),
            },
            t0,
        );
        let _ = run(&mut e, t0, 10);
        let carousel = e.carousel().unwrap();
        assert_eq!(carousel.current(), 0);
        assert!(!carousel.autoplay_active());
    }

    #[test]
    fn scenario_c_marquee_period() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_marquee(9);
        let marquee = e.marquee().unwrap();
        assert_eq!(marquee.slides().len(), 27);
        assert!(e.marquee_needs_measure());

        // clones render wider to prove only the real copy is measured
        let widths: Vec<f32> = marquee
            .slides()
            .iter()
            .map(|s| if s.clone { 500.0 } else { 120.0 })
            .collect();
        e.handle_event(Event::MarqueeMeasured(widths), t0);
        assert!(!e.marquee_needs_measure());
        let marquee = e.marquee().unwrap();
        assert_eq!(marquee.loop_width(), 1080.0);
        let period = marquee.period_secs().unwrap();
        assert!((period - 27.0).abs() < 1e-4);

        let step = Duration::from_millis(100);
        let mut now = t0;
        e.handle_event(Event::Frame, now);
        let mut positions = Vec::new();
        for _ in 0..540 {
            now += step;
            e.handle_event(Event::Frame, now);
            positions.push(e.marquee().unwrap().translate());
        }
        let moved = positions[0];
        assert!(moved < 0.0, "strip moves left");
        // 27s at 100ms per frame is 270 frames
        for i in 0..270 {
            assert!((positions[i] - positions[i + 270]).abs() < 1e-2);
        }
        assert!(positions
            .iter()
            .all(|t| *t <= 0.0 && *t > -1080.0));
    }

    #[test]
    fn images_defer_binding_until_settled() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_section(discover(2));
        assert_eq!(
            e.section(SectionId::Discover).unwrap().state(),
            SectionState::AwaitingImages
        );
        e.handle_event(
            Event::ImageSettled {
                section: SectionId::Discover,
                index: 0,
                ok: false,
            },
            t0,
        );
        e.handle_event(
            Event::ImageSettled {
                section: SectionId::Discover,
                index: 1,
                ok: true,
            },
            t0,
        );
        let section = e.section(SectionId::Discover).unwrap();
        assert_eq!(section.state(), SectionState::Bound);
        assert!(section.has_scroll_listener());
    }

    #[test]
    fn reduced_motion_toggle_rebinds_immediately() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_section(discover(0));
        e.mount_marquee(3);
        e.handle_event(Event::MarqueeMeasured(vec![100.0; 9]), t0);
        e.handle_event(Event::ReducedMotionChanged(true), t0);
        let section = e.section(SectionId::Discover).unwrap();
        assert_eq!(section.state(), SectionState::Static);
        assert!(!section.has_scroll_listener());
        assert!(!e.marquee().unwrap().needs_frames());
        for transform in layers_of(&e).layers.values() {
            assert_eq!(*transform, Transform::IDENTITY);
        }

        e.handle_event(Event::ReducedMotionChanged(false), t0);
        assert_eq!(
            e.section(SectionId::Discover).unwrap().state(),
            SectionState::Bound
        );
        assert!(e.marquee().unwrap().needs_frames());
    }

    #[test]
    fn reveal_plays_and_reverses_with_scroll() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_section(discover(0));
        let t1 = run(&mut e, t0, 5);
        let initial = layers_of(&e).reveals;

        e.handle_event(Event::Scroll { y: 900.0 }, t1);
        let t2 = run(&mut e, t1, 200);
        let shown = layers_of(&e).reveals;
        assert_eq!(
            shown[&(SectionId::Discover, crate::reveal::RevealTarget::Bar(1))]
                .scale
                .x,
            1.0
        );

        e.handle_event(Event::Scroll { y: 0.0 }, t2);
        let _ = run(&mut e, t2, 200);
        assert_eq!(layers_of(&e).reveals, initial);
    }

    #[test]
    fn teardown_leaves_nothing_running() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_section(discover(0));
        e.mount_carousel();
        e.load_testimonials(
            Ok(r#"[{"name":"A","role":"R","quote":"Q"},{"name":"B","role":"R","quote":"Q"}]"#),
            t0,
        );
        e.mount_marquee(2);
        e.handle_event(Event::MarqueeMeasured(vec![50.0; 6]), t0);
        e.handle_event(
            Event::Resize {
                width: 900.0,
                height: 700.0,
            },
            t0,
        );
        assert!(e.needs_frames());
        assert_eq!(e.disposables().timers(), 1);
        e.teardown();
        assert!(!e.needs_frames());
        assert!(e.disposables().is_empty());
        assert!(e
            .sections()
            .iter()
            .all(|s| s.disposables().is_empty()));
        assert!(e.carousel().is_none());
        assert!(e.marquee().is_none());
    }

    #[test]
    fn input_after_teardown_rearms_nothing() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_carousel();
        e.load_testimonials(
            Ok(r#"[{"name":"A","role":"R","quote":"Q"},{"name":"B","role":"R","quote":"Q"}]"#),
            t0,
        );
        e.mount_marquee(2);
        e.handle_event(Event::MarqueeMeasured(vec![50.0; 6]), t0);
        for target in [Target::Carousel, Target::Marquee] {
            e.handle_event(
                Event::Input {
                    target,
                    input: InputEvent::PointerEnter,
                },
                t0,
            );
        }
        e.teardown();
        for target in [Target::Carousel, Target::Marquee] {
            for input in [InputEvent::PointerLeave, InputEvent::FocusOut] {
                e.handle_event(Event::Input { target, input }, t0);
            }
        }
        let _ = run(&mut e, t0, 10);
        assert!(!e.needs_frames());
        assert!(e.carousel().is_none());
        assert!(e.marquee().is_none());
    }

    #[test]
    fn resize_rebind_timer_lives_in_engine_arena() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_section(discover(0));
        e.handle_event(
            Event::Resize {
                width: 1400.0,
                height: 900.0,
            },
            t0,
        );
        assert_eq!(
            e.disposables().deadline(TimerKind::Rebind),
            Some(t0 + e.options().viewport.rebind_debounce())
        );
        e.tick(t0 + Duration::from_millis(200));
        assert!(e.disposables().is_empty());
    }

    #[test]
    fn fetch_failure_becomes_failed_phase() {
        let t0 = Instant::now();
        let mut e = engine(1280.0, false);
        e.mount_carousel();
        e.load_testimonials(Err(MotionError::DataSource("timeout".to_owned())), t0);
        assert!(matches!(
            e.carousel().unwrap().phase(),
            CarouselPhase::Failed(_)
        ));
    }
}
