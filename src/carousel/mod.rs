//! Testimonial carousel state machine.
//!
//! Two orthogonal state axes:
//!
//! - **Readiness** ([`CarouselPhase`]): the feed must have loaded with at
//!   least one usable entry and every avatar image must have settled
//!   before autoplay or interaction is allowed.
//! - **Pause**: hover, focus, an in-progress drag and a post-drag cooldown
//!   each hold autoplay independently; autoplay runs only when none do.
//!
//! At most one autoplay deadline exists at any time. It is dropped whenever
//! the carousel pauses and recreated from scratch when it resumes. Both the
//! autoplay and the post-drag resume deadline are timers in the carousel's
//! [`Disposables`], so [`Carousel::teardown`] is a single release.

pub mod testimonial;

pub use testimonial::{Testimonial, excerpt, parse_feed};
use web_time::Instant;

use crate::dispose::{Disposables, TimerKind};
use crate::error::MotionError;
use crate::input::{DragGesture, InputEvent, Key, Swipe};
use crate::layer::ImageGate;
use crate::locale::Dictionary;
use crate::options::{CarouselOptions, ResumePolicy};

/// Readiness of the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselPhase {
    /// Waiting for the feed or for avatar images.
    Loading,
    /// Items available, images settled.
    Ready,
    /// The feed loaded but held no usable entries.
    Empty,
    /// The feed could not be read.
    Failed(String),
}

impl CarouselPhase {
    /// Dictionary key of the status line for non-ready phases.
    #[must_use]
    pub fn status_key(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("testimonials.loading"),
            Self::Ready => None,
            Self::Empty => Some("testimonials.empty"),
            Self::Failed(_) => Some("testimonials.error"),
        }
    }

    /// Status line in the language of `dictionary`.
    #[must_use]
    pub fn status<'a>(&self, dictionary: &'a Dictionary) -> Option<&'a str> {
        self.status_key().map(|key| dictionary.t(key))
    }
}

/// Visual slot of a slide relative to the selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlidePosition {
    /// The active slide.
    Selected,
    /// One to the right.
    Next,
    /// One to the left.
    Prev,
    /// Two to the left, partially visible.
    PeekLeft,
    /// Two to the right, partially visible.
    PeekRight,
    /// Off-stage.
    Hidden,
}

impl SlidePosition {
    /// Class-name style label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::Next => "next",
            Self::Prev => "prev",
            Self::PeekLeft => "peek-left",
            Self::PeekRight => "peek-right",
            Self::Hidden => "hidden",
        }
    }
}

/// Why autoplay is currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PauseReasons {
    hover: bool,
    focus: bool,
    drag: bool,
}

impl PauseReasons {
    fn any(self) -> bool {
        self.hover || self.focus || self.drag
    }
}

/// Testimonial carousel.
#[derive(Debug, Clone)]
pub struct Carousel {
    options: CarouselOptions,
    items: Vec<Testimonial>,
    phase: CarouselPhase,
    images: ImageGate,
    current: usize,
    paused: PauseReasons,
    drag: DragGesture,
    timers: Disposables,
}

impl Carousel {
    /// Empty carousel waiting for its feed.
    #[must_use]
    pub fn new(options: CarouselOptions) -> Self {
        let drag = DragGesture::new(options.swipe_threshold_px);
        Self {
            options,
            items: Vec::new(),
            phase: CarouselPhase::Loading,
            images: ImageGate::default(),
            current: 0,
            paused: PauseReasons::default(),
            drag,
            timers: Disposables::new(),
        }
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    /// Accept the outcome of loading the feed.
    ///
    /// Items without an avatar count as settled immediately; the carousel
    /// turns ready once the remaining avatars report load or error.
    pub fn load(
        &mut self,
        result: Result<Vec<Testimonial>, MotionError>,
        now: Instant,
    ) {
        self.current = 0;
        let _ = self.timers.release_all();
        match result {
            Err(e) => {
                log::warn!("testimonials failed to load: {e}");
                self.items.clear();
                self.images = ImageGate::default();
                self.phase = CarouselPhase::Failed(e.to_string());
            }
            Ok(items) if items.is_empty() => {
                log::debug!("testimonial feed is empty");
                self.items = items;
                self.images = ImageGate::default();
                self.phase = CarouselPhase::Empty;
            }
            Ok(items) => {
                self.images = ImageGate::new(items.len());
                for (i, item) in items.iter().enumerate() {
                    if item.avatar_url.is_none() {
                        let _ = self.images.settle(i, true);
                    }
                }
                self.items = items;
                self.phase = CarouselPhase::Loading;
                self.check_ready(now);
            }
        }
    }

    /// Record that the avatar of item `index` loaded (or failed).
    pub fn image_settled(&mut self, index: usize, ok: bool, now: Instant) {
        if self.images.settle(index, ok) {
            if self.images.failed() > 0 {
                log::debug!(
                    "carousel: {} avatar(s) failed to load",
                    self.images.failed()
                );
            }
            self.check_ready(now);
        }
    }

    fn check_ready(&mut self, now: Instant) {
        if self.phase == CarouselPhase::Loading
            && !self.items.is_empty()
            && self.images.is_settled()
        {
            self.phase = CarouselPhase::Ready;
            log::debug!("carousel ready with {} items", self.items.len());
            self.reschedule(now);
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &CarouselPhase {
        &self.phase
    }

    /// Whether data and images are in.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == CarouselPhase::Ready
    }

    /// Loaded items.
    #[must_use]
    pub fn items(&self) -> &[Testimonial] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the selected item; always `0` when empty.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Selected item.
    #[must_use]
    pub fn current_item(&self) -> Option<&Testimonial> {
        self.items.get(self.current)
    }

    /// Whether prev/next/dots do anything.
    #[must_use]
    pub fn can_navigate(&self) -> bool {
        self.is_ready() && self.items.len() > 1
    }

    /// Whether anything holds autoplay.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.any() || self.timers.deadline(TimerKind::Resume).is_some()
    }

    /// Whether an autoplay deadline is pending.
    #[must_use]
    pub fn autoplay_active(&self) -> bool {
        self.autoplay_deadline().is_some()
    }

    /// When the next autoplay step is due.
    #[must_use]
    pub fn autoplay_deadline(&self) -> Option<Instant> {
        self.timers.deadline(TimerKind::Autoplay)
    }

    /// Live timers.
    #[must_use]
    pub fn disposables(&self) -> &Disposables {
        &self.timers
    }

    /// Drop any deadline and create a fresh one if autoplay may run.
    fn reschedule(&mut self, now: Instant) {
        let _ = self.timers.cancel(TimerKind::Autoplay);
        if self.can_navigate() && !self.is_paused() {
            let _ = self.timers.arm(
                TimerKind::Autoplay,
                now + self.options.autoplay_interval(),
            );
        }
    }

    fn step(&mut self, forward: bool) -> bool {
        if !self.can_navigate() {
            return false;
        }
        let len = self.items.len();
        self.current = if forward {
            (self.current + 1) % len
        } else {
            (self.current + len - 1) % len
        };
        true
    }

    /// Advance by one, restarting the autoplay interval.
    pub fn next(&mut self, now: Instant) -> bool {
        let moved = self.step(true);
        if moved {
            self.reschedule(now);
        }
        moved
    }

    /// Go back by one, restarting the autoplay interval.
    pub fn prev(&mut self, now: Instant) -> bool {
        let moved = self.step(false);
        if moved {
            self.reschedule(now);
        }
        moved
    }

    /// Jump to `index` (pagination dot). Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize, now: Instant) -> bool {
        if !self.can_navigate() || index >= self.items.len() {
            return false;
        }
        let moved = index != self.current;
        self.current = index;
        self.reschedule(now);
        moved
    }

    /// Route one input event. Returns true if the selected index changed.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> bool {
        match event {
            InputEvent::PointerEnter => {
                self.paused.hover = true;
                self.reschedule(now);
                false
            }
            InputEvent::PointerLeave => {
                self.paused.hover = false;
                self.reschedule(now);
                false
            }
            InputEvent::FocusIn => {
                self.paused.focus = true;
                self.reschedule(now);
                false
            }
            InputEvent::FocusOut => {
                self.paused.focus = false;
                self.reschedule(now);
                false
            }
            _ if !self.can_navigate() => false,
            InputEvent::PointerDown { x } => {
                self.drag.press(x);
                self.paused.drag = true;
                let _ = self.timers.cancel(TimerKind::Resume);
                self.reschedule(now);
                false
            }
            InputEvent::PointerMove { x } => {
                let _ = self.drag.motion(x);
                false
            }
            InputEvent::PointerUp { x } => {
                if !self.drag.is_pressed() {
                    return false;
                }
                let moved = match self.drag.release(x) {
                    Some(Swipe::Next) => self.step(true),
                    Some(Swipe::Prev) => self.step(false),
                    None => false,
                };
                self.end_drag(now);
                moved
            }
            InputEvent::PointerCancel => {
                if self.drag.is_pressed() {
                    self.drag.cancel();
                    self.end_drag(now);
                }
                false
            }
            InputEvent::Key(Key::ArrowRight) => self.next(now),
            InputEvent::Key(Key::ArrowLeft) => self.prev(now),
            InputEvent::Key(Key::Other) => false,
        }
    }

    fn end_drag(&mut self, now: Instant) {
        self.paused.drag = false;
        if let ResumePolicy::After { .. } = self.options.resume {
            let _ = self
                .timers
                .arm(TimerKind::Resume, now + self.options.resume.cooldown());
        }
        self.reschedule(now);
    }

    /// Fire due timers. Returns true if autoplay advanced the index.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timers.fire(TimerKind::Resume, now) {
            self.reschedule(now);
        }
        if !self.timers.fire(TimerKind::Autoplay, now) {
            return false;
        }
        let moved = self.step(true);
        self.reschedule(now);
        if moved {
            log::trace!("carousel autoplay -> {}", self.current);
        }
        moved
    }

    /// Slot of item `index` relative to the selection.
    ///
    /// Peek slots only exist once there are more items than visible slots;
    /// with fewer items anything beyond the neighbors is hidden.
    #[must_use]
    pub fn position_of(&self, index: usize) -> SlidePosition {
        let len = self.items.len();
        if index >= len {
            return SlidePosition::Hidden;
        }
        let rel = (index + len - self.current) % len;
        let peek = len > self.options.visible_slots;
        match rel {
            0 => SlidePosition::Selected,
            1 => SlidePosition::Next,
            r if r == len - 1 => SlidePosition::Prev,
            2 if peek => SlidePosition::PeekRight,
            r if peek && r == len - 2 => SlidePosition::PeekLeft,
            _ => SlidePosition::Hidden,
        }
    }

    /// Positions of every item, in item order.
    #[must_use]
    pub fn positions(&self) -> Vec<SlidePosition> {
        (0..self.items.len()).map(|i| self.position_of(i)).collect()
    }

    /// Release every timer and drop the feed (unmount). Later input finds
    /// nothing to navigate and arms nothing.
    pub fn teardown(&mut self) {
        let released = self.timers.release_all();
        log::debug!("carousel torn down, {} timer(s) released", released.len());
        self.drag.cancel();
        self.paused = PauseReasons::default();
        self.items.clear();
        self.images = ImageGate::default();
        self.current = 0;
        self.phase = CarouselPhase::Loading;
    }
}
