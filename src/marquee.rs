//! Logo marquee: an endlessly scrolling strip.
//!
//! The track holds the logo set `copies` times (one real copy plus clones)
//! so a monotonically increasing offset, wrapped by the width of one copy,
//! never shows a seam. Only the real copy is measured. The frame loop and
//! the post-interaction cooldown live in the marquee's [`Disposables`].

use web_time::{Duration, Instant};

use crate::dispose::{Disposables, FrameLoop, TimerKind};
use crate::input::{DragGesture, InputEvent, Key, Swipe};
use crate::options::MarqueeOptions;
use crate::util::frame_timing::FrameClock;

/// One rendered slide in the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarqueeSlide {
    /// Index into the logo set.
    pub item: usize,
    /// Whether this slide is a clone (hidden from assistive tech).
    pub clone: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Holds {
    hover: bool,
    focus: bool,
    drag: bool,
}

/// Logo marquee state.
#[derive(Debug, Clone)]
pub struct Marquee {
    options: MarqueeOptions,
    slides: Vec<MarqueeSlide>,
    widths: Vec<f32>,
    offset: f32,
    loop_width: f32,
    clock: FrameClock,
    holds: Holds,
    drag: DragGesture,
    live: Disposables,
}

impl Marquee {
    /// Marquee over `count` logos.
    #[must_use]
    pub fn new(count: usize, options: MarqueeOptions) -> Self {
        let copies = options.copies.max(1);
        let slides = (0..copies)
            .flat_map(|copy| {
                (0..count).map(move |item| MarqueeSlide {
                    item,
                    clone: copy > 0,
                })
            })
            .collect();
        let clock =
            FrameClock::new(Duration::from_millis(options.max_frame_delta_ms));
        let drag = DragGesture::new(options.swipe_threshold_px);
        let mut live = Disposables::new();
        live.start(FrameLoop::Marquee);
        Self {
            options,
            slides,
            widths: Vec::new(),
            offset: 0.0,
            loop_width: 0.0,
            clock,
            holds: Holds::default(),
            drag,
            live,
        }
    }

    /// Every slide in track order.
    #[must_use]
    pub fn slides(&self) -> &[MarqueeSlide] {
        &self.slides
    }

    /// Number of distinct logos.
    #[must_use]
    pub fn logo_count(&self) -> usize {
        self.slides.iter().filter(|s| !s.clone).count()
    }

    /// Record rendered slide widths in track order. Only the non-clone
    /// slides contribute to the loop width. Call again after a resize.
    pub fn measure(&mut self, rendered_widths: &[f32]) {
        self.widths = self
            .slides
            .iter()
            .zip(rendered_widths)
            .filter(|(slide, _)| !slide.clone)
            .map(|(_, w)| w.max(0.0))
            .collect();
        self.loop_width = self.widths.iter().sum();
        self.wrap();
        log::debug!(
            "marquee measured {} logos, loop width {:.1}px",
            self.widths.len(),
            self.loop_width
        );
    }

    /// Width of one un-cloned copy of the set.
    #[must_use]
    pub fn loop_width(&self) -> f32 {
        self.loop_width
    }

    /// Current offset in `[0, loop_width)`.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Horizontal translate to apply to the track.
    #[must_use]
    pub fn translate(&self) -> f32 {
        -self.offset
    }

    /// Seconds for one full loop at the configured speed.
    #[must_use]
    pub fn period_secs(&self) -> Option<f32> {
        (self.options.speed_px_per_s > 0.0 && self.loop_width > 0.0)
            .then(|| self.loop_width / self.options.speed_px_per_s)
    }

    /// Whether autoplay is held by hover, focus, a drag or a cooldown.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.holds.hover
            || self.holds.focus
            || self.holds.drag
            || self.resume_deadline().is_some()
    }

    /// Whether the host should keep scheduling animation frames.
    #[must_use]
    pub fn needs_frames(&self) -> bool {
        self.is_running() && self.loop_width > 0.0 && !self.is_paused()
    }

    /// Whether the frame loop has been started and not stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.live.is_running(FrameLoop::Marquee)
    }

    /// Live frame loop and cooldown.
    #[must_use]
    pub fn disposables(&self) -> &Disposables {
        &self.live
    }

    /// Start the frame loop.
    pub fn start(&mut self) {
        self.live.start(FrameLoop::Marquee);
        self.clock.reset();
    }

    /// Cancel the frame loop (reduced motion). Offset is kept.
    pub fn stop(&mut self) {
        let _ = self.live.stop(FrameLoop::Marquee);
        self.clock.reset();
    }

    /// Time at which a drag cooldown ends, if one is pending.
    #[must_use]
    pub fn resume_deadline(&self) -> Option<Instant> {
        self.live.deadline(TimerKind::Cooldown)
    }

    /// Advance one animation frame. Returns the translate to apply.
    pub fn tick(&mut self, now: Instant) -> f32 {
        if self.live.fire(TimerKind::Cooldown, now) {
            self.clock.reset();
        }
        if self.needs_frames() {
            let dt = self.clock.tick(now);
            self.offset += self.options.speed_px_per_s * dt.as_secs_f32();
            self.wrap();
        }
        self.translate()
    }

    /// Keep the offset in `[0, loop_width)`. `rem_euclid` can round a tiny
    /// negative value up to exactly `loop_width`.
    fn wrap(&mut self) {
        self.offset = if self.loop_width > 0.0 {
            let wrapped = self.offset.rem_euclid(self.loop_width);
            if wrapped >= self.loop_width {
                0.0
            } else {
                wrapped
            }
        } else {
            0.0
        };
    }

    fn hold_changed(&mut self) {
        if self.is_paused() {
            self.clock.reset();
        }
    }

    /// Index of the logo whose left edge is at or before the offset.
    fn logo_at(&self) -> usize {
        let mut edge = 0.0;
        for (i, w) in self.widths.iter().enumerate() {
            if self.offset < edge + w {
                return i;
            }
            edge += w;
        }
        0
    }

    /// Shift the strip by one logo width.
    fn step(&mut self, swipe: Swipe) {
        let n = self.widths.len();
        if n == 0 {
            return;
        }
        let at = self.logo_at();
        self.offset += match swipe {
            Swipe::Next => self.widths[at],
            Swipe::Prev => -self.widths[(at + n - 1) % n],
        };
        self.wrap();
    }

    /// Route one input event. Returns true if the strip was stepped.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> bool {
        match event {
            InputEvent::PointerEnter => self.holds.hover = true,
            InputEvent::PointerLeave => self.holds.hover = false,
            InputEvent::FocusIn => self.holds.focus = true,
            InputEvent::FocusOut => self.holds.focus = false,
            InputEvent::PointerDown { x } => {
                self.drag.press(x);
                self.holds.drag = true;
                let _ = self.live.cancel(TimerKind::Cooldown);
            }
            InputEvent::PointerMove { x } => {
                let _ = self.drag.motion(x);
            }
            InputEvent::PointerUp { x } if self.drag.is_pressed() => {
                let swipe = self.drag.release(x);
                if let Some(swipe) = swipe {
                    self.step(swipe);
                }
                self.end_drag(now);
                return swipe.is_some();
            }
            InputEvent::PointerCancel if self.drag.is_pressed() => {
                self.drag.cancel();
                self.end_drag(now);
            }
            InputEvent::Key(key @ (Key::ArrowLeft | Key::ArrowRight)) => {
                self.step(if key == Key::ArrowRight {
                    Swipe::Next
                } else {
                    Swipe::Prev
                });
                self.end_drag(now);
                return !self.widths.is_empty();
            }
            InputEvent::PointerUp { .. }
            | InputEvent::PointerCancel
            | InputEvent::Key(Key::Other) => {}
        }
        self.hold_changed();
        false
    }

    fn end_drag(&mut self, now: Instant) {
        self.holds.drag = false;
        let cooldown = self.options.resume.cooldown();
        if cooldown.is_zero() {
            let _ = self.live.cancel(TimerKind::Cooldown);
        } else {
            let _ = self.live.arm(TimerKind::Cooldown, now + cooldown);
        }
        self.hold_changed();
    }

    /// Cancel the frame loop and any pending cooldown (unmount).
    pub fn teardown(&mut self) {
        let released = self.live.release_all();
        log::debug!("marquee torn down, {} resource(s) released", released.len());
        self.clock.reset();
        self.drag.cancel();
        self.holds = Holds::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ResumePolicy;

    fn measured(count: usize, width: f32) -> Marquee {
        let mut m = Marquee::new(count, MarqueeOptions::default());
        let widths = vec![width; m.slides().len()];
        m.measure(&widths);
        m
    }

    fn frames(m: &mut Marquee, start: Instant, n: u32, step: Duration) -> Instant {
        let mut now = start;
        for _ in 0..n {
            now += step;
            let _ = m.tick(now);
        }
        now
    }

    #[test]
    fn track_holds_three_copies_with_clones_marked() {
        let m = Marquee::new(9, MarqueeOptions::default());
        assert_eq!(m.slides().len(), 27);
        assert_eq!(m.slides().iter().filter(|s| !s.clone).count(), 9);
        assert!(m.slides()[..9].iter().all(|s| !s.clone));
        assert_eq!(m.logo_count(), 9);
    }

    #[test]
    fn loop_width_ignores_clones() {
        let mut m = Marquee::new(3, MarqueeOptions::default());
        m.measure(&[100.0, 150.0, 50.0, 999.0, 999.0, 999.0, 1.0, 1.0, 1.0]);
        assert_eq!(m.loop_width(), 300.0);
    }

    #[test]
    fn offset_advances_at_speed_and_wraps() {
        let mut m = measured(2, 50.0);
        let t0 = Instant::now();
        let _ = m.tick(t0);
        let t1 = frames(&mut m, t0, 10, Duration::from_millis(100));
        assert!((m.offset() - 40.0).abs() < 1e-3);
        let _ = frames(&mut m, t1, 20, Duration::from_millis(100));
        // 120px travelled over a 100px loop
        assert!((m.offset() - 20.0).abs() < 1e-3);
        assert!(m.offset() >= 0.0 && m.offset() < m.loop_width());
    }

    #[test]
    fn frame_gaps_are_clamped() {
        let mut m = measured(4, 100.0);
        let t0 = Instant::now();
        let _ = m.tick(t0);
        let _ = m.tick(t0 + Duration::from_secs(30));
        assert!((m.offset() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn hover_pauses_and_resume_does_not_jump() {
        let mut m = measured(4, 100.0);
        let t0 = Instant::now();
        let _ = m.tick(t0);
        let _ = m.handle_input(InputEvent::PointerEnter, t0);
        assert!(!m.needs_frames());
        let _ = frames(&mut m, t0, 10, Duration::from_millis(100));
        assert_eq!(m.offset(), 0.0);
        let t1 = t0 + Duration::from_secs(1);
        let _ = m.handle_input(InputEvent::PointerLeave, t1);
        let _ = m.tick(t1 + Duration::from_millis(80));
        assert_eq!(m.offset(), 0.0, "first frame after resume is zero");
    }

    #[test]
    fn drag_steps_one_logo_and_resumes_after_cooldown() {
        let mut m = Marquee::new(3, MarqueeOptions::default());
        m.measure(&[100.0, 150.0, 50.0]);
        let t0 = Instant::now();
        let _ = m.handle_input(InputEvent::PointerDown { x: 200.0 }, t0);
        assert!(m.handle_input(InputEvent::PointerUp { x: 140.0 }, t0));
        assert_eq!(m.offset(), 100.0);
        assert!(m.is_paused());
        let _ = m.tick(t0 + Duration::from_millis(2999));
        assert!(m.is_paused());
        let _ = m.tick(t0 + Duration::from_millis(3000));
        assert!(!m.is_paused());

        let _ = m.handle_input(InputEvent::PointerDown { x: 0.0 }, t0);
        assert!(m.handle_input(InputEvent::PointerUp { x: 80.0 }, t0));
        assert_eq!(m.offset(), 0.0);
        let _ = m.handle_input(InputEvent::PointerDown { x: 0.0 }, t0);
        assert!(m.handle_input(InputEvent::PointerUp { x: 80.0 }, t0));
        assert_eq!(m.offset(), 250.0, "wraps backwards onto the last logo");
    }

    #[test]
    fn step_back_from_just_below_a_logo_edge_stays_in_range() {
        let mut m = Marquee::new(2, MarqueeOptions::default());
        m.measure(&[100.0, 50.0]);
        m.offset = f32::from_bits(50.0_f32.to_bits() - 1);
        assert!(m.handle_input(InputEvent::Key(Key::ArrowLeft), Instant::now()));
        assert!(m.offset() >= 0.0);
        assert!(m.offset() < m.loop_width(), "offset {}", m.offset());
    }

    #[test]
    fn teardown_releases_loop_and_cooldown() {
        let mut m = measured(3, 100.0);
        let t0 = Instant::now();
        assert!(m.handle_input(InputEvent::Key(Key::ArrowRight), t0));
        assert!(m.resume_deadline().is_some());
        assert_eq!(m.disposables().len(), 2);
        m.teardown();
        assert!(m.disposables().is_empty());
        assert!(!m.is_running());
        assert!(m.resume_deadline().is_none());
    }

    #[test]
    fn short_drag_does_not_step() {
        let mut m = measured(3, 100.0);
        let t0 = Instant::now();
        let _ = m.handle_input(InputEvent::PointerDown { x: 0.0 }, t0);
        assert!(!m.handle_input(InputEvent::PointerUp { x: 49.0 }, t0));
        assert_eq!(m.offset(), 0.0);
    }

    #[test]
    fn immediate_policy_resumes_on_release() {
        let mut m = Marquee::new(
            2,
            MarqueeOptions {
                resume: ResumePolicy::Immediate,
                ..MarqueeOptions::default()
            },
        );
        m.measure(&[10.0, 10.0]);
        let t0 = Instant::now();
        let _ = m.handle_input(InputEvent::PointerDown { x: 0.0 }, t0);
        let _ = m.handle_input(InputEvent::PointerUp { x: 0.0 }, t0);
        assert!(!m.is_paused());
    }

    #[test]
    fn unmeasured_or_stopped_marquee_stays_put() {
        let mut m = Marquee::new(5, MarqueeOptions::default());
        let t0 = Instant::now();
        let _ = frames(&mut m, t0, 5, Duration::from_millis(16));
        assert_eq!(m.offset(), 0.0);
        assert_eq!(m.period_secs(), None);

        let mut m = measured(5, 100.0);
        m.teardown();
        assert!(!m.needs_frames());
        let _ = frames(&mut m, t0, 5, Duration::from_millis(16));
        assert_eq!(m.offset(), 0.0);
    }
}
