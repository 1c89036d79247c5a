//! Reveal sequencer: threshold-triggered, reversible enter animations.
//!
//! When the section's top crosses a fixed viewport line the sequence plays
//! forward; scrolling back above the line plays it in reverse. On desktop
//! and tablet the sequence includes the "highlight wipe": a bar behind each
//! keyword grows from the left while the keyword's text color follows a
//! little later, keywords one after another. Below the tablet breakpoint
//! bars and colors are assigned their final values up front and only the
//! block fade/rise is animated.

pub mod timeline;

use rustc_hash::FxHashMap;
pub use timeline::{Direction, RevealTarget, Timeline, Tween};
use web_time::Duration;

use crate::options::RevealOptions;
use crate::scroll::{Edge, ScrollState, SectionRect};
use crate::transform::{Property, Transform};
use crate::viewport::ViewportClass;

/// Content of a section's reveal: block and keyword counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealContent {
    /// Heading/text/button groups, in reading order.
    pub blocks: usize,
    /// Highlighted keywords, in reading order.
    pub keywords: usize,
}

/// Crossing of a [`ThresholdTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Scrolled down past the line.
    Enter,
    /// Scrolled back up above the line.
    LeaveBack,
}

/// Fires when a section edge crosses a fixed viewport line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTrigger {
    edge: Edge,
    past: bool,
}

impl ThresholdTrigger {
    /// Trigger when the section top reaches `viewport_fraction` of the
    /// viewport height.
    #[must_use]
    pub fn at_top(viewport_fraction: f32) -> Self {
        Self {
            edge: Edge::new(0.0, viewport_fraction),
            past: false,
        }
    }

    /// Whether the line has been crossed.
    #[must_use]
    pub fn is_past(&self) -> bool {
        self.past
    }

    /// Compare against the current scroll position.
    pub fn update(
        &mut self,
        rect: SectionRect,
        scroll: ScrollState,
    ) -> Option<Crossing> {
        let line = self.edge.scroll_offset(rect, scroll.viewport_height);
        let past = scroll.y >= line;
        if past == self.past {
            return None;
        }
        self.past = past;
        Some(if past {
            Crossing::Enter
        } else {
            Crossing::LeaveBack
        })
    }
}

/// A section's reveal timeline plus its trigger.
#[derive(Debug, Clone)]
pub struct RevealSequencer {
    timeline: Timeline,
    trigger: ThresholdTrigger,
    values: FxHashMap<RevealTarget, Transform>,
}

impl RevealSequencer {
    /// Build the sequence for `content` at the given device class.
    #[must_use]
    pub fn new(
        content: RevealContent,
        options: &RevealOptions,
        class: ViewportClass,
    ) -> Self {
        let timeline = if class.is_mobile() {
            simplified(content, options)
        } else {
            highlighted(content, options)
        };
        let mut sequencer = Self {
            timeline,
            trigger: ThresholdTrigger::at_top(options.trigger_viewport),
            values: FxHashMap::default(),
        };
        sequencer.refresh();
        sequencer
    }

    /// Underlying timeline.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current values per target.
    #[must_use]
    pub fn values(&self) -> &FxHashMap<RevealTarget, Transform> {
        &self.values
    }

    /// Value of one target, if it takes part in the sequence.
    #[must_use]
    pub fn value(&self, target: RevealTarget) -> Option<&Transform> {
        self.values.get(&target)
    }

    /// Whether the timeline is moving.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.timeline.direction() != Direction::Paused
    }

    /// Check the trigger and advance the timeline by `dt`.
    pub fn update(&mut self, rect: SectionRect, scroll: ScrollState, dt: Duration) {
        match self.trigger.update(rect, scroll) {
            Some(Crossing::Enter) => self.timeline.play(),
            Some(Crossing::LeaveBack) => self.timeline.reverse(),
            None => {}
        }
        let _ = self.timeline.advance(dt);
        self.refresh();
    }

    /// Jump to the final state (reduced motion).
    pub fn finish(&mut self) {
        self.timeline.finish();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.values.clear();
        self.timeline.sample(&mut self.values);
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn block_tweens(timeline: &mut Timeline, blocks: usize, options: &RevealOptions) {
    for i in 0..blocks {
        let start = ms(options.block_stagger_ms) * i as u32;
        let duration = ms(options.block_duration_ms);
        timeline.push(Tween {
            target: RevealTarget::Block(i),
            property: Property::Opacity,
            from: 0.0,
            to: 1.0,
            start,
            duration,
            easing: options.block_easing,
        });
        timeline.push(Tween {
            target: RevealTarget::Block(i),
            property: Property::TranslateY,
            from: options.rise_px,
            to: 0.0,
            start,
            duration,
            easing: options.block_easing,
        });
    }
}

/// Desktop/tablet: block fades, then keyword wipes one after another, each
/// keyword's color change lagging its bar.
fn highlighted(content: RevealContent, options: &RevealOptions) -> Timeline {
    let mut timeline = Timeline::new();
    block_tweens(&mut timeline, content.blocks, options);

    let wipe = ms(options.wipe_duration_ms);
    let lag = if options.color_lag.is_finite() {
        wipe.mul_f32(options.color_lag.clamp(0.0, 1.0))
    } else {
        Duration::ZERO
    };
    let first = if content.blocks > 0 {
        ms(options.block_duration_ms) / 2
    } else {
        Duration::ZERO
    };
    for k in 0..content.keywords {
        let start = first + ms(options.keyword_stagger_ms) * k as u32;
        timeline.push(Tween {
            target: RevealTarget::Bar(k),
            property: Property::ScaleX,
            from: 0.0,
            to: 1.0,
            start,
            duration: wipe,
            easing: options.wipe_easing,
        });
        timeline.push(Tween {
            target: RevealTarget::Keyword(k),
            property: Property::ColorMix,
            from: 0.0,
            to: 1.0,
            start: start + lag,
            duration: ms(options.color_duration_ms),
            easing: options.block_easing,
        });
    }
    timeline
}

/// Mobile: bars and colors land in their final state immediately; only
/// blocks fade and rise.
fn simplified(content: RevealContent, options: &RevealOptions) -> Timeline {
    let mut timeline = Timeline::new();
    for k in 0..content.keywords {
        timeline.set(RevealTarget::Bar(k), Property::ScaleX, 1.0);
        timeline.set(RevealTarget::Keyword(k), Property::ColorMix, 1.0);
    }
    block_tweens(&mut timeline, content.blocks, options);
    timeline
}
