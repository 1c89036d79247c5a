//! Bidirectional tween timeline.
//!
//! The playhead moves forward while playing and backward while reversed;
//! sampling depends only on the playhead, so playing forward and then
//! reversing to zero restores every property to its pre-play value.

use rustc_hash::FxHashMap;
use web_time::Duration;

use crate::transform::{Property, Transform};
use crate::util::easing::EasingFunction;

/// A node animated by a reveal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RevealTarget {
    /// A heading/text/button group.
    Block(usize),
    /// A highlighted keyword's text.
    Keyword(usize),
    /// The bar behind a highlighted keyword.
    Bar(usize),
}

/// One property change on one target, positioned on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Node animated.
    pub target: RevealTarget,
    /// Property animated.
    pub property: Property,
    /// Value before `start`.
    pub from: f32,
    /// Value after `start + duration`.
    pub to: f32,
    /// Offset from the timeline start.
    pub start: Duration,
    /// Length of the change.
    pub duration: Duration,
    /// Curve of the change.
    pub easing: EasingFunction,
}

impl Tween {
    /// Value at timeline position `at`.
    #[must_use]
    pub fn value_at(&self, at: Duration) -> f32 {
        if at <= self.start {
            return self.from;
        }
        let elapsed = at - self.start;
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.evaluate(t)
    }

    /// Timeline position where this tween completes.
    #[must_use]
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }
}

/// Playback direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Not moving.
    #[default]
    Paused,
    /// Toward the end.
    Forward,
    /// Toward the start.
    Reverse,
}

/// An ordered batch of tweens with a shared playhead.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    tweens: Vec<Tween>,
    sets: Vec<(RevealTarget, Property, f32)>,
    playhead: Duration,
    direction: Direction,
}

impl Timeline {
    /// Empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tween. Tweens on the same target and property should not
    /// overlap in time.
    pub fn push(&mut self, tween: Tween) {
        self.tweens.push(tween);
    }

    /// Assign a value immediately, outside the animated timeline.
    pub fn set(&mut self, target: RevealTarget, property: Property, value: f32) {
        self.sets.push((target, property, value));
    }

    /// Tweens in insertion order.
    #[must_use]
    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// Total length of the timeline.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.tweens
            .iter()
            .map(Tween::end)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Current playhead.
    #[must_use]
    pub fn playhead(&self) -> Duration {
        self.playhead
    }

    /// Current direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Play toward the end from the current playhead.
    pub fn play(&mut self) {
        self.direction = Direction::Forward;
    }

    /// Play toward the start from the current playhead.
    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
    }

    /// Jump to the end and stop.
    pub fn finish(&mut self) {
        self.playhead = self.duration();
        self.direction = Direction::Paused;
    }

    /// Move the playhead by `dt` in the current direction. Returns true
    /// while still moving.
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.direction {
            Direction::Paused => false,
            Direction::Forward => {
                let end = self.duration();
                self.playhead = (self.playhead + dt).min(end);
                if self.playhead >= end {
                    self.direction = Direction::Paused;
                }
                self.direction == Direction::Forward
            }
            Direction::Reverse => {
                self.playhead = self.playhead.saturating_sub(dt);
                if self.playhead.is_zero() {
                    self.direction = Direction::Paused;
                }
                self.direction == Direction::Reverse
            }
        }
    }

    /// Write every target's values at the current playhead into `out`.
    ///
    /// Targets start from [`Transform::IDENTITY`]; immediate sets apply
    /// first, then each tween in start order.
    pub fn sample(&self, out: &mut FxHashMap<RevealTarget, Transform>) {
        for (target, property, value) in &self.sets {
            out.entry(*target)
                .or_insert(Transform::IDENTITY)
                .set(*property, *value);
        }
        let mut order: Vec<&Tween> = self.tweens.iter().collect();
        order.sort_by_key(|t| t.start);
        let mut seen: Vec<(RevealTarget, Property)> = Vec::new();
        for tween in order {
            let key = (tween.target, tween.property);
            let first = !seen.contains(&key);
            if first {
                seen.push(key);
            }
            // Later tweens on the same key only take over once started.
            if first || self.playhead > tween.start {
                out.entry(tween.target)
                    .or_insert(Transform::IDENTITY)
                    .set(tween.property, tween.value_at(self.playhead));
            }
        }
    }
}
