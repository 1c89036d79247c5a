//! Explicit teardown bookkeeping.
//!
//! Every listener, timer, frame loop and tween a controller creates is held
//! here, and the controller reads its live state back from the arena: a
//! timer's deadline lives in its [`Resource::Timer`] entry, a frame loop runs
//! only while its entry exists. One [`Disposables::release_all`] call on
//! unmount or device-class change therefore stops everything at once.

use web_time::Instant;

use crate::layer::LayerKind;

/// What a timer is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Next carousel autoplay step.
    Autoplay,
    /// Carousel autoplay resuming after a drag.
    Resume,
    /// Marquee autoplay resuming after a drag or arrow key.
    Cooldown,
    /// Debounced re-bind after a resize.
    Rebind,
}

/// A self-rescheduling animation frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameLoop {
    /// Hero pointer-follow parallax.
    Pointer,
    /// Logo marquee autoplay.
    Marquee,
}

/// A live resource owned by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Passive scroll listener driving a section's bindings.
    ScrollListener,
    /// One-shot timer due at `at`.
    Timer {
        /// Purpose.
        kind: TimerKind,
        /// Deadline.
        at: Instant,
    },
    /// Animation frame loop.
    FrameLoop(FrameLoop),
    /// Scroll-bound or clock-driven tween on one layer.
    Tween(LayerKind),
}

/// Handle to a registered resource. Never reused within one arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

/// Arena of live resources.
#[derive(Debug, Clone, Default)]
pub struct Disposables {
    live: Vec<(ResourceId, Resource)>,
    next: u64,
}

impl Disposables {
    /// Empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resource and return its handle.
    pub fn register(&mut self, resource: Resource) -> ResourceId {
        let id = ResourceId(self.next);
        self.next += 1;
        self.live.push((id, resource));
        id
    }

    /// Release one resource early. Returns it if it was still live.
    pub fn release(&mut self, id: ResourceId) -> Option<Resource> {
        let pos = self.live.iter().position(|(live, _)| *live == id)?;
        Some(self.live.remove(pos).1)
    }

    /// Release everything, newest first, and return what was live.
    pub fn release_all(&mut self) -> Vec<Resource> {
        let released: Vec<Resource> =
            self.live.drain(..).rev().map(|(_, r)| r).collect();
        if !released.is_empty() {
            log::trace!("released {} resource(s)", released.len());
        }
        released
    }

    /// Live resources, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.live.iter().map(|(_, r)| r)
    }

    /// Number of live resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether nothing is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of live resources equal to `resource`.
    #[must_use]
    pub fn count(&self, resource: Resource) -> usize {
        self.iter().filter(|r| **r == resource).count()
    }

    /// Whether any live resource equals `resource`.
    #[must_use]
    pub fn contains(&self, resource: Resource) -> bool {
        self.iter().any(|r| *r == resource)
    }

    // ── Timers ───────────────────────────────────────────────────────────

    fn timer(&self, kind: TimerKind) -> Option<(ResourceId, Instant)> {
        self.live.iter().find_map(|(id, r)| match *r {
            Resource::Timer { kind: k, at } if k == kind => Some((*id, at)),
            _ => None,
        })
    }

    /// Set the `kind` timer to fire at `at`, replacing any pending one.
    pub fn arm(&mut self, kind: TimerKind, at: Instant) -> ResourceId {
        let _ = self.cancel(kind);
        self.register(Resource::Timer { kind, at })
    }

    /// Deadline of the pending `kind` timer.
    #[must_use]
    pub fn deadline(&self, kind: TimerKind) -> Option<Instant> {
        self.timer(kind).map(|(_, at)| at)
    }

    /// Drop the pending `kind` timer. Returns true if one was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.timer(kind)
            .and_then(|(id, _)| self.release(id))
            .is_some()
    }

    /// Release the `kind` timer if it is due at `now`. Returns true if it
    /// fired.
    pub fn fire(&mut self, kind: TimerKind, now: Instant) -> bool {
        match self.timer(kind) {
            Some((id, at)) if now >= at => self.release(id).is_some(),
            _ => false,
        }
    }

    /// Number of pending timers.
    #[must_use]
    pub fn timers(&self) -> usize {
        self.iter()
            .filter(|r| matches!(r, Resource::Timer { .. }))
            .count()
    }

    // ── Frame loops ──────────────────────────────────────────────────────

    /// Start a frame loop unless it already runs.
    pub fn start(&mut self, frame_loop: FrameLoop) {
        if !self.is_running(frame_loop) {
            let _ = self.register(Resource::FrameLoop(frame_loop));
        }
    }

    /// Cancel a frame loop. Returns true if it was running.
    pub fn stop(&mut self, frame_loop: FrameLoop) -> bool {
        let id = self
            .live
            .iter()
            .find(|(_, r)| *r == Resource::FrameLoop(frame_loop))
            .map(|(id, _)| *id);
        id.and_then(|id| self.release(id)).is_some()
    }

    /// Whether a frame loop is running.
    #[must_use]
    pub fn is_running(&self, frame_loop: FrameLoop) -> bool {
        self.contains(Resource::FrameLoop(frame_loop))
    }
}
