#![forbid(unsafe_code)]

//! Motion states, events, and the transition timeline.
//!
//! Overlay hosts and their mounted content speak one animation vocabulary:
//!
//! - [`MotionState`]: where a transition is coming from or going to
//!   (`Closed`, `Opening`, `Open`, `Closing`, or a content-defined `Other`).
//! - [`MotionEvent`]: one report from a transition hook, either the
//!   [`Start`](MotionHook::Start) or the [`Done`](MotionHook::Done) of a
//!   `from → to` move.
//! - [`MotionTimeline`]: the content-side phase machine that produces those
//!   events in the right order while tracking interpolation progress.
//! - [`ZoomOrigin`]: the point a zoom entrance grows out of, derived once
//!   from a [`PointerSample`].
//!
//! The host never drives the timeline; it only consumes the events. Content
//! that reports through a `MotionTimeline` automatically satisfies the
//! ordering contract hosts rely on.
//!
//! # Invariants
//!
//! 1. Timeline progress stays within `[0.0, 1.0]`; easing may overshoot only
//!    via [`Easing::Back`], and only in [`Easing::apply`] output.
//! 2. The timeline phase is always one of the four canonical states, never
//!    [`MotionState::Other`].
//! 3. Every completion event follows a matching start event: a
//!    `Done(.., Open)` is produced only while the most recent start headed to
//!    `Opening`, and likewise for `Closed`/`Closing`.
//! 4. Reversing mid-transition preserves momentum: interrupting a close 30%
//!    of the way in starts the reopen 70% of the way in.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use dais_core::motion::{MotionConfig, MotionTimeline};
//!
//! let config = MotionConfig::default();
//! let mut timeline = MotionTimeline::new();
//!
//! let start = timeline.start_opening().unwrap();
//! assert!(start.is_start());
//! // ...render frames...
//! let done = timeline.tick(Duration::from_millis(250), &config).unwrap();
//! assert!(done.is_done());
//! assert!(timeline.is_open());
//! ```

use std::time::Duration;

use crate::geometry::{Point, Size};

/// Duration substituted for both directions when reduced motion applies.
const REDUCED_MOTION_DURATION: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// States and events
// ---------------------------------------------------------------------------

/// A position in the enter/leave cycle, as named in transition events.
///
/// The four canonical states are the resting and moving points of the cycle
/// `Closed → Opening → Open → Closing → Closed`. `Other` carries any
/// content-defined state a host should route through without interpreting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MotionState {
    /// Fully dismissed; nothing to render.
    Closed,
    /// Enter transition in progress.
    Opening,
    /// Fully presented and interactive.
    Open,
    /// Leave transition in progress.
    Closing,
    /// A state outside the canonical cycle, preserved verbatim.
    Other(String),
}

impl MotionState {
    /// Whether a transition is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Whether content in this state should be rendered at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Opening | Self::Open | Self::Closing)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for MotionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which transition hook produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionHook {
    /// The transition just began.
    Start,
    /// The transition just finished.
    Done,
}

/// One report from a transition hook: `from → to`, at start or completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionEvent {
    pub hook: MotionHook,
    pub from: MotionState,
    pub to: MotionState,
}

impl MotionEvent {
    /// A start-hook report for the move `from → to`.
    #[must_use]
    pub fn start(from: MotionState, to: MotionState) -> Self {
        Self {
            hook: MotionHook::Start,
            from,
            to,
        }
    }

    /// A done-hook report for the move `from → to`.
    #[must_use]
    pub fn done(from: MotionState, to: MotionState) -> Self {
        Self {
            hook: MotionHook::Done,
            from,
            to,
        }
    }

    /// The canonical enter start: `Closed → Opening`.
    #[must_use]
    pub fn opening() -> Self {
        Self::start(MotionState::Closed, MotionState::Opening)
    }

    /// The canonical enter completion: `Opening → Open`.
    #[must_use]
    pub fn opened() -> Self {
        Self::done(MotionState::Opening, MotionState::Open)
    }

    /// The canonical leave start: `Open → Closing`.
    #[must_use]
    pub fn closing() -> Self {
        Self::start(MotionState::Open, MotionState::Closing)
    }

    /// The canonical leave completion: `Closing → Closed`.
    #[must_use]
    pub fn closed() -> Self {
        Self::done(MotionState::Closing, MotionState::Closed)
    }

    #[must_use]
    pub fn is_start(&self) -> bool {
        self.hook == MotionHook::Start
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.hook == MotionHook::Done
    }
}

impl std::fmt::Display for MotionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hook = match self.hook {
            MotionHook::Start => "start",
            MotionHook::Done => "done",
        };
        write!(f, "{hook}: {} -> {}", self.from, self.to)
    }
}

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Easing curves for transition rendering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Smooth ease-out (decelerating) - good for entrances.
    #[default]
    EaseOut,
    /// Smooth ease-in (accelerating) - good for exits.
    EaseIn,
    /// Smooth S-curve - good for general transitions.
    EaseInOut,
    /// Slight overshoot then settle - bouncy feel.
    Back,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::Back => {
                // Back ease-out: slight overshoot then settle.
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let shifted = t - 1.0;
                1.0 + c3 * shifted * shifted * shifted + c1 * shifted * shifted
            }
        }
    }

    /// Whether this easing can produce values outside 0.0-1.0.
    #[must_use]
    pub fn can_overshoot(self) -> bool {
        matches!(self, Self::Back)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing configuration for enter and leave transitions.
#[derive(Debug, Clone)]
pub struct MotionConfig {
    /// Duration of the enter transition.
    pub enter_duration: Duration,
    /// Duration of the leave transition.
    pub exit_duration: Duration,
    /// Easing applied while entering.
    pub enter_easing: Easing,
    /// Easing applied while leaving.
    pub exit_easing: Easing,
    /// Whether to honor a reduced-motion preference.
    pub respect_reduced_motion: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enter_duration: Duration::from_millis(200),
            exit_duration: Duration::from_millis(150),
            enter_easing: Easing::EaseOut,
            exit_easing: Easing::EaseIn,
            respect_reduced_motion: true,
        }
    }
}

impl MotionConfig {
    /// Create a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that completes every transition on the first tick.
    #[must_use]
    pub fn none() -> Self {
        Self {
            enter_duration: Duration::ZERO,
            exit_duration: Duration::ZERO,
            ..Default::default()
        }
    }

    /// The configuration substituted when reduced motion applies: short,
    /// linear, no overshoot.
    #[must_use]
    pub fn reduced_motion() -> Self {
        Self {
            enter_duration: REDUCED_MOTION_DURATION,
            exit_duration: REDUCED_MOTION_DURATION,
            enter_easing: Easing::Linear,
            exit_easing: Easing::Linear,
            respect_reduced_motion: true,
        }
    }

    /// Set the enter duration.
    #[must_use]
    pub fn enter_duration(mut self, duration: Duration) -> Self {
        self.enter_duration = duration;
        self
    }

    /// Set the leave duration.
    #[must_use]
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    /// Set the enter easing function.
    #[must_use]
    pub fn enter_easing(mut self, easing: Easing) -> Self {
        self.enter_easing = easing;
        self
    }

    /// Set the leave easing function.
    #[must_use]
    pub fn exit_easing(mut self, easing: Easing) -> Self {
        self.exit_easing = easing;
        self
    }

    /// Set whether to honor a reduced-motion preference.
    #[must_use]
    pub fn respect_reduced_motion(mut self, respect: bool) -> Self {
        self.respect_reduced_motion = respect;
        self
    }

    /// The effective config, applying reduced motion if requested and honored.
    #[must_use]
    pub fn effective(&self, reduced_motion: bool) -> Self {
        if reduced_motion && self.respect_reduced_motion {
            Self::reduced_motion()
        } else {
            self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Content-side transition state machine.
///
/// Cycles `Closed → Opening → Open → Closing → Closed`, emitting the
/// [`MotionEvent`] a hook should report at each boundary. Rapid direction
/// changes reverse in place, preserving momentum, and report the real
/// interrupted `from` state.
#[derive(Debug, Clone)]
pub struct MotionTimeline {
    phase: MotionState,
    /// Progress within the current transition (0.0 to 1.0).
    progress: f64,
    reduced_motion: bool,
}

impl Default for MotionTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionTimeline {
    /// Create a timeline at rest in `Closed`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: MotionState::Closed,
            progress: 0.0,
            reduced_motion: false,
        }
    }

    /// Create a timeline already at rest in `Open` (instant presentation).
    #[must_use]
    pub fn open() -> Self {
        Self {
            phase: MotionState::Open,
            progress: 1.0,
            reduced_motion: false,
        }
    }

    /// The current phase. Always one of the four canonical states.
    #[must_use]
    pub fn phase(&self) -> MotionState {
        self.phase.clone()
    }

    /// Raw progress through the current transition (0.0 to 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Presentation progress after easing: 0.0 fully closed, 1.0 fully open.
    #[must_use]
    pub fn eased_progress(&self, config: &MotionConfig) -> f64 {
        let config = config.effective(self.reduced_motion);
        match self.phase {
            MotionState::Opening => config.enter_easing.apply(self.progress),
            MotionState::Closing => 1.0 - config.exit_easing.apply(self.progress),
            MotionState::Open => 1.0,
            MotionState::Closed | MotionState::Other(_) => 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase.is_visible()
    }

    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase == MotionState::Open
    }

    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.phase == MotionState::Closed
    }

    /// Set the reduced-motion preference for subsequent ticks.
    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
    }

    /// Begin the enter transition.
    ///
    /// Returns the start event the hook should report, or `None` when already
    /// opening or open. Interrupting a close reverses in place with momentum
    /// preserved and reports `Closing → Opening`.
    pub fn start_opening(&mut self) -> Option<MotionEvent> {
        match self.phase {
            MotionState::Closed => {
                self.phase = MotionState::Opening;
                self.progress = 0.0;
                Some(MotionEvent::opening())
            }
            MotionState::Closing => {
                self.phase = MotionState::Opening;
                // 30% of the way out becomes 70% of the way in.
                self.progress = 1.0 - self.progress;
                Some(MotionEvent::start(MotionState::Closing, MotionState::Opening))
            }
            MotionState::Opening | MotionState::Open | MotionState::Other(_) => None,
        }
    }

    /// Begin the leave transition.
    ///
    /// Returns the start event the hook should report, or `None` when already
    /// closing or closed. Interrupting an open reverses in place with
    /// momentum preserved and reports `Opening → Closing`.
    pub fn start_closing(&mut self) -> Option<MotionEvent> {
        match self.phase {
            MotionState::Open => {
                self.phase = MotionState::Closing;
                self.progress = 0.0;
                Some(MotionEvent::closing())
            }
            MotionState::Opening => {
                self.phase = MotionState::Closing;
                self.progress = 1.0 - self.progress;
                Some(MotionEvent::start(MotionState::Opening, MotionState::Closing))
            }
            MotionState::Closing | MotionState::Closed | MotionState::Other(_) => None,
        }
    }

    /// Jump to fully open without a transition. No event is produced.
    pub fn force_open(&mut self) {
        self.phase = MotionState::Open;
        self.progress = 1.0;
    }

    /// Jump to fully closed without a transition. No event is produced.
    pub fn force_close(&mut self) {
        self.phase = MotionState::Closed;
        self.progress = 0.0;
    }

    /// Advance the transition by `delta`.
    ///
    /// Returns the completion event the hook should report when the current
    /// transition finishes on this tick, `None` otherwise. A zero-duration
    /// direction completes on its first tick.
    pub fn tick(&mut self, delta: Duration, config: &MotionConfig) -> Option<MotionEvent> {
        let delta_secs = delta.as_secs_f64().max(0.0);
        let config = config.effective(self.reduced_motion);

        match self.phase {
            MotionState::Opening => {
                let duration = config.enter_duration.as_secs_f64();
                if duration > 0.0 {
                    self.progress += delta_secs / duration;
                } else {
                    self.progress = 1.0;
                }
                self.progress = self.progress.min(1.0);

                if self.progress >= 1.0 {
                    self.phase = MotionState::Open;
                    self.progress = 1.0;
                    return Some(MotionEvent::opened());
                }
            }
            MotionState::Closing => {
                let duration = config.exit_duration.as_secs_f64();
                if duration > 0.0 {
                    self.progress += delta_secs / duration;
                } else {
                    self.progress = 1.0;
                }
                self.progress = self.progress.min(1.0);

                if self.progress >= 1.0 {
                    self.phase = MotionState::Closed;
                    self.progress = 0.0;
                    return Some(MotionEvent::closed());
                }
            }
            MotionState::Open | MotionState::Closed | MotionState::Other(_) => {}
        }

        None
    }
}

// ---------------------------------------------------------------------------
// Zoom origin
// ---------------------------------------------------------------------------

/// The surface position that triggered an overlay, with the viewport it was
/// measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSample {
    pub position: Point,
    pub viewport: Size,
}

impl PointerSample {
    #[must_use]
    pub fn new(position: Point, viewport: Size) -> Self {
        Self { position, viewport }
    }
}

/// Seed values for a zoom entrance: where the content grows out from.
///
/// `offset_x`/`offset_y` are the pointer's displacement from the viewport
/// center in cells; `origin_x`/`origin_y` are the pointer's fractional
/// position within the viewport (0.0 to 1.0). `scale` is the content's
/// starting scale, always zero for a zoom-from-point entrance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomOrigin {
    pub offset_x: i32,
    pub offset_y: i32,
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale: f64,
}

impl Default for ZoomOrigin {
    /// Centered origin with zero scale, used when no pointer is known.
    fn default() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            origin_x: 0.5,
            origin_y: 0.5,
            scale: 0.0,
        }
    }
}

impl ZoomOrigin {
    /// Derive the origin from a pointer sample.
    ///
    /// An empty viewport yields the default centered origin; fractional
    /// positions are clamped to the viewport even if the sample lies outside
    /// it.
    #[must_use]
    pub fn from_sample(sample: &PointerSample) -> Self {
        if sample.viewport.is_empty() {
            return Self::default();
        }
        let width = i32::from(sample.viewport.width);
        let height = i32::from(sample.viewport.height);
        let x = i32::from(sample.position.x);
        let y = i32::from(sample.position.y);
        Self {
            offset_x: x - width / 2,
            offset_y: y - height / 2,
            origin_x: (f64::from(sample.position.x) / f64::from(sample.viewport.width))
                .clamp(0.0, 1.0),
            origin_y: (f64::from(sample.position.y) / f64::from(sample.viewport.height))
                .clamp(0.0, 1.0),
            scale: 0.0,
        }
    }

    /// The fractional origin as percentages, for renderers that speak them.
    #[must_use]
    pub fn origin_percent(&self) -> (f64, f64) {
        (self.origin_x * 100.0, self.origin_y * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
