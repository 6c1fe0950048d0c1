#![forbid(unsafe_code)]

//! Per-gesture frame coalescing.
//!
//! A [`FrameScheduler`] decides *when* a gesture's motion update runs; it never
//! runs anything itself. Callers feed it `kick`, `end`, and frame ticks and
//! act on the returned [`FrameTask`]. This keeps the state machine free of
//! callbacks and trivially testable.
//!
//! # State machine
//!
//! ```text
//!            kick                      frame (dirty)
//!   Idle ───────────▶ Scheduled ◀────────────────────┐
//!    ▲                 │   │                          │
//!    │ frame (clean)   │   └──────── Update ──────────┘
//!    └─────────────────┘
//!   end: Idle → Finished (FinishNow)
//!        Scheduled → next frame yields Finish or UpdateThenFinish → Finished
//! ```
//!
//! After an `Update` the scheduler stays armed for one more frame. Kicks that
//! arrive during that frame are folded into the next update, so delivery is
//! bounded by the display refresh rate.

/// Interval used when the host has no per-frame callback.
pub const FALLBACK_FRAME_INTERVAL_MS: f64 = 25.0;

/// How frame ticks reach the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameTiming {
    /// The host calls `on_frame` from its animation-frame callback.
    #[default]
    Animation,
    /// The host polls with timestamps; ticks fire every
    /// [`FALLBACK_FRAME_INTERVAL_MS`].
    Timer,
}

/// Result of [`FrameScheduler::kick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// The scheduler left idle; the host must request a frame.
    Schedule,
    /// A frame is already pending; the new data rides along.
    AlreadyScheduled,
    /// The gesture has ended; the kick was dropped.
    Ignored,
}

/// Work to run on a frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    Update,
    Finish,
    UpdateThenFinish,
}

impl FrameTask {
    #[must_use]
    pub const fn runs_update(self) -> bool {
        matches!(self, Self::Update | Self::UpdateThenFinish)
    }

    #[must_use]
    pub const fn finishes(self) -> bool {
        matches!(self, Self::Finish | Self::UpdateThenFinish)
    }
}

/// Result of [`FrameScheduler::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndAction {
    /// Nothing is pending: run the final callback now.
    FinishNow,
    /// The final callback runs on the next frame.
    Deferred,
    /// `end` was already requested.
    AlreadyEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Scheduled { dirty: bool, finish: bool },
    Finished,
}

/// Coalescing timer owned by one in-flight gesture.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: State,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self { state: State::Idle }
    }

    /// New data arrived since the last dispatch.
    pub fn kick(&mut self) -> FrameRequest {
        match &mut self.state {
            State::Idle => {
                self.state = State::Scheduled {
                    dirty: true,
                    finish: false,
                };
                FrameRequest::Schedule
            }
            State::Scheduled {
                dirty,
                finish: false,
            } => {
                *dirty = true;
                FrameRequest::AlreadyScheduled
            }
            State::Scheduled { finish: true, .. } | State::Finished => FrameRequest::Ignored,
        }
    }

    /// A frame fired. Returns the work to run, if any.
    pub fn on_frame(&mut self) -> Option<FrameTask> {
        match self.state {
            State::Scheduled {
                dirty: true,
                finish: false,
            } => {
                self.state = State::Scheduled {
                    dirty: false,
                    finish: false,
                };
                Some(FrameTask::Update)
            }
            State::Scheduled {
                dirty: false,
                finish: false,
            } => {
                self.state = State::Idle;
                None
            }
            State::Scheduled {
                dirty,
                finish: true,
            } => {
                self.state = State::Finished;
                Some(if dirty {
                    FrameTask::UpdateThenFinish
                } else {
                    FrameTask::Finish
                })
            }
            State::Idle | State::Finished => None,
        }
    }

    /// The gesture is over. Guarantees a final dispatch after any pending
    /// update.
    pub fn end(&mut self) -> EndAction {
        match &mut self.state {
            State::Idle => {
                self.state = State::Finished;
                EndAction::FinishNow
            }
            State::Scheduled { finish, .. } if !*finish => {
                *finish = true;
                EndAction::Deferred
            }
            State::Scheduled { .. } | State::Finished => EndAction::AlreadyEnded,
        }
    }

    /// A frame tick is wanted.
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        matches!(self.state, State::Scheduled { .. })
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished)
    }
}

/// Timer stand-in for hosts without animation-frame callbacks.
///
/// Armed when a frame is requested; [`FrameTimer::poll`] reports a tick once
/// [`FALLBACK_FRAME_INTERVAL_MS`] has elapsed since arming.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    armed_at: Option<f64>,
}

impl FrameTimer {
    /// Arm the timer unless it is already running.
    pub fn arm(&mut self, now_ms: f64) {
        if self.armed_at.is_none() {
            self.armed_at = Some(now_ms);
        }
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// True (and disarmed) when the interval has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.armed_at {
            Some(armed) if now_ms - armed >= FALLBACK_FRAME_INTERVAL_MS => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }
}
