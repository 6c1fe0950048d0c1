#![forbid(unsafe_code)]

//! Motion aggregation for one active gesture.
//!
//! Raw moves only record the latest position; the session is advanced on the
//! frame tick chosen by the gesture's [`FrameScheduler`]. The terminal `End`
//! always follows the last pending `Move`.

use crate::event::TouchId;
use crate::frame_scheduler::{EndAction, FrameRequest, FrameScheduler, FrameTask};
use crate::geometry::Point;
use crate::semantic_event::GestureEvent;
use crate::session::GestureSample;
use tracing::trace;

/// Accumulates samples of one contact after its gesture has started.
#[derive(Debug, Clone)]
pub struct MotionAggregator {
    sample: GestureSample,
    pending: Option<(Point, f64)>,
    last_seen: Point,
    scheduler: FrameScheduler,
}

impl MotionAggregator {
    /// Take over a session seeded by the pointer tracker.
    #[must_use]
    pub fn new(seed: GestureSample) -> Self {
        let last_seen = seed.page();
        Self {
            sample: seed,
            pending: None,
            last_seen,
            scheduler: FrameScheduler::new(),
        }
    }

    /// Session state as of the last flushed frame.
    #[must_use]
    pub fn sample(&self) -> &GestureSample {
        &self.sample
    }

    /// Record a raw move. Returns `None` for a duplicate sample.
    pub fn record(
        &mut self,
        position: Point,
        time_ms: f64,
        target_touches: Option<Vec<TouchId>>,
    ) -> Option<FrameRequest> {
        if position == self.last_seen {
            return None;
        }
        self.last_seen = position;
        self.pending = Some((position, time_ms));
        if let Some(touches) = target_touches {
            self.sample.set_target_touches(touches);
        }
        Some(self.scheduler.kick())
    }

    /// The contact was released or cancelled.
    ///
    /// Returns the `End` immediately when nothing is pending; otherwise the
    /// end is delivered by the next [`MotionAggregator::on_frame`].
    pub fn release(&mut self) -> Vec<GestureEvent> {
        match self.scheduler.end() {
            EndAction::FinishNow => vec![GestureEvent::End(self.sample.clone())],
            EndAction::Deferred => {
                trace!(contact = ?self.sample.contact, "end deferred to next frame");
                Vec::new()
            }
            EndAction::AlreadyEnded => Vec::new(),
        }
    }

    /// Run whatever the scheduler has queued for this frame.
    pub fn on_frame(&mut self) -> Vec<GestureEvent> {
        let Some(task) = self.scheduler.on_frame() else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(2);
        if task.runs_update() {
            self.flush();
            out.push(GestureEvent::Move(self.sample.clone()));
        }
        if task.finishes() {
            out.push(GestureEvent::End(self.sample.clone()));
        }
        if task == FrameTask::UpdateThenFinish {
            trace!(contact = ?self.sample.contact, "flushed pending move before end");
        }
        out
    }

    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    /// The end signal has been produced.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_finished()
    }

    fn flush(&mut self) {
        if let Some((position, time_ms)) = self.pending.take() {
            self.sample.advance(position, time_ms);
        }
    }
}
