#![forbid(unsafe_code)]

//! The input hub: per-contact routing from raw input to gesture signals.
//!
//! [`InputHub`] owns every live contact, keyed by [`ContactKey`]. A contact is
//! either pending (pressed, still inside the move threshold) or active (its
//! gesture started and a [`MotionAggregator`] owns it). Released gestures that
//! still have a frame to flush move to a draining list, so a new press on the
//! same key never collides with a gesture that is finishing.
//!
//! # Invariants
//! 1. At most one contact per key is live at any time.
//! 2. For one contact, signals are strictly ordered: start, moves, one end.
//! 3. Contacts never read or write each other's state.
//!
//! # Host contract
//!
//! The host feeds [`InputHub::handle_input`] from its event listeners and
//! calls [`InputHub::on_frame`] from its animation-frame callback while
//! [`InputHub::needs_frame`] is true (or [`InputHub::poll_timer`] when using
//! [`FrameTiming::Timer`]). The returned [`InputResponse`] lists side effects
//! the host must apply to the native event.

use std::collections::HashMap;

use crate::event::{
    InputEvent, MouseEvent, MouseEventKind, TargetId, TouchEvent, TouchId, TouchPhase,
};
use crate::frame_scheduler::{FrameRequest, FrameTimer, FrameTiming};
use crate::geometry::Point;
use crate::motion::MotionAggregator;
use crate::pointer_tracker::{PendingContact, PointerTracker, ThresholdCheck};
use crate::semantic_event::GestureEvent;
use crate::session::{ContactKey, GestureSample};
use tracing::{debug, trace};

/// Answer of the gesture-start dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDecision {
    /// Someone consumes moves and the end: keep tracking.
    Track,
    /// Nobody is interested: drop the contact and leave native behavior alone.
    Ignore,
}

/// Receiver of gesture signals.
pub trait GestureSink {
    /// A gesture crossed the start threshold.
    fn on_start(&mut self, event: &GestureEvent) -> StartDecision;

    /// A `Move` or `End` of a tracked gesture.
    fn on_signal(&mut self, event: &GestureEvent);
}

/// Records every signal and tracks every gesture.
impl GestureSink for Vec<GestureEvent> {
    fn on_start(&mut self, event: &GestureEvent) -> StartDecision {
        self.push(event.clone());
        StartDecision::Track
    }

    fn on_signal(&mut self, event: &GestureEvent) {
        self.push(event.clone());
    }
}

/// Side effect the host applies to the native event it just delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEffect {
    /// Call `preventDefault()` (stops touch scrolling while a gesture runs).
    PreventDefault,
    /// Swallow clicks on the target until the matching restore.
    SuppressClicks(TargetId),
    /// Stop swallowing clicks, after the current event turn completes.
    RestoreClicks(TargetId),
}

/// Effects produced by one call into the hub.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputResponse {
    pub effects: Vec<HostEffect>,
}

impl InputResponse {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    #[must_use]
    pub fn prevents_default(&self) -> bool {
        self.effects.contains(&HostEffect::PreventDefault)
    }

    fn push(&mut self, effect: HostEffect) {
        if !self.effects.contains(&effect) {
            self.effects.push(effect);
        }
    }
}

#[derive(Debug, Clone)]
enum Contact {
    Pending(PendingContact),
    Active(MotionAggregator),
}

/// Owns all contact state of one input surface.
#[derive(Debug, Default)]
pub struct InputHub {
    tracker: PointerTracker,
    timing: FrameTiming,
    timer: FrameTimer,
    contacts: HashMap<ContactKey, Contact>,
    draining: Vec<MotionAggregator>,
}

impl InputHub {
    #[must_use]
    pub fn new(tracker: PointerTracker, timing: FrameTiming) -> Self {
        Self {
            tracker,
            timing,
            timer: FrameTimer::default(),
            contacts: HashMap::new(),
            draining: Vec::new(),
        }
    }

    #[must_use]
    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    /// Route one raw input event.
    pub fn handle_input(&mut self, event: &InputEvent, sink: &mut dyn GestureSink) -> InputResponse {
        let mut response = InputResponse::default();
        match event {
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse, sink, &mut response),
            InputEvent::Touch(touch) => self.handle_touch(touch, sink, &mut response),
        }
        response
    }

    /// Animation-frame tick: flush every scheduled gesture.
    pub fn on_frame(&mut self, now_ms: f64, sink: &mut dyn GestureSink) -> InputResponse {
        let mut response = InputResponse::default();

        let mut keys: Vec<ContactKey> = self
            .contacts
            .iter()
            .filter_map(|(key, contact)| match contact {
                Contact::Active(agg) if agg.is_scheduled() => Some(*key),
                _ => None,
            })
            .collect();
        keys.sort_unstable();
        for key in keys {
            if let Some(Contact::Active(agg)) = self.contacts.get_mut(&key) {
                for event in agg.on_frame() {
                    sink.on_signal(&event);
                }
            }
        }

        for agg in &mut self.draining {
            for event in agg.on_frame() {
                sink.on_signal(&event);
            }
            if agg.is_finished() {
                let sample = agg.sample();
                trace!(contact = ?sample.contact, "drained gesture finished");
                if sample.contact == ContactKey::Mouse {
                    response.push(HostEffect::RestoreClicks(sample.target));
                }
            }
        }
        self.draining.retain(|agg| !agg.is_finished());

        if self.timing == FrameTiming::Timer && self.needs_frame() {
            self.timer.arm(now_ms);
        }
        response
    }

    /// Fallback tick for hosts without animation frames.
    pub fn poll_timer(&mut self, now_ms: f64, sink: &mut dyn GestureSink) -> InputResponse {
        if self.timer.poll(now_ms) {
            self.on_frame(now_ms, sink)
        } else {
            InputResponse::default()
        }
    }

    /// Some gesture is waiting for a frame tick.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        !self.draining.is_empty()
            || self.contacts.values().any(|contact| match contact {
                Contact::Active(agg) => agg.is_scheduled(),
                Contact::Pending(_) => false,
            })
    }

    /// Release every live contact, e.g. when the surface loses focus.
    pub fn cancel_all(&mut self, sink: &mut dyn GestureSink) -> InputResponse {
        let mut response = InputResponse::default();
        let mut keys: Vec<ContactKey> = self.contacts.keys().copied().collect();
        keys.sort_unstable();
        for key in keys {
            self.release(key, sink, &mut response);
        }
        response
    }

    /// Number of contacts pressed but not yet past the threshold.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.contacts
            .values()
            .filter(|contact| matches!(contact, Contact::Pending(_)))
            .count()
    }

    /// Number of gestures in flight, including ones draining their last frame.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.draining.len()
            + self
                .contacts
                .values()
                .filter(|contact| matches!(contact, Contact::Active(_)))
                .count()
    }

    /// Current session of a live gesture.
    #[must_use]
    pub fn session(&self, key: ContactKey) -> Option<&GestureSample> {
        match self.contacts.get(&key) {
            Some(Contact::Active(agg)) => Some(agg.sample()),
            _ => None,
        }
    }

    fn handle_mouse(
        &mut self,
        event: &MouseEvent,
        sink: &mut dyn GestureSink,
        response: &mut InputResponse,
    ) {
        match event.kind {
            MouseEventKind::Down(_) => {
                // Ignored presses leave the live contact alone.
                let Some(pending) = self.tracker.press_mouse(event) else {
                    trace!("mouse press ignored");
                    return;
                };
                if self.contacts.contains_key(&ContactKey::Mouse) {
                    // The previous release never reached us.
                    self.release(ContactKey::Mouse, sink, response);
                }
                trace!(x = event.position.x, y = event.position.y, "mouse contact pressed");
                self.contacts.insert(ContactKey::Mouse, Contact::Pending(pending));
            }
            MouseEventKind::Move => {
                self.advance(ContactKey::Mouse, event.position, event.time_ms, None, sink, response);
            }
            MouseEventKind::Up(_) => self.release(ContactKey::Mouse, sink, response),
            MouseEventKind::DragStart => {
                if let Some(Contact::Pending(_)) = self.contacts.get(&ContactKey::Mouse) {
                    trace!("native drag took over pending mouse contact");
                    self.contacts.remove(&ContactKey::Mouse);
                }
            }
        }
    }

    fn handle_touch(
        &mut self,
        event: &TouchEvent,
        sink: &mut dyn GestureSink,
        response: &mut InputResponse,
    ) {
        match event.phase {
            TouchPhase::Start => {
                for touch in &event.changed {
                    let key = ContactKey::Touch(touch.id);
                    let Some(pending) = self.tracker.press_touch(touch, event.tag, event.time_ms)
                    else {
                        continue;
                    };
                    if self.contacts.contains_key(&key) {
                        self.release(key, sink, response);
                    }
                    trace!(id = touch.id.0, "touch contact pressed");
                    self.contacts.insert(key, Contact::Pending(pending));
                }
            }
            TouchPhase::Move => {
                let target_touches: Vec<_> = event.target_touches.iter().map(|t| t.id).collect();
                for touch in &event.changed {
                    self.advance(
                        ContactKey::Touch(touch.id),
                        touch.position,
                        event.time_ms,
                        Some(target_touches.clone()),
                        sink,
                        response,
                    );
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                for touch in &event.changed {
                    self.release(ContactKey::Touch(touch.id), sink, response);
                }
            }
        }
    }

    fn advance(
        &mut self,
        key: ContactKey,
        position: Point,
        time_ms: f64,
        target_touches: Option<Vec<TouchId>>,
        sink: &mut dyn GestureSink,
        response: &mut InputResponse,
    ) {
        let seed = match self.contacts.get_mut(&key) {
            None => return,
            Some(Contact::Pending(pending)) => {
                match self.tracker.check_threshold(
                    pending,
                    position,
                    time_ms,
                    target_touches.unwrap_or_default(),
                ) {
                    ThresholdCheck::Crossed(seed) => seed,
                    ThresholdCheck::Below | ThresholdCheck::Duplicate => return,
                }
            }
            Some(Contact::Active(agg)) => {
                let Some(request) = agg.record(position, time_ms, target_touches) else {
                    return;
                };
                if key.is_touch() {
                    response.push(HostEffect::PreventDefault);
                }
                if request == FrameRequest::Schedule && self.timing == FrameTiming::Timer {
                    self.timer.arm(time_ms);
                }
                return;
            }
        };
        self.begin(key, seed, sink, response);
    }

    fn begin(
        &mut self,
        key: ContactKey,
        seed: GestureSample,
        sink: &mut dyn GestureSink,
        response: &mut InputResponse,
    ) {
        let event = GestureEvent::Start(seed);
        let decision = sink.on_start(&event);
        let seed = event.into_sample();
        match decision {
            StartDecision::Ignore => {
                debug!(contact = ?key, target = seed.target.0, "gesture start not handled");
                self.contacts.remove(&key);
            }
            StartDecision::Track => {
                debug!(contact = ?key, target = seed.target.0, "gesture started");
                response.push(match key {
                    ContactKey::Mouse => HostEffect::SuppressClicks(seed.target),
                    ContactKey::Touch(_) => HostEffect::PreventDefault,
                });
                self.contacts
                    .insert(key, Contact::Active(MotionAggregator::new(seed)));
            }
        }
    }

    fn release(&mut self, key: ContactKey, sink: &mut dyn GestureSink, response: &mut InputResponse) {
        match self.contacts.remove(&key) {
            None => trace!(contact = ?key, "release for untracked contact ignored"),
            Some(Contact::Pending(_)) => trace!(contact = ?key, "released below move threshold"),
            Some(Contact::Active(mut agg)) => {
                let events = agg.release();
                for event in &events {
                    sink.on_signal(event);
                }
                if agg.is_finished() {
                    debug!(contact = ?key, "gesture ended");
                    if key == ContactKey::Mouse {
                        response.push(HostEffect::RestoreClicks(agg.sample().target));
                    }
                } else {
                    debug!(contact = ?key, "gesture ending on next frame");
                    if self.timing == FrameTiming::Timer {
                        self.timer.arm(agg.sample().timestamp);
                    }
                    self.draining.push(agg);
                }
            }
        }
    }
}
