#![forbid(unsafe_code)]

//! Press filtering and drag-threshold detection.
//!
//! The tracker turns a raw press into a [`PendingContact`] and watches that
//! contact's moves until the cumulative displacement reaches the threshold.
//! Below the threshold nothing is emitted, so a click with a slight tremor
//! stays a click.

use crate::event::{
    ElementTag, Modifiers, MouseButton, MouseEvent, MouseEventKind, TargetId, Touch, TouchId,
};
use crate::geometry::Point;
use crate::session::{ContactKey, GestureSample};
use tracing::trace;

/// Pixels a pressed pointer travels before a gesture starts.
pub const DEFAULT_MOVE_THRESHOLD: f64 = 6.0;

/// Decides which presses are tracked and when they become gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    threshold: f64,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_THRESHOLD)
    }
}

impl PointerTracker {
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Start tracking a mouse press, unless it is filtered out.
    ///
    /// Only primary-button presses without CTRL/ALT on non-form elements are
    /// tracked.
    #[must_use]
    pub fn press_mouse(&self, event: &MouseEvent) -> Option<PendingContact> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        if event.modifiers.intersects(Modifiers::BLOCKING) {
            trace!(modifiers = ?event.modifiers, "mouse press ignored: modifier held");
            return None;
        }
        if event.tag.is_form_control() {
            trace!(tag = ?event.tag, "mouse press ignored: form control");
            return None;
        }
        Some(PendingContact::new(
            ContactKey::Mouse,
            event.target,
            event.position,
            event.time_ms,
        ))
    }

    /// Start tracking one touch of a touch-start event.
    #[must_use]
    pub fn press_touch(&self, touch: &Touch, tag: ElementTag, time_ms: f64) -> Option<PendingContact> {
        if tag.is_form_control() {
            trace!(id = touch.id.0, ?tag, "touch press ignored: form control");
            return None;
        }
        Some(PendingContact::new(
            ContactKey::Touch(touch.id),
            touch.target,
            touch.position,
            time_ms,
        ))
    }

    /// Feed a move of a pending contact.
    ///
    /// Returns the seed of the new gesture once the threshold is crossed.
    pub fn check_threshold(
        &self,
        pending: &mut PendingContact,
        position: Point,
        time_ms: f64,
        target_touches: Vec<TouchId>,
    ) -> ThresholdCheck {
        if position == pending.last {
            return ThresholdCheck::Duplicate;
        }
        pending.last = position;
        if position.distance_squared(pending.start) < self.threshold * self.threshold {
            return ThresholdCheck::Below;
        }
        trace!(contact = ?pending.contact, x = position.x, y = position.y, "move threshold crossed");
        ThresholdCheck::Crossed(GestureSample::seed(
            pending.target,
            pending.contact,
            pending.start,
            pending.start_time,
            position,
            time_ms,
            target_touches,
        ))
    }
}

/// Outcome of feeding a move to a pending contact.
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdCheck {
    /// Same coordinates as the last sample; dropped.
    Duplicate,
    /// Still inside the threshold radius.
    Below,
    Crossed(GestureSample),
}

/// A pressed contact that has not moved far enough to be a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingContact {
    pub contact: ContactKey,
    pub target: TargetId,
    pub start: Point,
    pub start_time: f64,
    last: Point,
}

impl PendingContact {
    #[must_use]
    pub const fn new(contact: ContactKey, target: TargetId, start: Point, start_time: f64) -> Self {
        Self {
            contact,
            target,
            start,
            start_time,
            last: start,
        }
    }
}
