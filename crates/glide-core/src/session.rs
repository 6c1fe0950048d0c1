#![forbid(unsafe_code)]

//! Gesture session state: the per-contact record carried by every gesture
//! signal.
//!
//! # Invariants
//! 1. `target` and `start_*` are fixed when the session is seeded and never
//!    change afterwards.
//! 2. `dist_*` is always measured from the start point, `delta_*` from the
//!    previously emitted sample.
//! 3. Velocity only changes through [`GestureSample::advance`], which applies
//!    the fixed-weight moving average
//!    `v' = PREVIOUS_WEIGHT * v + CURRENT_WEIGHT * delta / dt`.

use crate::event::{TargetId, TouchId};
use crate::geometry::Point;

/// Weight of the previous velocity in the moving average.
pub const PREVIOUS_WEIGHT: f64 = 0.3;
/// Weight of the instantaneous frame velocity in the moving average.
pub const CURRENT_WEIGHT: f64 = 0.7;

/// Key of one live contact in the input hub.
///
/// A mouse has at most one contact; touches are keyed by their platform
/// identifier so concurrent fingers never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactKey {
    Mouse,
    Touch(TouchId),
}

impl ContactKey {
    #[must_use]
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::Touch(_))
    }

    /// The touch identifier, if this is a touch contact.
    #[must_use]
    pub const fn touch_id(self) -> Option<TouchId> {
        match self {
            Self::Mouse => None,
            Self::Touch(id) => Some(id),
        }
    }
}

/// Snapshot of one gesture session, delivered with start, move, and end
/// signals.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSample {
    pub target: TargetId,
    pub contact: ContactKey,
    pub start_x: f64,
    pub start_y: f64,
    pub page_x: f64,
    pub page_y: f64,
    pub dist_x: f64,
    pub dist_y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    /// Smoothed velocity in pixels per millisecond.
    pub velocity_x: f64,
    pub velocity_y: f64,
    /// Time of the press that opened the contact.
    pub start_timestamp: f64,
    /// Time of the latest sample folded into this snapshot.
    pub timestamp: f64,
    /// Touches down on the target when the latest sample was taken.
    pub target_touches: Vec<TouchId>,
    pub finger_count: usize,
}

impl GestureSample {
    /// Seed a session at the moment the start threshold is crossed.
    ///
    /// Distance and delta both equal the displacement from the press point;
    /// the initial velocity is that displacement over the time since the
    /// press.
    #[must_use]
    pub fn seed(
        target: TargetId,
        contact: ContactKey,
        start: Point,
        start_timestamp: f64,
        current: Point,
        timestamp: f64,
        target_touches: Vec<TouchId>,
    ) -> Self {
        let dist = current - start;
        let elapsed = timestamp - start_timestamp;
        let (velocity_x, velocity_y) = if elapsed > 0.0 {
            (dist.x / elapsed, dist.y / elapsed)
        } else {
            (0.0, 0.0)
        };
        let finger_count = finger_count(contact, &target_touches);
        Self {
            target,
            contact,
            start_x: start.x,
            start_y: start.y,
            page_x: current.x,
            page_y: current.y,
            dist_x: dist.x,
            dist_y: dist.y,
            delta_x: dist.x,
            delta_y: dist.y,
            velocity_x,
            velocity_y,
            start_timestamp,
            timestamp,
            target_touches,
            finger_count,
        }
    }

    /// Latest known position.
    #[must_use]
    pub fn page(&self) -> Point {
        Point::new(self.page_x, self.page_y)
    }

    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    /// Fold one coalesced frame sample into the session.
    ///
    /// A non-positive `dt` keeps the previous velocity.
    pub fn advance(&mut self, position: Point, timestamp: f64) {
        let dt = timestamp - self.timestamp;
        self.dist_x = position.x - self.start_x;
        self.dist_y = position.y - self.start_y;
        self.delta_x = position.x - self.page_x;
        self.delta_y = position.y - self.page_y;
        if dt > 0.0 {
            self.velocity_x =
                PREVIOUS_WEIGHT * self.velocity_x + CURRENT_WEIGHT * self.delta_x / dt;
            self.velocity_y =
                PREVIOUS_WEIGHT * self.velocity_y + CURRENT_WEIGHT * self.delta_y / dt;
        }
        self.page_x = position.x;
        self.page_y = position.y;
        self.timestamp = timestamp;
    }

    /// Replace the set of touches down on the target.
    pub fn set_target_touches(&mut self, target_touches: Vec<TouchId>) {
        self.finger_count = finger_count(self.contact, &target_touches);
        self.target_touches = target_touches;
    }
}

fn finger_count(contact: ContactKey, target_touches: &[TouchId]) -> usize {
    match contact {
        ContactKey::Mouse => 1,
        ContactKey::Touch(_) => target_touches.len().max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seeded() -> GestureSample {
        GestureSample::seed(
            TargetId(1),
            ContactKey::Mouse,
            Point::new(100.0, 100.0),
            0.0,
            Point::new(106.0, 100.0),
            10.0,
            Vec::new(),
        )
    }

    #[test]
    fn seed_carries_crossing_displacement() {
        let s = seeded();
        assert_eq!((s.dist_x, s.dist_y), (6.0, 0.0));
        assert_eq!((s.delta_x, s.delta_y), (6.0, 0.0));
        assert_eq!((s.velocity_x, s.velocity_y), (0.6, 0.0));
        assert_eq!(s.finger_count, 1);
        assert_eq!(s.start(), Point::new(100.0, 100.0));
    }

    #[test]
    fn seed_with_zero_elapsed_has_zero_velocity() {
        let s = GestureSample::seed(
            TargetId(1),
            ContactKey::Mouse,
            Point::default(),
            5.0,
            Point::new(10.0, 0.0),
            5.0,
            Vec::new(),
        );
        assert_eq!((s.velocity_x, s.velocity_y), (0.0, 0.0));
    }

    #[test]
    fn advance_applies_moving_average() {
        let mut s = seeded();
        s.advance(Point::new(116.0, 104.0), 20.0);
        assert_eq!((s.dist_x, s.dist_y), (16.0, 4.0));
        assert_eq!((s.delta_x, s.delta_y), (10.0, 4.0));
        assert_eq!(s.velocity_x, 0.3 * 0.6 + 0.7 * 10.0 / 10.0);
        assert_eq!(s.velocity_y, 0.7 * 4.0 / 10.0);
        assert_eq!(s.page(), Point::new(116.0, 104.0));
        assert_eq!(s.timestamp, 20.0);
    }

    #[test]
    fn advance_without_elapsed_time_keeps_velocity() {
        let mut s = seeded();
        s.advance(Point::new(120.0, 100.0), 10.0);
        assert_eq!(s.velocity_x, 0.6);
        assert_eq!(s.delta_x, 14.0);
    }

    #[test]
    fn touch_finger_count_follows_target_touches() {
        let mut s = GestureSample::seed(
            TargetId(2),
            ContactKey::Touch(TouchId(7)),
            Point::default(),
            0.0,
            Point::new(0.0, 8.0),
            4.0,
            vec![TouchId(7), TouchId(8)],
        );
        assert_eq!(s.finger_count, 2);
        s.set_target_touches(Vec::new());
        assert_eq!(s.finger_count, 1);
        assert_eq!(s.contact.touch_id(), Some(TouchId(7)));
        assert!(s.contact.is_touch());
    }
}
