#![forbid(unsafe_code)]

//! Semantic gesture signals derived from raw pointer and touch input.
//!
//! [`GestureEvent`] is the drag lifecycle of one contact; [`SwipeEvent`] is the
//! classified outcome of a completed drag.
//!
//! # Design
//!
//! ## Invariants
//! 1. Every gesture sequence is well-formed per contact: `Start` → zero or
//!    more `Move` → exactly one `End`.
//! 2. No `Move` is delivered after the `End` of the same contact.
//! 3. At most one `SwipeEvent` is produced per surface per completed gesture.
//!
//! ## Failure Modes
//! - A release for a contact that never started yields no signal at all.
//! - A gesture that does not clear the swipe thresholds yields its `End`
//!   but no `SwipeEvent` (graceful degradation to "no swipe").

use crate::event::TargetId;
use crate::session::GestureSample;

// ---------------------------------------------------------------------------
// SwipeDirection
// ---------------------------------------------------------------------------

/// Cardinal direction for swipe gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true for vertical directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Returns true for horizontal directions.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Event name used by hosts that expose swipes as named DOM events.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Up => "swipeup",
            Self::Down => "swipedown",
            Self::Left => "swipeleft",
            Self::Right => "swiperight",
        }
    }
}

// ---------------------------------------------------------------------------
// GestureEvent
// ---------------------------------------------------------------------------

/// Phase of a gesture signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

bitflags::bitflags! {
    /// Set of gesture phases a listener wants to receive.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GestureKinds: u8 {
        const START = 0b001;
        const MOVE = 0b010;
        const END = 0b100;
    }
}

impl GestureKinds {
    #[must_use]
    pub const fn contains_phase(self, phase: GesturePhase) -> bool {
        match phase {
            GesturePhase::Start => self.contains(Self::START),
            GesturePhase::Move => self.contains(Self::MOVE),
            GesturePhase::End => self.contains(Self::END),
        }
    }
}

/// Drag lifecycle signal for one contact.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// Movement crossed the start threshold.
    Start(GestureSample),
    /// One coalesced frame of movement.
    Move(GestureSample),
    /// The contact was released or cancelled; carries the final sample.
    End(GestureSample),
}

impl GestureEvent {
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match self {
            Self::Start(_) => GesturePhase::Start,
            Self::Move(_) => GesturePhase::Move,
            Self::End(_) => GesturePhase::End,
        }
    }

    #[must_use]
    pub fn sample(&self) -> &GestureSample {
        match self {
            Self::Start(sample) | Self::Move(sample) | Self::End(sample) => sample,
        }
    }

    #[must_use]
    pub fn into_sample(self) -> GestureSample {
        match self {
            Self::Start(sample) | Self::Move(sample) | Self::End(sample) => sample,
        }
    }

    /// Element the gesture originated on.
    #[must_use]
    pub fn target(&self) -> TargetId {
        self.sample().target
    }
}

// ---------------------------------------------------------------------------
// SwipeEvent
// ---------------------------------------------------------------------------

/// Directional swipe classified from a completed gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeEvent {
    /// Element whose dimensions qualified the swipe.
    pub surface: TargetId,
    pub direction: SwipeDirection,
    pub dist_x: f64,
    pub dist_y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub finger_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::session::ContactKey;

    fn sample() -> GestureSample {
        GestureSample::seed(
            TargetId(3),
            ContactKey::Mouse,
            Point::default(),
            0.0,
            Point::new(6.0, 0.0),
            1.0,
            Vec::new(),
        )
    }

    #[test]
    fn swipe_direction_opposite() {
        assert_eq!(SwipeDirection::Up.opposite(), SwipeDirection::Down);
        assert_eq!(SwipeDirection::Down.opposite(), SwipeDirection::Up);
        assert_eq!(SwipeDirection::Left.opposite(), SwipeDirection::Right);
        assert_eq!(SwipeDirection::Right.opposite(), SwipeDirection::Left);
    }

    #[test]
    fn swipe_direction_axes() {
        for dir in SwipeDirection::ALL {
            assert_ne!(dir.is_vertical(), dir.is_horizontal(), "{dir:?}");
        }
        assert!(SwipeDirection::Up.is_vertical());
        assert!(SwipeDirection::Left.is_horizontal());
    }

    #[test]
    fn event_names() {
        assert_eq!(SwipeDirection::Left.event_name(), "swipeleft");
        assert_eq!(SwipeDirection::Right.event_name(), "swiperight");
        assert_eq!(SwipeDirection::Up.event_name(), "swipeup");
        assert_eq!(SwipeDirection::Down.event_name(), "swipedown");
    }

    #[test]
    fn gesture_event_accessors() {
        let start = GestureEvent::Start(sample());
        assert_eq!(start.phase(), GesturePhase::Start);
        assert_eq!(start.target(), TargetId(3));
        assert_eq!(GestureEvent::End(sample()).phase(), GesturePhase::End);
        assert_eq!(GestureEvent::Move(sample()).sample().dist_x, 6.0);
    }

    #[test]
    fn gesture_kinds_filter_phases() {
        let kinds = GestureKinds::MOVE | GestureKinds::END;
        assert!(!kinds.contains_phase(GesturePhase::Start));
        assert!(kinds.contains_phase(GesturePhase::Move));
        assert!(kinds.contains_phase(GesturePhase::End));
        assert!(GestureKinds::all().contains_phase(GesturePhase::Start));
    }
}
