#![forbid(unsafe_code)]

//! Raw pointer and touch input as delivered by the host.
//!
//! These types mirror what a browser hands to an event listener, stripped down
//! to the fields the gesture pipeline reads. The host is responsible for
//! translating its native events (DOM, winit, a JSON bridge) into
//! [`InputEvent`] values and for supplying monotonic millisecond timestamps.

use crate::geometry::Point;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// Identifier the platform assigns to one touch point for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub i64);

/// Tag of the element a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementTag {
    #[default]
    Generic,
    Input,
    TextArea,
    Select,
    Button,
}

impl ElementTag {
    /// Form controls keep their native interaction; presses on them never
    /// start tracking.
    #[must_use]
    pub const fn is_form_control(self) -> bool {
        !matches!(self, Self::Generic)
    }

    /// Map a lowercase or uppercase DOM tag name.
    #[must_use]
    pub fn from_tag_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "input" => Self::Input,
            "textarea" => Self::TextArea,
            "select" => Self::Select,
            "button" => Self::Button,
            _ => Self::Generic,
        }
    }
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT = 0b0010;
        const CTRL = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Modifiers that turn a primary press into something other than a drag
    /// (context clicks, window-manager moves).
    pub const BLOCKING: Self = Self::CTRL.union(Self::ALT);
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Move,
    Up(MouseButton),
    /// The platform started its own drag-and-drop; any pending contact is
    /// abandoned.
    DragStart,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub position: Point,
    pub target: TargetId,
    pub tag: ElementTag,
    pub modifiers: Modifiers,
    pub time_ms: f64,
}

impl MouseEvent {
    /// Create a mouse event on a generic element with no modifiers.
    #[must_use]
    pub fn new(kind: MouseEventKind, position: Point, target: TargetId, time_ms: f64) -> Self {
        Self {
            kind,
            position,
            target,
            tag: ElementTag::Generic,
            modifiers: Modifiers::empty(),
            time_ms,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: ElementTag) -> Self {
        self.tag = tag;
        self
    }
}

/// One touch point inside a [`TouchEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: TouchId,
    pub position: Point,
    pub target: TargetId,
}

impl Touch {
    #[must_use]
    pub const fn new(id: TouchId, position: Point, target: TargetId) -> Self {
        Self {
            id,
            position,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    /// Touches whose state changed in this event.
    pub changed: Vec<Touch>,
    /// Touches currently down on the event's target element.
    pub target_touches: Vec<Touch>,
    pub tag: ElementTag,
    pub time_ms: f64,
}

impl TouchEvent {
    #[must_use]
    pub fn new(phase: TouchPhase, changed: Vec<Touch>, time_ms: f64) -> Self {
        let target_touches = match phase {
            TouchPhase::Start | TouchPhase::Move => changed.clone(),
            TouchPhase::End | TouchPhase::Cancel => Vec::new(),
        };
        Self {
            phase,
            changed,
            target_touches,
            tag: ElementTag::Generic,
            time_ms,
        }
    }

    #[must_use]
    pub fn with_target_touches(mut self, target_touches: Vec<Touch>) -> Self {
        self.target_touches = target_touches;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: ElementTag) -> Self {
        self.tag = tag;
        self
    }

    /// Find a changed touch by identifier.
    #[must_use]
    pub fn changed_touch(&self, id: TouchId) -> Option<&Touch> {
        self.changed.iter().find(|touch| touch.id == id)
    }
}

/// Canonical raw input consumed by [`InputHub`](crate::input_hub::InputHub).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Touch(TouchEvent),
}

impl InputEvent {
    /// Host timestamp in milliseconds.
    #[must_use]
    pub fn time_ms(&self) -> f64 {
        match self {
            Self::Mouse(mouse) => mouse.time_ms,
            Self::Touch(touch) => touch.time_ms,
        }
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(event: MouseEvent) -> Self {
        Self::Mouse(event)
    }
}

impl From<TouchEvent> for InputEvent {
    fn from(event: TouchEvent) -> Self {
        Self::Touch(event)
    }
}
