#![forbid(unsafe_code)]

//! JSON input parser for browser-encoded pointer and touch events.
//!
//! [`parse_encoded_input`] accepts one JSON object per DOM event and returns
//! the corresponding [`InputEvent`]. Kinds the gesture pipeline does not
//! consume (wheel, key, focus, ...) return `Ok(None)`.
//!
//! # Schema
//!
//! ```json
//! {"kind":"mouse","phase":"down","button":0,"x":10.5,"y":4,"target":7,
//!  "tag":"div","mods":0,"t":1234.5}
//! {"kind":"touch","phase":"move","t":1250.0,"target":7,
//!  "touches":[{"id":3,"x":12,"y":40}],
//!  "target_touches":[{"id":3,"x":12,"y":40},{"id":4,"x":90,"y":41}]}
//! ```
//!
//! `button` follows `MouseEvent.button` (0 primary, 1 auxiliary, 2
//! secondary). `mods` uses the [`Modifiers`] bit layout. A touch without its
//! own `target` inherits the event's. When `target_touches` is absent it
//! defaults to the changed touches for `start`/`move` and to none otherwise.

use glide_core::event::{
    ElementTag, InputEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind, TargetId, Touch,
    TouchEvent, TouchId, TouchPhase,
};
use glide_core::geometry::Point;
use serde::Deserialize;
use tracing::trace;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown phase for the event kind.
    UnknownPhase(String),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownPhase(phase) => write!(f, "unknown phase: {phase}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawTouch {
    id: i64,
    x: f64,
    y: f64,
    #[serde(default)]
    target: Option<u64>,
}

/// Internal deserialization target for the browser glue's JSON.
#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    button: Option<u8>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    target: Option<u64>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    mods: Option<u8>,
    #[serde(default)]
    t: Option<f64>,
    #[serde(default)]
    touches: Option<Vec<RawTouch>>,
    #[serde(default)]
    target_touches: Option<Vec<RawTouch>>,
}

/// Parse one JSON-encoded DOM event into an [`InputEvent`].
///
/// Returns `Ok(None)` for kinds without an `InputEvent` equivalent and for
/// mouse buttons other than primary, auxiliary and secondary.
///
/// Returns `Err` for malformed JSON, unknown phases, or missing required
/// fields.
pub fn parse_encoded_input(json: &str) -> Result<Option<InputEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "mouse" => parse_mouse_event(&raw),
        "touch" => parse_touch_event(&raw).map(Some),
        other => {
            trace!(kind = other, "encoded input kind ignored");
            Ok(None)
        }
    }
}

fn parse_modifiers(mods: Option<u8>) -> Modifiers {
    Modifiers::from_bits_truncate(mods.unwrap_or(0))
}

fn parse_tag(tag: Option<&str>) -> ElementTag {
    tag.map_or(ElementTag::Generic, ElementTag::from_tag_name)
}

fn parse_mouse_button(button: Option<u8>) -> Option<MouseButton> {
    match button {
        Some(0) | None => Some(MouseButton::Left),
        Some(1) => Some(MouseButton::Middle),
        Some(2) => Some(MouseButton::Right),
        _ => None,
    }
}

fn required<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, InputParseError> {
    value.ok_or(InputParseError::MissingField(field))
}

fn parse_mouse_event(raw: &RawInput) -> Result<Option<InputEvent>, InputParseError> {
    let phase = raw.phase.as_deref().ok_or(InputParseError::MissingField("phase"))?;
    let kind = match phase {
        "down" | "up" => {
            let Some(button) = parse_mouse_button(raw.button) else {
                trace!(button = ?raw.button, "mouse button ignored");
                return Ok(None);
            };
            if phase == "down" {
                MouseEventKind::Down(button)
            } else {
                MouseEventKind::Up(button)
            }
        }
        "move" => MouseEventKind::Move,
        "dragstart" => MouseEventKind::DragStart,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };
    let position = Point::new(required(raw.x, "x")?, required(raw.y, "y")?);
    let target = TargetId(required(raw.target, "target")?);
    let time_ms = required(raw.t, "t")?;

    Ok(Some(InputEvent::Mouse(
        MouseEvent::new(kind, position, target, time_ms)
            .with_modifiers(parse_modifiers(raw.mods))
            .with_tag(parse_tag(raw.tag.as_deref())),
    )))
}

fn convert_touches(raw: &[RawTouch], fallback: Option<u64>) -> Result<Vec<Touch>, InputParseError> {
    raw.iter()
        .map(|touch| {
            let target = touch
                .target
                .or(fallback)
                .ok_or(InputParseError::MissingField("target"))?;
            Ok(Touch::new(
                TouchId(touch.id),
                Point::new(touch.x, touch.y),
                TargetId(target),
            ))
        })
        .collect()
}

fn parse_touch_event(raw: &RawInput) -> Result<InputEvent, InputParseError> {
    let phase = match raw.phase.as_deref().ok_or(InputParseError::MissingField("phase"))? {
        "start" => TouchPhase::Start,
        "move" => TouchPhase::Move,
        "end" => TouchPhase::End,
        "cancel" => TouchPhase::Cancel,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };
    let changed = raw
        .touches
        .as_deref()
        .ok_or(InputParseError::MissingField("touches"))?;
    let changed = convert_touches(changed, raw.target)?;
    let time_ms = required(raw.t, "t")?;

    let mut event = TouchEvent::new(phase, changed, time_ms).with_tag(parse_tag(raw.tag.as_deref()));
    if let Some(target_touches) = raw.target_touches.as_deref() {
        event = event.with_target_touches(convert_touches(target_touches, raw.target)?);
    }
    Ok(InputEvent::Touch(event))
}
