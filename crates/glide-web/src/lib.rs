#![forbid(unsafe_code)]

//! Web host bridge for glide.
//!
//! Browser glue serializes DOM `mousedown`/`mousemove`/`mouseup`/`dragstart`
//! and `touchstart`/`touchmove`/`touchend`/`touchcancel` events to JSON and
//! hands them across the WASM boundary; [`input_parser`] turns them into
//! [`glide_core::event::InputEvent`] values for the gesture router.

#[cfg(feature = "input-parser")]
pub mod input_parser;

#[cfg(feature = "input-parser")]
pub use input_parser::{InputParseError, parse_encoded_input};
