#![forbid(unsafe_code)]

//! Core: pointer and touch gesture pipeline for media surfaces.
//!
//! # Role in glide
//! `glide-core` turns raw mouse and touch input into drag signals and
//! directional swipes. It owns no I/O and no clock: hosts feed it events with
//! timestamps and drive frame ticks, which keeps every stage deterministic.
//!
//! # Primary responsibilities
//! - **PointerTracker**: distinguishes clicks from drags with a distance
//!   threshold.
//! - **MotionAggregator**: tracks position, distance, and a smoothed velocity
//!   per contact.
//! - **FrameScheduler**: coalesces bursts of moves to one update per frame.
//! - **SwipeClassifier**: decides whether a finished drag is a swipe.
//! - **GestureRouter**: handler registration with per-surface reference
//!   counting, on top of the per-contact **InputHub**.
//!
//! # How it fits in the system
//! `glide-web` decodes browser input into [`event::InputEvent`] values;
//! `glide-gallery` consumes [`semantic_event::SwipeEvent`]s to page through
//! media.

pub mod config;
pub mod event;
pub mod frame_scheduler;
pub mod geometry;
pub mod input_hub;
pub mod logging;
pub mod motion;
pub mod pointer_tracker;
pub mod router;
pub mod semantic_event;
pub mod session;
pub mod swipe;
pub mod target_tree;

pub use config::{ConfigError, GestureConfig};
pub use event::{InputEvent, TargetId};
pub use geometry::{Point, Size};
pub use router::{GestureRouter, SubscriptionId, SwipeFilter};
pub use semantic_event::{GestureEvent, SwipeDirection, SwipeEvent};
pub use swipe::{SettingsError, SwipeSettings};
pub use target_tree::{StaticTree, TargetTree};
