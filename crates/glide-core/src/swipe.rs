#![forbid(unsafe_code)]

//! Swipe classification of completed gestures.
//!
//! A gesture is a swipe when it covered a large enough fraction of its
//! surface, or when it was fast enough that a shorter distance counts. Both
//! tests are scaled by the surface size along the dominant axis.
//!
//! # Direction selection
//!
//! The dominant direction is chosen by the two diagonals `dist_x == dist_y`
//! and `dist_x == -dist_y`:
//!
//! | condition                                 | direction |
//! |-------------------------------------------|-----------|
//! | `dx > dy` and `dx > -dy`                  | Right     |
//! | `dx > dy` and `dx <= -dy`                 | Up        |
//! | `dx <= dy` and `dx > -dy`                 | Down      |
//! | `dx <= dy` and `dx <= -dy`                | Left      |
//!
//! Points exactly on `dx == dy` therefore fall to the Down/Left half. This is
//! the historical behavior and is kept as-is.

use crate::event::TargetId;
use crate::geometry::Size;
use crate::semantic_event::{SwipeDirection, SwipeEvent};
use crate::session::GestureSample;
use tracing::{debug, trace};

/// Default ratio of surface dimension a gesture must travel.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 0.4;
/// Default velocity sensitivity. Bigger lets fast gestures travel less.
pub const DEFAULT_SWIPE_SENSITIVITY: f64 = 6.0;

/// Which surface dimension scales the velocity test of vertical swipes.
///
/// Historically the vertical velocity term was divided by the surface
/// *width*. `Width` keeps that behavior; `Height` uses the vertical dimension
/// for both vertical tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VelocityBasis {
    #[default]
    Width,
    Height,
}

/// Tuning for the swipe classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeSettings {
    /// Ratio of travel distance to surface dimension, in `(0, 1]`.
    pub threshold: f64,
    /// Multiplier letting velocity substitute for distance.
    pub sensitivity: f64,
    pub vertical_velocity_basis: VelocityBasis,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SWIPE_THRESHOLD,
            sensitivity: DEFAULT_SWIPE_SENSITIVITY,
            vertical_velocity_basis: VelocityBasis::Width,
        }
    }
}

impl SwipeSettings {
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    #[must_use]
    pub fn with_vertical_velocity_basis(mut self, basis: VelocityBasis) -> Self {
        self.vertical_velocity_basis = basis;
        self
    }

    /// Reject settings that would make classification meaningless.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.threshold.is_finite() {
            return Err(SettingsError::NonFinite("threshold"));
        }
        if !self.sensitivity.is_finite() {
            return Err(SettingsError::NonFinite("sensitivity"));
        }
        if self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err(SettingsError::ThresholdOutOfRange(self.threshold));
        }
        if self.sensitivity <= 0.0 {
            return Err(SettingsError::NonPositiveSensitivity(self.sensitivity));
        }
        Ok(())
    }
}

/// Errors from validating [`SwipeSettings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsError {
    /// A field is NaN or infinite.
    NonFinite(&'static str),
    /// Threshold is not in `(0, 1]`.
    ThresholdOutOfRange(f64),
    /// Sensitivity is zero or negative.
    NonPositiveSensitivity(f64),
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NonFinite(field) => write!(f, "swipe {field} must be finite"),
            Self::ThresholdOutOfRange(value) => {
                write!(f, "swipe threshold {value} is outside (0, 1]")
            }
            Self::NonPositiveSensitivity(value) => {
                write!(f, "swipe sensitivity {value} must be positive")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Pick the dominant direction of a displacement.
#[must_use]
pub fn dominant_direction(dist_x: f64, dist_y: f64) -> SwipeDirection {
    if dist_x > dist_y {
        if dist_x > -dist_y {
            SwipeDirection::Right
        } else {
            SwipeDirection::Up
        }
    } else if dist_x > -dist_y {
        SwipeDirection::Down
    } else {
        SwipeDirection::Left
    }
}

/// Decides whether a completed gesture is a directional swipe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwipeClassifier {
    settings: SwipeSettings,
}

impl SwipeClassifier {
    #[must_use]
    pub const fn new(settings: SwipeSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &SwipeSettings {
        &self.settings
    }

    /// Replace the settings after validating them.
    pub fn set_settings(&mut self, settings: SwipeSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Classify the terminal sample of a gesture against `surface`'s size.
    ///
    /// Returns `None` when no direction qualifies or the size is degenerate.
    #[must_use]
    pub fn classify(
        &self,
        sample: &GestureSample,
        surface: TargetId,
        size: Size,
    ) -> Option<SwipeEvent> {
        if size.is_degenerate() {
            debug!(surface = surface.0, ?size, "swipe skipped: degenerate surface size");
            return None;
        }
        let SwipeSettings {
            threshold,
            sensitivity,
            vertical_velocity_basis,
        } = self.settings;
        let (w, h) = (size.width, size.height);
        let vertical_basis = match vertical_velocity_basis {
            VelocityBasis::Width => w,
            VelocityBasis::Height => h,
        };
        let (dx, dy) = (sample.dist_x, sample.dist_y);
        let (vx, vy) = (sample.velocity_x, sample.velocity_y);

        let direction = dominant_direction(dx, dy);
        let qualifies = match direction {
            SwipeDirection::Right => dx / w > threshold || vx * dx / w * sensitivity > 1.0,
            SwipeDirection::Left => -dx / w > threshold || vx * dx / w * sensitivity > 1.0,
            SwipeDirection::Down => {
                dy / h > threshold || vy * dy / vertical_basis * sensitivity > 1.0
            }
            SwipeDirection::Up => {
                -dy / h > threshold || vy * dy / vertical_basis * sensitivity > 1.0
            }
        };
        if !qualifies {
            trace!(?direction, dx, dy, vx, vy, "gesture below swipe thresholds");
            return None;
        }
        debug!(surface = surface.0, ?direction, dx, dy, "swipe classified");
        Some(SwipeEvent {
            surface,
            direction,
            dist_x: dx,
            dist_y: dy,
            velocity_x: vx,
            velocity_y: vy,
            finger_count: sample.finger_count,
        })
    }
}
