#![forbid(unsafe_code)]

//! Pipeline configuration with environment overrides.
//!
//! # Environment Variables
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `GLIDE_MOVE_THRESHOLD` | pixels, `> 0` | `6` |
//! | `GLIDE_SWIPE_THRESHOLD` | ratio in `(0, 1]` | `0.4` |
//! | `GLIDE_SWIPE_SENSITIVITY` | `> 0` | `6` |
//! | `GLIDE_SWIPE_VERTICAL_BASIS` | `width`, `height` | `width` |
//! | `GLIDE_FRAME_TIMING` | `animation`, `timer` | `animation` |
//!
//! Unset or empty variables keep the default. Anything else that does not
//! parse is an error rather than a silent fallback.

use crate::frame_scheduler::FrameTiming;
use crate::pointer_tracker::DEFAULT_MOVE_THRESHOLD;
use crate::swipe::{SettingsError, SwipeSettings, VelocityBasis};

pub const ENV_MOVE_THRESHOLD: &str = "GLIDE_MOVE_THRESHOLD";
pub const ENV_SWIPE_THRESHOLD: &str = "GLIDE_SWIPE_THRESHOLD";
pub const ENV_SWIPE_SENSITIVITY: &str = "GLIDE_SWIPE_SENSITIVITY";
pub const ENV_SWIPE_VERTICAL_BASIS: &str = "GLIDE_SWIPE_VERTICAL_BASIS";
pub const ENV_FRAME_TIMING: &str = "GLIDE_FRAME_TIMING";

/// Errors from building a [`GestureConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A variable held a value that does not parse.
    InvalidValue { var: &'static str, value: String },
    /// The move threshold is not a positive finite number.
    InvalidMoveThreshold(f64),
    /// Swipe settings parsed but failed validation.
    Swipe(SettingsError),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidValue { var, value } => write!(f, "invalid value for {var}: {value:?}"),
            Self::InvalidMoveThreshold(value) => {
                write!(f, "move threshold {value} must be positive and finite")
            }
            Self::Swipe(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Swipe(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SettingsError> for ConfigError {
    fn from(err: SettingsError) -> Self {
        Self::Swipe(err)
    }
}

/// Everything the gesture pipeline can be tuned with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Euclidean distance in pixels before a press becomes a gesture.
    pub move_threshold: f64,
    pub swipe: SwipeSettings,
    pub frame_timing: FrameTiming,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            move_threshold: DEFAULT_MOVE_THRESHOLD,
            swipe: SwipeSettings::default(),
            frame_timing: FrameTiming::Animation,
        }
    }
}

impl GestureConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through `get_env`, for hosts without a process
    /// environment and for tests.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let lookup = |var: &'static str| {
            get_env(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = lookup(ENV_MOVE_THRESHOLD) {
            config.move_threshold = parse_number(ENV_MOVE_THRESHOLD, value)?;
        }
        if let Some(value) = lookup(ENV_SWIPE_THRESHOLD) {
            config.swipe.threshold = parse_number(ENV_SWIPE_THRESHOLD, value)?;
        }
        if let Some(value) = lookup(ENV_SWIPE_SENSITIVITY) {
            config.swipe.sensitivity = parse_number(ENV_SWIPE_SENSITIVITY, value)?;
        }
        if let Some(value) = lookup(ENV_SWIPE_VERTICAL_BASIS) {
            config.swipe.vertical_velocity_basis = match value.to_ascii_lowercase().as_str() {
                "width" => VelocityBasis::Width,
                "height" => VelocityBasis::Height,
                _ => return Err(invalid(ENV_SWIPE_VERTICAL_BASIS, value)),
            };
        }
        if let Some(value) = lookup(ENV_FRAME_TIMING) {
            config.frame_timing = match value.to_ascii_lowercase().as_str() {
                "animation" | "raf" => FrameTiming::Animation,
                "timer" => FrameTiming::Timer,
                _ => return Err(invalid(ENV_FRAME_TIMING, value)),
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.move_threshold.is_finite() || self.move_threshold <= 0.0 {
            return Err(ConfigError::InvalidMoveThreshold(self.move_threshold));
        }
        self.swipe.validate()?;
        Ok(())
    }
}

fn invalid(var: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { var, value }
}

fn parse_number(var: &'static str, value: String) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| invalid(var, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = GestureConfig::from_env_with(env(&[])).unwrap();
        assert_eq!(config, GestureConfig::default());
        assert_eq!(config.move_threshold, 6.0);
        assert_eq!(config.swipe.threshold, 0.4);
        assert_eq!(config.swipe.sensitivity, 6.0);
        assert_eq!(config.frame_timing, FrameTiming::Animation);
    }

    #[test]
    fn overrides_apply() {
        let config = GestureConfig::from_env_with(env(&[
            (ENV_MOVE_THRESHOLD, "10"),
            (ENV_SWIPE_THRESHOLD, " 0.2 "),
            (ENV_SWIPE_SENSITIVITY, "3.5"),
            (ENV_SWIPE_VERTICAL_BASIS, "Height"),
            (ENV_FRAME_TIMING, "timer"),
        ]))
        .unwrap();
        assert_eq!(
            config,
            GestureConfig {
                move_threshold: 10.0,
                swipe: SwipeSettings {
                    threshold: 0.2,
                    sensitivity: 3.5,
                    vertical_velocity_basis: VelocityBasis::Height,
                },
                frame_timing: FrameTiming::Timer,
            }
        );
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = GestureConfig::from_env_with(env(&[(ENV_SWIPE_THRESHOLD, "")])).unwrap();
        assert_eq!(config.swipe.threshold, 0.4);
    }

    #[test]
    fn unparsable_values_are_errors() {
        assert_eq!(
            GestureConfig::from_env_with(env(&[(ENV_SWIPE_SENSITIVITY, "fast")])),
            Err(ConfigError::InvalidValue {
                var: ENV_SWIPE_SENSITIVITY,
                value: "fast".to_string(),
            })
        );
        assert!(matches!(
            GestureConfig::from_env_with(env(&[(ENV_FRAME_TIMING, "vsync")])),
            Err(ConfigError::InvalidValue { var: ENV_FRAME_TIMING, .. })
        ));
    }

    #[test]
    fn out_of_range_values_are_errors() {
        assert_eq!(
            GestureConfig::from_env_with(env(&[(ENV_MOVE_THRESHOLD, "0")])),
            Err(ConfigError::InvalidMoveThreshold(0.0))
        );
        assert_eq!(
            GestureConfig::from_env_with(env(&[(ENV_SWIPE_THRESHOLD, "2")])),
            Err(ConfigError::Swipe(SettingsError::ThresholdOutOfRange(2.0)))
        );
    }

    #[test]
    fn swipe_errors_chain_as_source() {
        use std::error::Error;
        let err = ConfigError::from(SettingsError::NonPositiveSensitivity(0.0));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("sensitivity"));
    }
}
