#![forbid(unsafe_code)]

//! Timeline tuning constants.

use std::fmt;
use std::time::Duration;

/// Caret speed and spacing for the writing view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineConfig {
    /// Caret advance per animation frame, in columns.
    pub time_speed: f64,
    /// Rows between wrapped lines.
    pub line_height: u16,
    /// A space pre-advances the caret by `time_speed * word_gap_factor`.
    pub word_gap_factor: f64,
    /// Re-entering the writing view seeds the caret this many frames past
    /// the last letter.
    pub resume_gap_factor: f64,
    /// Period of the animation tick.
    pub frame_interval: Duration,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            time_speed: 0.25,
            line_height: 2,
            word_gap_factor: 2.0,
            resume_gap_factor: 5.0,
            frame_interval: Duration::from_millis(16),
        }
    }
}

impl TimelineConfig {
    /// Extra advance applied before stamping a space.
    #[inline]
    pub fn word_gap(&self) -> f64 {
        self.time_speed * self.word_gap_factor
    }

    /// Gap between the last letter and the caret after resuming.
    #[inline]
    pub fn resume_gap(&self) -> f64 {
        self.time_speed * self.resume_gap_factor
    }

    /// Check that the values describe a caret that moves forward.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_speed.is_finite() || self.time_speed <= 0.0 {
            return Err(ConfigError::TimeSpeed(self.time_speed));
        }
        if self.line_height == 0 {
            return Err(ConfigError::LineHeight);
        }
        for (name, value) in [
            ("word gap", self.word_gap_factor),
            ("resume gap", self.resume_gap_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Factor { name, value });
            }
        }
        if self.frame_interval.is_zero() {
            return Err(ConfigError::FrameInterval);
        }
        Ok(())
    }
}

/// Rejected timeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Speed must be finite and positive.
    TimeSpeed(f64),
    /// Rows cannot overlap.
    LineHeight,
    /// Gap factors must be finite and non-negative.
    Factor {
        /// Which factor was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The tick needs a period.
    FrameInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeSpeed(v) => write!(f, "time speed must be a positive number, got {v}"),
            Self::LineHeight => write!(f, "line height must be at least 1"),
            Self::Factor { name, value } => {
                write!(f, "{name} factor must be a non-negative number, got {value}")
            }
            Self::FrameInterval => write!(f, "frame interval must be at least 1ms"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_timeline_constants() {
        let config = TimelineConfig::default();
        assert_eq!(config.time_speed, 0.25);
        assert_eq!(config.line_height, 2);
        assert_eq!(config.word_gap(), 0.5);
        assert_eq!(config.resume_gap(), 1.25);
        assert_eq!(config.frame_interval, Duration::from_millis(16));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_speed() {
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = TimelineConfig {
                time_speed: speed,
                ..TimelineConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::TimeSpeed(_))));
        }
    }

    #[test]
    fn rejects_zero_line_height_and_interval() {
        let config = TimelineConfig {
            line_height: 0,
            ..TimelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::LineHeight));

        let config = TimelineConfig {
            frame_interval: Duration::ZERO,
            ..TimelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FrameInterval));
    }

    #[test]
    fn rejects_negative_factor() {
        let config = TimelineConfig {
            resume_gap_factor: -1.0,
            ..TimelineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Factor {
                name: "resume gap",
                value: -1.0
            }
        );
        assert!(err.to_string().contains("resume gap"));
    }

    #[test]
    fn zero_gap_factors_are_allowed() {
        let config = TimelineConfig {
            word_gap_factor: 0.0,
            resume_gap_factor: 0.0,
            ..TimelineConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.word_gap(), 0.0);
    }
}
