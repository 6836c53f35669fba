//! Session settings
//!
//! Ball and color counts plus the physics tuning, stored as JSON. Missing
//! fields fall back to their defaults so a file only needs what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::sim::{Arena, Tuning, validate_counts};

/// Default number of balls
pub const DEFAULT_BALL_COUNT: usize = 24;
/// Default number of colors
pub const DEFAULT_COLOR_COUNT: usize = 3;

/// Puzzle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Balls spawned per session
    pub ball_count: usize,
    /// Colors in play (1-6)
    pub color_count: usize,
    /// Arena size and ball diameter
    pub arena: Arena,
    /// Physics and clustering constants
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_count: DEFAULT_BALL_COUNT,
            color_count: DEFAULT_COLOR_COUNT,
            arena: Arena::default(),
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Read settings from a file, or fall back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the counts can start a session and that the arena and
    /// tuning keep balls inside the arena with a positive speed cap
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_counts(self.ball_count, self.color_count)?;

        let arena = &self.arena;
        positive("arena.diameter", arena.diameter)?;
        at_least("arena.width", arena.width, arena.diameter)?;
        at_least("arena.height", arena.height, arena.diameter)?;

        let tuning = &self.tuning;
        positive("tuning.push_radius", tuning.push_radius)?;
        positive("tuning.max_speed", tuning.max_speed)?;
        positive("tuning.group_radius", tuning.group_radius)?;
        unit_interval("tuning.friction", tuning.friction)?;
        unit_interval("tuning.bounce", tuning.bounce)?;
        Ok(())
    }
}

// NaN fails every check below.

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(SettingsError::OutOfRange {
            field,
            value,
            expected: "a finite value > 0",
        });
    }
    Ok(())
}

fn at_least(field: &'static str, value: f32, min: f32) -> Result<(), SettingsError> {
    if !(value >= min && value.is_finite()) {
        return Err(SettingsError::OutOfRange {
            field,
            value,
            expected: "at least the ball diameter",
        });
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SettingsError::OutOfRange {
            field,
            value,
            expected: "a value in [0, 1]",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StartError;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.arena.width, 600.0);
        assert_eq!(settings.tuning.group_radius, 100.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "ball_count": 30, "tuning": { "friction": 0.9 } }"#)
            .unwrap();
        assert_eq!(settings.ball_count, 30);
        assert_eq!(settings.color_count, DEFAULT_COLOR_COUNT);
        assert_eq!(settings.tuning.friction, 0.9);
        assert_eq!(settings.tuning.max_speed, 6.0);
        assert_eq!(settings.arena, Arena::default());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            ball_count: 12,
            color_count: 6,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_counts_rejected() {
        let err = Settings::from_json(r#"{ "ball_count": 3, "color_count": 2 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(StartError::NotEnoughBalls { required: 4, .. })
        ));
    }

    fn rejected_field(json: &str) -> &'static str {
        match Settings::from_json(json) {
            Err(SettingsError::OutOfRange { field, .. }) => field,
            other => panic!("expected OutOfRange for {json}, got {other:?}"),
        }
    }

    #[test]
    fn test_arena_smaller_than_ball_rejected() {
        assert_eq!(
            rejected_field(r#"{ "arena": { "width": 10.0, "height": 10.0 } }"#),
            "arena.width"
        );
        assert_eq!(rejected_field(r#"{ "arena": { "height": 19.0 } }"#), "arena.height");
        // Exactly one ball wide is still a legal arena
        assert!(Settings::from_json(r#"{ "arena": { "width": 20.0 } }"#).is_ok());
    }

    #[test]
    fn test_non_positive_diameter_rejected() {
        assert_eq!(rejected_field(r#"{ "arena": { "diameter": 0.0 } }"#), "arena.diameter");
        assert_eq!(rejected_field(r#"{ "arena": { "diameter": -5.0 } }"#), "arena.diameter");
    }

    #[test]
    fn test_non_positive_push_radius_rejected() {
        assert_eq!(
            rejected_field(r#"{ "tuning": { "push_radius": 0.0 } }"#),
            "tuning.push_radius"
        );
    }

    #[test]
    fn test_non_positive_max_speed_rejected() {
        assert_eq!(
            rejected_field(r#"{ "tuning": { "max_speed": -1.0 } }"#),
            "tuning.max_speed"
        );
        assert_eq!(
            rejected_field(r#"{ "tuning": { "max_speed": 0.0 } }"#),
            "tuning.max_speed"
        );
    }

    #[test]
    fn test_non_positive_group_radius_rejected() {
        assert_eq!(
            rejected_field(r#"{ "tuning": { "group_radius": -10.0 } }"#),
            "tuning.group_radius"
        );
    }

    #[test]
    fn test_friction_outside_unit_interval_rejected() {
        assert_eq!(rejected_field(r#"{ "tuning": { "friction": 1.5 } }"#), "tuning.friction");
        assert_eq!(rejected_field(r#"{ "tuning": { "friction": -0.1 } }"#), "tuning.friction");
        assert!(Settings::from_json(r#"{ "tuning": { "friction": 1.0 } }"#).is_ok());
    }

    #[test]
    fn test_bounce_outside_unit_interval_rejected() {
        assert_eq!(rejected_field(r#"{ "tuning": { "bounce": 2.0 } }"#), "tuning.bounce");
        assert_eq!(rejected_field(r#"{ "tuning": { "bounce": -0.6 } }"#), "tuning.bounce");
        assert!(Settings::from_json(r#"{ "tuning": { "bounce": 0.0 } }"#).is_ok());
    }

    #[test]
    fn test_validate_checks_arena_built_in_code() {
        let settings = Settings {
            arena: Arena {
                width: f32::NAN,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::OutOfRange { field: "arena.width", .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = Settings::from_json("{ ball_count: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/chroma-cluster.json");
        assert_eq!(settings, Settings::default());
    }
}
