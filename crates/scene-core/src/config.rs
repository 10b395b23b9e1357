//! Navigator configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use scene_state::ShieldConfig;
use scene_tween::{Curve, FrameTicker, Ticker};
use scene_ui::tokens;
use scene_ui::transition::{TransitionKind, TransitionSpec};
use scene_ui::visual::Rgba;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Value out of range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Navigator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorConfig {
    /// Shield fade length in seconds
    #[serde(default = "default_fade_duration")]
    pub fade_duration_secs: f32,

    /// Screen enter/exit length in seconds
    #[serde(default = "default_transition_duration")]
    pub transition_duration_secs: f32,

    /// Shield overlay color
    #[serde(default = "default_shield_color")]
    pub shield_color: Rgba,

    /// Curve for the shield's opaque-to-clear fade
    #[serde(default = "default_fade_in_curve")]
    pub fade_in_curve: Curve,

    /// Curve for the shield's clear-to-opaque fade
    #[serde(default = "default_fade_out_curve")]
    pub fade_out_curve: Curve,

    /// Frames per second for animation ticks
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Reserved name of the loading indicator screen
    #[serde(default)]
    pub loading_screen: Option<String>,

    /// Sort order given to the loading indicator
    #[serde(default = "default_loading_sort_order")]
    pub loading_sort_order: i32,
}

fn default_fade_duration() -> f32 {
    tokens::duration::FADE
}

fn default_transition_duration() -> f32 {
    tokens::duration::TRANSITION
}

fn default_shield_color() -> Rgba {
    tokens::color::SHIELD
}

fn default_fade_in_curve() -> Curve {
    tokens::easing::FADE_IN
}

fn default_fade_out_curve() -> Curve {
    tokens::easing::FADE_OUT
}

fn default_frame_rate() -> u32 {
    tokens::frame::RATE
}

fn default_loading_sort_order() -> i32 {
    tokens::sort_order::LOADING
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            fade_duration_secs: default_fade_duration(),
            transition_duration_secs: default_transition_duration(),
            shield_color: default_shield_color(),
            fade_in_curve: default_fade_in_curve(),
            fade_out_curve: default_fade_out_curve(),
            frame_rate: default_frame_rate(),
            loading_screen: None,
            loading_sort_order: default_loading_sort_order(),
        }
    }
}

impl NavigatorConfig {
    /// Parse and validate JSON text
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: NavigatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!("Loaded navigator config from {}", path.display());
        Ok(config)
    }

    /// Reject values the navigator cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("fadeDurationSecs", self.fade_duration_secs)?;
        check_duration("transitionDurationSecs", self.transition_duration_secs)?;

        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "frameRate",
                reason: "must be at least 1".to_string(),
            });
        }

        if let Some(name) = &self.loading_screen {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "loadingScreen",
                    reason: "must not be blank".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Shield settings derived from this config
    pub fn shield_config(&self) -> ShieldConfig {
        ShieldConfig {
            fade_duration_secs: self.fade_duration_secs,
            fade_in_curve: self.fade_in_curve,
            fade_out_curve: self.fade_out_curve,
            color: self.shield_color,
        }
    }

    /// Transition settings for a screen using `kind`
    pub fn transition_spec(&self, kind: TransitionKind) -> TransitionSpec {
        TransitionSpec::new(kind).with_duration(self.transition_duration_secs)
    }

    /// Frame ticker running at the configured rate
    pub fn ticker(&self) -> Arc<dyn Ticker> {
        Arc::new(FrameTicker::new(self.frame_rate))
    }
}

fn check_duration(field: &'static str, secs: f32) -> Result<(), ConfigError> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{} is not a non-negative number of seconds", secs),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = NavigatorConfig::default();
        assert_eq!(config.fade_duration_secs, 0.15);
        assert_eq!(config.transition_duration_secs, 0.3);
        assert_eq!(config.shield_color, Rgba::BLACK);
        assert_eq!(config.fade_in_curve, Curve::EaseInOutExpo);
        assert_eq!(config.fade_out_curve, Curve::EaseInOutExpo);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.loading_screen, None);
        assert_eq!(config.loading_sort_order, 98);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = NavigatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, NavigatorConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = NavigatorConfig::from_json_str(
            r#"{
                "fadeDurationSecs": 0.5,
                "fadeOutCurve": "easeOutQuad",
                "loadingScreen": "Spinner",
                "shieldColor": { "r": 1.0, "g": 1.0, "b": 1.0, "a": 1.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.fade_duration_secs, 0.5);
        assert_eq!(config.fade_out_curve, Curve::EaseOutQuad);
        assert_eq!(config.fade_in_curve, Curve::EaseInOutExpo);
        assert_eq!(config.loading_screen.as_deref(), Some("Spinner"));
        assert_eq!(config.shield_color, Rgba::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_rejects_negative_duration() {
        let err = NavigatorConfig::from_json_str(r#"{"transitionDurationSecs": -1.0}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "transitionDurationSecs",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_frame_rate() {
        let err = NavigatorConfig::from_json_str(r#"{"frameRate": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "frameRate", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = NavigatorConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_durations_allowed() {
        let config =
            NavigatorConfig::from_json_str(r#"{"fadeDurationSecs": 0, "transitionDurationSecs": 0}"#)
                .unwrap();
        assert_eq!(config.shield_config().fade_duration(), Duration::ZERO);
        assert_eq!(config.transition_spec(TransitionKind::Fade).duration(), Duration::ZERO);
    }

    #[test]
    fn test_derived_settings() {
        let config = NavigatorConfig {
            fade_in_curve: Curve::Linear,
            transition_duration_secs: 0.5,
            ..NavigatorConfig::default()
        };

        let shield = config.shield_config();
        assert_eq!(shield.fade_in_curve, Curve::Linear);
        assert_eq!(shield.fade_out_curve, Curve::EaseInOutExpo);

        let spec = config.transition_spec(TransitionKind::Scale);
        assert_eq!(spec.kind, TransitionKind::Scale);
        assert_eq!(spec.duration_secs, 0.5);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"frameRate": 30, "loadingSortOrder": 120}}"#).unwrap();

        let config = NavigatorConfig::from_file(file.path()).await.unwrap();
        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.loading_sort_order, 120);
    }

    #[tokio::test]
    async fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = NavigatorConfig::from_file(dir.path().join("missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
