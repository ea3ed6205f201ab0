use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::Color;

/// Every tunable of the demos. Missing fields fall back to their defaults,
/// so a config file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub tick_rate: f64,
    pub pong: PongConfig,
    pub camera: CameraConfig,
    pub playground: PlaygroundConfig,
    pub hand: HandConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub paddle_width: i32,
    pub paddle_height: i32,
    pub paddle_velocity: i32,
    pub paddle_color: Color,
    pub ball_size: i32,
    pub ball_speed: i32,
    pub ball_color: Color,
    pub score_color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width: i32,
    pub height: i32,
    pub left_color: Color,
    pub right_color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub width: i32,
    pub height: i32,
    pub cursor_size: i32,
    pub cursor_color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    pub pinch_threshold: f32,
    /// Cursor easing factor in (0, 1]. No easing when unset.
    pub cursor_easing: Option<f32>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            pong: PongConfig::default(),
            camera: CameraConfig::default(),
            playground: PlaygroundConfig::default(),
            hand: HandConfig::default(),
        }
    }
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            screen_width: 600,
            screen_height: 800,
            paddle_width: 100,
            paddle_height: 20,
            paddle_velocity: 5,
            paddle_color: Color::WHITE,
            ball_size: 10,
            ball_speed: 13,
            ball_color: Color::WHITE,
            score_color: Color::WHITE,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            left_color: Color::BLUE,
            right_color: Color::GREEN,
        }
    }
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            cursor_size: 10,
            cursor_color: Color::RED,
        }
    }
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.08,
            cursor_easing: None,
        }
    }
}

fn positive(field: &'static str, value: i32) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be positive, got {}", value),
        });
    }
    Ok(())
}

impl ArcadeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate",
                reason: format!("must be a positive number, got {}", self.tick_rate),
            });
        }

        let pong = &self.pong;
        positive("pong.screen_width", pong.screen_width)?;
        positive("pong.screen_height", pong.screen_height)?;
        positive("pong.paddle_width", pong.paddle_width)?;
        positive("pong.paddle_height", pong.paddle_height)?;
        positive("pong.ball_size", pong.ball_size)?;
        positive("pong.ball_speed", pong.ball_speed)?;
        if pong.paddle_width > pong.screen_width {
            return Err(ConfigError::InvalidValue {
                field: "pong.paddle_width",
                reason: "wider than the screen".to_string(),
            });
        }

        positive("camera.width", self.camera.width)?;
        positive("camera.height", self.camera.height)?;
        positive("playground.width", self.playground.width)?;
        positive("playground.height", self.playground.height)?;

        if !(self.hand.pinch_threshold > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "hand.pinch_threshold",
                reason: format!("must be positive, got {}", self.hand.pinch_threshold),
            });
        }
        if let Some(factor) = self.hand.cursor_easing {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::InvalidValue {
                    field: "hand.cursor_easing",
                    reason: format!("must be in (0, 1], got {}", factor),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ArcadeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let config = ArcadeConfig {
            tick_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "tick_rate", .. })
        ));
    }

    #[test]
    fn paddle_wider_than_screen() {
        let mut config = ArcadeConfig::default();
        config.pong.paddle_width = 700;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "pong.paddle_width", .. })
        ));
    }

    #[test]
    fn easing_out_of_range() {
        let mut config = ArcadeConfig::default();
        config.hand.cursor_easing = Some(1.5);
        assert!(config.validate().is_err());
        config.hand.cursor_easing = Some(0.05);
        assert!(config.validate().is_ok());
    }
}
