use thiserror::Error;

use crate::session::{ControlMode, Demo};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown score panel position: {0}")]
    UnknownScorePosition(String),
    #[error("unknown control mode: {0}")]
    UnknownControlMode(String),
    #[error("unknown demo: {0}")]
    UnknownDemo(String),
    #[error("{mode} control is not available for the {demo} demo")]
    UnsupportedControl { demo: Demo, mode: ControlMode },
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("frame source disconnected")]
    Disconnected,
    #[error("invalid frame: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = CaptureError::InvalidFrame { expected: 16, actual: 12 };
        assert_eq!(err.to_string(), "invalid frame: expected 16 bytes, got 12");

        let err = ConfigError::UnsupportedControl {
            demo: Demo::Pong,
            mode: ControlMode::Hand,
        };
        assert_eq!(err.to_string(), "hand control is not available for the pong demo");
    }
}
