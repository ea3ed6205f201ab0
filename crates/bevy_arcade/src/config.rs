use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use arcade_core::ArcadeConfig;

/// Reads the config file if one was given, then applies command-line
/// overrides. Validation happens when the session is created.
pub fn load_config(path: Option<&Path>, tick_rate: Option<f64>) -> anyhow::Result<ArcadeConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config = parse_config(&text)
                .with_context(|| format!("invalid config {}", path.display()))?;
            info!(path = %path.display(), "loaded config");
            config
        }
        None => ArcadeConfig::default(),
    };

    if let Some(tick_rate) = tick_rate {
        config.tick_rate = tick_rate;
    }
    Ok(config)
}

fn parse_config(text: &str) -> anyhow::Result<ArcadeConfig> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_config(r#"{ "pong": { "ball_speed": 7 } }"#).unwrap();
        assert_eq!(config.pong.ball_speed, 7);
        assert_eq!(config.pong.paddle_width, 100);
        assert_eq!(config.tick_rate, 20.0);
    }

    #[test]
    fn tick_rate_override() {
        let config = load_config(None, Some(60.0)).unwrap();
        assert_eq!(config.tick_rate, 60.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/arcade.json")), None).is_err());
    }
}
