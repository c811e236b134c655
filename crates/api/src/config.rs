//! Service Configuration

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Process configuration, resolved from built-in defaults with
/// `CYCLONE_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Directory holding the model bundle artifacts
    pub model_dir: PathBuf,
}

impl Settings {
    /// Load settings
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("model_dir", "models")?
            .add_source(Environment::with_prefix("CYCLONE"))
            .build()?
            .try_deserialize()
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.model_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_bind_addr() {
        let settings = Settings {
            host: "127.0.0.1".to_string(),
            port: 8080,
            model_dir: PathBuf::from("models"),
        };
        assert_eq!(settings.bind_addr(), "127.0.0.1:8080");
    }
}
