//! Gateway configuration. Precedence: env `RECAP_CONFIG` path >
//! `config/recap.toml` > built-in defaults, with `RECAP`-prefixed
//! environment variables layered on top (separator `__`).

use crate::summarize::SummarizerMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_summarizer_mode() -> String {
    "heuristic".to_string()
}

/// Application configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display name reported by the health endpoint.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// If true, the gateway serves the static form client from `frontend/`.
    #[serde(default, alias = "ui_enabled")]
    pub frontend_enabled: bool,
    /// Summarization strategy: "heuristic" (default) or "remote".
    #[serde(default = "default_summarizer_mode")]
    pub summarizer_mode: String,
}

/// The built-in defaults layered under the file and environment sources.
fn default_builder(
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("app_name", "Recap Gateway")?
        .set_default("port", 5000_i64)?
        .set_default("frontend_enabled", false)?
        .set_default("summarizer_mode", "heuristic")
}

impl AppConfig {
    /// Load config from file and environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("RECAP_CONFIG").unwrap_or_else(|_| "config/recap".to_string());
        let builder = default_builder()?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("RECAP").separator("__"))
            .build()?;

        built.try_deserialize()
    }

    /// The configured strategy, parsed. Unknown values fall back to the
    /// heuristic rather than failing boot.
    pub fn strategy_mode(&self) -> SummarizerMode {
        SummarizerMode::parse(&self.summarizer_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_defaults_deserialize() {
        // Only the default layer, so ambient RECAP__* variables or a local
        // config file cannot leak into the assertion.
        let cfg: AppConfig = default_builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.app_name, "Recap Gateway");
        assert_eq!(cfg.port, 5000);
        assert!(!cfg.frontend_enabled);
        assert_eq!(cfg.strategy_mode(), SummarizerMode::Heuristic);
    }

    #[test]
    fn unknown_mode_falls_back_to_heuristic() {
        let cfg = AppConfig {
            app_name: "t".to_string(),
            port: 0,
            frontend_enabled: false,
            summarizer_mode: "quantum".to_string(),
        };
        assert_eq!(cfg.strategy_mode(), SummarizerMode::Heuristic);
    }
}
