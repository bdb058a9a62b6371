use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::features::FeatureSchema;
use crate::model::ModelFormat;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized regression model
    pub path: PathBuf,
    /// Serialization format (auto-detected by default)
    #[serde(default)]
    pub format: ModelFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturesConfig {
    /// First year label of the feature schema (inclusive)
    pub first_year: i32,
    /// Last year label of the feature schema (inclusive)
    pub last_year: i32,
    /// Initial value of every field in the interactive form
    #[serde(default)]
    pub default_value: f64,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            first_year: 1980,
            last_year: 2023,
            default_value: 0.0,
        }
    }
}

impl FeaturesConfig {
    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::years(self.first_year..=self.last_year)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresentationConfig {
    /// Year the model forecasts
    pub target_year: i32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self { target_year: 2024 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily rolling log files (console only when unset)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from `config_dir` and the environment
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("model.path", "models/best_inflation_model.json")?
            .set_default("model.format", "auto")?
            .set_default("features.first_year", 1980)?
            .set_default("features.last_year", 2023)?
            .set_default("features.default_value", 0.0)?
            .set_default("presentation.target_year", 2024)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 7860)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("RATECAST_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (RATECAST_MODEL__PATH, etc.)
            .add_source(
                Environment::with_prefix("RATECAST")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Create a default configuration for CLI usage
    pub fn default_config(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model: ModelConfig {
                path: model_path.into(),
                format: ModelFormat::Auto,
            },
            features: FeaturesConfig::default(),
            presentation: PresentationConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.features.first_year > self.features.last_year {
            errors.push(format!(
                "features.first_year ({}) must not be after features.last_year ({})",
                self.features.first_year, self.features.last_year
            ));
        }

        if !self.features.default_value.is_finite() {
            errors.push("features.default_value must be finite".to_string());
        }

        if self.presentation.target_year <= self.features.last_year {
            errors.push(format!(
                "presentation.target_year ({}) must be after the last feature year ({})",
                self.presentation.target_year, self.features.last_year
            ));
        }

        if self.server.port == 0 {
            errors.push("server.port must be > 0".to_string());
        }

        if self.model.path.as_os_str().is_empty() {
            errors.push("model.path must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
