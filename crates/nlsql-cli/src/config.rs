//! Configuration for the CLI.
//!
//! Loads from:
//! 1. config.yaml - operational settings (database path, backend, logging)
//! 2. .env file - secrets (API keys)
//!
//! Environment variables always override config.yaml values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unknown generation backend '{0}' (expected 'ollama' or 'openai')")]
    UnknownBackend(String),
}

/// Which completion backend generates SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Ollama,
    OpenAi,
}

impl BackendKind {
    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "openai" => Ok(BackendKind::OpenAi),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/database.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub backend: BackendKind,
    pub model: String,
    pub ollama_url: String,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Ollama,
            model: nlsql_llm::ollama::DEFAULT_MODEL.to_string(),
            ollama_url: nlsql_llm::ollama::DEFAULT_BASE_URL.to_string(),
            timeout_secs: nlsql_llm::ollama::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or module-specific
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: String,

    /// Output destination: stdout, file, both
    pub output: String,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            output: "stdout".to_string(),
            directory: "./logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "history.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from YAML file with environment variable overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.with_env_overrides()
    }

    /// Load config.yaml when present, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Config::default().with_env_overrides()
        }
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("NLSQL_DB_PATH") {
            self.database.path = path;
        }

        if let Ok(backend) = std::env::var("NLSQL_BACKEND") {
            self.generator.backend = BackendKind::parse(&backend)?;
        }
        if let Ok(model) = std::env::var("NLSQL_MODEL") {
            self.generator.model = model;
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            self.generator.ollama_url = url;
        }
        if let Ok(timeout) = std::env::var("NLSQL_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.generator.timeout_secs = secs;
            }
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            self.logging.output = output;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            self.logging.directory = dir;
        }

        Ok(self)
    }

    /// Get OpenAI API key from environment (must be in .env).
    pub fn get_openai_api_key() -> Result<String, ConfigError> {
        std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, "data/database.db");
        assert_eq!(config.generator.backend, BackendKind::Ollama);
        assert_eq!(config.generator.model, "mistral");
        assert_eq!(config.generator.ollama_url, "http://localhost:11434");
        assert_eq!(config.generator.timeout_secs, 120);
        assert_eq!(config.logging.level, "info");
        assert!(config.history.enabled);
    }

    #[test]
    fn test_yaml_round_trip_with_env_override() {
        std::env::set_var("NLSQL_BACKEND", "openai");
        std::env::set_var("NLSQL_MODEL", "gpt-4o-mini");

        let config_yaml = r#"
database:
  path: "data/demo.db"
generator:
  backend: "ollama"
  model: "mistral"
  ollama_url: "http://localhost:11434"
  timeout_secs: 30
logging:
  level: "info"
  format: "pretty"
  output: "stdout"
  directory: "./logs"
history:
  enabled: false
  path: "history.json"
"#;
        let temp_file = std::env::temp_dir().join("nlsql_test_config.yaml");
        std::fs::write(&temp_file, config_yaml).unwrap();

        let config = Config::load(&temp_file).unwrap();
        assert_eq!(config.database.path, "data/demo.db");
        assert_eq!(config.generator.backend, BackendKind::OpenAi); // Overridden
        assert_eq!(config.generator.model, "gpt-4o-mini"); // Overridden
        assert_eq!(config.generator.timeout_secs, 30);
        assert!(!config.history.enabled);

        std::env::remove_var("NLSQL_BACKEND");
        std::env::remove_var("NLSQL_MODEL");
        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(matches!(
            BackendKind::parse("gemini"),
            Err(ConfigError::UnknownBackend(_))
        ));
    }
}
