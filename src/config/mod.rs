//! Configuration management for forkast
//!
//! One `Config` value is built at process start (from a TOML file, from
//! environment variables, or both) and handed to every component
//! constructor. Nothing reads configuration after startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::aspect::AspectConfig;
use crate::cuisine::CuisineConfig;
use crate::entity::EntityConfig;
use crate::sentiment::SentimentConfig;
use crate::text::NormalizerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Sentiment thresholds and lexicon
    pub sentiment: SentimentConfig,

    /// Aspect keyword lists
    pub aspects: AspectConfig,

    /// Cuisine keyword sets
    pub cuisine: CuisineConfig,

    /// Entity gazetteers and limits
    pub entities: EntityConfig,

    /// Stopwords
    pub normalizer: NormalizerConfig,

    /// Web server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Reviews shorter than this (in characters, after trimming) are rejected
    pub min_review_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            min_review_chars: 10,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {name}: '{value}'")),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Load configuration from environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from an optional file, then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override values from `FORKAST_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_parse::<f32>("FORKAST_POSITIVE_THRESHOLD")? {
            self.sentiment.positive_threshold = v;
        }
        if let Some(v) = env_parse::<f32>("FORKAST_NEGATIVE_THRESHOLD")? {
            self.sentiment.negative_threshold = v;
        }
        if let Ok(path) = std::env::var("FORKAST_LEXICON_PATH") {
            self.sentiment.lexicon_path = Some(PathBuf::from(path));
        }
        if let Some(v) = env_parse::<f32>("FORKAST_MIN_CUISINE_SCORE")? {
            self.cuisine.min_score = v;
        }
        if let Ok(path) = std::env::var("FORKAST_GAZETTEER_PATH") {
            self.entities.gazetteer_path = Some(PathBuf::from(path));
        }
        if let Some(v) = env_parse::<usize>("FORKAST_MAX_ENTITIES_PER_CATEGORY")? {
            self.entities.max_per_category = v;
        }
        if let Ok(host) = std::env::var("FORKAST_HOST") {
            self.server.host = host;
        }
        if let Some(v) = env_parse::<u16>("FORKAST_PORT")? {
            self.server.port = v;
        }
        if let Some(v) = env_parse::<usize>("FORKAST_MIN_REVIEW_CHARS")? {
            self.server.min_review_chars = v;
        }
        if let Ok(level) = std::env::var("FORKAST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FORKAST_LOG_FORMAT") {
            self.logging.format = format;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.sentiment.validate()?;
        self.aspects.validate()?;
        self.cuisine.validate()?;
        self.entities.validate()?;

        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host must not be empty");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Socket address the web server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .with_context(|| format!("Invalid bind address: {addr}"))
    }
}
