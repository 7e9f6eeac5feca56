//! services/studio/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use podcast_studio_core::store::{StoreConfig, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_PERSONAS, MIN_PERSONAS};
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: Level,
    pub max_personas: usize,
    pub max_file_size: u64,
    pub upload_tick: Duration,
    pub processing_delay: Duration,
    pub generation_tick: Duration,
    pub pipeline_timeout: Duration,
    pub demo_audio_url: String,
    pub demo_transcript_url: String,
    pub demo_duration_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            max_personas: DEFAULT_MAX_PERSONAS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            upload_tick: Duration::from_millis(200),
            processing_delay: Duration::from_millis(2000),
            generation_tick: Duration::from_millis(1500),
            pipeline_timeout: Duration::from_secs(600),
            demo_audio_url: "/demo-audio.mp3".to_string(),
            demo_transcript_url: "/demo-transcript.txt".to_string(),
            demo_duration_secs: 847,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Store Limits ---
        let max_personas = parse_var("MAX_PERSONAS", defaults.max_personas)?;
        if max_personas < MIN_PERSONAS {
            return Err(ConfigError::InvalidValue(
                "MAX_PERSONAS".to_string(),
                format!("must be at least {}", MIN_PERSONAS),
            ));
        }
        let max_file_size = parse_var("MAX_FILE_SIZE", defaults.max_file_size)?;

        // --- Pipeline Timing ---
        let upload_tick = millis_var("UPLOAD_TICK_MS", defaults.upload_tick)?;
        let processing_delay = millis_var("PROCESSING_DELAY_MS", defaults.processing_delay)?;
        let generation_tick = millis_var("GENERATION_TICK_MS", defaults.generation_tick)?;
        let pipeline_timeout = Duration::from_secs(parse_var(
            "PIPELINE_TIMEOUT_SECS",
            defaults.pipeline_timeout.as_secs(),
        )?);

        // --- Simulated Output ---
        let demo_audio_url = std::env::var("DEMO_AUDIO_URL").unwrap_or(defaults.demo_audio_url);
        let demo_transcript_url =
            std::env::var("DEMO_TRANSCRIPT_URL").unwrap_or(defaults.demo_transcript_url);
        let demo_duration_secs = parse_var("DEMO_DURATION_SECS", defaults.demo_duration_secs)?;

        Ok(Self {
            log_level,
            max_personas,
            max_file_size,
            upload_tick,
            processing_delay,
            generation_tick,
            pipeline_timeout,
            demo_audio_url,
            demo_transcript_url,
            demo_duration_secs,
        })
    }

    /// The limits the core store enforces.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_personas: self.max_personas,
            max_file_size: self.max_file_size,
        }
    }
}

/// Reads an optional variable, falling back to `default` when it is unset.
fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

fn millis_var(name: &str, default: Duration) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_var(name, default_ms).map(Duration::from_millis)
}
