use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::retry::RetryPolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Retry behaviour for every HTTP call
    #[serde(default)]
    pub retry: RetryConfig,

    /// Where and how segment files are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Fixed vocabulary of the generated documents
    #[serde(default)]
    pub openie: OpenIeConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Remote API configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    // @field: Base URL shared by both endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    // @field: Path of the tag dictionary endpoint
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: String,

    // @field: Path of the paginated list endpoint
    #[serde(default = "default_page_path")]
    pub page_path: String,

    // @field: Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    // @field: Connect and read timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dictionary_path: default_dictionary_path(),
            page_path: default_page_path(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Full URL of an endpoint path relative to `base_url`
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)
            .with_context(|| format!("Invalid API base URL: {}", self.base_url))?;
        base.join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid endpoint path: {}", path))
    }

    pub fn dictionary_url(&self) -> Result<Url> {
        self.endpoint_url(&self.dictionary_path)
    }

    pub fn page_url(&self) -> Result<Url> {
        self.endpoint_url(&self.page_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in seconds
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: f64,

    /// Multiplier applied to the delay after each retry
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_secs: default_initial_delay_secs(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl RetryConfig {
    /// `initial_delay_secs` as a `Duration`; negative, non-finite or overflowing values are rejected
    pub fn initial_delay(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.initial_delay_secs).map_err(|e| {
            anyhow!(
                "retry.initial_delay_secs must be a non-negative number of seconds, got {}: {}",
                self.initial_delay_secs,
                e
            )
        })
    }

    pub fn policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy::new(
            self.max_retries,
            self.initial_delay()?,
            self.backoff_factor,
        ))
    }
}

/// Output configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Directory receiving the segment files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Prefix used for document ids and segment file names
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Maximum number of documents per segment file
    #[serde(default = "default_segment_size")]
    pub segment_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            segment_size: default_segment_size(),
        }
    }
}

/// Fixed labels written into every document
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenIeConfig {
    /// Entity prepended to every document, never turned into a triple
    #[serde(default = "default_sentinel_entity")]
    pub sentinel_entity: String,

    /// Predicate of every generated triple
    #[serde(default = "default_predicate")]
    pub predicate: String,

    /// Placeholder written as `avg_ent_words`
    #[serde(default = "default_avg_ent_words")]
    pub avg_ent_words: f64,
}

impl Default for OpenIeConfig {
    fn default() -> Self {
        Self {
            sentinel_entity: default_sentinel_entity(),
            predicate: default_predicate(),
            avg_ent_words: default_avg_ent_words(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_base_url() -> String {
    "https://hguofichp.cn:10086/machine".to_string()
}

fn default_dictionary_path() -> String {
    "dictList".to_string()
}

fn default_page_path() -> String {
    "Page".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_secs() -> f64 {
    1.0
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_output_dir() -> String {
    "openie".to_string()
}

fn default_file_prefix() -> String {
    "sb6657".to_string()
}

fn default_segment_size() -> usize {
    1000
}

fn default_sentinel_entity() -> String {
    "烂梗".to_string()
}

fn default_predicate() -> String {
    "包含烂梗".to_string()
}

fn default_avg_ent_words() -> f64 {
    1.0
}

impl Config {
    /// Load the configuration at `path`, writing a default one first if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            let config_json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;
            std::fs::write(path, config_json)
                .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
            Ok(config)
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.api.dictionary_url()?;
        self.api.page_url()?;

        if self.api.page_size == 0 {
            return Err(anyhow!("api.page_size must be greater than 0"));
        }
        if self.output.segment_size == 0 {
            return Err(anyhow!("output.segment_size must be greater than 0"));
        }
        if self.output.file_prefix.trim().is_empty() {
            return Err(anyhow!("output.file_prefix must not be empty"));
        }
        if self.retry.backoff_factor.is_nan() || self.retry.backoff_factor < 1.0 {
            return Err(anyhow!("retry.backoff_factor must be at least 1.0"));
        }
        self.retry.initial_delay()?;
        if self.openie.sentinel_entity.is_empty() {
            return Err(anyhow!("openie.sentinel_entity must not be empty"));
        }
        if self.openie.predicate.is_empty() {
            return Err(anyhow!("openie.predicate must not be empty"));
        }

        Ok(())
    }
}
