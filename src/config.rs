use crate::error::ConfigError;
use crate::grdf::endpoints::PORTAL_URL;
use crate::retry::RetryPolicy;
use reqwest::Url;
use serde_derive::Deserialize;
use std::str::FromStr;
use std::time::Duration;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn load_app_config() -> Result<AppConfig, ConfigError> {
    envy::from_env::<AppConfig>().map_err(ConfigError::env_parse)
}

fn default_interval_sec() -> u64 {
    4 * 60 * 60
}

fn default_initial_delay_sec() -> u64 {
    5
}

fn default_task_timeout_seconds() -> u64 {
    30 * 60
}

#[derive(Deserialize, Debug)]
pub struct CollectorConfig {
    #[serde(default = "default_interval_sec")]
    pub interval_sec: u64,
    // delay before the first scrape after startup
    #[serde(default = "default_initial_delay_sec")]
    pub initial_delay_sec: u64,
    #[serde(default = "default_task_timeout_seconds")]
    pub task_timeout_seconds: u64,
}

pub fn load_collector_config() -> Result<CollectorConfig, ConfigError> {
    envy::prefixed("COLLECTOR_")
        .from_env::<CollectorConfig>()
        .map_err(ConfigError::env_parse)
}

/// How the month and last-month sensors are computed.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MonthAggregation {
    /// Trust the monthly totals the portal reports.
    #[default]
    Reported,
    /// Add up the daily readings of each month.
    SumOfDays,
}

fn default_grdf_url() -> String {
    PORTAL_URL.to_string()
}

fn default_timeout_sec() -> u64 {
    30
}

#[derive(Deserialize, Debug, Clone)]
pub struct GrdfConfig {
    #[serde(default = "default_grdf_url")]
    pub url: String,
    pub username: String,
    pub password: String,
    /// Price of one kWh, in euros.
    pub cost: f64,
    /// Delivery point identifier, only used to tag written points.
    pub pce: Option<String>,
    #[serde(default)]
    pub month_aggregate: MonthAggregation,
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

pub(crate) fn load_grdf_config() -> Result<GrdfConfig, ConfigError> {
    let config = envy::prefixed("GRDF_")
        .from_env::<GrdfConfig>()
        .map_err(ConfigError::env_parse)?;
    validate_grdf_config(&config)?;
    Ok(config)
}

fn validate_grdf_config(config: &GrdfConfig) -> Result<(), ConfigError> {
    if !config.cost.is_finite() || config.cost < 0.0 {
        return Err(ConfigError::invalid(
            "GRDF_COST",
            format!("must be a non-negative number, got {}", config.cost),
        ));
    }
    if config.username.trim().is_empty() {
        return Err(ConfigError::invalid("GRDF_USERNAME", "must not be empty"));
    }
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::invalid("GRDF_URL", format!("'{}': {}", config.url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "GRDF_URL",
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

fn default_tries() -> u32 {
    4
}

fn default_delay_sec() -> u64 {
    60
}

fn default_backoff() -> u32 {
    3
}

#[derive(Deserialize, Debug)]
pub struct RetryConfig {
    #[serde(default = "default_tries")]
    pub tries: u32,
    #[serde(default = "default_delay_sec")]
    pub delay_sec: u64,
    #[serde(default = "default_backoff")]
    pub backoff: u32,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.tries, Duration::from_secs(self.delay_sec), self.backoff)
    }
}

pub fn load_retry_config() -> Result<RetryConfig, ConfigError> {
    let config = envy::prefixed("RETRY_")
        .from_env::<RetryConfig>()
        .map_err(ConfigError::env_parse)?;
    if config.tries == 0 {
        return Err(ConfigError::invalid("RETRY_TRIES", "must be at least 1"));
    }
    if config.backoff == 0 {
        return Err(ConfigError::invalid("RETRY_BACKOFF", "must be at least 1"));
    }
    Ok(config)
}

#[derive(Deserialize, Debug)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
}

pub fn load_influx_config() -> Result<InfluxConfig, ConfigError> {
    envy::prefixed("INFLUXDB_")
        .from_env::<InfluxConfig>()
        .map_err(ConfigError::env_parse)
}
