//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;
use crate::domain::query::{BetsFilter, SearchMarketsFilter};

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_VAR: &str = "BOT_CONFIG";

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Config file path: `BOT_CONFIG` if set, else `config.toml`.
pub fn config_path() -> String {
  std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    path = %path.display(),
    dry_run = config.bot.dry_run,
    market_limit = config.poll.market_limit,
    bet_limit = config.poll.bet_limit,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Like `load_config`, but a missing file yields the validated defaults.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
  if Path::new(path).exists() {
    return load_config(path);
  }

  info!(path, "Config file not found, using defaults");
  let config = AppConfig::default();
  validate_config(&config)?;
  Ok(config)
}

/// Parse and validate TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
pub fn validate_config(config: &AppConfig) -> Result<()> {
  // Bot
  anyhow::ensure!(!config.bot.name.trim().is_empty(), "bot.name must not be empty");
  anyhow::ensure!(
    matches!(
      config.bot.log_level.as_str(),
      "trace" | "debug" | "info" | "warn" | "error"
    ),
    "bot.log_level must be one of trace, debug, info, warn, error, got {}",
    config.bot.log_level
  );

  // API
  anyhow::ensure!(
    config.api.base_url.starts_with("http://") || config.api.base_url.starts_with("https://"),
    "api.base_url must be an http(s) URL, got {}",
    config.api.base_url
  );
  anyhow::ensure!(
    config.api.timeout_seconds > 0,
    "api.timeout_seconds must be positive"
  );
  anyhow::ensure!(
    config.api.max_retries <= 10,
    "api.max_retries must be at most 10, got {}",
    config.api.max_retries
  );

  // Poll
  anyhow::ensure!(
    (1..=SearchMarketsFilter::MAX_LIMIT).contains(&config.poll.market_limit),
    "poll.market_limit must be in [1, {}], got {}",
    SearchMarketsFilter::MAX_LIMIT,
    config.poll.market_limit
  );
  anyhow::ensure!(
    (1..=BetsFilter::MAX_LIMIT).contains(&config.poll.bet_limit),
    "poll.bet_limit must be in [1, {}], got {}",
    BetsFilter::MAX_LIMIT,
    config.poll.bet_limit
  );
  anyhow::ensure!(
    config.poll.max_consecutive_failures > 0,
    "poll.max_consecutive_failures must be positive"
  );
  anyhow::ensure!(
    config.poll.failure_backoff_ms > 0
      && config.poll.failure_backoff_ms <= config.poll.failure_backoff_max_ms,
    "poll.failure_backoff_ms must be positive and at most failure_backoff_max_ms ({}), got {}",
    config.poll.failure_backoff_max_ms,
    config.poll.failure_backoff_ms
  );

  // Signal
  anyhow::ensure!(
    config.signal.volume_divisor > 0.0,
    "signal.volume_divisor must be positive, got {}",
    config.signal.volume_divisor
  );
  anyhow::ensure!(
    config.signal.limit_offset >= 0.0 && config.signal.limit_offset < 1.0,
    "signal.limit_offset must be in [0, 1), got {}",
    config.signal.limit_offset
  );
  anyhow::ensure!(
    config.signal.order_amount > 0.0,
    "signal.order_amount must be positive, got {}",
    config.signal.order_amount
  );

  // Cache
  anyhow::ensure!(config.cache.capacity > 0, "cache.capacity must be positive");
  anyhow::ensure!(
    config.cache.capacity >= config.poll.market_limit as usize,
    "cache.capacity ({}) must hold at least poll.market_limit ({}) markets",
    config.cache.capacity,
    config.poll.market_limit
  );
  anyhow::ensure!(
    config.cache.ttl() > config.max_iteration(),
    "cache.ttl_seconds ({}) must exceed the longest poll iteration ({}s)",
    config.cache.ttl_seconds,
    config.max_iteration().as_secs()
  );

  // Metrics
  anyhow::ensure!(
    !config.metrics.bind_address.is_empty(),
    "metrics.bind_address must not be empty"
  );

  Ok(())
}
