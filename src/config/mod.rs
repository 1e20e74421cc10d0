//! Configuration Module - TOML-based Bot Configuration
//!
//! Loads and validates configuration from `config.toml`. The API key
//! is never stored here; it comes from the environment (see
//! `adapters::api::auth`). Every field has a default, so a missing
//! file or section yields a runnable configuration.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::domain::signal::SignalParams;

/// Top-level bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Bot identity and run mode.
  #[serde(default)]
  pub bot: BotConfig,
  /// Manifold API client settings.
  #[serde(default)]
  pub api: ApiConfig,
  /// Poll loop sizing and pacing.
  #[serde(default)]
  pub poll: PollConfig,
  /// Contrarian signal parameters.
  #[serde(default)]
  pub signal: SignalParams,
  /// Activity cache bounds.
  #[serde(default)]
  pub cache: CacheConfig,
  /// Metrics and health endpoints.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

impl AppConfig {
  /// Upper bound on one poll iteration: the market list and every bet
  /// fetch with all their retries, one order per market, and one idle
  /// sleep per market.
  pub fn max_iteration(&self) -> Duration {
    let timeout = Duration::from_secs(self.api.timeout_seconds);
    let retries = self.api.max_retries.min(31);
    let backoff_total = Duration::from_millis(self.api.retry_base_delay_ms)
      .saturating_mul((1u32 << retries).saturating_sub(1));
    let get = timeout
      .saturating_mul(retries.saturating_add(1))
      .saturating_add(backoff_total);
    let per_market = get
      .saturating_add(timeout)
      .saturating_add(self.poll.idle_sleep());
    get.saturating_add(per_market.saturating_mul(self.poll.market_limit))
  }

  /// Cache capacity and TTL large enough that a market seen in one
  /// iteration is still remembered in the next.
  pub fn cache_bounds(&self) -> (usize, Duration) {
    let market_limit = usize::try_from(self.poll.market_limit).unwrap_or(usize::MAX);
    (
      self.cache.capacity.max(market_limit),
      self.cache.ttl().max(self.max_iteration()),
    )
  }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Human-readable bot name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Emit logs as JSON lines.
  #[serde(default)]
  pub json_logs: bool,
  /// Log orders instead of submitting them.
  #[serde(default)]
  pub dry_run: bool,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      json_logs: false,
      dry_run: false,
    }
  }
}

/// API endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Manifold REST API base URL.
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
  /// Retries of a transient failure before giving up.
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  /// First retry delay; doubles on each further retry.
  #[serde(default = "default_retry_base_delay")]
  pub retry_base_delay_ms: u64,
  /// Log every response body at info level.
  #[serde(default)]
  pub log_responses: bool,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_seconds: default_timeout(),
      max_retries: default_max_retries(),
      retry_base_delay_ms: default_retry_base_delay(),
      log_responses: false,
    }
  }
}

/// Poll loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
  /// Markets fetched per iteration.
  #[serde(default = "default_market_limit")]
  pub market_limit: u32,
  /// Most recent bets fetched per market.
  #[serde(default = "default_bet_limit")]
  pub bet_limit: u32,
  /// Pause after a market whose bets did not change.
  #[serde(default = "default_idle_sleep")]
  pub idle_sleep_ms: u64,
  /// Failed market-list fetches in a row before the loop gives up.
  #[serde(default = "default_max_consecutive_failures")]
  pub max_consecutive_failures: u32,
  /// Pause after the first failed market-list fetch.
  #[serde(default = "default_failure_backoff")]
  pub failure_backoff_ms: u64,
  /// Upper bound of the failure pause.
  #[serde(default = "default_failure_backoff_max")]
  pub failure_backoff_max_ms: u64,
}

impl Default for PollConfig {
  fn default() -> Self {
    Self {
      market_limit: default_market_limit(),
      bet_limit: default_bet_limit(),
      idle_sleep_ms: default_idle_sleep(),
      max_consecutive_failures: default_max_consecutive_failures(),
      failure_backoff_ms: default_failure_backoff(),
      failure_backoff_max_ms: default_failure_backoff_max(),
    }
  }
}

impl PollConfig {
  pub const fn idle_sleep(&self) -> Duration {
    Duration::from_millis(self.idle_sleep_ms)
  }

  /// Pause after the `failures`-th consecutive failure (1-based),
  /// doubling from `failure_backoff_ms` up to `failure_backoff_max_ms`.
  pub fn failure_backoff(&self, failures: u32) -> Duration {
    let factor = 2u64.saturating_pow(failures.saturating_sub(1));
    Duration::from_millis(
      self
        .failure_backoff_ms
        .saturating_mul(factor)
        .min(self.failure_backoff_max_ms),
    )
  }
}

/// Activity cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Maximum number of markets remembered.
  #[serde(default = "default_cache_capacity")]
  pub capacity: usize,
  /// Age after which a remembered snapshot is forgotten.
  #[serde(default = "default_cache_ttl")]
  pub ttl_seconds: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      capacity: default_cache_capacity(),
      ttl_seconds: default_cache_ttl(),
    }
  }
}

impl CacheConfig {
  pub const fn ttl(&self) -> Duration {
    Duration::from_secs(self.ttl_seconds)
  }
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Enable the Prometheus and health servers.
  #[serde(default)]
  pub enabled: bool,
  /// Metrics server bind address.
  #[serde(default = "default_metrics_addr")]
  pub bind_address: String,
  /// Health check endpoint port.
  #[serde(default = "default_health_port")]
  pub health_port: u16,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      bind_address: default_metrics_addr(),
      health_port: default_health_port(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "manifold-contrarian-bot".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_base_url() -> String {
  "https://api.manifold.markets".to_string()
}

fn default_timeout() -> u64 {
  30
}

fn default_max_retries() -> u32 {
  3
}

fn default_retry_base_delay() -> u64 {
  200
}

fn default_market_limit() -> u32 {
  10
}

fn default_bet_limit() -> u32 {
  5
}

fn default_idle_sleep() -> u64 {
  1000
}

fn default_max_consecutive_failures() -> u32 {
  10
}

fn default_failure_backoff() -> u64 {
  1000
}

fn default_failure_backoff_max() -> u64 {
  60_000
}

fn default_cache_capacity() -> usize {
  1024
}

fn default_cache_ttl() -> u64 {
  86_400 // 1 day
}

fn default_metrics_addr() -> String {
  "0.0.0.0:9090".to_string()
}

fn default_health_port() -> u16 {
  8080
}
