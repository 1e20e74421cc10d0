//! Manifold HTTP Client - Authenticated REST Client with Retries
//!
//! Wraps reqwest with URL building, per-endpoint authorization,
//! status classification and bounded exponential-backoff retries for
//! every Manifold REST API interaction. Each attempt is reported to
//! the injected `Telemetry` sink.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::debug;

use super::auth::{ApiCredentials, AuthScheme};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::ports::telemetry::Telemetry;

/// Empty query string.
pub const NO_QUERY: &[(&str, &str)] = &[];

/// Configuration for the Manifold HTTP client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
  /// Base URL of the API, without the `/v0` prefix.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
  /// Maximum retries on transient errors.
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl Default for ApiClientConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.manifold.markets".to_string(),
      timeout: Duration::from_secs(30),
      max_retries: 3,
      retry_base_delay: Duration::from_millis(200),
    }
  }
}

impl From<&ApiConfig> for ApiClientConfig {
  fn from(config: &ApiConfig) -> Self {
    Self {
      base_url: config.base_url.clone(),
      timeout: Duration::from_secs(config.timeout_seconds),
      max_retries: config.max_retries,
      retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
    }
  }
}

impl ApiClientConfig {
  /// Delay before retry number `retry` (1-based).
  pub fn backoff(&self, retry: u32) -> Duration {
    self
      .retry_base_delay
      .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
  }
}

/// HTTP client for the Manifold REST API.
pub struct ManifoldClient {
  /// Underlying HTTP client.
  http: Client,
  /// Parsed base URL.
  base_url: Url,
  /// API key holder.
  auth: Arc<ApiCredentials>,
  /// Client configuration.
  config: ApiClientConfig,
  /// Observability sink.
  telemetry: Arc<dyn Telemetry>,
}

impl ManifoldClient {
  /// Create a new client.
  ///
  /// # Errors
  /// Fails if the base URL cannot carry a path or the HTTP client
  /// cannot be built.
  pub fn new(
    auth: Arc<ApiCredentials>,
    config: ApiClientConfig,
    telemetry: Arc<dyn Telemetry>,
  ) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
    anyhow::ensure!(
      !base_url.cannot_be_a_base(),
      "API base URL cannot carry a path: {}",
      config.base_url
    );

    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self {
      http,
      base_url,
      auth,
      config,
      telemetry,
    })
  }

  /// Absolute URL for `segments`, each percent-encoded as one path segment.
  pub fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  /// GET `segments` with `query` as the query string and decode the JSON body.
  pub async fn get<T, Q>(&self, segments: &[&str], query: &Q, scheme: AuthScheme) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    Q: Serialize + Sync + ?Sized,
  {
    let url = self.url(segments);
    let body = self
      .execute_with_retry(
        || self.http.get(url.clone()).query(query),
        "GET",
        url.path(),
        scheme,
        self.config.max_retries,
      )
      .await?;
    decode("GET", url.path(), &body)
  }

  /// POST `body` as JSON to `segments` and decode the JSON response.
  ///
  /// Sent exactly once: a POST that timed out or failed with a 5xx may
  /// still have been applied remotely.
  pub async fn post<T, B>(&self, segments: &[&str], body: &B, scheme: AuthScheme) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + Sync + ?Sized,
  {
    let url = self.url(segments);
    let response = self
      .execute_with_retry(|| self.http.post(url.clone()).json(body), "POST", url.path(), scheme, 0)
      .await?;
    decode("POST", url.path(), &response)
  }

  /// Send a request built by `build` until it succeeds, fails
  /// permanently, or `max_retries` retries are spent. Returns the raw body.
  async fn execute_with_retry<F>(
    &self,
    build: F,
    method: &'static str,
    path: &str,
    scheme: AuthScheme,
    max_retries: u32,
  ) -> Result<String, ApiError>
  where
    F: Fn() -> RequestBuilder + Sync,
  {
    let authorization = self.auth.authorization(scheme, path)?;
    let mut attempt: u32 = 0;

    loop {
      if attempt > 0 {
        let delay = self.config.backoff(attempt);
        debug!(attempt, delay_ms = delay.as_millis(), path, "Retrying request");
        sleep(delay).await;
      }
      attempt += 1;

      let mut request = build();
      if let Some(value) = &authorization {
        request = request.header(AUTHORIZATION, value);
      }

      let started = Instant::now();
      let error = match request.send().await {
        Ok(response) => {
          let status = response.status();
          match response.text().await {
            Ok(body) => {
              self
                .telemetry
                .api_response(method, path, status.as_u16(), started.elapsed(), &body);
              if matches!(status, StatusCode::OK | StatusCode::CREATED) {
                return Ok(body);
              }
              ApiError::from_status(status.as_u16(), body)
            }
            Err(e) => ApiError::Transport(e),
          }
        }
        Err(e) => ApiError::Transport(e),
      };

      let will_retry = error.is_transient() && attempt <= max_retries;
      self
        .telemetry
        .api_failure(method, path, &error, attempt, will_retry);
      if !will_retry {
        return Err(error);
      }
    }
  }

  /// Get a reference to the credentials.
  pub fn auth(&self) -> &ApiCredentials {
    &self.auth
  }

  /// Get a reference to the client configuration.
  pub const fn config(&self) -> &ApiClientConfig {
    &self.config
  }
}

fn decode<T: DeserializeOwned>(method: &str, path: &str, body: &str) -> Result<T, ApiError> {
  serde_json::from_str(body).map_err(|source| ApiError::Decode {
    context: format!("{method} {path}"),
    source,
  })
}
