//! Tracing Telemetry - Structured Logs, Metrics and Readiness
//!
//! The production `Telemetry` sink. Every hook emits a `tracing`
//! event with structured fields and, when attached, updates the
//! Prometheus registry and the readiness state.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::health::HealthState;
use super::prometheus::MetricsRegistry;
use crate::domain::market::Market;
use crate::domain::order::{BetPlacement, LimitOrder};
use crate::error::ApiError;
use crate::ports::telemetry::Telemetry;

/// Telemetry sink backed by `tracing`.
#[derive(Default)]
pub struct TracingTelemetry {
    metrics: Option<Arc<MetricsRegistry>>,
    health: Option<Arc<HealthState>>,
    /// Log every API response body at info level.
    log_responses: bool,
}

impl TracingTelemetry {
    pub fn new(log_responses: bool) -> Self {
        Self {
            log_responses,
            ..Self::default()
        }
    }

    /// Also record into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Also drive readiness from poll results.
    pub fn with_health(mut self, health: Arc<HealthState>) -> Self {
        self.health = Some(health);
        self
    }
}

impl Telemetry for TracingTelemetry {
    fn api_response(&self, method: &str, path: &str, status: u16, elapsed: Duration, body: &str) {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if self.log_responses {
            info!(method, path, status, elapsed_ms, body, "API response");
        } else {
            debug!(method, path, status, elapsed_ms, "API response");
        }

        if let Some(metrics) = &self.metrics {
            metrics
                .api_requests
                .with_label_values(&[method, &status.to_string()])
                .inc();
            metrics
                .api_latency_ms
                .with_label_values(&[method])
                .observe(elapsed_ms);
        }
    }

    fn api_failure(&self, method: &str, path: &str, error: &ApiError, attempt: u32, will_retry: bool) {
        if will_retry {
            warn!(method, path, attempt, kind = error.kind(), error = %error, "API request failed, retrying");
            if let Some(metrics) = &self.metrics {
                metrics.api_retries.with_label_values(&[error.kind()]).inc();
            }
        } else {
            warn!(method, path, attempt, kind = error.kind(), error = %error, "API request failed");
        }
    }

    fn poll_started(&self, markets: usize) {
        info!(markets, "Markets fetched");
        if let Some(metrics) = &self.metrics {
            metrics.polls.inc();
            metrics.consecutive_failures.set(0);
        }
        if let Some(health) = &self.health {
            health.set_api_reachable(true);
        }
    }

    fn poll_failed(&self, error: &ApiError, consecutive_failures: u32) {
        error!(error = %error, kind = error.kind(), consecutive_failures, "Market list fetch failed");
        if let Some(metrics) = &self.metrics {
            metrics.poll_failures.inc();
            metrics.consecutive_failures.set(i64::from(consecutive_failures));
        }
        if let Some(health) = &self.health {
            health.set_api_reachable(false);
        }
    }

    fn no_new_bets(&self, market: &Market) {
        info!(market = %market.id, "No new bets.");
        if let Some(metrics) = &self.metrics {
            metrics.no_new_bets.inc();
        }
    }

    fn signal_fired(&self, market: &Market, order: &LimitOrder) {
        info!(
            market = %market.id,
            question = %market.question,
            volume = market.volume,
            probability = ?market.probability,
            closes = ?market.close_time(),
            outcome = %order.outcome,
            limit_prob = order.limit_prob,
            amount = order.amount,
            "Signal fired"
        );
        if let Some(metrics) = &self.metrics {
            metrics
                .signals
                .with_label_values(&[&order.outcome.to_string()])
                .inc();
        }
    }

    fn order_placed(&self, order: &LimitOrder, placement: &BetPlacement) {
        info!(
            market = %order.contract_id,
            bet_id = %placement.bet_id,
            outcome = %order.outcome,
            filled = ?placement.is_filled,
            "Order placed"
        );
        if let Some(metrics) = &self.metrics {
            metrics
                .orders_placed
                .with_label_values(&[&order.outcome.to_string()])
                .inc();
        }
    }

    fn order_failed(&self, order: &LimitOrder, error: &ApiError) {
        warn!(
            market = %order.contract_id,
            outcome = %order.outcome,
            kind = error.kind(),
            error = %error,
            "Order failed"
        );
        if let Some(metrics) = &self.metrics {
            metrics.orders_failed.with_label_values(&[error.kind()]).inc();
        }
    }

    fn cache_size(&self, entries: usize) {
        debug!(entries, "Activity cache size");
        if let Some(metrics) = &self.metrics {
            metrics
                .cache_entries
                .set(i64::try_from(entries).unwrap_or(i64::MAX));
        }
    }
}
