//! Prometheus Metrics Registry - Bot Observability
//!
//! Registers and exposes Prometheus metrics for dashboards. Covers
//! API traffic and latency, poll progress, signals, order outcomes
//! and activity cache size.

use std::sync::Arc;

use anyhow::Context;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tokio::sync::broadcast;
use tracing::{info, instrument};

/// Centralized Prometheus metrics for the bot.
///
/// All metrics follow the naming convention `manifold_bot_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Completed poll iterations.
    pub polls: IntCounter,
    /// Failed market-list fetches.
    pub poll_failures: IntCounter,
    /// Current run of failed market-list fetches.
    pub consecutive_failures: IntGauge,
    /// Markets skipped because their bets did not change.
    pub no_new_bets: IntCounter,
    /// Signals fired, by order outcome.
    pub signals: IntCounterVec,
    /// Orders accepted by the service, by outcome.
    pub orders_placed: IntCounterVec,
    /// Orders that failed, by error kind.
    pub orders_failed: IntCounterVec,
    /// API responses, by method and status code.
    pub api_requests: IntCounterVec,
    /// Retried API attempts, by error kind.
    pub api_retries: IntCounterVec,
    /// API response latency histogram (milliseconds).
    pub api_latency_ms: HistogramVec,
    /// Markets held by the activity cache.
    pub cache_entries: IntGauge,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let polls = IntCounter::new("manifold_bot_polls_total", "Completed poll iterations")?;

        let poll_failures = IntCounter::new(
            "manifold_bot_poll_failures_total",
            "Market list fetches that failed after retries",
        )?;

        let consecutive_failures = IntGauge::new(
            "manifold_bot_consecutive_poll_failures",
            "Current number of consecutive failed market list fetches",
        )?;

        let no_new_bets = IntCounter::new(
            "manifold_bot_no_new_bets_total",
            "Markets skipped because their recent bets were unchanged",
        )?;

        let signals = IntCounterVec::new(
            Opts::new("manifold_bot_signals_total", "Contrarian signals fired"),
            &["outcome"],
        )?;

        let orders_placed = IntCounterVec::new(
            Opts::new("manifold_bot_orders_placed_total", "Limit orders accepted"),
            &["outcome"],
        )?;

        let orders_failed = IntCounterVec::new(
            Opts::new("manifold_bot_orders_failed_total", "Limit orders that failed"),
            &["kind"],
        )?;

        let api_requests = IntCounterVec::new(
            Opts::new("manifold_bot_api_requests_total", "API responses received"),
            &["method", "status"],
        )?;

        let api_retries = IntCounterVec::new(
            Opts::new("manifold_bot_api_retries_total", "API attempts that were retried"),
            &["kind"],
        )?;

        let api_latency_ms = HistogramVec::new(
            HistogramOpts::new(
                "manifold_bot_api_latency_ms",
                "API response latency in milliseconds",
            )
            .buckets(vec![25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 10000.0]),
            &["method"],
        )?;

        let cache_entries = IntGauge::new(
            "manifold_bot_cache_entries",
            "Markets held by the activity cache",
        )?;

        registry.register(Box::new(polls.clone()))?;
        registry.register(Box::new(poll_failures.clone()))?;
        registry.register(Box::new(consecutive_failures.clone()))?;
        registry.register(Box::new(no_new_bets.clone()))?;
        registry.register(Box::new(signals.clone()))?;
        registry.register(Box::new(orders_placed.clone()))?;
        registry.register(Box::new(orders_failed.clone()))?;
        registry.register(Box::new(api_requests.clone()))?;
        registry.register(Box::new(api_retries.clone()))?;
        registry.register(Box::new(api_latency_ms.clone()))?;
        registry.register(Box::new(cache_entries.clone()))?;

        Ok(Self {
            registry,
            polls,
            poll_failures,
            consecutive_failures,
            no_new_bets,
            signals,
            orders_placed,
            orders_failed,
            api_requests,
            api_retries,
            api_latency_ms,
            cache_entries,
        })
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics output is not UTF-8")
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let metrics = Arc::clone(&metrics_self);
                async move {
                    match metrics.render() {
                        Ok(body) => (StatusCode::OK, body),
                        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}
