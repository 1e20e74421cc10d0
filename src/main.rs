//! Manifold Contrarian Bot - Entry Point
//!
//! Initializes configuration, logging, the API client and the poll
//! loop. Runs until SIGINT or a fatal loop error.
//!
//! Wiring sequence:
//! 1. Load config.toml (or `$BOT_CONFIG`) + validate, defaults if absent
//! 2. Init tracing (plain or JSON structured logging)
//! 3. Load the API key from env (MANIFOLD_API_KEY, then API_KEY)
//! 4. Build telemetry (tracing + optional Prometheus/readiness)
//! 5. Create ManifoldClient and check connectivity (ping, /me, user lite)
//! 6. Spawn metrics (/metrics) and health (/live + /ready) servers
//! 7. Spawn the PollLoop
//! 8. Wait for SIGINT or loop exit → broadcast shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use manifold_contrarian_bot::adapters::api::{
    ApiClientConfig, ApiCredentials, ManifoldClient, ManifoldMarketData, ManifoldOrderExecutor,
};
use manifold_contrarian_bot::adapters::metrics::{
    HealthServer, HealthState, MetricsRegistry, TracingTelemetry,
};
use manifold_contrarian_bot::config::{self, AppConfig};
use manifold_contrarian_bot::ports::telemetry::Telemetry;
use manifold_contrarian_bot::usecases::PollLoop;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = config::loader::config_path();
    let config = config::loader::load_or_default(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    init_tracing(&config);

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        dry_run = config.bot.dry_run,
        "Starting Manifold contrarian bot"
    );

    // ── 3. Load API key from env ────────────────────────────
    let credentials = Arc::new(ApiCredentials::from_env());
    if !credentials.has_key() {
        anyhow::ensure!(
            config.bot.dry_run,
            "MANIFOLD_API_KEY (or API_KEY) must be set unless bot.dry_run = true"
        );
        warn!("No API key configured, running anonymously in dry-run mode");
    }

    // ── 4. Telemetry ────────────────────────────────────────
    let health = Arc::new(HealthState::new());
    let metrics = if config.metrics.enabled {
        Some(Arc::new(
            MetricsRegistry::new().context("Failed to register metrics")?,
        ))
    } else {
        None
    };

    let mut telemetry = TracingTelemetry::new(config.api.log_responses)
        .with_health(Arc::clone(&health));
    if let Some(metrics) = &metrics {
        telemetry = telemetry.with_metrics(Arc::clone(metrics));
    }
    let telemetry: Arc<dyn Telemetry> = Arc::new(telemetry);

    // ── 5. API client + connectivity check ──────────────────
    let client = Arc::new(
        ManifoldClient::new(
            Arc::clone(&credentials),
            ApiClientConfig::from(&config.api),
            Arc::clone(&telemetry),
        )
        .context("Failed to create Manifold client")?,
    );
    check_connectivity(&client, &config).await?;

    // ── 6. Shutdown channel + background servers ────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);

    let mut server_handles = Vec::new();
    if let Some(metrics) = metrics {
        let bind_address = config.metrics.bind_address.clone();
        let metrics_shutdown = shutdown_tx.subscribe();
        server_handles.push(tokio::spawn(async move {
            if let Err(e) = metrics.serve(bind_address, metrics_shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        }));

        let health_server = HealthServer::new(Arc::clone(&health), config.metrics.health_port);
        let health_shutdown = shutdown_tx.subscribe();
        server_handles.push(tokio::spawn(async move {
            if let Err(e) = health_server.run(health_shutdown).await {
                error!(error = %e, "Health server failed");
            }
        }));
    }

    // ── 7. Spawn poll loop ──────────────────────────────────
    let mut poll_loop = PollLoop::new(
        Arc::new(ManifoldMarketData::new(Arc::clone(&client))),
        Arc::new(ManifoldOrderExecutor::new(Arc::clone(&client))),
        &config,
        Arc::clone(&telemetry),
    )
    .context("Invalid poll configuration")?;

    let engine_shutdown = shutdown_tx.subscribe();
    let engine_health = Arc::clone(&health);
    let mut engine_handle = tokio::spawn(async move {
        engine_health.set_engine_running(true);
        let result = poll_loop.run(engine_shutdown).await;
        engine_health.set_engine_running(false);
        result
    });

    info!("All tasks spawned - bot is running");

    // ── 8. Wait for SIGINT or loop exit ─────────────────────
    let outcome = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
            let _ = shutdown_tx.send(());
            match tokio::time::timeout(Duration::from_secs(30), &mut engine_handle).await {
                Ok(joined) => joined.context("Poll loop task panicked")?,
                Err(_) => {
                    warn!("Poll loop did not stop within 30s");
                    Ok(())
                }
            }
        }
        joined = &mut engine_handle => {
            let _ = shutdown_tx.send(());
            joined.context("Poll loop task panicked")?
        }
    };

    for handle in server_handles {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    match &outcome {
        Ok(()) => info!("Shutdown complete"),
        Err(e) => error!(error = %e, "Poll loop stopped with a fatal error"),
    }
    outcome
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.bot.log_level));

    if config.bot.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Ping the API and, when a key is present, check it against `/me`.
///
/// An unreachable API or a rejected key is fatal unless running dry.
async fn check_connectivity(client: &ManifoldClient, config: &AppConfig) -> Result<()> {
    match client.ping().await {
        Ok(_) => info!(base_url = %config.api.base_url, "Manifold API reachable"),
        Err(e) if config.bot.dry_run => warn!(error = %e, "Manifold API ping failed"),
        Err(e) => return Err(e).context("Manifold API unreachable"),
    }

    if !client.auth().has_key() {
        return Ok(());
    }

    match client.whoami().await {
        Ok((user, profile)) => info!(
            username = %user.username,
            name = %profile.name,
            balance = user.balance,
            "Authenticated"
        ),
        Err(e) if config.bot.dry_run => warn!(error = %e, "API key check failed"),
        Err(e) => return Err(e).context("API key rejected by /v0/me"),
    }

    Ok(())
}
