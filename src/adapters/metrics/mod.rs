//! Metrics and Monitoring Adapters
//!
//! Provides Prometheus metrics export, health check endpoints
//! (/live, /ready) via axum 0.7, and the `tracing`-backed telemetry
//! sink that feeds both.

pub mod health;
pub mod prometheus;
pub mod telemetry;

pub use health::{HealthServer, HealthState};
pub use prometheus::MetricsRegistry;
pub use telemetry::TracingTelemetry;
