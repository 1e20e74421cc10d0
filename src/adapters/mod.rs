//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `api`: Manifold REST API client, auth and port implementations
//! - `metrics`: Prometheus export, health checks and the telemetry sink

pub mod api;
pub mod metrics;
