//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `MarketData`: market search and bet listing
//! - `OrderExecution`: limit order placement and cancellation
//! - `Telemetry`: logging and metrics sink

pub mod execution;
pub mod market_data;
pub mod telemetry;
