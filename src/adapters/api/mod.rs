//! Manifold REST API Adapter
//!
//! Implements the HTTP client for the Manifold Markets REST API.
//! Handles authentication, market and bet queries, and limit order
//! placement and cancellation.
//!
//! Sub-modules:
//! - `auth`: API key loading and `Authorization` header schemes
//! - `client`: HTTP client with status classification and retries
//! - `endpoints`: typed wrappers for every supported endpoint
//! - `markets`: `MarketData` port implementation
//! - `orders`: `OrderExecution` port implementation

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod markets;
pub mod orders;

pub use auth::{ApiCredentials, AuthScheme};
pub use client::{ApiClientConfig, ManifoldClient};
pub use markets::ManifoldMarketData;
pub use orders::ManifoldOrderExecutor;
