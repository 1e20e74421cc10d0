//! Telemetry Port - Injected Observability Collaborator
//!
//! A single sink for everything the bot reports: API traffic, poll
//! progress, signals and order outcomes. Components receive it at
//! construction instead of printing on their own. Every hook has an
//! empty default so implementors only override what they record.

use std::time::Duration;

use crate::domain::market::Market;
use crate::domain::order::{BetPlacement, LimitOrder};
use crate::error::ApiError;

/// Observability hooks.
#[allow(unused_variables)]
pub trait Telemetry: Send + Sync + 'static {
  /// A request completed with an HTTP status (success or not).
  fn api_response(&self, method: &str, path: &str, status: u16, elapsed: Duration, body: &str) {}

  /// A request attempt failed. `will_retry` is false for the final attempt.
  fn api_failure(&self, method: &str, path: &str, error: &ApiError, attempt: u32, will_retry: bool) {}

  /// A poll iteration fetched `markets` markets.
  fn poll_started(&self, markets: usize) {}

  /// The market list could not be fetched.
  fn poll_failed(&self, error: &ApiError, consecutive_failures: u32) {}

  /// A market's bet snapshot matched the cached one.
  fn no_new_bets(&self, market: &Market) {}

  /// The evaluator proposed an order.
  fn signal_fired(&self, market: &Market, order: &LimitOrder) {}

  /// The service accepted an order.
  fn order_placed(&self, order: &LimitOrder, placement: &BetPlacement) {}

  /// The service rejected an order, or it never reached the service.
  fn order_failed(&self, order: &LimitOrder, error: &ApiError) {}

  /// Number of markets currently held by the activity cache.
  fn cache_size(&self, entries: usize) {}
}

/// Telemetry sink that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {}
