//! Order Placer - Limit Order Submission
//!
//! Submits limit orders through the execution port and hands the
//! service's verdict back unchanged. No local bounds checks: amount
//! and probability limits are enforced remotely. In dry-run mode
//! orders are logged and never leave the process.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::market::{Bet, BetId};
use crate::domain::order::{BetPlacement, LimitOrder};
use crate::error::ApiError;
use crate::ports::execution::OrderExecution;

/// What happened to a submitted order.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
  /// The service accepted the order.
  Submitted(BetPlacement),
  /// Dry run: the order was not sent.
  Simulated,
}

/// Places orders through the execution port.
pub struct OrderPlacer<E: OrderExecution> {
  /// Execution port.
  execution: Arc<E>,
  /// Log instead of submitting.
  dry_run: bool,
}

impl<E: OrderExecution> OrderPlacer<E> {
  /// Create a new order placer.
  pub fn new(execution: Arc<E>, dry_run: bool) -> Self {
    Self { execution, dry_run }
  }

  pub const fn is_dry_run(&self) -> bool {
    self.dry_run
  }

  /// Submit `order`.
  #[instrument(
    skip(self, order),
    fields(contract = %order.contract_id, outcome = %order.outcome, limit_prob = order.limit_prob, amount = order.amount)
  )]
  pub async fn place(&self, order: &LimitOrder) -> Result<Placement, ApiError> {
    if self.dry_run {
      info!("Dry run, order not submitted");
      return Ok(Placement::Simulated);
    }

    self
      .execution
      .place_limit_order(order)
      .await
      .map(Placement::Submitted)
  }

  /// Cancel a resting limit order. Returns `None` in dry-run mode.
  #[instrument(skip(self))]
  pub async fn cancel(&self, bet_id: &BetId) -> Result<Option<Bet>, ApiError> {
    if self.dry_run {
      info!("Dry run, cancellation not submitted");
      return Ok(None);
    }

    self.execution.cancel_bet(bet_id).await.map(Some)
  }
}
