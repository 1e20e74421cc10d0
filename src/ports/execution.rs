//! Order Execution Port - Bet Placement Interface
//!
//! Defines the trait the poll loop uses to submit limit orders. The
//! result is the remote service's verdict, passed through unchanged:
//! bounds on amount and probability are enforced remotely and surface
//! as `ApiError::BadRequest`.

use async_trait::async_trait;

use crate::domain::market::{Bet, BetId};
use crate::domain::order::{BetPlacement, LimitOrder};
use crate::error::ApiError;

/// Trait for order execution providers.
#[async_trait]
pub trait OrderExecution: Send + Sync + 'static {
  /// Submit a limit order with the account's credentials.
  async fn place_limit_order(&self, order: &LimitOrder) -> Result<BetPlacement, ApiError>;

  /// Cancel the unfilled part of a limit order.
  async fn cancel_bet(&self, bet_id: &BetId) -> Result<Bet, ApiError>;
}
