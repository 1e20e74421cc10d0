//! Manifold Order Executor - Adapter for Bet Placement
//!
//! Implements the `OrderExecution` port using the shared
//! `ManifoldClient` for authenticated requests. The service's answer
//! is returned as is; rejected orders come back as classified errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use super::client::ManifoldClient;
use crate::domain::market::{Bet, BetId};
use crate::domain::order::{BetPlacement, LimitOrder};
use crate::error::ApiError;
use crate::ports::execution::OrderExecution;

/// Order executor backed by the shared authenticated client.
pub struct ManifoldOrderExecutor {
    client: Arc<ManifoldClient>,
}

impl ManifoldOrderExecutor {
    /// Create a new order executor.
    pub fn new(client: Arc<ManifoldClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderExecution for ManifoldOrderExecutor {
    #[instrument(
        skip(self, order),
        fields(contract = %order.contract_id, outcome = %order.outcome, limit_prob = order.limit_prob)
    )]
    async fn place_limit_order(&self, order: &LimitOrder) -> Result<BetPlacement, ApiError> {
        match self.client.place_bet(order).await {
            Ok(placement) => {
                info!(
                    bet_id = %placement.bet_id,
                    filled = ?placement.is_filled,
                    shares = placement.shares,
                    "Bet placed"
                );
                Ok(placement)
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Bet rejected");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn cancel_bet(&self, bet_id: &BetId) -> Result<Bet, ApiError> {
        let bet = self.client.cancel_bet(bet_id).await?;
        info!(bet_id = %bet.id, "Bet cancelled");
        Ok(bet)
    }
}
