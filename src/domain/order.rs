//! Limit orders and placement results.

use serde::{Deserialize, Serialize};

use super::market::{BetId, MarketId, Outcome};

/// One-shot limit order, serialized as the body of `POST /v0/bet`.
///
/// No bounds are checked locally; the remote service rejects invalid
/// amounts or probabilities with a 400.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrder {
    pub contract_id: MarketId,
    pub limit_prob: f64,
    pub amount: f64,
    pub outcome: Outcome,
}

impl LimitOrder {
    pub fn new(contract_id: impl Into<MarketId>, outcome: Outcome, limit_prob: f64, amount: f64) -> Self {
        Self {
            contract_id: contract_id.into(),
            limit_prob,
            amount,
            outcome,
        }
    }
}

/// Response to a successful bet placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetPlacement {
    pub bet_id: BetId,
    #[serde(default)]
    pub contract_id: Option<MarketId>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    /// Amount actually matched so far.
    #[serde(default)]
    pub amount: f64,
    /// Full size of the limit order.
    #[serde(default)]
    pub order_amount: Option<f64>,
    #[serde(default)]
    pub shares: f64,
    #[serde(default)]
    pub limit_prob: Option<f64>,
    #[serde(default)]
    pub is_filled: Option<bool>,
    #[serde(default)]
    pub is_cancelled: Option<bool>,
}
