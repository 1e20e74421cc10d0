//! Market Data Adapter - Manifold Search and Bet Queries
//!
//! Implements the `MarketData` port on top of the shared
//! `ManifoldClient`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::client::ManifoldClient;
use crate::domain::market::{Bet, Market};
use crate::domain::query::{BetsFilter, SearchMarketsFilter};
use crate::error::ApiError;
use crate::ports::market_data::MarketData;

/// Market data adapter that wraps the Manifold HTTP client.
pub struct ManifoldMarketData {
    client: Arc<ManifoldClient>,
}

impl ManifoldMarketData {
    /// Create a new market data adapter.
    pub fn new(client: Arc<ManifoldClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MarketData for ManifoldMarketData {
    async fn search_markets(&self, filter: &SearchMarketsFilter) -> Result<Vec<Market>, ApiError> {
        let markets = self.client.search_markets(filter).await?;
        debug!(count = markets.len(), "Markets fetched");
        Ok(markets)
    }

    async fn list_bets(&self, filter: &BetsFilter) -> Result<Vec<Bet>, ApiError> {
        let bets = self.client.bets(filter).await?;
        debug!(count = bets.len(), "Bets fetched");
        Ok(bets)
    }
}
