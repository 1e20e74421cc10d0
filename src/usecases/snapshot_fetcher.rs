//! Market Snapshot Fetcher - Candidate Markets and Their Recent Bets
//!
//! Builds the two queries the poll loop runs: newest binary markets
//! closing this month, and the most recent bets of one market. Filters
//! are validated once at construction. Errors pass through unchanged.

use std::sync::Arc;

use tracing::instrument;

use crate::config::PollConfig;
use crate::domain::market::{BetSnapshot, Market};
use crate::domain::query::{BetsFilter, SearchMarketsFilter};
use crate::error::{ApiError, FilterError};
use crate::ports::market_data::MarketData;

/// Fetches market lists and per-market bet snapshots.
pub struct MarketSnapshotFetcher<M: MarketData> {
  /// Market data port.
  market_data: Arc<M>,
  /// Market search query.
  markets_filter: SearchMarketsFilter,
  /// Bets fetched per market.
  bet_limit: u32,
}

impl<M: MarketData> MarketSnapshotFetcher<M> {
  /// Create a fetcher sized by `poll`.
  ///
  /// # Errors
  /// Fails if either limit is outside what the API accepts.
  pub fn new(market_data: Arc<M>, poll: &PollConfig) -> Result<Self, FilterError> {
    let markets_filter = SearchMarketsFilter::closing_soon(poll.market_limit)?;
    BetsFilter::default().limit(poll.bet_limit)?;

    Ok(Self {
      market_data,
      markets_filter,
      bet_limit: poll.bet_limit,
    })
  }

  /// Newest binary markets closing this month.
  pub async fn fetch_markets(&self) -> Result<Vec<Market>, ApiError> {
    self.market_data.search_markets(&self.markets_filter).await
  }

  /// Most recent bets of `market_id`, newest first.
  #[instrument(skip(self))]
  pub async fn fetch_bets(&self, market_id: &str) -> Result<BetSnapshot, ApiError> {
    let filter = BetsFilter::recent_for_market(market_id, self.bet_limit)?;
    self.market_data.list_bets(&filter).await
  }

  pub const fn markets_filter(&self) -> &SearchMarketsFilter {
    &self.markets_filter
  }
}
