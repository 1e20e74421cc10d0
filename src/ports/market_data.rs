//! Market Data Port - Read-side API Interface
//!
//! The two queries the poll loop needs: a filtered market search and
//! a per-market bet listing. Query composition lives in the caller;
//! implementors send the filters as given.

use async_trait::async_trait;

use crate::domain::market::{Bet, Market};
use crate::domain::query::{BetsFilter, SearchMarketsFilter};
use crate::error::ApiError;

/// Trait for market data providers.
#[async_trait]
pub trait MarketData: Send + Sync + 'static {
  /// Markets matching `filter`, in the order the service ranks them.
  async fn search_markets(&self, filter: &SearchMarketsFilter) -> Result<Vec<Market>, ApiError>;

  /// Bets matching `filter`, newest first.
  async fn list_bets(&self, filter: &BetsFilter) -> Result<Vec<Bet>, ApiError>;
}
