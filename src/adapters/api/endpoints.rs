//! Manifold Endpoints - Typed Wrappers over the REST API
//!
//! One method per supported endpoint. Filters arrive pre-validated
//! and are serialized straight into the query string.

use serde_json::{Map, Value};
use tracing::instrument;

use super::auth::AuthScheme;
use super::client::{ManifoldClient, NO_QUERY};
use crate::domain::market::{Bet, BetId, LiteUser, Managram, Market, User};
use crate::domain::order::{BetPlacement, LimitOrder};
use crate::domain::query::{BetsFilter, ManagramsFilter, MarketsFilter, SearchMarketsFilter};
use crate::error::ApiError;

const API_VERSION: &str = "v0";

impl ManifoldClient {
  /// Cheapest public request; succeeds when the API is reachable.
  pub async fn ping(&self) -> Result<Vec<Market>, ApiError> {
    self
      .get(&[API_VERSION, "markets"], &[("limit", "1")][..], AuthScheme::Public)
      .await
  }

  /// Full profile of `username`.
  #[instrument(skip(self))]
  pub async fn user(&self, username: &str) -> Result<User, ApiError> {
    self
      .get(&[API_VERSION, "user", username], NO_QUERY, AuthScheme::Bearer)
      .await
  }

  /// Display-only profile of `username`.
  #[instrument(skip(self))]
  pub async fn user_lite(&self, username: &str) -> Result<LiteUser, ApiError> {
    self
      .get(&[API_VERSION, "user", username, "lite"], NO_QUERY, AuthScheme::Bearer)
      .await
  }

  /// Profile of the account owning the API key.
  pub async fn me(&self) -> Result<User, ApiError> {
    self
      .get(&[API_VERSION, "me"], NO_QUERY, AuthScheme::Key)
      .await
  }

  /// Account owning the API key, with its display profile.
  pub async fn whoami(&self) -> Result<(User, LiteUser), ApiError> {
    let me = self.me().await?;
    let lite = self.user_lite(&me.username).await?;
    Ok((me, lite))
  }

  /// Plain market listing.
  pub async fn markets(&self, filter: &MarketsFilter) -> Result<Vec<Market>, ApiError> {
    self
      .get(&[API_VERSION, "markets"], filter, AuthScheme::Public)
      .await
  }

  /// Market by id.
  #[instrument(skip(self))]
  pub async fn market(&self, market_id: &str) -> Result<Market, ApiError> {
    self
      .get(&[API_VERSION, "market", market_id], NO_QUERY, AuthScheme::Public)
      .await
  }

  /// Market by slug.
  #[instrument(skip(self))]
  pub async fn market_by_slug(&self, slug: &str) -> Result<Market, ApiError> {
    self
      .get(&[API_VERSION, "slug", slug], NO_QUERY, AuthScheme::Public)
      .await
  }

  /// Full-text market search.
  pub async fn search_markets(&self, filter: &SearchMarketsFilter) -> Result<Vec<Market>, ApiError> {
    self
      .get(&[API_VERSION, "search-markets"], filter, AuthScheme::Public)
      .await
  }

  /// Bet listing, newest first.
  pub async fn bets(&self, filter: &BetsFilter) -> Result<Vec<Bet>, ApiError> {
    self
      .get(&[API_VERSION, "bets"], filter, AuthScheme::Public)
      .await
  }

  /// Managram listing.
  pub async fn managrams(&self, filter: &ManagramsFilter) -> Result<Vec<Managram>, ApiError> {
    self
      .get(&[API_VERSION, "managrams"], filter, AuthScheme::Public)
      .await
  }

  /// Place a limit order.
  pub async fn place_bet(&self, order: &LimitOrder) -> Result<BetPlacement, ApiError> {
    self
      .post(&[API_VERSION, "bet"], order, AuthScheme::Key)
      .await
  }

  /// Cancel the unfilled remainder of a limit order.
  #[instrument(skip(self))]
  pub async fn cancel_bet(&self, bet_id: &BetId) -> Result<Bet, ApiError> {
    self
      .post(
        &[API_VERSION, "bet", "cancel", bet_id.as_str()],
        &Map::<String, Value>::new(),
        AuthScheme::Key,
      )
      .await
  }
}
