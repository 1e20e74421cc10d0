//! Poll Loop - Contrarian Bot Main Loop
//!
//! Each iteration:
//! 1. Fetches the candidate markets
//! 2. Fetches each market's most recent bets, in order
//! 3. Skips (and idles) markets whose bets did not change
//! 4. Evaluates the contrarian signal on new activity
//! 5. Places the resulting limit order
//!
//! Requests are issued strictly one after another. Per-market
//! failures never abort an iteration; repeated failures to fetch the
//! market list back off and eventually stop the loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::config::{AppConfig, PollConfig};
use crate::domain::market::{Market, MarketId};
use crate::domain::order::{BetPlacement, LimitOrder};
use crate::domain::signal::SignalEvaluator;
use crate::error::{ApiError, FilterError};
use crate::ports::execution::OrderExecution;
use crate::ports::market_data::MarketData;
use crate::ports::telemetry::Telemetry;

use super::activity_cache::{ActivityCache, Observation};
use super::order_placer::{OrderPlacer, Placement};
use super::snapshot_fetcher::MarketSnapshotFetcher;

/// What the loop did with one market.
#[derive(Debug)]
pub enum MarketOutcome {
  /// Bets could not be fetched; the market was skipped.
  BetsUnavailable(ApiError),
  /// Same bets as last time; the loop idled.
  Unchanged,
  /// New bets, but no signal.
  NoSignal,
  /// Signal fired and the service accepted the order.
  OrderPlaced(BetPlacement),
  /// Signal fired in dry-run mode.
  Simulated(LimitOrder),
  /// Signal fired and the order failed.
  OrderFailed { order: LimitOrder, error: ApiError },
}

/// Per-market outcomes of one iteration, in market order.
#[derive(Debug, Default)]
pub struct PollReport {
  pub outcomes: Vec<(MarketId, MarketOutcome)>,
}

impl PollReport {
  pub fn markets(&self) -> usize {
    self.outcomes.len()
  }

  /// Markets where a signal fired, whatever became of the order.
  pub fn signals(&self) -> usize {
    self
      .outcomes
      .iter()
      .filter(|(_, o)| {
        matches!(
          o,
          MarketOutcome::OrderPlaced(_) | MarketOutcome::Simulated(_) | MarketOutcome::OrderFailed { .. }
        )
      })
      .count()
  }

  pub fn orders_placed(&self) -> usize {
    self
      .outcomes
      .iter()
      .filter(|(_, o)| matches!(o, MarketOutcome::OrderPlaced(_)))
      .count()
  }

  pub fn unchanged(&self) -> usize {
    self
      .outcomes
      .iter()
      .filter(|(_, o)| matches!(o, MarketOutcome::Unchanged))
      .count()
  }

  /// Outcome recorded for `market_id`, if it was visited.
  pub fn outcome(&self, market_id: &str) -> Option<&MarketOutcome> {
    self
      .outcomes
      .iter()
      .find(|(id, _)| id == market_id)
      .map(|(_, o)| o)
  }
}

/// The bot's main loop.
pub struct PollLoop<M: MarketData, E: OrderExecution> {
  /// Market and bet queries.
  fetcher: MarketSnapshotFetcher<M>,
  /// Last seen bets per market.
  cache: ActivityCache,
  /// Contrarian signal.
  evaluator: SignalEvaluator,
  /// Order submission.
  placer: OrderPlacer<E>,
  /// Observability sink.
  telemetry: Arc<dyn Telemetry>,
  /// Pacing and failure policy.
  poll: PollConfig,
  /// Failed market-list fetches in a row.
  consecutive_failures: u32,
}

impl<M: MarketData, E: OrderExecution> PollLoop<M, E> {
  /// Create a new poll loop.
  ///
  /// # Errors
  /// Fails if the configured fetch limits are out of range.
  pub fn new(
    market_data: Arc<M>,
    execution: Arc<E>,
    config: &AppConfig,
    telemetry: Arc<dyn Telemetry>,
  ) -> Result<Self, FilterError> {
    Ok(Self {
      fetcher: MarketSnapshotFetcher::new(market_data, &config.poll)?,
      cache: ActivityCache::from_config(config),
      evaluator: SignalEvaluator::new(config.signal),
      placer: OrderPlacer::new(execution, config.bot.dry_run),
      telemetry,
      poll: config.poll.clone(),
      consecutive_failures: 0,
    })
  }

  /// Run iterations until shutdown or a fatal error.
  ///
  /// # Errors
  /// Returns an error once the market list has failed more than
  /// `poll.max_consecutive_failures` times in a row.
  #[instrument(skip(self, shutdown_rx), name = "poll_loop")]
  pub async fn run(&mut self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
    let signal = self.evaluator.params();
    info!(
      market_limit = self.fetcher.markets_filter().limit_value(),
      bet_limit = self.poll.bet_limit,
      min_bets = signal.min_bets,
      volume_divisor = signal.volume_divisor,
      limit_offset = signal.limit_offset,
      dry_run = self.placer.is_dry_run(),
      "Starting poll loop"
    );

    loop {
      let result = tokio::select! {
        _ = shutdown_rx.recv() => {
          info!("Shutdown signal received, stopping poll loop");
          return Ok(());
        }
        result = self.poll_once() => result,
      };

      let Some(delay) = self.after_poll(result)? else {
        continue;
      };

      tokio::select! {
        _ = shutdown_rx.recv() => {
          info!("Shutdown signal received during backoff, stopping poll loop");
          return Ok(());
        }
        () = sleep(delay) => {}
      }
    }
  }

  /// One iteration over the current market list.
  ///
  /// # Errors
  /// Only a failed market-list fetch is an error; per-market
  /// failures are reported in the `PollReport`.
  pub async fn poll_once(&mut self) -> Result<PollReport, ApiError> {
    let markets = self.fetcher.fetch_markets().await?;
    self.telemetry.poll_started(markets.len());

    let mut report = PollReport::default();
    for market in &markets {
      let outcome = self.visit_market(market).await;
      report.outcomes.push((market.id.clone(), outcome));
    }

    self.cache.purge_expired();
    self.telemetry.cache_size(self.cache.len());

    Ok(report)
  }

  /// Failure bookkeeping after an iteration. Returns the pause to take
  /// before the next one, if any.
  fn after_poll(&mut self, result: Result<PollReport, ApiError>) -> Result<Option<Duration>> {
    match result {
      Ok(report) => {
        self.consecutive_failures = 0;
        debug!(
          markets = report.markets(),
          unchanged = report.unchanged(),
          signals = report.signals(),
          placed = report.orders_placed(),
          "Poll iteration complete"
        );
        Ok(None)
      }
      Err(e) => {
        self.consecutive_failures += 1;
        self.telemetry.poll_failed(&e, self.consecutive_failures);

        if self.consecutive_failures > self.poll.max_consecutive_failures {
          let failures = self.consecutive_failures;
          return Err(anyhow::Error::new(e).context(format!(
            "Market list unavailable after {failures} consecutive failures"
          )));
        }

        let delay = self.poll.failure_backoff(self.consecutive_failures);
        warn!(
          failures = self.consecutive_failures,
          delay_ms = delay.as_millis(),
          "Backing off before next poll"
        );
        Ok(Some(delay))
      }
    }
  }

  async fn visit_market(&mut self, market: &Market) -> MarketOutcome {
    let snapshot = match self.fetcher.fetch_bets(&market.id).await {
      Ok(snapshot) => snapshot,
      Err(e) => {
        warn!(market = %market.id, error = %e, "Bet fetch failed, skipping market");
        return MarketOutcome::BetsUnavailable(e);
      }
    };

    if self.cache.observe(&market.id, snapshot.clone()) == Observation::Unchanged {
      self.telemetry.no_new_bets(market);
      sleep(self.poll.idle_sleep()).await;
      return MarketOutcome::Unchanged;
    }

    let Some(order) = self.evaluator.evaluate(market, &snapshot) else {
      return MarketOutcome::NoSignal;
    };
    self.telemetry.signal_fired(market, &order);

    match self.placer.place(&order).await {
      Ok(Placement::Submitted(placement)) => {
        self.telemetry.order_placed(&order, &placement);
        MarketOutcome::OrderPlaced(placement)
      }
      Ok(Placement::Simulated) => MarketOutcome::Simulated(order),
      Err(error) => {
        self.telemetry.order_failed(&order, &error);
        MarketOutcome::OrderFailed { order, error }
      }
    }
  }

  pub const fn consecutive_failures(&self) -> u32 {
    self.consecutive_failures
  }

  pub const fn cache(&self) -> &ActivityCache {
    &self.cache
  }
}
