//! Integration Tests - End-to-end Bot Component Testing
//!
//! Tests the interaction between usecases, ports, and mock adapters.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mockall::mock;
use serde_json::json;
use tokio::sync::broadcast;

use manifold_contrarian_bot::config::AppConfig;
use manifold_contrarian_bot::domain::market::{Bet, BetId, Market, Outcome};
use manifold_contrarian_bot::domain::order::{BetPlacement, LimitOrder};
use manifold_contrarian_bot::domain::query::{BetsFilter, SearchMarketsFilter};
use manifold_contrarian_bot::error::ApiError;
use manifold_contrarian_bot::ports::execution::OrderExecution;
use manifold_contrarian_bot::ports::market_data::MarketData;
use manifold_contrarian_bot::ports::telemetry::{NoopTelemetry, Telemetry};
use manifold_contrarian_bot::usecases::{MarketOutcome, OrderPlacer, Placement, PollLoop};

// ---- Mock Definitions ----

mock! {
    pub Data {}

    #[async_trait::async_trait]
    impl MarketData for Data {
        async fn search_markets(&self, filter: &SearchMarketsFilter) -> Result<Vec<Market>, ApiError>;
        async fn list_bets(&self, filter: &BetsFilter) -> Result<Vec<Bet>, ApiError>;
    }
}

mock! {
    pub Exec {}

    #[async_trait::async_trait]
    impl OrderExecution for Exec {
        async fn place_limit_order(&self, order: &LimitOrder) -> Result<BetPlacement, ApiError>;
        async fn cancel_bet(&self, bet_id: &BetId) -> Result<Bet, ApiError>;
    }
}

mock! {
    pub Tele {}

    impl Telemetry for Tele {
        fn api_response(&self, method: &str, path: &str, status: u16, elapsed: Duration, body: &str);
        fn api_failure(&self, method: &str, path: &str, error: &ApiError, attempt: u32, will_retry: bool);
        fn poll_started(&self, markets: usize);
        fn poll_failed(&self, error: &ApiError, consecutive_failures: u32);
        fn no_new_bets(&self, market: &Market);
        fn signal_fired(&self, market: &Market, order: &LimitOrder);
        fn order_placed(&self, order: &LimitOrder, placement: &BetPlacement);
        fn order_failed(&self, order: &LimitOrder, error: &ApiError);
        fn cache_size(&self, entries: usize);
    }
}

// ---- Fixtures ----

fn market(id: &str, volume: f64, probability: f64) -> Market {
    serde_json::from_value(json!({
        "id": id,
        "slug": format!("{id}-slug"),
        "question": format!("Question {id}?"),
        "outcomeType": "BINARY",
        "probability": probability,
        "volume": volume,
    }))
    .unwrap()
}

fn bets(entries: &[(f64, Outcome)]) -> Vec<Bet> {
    entries.iter()
        .map(|&(amount, outcome)| Bet::new(amount, outcome))
        .collect()
}

/// YES 5, 4, 2 and NO 1: fires a NO order on a volume-100 market.
fn yes_heavy() -> Vec<Bet> {
    bets(&[
        (5.0, Outcome::Yes),
        (4.0, Outcome::Yes),
        (2.0, Outcome::Yes),
        (1.0, Outcome::No),
    ])
}

fn placement(bet_id: &str) -> BetPlacement {
    serde_json::from_value(json!({ "betId": bet_id, "isFilled": false })).unwrap()
}

fn server_error() -> ApiError {
    ApiError::ServerError {
        body: "internal".to_string(),
    }
}

fn test_config(dry_run: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.bot.dry_run = dry_run;
    config.poll.idle_sleep_ms = 1;
    config.poll.failure_backoff_ms = 1;
    config.poll.failure_backoff_max_ms = 2;
    config.poll.max_consecutive_failures = 2;
    config
}

fn filter_json(filter: &BetsFilter) -> serde_json::Value {
    serde_json::to_value(filter).unwrap()
}

fn filter_contract(filter: &BetsFilter) -> String {
    filter_json(filter)["contractId"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

/// Telemetry accepting every hook, expecting `no_new_bets` exactly `idle` times.
fn telemetry(idle: usize) -> MockTele {
    let mut t = MockTele::new();
    t.expect_api_response().return_const(());
    t.expect_api_failure().return_const(());
    t.expect_poll_started().return_const(());
    t.expect_poll_failed().return_const(());
    t.expect_no_new_bets().times(idle).return_const(());
    t.expect_signal_fired().return_const(());
    t.expect_order_placed().return_const(());
    t.expect_order_failed().return_const(());
    t.expect_cache_size().return_const(());
    t
}

fn poll_loop(data: MockData, exec: MockExec, config: &AppConfig, tele: MockTele) -> PollLoop<MockData, MockExec> {
    PollLoop::new(Arc::new(data), Arc::new(exec), config, Arc::new(tele)).unwrap()
}

// ---- Integration Tests ----

#[tokio::test]
async fn test_end_to_end_yes_flow_places_no_order() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .withf(|filter| *filter == SearchMarketsFilter::closing_soon(10).unwrap())
        .times(1)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.6)]));
    data.expect_list_bets()
        .withf(|filter| {
            let value = filter_json(filter);
            value["contractId"] == "m1" && value["limit"] == 5
        })
        .times(1)
        .returning(|_| Ok(yes_heavy()));

    let mut exec = MockExec::new();
    exec.expect_place_limit_order()
        .withf(|order| {
            order.contract_id == "m1"
                && order.outcome == Outcome::No
                && (order.limit_prob - 0.55).abs() < 1e-9
                && order.amount == 1.0
        })
        .times(1)
        .returning(|_| Ok(placement("b1")));

    let mut bot = poll_loop(data, exec, &test_config(false), telemetry(0));
    let report = bot.poll_once().await.unwrap();

    assert_eq!(report.markets(), 1);
    assert_eq!(report.orders_placed(), 1);
    match report.outcome("m1") {
        Some(MarketOutcome::OrderPlaced(p)) => assert_eq!(p.bet_id, "b1"),
        other => panic!("expected OrderPlaced, got {other:?}"),
    }
}

#[tokio::test]
async fn test_order_body_matches_wire_format() {
    let order = LimitOrder::new("m1", Outcome::No, 0.55, 1.0);
    let body = serde_json::to_value(&order).unwrap();
    assert_eq!(
        body,
        json!({ "contractId": "m1", "limitProb": 0.55, "amount": 1.0, "outcome": "NO" })
    );
}

#[tokio::test]
async fn test_identical_snapshot_is_evaluated_once() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(2)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.6)]));
    data.expect_list_bets().times(2).returning(|_| Ok(yes_heavy()));

    let mut exec = MockExec::new();
    exec.expect_place_limit_order()
        .times(1)
        .returning(|_| Ok(placement("b1")));

    let mut bot = poll_loop(data, exec, &test_config(false), telemetry(1));

    let first = bot.poll_once().await.unwrap();
    assert_eq!(first.orders_placed(), 1);

    let second = bot.poll_once().await.unwrap();
    assert_eq!(second.orders_placed(), 0);
    assert_eq!(second.unchanged(), 1);
    assert!(matches!(second.outcome("m1"), Some(MarketOutcome::Unchanged)));
}

#[tokio::test]
async fn test_changed_snapshot_is_evaluated_again() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_in_mock = Arc::clone(&polls);

    let mut data = MockData::new();
    data.expect_search_markets()
        .times(2)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.6)]));
    data.expect_list_bets().times(2).returning(move |_| {
        if polls_in_mock.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(yes_heavy())
        } else {
            Ok(bets(&[
                (7.0, Outcome::No),
                (6.0, Outcome::No),
                (5.0, Outcome::Yes),
            ]))
        }
    });

    let mut exec = MockExec::new();
    exec.expect_place_limit_order()
        .times(2)
        .returning(|order| Ok(placement(if order.outcome == Outcome::No { "b1" } else { "b2" })));

    let mut bot = poll_loop(data, exec, &test_config(false), telemetry(0));

    bot.poll_once().await.unwrap();
    let second = bot.poll_once().await.unwrap();
    match second.outcome("m1") {
        Some(MarketOutcome::OrderPlaced(p)) => assert_eq!(p.bet_id, "b2"),
        other => panic!("expected a second order, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undersized_cache_still_remembers_every_polled_market() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(2)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.6), market("m2", 100.0, 0.6)]));
    data.expect_list_bets().times(4).returning(|_| Ok(yes_heavy()));

    let mut exec = MockExec::new();
    exec.expect_place_limit_order()
        .times(2)
        .returning(|order| Ok(placement(&format!("b-{}", order.contract_id))));

    let mut config = test_config(false);
    config.cache.capacity = 1;
    config.cache.ttl_seconds = 0;
    let mut bot = poll_loop(data, exec, &config, telemetry(2));

    let first = bot.poll_once().await.unwrap();
    assert_eq!(first.orders_placed(), 2);

    let second = bot.poll_once().await.unwrap();
    assert_eq!(second.orders_placed(), 0);
    assert_eq!(second.unchanged(), 2);
    assert_eq!(bot.cache().len(), 2);
}

#[tokio::test]
async fn test_bet_fetch_error_skips_only_that_market() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(1)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.6), market("m2", 100.0, 0.4)]));
    data.expect_list_bets().times(2).returning(|filter| {
        if filter_contract(filter) == "m1" {
            Err(server_error())
        } else {
            Ok(yes_heavy())
        }
    });

    let mut exec = MockExec::new();
    exec.expect_place_limit_order()
        .withf(|order| order.contract_id == "m2")
        .times(1)
        .returning(|_| Ok(placement("b2")));

    let mut bot = poll_loop(data, exec, &test_config(false), telemetry(0));
    let report = bot.poll_once().await.unwrap();

    assert!(matches!(
        report.outcome("m1"),
        Some(MarketOutcome::BetsUnavailable(ApiError::ServerError { .. }))
    ));
    assert!(matches!(report.outcome("m2"), Some(MarketOutcome::OrderPlaced(_))));
}

#[tokio::test]
async fn test_rejected_order_is_reported_and_loop_continues() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(1)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.6), market("m2", 100.0, 0.6)]));
    data.expect_list_bets().times(2).returning(|_| Ok(yes_heavy()));

    let mut exec = MockExec::new();
    exec.expect_place_limit_order().times(2).returning(|order| {
        if order.contract_id == "m1" {
            Err(ApiError::BadRequest {
                body: "Insufficient balance".to_string(),
            })
        } else {
            Ok(placement("b2"))
        }
    });

    let mut tele = MockTele::new();
    tele.expect_poll_started().return_const(());
    tele.expect_signal_fired().times(2).return_const(());
    tele.expect_order_failed()
        .withf(|order, error| order.contract_id == "m1" && matches!(error, ApiError::BadRequest { .. }))
        .times(1)
        .return_const(());
    tele.expect_order_placed().times(1).return_const(());
    tele.expect_cache_size().return_const(());

    let mut bot = poll_loop(data, exec, &test_config(false), tele);
    let report = bot.poll_once().await.unwrap();

    assert_eq!(report.signals(), 2);
    assert_eq!(report.orders_placed(), 1);
    match report.outcome("m1") {
        Some(MarketOutcome::OrderFailed { order, error }) => {
            assert_eq!(order.outcome, Outcome::No);
            assert!(matches!(error, ApiError::BadRequest { .. }));
        }
        other => panic!("expected OrderFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_two_bet_snapshot_never_places() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(1)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.5)]));
    data.expect_list_bets()
        .times(1)
        .returning(|_| Ok(bets(&[(500.0, Outcome::Yes), (500.0, Outcome::Yes)])));

    let mut exec = MockExec::new();
    exec.expect_place_limit_order().times(0);

    let mut bot = poll_loop(data, exec, &test_config(false), telemetry(0));
    let report = bot.poll_once().await.unwrap();

    assert!(matches!(report.outcome("m1"), Some(MarketOutcome::NoSignal)));
}

#[tokio::test]
async fn test_dry_run_never_calls_execution() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(1)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.6)]));
    data.expect_list_bets().times(1).returning(|_| Ok(yes_heavy()));

    let mut exec = MockExec::new();
    exec.expect_place_limit_order().times(0);

    let mut bot = poll_loop(data, exec, &test_config(true), telemetry(0));
    let report = bot.poll_once().await.unwrap();

    match report.outcome("m1") {
        Some(MarketOutcome::Simulated(order)) => {
            assert_eq!(order.outcome, Outcome::No);
            assert!((order.limit_prob - 0.55).abs() < 1e-9);
        }
        other => panic!("expected Simulated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_market_list_failure_is_an_error() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(1)
        .returning(|_| Err(ApiError::Unknown {
            status: 503,
            body: "maintenance".to_string(),
        }));
    data.expect_list_bets().times(0);

    let mut bot = poll_loop(data, MockExec::new(), &test_config(false), telemetry(0));
    assert!(matches!(
        bot.poll_once().await,
        Err(ApiError::Unknown { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_run_gives_up_after_consecutive_failures() {
    let mut data = MockData::new();
    // max_consecutive_failures = 2: the third failure is fatal.
    data.expect_search_markets()
        .times(3)
        .returning(|_| Err(server_error()));

    let mut tele = MockTele::new();
    tele.expect_poll_failed().times(3).return_const(());

    let mut bot = poll_loop(data, MockExec::new(), &test_config(false), tele);
    let (_tx, rx) = broadcast::channel::<()>(1);

    let result = bot.run(rx).await;
    let error = result.unwrap_err();
    assert!(error.to_string().contains("3 consecutive failures"));
    assert!(matches!(
        error.downcast_ref::<ApiError>(),
        Some(ApiError::ServerError { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_successful_poll_resets_failure_counter() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_mock = Arc::clone(&calls);

    let mut data = MockData::new();
    data.expect_search_markets().returning(move |_| {
        // fail, fail, ok, fail, fail, ok, ...
        if calls_in_mock.fetch_add(1, Ordering::SeqCst) % 3 == 2 {
            Ok(vec![market("m1", 100.0, 0.5)])
        } else {
            Err(server_error())
        }
    });
    data.expect_list_bets().returning(|_| Ok(Vec::new()));

    let tele = {
        let mut t = MockTele::new();
        t.expect_poll_started().return_const(());
        t.expect_poll_failed().return_const(());
        t.expect_no_new_bets().return_const(());
        t.expect_cache_size().return_const(());
        t
    };

    let mut bot = poll_loop(data, MockExec::new(), &test_config(false), tele);
    let (tx, rx) = broadcast::channel::<()>(1);
    let handle = tokio::spawn(async move {
        let result = bot.run(rx).await;
        (bot, result)
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(()).unwrap();
    let (bot, result) = handle.await.unwrap();

    assert!(result.is_ok(), "loop should survive alternating failures: {result:?}");
    assert!(calls.load(Ordering::SeqCst) > 3);
    assert!(bot.consecutive_failures() <= 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_stops_on_shutdown() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .returning(|_| Ok(vec![market("m1", 100.0, 0.5)]));
    data.expect_list_bets()
        .returning(|_| Ok(bets(&[(1.0, Outcome::Yes)])));

    let tele = {
        let mut t = MockTele::new();
        t.expect_poll_started().return_const(());
        t.expect_no_new_bets().return_const(());
        t.expect_cache_size().return_const(());
        t
    };

    let mut bot = poll_loop(data, MockExec::new(), &test_config(false), tele);
    let (tx, rx) = broadcast::channel::<()>(1);
    let handle = tokio::spawn(async move { bot.run(rx).await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_idle_sleep_applies_to_unchanged_markets() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(2)
        .returning(|_| Ok(vec![market("m1", 100.0, 0.5)]));
    data.expect_list_bets()
        .times(2)
        .returning(|_| Ok(bets(&[(1.0, Outcome::Yes)])));

    let mut config = test_config(false);
    config.poll.idle_sleep_ms = 50;
    let mut bot = poll_loop(data, MockExec::new(), &config, telemetry(1));

    let started = std::time::Instant::now();
    bot.poll_once().await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(50));

    let started = std::time::Instant::now();
    bot.poll_once().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_invalid_limits_are_rejected_at_construction() {
    let mut config = test_config(false);
    config.poll.bet_limit = 0;
    let result = PollLoop::new(
        Arc::new(MockData::new()),
        Arc::new(MockExec::new()),
        &config,
        Arc::new(NoopTelemetry),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_market_id_never_reaches_the_api() {
    let mut data = MockData::new();
    data.expect_search_markets()
        .times(1)
        .returning(|_| Ok(vec![market("", 100.0, 0.5)]));
    data.expect_list_bets().times(0);

    let mut bot = poll_loop(data, MockExec::new(), &test_config(false), telemetry(0));
    let report = bot.poll_once().await.unwrap();

    assert!(matches!(
        report.outcome(""),
        Some(MarketOutcome::BetsUnavailable(ApiError::InvalidFilter(_)))
    ));
}

#[test]
fn test_dry_run_placer_short_circuits() {
    let mut exec = MockExec::new();
    exec.expect_place_limit_order().times(0);
    exec.expect_cancel_bet().times(0);

    let placer = OrderPlacer::new(Arc::new(exec), true);
    let order = LimitOrder::new("m1", Outcome::Yes, 0.35, 1.0);

    let placed = tokio_test::block_on(placer.place(&order));
    assert!(matches!(placed, Ok(Placement::Simulated)));

    let cancelled = tokio_test::block_on(placer.cancel(&"b1".to_string()));
    assert!(matches!(cancelled, Ok(None)));
}

#[test]
fn test_live_placer_passes_results_through() {
    let mut exec = MockExec::new();
    exec.expect_place_limit_order()
        .times(1)
        .returning(|_| Err(ApiError::Unauthorized {
            body: "bad key".to_string(),
        }));

    let placer = OrderPlacer::new(Arc::new(exec), false);
    let order = LimitOrder::new("m1", Outcome::Yes, 0.35, 1.0);

    let placed = tokio_test::block_on(placer.place(&order));
    assert!(matches!(placed, Err(ApiError::Unauthorized { .. })));
}
