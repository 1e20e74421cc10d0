//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the bot's workflow. Each use case is a self-contained
//! business operation.
//!
//! Use cases:
//! - `MarketSnapshotFetcher`: candidate markets and their recent bets
//! - `ActivityCache`: last seen bets per market, bounded
//! - `OrderPlacer`: limit order submission (or dry-run logging)
//! - `PollLoop`: the main fetch, compare, evaluate, place loop

pub mod activity_cache;
pub mod order_placer;
pub mod poll_loop;
pub mod snapshot_fetcher;

pub use activity_cache::{ActivityCache, Observation};
pub use order_placer::{OrderPlacer, Placement};
pub use poll_loop::{MarketOutcome, PollLoop, PollReport};
pub use snapshot_fetcher::MarketSnapshotFetcher;
