//! Domain layer - Manifold entities, request filters and the signal.
//!
//! Pure types and logic with no I/O. Everything here is serializable
//! and testable in isolation.

pub mod market;
pub mod order;
pub mod query;
pub mod signal;

pub use market::{Bet, BetSnapshot, LiteUser, Managram, Market, MarketId, Outcome, User};
pub use order::{BetPlacement, LimitOrder};
pub use query::{BetsFilter, ManagramsFilter, MarketsFilter, SearchMarketsFilter};
pub use signal::{SignalEvaluator, SignalParams, VolumeTally};
