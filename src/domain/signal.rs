//! Contrarian volume signal.
//!
//! Looks at the most recent bets on a market and, when one side's
//! recent flow reaches a fixed share of the market's total volume,
//! proposes a small limit order on the other side placed slightly
//! inside the current probability.
//!
//! The threshold compares recent-bet volume against *total* market
//! volume, so its meaning shifts with the bet fetch limit. That ratio
//! is kept as is.

use serde::Deserialize;

use super::market::{Bet, Market, Outcome};
use super::order::LimitOrder;

/// Tunables of the signal.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    /// Minimum snapshot length for the signal to be evaluated.
    pub min_bets: usize,
    /// Threshold is `market.volume / volume_divisor`.
    pub volume_divisor: f64,
    /// Distance of the limit probability from the current probability.
    pub limit_offset: f64,
    /// Order size in mana.
    pub order_amount: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            min_bets: 3,
            volume_divisor: 10.0,
            limit_offset: 0.05,
            order_amount: 1.0,
        }
    }
}

/// Summed bet amounts per side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VolumeTally {
    pub yes: f64,
    pub no: f64,
}

impl VolumeTally {
    /// Sum amounts by outcome. Non-binary outcomes are ignored.
    pub fn from_bets(bets: &[Bet]) -> Self {
        bets.iter().fold(Self::default(), |mut tally, bet| {
            match bet.outcome {
                Outcome::Yes => tally.yes += bet.amount,
                Outcome::No => tally.no += bet.amount,
                Outcome::Other => {}
            }
            tally
        })
    }
}

/// Stateless evaluator of the contrarian signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEvaluator {
    params: SignalParams,
}

impl SignalEvaluator {
    pub const fn new(params: SignalParams) -> Self {
        Self { params }
    }

    pub const fn params(&self) -> &SignalParams {
        &self.params
    }

    /// Decide whether `bets` justify a counter-order on `market`.
    ///
    /// First match wins: a heavy YES flow yields a NO order at
    /// `probability - offset`; otherwise a heavy NO flow yields a YES
    /// order at `probability + offset`. The limit probability is not
    /// clamped.
    pub fn evaluate(&self, market: &Market, bets: &[Bet]) -> Option<LimitOrder> {
        if bets.len() < self.params.min_bets {
            return None;
        }
        let probability = market.probability?;

        let tally = VolumeTally::from_bets(bets);
        let threshold = market.volume / self.params.volume_divisor;

        let (heavy, offset) = if tally.yes >= threshold {
            (Outcome::Yes, -self.params.limit_offset)
        } else if tally.no >= threshold {
            (Outcome::No, self.params.limit_offset)
        } else {
            return None;
        };

        Some(LimitOrder::new(
            market.id.clone(),
            heavy.opposite(),
            probability + offset,
            self.params.order_amount,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(volume: f64, probability: f64) -> Market {
        Market {
            id: "m1".to_string(),
            slug: "m1-slug".to_string(),
            question: String::new(),
            url: None,
            creator_username: None,
            outcome_type: Some("BINARY".to_string()),
            probability: Some(probability),
            volume,
            volume_24_hours: 0.0,
            created_time: None,
            close_time: None,
            is_resolved: false,
            resolution: None,
        }
    }

    fn bets(entries: &[(f64, Outcome)]) -> Vec<Bet> {
        entries.iter().map(|&(amount, outcome)| Bet::new(amount, outcome)).collect()
    }

    #[test]
    fn test_yes_flow_emits_no_order() {
        let evaluator = SignalEvaluator::default();
        let snapshot = bets(&[
            (5.0, Outcome::Yes),
            (4.0, Outcome::Yes),
            (2.0, Outcome::Yes),
            (1.0, Outcome::No),
        ]);

        let order = evaluator.evaluate(&market(100.0, 0.6), &snapshot).unwrap();
        assert_eq!(order.contract_id, "m1");
        assert_eq!(order.outcome, Outcome::No);
        assert!((order.limit_prob - 0.55).abs() < 1e-9);
        assert_eq!(order.amount, 1.0);
    }

    #[test]
    fn test_no_flow_emits_yes_order() {
        let evaluator = SignalEvaluator::default();
        let snapshot = bets(&[(6.0, Outcome::No), (5.0, Outcome::No), (1.0, Outcome::Yes)]);

        let order = evaluator.evaluate(&market(100.0, 0.3), &snapshot).unwrap();
        assert_eq!(order.outcome, Outcome::Yes);
        assert!((order.limit_prob - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_both_sides_heavy_prefers_no_order() {
        let evaluator = SignalEvaluator::default();
        let snapshot = bets(&[(10.0, Outcome::Yes), (5.0, Outcome::Yes), (12.0, Outcome::No)]);

        let order = evaluator.evaluate(&market(100.0, 0.5), &snapshot).unwrap();
        assert_eq!(order.outcome, Outcome::No);
    }

    #[test]
    fn test_two_bets_never_fire() {
        let evaluator = SignalEvaluator::default();
        let snapshot = bets(&[(500.0, Outcome::Yes), (500.0, Outcome::Yes)]);
        assert!(evaluator.evaluate(&market(100.0, 0.5), &snapshot).is_none());
    }

    #[test]
    fn test_below_threshold_is_quiet() {
        let evaluator = SignalEvaluator::default();
        let snapshot = bets(&[(3.0, Outcome::Yes), (3.0, Outcome::No), (3.0, Outcome::Yes)]);
        assert!(evaluator.evaluate(&market(100.0, 0.5), &snapshot).is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let evaluator = SignalEvaluator::default();
        let snapshot = bets(&[(4.0, Outcome::Yes), (4.0, Outcome::Yes), (2.0, Outcome::Yes)]);
        assert!(evaluator.evaluate(&market(100.0, 0.5), &snapshot).is_some());
    }

    #[test]
    fn test_limit_prob_is_not_clamped() {
        let evaluator = SignalEvaluator::default();
        let snapshot = bets(&[(5.0, Outcome::Yes), (5.0, Outcome::Yes), (5.0, Outcome::Yes)]);
        let order = evaluator.evaluate(&market(10.0, 0.02), &snapshot).unwrap();
        assert!(order.limit_prob < 0.0);
    }

    #[test]
    fn test_market_without_probability_is_skipped() {
        let evaluator = SignalEvaluator::default();
        let mut m = market(10.0, 0.5);
        m.probability = None;
        let snapshot = bets(&[(5.0, Outcome::Yes), (5.0, Outcome::Yes), (5.0, Outcome::Yes)]);
        assert!(evaluator.evaluate(&m, &snapshot).is_none());
    }

    #[test]
    fn test_tally_ignores_other_outcomes() {
        let tally = VolumeTally::from_bets(&bets(&[
            (1.0, Outcome::Yes),
            (2.0, Outcome::No),
            (50.0, Outcome::Other),
        ]));
        assert_eq!(tally, VolumeTally { yes: 1.0, no: 2.0 });
    }
}
