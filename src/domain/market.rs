//! Core Manifold entities.
//!
//! Markets, bets, users and managrams as the REST API returns them.
//! All types decode from camelCase JSON, ignore unknown fields and
//! default the numeric fields the API omits for some market types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────

/// Market (contract) identifier.
pub type MarketId = String;

/// Bet identifier.
pub type BetId = String;

/// Point-in-time list of a market's most recent bets, newest first.
pub type BetSnapshot = Vec<Bet>;

// ────────────────────────────────────────────
// Outcome
// ────────────────────────────────────────────

/// Side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Yes,
    No,
    /// Answer ids of multiple-choice markets and anything else the API sends.
    #[serde(other)]
    Other,
}

impl Outcome {
    /// The other side of a binary market. `Other` has no opposite.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
            Self::Other => Self::Other,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

// ────────────────────────────────────────────
// Market
// ────────────────────────────────────────────

/// A market as returned by the list, search, id and slug endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: MarketId,
    pub slug: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub creator_username: Option<String>,
    /// `BINARY`, `MULTIPLE_CHOICE`, `PSEUDO_NUMERIC`, ...
    #[serde(default)]
    pub outcome_type: Option<String>,
    /// Current implied probability; only binary markets carry one.
    #[serde(default)]
    pub probability: Option<f64>,
    /// Cumulative traded amount.
    #[serde(default)]
    pub volume: f64,
    #[serde(default, rename = "volume24Hours")]
    pub volume_24_hours: f64,
    /// Unix milliseconds.
    #[serde(default)]
    pub created_time: Option<i64>,
    /// Unix milliseconds.
    #[serde(default)]
    pub close_time: Option<i64>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl Market {
    /// Close time as UTC, if the market has one.
    pub fn close_time(&self) -> Option<DateTime<Utc>> {
        self.close_time.and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

// ────────────────────────────────────────────
// Bet
// ────────────────────────────────────────────

/// A single trade against a market.
///
/// Equality compares every field, so two snapshots are equal only when
/// they hold the same bets in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    #[serde(default)]
    pub id: BetId,
    #[serde(default)]
    pub contract_id: MarketId,
    #[serde(default)]
    pub user_id: Option<String>,
    pub amount: f64,
    pub outcome: Outcome,
    #[serde(default)]
    pub shares: f64,
    #[serde(default)]
    pub prob_before: Option<f64>,
    #[serde(default)]
    pub prob_after: Option<f64>,
    #[serde(default)]
    pub limit_prob: Option<f64>,
    /// Unix milliseconds.
    #[serde(default)]
    pub created_time: Option<i64>,
    #[serde(default)]
    pub is_filled: Option<bool>,
    #[serde(default)]
    pub is_cancelled: Option<bool>,
}

impl Bet {
    /// Build a bare bet carrying only the fields the signal reads.
    pub fn new(amount: f64, outcome: Outcome) -> Self {
        Self {
            id: String::new(),
            contract_id: String::new(),
            user_id: None,
            amount,
            outcome,
            shares: 0.0,
            prob_before: None,
            prob_after: None,
            limit_prob: None,
            created_time: None,
            is_filled: None,
            is_cancelled: None,
        }
    }
}

// ────────────────────────────────────────────
// Users and transfers
// ────────────────────────────────────────────

/// Full user profile (`/v0/user/{username}` and `/v0/me`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub total_deposits: f64,
    #[serde(default)]
    pub created_time: Option<i64>,
}

/// Display-only user profile (`/v0/user/{username}/lite`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteUser {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Peer-to-peer mana transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Managram {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub amount: f64,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub created_time: Option<i64>,
    #[serde(default)]
    pub data: Option<ManagramData>,
}

/// Free-form payload of a managram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagramData {
    #[serde(default)]
    pub message: Option<String>,
}
