//! Endpoint filters.
//!
//! One struct per list/search endpoint, enumerating the options the
//! API recognizes with its documented defaults. Limits are validated
//! when set, so a constructed filter is always sendable. Absent
//! options are skipped when the filter is serialized into a query
//! string.

use serde::Serialize;

use crate::error::FilterError;

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<u32, FilterError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FilterError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

fn non_empty(field: &'static str, value: impl Into<String>) -> Result<String, FilterError> {
    let value = value.into();
    if value.trim().is_empty() {
        Err(FilterError::Empty { field })
    } else {
        Ok(value)
    }
}

// ────────────────────────────────────────────
// GET /v0/markets
// ────────────────────────────────────────────

/// Sort key of the plain market listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MarketSort {
    #[default]
    CreatedTime,
    UpdatedTime,
    LastBetTime,
    LastCommentTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Options of the plain market listing.
///
/// Defaults: `limit=500, sort=created-time, order=desc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsFilter {
    limit: u32,
    sort: MarketSort,
    order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<String>,
}

impl Default for MarketsFilter {
    fn default() -> Self {
        Self {
            limit: 500,
            sort: MarketSort::default(),
            order: SortOrder::default(),
            before: None,
            user_id: None,
            group_id: None,
        }
    }
}

impl MarketsFilter {
    pub const MAX_LIMIT: u32 = 1000;

    pub fn limit(mut self, limit: u32) -> Result<Self, FilterError> {
        self.limit = check_range("limit", limit, 1, Self::MAX_LIMIT)?;
        Ok(self)
    }

    pub const fn sort(mut self, sort: MarketSort) -> Self {
        self.sort = sort;
        self
    }

    pub const fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Page cursor: only markets created before this market id.
    pub fn before(mut self, market_id: impl Into<String>) -> Result<Self, FilterError> {
        self.before = Some(non_empty("before", market_id)?);
        Ok(self)
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Result<Self, FilterError> {
        self.user_id = Some(non_empty("userId", user_id)?);
        Ok(self)
    }

    pub fn group_id(mut self, group_id: impl Into<String>) -> Result<Self, FilterError> {
        self.group_id = Some(non_empty("groupId", group_id)?);
        Ok(self)
    }
}

// ────────────────────────────────────────────
// GET /v0/search-markets
// ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SearchSort {
    #[default]
    Score,
    Newest,
    MostPopular,
    DailyScore,
    #[serde(rename = "24-hour-vol")]
    DayVolume,
    Liquidity,
    LastUpdated,
    CloseDate,
    ResolveDate,
    ProbDescending,
    ProbAscending,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SearchFilter {
    #[default]
    All,
    Open,
    Closed,
    Resolved,
    ClosingThisMonth,
    ClosingNextMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    #[default]
    All,
    Binary,
    MultipleChoice,
    PseudoNumeric,
    Bounty,
    Poll,
}

/// Options of the full-text market search.
///
/// Defaults: empty term, `sort=score, filter=all, contractType=ALL,
/// limit=100, offset=0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMarketsFilter {
    term: String,
    sort: SearchSort,
    filter: SearchFilter,
    contract_type: ContractType,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creator_id: Option<String>,
    limit: u32,
    offset: u32,
}

impl Default for SearchMarketsFilter {
    fn default() -> Self {
        Self {
            term: String::new(),
            sort: SearchSort::default(),
            filter: SearchFilter::default(),
            contract_type: ContractType::default(),
            topic_slug: None,
            creator_id: None,
            limit: 100,
            offset: 0,
        }
    }
}

impl SearchMarketsFilter {
    pub const MAX_LIMIT: u32 = 1000;

    /// Binary markets closing this month, newest first.
    pub fn closing_soon(limit: u32) -> Result<Self, FilterError> {
        Self::default()
            .sort(SearchSort::Newest)
            .filter(SearchFilter::ClosingThisMonth)
            .contract_type(ContractType::Binary)
            .limit(limit)
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub const fn sort(mut self, sort: SearchSort) -> Self {
        self.sort = sort;
        self
    }

    pub const fn filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    pub const fn contract_type(mut self, contract_type: ContractType) -> Self {
        self.contract_type = contract_type;
        self
    }

    pub fn topic_slug(mut self, slug: impl Into<String>) -> Result<Self, FilterError> {
        self.topic_slug = Some(non_empty("topicSlug", slug)?);
        Ok(self)
    }

    pub fn creator_id(mut self, creator_id: impl Into<String>) -> Result<Self, FilterError> {
        self.creator_id = Some(non_empty("creatorId", creator_id)?);
        Ok(self)
    }

    pub fn limit(mut self, limit: u32) -> Result<Self, FilterError> {
        self.limit = check_range("limit", limit, 1, Self::MAX_LIMIT)?;
        Ok(self)
    }

    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub const fn limit_value(&self) -> u32 {
        self.limit
    }
}

// ────────────────────────────────────────────
// GET /v0/bets
// ────────────────────────────────────────────

/// Options of the bet listing. Results are newest first.
///
/// Defaults: `limit=1000`, no scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contract_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contract_slug: Option<String>,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<String>,
}

impl Default for BetsFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            username: None,
            contract_id: None,
            contract_slug: None,
            limit: Self::MAX_LIMIT,
            before: None,
            after: None,
        }
    }
}

impl BetsFilter {
    pub const MAX_LIMIT: u32 = 1000;

    /// Most recent `limit` bets of one market.
    pub fn recent_for_market(contract_id: impl Into<String>, limit: u32) -> Result<Self, FilterError> {
        Self::default().contract_id(contract_id)?.limit(limit)
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Result<Self, FilterError> {
        self.user_id = Some(non_empty("userId", user_id)?);
        Ok(self)
    }

    pub fn username(mut self, username: impl Into<String>) -> Result<Self, FilterError> {
        self.username = Some(non_empty("username", username)?);
        Ok(self)
    }

    pub fn contract_id(mut self, contract_id: impl Into<String>) -> Result<Self, FilterError> {
        self.contract_id = Some(non_empty("contractId", contract_id)?);
        Ok(self)
    }

    pub fn contract_slug(mut self, slug: impl Into<String>) -> Result<Self, FilterError> {
        self.contract_slug = Some(non_empty("contractSlug", slug)?);
        Ok(self)
    }

    pub fn limit(mut self, limit: u32) -> Result<Self, FilterError> {
        self.limit = check_range("limit", limit, 1, Self::MAX_LIMIT)?;
        Ok(self)
    }

    /// Page cursor: only bets placed before this bet id.
    pub fn before(mut self, bet_id: impl Into<String>) -> Result<Self, FilterError> {
        self.before = Some(non_empty("before", bet_id)?);
        Ok(self)
    }

    /// Page cursor: only bets placed after this bet id.
    pub fn after(mut self, bet_id: impl Into<String>) -> Result<Self, FilterError> {
        self.after = Some(non_empty("after", bet_id)?);
        Ok(self)
    }
}

// ────────────────────────────────────────────
// GET /v0/managrams
// ────────────────────────────────────────────

/// Options of the managram listing.
///
/// Defaults: `limit=100`, no scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagramsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    to_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_id: Option<String>,
    limit: u32,
    /// Unix milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<i64>,
    /// Unix milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<i64>,
}

impl Default for ManagramsFilter {
    fn default() -> Self {
        Self {
            to_id: None,
            from_id: None,
            limit: Self::MAX_LIMIT,
            before: None,
            after: None,
        }
    }
}

impl ManagramsFilter {
    pub const MAX_LIMIT: u32 = 100;

    pub fn to_id(mut self, user_id: impl Into<String>) -> Result<Self, FilterError> {
        self.to_id = Some(non_empty("toId", user_id)?);
        Ok(self)
    }

    pub fn from_id(mut self, user_id: impl Into<String>) -> Result<Self, FilterError> {
        self.from_id = Some(non_empty("fromId", user_id)?);
        Ok(self)
    }

    pub fn limit(mut self, limit: u32) -> Result<Self, FilterError> {
        self.limit = check_range("limit", limit, 1, Self::MAX_LIMIT)?;
        Ok(self)
    }

    pub const fn before(mut self, millis: i64) -> Self {
        self.before = Some(millis);
        self
    }

    pub const fn after(mut self, millis: i64) -> Self {
        self.after = Some(millis);
        self
    }
}
