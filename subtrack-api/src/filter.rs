//! List and aggregate filter normalization
//!
//! Raw [`SubscriptionFilter`] values are turned into [`ListFilter`] (list
//! endpoint) or [`PriceRange`] (total endpoint). Empty strings mean "no
//! filter", never "equals empty".

use subtrack_common::models::SubscriptionFilter;
use subtrack_common::{Error, Month, Result};

use crate::pagination::{normalize_page, Page};
use crate::validation::parse_month_field;

/// Month predicate applied by the list query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSelector {
    /// No date restriction
    Any,
    /// Record range contains the month: `start <= month <= end-or-open`
    Containing(Month),
    /// Record range overlaps the given bounds; either bound may be open
    Overlapping {
        start: Option<Month>,
        end: Option<Month>,
    },
}

/// Normalized list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub months: MonthSelector,
    pub page: Page,
}

/// Normalized aggregate query
///
/// Matches records that started on or after `start` and are open-ended or
/// ended by `end`. This is deliberately not the same as list containment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRange {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub start: Month,
    pub end: Month,
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn optional_month(raw: &str, message: &str) -> Result<Option<Month>> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_month_field(raw, message).map(Some)
}

impl ListFilter {
    /// Normalize list parameters. A single month takes priority over a
    /// start/end pair.
    pub fn from_filter(filter: &SubscriptionFilter) -> Result<Self> {
        let months = if !filter.month.is_empty() {
            MonthSelector::Containing(parse_month_field(&filter.month, "invalid month format")?)
        } else {
            let start = optional_month(&filter.start_month, "invalid start_month format")?;
            let end = optional_month(&filter.end_month, "invalid end_month format")?;
            match (start, end) {
                (None, None) => MonthSelector::Any,
                (start, end) => MonthSelector::Overlapping { start, end },
            }
        };

        Ok(Self {
            user_id: non_empty(&filter.user_id),
            service_name: non_empty(&filter.service_name),
            months,
            page: normalize_page(filter.limit, filter.offset),
        })
    }
}

impl PriceRange {
    /// Normalize aggregate parameters. Requires either `month` or both
    /// `start_month` and `end_month`.
    pub fn from_filter(filter: &SubscriptionFilter) -> Result<Self> {
        let (start, end) = if !filter.month.is_empty() {
            let month = parse_month_field(&filter.month, "invalid month format")?;
            (month, month)
        } else {
            if filter.start_month.is_empty() || filter.end_month.is_empty() {
                return Err(Error::validation(
                    "both start_month and end_month must be provided",
                ));
            }
            (
                parse_month_field(&filter.start_month, "invalid start_month format")?,
                parse_month_field(&filter.end_month, "invalid end_month format")?,
            )
        };

        Ok(Self {
            user_id: non_empty(&filter.user_id),
            service_name: non_empty(&filter.service_name),
            start,
            end,
        })
    }
}
