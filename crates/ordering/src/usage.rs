//! Daily usage estimation from physical count history.
//!
//! Usage between two consecutive counts is `max(0, previous − current)`; the
//! rate is the mean over all consecutive pairs. A count that goes *up*
//! (a delivery arrived in between) reads as zero usage for that interval, so
//! the estimate runs low around delivery days. Known approximation, kept as is.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use m2go_core::VariantId;
use m2go_inventory::DailyCount;

use crate::error::OrderingError;
use crate::settings::OrderingParams;
use crate::source::OrderingSource;

/// Fewer counts than this in the lookback window yields no estimate.
pub const MIN_COUNTS_FOR_USAGE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UsageEstimate {
    Estimated { rate: f64, observations: usize },
    InsufficientData,
}

impl UsageEstimate {
    /// Daily usage in the variant's own unit (0.0 without data).
    pub fn rate(&self) -> f64 {
        match self {
            UsageEstimate::Estimated { rate, .. } => *rate,
            UsageEstimate::InsufficientData => 0.0,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, UsageEstimate::InsufficientData)
    }
}

impl Default for UsageEstimate {
    fn default() -> Self {
        UsageEstimate::Estimated {
            rate: 0.0,
            observations: 0,
        }
    }
}

impl core::fmt::Display for UsageEstimate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UsageEstimate::Estimated { observations, .. } => {
                write!(f, "based on {observations} count intervals")
            }
            UsageEstimate::InsufficientData => f.write_str("insufficient data"),
        }
    }
}

/// Estimate from counts already ordered ascending by date.
pub fn usage_from_history(counts: &[DailyCount]) -> UsageEstimate {
    if counts.len() < MIN_COUNTS_FOR_USAGE {
        return UsageEstimate::InsufficientData;
    }

    let usages: Vec<f64> = counts
        .windows(2)
        .map(|pair| (pair[0].counted_qty - pair[1].counted_qty).max(0.0))
        .collect();

    UsageEstimate::Estimated {
        rate: usages.iter().sum::<f64>() / usages.len() as f64,
        observations: usages.len(),
    }
}

/// First date inside a lookback window ending at `as_of`.
pub fn lookback_start(as_of: NaiveDate, lookback_days: i64) -> NaiveDate {
    TimeDelta::try_days(lookback_days)
        .and_then(|d| as_of.checked_sub_signed(d))
        .unwrap_or(NaiveDate::MIN)
}

pub(crate) fn estimate_with_lookback<S>(
    source: &S,
    variant_id: VariantId,
    as_of: NaiveDate,
    lookback_days: i64,
) -> UsageEstimate
where
    S: OrderingSource + ?Sized,
{
    let mut counts = source.counts_since(variant_id, lookback_start(as_of, lookback_days));
    // Stable: equal dates keep recording order.
    counts.sort_by_key(|c| c.date);
    usage_from_history(&counts)
}

/// Estimate the daily usage of one variant as of a given date.
///
/// Resolves `lookback_days_for_usage` from the source; a malformed value is
/// fatal.
pub fn estimate_usage<S>(
    source: &S,
    variant_id: VariantId,
    as_of: NaiveDate,
) -> Result<UsageEstimate, OrderingError>
where
    S: OrderingSource + ?Sized,
{
    let lookback_days = OrderingParams::lookback_days(source)?;
    Ok(estimate_with_lookback(source, variant_id, as_of, lookback_days))
}
