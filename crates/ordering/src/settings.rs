//! Tunable ordering parameters.
//!
//! Settings are a flat key → string map owned by the store. Lookups fall back
//! to compiled-in defaults; numeric parsing happens here, at the point of use,
//! and a malformed value aborts the whole computation.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use m2go_core::{DomainError, DomainResult};

use crate::error::OrderingError;
use crate::source::OrderingSource;

pub const LOOKBACK_DAYS_FOR_USAGE: &str = "lookback_days_for_usage";
pub const SAFETY_BUFFER_DAYS: &str = "safety_buffer_days";
pub const COVER_DAYS_MONDAY: &str = "cover_days_monday";
pub const COVER_DAYS_FRIDAY: &str = "cover_days_friday";
pub const CUTOFF_TIME: &str = "cutoff_time";

const COVER_DAYS_PREFIX: &str = "cover_days_";

const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    (LOOKBACK_DAYS_FOR_USAGE, "14"),
    (SAFETY_BUFFER_DAYS, "0.8"),
    (COVER_DAYS_MONDAY, "4"),
    (COVER_DAYS_FRIDAY, "4"),
    (CUTOFF_TIME, "17:00"),
];

pub fn default_setting(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Stored value, else the default, else the empty string.
pub fn resolve_setting<S>(source: &S, key: &str) -> String
where
    S: OrderingSource + ?Sized,
{
    source
        .setting(key)
        .or_else(|| default_setting(key).map(str::to_string))
        .unwrap_or_default()
}

/// Settings key holding the cover days of an ordering cycle.
pub fn cover_days_key(cycle: &str) -> String {
    format!("{COVER_DAYS_PREFIX}{}", cycle.trim().to_lowercase())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, OrderingError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|e| OrderingError::malformed(key, value, e))?;
    if !parsed.is_finite() {
        return Err(OrderingError::malformed(key, value, "not a finite number"));
    }
    Ok(parsed)
}

fn parse_days(key: &str, value: &str) -> Result<i64, OrderingError> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|e| OrderingError::malformed(key, value, e))?;
    if parsed < 0 {
        return Err(OrderingError::malformed(key, value, "must not be negative"));
    }
    Ok(parsed)
}

/// Parameters of one suggestion run, resolved and parsed up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderingParams {
    pub cycle: String,
    pub cover_days: f64,
    pub safety_buffer_days: f64,
    pub lookback_days: i64,
}

impl OrderingParams {
    pub fn resolve<S>(source: &S, cycle: &str) -> Result<Self, OrderingError>
    where
        S: OrderingSource + ?Sized,
    {
        let cover_key = cover_days_key(cycle);
        let cover_raw = resolve_setting(source, &cover_key);
        if source.setting(&cover_key).is_none() && default_setting(&cover_key).is_none() {
            return Err(OrderingError::UnknownCycle {
                cycle: cycle.to_string(),
                key: cover_key,
            });
        }

        Ok(Self {
            cycle: cycle.to_string(),
            cover_days: parse_f64(&cover_key, &cover_raw)?,
            safety_buffer_days: parse_f64(
                SAFETY_BUFFER_DAYS,
                &resolve_setting(source, SAFETY_BUFFER_DAYS),
            )?,
            lookback_days: parse_days(
                LOOKBACK_DAYS_FOR_USAGE,
                &resolve_setting(source, LOOKBACK_DAYS_FOR_USAGE),
            )?,
        })
    }

    pub(crate) fn lookback_days<S>(source: &S) -> Result<i64, OrderingError>
    where
        S: OrderingSource + ?Sized,
    {
        parse_days(
            LOOKBACK_DAYS_FOR_USAGE,
            &resolve_setting(source, LOOKBACK_DAYS_FOR_USAGE),
        )
    }
}

/// Full replacement of the recognized settings, as submitted by an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub lookback_days_for_usage: i64,
    pub safety_buffer_days: f64,
    pub cover_days_monday: f64,
    pub cover_days_friday: f64,
    pub cutoff_time: String,
}

impl SettingsUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if self.lookback_days_for_usage < 1 {
            return Err(DomainError::validation("lookback_days_for_usage must be >= 1"));
        }
        for (key, value) in [
            (SAFETY_BUFFER_DAYS, self.safety_buffer_days),
            (COVER_DAYS_MONDAY, self.cover_days_monday),
            (COVER_DAYS_FRIDAY, self.cover_days_friday),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DomainError::validation(format!(
                    "{key} must be a finite non-negative number"
                )));
            }
        }
        NaiveTime::parse_from_str(self.cutoff_time.trim(), "%H:%M")
            .map_err(|_| DomainError::validation("cutoff_time must be HH:MM"))?;
        Ok(())
    }

    /// Validate and flatten into stored key/value pairs.
    pub fn into_pairs(self) -> DomainResult<Vec<(String, String)>> {
        self.validate()?;
        Ok(vec![
            (
                LOOKBACK_DAYS_FOR_USAGE.to_string(),
                self.lookback_days_for_usage.to_string(),
            ),
            (SAFETY_BUFFER_DAYS.to_string(), self.safety_buffer_days.to_string()),
            (COVER_DAYS_MONDAY.to_string(), self.cover_days_monday.to_string()),
            (COVER_DAYS_FRIDAY.to_string(), self.cover_days_friday.to_string()),
            (CUTOFF_TIME.to_string(), self.cutoff_time.trim().to_string()),
        ])
    }
}
