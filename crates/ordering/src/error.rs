use thiserror::Error;

/// Fatal failures of a suggestion computation.
///
/// Per-product data problems (missing conversions, thin history, missing case
/// sizes) are not errors; they surface as [`crate::Diagnostic`]s on the line.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrderingError {
    #[error("setting `{key}` has malformed value {value:?}: {reason}")]
    MalformedSetting {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown ordering cycle `{cycle}` (no `{key}` setting)")]
    UnknownCycle { cycle: String, key: String },
}

impl OrderingError {
    pub(crate) fn malformed(key: &str, value: &str, reason: impl core::fmt::Display) -> Self {
        Self::MalformedSetting {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
