use serde::{Deserialize, Serialize};

/// Machine-readable finding attached to an order line.
///
/// Components exchange these codes; text exists only for presentation via
/// `Display`. Rendered texts for `MissingConversion` and `InsufficientData`
/// always contain "missing conversion" and "insufficient data" respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Diagnostic {
    /// At least one contributing variant has no base-unit conversion.
    MissingConversion,
    /// At least one contributing variant has fewer than three recent counts.
    InsufficientData,
    /// Stock on hand will not last the cycle's cover days.
    LoadingRisk,
    CaseRounded {
        raw_quantity: f64,
        cases: f64,
        case_size: f64,
    },
    /// Protein product without a case size; quantity left un-rounded.
    MissingCaseSize,
    MinimumOrderApplied { minimum: f64 },
}

impl Diagnostic {
    /// Line is inconsistent and should not be shipped without review.
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::MissingCaseSize)
    }
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Diagnostic::MissingConversion => f.write_str(
                "WARNING: missing conversion, order may be inaccurate; complete unit conversions first",
            ),
            Diagnostic::InsufficientData => f.write_str(
                "insufficient data, daily usage estimated as 0; set it manually or keep recording counts",
            ),
            Diagnostic::LoadingRisk => f.write_str("RISK: stock may run out before the next delivery"),
            Diagnostic::CaseRounded {
                raw_quantity,
                cases,
                case_size,
            } => write!(
                f,
                "case rounding: {raw_quantity:.2} -> {cases} cases (case size {case_size})"
            ),
            Diagnostic::MissingCaseSize => f.write_str("ERROR: missing case size"),
            Diagnostic::MinimumOrderApplied { minimum } => {
                write!(f, "minimum order applied: {minimum}")
            }
        }
    }
}

/// Human-readable notes for a line, `"; "`-joined in diagnostic order.
pub fn render_notes(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
