//! Tax regime identifiers and the regime recommendation.

use serde::{Deserialize, Serialize};

/// One of the two mutually exclusive income-tax frameworks.
///
/// # Example
///
/// ```
/// use payroll_engine::models::TaxRegime;
///
/// let regime: TaxRegime = serde_json::from_str("\"new\"").unwrap();
/// assert_eq!(regime, TaxRegime::New);
/// assert_eq!(regime.to_string(), "New Regime");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Old Regime: HRA exemption allowed, lower standard deduction.
    Old,
    /// New Regime: wider slabs, no HRA exemption.
    New,
}

impl TaxRegime {
    /// Returns the snake_case identifier used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxRegime::Old => "old",
            TaxRegime::New => "new",
        }
    }
}

impl std::fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxRegime::Old => write!(f, "Old Regime"),
            TaxRegime::New => write!(f, "New Regime"),
        }
    }
}

/// The advisory outcome of comparing the two regimes.
///
/// Serialized with the human-readable labels shown on payslips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    /// The Old Regime costs the same or less.
    #[serde(rename = "Old Regime is better")]
    OldRegime,
    /// The New Regime costs strictly less.
    #[serde(rename = "New Regime is better")]
    NewRegime,
}

impl Recommendation {
    /// The regime this recommendation points to.
    pub fn regime(&self) -> TaxRegime {
        match self {
            Recommendation::OldRegime => TaxRegime::Old,
            Recommendation::NewRegime => TaxRegime::New,
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::OldRegime => write!(f, "Old Regime is better"),
            Recommendation::NewRegime => write!(f, "New Regime is better"),
        }
    }
}
