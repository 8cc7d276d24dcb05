//! Salary input model.
//!
//! [`SalaryInputs`] is the typed, fully-defaulted record the calculation core
//! consumes. Loosely-typed input is converted into it once, at the boundary
//! (see [`crate::api::SalaryRequest`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether the employee's city counts as a metro for HRA purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityCategory {
    /// One of the configured metro cities (50% HRA cap).
    #[serde(rename = "Metro")]
    Metro,
    /// Any other city (40% HRA cap).
    #[serde(rename = "Non-Metro")]
    NonMetro,
}

impl CityCategory {
    /// Returns true for [`CityCategory::Metro`].
    pub fn is_metro(&self) -> bool {
        matches!(self, CityCategory::Metro)
    }
}

impl std::fmt::Display for CityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CityCategory::Metro => write!(f, "Metro"),
            CityCategory::NonMetro => write!(f, "Non-Metro"),
        }
    }
}

/// Annual salary figures for one employee.
///
/// All amounts are annual and in whole currency units or fractions thereof.
/// The calculation core clamps negative amounts to zero and rejects a
/// non-positive `basic_salary`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{CityCategory, SalaryInputs};
/// use rust_decimal::Decimal;
///
/// let inputs = SalaryInputs {
///     basic_salary: Decimal::from(600_000),
///     da: Decimal::ZERO,
///     hra_received: Decimal::from(240_000),
///     other_allowances: Decimal::from(60_000),
///     rent_paid: Decimal::from(180_000),
///     other_income: Decimal::ZERO,
///     city: "Pune".to_string(),
///     city_category: CityCategory::NonMetro,
/// };
/// assert_eq!(inputs.basic_plus_da(), Decimal::from(600_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryInputs {
    /// Annual basic salary.
    pub basic_salary: Decimal,
    /// Annual dearness allowance.
    pub da: Decimal,
    /// Annual house rent allowance received.
    pub hra_received: Decimal,
    /// Any other annual allowances forming part of gross salary.
    pub other_allowances: Decimal,
    /// Annual rent actually paid by the employee.
    pub rent_paid: Decimal,
    /// Annual income from sources other than salary.
    pub other_income: Decimal,
    /// The city the employee lives in, as supplied.
    pub city: String,
    /// Metro classification derived from `city`.
    pub city_category: CityCategory,
}

impl SalaryInputs {
    /// Basic salary plus dearness allowance, the base for HRA and PF rules.
    pub fn basic_plus_da(&self) -> Decimal {
        self.basic_salary + self.da
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_city_category_serialization() {
        assert_eq!(
            serde_json::to_string(&CityCategory::Metro).unwrap(),
            "\"Metro\""
        );
        assert_eq!(
            serde_json::to_string(&CityCategory::NonMetro).unwrap(),
            "\"Non-Metro\""
        );
        let parsed: CityCategory = serde_json::from_str("\"Non-Metro\"").unwrap();
        assert_eq!(parsed, CityCategory::NonMetro);
    }

    #[test]
    fn test_deserialize_salary_inputs() {
        let json = r#"{
            "basic_salary": "500000",
            "da": "25000.50",
            "hra_received": "200000",
            "other_allowances": "0",
            "rent_paid": "240000",
            "other_income": "10000",
            "city": "Mumbai",
            "city_category": "Metro"
        }"#;

        let inputs: SalaryInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.basic_salary, dec("500000"));
        assert_eq!(inputs.da, dec("25000.50"));
        assert_eq!(inputs.city_category, CityCategory::Metro);
        assert_eq!(inputs.basic_plus_da(), dec("525000.50"));
    }

    #[test]
    fn test_is_metro() {
        assert!(CityCategory::Metro.is_metro());
        assert!(!CityCategory::NonMetro.is_metro());
        assert_eq!(CityCategory::NonMetro.to_string(), "Non-Metro");
    }
}
