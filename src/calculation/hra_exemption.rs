//! House Rent Allowance exemption (old regime only).
//!
//! The exempt portion of HRA is the least of:
//! 1. HRA actually received
//! 2. rent paid in excess of 10% of basic + DA
//! 3. 50% of basic + DA in a metro city, 40% elsewhere

use rust_decimal::Decimal;

use crate::config::HraConfig;
use crate::models::{AuditStep, CityCategory};

use super::rounding::round_whole;

const HRA_CLAUSE: &str = "Income-tax Act 1961, s. 10(13A); Rule 2A";

/// The result of computing the HRA exemption, including the audit step.
#[derive(Debug, Clone)]
pub struct HraExemptionResult {
    /// The exempt amount, rounded to whole units.
    pub exemption: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the tax-exempt part of HRA.
///
/// Negative inputs are treated as zero, so the exemption is never negative
/// and never exceeds either `hra_received` or the city's percentage cap.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_hra_exemption;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::CityCategory;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/in_fy2025_26").unwrap();
/// let result = calculate_hra_exemption(
///     Decimal::from(200_000),
///     Decimal::from(500_000),
///     Decimal::from(240_000),
///     CityCategory::NonMetro,
///     config.config().hra(),
///     1,
/// );
///
/// // min(200000, 240000 - 50000, 40% of 500000)
/// assert_eq!(result.exemption, Decimal::from(190_000));
/// ```
pub fn calculate_hra_exemption(
    hra_received: Decimal,
    basic_plus_da: Decimal,
    rent_paid: Decimal,
    city_category: CityCategory,
    config: &HraConfig,
    step_number: u32,
) -> HraExemptionResult {
    let hra_received = hra_received.max(Decimal::ZERO);
    let basic_plus_da = basic_plus_da.max(Decimal::ZERO);
    let rent_paid = rent_paid.max(Decimal::ZERO);

    let rent_over_excess =
        (rent_paid - config.rent_excess_rate * basic_plus_da).max(Decimal::ZERO);
    let cap_rate = config.cap_rate(city_category);
    let salary_cap = cap_rate * basic_plus_da;

    let exemption = round_whole(hra_received.min(rent_over_excess).min(salary_cap));

    let limiting = if exemption == round_whole(hra_received) {
        "hra_received"
    } else if exemption == round_whole(rent_over_excess) {
        "rent_over_excess"
    } else {
        "salary_cap"
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "hra_exemption".to_string(),
        rule_name: "HRA Exemption".to_string(),
        clause_ref: HRA_CLAUSE.to_string(),
        input: serde_json::json!({
            "hra_received": hra_received.normalize().to_string(),
            "basic_plus_da": basic_plus_da.normalize().to_string(),
            "rent_paid": rent_paid.normalize().to_string(),
            "city_category": city_category.to_string()
        }),
        output: serde_json::json!({
            "exemption": exemption.to_string(),
            "limited_by": limiting
        }),
        reasoning: format!(
            "Least of HRA received ₹{}, rent over {}% of salary ₹{}, {}% of salary ({}) ₹{} = ₹{}",
            hra_received.normalize(),
            (config.rent_excess_rate * Decimal::ONE_HUNDRED).normalize(),
            rent_over_excess.normalize(),
            (cap_rate * Decimal::ONE_HUNDRED).normalize(),
            city_category,
            salary_cap.normalize(),
            exemption
        ),
    };

    HraExemptionResult {
        exemption,
        audit_step,
    }
}
