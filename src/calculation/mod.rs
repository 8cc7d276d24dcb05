//! Calculation logic for the payroll engine.
//!
//! One module per rule: attendance proration, statutory deductions (PF and
//! ESI), HRA exemption, slab tax with rebate and cess, and the regime
//! recommendation. [`calculate_payroll`] runs them in order and aggregates the
//! result. Every calculator is pure and returns the audit step(s) describing
//! what it did.

mod attendance_proration;
mod hra_exemption;
mod payroll;
mod regime_recommendation;
mod rounding;
mod statutory_deductions;
mod tax_engine;

pub use attendance_proration::{
    ATTENDANCE_EXCEEDS_WORKING_DAYS, DEGENERATE_WORKING_DAYS, ProrationCalculation,
    prorate_salary,
};
pub use hra_exemption::{HraExemptionResult, calculate_hra_exemption};
pub use payroll::{MAX_SALARY_AMOUNT, NEGATIVE_INPUT_CLAMPED, calculate_payroll, select_regime};
pub use regime_recommendation::{RegimeRecommendation, recommend_regime};
pub use rounding::{round_2dp, round_whole};
pub use statutory_deductions::{StatutoryDeductionResult, calculate_statutory_deductions};
pub use tax_engine::{SlabTax, TaxCalculation, calculate_tax, slab_breakdown};
