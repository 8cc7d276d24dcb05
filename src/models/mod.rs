//! Core data models for the payroll engine.
//!
//! This module contains all the value objects that flow through a payroll
//! calculation. None of them are mutated after construction.

mod attendance;
mod payroll_result;
mod regime;
mod salary;

pub use attendance::{AttendanceSummary, DayBucket, ProrationLine, ProrationResult};
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, EsicContribution, MonthlyBreakdown, PayrollResult,
    PayrollRun, TaxRegimeSelection,
};
pub use regime::{Recommendation, TaxRegime};
pub use salary::{CityCategory, SalaryInputs};
