//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated structures
//! that capture all outputs of a payroll calculation, including statutory
//! contributions, both regime computations, the recommendation, and an audit
//! trace of every rule applied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::round_2dp;

use super::{ProrationResult, Recommendation, SalaryInputs, TaxRegime};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statutory provision for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate inputs the engine recovered from (by clamping or by
/// falling back) that the caller should review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium" or "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// Contains no timings so that identical inputs produce identical traces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// Employee State Insurance contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsicContribution {
    /// Deducted from the employee's salary.
    pub employee: Decimal,
    /// Paid by the employer on top of salary.
    pub employer: Decimal,
}

/// The complete, deterministic result of a payroll calculation.
///
/// All amounts are annual. Deductions, exemptions and taxes are whole
/// currency units; salary figures keep whatever precision the inputs and the
/// attendance adjustment (2 decimal places) give them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Effective basic + DA + HRA + other allowances.
    pub gross_salary: Decimal,
    /// Employee provident fund contribution.
    pub pf_employee: Decimal,
    /// ESI contributions.
    pub esic: EsicContribution,
    /// Exempt HRA (old regime only).
    pub hra_exemption: Decimal,
    /// Taxable income under the old regime.
    pub taxable_income_old: Decimal,
    /// Taxable income under the new regime.
    pub taxable_income_new: Decimal,
    /// Slab tax after rebate, old regime.
    pub tax_old: Decimal,
    /// Slab tax after rebate, new regime.
    pub tax_new: Decimal,
    /// Cess on `tax_old`.
    pub cess_old: Decimal,
    /// Cess on `tax_new`.
    pub cess_new: Decimal,
    /// `tax_old + cess_old`.
    pub total_tax_old: Decimal,
    /// `tax_new + cess_new`.
    pub total_tax_new: Decimal,
    /// Gross less PF, employee ESI and the effective regime's total tax.
    pub net_take_home: Decimal,
    /// Advisory comparison of the two regimes.
    pub recommendation: Recommendation,
    /// The regime whose tax funded `net_take_home`.
    pub effective_regime: TaxRegime,
    /// Basic salary after the attendance adjustment.
    pub effective_basic: Decimal,
    /// Attendance proration, when attendance was supplied.
    pub proration: Option<ProrationResult>,
    /// The inputs the result was computed from.
    pub input_snapshot: SalaryInputs,
    /// Every rule applied, plus recovered-input warnings.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Total tax under the given regime.
    pub fn total_tax(&self, regime: TaxRegime) -> Decimal {
        match regime {
            TaxRegime::Old => self.total_tax_old,
            TaxRegime::New => self.total_tax_new,
        }
    }

    /// Warnings raised while computing this result.
    pub fn warnings(&self) -> &[AuditWarning] {
        &self.audit_trace.warnings
    }

    /// Splits the annual figures into a monthly payslip view.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::calculation::calculate_payroll;
    /// use payroll_engine::config::ConfigLoader;
    /// use payroll_engine::models::{CityCategory, SalaryInputs};
    /// use rust_decimal::Decimal;
    ///
    /// let config = ConfigLoader::load("./config/in_fy2025_26").unwrap().config().clone();
    /// let inputs = SalaryInputs {
    ///     basic_salary: Decimal::from(1_200_000),
    ///     da: Decimal::ZERO,
    ///     hra_received: Decimal::ZERO,
    ///     other_allowances: Decimal::ZERO,
    ///     rent_paid: Decimal::ZERO,
    ///     other_income: Decimal::ZERO,
    ///     city: "Pune".to_string(),
    ///     city_category: CityCategory::NonMetro,
    /// };
    /// let result = calculate_payroll(&inputs, None, None, &config).unwrap();
    /// assert_eq!(result.monthly_breakdown().gross_salary, Decimal::from(100_000));
    /// ```
    pub fn monthly_breakdown(&self) -> MonthlyBreakdown {
        let months = Decimal::from(12);
        let monthly = |annual: Decimal| round_2dp(annual / months);

        MonthlyBreakdown {
            gross_salary: monthly(self.gross_salary),
            pf_employee: monthly(self.pf_employee),
            esic_employee: monthly(self.esic.employee),
            income_tax: monthly(self.total_tax(self.effective_regime)),
            net_take_home: monthly(self.net_take_home),
        }
    }
}

/// Monthly payslip figures derived from a [`PayrollResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    /// Monthly gross salary.
    pub gross_salary: Decimal,
    /// Monthly PF deduction.
    pub pf_employee: Decimal,
    /// Monthly ESI deduction.
    pub esic_employee: Decimal,
    /// Monthly income tax (including cess) under the effective regime.
    pub income_tax: Decimal,
    /// Monthly net take-home.
    pub net_take_home: Decimal,
}

/// A user-chosen regime and the payroll computed under it.
///
/// The selection only changes which tax funds `net_take_home`; the
/// embedded `recommendation` stays advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRegimeSelection {
    /// The employee the selection belongs to.
    pub employee_id: String,
    /// The regime the employee opted for.
    pub selected_regime: TaxRegime,
    /// The payroll computed under `selected_regime`.
    pub result: PayrollResult,
}

/// A payroll result stamped for hand-off to history and reporting.
///
/// Unlike [`PayrollResult`], a run carries an id and a timestamp and is
/// therefore unique per calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The configuration set (financial year) used.
    pub config_code: String,
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// The calculated payroll.
    pub result: PayrollResult,
}
