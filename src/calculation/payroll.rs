//! Payroll aggregation.
//!
//! Runs every calculator in order for one employee and assembles the
//! [`PayrollResult`]: attendance adjustment, gross salary, PF/ESI, HRA
//! exemption, taxable income and tax under both regimes, the recommendation,
//! and net take-home pay.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceSummary, AuditStep, AuditTrace, AuditWarning, PayrollResult, ProrationResult,
    SalaryInputs, TaxRegime, TaxRegimeSelection,
};

use super::attendance_proration::prorate_salary;
use super::hra_exemption::calculate_hra_exemption;
use super::regime_recommendation::recommend_regime;
use super::rounding::round_2dp;
use super::statutory_deductions::calculate_statutory_deductions;
use super::tax_engine::calculate_tax;

/// Warning code raised when a negative salary amount is treated as zero.
pub const NEGATIVE_INPUT_CLAMPED: &str = "NEGATIVE_INPUT_CLAMPED";

/// Largest annual amount accepted for any salary input (₹10^15).
pub const MAX_SALARY_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

const MONTHS_PER_YEAR: i64 = 12;

/// Validates the inputs, clamping negative amounts to zero.
///
/// Returns the inputs actually used and a warning per clamped field.
fn sanitize_inputs(inputs: &SalaryInputs) -> EngineResult<(SalaryInputs, Vec<AuditWarning>)> {
    if inputs.basic_salary <= Decimal::ZERO {
        return Err(EngineError::invalid_salary(
            "basic_salary",
            format!("must be greater than zero, got {}", inputs.basic_salary),
        ));
    }

    for (field, value) in [
        ("basic_salary", inputs.basic_salary),
        ("da", inputs.da),
        ("hra_received", inputs.hra_received),
        ("other_allowances", inputs.other_allowances),
        ("rent_paid", inputs.rent_paid),
        ("other_income", inputs.other_income),
    ] {
        if value > MAX_SALARY_AMOUNT {
            return Err(EngineError::invalid_salary(
                field,
                format!("must not exceed {}, got {}", MAX_SALARY_AMOUNT, value),
            ));
        }
    }

    let mut sanitized = inputs.clone();
    let mut warnings = Vec::new();

    for (field, value) in [
        ("da", &mut sanitized.da),
        ("hra_received", &mut sanitized.hra_received),
        ("other_allowances", &mut sanitized.other_allowances),
        ("rent_paid", &mut sanitized.rent_paid),
        ("other_income", &mut sanitized.other_income),
    ] {
        if *value < Decimal::ZERO {
            warn!(field, value = %value, "Negative salary input clamped to zero");
            warnings.push(AuditWarning::new(
                NEGATIVE_INPUT_CLAMPED,
                format!("{} was {}; treated as 0", field, value),
                "low",
            ));
            *value = Decimal::ZERO;
        }
    }

    Ok((sanitized, warnings))
}

/// Reduces the annual basic salary by one month's loss of pay.
///
/// Returns the effective basic and the proration, if attendance was given.
fn apply_attendance(
    basic_salary: Decimal,
    attendance: Option<&AttendanceSummary>,
    steps: &mut Vec<AuditStep>,
    warnings: &mut Vec<AuditWarning>,
    step_number: &mut u32,
) -> (Decimal, Option<ProrationResult>) {
    let Some(attendance) = attendance else {
        return (basic_salary, None);
    };

    let monthly_basic = round_2dp(basic_salary / Decimal::from(MONTHS_PER_YEAR));
    let calculation = prorate_salary(attendance, monthly_basic, *step_number);
    steps.push(calculation.audit_step);
    *step_number += 1;

    let proration = calculation.proration;
    if proration.is_degenerate() {
        warn!(
            working_days = attendance.effective_working_days(),
            recorded_days = attendance.recorded_days(),
            "Degenerate attendance; paying the unprorated salary"
        );
        warnings.extend(proration.warnings.iter().cloned());
        return (basic_salary, Some(proration));
    }

    let loss_of_pay = monthly_basic - proration.final_salary;
    (basic_salary - loss_of_pay, Some(proration))
}

/// Calculates payroll and tax for one employee.
///
/// All amounts in `inputs` are annual. When `attendance` is supplied the
/// basic salary is reduced by the month's loss of pay: the monthly basic
/// (`basic_salary / 12`) is prorated, and the shortfall is subtracted from the
/// annual basic. Attendance that cannot be prorated (no working days, or more
/// recorded days than working days) leaves the basic unchanged and is
/// reported in the result's warnings.
///
/// Both regimes are always computed. `regime_override` only chooses which
/// regime's tax funds `net_take_home`; without it the recommended regime is
/// used.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSalaryInput`] if `basic_salary` is not
/// greater than zero or any amount exceeds [`MAX_SALARY_AMOUNT`]. Other negative amounts are clamped to zero with a
/// [`NEGATIVE_INPUT_CLAMPED`] warning.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{CityCategory, Recommendation, SalaryInputs};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/in_fy2025_26").unwrap();
/// let inputs = SalaryInputs {
///     basic_salary: Decimal::from(500_000),
///     da: Decimal::ZERO,
///     hra_received: Decimal::from(200_000),
///     other_allowances: Decimal::ZERO,
///     rent_paid: Decimal::from(240_000),
///     other_income: Decimal::ZERO,
///     city: "Pune".to_string(),
///     city_category: CityCategory::NonMetro,
/// };
///
/// let result = calculate_payroll(&inputs, None, None, loader.config()).unwrap();
/// assert_eq!(result.gross_salary, Decimal::from(700_000));
/// assert_eq!(result.hra_exemption, Decimal::from(190_000));
/// assert_eq!(result.tax_old, Decimal::ZERO);
/// assert_eq!(result.recommendation, Recommendation::OldRegime);
/// ```
pub fn calculate_payroll(
    inputs: &SalaryInputs,
    attendance: Option<&AttendanceSummary>,
    regime_override: Option<TaxRegime>,
    config: &PayrollConfig,
) -> EngineResult<PayrollResult> {
    let (inputs, mut warnings) = sanitize_inputs(inputs)?;
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut step_number: u32 = 1;

    // Attendance
    let (effective_basic, proration) = apply_attendance(
        inputs.basic_salary,
        attendance,
        &mut steps,
        &mut warnings,
        &mut step_number,
    );

    // Gross salary
    let gross_salary =
        effective_basic + inputs.da + inputs.hra_received + inputs.other_allowances;
    steps.push(AuditStep {
        step_number,
        rule_id: "gross_salary".to_string(),
        rule_name: "Gross Salary".to_string(),
        clause_ref: "Income-tax Act 1961, s. 17(1)".to_string(),
        input: serde_json::json!({
            "basic_salary": inputs.basic_salary.to_string(),
            "effective_basic": effective_basic.to_string(),
            "da": inputs.da.to_string(),
            "hra_received": inputs.hra_received.to_string(),
            "other_allowances": inputs.other_allowances.to_string()
        }),
        output: serde_json::json!({
            "gross_salary": gross_salary.to_string()
        }),
        reasoning: format!(
            "Basic ₹{} + DA ₹{} + HRA ₹{} + other allowances ₹{} = ₹{}",
            effective_basic, inputs.da, inputs.hra_received, inputs.other_allowances, gross_salary
        ),
    });
    step_number += 1;

    // PF and ESI
    let effective_basic_plus_da = effective_basic + inputs.da;
    let statutory = calculate_statutory_deductions(
        gross_salary,
        effective_basic_plus_da,
        config.statutory(),
        step_number,
    );
    step_number += statutory.audit_steps.len() as u32;
    steps.extend(statutory.audit_steps);
    let pf_employee = statutory.pf_employee;
    let esic = statutory.esic;

    // HRA exemption
    let hra = calculate_hra_exemption(
        inputs.hra_received,
        effective_basic_plus_da,
        inputs.rent_paid,
        inputs.city_category,
        config.hra(),
        step_number,
    );
    steps.push(hra.audit_step);
    step_number += 1;
    let hra_exemption = hra.exemption;

    // Taxable income
    let income = gross_salary + inputs.other_income;
    let common_deductions = pf_employee + esic.employee;
    let old_deduction = config.regime(TaxRegime::Old).standard_deduction;
    let new_deduction = config.regime(TaxRegime::New).standard_deduction;
    let taxable_income_old =
        (income - old_deduction - common_deductions - hra_exemption).max(Decimal::ZERO);
    let taxable_income_new = (income - new_deduction - common_deductions).max(Decimal::ZERO);
    steps.push(AuditStep {
        step_number,
        rule_id: "taxable_income".to_string(),
        rule_name: "Taxable Income".to_string(),
        clause_ref: "Income-tax Act 1961, s. 16(ia)".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "other_income": inputs.other_income.to_string(),
            "pf_employee": pf_employee.to_string(),
            "esic_employee": esic.employee.to_string(),
            "hra_exemption": hra_exemption.to_string(),
            "standard_deduction_old": old_deduction.to_string(),
            "standard_deduction_new": new_deduction.to_string()
        }),
        output: serde_json::json!({
            "taxable_income_old": taxable_income_old.to_string(),
            "taxable_income_new": taxable_income_new.to_string()
        }),
        reasoning: format!(
            "Old: ₹{} - ₹{} standard - ₹{} PF/ESI - ₹{} HRA = ₹{}; New: ₹{} - ₹{} standard - ₹{} PF/ESI = ₹{}",
            income,
            old_deduction,
            common_deductions,
            hra_exemption,
            taxable_income_old,
            income,
            new_deduction,
            common_deductions,
            taxable_income_new
        ),
    });
    step_number += 1;

    // Tax under both regimes
    let old = calculate_tax(TaxRegime::Old, taxable_income_old, config, step_number);
    steps.push(old.audit_step);
    step_number += 1;
    let new = calculate_tax(TaxRegime::New, taxable_income_new, config, step_number);
    steps.push(new.audit_step);
    step_number += 1;

    // Recommendation
    let recommended = recommend_regime(old.total_tax, new.total_tax, step_number);
    steps.push(recommended.audit_step);
    step_number += 1;
    let recommendation = recommended.recommendation;

    // Net take-home
    let effective_regime = regime_override.unwrap_or_else(|| recommendation.regime());
    let effective_tax = match effective_regime {
        TaxRegime::Old => old.total_tax,
        TaxRegime::New => new.total_tax,
    };
    let net_take_home = gross_salary - pf_employee - esic.employee - effective_tax;
    steps.push(AuditStep {
        step_number,
        rule_id: "net_take_home".to_string(),
        rule_name: "Net Take-Home".to_string(),
        clause_ref: "Payment of Wages Act 1936, s. 7".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "pf_employee": pf_employee.to_string(),
            "esic_employee": esic.employee.to_string(),
            "effective_regime": effective_regime.as_str(),
            "overridden": regime_override.is_some(),
            "total_tax": effective_tax.to_string()
        }),
        output: serde_json::json!({
            "net_take_home": net_take_home.to_string()
        }),
        reasoning: format!(
            "₹{} - PF ₹{} - ESI ₹{} - {} tax ₹{} = ₹{}",
            gross_salary, pf_employee, esic.employee, effective_regime, effective_tax, net_take_home
        ),
    });

    debug!(
        gross_salary = %gross_salary,
        total_tax_old = %old.total_tax,
        total_tax_new = %new.total_tax,
        recommendation = %recommendation,
        effective_regime = effective_regime.as_str(),
        net_take_home = %net_take_home,
        warnings = warnings.len(),
        "Payroll calculated"
    );

    Ok(PayrollResult {
        gross_salary,
        pf_employee,
        esic,
        hra_exemption,
        taxable_income_old,
        taxable_income_new,
        tax_old: old.tax,
        tax_new: new.tax,
        cess_old: old.cess,
        cess_new: new.cess,
        total_tax_old: old.total_tax,
        total_tax_new: new.total_tax,
        net_take_home,
        recommendation,
        effective_regime,
        effective_basic,
        proration,
        input_snapshot: inputs,
        audit_trace: AuditTrace { steps, warnings },
    })
}

/// Calculates payroll under a regime the employee has opted for.
///
/// The selection changes only which regime's tax funds `net_take_home`. The
/// recommendation in the result still compares both regimes.
///
/// # Errors
///
/// Returns the same errors as [`calculate_payroll`].
pub fn select_regime(
    employee_id: &str,
    inputs: &SalaryInputs,
    attendance: Option<&AttendanceSummary>,
    regime: TaxRegime,
    config: &PayrollConfig,
) -> EngineResult<TaxRegimeSelection> {
    let result = calculate_payroll(inputs, attendance, Some(regime), config)?;
    Ok(TaxRegimeSelection {
        employee_id: employee_id.to_string(),
        selected_regime: regime,
        result,
    })
}
