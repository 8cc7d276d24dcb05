//! Provident fund and Employee State Insurance contributions.
//!
//! All wages are annual. The PF wage is either gross salary or basic + DA
//! (see [`PfWageBase`]), optionally capped at a wage ceiling. ESI applies only
//! while gross salary stays at or under the configured threshold.

use rust_decimal::Decimal;

use crate::config::{PfWageBase, StatutoryConfig};
use crate::models::{AuditStep, EsicContribution};

use super::rounding::round_whole;

const PF_CLAUSE: &str = "EPF Scheme 1952, para 29";
const ESI_CLAUSE: &str = "ESI Act 1948, s. 39";

/// The result of computing statutory deductions, including audit steps.
#[derive(Debug, Clone)]
pub struct StatutoryDeductionResult {
    /// Employee provident fund contribution.
    pub pf_employee: Decimal,
    /// ESI contributions (both zero above the threshold).
    pub esic: EsicContribution,
    /// One step for PF, one for ESI.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes PF and ESI contributions from annual gross salary.
///
/// - PF = round(employee_rate × PF wage); the PF wage is gross or basic + DA,
///   capped at `wage_ceiling` when one is configured
/// - ESI employee/employer = round(rate × gross) when gross ≤ threshold, else 0
///
/// Negative inputs are treated as zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_statutory_deductions;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/in_fy2025_26").unwrap();
/// let result = calculate_statutory_deductions(
///     Decimal::from(240_000),
///     Decimal::from(150_000),
///     config.config().statutory(),
///     1,
/// );
///
/// assert_eq!(result.pf_employee, Decimal::from(28_800));
/// assert_eq!(result.esic.employee, Decimal::from(1_800));
/// assert_eq!(result.esic.employer, Decimal::from(7_800));
/// ```
pub fn calculate_statutory_deductions(
    gross_salary: Decimal,
    basic_plus_da: Decimal,
    config: &StatutoryConfig,
    step_number: u32,
) -> StatutoryDeductionResult {
    let gross_salary = gross_salary.max(Decimal::ZERO);
    let basic_plus_da = basic_plus_da.max(Decimal::ZERO);

    let (pf_employee, pf_step) = provident_fund(gross_salary, basic_plus_da, config, step_number);
    let (esic, esi_step) = employee_state_insurance(gross_salary, config, step_number + 1);

    StatutoryDeductionResult {
        pf_employee,
        esic,
        audit_steps: vec![pf_step, esi_step],
    }
}

fn provident_fund(
    gross_salary: Decimal,
    basic_plus_da: Decimal,
    config: &StatutoryConfig,
    step_number: u32,
) -> (Decimal, AuditStep) {
    let pf = &config.provident_fund;

    let (base_name, base_wage) = match pf.wage_base {
        PfWageBase::Gross => ("gross", gross_salary),
        PfWageBase::BasicPlusDa => ("basic_plus_da", basic_plus_da),
    };
    let pf_wage = match pf.wage_ceiling {
        Some(ceiling) => base_wage.min(ceiling),
        None => base_wage,
    };
    let capped = pf_wage < base_wage;
    let contribution = round_whole(pf_wage * pf.employee_rate);

    let reasoning = if capped {
        format!(
            "{}% of ₹{} (wage capped at ₹{}) = ₹{}",
            (pf.employee_rate * Decimal::ONE_HUNDRED).normalize(),
            base_wage.normalize(),
            pf_wage.normalize(),
            contribution
        )
    } else {
        format!(
            "{}% of ₹{} = ₹{}",
            (pf.employee_rate * Decimal::ONE_HUNDRED).normalize(),
            pf_wage.normalize(),
            contribution
        )
    };

    let step = AuditStep {
        step_number,
        rule_id: "provident_fund".to_string(),
        rule_name: "Provident Fund".to_string(),
        clause_ref: PF_CLAUSE.to_string(),
        input: serde_json::json!({
            "wage_base": base_name,
            "wage": base_wage.normalize().to_string(),
            "wage_ceiling": pf.wage_ceiling.map(|c| c.normalize().to_string()),
            "rate": pf.employee_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "pf_employee": contribution.to_string(),
            "ceiling_applied": capped
        }),
        reasoning,
    };

    (contribution, step)
}

fn employee_state_insurance(
    gross_salary: Decimal,
    config: &StatutoryConfig,
    step_number: u32,
) -> (EsicContribution, AuditStep) {
    let esi = &config.esi;
    let eligible = gross_salary <= esi.wage_threshold;

    let esic = if eligible {
        EsicContribution {
            employee: round_whole(gross_salary * esi.employee_rate),
            employer: round_whole(gross_salary * esi.employer_rate),
        }
    } else {
        EsicContribution {
            employee: Decimal::ZERO,
            employer: Decimal::ZERO,
        }
    };

    let reasoning = if eligible {
        format!(
            "Gross ₹{} is within the ₹{} threshold: employee {}% = ₹{}, employer {}% = ₹{}",
            gross_salary.normalize(),
            esi.wage_threshold.normalize(),
            (esi.employee_rate * Decimal::ONE_HUNDRED).normalize(),
            esic.employee,
            (esi.employer_rate * Decimal::ONE_HUNDRED).normalize(),
            esic.employer
        )
    } else {
        format!(
            "Gross ₹{} exceeds the ₹{} threshold - ESI does not apply",
            gross_salary.normalize(),
            esi.wage_threshold.normalize()
        )
    };

    let step = AuditStep {
        step_number,
        rule_id: "employee_state_insurance".to_string(),
        rule_name: "Employee State Insurance".to_string(),
        clause_ref: ESI_CLAUSE.to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "wage_threshold": esi.wage_threshold.normalize().to_string()
        }),
        output: serde_json::json!({
            "eligible": eligible,
            "employee": esic.employee.to_string(),
            "employer": esic.employer.to_string()
        }),
        reasoning,
    };

    (esic, step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn load_config() -> StatutoryConfig {
        ConfigLoader::load("./config/in_fy2025_26")
            .unwrap()
            .config()
            .statutory()
            .clone()
    }

    /// SD-001: PF is 12% of gross by default
    #[test]
    fn test_sd_001_pf_on_gross() {
        let result = calculate_statutory_deductions(dec("700000"), dec("500000"), &load_config(), 1);
        assert_eq!(result.pf_employee, dec("84000"));
    }

    /// SD-002: PF on basic + DA when configured
    #[test]
    fn test_sd_002_pf_on_basic_plus_da() {
        let mut config = load_config();
        config.provident_fund.wage_base = PfWageBase::BasicPlusDa;

        let result = calculate_statutory_deductions(dec("700000"), dec("500000"), &config, 1);
        assert_eq!(result.pf_employee, dec("60000"));
        assert_eq!(result.audit_steps[0].input["wage_base"], "basic_plus_da");
    }

    /// SD-003: PF wage ceiling caps the contribution
    #[test]
    fn test_sd_003_pf_wage_ceiling() {
        let mut config = load_config();
        config.provident_fund.wage_ceiling = Some(dec("180000"));

        let result = calculate_statutory_deductions(dec("700000"), dec("500000"), &config, 1);
        assert_eq!(result.pf_employee, dec("21600"));
        assert_eq!(result.audit_steps[0].output["ceiling_applied"], true);

        let below = calculate_statutory_deductions(dec("150000"), dec("100000"), &config, 1);
        assert_eq!(below.pf_employee, dec("18000"));
        assert_eq!(below.audit_steps[0].output["ceiling_applied"], false);
    }

    /// SD-004: PF rounds half-up to whole units
    #[test]
    fn test_sd_004_pf_rounding() {
        // 12% of 100004 = 12000.48; 12% of 100005 = 12000.6
        let config = load_config();
        assert_eq!(
            calculate_statutory_deductions(dec("100004"), dec("0"), &config, 1).pf_employee,
            dec("12000")
        );
        assert_eq!(
            calculate_statutory_deductions(dec("100005"), dec("0"), &config, 1).pf_employee,
            dec("12001")
        );
    }

    /// SD-005: ESI applies at the threshold
    #[test]
    fn test_sd_005_esi_at_threshold() {
        let result = calculate_statutory_deductions(dec("252000"), dec("200000"), &load_config(), 1);
        assert_eq!(result.esic.employee, dec("1890"));
        assert_eq!(result.esic.employer, dec("8190"));
    }

    /// SD-006: ESI does not apply above the threshold
    #[test]
    fn test_sd_006_esi_above_threshold() {
        let result = calculate_statutory_deductions(dec("252001"), dec("200000"), &load_config(), 1);
        assert_eq!(result.esic.employee, Decimal::ZERO);
        assert_eq!(result.esic.employer, Decimal::ZERO);
        assert_eq!(result.audit_steps[1].output["eligible"], false);
    }

    /// SD-007: negative gross clamps to zero
    #[test]
    fn test_sd_007_negative_gross() {
        let result = calculate_statutory_deductions(dec("-5000"), dec("-5000"), &load_config(), 1);
        assert_eq!(result.pf_employee, Decimal::ZERO);
        assert_eq!(result.esic.employee, Decimal::ZERO);
        assert_eq!(result.esic.employer, Decimal::ZERO);
    }

    #[test]
    fn test_audit_steps_numbered_in_sequence() {
        let result = calculate_statutory_deductions(dec("240000"), dec("150000"), &load_config(), 4);
        assert_eq!(result.audit_steps.len(), 2);
        assert_eq!(result.audit_steps[0].step_number, 4);
        assert_eq!(result.audit_steps[0].rule_id, "provident_fund");
        assert_eq!(result.audit_steps[1].step_number, 5);
        assert_eq!(result.audit_steps[1].rule_id, "employee_state_insurance");
        assert!(result.audit_steps[0].reasoning.contains("12%"));
    }
}
