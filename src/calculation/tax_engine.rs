//! Income tax under the old and new regimes.
//!
//! Tax is the sum of each slab's rate applied to the income falling inside
//! that slab. A rebate then reduces the tax for incomes at or under the
//! regime's threshold, and cess is charged on what remains.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{PayrollConfig, TaxRebate, TaxSlab};
use crate::models::{AuditStep, TaxRegime};

use super::rounding::round_whole;

/// The result of computing tax for one regime, including the audit step.
#[derive(Debug, Clone)]
pub struct TaxCalculation {
    /// The regime the tax was computed under.
    pub regime: TaxRegime,
    /// Taxable income after clamping to zero.
    pub taxable_income: Decimal,
    /// Tax from the slabs before rebate, rounded to whole units.
    pub slab_tax: Decimal,
    /// Rebate subtracted from `slab_tax`.
    pub rebate: Decimal,
    /// Tax after rebate.
    pub tax: Decimal,
    /// Cess on `tax`.
    pub cess: Decimal,
    /// `tax + cess`.
    pub total_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Income taxed within one slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTax {
    /// Slab lower bound.
    pub lower: Decimal,
    /// Slab upper bound, if any.
    pub upper: Option<Decimal>,
    /// Marginal rate.
    pub rate: Decimal,
    /// Portion of income inside the slab.
    pub income: Decimal,
    /// Unrounded tax on that portion.
    pub tax: Decimal,
}

fn clause_ref(regime: TaxRegime) -> &'static str {
    match regime {
        TaxRegime::Old => "Income-tax Act 1961, First Schedule; s. 87A",
        TaxRegime::New => "Income-tax Act 1961, s. 115BAC; s. 87A",
    }
}

/// Splits income across the slabs, lowest first.
///
/// Slabs above the income contribute nothing and are omitted.
pub fn slab_breakdown(slabs: &[TaxSlab], taxable_income: Decimal) -> Vec<SlabTax> {
    slabs
        .iter()
        .filter(|slab| taxable_income > slab.lower)
        .map(|slab| {
            let top = match slab.upper {
                Some(upper) => taxable_income.min(upper),
                None => taxable_income,
            };
            let income = top - slab.lower;
            SlabTax {
                lower: slab.lower,
                upper: slab.upper,
                rate: slab.rate,
                income,
                tax: income * slab.rate,
            }
        })
        .collect()
}

fn apply_rebate(rebate: &TaxRebate, taxable_income: Decimal, tax: Decimal) -> Decimal {
    if taxable_income > rebate.income_threshold {
        return Decimal::ZERO;
    }
    match rebate.max_rebate {
        Some(max) => tax.min(max),
        None => tax,
    }
}

/// Computes tax, cess and total under one regime.
///
/// Negative taxable income is treated as zero. Slab tax is rounded to whole
/// units before the rebate is subtracted; cess is rounded separately.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_tax;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::TaxRegime;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/in_fy2025_26").unwrap();
/// let result = calculate_tax(TaxRegime::Old, Decimal::from(1_000_000), config.config(), 1);
///
/// // 5% of 250000 + 20% of 500000
/// assert_eq!(result.tax, Decimal::from(112_500));
/// assert_eq!(result.cess, Decimal::from(4_500));
/// assert_eq!(result.total_tax, Decimal::from(117_000));
/// ```
pub fn calculate_tax(
    regime: TaxRegime,
    taxable_income: Decimal,
    config: &PayrollConfig,
    step_number: u32,
) -> TaxCalculation {
    let regime_config = config.regime(regime);
    let cess_rate = config.tax().cess_rate;
    let taxable_income = taxable_income.max(Decimal::ZERO);

    let slabs = slab_breakdown(&regime_config.slabs, taxable_income);
    let slab_tax = round_whole(slabs.iter().map(|s| s.tax).sum());
    let rebate = apply_rebate(&regime_config.rebate, taxable_income, slab_tax);
    let tax = (slab_tax - rebate).max(Decimal::ZERO);
    let cess = round_whole(tax * cess_rate);
    let total_tax = tax + cess;

    let reasoning = if rebate > Decimal::ZERO {
        format!(
            "{}: slab tax on ₹{} = ₹{}, rebate ₹{} (income within ₹{}), tax ₹{} + cess ₹{} = ₹{}",
            regime,
            taxable_income.normalize(),
            slab_tax,
            rebate,
            regime_config.rebate.income_threshold.normalize(),
            tax,
            cess,
            total_tax
        )
    } else {
        format!(
            "{}: slab tax on ₹{} = ₹{}, tax ₹{} + cess ₹{} = ₹{}",
            regime,
            taxable_income.normalize(),
            slab_tax,
            tax,
            cess,
            total_tax
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("income_tax_{}", regime.as_str()),
        rule_name: format!("Income Tax ({})", regime),
        clause_ref: clause_ref(regime).to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "standard_deduction": regime_config.standard_deduction.normalize().to_string(),
            "cess_rate": cess_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "slabs": slabs,
            "slab_tax": slab_tax.to_string(),
            "rebate": rebate.to_string(),
            "tax": tax.to_string(),
            "cess": cess.to_string(),
            "total_tax": total_tax.to_string()
        }),
        reasoning,
    };

    TaxCalculation {
        regime,
        taxable_income,
        slab_tax,
        rebate,
        tax,
        cess,
        total_tax,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn load_config() -> PayrollConfig {
        ConfigLoader::load("./config/in_fy2025_26")
            .unwrap()
            .into_config()
    }

    fn tax(regime: TaxRegime, income: &str) -> TaxCalculation {
        calculate_tax(regime, dec(income), &load_config(), 1)
    }

    /// TX-001: old regime full rebate at the threshold
    #[test]
    fn test_tx_001_old_rebate_at_threshold() {
        let result = tax(TaxRegime::Old, "500000");
        assert_eq!(result.slab_tax, dec("12500"));
        assert_eq!(result.rebate, dec("12500"));
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.total_tax, Decimal::ZERO);
    }

    /// TX-002: old regime one unit over the threshold loses the rebate
    #[test]
    fn test_tx_002_old_over_threshold() {
        let result = tax(TaxRegime::Old, "500001");
        assert_eq!(result.rebate, Decimal::ZERO);
        assert_eq!(result.tax, dec("12500"));
        assert_eq!(result.cess, dec("500"));
        assert_eq!(result.total_tax, dec("13000"));
    }

    /// TX-003: old regime spans three slabs
    #[test]
    fn test_tx_003_old_three_slabs() {
        let result = tax(TaxRegime::Old, "1000000");
        assert_eq!(result.tax, dec("112500"));
        assert_eq!(result.cess, dec("4500"));
        assert_eq!(result.total_tax, dec("117000"));
    }

    /// TX-004: old regime top slab
    #[test]
    fn test_tx_004_old_top_slab() {
        // 12500 + 100000 + 30% of 500000
        let result = tax(TaxRegime::Old, "1500000");
        assert_eq!(result.tax, dec("262500"));
        assert_eq!(result.cess, dec("10500"));
    }

    /// TX-005: new regime rebate absorbs the whole tax at the threshold
    #[test]
    fn test_tx_005_new_rebate_at_threshold() {
        let result = tax(TaxRegime::New, "1200000");
        assert_eq!(result.slab_tax, dec("60000"));
        assert_eq!(result.rebate, dec("60000"));
        assert_eq!(result.total_tax, Decimal::ZERO);
    }

    /// TX-006: new regime over the threshold
    #[test]
    fn test_tx_006_new_over_threshold() {
        let result = tax(TaxRegime::New, "1200001");
        assert_eq!(result.rebate, Decimal::ZERO);
        assert_eq!(result.tax, dec("60000"));
        assert_eq!(result.cess, dec("2400"));
    }

    /// TX-007: new regime up to the top slab
    #[test]
    fn test_tx_007_new_two_million() {
        let result = tax(TaxRegime::New, "2000000");
        assert_eq!(result.tax, dec("200000"));
        assert_eq!(result.cess, dec("8000"));
        assert_eq!(result.total_tax, dec("208000"));

        // 200000 + 30% of 500000
        let above = tax(TaxRegime::New, "2500000");
        assert_eq!(above.tax, dec("350000"));
    }

    /// TX-008: new regime rebate capped at the maximum
    #[test]
    fn test_tx_008_new_rebate_below_cap() {
        // 5% of 400000 + 10% of 200000 = 40000, fully rebated
        let result = tax(TaxRegime::New, "1000000");
        assert_eq!(result.slab_tax, dec("40000"));
        assert_eq!(result.tax, Decimal::ZERO);
    }

    /// TX-009: zero and negative income pay nothing
    #[test]
    fn test_tx_009_zero_and_negative_income() {
        for regime in [TaxRegime::Old, TaxRegime::New] {
            assert_eq!(tax(regime, "0").total_tax, Decimal::ZERO);
            let negative = tax(regime, "-100000");
            assert_eq!(negative.taxable_income, Decimal::ZERO);
            assert_eq!(negative.total_tax, Decimal::ZERO);
        }
    }

    /// TX-010: tax never decreases as income rises
    #[test]
    fn test_tx_010_monotonic() {
        let config = load_config();
        for regime in [TaxRegime::Old, TaxRegime::New] {
            let mut previous = Decimal::ZERO;
            for step in 0..=300 {
                let income = Decimal::from(step * 10_000);
                let total = calculate_tax(regime, income, &config, 1).total_tax;
                assert!(
                    total >= previous,
                    "{} regime: tax fell from {} to {} at {}",
                    regime,
                    previous,
                    total,
                    income
                );
                previous = total;
            }
        }
    }

    #[test]
    fn test_slab_breakdown_stops_at_income() {
        let config = load_config();
        let slabs = slab_breakdown(&config.regime(TaxRegime::Old).slabs, dec("300000"));
        assert_eq!(slabs.len(), 2);
        assert_eq!(slabs[0].income, dec("250000"));
        assert_eq!(slabs[0].tax, Decimal::ZERO);
        assert_eq!(slabs[1].income, dec("50000"));
        assert_eq!(slabs[1].tax, dec("2500"));
    }

    #[test]
    fn test_audit_step_content() {
        let result = tax(TaxRegime::New, "1200000");
        assert_eq!(result.audit_step.rule_id, "income_tax_new");
        assert_eq!(result.audit_step.rule_name, "Income Tax (New Regime)");
        assert!(result.audit_step.clause_ref.contains("115BAC"));
        assert_eq!(result.audit_step.output["rebate"], "60000");
        assert!(result.audit_step.reasoning.contains("rebate ₹60000"));
    }
}
