//! Old vs new regime comparison.

use rust_decimal::Decimal;

use crate::models::{AuditStep, Recommendation};

/// The recommended regime and how much it saves.
#[derive(Debug, Clone)]
pub struct RegimeRecommendation {
    /// The regime with the lower total tax; ties go to the old regime.
    pub recommendation: Recommendation,
    /// Absolute difference between the two totals.
    pub savings: Decimal,
    /// The audit step recording this comparison.
    pub audit_step: AuditStep,
}

/// Recommends the regime with the lower total tax (tax + cess).
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::recommend_regime;
/// use payroll_engine::models::Recommendation;
/// use rust_decimal::Decimal;
///
/// let result = recommend_regime(Decimal::from(117_000), Decimal::from(62_400), 1);
/// assert_eq!(result.recommendation, Recommendation::NewRegime);
/// assert_eq!(result.savings, Decimal::from(54_600));
///
/// let tie = recommend_regime(Decimal::ZERO, Decimal::ZERO, 1);
/// assert_eq!(tie.recommendation, Recommendation::OldRegime);
/// ```
pub fn recommend_regime(
    total_tax_old: Decimal,
    total_tax_new: Decimal,
    step_number: u32,
) -> RegimeRecommendation {
    let recommendation = if total_tax_old <= total_tax_new {
        Recommendation::OldRegime
    } else {
        Recommendation::NewRegime
    };
    let savings = (total_tax_old - total_tax_new).abs();

    let reasoning = if savings.is_zero() {
        format!(
            "Both regimes total ₹{}; old regime preferred on a tie",
            total_tax_old
        )
    } else {
        format!(
            "Old ₹{} vs new ₹{}: {} saves ₹{}",
            total_tax_old,
            total_tax_new,
            recommendation.regime(),
            savings
        )
    };

    RegimeRecommendation {
        recommendation,
        savings,
        audit_step: AuditStep {
            step_number,
            rule_id: "regime_recommendation".to_string(),
            rule_name: "Regime Recommendation".to_string(),
            clause_ref: "Income-tax Act 1961, s. 115BAC(6)".to_string(),
            input: serde_json::json!({
                "total_tax_old": total_tax_old.to_string(),
                "total_tax_new": total_tax_new.to_string()
            }),
            output: serde_json::json!({
                "recommendation": recommendation.to_string(),
                "savings": savings.to_string()
            }),
            reasoning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaxRegime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// RR-001: lower old total recommends old
    #[test]
    fn test_rr_001_old_lower() {
        let result = recommend_regime(dec("10000"), dec("20000"), 1);
        assert_eq!(result.recommendation, Recommendation::OldRegime);
        assert_eq!(result.savings, dec("10000"));
    }

    /// RR-002: lower new total recommends new
    #[test]
    fn test_rr_002_new_lower() {
        let result = recommend_regime(dec("117000"), dec("62400"), 1);
        assert_eq!(result.recommendation, Recommendation::NewRegime);
        assert_eq!(result.recommendation.regime(), TaxRegime::New);
        assert_eq!(result.savings, dec("54600"));
    }

    /// RR-003: ties go to the old regime
    #[test]
    fn test_rr_003_tie_prefers_old() {
        let result = recommend_regime(dec("5000"), dec("5000"), 1);
        assert_eq!(result.recommendation, Recommendation::OldRegime);
        assert_eq!(result.savings, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("tie"));
    }

    #[test]
    fn test_audit_step_content() {
        let result = recommend_regime(dec("117000"), dec("62400"), 9);
        assert_eq!(result.audit_step.step_number, 9);
        assert_eq!(
            result.audit_step.output["recommendation"],
            "New Regime is better"
        );
        assert_eq!(result.audit_step.output["savings"], "54600");
    }
}
