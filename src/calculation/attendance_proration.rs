//! Attendance-based salary proration.
//!
//! This module converts a month of attendance into a performance-adjusted
//! monthly salary. Only days actually worked are paid: week-offs and holidays
//! earn nothing, like absences.

use rust_decimal::Decimal;

use crate::models::{
    AttendanceSummary, AuditStep, AuditWarning, DayBucket, ProrationLine, ProrationResult,
};

use super::rounding::round_2dp;

/// Warning code raised when a month has no working days.
pub const DEGENERATE_WORKING_DAYS: &str = "DEGENERATE_WORKING_DAYS";

/// Warning code raised when present, half and absent days exceed working days.
pub const ATTENDANCE_EXCEEDS_WORKING_DAYS: &str = "ATTENDANCE_EXCEEDS_WORKING_DAYS";

const PRORATION_CLAUSE: &str = "Payment of Wages Act 1936, s. 9";

/// The result of prorating a salary, including the proration and audit step.
#[derive(Debug, Clone)]
pub struct ProrationCalculation {
    /// The prorated salary and its breakdown.
    pub proration: ProrationResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prorates a monthly base salary by attendance.
///
/// - per-day salary = `base_salary / working_days`, per-half-day = half of that
/// - present days earn the per-day rate, half days the per-half-day rate
/// - absent days, week-offs and holidays earn nothing
/// - `total_payable_days = present + 0.5 * half`
///
/// Amounts are computed from the unrounded rates and rounded to 2 decimal
/// places, half-up. A negative `base_salary` is treated as zero.
///
/// When working days are zero or negative every amount is zero and the
/// result carries a [`DEGENERATE_WORKING_DAYS`] warning. When recorded days
/// exceed working days the amounts are still computed and the result carries
/// an [`ATTENDANCE_EXCEEDS_WORKING_DAYS`] warning.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::prorate_salary;
/// use payroll_engine::models::AttendanceSummary;
/// use rust_decimal::Decimal;
///
/// let attendance = AttendanceSummary {
///     days_in_month: 30,
///     working_days: Some(22),
///     present_days: 20,
///     half_days: 2,
///     absent_days: 0,
///     week_off_days: 8,
///     holiday_days: 0,
/// };
///
/// let result = prorate_salary(&attendance, Decimal::from(44_000), 1);
/// assert_eq!(result.proration.per_day_salary, Decimal::from(2_000));
/// assert_eq!(result.proration.final_salary, Decimal::from(42_000));
/// assert_eq!(result.proration.total_payable_days, Decimal::new(210, 1));
/// ```
pub fn prorate_salary(
    attendance: &AttendanceSummary,
    base_salary: Decimal,
    step_number: u32,
) -> ProrationCalculation {
    let base_salary = base_salary.max(Decimal::ZERO);
    let working_days = attendance.effective_working_days();
    let mut warnings = Vec::new();

    let (per_day, per_half_day) = if working_days > 0 {
        let per_day = base_salary / Decimal::from(working_days);
        (per_day, per_day / Decimal::TWO)
    } else {
        warnings.push(AuditWarning::new(
            DEGENERATE_WORKING_DAYS,
            format!(
                "Month has {} working days ({} days, {} week-offs, {} holidays); no salary can be prorated",
                working_days,
                attendance.days_in_month,
                attendance.week_off_days,
                attendance.holiday_days
            ),
            "medium",
        ));
        (Decimal::ZERO, Decimal::ZERO)
    };

    if working_days > 0 && attendance.recorded_days() > working_days.unsigned_abs() {
        warnings.push(AuditWarning::new(
            ATTENDANCE_EXCEEDS_WORKING_DAYS,
            format!(
                "Present, half and absent days total {} but the month has only {} working days",
                attendance.recorded_days(),
                working_days
            ),
            "medium",
        ));
    }

    let line = |bucket: DayBucket, days: u32, rate: Decimal| {
        let rate = if bucket.is_paid() { rate } else { Decimal::ZERO };
        ProrationLine {
            bucket,
            days,
            rate: round_2dp(rate),
            amount: round_2dp(Decimal::from(days) * rate),
            paid: bucket.is_paid(),
        }
    };

    let breakdown = vec![
        line(DayBucket::Present, attendance.present_days, per_day),
        line(DayBucket::HalfDay, attendance.half_days, per_half_day),
        line(DayBucket::WeekOff, attendance.week_off_days, per_day),
        line(DayBucket::Holiday, attendance.holiday_days, per_day),
        line(DayBucket::Absent, attendance.absent_days, per_day),
    ];

    let present = Decimal::from(attendance.present_days);
    let half = Decimal::from(attendance.half_days);
    let total_payable_days = present + half * Decimal::new(5, 1);
    let final_salary = round_2dp(present * per_day + half * per_half_day);

    let proration = ProrationResult {
        per_day_salary: round_2dp(per_day),
        per_half_day_salary: round_2dp(per_half_day),
        breakdown,
        total_payable_days,
        final_salary,
        warnings,
    };

    let reasoning = if working_days > 0 {
        format!(
            "₹{} / {} working days = ₹{} per day; {} present × ₹{} + {} half × ₹{} = ₹{}",
            base_salary.normalize(),
            working_days,
            proration.per_day_salary,
            attendance.present_days,
            proration.per_day_salary,
            attendance.half_days,
            proration.per_half_day_salary,
            proration.final_salary
        )
    } else {
        "No working days in the month; prorated salary is zero".to_string()
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_proration".to_string(),
        rule_name: "Attendance Proration".to_string(),
        clause_ref: PRORATION_CLAUSE.to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "working_days": working_days,
            "present_days": attendance.present_days,
            "half_days": attendance.half_days,
            "absent_days": attendance.absent_days,
            "week_off_days": attendance.week_off_days,
            "holiday_days": attendance.holiday_days
        }),
        output: serde_json::json!({
            "per_day_salary": proration.per_day_salary.to_string(),
            "total_payable_days": proration.total_payable_days.to_string(),
            "final_salary": proration.final_salary.to_string(),
            "degenerate": proration.is_degenerate()
        }),
        reasoning,
    };

    ProrationCalculation {
        proration,
        audit_step,
    }
}
