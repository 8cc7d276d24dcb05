//! Attendance and proration models.
//!
//! This module contains the [`AttendanceSummary`] supplied by the attendance
//! collaborator and the [`ProrationResult`] produced from it.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::AuditWarning;

/// A month of attendance for one employee, aggregated per day type.
///
/// `working_days` may be given explicitly; when absent it is derived as
/// `days_in_month - week_off_days - holiday_days`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AttendanceSummary;
///
/// let summary = AttendanceSummary {
///     days_in_month: 30,
///     working_days: None,
///     present_days: 20,
///     half_days: 2,
///     absent_days: 0,
///     week_off_days: 8,
///     holiday_days: 0,
/// };
/// assert_eq!(summary.effective_working_days(), 22);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Calendar days in the month.
    pub days_in_month: u32,
    /// Explicit working-day count, overriding the derived value.
    #[serde(default)]
    pub working_days: Option<u32>,
    /// Days worked in full.
    pub present_days: u32,
    /// Days worked for half a day.
    #[serde(default)]
    pub half_days: u32,
    /// Working days not worked.
    #[serde(default)]
    pub absent_days: u32,
    /// Weekly off days in the month.
    #[serde(default)]
    pub week_off_days: u32,
    /// Declared holidays in the month.
    #[serde(default)]
    pub holiday_days: u32,
}

impl AttendanceSummary {
    /// Builds a summary for a calendar month.
    ///
    /// `days_in_month` and `week_off_days` come from the calendar; holidays
    /// outside the month, duplicated, or falling on a week-off are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAttendance`] if `year`/`month` is not a
    /// valid calendar month.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{NaiveDate, Weekday};
    /// use payroll_engine::models::AttendanceSummary;
    ///
    /// // January 2026 has 31 days and four Sundays.
    /// let holidays = [NaiveDate::from_ymd_opt(2026, 1, 26).unwrap()];
    /// let summary =
    ///     AttendanceSummary::for_month(2026, 1, &[Weekday::Sun], &holidays, 24, 0, 2).unwrap();
    /// assert_eq!(summary.days_in_month, 31);
    /// assert_eq!(summary.week_off_days, 4);
    /// assert_eq!(summary.holiday_days, 1);
    /// assert_eq!(summary.effective_working_days(), 26);
    /// ```
    pub fn for_month(
        year: i32,
        month: u32,
        week_off_weekdays: &[Weekday],
        holidays: &[NaiveDate],
        present_days: u32,
        half_days: u32,
        absent_days: u32,
    ) -> EngineResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            EngineError::InvalidAttendance {
                field: "month".to_string(),
                message: format!("{}-{:02} is not a valid calendar month", year, month),
            }
        })?;

        let dates: Vec<NaiveDate> = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .collect();

        let week_off_days = dates
            .iter()
            .filter(|d| week_off_weekdays.contains(&d.weekday()))
            .count() as u32;

        let mut holiday_dates: Vec<NaiveDate> = holidays
            .iter()
            .copied()
            .filter(|d| d.year() == year && d.month() == month)
            .filter(|d| !week_off_weekdays.contains(&d.weekday()))
            .collect();
        holiday_dates.sort();
        holiday_dates.dedup();

        Ok(Self {
            days_in_month: dates.len() as u32,
            working_days: None,
            present_days,
            half_days,
            absent_days,
            week_off_days,
            holiday_days: holiday_dates.len() as u32,
        })
    }

    /// Working days in the month; may be zero or negative for bad input.
    pub fn effective_working_days(&self) -> i64 {
        match self.working_days {
            Some(days) => i64::from(days),
            None => {
                i64::from(self.days_in_month)
                    - i64::from(self.week_off_days)
                    - i64::from(self.holiday_days)
            }
        }
    }

    /// Present, half and absent days together.
    pub fn recorded_days(&self) -> u64 {
        u64::from(self.present_days) + u64::from(self.half_days) + u64::from(self.absent_days)
    }
}

/// The day types a month is broken down into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayBucket {
    /// Full working day.
    #[serde(rename = "Present")]
    Present,
    /// Half working day, paid at half rate.
    #[serde(rename = "Half-Day")]
    HalfDay,
    /// Weekly off (unpaid under performance-based pay).
    #[serde(rename = "Week-Off")]
    WeekOff,
    /// Holiday (unpaid under performance-based pay).
    #[serde(rename = "Holiday")]
    Holiday,
    /// Absent working day.
    #[serde(rename = "Absent")]
    Absent,
}

impl DayBucket {
    /// Whether days in this bucket earn salary.
    pub fn is_paid(&self) -> bool {
        matches!(self, DayBucket::Present | DayBucket::HalfDay)
    }
}

/// One line of the proration breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProrationLine {
    /// The day type.
    #[serde(rename = "type")]
    pub bucket: DayBucket,
    /// Number of days in this bucket.
    pub days: u32,
    /// Pay per day for this bucket (zero for unpaid buckets).
    pub rate: Decimal,
    /// `days * rate`, rounded to 2 decimal places.
    pub amount: Decimal,
    /// Whether the bucket is paid.
    pub paid: bool,
}

/// A monthly salary adjusted for attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProrationResult {
    /// Base salary divided by working days.
    pub per_day_salary: Decimal,
    /// Half of `per_day_salary`.
    pub per_half_day_salary: Decimal,
    /// Per-bucket breakdown in the order Present, Half-Day, Week-Off, Holiday, Absent.
    pub breakdown: Vec<ProrationLine>,
    /// `present_days + 0.5 * half_days`.
    pub total_payable_days: Decimal,
    /// Salary earned for the month.
    pub final_salary: Decimal,
    /// Degenerate-input warnings raised while prorating.
    #[serde(default)]
    pub warnings: Vec<AuditWarning>,
}

impl ProrationResult {
    /// True when a warning marks the result as unreliable.
    pub fn is_degenerate(&self) -> bool {
        !self.warnings.is_empty()
    }
}
