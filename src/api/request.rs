//! Request types for the payroll API.
//!
//! Salary amounts arrive loosely typed: a number, a numeric string, an empty
//! string, `null`, or absent altogether. [`SalaryRequest::into_inputs`] is the
//! one place they are turned into typed [`SalaryInputs`]; every field and its
//! default is listed there.

use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceSummary, SalaryInputs, TaxRegime};

/// A payroll calculation request for one employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The employee the calculation is for.
    pub employee_id: String,
    /// Annual salary figures.
    pub salary: SalaryRequest,
    /// The month's attendance, if loss of pay should be applied.
    #[serde(default)]
    pub attendance: Option<AttendanceRequest>,
    /// Forces the regime used for net take-home.
    #[serde(default)]
    pub regime_override: Option<TaxRegime>,
}

/// Salary figures as received.
///
/// Each amount may be a JSON number, a numeric string, an empty string or
/// absent. Only `basic_salary` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryRequest {
    /// Annual basic salary (required).
    #[serde(default)]
    pub basic_salary: Option<Value>,
    /// Annual dearness allowance.
    #[serde(default)]
    pub da: Option<Value>,
    /// Annual HRA received.
    #[serde(default)]
    pub hra_received: Option<Value>,
    /// Other annual allowances.
    #[serde(default)]
    pub other_allowances: Option<Value>,
    /// Annual rent paid.
    #[serde(default)]
    pub rent_paid: Option<Value>,
    /// Annual income from other sources.
    #[serde(default)]
    pub other_income: Option<Value>,
    /// City of residence.
    #[serde(default)]
    pub city: Option<String>,
}

/// Attendance as received: either a ready summary or a calendar month to
/// derive one from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttendanceRequest {
    /// Pre-aggregated day counts.
    Summary(AttendanceSummary),
    /// A calendar month with week-offs and holidays to derive counts from.
    Calendar(CalendarAttendance),
}

/// A calendar month of attendance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarAttendance {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Weekdays that are weekly offs (e.g. `["Sat", "Sun"]`).
    #[serde(default)]
    pub week_offs: Vec<Weekday>,
    /// Declared holiday dates.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// Days worked in full.
    pub present_days: u32,
    /// Days worked for half a day.
    #[serde(default)]
    pub half_days: u32,
    /// Working days not worked.
    #[serde(default)]
    pub absent_days: u32,
}

impl AttendanceRequest {
    /// Resolves the request into an [`AttendanceSummary`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAttendance`] for an invalid calendar month.
    pub fn into_summary(self) -> EngineResult<AttendanceSummary> {
        match self {
            AttendanceRequest::Summary(summary) => Ok(summary),
            AttendanceRequest::Calendar(month) => AttendanceSummary::for_month(
                month.year,
                month.month,
                &month.week_offs,
                &month.holidays,
                month.present_days,
                month.half_days,
                month.absent_days,
            ),
        }
    }
}

/// Parses one loosely-typed amount.
///
/// Absent, `null` and blank values yield `None`.
fn parse_amount(field: &str, value: Option<&Value>) -> EngineResult<Option<Decimal>> {
    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return Err(EngineError::invalid_salary(
                field,
                format!("expected a number, got {}", other),
            ));
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(Some)
        .map_err(|_| EngineError::invalid_salary(field, format!("'{}' is not a number", text)))
}

impl SalaryRequest {
    /// Builds typed [`SalaryInputs`], classifying the city against `config`.
    ///
    /// | field              | when absent or blank |
    /// |--------------------|----------------------|
    /// | `basic_salary`     | error                |
    /// | `da`               | 0                    |
    /// | `hra_received`     | 0                    |
    /// | `other_allowances` | 0                    |
    /// | `rent_paid`        | 0                    |
    /// | `other_income`     | 0                    |
    /// | `city`             | `""` (non-metro)     |
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSalaryInput`] if `basic_salary` is
    /// missing or any amount is not numeric.
    pub fn into_inputs(self, config: &PayrollConfig) -> EngineResult<SalaryInputs> {
        let basic_salary = parse_amount("basic_salary", self.basic_salary.as_ref())?
            .ok_or_else(|| EngineError::invalid_salary("basic_salary", "is required"))?;
        let optional = |field: &str, value: &Option<Value>| {
            parse_amount(field, value.as_ref()).map(|v| v.unwrap_or(Decimal::ZERO))
        };

        let city = self.city.unwrap_or_default().trim().to_string();
        let city_category = config.city_category(&city);

        Ok(SalaryInputs {
            basic_salary,
            da: optional("da", &self.da)?,
            hra_received: optional("hra_received", &self.hra_received)?,
            other_allowances: optional("other_allowances", &self.other_allowances)?,
            rent_paid: optional("rent_paid", &self.rent_paid)?,
            other_income: optional("other_income", &self.other_income)?,
            city,
            city_category,
        })
    }
}
