//! Entry points for the payroll API.
//!
//! [`calculate`] handles one employee; [`calculate_batch`] fans a list of
//! requests out over tokio's blocking pool and returns one entry per request,
//! in request order.

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::{Id, JoinSet};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payroll;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollResult, PayrollRun};

use super::request::PayrollRequest;
use super::response::ApiError;
use super::state::PayrollState;

/// Version stamped on every [`PayrollRun`].
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The outcome for one request of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Position of the request in the batch.
    pub index: usize,
    /// The employee the request was for.
    pub employee_id: String,
    /// The run, or why it failed.
    pub outcome: Result<PayrollRun, ApiError>,
}

fn run_request(state: &PayrollState, request: PayrollRequest) -> EngineResult<PayrollResult> {
    let config = state.config();
    let inputs = request.salary.into_inputs(config)?;
    let attendance = request
        .attendance
        .map(|attendance| attendance.into_summary())
        .transpose()?;
    calculate_payroll(&inputs, attendance.as_ref(), request.regime_override, config)
}

/// Calculates payroll for one request.
///
/// The returned [`PayrollRun`] wraps the deterministic result with a fresh
/// calculation id and timestamp.
///
/// # Errors
///
/// Returns an [`ApiError`] with code `VALIDATION_ERROR` for bad salary
/// input and `INVALID_ATTENDANCE` for a bad calendar month.
pub fn calculate(state: &PayrollState, request: PayrollRequest) -> Result<PayrollRun, ApiError> {
    // Correlation ID doubles as the calculation ID
    let correlation_id = Uuid::new_v4();
    let employee_id = request.employee_id.clone();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        "Processing payroll request"
    );

    let start_time = Instant::now();
    match run_request(state, request) {
        Ok(result) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                gross_salary = %result.gross_salary,
                net_take_home = %result.net_take_home,
                recommendation = %result.recommendation,
                warnings = result.warnings().len(),
                duration_us = duration.as_micros(),
                "Payroll calculated successfully"
            );
            Ok(PayrollRun {
                calculation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: ENGINE_VERSION.to_string(),
                config_code: state.config().metadata().code.clone(),
                employee_id,
                result,
            })
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                error = %err,
                "Payroll calculation failed"
            );
            Err(err.into())
        }
    }
}

/// Calculates payroll for many employees concurrently.
///
/// Each request runs on the blocking pool. A failure for one employee is
/// reported in its own entry and does not affect the others; a worker that
/// panics yields a `CALCULATION_ERROR`. Entries are returned in request order.
pub async fn calculate_batch(state: &PayrollState, requests: Vec<PayrollRequest>) -> Vec<BatchEntry> {
    run_batch(state, requests, calculate).await
}

async fn run_batch<F>(state: &PayrollState, requests: Vec<PayrollRequest>, worker: F) -> Vec<BatchEntry>
where
    F: Fn(&PayrollState, PayrollRequest) -> Result<PayrollRun, ApiError> + Copy + Send + 'static,
{
    let batch_size = requests.len();
    let start_time = Instant::now();

    let mut workers = JoinSet::new();
    let mut tasks: HashMap<Id, (usize, String)> = HashMap::with_capacity(batch_size);
    for (index, request) in requests.into_iter().enumerate() {
        let state = state.clone();
        let employee_id = request.employee_id.clone();
        let handle = workers.spawn_blocking(move || worker(&state, request));
        tasks.insert(handle.id(), (index, employee_id));
    }

    let mut entries = Vec::with_capacity(batch_size);
    while let Some(joined) = workers.join_next_with_id().await {
        let (id, outcome) = match joined {
            Ok((id, outcome)) => (id, outcome),
            Err(err) => {
                warn!(task_id = %err.id(), error = %err, "Batch worker failed");
                let error = EngineError::CalculationError {
                    message: err.to_string(),
                };
                (err.id(), Err(error.into()))
            }
        };
        if let Some((index, employee_id)) = tasks.remove(&id) {
            entries.push(BatchEntry {
                index,
                employee_id,
                outcome,
            });
        }
    }
    entries.sort_by_key(|entry| entry.index);

    let failed = entries.iter().filter(|e| e.outcome.is_err()).count();
    info!(
        batch_size,
        failed,
        duration_us = start_time.elapsed().as_micros(),
        "Batch calculated"
    );

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{Recommendation, TaxRegime};
    use rust_decimal::Decimal;

    fn state() -> PayrollState {
        PayrollState::new(ConfigLoader::load("./config/in_fy2025_26").unwrap())
    }

    fn request(json: &str) -> PayrollRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_calculate_builds_run() {
        let run = calculate(
            &state(),
            request(
                r#"{
                    "employee_id": "emp_001",
                    "salary": {
                        "basic_salary": "500000",
                        "hra_received": 200000,
                        "rent_paid": 240000,
                        "city": "Pune"
                    }
                }"#,
            ),
        )
        .unwrap();

        assert_eq!(run.employee_id, "emp_001");
        assert_eq!(run.config_code, "IN-FY2025-26");
        assert_eq!(run.engine_version, ENGINE_VERSION);
        assert_eq!(run.result.hra_exemption, Decimal::from(190_000));
        assert_eq!(run.result.recommendation, Recommendation::OldRegime);
    }

    #[test]
    fn test_calculate_applies_override() {
        let run = calculate(
            &state(),
            request(
                r#"{
                    "employee_id": "emp_002",
                    "salary": {"basic_salary": 2000000, "city": "Mumbai"},
                    "regime_override": "old"
                }"#,
            ),
        )
        .unwrap();

        assert_eq!(run.result.effective_regime, TaxRegime::Old);
        assert_eq!(run.result.recommendation, Recommendation::NewRegime);
    }

    #[test]
    fn test_calculate_reports_validation_error() {
        let err = calculate(
            &state(),
            request(r#"{"employee_id": "emp_003", "salary": {"basic_salary": ""}}"#),
        )
        .unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_calculate_reports_invalid_attendance() {
        let err = calculate(
            &state(),
            request(
                r#"{
                    "employee_id": "emp_004",
                    "salary": {"basic_salary": 600000},
                    "attendance": {"year": 2026, "month": 0, "present_days": 20}
                }"#,
            ),
        )
        .unwrap_err();
        assert_eq!(err.code, "INVALID_ATTENDANCE");
    }

    #[test]
    fn test_each_run_gets_a_fresh_id() {
        let state = state();
        let json = r#"{"employee_id": "emp_005", "salary": {"basic_salary": 600000}}"#;
        let first = calculate(&state, request(json)).unwrap();
        let second = calculate(&state, request(json)).unwrap();
        assert_ne!(first.calculation_id, second.calculation_id);
        assert_eq!(first.result, second.result);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_errors() {
        let requests = vec![
            request(r#"{"employee_id": "a", "salary": {"basic_salary": 600000}}"#),
            request(r#"{"employee_id": "b", "salary": {"basic_salary": "abc"}}"#),
            request(r#"{"employee_id": "c", "salary": {"basic_salary": 900000}}"#),
        ];

        let entries = calculate_batch(&state(), requests).await;

        let ids: Vec<&str> = entries.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(entries[0].outcome.is_ok());
        assert_eq!(
            entries[1].outcome.as_ref().unwrap_err().code,
            "VALIDATION_ERROR"
        );
        let run = entries[2].outcome.as_ref().unwrap();
        assert_eq!(run.employee_id, "c");
        assert_eq!(run.result.gross_salary, Decimal::from(900_000));
    }

    #[test]
    fn test_calculate_rejects_amount_above_maximum() {
        let err = calculate(
            &state(),
            request(
                r#"{
                    "employee_id": "emp_006",
                    "salary": {"basic_salary": "79228162514264337593543950335", "da": "1"}
                }"#,
            ),
        )
        .unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.details.as_deref(), Some("basic_salary"));
    }

    #[tokio::test]
    async fn test_batch_reports_panicked_worker_as_calculation_error() {
        fn panics_for_b(state: &PayrollState, request: PayrollRequest) -> Result<PayrollRun, ApiError> {
            if request.employee_id == "b" {
                panic!("worker blew up");
            }
            calculate(state, request)
        }

        let requests = vec![
            request(r#"{"employee_id": "a", "salary": {"basic_salary": 600000}}"#),
            request(r#"{"employee_id": "b", "salary": {"basic_salary": 700000}}"#),
            request(r#"{"employee_id": "c", "salary": {"basic_salary": 900000}}"#),
        ];

        let entries = run_batch(&state(), requests, panics_for_b).await;

        assert_eq!(entries.len(), 3);
        let indices: Vec<usize> = entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(entries[0].outcome.is_ok());
        assert!(entries[2].outcome.is_ok());

        assert_eq!(entries[1].employee_id, "b");
        let err = entries[1].outcome.as_ref().unwrap_err();
        assert_eq!(err.code, "CALCULATION_ERROR");
        assert!(err.details.as_deref().unwrap().contains("panicked"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let entries = calculate_batch(&state(), vec![]).await;
        assert!(entries.is_empty());
    }
}
