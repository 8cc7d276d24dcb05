//! Request boundary for the payroll engine.
//!
//! Turns loosely-typed JSON requests into typed inputs, runs single and
//! batch calculations, and maps engine errors to stable API error codes.
//! Transport (HTTP, queues) is left to the host application.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{BatchEntry, ENGINE_VERSION, calculate, calculate_batch};
pub use request::{AttendanceRequest, CalendarAttendance, PayrollRequest, SalaryRequest};
pub use response::ApiError;
pub use state::PayrollState;
