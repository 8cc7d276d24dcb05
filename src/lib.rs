//! Payroll and income-tax calculation engine for India
//!
//! This crate turns annual salary inputs and an optional month of attendance
//! into gross salary, PF/ESI deductions, HRA exemption, tax under both the old
//! and new regimes, a regime recommendation, and net take-home pay. Tax slabs,
//! rebates and statutory rates are loaded from YAML configuration.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
