//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configurations from YAML
//! files: tax slabs and rebates for both regimes, cess, provident fund and ESI
//! parameters, and the HRA exemption rules.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/in_fy2025_26").unwrap();
//! println!("Loaded: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EsiConfig, HraConfig, PayrollConfig, PayrollMetadata, PfWageBase, ProvidentFundConfig,
    RegimeConfig, StatutoryConfig, TaxRebate, TaxRegimesConfig, TaxSlab,
};
