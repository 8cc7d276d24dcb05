//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{HraConfig, PayrollConfig, PayrollMetadata, StatutoryConfig, TaxRegimesConfig};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and validates them into a [`PayrollConfig`].
///
/// # Directory Structure
///
/// ```text
/// config/in_fy2025_26/
/// ├── payroll.yaml       # Metadata
/// ├── tax_regimes.yaml   # Slabs, rebates, standard deductions, cess
/// ├── statutory.yaml     # PF and ESI parameters
/// └── hra.yaml           # HRA exemption rates and metro cities
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/in_fy2025_26")?;
/// println!("Loaded: {}", loader.metadata().name);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/in_fy2025_26")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    /// - The values are inconsistent (see [`PayrollConfig::new`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<PayrollMetadata>(&path.join("payroll.yaml"))?;
        let tax = Self::load_yaml::<TaxRegimesConfig>(&path.join("tax_regimes.yaml"))?;
        let statutory = Self::load_yaml::<StatutoryConfig>(&path.join("statutory.yaml"))?;
        let hra = Self::load_yaml::<HraConfig>(&path.join("hra.yaml"))?;

        let config = PayrollConfig::new(metadata, tax, statutory, hra)?;
        debug!(
            code = %config.metadata().code,
            path = %path.display(),
            "Loaded payroll configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        self.config.metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PfWageBase;
    use crate::models::{CityCategory, TaxRegime};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/in_fy2025_26"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "IN-FY2025-26");
        assert_eq!(loader.metadata().financial_year, "2025-26");
        assert_eq!(loader.metadata().currency, "INR");
    }

    #[test]
    fn test_old_regime_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let old = loader.config().regime(TaxRegime::Old);

        assert_eq!(old.standard_deduction, dec("50000"));
        assert_eq!(old.slabs.len(), 4);
        assert_eq!(old.slabs[1].rate, dec("0.05"));
        assert_eq!(old.slabs[3].upper, None);
        assert_eq!(old.rebate.income_threshold, dec("500000"));
        assert_eq!(old.rebate.max_rebate, None);
    }

    #[test]
    fn test_new_regime_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let new = loader.config().regime(TaxRegime::New);

        assert_eq!(new.standard_deduction, dec("75000"));
        assert_eq!(new.slabs.len(), 6);
        assert_eq!(new.rebate.income_threshold, dec("1200000"));
        assert_eq!(new.rebate.max_rebate, Some(dec("60000")));
        assert_eq!(loader.config().tax().cess_rate, dec("0.04"));
    }

    #[test]
    fn test_statutory_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let statutory = loader.config().statutory();

        assert_eq!(statutory.provident_fund.employee_rate, dec("0.12"));
        assert_eq!(statutory.provident_fund.wage_base, PfWageBase::Gross);
        assert_eq!(statutory.provident_fund.wage_ceiling, None);
        assert_eq!(statutory.esi.employee_rate, dec("0.0075"));
        assert_eq!(statutory.esi.employer_rate, dec("0.0325"));
        assert_eq!(statutory.esi.wage_threshold, dec("252000"));
    }

    #[test]
    fn test_metro_cities_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.config().city_category("Chennai"), CityCategory::Metro);
        assert_eq!(loader.config().city_category("Bengaluru"), CityCategory::NonMetro);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("payroll.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
