//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Tax slabs, rebates and
//! statutory rates live here rather than in the calculators so that a change
//! to the tax code is a configuration change.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{CityCategory, TaxRegime};

/// Metadata about the configuration set.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollMetadata {
    /// Identifier of the configuration set (e.g., "IN-FY2025-26").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// The financial year the rates apply to.
    pub financial_year: String,
    /// ISO currency code for all amounts.
    pub currency: String,
}

/// One band of a progressive tax table.
///
/// Income in `(lower, upper]` is taxed at `rate`. The last slab of a table
/// has no `upper` bound.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxSlab {
    /// Income at which this slab starts.
    pub lower: Decimal,
    /// Income at which this slab ends, if bounded.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Marginal rate for income within the slab.
    pub rate: Decimal,
}

/// Section 87A-style rebate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxRebate {
    /// Taxable income up to and including which the rebate applies.
    pub income_threshold: Decimal,
    /// Largest rebate allowed; `None` rebates the whole tax.
    #[serde(default)]
    pub max_rebate: Option<Decimal>,
}

/// The parameters of one tax regime.
#[derive(Debug, Clone, Deserialize)]
pub struct RegimeConfig {
    /// Display name of the regime.
    pub name: String,
    /// Flat deduction from salary income.
    pub standard_deduction: Decimal,
    /// Progressive slabs, lowest first.
    pub slabs: Vec<TaxSlab>,
    /// Rebate for low incomes.
    pub rebate: TaxRebate,
}

/// Tax configuration from tax_regimes.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxRegimesConfig {
    /// Cess rate applied on tax under either regime.
    pub cess_rate: Decimal,
    /// Old regime parameters.
    pub old: RegimeConfig,
    /// New regime parameters.
    pub new: RegimeConfig,
}

/// Which wage the provident fund percentage is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PfWageBase {
    /// Gross salary.
    #[default]
    Gross,
    /// Basic salary plus dearness allowance.
    BasicPlusDa,
}

/// Provident fund parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidentFundConfig {
    /// Employee contribution rate.
    pub employee_rate: Decimal,
    /// The wage the rate applies to.
    #[serde(default)]
    pub wage_base: PfWageBase,
    /// Annual wage ceiling, if contributions are capped.
    #[serde(default)]
    pub wage_ceiling: Option<Decimal>,
}

/// Employee State Insurance parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct EsiConfig {
    /// Employee contribution rate.
    pub employee_rate: Decimal,
    /// Employer contribution rate.
    pub employer_rate: Decimal,
    /// Annual gross salary up to which ESI applies.
    pub wage_threshold: Decimal,
}

/// Statutory deduction configuration from statutory.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryConfig {
    /// Provident fund parameters.
    pub provident_fund: ProvidentFundConfig,
    /// ESI parameters.
    pub esi: EsiConfig,
}

/// HRA exemption configuration from hra.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct HraConfig {
    /// Share of basic + DA exempt in metro cities.
    pub metro_rate: Decimal,
    /// Share of basic + DA exempt elsewhere.
    pub non_metro_rate: Decimal,
    /// Share of basic + DA the rent must exceed before it counts.
    pub rent_excess_rate: Decimal,
    /// City names treated as metro, matched case-insensitively.
    pub metro_cities: Vec<String>,
}

impl HraConfig {
    /// The exemption cap rate for a city category.
    pub fn cap_rate(&self, category: CityCategory) -> Decimal {
        match category {
            CityCategory::Metro => self.metro_rate,
            CityCategory::NonMetro => self.non_metro_rate,
        }
    }
}

/// The complete payroll configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a configuration directory.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    /// Configuration metadata.
    metadata: PayrollMetadata,
    /// Tax regimes and cess.
    tax: TaxRegimesConfig,
    /// PF and ESI parameters.
    statutory: StatutoryConfig,
    /// HRA parameters.
    hra: HraConfig,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if a slab table is empty, does
    /// not start at zero, has gaps or overlaps, does not end open-ended, or
    /// if any rate lies outside `[0, 1]`.
    pub fn new(
        metadata: PayrollMetadata,
        tax: TaxRegimesConfig,
        statutory: StatutoryConfig,
        hra: HraConfig,
    ) -> EngineResult<Self> {
        let config = Self {
            metadata,
            tax,
            statutory,
            hra,
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PayrollMetadata {
        &self.metadata
    }

    /// Returns the tax configuration.
    pub fn tax(&self) -> &TaxRegimesConfig {
        &self.tax
    }

    /// Returns the parameters of one regime.
    pub fn regime(&self, regime: TaxRegime) -> &RegimeConfig {
        match regime {
            TaxRegime::Old => &self.tax.old,
            TaxRegime::New => &self.tax.new,
        }
    }

    /// Returns the statutory deduction configuration.
    pub fn statutory(&self) -> &StatutoryConfig {
        &self.statutory
    }

    /// Returns the HRA configuration.
    pub fn hra(&self) -> &HraConfig {
        &self.hra
    }

    /// Classifies a city name against the configured metro list.
    pub fn city_category(&self, city: &str) -> CityCategory {
        let city = city.trim();
        if self
            .hra
            .metro_cities
            .iter()
            .any(|metro| metro.eq_ignore_ascii_case(city))
        {
            CityCategory::Metro
        } else {
            CityCategory::NonMetro
        }
    }

    fn validate(&self) -> EngineResult<()> {
        validate_rate("cess_rate", self.tax.cess_rate)?;
        for regime in [TaxRegime::Old, TaxRegime::New] {
            validate_regime(regime, self.regime(regime))?;
        }

        let pf = &self.statutory.provident_fund;
        validate_rate("provident_fund.employee_rate", pf.employee_rate)?;
        if pf.wage_ceiling.is_some_and(|ceiling| ceiling < Decimal::ZERO) {
            return Err(EngineError::InvalidConfig {
                message: "provident_fund.wage_ceiling is negative".to_string(),
            });
        }
        let esi = &self.statutory.esi;
        validate_rate("esi.employee_rate", esi.employee_rate)?;
        validate_rate("esi.employer_rate", esi.employer_rate)?;
        if esi.wage_threshold < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: "esi.wage_threshold is negative".to_string(),
            });
        }

        validate_rate("hra.metro_rate", self.hra.metro_rate)?;
        validate_rate("hra.non_metro_rate", self.hra.non_metro_rate)?;
        validate_rate("hra.rent_excess_rate", self.hra.rent_excess_rate)?;
        Ok(())
    }
}

fn validate_rate(name: &str, rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::InvalidConfig {
            message: format!("{} must be between 0 and 1, got {}", name, rate),
        });
    }
    Ok(())
}

fn validate_regime(regime: TaxRegime, config: &RegimeConfig) -> EngineResult<()> {
    let invalid = |message: String| EngineError::InvalidConfig {
        message: format!("{} regime: {}", regime.as_str(), message),
    };

    if config.slabs.is_empty() {
        return Err(invalid("slabs are empty".to_string()));
    }

    let mut expected_lower = Decimal::ZERO;
    for (i, slab) in config.slabs.iter().enumerate() {
        validate_rate(&format!("{} regime slab {} rate", regime.as_str(), i), slab.rate)?;

        if slab.lower != expected_lower {
            return Err(invalid(format!(
                "slab {} starts at {}, expected {}",
                i, slab.lower, expected_lower
            )));
        }

        let is_last = i == config.slabs.len() - 1;
        match slab.upper {
            Some(upper) if is_last => {
                return Err(invalid(format!(
                    "last slab must be open-ended, found upper bound {}",
                    upper
                )));
            }
            Some(upper) if upper <= slab.lower => {
                return Err(invalid(format!(
                    "slab {} upper bound {} is not above its lower bound {}",
                    i, upper, slab.lower
                )));
            }
            Some(upper) => expected_lower = upper,
            None if !is_last => {
                return Err(invalid(format!("slab {} is open-ended but not last", i)));
            }
            None => {}
        }
    }

    if config.standard_deduction < Decimal::ZERO {
        return Err(invalid("standard_deduction is negative".to_string()));
    }
    if config.rebate.max_rebate.is_some_and(|max| max < Decimal::ZERO) {
        return Err(invalid("rebate.max_rebate is negative".to_string()));
    }

    Ok(())
}
