//! Frozen costing configuration injected into every level that needs it.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{CostError, ErrorInfo};
use crate::parts::JointProductCode;
use crate::provenance::SchemaVersion;

/// Flat credit applied to every kilogram of by-product, in EUR (€0.20/kg).
pub const BY_PRODUCT_RATE_PER_KG: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// The closed set of codes that may enter a joint cost allocation.
pub const ALLOCABLE_CODES: [JointProductCode; 3] = JointProductCode::ALL;

fn config_error(code: &str, message: impl Into<String>) -> CostError {
    CostError::Config(ErrorInfo::new(code, message))
}

fn default_reconciliation_eur() -> Decimal {
    Decimal::new(1, 2)
}

fn default_factor_sum() -> Decimal {
    Decimal::new(1, 4)
}

/// Acceptance windows for the allocation invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Absolute EUR window for Σ allocated cost against the amount split.
    #[serde(default = "default_reconciliation_eur")]
    pub reconciliation_eur: Decimal,
    /// Window for Σ allocation factor against one.
    #[serde(default = "default_factor_sum")]
    pub factor_sum: Decimal,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            reconciliation_eur: default_reconciliation_eur(),
            factor_sum: default_factor_sum(),
        }
    }
}

/// Immutable configuration for one costing run.
///
/// Built once, validated at construction and only ever read afterwards. Fields
/// are private so no consumer can alter the rate or the allocable set of a
/// configuration that is already in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CostingConfigDocument", into = "CostingConfigDocument")]
pub struct CostingConfig {
    schema_version: SchemaVersion,
    by_product_rate_per_kg: Decimal,
    allocable_codes: BTreeSet<JointProductCode>,
    tolerances: Tolerances,
}

impl CostingConfig {
    /// Validates and freezes a configuration.
    pub fn new(
        by_product_rate_per_kg: Decimal,
        allocable_codes: impl IntoIterator<Item = JointProductCode>,
        tolerances: Tolerances,
    ) -> Result<Self, CostError> {
        if by_product_rate_per_kg < Decimal::ZERO {
            return Err(config_error(
                "negative-by-product-rate",
                "by-product credit rate must not be negative",
            ));
        }
        let allocable_codes: BTreeSet<_> = allocable_codes.into_iter().collect();
        if allocable_codes.is_empty() {
            return Err(config_error(
                "empty-allocable-set",
                "at least one joint product must be allocable",
            ));
        }
        if tolerances.reconciliation_eur < Decimal::ZERO || tolerances.factor_sum < Decimal::ZERO {
            return Err(config_error(
                "negative-tolerance",
                "reconciliation tolerances must not be negative",
            ));
        }
        Ok(Self {
            schema_version: SchemaVersion::default(),
            by_product_rate_per_kg,
            allocable_codes,
            tolerances,
        })
    }

    /// Schema version of the configuration document.
    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_version
    }

    /// EUR credit per kilogram of by-product.
    pub fn by_product_rate_per_kg(&self) -> Decimal {
        self.by_product_rate_per_kg
    }

    /// Joint products admitted to allocation.
    pub fn allocable_codes(&self) -> &BTreeSet<JointProductCode> {
        &self.allocable_codes
    }

    /// Returns true when `code` may enter an allocation under this config.
    pub fn is_allocable(&self, code: JointProductCode) -> bool {
        self.allocable_codes.contains(&code)
    }

    /// Reconciliation tolerances.
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            schema_version: SchemaVersion::default(),
            by_product_rate_per_kg: BY_PRODUCT_RATE_PER_KG,
            allocable_codes: ALLOCABLE_CODES.into_iter().collect(),
            tolerances: Tolerances::default(),
        }
    }
}

fn default_rate() -> Decimal {
    BY_PRODUCT_RATE_PER_KG
}

fn default_codes() -> Vec<JointProductCode> {
    ALLOCABLE_CODES.to_vec()
}

/// Unvalidated on-disk shape of [`CostingConfig`].
///
/// Every field is optional in the document. Converting with `try_from` keeps
/// validation failures in the `Config` family instead of burying them in a
/// deserializer message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostingConfigDocument {
    /// Schema version of the document.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// By-product credit rate in EUR per kilogram.
    #[serde(default = "default_rate")]
    pub by_product_rate_per_kg: Decimal,
    /// Joint products that may enter an allocation.
    #[serde(default = "default_codes")]
    pub allocable_codes: Vec<JointProductCode>,
    /// Reconciliation tolerances.
    #[serde(default)]
    pub tolerances: Tolerances,
}

impl TryFrom<CostingConfigDocument> for CostingConfig {
    type Error = CostError;

    fn try_from(doc: CostingConfigDocument) -> Result<Self, Self::Error> {
        let mut config = CostingConfig::new(
            doc.by_product_rate_per_kg,
            doc.allocable_codes,
            doc.tolerances,
        )?;
        if doc.schema_version.major != config.schema_version.major {
            return Err(CostError::Config(
                ErrorInfo::new("schema-mismatch", "unsupported configuration schema")
                    .with_context("expected_major", config.schema_version.major)
                    .with_context("found_major", doc.schema_version.major),
            ));
        }
        config.schema_version = doc.schema_version;
        Ok(config)
    }
}

impl From<CostingConfig> for CostingConfigDocument {
    fn from(config: CostingConfig) -> Self {
        Self {
            schema_version: config.schema_version,
            by_product_rate_per_kg: config.by_product_rate_per_kg,
            allocable_codes: config.allocable_codes.into_iter().collect(),
            tolerances: config.tolerances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_is_twenty_cents() {
        assert_eq!(BY_PRODUCT_RATE_PER_KG.to_string(), "0.20");
        assert_eq!(CostingConfig::default().by_product_rate_per_kg(), BY_PRODUCT_RATE_PER_KG);
    }

    #[test]
    fn rejects_empty_allocable_set() {
        let err = CostingConfig::new(BY_PRODUCT_RATE_PER_KG, [], Tolerances::default())
            .unwrap_err();
        assert_eq!(err.info().code, "empty-allocable-set");
    }
}
