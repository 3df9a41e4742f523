#![deny(missing_docs)]
#![doc = "Core contracts shared by every costing level: error taxonomy, closed part-code sum types, decimal money helpers and the frozen costing configuration."]

pub mod config;
pub mod errors;
pub mod level;
pub mod money;
pub mod parts;
pub mod provenance;

pub use config::{
    CostingConfig, CostingConfigDocument, Tolerances, ALLOCABLE_CODES, BY_PRODUCT_RATE_PER_KG,
};
pub use errors::{CostError, ErrorInfo};
pub use level::CostLevel;
pub use money::{
    ensure_non_negative, ensure_positive, per_kg, round_factor, round_money, round_per_kg,
    FACTOR_DP, MONEY_DP, PER_KG_DP,
};
pub use parts::{ByProductType, CostObjectRef, JointProductCode, PartCode, SubCutCode};
pub use provenance::{RunProvenance, SchemaVersion};

/// Re-export of the decimal type used for every amount, weight and factor.
pub use rust_decimal::Decimal;
