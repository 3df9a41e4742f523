#![deny(missing_docs)]
#![doc = "Levels 5 and 6: activity-based costing and the additive assembly of a full cost per kilogram for each SKU."]

/// Level 5 activity-based cost drivers.
pub mod abc;
/// Passing activity cost from parts down to the SKUs made from them.
pub mod absorption;
/// Level 6 SKU cost assembly.
pub mod sku;
/// Lookup of the allocated cost a SKU is built on.
pub mod source;

pub use abc::{compute_abc_costs, AbcCostDriver, AbcCostLine, AbcCostResult};
pub use absorption::{absorb_abc_costs, part_feeds_source, AbcAbsorption, UnabsorbedAbcCost};
pub use sku::{compute_full_sku_cost, FullSkuCostResult, SkuDefinition};
pub use source::{resolve_allocated_cost_per_kg, CostSource};
