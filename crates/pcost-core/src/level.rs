//! Identifiers for the fixed sequence of costing levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight dependency-ordered costing levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostLevel {
    /// Level 0: live-bird acquisition cost.
    LandedCost,
    /// Level 1: landed cost plus slaughter cost.
    JointCostPool,
    /// Level 2: flat per-kilogram credit for by-products.
    ByProductCredit,
    /// Level 3: market-value allocation over the joint products.
    Svaso,
    /// Level 4: recursive allocation inside one joint product.
    MiniSvaso,
    /// Level 5: additive activity-based costs.
    Abc,
    /// Level 6: per-SKU cost assembly.
    FullSku,
    /// Level 7: net realizable value comparison.
    Nrv,
}

impl CostLevel {
    /// All levels in execution order.
    pub const ALL: [CostLevel; 8] = [
        CostLevel::LandedCost,
        CostLevel::JointCostPool,
        CostLevel::ByProductCredit,
        CostLevel::Svaso,
        CostLevel::MiniSvaso,
        CostLevel::Abc,
        CostLevel::FullSku,
        CostLevel::Nrv,
    ];

    /// Numeric level index (0 through 7).
    pub fn index(self) -> u8 {
        match self {
            CostLevel::LandedCost => 0,
            CostLevel::JointCostPool => 1,
            CostLevel::ByProductCredit => 2,
            CostLevel::Svaso => 3,
            CostLevel::MiniSvaso => 4,
            CostLevel::Abc => 5,
            CostLevel::FullSku => 6,
            CostLevel::Nrv => 7,
        }
    }

    /// Short tag such as `L3` used in error context and log fields.
    pub fn tag(self) -> String {
        format!("L{}", self.index())
    }
}

impl fmt::Display for CostLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CostLevel::LandedCost => "landed cost",
            CostLevel::JointCostPool => "joint cost pool",
            CostLevel::ByProductCredit => "by-product credit",
            CostLevel::Svaso => "SVASO allocation",
            CostLevel::MiniSvaso => "mini-SVASO allocation",
            CostLevel::Abc => "ABC cost",
            CostLevel::FullSku => "full SKU cost",
            CostLevel::Nrv => "NRV assessment",
        };
        write!(f, "{} ({})", self.tag(), name)
    }
}
