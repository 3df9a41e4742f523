#![deny(missing_docs)]
#![doc = "Levels 0 to 2 of batch costing: live-bird landed cost, the joint cost pool and the flat by-product credit that yields net joint cost."]

/// Level 2 flat-rate by-product credit.
pub mod by_product;
/// Level 1 joint cost pool.
pub mod joint_pool;
/// Level 0 landed cost of the live batch.
pub mod landed;

pub use by_product::{
    apply_by_product_credit, ByProductCreditDetail, ByProductPhysical, NetJointCostResult,
};
pub use joint_pool::{build_joint_cost_pool, JointCostPoolResult};
pub use landed::{compute_landed_cost, slaughter_cost_eur, LandedCostResult, LiveBatchInput};
