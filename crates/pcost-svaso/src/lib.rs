#![deny(missing_docs)]
#![doc = "Market-value-proportional allocation with an exact-reconciliation residual, applied to the joint products of a batch (SVASO) and recursively to the sub-cuts of one joint product (mini-SVASO)."]

/// Level 3 joint product allocation.
pub mod joint;
/// Level 4 sub-cut allocation within one joint product.
pub mod mini;
/// Shared allocation primitive and reconciliation check.
pub mod primitive;
/// Scope rails guarding what may enter an allocation.
pub mod scope;

pub use joint::{
    allocate_joint_costs, allocate_net_joint_cost, JointProductAllocation, JointProductInput,
    SvasoAllocationResult,
};
pub use mini::{allocate_sub_cuts, MiniSvasoResult, RestTrim, SubJointAllocation, SubJointCutInput};
pub use primitive::{
    allocate_by_market_value, verify_reconciliation, AllocationLine, AllocationOutcome,
    AllocationShare, ReconciliationCheck,
};
