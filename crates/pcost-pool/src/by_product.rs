use std::collections::BTreeSet;

use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::money::{ensure_non_negative, round_money};
use pcost_core::{ByProductType, CostingConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::joint_pool::JointCostPoolResult;

/// Weighed by-product output of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByProductPhysical {
    /// Line identifier, unique within the batch.
    pub id: String,
    /// Kind of by-product.
    pub by_product_type: ByProductType,
    /// Weighed output in kilograms.
    pub weight_kg: Decimal,
    /// Informational market quote; never used for the credit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_price_per_kg: Option<Decimal>,
}

/// Credit granted for one by-product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByProductCreditDetail {
    id: String,
    by_product_type: ByProductType,
    weight_kg: Decimal,
    rate_per_kg: Decimal,
    credit_eur: Decimal,
}

impl ByProductCreditDetail {
    /// Line identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind of by-product.
    pub fn by_product_type(&self) -> ByProductType {
        self.by_product_type
    }

    /// Credited weight.
    pub fn weight_kg(&self) -> Decimal {
        self.weight_kg
    }

    /// Flat rate applied.
    pub fn rate_per_kg(&self) -> Decimal {
        self.rate_per_kg
    }

    /// Weight × flat rate, rounded to cents.
    pub fn credit_eur(&self) -> Decimal {
        self.credit_eur
    }
}

/// Level 2 output: the amount actually split by SVASO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetJointCostResult {
    joint_cost_pool_eur: Decimal,
    credits: Vec<ByProductCreditDetail>,
    total_credit_eur: Decimal,
    net_joint_cost_eur: Decimal,
}

impl NetJointCostResult {
    /// Pool carried in from Level 1.
    pub fn joint_cost_pool_eur(&self) -> Decimal {
        self.joint_cost_pool_eur
    }

    /// Per-line credits in input order.
    pub fn credits(&self) -> &[ByProductCreditDetail] {
        &self.credits
    }

    /// Σ credit over all lines.
    pub fn total_credit_eur(&self) -> Decimal {
        self.total_credit_eur
    }

    /// Pool minus total credit.
    pub fn net_joint_cost_eur(&self) -> Decimal {
        self.net_joint_cost_eur
    }
}

/// Subtracts the flat by-product credit from the joint cost pool.
///
/// Every kilogram is credited at the configured rate whatever its type or
/// market quote; by-products never take part in proportional allocation.
pub fn apply_by_product_credit(
    pool: &JointCostPoolResult,
    by_products: &[ByProductPhysical],
    config: &CostingConfig,
) -> Result<NetJointCostResult, CostError> {
    let rate = config.by_product_rate_per_kg();
    let mut seen = BTreeSet::new();
    let mut credits = Vec::with_capacity(by_products.len());
    for line in by_products {
        ensure_non_negative("by_product.weight_kg", line.weight_kg)
            .map_err(|err| err.with_context("id", &line.id))?;
        if !seen.insert(line.id.as_str()) {
            return Err(CostError::InvalidInput(
                ErrorInfo::new("duplicate-by-product", "by-product ids must be unique")
                    .with_context("id", &line.id),
            ));
        }
        credits.push(ByProductCreditDetail {
            id: line.id.clone(),
            by_product_type: line.by_product_type,
            weight_kg: line.weight_kg,
            rate_per_kg: rate,
            credit_eur: round_money(line.weight_kg * rate),
        });
    }

    let total_credit_eur: Decimal = credits.iter().map(|c| c.credit_eur).sum();
    let net_joint_cost_eur = pool.joint_cost_pool_eur() - total_credit_eur;
    if net_joint_cost_eur < Decimal::ZERO {
        return Err(CostError::InvalidInput(
            ErrorInfo::new(
                "credit-exceeds-pool",
                "by-product credit exceeds the joint cost pool",
            )
            .with_context("joint_cost_pool_eur", pool.joint_cost_pool_eur())
            .with_context("total_credit_eur", total_credit_eur),
        ));
    }

    Ok(NetJointCostResult {
        joint_cost_pool_eur: pool.joint_cost_pool_eur(),
        credits,
        total_credit_eur,
        net_joint_cost_eur,
    })
}
