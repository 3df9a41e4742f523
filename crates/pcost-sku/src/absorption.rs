use std::collections::BTreeMap;

use pcost_core::errors::CostError;
use pcost_core::money::ensure_positive;
use pcost_core::{CostObjectRef, CostingConfig, PartCode};
use pcost_svaso::{allocate_by_market_value, AllocationLine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::abc::AbcCostResult;
use crate::sku::SkuDefinition;
use crate::source::CostSource;

/// Activity cost no SKU in the batch could carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnabsorbedAbcCost {
    /// Cost object the drivers were charged to.
    pub target: CostObjectRef,
    /// Σ driver cost for that target.
    pub cost_eur: Decimal,
}

/// Activity cost per SKU after part-level charges are passed down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcAbsorption {
    charges: BTreeMap<String, Decimal>,
    unabsorbed: Vec<UnabsorbedAbcCost>,
}

impl AbcAbsorption {
    /// Activity cost carried by one SKU; zero when nothing reached it.
    pub fn charged_to(&self, sku_code: &str) -> Decimal {
        self.charges.get(sku_code).copied().unwrap_or(Decimal::ZERO)
    }

    /// Σ activity cost carried by SKUs.
    pub fn absorbed_eur(&self) -> Decimal {
        self.charges.values().sum()
    }

    /// Targets left without a SKU, in first-charged order.
    pub fn unabsorbed(&self) -> &[UnabsorbedAbcCost] {
        &self.unabsorbed
    }

    /// Σ activity cost left without a SKU.
    pub fn unabsorbed_eur(&self) -> Decimal {
        self.unabsorbed.iter().map(|line| line.cost_eur).sum()
    }
}

/// True when a SKU drawn from `source` is made out of `part`.
///
/// A joint product passes down to SKUs cut from any of its sub-cuts.
/// By-products never source a SKU.
pub fn part_feeds_source(part: PartCode, source: CostSource) -> bool {
    match (part, source) {
        (PartCode::Joint(joint), CostSource::Joint(code)) => joint == code,
        (PartCode::Joint(joint), CostSource::SubCut(cut)) => cut.parent() == joint,
        (PartCode::SubCut(sub), CostSource::SubCut(cut)) => sub == cut,
        _ => false,
    }
}

/// Hands every Level 5 cost to the SKUs that carry it.
///
/// A SKU target is charged directly. A part target is split over the SKUs
/// made from that part in proportion to output weight, the last SKU taking
/// the rounding residual. Targets with no SKU are listed as unabsorbed, so
/// absorbed plus unabsorbed always equals the Level 5 total.
pub fn absorb_abc_costs(
    abc: &AbcCostResult,
    skus: &[SkuDefinition],
    config: &CostingConfig,
) -> Result<AbcAbsorption, CostError> {
    for sku in skus {
        ensure_positive("output_kg", sku.output_kg)
            .map_err(|err| err.with_context("sku_code", &sku.sku_code))?;
    }

    let mut targets: Vec<(&CostObjectRef, Decimal)> = Vec::new();
    for line in abc.lines() {
        match targets.iter_mut().find(|(target, _)| *target == line.target()) {
            Some((_, cost)) => *cost += line.cost_eur(),
            None => targets.push((line.target(), line.cost_eur())),
        }
    }

    let mut absorption = AbcAbsorption::default();
    for (target, cost_eur) in targets {
        let carriers: Vec<&SkuDefinition> = match target {
            CostObjectRef::Sku(code) => skus.iter().filter(|sku| &sku.sku_code == code).collect(),
            CostObjectRef::Part(part) => skus
                .iter()
                .filter(|sku| part_feeds_source(*part, sku.source))
                .collect(),
        };
        if carriers.is_empty() {
            absorption.unabsorbed.push(UnabsorbedAbcCost {
                target: target.clone(),
                cost_eur,
            });
            continue;
        }
        if cost_eur.is_zero() {
            continue;
        }

        let lines: Vec<AllocationLine<&str>> = carriers
            .iter()
            .map(|sku| AllocationLine {
                key: sku.sku_code.as_str(),
                weight_kg: sku.output_kg,
                price_per_kg: Decimal::ONE,
            })
            .collect();
        let outcome = allocate_by_market_value(cost_eur, &lines, config.tolerances())
            .map_err(|err| err.with_context("target", target))?;
        for share in outcome.shares {
            *absorption
                .charges
                .entry(share.key.to_string())
                .or_insert(Decimal::ZERO) += share.allocated_cost_total_eur;
        }
    }
    Ok(absorption)
}
