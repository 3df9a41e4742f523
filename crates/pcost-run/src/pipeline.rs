use std::collections::BTreeMap;

use pcost_core::errors::{CostError, ErrorInfo};
use pcost_core::{CostLevel, CostingConfig, SchemaVersion};
use pcost_nrv::assess_sku;
use pcost_pool::{
    apply_by_product_credit, build_joint_cost_pool, compute_landed_cost, slaughter_cost_eur,
};
use pcost_sku::{
    absorb_abc_costs, compute_abc_costs, compute_full_sku_cost, resolve_allocated_cost_per_kg,
};
use pcost_svaso::scope::ensure_unique;
use pcost_svaso::{allocate_joint_costs, allocate_sub_cuts};
use tracing::{debug, info, info_span, warn};

use crate::hash::{input_hash, run_provenance};
use crate::report::{PipelineReport, ReconciliationSummary};
use crate::scenario::BatchScenario;

fn at(level: CostLevel) -> impl Fn(CostError) -> CostError {
    move |err| err.at_level(level)
}

fn tool_versions() -> BTreeMap<String, String> {
    let mut versions = BTreeMap::new();
    versions.insert("pcost-run".to_string(), env!("CARGO_PKG_VERSION").to_string());
    versions
}

/// Runs Levels 0 to 7 in order and stops at the first failure.
///
/// Every error leaving this function carries the tag of the level that raised
/// it in its `level` context entry.
pub fn run_pipeline(
    scenario: &BatchScenario,
    config: &CostingConfig,
) -> Result<PipelineReport, CostError> {
    let span = info_span!("pipeline", batch_id = %scenario.batch.batch_id);
    let _guard = span.enter();

    let landed = compute_landed_cost(&scenario.batch).map_err(at(CostLevel::LandedCost))?;
    debug!(
        cost_level = "L0",
        landed_cost_eur = %landed.landed_cost_eur(),
        abnormal_doa_variance_eur = %landed.abnormal_doa_variance_eur(),
        "landed cost"
    );

    let slaughter = scenario
        .slaughter_cost_eur
        .unwrap_or_else(|| slaughter_cost_eur(&scenario.batch));
    let pool = build_joint_cost_pool(&landed, slaughter, scenario.griller_weight_kg)
        .map_err(at(CostLevel::JointCostPool))?;
    debug!(cost_level = "L1", joint_cost_pool_eur = %pool.joint_cost_pool_eur(), "joint cost pool");

    let net = apply_by_product_credit(&pool, &scenario.by_products, config)
        .map_err(at(CostLevel::ByProductCredit))?;
    debug!(
        cost_level = "L2",
        total_credit_eur = %net.total_credit_eur(),
        net_joint_cost_eur = %net.net_joint_cost_eur(),
        "by-product credit"
    );

    let products = scenario
        .joint_product_inputs()
        .map_err(at(CostLevel::Svaso))?;
    let svaso = allocate_joint_costs(&net, &products, config).map_err(at(CostLevel::Svaso))?;
    debug!(
        cost_level = "L3",
        products = svaso.allocations().len(),
        total_market_value_eur = %svaso.total_market_value_eur(),
        "joint products allocated"
    );

    let mut mini_svaso = Vec::with_capacity(scenario.sub_cuts.len());
    let mut parents = Vec::with_capacity(scenario.sub_cuts.len());
    for group in &scenario.sub_cuts {
        let (parent, cuts) =
            BatchScenario::sub_cut_inputs(group).map_err(at(CostLevel::MiniSvaso))?;
        parents.push(parent);
        let allocation = svaso.allocation(parent).ok_or_else(|| {
            CostError::InvalidInput(
                ErrorInfo::new(
                    "parent-not-allocated",
                    "sub-cuts name a joint product that was not allocated",
                )
                .with_context("parent", parent),
            )
            .at_level(CostLevel::MiniSvaso)
        })?;
        let result =
            allocate_sub_cuts(allocation, &cuts, config).map_err(at(CostLevel::MiniSvaso))?;
        debug!(
            cost_level = "L4",
            parent = %parent,
            rest_trim_kg = %result.rest_trim().weight_kg(),
            "sub-cuts allocated"
        );
        mini_svaso.push(result);
    }
    ensure_unique(parents).map_err(at(CostLevel::MiniSvaso))?;

    let abc = compute_abc_costs(&scenario.abc_drivers).map_err(at(CostLevel::Abc))?;
    debug!(cost_level = "L5", total_abc_cost_eur = %abc.total_abc_cost_eur(), "activity costs");

    let definitions = scenario.sku_definitions().map_err(at(CostLevel::FullSku))?;
    ensure_unique(definitions.iter().map(|sku| sku.sku_code.as_str()))
        .map_err(at(CostLevel::FullSku))?;
    let abc_absorption =
        absorb_abc_costs(&abc, &definitions, config).map_err(at(CostLevel::FullSku))?;
    if !abc_absorption.unabsorbed().is_empty() {
        warn!(
            cost_level = "L6",
            unabsorbed_eur = %abc_absorption.unabsorbed_eur(),
            targets = abc_absorption.unabsorbed().len(),
            "activity cost without a SKU to carry it"
        );
    }
    let mut skus = Vec::with_capacity(definitions.len());
    for definition in &definitions {
        let allocated = resolve_allocated_cost_per_kg(definition.source, &svaso, &mini_svaso)
            .map_err(|err| err.with_context("sku_code", &definition.sku_code))
            .map_err(at(CostLevel::FullSku))?;
        let sku = compute_full_sku_cost(definition, allocated, &abc_absorption)
            .map_err(at(CostLevel::FullSku))?;
        skus.push(sku);
    }
    debug!(cost_level = "L6", skus = skus.len(), "sku costs");

    let mut nrv = Vec::with_capacity(scenario.nrv.len());
    for input in &scenario.nrv {
        let sku = skus
            .iter()
            .find(|sku| sku.sku_code() == input.sku_code)
            .ok_or_else(|| {
                CostError::InvalidInput(
                    ErrorInfo::new("unknown-sku", "NRV line names a SKU that was not costed")
                        .with_context("sku_code", &input.sku_code),
                )
                .at_level(CostLevel::Nrv)
            })?;
        nrv.push(assess_sku(input, sku).map_err(at(CostLevel::Nrv))?);
    }
    let writedowns = nrv.iter().filter(|a| a.writedown_required()).count();
    debug!(cost_level = "L7", assessed = nrv.len(), writedowns, "net realisable value");

    let reconciliation = ReconciliationSummary::from_results(
        &svaso,
        &mini_svaso,
        &abc,
        &abc_absorption,
        config.tolerances(),
    );
    let provenance = run_provenance(scenario, config, tool_versions())?;
    let input_hash = input_hash(scenario, config)?;

    let report = PipelineReport {
        schema_version: SchemaVersion::default(),
        batch_id: scenario.batch.batch_id.clone(),
        provenance,
        input_hash,
        config: config.clone(),
        landed,
        pool,
        net,
        svaso,
        mini_svaso,
        abc,
        abc_absorption,
        skus,
        nrv,
        reconciliation,
        report_hash: String::new(),
    }
    .seal()?;

    info!(
        net_joint_cost_eur = %report.net.net_joint_cost_eur(),
        skus = report.skus.len(),
        writedowns,
        balanced = report.reconciliation.balanced,
        report_hash = %report.report_hash,
        "pipeline complete"
    );
    Ok(report)
}
