use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use pcost_core::{CostError, CostingConfig, JointProductCode, Tolerances};
use pcost_run::{load_costing_config, load_scenario, run_pipeline, BatchScenario};
use rust_decimal::Decimal;

fn scenario() -> BatchScenario {
    load_scenario(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/scenario_baseline.yaml"))
        .unwrap()
}

#[test]
fn by_product_code_in_joint_list_is_a_level_three_scope_violation() {
    let mut scenario = scenario();
    scenario.joint_products[2].part_code = "back_carcass".into();
    let err = run_pipeline(&scenario, &CostingConfig::default()).unwrap_err();
    assert!(matches!(err, CostError::ScopeViolation(_)));
    assert_eq!(err.level(), Some("L3"));
}

#[test]
fn narrowed_config_rejects_wings() {
    let codes: BTreeSet<_> = [JointProductCode::BreastCap, JointProductCode::Legs]
        .into_iter()
        .collect();
    let config =
        CostingConfig::new(Decimal::new(20, 2), codes, Tolerances::default()).unwrap();
    let err = run_pipeline(&scenario(), &config).unwrap_err();
    assert!(matches!(err, CostError::ScopeViolation(ref info) if info.code == "outside-configured-scope"));
    assert_eq!(err.level(), Some("L3"));
}

#[test]
fn griller_heavier_than_live_weight_fails_at_level_one() {
    let mut scenario = scenario();
    scenario.griller_weight_kg = Decimal::from(20_000);
    let err = run_pipeline(&scenario, &CostingConfig::default()).unwrap_err();
    assert!(matches!(err, CostError::InvalidInput(_)));
    assert_eq!(err.level(), Some("L1"));
}

#[test]
fn foreign_sub_cut_fails_at_level_four() {
    let mut scenario = scenario();
    scenario.sub_cuts[0].cuts[0].sub_cut_code = "drumstick".into();
    let err = run_pipeline(&scenario, &CostingConfig::default()).unwrap_err();
    assert!(matches!(err, CostError::ScopeViolation(ref info) if info.code == "foreign-sub-cut"));
    assert_eq!(err.level(), Some("L4"));
}

#[test]
fn sku_on_unsplit_sub_cut_fails_at_level_six() {
    let mut scenario = scenario();
    scenario.skus[0].source = "wing_tip".into();
    let err = run_pipeline(&scenario, &CostingConfig::default()).unwrap_err();
    assert!(matches!(err, CostError::InvalidInput(ref info) if info.code == "missing-sub-cut-allocation"));
    assert_eq!(err.level(), Some("L6"));
}

#[test]
fn nrv_for_unknown_sku_fails_at_level_seven() {
    let mut scenario = scenario();
    scenario.nrv[0].sku_code = "NOPE".into();
    let err = run_pipeline(&scenario, &CostingConfig::default()).unwrap_err();
    assert!(matches!(err, CostError::InvalidInput(ref info) if info.code == "unknown-sku"));
    assert_eq!(err.level(), Some("L7"));
}

#[test]
fn invalid_config_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("costing.yaml");
    fs::write(&path, "by_product_rate_per_kg: \"-0.10\"\n").unwrap();
    let err = load_costing_config(Some(&path)).unwrap_err();
    assert!(matches!(err, CostError::Config(_)));
}

#[test]
fn missing_scenario_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_scenario(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CostError::Io(_)));
}
