use pcost_core::{CostingConfig, JointProductCode, Tolerances, BY_PRODUCT_RATE_PER_KG};
use rust_decimal::Decimal;

#[test]
fn default_config_roundtrip() {
    let config = CostingConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let restored: CostingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, restored);
}

#[test]
fn partial_document_fills_defaults() {
    let restored: CostingConfig = serde_json::from_str(r#"{"allocable_codes":["legs"]}"#).unwrap();
    assert_eq!(restored.by_product_rate_per_kg(), BY_PRODUCT_RATE_PER_KG);
    assert!(restored.is_allocable(JointProductCode::Legs));
    assert!(!restored.is_allocable(JointProductCode::Wings));
    assert_eq!(restored.tolerances(), &Tolerances::default());
}

#[test]
fn invalid_document_is_rejected() {
    let err = serde_json::from_str::<CostingConfig>(r#"{"by_product_rate_per_kg":"-0.10"}"#)
        .unwrap_err();
    assert!(err.to_string().contains("negative-by-product-rate"));
    assert!(serde_json::from_str::<CostingConfig>(r#"{"allocable_codes":["offal"]}"#).is_err());
}

#[test]
fn custom_rate_is_frozen_into_config() {
    let config = CostingConfig::new(
        Decimal::new(25, 2),
        JointProductCode::ALL,
        Tolerances::default(),
    )
    .unwrap();
    assert_eq!(config.by_product_rate_per_kg(), Decimal::new(25, 2));
    assert_eq!(config.allocable_codes().len(), 3);
}
