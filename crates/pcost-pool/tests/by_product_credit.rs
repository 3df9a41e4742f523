use pcost_core::{ByProductType, CostError, CostingConfig};
use pcost_pool::{
    apply_by_product_credit, build_joint_cost_pool, compute_landed_cost, ByProductPhysical,
    JointCostPoolResult, LiveBatchInput,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn d(text: &str) -> Decimal {
    text.parse().unwrap()
}

fn pool() -> JointCostPoolResult {
    let landed = compute_landed_cost(&LiveBatchInput {
        batch_id: "B-7".into(),
        live_weight_kg: d("10000"),
        bird_count: 4000,
        live_price_per_kg: d("1.80"),
        transport_cost_eur: d("400"),
        catching_fee_eur: d("200"),
        slaughter_fee_per_head_eur: d("0.30"),
        doa_count: 0,
        doa_threshold_pct: d("0.5"),
    })
    .unwrap();
    build_joint_cost_pool(&landed, d("1200"), d("7200")).unwrap()
}

fn line(id: &str, kind: ByProductType, weight: &str, price: Option<&str>) -> ByProductPhysical {
    ByProductPhysical {
        id: id.into(),
        by_product_type: kind,
        weight_kg: d(weight),
        market_price_per_kg: price.map(d),
    }
}

#[test]
fn credit_rounds_to_cents() {
    let net = apply_by_product_credit(
        &pool(),
        &[line("bp-1", ByProductType::BackCarcass, "265.13", None)],
        &CostingConfig::default(),
    )
    .unwrap();
    assert_eq!(net.credits()[0].credit_eur(), d("53.03"));
    assert_eq!(net.net_joint_cost_eur(), d("19800.00") - d("53.03"));
}

#[test]
fn market_price_on_a_by_product_is_ignored() {
    let config = CostingConfig::default();
    let cheap = apply_by_product_credit(
        &pool(),
        &[line("bp-1", ByProductType::Offal, "265.13", Some("0.05"))],
        &config,
    )
    .unwrap();
    let dear = apply_by_product_credit(
        &pool(),
        &[line("bp-1", ByProductType::Offal, "265.13", Some("3.75"))],
        &config,
    )
    .unwrap();
    assert_eq!(cheap, dear);
    assert_eq!(cheap.total_credit_eur(), d("53.03"));
}

#[test]
fn duplicate_ids_and_negative_weights_are_rejected() {
    let config = CostingConfig::default();
    let err = apply_by_product_credit(
        &pool(),
        &[
            line("bp-1", ByProductType::Blood, "10", None),
            line("bp-1", ByProductType::Feathers, "10", None),
        ],
        &config,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "duplicate-by-product");

    let err = apply_by_product_credit(
        &pool(),
        &[line("bp-2", ByProductType::Blood, "-1", None)],
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, CostError::InvalidInput(_)));
}

#[test]
fn credit_larger_than_pool_is_rejected() {
    let err = apply_by_product_credit(
        &pool(),
        &[line("bp-1", ByProductType::Cat3Waste, "200000", None)],
        &CostingConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.info().code, "credit-exceeds-pool");
}

fn by_product_type() -> impl Strategy<Value = ByProductType> {
    prop_oneof![
        Just(ByProductType::Blood),
        Just(ByProductType::Feathers),
        Just(ByProductType::Heads),
        Just(ByProductType::Feet),
        Just(ByProductType::Offal),
        Just(ByProductType::BackCarcass),
        Just(ByProductType::Neck),
    ]
}

proptest! {
    #[test]
    fn credit_is_weight_times_flat_rate(
        kind in by_product_type(),
        grams in 0i64..500_000_000,
        price_cents in proptest::option::of(0i64..2_000),
    ) {
        let weight = Decimal::new(grams, 3);
        let by_product = ByProductPhysical {
            id: "bp".into(),
            by_product_type: kind,
            weight_kg: weight,
            market_price_per_kg: price_cents.map(|c| Decimal::new(c, 2)),
        };
        let big_pool = build_joint_cost_pool(
            &compute_landed_cost(&LiveBatchInput {
                batch_id: "P".into(),
                live_weight_kg: d("1000000"),
                bird_count: 1,
                live_price_per_kg: d("2"),
                transport_cost_eur: Decimal::ZERO,
                catching_fee_eur: Decimal::ZERO,
                slaughter_fee_per_head_eur: Decimal::ZERO,
                doa_count: 0,
                doa_threshold_pct: Decimal::ZERO,
            }).unwrap(),
            Decimal::ZERO,
            d("700000"),
        ).unwrap();
        let net = apply_by_product_credit(&big_pool, &[by_product], &CostingConfig::default()).unwrap();
        let expected = (weight * d("0.20")).round_dp_with_strategy(
            2,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        );
        prop_assert_eq!(net.credits()[0].credit_eur(), expected);
        prop_assert_eq!(net.net_joint_cost_eur(), d("2000000") - expected);
    }
}
