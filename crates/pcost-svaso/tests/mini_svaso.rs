use pcost_core::{CostError, CostingConfig, JointProductCode, SubCutCode};
use pcost_svaso::{
    allocate_net_joint_cost, allocate_sub_cuts, JointProductAllocation, JointProductInput,
    SubJointCutInput,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn d(text: &str) -> Decimal {
    text.parse().unwrap()
}

fn breast_cap() -> JointProductAllocation {
    let products = vec![
        JointProductInput::parse("breast_cap", d("1230.18"), d("9.50")).unwrap(),
        JointProductInput::parse("legs", d("1555.40"), d("7.25")).unwrap(),
        JointProductInput::parse("wings", d("378.25"), d("5.50")).unwrap(),
    ];
    allocate_net_joint_cost(d("18775.00"), &products, &CostingConfig::default())
        .unwrap()
        .allocation(JointProductCode::BreastCap)
        .unwrap()
        .clone()
}

fn cut(code: SubCutCode, weight: &str, price: &str) -> SubJointCutInput {
    SubJointCutInput {
        sub_cut_code: code,
        weight_kg: d(weight),
        shadow_price_per_kg: d(price),
    }
}

#[test]
fn splits_parent_cost_across_named_cuts() {
    let parent = breast_cap();
    let cuts = vec![
        cut(SubCutCode::Fillet, "950", "11.00"),
        cut(SubCutCode::InnerFillet, "180", "8.00"),
    ];
    let result = allocate_sub_cuts(&parent, &cuts, &CostingConfig::default()).unwrap();

    assert_eq!(result.parent_code(), JointProductCode::BreastCap);
    assert_eq!(result.parent_allocated_cost_eur(), d("8761.39"));
    assert_eq!(result.total_market_value_eur(), d("11890"));

    let fillet = result.sub_allocation(SubCutCode::Fillet).unwrap();
    assert_eq!(fillet.allocation_factor(), d("0.87888982"));
    assert_eq!(fillet.allocated_cost_total_eur(), d("7700.30"));
    assert_eq!(fillet.allocated_cost_per_kg(), d("8.105579"));

    let inner = result.sub_allocation(SubCutCode::InnerFillet).unwrap();
    assert_eq!(inner.allocated_cost_total_eur(), d("1061.09"));
    assert_eq!(inner.allocated_cost_per_kg(), d("5.894944"));

    assert_eq!(result.sum_allocated_cost_eur(), d("8761.39"));
    assert_eq!(result.reconciliation_delta_eur(), Decimal::ZERO);
}

#[test]
fn unclaimed_weight_is_rest_trim_at_zero_cost() {
    let parent = breast_cap();
    let cuts = vec![
        cut(SubCutCode::Fillet, "950", "11.00"),
        cut(SubCutCode::InnerFillet, "180", "8.00"),
    ];
    let result = allocate_sub_cuts(&parent, &cuts, &CostingConfig::default()).unwrap();

    assert_eq!(result.rest_trim().weight_kg(), d("100.18"));
    assert_eq!(result.rest_trim().allocated_cost_eur(), Decimal::ZERO);
}

#[test]
fn fully_claimed_parent_leaves_no_trim() {
    let parent = breast_cap();
    let cuts = vec![
        cut(SubCutCode::Fillet, "1000.18", "11.00"),
        cut(SubCutCode::InnerFillet, "230", "8.00"),
    ];
    let result = allocate_sub_cuts(&parent, &cuts, &CostingConfig::default()).unwrap();
    assert_eq!(result.rest_trim().weight_kg(), Decimal::ZERO);
}

#[test]
fn sub_cuts_heavier_than_parent_are_rejected() {
    let parent = breast_cap();
    let cuts = vec![
        cut(SubCutCode::Fillet, "1100", "11.00"),
        cut(SubCutCode::InnerFillet, "200", "8.00"),
    ];
    let err = allocate_sub_cuts(&parent, &cuts, &CostingConfig::default()).unwrap_err();
    assert!(
        matches!(err, CostError::InvalidInput(ref info) if info.code == "sub-cuts-exceed-parent")
    );
}

#[test]
fn duplicate_sub_cuts_are_rejected() {
    let parent = breast_cap();
    let cuts = vec![
        cut(SubCutCode::Fillet, "100", "11.00"),
        cut(SubCutCode::Fillet, "100", "11.00"),
    ];
    let err = allocate_sub_cuts(&parent, &cuts, &CostingConfig::default()).unwrap_err();
    assert!(matches!(err, CostError::InvalidInput(ref info) if info.code == "duplicate-code"));
}

fn grams(value: u32) -> Decimal {
    Decimal::new(i64::from(value), 3)
}

proptest! {
    #[test]
    fn named_cuts_absorb_the_parent_and_trim_stays_free(
        fillet_g in 1u32..600_000,
        inner_g in 1u32..600_000,
        fillet_cents in 100u32..2_000,
        inner_cents in 100u32..2_000,
    ) {
        let parent = breast_cap();
        let cuts = vec![
            SubJointCutInput {
                sub_cut_code: SubCutCode::Fillet,
                weight_kg: grams(fillet_g),
                shadow_price_per_kg: Decimal::new(i64::from(fillet_cents), 2),
            },
            SubJointCutInput {
                sub_cut_code: SubCutCode::InnerFillet,
                weight_kg: grams(inner_g),
                shadow_price_per_kg: Decimal::new(i64::from(inner_cents), 2),
            },
        ];
        let result = allocate_sub_cuts(&parent, &cuts, &CostingConfig::default()).unwrap();

        let named: Decimal = result
            .sub_allocations()
            .iter()
            .map(|a| a.allocated_cost_total_eur())
            .sum();
        prop_assert_eq!(named, parent.allocated_cost_total_eur());
        prop_assert_eq!(result.reconciliation_delta_eur(), Decimal::ZERO);
        prop_assert_eq!(result.rest_trim().allocated_cost_eur(), Decimal::ZERO);
        prop_assert_eq!(
            result.rest_trim().weight_kg(),
            parent.weight_kg() - grams(fillet_g) - grams(inner_g)
        );
        for allocation in result.sub_allocations() {
            prop_assert!(allocation.allocated_cost_total_eur() >= Decimal::ZERO);
        }
    }
}
