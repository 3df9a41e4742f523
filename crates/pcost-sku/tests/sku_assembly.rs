use pcost_core::{
    ByProductType, CostError, CostObjectRef, CostingConfig, JointProductCode, PartCode, SubCutCode,
};
use pcost_sku::{
    absorb_abc_costs, compute_abc_costs, compute_full_sku_cost, resolve_allocated_cost_per_kg,
    AbcAbsorption, AbcCostDriver, CostSource, SkuDefinition,
};
use pcost_svaso::{
    allocate_net_joint_cost, allocate_sub_cuts, JointProductInput, MiniSvasoResult,
    SubJointCutInput, SvasoAllocationResult,
};
use rust_decimal::Decimal;

fn d(text: &str) -> Decimal {
    text.parse().unwrap()
}

fn allocations() -> (SvasoAllocationResult, Vec<MiniSvasoResult>) {
    let config = CostingConfig::default();
    let svaso = allocate_net_joint_cost(
        d("18775.00"),
        &[
            JointProductInput::parse("breast_cap", d("1230.18"), d("9.50")).unwrap(),
            JointProductInput::parse("legs", d("1555.40"), d("7.25")).unwrap(),
            JointProductInput::parse("wings", d("378.25"), d("5.50")).unwrap(),
        ],
        &config,
    )
    .unwrap();
    let breast = svaso.allocation(JointProductCode::BreastCap).unwrap();
    let mini = allocate_sub_cuts(
        breast,
        &[
            SubJointCutInput {
                sub_cut_code: SubCutCode::Fillet,
                weight_kg: d("950"),
                shadow_price_per_kg: d("11.00"),
            },
            SubJointCutInput {
                sub_cut_code: SubCutCode::InnerFillet,
                weight_kg: d("180"),
                shadow_price_per_kg: d("8.00"),
            },
        ],
        &config,
    )
    .unwrap();
    (svaso, vec![mini])
}

fn sku(code: &str, source: CostSource, output: &str) -> SkuDefinition {
    SkuDefinition {
        sku_code: code.into(),
        source,
        output_kg: d(output),
        meat_content_pct: Decimal::ONE_HUNDRED,
        packaging_cost_per_kg: Decimal::ZERO,
        giveaway_cost_per_kg: Decimal::ZERO,
    }
}

#[test]
fn resolves_joint_and_sub_cut_sources() {
    let (svaso, minis) = allocations();
    let legs =
        resolve_allocated_cost_per_kg(CostSource::Joint(JointProductCode::Legs), &svaso, &minis)
            .unwrap();
    assert_eq!(legs, d("5.435239"));

    let fillet =
        resolve_allocated_cost_per_kg(CostSource::SubCut(SubCutCode::Fillet), &svaso, &minis)
            .unwrap();
    assert_eq!(fillet, d("8.105579"));
}

#[test]
fn sub_cut_without_mini_allocation_is_invalid_input() {
    let (svaso, minis) = allocations();
    let err =
        resolve_allocated_cost_per_kg(CostSource::SubCut(SubCutCode::Drumstick), &svaso, &minis)
            .unwrap_err();
    assert!(
        matches!(err, CostError::InvalidInput(ref info) if info.code == "missing-sub-cut-allocation")
    );
}

#[test]
fn full_cost_is_additive() {
    let abc = compute_abc_costs(&[AbcCostDriver {
        driver_code: "tray_sealing".into(),
        target: CostObjectRef::Sku("FIL-500".into()),
        rate_per_unit: d("0.05"),
        units_consumed: d("1800"),
    }])
    .unwrap();
    let mut definition = sku("FIL-500", CostSource::SubCut(SubCutCode::Fillet), "900");
    definition.packaging_cost_per_kg = d("0.35");
    definition.giveaway_cost_per_kg = d("0.08");
    let absorption =
        absorb_abc_costs(&abc, &[definition.clone()], &CostingConfig::default()).unwrap();

    let result = compute_full_sku_cost(&definition, d("8.105579"), &absorption).unwrap();

    assert_eq!(result.meat_cost_per_kg(), d("8.105579"));
    assert_eq!(result.abc_cost_eur(), d("90.00"));
    assert_eq!(result.abc_cost_per_kg(), d("0.1"));
    assert_eq!(result.cost_per_kg(), d("8.635579"));
    assert_eq!(result.total_cost_eur(), d("7772.02"));
}

#[test]
fn meat_content_scales_the_allocated_cost() {
    let mut definition = sku("MARINADE", CostSource::Joint(JointProductCode::Legs), "100");
    definition.meat_content_pct = d("80");
    let result =
        compute_full_sku_cost(&definition, d("5.435239"), &AbcAbsorption::default()).unwrap();
    assert_eq!(result.meat_cost_per_kg(), d("4.348191"));
    assert_eq!(result.cost_per_kg(), d("4.348191"));
    assert_eq!(result.total_cost_eur(), d("434.82"));
}

#[test]
fn rejects_zero_output_and_meat_content_out_of_range() {
    let abc = AbcAbsorption::default();
    let zero = sku("EMPTY", CostSource::Joint(JointProductCode::Wings), "0");
    assert!(matches!(
        compute_full_sku_cost(&zero, d("4.12"), &abc),
        Err(CostError::InvalidInput(_))
    ));

    for pct in ["0", "100.5"] {
        let mut definition = sku("BAD", CostSource::Joint(JointProductCode::Wings), "10");
        definition.meat_content_pct = d(pct);
        let err = compute_full_sku_cost(&definition, d("4.12"), &abc).unwrap_err();
        assert!(matches!(err, CostError::InvalidInput(ref info) if info.code == "meat-content-range"));
    }
}

#[test]
fn sku_definition_defaults_optional_fields() {
    let definition: SkuDefinition = serde_json::from_str(
        r#"{"sku_code":"LEG-1","source":{"joint":"legs"},"output_kg":"250"}"#,
    )
    .unwrap();
    assert_eq!(definition.meat_content_pct, Decimal::ONE_HUNDRED);
    assert_eq!(definition.packaging_cost_per_kg, Decimal::ZERO);
}

fn driver(code: &str, target: CostObjectRef, rate: &str, units: &str) -> AbcCostDriver {
    AbcCostDriver {
        driver_code: code.into(),
        target,
        rate_per_unit: d(rate),
        units_consumed: d(units),
    }
}

#[test]
fn part_charges_pass_down_to_skus_by_output_weight() {
    let abc = compute_abc_costs(&[
        driver(
            "deboning_minutes",
            CostObjectRef::Part(PartCode::Joint(JointProductCode::Legs)),
            "0.62",
            "340",
        ),
        driver("labelling", CostObjectRef::Sku("DRUM-1KG".into()), "0.011", "700"),
    ])
    .unwrap();
    let skus = vec![
        sku("LEG-Q", CostSource::Joint(JointProductCode::Legs), "300"),
        sku("DRUM-1KG", CostSource::SubCut(SubCutCode::Drumstick), "700"),
        sku("WING-BULK", CostSource::Joint(JointProductCode::Wings), "378.25"),
    ];

    let absorption = absorb_abc_costs(&abc, &skus, &CostingConfig::default()).unwrap();

    // 210.80 split 300:700, the last SKU taking the residual.
    assert_eq!(absorption.charged_to("LEG-Q"), d("63.24"));
    assert_eq!(absorption.charged_to("DRUM-1KG"), d("147.56") + d("7.70"));
    assert_eq!(absorption.charged_to("WING-BULK"), Decimal::ZERO);
    assert_eq!(absorption.absorbed_eur(), abc.total_abc_cost_eur());
    assert!(absorption.unabsorbed().is_empty());

    let drum = compute_full_sku_cost(&skus[1], d("6.159357"), &absorption).unwrap();
    assert_eq!(drum.abc_cost_eur(), d("155.26"));
    assert_eq!(drum.abc_cost_per_kg(), d("0.2218"));
}

#[test]
fn charges_without_a_carrying_sku_are_reported_as_unabsorbed() {
    let offal = CostObjectRef::Part(PartCode::ByProduct(ByProductType::Offal));
    let abc = compute_abc_costs(&[
        driver("chilling", offal.clone(), "0.10", "120"),
        driver(
            "thigh_trim",
            CostObjectRef::Part(PartCode::SubCut(SubCutCode::Thigh)),
            "0.50",
            "10",
        ),
        driver("labelling", CostObjectRef::Sku("GONE".into()), "0.01", "100"),
        driver("tray_sealing", CostObjectRef::Sku("WING-BULK".into()), "0.05", "100"),
    ])
    .unwrap();
    let skus = vec![sku("WING-BULK", CostSource::Joint(JointProductCode::Wings), "378.25")];

    let absorption = absorb_abc_costs(&abc, &skus, &CostingConfig::default()).unwrap();

    assert_eq!(absorption.absorbed_eur(), d("5.00"));
    assert_eq!(absorption.unabsorbed_eur(), d("18.00"));
    assert_eq!(absorption.unabsorbed()[0].target, offal);
    assert_eq!(absorption.unabsorbed().len(), 3);
    assert_eq!(
        absorption.absorbed_eur() + absorption.unabsorbed_eur(),
        abc.total_abc_cost_eur()
    );
}
