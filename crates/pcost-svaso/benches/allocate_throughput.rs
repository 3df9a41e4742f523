use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pcost_core::{CostingConfig, Tolerances};
use pcost_svaso::{allocate_by_market_value, allocate_net_joint_cost, AllocationLine, JointProductInput};
use rust_decimal::Decimal;

fn allocate_bench(c: &mut Criterion) {
    let config = CostingConfig::default();
    let products = vec![
        JointProductInput::parse("breast_cap", Decimal::new(123018, 2), Decimal::new(950, 2)).unwrap(),
        JointProductInput::parse("legs", Decimal::new(155540, 2), Decimal::new(725, 2)).unwrap(),
        JointProductInput::parse("wings", Decimal::new(37825, 2), Decimal::new(550, 2)).unwrap(),
    ];
    let net = Decimal::new(1877500, 2);

    c.bench_function("svaso_three_products", |b| {
        b.iter(|| black_box(allocate_net_joint_cost(net, &products, &config).unwrap()));
    });

    let tolerances = Tolerances::default();
    let lines: Vec<_> = (0..256u32)
        .map(|idx| AllocationLine {
            key: idx,
            weight_kg: Decimal::from(10 + idx % 17),
            price_per_kg: Decimal::new(i64::from(100 + idx % 29), 2),
        })
        .collect();

    c.bench_function("primitive_256_lines", |b| {
        b.iter(|| black_box(allocate_by_market_value(net, &lines, &tolerances).unwrap()));
    });
}

criterion_group!(benches, allocate_bench);
criterion_main!(benches);
