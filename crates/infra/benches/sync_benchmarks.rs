use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rust_decimal::Decimal;
use stockflow_catalog::MaterialRequirement;
use stockflow_core::{MaterialId, Quantity, ServiceId};
use stockflow_infra::{InventorySync, SyncConfig};
use stockflow_inventory::MaterialItem;
use stockflow_orders::{OrderStatus, ServiceLine};

const MATERIALS: usize = 20;

/// Engine with `MATERIALS` items and one service that needs a little of each.
fn setup_engine(stock_per_item: u32) -> InventorySync {
    let sync = InventorySync::new(SyncConfig::default());
    let mut requirements = Vec::with_capacity(MATERIALS);

    for i in 0..MATERIALS {
        let id = MaterialId::new(format!("mat-{i}")).unwrap();
        let item = MaterialItem::new(
            id.clone(),
            format!("Material {i}"),
            Quantity::from_units(stock_per_item),
            "unit",
            Quantity::from_units(10),
        )
        .unwrap();
        sync.upsert_material(item).unwrap();
        requirements.push(MaterialRequirement {
            item_id: id,
            quantity_per_unit: Quantity::new(Decimal::new(1, 1)).unwrap(),
        });
    }

    sync.set_mapping(ServiceId::new("wash").unwrap(), requirements).unwrap();
    sync
}

fn wash(kg: u32) -> Vec<ServiceLine> {
    vec![ServiceLine {
        service_id: ServiceId::new("wash").unwrap(),
        quantity: Quantity::from_units(kg),
    }]
}

fn bench_status_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("status_transitions");

    // Apply then restore: two stock transactions per iteration.
    group.bench_function("apply_restore_cycle", |b| {
        let sync = setup_engine(1_000_000);
        let order_id = sync.create_order(wash(5), OrderStatus::Pending).unwrap().order.id_typed();
        b.iter(|| {
            sync.set_order_status(order_id, black_box(OrderStatus::Washing)).unwrap();
            sync.set_order_status(order_id, black_box(OrderStatus::Delivered)).unwrap();
        });
    });

    // Reapply within the consuming region.
    group.bench_function("reapply_in_consuming_region", |b| {
        let sync = setup_engine(1_000_000);
        let order_id = sync.create_order(wash(5), OrderStatus::Washing).unwrap().order.id_typed();
        b.iter(|| {
            sync.set_order_status(order_id, black_box(OrderStatus::Drying)).unwrap();
            sync.set_order_status(order_id, black_box(OrderStatus::Folding)).unwrap();
        });
    });

    group.finish();
}

fn bench_theoretical_inventory(c: &mut Criterion) {
    let mut group = c.benchmark_group("theoretical_inventory");

    for order_count in [10usize, 100, 1_000] {
        let sync = setup_engine(1_000_000);
        for _ in 0..order_count {
            sync.create_order(wash(3), OrderStatus::Washing).unwrap();
        }

        group.throughput(Throughput::Elements(order_count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(order_count), &sync, |b, sync| {
            b.iter(|| black_box(sync.theoretical_inventory().unwrap()));
        });
    }

    group.finish();
}

fn bench_availability_check(c: &mut Criterion) {
    let sync = setup_engine(100);
    let cart = wash(40);

    c.bench_function("check_availability", |b| {
        b.iter(|| black_box(sync.check_availability(&cart, Quantity::from_units(3)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_status_transitions,
    bench_theoretical_inventory,
    bench_availability_check
);
criterion_main!(benches);
