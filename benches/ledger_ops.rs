use criterion::{Criterion, criterion_group, criterion_main};
use secure_update::{HasUpdateAccess, Principal, UpdateLedger, UpdateManifest, VehicleType};

fn ledger_ops(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let oem = Principal::from_bytes([0xee; 20]);
    let owner = Principal::from_bytes([0xa1; 20]);
    let ledger = UpdateLedger::new(oem, HasUpdateAccess::Public);
    rt.block_on(async {
        ledger
            .add_vehicle(&oem, VehicleType::MODEL_A, owner)
            .await
            .expect("register");
    });

    c.bench_function("add_update", |b| {
        b.iter(|| {
            rt.block_on(ledger.add_update(
                &oem,
                UpdateManifest::new("k", "c", "cid", "v1"),
                VehicleType::MODEL_A,
            ))
        })
    });

    c.bench_function("fetch_update", |b| {
        b.iter(|| rt.block_on(ledger.fetch_update(&owner, VehicleType::MODEL_A)))
    });

    c.bench_function("toggle_status", |b| {
        b.iter(|| rt.block_on(ledger.update_update_status(&owner, VehicleType::MODEL_A, true)))
    });
}

criterion_group!(benches, ledger_ops);
criterion_main!(benches);
