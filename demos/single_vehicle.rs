use secure_update::contract::{UpdateManifest, VehicleType};
use secure_update::network::{ContractGateway, LocalGateway};
use secure_update::oem::Manufacturer;
use secure_update::vehicle::OnBoardUnit;
use secure_update::{AccountKey, HasUpdateAccess, UpdateLedger};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Single Vehicle Demo\n");

    let oem_key = AccountKey::generate();
    let ledger = Arc::new(UpdateLedger::new(oem_key.principal(), HasUpdateAccess::Public));
    let gateway = Arc::new(LocalGateway::new(ledger));
    gateway.connect().await?;

    let oem = Manufacturer::new(oem_key, gateway.clone());
    let mut obu = OnBoardUnit::new(VehicleType::MODEL_A, AccountKey::generate(), gateway);
    oem.register_vehicle(VehicleType::MODEL_A, obu.principal()).await?;
    println!("✓ OBU registered for vehicle type {}", obu.vehicle_type);

    let payload = b"firmware image 1.1";
    let manifest = UpdateManifest::for_payload("demo-key", "bafy-demo", "1.1", payload);
    oem.publish_update(VehicleType::MODEL_A, &manifest).await?;
    println!("✓ Update available: {}", obu.check_for_update().await?);

    let installed = obu.install(payload).await?;
    println!("✓ Installed version {}", installed.version);
    println!("✓ Update still available: {}", obu.check_for_update().await?);
    Ok(())
}
