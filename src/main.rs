use anyhow::{Context, Result};
use log::{error, info};
use secure_update::config::DeploymentConfig;
use secure_update::contract::{ContractCall, UpdateLedger, UpdateManifest, VehicleType};
use secure_update::network::{ContractGateway, LocalGateway};
use secure_update::oem::Manufacturer;
use secure_update::report::{RunReport, save_journal_csv};
use secure_update::vehicle::OnBoardUnit;
use std::path::PathBuf;
use std::sync::Arc;

struct Deployment {
    gateway: Arc<LocalGateway>,
    manufacturer: Manufacturer,
    vehicles: Vec<OnBoardUnit>,
}

async fn contract_deployment(config: &DeploymentConfig) -> Result<Deployment> {
    println!("Contract Deployment");

    let oem_key = config.oem_key().context("loading OEM key")?;
    let ledger = Arc::new(UpdateLedger::new(oem_key.principal(), config.has_update_access));
    let gateway = Arc::new(LocalGateway::new(ledger));
    gateway.connect().await?;

    let manufacturer = Manufacturer::new(oem_key, gateway.clone());
    println!("  → OEM: {}", manufacturer.principal());

    let mut vehicles = Vec::new();
    for model in &config.models {
        let key = model
            .key()
            .with_context(|| format!("loading key for {}", model.name))?;
        let obu = OnBoardUnit::new(model.vehicle_type, key, gateway.clone());
        manufacturer
            .register_vehicle(model.vehicle_type, obu.principal())
            .await
            .with_context(|| format!("registering {}", model.name))?;
        println!(
            "  → {} (type {}) owned by {}",
            model.name,
            model.vehicle_type,
            obu.principal()
        );
        vehicles.push(obu);
    }

    Ok(Deployment {
        gateway,
        manufacturer,
        vehicles,
    })
}

fn print_manifest(manifest: &UpdateManifest) {
    println!("Vehicle A Key: {}", manifest.key);
    println!("Vehicle A update hash: {}", manifest.checksum);
    println!("Vehicle A CID: {}", manifest.content_address);
    println!("Vehicle A has update version: {}", manifest.version);
}

async fn contract_validation(deployment: &Deployment) -> Result<()> {
    println!("\nContract Validation");

    let model_a = deployment
        .vehicles
        .iter()
        .find(|v| v.vehicle_type == VehicleType::MODEL_A)
        .context("model A is not configured")?;

    let manifest = UpdateManifest::new("Hi1", "Hi2", "Hi3", "Hi4");
    deployment
        .manufacturer
        .publish_update(VehicleType::MODEL_A, &manifest)
        .await?;
    println!("Update added to Model A");

    println!("Vehicle A has update: {}", model_a.check_for_update().await?);
    print_manifest(&model_a.fetch_update().await?);

    model_a.set_update_status(false).await?;
    println!("Update status sent to Model A");
    print_manifest(&model_a.fetch_update().await?);

    model_a.set_update_status(true).await?;
    println!("Update status sent to Model A");
    println!("Vehicle A has update: {}", model_a.check_for_update().await?);
    print_manifest(&model_a.fetch_update().await?);

    if let Some(other) = deployment
        .vehicles
        .iter()
        .find(|v| v.vehicle_type != VehicleType::MODEL_A)
    {
        let (function, params) = ContractCall::FetchUpdate {
            vehicle_type: VehicleType::MODEL_A,
        }
        .encode();
        match deployment.gateway.query(&other.principal(), function, params).await {
            Ok(_) => error!("fetch by a non-owner unexpectedly succeeded"),
            Err(e) => println!(
                "Fetch of Model A update by type {} rejected: {} (retryable: {})",
                other.vehicle_type,
                e,
                !e.rejection().is_some_and(|r| r.is_fatal())
            ),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║          OTA Secure Update Ledger                     ║");
    println!("╚═══════════════════════════════════════════════════════╝\n");

    let config = DeploymentConfig::load(std::env::args().nth(1).map(PathBuf::from))
        .context("loading deployment config")?;
    info!(
        "{} vehicle models configured, hasUpdate access {:?}",
        config.models.len(),
        config.has_update_access
    );

    let deployment = contract_deployment(&config).await?;
    contract_validation(&deployment).await?;

    let ledger = deployment.gateway.ledger();
    let report = RunReport::collect(&ledger, deployment.gateway.rejected_count()).await;
    report.print_report();

    let transactions = ledger.journal().transactions().await;
    match save_journal_csv(&transactions, &config.journal_csv) {
        Ok(_) => println!("✓ Journal saved to {}", config.journal_csv.display()),
        Err(e) => println!("✗ Error saving {}: {}", config.journal_csv.display(), e),
    }

    Ok(())
}
