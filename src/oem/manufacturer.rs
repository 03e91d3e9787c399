use crate::contract::{ContractCall, UpdateManifest, VehicleType};
use crate::error::GatewayError;
use crate::identity::{AccountKey, Principal};
use crate::network::ContractGateway;
use log::info;
use std::sync::Arc;

/// The OEM's client: registers vehicle models and publishes updates for them.
pub struct Manufacturer {
    key: AccountKey,
    gateway: Arc<dyn ContractGateway>,
}

impl Manufacturer {
    pub fn new(key: AccountKey, gateway: Arc<dyn ContractGateway>) -> Self {
        Self { key, gateway }
    }

    pub fn principal(&self) -> Principal {
        self.key.principal()
    }

    pub async fn register_vehicle(
        &self,
        vehicle_type: VehicleType,
        owner: Principal,
    ) -> Result<(), GatewayError> {
        let (function, params) = ContractCall::AddVehicle { vehicle_type, owner }.encode();
        self.gateway
            .execute(&self.principal(), function, params)
            .await?;
        info!("OEM registered vehicle type {} -> {}", vehicle_type, owner);
        Ok(())
    }

    pub async fn publish_update(
        &self,
        vehicle_type: VehicleType,
        manifest: &UpdateManifest,
    ) -> Result<(), GatewayError> {
        let (function, params) = ContractCall::AddUpdate {
            manifest: manifest.clone(),
            vehicle_type,
        }
        .encode();
        self.gateway
            .execute(&self.principal(), function, params)
            .await?;
        info!(
            "OEM published {} ({}) for vehicle type {}",
            manifest.version, manifest.content_address, vehicle_type
        );
        Ok(())
    }
}
