use crate::contract::{ContractCall, UpdateManifest, VehicleType};
use crate::error::GatewayError;
use crate::identity::{AccountKey, Principal};
use crate::network::ContractGateway;
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("malformed fetchUpdate result: {0}")]
    Output(#[from] crate::error::AbiError),

    #[error("payload does not match checksum for version {version}")]
    ChecksumMismatch { version: String },
}

/// On-board unit of one vehicle model, acting as that model's owning principal.
pub struct OnBoardUnit {
    pub vehicle_type: VehicleType,
    key: AccountKey,
    gateway: Arc<dyn ContractGateway>,
    installed_version: Option<String>,
}

impl OnBoardUnit {
    pub fn new(
        vehicle_type: VehicleType,
        key: AccountKey,
        gateway: Arc<dyn ContractGateway>,
    ) -> Self {
        Self {
            vehicle_type,
            key,
            gateway,
            installed_version: None,
        }
    }

    pub fn principal(&self) -> Principal {
        self.key.principal()
    }

    pub fn installed_version(&self) -> Option<&str> {
        self.installed_version.as_deref()
    }

    pub async fn check_for_update(&self) -> Result<bool, GatewayError> {
        let (function, params) = ContractCall::HasUpdate {
            vehicle_type: self.vehicle_type,
        }
        .encode();
        let output = self.gateway.query(&self.principal(), function, params).await?;
        Ok(output.get_bool(0)?)
    }

    pub async fn fetch_update(&self) -> Result<UpdateManifest, InstallError> {
        let (function, params) = ContractCall::FetchUpdate {
            vehicle_type: self.vehicle_type,
        }
        .encode();
        let output = self.gateway.query(&self.principal(), function, params).await?;
        Ok(output.to_manifest()?)
    }

    pub async fn set_update_status(&self, acknowledged: bool) -> Result<(), GatewayError> {
        let (function, params) = ContractCall::UpdateUpdateStatus {
            vehicle_type: self.vehicle_type,
            acknowledged,
        }
        .encode();
        self.gateway
            .execute(&self.principal(), function, params)
            .await?;
        Ok(())
    }

    pub fn verify_payload(&self, manifest: &UpdateManifest, payload: &[u8]) -> bool {
        manifest.matches_payload(payload)
    }

    /// Fetches the current update, checks `payload` against its checksum and
    /// acknowledges it. Nothing is acknowledged if the checksum does not match.
    pub async fn install(&mut self, payload: &[u8]) -> Result<UpdateManifest, InstallError> {
        let manifest = self.fetch_update().await?;
        if !self.verify_payload(&manifest, payload) {
            warn!(
                "vehicle type {} rejected payload for {}",
                self.vehicle_type, manifest.version
            );
            return Err(InstallError::ChecksumMismatch {
                version: manifest.version,
            });
        }

        self.set_update_status(true).await?;
        info!(
            "vehicle type {} installed {} from {}",
            self.vehicle_type, manifest.version, manifest.content_address
        );
        self.installed_version = Some(manifest.version.clone());
        Ok(manifest)
    }
}
