use super::abi::{CallOutput, ContractCall};
use super::records::{UpdateManifest, UpdateRecord, VehicleRecord, VehicleType};
use crate::error::{LedgerError, LedgerResult};
use crate::identity::Principal;
use crate::ledger::{Journal, LedgerTransaction, TransactionType};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Who may ask whether a vehicle type has an update pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HasUpdateAccess {
    #[default]
    Public,
    OwnerOnly,
}

#[derive(Default)]
struct LedgerState {
    vehicles: HashMap<VehicleType, VehicleRecord>,
    updates: HashMap<VehicleType, UpdateRecord>,
}

impl LedgerState {
    fn owned_by(&self, caller: &Principal, vehicle_type: VehicleType) -> LedgerResult<()> {
        let vehicle = self
            .vehicles
            .get(&vehicle_type)
            .ok_or(LedgerError::UnknownVehicle(vehicle_type))?;
        if vehicle.owner != *caller {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }
}

/// OTA update ledger shared between one OEM and the registered vehicle models.
///
/// All writes take the state lock exclusively and append to the journal before
/// mutating, so each write either commits fully or is rejected with no effect.
/// Reads share the lock and never touch the journal.
pub struct UpdateLedger {
    oem: Principal,
    has_update_access: HasUpdateAccess,
    state: Arc<RwLock<LedgerState>>,
    journal: Arc<Journal>,
}

impl UpdateLedger {
    /// Creates an empty ledger. `oem` is the deploying principal and cannot be
    /// changed afterwards.
    pub fn new(oem: Principal, has_update_access: HasUpdateAccess) -> Self {
        info!("update ledger created for OEM {}", oem);
        Self {
            oem,
            has_update_access,
            state: Arc::new(RwLock::new(LedgerState::default())),
            journal: Arc::new(Journal::new()),
        }
    }

    pub fn oem(&self) -> Principal {
        self.oem
    }

    pub fn has_update_access(&self) -> HasUpdateAccess {
        self.has_update_access
    }

    pub fn journal(&self) -> Arc<Journal> {
        self.journal.clone()
    }

    fn require_oem(&self, caller: &Principal) -> LedgerResult<()> {
        if *caller != self.oem {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    pub async fn add_vehicle(
        &self,
        caller: &Principal,
        vehicle_type: VehicleType,
        owner: Principal,
    ) -> LedgerResult<()> {
        self.require_oem(caller)?;

        let mut state = self.state.write().await;
        if state.vehicles.contains_key(&vehicle_type) {
            return Err(LedgerError::DuplicateVehicle(vehicle_type));
        }

        let data = encode_payload(&(vehicle_type, owner))?;
        self.journal
            .append(TransactionType::VehicleRegistration, *caller, vehicle_type, data)
            .await;

        state.vehicles.insert(
            vehicle_type,
            VehicleRecord {
                vehicle_type,
                owner,
                registered_at: Utc::now(),
            },
        );
        info!("vehicle type {} registered to {}", vehicle_type, owner);
        Ok(())
    }

    /// Publishes `manifest` for `vehicle_type`, discarding whatever update and
    /// acknowledgement state was there before.
    pub async fn add_update(
        &self,
        caller: &Principal,
        manifest: UpdateManifest,
        vehicle_type: VehicleType,
    ) -> LedgerResult<()> {
        self.require_oem(caller)?;

        let mut state = self.state.write().await;
        if !state.vehicles.contains_key(&vehicle_type) {
            return Err(LedgerError::UnknownVehicle(vehicle_type));
        }

        let data = encode_payload(&manifest)?;
        self.journal
            .append(TransactionType::UpdatePublication, *caller, vehicle_type, data)
            .await;

        info!(
            "update {} published for vehicle type {}",
            manifest.version, vehicle_type
        );
        let previous = state
            .updates
            .insert(vehicle_type, UpdateRecord::publish(manifest));
        if let Some(previous) = previous {
            debug!(
                "replaced update {} (available: {})",
                previous.manifest.version, previous.available
            );
        }
        Ok(())
    }

    pub async fn has_update(
        &self,
        caller: &Principal,
        vehicle_type: VehicleType,
    ) -> LedgerResult<bool> {
        let state = self.state.read().await;
        match self.has_update_access {
            HasUpdateAccess::Public => {
                if !state.vehicles.contains_key(&vehicle_type) {
                    return Err(LedgerError::UnknownVehicle(vehicle_type));
                }
            }
            HasUpdateAccess::OwnerOnly => state.owned_by(caller, vehicle_type)?,
        }
        Ok(state
            .updates
            .get(&vehicle_type)
            .is_some_and(|record| record.available))
    }

    /// Returns the current update whether or not it has been acknowledged.
    pub async fn fetch_update(
        &self,
        caller: &Principal,
        vehicle_type: VehicleType,
    ) -> LedgerResult<UpdateManifest> {
        let state = self.state.read().await;
        state.owned_by(caller, vehicle_type)?;
        state
            .updates
            .get(&vehicle_type)
            .map(|record| record.manifest.clone())
            .ok_or(LedgerError::NoUpdate(vehicle_type))
    }

    /// Sets `available = !acknowledged`. Reversible: an acknowledged update can
    /// be marked available again.
    pub async fn update_update_status(
        &self,
        caller: &Principal,
        vehicle_type: VehicleType,
        acknowledged: bool,
    ) -> LedgerResult<()> {
        let mut state = self.state.write().await;
        state.owned_by(caller, vehicle_type)?;
        if !state.updates.contains_key(&vehicle_type) {
            return Err(LedgerError::NoUpdate(vehicle_type));
        }

        let data = encode_payload(&acknowledged)?;
        self.journal
            .append(TransactionType::UpdateStatusChange, *caller, vehicle_type, data)
            .await;

        if let Some(record) = state.updates.get_mut(&vehicle_type) {
            record.set_acknowledged(acknowledged);
            info!(
                "vehicle type {} update {} now available: {}",
                vehicle_type, record.manifest.version, record.available
            );
        }
        Ok(())
    }

    /// Runs a decoded call on behalf of `caller`.
    pub async fn dispatch(
        &self,
        caller: &Principal,
        call: ContractCall,
    ) -> LedgerResult<CallOutput> {
        debug!(
            "{} called {} for vehicle type {}",
            caller, call.function_name(), call.vehicle_type()
        );
        match call {
            ContractCall::AddVehicle { vehicle_type, owner } => {
                self.add_vehicle(caller, vehicle_type, owner).await?;
                Ok(CallOutput::empty())
            }
            ContractCall::AddUpdate { manifest, vehicle_type } => {
                self.add_update(caller, manifest, vehicle_type).await?;
                Ok(CallOutput::empty())
            }
            ContractCall::HasUpdate { vehicle_type } => {
                let available = self.has_update(caller, vehicle_type).await?;
                Ok(CallOutput::from_bool(available))
            }
            ContractCall::FetchUpdate { vehicle_type } => {
                let manifest = self.fetch_update(caller, vehicle_type).await?;
                Ok(CallOutput::from_manifest(manifest))
            }
            ContractCall::UpdateUpdateStatus {
                vehicle_type,
                acknowledged,
            } => {
                self.update_update_status(caller, vehicle_type, acknowledged)
                    .await?;
                Ok(CallOutput::empty())
            }
        }
    }

    pub async fn vehicle(&self, vehicle_type: VehicleType) -> Option<VehicleRecord> {
        self.state.read().await.vehicles.get(&vehicle_type).cloned()
    }

    pub async fn vehicle_count(&self) -> usize {
        self.state.read().await.vehicles.len()
    }

    /// Committed writes touching `vehicle_type`, oldest first.
    pub async fn history(&self, vehicle_type: VehicleType) -> Vec<LedgerTransaction> {
        self.journal.transactions_for(vehicle_type).await
    }
}

fn encode_payload<T: Serialize>(value: &T) -> LedgerResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| LedgerError::Journal(e.to_string()))
}
