use crate::contract::VehicleType;
use crate::identity::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed write, as recorded in the journal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerTransaction {
    pub tx_id: String,
    pub sequence: u64,
    pub tx_type: TransactionType,
    pub caller: Principal,
    pub vehicle_type: VehicleType,
    pub timestamp: DateTime<Utc>,
    /// JSON encoding of the call arguments.
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionType {
    VehicleRegistration,
    UpdatePublication,
    UpdateStatusChange,
}

impl TransactionType {
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::VehicleRegistration => "addVehicle",
            Self::UpdatePublication => "addUpdate",
            Self::UpdateStatusChange => "updateUpdateStatus",
        }
    }
}

impl LedgerTransaction {
    pub fn new(
        sequence: u64,
        tx_type: TransactionType,
        caller: Principal,
        vehicle_type: VehicleType,
        data: Vec<u8>,
    ) -> Self {
        let timestamp = Utc::now();
        Self {
            tx_id: format!(
                "TX-{}-{}-{}",
                sequence,
                tx_type.function_name(),
                timestamp.timestamp_millis()
            ),
            sequence,
            tx_type,
            caller,
            vehicle_type,
            timestamp,
            data,
        }
    }
}
