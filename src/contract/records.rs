use crate::identity::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Vehicle model identifier, carried on the wire as a `uint8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleType(pub u8);

impl VehicleType {
    pub const MODEL_A: Self = Self(1);
    pub const MODEL_B: Self = Self(2);
    pub const MODEL_C: Self = Self(3);
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for VehicleType {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleRecord {
    pub vehicle_type: VehicleType,
    pub owner: Principal,
    pub registered_at: DateTime<Utc>,
}

/// The four fields an owner gets back from `fetchUpdate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateManifest {
    /// Decryption/access key for the payload.
    pub key: String,
    /// Integrity hash of the payload.
    pub checksum: String,
    /// Off-ledger locator of the payload, e.g. a CID.
    pub content_address: String,
    pub version: String,
}

impl UpdateManifest {
    pub fn new(
        key: impl Into<String>,
        checksum: impl Into<String>,
        content_address: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            checksum: checksum.into(),
            content_address: content_address.into(),
            version: version.into(),
        }
    }

    /// Builds a manifest whose checksum is the hex SHA-256 of `payload`.
    pub fn for_payload(
        key: impl Into<String>,
        content_address: impl Into<String>,
        version: impl Into<String>,
        payload: &[u8],
    ) -> Self {
        Self::new(key, payload_checksum(payload), content_address, version)
    }

    pub fn matches_payload(&self, payload: &[u8]) -> bool {
        self.checksum.eq_ignore_ascii_case(&payload_checksum(payload))
    }
}

pub fn payload_checksum(payload: &[u8]) -> String {
    format!("{:x}", Sha256::digest(payload))
}

/// Current update for one vehicle type. Only the latest published update is
/// kept; publishing again replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateRecord {
    pub manifest: UpdateManifest,
    pub available: bool,
    pub published_at: DateTime<Utc>,
}

impl UpdateRecord {
    pub fn publish(manifest: UpdateManifest) -> Self {
        Self {
            manifest,
            available: true,
            published_at: Utc::now(),
        }
    }

    pub fn set_acknowledged(&mut self, acknowledged: bool) {
        self.available = !acknowledged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_record_starts_available() {
        let record = UpdateRecord::publish(UpdateManifest::new("k", "c", "cid", "v1"));
        assert!(record.available);
    }

    #[test]
    fn acknowledgement_toggles_availability() {
        let mut record = UpdateRecord::publish(UpdateManifest::new("k", "c", "cid", "v1"));
        record.set_acknowledged(true);
        assert!(!record.available);
        record.set_acknowledged(false);
        assert!(record.available);
        assert_eq!(record.manifest.version, "v1");
    }

    #[test]
    fn payload_checksum_is_verified() {
        let manifest = UpdateManifest::for_payload("k", "cid", "v2", b"firmware image");
        assert_eq!(manifest.checksum.len(), 64);
        assert!(manifest.matches_payload(b"firmware image"));
        assert!(!manifest.matches_payload(b"tampered image"));
    }
}
