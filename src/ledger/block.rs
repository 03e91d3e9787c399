use super::transaction::LedgerTransaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// One journal entry. Every block after genesis carries exactly one committed
/// transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub transaction: Option<LedgerTransaction>,
    pub previous_hash: String,
    pub hash: String,
}

impl Block {
    pub fn new(index: u64, transaction: LedgerTransaction, previous_hash: String) -> Self {
        let mut block = Self {
            index,
            timestamp: Utc::now(),
            transaction: Some(transaction),
            previous_hash,
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    pub fn genesis() -> Self {
        let mut block = Self {
            index: 0,
            timestamp: Utc::now(),
            transaction: None,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.index.to_be_bytes());
        hasher.update(self.timestamp.to_rfc3339().as_bytes());
        if let Some(tx) = &self.transaction {
            hasher.update(tx.tx_id.as_bytes());
            hasher.update(tx.sequence.to_be_bytes());
            hasher.update(tx.tx_type.function_name().as_bytes());
            hasher.update(tx.caller.as_bytes());
            hasher.update([tx.vehicle_type.0]);
            hasher.update(tx.timestamp.to_rfc3339().as_bytes());
            hasher.update(&tx.data);
        }
        hasher.update(self.previous_hash.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
