use super::block::{Block, GENESIS_PREVIOUS_HASH};
use super::transaction::{LedgerTransaction, TransactionType};
use crate::contract::VehicleType;
use crate::identity::Principal;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Append-only, hash-linked record of every committed ledger write.
pub struct Journal {
    chain: Arc<RwLock<Vec<Block>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self {
            chain: Arc::new(RwLock::new(vec![Block::genesis()])),
        }
    }

    /// Seals `data` as the next transaction. Callers serialize commits, so the
    /// sequence assigned here is the commit order.
    pub async fn append(
        &self,
        tx_type: TransactionType,
        caller: Principal,
        vehicle_type: VehicleType,
        data: Vec<u8>,
    ) -> LedgerTransaction {
        let mut chain = self.chain.write().await;
        let (index, previous_hash) = match chain.last() {
            Some(last) => (last.index + 1, last.hash.clone()),
            None => (0, GENESIS_PREVIOUS_HASH.to_string()),
        };

        let tx = LedgerTransaction::new(index, tx_type, caller, vehicle_type, data);
        let block = Block::new(index, tx.clone(), previous_hash);
        debug!("sealed block {} ({})", block.index, tx.tx_id);
        chain.push(block);
        tx
    }

    pub async fn verify_integrity(&self) -> bool {
        let chain = self.chain.read().await;
        for (i, block) in chain.iter().enumerate() {
            if block.hash != block.calculate_hash() {
                warn!("block {} hash mismatch", block.index);
                return false;
            }
            let expected_previous = match i {
                0 => GENESIS_PREVIOUS_HASH,
                _ => chain[i - 1].hash.as_str(),
            };
            if block.previous_hash != expected_previous || block.index != i as u64 {
                warn!("block {} is not linked to its predecessor", block.index);
                return false;
            }
        }
        true
    }

    pub async fn transactions(&self) -> Vec<LedgerTransaction> {
        self.chain
            .read()
            .await
            .iter()
            .filter_map(|b| b.transaction.clone())
            .collect()
    }

    pub async fn transactions_for(&self, vehicle_type: VehicleType) -> Vec<LedgerTransaction> {
        self.chain
            .read()
            .await
            .iter()
            .filter_map(|b| b.transaction.as_ref())
            .filter(|tx| tx.vehicle_type == vehicle_type)
            .cloned()
            .collect()
    }

    pub async fn size_bytes(&self) -> usize {
        let chain = self.chain.read().await;
        bincode::serialize(&*chain).map(|b| b.len()).unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.chain.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn tamper(&self, index: usize, data: Vec<u8>) {
        let mut chain = self.chain.write().await;
        if let Some(tx) = chain.get_mut(index).and_then(|b| b.transaction.as_mut()) {
            tx.data = data;
        }
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}
