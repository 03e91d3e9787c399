use crate::contract::UpdateLedger;
use crate::ledger::{LedgerTransaction, TransactionType};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub oem: String,
    pub vehicles_registered: usize,
    pub updates_published: usize,
    pub status_changes: usize,
    pub rejected_calls: u64,
    pub journal_blocks: usize,
    pub journal_size_bytes: usize,
    pub journal_intact: bool,
}

impl RunReport {
    pub async fn collect(ledger: &UpdateLedger, rejected_calls: u64) -> Self {
        let journal = ledger.journal();
        let transactions = journal.transactions().await;
        let count = |kind: TransactionType| {
            transactions.iter().filter(|tx| tx.tx_type == kind).count()
        };

        Self {
            timestamp: Utc::now().to_rfc3339(),
            oem: ledger.oem().to_string(),
            vehicles_registered: ledger.vehicle_count().await,
            updates_published: count(TransactionType::UpdatePublication),
            status_changes: count(TransactionType::UpdateStatusChange),
            rejected_calls,
            journal_blocks: journal.len().await,
            journal_size_bytes: journal.size_bytes().await,
            journal_intact: journal.verify_integrity().await,
        }
    }

    pub fn print_report(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║           Secure Update Ledger Run Report             ║");
        println!("╠═══════════════════════════════════════════════════════╣");
        println!("║ Timestamp: {:<42} ║", self.timestamp);
        println!("║ OEM: {:<48} ║", self.oem);
        println!("║                                                       ║");
        println!("║ Vehicles registered:   {:<30} ║", self.vehicles_registered);
        println!("║ Updates published:     {:<30} ║", self.updates_published);
        println!("║ Status changes:        {:<30} ║", self.status_changes);
        println!("║ Rejected calls:        {:<30} ║", self.rejected_calls);
        println!("║                                                       ║");
        println!("║ Journal blocks:        {:<30} ║", self.journal_blocks);
        println!("║ Journal size:          {:<24} bytes ║", self.journal_size_bytes);
        println!(
            "║ Journal integrity:     {:<30} ║",
            if self.journal_intact { "OK" } else { "BROKEN" }
        );
        println!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

/// Writes one row per committed transaction.
pub fn save_journal_csv<P: AsRef<Path>>(
    transactions: &[LedgerTransaction],
    path: P,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "sequence",
        "tx_id",
        "function",
        "vehicle_type",
        "caller",
        "timestamp",
        "data",
    ])?;

    for tx in transactions {
        wtr.write_record([
            tx.sequence.to_string(),
            tx.tx_id.clone(),
            tx.tx_type.function_name().to_string(),
            tx.vehicle_type.to_string(),
            tx.caller.to_string(),
            tx.timestamp.to_rfc3339(),
            String::from_utf8_lossy(&tx.data).into_owned(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{HasUpdateAccess, UpdateManifest, VehicleType};
    use crate::identity::Principal;

    #[tokio::test]
    async fn report_counts_committed_writes() {
        let oem = Principal::from_bytes([1; 20]);
        let owner = Principal::from_bytes([2; 20]);
        let ledger = UpdateLedger::new(oem, HasUpdateAccess::Public);
        ledger.add_vehicle(&oem, VehicleType::MODEL_A, owner).await.unwrap();
        ledger
            .add_update(&oem, UpdateManifest::new("k", "c", "cid", "v1"), VehicleType::MODEL_A)
            .await
            .unwrap();
        ledger
            .update_update_status(&owner, VehicleType::MODEL_A, true)
            .await
            .unwrap();

        let report = RunReport::collect(&ledger, 2).await;
        assert_eq!(report.vehicles_registered, 1);
        assert_eq!(report.updates_published, 1);
        assert_eq!(report.status_changes, 1);
        assert_eq!(report.rejected_calls, 2);
        assert_eq!(report.journal_blocks, 4);
        assert!(report.journal_intact);
    }

    #[tokio::test]
    async fn journal_csv_has_header_and_rows() {
        let oem = Principal::from_bytes([1; 20]);
        let ledger = UpdateLedger::new(oem, HasUpdateAccess::Public);
        ledger
            .add_vehicle(&oem, VehicleType::MODEL_B, Principal::from_bytes([3; 20]))
            .await
            .unwrap();

        let path = std::env::temp_dir().join(format!("journal-{}.csv", std::process::id()));
        save_journal_csv(&ledger.journal().transactions().await, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("sequence,tx_id,function"));
        assert!(lines[1].contains("addVehicle"));
    }
}
