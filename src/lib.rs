//! Over-the-air update ledger shared between a vehicle manufacturer (OEM) and
//! the vehicle models it ships updates to.
//!
//! The OEM registers each vehicle model with its owning principal and
//! publishes update manifests; each model's principal queries, fetches and
//! acknowledges the update published for it. Every committed write lands in a
//! hash-linked journal.

pub mod config;
pub mod contract;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod network;
pub mod oem;
pub mod report;
pub mod vehicle;

pub use contract::{HasUpdateAccess, UpdateLedger, UpdateManifest, VehicleType};
pub use error::{GatewayError, LedgerError};
pub use identity::{AccountKey, Principal};
