pub mod abi;
pub mod records;
pub mod secure_update;

pub use abi::{CallOutput, ContractCall, FunctionParameters, ParamValue};
pub use records::{UpdateManifest, UpdateRecord, VehicleRecord, VehicleType};
pub use secure_update::{HasUpdateAccess, UpdateLedger};
