//! Error types for the update ledger and its surroundings.

use crate::contract::VehicleType;
use thiserror::Error;

/// Rejections raised by the ledger. A rejected operation leaves no trace in
/// ledger state or in the journal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("vehicle type {0} is already registered")]
    DuplicateVehicle(VehicleType),

    #[error("vehicle type {0} is not registered")]
    UnknownVehicle(VehicleType),

    #[error("no update published for vehicle type {0}")]
    NoUpdate(VehicleType),

    #[error("journal error: {0}")]
    Journal(String),
}

impl LedgerError {
    /// Whether retrying the same call from the same principal can never succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::DuplicateVehicle(_))
    }
}

/// Calling-convention errors: the call could not be mapped onto an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("expected {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("value {index} is {actual}, expected {expected}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("no return value at index {0}")]
    MissingValue(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway is not connected")]
    NotConnected,

    #[error("{0} mutates state and cannot be submitted as a query")]
    QueryNotReadOnly(String),

    #[error("malformed call: {0}")]
    Abi(#[from] AbiError),

    #[error("rejected by ledger: {0}")]
    Rejected(#[from] LedgerError),
}

impl GatewayError {
    /// The ledger rejection behind this error, if the call reached the ledger.
    pub fn rejection(&self) -> Option<&LedgerError> {
        match self {
            Self::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("vehicle type {0} configured twice")]
    DuplicateModel(VehicleType),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
