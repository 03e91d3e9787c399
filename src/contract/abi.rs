//! Positional calling convention for the update ledger.
//!
//! A call is a function name plus an ordered list of typed arguments; a result
//! is an ordered list of typed values. This mirrors how the ledger is driven
//! from outside, where only `uint8`, `address`, `string` and `bool` cross the
//! boundary.

use super::records::{UpdateManifest, VehicleType};
use crate::error::AbiError;
use crate::identity::Principal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    Uint8(u8),
    Address(Principal),
    String(String),
    Bool(bool),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Uint8(_) => "uint8",
            Self::Address(_) => "address",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionParameters {
    values: Vec<ParamValue>,
}

impl FunctionParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_uint8(mut self, value: u8) -> Self {
        self.values.push(ParamValue::Uint8(value));
        self
    }

    pub fn add_address(mut self, value: Principal) -> Self {
        self.values.push(ParamValue::Address(value));
        self
    }

    pub fn add_string(mut self, value: impl Into<String>) -> Self {
        self.values.push(ParamValue::String(value.into()));
        self
    }

    pub fn add_bool(mut self, value: bool) -> Self {
        self.values.push(ParamValue::Bool(value));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn expect_len(&self, expected: usize) -> Result<(), AbiError> {
        if self.values.len() != expected {
            return Err(AbiError::ArityMismatch {
                expected,
                actual: self.values.len(),
            });
        }
        Ok(())
    }

    fn mismatch(&self, index: usize, expected: &'static str) -> AbiError {
        AbiError::TypeMismatch {
            index,
            expected,
            actual: self.values.get(index).map_or("nothing", ParamValue::type_name),
        }
    }

    fn uint8(&self, index: usize) -> Result<u8, AbiError> {
        match self.values.get(index) {
            Some(ParamValue::Uint8(v)) => Ok(*v),
            _ => Err(self.mismatch(index, "uint8")),
        }
    }

    fn address(&self, index: usize) -> Result<Principal, AbiError> {
        match self.values.get(index) {
            Some(ParamValue::Address(v)) => Ok(*v),
            _ => Err(self.mismatch(index, "address")),
        }
    }

    fn string(&self, index: usize) -> Result<String, AbiError> {
        match self.values.get(index) {
            Some(ParamValue::String(v)) => Ok(v.clone()),
            _ => Err(self.mismatch(index, "string")),
        }
    }

    fn bool(&self, index: usize) -> Result<bool, AbiError> {
        match self.values.get(index) {
            Some(ParamValue::Bool(v)) => Ok(*v),
            _ => Err(self.mismatch(index, "bool")),
        }
    }
}

/// A decoded call against the update ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    AddVehicle {
        vehicle_type: VehicleType,
        owner: Principal,
    },
    AddUpdate {
        manifest: UpdateManifest,
        vehicle_type: VehicleType,
    },
    HasUpdate {
        vehicle_type: VehicleType,
    },
    FetchUpdate {
        vehicle_type: VehicleType,
    },
    UpdateUpdateStatus {
        vehicle_type: VehicleType,
        acknowledged: bool,
    },
}

impl ContractCall {
    pub fn decode(function: &str, params: &FunctionParameters) -> Result<Self, AbiError> {
        match function {
            "addVehicle" => {
                params.expect_len(2)?;
                Ok(Self::AddVehicle {
                    vehicle_type: VehicleType(params.uint8(0)?),
                    owner: params.address(1)?,
                })
            }
            "addUpdate" => {
                params.expect_len(5)?;
                Ok(Self::AddUpdate {
                    manifest: UpdateManifest::new(
                        params.string(0)?,
                        params.string(1)?,
                        params.string(2)?,
                        params.string(3)?,
                    ),
                    vehicle_type: VehicleType(params.uint8(4)?),
                })
            }
            "hasUpdate" => {
                params.expect_len(1)?;
                Ok(Self::HasUpdate {
                    vehicle_type: VehicleType(params.uint8(0)?),
                })
            }
            "fetchUpdate" => {
                params.expect_len(1)?;
                Ok(Self::FetchUpdate {
                    vehicle_type: VehicleType(params.uint8(0)?),
                })
            }
            "updateUpdateStatus" => {
                params.expect_len(2)?;
                Ok(Self::UpdateUpdateStatus {
                    vehicle_type: VehicleType(params.uint8(0)?),
                    acknowledged: params.bool(1)?,
                })
            }
            other => Err(AbiError::UnknownFunction(other.to_string())),
        }
    }

    pub fn encode(&self) -> (&'static str, FunctionParameters) {
        let params = FunctionParameters::new();
        let params = match self {
            Self::AddVehicle { vehicle_type, owner } => {
                params.add_uint8(vehicle_type.0).add_address(*owner)
            }
            Self::AddUpdate { manifest, vehicle_type } => params
                .add_string(manifest.key.clone())
                .add_string(manifest.checksum.clone())
                .add_string(manifest.content_address.clone())
                .add_string(manifest.version.clone())
                .add_uint8(vehicle_type.0),
            Self::HasUpdate { vehicle_type } | Self::FetchUpdate { vehicle_type } => {
                params.add_uint8(vehicle_type.0)
            }
            Self::UpdateUpdateStatus {
                vehicle_type,
                acknowledged,
            } => params.add_uint8(vehicle_type.0).add_bool(*acknowledged),
        };
        (self.function_name(), params)
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Self::AddVehicle { .. } => "addVehicle",
            Self::AddUpdate { .. } => "addUpdate",
            Self::HasUpdate { .. } => "hasUpdate",
            Self::FetchUpdate { .. } => "fetchUpdate",
            Self::UpdateUpdateStatus { .. } => "updateUpdateStatus",
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::HasUpdate { .. } | Self::FetchUpdate { .. })
    }

    pub fn vehicle_type(&self) -> VehicleType {
        match self {
            Self::AddVehicle { vehicle_type, .. }
            | Self::AddUpdate { vehicle_type, .. }
            | Self::HasUpdate { vehicle_type }
            | Self::FetchUpdate { vehicle_type }
            | Self::UpdateUpdateStatus { vehicle_type, .. } => *vehicle_type,
        }
    }
}

/// Ordered return values of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOutput {
    values: Vec<ParamValue>,
}

impl CallOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bool(value: bool) -> Self {
        Self {
            values: vec![ParamValue::Bool(value)],
        }
    }

    pub fn from_manifest(manifest: UpdateManifest) -> Self {
        Self {
            values: vec![
                ParamValue::String(manifest.key),
                ParamValue::String(manifest.checksum),
                ParamValue::String(manifest.content_address),
                ParamValue::String(manifest.version),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_bool(&self, index: usize) -> Result<bool, AbiError> {
        match self.values.get(index) {
            Some(ParamValue::Bool(v)) => Ok(*v),
            Some(other) => Err(AbiError::TypeMismatch {
                index,
                expected: "bool",
                actual: other.type_name(),
            }),
            None => Err(AbiError::MissingValue(index)),
        }
    }

    pub fn get_string(&self, index: usize) -> Result<&str, AbiError> {
        match self.values.get(index) {
            Some(ParamValue::String(v)) => Ok(v),
            Some(other) => Err(AbiError::TypeMismatch {
                index,
                expected: "string",
                actual: other.type_name(),
            }),
            None => Err(AbiError::MissingValue(index)),
        }
    }

    /// Reads a `fetchUpdate` result back into a manifest.
    pub fn to_manifest(&self) -> Result<UpdateManifest, AbiError> {
        Ok(UpdateManifest::new(
            self.get_string(0)?,
            self.get_string(1)?,
            self.get_string(2)?,
            self.get_string(3)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Principal {
        Principal::from_bytes([1; 20])
    }

    #[test]
    fn decodes_add_update_in_positional_order() {
        let params = FunctionParameters::new()
            .add_string("Hi1")
            .add_string("Hi2")
            .add_string("Hi3")
            .add_string("Hi4")
            .add_uint8(1);

        let call = ContractCall::decode("addUpdate", &params).unwrap();
        assert_eq!(
            call,
            ContractCall::AddUpdate {
                manifest: UpdateManifest::new("Hi1", "Hi2", "Hi3", "Hi4"),
                vehicle_type: VehicleType::MODEL_A,
            }
        );
        assert!(!call.is_read_only());
    }

    #[test]
    fn encode_matches_decode() {
        let call = ContractCall::AddVehicle {
            vehicle_type: VehicleType::MODEL_C,
            owner: owner(),
        };
        let (name, params) = call.encode();
        assert_eq!(name, "addVehicle");
        assert_eq!(ContractCall::decode(name, &params).unwrap(), call);
    }

    #[test]
    fn classifies_calls() {
        let status = ContractCall::UpdateUpdateStatus {
            vehicle_type: VehicleType::MODEL_B,
            acknowledged: true,
        };
        assert_eq!(status.vehicle_type(), VehicleType::MODEL_B);
        assert!(!status.is_read_only());

        let fetch = ContractCall::FetchUpdate {
            vehicle_type: VehicleType::MODEL_C,
        };
        assert_eq!(fetch.vehicle_type(), VehicleType::MODEL_C);
        assert!(fetch.is_read_only());
    }

    #[test]
    fn rejects_unknown_function() {
        let err = ContractCall::decode("removeVehicle", &FunctionParameters::new()).unwrap_err();
        assert_eq!(err, AbiError::UnknownFunction("removeVehicle".into()));
    }

    #[test]
    fn rejects_wrong_arity_and_types() {
        let err = ContractCall::decode("hasUpdate", &FunctionParameters::new()).unwrap_err();
        assert_eq!(err, AbiError::ArityMismatch { expected: 1, actual: 0 });

        let params = FunctionParameters::new().add_uint8(1).add_string("true");
        let err = ContractCall::decode("updateUpdateStatus", &params).unwrap_err();
        assert_eq!(
            err,
            AbiError::TypeMismatch {
                index: 1,
                expected: "bool",
                actual: "string",
            }
        );
    }

    #[test]
    fn output_accessors_check_types() {
        let out = CallOutput::from_manifest(UpdateManifest::new("k", "c", "cid", "v1"));
        assert_eq!(out.len(), 4);
        assert_eq!(out.get_string(2).unwrap(), "cid");
        assert_eq!(
            out.get_bool(0).unwrap_err(),
            AbiError::TypeMismatch {
                index: 0,
                expected: "bool",
                actual: "string",
            }
        );
        assert_eq!(out.get_string(4).unwrap_err(), AbiError::MissingValue(4));
        assert_eq!(out.to_manifest().unwrap().version, "v1");
        assert!(CallOutput::from_bool(true).get_bool(0).unwrap());
    }
}
