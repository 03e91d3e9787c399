use crate::contract::{CallOutput, ContractCall, FunctionParameters, UpdateLedger};
use crate::error::GatewayError;
use crate::identity::Principal;
use crate::network::gateway::ContractGateway;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// In-process execution environment: calls are decoded and applied directly
/// to a shared `UpdateLedger`.
pub struct LocalGateway {
    ledger: Arc<UpdateLedger>,
    connected: AtomicBool,
    submitted: AtomicU64,
    rejected: AtomicU64,
}

impl LocalGateway {
    pub fn new(ledger: Arc<UpdateLedger>) -> Self {
        Self {
            ledger,
            connected: AtomicBool::new(false),
            submitted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    pub fn ledger(&self) -> Arc<UpdateLedger> {
        self.ledger.clone()
    }

    pub fn submitted_count(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    async fn submit(
        &self,
        caller: &Principal,
        function: &str,
        params: FunctionParameters,
        read_only: bool,
    ) -> Result<CallOutput, GatewayError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(GatewayError::NotConnected);
        }
        self.submitted.fetch_add(1, Ordering::Relaxed);

        let call = ContractCall::decode(function, &params).inspect_err(|_| {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        })?;
        if read_only && !call.is_read_only() {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(GatewayError::QueryNotReadOnly(function.to_string()));
        }

        match self.ledger.dispatch(caller, call).await {
            Ok(output) => Ok(output),
            Err(e) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "{} from {} rejected: {} (fatal: {})",
                    function, caller, e, e.is_fatal()
                );
                Err(GatewayError::Rejected(e))
            }
        }
    }
}

#[async_trait]
impl ContractGateway for LocalGateway {
    async fn connect(&self) -> Result<(), GatewayError> {
        self.connected.store(true, Ordering::Release);
        info!(
            "connected to local ledger (OEM {}, hasUpdate access {:?})",
            self.ledger.oem(),
            self.ledger.has_update_access()
        );
        Ok(())
    }

    async fn execute(
        &self,
        caller: &Principal,
        function: &str,
        params: FunctionParameters,
    ) -> Result<CallOutput, GatewayError> {
        debug!("execute {} as {}", function, caller);
        self.submit(caller, function, params, false).await
    }

    async fn query(
        &self,
        caller: &Principal,
        function: &str,
        params: FunctionParameters,
    ) -> Result<CallOutput, GatewayError> {
        debug!("query {} as {}", function, caller);
        self.submit(caller, function, params, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{HasUpdateAccess, VehicleType};
    use crate::error::LedgerError;
    use tokio_test::{assert_err, assert_ok};

    fn oem() -> Principal {
        Principal::from_bytes([0xee; 20])
    }

    fn gateway() -> LocalGateway {
        LocalGateway::new(Arc::new(UpdateLedger::new(oem(), HasUpdateAccess::Public)))
    }

    #[tokio::test]
    async fn calls_before_connect_fail() {
        let gw = gateway();
        let err = assert_err!(
            gw.query(&oem(), "hasUpdate", FunctionParameters::new().add_uint8(1))
                .await
        );
        assert_eq!(err, GatewayError::NotConnected);
    }

    #[tokio::test]
    async fn writes_are_refused_as_queries() {
        let gw = gateway();
        assert_ok!(gw.connect().await);
        let params = FunctionParameters::new().add_uint8(1).add_address(oem());
        let err = assert_err!(gw.query(&oem(), "addVehicle", params).await);
        assert_eq!(err, GatewayError::QueryNotReadOnly("addVehicle".into()));
        assert_eq!(gw.ledger().vehicle_count().await, 0);
    }

    #[tokio::test]
    async fn ledger_rejections_keep_their_kind() {
        let gw = gateway();
        assert_ok!(gw.connect().await);
        let err = assert_err!(
            gw.query(&oem(), "fetchUpdate", FunctionParameters::new().add_uint8(5))
                .await
        );
        assert_eq!(err.rejection(), Some(&LedgerError::UnknownVehicle(VehicleType(5))));
        assert_eq!(gw.rejected_count(), 1);
        assert_eq!(gw.submitted_count(), 1);
    }

    #[tokio::test]
    async fn malformed_calls_are_reported() {
        let gw = gateway();
        assert_ok!(gw.connect().await);
        let err = assert_err!(gw.execute(&oem(), "addVehicle", FunctionParameters::new()).await);
        assert!(matches!(err, GatewayError::Abi(_)));
        assert_eq!(gw.submitted_count(), 1);
        assert_eq!(gw.rejected_count(), 1);
    }
}
