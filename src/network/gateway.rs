use crate::contract::{CallOutput, FunctionParameters};
use crate::error::GatewayError;
use crate::identity::Principal;
use async_trait::async_trait;

/// Submission path into the execution environment hosting the update ledger.
///
/// `execute` carries state-changing transactions; `query` carries read-only
/// calls. The caller identity is asserted by the environment, not checked by
/// the ledger.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    async fn connect(&self) -> Result<(), GatewayError>;

    async fn execute(
        &self,
        caller: &Principal,
        function: &str,
        params: FunctionParameters,
    ) -> Result<CallOutput, GatewayError>;

    async fn query(
        &self,
        caller: &Principal,
        function: &str,
        params: FunctionParameters,
    ) -> Result<CallOutput, GatewayError>;
}
