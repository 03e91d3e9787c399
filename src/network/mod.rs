pub mod gateway;
pub mod local;

pub use gateway::ContractGateway;
pub use local::LocalGateway;
