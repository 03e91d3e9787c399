pub mod block;
pub mod chain;
pub mod transaction;

pub use block::Block;
pub use chain::Journal;
pub use transaction::{LedgerTransaction, TransactionType};
