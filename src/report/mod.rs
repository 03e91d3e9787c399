pub mod summary;

pub use summary::{RunReport, save_journal_csv};
