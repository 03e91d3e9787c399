pub mod account;
pub mod principal;

pub use account::AccountKey;
pub use principal::Principal;
