pub mod obu;

pub use obu::{InstallError, OnBoardUnit};
