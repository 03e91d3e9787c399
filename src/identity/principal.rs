use crate::error::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ADDRESS_LEN: usize = 20;

/// An account address as supplied by the execution environment.
///
/// The ledger never authenticates a principal itself; it only compares the
/// address it is handed against the ones it has stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal([u8; ADDRESS_LEN]);

impl Principal {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Principal {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| IdentityError::InvalidAddress(s.to_string()))?;
        let array = <[u8; ADDRESS_LEN]>::try_from(bytes.as_slice())
            .map_err(|_| IdentityError::InvalidAddress(s.to_string()))?;
        Ok(Self(array))
    }
}

impl TryFrom<String> for Principal {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_parse() {
        let p = Principal::from_bytes([0xab; ADDRESS_LEN]);
        let text = p.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 42);
        assert_eq!(text.parse::<Principal>().unwrap(), p);
    }

    #[test]
    fn parse_accepts_missing_prefix_and_uppercase() {
        let lower: Principal = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        let bare: Principal = "00000000000000000000000000000000000000FF".parse().unwrap();
        assert_eq!(lower, bare);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!("0x1234".parse::<Principal>().is_err());
        assert!("zz".repeat(20).parse::<Principal>().is_err());
    }
}
