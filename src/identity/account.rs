use super::principal::{ADDRESS_LEN, Principal};
use crate::error::IdentityError;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Account key material held by an OEM or vehicle client.
pub struct AccountKey {
    signing_key: SigningKey,
}

impl AccountKey {
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        Self {
            signing_key: SigningKey::generate(&mut csprng),
        }
    }

    /// Loads a key from a hex-encoded 32-byte ed25519 seed.
    pub fn from_secret_hex(secret: &str) -> Result<Self, IdentityError> {
        let bytes = hex::decode(secret.trim().trim_start_matches("0x"))
            .map_err(|e| IdentityError::InvalidSecretKey(e.to_string()))?;
        let seed = <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
            IdentityError::InvalidSecretKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    pub fn public_key(&self) -> Vec<u8> {
        self.signing_key.verifying_key().to_bytes().to_vec()
    }

    /// Address derived from the public key: trailing 20 bytes of its SHA-256.
    pub fn principal(&self) -> Principal {
        let digest = Sha256::digest(self.signing_key.verifying_key().as_bytes());
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&digest[digest.len() - ADDRESS_LEN..]);
        Principal::from_bytes(address)
    }
}

impl std::fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountKey")
            .field("principal", &self.principal())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

    #[test]
    fn same_seed_gives_same_principal() {
        let a = AccountKey::from_secret_hex(SEED).unwrap();
        let b = AccountKey::from_secret_hex(&format!("0x{SEED}")).unwrap();
        assert_eq!(a.principal(), b.principal());
        assert_eq!(a.public_key().len(), 32);
    }

    #[test]
    fn generated_keys_are_distinct() {
        assert_ne!(AccountKey::generate().principal(), AccountKey::generate().principal());
    }

    #[test]
    fn short_seed_is_rejected() {
        let err = AccountKey::from_secret_hex("abcd").unwrap_err();
        assert!(matches!(err, IdentityError::InvalidSecretKey(_)));
    }
}
