//! Deployment configuration.
//!
//! Loaded from a TOML file when one is given, otherwise from the process
//! environment. Secrets are hex-encoded 32-byte ed25519 seeds; any account
//! without one gets a freshly generated key.

use crate::contract::{HasUpdateAccess, VehicleType};
use crate::error::ConfigError;
use crate::identity::AccountKey;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "SECURE_UPDATE_CONFIG";
pub const OEM_SECRET_ENV: &str = "OEM_SECRET_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub oem_secret_key: Option<String>,
    #[serde(default)]
    pub has_update_access: HasUpdateAccess,
    #[serde(default = "default_journal_csv")]
    pub journal_csv: PathBuf,
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub vehicle_type: VehicleType,
    pub name: String,
    #[serde(default)]
    pub secret_key: Option<String>,
}

fn default_journal_csv() -> PathBuf {
    PathBuf::from("update_journal.csv")
}

fn default_models() -> Vec<ModelConfig> {
    [
        (VehicleType::MODEL_A, "MODEL_A"),
        (VehicleType::MODEL_B, "MODEL_B"),
        (VehicleType::MODEL_C, "MODEL_C"),
    ]
    .into_iter()
    .map(|(vehicle_type, name)| ModelConfig {
        vehicle_type,
        name: name.to_string(),
        secret_key: None,
    })
    .collect()
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            oem_secret_key: None,
            has_update_access: HasUpdateAccess::default(),
            journal_csv: default_journal_csv(),
            models: default_models(),
        }
    }
}

impl DeploymentConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `OEM_SECRET_KEY` and `<MODEL NAME>_SECRET_KEY` for the default models.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.oem_secret_key = std::env::var(OEM_SECRET_ENV).ok();
        for model in &mut config.models {
            model.secret_key = std::env::var(format!("{}_SECRET_KEY", model.name)).ok();
        }
        config
    }

    /// Uses the file named by `explicit` or `SECURE_UPDATE_CONFIG`, falling back
    /// to the environment.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        match explicit.or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from)) {
            Some(path) => {
                debug!("loading config from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::from_env()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(model.vehicle_type) {
                return Err(ConfigError::DuplicateModel(model.vehicle_type));
            }
        }
        Ok(())
    }

    pub fn oem_key(&self) -> Result<AccountKey, ConfigError> {
        load_key(self.oem_secret_key.as_deref())
    }
}

impl ModelConfig {
    pub fn key(&self) -> Result<AccountKey, ConfigError> {
        load_key(self.secret_key.as_deref())
    }
}

fn load_key(secret: Option<&str>) -> Result<AccountKey, ConfigError> {
    match secret {
        Some(secret) => Ok(AccountKey::from_secret_hex(secret)?),
        None => Ok(AccountKey::generate()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = DeploymentConfig::from_toml("").unwrap();
        assert_eq!(config.models.len(), 3);
        assert_eq!(config.has_update_access, HasUpdateAccess::Public);
        assert_eq!(config.journal_csv, PathBuf::from("update_journal.csv"));
    }

    #[test]
    fn parses_models_and_policy() {
        let config = DeploymentConfig::from_toml(
            r#"
            has_update_access = "owner_only"
            oem_secret_key = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"

            [[models]]
            vehicle_type = 7
            name = "TRUCK"
            "#,
        )
        .unwrap();

        assert_eq!(config.has_update_access, HasUpdateAccess::OwnerOnly);
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.models[0].vehicle_type, VehicleType(7));
        let a = config.oem_key().unwrap().principal();
        let b = config.oem_key().unwrap().principal();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_models_are_rejected() {
        let err = DeploymentConfig::from_toml(
            r#"
            [[models]]
            vehicle_type = 1
            name = "A"

            [[models]]
            vehicle_type = 1
            name = "A2"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateModel(VehicleType(1))));
    }

    #[test]
    fn bad_secret_is_reported() {
        let model = ModelConfig {
            vehicle_type: VehicleType::MODEL_A,
            name: "MODEL_A".into(),
            secret_key: Some("not-hex".into()),
        };
        assert!(matches!(model.key(), Err(ConfigError::Identity(_))));
    }
}
