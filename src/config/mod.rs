use crate::services::random_id::{DEFAULT_MAX_ATTEMPTS, ID_FIELD_LENGTH};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ids: IdConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            pool_size: default_pool_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdConfig {
    #[serde(default = "default_id_length")]
    pub length: usize,
    /// Attempts before giving up on a free id (0 = unlimited)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            length: default_id_length(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_database_path() -> String {
    "data/record-hooks.db".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_id_length() -> usize {
    ID_FIELD_LENGTH
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Could not read config file '{}': {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at '{}', using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be greater than 0");
        }
        if self.ids.length < 8 {
            anyhow::bail!("ids.length must be at least 8");
        }
        if self.ids.length > ID_FIELD_LENGTH {
            anyhow::bail!("ids.length must be {} or less", ID_FIELD_LENGTH);
        }
        Ok(())
    }
}
