//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_DIR` - Directory for the file-backed store (default: .gomarketplace)
//! - `CART_SNAPSHOT_KEY` - Key the cart snapshot is stored under (default: @GoMarketPlace:cart)

use std::path::PathBuf;

use thiserror::Error;

use crate::snapshot::CART_SNAPSHOT_KEY;

const DEFAULT_STORAGE_DIR: &str = ".gomarketplace";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory holding persisted snapshots
    pub storage_dir: PathBuf,
    /// Key the cart snapshot is stored under
    pub snapshot_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            snapshot_key: CART_SNAPSHOT_KEY.to_string(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(get_optional_env)
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `CART_SNAPSHOT_KEY` or
    /// `CART_STORAGE_DIR` is set but blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_dir = get_non_blank(&lookup, "CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)?;
        let snapshot_key = get_non_blank(&lookup, "CART_SNAPSHOT_KEY", CART_SNAPSHOT_KEY)?;

        Ok(Self {
            storage_dir: PathBuf::from(storage_dir),
            snapshot_key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a variable with a default value, rejecting values that are only whitespace.
fn get_non_blank(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be blank".to_string(),
        )),
        Some(value) => Ok(value),
        None => Ok(default.to_string()),
    }
}
