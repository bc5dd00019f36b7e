//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_PROJECT_ID` - Firebase project identifier
//! - `FIREBASE_API_KEY` - Firestore REST API key
//!
//! ## Optional
//! - `FIRESTORE_ENDPOINT` - API base URL override, e.g. a local emulator
//!   (default: <https://firestore.googleapis.com/v1>)
//! - `CART_PATH` - Location of the persisted cart file (default:
//!   `ayushyaa_cart.json` in the working directory)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog cache time-to-live (default: 300)
//! - `REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// The `localStorage` entry name the web client used for the cart; kept as
/// the default file name so a device keeps one durable cart.
const DEFAULT_CART_FILE: &str = "ayushyaa_cart.json";

const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Firestore backend configuration
    pub firebase: FirebaseConfig,
    /// Location of the persisted cart file on this device
    pub cart_path: PathBuf,
    /// How long assembled catalogs stay cached
    pub catalog_cache_ttl: Duration,
    /// Timeout applied to every backend HTTP request
    pub request_timeout: Duration,
}

/// Firestore backend configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Firebase project identifier
    pub project_id: String,
    /// Firestore REST API key
    pub api_key: SecretString,
    /// API base URL (overridable for the emulator and tests)
    pub endpoint: String,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let firebase = FirebaseConfig::from_env()?;
        let cart_path = PathBuf::from(get_env_or_default("CART_PATH", DEFAULT_CART_FILE));
        let catalog_cache_ttl =
            Duration::from_secs(get_parsed_or_default("CATALOG_CACHE_TTL_SECS", 300)?);
        let request_timeout =
            Duration::from_secs(get_parsed_or_default("REQUEST_TIMEOUT_SECS", 30)?);

        Ok(Self {
            firebase,
            cart_path,
            catalog_cache_ttl,
            request_timeout,
        })
    }
}

impl FirebaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: get_required_env("FIREBASE_PROJECT_ID")?,
            api_key: get_required_secret("FIREBASE_API_KEY")?,
            endpoint: get_env_or_default("FIRESTORE_ENDPOINT", DEFAULT_FIRESTORE_ENDPOINT),
        })
    }

    /// The `projects/{id}/databases/(default)/documents` resource prefix all
    /// document names and paths hang off.
    #[must_use]
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.project_id
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed as `u64`, with a default.
fn get_parsed_or_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn firebase_config() -> FirebaseConfig {
        FirebaseConfig {
            project_id: "ayushyaa-test".to_string(),
            api_key: SecretString::from("AIzaSyTestKeyValue"),
            endpoint: DEFAULT_FIRESTORE_ENDPOINT.to_string(),
        }
    }

    #[test]
    fn test_documents_root_path() {
        let config = firebase_config();
        assert_eq!(
            config.documents_root(),
            "projects/ayushyaa-test/databases/(default)/documents"
        );
    }

    #[test]
    fn test_firebase_config_debug_redacts_api_key() {
        let config = firebase_config();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("ayushyaa-test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("AIzaSyTestKeyValue"));
    }

    #[test]
    fn test_default_cart_file_name() {
        assert_eq!(DEFAULT_CART_FILE, "ayushyaa_cart.json");
    }
}
