//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BLUEDROP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//! - `BLUEDROP_BASE_URL` - Public URL for the application
//!
//! ## Optional
//! - `BLUEDROP_HOST` - Bind address (default: 127.0.0.1)
//! - `BLUEDROP_PORT` - Listen port (default: 3000)
//! - `BLUEDROP_APP_ID` - Namespace for all data access; selects the
//!   `PostgreSQL` schema (default: bluedrop)
//! - `BLUEDROP_COUNTRY_CODE` - Country code prefixed to 10-digit phone
//!   numbers in payment reminders (default: 91)
//! - `QR_RENDER_URL` - External QR image render endpoint
//! - `IMAGE_HOST_UPLOAD_URL` - External image host upload endpoint
//! - `IMAGE_HOST_API_KEY` - Image host API key; QR image hosting is skipped
//!   when unset
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment label

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default namespace when `BLUEDROP_APP_ID` is unset.
const DEFAULT_APP_ID: &str = "bluedrop";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the application
    pub base_url: String,
    /// Namespace identifier; selects the `PostgreSQL` schema
    pub app_id: String,
    /// Country code prefixed to bare 10-digit phone numbers in reminders
    pub country_code: String,
    /// QR provisioning endpoints
    pub qr: QrConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment label
    pub sentry_environment: Option<String>,
}

/// External QR render and image host configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct QrConfig {
    /// QR image render endpoint (the payload is passed as a query param)
    pub render_url: String,
    /// Image host upload endpoint
    pub upload_url: String,
    /// Image host API key; hosting is skipped when `None`
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for QrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrConfig")
            .field("render_url", &self.render_url)
            .field("upload_url", &self.upload_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the image host key fails placeholder/entropy validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BLUEDROP_DATABASE_URL")?;
        let host = get_env_or_default("BLUEDROP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BLUEDROP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BLUEDROP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BLUEDROP_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("BLUEDROP_BASE_URL")?;

        let app_id = get_env_or_default("BLUEDROP_APP_ID", DEFAULT_APP_ID);
        validate_app_id(&app_id)?;

        let country_code = get_env_or_default("BLUEDROP_COUNTRY_CODE", "91");

        let qr = QrConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            app_id,
            country_code,
            qr,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl QrConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = match get_optional_env("IMAGE_HOST_API_KEY") {
            Some(value) => {
                validate_secret_strength(&value, "IMAGE_HOST_API_KEY")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        Ok(Self {
            render_url: get_env_or_default(
                "QR_RENDER_URL",
                "https://api.qrserver.com/v1/create-qr-code/",
            ),
            upload_url: get_env_or_default("IMAGE_HOST_UPLOAD_URL", "https://api.imgbb.com/1/upload"),
            api_key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by managed postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// The app id is interpolated into `SET search_path` and the session store
/// schema, so it must be a plain identifier.
fn validate_app_id(app_id: &str) -> Result<(), ConfigError> {
    let valid = !app_id.is_empty()
        && app_id.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && app_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "BLUEDROP_APP_ID".to_string(),
            "must be a lowercase identifier (a-z, 0-9, _)".to_string(),
        ))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaa", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_app_id() {
        assert!(validate_app_id("bluedrop").is_ok());
        assert!(validate_app_id("bluedrop_staging2").is_ok());
        assert!(validate_app_id("").is_err());
        assert!(validate_app_id("BlueDrop").is_err());
        assert!(validate_app_id("blue-drop").is_err());
        assert!(validate_app_id("blue;drop").is_err());
        assert!(validate_app_id("2drop").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            country_code: "91".to_string(),
            qr: QrConfig {
                render_url: "https://qr.test/render".to_string(),
                upload_url: "https://img.test/upload".to_string(),
                api_key: None,
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_qr_config_debug_redacts_key() {
        let config = QrConfig {
            render_url: "https://qr.test/render".to_string(),
            upload_url: "https://img.test/upload".to_string(),
            api_key: Some(SecretString::from("k9Q2xV7mP4wZ1nB8")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("k9Q2xV7mP4wZ1nB8"));
    }
}
