//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AFL_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `AFL_BASE_URL` - Public URL of the site (used for checkout redirect URLs)
//! - `AFL_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `STRIPE_SECRET_KEY` - Stripe API secret key
//! - `STRIPE_WEBHOOK_SECRET` - Stripe webhook signing secret
//! - `LULU_CLIENT_KEY` - Lulu OAuth client key
//! - `LULU_CLIENT_SECRET` - Lulu OAuth client secret
//! - `LULU_INTERIOR_PDF_URL` - Publicly reachable interior PDF for print jobs
//! - `LULU_COVER_PDF_URL` - Publicly reachable cover PDF for print jobs
//!
//! ## Optional
//! - `AFL_HOST` - Bind address (default: 127.0.0.1)
//! - `AFL_PORT` - Listen port (default: 3000)
//! - `AFL_ASSETS_DIR` - Directory holding paid download assets (default: assets)
//! - `LULU_API_URL` - Lulu API base (default: <https://api.lulu.com>)
//! - `LULU_POD_PACKAGE_ID` - Hardback/bundle POD package id
//! - `LULU_PAPERBACK_POD_PACKAGE_ID` - Paperback POD package id
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
//!   `SMTP_FROM_ADDRESS`, `ALERT_EMAIL` - Operational alert email (enabled
//!   when `SMTP_HOST` is set)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Sentry error tracking

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-", "changeme", "replace", "placeholder", "example", "xxx", "todo", "fixme", "insert",
    "enter-", "put-your", "add-your",
];

/// Default hardback/bundle POD package (6x9 premium linen wrap hardcover).
const DEFAULT_HARDBACK_POD_PACKAGE: &str = "0600X0900BWPRELW060UW444MFB";
/// Default paperback POD package (6x9 perfect-bound).
const DEFAULT_PAPERBACK_POD_PACKAGE: &str = "0600X0900BWSTDPB060UW444MXX";

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
    /// Public base URL of the site
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Directory holding paid download assets (ebook PDF, ZIP package)
    pub assets_dir: PathBuf,
    /// Stripe API configuration
    pub stripe: StripeConfig,
    /// Lulu print API configuration
    pub lulu: LuluConfig,
    /// SMTP alert configuration (optional)
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Stripe API configuration.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// API secret key (`sk_live_...` / `sk_test_...`)
    pub secret_key: SecretString,
    /// Webhook signing secret (`whsec_...`)
    pub webhook_secret: SecretString,
}

/// Lulu print-on-demand API configuration.
#[derive(Debug, Clone)]
pub struct LuluConfig {
    /// OAuth client key
    pub client_key: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// API base URL (sandbox or production)
    pub api_url: String,
    /// POD package id for hardback and bundle orders
    pub hardback_pod_package_id: String,
    /// POD package id for paperback orders
    pub paperback_pod_package_id: String,
    /// Publicly reachable interior PDF URL
    pub interior_pdf_url: String,
    /// Publicly reachable cover PDF URL
    pub cover_pdf_url: String,
}

/// SMTP configuration for operational alert emails.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    /// From address for outgoing mail
    pub from_address: String,
    /// Where operational alerts (failed print jobs) are sent
    pub alert_address: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("AFL_DATABASE_URL")?;
        let host = get_env_or_default("AFL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("AFL_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("AFL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("AFL_PORT".to_owned(), e.to_string()))?;

        let base_url = get_required_env("AFL_BASE_URL")?;
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("AFL_BASE_URL".to_owned(), e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_owned();

        let session_secret = get_validated_secret("AFL_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "AFL_SESSION_SECRET")?;

        let assets_dir = PathBuf::from(get_env_or_default("AFL_ASSETS_DIR", "assets"));

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            assets_dir,
            stripe: StripeConfig::from_env()?,
            lulu: LuluConfig::from_env()?,
            email: EmailConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: get_validated_secret("STRIPE_SECRET_KEY")?,
            webhook_secret: get_validated_secret("STRIPE_WEBHOOK_SECRET")?,
        })
    }
}

impl LuluConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_key: get_required_env("LULU_CLIENT_KEY")?,
            client_secret: get_validated_secret("LULU_CLIENT_SECRET")?,
            api_url: get_env_or_default("LULU_API_URL", "https://api.lulu.com")
                .trim_end_matches('/')
                .to_owned(),
            hardback_pod_package_id: get_env_or_default(
                "LULU_POD_PACKAGE_ID",
                DEFAULT_HARDBACK_POD_PACKAGE,
            ),
            paperback_pod_package_id: get_env_or_default(
                "LULU_PAPERBACK_POD_PACKAGE_ID",
                DEFAULT_PAPERBACK_POD_PACKAGE,
            ),
            interior_pdf_url: get_required_env("LULU_INTERIOR_PDF_URL")?,
            cover_pdf_url: get_required_env("LULU_COVER_PDF_URL")?,
        })
    }
}

impl EmailConfig {
    /// Alerts are opt-in: absent `SMTP_HOST` means no mailer, but a partial
    /// SMTP configuration is an error rather than a silent no-op.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_owned(), e.to_string()))?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_required_secret("SMTP_PASSWORD")?,
            from_address: get_required_env("SMTP_FROM_ADDRESS")?,
            alert_address: get_required_env("ALERT_EMAIL")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by platform
/// postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
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
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys and signing secrets have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the real credential."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_degenerate_inputs() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_random_looking() {
        assert!(shannon_entropy("sk_test_aB3xY9mK2nL5pQ7rT0uW4zC6") > 3.0);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-stripe-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("whsec_aB3xY9mK2nL5pQ7rT0uW4zC6dF8gH1j", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_length() {
        let short = SecretString::from("short");
        assert!(validate_session_secret(&short, "TEST_SESSION").is_err());

        let ok = SecretString::from("a".repeat(32));
        assert!(validate_session_secret(&ok, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            session_secret: SecretString::from("x".repeat(32)),
            assets_dir: PathBuf::from("assets"),
            stripe: StripeConfig {
                secret_key: SecretString::from("sk_test_key"),
                webhook_secret: SecretString::from("whsec_key"),
            },
            lulu: LuluConfig {
                client_key: "key".to_owned(),
                client_secret: SecretString::from("secret"),
                api_url: "https://api.sandbox.lulu.com".to_owned(),
                hardback_pod_package_id: DEFAULT_HARDBACK_POD_PACKAGE.to_owned(),
                paperback_pod_package_id: DEFAULT_PAPERBACK_POD_PACKAGE.to_owned(),
                interior_pdf_url: "https://cdn.test/interior.pdf".to_owned(),
                cover_pdf_url: "https://cdn.test/cover.pdf".to_owned(),
            },
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let stripe = StripeConfig {
            secret_key: SecretString::from("sk_live_super_secret"),
            webhook_secret: SecretString::from("whsec_super_secret"),
        };
        let debug_output = format!("{stripe:?}");
        assert!(!debug_output.contains("sk_live_super_secret"));
        assert!(!debug_output.contains("whsec_super_secret"));
    }
}
