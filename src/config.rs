//! Application configuration management.
//!
//! Configuration is read from environment variables with the `envy` crate,
//! which deserializes them into a type-safe struct. Values are validated once
//! at startup so the rest of the service can rely on them.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `ACCOUNTS_SERVICE_URL` (optional): base URL of the Accounts service, defaults to `http://localhost:8081`
/// - `ACCOUNTS_SERVICE_TIMEOUT` (optional): per-call timeout in seconds, defaults to 5.0
/// - `SERVER_HOST` (optional): bind address, defaults to `0.0.0.0`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8082
/// - `VAULT_ADDR`, `VAULT_ROLE_ID`, `VAULT_SECRET_ID`, `VAULT_AUTH_MOUNT`,
///   `VAULT_KV_MOUNT`, `VAULT_API_KEY_PATH` (optional): credential bootstrap
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_accounts_service_url")]
    pub accounts_service_url: String,

    /// Timeout in seconds applied to every outbound Accounts call.
    #[serde(default = "default_accounts_service_timeout")]
    pub accounts_service_timeout: f64,

    #[serde(default = "default_host")]
    pub server_host: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_vault_addr")]
    pub vault_addr: String,

    pub vault_role_id: Option<String>,

    pub vault_secret_id: Option<String>,

    #[serde(default = "default_vault_auth_mount")]
    pub vault_auth_mount: String,

    #[serde(default = "default_vault_kv_mount")]
    pub vault_kv_mount: String,

    #[serde(default = "default_vault_api_key_path")]
    pub vault_api_key_path: String,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid ACCOUNTS_SERVICE_URL `{0}`: {1}")]
    InvalidAccountsUrl(String, String),

    #[error("ACCOUNTS_SERVICE_TIMEOUT must be a positive number of seconds (got {0})")]
    InvalidTimeout(f64),
}

/// Default Accounts base URL if ACCOUNTS_SERVICE_URL environment variable is not set.
fn default_accounts_service_url() -> String {
    "http://localhost:8081".to_string()
}

/// Default per-call timeout in seconds if ACCOUNTS_SERVICE_TIMEOUT is not set.
fn default_accounts_service_timeout() -> f64 {
    5.0
}

/// Default bind address if SERVER_HOST environment variable is not set.
fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8082
}

/// Default Vault address if VAULT_ADDR is not set.
fn default_vault_addr() -> String {
    "http://127.0.0.1:8200".to_string()
}

/// AppRole auth mount used when VAULT_AUTH_MOUNT is not set.
fn default_vault_auth_mount() -> String {
    "approle".to_string()
}

/// KV v2 mount used when VAULT_KV_MOUNT is not set.
fn default_vault_kv_mount() -> String {
    "secret".to_string()
}

/// Secret path holding the API key when VAULT_API_KEY_PATH is not set.
fn default_vault_api_key_path() -> String {
    "transactions".to_string()
}

/// AppRole credentials and locations needed to fetch the API key.
///
/// Only produced when both the role id and the secret id are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultSettings {
    pub addr: String,
    pub role_id: String,
    pub secret_id: String,
    pub auth_mount: String,
    pub kv_mount: String,
    pub api_key_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// An optional `.env` file is loaded first. Field names map to upper-case
    /// variables: `accounts_service_url` -> `ACCOUNTS_SERVICE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from explicit key/value pairs instead of the
    /// process environment. Keys use the same upper-case names.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(pairs)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.accounts_url()?;
        self.accounts_timeout()?;
        Ok(())
    }

    /// Parsed Accounts base URL. Only `http` and `https` are accepted.
    pub fn accounts_url(&self) -> Result<Url, ConfigError> {
        let parsed = Url::parse(&self.accounts_service_url).map_err(|e| {
            ConfigError::InvalidAccountsUrl(self.accounts_service_url.clone(), e.to_string())
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(ConfigError::InvalidAccountsUrl(
                self.accounts_service_url.clone(),
                format!("unsupported scheme `{other}`"),
            )),
        }
    }

    pub fn accounts_timeout(&self) -> Result<Duration, ConfigError> {
        let secs = self.accounts_service_timeout;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ConfigError::InvalidTimeout(secs));
        }
        Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(secs))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Vault settings, or `None` when the AppRole pair is not configured.
    pub fn vault_settings(&self) -> Option<VaultSettings> {
        let role_id = self.vault_role_id.clone().filter(|s| !s.is_empty())?;
        let secret_id = self.vault_secret_id.clone().filter(|s| !s.is_empty())?;

        Some(VaultSettings {
            addr: self.vault_addr.clone(),
            role_id,
            secret_id,
            auth_mount: self.vault_auth_mount.clone(),
            kv_mount: self.vault_kv_mount.clone(),
            api_key_path: self.vault_api_key_path.clone(),
        })
    }
}
