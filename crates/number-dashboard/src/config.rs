//! Dashboard configuration loaded from environment variables.

use crate::auth::DashboardAuth;
use anyhow::{Context, Result};
use number_transfer::{TransferConfig, DEFAULT_RECONCILE_DELAY};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use twilio_client::{AddressProfile, DEFAULT_API_BASE_URL, DEFAULT_ISO_COUNTRY, DEFAULT_NUMBERS_BASE_URL};

/// Dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root account credentials and API hosts
    pub twilio: TwilioConfig,

    /// Transfer workflow configuration
    #[serde(default)]
    pub transfer: TransferSettings,

    /// Address created in target accounts that have none
    #[serde(default)]
    pub address: AddressProfile,

    /// Dashboard login
    pub auth: AuthConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Subaccount list caching
    #[serde(default)]
    pub cache: CacheConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    /// Root account SID
    pub account_sid: String,

    /// Root account auth token
    pub auth_token: SecretString,

    /// REST API host
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Numbers v2 host
    #[serde(default = "default_numbers_base_url")]
    pub numbers_base_url: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferSettings {
    /// Wait before re-checking the target after a failed update
    #[serde(default = "default_reconcile_delay", with = "humantime_serde")]
    pub reconcile_delay: Duration,

    /// Country of the regulatory bundles
    #[serde(default = "default_iso_country")]
    pub iso_country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Login name to bcrypt hash (see `hash-password`), one
    /// `AUTH__USERS__<NAME>` variable per user. Names are lowercased.
    pub users: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// How long a subaccount listing is served from memory
    #[serde(default = "default_subaccounts_ttl", with = "humantime_serde")]
    pub subaccounts_ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Global requests per minute
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

// Default implementations
impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            reconcile_delay: default_reconcile_delay(),
            iso_country: default_iso_country(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            subaccounts_ttl: default_subaccounts_ttl(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

fn default_numbers_base_url() -> String {
    DEFAULT_NUMBERS_BASE_URL.into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_reconcile_delay() -> Duration {
    DEFAULT_RECONCILE_DELAY
}

fn default_iso_country() -> String {
    DEFAULT_ISO_COUNTRY.into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8501
}

fn default_subaccounts_ttl() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_global_rpm() -> u32 {
    120
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Keep SIDs and postal codes as strings
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Dashboard users.
    pub fn dashboard_auth(&self) -> DashboardAuth {
        DashboardAuth::new(self.auth.users.clone())
    }

    /// Settings for the transfer workflow.
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig {
            reconcile_delay: self.transfer.reconcile_delay,
            iso_country: self.transfer.iso_country.clone(),
            address_profile: self.address.clone(),
        }
    }
}
