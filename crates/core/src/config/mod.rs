//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (NFT_METADATA_*)
//! 2. Legacy deployment variables (NFT_URL, AWS_REGION, TABLE_NAME), when non-empty
//! 3. TOML config file (if NFT_METADATA_CONFIG_FILE set)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Read a setting from the process environment.
///
/// Returns the variable's value when it is set and non-empty, else `default`.
pub fn get_setting(key: &str, default: &str) -> String {
    lookup_non_empty(key, |k| std::env::var(k).ok()).unwrap_or_else(|| default.to_string())
}

fn lookup_non_empty(key: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    lookup(key).filter(|value| !value.is_empty())
}

/// Which key-value backend holds the metadata table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Managed DynamoDB table in `aws_region`.
    Dynamodb,
    /// Local SQLite file at `db_path`.
    Sqlite,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (NFT_METADATA_*)
/// 2. NFT_URL / AWS_REGION / TABLE_NAME
/// 3. TOML config file (if NFT_METADATA_CONFIG_FILE set)
/// 4. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the content-addressable gateway. The CID is appended verbatim.
    ///
    /// Set via NFT_URL or NFT_METADATA_NFT_URL.
    #[serde(default = "default_nft_url")]
    pub nft_url: String,

    /// Region for the DynamoDB client.
    ///
    /// Set via AWS_REGION or NFT_METADATA_AWS_REGION.
    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    /// Name of the metadata table.
    ///
    /// Set via TABLE_NAME or NFT_METADATA_TABLE_NAME.
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Storage backend: "dynamodb" (default) or "sqlite".
    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    /// Endpoint override for the DynamoDB client, e.g. DynamoDB Local.
    #[serde(default)]
    pub dynamodb_endpoint: Option<String>,

    /// Path to the SQLite database used by the sqlite backend.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// User-Agent string for gateway requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional timeout for gateway requests, in milliseconds.
    /// Unset means requests wait for the gateway indefinitely.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
}

fn default_nft_url() -> String {
    "https://ipfs.io/ipfs/".into()
}

fn default_aws_region() -> String {
    "us-east-2".into()
}

fn default_table_name() -> String {
    "nft_metadata".into()
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Dynamodb
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./nft-metadata.sqlite")
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".into()
}

fn default_user_agent() -> String {
    "nft-metadata/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nft_url: default_nft_url(),
            aws_region: default_aws_region(),
            table_name: default_table_name(),
            store_backend: default_store_backend(),
            dynamodb_endpoint: None,
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            user_agent: default_user_agent(),
            fetch_timeout_ms: None,
        }
    }
}

/// The unprefixed deployment variables. Only non-empty values override.
#[derive(Debug, Default, Serialize)]
struct LegacyEnv {
    #[serde(skip_serializing_if = "Option::is_none")]
    nft_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table_name: Option<String>,
}

impl LegacyEnv {
    fn from_env() -> Self {
        Self::from_lookup(|key| Some(get_setting(key, "")))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            nft_url: lookup_non_empty("NFT_URL", &lookup),
            aws_region: lookup_non_empty("AWS_REGION", &lookup),
            table_name: lookup_non_empty("TABLE_NAME", &lookup),
        }
    }
}

impl AppConfig {
    /// Gateway timeout as Duration for use with reqwest.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("NFT_METADATA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment
            .merge(Serialized::defaults(LegacyEnv::from_env()))
            .merge(
                Env::prefixed("NFT_METADATA_")
                    .ignore(&["CONFIG_FILE"])
                    .map(|key| key.as_str().to_lowercase().into()),
            );

        Self::from_figment(figment)
    }

    /// Extract and validate a configuration from an assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        tracing::debug!(
            nft_url = %config.nft_url,
            aws_region = %config.aws_region,
            table_name = %config.table_name,
            store_backend = ?config.store_backend,
            "configuration loaded"
        );

        Ok(config)
    }
}
