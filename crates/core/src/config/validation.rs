//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `nft_url` is not an http(s) URL
    /// - `aws_region`, `table_name` or `user_agent` is empty
    /// - `bind_addr` is not a socket address
    /// - `fetch_timeout_ms` is set below 100ms or above 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.nft_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::Invalid {
                    field: "nft_url".into(),
                    reason: format!("unsupported scheme: {}", parsed.scheme()),
                });
            }
            Err(e) => return Err(ConfigError::Invalid { field: "nft_url".into(), reason: e.to_string() }),
        }

        if self.aws_region.is_empty() {
            return Err(ConfigError::Invalid { field: "aws_region".into(), reason: "must not be empty".into() });
        }

        if self.table_name.is_empty() {
            return Err(ConfigError::Invalid { field: "table_name".into(), reason: "must not be empty".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if let Err(e) = self.bind_addr.parse::<SocketAddr>() {
            return Err(ConfigError::Invalid { field: "bind_addr".into(), reason: e.to_string() });
        }

        if let Some(timeout_ms) = self.fetch_timeout_ms {
            if timeout_ms < 100 {
                return Err(ConfigError::Invalid {
                    field: "fetch_timeout_ms".into(),
                    reason: "must be at least 100ms".into(),
                });
            }
            if timeout_ms > 300_000 {
                return Err(ConfigError::Invalid {
                    field: "fetch_timeout_ms".into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if !self.nft_url.ends_with('/') {
            tracing::warn!(
                nft_url = %self.nft_url,
                "nft_url does not end with '/'; CIDs are appended verbatim"
            );
        }

        Ok(())
    }
}
