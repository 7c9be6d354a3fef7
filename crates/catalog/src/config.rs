use std::{env, time::Duration};

use axum::http::HeaderValue;
use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,https://igorbaio.github.io";

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("invalid CORS origin: {0:?}")]
    InvalidOrigin(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Products table name (default: "catalog-products")
    pub products_table: String,
    /// Users table name (default: "users-catalogo")
    pub users_table: String,
    /// Secondary index on the products table keyed by owner (default: "OwnerId")
    pub owner_index: String,
    /// AWS region (default: "us-east-1")
    pub aws_region: String,
    /// Custom DynamoDB endpoint, for local development
    pub aws_endpoint_url: Option<String>,
    /// Origins allowed to call the API with credentials
    pub cors_allowed_origins: Vec<String>,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PRODUCTS_TABLE` - Products table (default: "catalog-products")
    /// - `USERS_TABLE` - Users table (default: "users-catalogo")
    /// - `OWNER_INDEX` - Owner index on the products table (default: "OwnerId")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `AWS_ENDPOINT_URL` - DynamoDB endpoint override (optional)
    /// - `CORS_ALLOWED_ORIGINS` - Comma-separated origins
    ///   (default: "http://localhost:5173,https://igorbaio.github.io")
    /// - `REQUEST_TIMEOUT_SECS` - Request timeout (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNumber {
                    var: "REQUEST_TIMEOUT_SECS",
                    value,
                })?,
            None => 10,
        };

        let cors_allowed_origins = parse_origins(&var("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGINS))?;

        Ok(Self {
            products_table: var("PRODUCTS_TABLE", "catalog-products"),
            users_table: var("USERS_TABLE", "users-catalogo"),
            owner_index: var("OWNER_INDEX", "OwnerId"),
            aws_region: var("AWS_REGION", "us-east-1"),
            aws_endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|url| !url.trim().is_empty()),
            cors_allowed_origins,
            request_timeout_secs,
        })
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            products_table: "catalog-products".to_string(),
            users_table: "users-catalogo".to_string(),
            owner_index: "OwnerId".to_string(),
            aws_region: "us-east-1".to_string(),
            aws_endpoint_url: None,
            cors_allowed_origins: DEFAULT_CORS_ORIGINS.split(',').map(String::from).collect(),
            request_timeout_secs: 10,
        }
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            let valid = (origin.starts_with("http://") || origin.starts_with("https://"))
                && HeaderValue::from_str(origin).is_ok();
            if valid {
                Ok(origin.trim_end_matches('/').to_string())
            } else {
                Err(ConfigError::InvalidOrigin(origin.to_string()))
            }
        })
        .collect()
}
