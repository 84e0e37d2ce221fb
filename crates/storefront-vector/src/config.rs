//! Collaborator configuration.
//!
//! Settings for the hosted similarity index and the embedding dimension.
//! Configuration is loaded from environment variables with defaults suited
//! to local development.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Vector collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    /// Hosted index endpoint.
    pub index: IndexEndpoint,

    /// Embedding dimension shared by the encoder and the index.
    pub dimension: usize,

    /// Result count used when a search does not specify one.
    pub default_top_k: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VectorConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            index: IndexEndpoint {
                host: "http://localhost:5080".to_string(),
                control_host: default_control_host(),
                api_key: None,
                index_name: "products".to_string(),
            },
            dimension: 384,
            default_top_k: 3,
            timeout_secs: 30,
        }
    }
}

impl VectorConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PINECONE_INDEX_HOST`: Index data-plane URL (default: http://localhost:5080)
    /// - `PINECONE_CONTROL_HOST`: Index management URL (default: https://api.pinecone.io)
    /// - `PINECONE_API_KEY`: Index API key
    /// - `PINECONE_INDEX_NAME`: Index name (default: products)
    /// - `VECTOR_DIMENSION`: Embedding dimension (default: 384)
    /// - `VECTOR_TOP_K`: Default search result count (default: 3)
    /// - `VECTOR_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            index: IndexEndpoint {
                host: std::env::var("PINECONE_INDEX_HOST").unwrap_or(default.index.host),
                control_host: std::env::var("PINECONE_CONTROL_HOST").unwrap_or(default.index.control_host),
                api_key: std::env::var("PINECONE_API_KEY").ok(),
                index_name: std::env::var("PINECONE_INDEX_NAME").unwrap_or(default.index.index_name),
            },
            dimension: std::env::var("VECTOR_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.dimension),
            default_top_k: std::env::var("VECTOR_TOP_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.default_top_k),
            timeout_secs: std::env::var("VECTOR_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that values are usable at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                key: "VECTOR_DIMENSION".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.default_top_k == 0 {
            return Err(ConfigError::InvalidValue {
                key: "VECTOR_TOP_K".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Validate that all required configuration is present for production.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.index.api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("PINECONE_API_KEY".to_string()));
        }
        Ok(())
    }
}

fn default_control_host() -> String {
    "https://api.pinecone.io".to_string()
}

/// Configuration for the hosted index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEndpoint {
    /// Base URL of the index host (data plane).
    pub host: String,

    /// Base URL for creating, describing and dropping indexes.
    #[serde(default = "default_control_host")]
    pub control_host: String,

    /// API key sent with every request.
    pub api_key: Option<String>,

    /// Index name, informational only once the host is known.
    pub index_name: String,
}

impl IndexEndpoint {
    /// Build a full URL by appending a path to the host.
    pub fn url(&self, path: &str) -> String {
        join(&self.host, path)
    }

    /// Build a full index-management URL.
    pub fn control_url(&self, path: &str) -> String {
        join(&self.control_host, path)
    }
}

fn join(host: &str, path: &str) -> String {
    let base = host.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VectorConfig::default();
        assert_eq!(config.dimension, 384);
        assert_eq!(config.default_top_k, 3);
        assert_eq!(config.index.index_name, "products");
        assert_eq!(config.index.control_host, "https://api.pinecone.io");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_url() {
        let endpoint = IndexEndpoint {
            host: "https://products-abc.svc.pinecone.io/".to_string(),
            control_host: "https://api.pinecone.io/".to_string(),
            api_key: None,
            index_name: "products".to_string(),
        };
        assert_eq!(
            endpoint.url("/vectors/upsert"),
            "https://products-abc.svc.pinecone.io/vectors/upsert"
        );
        assert_eq!(endpoint.url("query"), "https://products-abc.svc.pinecone.io/query");
        assert_eq!(endpoint.control_url("/indexes/products"), "https://api.pinecone.io/indexes/products");
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = VectorConfig::default();
        config.dimension = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "VECTOR_DIMENSION"
        ));

        let mut config = VectorConfig::default();
        config.default_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_for_production() {
        let mut config = VectorConfig::default();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::MissingEnvVar(_))
        ));

        config.index.api_key = Some("key".to_string());
        assert!(config.validate_for_production().is_ok());
    }
}
