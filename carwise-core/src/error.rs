//! Error types for catalog loading and configuration
//!
//! Catalog errors never escape the [`CatalogClient`](crate::catalog::CatalogClient);
//! they are reported through [`CatalogEvent::AttemptFailed`](crate::catalog::CatalogEvent)
//! and the log, and the client moves on to the next endpoint.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a single catalog endpoint attempt did not produce usable records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Network or transport failure (DNS, connect, TLS, body read)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The attempt did not settle before its deadline
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Endpoint answered with a non-success HTTP status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Endpoint answered with an HTML page instead of JSON
    #[error("body is an HTML document, not catalog data")]
    HtmlBody,

    /// Body was not valid JSON
    #[error("body is not valid JSON: {0}")]
    Parse(String),

    /// Body parsed but held no usable records
    #[error("no usable records: {0}")]
    Empty(String),

    /// The owning session was torn down mid-attempt
    #[error("cancelled")]
    Cancelled,
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicit configuration path does not exist
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read a configuration file
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file
    #[error("failed to parse configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Configuration parsed but holds an unusable value
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        assert_eq!(
            CatalogError::Timeout(Duration::from_secs(8)).to_string(),
            "timed out after 8s"
        );
        assert_eq!(CatalogError::HttpStatus(503).to_string(), "HTTP status 503");
        assert!(CatalogError::HtmlBody.to_string().contains("HTML"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/tmp/missing.yml"));
        assert!(err.to_string().contains("/tmp/missing.yml"));

        let err = ConfigError::Invalid("timeout must be at least 1 second".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: timeout must be at least 1 second"
        );
    }
}
