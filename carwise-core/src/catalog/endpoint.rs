//! Catalog endpoint abstraction
//!
//! Endpoints only move bytes: they report the HTTP status and the raw body
//! text. Deciding whether that body is usable catalog data is the client's
//! job, so the same rules apply to every endpoint in the chain.

use async_trait::async_trait;

use crate::error::CatalogError;

/// Raw result of one endpoint fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub status: u16,
    pub text: String,
}

impl FetchedBody {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A source of raw catalog bodies
///
/// Implementations must not apply their own retry policy; the client owns
/// timeouts and fallback order. Dropping the returned future must abort any
/// in-flight work.
#[async_trait]
pub trait CatalogEndpoint: Send + Sync {
    /// Endpoint identifier for events and logs
    fn name(&self) -> &str;

    /// Fetch the raw body
    async fn fetch(&self) -> Result<FetchedBody, CatalogError>;
}

#[cfg(feature = "http")]
pub use http::HttpEndpoint;

#[cfg(feature = "http")]
mod http {
    use super::*;
    use tracing::trace;

    /// HTTP GET endpoint backed by `reqwest`
    pub struct HttpEndpoint {
        client: reqwest::Client,
        url: String,
    }

    impl HttpEndpoint {
        /// Create an endpoint sharing an existing client (connection pool)
        pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
            Self {
                client,
                url: url.into(),
            }
        }

        /// Build the shared HTTP client used by all endpoints of one session
        pub fn build_client(user_agent: &str) -> Result<reqwest::Client, CatalogError> {
            reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .map_err(|e| CatalogError::Transport(e.to_string()))
        }

        pub fn url(&self) -> &str {
            &self.url
        }
    }

    #[async_trait]
    impl CatalogEndpoint for HttpEndpoint {
        fn name(&self) -> &str {
            &self.url
        }

        async fn fetch(&self) -> Result<FetchedBody, CatalogError> {
            trace!(url = %self.url, "GET catalog");

            let response = self
                .client
                .get(&self.url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| CatalogError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| CatalogError::Transport(e.to_string()))?;

            Ok(FetchedBody { status, text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status_range() {
        assert!(FetchedBody::new(200, "[]").is_success());
        assert!(FetchedBody::new(204, "").is_success());
        assert!(!FetchedBody::new(301, "").is_success());
        assert!(!FetchedBody::new(500, "").is_success());
    }
}
