//! Catalog client with timeout racing and sequential fallback
//!
//! ```text
//! primary ──fail──▶ fallback 1 ──fail──▶ ... ──fail──▶ static seed (degraded)
//!    │                  │
//!    ok                 ok
//!    ▼                  ▼
//! CatalogSnapshot { degraded: false }
//! ```
//!
//! Every attempt races the endpoint against the per-attempt deadline; the
//! loser is dropped, which aborts the in-flight request. Attempts never run
//! concurrently. Failures are reported as [`CatalogEvent`]s and logged, never
//! returned: callers always get a usable catalog.

use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::endpoint::{CatalogEndpoint, FetchedBody};
use super::record::{adapt_values, VehicleRecord};
use super::seed;
use crate::error::CatalogError;

/// Where a snapshot's records came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "endpoint", rename_all = "snake_case")]
pub enum CatalogSource {
    /// Served by the named endpoint
    Endpoint(String),
    /// Synthesized from the static seed
    Synthetic,
}

/// The catalog a wizard session works against
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub records: Vec<VehicleRecord>,
    /// True when every endpoint failed and the records are synthetic
    pub degraded: bool,
    pub source: CatalogSource,
}

impl CatalogSnapshot {
    /// Snapshot built from the static seed
    pub fn synthetic() -> Self {
        Self {
            records: seed::synthesize(),
            degraded: true,
            source: CatalogSource::Synthetic,
        }
    }
}

/// Structured progress reported while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    AttemptStarted { endpoint: String, attempt: usize },
    AttemptFailed { endpoint: String, error: CatalogError },
    Loaded { endpoint: String, records: usize },
    Degraded { records: usize },
}

/// Loads the vehicle catalog from an ordered endpoint chain
pub struct CatalogClient {
    /// Primary first, then fallbacks in order
    endpoints: Vec<Box<dyn CatalogEndpoint>>,
    attempt_timeout: Duration,
    events: Option<UnboundedSender<CatalogEvent>>,
}

impl CatalogClient {
    /// Create a client over an explicit endpoint chain
    pub fn new(endpoints: Vec<Box<dyn CatalogEndpoint>>, attempt_timeout: Duration) -> Self {
        Self {
            endpoints,
            attempt_timeout,
            events: None,
        }
    }

    /// A client with no endpoints; always yields the synthetic catalog
    pub fn offline() -> Self {
        Self::new(Vec::new(), Duration::from_secs(crate::config::DEFAULT_ATTEMPT_TIMEOUT_SECS))
    }

    /// Build the HTTP endpoint chain described by the configuration
    #[cfg(feature = "http")]
    pub fn from_config(config: &crate::config::CatalogConfig) -> Result<Self, CatalogError> {
        use super::endpoint::HttpEndpoint;

        let http = HttpEndpoint::build_client(&config.user_agent)?;
        let endpoints = config
            .endpoint_urls()
            .map(|url| Box::new(HttpEndpoint::new(http.clone(), url)) as Box<dyn CatalogEndpoint>)
            .collect();

        Ok(Self::new(endpoints, config.attempt_timeout()))
    }

    /// Send events to an existing channel
    pub fn with_events(mut self, sender: UnboundedSender<CatalogEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Open a fresh event channel, replacing any previous subscriber
    pub fn subscribe(&mut self) -> UnboundedReceiver<CatalogEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Load the catalog; never fails
    pub async fn load_catalog(&self) -> CatalogSnapshot {
        self.load_catalog_until(&CancellationToken::new()).await
    }

    /// Load the catalog until `cancel` fires
    ///
    /// Cancellation aborts the in-flight attempt and skips the remaining
    /// endpoints; the synthetic catalog is returned so the contract holds.
    pub async fn load_catalog_until(&self, cancel: &CancellationToken) -> CatalogSnapshot {
        for (attempt, endpoint) in self.endpoints.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!("Catalog load cancelled before attempt {}", attempt + 1);
                break;
            }

            let name = endpoint.name().to_string();
            debug!(endpoint = %name, attempt = attempt + 1, "Fetching catalog");
            self.emit(CatalogEvent::AttemptStarted {
                endpoint: name.clone(),
                attempt: attempt + 1,
            });

            match self.attempt(endpoint.as_ref(), cancel).await {
                Ok(records) => {
                    info!(endpoint = %name, records = records.len(), "Catalog loaded");
                    self.emit(CatalogEvent::Loaded {
                        endpoint: name.clone(),
                        records: records.len(),
                    });
                    return CatalogSnapshot {
                        records,
                        degraded: false,
                        source: CatalogSource::Endpoint(name),
                    };
                }
                Err(error) => {
                    warn!(endpoint = %name, error = %error, "Catalog endpoint failed");
                    let cancelled = error == CatalogError::Cancelled;
                    self.emit(CatalogEvent::AttemptFailed {
                        endpoint: name,
                        error,
                    });
                    if cancelled {
                        break;
                    }
                }
            }
        }

        let snapshot = CatalogSnapshot::synthetic();
        warn!(
            records = snapshot.records.len(),
            "All catalog endpoints failed, using offline data"
        );
        self.emit(CatalogEvent::Degraded {
            records: snapshot.records.len(),
        });
        snapshot
    }

    async fn attempt(
        &self,
        endpoint: &dyn CatalogEndpoint,
        cancel: &CancellationToken,
    ) -> Result<Vec<VehicleRecord>, CatalogError> {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CatalogError::Cancelled),
            result = tokio::time::timeout(self.attempt_timeout, endpoint.fetch()) => {
                result.map_err(|_| CatalogError::Timeout(self.attempt_timeout))??
            }
        };

        interpret_body(&fetched)
    }

    fn emit(&self, event: CatalogEvent) {
        if let Some(events) = &self.events {
            // Receiver gone means nobody is listening; logging already happened
            let _ = events.send(event);
        }
    }
}

/// Decide whether a fetched body is usable catalog data
pub fn interpret_body(body: &FetchedBody) -> Result<Vec<VehicleRecord>, CatalogError> {
    if !body.is_success() {
        return Err(CatalogError::HttpStatus(body.status));
    }

    if is_html_document(&body.text) {
        return Err(CatalogError::HtmlBody);
    }

    let value: serde_json::Value =
        serde_json::from_str(&body.text).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let serde_json::Value::Array(items) = value else {
        return Err(CatalogError::Empty("body is not a JSON array".to_string()));
    };

    if items.is_empty() {
        return Err(CatalogError::Empty("array is empty".to_string()));
    }

    let total = items.len();
    let records = adapt_values(items);
    if records.is_empty() {
        return Err(CatalogError::Empty(format!(
            "none of {total} entries had a brand and model name"
        )));
    }

    Ok(records)
}

/// True when the body starts with an HTML document marker
pub fn is_html_document(text: &str) -> bool {
    let head = text.trim_start_matches('\u{feff}').trim_start();
    starts_with_ignore_case(head, "<!doctype") || starts_with_ignore_case(head, "<html")
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
