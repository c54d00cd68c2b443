//! The analytics port and its implementations.
//!
//! Analytics never fails from the caller's point of view: the live client
//! logs delivery problems and moves on.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::config::ClientConfig;

/// Sink for user-action events.
pub trait AnalyticsClient: Send + Sync {
    /// Records one event. Completes once delivery was attempted.
    fn track_event(&self, event: String) -> BoxFuture<'_, ()>;
}

#[derive(Serialize)]
struct TrackedEvent<'a> {
    event: &'a str,
}

/// Analytics client that logs every event on the `analytics` target and,
/// when an endpoint is configured, posts `{"event": ...}` to it.
#[derive(Debug, Clone)]
pub struct LiveAnalyticsClient {
    http: Client,
    endpoint: Option<Url>,
}

impl LiveAnalyticsClient {
    /// Creates a client posting to `config.analytics_url()`, if set.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    /// Creates a client on top of an existing HTTP client.
    #[must_use]
    pub fn with_http_client(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            endpoint: config.analytics_url().cloned(),
        }
    }
}

impl AnalyticsClient for LiveAnalyticsClient {
    fn track_event(&self, event: String) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            tracing::info!(target: "analytics", event = %event, "Tracked event");

            let Some(endpoint) = &self.endpoint else {
                return;
            };

            match self
                .http
                .post(endpoint.clone())
                .json(&TrackedEvent { event: &event })
                .send()
                .await
            {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(
                        target: "analytics",
                        status = %response.status(),
                        "Analytics endpoint rejected event"
                    );
                },
                Ok(_) => {},
                Err(error) => {
                    tracing::warn!(target: "analytics", error = %error, "Failed to deliver event");
                },
            }
        })
    }
}

/// Analytics client that records events in memory.
///
/// Clones share the recording.
#[derive(Debug, Clone, Default)]
pub struct MockAnalyticsClient {
    events: Arc<Mutex<Vec<String>>>,
}

impl MockAnalyticsClient {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events tracked so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AnalyticsClient for MockAnalyticsClient {
    fn track_event(&self, event: String) -> BoxFuture<'_, ()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Box::pin(async {})
    }
}

/// Analytics client that panics on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingAnalyticsClient;

#[allow(clippy::panic)] // Unexpected analytics traffic must abort the test
impl AnalyticsClient for FailingAnalyticsClient {
    fn track_event(&self, _event: String) -> BoxFuture<'_, ()> {
        panic!("AnalyticsClient.track_event not implemented")
    }
}
