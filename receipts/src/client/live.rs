use futures::future::BoxFuture;
use reqwest::{Client, Response, Url};

use super::ReceiptClient;
use crate::config::ClientConfig;
use crate::error::{ConfigError, ReceiptError};
use crate::models::{Receipt, ReceiptRequest};

/// HTTP receipt client.
///
/// - create: `POST {base}/{create_endpoint}` with a JSON body `{"name": ...}`
/// - fetch: `GET {base}`, decoding a JSON array of receipts
///
/// Any status in `200..=399` counts as success.
#[derive(Debug, Clone)]
pub struct LiveReceiptClient {
    http: Client,
    fetch_url: Url,
    create_url: Url,
}

impl LiveReceiptClient {
    /// Creates a client with a default HTTP client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    /// Creates a client on top of an existing HTTP client (shared pools,
    /// custom timeouts).
    #[must_use]
    pub fn with_http_client(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            fetch_url: config.fetch_url().clone(),
            create_url: config.create_url(),
        }
    }

    /// Creates a client configured from `RECEIPTS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a configured URL is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(&ClientConfig::from_env()?))
    }
}

fn ensure_accepted(response: Response) -> Result<Response, ReceiptError> {
    let status = response.status();
    if status.is_success() || status.is_redirection() {
        Ok(response)
    } else {
        Err(ReceiptError::message(format!(
            "Receipt service responded with {status}"
        )))
    }
}

impl ReceiptClient for LiveReceiptClient {
    fn create_receipt(&self, request: ReceiptRequest) -> BoxFuture<'_, Result<(), ReceiptError>> {
        Box::pin(async move {
            tracing::debug!(url = %self.create_url, name = %request.name, "Creating receipt");

            let response = self
                .http
                .post(self.create_url.clone())
                .json(&request)
                .send()
                .await?;
            ensure_accepted(response)?;

            Ok::<_, ReceiptError>(())
        })
    }

    fn fetch_receipts(&self) -> BoxFuture<'_, Result<Vec<Receipt>, ReceiptError>> {
        Box::pin(async move {
            tracing::debug!(url = %self.fetch_url, "Fetching receipts");

            let response = self.http.get(self.fetch_url.clone()).send().await?;
            let receipts = ensure_accepted(response)?.json::<Vec<Receipt>>().await?;

            tracing::debug!(count = receipts.len(), "Fetched receipts");
            Ok::<_, ReceiptError>(receipts)
        })
    }
}
