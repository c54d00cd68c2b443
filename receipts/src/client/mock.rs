use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;

use super::{FailingReceiptClient, ReceiptClient};
use crate::error::ReceiptError;
use crate::models::{Receipt, ReceiptRequest};

const UNSTUBBED: &FailingReceiptClient = &FailingReceiptClient;

/// The four receipts served by a default [`MockReceiptClient`].
#[must_use]
pub fn preview_receipts() -> Vec<Receipt> {
    (1..=4)
        .map(|n| Receipt::new(format!("preview-{n}"), format!("Test receipt {n}")))
        .collect()
}

#[derive(Debug, Default)]
struct Calls {
    created: Vec<ReceiptRequest>,
    fetches: usize,
}

/// In-memory receipt client with canned outcomes.
///
/// By default creates succeed and fetches return [`preview_receipts`].
/// Clones share the call log, so a test can keep one clone for inspection
/// and hand the other to the environment.
///
/// # Example
///
/// ```
/// use receipts::{MockReceiptClient, Receipt, ReceiptError};
///
/// let client = MockReceiptClient::new()
///     .with_receipts(vec![Receipt::new("1", "Fancy receipt")])
///     .with_create(Err(ReceiptError::message("Too many requests")));
/// assert_eq!(client.fetch_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockReceiptClient {
    create: Option<Result<(), ReceiptError>>,
    fetch: Option<Result<Vec<Receipt>, ReceiptError>>,
    calls: Arc<Mutex<Calls>>,
}

impl MockReceiptClient {
    /// Creates a mock serving the preview receipts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            create: Some(Ok(())),
            fetch: Some(Ok(preview_receipts())),
            calls: Arc::default(),
        }
    }

    /// Creates a mock with no stubbed operation; every call panics like
    /// [`FailingReceiptClient`] until stubbed with `with_*`.
    #[must_use]
    pub fn unstubbed() -> Self {
        Self {
            create: None,
            fetch: None,
            calls: Arc::default(),
        }
    }

    /// Stubs the outcome of every create.
    #[must_use]
    pub fn with_create(mut self, outcome: Result<(), ReceiptError>) -> Self {
        self.create = Some(outcome);
        self
    }

    /// Stubs the outcome of every fetch.
    #[must_use]
    pub fn with_fetch(mut self, outcome: Result<Vec<Receipt>, ReceiptError>) -> Self {
        self.fetch = Some(outcome);
        self
    }

    /// Stubs every fetch to succeed with `receipts`.
    #[must_use]
    pub fn with_receipts(self, receipts: Vec<Receipt>) -> Self {
        self.with_fetch(Ok(receipts))
    }

    /// Requests passed to `create_receipt`, in call order.
    #[must_use]
    pub fn created_requests(&self) -> Vec<ReceiptRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .created
            .clone()
    }

    /// Number of `fetch_receipts` calls so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fetches
    }
}

impl Default for MockReceiptClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptClient for MockReceiptClient {
    fn create_receipt(&self, request: ReceiptRequest) -> BoxFuture<'_, Result<(), ReceiptError>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .created
            .push(request.clone());

        match &self.create {
            Some(outcome) => {
                let outcome = outcome.clone();
                Box::pin(async move { outcome })
            },
            None => UNSTUBBED.create_receipt(request),
        }
    }

    fn fetch_receipts(&self) -> BoxFuture<'_, Result<Vec<Receipt>, ReceiptError>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fetches += 1;

        match &self.fetch {
            Some(outcome) => {
                let outcome = outcome.clone();
                Box::pin(async move { outcome })
            },
            None => UNSTUBBED.fetch_receipts(),
        }
    }
}
