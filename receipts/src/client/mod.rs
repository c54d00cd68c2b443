//! The receipt repository port and its implementations.
//!
//! - [`LiveReceiptClient`]: talks to the receipt service over HTTP
//! - [`MockReceiptClient`]: canned, configurable responses for previews and tests
//! - [`FailingReceiptClient`]: panics on every call, for tests that must not
//!   touch the repository

use futures::future::BoxFuture;

use crate::error::ReceiptError;
use crate::models::{Receipt, ReceiptRequest};

mod failing;
mod live;
mod mock;

pub use failing::FailingReceiptClient;
pub use live::LiveReceiptClient;
pub use mock::{MockReceiptClient, preview_receipts};

/// Remote receipt repository.
///
/// Methods return boxed futures so the trait stays object-safe and can be
/// held as `Arc<dyn ReceiptClient>` in the environment.
pub trait ReceiptClient: Send + Sync {
    /// Creates a receipt. Succeeds without a payload.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError`] on transport failure or a rejected request.
    fn create_receipt(&self, request: ReceiptRequest) -> BoxFuture<'_, Result<(), ReceiptError>>;

    /// Fetches the complete receipt list.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError`] on transport failure, a rejected request, or
    /// an undecodable body.
    fn fetch_receipts(&self) -> BoxFuture<'_, Result<Vec<Receipt>, ReceiptError>>;
}
