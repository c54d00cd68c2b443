use futures::future::BoxFuture;

use super::ReceiptClient;
use crate::error::ReceiptError;
use crate::models::{Receipt, ReceiptRequest};

/// Receipt client that panics on every call.
///
/// Install it in tests that assert a code path never reaches the repository.
/// Inside a store effect the panic is caught and reported through
/// `EffectHandle::wait`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingReceiptClient;

#[allow(clippy::panic)] // Unexpected repository access must abort the test
impl ReceiptClient for FailingReceiptClient {
    fn create_receipt(&self, _request: ReceiptRequest) -> BoxFuture<'_, Result<(), ReceiptError>> {
        panic!("ReceiptClient.create_receipt not implemented")
    }

    fn fetch_receipts(&self) -> BoxFuture<'_, Result<Vec<Receipt>, ReceiptError>> {
        panic!("ReceiptClient.fetch_receipts not implemented")
    }
}
