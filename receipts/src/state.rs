//! Observable state of the receipts feature.

use crate::config::StaleFetchPolicy;
use crate::error::ReceiptError;
use crate::models::Receipt;

/// Receipt list, last error and alert visibility.
///
/// - the list only changes by wholesale replacement after a fetch
/// - `error` is kept after the alert is dismissed; it is only replaced by a
///   newer error
/// - raising an error always presents the alert
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceiptState {
    receipts: Vec<Receipt>,
    error: Option<ReceiptError>,
    is_error_presented: bool,
    issued_fetches: u64,
    applied_fetch: u64,
}

impl ReceiptState {
    /// Empty list, no error, alert hidden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current receipts, in service order.
    #[must_use]
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Most recent error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ReceiptError> {
        self.error.as_ref()
    }

    /// Whether the error alert is showing.
    #[must_use]
    pub const fn is_error_presented(&self) -> bool {
        self.is_error_presented
    }

    /// Replaces the whole list.
    pub fn replace_receipts(&mut self, receipts: Vec<Receipt>) {
        self.receipts = receipts;
    }

    /// Stores `error` and presents the alert.
    pub fn raise_error(&mut self, error: ReceiptError) {
        self.error = Some(error);
        self.is_error_presented = true;
    }

    /// Hides the alert without touching `error`.
    pub const fn dismiss_error_alert(&mut self) {
        self.is_error_presented = false;
    }

    /// Assigns the next fetch generation.
    pub(crate) const fn issue_fetch(&mut self) -> u64 {
        self.issued_fetches += 1;
        self.issued_fetches
    }

    /// Records that the result of fetch `generation` arrived and reports
    /// whether it should be applied under `policy`.
    pub(crate) fn accept_fetch(&mut self, generation: u64, policy: StaleFetchPolicy) -> bool {
        let stale = generation < self.applied_fetch;
        if !stale {
            self.applied_fetch = generation;
        }
        match policy {
            StaleFetchPolicy::LastWriterWins => true,
            StaleFetchPolicy::DropStale => !stale,
        }
    }
}
