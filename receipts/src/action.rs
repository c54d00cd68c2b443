//! Actions accepted by the receipts feature.

use std::fmt;

use crate::error::ReceiptError;
use crate::models::{Receipt, ReceiptRequest};

/// User intent dispatched to the view-model.
///
/// The [`Display`](fmt::Display) form is the event name sent to analytics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReceiptAction {
    /// Load the full receipt list, replacing the current one
    FetchReceipts,
    /// Create a receipt, then reload the list
    CreateReceipt(ReceiptRequest),
    /// Hide the error alert; the last error stays available
    DismissErrorAlert,
}

impl fmt::Display for ReceiptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchReceipts => f.write_str("DomainAction.fetchReceipts"),
            Self::CreateReceipt(request) => write!(f, "DomainAction.createReceipt [{request}]"),
            Self::DismissErrorAlert => f.write_str("DomainAction.dismissErrorAlert"),
        }
    }
}

/// Everything the feature store reduces.
///
/// [`Intent`](Self::Intent) is the only variant callers dispatch; the others
/// are produced by effects when repository calls complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiptEvent {
    /// A user action
    Intent(ReceiptAction),
    /// A create succeeded; the list refresh starts when this is reduced
    ReceiptCreated,
    /// A fetch finished; `generation` orders it against other fetches
    ReceiptsLoaded {
        /// Monotonic fetch number assigned when the fetch was issued
        generation: u64,
        /// The complete list returned by the service
        receipts: Vec<Receipt>,
    },
    /// A fetch failed; ordered against other fetches like a load
    FetchFailed {
        /// Monotonic fetch number assigned when the fetch was issued
        generation: u64,
        /// Why the fetch failed
        error: ReceiptError,
    },
    /// A create failed, or an error was set directly
    ErrorRaised(ReceiptError),
}

impl From<ReceiptAction> for ReceiptEvent {
    fn from(action: ReceiptAction) -> Self {
        Self::Intent(action)
    }
}
