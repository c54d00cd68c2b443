//! Injected dependencies of the receipts feature.

use std::fmt;
use std::sync::Arc;

use crate::analytics::{AnalyticsClient, FailingAnalyticsClient, LiveAnalyticsClient, MockAnalyticsClient};
use crate::client::{FailingReceiptClient, LiveReceiptClient, MockReceiptClient, ReceiptClient};
use crate::config::ClientConfig;

/// The two ports the reducers talk to.
#[derive(Clone)]
pub struct ReceiptEnvironment {
    /// Receipt repository
    pub client: Arc<dyn ReceiptClient>,
    /// Analytics sink
    pub analytics: Arc<dyn AnalyticsClient>,
}

impl ReceiptEnvironment {
    /// Wires arbitrary port implementations.
    #[must_use]
    pub fn new(
        client: impl ReceiptClient + 'static,
        analytics: impl AnalyticsClient + 'static,
    ) -> Self {
        Self {
            client: Arc::new(client),
            analytics: Arc::new(analytics),
        }
    }

    /// HTTP-backed ports.
    #[must_use]
    pub fn live(config: &ClientConfig) -> Self {
        Self::new(LiveReceiptClient::new(config), LiveAnalyticsClient::new(config))
    }

    /// Preview ports: four canned receipts, analytics recorded in memory.
    #[must_use]
    pub fn mock() -> Self {
        Self::new(MockReceiptClient::new(), MockAnalyticsClient::new())
    }

    /// Ports that panic on any use.
    #[must_use]
    pub fn failing() -> Self {
        Self::new(FailingReceiptClient, FailingAnalyticsClient)
    }
}

impl fmt::Debug for ReceiptEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiptEnvironment")
            .field("client", &"<dyn ReceiptClient>")
            .field("analytics", &"<dyn AnalyticsClient>")
            .finish()
    }
}
