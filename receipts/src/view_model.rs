//! The receipts view-model.

use receipts_runtime::{EffectHandle, Store};
use tokio::sync::watch;

use crate::action::{ReceiptAction, ReceiptEvent};
use crate::config::{ClientConfig, ViewModelConfig};
use crate::environment::ReceiptEnvironment;
use crate::error::ReceiptError;
use crate::models::Receipt;
use crate::reducer::{FeatureReducer, feature_reducer};
use crate::state::ReceiptState;

/// Action-driven view-model over the receipt repository.
///
/// Each [`dispatch`](Self::dispatch) is reported to analytics once and
/// handled by the receipt reducer. Repository work runs in the background;
/// the returned [`EffectHandle`] resolves once its result has been applied.
///
/// Cloning yields another handle onto the same state.
#[derive(Clone, Debug)]
pub struct ReceiptViewModel {
    store: Store<ReceiptState, ReceiptEvent, ReceiptEnvironment, FeatureReducer>,
}

impl ReceiptViewModel {
    /// Creates a view-model with default behaviour.
    #[must_use]
    pub fn new(environment: ReceiptEnvironment) -> Self {
        Self::with_config(environment, ViewModelConfig::default())
    }

    /// Creates a view-model with explicit behaviour switches.
    #[must_use]
    pub fn with_config(environment: ReceiptEnvironment, config: ViewModelConfig) -> Self {
        tracing::debug!(?config, "Creating receipt view-model");
        Self {
            store: Store::new(ReceiptState::new(), feature_reducer(&config), environment),
        }
    }

    /// Creates a view-model talking to the live receipt service.
    #[must_use]
    pub fn live(config: &ClientConfig) -> Self {
        Self::new(ReceiptEnvironment::live(config))
    }

    /// Creates a view-model backed by preview data.
    #[must_use]
    pub fn preview() -> Self {
        Self::new(ReceiptEnvironment::mock())
    }

    /// Dispatches a user action.
    ///
    /// State changes that need no repository call are visible when this
    /// returns; wait on the handle for the rest.
    #[tracing::instrument(skip(self, action), fields(action = %action))]
    pub async fn dispatch(&self, action: ReceiptAction) -> EffectHandle {
        self.store.send(ReceiptEvent::Intent(action)).await
    }

    /// Stores `error` and presents the alert, as if a repository call had
    /// failed with it. Not reported to analytics.
    pub async fn set_error(&self, error: ReceiptError) -> EffectHandle {
        self.store.send(ReceiptEvent::ErrorRaised(error)).await
    }

    /// Current receipts.
    pub async fn receipts(&self) -> Vec<Receipt> {
        self.store.state(|s| s.receipts().to_vec()).await
    }

    /// Most recent error, kept after the alert is dismissed.
    pub async fn error(&self) -> Option<ReceiptError> {
        self.store.state(|s| s.error().cloned()).await
    }

    /// Whether the error alert is showing.
    pub async fn is_error_presented(&self) -> bool {
        self.store.state(ReceiptState::is_error_presented).await
    }

    /// Copy of the whole state.
    pub async fn snapshot(&self) -> ReceiptState {
        self.store.state(Clone::clone).await
    }

    /// Receives a snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ReceiptState> {
        self.store.subscribe()
    }
}
