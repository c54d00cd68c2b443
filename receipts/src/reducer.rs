//! Reducers of the receipts feature.
//!
//! Two reducers observe the same event stream, combined by
//! [`feature_reducer`] in a fixed order:
//!
//! 1. [`AnalyticsReducer`] reports every user intent to the analytics port
//! 2. [`ReceiptReducer`] drives the repository and owns all state changes

use std::sync::Arc;

use receipts_core::composition::SharedReducer;
use receipts_core::{CombinedReducer, Effect, Reducer, SmallVec, async_effect, combine_reducers, smallvec};

use crate::action::{ReceiptAction, ReceiptEvent};
use crate::client::ReceiptClient;
use crate::config::{StaleFetchPolicy, ViewModelConfig};
use crate::environment::ReceiptEnvironment;
use crate::state::ReceiptState;

/// The combined reducer driving a [`ReceiptViewModel`](crate::ReceiptViewModel).
pub type FeatureReducer = CombinedReducer<ReceiptState, ReceiptEvent, ReceiptEnvironment>;

/// Combines [`AnalyticsReducer`] and [`ReceiptReducer`].
#[must_use]
pub fn feature_reducer(config: &ViewModelConfig) -> FeatureReducer {
    let reducers: Vec<SharedReducer<ReceiptState, ReceiptEvent, ReceiptEnvironment>> = vec![
        Arc::new(AnalyticsReducer),
        Arc::new(ReceiptReducer::new(config.stale_fetches)),
    ];
    combine_reducers(reducers)
}

/// Tracks each user intent exactly once, by its description.
///
/// Events produced by effects (loads, errors) are not user intents and are
/// not tracked. Never touches state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsReducer;

impl Reducer for AnalyticsReducer {
    type State = ReceiptState;
    type Action = ReceiptEvent;
    type Environment = ReceiptEnvironment;

    fn reduce(
        &self,
        _state: &mut ReceiptState,
        action: ReceiptEvent,
        env: &ReceiptEnvironment,
    ) -> SmallVec<[Effect<ReceiptEvent>; 4]> {
        let ReceiptEvent::Intent(intent) = action else {
            return smallvec![Effect::None];
        };

        let event = intent.to_string();
        let analytics = Arc::clone(&env.analytics);
        smallvec![Effect::fire_and_forget(async move {
            analytics.track_event(event).await;
        })]
    }
}

/// Handles intents against the receipt repository and applies results.
///
/// | Event                    | State change             | Effect                       |
/// |--------------------------|--------------------------|------------------------------|
/// | `FetchReceipts`          | new fetch generation     | fetch                        |
/// | `CreateReceipt(request)` | none                     | create                       |
/// | `DismissErrorAlert`      | alert hidden             | none                         |
/// | `ReceiptCreated`         | new fetch generation     | fetch                        |
/// | `ReceiptsLoaded`         | list replaced            | none                         |
/// | `FetchFailed`            | error stored + presented | none                         |
/// | `ErrorRaised`            | error stored + presented | none                         |
///
/// Loads and fetch failures go through the [`StaleFetchPolicy`] first. The
/// refresh after a create takes its generation only once the create has
/// succeeded, so it orders after any fetch issued while the create was in
/// flight.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptReducer {
    stale_fetches: StaleFetchPolicy,
}

impl ReceiptReducer {
    /// Creates a reducer applying `stale_fetches` to out-of-order fetch results.
    #[must_use]
    pub const fn new(stale_fetches: StaleFetchPolicy) -> Self {
        Self { stale_fetches }
    }
}

impl Reducer for ReceiptReducer {
    type State = ReceiptState;
    type Action = ReceiptEvent;
    type Environment = ReceiptEnvironment;

    fn reduce(
        &self,
        state: &mut ReceiptState,
        action: ReceiptEvent,
        env: &ReceiptEnvironment,
    ) -> SmallVec<[Effect<ReceiptEvent>; 4]> {
        match action {
            ReceiptEvent::Intent(ReceiptAction::FetchReceipts) | ReceiptEvent::ReceiptCreated => {
                let generation = state.issue_fetch();
                smallvec![fetch_effect(Arc::clone(&env.client), generation)]
            },

            ReceiptEvent::Intent(ReceiptAction::CreateReceipt(request)) => {
                let client = Arc::clone(&env.client);

                smallvec![async_effect! {
                    match client.create_receipt(request).await {
                        Ok(()) => Some(ReceiptEvent::ReceiptCreated),
                        Err(error) => Some(ReceiptEvent::ErrorRaised(error)),
                    }
                }]
            },

            ReceiptEvent::Intent(ReceiptAction::DismissErrorAlert) => {
                state.dismiss_error_alert();
                smallvec![Effect::None]
            },

            ReceiptEvent::ReceiptsLoaded {
                generation,
                receipts,
            } => {
                if state.accept_fetch(generation, self.stale_fetches) {
                    tracing::debug!(generation, count = receipts.len(), "Applying fetched receipts");
                    state.replace_receipts(receipts);
                } else {
                    tracing::debug!(generation, "Dropping stale fetch result");
                }
                smallvec![Effect::None]
            },

            ReceiptEvent::FetchFailed { generation, error } => {
                if state.accept_fetch(generation, self.stale_fetches) {
                    tracing::warn!(generation, error = %error, "Fetching receipts failed");
                    state.raise_error(error);
                } else {
                    tracing::debug!(generation, error = %error, "Dropping stale fetch failure");
                }
                smallvec![Effect::None]
            },

            ReceiptEvent::ErrorRaised(error) => {
                tracing::warn!(error = %error, "Receipt operation failed");
                state.raise_error(error);
                smallvec![Effect::None]
            },
        }
    }
}

fn fetch_effect(client: Arc<dyn ReceiptClient>, generation: u64) -> Effect<ReceiptEvent> {
    async_effect! {
        Some(match client.fetch_receipts().await {
            Ok(receipts) => ReceiptEvent::ReceiptsLoaded {
                generation,
                receipts,
            },
            Err(error) => ReceiptEvent::FetchFailed { generation, error },
        })
    }
}
