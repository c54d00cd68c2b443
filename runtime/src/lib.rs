//! # Receipts Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns the state, runs the reducer, executes effects
//! - **Effect execution**: `Effect::Future` values run on spawned tokio tasks and
//!   any action they resolve to is fed back into the same store
//! - **State publication**: every reduce publishes a snapshot on a
//!   [`tokio::sync::watch`] channel for observers (the UI)
//!
//! ## Example
//!
//! ```ignore
//! use receipts_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and wait until every effect it started has finished
//! store.send(Action::DoSomething).await.wait().await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone()).await;
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use receipts_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while waiting on Store effects
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// An effect panicked while running
        ///
        /// The panic is caught by the runtime so the store keeps serving
        /// actions; the message is reported to whoever waits on the handle.
        #[error("Effect panicked: {0}")]
        EffectPanicked(String),

        /// Timeout waiting for effects to complete
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. Resolves once every effect started by that
/// action has finished, following the feedback chain: an action fed back by an
/// effect is reduced and its own effects are awaited too. A panic anywhere in
/// the chain is reported to this handle.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All effects from Action::Start are now complete
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    panics: Arc<Mutex<Vec<String>>>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle together with the tracking context the
    /// runtime threads through effect execution.
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let panics = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            panics: Arc::clone(&panics),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            panics,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (handle, tracking) = Self::new();
        drop(tracking);
        handle
    }

    /// Number of effects still running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EffectPanicked`] with the first recorded panic
    /// message if any tracked effect panicked.
    pub async fn wait(&mut self) -> Result<(), StoreError> {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracking context is gone, so nothing can still be running.
                break;
            }
        }

        let panics = self.panics.lock().unwrap_or_else(PoisonError::into_inner);
        match panics.first() {
            Some(message) => Err(StoreError::EffectPanicked(message.clone())),
            None => Ok(()),
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first, or any
    /// error [`EffectHandle::wait`] reports.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)?
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    panics: Arc<Mutex<Vec<String>>>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }

    fn record_panic(&self, message: String) {
        self.panics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Extract a readable message from a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "effect panicked with a non-string payload".to_string())
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, DecrementGuard, Effect, EffectHandle, EffectTracking, Reducer, RwLock, StoreError,
        panic_message, watch,
    };
    use futures::FutureExt;
    use std::panic::AssertUnwindSafe;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, so every mutation happens under one lock)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Publication of state snapshots to observers
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        published: Arc<watch::Sender<S>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Clone + Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (published, _) = watch::channel(initial_state.clone());

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                published: Arc::new(published),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Publishes the resulting state snapshot
        /// 4. Starts the returned effects asynchronously
        ///
        /// Concurrent `send()` calls serialize at the reducer. Effects may
        /// complete in any order; each feeds its action back through `send()`.
        ///
        /// # Returns
        ///
        /// An [`EffectHandle`] that can be used to wait for effect completion.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> EffectHandle {
            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                self.published.send_replace((*state).clone());
                tracing::trace!(effects = effects.len(), "Reducer completed");

                effects
            };

            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }

            handle
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.receipts().len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to state snapshots
        ///
        /// The receiver starts at the current state and observes the result of
        /// every subsequent reduce.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<S> {
            self.published.subscribe()
        }

        /// Execute an effect with tracking
        ///
        /// - `None`: No-op
        /// - `Future`: Spawned on the tokio runtime; a resulting action is sent
        ///   back to this store and its effects are awaited before the task
        ///   ends. A panic is caught, logged and recorded on the handle of the
        ///   action that started the chain.
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    let guard = DecrementGuard(tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        match AssertUnwindSafe(fut).catch_unwind().await {
                            Ok(Some(action)) => {
                                tracing::trace!("Effect::Future produced an action, sending to store");
                                let mut follow_up = store.send(action).await;
                                if let Err(StoreError::EffectPanicked(message)) = follow_up.wait().await {
                                    guard.0.record_panic(message);
                                }
                            },
                            Ok(None) => {
                                tracing::trace!("Effect::Future completed with no action");
                            },
                            Err(payload) => {
                                let message = panic_message(payload.as_ref());
                                tracing::error!(panic = %message, "Effect::Future panicked");
                                metrics::counter!("store.effects.panicked").increment(1);
                                guard.0.record_panic(message);
                            },
                        }
                        drop(guard);
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                published: Arc::clone(&self.published),
            }
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store").finish_non_exhaustive()
        }
    }
}

// Re-export for convenience
pub use store::Store;
