//! Reducer composition utilities
//!
//! [`combine_reducers`] runs several reducers over the same state and the same
//! action, which is how one action stream gets more than one independent
//! observer (for example an analytics tracker next to the feature reducer).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use receipts_core::composition::SharedReducer;
//! use receipts_core::{Effect, Reducer, SmallVec, combine_reducers, smallvec};
//!
//! #[derive(Default)]
//! struct AppState {
//!     count: i32,
//!     seen: usize,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//! struct SeenReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
//!         match action {
//!             AppAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! impl Reducer for SeenReducer {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut AppState, _action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
//!         state.seen += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let reducers: Vec<SharedReducer<AppState, AppAction, ()>> =
//!     vec![Arc::new(CounterReducer), Arc::new(SeenReducer)];
//! let combined = combine_reducers(reducers);
//!
//! let mut state = AppState::default();
//! let effects = combined.reduce(&mut state, AppAction::Increment, &());
//! assert_eq!((state.count, state.seen), (1, 1));
//! // `Effect::None` entries are dropped while combining
//! assert!(effects.is_empty());
//! ```

use std::sync::Arc;

use smallvec::SmallVec;

use crate::effect::Effect;
use crate::reducer::Reducer;

/// A reducer that can be shared across the store and its effect tasks.
pub type SharedReducer<S, A, E> = Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer sees its own clone of the action, in registration order, and the
/// effects of all of them are concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of reducers in the combination.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// True when no reducer has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
    }
}

impl<S, A, E> std::fmt::Debug for CombinedReducer<S, A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("reducers", &self.reducers.len())
            .finish()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|effect| !effect.is_none()));
        }

        all_effects
    }
}
