//! # Receipts Core
//!
//! The small set of abstractions the receipts feature is built on.
//!
//! - **State**: the data a feature owns and publishes to its observers
//! - **Action**: everything that can happen to that state (user intents and
//!   results fed back from side effects)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`, synchronous
//! - **Effect**: a description of asynchronous work, executed by the runtime
//! - **Environment**: injected ports (network clients, analytics sinks)
//!
//! Reducers never perform I/O themselves. They return [`Effect`] values and the
//! runtime decides where and when those run.
//!
//! ## Example
//!
//! ```
//! use receipts_core::{Effect, Reducer, SmallVec, smallvec};
//!
//! #[derive(Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Reducer composition
pub mod composition;

/// Declarative macros for building effects
pub mod effect_macros;

/// Reducer module - the core trait for business logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - maps an action and the current state to a new state
    /// plus the side effects still to run.
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for ReceiptReducer {
    ///     type State = ReceiptState;
    ///     type Action = ReceiptEvent;
    ///     type Environment = ReceiptEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut ReceiptState,
    ///         action: ReceiptEvent,
    ///         env: &ReceiptEnvironment,
    ///     ) -> SmallVec<[Effect<ReceiptEvent>; 4]> {
    ///         // State transitions and effect descriptions go here
    ///         smallvec![Effect::None]
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a synchronous function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values, not execution. The runtime spawns them and feeds any
/// action they produce back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// A boxed, sendable future producing an optional feedback action.
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(EffectFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns true for [`Effect::None`].
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Run a future that only performs work and never feeds an action back.
        #[must_use]
        pub fn fire_and_forget<F>(future: F) -> Self
        where
            F: Future<Output = ()> + Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                future.await;
                None
            }))
        }
    }
}

pub use composition::{CombinedReducer, combine_reducers};
pub use effect::Effect;
pub use reducer::Reducer;
