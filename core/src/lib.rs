//! # RailReserve Core
//!
//! The small functional core every RailReserve feature is built on.
//!
//! ## Core Concepts
//!
//! - **State**: Owned domain data (seat inventory, booking ledger, selection)
//! - **Action**: Every input to a reducer, both user commands and the events they produce
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: A description of side-effecting work, executed later by the runtime
//! - **Environment**: Injected collaborators (clock, storage, assistant)
//!
//! Reducers never perform I/O themselves. Persisting the ledger or calling the
//! travel assistant is returned as an [`effect::Effect`] and run by the store,
//! which keeps every booking mutation synchronous and run-to-completion.
//!
//! ## Example
//!
//! ```ignore
//! use railreserve_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for SeatCounterReducer {
//!     type State = SeatCounter;
//!     type Action = SeatCounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SeatCounter,
//!         action: SeatCounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<SeatCounterAction>; 4]> {
//!         match action {
//!             SeatCounterAction::Book => state.available -= 1,
//!             SeatCounterAction::Release => state.available += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the trait that holds all business logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Business logic as a pure state transition.
    ///
    /// A reducer validates the action, mutates `state` in place and returns
    /// descriptions of any follow-up work. It must not block, sleep or do I/O.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Describes a side effect to be executed by the runtime.
    ///
    /// Effects are values. Returning one from a reducer does nothing until the
    /// store executes it; a `Future` may yield an action that is fed back into
    /// the reducer.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation.
        ///
        /// Resolves to `Some(action)` to feed an action back into the reducer.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a future whose output is fed back as an action
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Returns true for `Effect::None` and for a `Parallel` of only no-ops
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Abstracts time so booking dates are deterministic in tests.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock used in production
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
