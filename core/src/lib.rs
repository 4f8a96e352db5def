//! # Roster Core
//!
//! Core traits and types for the roster synchronization layer.
//!
//! This crate holds the abstractions every other crate in the workspace is
//! written against. It contains no domain knowledge: entity types, slices and
//! operations live in `roster-store`, the state container lives in
//! `roster-runtime`.
//!
//! ## Core Concepts
//!
//! - **State**: The application state held by a single store
//! - **Action**: The fixed vocabulary of state transitions
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Dispatch**: The seam async operations use to feed actions into a store
//! - **`RestClient`**: The transport contract consumed by operations
//!
//! ## Example
//!
//! ```
//! use roster_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct LoadingState {
//!     is_loading: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum LoadingAction {
//!     SetIsLoading(bool),
//! }
//!
//! struct LoadingReducer;
//!
//! impl Reducer for LoadingReducer {
//!     type State = LoadingState;
//!     type Action = LoadingAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut LoadingState,
//!         action: LoadingAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<LoadingAction>; 4]> {
//!         match action {
//!             LoadingAction::SetIsLoading(is_loading) => state.is_loading = is_loading,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = LoadingState::default();
//! let effects = LoadingReducer.reduce(&mut state, LoadingAction::SetIsLoading(true), &());
//! assert!(state.is_loading);
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Dispatch seam between async operations and the state container
pub mod dispatch;

/// Transport contract consumed by operations
pub mod rest;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They hold every state transition of the system and are deterministic and
/// testable without a runtime.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for SkillReducer {
    ///     type State = EntityState<Skill>;
    ///     type Action = EntityAction<Skill>;
    ///     type Environment = ();
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut Self::State,
    ///         action: Self::Action,
    ///         _env: &Self::Environment,
    ///     ) -> SmallVec<[Effect<Self::Action>; 4]> {
    ///         match action {
    ///             EntityAction::SetIsLoading(is_loading) => state.is_loading = is_loading,
    ///             // ...
    ///         }
    ///         SmallVec::new()
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
        /// This is a pure function that:
        /// 1. Computes the next state and writes it in place
        /// 2. Returns effect descriptions to be executed by the runtime
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime (usually none)
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// A reducer never performs I/O. Anything it wants to happen later is
/// returned as an [`Effect`](effect::Effect) value and carried out by the
/// store. Operations call the transport outside the reducer, so the only
/// deferred work a reducer asks for is a delayed action (e.g. dismissing an
/// alert).
pub mod effect {
    use std::time::Duration;

    /// Effect type - describes work the runtime performs after a reduction
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type fed back into the reducer
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// Nothing to do
        None,

        /// Feed `action` back into the reducer once `duration` has elapsed
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the wait
            action: Box<Action>,
        },
    }

    impl<Action> Effect<Action> {
        /// Dispatch `action` after `duration`
        #[must_use]
        pub fn delay(duration: Duration, action: Action) -> Self {
            Self::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// The action this effect will dispatch, if any
        #[must_use]
        pub fn action(&self) -> Option<&Action> {
            match self {
                Self::None => None,
                Self::Delay { action, .. } => Some(action.as_ref()),
            }
        }

        /// Transform the action type produced by this effect
        ///
        /// Used when a child reducer's effects are lifted into a parent
        /// action type (e.g. alert effects into the application action).
        #[must_use]
        pub fn map<B>(self, f: impl FnOnce(Action) -> B) -> Effect<B> {
            match self {
                Self::None => Effect::None,
                Self::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// External dependencies a reducer needs are abstracted behind traits and
/// injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
