//! The dispatch seam between async operations and a state container.
//!
//! Operations never write state. They read a snapshot through
//! [`Dispatch::select`] and feed actions through [`Dispatch::dispatch`]; the
//! container applies each action through its reducer atomically.
//!
//! `roster-runtime`'s `Store` is the production implementation.
//! `roster-testing`'s `MockStore` records dispatched actions instead of
//! reducing them.

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced when an action cannot be dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The state container no longer accepts actions (shutting down).
    #[error("State container is closed")]
    Closed,
}

/// A state container that accepts actions and exposes read access to state.
pub trait Dispatch: Send + Sync {
    /// The state held by the container
    type State;

    /// The action type the container reduces
    type Action: Send;

    /// Apply an action through the container's reducer.
    ///
    /// The future resolves once the reducer has run; effects returned by the
    /// reducer may still be executing.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Closed`] if the container is shutting down.
    fn dispatch(
        &self,
        action: Self::Action,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;

    /// Read the current state through a closure.
    fn select<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&Self::State) -> T + Send,
        T: Send;
}

impl<D> Dispatch for Arc<D>
where
    D: Dispatch,
{
    type State = D::State;
    type Action = D::Action;

    fn dispatch(
        &self,
        action: Self::Action,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send {
        (**self).dispatch(action)
    }

    fn select<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&Self::State) -> T + Send,
        T: Send,
    {
        (**self).select(f)
    }
}
