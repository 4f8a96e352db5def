//! Recording state container for operation tests

use roster_core::dispatch::{Dispatch, DispatchError};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A [`Dispatch`] implementation that records actions instead of reducing
/// them.
///
/// `select` reads a state set by the test, so operations see whatever tenant
/// or slice contents the scenario needs. Clones share the same log.
///
/// # Example
///
/// ```
/// use roster_testing::MockStore;
/// use roster_core::dispatch::Dispatch;
///
/// # async fn example() -> Result<(), roster_core::dispatch::DispatchError> {
/// let store = MockStore::<u32, &'static str>::new(7);
/// store.dispatch("loaded").await?;
///
/// assert_eq!(store.select(|n| *n).await, 7);
/// assert_eq!(store.actions(), vec!["loaded"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockStore<S, A> {
    state: Arc<RwLock<S>>,
    actions: Arc<RwLock<Vec<A>>>,
    closed: Arc<AtomicBool>,
}

impl<S, A> Clone for MockStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            actions: Arc::clone(&self.actions),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<S: Default, A> Default for MockStore<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S, A> MockStore<S, A> {
    /// Create a store exposing `state`
    #[must_use]
    pub fn new(state: S) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            actions: Arc::new(RwLock::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the state seen by `select`
    pub fn set_state(&self, state: S) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Reject every further dispatch with [`DispatchError::Closed`]
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Forget recorded actions
    pub fn clear(&self) {
        self.actions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Every dispatched action, in order
    #[must_use]
    pub fn actions(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<S, A> Dispatch for MockStore<S, A>
where
    S: Send + Sync,
    A: Send + Sync,
{
    type State = S;
    type Action = A;

    fn dispatch(&self, action: A) -> impl Future<Output = Result<(), DispatchError>> + Send {
        let result = if self.closed.load(Ordering::Acquire) {
            Err(DispatchError::Closed)
        } else {
            self.actions
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(action);
            Ok(())
        };
        std::future::ready(result)
    }

    fn select<F, T>(&self, f: F) -> impl Future<Output = T> + Send
    where
        F: FnOnce(&S) -> T + Send,
        T: Send,
    {
        let value = f(&self.state.read().unwrap_or_else(PoisonError::into_inner));
        std::future::ready(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_order_across_clones() {
        let store = MockStore::<(), u8>::default();
        let clone = store.clone();

        assert_eq!(store.dispatch(1).await, Ok(()));
        assert_eq!(clone.dispatch(2).await, Ok(()));
        assert_eq!(store.actions(), vec![1, 2]);

        store.clear();
        assert!(clone.actions().is_empty());
    }

    #[tokio::test]
    async fn test_closed_store_rejects() {
        let store = MockStore::<(), u8>::default();
        store.close();

        assert_eq!(store.dispatch(1).await, Err(DispatchError::Closed));
        assert!(store.actions().is_empty());
    }

    #[tokio::test]
    async fn test_select_reads_current_state() {
        let store = MockStore::<i64, ()>::new(0);
        store.set_state(3);
        assert_eq!(store.select(|tenant| *tenant).await, 3);
    }
}
