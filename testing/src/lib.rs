//! # Roster Testing
//!
//! Testing utilities and helpers for the roster sync layer.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers, plus effect
//!   [`assertions`]
//! - [`FixedClock`]: deterministic time for reducers that stamp records
//! - [`MockRestClient`]: canned transport answers and a call log
//! - [`MockStore`]: a state container that records dispatched actions
//!
//! ## Example
//!
//! ```ignore
//! use roster_testing::{MockRestClient, MockStore};
//!
//! #[tokio::test]
//! async fn test_refresh() {
//!     let store = MockStore::new(AppState::default());
//!     let client = MockRestClient::new();
//!     client.on_get("/tenant/0/spot/", json!([]));
//!
//!     Operations::new(store.clone(), client).refresh_spot_list().await?;
//!
//!     assert_eq!(store.actions().len(), 3);
//! }
//! ```

use chrono::{DateTime, Utc};
use roster_core::environment::Clock;

pub mod rest_mocks;
pub mod store_mocks;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_testing::mocks::FixedClock;
    /// use roster_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
pub use rest_mocks::{MockRestClient, RestCall};
pub use store_mocks::MockStore;
