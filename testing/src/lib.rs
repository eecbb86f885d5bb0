//! # RailReserve Testing
//!
//! Helpers for testing reducers without a runtime:
//!
//! - [`ReducerTest`]: Given/When/Then harness around a single `reduce` call
//! - [`assertions`]: checks over the returned effects
//! - [`mocks::FixedClock`]: deterministic time for booking dates
//!
//! ## Example
//!
//! ```ignore
//! use railreserve_testing::{assertions, test_clock, ReducerTest};
//!
//! ReducerTest::new(BookingDeskReducer::new())
//!     .with_env(test_environment())
//!     .given_state(state_with_selection())
//!     .when_action(BookingAction::ConfirmBooking)
//!     .then_state(|state| assert_eq!(state.ledger.len(), 1))
//!     .then_effects(assertions::assert_has_future_effect)
//!     .run();
//! ```


/// Mock implementations of environment traits
pub mod mocks {
    use chrono::{DateTime, TimeZone, Utc};
    use railreserve_core::environment::Clock;

    /// Clock frozen at a single instant
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

    /// Fixed clock at 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        )
    }
}

pub use mocks::{test_clock, FixedClock};
pub use reducer_test::{assertions, ReducerTest};
