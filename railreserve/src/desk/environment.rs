//! Injected collaborators of the booking desk

use super::BookingAction;
use crate::assistant::{ask_with_fallback, AssistantRequest, TravelAssistant};
use crate::ledger::LedgerSnapshot;
use crate::storage::LedgerStore;
use railreserve_core::effect::Effect;
use railreserve_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Customer name used when none is configured
pub const DEFAULT_CUSTOMER_NAME: &str = "Guest User";

/// How long to wait for the assistant by default
pub const DEFAULT_ASSISTANT_TIMEOUT: Duration = Duration::from_secs(20);

const BOOKING_DATE_FORMAT: &str = "%d %b %Y";

/// Environment dependencies for the booking desk reducer
#[derive(Clone)]
pub struct BookingDeskEnvironment {
    /// Source of booking dates
    pub clock: Arc<dyn Clock>,
    /// Travel assistant gateway
    pub assistant: Arc<dyn TravelAssistant>,
    /// Durable booking list
    pub ledger_store: Arc<LedgerStore>,
    /// Name written on every booking
    pub customer_name: String,
    /// Upper bound on one assistant call
    pub assistant_timeout: Duration,
}

impl BookingDeskEnvironment {
    /// Environment with the default customer name and assistant timeout
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        assistant: Arc<dyn TravelAssistant>,
        ledger_store: Arc<LedgerStore>,
    ) -> Self {
        Self {
            clock,
            assistant,
            ledger_store,
            customer_name: DEFAULT_CUSTOMER_NAME.to_string(),
            assistant_timeout: DEFAULT_ASSISTANT_TIMEOUT,
        }
    }

    /// Builder: Set customer name
    #[must_use]
    pub fn with_customer_name(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = customer_name.into();
        self
    }

    /// Builder: Set assistant timeout
    #[must_use]
    pub const fn with_assistant_timeout(mut self, timeout: Duration) -> Self {
        self.assistant_timeout = timeout;
        self
    }

    /// Today's date as printed on a ticket (`05 Mar 2025`)
    #[must_use]
    pub fn booking_date(&self) -> String {
        self.clock.now().format(BOOKING_DATE_FORMAT).to_string()
    }

    /// Write `snapshot` to storage, then announce `event`.
    ///
    /// A failed write is logged; the in-memory ledger stays authoritative and
    /// the next mutation writes the full list again.
    #[must_use]
    pub fn persist_bookings(
        &self,
        snapshot: LedgerSnapshot,
        event: BookingAction,
    ) -> Effect<BookingAction> {
        let ledger_store = Arc::clone(&self.ledger_store);
        Effect::future(async move {
            let revision = snapshot.revision;
            if let Err(e) = ledger_store.save(snapshot).await {
                tracing::error!(error = %e, revision, "Failed to persist bookings");
            }
            Some(event)
        })
    }

    /// Ask the assistant and report the answer as `AssistantReplied`
    #[must_use]
    pub fn ask_assistant(&self, query_id: u64, request: AssistantRequest) -> Effect<BookingAction> {
        let assistant = Arc::clone(&self.assistant);
        let timeout = self.assistant_timeout;
        Effect::future(async move {
            let text = ask_with_fallback(assistant.as_ref(), request, timeout).await;
            Some(BookingAction::AssistantReplied { query_id, text })
        })
    }
}

impl std::fmt::Debug for BookingDeskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingDeskEnvironment")
            .field("customer_name", &self.customer_name)
            .field("assistant_timeout", &self.assistant_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::OfflineAssistant;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use railreserve_testing::FixedClock;

    fn env_at(clock: FixedClock) -> BookingDeskEnvironment {
        BookingDeskEnvironment::new(
            Arc::new(clock),
            Arc::new(OfflineAssistant),
            Arc::new(LedgerStore::new(Arc::new(MemoryStore::new()))),
        )
    }

    #[test]
    fn test_booking_date_format() {
        let Some(noon) = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).single() else {
            unreachable!("valid calendar date");
        };
        assert_eq!(env_at(FixedClock::new(noon)).booking_date(), "05 Mar 2025");
    }

    #[test]
    fn test_defaults_and_builders() {
        let env = env_at(railreserve_testing::test_clock());
        assert_eq!(env.customer_name, DEFAULT_CUSTOMER_NAME);
        assert_eq!(env.assistant_timeout, DEFAULT_ASSISTANT_TIMEOUT);

        let env = env
            .with_customer_name("Asha Patil")
            .with_assistant_timeout(Duration::from_secs(3));
        assert_eq!(env.customer_name, "Asha Patil");
        assert_eq!(env.assistant_timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_persist_effect_writes_then_announces() {
        let memory = Arc::new(MemoryStore::new());
        let env = BookingDeskEnvironment::new(
            Arc::new(railreserve_testing::test_clock()),
            Arc::new(OfflineAssistant),
            Arc::new(LedgerStore::new(memory.clone())),
        );
        let snapshot = LedgerSnapshot {
            revision: 1,
            bookings: Vec::new(),
        };
        let event = BookingAction::ClearSelection;

        let Effect::Future(fut) = env.persist_bookings(snapshot, event.clone()) else {
            unreachable!("persistence is a future effect");
        };
        assert_eq!(fut.await, Some(event));

        let stored = crate::storage::KeyValueStore::get(memory.as_ref(), crate::storage::BOOKINGS_KEY)
            .await
            .ok()
            .flatten();
        assert_eq!(stored.as_deref(), Some("[]"));
    }
}
