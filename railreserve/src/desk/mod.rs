//! Booking Desk: the orchestration layer over inventory, ledger and selection.
//!
//! Commands are validated and applied synchronously by
//! [`BookingDeskReducer`]. Persisting the ledger and calling the travel
//! assistant are returned as effects built by [`BookingDeskEnvironment`].
//! Booking events are fed back through the store for observers; the state
//! change they describe has already happened by then. Assistant replies are
//! the exception and are applied when they arrive.

mod environment;
mod reducer;

pub use environment::{BookingDeskEnvironment, DEFAULT_ASSISTANT_TIMEOUT, DEFAULT_CUSTOMER_NAME};
pub use reducer::BookingDeskReducer;

use crate::error::BookingError;
use crate::inventory::SeatInventory;
use crate::ledger::BookingLedger;
use crate::selection::SelectionSession;
use crate::types::{Booking, BookingId, Train, TrainId};
use railreserve_runtime::Store;
use std::collections::HashMap;

/// Notice shown after a successful booking
pub const BOOKING_CONFIRMED_NOTICE: &str = "Booking successful! View your tickets in My Bookings.";

/// Notice shown after a cancellation
pub const BOOKING_CANCELLED_NOTICE: &str =
    "Booking cancelled successfully. Refund processed to original mode.";

/// Store running the booking desk
pub type BookingDeskStore =
    Store<BookingDeskState, BookingAction, BookingDeskEnvironment, BookingDeskReducer>;

// ============================================================================
// State
// ============================================================================

/// Conversation state of the travel assistant panel
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssistantPanel {
    /// Id the next question will get
    pub next_query_id: u64,
    /// Question awaiting an answer; later answers to older ids are dropped
    pub pending: Option<u64>,
    /// Last question asked
    pub last_query: Option<String>,
    /// Answer to the last question
    pub reply: Option<String>,
}

impl AssistantPanel {
    /// Whether a question is awaiting its answer
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether `query_id` belongs to the most recent question.
    ///
    /// Holds whether or not its answer has been applied yet.
    #[must_use]
    pub const fn is_latest(&self, query_id: u64) -> bool {
        self.next_query_id == query_id + 1
    }
}

/// Everything the booking desk owns
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingDeskState {
    /// Trains and seat statuses
    pub inventory: SeatInventory,
    /// Confirmed bookings
    pub ledger: BookingLedger,
    /// Seats being picked
    pub selection: SelectionSession,
    /// Current catalog filter
    pub search_term: String,
    /// Travel assistant panel
    pub assistant: AssistantPanel,
    /// Why the last command was rejected
    pub last_error: Option<BookingError>,
    /// Confirmation of the last booking or cancellation
    pub last_notice: Option<String>,
    /// Seats restored bookings list but never held; cancelling leaves them alone
    pub unheld_seats: HashMap<BookingId, Vec<String>>,
}

impl BookingDeskState {
    /// Desk over `inventory` and a rehydrated `ledger`.
    ///
    /// Seats held by stored bookings are marked BOOKED in the inventory.
    /// Seats a booking lists but cannot claim are remembered so that
    /// cancelling it never frees a seat someone else holds.
    #[must_use]
    pub fn restore(mut inventory: SeatInventory, ledger: BookingLedger) -> Self {
        let report = inventory.restore_bookings(ledger.list());
        tracing::info!(
            bookings = ledger.len(),
            seats = report.claimed,
            unheld = report.unheld_count(),
            "Booking desk restored"
        );

        Self {
            inventory,
            ledger,
            unheld_seats: report.unheld,
            ..Self::default()
        }
    }

    /// Trains matching the current search term
    #[must_use]
    pub fn visible_trains(&self) -> Vec<&Train> {
        self.inventory.search(&self.search_term).collect()
    }

    /// Train whose seat map is open, if any
    #[must_use]
    pub fn selected_train(&self) -> Option<&Train> {
        self.selection
            .train_id()
            .and_then(|id| self.inventory.train(id))
    }
}

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Inputs to the booking desk
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingAction {
    // Commands
    /// Open a train's seat map, dropping any previous selection
    SelectTrain {
        /// Train to browse
        train_id: TrainId,
    },
    /// Add or remove a seat from the selection
    ToggleSeat {
        /// Seat display number
        seat_number: String,
    },
    /// Close the seat map and drop the selection
    ClearSelection,
    /// Book the selected seats
    ConfirmBooking,
    /// Cancel a booking and release its seats
    CancelBooking {
        /// Booking to cancel
        booking_id: BookingId,
    },
    /// Filter the catalog by destination or name
    SearchTrains {
        /// Filter text; empty shows every train
        term: String,
    },
    /// Ask the travel assistant a question
    AskAssistant {
        /// Free-text question
        query: String,
    },

    // Events
    /// A booking was committed
    BookingConfirmed {
        /// The new booking
        booking: Booking,
    },
    /// A booking was cancelled and its seats released
    BookingCancelled {
        /// Cancelled booking
        booking_id: BookingId,
        /// Train the seats were on
        train_id: TrainId,
        /// Seats set back to AVAILABLE
        seat_numbers: Vec<String>,
    },
    /// The travel assistant answered
    AssistantReplied {
        /// Question the answer belongs to
        query_id: u64,
        /// Answer, or the fallback text
        text: String,
    },
    /// A command was rejected without changing inventory or ledger
    ValidationFailed {
        /// Reason
        error: BookingError,
    },
}
