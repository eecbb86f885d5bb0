//! # RailReserve
//!
//! Train seat booking desk for Amaravati station.
//!
//! ## Components
//!
//! - [`catalog`]: the trains and seat maps offered at startup
//! - [`inventory`]: seat statuses and availability counts
//! - [`ledger`]: confirmed bookings, newest first
//! - [`selection`]: seats being picked before commit
//! - [`storage`]: the durable booking-list slot
//! - [`assistant`]: travel questions answered by a hosted model
//! - [`desk`]: the reducer tying the above together
//!
//! A commit marks seats BOOKED and records the booking as one step; a
//! cancellation removes the booking and releases its seats the same way.
//! For every train, `available_seats` always equals the number of AVAILABLE
//! seats.
//!
//! ## Example
//!
//! ```ignore
//! let state = BookingDeskState::restore(SeatInventory::new(catalog.trains()), ledger);
//! let store = BookingDeskStore::new(state, BookingDeskReducer::new(), env);
//!
//! store.send(BookingAction::SelectTrain { train_id: TrainId::new("T101") }).await?;
//! store.send(BookingAction::ToggleSeat { seat_number: "1A".into() }).await?;
//! store.send(BookingAction::ConfirmBooking).await?;
//! ```

pub mod assistant;
pub mod catalog;
pub mod config;
pub mod desk;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod selection;
pub mod shell;
pub mod storage;
pub mod types;

pub use catalog::{CatalogProvider, StaticCatalog};
pub use config::Config;
pub use desk::{
    BookingAction, BookingDeskEnvironment, BookingDeskReducer, BookingDeskState, BookingDeskStore,
};
pub use error::{BookingError, StorageError};
pub use inventory::{RestoreReport, SeatInventory};
pub use ledger::{BookingLedger, CancelledBooking};
pub use selection::SelectionSession;
pub use storage::{FileStore, KeyValueStore, LedgerStore, MemoryStore};
pub use types::{Booking, BookingId, Money, Seat, SeatId, SeatStatus, Train, TrainId};
