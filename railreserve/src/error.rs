//! Error types for the booking desk.
//!
//! Every variant is local and recoverable: a failed command leaves inventory
//! and ledger untouched and is reported back to the caller.

use crate::types::{BookingId, SeatStatus, TrainId};
use thiserror::Error;

/// Reasons a booking-desk command is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Referenced train is not in the catalog
    #[error("Train {0} not found")]
    UnknownTrain(TrainId),

    /// Referenced booking is not in the ledger
    #[error("Booking {0} not found")]
    UnknownBooking(BookingId),

    /// Seat number does not exist on the train
    #[error("Seat {seat_number} does not exist on train {train_id}")]
    UnknownSeat {
        /// Train searched
        train_id: TrainId,
        /// Seat number requested
        seat_number: String,
    },

    /// Seat exists but is not AVAILABLE
    #[error("Seat {seat_number} on train {train_id} is {status}")]
    SeatUnavailable {
        /// Train the seat belongs to
        train_id: TrainId,
        /// Seat number requested
        seat_number: String,
        /// Status that blocked the request
        status: SeatStatus,
    },

    /// Same seat listed twice in one commit
    #[error("Seat {seat_number} requested more than once")]
    DuplicateSeat {
        /// Repeated seat number
        seat_number: String,
    },

    /// Commit with no seats
    #[error("No seats selected")]
    EmptySelection,

    /// Seat toggled or booking confirmed before picking a train
    #[error("No train selected")]
    NoTrainSelected,
}

/// Failures of the durable key-value slot
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        /// Slot being accessed
        key: String,
        /// Cause
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be mapped to a slot
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Stored or outgoing payload is not a valid booking list
    #[error("Booking list serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
