//! Booking Ledger.
//!
//! Owns the list of confirmed bookings, newest first. The ledger never
//! touches seat inventory: `create` is called only after the inventory
//! accepted the commit, and `cancel` hands back what the caller must release.

use crate::types::{Booking, BookingId, Money, Train, TrainId};
use serde::{Deserialize, Serialize};

/// What a cancellation removed, for releasing the seats
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancelledBooking {
    /// Train the seats were held on
    pub train_id: TrainId,
    /// Seat numbers to release
    pub seat_numbers: Vec<String>,
}

/// Point-in-time copy of the ledger, written to storage
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Ledger revision the copy was taken at
    pub revision: u64,
    /// Bookings, newest first
    pub bookings: Vec<Booking>,
}

/// Ordered booking history.
///
/// Serializes as a bare array of bookings, the stored slot's schema.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
    #[serde(skip)]
    revision: u64,
}

impl BookingLedger {
    /// Empty ledger at revision 0
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bookings: Vec::new(),
            revision: 0,
        }
    }

    /// Ledger holding previously persisted bookings, in stored order
    #[must_use]
    pub const fn from_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings,
            revision: 0,
        }
    }

    /// Record a booking for `seat_numbers` on `train` and put it first.
    ///
    /// Name, seat numbers and total price are copied from `train` now and
    /// never recomputed.
    pub fn create(
        &mut self,
        train: &Train,
        seat_numbers: Vec<String>,
        date: impl Into<String>,
        customer_name: impl Into<String>,
    ) -> Booking {
        let booking = Booking {
            id: BookingId::generate(),
            train_id: train.id.clone(),
            train_name: train.name.clone(),
            total_price: train.price.times(seat_numbers.len()),
            seat_numbers,
            date: date.into(),
            customer_name: customer_name.into(),
        };

        self.bookings.insert(0, booking.clone());
        self.revision += 1;
        booking
    }

    /// Remove a booking, returning the seats it held.
    ///
    /// `None` means the id was not found and nothing changed.
    pub fn cancel(&mut self, booking_id: &BookingId) -> Option<CancelledBooking> {
        let index = self.bookings.iter().position(|b| &b.id == booking_id)?;
        let removed = self.bookings.remove(index);
        self.revision += 1;

        Some(CancelledBooking {
            train_id: removed.train_id,
            seat_numbers: removed.seat_numbers,
        })
    }

    /// Bookings, most recent first
    #[must_use]
    pub fn list(&self) -> &[Booking] {
        &self.bookings
    }

    /// Look up one booking
    #[must_use]
    pub fn get(&self, booking_id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| &b.id == booking_id)
    }

    /// Number of bookings held
    #[must_use]
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// True when there are no bookings
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    /// Mutation counter, bumped by every create and cancel
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Sum of every booking's snapshotted price
    #[must_use]
    pub fn total_spent(&self) -> Money {
        Money::rupees(self.bookings.iter().map(|b| b.total_price.as_rupees()).sum())
    }

    /// Copy for persistence
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            revision: self.revision,
            bookings: self.bookings.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::types::{Seat, SeatId, SeatStatus};

    fn pune_express(price: u64) -> Train {
        Train::new(
            TrainId::new("T101"),
            "Amaravati-Pune Express",
            "12158",
            "Amaravati",
            "Pune",
            "21:30",
            "08:45",
            Money::rupees(price),
            vec![Seat::new(SeatId::new("seat-1"), "1A", SeatStatus::Available)],
        )
    }

    fn seats(numbers: &[&str]) -> Vec<String> {
        numbers.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_create_prepends_snapshot() {
        let mut ledger = BookingLedger::new();
        let train = pune_express(850);

        let first = ledger.create(&train, seats(&["1A", "1B"]), "01 Jan 2025", "Guest User");
        let second = ledger.create(&train, seats(&["2A"]), "02 Jan 2025", "Guest User");

        assert_eq!(first.total_price, Money::rupees(1700));
        assert_eq!(first.train_name, "Amaravati-Pune Express");
        assert_eq!(ledger.list()[0].id, second.id);
        assert_eq!(ledger.list()[1].id, first.id);
        assert_eq!(ledger.revision(), 2);
    }

    #[test]
    fn test_booking_price_is_not_recomputed() {
        let mut ledger = BookingLedger::new();
        let mut train = pune_express(850);

        let booking = ledger.create(&train, seats(&["1A"]), "01 Jan 2025", "Guest User");
        train.price = Money::rupees(999);
        train.name = "Renamed".to_string();

        let stored = ledger.get(&booking.id).unwrap();
        assert_eq!(stored.total_price, Money::rupees(850));
        assert_eq!(stored.train_name, "Amaravati-Pune Express");
    }

    #[test]
    fn test_cancel_returns_seats_and_forgets_booking() {
        let mut ledger = BookingLedger::new();
        let booking = ledger.create(&pune_express(850), seats(&["1A", "1B"]), "d", "c");

        let cancelled = ledger.cancel(&booking.id).unwrap();

        assert_eq!(cancelled.train_id, TrainId::new("T101"));
        assert_eq!(cancelled.seat_numbers, seats(&["1A", "1B"]));
        assert!(ledger.is_empty());
        assert!(ledger.get(&booking.id).is_none());
        assert_eq!(ledger.revision(), 2);
    }

    #[test]
    fn test_cancel_unknown_is_noop() {
        let mut ledger = BookingLedger::new();
        ledger.create(&pune_express(850), seats(&["1A"]), "d", "c");
        let before = ledger.clone();

        assert!(ledger.cancel(&BookingId::new("BK-missing")).is_none());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_serde_round_trip_preserves_order() {
        let mut ledger = BookingLedger::new();
        let train = pune_express(850);
        ledger.create(&train, seats(&["1A"]), "01 Jan 2025", "Guest User");
        ledger.create(&train, seats(&["2A", "2B"]), "02 Jan 2025", "Guest User");

        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.starts_with('['));

        let restored: BookingLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.list(), ledger.list());
    }

    #[test]
    fn test_total_spent_and_snapshot() {
        let mut ledger = BookingLedger::new();
        let train = pune_express(850);
        ledger.create(&train, seats(&["1A"]), "d", "c");
        ledger.create(&train, seats(&["2A", "2B"]), "d", "c");

        assert_eq!(ledger.total_spent(), Money::rupees(2550));

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.revision, 2);
        assert_eq!(snapshot.bookings, ledger.list());
    }
}
