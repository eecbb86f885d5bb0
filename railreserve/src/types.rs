//! Domain types for the booking desk.
//!
//! Trains and their seats are mutable inventory; bookings are immutable
//! snapshots taken at commit time and never recomputed from the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Catalog identifier of a train (e.g. `T101`)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainId(String);

impl TrainId {
    /// Creates a `TrainId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque seat identity, distinct from the display number
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(String);

impl SeatId {
    /// Creates a `SeatId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Booking reference shown to the customer (`BK-…`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Wraps an existing reference, e.g. one typed by the user
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh reference, unique for the life of the process
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("BK-{}", Uuid::new_v4().simple()).to_uppercase())
    }

    /// Borrow the raw reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money
// ============================================================================

/// Fare amount in whole rupees
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero rupees
    pub const ZERO: Self = Self(0);

    /// Creates an amount from whole rupees
    #[must_use]
    pub const fn rupees(amount: u64) -> Self {
        Self(amount)
    }

    /// The amount in whole rupees
    #[must_use]
    pub const fn as_rupees(self) -> u64 {
        self.0
    }

    /// Price of `count` units at this fare
    #[must_use]
    pub const fn times(self, count: usize) -> Self {
        Self(self.0.saturating_mul(count as u64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹ {}", self.0)
    }
}

// ============================================================================
// Seats and trains
// ============================================================================

/// Bookability of a single seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    /// Free to select and book
    Available,
    /// Sold through this desk
    Booked,
    /// Held by another channel; never bookable here
    Reserved,
}

impl SeatStatus {
    /// True only for [`SeatStatus::Available`]
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Available => "AVAILABLE",
            Self::Booked => "BOOKED",
            Self::Reserved => "RESERVED",
        };
        f.write_str(label)
    }
}

/// One seat on a train
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Opaque identity
    pub id: SeatId,
    /// Display number derived from row and column (`3B`)
    pub number: String,
    /// Current status; changed only through the seat inventory
    pub status: SeatStatus,
}

impl Seat {
    /// Creates a seat
    #[must_use]
    pub fn new(id: SeatId, number: impl Into<String>, status: SeatStatus) -> Self {
        Self {
            id,
            number: number.into(),
            status,
        }
    }

    /// Display number for a 1-based position in a row-major map of `per_row` columns
    #[must_use]
    pub fn number_for(position: usize, per_row: usize) -> String {
        let per_row = per_row.max(1);
        let index = position.saturating_sub(1);
        let row = index / per_row + 1;
        let column = char::from(b'A' + u8::try_from(index % per_row).unwrap_or(0));
        format!("{row}{column}")
    }
}

/// A scheduled departure with its seat map
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    /// Catalog identity
    pub id: TrainId,
    /// Display name
    pub name: String,
    /// Route code printed on the ticket
    pub number: String,
    /// Origin station
    #[serde(rename = "from")]
    pub origin: String,
    /// Destination station
    #[serde(rename = "to")]
    pub destination: String,
    /// Scheduled departure, local display string
    pub departure_time: String,
    /// Scheduled arrival, local display string
    pub arrival_time: String,
    /// Fare per seat
    pub price: Money,
    /// Number of seats whose status is AVAILABLE
    pub available_seats: usize,
    /// Seat map in display order
    pub seats: Vec<Seat>,
}

impl Train {
    /// Creates a train; `available_seats` is derived from the seat statuses
    #[must_use]
    #[allow(clippy::too_many_arguments)] // Mirrors the catalog record one-to-one
    pub fn new(
        id: TrainId,
        name: impl Into<String>,
        number: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_time: impl Into<String>,
        arrival_time: impl Into<String>,
        price: Money,
        seats: Vec<Seat>,
    ) -> Self {
        let mut train = Self {
            id,
            name: name.into(),
            number: number.into(),
            origin: origin.into(),
            destination: destination.into(),
            departure_time: departure_time.into(),
            arrival_time: arrival_time.into(),
            price,
            available_seats: 0,
            seats,
        };
        train.recount();
        train
    }

    /// Seat with the given display number
    #[must_use]
    pub fn seat(&self, number: &str) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.number == number)
    }

    /// Number of seats currently AVAILABLE, counted from the seat map
    #[must_use]
    pub fn count_available(&self) -> usize {
        self.seats
            .iter()
            .filter(|seat| seat.status.is_available())
            .count()
    }

    /// Re-derive `available_seats` from the seat map
    pub fn recount(&mut self) {
        self.available_seats = self.count_available();
    }

    /// Whether the stored count agrees with the seat map
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.available_seats == self.count_available()
    }

    /// Case-insensitive match on destination or name; an empty term matches
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.destination.to_lowercase().contains(&term)
            || self.name.to_lowercase().contains(&term)
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// A confirmed booking.
///
/// Every field is a snapshot taken at commit time. Field names on the wire
/// follow the stored booking-list schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking reference
    pub id: BookingId,
    /// Train the seats belong to
    pub train_id: TrainId,
    /// Train name at booking time
    pub train_name: String,
    /// Seat numbers in selection order
    pub seat_numbers: Vec<String>,
    /// `seat_numbers.len() × fare` at booking time
    pub total_price: Money,
    /// Booking date, display string
    pub date: String,
    /// Customer the booking is held for
    pub customer_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(number: &str, status: SeatStatus) -> Seat {
        Seat::new(SeatId::new(format!("seat-{number}")), number, status)
    }

    #[test]
    fn test_seat_numbers_follow_rows_of_four() {
        assert_eq!(Seat::number_for(1, 4), "1A");
        assert_eq!(Seat::number_for(4, 4), "1D");
        assert_eq!(Seat::number_for(5, 4), "2A");
        assert_eq!(Seat::number_for(40, 4), "10D");
    }

    #[test]
    fn test_train_new_derives_available_count() {
        let train = Train::new(
            TrainId::new("T1"),
            "Test Express",
            "10001",
            "Amaravati",
            "Pune",
            "21:30",
            "08:45",
            Money::rupees(850),
            vec![
                seat("1A", SeatStatus::Available),
                seat("1B", SeatStatus::Booked),
                seat("1C", SeatStatus::Reserved),
                seat("1D", SeatStatus::Available),
            ],
        );

        assert_eq!(train.available_seats, 2);
        assert!(train.is_consistent());
        assert_eq!(train.seat("1C").map(|s| s.status), Some(SeatStatus::Reserved));
        assert!(train.seat("9Z").is_none());
    }

    #[test]
    fn test_train_matches_destination_or_name() {
        let train = Train::new(
            TrainId::new("T1"),
            "Amaravati-Mumbai Superfast",
            "12159",
            "Amaravati",
            "Mumbai",
            "19:00",
            "06:15",
            Money::rupees(1250),
            Vec::new(),
        );

        assert!(train.matches(""));
        assert!(train.matches("mum"));
        assert!(train.matches("SUPERFAST"));
        assert!(!train.matches("Delhi"));
    }

    #[test]
    fn test_money_display_and_multiplication() {
        assert_eq!(Money::rupees(850).times(2), Money::rupees(1700));
        assert_eq!(Money::rupees(850).times(0), Money::ZERO);
        assert_eq!(Money::rupees(u64::MAX).times(2), Money::rupees(u64::MAX));
        assert_eq!(Money::rupees(1700).to_string(), "₹ 1700");
    }

    #[test]
    fn test_generated_booking_ids_are_unique() {
        let first = BookingId::generate();
        let second = BookingId::generate();

        assert_ne!(first, second);
        assert!(first.as_str().starts_with("BK-"));
        assert_eq!(first.as_str().len(), 35);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_booking_uses_stored_field_names() {
        let booking = Booking {
            id: BookingId::new("BK-1"),
            train_id: TrainId::new("T101"),
            train_name: "Amaravati-Pune Express".to_string(),
            seat_numbers: vec!["1A".to_string(), "1B".to_string()],
            total_price: Money::rupees(1700),
            date: "01 Jan 2025".to_string(),
            customer_name: "Guest User".to_string(),
        };

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["trainId"], "T101");
        assert_eq!(json["seatNumbers"][1], "1B");
        assert_eq!(json["totalPrice"], 1700);
        assert_eq!(json["customerName"], "Guest User");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_seat_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&SeatStatus::Available).unwrap(),
            r#""AVAILABLE""#
        );
        let status: SeatStatus = serde_json::from_str(r#""RESERVED""#).unwrap();
        assert_eq!(status, SeatStatus::Reserved);
    }
}
