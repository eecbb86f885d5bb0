//! Seat Inventory Manager.
//!
//! Sole owner of seat statuses. Every mutation validates the whole request
//! before touching a seat, then recounts `available_seats` from the seat map
//! so the count can never drift from the statuses it summarises.

use crate::error::BookingError;
use crate::types::{Booking, BookingId, SeatStatus, Train, TrainId};
use std::collections::{HashMap, HashSet};

/// What [`SeatInventory::restore_bookings`] could re-apply
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Seats marked BOOKED
    pub claimed: usize,
    /// Seat numbers each booking lists but does not hold on the seat map
    pub unheld: HashMap<BookingId, Vec<String>>,
}

impl RestoreReport {
    fn mark_unheld(&mut self, booking: &Booking, seats: impl IntoIterator<Item = String>) {
        let mut seats = seats.into_iter().peekable();
        if seats.peek().is_some() {
            self.unheld.entry(booking.id.clone()).or_default().extend(seats);
        }
    }

    /// Number of listed seats no booking holds
    #[must_use]
    pub fn unheld_count(&self) -> usize {
        self.unheld.values().map(Vec::len).sum()
    }
}

/// Per-train seat statuses and availability counts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeatInventory {
    trains: Vec<Train>,
}

impl SeatInventory {
    /// Take ownership of the catalog's trains; counts are re-derived
    #[must_use]
    pub fn new(trains: Vec<Train>) -> Self {
        let mut trains = trains;
        for train in &mut trains {
            train.recount();
        }
        Self { trains }
    }

    /// All trains in catalog order
    #[must_use]
    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    /// Look up a train by id
    #[must_use]
    pub fn train(&self, train_id: &TrainId) -> Option<&Train> {
        self.trains.iter().find(|train| &train.id == train_id)
    }

    fn train_mut(&mut self, train_id: &TrainId) -> Result<&mut Train, BookingError> {
        self.trains
            .iter_mut()
            .find(|train| &train.id == train_id)
            .ok_or_else(|| BookingError::UnknownTrain(train_id.clone()))
    }

    /// Mark every seat in `seat_numbers` as BOOKED.
    ///
    /// The request is validated in full before any seat changes, so a
    /// rejected commit leaves the train exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`BookingError::EmptySelection`] if `seat_numbers` is empty
    /// - [`BookingError::UnknownTrain`] if the train is not in the catalog
    /// - [`BookingError::DuplicateSeat`] if a seat number is listed twice
    /// - [`BookingError::UnknownSeat`] if a seat number is not on the train
    /// - [`BookingError::SeatUnavailable`] if a seat is not AVAILABLE
    pub fn commit_booking(
        &mut self,
        train_id: &TrainId,
        seat_numbers: &[String],
    ) -> Result<(), BookingError> {
        if seat_numbers.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        let train = self.train_mut(train_id)?;

        let mut seen = HashSet::with_capacity(seat_numbers.len());
        for number in seat_numbers {
            if !seen.insert(number.as_str()) {
                return Err(BookingError::DuplicateSeat {
                    seat_number: number.clone(),
                });
            }
            let seat = train.seat(number).ok_or_else(|| BookingError::UnknownSeat {
                train_id: train_id.clone(),
                seat_number: number.clone(),
            })?;
            if !seat.status.is_available() {
                return Err(BookingError::SeatUnavailable {
                    train_id: train_id.clone(),
                    seat_number: number.clone(),
                    status: seat.status,
                });
            }
        }

        for seat in &mut train.seats {
            if seen.contains(seat.number.as_str()) {
                seat.status = SeatStatus::Booked;
            }
        }
        train.recount();

        tracing::debug!(
            train_id = %train_id,
            seats = seat_numbers.len(),
            available = train.available_seats,
            "Seats booked"
        );
        Ok(())
    }

    /// Set the named seats back to AVAILABLE.
    ///
    /// Seats are matched by number without checking their current status;
    /// numbers no longer present on the train are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::UnknownTrain`] if the train is not in the catalog.
    pub fn release_seats(
        &mut self,
        train_id: &TrainId,
        seat_numbers: &[String],
    ) -> Result<(), BookingError> {
        let train = self.train_mut(train_id)?;

        for number in seat_numbers {
            match train.seats.iter_mut().find(|seat| &seat.number == number) {
                Some(seat) => seat.status = SeatStatus::Available,
                None => tracing::warn!(
                    train_id = %train_id,
                    seat_number = %number,
                    "Released seat no longer exists on train"
                ),
            }
        }
        train.recount();

        tracing::debug!(
            train_id = %train_id,
            seats = seat_numbers.len(),
            available = train.available_seats,
            "Seats released"
        );
        Ok(())
    }

    /// Re-apply persisted bookings to a freshly generated seat map.
    ///
    /// Seats that are still AVAILABLE become BOOKED. Anything else (unknown
    /// train, missing seat, seat already taken) is logged, left alone and
    /// listed in the report as not held by that booking.
    pub fn restore_bookings(&mut self, bookings: &[Booking]) -> RestoreReport {
        let mut report = RestoreReport::default();

        for booking in bookings {
            let Ok(train) = self.train_mut(&booking.train_id) else {
                tracing::warn!(
                    booking_id = %booking.id,
                    train_id = %booking.train_id,
                    "Stored booking refers to a train not in the catalog"
                );
                report.mark_unheld(booking, booking.seat_numbers.iter().cloned());
                continue;
            };

            let mut unheld = Vec::new();
            for number in &booking.seat_numbers {
                match train.seats.iter_mut().find(|seat| &seat.number == number) {
                    Some(seat) if seat.status.is_available() => {
                        seat.status = SeatStatus::Booked;
                        report.claimed += 1;
                    },
                    Some(seat) => {
                        tracing::warn!(
                            booking_id = %booking.id,
                            seat_number = %number,
                            status = %seat.status,
                            "Stored booking seat already taken"
                        );
                        unheld.push(number.clone());
                    },
                    None => {
                        tracing::warn!(
                            booking_id = %booking.id,
                            seat_number = %number,
                            "Stored booking seat does not exist"
                        );
                        unheld.push(number.clone());
                    },
                }
            }
            train.recount();
            report.mark_unheld(booking, unheld);
        }

        report
    }

    /// Trains whose destination or name contains `term`, case-insensitively
    pub fn search<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a Train> + 'a {
        self.trains.iter().filter(move |train| train.matches(term))
    }

    /// One-line route list handed to the travel assistant
    #[must_use]
    pub fn context_summary(&self) -> String {
        self.trains
            .iter()
            .map(|train| {
                format!(
                    "{} ({} to {})",
                    train.name, train.origin, train.destination
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether every train's count agrees with its seat map
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.trains.iter().all(Train::is_consistent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::types::{BookingId, Money, Seat, SeatId};
    use proptest::prelude::*;

    fn train(id: &str, statuses: &[SeatStatus]) -> Train {
        let seats = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let number = Seat::number_for(i + 1, 4);
                Seat::new(SeatId::new(format!("seat-{id}-{number}")), number, *status)
            })
            .collect();
        Train::new(
            TrainId::new(id),
            format!("Amaravati-{id} Express"),
            "12158",
            "Amaravati",
            "Pune",
            "21:30",
            "08:45",
            Money::rupees(850),
            seats,
        )
    }

    fn seats(numbers: &[&str]) -> Vec<String> {
        numbers.iter().map(ToString::to_string).collect()
    }

    fn status_of(inventory: &SeatInventory, train_id: &str, number: &str) -> SeatStatus {
        inventory
            .train(&TrainId::new(train_id))
            .and_then(|t| t.seat(number))
            .map(|s| s.status)
            .unwrap()
    }

    fn sample() -> SeatInventory {
        use SeatStatus::{Available, Booked, Reserved};
        SeatInventory::new(vec![
            train("T1", &[Available, Available, Booked, Reserved]),
            train("T2", &[Available, Available, Available, Available]),
        ])
    }

    #[test]
    fn test_commit_books_every_seat() {
        let mut inventory = sample();

        inventory
            .commit_booking(&TrainId::new("T1"), &seats(&["1A", "1B"]))
            .unwrap();

        assert_eq!(status_of(&inventory, "T1", "1A"), SeatStatus::Booked);
        assert_eq!(status_of(&inventory, "T1", "1B"), SeatStatus::Booked);
        assert_eq!(inventory.train(&TrainId::new("T1")).unwrap().available_seats, 0);
        assert!(inventory.is_consistent());
    }

    #[test]
    fn test_commit_is_all_or_nothing() {
        let mut inventory = sample();
        let before = inventory.clone();

        let err = inventory
            .commit_booking(&TrainId::new("T1"), &seats(&["1A", "1C"]))
            .unwrap_err();

        assert_eq!(
            err,
            BookingError::SeatUnavailable {
                train_id: TrainId::new("T1"),
                seat_number: "1C".to_string(),
                status: SeatStatus::Booked,
            }
        );
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_commit_rejects_reserved_seat() {
        let mut inventory = sample();
        let result = inventory.commit_booking(&TrainId::new("T1"), &seats(&["1D"]));
        assert!(matches!(
            result,
            Err(BookingError::SeatUnavailable { status: SeatStatus::Reserved, .. })
        ));
    }

    #[test]
    fn test_commit_rejects_bad_requests() {
        let mut inventory = sample();
        let before = inventory.clone();

        assert_eq!(
            inventory.commit_booking(&TrainId::new("T1"), &[]),
            Err(BookingError::EmptySelection)
        );
        assert_eq!(
            inventory.commit_booking(&TrainId::new("T9"), &seats(&["1A"])),
            Err(BookingError::UnknownTrain(TrainId::new("T9")))
        );
        assert_eq!(
            inventory.commit_booking(&TrainId::new("T2"), &seats(&["1A", "1A"])),
            Err(BookingError::DuplicateSeat {
                seat_number: "1A".to_string()
            })
        );
        assert!(matches!(
            inventory.commit_booking(&TrainId::new("T2"), &seats(&["1A", "7Z"])),
            Err(BookingError::UnknownSeat { .. })
        ));
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_release_restores_pre_booking_state() {
        let mut inventory = sample();
        let before = inventory.clone();
        let train_id = TrainId::new("T2");

        inventory.commit_booking(&train_id, &seats(&["2A", "1C"])).unwrap();
        inventory.release_seats(&train_id, &seats(&["2A", "1C"])).unwrap();

        assert_eq!(inventory, before);
    }

    #[test]
    fn test_release_skips_missing_seats_and_unknown_train() {
        let mut inventory = sample();
        let train_id = TrainId::new("T1");

        inventory.release_seats(&train_id, &seats(&["1C", "9Z"])).unwrap();
        assert_eq!(status_of(&inventory, "T1", "1C"), SeatStatus::Available);
        assert_eq!(inventory.train(&train_id).unwrap().available_seats, 3);

        assert_eq!(
            inventory.release_seats(&TrainId::new("T9"), &seats(&["1A"])),
            Err(BookingError::UnknownTrain(TrainId::new("T9")))
        );
    }

    #[test]
    fn test_restore_bookings_only_claims_available_seats() {
        let mut inventory = sample();
        let booking = Booking {
            id: BookingId::new("BK-1"),
            train_id: TrainId::new("T1"),
            train_name: "Amaravati-T1 Express".to_string(),
            seat_numbers: seats(&["1A", "1D", "8A"]),
            total_price: Money::rupees(2550),
            date: "01 Jan 2025".to_string(),
            customer_name: "Guest User".to_string(),
        };
        let orphan = Booking {
            id: BookingId::new("BK-2"),
            train_id: TrainId::new("T404"),
            ..booking.clone()
        };

        let report = inventory.restore_bookings(&[booking, orphan]);

        assert_eq!(report.claimed, 1);
        assert_eq!(report.unheld[&BookingId::new("BK-1")], seats(&["1D", "8A"]));
        assert_eq!(report.unheld[&BookingId::new("BK-2")], seats(&["1A", "1D", "8A"]));
        assert_eq!(report.unheld_count(), 5);
        assert_eq!(status_of(&inventory, "T1", "1A"), SeatStatus::Booked);
        assert_eq!(status_of(&inventory, "T1", "1D"), SeatStatus::Reserved);
        assert!(inventory.is_consistent());
    }

    #[test]
    fn test_restore_second_claim_on_same_seat_is_unheld() {
        let mut inventory = sample();
        let first = Booking {
            id: BookingId::new("BK-1"),
            train_id: TrainId::new("T2"),
            train_name: "Amaravati-T2 Express".to_string(),
            seat_numbers: seats(&["1A"]),
            total_price: Money::rupees(850),
            date: "01 Jan 2025".to_string(),
            customer_name: "Guest User".to_string(),
        };
        let second = Booking {
            id: BookingId::new("BK-2"),
            ..first.clone()
        };

        let report = inventory.restore_bookings(&[first, second]);

        assert_eq!(report.claimed, 1);
        assert!(!report.unheld.contains_key(&BookingId::new("BK-1")));
        assert_eq!(report.unheld[&BookingId::new("BK-2")], seats(&["1A"]));
    }

    #[test]
    fn test_search_and_context_summary() {
        let inventory = sample();

        assert_eq!(inventory.search("").count(), 2);
        assert_eq!(inventory.search("t2 exp").map(|t| t.id.as_str()).collect::<Vec<_>>(), ["T2"]);
        assert_eq!(inventory.search("pune").count(), 2);
        assert_eq!(inventory.search("delhi").count(), 0);

        assert_eq!(
            inventory.context_summary(),
            "Amaravati-T1 Express (Amaravati to Pune), Amaravati-T2 Express (Amaravati to Pune)"
        );
    }

    #[test]
    fn test_new_recounts_stale_counts() {
        let mut stale = train("T1", &[SeatStatus::Available, SeatStatus::Booked]);
        stale.available_seats = 40;

        let inventory = SeatInventory::new(vec![stale]);
        assert!(inventory.is_consistent());
        assert_eq!(inventory.trains()[0].available_seats, 1);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Commit(Vec<usize>),
        Release(Vec<usize>),
    }

    fn op() -> impl Strategy<Value = Op> {
        let picks = prop::collection::vec(0usize..8, 0..4);
        prop_oneof![
            picks.clone().prop_map(Op::Commit),
            picks.prop_map(Op::Release),
        ]
    }

    fn status() -> impl Strategy<Value = SeatStatus> {
        prop_oneof![
            Just(SeatStatus::Available),
            Just(SeatStatus::Booked),
            Just(SeatStatus::Reserved),
        ]
    }

    proptest! {
        #[test]
        fn prop_count_matches_statuses(
            statuses in prop::collection::vec(status(), 8),
            ops in prop::collection::vec(op(), 0..30),
        ) {
            let mut inventory = SeatInventory::new(vec![train("T1", &statuses)]);
            let train_id = TrainId::new("T1");

            for op in ops {
                match op {
                    Op::Commit(picks) => {
                        let before = inventory.clone();
                        let numbers: Vec<String> =
                            picks.iter().map(|&i| Seat::number_for(i + 1, 4)).collect();
                        if inventory.commit_booking(&train_id, &numbers).is_err() {
                            prop_assert_eq!(&inventory, &before);
                        }
                    },
                    Op::Release(picks) => {
                        let numbers: Vec<String> =
                            picks.iter().map(|&i| Seat::number_for(i + 1, 4)).collect();
                        prop_assert!(inventory.release_seats(&train_id, &numbers).is_ok());
                    },
                }
                prop_assert!(inventory.is_consistent());
            }
        }
    }
}
