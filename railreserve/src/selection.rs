//! Selection Session: the train and seats being picked before commit.
//!
//! The session keeps its own copy of the chosen train's fare, so
//! `total_price` needs no access to inventory. Seat statuses are checked
//! against the train passed to `toggle_seat`, independent of any UI guard.

use crate::error::BookingError;
use crate::types::{Money, Train, TrainId};

/// In-progress seat choice for one train
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSession {
    train: Option<SelectedTrain>,
    seats: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SelectedTrain {
    id: TrainId,
    price: Money,
}

impl SelectionSession {
    /// Empty session
    #[must_use]
    pub const fn new() -> Self {
        Self {
            train: None,
            seats: Vec::new(),
        }
    }

    /// Switch to `train` and drop any seats picked on the previous one
    pub fn select_train(&mut self, train: &Train) {
        self.train = Some(SelectedTrain {
            id: train.id.clone(),
            price: train.price,
        });
        self.seats.clear();
    }

    /// Add `seat_number` if absent, remove it if present.
    ///
    /// Returns whether the seat is selected afterwards. A seat that is not
    /// AVAILABLE can still be deselected but never added.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NoTrainSelected`] if no train is selected, or
    ///   `train` is not the selected one
    /// - [`BookingError::UnknownSeat`] if the seat is not on the train
    /// - [`BookingError::SeatUnavailable`] if the seat is not AVAILABLE
    pub fn toggle_seat(&mut self, train: &Train, seat_number: &str) -> Result<bool, BookingError> {
        match &self.train {
            Some(selected) if selected.id == train.id => {},
            _ => return Err(BookingError::NoTrainSelected),
        }

        if let Some(index) = self.seats.iter().position(|s| s == seat_number) {
            self.seats.remove(index);
            return Ok(false);
        }

        let seat = train.seat(seat_number).ok_or_else(|| BookingError::UnknownSeat {
            train_id: train.id.clone(),
            seat_number: seat_number.to_string(),
        })?;
        if !seat.status.is_available() {
            return Err(BookingError::SeatUnavailable {
                train_id: train.id.clone(),
                seat_number: seat_number.to_string(),
                status: seat.status,
            });
        }

        self.seats.push(seat_number.to_string());
        Ok(true)
    }

    /// Forget the train and every selected seat
    pub fn reset(&mut self) {
        self.train = None;
        self.seats.clear();
    }

    /// Selected seats × fare; zero without a train
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.train
            .as_ref()
            .map_or(Money::ZERO, |train| train.price.times(self.seats.len()))
    }

    /// Id of the train being browsed
    #[must_use]
    pub fn train_id(&self) -> Option<&TrainId> {
        self.train.as_ref().map(|train| &train.id)
    }

    /// Selected seat numbers, in the order they were picked
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.seats
    }

    /// Whether `seat_number` is currently selected
    #[must_use]
    pub fn is_selected(&self, seat_number: &str) -> bool {
        self.seats.iter().any(|s| s == seat_number)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::types::{Seat, SeatId, SeatStatus};

    fn train(id: &str, price: u64) -> Train {
        Train::new(
            TrainId::new(id),
            "Amaravati-Akola Intercity",
            "12112",
            "Amaravati",
            "Akola",
            "13:00",
            "14:45",
            Money::rupees(price),
            vec![
                Seat::new(SeatId::new("s1"), "1A", SeatStatus::Available),
                Seat::new(SeatId::new("s2"), "1B", SeatStatus::Available),
                Seat::new(SeatId::new("s3"), "1C", SeatStatus::Booked),
                Seat::new(SeatId::new("s4"), "1D", SeatStatus::Reserved),
            ],
        )
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let akola = train("T103", 180);
        let mut session = SelectionSession::new();
        session.select_train(&akola);

        assert!(session.toggle_seat(&akola, "1A").unwrap());
        assert!(session.toggle_seat(&akola, "1B").unwrap());
        assert_eq!(session.total_price(), Money::rupees(360));

        assert!(!session.toggle_seat(&akola, "1A").unwrap());
        assert_eq!(session.selected(), ["1B".to_string()]);
        assert_eq!(session.total_price(), Money::rupees(180));
    }

    #[test]
    fn test_toggle_rejects_unavailable_seats() {
        let akola = train("T103", 180);
        let mut session = SelectionSession::new();
        session.select_train(&akola);

        assert!(matches!(
            session.toggle_seat(&akola, "1C"),
            Err(BookingError::SeatUnavailable { status: SeatStatus::Booked, .. })
        ));
        assert!(matches!(
            session.toggle_seat(&akola, "1D"),
            Err(BookingError::SeatUnavailable { status: SeatStatus::Reserved, .. })
        ));
        assert!(matches!(
            session.toggle_seat(&akola, "5A"),
            Err(BookingError::UnknownSeat { .. })
        ));
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_toggle_requires_selected_train() {
        let akola = train("T103", 180);
        let other = train("T104", 1250);
        let mut session = SelectionSession::new();

        assert_eq!(session.toggle_seat(&akola, "1A"), Err(BookingError::NoTrainSelected));

        session.select_train(&akola);
        assert_eq!(session.toggle_seat(&other, "1A"), Err(BookingError::NoTrainSelected));
    }

    #[test]
    fn test_selecting_new_train_clears_seats() {
        let akola = train("T103", 180);
        let mumbai = train("T104", 1250);
        let mut session = SelectionSession::new();

        session.select_train(&akola);
        session.toggle_seat(&akola, "1A").unwrap();
        session.select_train(&mumbai);

        assert_eq!(session.train_id(), Some(&TrainId::new("T104")));
        assert!(session.selected().is_empty());
        assert_eq!(session.total_price(), Money::ZERO);
    }

    #[test]
    fn test_reset_clears_everything() {
        let akola = train("T103", 180);
        let mut session = SelectionSession::new();
        session.select_train(&akola);
        session.toggle_seat(&akola, "1B").unwrap();

        session.reset();

        assert_eq!(session, SelectionSession::new());
        assert_eq!(session.total_price(), Money::ZERO);
        assert!(!session.is_selected("1B"));
    }
}
