//! Reducer logic for the booking desk.
//!
//! A commit touches the inventory first and records the booking only if the
//! inventory accepted it. A cancellation removes the booking first and then
//! releases what the ledger handed back. Both run to completion under the
//! store's write lock, so no other action can observe a half-applied change.

use super::{
    BookingAction, BookingDeskEnvironment, BookingDeskState, BOOKING_CANCELLED_NOTICE,
    BOOKING_CONFIRMED_NOTICE,
};
use crate::assistant::AssistantRequest;
use crate::error::BookingError;
use crate::types::{BookingId, TrainId};
use railreserve_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

type Effects = SmallVec<[Effect<BookingAction>; 4]>;

/// Reducer for the booking desk
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingDeskReducer;

impl BookingDeskReducer {
    /// Creates a new `BookingDeskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Record the rejection and announce it
    fn reject(state: &mut BookingDeskState, error: BookingError) -> Effects {
        tracing::info!(error = %error, "Command rejected");
        state.last_error = Some(error.clone());
        state.last_notice = None;
        smallvec![Effect::future(async move {
            Some(BookingAction::ValidationFailed { error })
        })]
    }

    fn select_train(state: &mut BookingDeskState, train_id: &TrainId) -> Result<(), BookingError> {
        let train = state
            .inventory
            .train(train_id)
            .ok_or_else(|| BookingError::UnknownTrain(train_id.clone()))?;
        state.selection.select_train(train);
        Ok(())
    }

    fn toggle_seat(state: &mut BookingDeskState, seat_number: &str) -> Result<bool, BookingError> {
        let train_id = state
            .selection
            .train_id()
            .ok_or(BookingError::NoTrainSelected)?;
        let train = state
            .inventory
            .train(train_id)
            .ok_or_else(|| BookingError::UnknownTrain(train_id.clone()))?;
        state.selection.toggle_seat(train, seat_number)
    }

    fn confirm_booking(
        state: &mut BookingDeskState,
        env: &BookingDeskEnvironment,
    ) -> Result<Effects, BookingError> {
        let train_id = state
            .selection
            .train_id()
            .cloned()
            .ok_or(BookingError::NoTrainSelected)?;
        let seat_numbers = state.selection.selected().to_vec();
        if seat_numbers.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        // Re-validates against live statuses, not the selection
        state.inventory.commit_booking(&train_id, &seat_numbers)?;

        let train = state
            .inventory
            .train(&train_id)
            .ok_or_else(|| BookingError::UnknownTrain(train_id.clone()))?;
        let booking = state.ledger.create(
            train,
            seat_numbers,
            env.booking_date(),
            env.customer_name.clone(),
        );

        tracing::info!(
            booking_id = %booking.id,
            train_id = %booking.train_id,
            seats = booking.seat_numbers.len(),
            total = %booking.total_price,
            "Booking confirmed"
        );

        state.selection.reset();
        state.last_error = None;
        state.last_notice = Some(BOOKING_CONFIRMED_NOTICE.to_string());

        Ok(smallvec![env.persist_bookings(
            state.ledger.snapshot(),
            BookingAction::BookingConfirmed { booking },
        )])
    }

    fn cancel_booking(
        state: &mut BookingDeskState,
        booking_id: BookingId,
        env: &BookingDeskEnvironment,
    ) -> Result<Effects, BookingError> {
        let cancelled = state
            .ledger
            .cancel(&booking_id)
            .ok_or_else(|| BookingError::UnknownBooking(booking_id.clone()))?;

        let mut released = cancelled.seat_numbers;
        if let Some(unheld) = state.unheld_seats.remove(&booking_id) {
            released.retain(|number| !unheld.contains(number));
            tracing::warn!(
                booking_id = %booking_id,
                skipped = ?unheld,
                "Leaving seats the booking never held"
            );
        }

        if let Err(e) = state.inventory.release_seats(&cancelled.train_id, &released) {
            tracing::warn!(
                booking_id = %booking_id,
                error = %e,
                "Cancelled booking had no seats to release"
            );
        }

        tracing::info!(
            booking_id = %booking_id,
            train_id = %cancelled.train_id,
            seats = released.len(),
            "Booking cancelled"
        );

        state.last_error = None;
        state.last_notice = Some(BOOKING_CANCELLED_NOTICE.to_string());

        Ok(smallvec![env.persist_bookings(
            state.ledger.snapshot(),
            BookingAction::BookingCancelled {
                booking_id,
                train_id: cancelled.train_id,
                seat_numbers: released,
            },
        )])
    }

    fn ask_assistant(
        state: &mut BookingDeskState,
        query: String,
        env: &BookingDeskEnvironment,
    ) -> Effects {
        if query.trim().is_empty() {
            return SmallVec::new();
        }

        let panel = &mut state.assistant;
        let query_id = panel.next_query_id;
        panel.next_query_id += 1;
        panel.pending = Some(query_id);
        panel.last_query = Some(query.clone());
        panel.reply = None;

        tracing::debug!(query_id, "Asking travel assistant");

        let request = AssistantRequest {
            query,
            context_summary: state.inventory.context_summary(),
        };
        smallvec![env.ask_assistant(query_id, request)]
    }
}

impl Reducer for BookingDeskReducer {
    type State = BookingDeskState;
    type Action = BookingAction;
    type Environment = BookingDeskEnvironment;

    fn reduce(
        &self,
        state: &mut BookingDeskState,
        action: BookingAction,
        env: &BookingDeskEnvironment,
    ) -> Effects {
        match action {
            // Commands
            BookingAction::SelectTrain { train_id } => {
                match Self::select_train(state, &train_id) {
                    Ok(()) => {
                        state.last_error = None;
                        SmallVec::new()
                    },
                    Err(e) => Self::reject(state, e),
                }
            },
            BookingAction::ToggleSeat { seat_number } => {
                match Self::toggle_seat(state, &seat_number) {
                    Ok(_) => {
                        state.last_error = None;
                        SmallVec::new()
                    },
                    Err(e) => Self::reject(state, e),
                }
            },
            BookingAction::ClearSelection => {
                state.selection.reset();
                SmallVec::new()
            },
            BookingAction::ConfirmBooking => {
                Self::confirm_booking(state, env).unwrap_or_else(|e| Self::reject(state, e))
            },
            BookingAction::CancelBooking { booking_id } => {
                Self::cancel_booking(state, booking_id, env)
                    .unwrap_or_else(|e| Self::reject(state, e))
            },
            BookingAction::SearchTrains { term } => {
                state.search_term = term;
                SmallVec::new()
            },
            BookingAction::AskAssistant { query } => Self::ask_assistant(state, query, env),

            // Events
            BookingAction::AssistantReplied { query_id, text } => {
                if state.assistant.pending == Some(query_id) {
                    state.assistant.pending = None;
                    state.assistant.reply = Some(text);
                } else {
                    tracing::debug!(query_id, "Dropping stale assistant reply");
                }
                SmallVec::new()
            },
            BookingAction::BookingConfirmed { .. }
            | BookingAction::BookingCancelled { .. }
            | BookingAction::ValidationFailed { .. } => SmallVec::new(),
        }
    }
}
