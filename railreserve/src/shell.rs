//! Line-oriented front end: command parsing and text rendering.
//!
//! The binary reads lines, turns them into [`Command`]s and prints what the
//! `render_*` functions produce from the desk state.

use crate::desk::BookingDeskState;
use crate::types::{Booking, BookingId, SeatStatus, Train, TrainId};

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  trains [term]        list trains, optionally filtered by destination or name
  select <trainId>     open a train's seat map
  seats                show the open seat map
  toggle <seat>...     select or deselect seats (e.g. toggle 1A 1B)
  book                 confirm the selected seats
  clear                close the seat map and drop the selection
  bookings             list your bookings
  cancel <bookingId>   cancel a booking and release its seats
  ask <question>       ask the travel assistant
  help                 show this help
  quit                 exit";

/// One parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// List trains matching a term
    Trains(String),
    /// Open a seat map
    Select(TrainId),
    /// Show the open seat map
    Seats,
    /// Toggle one or more seats
    Toggle(Vec<String>),
    /// Confirm the selection
    Book,
    /// Drop the selection
    Clear,
    /// List bookings
    Bookings,
    /// Cancel a booking
    Cancel(BookingId),
    /// Ask the assistant
    Ask(String),
    /// Show help
    Help,
    /// Exit
    Quit,
    /// Blank line
    Empty,
}

/// Parse one input line.
///
/// # Errors
///
/// Returns a message for unknown commands or missing arguments.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_lowercase().as_str() {
        "" => Command::Empty,
        "trains" | "search" => Command::Trains(rest.to_string()),
        "select" => Command::Select(TrainId::new(required(rest, "select <trainId>")?.to_uppercase())),
        "seats" => Command::Seats,
        "toggle" => {
            required(rest, "toggle <seat>...")?;
            Command::Toggle(rest.split_whitespace().map(str::to_uppercase).collect())
        },
        "book" => Command::Book,
        "clear" => Command::Clear,
        "bookings" => Command::Bookings,
        "cancel" => {
            Command::Cancel(BookingId::new(required(rest, "cancel <bookingId>")?.to_uppercase()))
        },
        "ask" => Command::Ask(required(rest, "ask <question>")?.to_string()),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for commands.")),
    };
    Ok(command)
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(rest)
    }
}

/// Table of the trains matching the current search term
#[must_use]
pub fn render_trains(state: &BookingDeskState) -> String {
    let trains = state.visible_trains();
    if trains.is_empty() {
        return format!("No trains match '{}'.", state.search_term);
    }

    trains
        .iter()
        .map(|train| {
            format!(
                "{:<5} {:<30} #{:<6} {} → {:<10} {} - {}  {:>8}  {:>2} seats left",
                train.id,
                train.name,
                train.number,
                train.origin,
                train.destination,
                train.departure_time,
                train.arrival_time,
                train.price.to_string(),
                train.available_seats,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn seat_mark(state: &BookingDeskState, number: &str, status: SeatStatus) -> char {
    if state.selection.is_selected(number) {
        return '*';
    }
    match status {
        SeatStatus::Available => ' ',
        SeatStatus::Booked => 'x',
        SeatStatus::Reserved => 'r',
    }
}

/// Seat map of the open train with the running total
#[must_use]
pub fn render_seat_map(state: &BookingDeskState, train: &Train) -> String {
    let mut out = format!(
        "{} ({} → {})  {} per seat\n",
        train.name, train.origin, train.destination, train.price
    );

    for row in train.seats.chunks(4) {
        let cells: Vec<String> = row
            .iter()
            .map(|seat| {
                format!(
                    "[{:>3}{}]",
                    seat.number,
                    seat_mark(state, &seat.number, seat.status)
                )
            })
            .collect();
        // Aisle after the second column
        let (left, right) = cells.split_at(cells.len().min(2));
        out.push_str(&format!("  {}   {}\n", left.join(" "), right.join(" ")));
    }

    out.push_str("Legend: * selected  x booked  r reserved\n");
    let selected = state.selection.selected();
    if selected.is_empty() {
        out.push_str("No seats selected");
    } else {
        out.push_str(&format!(
            "Selected: {}  Total: {}",
            selected.join(", "),
            state.selection.total_price()
        ));
    }
    out
}

fn render_booking(booking: &Booking) -> String {
    format!(
        "{}  {}  seats {}  {}  {}  ({})",
        booking.id,
        booking.train_name,
        booking.seat_numbers.join(", "),
        booking.total_price,
        booking.date,
        booking.customer_name
    )
}

/// Booking history, newest first
#[must_use]
pub fn render_bookings(state: &BookingDeskState) -> String {
    if state.ledger.is_empty() {
        return "No bookings yet.".to_string();
    }
    let mut lines: Vec<String> = state.ledger.list().iter().map(render_booking).collect();
    lines.push(format!(
        "{} booking(s), total spent {}",
        state.ledger.len(),
        state.ledger.total_spent()
    ));
    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::inventory::SeatInventory;
    use crate::ledger::BookingLedger;
    use crate::types::{Money, Seat, SeatId};

    fn state() -> BookingDeskState {
        let train = Train::new(
            TrainId::new("T103"),
            "Amaravati-Akola Intercity",
            "12112",
            "Amaravati",
            "Akola",
            "13:00",
            "14:45",
            Money::rupees(180),
            vec![
                Seat::new(SeatId::new("s1"), "1A", SeatStatus::Available),
                Seat::new(SeatId::new("s2"), "1B", SeatStatus::Booked),
                Seat::new(SeatId::new("s3"), "1C", SeatStatus::Reserved),
                Seat::new(SeatId::new("s4"), "1D", SeatStatus::Available),
            ],
        );
        BookingDeskState::restore(SeatInventory::new(vec![train]), BookingLedger::new())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  "), Ok(Command::Empty));
        assert_eq!(parse_command("trains"), Ok(Command::Trains(String::new())));
        assert_eq!(parse_command("trains  Mumbai "), Ok(Command::Trains("Mumbai".to_string())));
        assert_eq!(parse_command("select t101"), Ok(Command::Select(TrainId::new("T101"))));
        assert_eq!(
            parse_command("toggle 1a 2B"),
            Ok(Command::Toggle(vec!["1A".to_string(), "2B".to_string()]))
        );
        assert_eq!(
            parse_command("cancel BK-123"),
            Ok(Command::Cancel(BookingId::new("BK-123")))
        );
        assert_eq!(
            parse_command("cancel bk-9f2c"),
            Ok(Command::Cancel(BookingId::new("BK-9F2C")))
        );
        assert_eq!(
            parse_command("ask when does the Pune train leave?"),
            Ok(Command::Ask("when does the Pune train leave?".to_string()))
        );
        assert_eq!(parse_command("QUIT"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_command("fly T101").unwrap_err().contains("Unknown command"));
        assert_eq!(parse_command("select"), Err("Usage: select <trainId>".to_string()));
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("ask   ").is_err());
    }

    #[test]
    fn test_render_seat_map_marks_statuses_and_total() {
        let mut state = state();
        let train = state.inventory.trains()[0].clone();
        state.selection.select_train(&train);
        state.selection.toggle_seat(&train, "1D").unwrap();

        let map = render_seat_map(&state, &train);

        assert!(map.contains("[ 1A ]"));
        assert!(map.contains("[ 1Bx]"));
        assert!(map.contains("[ 1Cr]"));
        assert!(map.contains("[ 1D*]"));
        assert!(map.ends_with("Selected: 1D  Total: ₹ 180"));
    }

    #[test]
    fn test_render_trains_and_empty_results() {
        let mut state = state();
        assert!(render_trains(&state).contains("Amaravati-Akola Intercity"));

        state.search_term = "Chennai".to_string();
        assert_eq!(render_trains(&state), "No trains match 'Chennai'.");
    }

    #[test]
    fn test_render_bookings() {
        let mut state = state();
        assert_eq!(render_bookings(&state), "No bookings yet.");

        let train = state.inventory.trains()[0].clone();
        let booking = state
            .ledger
            .create(&train, vec!["1A".to_string()], "01 Jan 2025", "Guest User");

        state
            .ledger
            .create(&train, vec!["1D".to_string()], "02 Jan 2025", "Guest User");

        let rendered = render_bookings(&state);
        assert!(rendered.lines().nth(1).unwrap().starts_with(booking.id.as_str()));
        assert!(rendered.contains("₹ 180"));
        assert!(rendered.ends_with("2 booking(s), total spent ₹ 360"));
    }
}
