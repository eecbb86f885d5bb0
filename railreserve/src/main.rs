//! RailReserve terminal booking desk.
//!
//! Reads commands from stdin and drives the booking desk store. Logs go to
//! stderr so they never interleave with the seat maps on stdout.
//!
//! Run with: `cargo run -p railreserve`

use railreserve::assistant::{ClaudeTravelAssistant, OfflineAssistant, TravelAssistant};
use railreserve::shell::{self, parse_command, Command, HELP};
use railreserve::{
    BookingAction, BookingDeskEnvironment, BookingDeskReducer, BookingDeskState, BookingDeskStore,
    CatalogProvider, Config, FileStore, LedgerStore, SeatInventory, StaticCatalog,
};
use railreserve_anthropic::AnthropicClient;
use railreserve_core::environment::SystemClock;
use railreserve_runtime::StoreError;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railreserve=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(?config, "Starting RailReserve booking desk");

    let catalog = StaticCatalog::amaravati(config.catalog_seed);
    let ledger_store = Arc::new(LedgerStore::new(Arc::new(FileStore::new(
        config.data_dir.clone(),
    ))));
    let ledger = ledger_store.load().await;
    let state = BookingDeskState::restore(SeatInventory::new(catalog.trains()), ledger);

    let assistant: Arc<dyn TravelAssistant> = if let Some(api_key) = &config.assistant.api_key {
        Arc::new(
            ClaudeTravelAssistant::new(AnthropicClient::new(api_key.clone()))
                .with_model(config.assistant.model.clone())
                .with_max_tokens(config.assistant.max_tokens)
                .with_station(config.assistant.station_name.clone()),
        )
    } else {
        warn!("ANTHROPIC_API_KEY not set, travel assistant is offline");
        Arc::new(OfflineAssistant)
    };

    let env = BookingDeskEnvironment::new(Arc::new(SystemClock), assistant, ledger_store)
        .with_customer_name(config.customer_name.clone())
        .with_assistant_timeout(config.assistant.timeout);
    let store = BookingDeskStore::new(state, BookingDeskReducer::new(), env);

    println!("RailReserve - {}", config.assistant.station_name);
    println!("Type 'help' for commands.");
    let replies = spawn_reply_printer(store.clone());
    let result = run_shell(&store).await;
    replies.abort();
    result?;

    info!("Shutting down");
    store.shutdown(SHUTDOWN_TIMEOUT).await?;
    Ok(())
}

/// Print assistant answers as they arrive, leaving the prompt free meanwhile
fn spawn_reply_printer(store: BookingDeskStore) -> JoinHandle<()> {
    let mut actions = store.subscribe_actions();
    tokio::spawn(async move {
        loop {
            match actions.recv().await {
                Ok(BookingAction::AssistantReplied { query_id, text }) => {
                    if store.state(|s| s.assistant.is_latest(query_id)).await {
                        print!("\nAssistant: {text}\n> ");
                        if let Err(error) = std::io::stdout().flush() {
                            warn!(%error, "Failed to flush reply");
                        }
                    }
                },
                Ok(_) => {},
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Reply printer lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn run_shell(store: &BookingDeskStore) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => handle(store, command).await?,
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}

async fn handle(store: &BookingDeskStore, command: Command) -> Result<(), StoreError> {
    match command {
        Command::Trains(term) => {
            store.send(BookingAction::SearchTrains { term }).await?;
            println!("{}", store.state(shell::render_trains).await);
        },
        Command::Select(train_id) => {
            store.send(BookingAction::SelectTrain { train_id }).await?;
            print_error_or_seats(store).await;
        },
        Command::Seats => print_seats(store).await,
        Command::Toggle(seat_numbers) => {
            for seat_number in seat_numbers {
                store.send(BookingAction::ToggleSeat { seat_number }).await?;
                print_error(store).await;
            }
            print_seats(store).await;
        },
        Command::Book => {
            let outcome = store
                .send_and_wait_for(
                    BookingAction::ConfirmBooking,
                    |a| {
                        matches!(
                            a,
                            BookingAction::BookingConfirmed { .. }
                                | BookingAction::ValidationFailed { .. }
                        )
                    },
                    COMMAND_TIMEOUT,
                )
                .await?;
            match outcome {
                BookingAction::BookingConfirmed { booking } => {
                    print_notice(store).await;
                    println!(
                        "{}  {}  seats {}  {}",
                        booking.id,
                        booking.train_name,
                        booking.seat_numbers.join(", "),
                        booking.total_price
                    );
                },
                _ => print_error(store).await,
            }
        },
        Command::Clear => {
            store.send(BookingAction::ClearSelection).await?;
            println!("Selection cleared.");
        },
        Command::Bookings => println!("{}", store.state(shell::render_bookings).await),
        Command::Cancel(booking_id) => {
            let outcome = store
                .send_and_wait_for(
                    BookingAction::CancelBooking { booking_id },
                    |a| {
                        matches!(
                            a,
                            BookingAction::BookingCancelled { .. }
                                | BookingAction::ValidationFailed { .. }
                        )
                    },
                    COMMAND_TIMEOUT,
                )
                .await?;
            if matches!(outcome, BookingAction::BookingCancelled { .. }) {
                print_notice(store).await;
            } else {
                print_error(store).await;
            }
        },
        Command::Ask(query) => {
            store.send(BookingAction::AskAssistant { query }).await?;
            println!("Asking the travel assistant; keep booking while it thinks.");
        },
        Command::Help => println!("{HELP}"),
        Command::Quit | Command::Empty => {},
    }
    Ok(())
}

async fn print_error(store: &BookingDeskStore) {
    if let Some(error) = store.state(|s| s.last_error.clone()).await {
        println!("! {error}");
    }
}

async fn print_notice(store: &BookingDeskStore) {
    if let Some(notice) = store.state(|s| s.last_notice.clone()).await {
        println!("{notice}");
    }
}

async fn print_seats(store: &BookingDeskStore) {
    let map = store
        .state(|s| s.selected_train().map(|train| shell::render_seat_map(s, train)))
        .await;
    println!("{}", map.unwrap_or_else(|| "No train selected. Use 'select <trainId>'.".to_string()));
}

async fn print_error_or_seats(store: &BookingDeskStore) {
    if store.state(|s| s.last_error.is_some()).await {
        print_error(store).await;
    } else {
        print_seats(store).await;
    }
}
