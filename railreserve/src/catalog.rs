//! Catalog provider: the trains offered at startup.
//!
//! The desk never hard-codes its catalog. It asks a [`CatalogProvider`] once,
//! so tests can inject hand-built trains and the binary can use the
//! [`StaticCatalog`] of Amaravati departures.

use crate::types::{Money, Seat, SeatId, SeatStatus, Train, TrainId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seats per train in the generated seat maps
pub const SEATS_PER_TRAIN: usize = 40;

/// Seats per row; columns are lettered from `A`
pub const SEATS_PER_ROW: usize = 4;

const BOOKED_SHARE: f64 = 0.20;
const RESERVED_SHARE: f64 = 0.15;
const SEAT_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Supplies the ordered list of trains
pub trait CatalogProvider: Send + Sync {
    /// Trains in display order
    fn trains(&self) -> Vec<Train>;
}

/// (id, name, route number, destination, departure, arrival, fare)
type Departure = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, u64);

const ORIGIN: &str = "Amaravati";

const DEPARTURES: [Departure; 15] = [
    ("T101", "Amaravati-Pune Express", "12158", "Pune", "21:30", "08:45", 850),
    ("T102", "Amaravati-Nagpur Passenger", "51261", "Nagpur", "06:15", "09:30", 320),
    ("T103", "Amaravati-Akola Intercity", "12112", "Akola", "13:00", "14:45", 180),
    ("T104", "Amaravati-Mumbai Superfast", "12159", "Mumbai", "19:00", "06:15", 1250),
    ("T105", "Amaravati-Delhi Rajdhani Exp", "12433", "Delhi", "15:20", "10:40", 2450),
    ("T106", "Amaravati-Hyderabad Special", "07122", "Hyderabad", "22:10", "11:20", 980),
    ("T107", "Amaravati-Bangalore City Exp", "16501", "Bangalore", "08:45", "14:30", 1650),
    ("T108", "Amaravati-Chennai Central", "12655", "Chennai", "11:30", "07:15", 1520),
    ("T109", "Amaravati-Ahmedabad Navjivan", "12656", "Ahmedabad", "17:50", "12:10", 1100),
    ("T110", "Amaravati-Surat Intercity", "19002", "Surat", "05:30", "13:45", 740),
    ("T111", "Amaravati-Jabalpur Mail", "12188", "Jabalpur", "23:15", "08:20", 650),
    ("T112", "Amaravati-Raipur Express", "12808", "Raipur", "04:00", "12:45", 520),
    ("T113", "Amaravati-Indore Humsafar", "20917", "Indore", "20:30", "09:00", 1350),
    ("T114", "Amaravati-Bhopal Superfast", "12154", "Bhopal", "14:20", "21:50", 880),
    ("T115", "Amaravati-Varanasi Special", "01027", "Varanasi", "09:10", "11:45", 1890),
];

/// Fixed catalog held in memory
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    trains: Vec<Train>,
}

impl StaticCatalog {
    /// The Amaravati departures with seat maps generated from `seed`.
    ///
    /// The same seed always yields the same seat map, so bookings restored
    /// from storage line up with the seats they were made against.
    #[must_use]
    pub fn amaravati(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let trains = DEPARTURES
            .iter()
            .map(|&(id, name, number, destination, departs, arrives, fare)| {
                Train::new(
                    TrainId::new(id),
                    name,
                    number,
                    ORIGIN,
                    destination,
                    departs,
                    arrives,
                    Money::rupees(fare),
                    generate_seats(&mut rng),
                )
            })
            .collect();

        Self { trains }
    }

    /// Wrap an externally supplied train list
    #[must_use]
    pub const fn from_trains(trains: Vec<Train>) -> Self {
        Self { trains }
    }
}

impl CatalogProvider for StaticCatalog {
    fn trains(&self) -> Vec<Train> {
        self.trains.clone()
    }
}

/// Generate a 40-seat map where roughly a fifth of the seats are already
/// booked and a further seventh are held by other channels.
fn generate_seats(rng: &mut impl Rng) -> Vec<Seat> {
    (1..=SEATS_PER_TRAIN)
        .map(|position| {
            let roll: f64 = rng.gen_range(0.0..1.0);
            let status = if roll < BOOKED_SHARE {
                SeatStatus::Booked
            } else if roll < BOOKED_SHARE + RESERVED_SHARE {
                SeatStatus::Reserved
            } else {
                SeatStatus::Available
            };

            let suffix: String = (0..9)
                .map(|_| char::from(SEAT_ID_ALPHABET[rng.gen_range(0..SEAT_ID_ALPHABET.len())]))
                .collect();

            Seat::new(
                SeatId::new(format!("seat-{position}-{suffix}")),
                Seat::number_for(position, SEATS_PER_ROW),
                status,
            )
        })
        .collect()
}
