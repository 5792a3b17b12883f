use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use serde::Serialize;

/// Write deterministic sample city files for the explorer.
#[derive(Debug, Parser)]
struct Args {
    /// Directory to write chicago.csv, new_york_city.csv and washington.csv into.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Trips per city.
    #[arg(short, long, default_value_t = 2000)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Skewed pick: earlier items are chosen more often.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let a = self.below(items.len() as u64);
        let b = self.below(items.len() as u64);
        &items[a.min(b) as usize]
    }
}

// Header names match the real city files, including the unlabeled index.
#[derive(Serialize)]
struct FullTrip<'a> {
    #[serde(rename = "")]
    id: u64,
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: u64,
    #[serde(rename = "Start Station")]
    start_station: &'a str,
    #[serde(rename = "End Station")]
    end_station: &'a str,
    #[serde(rename = "User Type")]
    user_type: &'a str,
    #[serde(rename = "Gender")]
    gender: Option<&'a str>,
    #[serde(rename = "Birth Year")]
    birth_year: Option<f64>,
}

/// Washington files carry no demographics and fractional durations.
#[derive(Serialize)]
struct ShortTrip<'a> {
    #[serde(rename = "")]
    id: u64,
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: &'a str,
    #[serde(rename = "End Station")]
    end_station: &'a str,
    #[serde(rename = "User Type")]
    user_type: &'a str,
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CHICAGO_STATIONS: [&str; 6] = [
    "Streeter Dr & Grand Ave",
    "Lake Shore Dr & Monroe St",
    "Clinton St & Washington Blvd",
    "Theater on the Lake",
    "Canal St & Adams St",
    "Michigan Ave & Oak St",
];
const NYC_STATIONS: [&str; 6] = [
    "Pershing Square North",
    "E 17 St & Broadway",
    "W 21 St & 6 Ave",
    "West St & Chambers St",
    "Broadway & E 22 St",
    "8 Ave & W 31 St",
];
const WASHINGTON_STATIONS: [&str; 6] = [
    "Columbus Circle / Union Station",
    "Lincoln Memorial",
    "Jefferson Dr & 14th St SW",
    "Massachusetts Ave & Dupont Circle NW",
    "15th & P St NW",
    "Thomas Circle",
];

/// A random trip between 2017-01-01 and the end of June.
fn random_times(rng: &mut SimpleRng, duration_secs: u64) -> (NaiveDateTime, NaiveDateTime) {
    let base = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    // weight commuting hours
    let hour = *rng.pick(&[17, 8, 18, 16, 7, 12, 9, 14, 22, 3]) as i64;
    let start = base
        + Duration::days(rng.below(181) as i64)
        + Duration::hours(hour)
        + Duration::seconds(rng.below(3600) as i64);
    (start, start + Duration::seconds(duration_secs as i64))
}

fn write_full(path: &Path, stations: &[&str], rows: usize, rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for id in 0..rows as u64 {
        let trip_duration = 60 + rng.below(2400);
        let (start, end) = random_times(rng, trip_duration);
        let subscriber = rng.below(5) != 0;
        writer.serialize(FullTrip {
            id: id * 7 + rng.below(7),
            start_time: start.format(TIME_FORMAT).to_string(),
            end_time: end.format(TIME_FORMAT).to_string(),
            trip_duration,
            start_station: *rng.pick(stations),
            end_station: *rng.pick(stations),
            user_type: if subscriber { "Subscriber" } else { "Customer" },
            // customers rarely report demographics
            gender: subscriber.then(|| *rng.pick(&["Male", "Female"])),
            birth_year: subscriber.then(|| (1950 + rng.below(50)) as f64),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn write_short(path: &Path, stations: &[&str], rows: usize, rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for id in 0..rows as u64 {
        let millis = 60_000 + rng.below(2_400_000);
        let (start, end) = random_times(rng, millis / 1000);
        writer.serialize(ShortTrip {
            id: id * 7 + rng.below(7),
            start_time: start.format(TIME_FORMAT).to_string(),
            end_time: end.format(TIME_FORMAT).to_string(),
            trip_duration: millis as f64 / 1000.0,
            start_station: *rng.pick(stations),
            end_station: *rng.pick(stations),
            user_type: if rng.below(4) == 0 { "Customer" } else { "Subscriber" },
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let chicago = args.out_dir.join("chicago.csv");
    write_full(&chicago, &CHICAGO_STATIONS, args.rows, &mut rng)?;
    let nyc = args.out_dir.join("new_york_city.csv");
    write_full(&nyc, &NYC_STATIONS, args.rows, &mut rng)?;
    let washington = args.out_dir.join("washington.csv");
    write_short(&washington, &WASHINGTON_STATIONS, args.rows, &mut rng)?;

    log::info!("seed {}", args.seed);
    println!(
        "Wrote {} trips per city to {}",
        args.rows,
        args.out_dir.display()
    );
    Ok(())
}
