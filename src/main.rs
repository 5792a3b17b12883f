use std::io;
use std::path::PathBuf;

use anyhow::Result;
use bikeshare_explorer::Session;
use clap::Parser;

/// Explore US bikeshare trip data for Chicago, New York City and Washington.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    /// (or .parquet files with the same stems).
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{args:?}");

    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), args.data_dir);
    session.run()
}
