use std::io::{self, Write};

use super::{mode, tally, timed_section, NO_DATA};
use crate::data::model::TripTable;

/// Most popular stations and trips.
///
/// Start and end stations report one winner (ties → alphabetically first).
/// The trip report lists every (start, end) pair sharing the top count.
#[derive(Debug, Clone, PartialEq)]
pub struct StationStats {
    pub start: (String, usize),
    pub end: (String, usize),
    /// All pairs tied at `pair_count`, sorted by start then end station.
    pub top_pairs: Vec<(String, String)>,
    pub pair_count: usize,
}

pub fn compute(table: &TripTable) -> Option<StationStats> {
    let records = &table.records;
    let (start, start_count) = mode(records.iter().map(|r| r.start_station.as_str()))?;
    let (end, end_count) = mode(records.iter().map(|r| r.end_station.as_str()))?;

    let pairs = tally(
        records
            .iter()
            .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
    );
    let pair_count = pairs.values().copied().max()?;
    let top_pairs = pairs
        .into_iter()
        .filter(|(_, n)| *n == pair_count)
        .map(|((s, e), _)| (s.to_string(), e.to_string()))
        .collect();

    Some(StationStats {
        start: (start.to_string(), start_count),
        end: (end.to_string(), end_count),
        top_pairs,
        pair_count,
    })
}

pub fn print<W: Write>(out: &mut W, stats: Option<&StationStats>) -> io::Result<()> {
    let Some(s) = stats else {
        return writeln!(out, "{NO_DATA}");
    };
    writeln!(
        out,
        "Most Commonly Used Start Station: {} Count: {}",
        s.start.0, s.start.1
    )?;
    writeln!(
        out,
        "Most Commonly Used End Station: {} Count: {}",
        s.end.0, s.end.1
    )?;
    for (start, end) in &s.top_pairs {
        writeln!(
            out,
            "Most Frequent Combination of Start Station and End Station Trip: \
             Start:{start} and End:{end}   Count: {}",
            s.pair_count
        )?;
    }
    Ok(())
}

pub fn report<W: Write>(out: &mut W, table: &TripTable) -> io::Result<()> {
    timed_section(out, "Calculating The Most Popular Stations and Trip...", |out| {
        print(out, compute(table).as_ref())
    })
}
