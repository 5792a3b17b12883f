use std::io::{self, Write};

use chrono::Weekday;

use super::{mode, timed_section, NO_DATA};
use crate::data::model::{day_name, month_name, TripTable, DAYS};

/// Most frequent times of travel.  Each field is a single (value, count)
/// pair; ties resolve to the earliest month, weekday (Monday first) or hour.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStats {
    pub month: (u32, usize),
    pub day: (Weekday, usize),
    pub hour: (u32, usize),
}

pub fn compute(table: &TripTable) -> Option<TimeStats> {
    let records = &table.records;
    let month = mode(records.iter().map(|r| r.month()))?;
    // Weekday has no ordering; rank by days from Monday
    let (day, day_count) = mode(
        records
            .iter()
            .map(|r| r.weekday().num_days_from_monday() as usize),
    )?;
    let hour = mode(records.iter().map(|r| r.hour()))?;
    Some(TimeStats {
        month,
        day: (DAYS[day].0, day_count),
        hour,
    })
}

pub fn print<W: Write>(out: &mut W, stats: Option<&TimeStats>) -> io::Result<()> {
    let Some(s) = stats else {
        return writeln!(out, "{NO_DATA}");
    };
    writeln!(
        out,
        "Most Common Month: {} Count: {}",
        month_name(s.month.0),
        s.month.1
    )?;
    writeln!(out, "Most Common Day: {} Count: {}", day_name(s.day.0), s.day.1)?;
    writeln!(out, "Most Common Hour: {} Count: {}", s.hour.0, s.hour.1)
}

pub fn report<W: Write>(out: &mut W, table: &TripTable) -> io::Result<()> {
    timed_section(out, "Calculating The Most Frequent Times of Travel...", |out| {
        print(out, compute(table).as_ref())
    })
}
