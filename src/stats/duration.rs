use std::io::{self, Write};

use super::{timed_section, NO_DATA};
use crate::data::model::TripTable;

/// Total and mean trip duration, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationStats {
    pub total: f64,
    pub mean: f64,
}

pub fn compute(table: &TripTable) -> Option<DurationStats> {
    if table.is_empty() {
        return None;
    }
    let total: f64 = table.records.iter().map(|r| r.trip_duration).sum();
    Some(DurationStats {
        total,
        mean: total / table.len() as f64,
    })
}

pub fn print<W: Write>(out: &mut W, stats: Option<&DurationStats>) -> io::Result<()> {
    let Some(s) = stats else {
        return writeln!(out, "{NO_DATA}");
    };
    writeln!(out, "Total Travel Time: {} Seconds", s.total)?;
    writeln!(out, "Mean Travel Time: {} Seconds", s.mean)
}

pub fn report<W: Write>(out: &mut W, table: &TripTable) -> io::Result<()> {
    timed_section(out, "Calculating Trip Duration...", |out| {
        print(out, compute(table).as_ref())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TripRecord;
    use chrono::NaiveDate;

    fn trip(seconds: f64) -> TripRecord {
        TripRecord {
            id: None,
            start_time: NaiveDate::from_ymd_opt(2017, 2, 1)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap(),
            end_time: None,
            trip_duration: seconds,
            start_station: "A".into(),
            end_station: "B".into(),
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    #[test]
    fn total_and_mean() {
        let t = TripTable::new(vec![trip(100.0), trip(200.0), trip(600.0)], vec![]);
        let stats = compute(&t).unwrap();
        assert_eq!(stats, DurationStats { total: 900.0, mean: 300.0 });

        let mut out = Vec::new();
        print(&mut out, Some(&stats)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Total Travel Time: 900 Seconds\nMean Travel Time: 300 Seconds\n"
        );
    }

    #[test]
    fn empty_table_has_no_mean() {
        assert_eq!(compute(&TripTable::default()), None);
    }
}
