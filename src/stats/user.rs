use std::io::{self, Write};

use super::{mode, timed_section, value_counts, write_counts, NO_DATA};
use crate::data::model::TripTable;

/// Label for trips whose user type cell is blank.
pub const UNKNOWN_USER_TYPE: &str = "Unknown";

/// Earliest, most recent and most common birth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYears {
    pub earliest: i64,
    pub most_recent: i64,
    /// Ties resolve to the earliest year.
    pub most_common: i64,
}

/// Demographics of the riders in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    /// Covers every row; blank cells are counted under [`UNKNOWN_USER_TYPE`].
    pub user_types: Vec<(String, usize)>,
    /// `None` when the file has no Gender column.  Blank cells are skipped.
    pub genders: Option<Vec<(String, usize)>>,
    /// `None` when the file has no Birth Year column or every cell is blank.
    pub birth_years: Option<BirthYears>,
}

pub fn compute(table: &TripTable) -> Option<UserStats> {
    if table.is_empty() {
        return None;
    }
    let records = &table.records;

    let user_types = value_counts(
        records
            .iter()
            .map(|r| r.user_type.as_deref().unwrap_or(UNKNOWN_USER_TYPE)),
    )
    .into_iter()
    .map(|(k, n)| (k.to_string(), n))
    .collect();

    let genders = table.has_gender().then(|| {
        value_counts(records.iter().filter_map(|r| r.gender.as_deref()))
            .into_iter()
            .map(|(k, n)| (k.to_string(), n))
            .collect()
    });

    let birth_years = if table.has_birth_year() {
        let years: Vec<i64> = records
            .iter()
            .filter_map(|r| r.birth_year)
            .map(|y| y as i64)
            .collect();
        match (years.iter().min(), years.iter().max(), mode(years.iter().copied())) {
            (Some(&earliest), Some(&most_recent), Some((most_common, _))) => Some(BirthYears {
                earliest,
                most_recent,
                most_common,
            }),
            _ => None,
        }
    } else {
        None
    };

    Some(UserStats {
        user_types,
        genders,
        birth_years,
    })
}

pub fn print<W: Write>(out: &mut W, stats: Option<&UserStats>) -> io::Result<()> {
    let Some(s) = stats else {
        return writeln!(out, "{NO_DATA}");
    };

    writeln!(out, "Counts of User Types:")?;
    write_counts(out, &s.user_types)?;

    if let Some(genders) = &s.genders {
        writeln!(out, "\nCounts of Gender:")?;
        write_counts(out, genders)?;
    }

    if let Some(years) = &s.birth_years {
        writeln!(out, "\nStats of Birth Year:")?;
        writeln!(out, "Earliest Birth Year: {}", years.earliest)?;
        writeln!(out, "Most Recent Birth Year: {}", years.most_recent)?;
        writeln!(out, "Most Common Birth Year: {}", years.most_common)?;
    }
    Ok(())
}

pub fn report<W: Write>(out: &mut W, table: &TripTable) -> io::Result<()> {
    timed_section(out, "Calculating User Stats...", |out| {
        print(out, compute(table).as_ref())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{TripRecord, COL_BIRTH_YEAR, COL_GENDER, COL_USER_TYPE};
    use chrono::NaiveDate;

    fn trip(user: Option<&str>, gender: Option<&str>, year: Option<f64>) -> TripRecord {
        TripRecord {
            id: None,
            start_time: NaiveDate::from_ymd_opt(2017, 5, 1)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap(),
            end_time: None,
            trip_duration: 60.0,
            start_station: "A".into(),
            end_station: "B".into(),
            user_type: user.map(String::from),
            gender: gender.map(String::from),
            birth_year: year,
        }
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_demographics() {
        let t = TripTable::new(
            vec![
                trip(Some("Subscriber"), Some("Male"), Some(1985.0)),
                trip(Some("Subscriber"), Some("Female"), Some(1992.0)),
                trip(Some("Customer"), None, None),
                trip(None, Some("Male"), Some(1992.0)),
                trip(Some("Subscriber"), Some("Male"), Some(1940.0)),
            ],
            columns(&[COL_USER_TYPE, COL_GENDER, COL_BIRTH_YEAR]),
        );
        let stats = compute(&t).unwrap();

        assert_eq!(
            stats.user_types,
            vec![
                ("Subscriber".to_string(), 3),
                ("Customer".to_string(), 1),
                ("Unknown".to_string(), 1)
            ]
        );
        let total: usize = stats.user_types.iter().map(|(_, n)| n).sum();
        assert_eq!(total, t.len());

        assert_eq!(
            stats.genders,
            Some(vec![("Male".to_string(), 3), ("Female".to_string(), 1)])
        );
        assert_eq!(
            stats.birth_years,
            Some(BirthYears {
                earliest: 1940,
                most_recent: 1992,
                most_common: 1992
            })
        );
    }

    #[test]
    fn missing_columns_skip_sections() {
        let t = TripTable::new(
            vec![trip(Some("Subscriber"), None, None), trip(Some("Customer"), None, None)],
            columns(&[COL_USER_TYPE]),
        );
        let stats = compute(&t).unwrap();
        assert_eq!(stats.genders, None);
        assert_eq!(stats.birth_years, None);

        let mut out = Vec::new();
        print(&mut out, Some(&stats)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Counts of User Types:"));
        assert!(!text.contains("Gender"));
        assert!(!text.contains("Birth Year"));
    }

    #[test]
    fn birth_year_ties_go_to_earliest() {
        let t = TripTable::new(
            vec![
                trip(Some("Subscriber"), None, Some(2001.0)),
                trip(Some("Subscriber"), None, Some(1970.0)),
            ],
            columns(&[COL_BIRTH_YEAR]),
        );
        let years = compute(&t).unwrap().birth_years.unwrap();
        assert_eq!(years.most_common, 1970);
    }
}
