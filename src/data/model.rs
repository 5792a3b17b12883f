use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Months a trip can be filtered by; the datasets cover January to June.
pub const MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

/// Full weekday names, Monday first.
pub const DAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "Monday"),
    (Weekday::Tue, "Tuesday"),
    (Weekday::Wed, "Wednesday"),
    (Weekday::Thu, "Thursday"),
    (Weekday::Fri, "Friday"),
    (Weekday::Sat, "Saturday"),
    (Weekday::Sun, "Sunday"),
];

/// Title-case name of a weekday, e.g. `"Wednesday"`.
pub fn day_name(day: Weekday) -> &'static str {
    DAYS[day.num_days_from_monday() as usize].1
}

/// Title-case name of a month number (1-based), e.g. `3` → `"March"`.
pub fn month_name(number: u32) -> &'static str {
    Month::try_from(number as u8)
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

/// A city with a bikeshare data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lower-case name the user types.
    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name without extension, e.g. `new_york_city`.
    pub fn file_stem(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new_york_city",
            City::Washington => "washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        };
        write!(f, "{name}")
    }
}

impl FromStr for City {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        City::ALL.into_iter().find(|c| c.key() == s).ok_or(())
    }
}

// ---------------------------------------------------------------------------
// Month / day filters
// ---------------------------------------------------------------------------

/// Month restriction: everything, or a single month from [`MONTHS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Only(Month),
}

impl FromStr for MonthFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "all" {
            return Ok(MonthFilter::All);
        }
        MONTHS
            .into_iter()
            .find(|m| m.name().to_lowercase() == s)
            .map(MonthFilter::Only)
            .ok_or(())
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => write!(f, "all"),
            MonthFilter::Only(m) => write!(f, "{}", m.name().to_lowercase()),
        }
    }
}

/// Day-of-week restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Only(Weekday),
}

impl FromStr for DayFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "all" {
            return Ok(DayFilter::All);
        }
        DAYS.iter()
            .find(|(_, name)| name.to_lowercase() == s)
            .map(|(day, _)| DayFilter::Only(*day))
            .ok_or(())
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => write!(f, "all"),
            DayFilter::Only(d) => write!(f, "{}", day_name(*d).to_lowercase()),
        }
    }
}

// ---------------------------------------------------------------------------
// TripRecord – one row of a city file
// ---------------------------------------------------------------------------

/// A single bikeshare trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    /// The unlabeled leading index column, when the file has one.
    pub id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Seconds. Whole numbers for Chicago/NYC, fractional for Washington.
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<f64>,
}

impl TripRecord {
    /// Month number (1-based) of the start time.
    pub fn month(&self) -> u32 {
        self.start_time.month()
    }

    pub fn weekday(&self) -> Weekday {
        self.start_time.weekday()
    }

    pub fn day_name(&self) -> &'static str {
        day_name(self.weekday())
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

// ---------------------------------------------------------------------------
// TripTable – the loaded (and possibly filtered) dataset
// ---------------------------------------------------------------------------

pub const COL_INDEX: &str = "";
pub const COL_START_TIME: &str = "Start Time";
pub const COL_END_TIME: &str = "End Time";
pub const COL_TRIP_DURATION: &str = "Trip Duration";
pub const COL_START_STATION: &str = "Start Station";
pub const COL_END_STATION: &str = "End Station";
pub const COL_USER_TYPE: &str = "User Type";
pub const COL_GENDER: &str = "Gender";
pub const COL_BIRTH_YEAR: &str = "Birth Year";

/// Trips in file order together with the source columns that were present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    pub records: Vec<TripRecord>,
    /// Recognised source column names, in file order.
    pub columns: Vec<String>,
}

impl TripTable {
    pub fn new(records: Vec<TripRecord>, columns: Vec<String>) -> Self {
        TripTable { records, columns }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn has_gender(&self) -> bool {
        self.has_column(COL_GENDER)
    }

    pub fn has_birth_year(&self) -> bool {
        self.has_column(COL_BIRTH_YEAR)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn city_parses_case_insensitively() {
        assert_eq!("Chicago".parse::<City>(), Ok(City::Chicago));
        assert_eq!("  NEW YORK CITY ".parse::<City>(), Ok(City::NewYorkCity));
        assert_eq!("washington".parse::<City>(), Ok(City::Washington));
        assert_eq!("new york".parse::<City>(), Err(()));
    }

    #[test]
    fn month_filter_only_accepts_first_half_of_year() {
        assert_eq!("ALL".parse::<MonthFilter>(), Ok(MonthFilter::All));
        assert_eq!("March".parse::<MonthFilter>(), Ok(MonthFilter::Only(Month::March)));
        assert_eq!("june".parse::<MonthFilter>(), Ok(MonthFilter::Only(Month::June)));
        assert_eq!("july".parse::<MonthFilter>(), Err(()));
        assert_eq!("mar".parse::<MonthFilter>(), Err(()));
        assert_eq!(MonthFilter::Only(Month::April).to_string(), "april");
    }

    #[test]
    fn day_filter_accepts_every_weekday() {
        for (day, name) in DAYS {
            assert_eq!(name.to_uppercase().parse::<DayFilter>(), Ok(DayFilter::Only(day)));
        }
        assert_eq!("all".parse::<DayFilter>(), Ok(DayFilter::All));
        assert_eq!("thu".parse::<DayFilter>(), Err(()));
        assert_eq!(DayFilter::Only(Weekday::Thu).to_string(), "thursday");
    }

    #[test]
    fn derived_columns_follow_start_time() {
        let start = NaiveDate::from_ymd_opt(2017, 3, 15)
            .unwrap()
            .and_hms_opt(17, 5, 0)
            .unwrap();
        let rec = TripRecord {
            id: Some(1),
            start_time: start,
            end_time: None,
            trip_duration: 60.0,
            start_station: "A".into(),
            end_station: "B".into(),
            user_type: None,
            gender: None,
            birth_year: None,
        };
        assert_eq!(rec.month(), 3);
        assert_eq!(rec.day_name(), "Wednesday");
        assert_eq!(rec.hour(), 17);
        assert_eq!(month_name(rec.month()), "March");
    }
}
