use super::model::{City, DayFilter, MonthFilter, TripRecord, TripTable};

// ---------------------------------------------------------------------------
// Filter selection
// ---------------------------------------------------------------------------

/// The user's choice of city plus month and day restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl Filters {
    pub fn new(city: City, month: MonthFilter, day: DayFilter) -> Self {
        Filters { city, month, day }
    }

    /// Whether a trip passes the month and day restrictions.
    ///
    /// * `MonthFilter::All` / `DayFilter::All` → no constraint
    /// * otherwise the value derived from the start time must match
    pub fn matches(&self, record: &TripRecord) -> bool {
        if let MonthFilter::Only(month) = self.month {
            if record.month() != month.number_from_month() {
                return false;
            }
        }
        if let DayFilter::Only(day) = self.day {
            if record.weekday() != day {
                return false;
            }
        }
        true
    }

    /// Drop the rows that fail [`Filters::matches`], keeping file order.
    pub fn apply(&self, table: TripTable) -> TripTable {
        let TripTable { records, columns } = table;
        let records = records.into_iter().filter(|r| self.matches(r)).collect();
        TripTable { records, columns }
    }
}
