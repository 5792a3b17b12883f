use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bikeshare_explorer::data::filter::Filters;
use bikeshare_explorer::data::loader;
use bikeshare_explorer::data::model::{City, DayFilter, MonthFilter, DAYS, MONTHS};
use bikeshare_explorer::{ExploreError, Session};
use parquet::arrow::ArrowWriter;
use tempfile::tempdir;

const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-03-06 08:00:00,2017-03-06 08:10:00,600,A,B,Subscriber,Male,1980.0
2,2017-03-07 17:00:00,2017-03-07 17:05:00,300,A,B,Subscriber,Female,1990.0
3,2017-03-13 17:30:00,2017-03-13 17:40:00,600,C,D,Customer,,
4,2017-03-14 09:00:00,2017-03-14 09:10:00,600,C,D,Subscriber,Male,1990.0
5,2017-01-02 12:00:00,2017-01-02 12:01:00,60,A,D,Subscriber,Male,1975.0
6,2017-06-05 07:00:00,2017-06-05 07:30:00,1800,E,F,Customer,,
";

const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
10,2017-02-01 10:00:00,2017-02-01 10:10:00,600.5,Lincoln Memorial,Thomas Circle,Subscriber
11,2017-02-02 11:00:00,2017-02-02 11:10:00,599.5,Thomas Circle,Lincoln Memorial,Customer
";

fn data_dir() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("chicago.csv"), CHICAGO).unwrap();
    fs::write(dir.path().join("washington.csv"), WASHINGTON).unwrap();
    dir
}

fn run_session(dir: &Path, input: &str) -> (Result<()>, String) {
    let mut session = Session::new(input.as_bytes(), Vec::new(), dir);
    let result = session.run();
    (result, String::from_utf8(session.into_output()).unwrap())
}

#[test]
fn chicago_march_reports_only_march() {
    let dir = data_dir();
    let (result, out) = run_session(dir.path(), "chicago\nmarch\nall\nno\nno\n");
    result.unwrap();

    assert!(out.contains("Most Common Month: March Count: 4"));
    assert!(out.contains("Most Common Hour: 17 Count: 2"));
    // (A,B) and (C,D) tie at two trips each
    assert!(out.contains("Start:A and End:B   Count: 2"));
    assert!(out.contains("Start:C and End:D   Count: 2"));
    assert!(out.contains("Total Travel Time: 2100 Seconds"));
    assert!(out.contains("Mean Travel Time: 525 Seconds"));
    assert!(out.contains("Counts of Gender:"));
    assert!(out.contains("Earliest Birth Year: 1980"));
    assert!(out.contains("Most Common Birth Year: 1990"));
}

#[test]
fn declining_restart_ends_without_further_output() {
    let dir = data_dir();
    let (result, out) = run_session(dir.path(), "washington\nall\nall\nno\nNO\n");
    result.unwrap();
    assert!(out.trim_end().ends_with("Would you like to restart? Enter yes or no."));
    assert!(!out.contains("Counts of Gender"));
    assert!(!out.contains("Birth Year"));
}

#[test]
fn restart_runs_a_fresh_pass() {
    let dir = data_dir();
    let input = "chicago\nall\nmonday\nno\nmaybe\nyes\nwashington\nfebruary\nall\nno\nno\n";
    let (result, out) = run_session(dir.path(), input);
    result.unwrap();
    assert_eq!(out.matches("Hello! Let's explore some US bikeshare data!").count(), 2);
    assert_eq!(out.matches("Try again, Enter yes or no.").count(), 1);
    assert!(out.contains("Total Travel Time: 1200 Seconds"));
}

#[test]
fn raw_data_pages_through_rows() {
    let dir = data_dir();
    let (result, out) = run_session(dir.path(), "chicago\nall\nall\nyes\nyes\nno\nno\n");
    result.unwrap();
    assert!(out.contains("day_of_week"));
    assert!(out.contains("2017-06-05 07:00:00"));
    assert_eq!(out.matches("check next 5 raw data").count(), 2);
}

#[test]
fn empty_selection_reports_no_data() {
    let dir = data_dir();
    let (result, out) = run_session(dir.path(), "washington\njune\nall\nno\nno\n");
    result.unwrap();
    assert_eq!(out.matches("No trip data for the selected filters.").count(), 4);
}

#[test]
fn missing_city_file_is_fatal() {
    let dir = data_dir();
    let (result, _) = run_session(dir.path(), "new york city\nall\nall\n");
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExploreError>(),
        Some(ExploreError::MissingCityData { .. })
    ));
}

#[test]
fn every_filter_combination_is_honoured() {
    let dir = data_dir();
    let months =
        std::iter::once(MonthFilter::All).chain(MONTHS.into_iter().map(MonthFilter::Only));
    for month in months {
        let days = std::iter::once(DayFilter::All)
            .chain(DAYS.iter().map(|(d, _)| DayFilter::Only(*d)));
        for day in days {
            let filters = Filters::new(City::Chicago, month, day);
            let table = loader::load_city(dir.path(), &filters).unwrap();
            for r in &table.records {
                if let MonthFilter::Only(m) = month {
                    assert_eq!(r.month(), m.number_from_month());
                }
                if let DayFilter::Only(d) = day {
                    assert_eq!(r.weekday(), d);
                }
            }
        }
    }
}

#[test]
fn parquet_city_file_loads_like_csv() {
    let dir = tempdir().unwrap();
    let schema = Arc::new(Schema::new(vec![
        Field::new("Start Time", DataType::Utf8, false),
        Field::new("Trip Duration", DataType::Float64, false),
        Field::new("Start Station", DataType::Utf8, false),
        Field::new("End Station", DataType::Utf8, false),
        Field::new("User Type", DataType::Utf8, true),
        Field::new("Birth Year", DataType::Int64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec![
                "2017-04-03 08:00:00",
                "2017-04-04 09:00:00",
                "2017-05-01 10:00:00",
            ])),
            Arc::new(Float64Array::from(vec![120.0, 240.0, 360.0])),
            Arc::new(StringArray::from(vec!["A", "A", "B"])),
            Arc::new(StringArray::from(vec!["B", "B", "C"])),
            Arc::new(StringArray::from(vec![Some("Subscriber"), None, Some("Customer")])),
            Arc::new(Int64Array::from(vec![Some(1985), None, Some(1970)])),
        ],
    )
    .unwrap();

    let file = fs::File::create(dir.path().join("new_york_city.parquet")).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let filters = Filters::new(City::NewYorkCity, "april".parse().unwrap(), DayFilter::All);
    let table = loader::load_city(dir.path(), &filters).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.has_birth_year());
    assert!(!table.has_gender());
    assert_eq!(table.records[0].birth_year, Some(1985.0));
    assert_eq!(table.records[1].user_type, None);
}
