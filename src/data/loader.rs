use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Int64Type, TimeUnit};
use arrow::error::ArrowError;
use chrono::{FixedOffset, NaiveDateTime};
use log::{debug, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::filter::Filters;
use super::model::{
    City, TripRecord, TripTable, COL_BIRTH_YEAR, COL_END_STATION, COL_END_TIME, COL_GENDER,
    COL_INDEX, COL_START_STATION, COL_START_TIME, COL_TRIP_DURATION, COL_USER_TYPE,
};
use crate::error::ExploreError;

/// Extensions tried, in order, when resolving a city's data file.
const EXTENSIONS: [&str; 2] = ["csv", "parquet"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the trips for the selected city and apply the month/day filters.
pub fn load_city(data_dir: &Path, filters: &Filters) -> Result<TripTable> {
    let path = city_path(data_dir, filters.city)?;
    let table = load_file(&path).with_context(|| format!("loading {}", path.display()))?;
    let total = table.len();
    let table = filters.apply(table);
    info!(
        "{}: {} of {} trips match month={} day={}",
        filters.city,
        table.len(),
        total,
        filters.month,
        filters.day
    );
    Ok(table)
}

/// Locate `<stem>.csv`, falling back to `<stem>.parquet`.
pub fn city_path(data_dir: &Path, city: City) -> Result<PathBuf, ExploreError> {
    EXTENSIONS
        .iter()
        .map(|ext| data_dir.join(format!("{}.{ext}", city.file_stem())))
        .find(|p| p.is_file())
        .ok_or_else(|| ExploreError::MissingCityData {
            city: city.to_string(),
            dir: data_dir.to_path_buf(),
        })
}

/// Load a trip file.  Dispatch by extension.
pub fn load_file(path: &Path) -> Result<TripTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(ExploreError::UnsupportedFormat(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Column lookup shared by both formats
// ---------------------------------------------------------------------------

/// Positions of the recognised columns within a file's header.
#[derive(Debug)]
struct ColumnIndex {
    index: Option<usize>,
    start_time: usize,
    end_time: Option<usize>,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: Option<usize>,
    gender: Option<usize>,
    birth_year: Option<usize>,
    /// Recognised column names in header order.
    present: Vec<String>,
}

impl ColumnIndex {
    fn from_headers(headers: &[String]) -> Result<Self, ExploreError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(ExploreError::MissingColumn(name));

        // pandas writes its index as an unnamed column; re-exports call it "Unnamed: 0"
        let index = find(COL_INDEX).or_else(|| find("Unnamed: 0"));

        let cols = ColumnIndex {
            index,
            start_time: require(COL_START_TIME)?,
            end_time: find(COL_END_TIME),
            trip_duration: require(COL_TRIP_DURATION)?,
            start_station: require(COL_START_STATION)?,
            end_station: require(COL_END_STATION)?,
            user_type: find(COL_USER_TYPE),
            gender: find(COL_GENDER),
            birth_year: find(COL_BIRTH_YEAR),
            present: Vec::new(),
        };

        let recognised = [
            cols.index,
            Some(cols.start_time),
            cols.end_time,
            Some(cols.trip_duration),
            Some(cols.start_station),
            Some(cols.end_station),
            cols.user_type,
            cols.gender,
            cols.birth_year,
        ];
        let mut positions: Vec<usize> = recognised.into_iter().flatten().collect();
        positions.sort_unstable();
        let present = positions
            .into_iter()
            .map(|i| {
                if Some(i) == cols.index {
                    COL_INDEX.to_string()
                } else {
                    headers[i].clone()
                }
            })
            .collect();

        Ok(ColumnIndex { present, ..cols })
    }

    /// Build one trip from a row (1-based, for messages), given a cell
    /// accessor by column position.
    fn record<'a>(
        &self,
        row: usize,
        field: impl Fn(usize) -> Option<&'a str>,
    ) -> Result<TripRecord, ExploreError> {
        let cell = |i: usize| field(i).map(str::trim).filter(|s| !s.is_empty());
        let text = |i: usize| cell(i).map(str::to_string);
        let opt_text = |i: Option<usize>| i.and_then(|i| text(i));

        let start_raw = cell(self.start_time).unwrap_or("");
        let start_time = parse_timestamp(start_raw).ok_or_else(|| ExploreError::BadTimestamp {
            row,
            value: start_raw.to_string(),
        })?;
        let end_time = self.end_time.and_then(|i| cell(i)).and_then(parse_timestamp);

        let trip_duration = parse_number(cell(self.trip_duration), row, COL_TRIP_DURATION)?
            .ok_or_else(|| ExploreError::BadNumber {
                row,
                column: COL_TRIP_DURATION,
                value: String::new(),
            })?;
        let birth_year = match self.birth_year {
            Some(i) => parse_number(cell(i), row, COL_BIRTH_YEAR)?,
            None => None,
        };
        let id = match self.index {
            Some(i) => parse_number(cell(i), row, "index")?.map(|v| v as i64),
            None => None,
        };

        let start_station = text(self.start_station).unwrap_or_default();
        let end_station = text(self.end_station).unwrap_or_default();
        if start_station.is_empty() || end_station.is_empty() {
            warn!("row {row}: blank station name");
        }

        Ok(TripRecord {
            id,
            start_time,
            end_time,
            trip_duration,
            start_station,
            end_station,
            user_type: opt_text(self.user_type),
            gender: opt_text(self.gender),
            birth_year,
        })
    }
}

fn parse_number(
    value: Option<&str>,
    row: usize,
    column: &'static str,
) -> Result<Option<f64>, ExploreError> {
    value
        .map(|v| {
            v.parse::<f64>().map_err(|_| ExploreError::BadNumber {
                row,
                column,
                value: v.to_string(),
            })
        })
        .transpose()
}

/// Parse the date-time layouts found in the trip files.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` with optional fractional seconds, a `T`
/// separator, slashes as date separators and minute precision.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M",
    ];
    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; the first column may be an
/// unlabeled row index.  `Gender` and `Birth Year` are optional.
fn load_csv(path: &Path) -> Result<TripTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let cols = ColumnIndex::from_headers(&headers)?;
    debug!("{}: columns {:?}", path.display(), cols.present);

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(cols.record(row_no + 1, |i| row.get(i))?);
    }

    info!("{}: read {} trips", path.display(), records.len());
    Ok(TripTable::new(records, cols.present))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same column names as the CSV files.
///
/// Every column is cast to text and parsed exactly like a CSV cell, so any
/// Arrow type that casts to Utf8 (strings, integers, floats, timestamps) works.
fn load_parquet(path: &Path) -> Result<TripTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let cols = ColumnIndex::from_headers(&headers)?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let text_columns = batch
            .columns()
            .iter()
            .zip(&headers)
            .map(|(col, name)| as_text(col, name))
            .collect::<Result<Vec<StringArray>, _>>()?;

        for row in 0..batch.num_rows() {
            let record = cols.record(offset + row + 1, |i| {
                let col = &text_columns[i];
                (!col.is_null(row)).then(|| col.value(row))
            })?;
            records.push(record);
        }
        offset += batch.num_rows();
    }

    info!("{}: read {} trips", path.display(), records.len());
    Ok(TripTable::new(records, cols.present))
}

fn as_text(col: &ArrayRef, name: &str) -> Result<StringArray, ExploreError> {
    let unsupported = || ExploreError::UnsupportedColumnType {
        column: name.to_string(),
        data_type: format!("{:?}", col.data_type()),
    };
    let local;
    let col = match col.data_type() {
        DataType::Timestamp(unit, Some(tz)) => {
            local = naive_local(col, *unit, tz, name).map_err(|_| unsupported())?;
            &local
        }
        _ => col,
    };
    let cast_col = cast(col, &DataType::Utf8).map_err(|_| unsupported())?;
    cast_col
        .as_string_opt::<i32>()
        .cloned()
        .ok_or_else(unsupported)
}

/// Turn a zoned timestamp column into naive local wall-clock time.
///
/// Fixed offsets (`+02:00`) are applied; named zones other than UTC are
/// read as UTC.
fn naive_local(
    col: &ArrayRef,
    unit: TimeUnit,
    tz: &str,
    name: &str,
) -> Result<ArrayRef, ArrowError> {
    let offset_secs = match tz.parse::<FixedOffset>() {
        Ok(offset) => i64::from(offset.local_minus_utc()),
        Err(_) => {
            if !matches!(tz, "UTC" | "Etc/UTC" | "Z") {
                warn!("column '{name}': time zone {tz} is read as UTC");
            }
            0
        }
    };
    let ticks_per_sec = match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    };
    let shift = offset_secs * ticks_per_sec;

    // timestamps are stored as UTC ticks whatever the zone
    let ticks = cast(col, &DataType::Int64)?;
    let shifted: Int64Array = ticks
        .as_primitive::<Int64Type>()
        .unary::<_, Int64Type>(|v| v + shift);
    cast(&shifted, &DataType::Timestamp(unit, None))
}
