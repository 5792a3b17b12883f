use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use log::debug;

use crate::data::model::{
    TripTable, COL_BIRTH_YEAR, COL_END_STATION, COL_END_TIME, COL_GENDER, COL_INDEX,
    COL_START_STATION, COL_START_TIME, COL_TRIP_DURATION, COL_USER_TYPE,
};
use crate::prompt::Prompter;

/// Rows shown per page.
pub const PAGE_SIZE: usize = 5;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Table → Arrow
// ---------------------------------------------------------------------------

/// Every source column of the table plus the derived `month`,
/// `day_of_week` and `hour` columns, as one record batch.
pub fn to_record_batch(table: &TripTable) -> Result<RecordBatch, ArrowError> {
    let records = &table.records;
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();

    for name in &table.columns {
        let array: ArrayRef = match name.as_str() {
            COL_INDEX => Arc::new(Int64Array::from_iter(records.iter().map(|r| r.id))),
            COL_START_TIME => Arc::new(StringArray::from_iter(
                records
                    .iter()
                    .map(|r| Some(r.start_time.format(TIME_FORMAT).to_string())),
            )),
            COL_END_TIME => Arc::new(StringArray::from_iter(
                records
                    .iter()
                    .map(|r| r.end_time.map(|t| t.format(TIME_FORMAT).to_string())),
            )),
            COL_TRIP_DURATION => Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.trip_duration),
            )),
            COL_START_STATION => Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.start_station.as_str()),
            )),
            COL_END_STATION => Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.end_station.as_str()),
            )),
            COL_USER_TYPE => Arc::new(StringArray::from_iter(
                records.iter().map(|r| r.user_type.as_deref()),
            )),
            COL_GENDER => Arc::new(StringArray::from_iter(
                records.iter().map(|r| r.gender.as_deref()),
            )),
            COL_BIRTH_YEAR => Arc::new(Float64Array::from_iter(
                records.iter().map(|r| r.birth_year),
            )),
            _ => continue,
        };
        fields.push(Field::new(name, array.data_type().clone(), true));
        arrays.push(array);
    }

    fields.push(Field::new("month", DataType::UInt32, false));
    arrays.push(Arc::new(UInt32Array::from_iter_values(
        records.iter().map(|r| r.month()),
    )));
    fields.push(Field::new("day_of_week", DataType::Utf8, false));
    arrays.push(Arc::new(StringArray::from_iter_values(
        records.iter().map(|r| r.day_name()),
    )));
    fields.push(Field::new("hour", DataType::UInt32, false));
    arrays.push(Arc::new(UInt32Array::from_iter_values(
        records.iter().map(|r| r.hour()),
    )));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
}

// ---------------------------------------------------------------------------
// Pager
// ---------------------------------------------------------------------------

/// Walks a table [`PAGE_SIZE`] rows at a time.
pub struct RawDataPager {
    batch: RecordBatch,
    next_start: usize,
}

impl RawDataPager {
    pub fn new(table: &TripTable) -> Result<Self, ArrowError> {
        Ok(RawDataPager {
            batch: to_record_batch(table)?,
            next_start: 0,
        })
    }

    /// First row of the page the next call to [`next_page`](Self::next_page) renders.
    pub fn next_start(&self) -> usize {
        self.next_start
    }

    /// Render the next window and advance by [`PAGE_SIZE`].  Windows past
    /// the end of the table render as a header with no rows.
    pub fn next_page(&mut self) -> Result<String, ArrowError> {
        let rows = self.batch.num_rows();
        let start = self.next_start.min(rows);
        let len = PAGE_SIZE.min(rows - start);
        debug!("raw rows {start}..{}", start + len);

        let page = self.batch.slice(start, len);
        self.next_start += PAGE_SIZE;
        Ok(pretty_format_batches(&[page])?.to_string())
    }
}

/// Offer the raw rows: first page on a "yes", then one more page per "yes".
pub fn run<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, table: &TripTable) -> Result<()> {
    if !prompter.ask_yes("Would you like to check raw data? (Yes or No).")? {
        return Ok(());
    }
    let mut pager = RawDataPager::new(table).context("building raw data view")?;
    writeln!(prompter.output(), "{}", pager.next_page()?)?;

    while prompter.ask_yes("Would you like to check next 5 raw data? (Yes or No).")? {
        writeln!(prompter.output(), "{}", pager.next_page()?)?;
    }
    Ok(())
}
