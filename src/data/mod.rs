/// Data layer: lookup tables, trip records, loading, and filtering.
///
/// Architecture:
/// ```text
///  <city>.csv / <city>.parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TripTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  month / weekday of Start Time → kept rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ TripTable  │  read-only input to the reports and the pager
///   └───────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
