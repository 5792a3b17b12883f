//! Interactive explorer for US bikeshare trip data.
//!
//! Pick a city and optional month/day filters, then read the most common
//! travel times, popular stations, trip durations and rider demographics,
//! and page through the raw rows.

pub mod data;
pub mod error;
pub mod pager;
pub mod prompt;
pub mod session;
pub mod stats;

pub use error::ExploreError;
pub use session::Session;
