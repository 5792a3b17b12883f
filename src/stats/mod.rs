/// Descriptive statistics over a filtered [`TripTable`](crate::data::model::TripTable).
///
/// Each report has a pure `compute` returning a typed summary (`None` for an
/// empty table), a `print` that renders it, and a `report` that does both
/// inside a timed section.
pub mod duration;
pub mod station;
pub mod time;
pub mod user;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Instant;

use crate::prompt::SEPARATOR;

pub const NO_DATA: &str = "No trip data for the selected filters.";

// ---------------------------------------------------------------------------
// Frequency helpers
// ---------------------------------------------------------------------------

/// Occurrences of each distinct value, keyed in ascending order.
pub fn tally<K: Ord>(values: impl IntoIterator<Item = K>) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value and its count.
///
/// Ties go to the smallest value in `K`'s ordering, so the answer never
/// depends on row order.
pub fn mode<K: Ord>(values: impl IntoIterator<Item = K>) -> Option<(K, usize)> {
    let mut best: Option<(K, usize)> = None;
    for (value, count) in tally(values) {
        // strictly greater: the first (smallest) key keeps a tie
        if best.as_ref().map_or(true, |(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best
}

/// Every distinct value with its count, most frequent first; equal counts
/// are listed in ascending value order.
pub fn value_counts<K: Ord>(values: impl IntoIterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = tally(values).into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Run `body` between a title line and a timing footer.
pub fn timed_section<W: Write>(
    out: &mut W,
    title: &str,
    body: impl FnOnce(&mut W) -> io::Result<()>,
) -> io::Result<()> {
    writeln!(out, "\n{title}\n")?;
    let started = Instant::now();
    body(out)?;
    writeln!(
        out,
        "\nThis took {:.3} seconds.",
        started.elapsed().as_secs_f64()
    )?;
    writeln!(out, "{SEPARATOR}")
}

/// Two aligned columns, like a printed frequency table.
pub fn write_counts<W: Write, K: AsRef<str>>(
    out: &mut W,
    counts: &[(K, usize)],
) -> io::Result<()> {
    let key_width = counts.iter().map(|(k, _)| k.as_ref().len()).max().unwrap_or(0);
    let count_width = counts
        .iter()
        .map(|(_, n)| n.to_string().len())
        .max()
        .unwrap_or(0);
    for (key, count) in counts {
        writeln!(
            out,
            "{:<key_width$}    {:>count_width$}",
            key.as_ref(),
            count
        )?;
    }
    Ok(())
}
