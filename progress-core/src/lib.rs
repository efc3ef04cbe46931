//! Learning progress over time from a spaced repetition review log.
//!
//! Reviews are split into buckets of days, weeks or months and for each bucket
//! we count how many cards matured, lost maturity and got learned.

use tracing::{debug, instrument};

pub mod bucket;
mod common;
pub mod error;
pub mod first_learned;
pub mod metric;
pub mod params;
pub mod review;
pub mod source;
pub mod stats;
pub mod summary;

pub use common::{local_day_cutoff, next_day_cutoff};
pub use error::{Result, StatsError};
pub use metric::{Metric, ProgressStats, Series};
pub use params::{RangeType, ReviewQuery, StatsParams};
pub use review::{
    BucketIndex, CardId, EventId, ReviewEvent, ReviewKind, ReviewRow, RevlogEntry,
    MATURE_THRESHOLD,
};
pub use source::{EntryFilter, MemSource, ReviewSource};
pub use summary::Summary;

/// Fetches reviews from the source and computes progress stats for them.
///
/// Returns an empty [`ProgressStats`] if there are no reviews in range.
#[instrument(skip(source, filter))]
pub fn get_stats<S: ReviewSource + ?Sized>(
    source: &S,
    params: &StatsParams,
    filter: Option<&S::Filter>,
) -> Result<ProgressStats> {
    let query = params.query()?;
    let rows = source.fetch(&query, filter)?;
    debug!("fetched {} reviews", rows.len());

    let grouped = bucket::group_reviews(rows, query.id_cutoff())?;
    Ok(stats::compute(&grouped.groups, params))
}
