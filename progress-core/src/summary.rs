use serde::Serialize;

use crate::{metric::Series, review::BucketIndex};

/// Totals for a series, the numbers shown next to a graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub cumulative: Series,
    pub total: i64,
    pub average_per_day: f64,
}

impl Summary {
    pub fn new(series: &[(BucketIndex, i64)], bucket_size_days: i64) -> Self {
        let mut total = 0;
        let cumulative: Series = series
            .iter()
            .map(|&(bucket, value)| {
                total += value;
                (bucket, total)
            })
            .collect();

        let days = series.len() as f64 * bucket_size_days as f64;
        let average_per_day = if days > 0. { total as f64 / days } else { 0. };

        Self {
            cumulative,
            total,
            average_per_day,
        }
    }
}
