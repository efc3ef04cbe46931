use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
    error::{Result, StatsError},
    review::{BucketIndex, EventId, RevlogEntry, ReviewRow},
};

pub const SECONDS_PER_DAY: i64 = 86_400;
pub const MS_PER_DAY: i64 = SECONDS_PER_DAY * 1000;

/// How reviews are split up into buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsParams {
    /// 1 buckets per day, 7 per week, etc.
    pub bucket_size_days: i64,
    /// Start of the next day in seconds since epoch, e.g. tomorrow at 4 am.
    pub day_cutoff_seconds: i64,
    /// How many buckets back to look. All of history if unset.
    pub num_buckets: Option<i64>,
}

impl StatsParams {
    pub fn new(
        bucket_size_days: i64,
        day_cutoff_seconds: i64,
        num_buckets: Option<i64>,
    ) -> Result<Self> {
        let selv = Self {
            bucket_size_days,
            day_cutoff_seconds,
            num_buckets,
        };
        selv.validate()?;
        Ok(selv)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket_size_days <= 0 {
            return Err(StatsError::invalid_argument(
                "bucket_size_days",
                format!("must be positive, got {}", self.bucket_size_days),
            ));
        }

        if self.bucket_size_days.checked_mul(MS_PER_DAY).is_none() {
            return Err(StatsError::invalid_argument(
                "bucket_size_days",
                format!("{} days is out of range", self.bucket_size_days),
            ));
        }

        if self.day_cutoff_seconds.checked_mul(1000).is_none() {
            return Err(StatsError::invalid_argument(
                "day_cutoff_seconds",
                format!("{} is out of range", self.day_cutoff_seconds),
            ));
        }

        if let Some(num) = self.num_buckets {
            if num <= 0 {
                return Err(StatsError::invalid_argument(
                    "num_buckets",
                    format!("must be positive, got {num}"),
                ));
            }

            if self.window_ms(num).is_none() {
                return Err(StatsError::invalid_argument(
                    "num_buckets",
                    format!("{num} buckets of {} days is out of range", self.bucket_size_days),
                ));
            }
        }

        Ok(())
    }

    fn window_ms(&self, num_buckets: i64) -> Option<i64> {
        let window = self
            .bucket_size_days
            .checked_mul(num_buckets)?
            .checked_mul(MS_PER_DAY)?;
        self.day_cutoff_seconds.checked_mul(1000)?.checked_sub(window)
    }

    /// Reviews before this are only used to find out when cards were first learned.
    pub fn id_cutoff(&self) -> Option<EventId> {
        self.num_buckets.and_then(|num| self.window_ms(num))
    }

    /// The oldest bucket that always shows up in the output.
    pub(crate) fn min_bucket_index(&self) -> BucketIndex {
        match self.num_buckets {
            Some(num) => 1 - num,
            None => 0,
        }
    }

    /// Which bucket a review falls into, 0 being the bucket that ends at the cutoff.
    ///
    /// Equal to `round((secs - cutoff) / 86400 / bucket_size + 0.5)` with
    /// halves rounded towards positive infinity, done in integers so a review
    /// exactly on a bucket boundary always lands in the later bucket. Only
    /// called on validated params, through [`ReviewQuery::to_row`].
    pub(crate) fn bucket_index(&self, event_id: EventId) -> BucketIndex {
        let span = self.bucket_size_days * MS_PER_DAY;
        let delta = event_id.saturating_sub(self.day_cutoff_seconds * 1000);
        delta.div_euclid(span) + 1
    }

    pub fn query(&self) -> Result<ReviewQuery> {
        self.validate()?;
        Ok(ReviewQuery { params: *self })
    }
}

/// Validated parameters handed to a review source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewQuery {
    params: StatsParams,
}

impl ReviewQuery {
    pub fn params(&self) -> &StatsParams {
        &self.params
    }

    pub fn id_cutoff(&self) -> Option<EventId> {
        self.params.id_cutoff()
    }

    /// Reviews inside the window, plus older ones where a card left learning.
    pub fn retains(&self, entry: &RevlogEntry) -> bool {
        match self.id_cutoff() {
            Some(cutoff) => entry.id >= cutoff || entry.is_learning_exit(),
            None => true,
        }
    }

    pub fn to_row(&self, entry: &RevlogEntry) -> ReviewRow {
        ReviewRow {
            event_id: entry.id,
            bucket_index: self.params.bucket_index(entry.id),
            card_id: entry.cid,
            ease: entry.ease,
            interval_after: entry.ivl,
            interval_before: entry.last_ivl,
            kind: entry.kind,
        }
    }
}

/// The graph ranges people usually look at.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RangeType {
    /// Last 30 days, one bucket per day.
    #[default]
    Month,
    /// Last 52 weeks, one bucket per week.
    Year,
    /// All of history in 30 day buckets.
    Life,
}

impl RangeType {
    pub fn bucket_size_days(&self) -> i64 {
        match self {
            Self::Month => 1,
            Self::Year => 7,
            Self::Life => 30,
        }
    }

    pub fn num_buckets(&self) -> Option<i64> {
        match self {
            Self::Month => Some(30),
            Self::Year => Some(52),
            Self::Life => None,
        }
    }

    pub fn params(&self, day_cutoff_seconds: i64) -> StatsParams {
        StatsParams {
            bucket_size_days: self.bucket_size_days(),
            day_cutoff_seconds,
            num_buckets: self.num_buckets(),
        }
    }
}
