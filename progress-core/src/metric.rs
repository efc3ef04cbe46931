use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::review::BucketIndex;

/// One value per bucket, sorted by bucket with no gaps.
pub type Series = Vec<(BucketIndex, i64)>;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Cards that went from young to mature.
    MaturedCards,
    /// Matured cards minus the ones that lost maturity.
    NetMaturedCards,
    /// Reviews that made a card mature.
    MaturedReviews,
    /// Cards that went from mature to young.
    LostMaturedCard,
    /// Cards that left the learning phase for the first time.
    LearnedCards,
}

impl Metric {
    pub fn title(&self) -> &'static str {
        match self {
            Self::MaturedCards => "Matured Cards",
            Self::NetMaturedCards => "Net Matured Cards",
            Self::MaturedReviews => "Matured Reviews",
            Self::LostMaturedCard => "Matured Cards Lost",
            Self::LearnedCards => "Learned Cards",
        }
    }

    /// Whether a running total of this metric means anything.
    pub fn is_cumulative(&self) -> bool {
        matches!(self, Self::NetMaturedCards | Self::LearnedCards)
    }
}

/// Every metric's series. Empty when there were no reviews to look at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProgressStats(BTreeMap<Metric, Series>);

impl ProgressStats {
    pub(crate) fn push(&mut self, metric: Metric, bucket: BucketIndex, value: i64) {
        self.0.entry(metric).or_default().push((bucket, value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, metric: Metric) -> Option<&Series> {
        self.0.get(&metric)
    }

    pub fn series_by_name(&self, name: &str) -> Option<&Series> {
        self.get(name.parse().ok()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &Series)> {
        self.0.iter().map(|(metric, series)| (*metric, series))
    }

    /// The buckets covered, which are the same for every metric.
    pub fn buckets(&self) -> Vec<BucketIndex> {
        Metric::iter()
            .find_map(|metric| self.get(metric))
            .map(|series| series.iter().map(|(bucket, _)| *bucket).collect())
            .unwrap_or_default()
    }
}
