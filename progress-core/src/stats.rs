use std::collections::{BTreeMap, HashMap};

use strum::IntoEnumIterator;
use tracing::{debug, trace};

use crate::{
    bucket::{BucketGroup, GroupKey},
    metric::{Metric, ProgressStats},
    params::StatsParams,
    review::{BucketIndex, CardId, MATURE_THRESHOLD},
};

/// Counters for a single bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BucketStats {
    pub matured_cards: u32,
    pub matured_reviews: u32,
    pub lost_matured_card: u32,
    pub learned_cards: u32,
}

impl BucketStats {
    pub fn net_matured_cards(&self) -> i64 {
        i64::from(self.matured_cards) - i64::from(self.lost_matured_card)
    }

    pub fn value(&self, metric: Metric) -> i64 {
        match metric {
            Metric::MaturedCards => self.matured_cards.into(),
            Metric::NetMaturedCards => self.net_matured_cards(),
            Metric::MaturedReviews => self.matured_reviews.into(),
            Metric::LostMaturedCard => self.lost_matured_card.into(),
            Metric::LearnedCards => self.learned_cards.into(),
        }
    }

    fn add(&mut self, transition: &Transition) {
        self.matured_cards += u32::from(transition.matured);
        self.matured_reviews += transition.matured_reviews;
        self.lost_matured_card += u32::from(transition.lost_matured);
        self.learned_cards += u32::from(transition.learned);
    }
}

/// What happened to one card during one bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub matured: bool,
    pub matured_reviews: u32,
    pub lost_matured: bool,
    pub learned: bool,
}

/// Compares the interval the card had going into the bucket with the one it
/// ended up with.
///
/// `prior_interval` is what the card's last review in an earlier bucket left
/// it at, 0 if there was none. The stored interval before a review isn't
/// always right, so it's only used when there's nothing better.
pub fn classify(group: &BucketGroup, prior_interval: i64) -> Transition {
    let prior = match prior_interval {
        0 => group.first().interval_before,
        ivl => ivl,
    };
    let after = group.last().interval_after;

    let matured_reviews = group.reviews().filter(|review| review.matured()).count();

    Transition {
        matured: prior < MATURE_THRESHOLD && after >= MATURE_THRESHOLD,
        // a card can lapse and mature again in the same bucket
        matured_reviews: u32::try_from(matured_reviews).unwrap_or(u32::MAX),
        lost_matured: prior >= MATURE_THRESHOLD && after < MATURE_THRESHOLD,
        // a first/last comparison would miss this when the card lapses right after
        learned: group.reviews().any(|review| review.first_learned()),
    }
}

/// Walks the groups bucket by bucket and tallies up the metrics.
///
/// Buckets without reviews between the oldest and newest bucket (or the
/// requested window) come out as zero. No groups means no stats at all.
/// `params` must have been validated.
pub(crate) fn compute(groups: &BTreeMap<GroupKey, BucketGroup>, params: &StatsParams) -> ProgressStats {
    let mut out = ProgressStats::default();

    if groups.is_empty() {
        debug!("no reviews in range");
        return out;
    }

    let mut min_bucket = params.min_bucket_index();
    let mut max_bucket: BucketIndex = 0;
    let mut by_bucket: BTreeMap<BucketIndex, BucketStats> = BTreeMap::new();
    let mut last_interval: HashMap<CardId, i64> = HashMap::new();

    for (&(bucket_index, card_id), group) in groups {
        min_bucket = min_bucket.min(bucket_index);
        max_bucket = max_bucket.max(bucket_index);

        let prior = last_interval.get(&card_id).copied().unwrap_or(0);
        let transition = classify(group, prior);
        trace!("bucket {bucket_index} card {card_id}: {transition:?}");

        by_bucket.entry(bucket_index).or_default().add(&transition);
        last_interval.insert(card_id, group.last().interval_after);
    }

    debug!(
        "{} cards over {} active buckets, range {}..={}",
        last_interval.len(),
        by_bucket.len(),
        min_bucket,
        max_bucket
    );

    for bucket in min_bucket..=max_bucket {
        let stats = by_bucket.get(&bucket).copied().unwrap_or_default();
        for metric in Metric::iter() {
            out.push(metric, bucket, stats.value(metric));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bucket::group_reviews,
        review::{EventId, ReviewKind, ReviewRow},
    };

    fn row(event_id: EventId, bucket_index: BucketIndex, before: i64, after: i64) -> ReviewRow {
        ReviewRow {
            event_id,
            bucket_index,
            card_id: 1,
            ease: 3,
            interval_after: after,
            interval_before: before,
            kind: ReviewKind::Review,
        }
    }

    fn single_group(rows: Vec<ReviewRow>) -> BucketGroup {
        let grouped = group_reviews(rows, None).unwrap();
        assert_eq!(grouped.groups.len(), 1);
        grouped.groups.into_values().next().unwrap()
    }

    #[test]
    fn test_falls_back_to_stored_interval() {
        let group = single_group(vec![row(1, 0, 30, 10)]);

        assert!(classify(&group, 0).lost_matured);
        assert!(!classify(&group, 5).lost_matured);
    }

    #[test]
    fn test_carried_interval_wins() {
        // stored interval says young, but the card was mature last bucket
        let group = single_group(vec![row(1, 0, 4, 30)]);

        let transition = classify(&group, 25);
        assert!(!transition.matured);
        assert_eq!(transition.matured_reviews, 1);
    }

    #[test]
    fn test_lapse_after_learning_still_counts() {
        let group = single_group(vec![row(1, 0, -60, 1), row(2, 0, 1, -600)]);

        let transition = classify(&group, 0);
        assert!(transition.learned);
        assert!(!transition.matured);
    }

    #[test]
    fn test_relearning_is_not_learning() {
        let rows = vec![row(1, -1, -60, 1), row(2, 0, 1, -600), row(3, 0, -600, 2)];
        let grouped = group_reviews(rows, None).unwrap();
        let group = &grouped.groups[&(0, 1)];

        assert!(!classify(group, 1).learned);
    }

    #[test]
    fn test_bucket_stats_values() {
        let stats = BucketStats {
            matured_cards: 1,
            matured_reviews: 3,
            lost_matured_card: 4,
            learned_cards: 2,
        };

        assert_eq!(stats.value(Metric::NetMaturedCards), -3);
        assert_eq!(stats.value(Metric::MaturedReviews), 3);
    }
}
