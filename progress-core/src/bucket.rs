use std::collections::{BTreeMap, HashMap};

use nonempty::NonEmpty;
use tracing::debug;

use crate::{
    error::{Result, StatsError},
    first_learned::FirstLearned,
    review::{BucketIndex, CardId, EventId, ReviewEvent, ReviewRow},
};

/// All the reviews of one card within one bucket, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketGroup {
    pub bucket_index: BucketIndex,
    pub card_id: CardId,
    reviews: NonEmpty<ReviewEvent>,
}

impl BucketGroup {
    fn new(review: ReviewEvent) -> Self {
        Self {
            bucket_index: review.bucket_index,
            card_id: review.card_id,
            reviews: NonEmpty::new(review),
        }
    }

    fn push(&mut self, review: ReviewEvent) {
        self.reviews.push(review);
    }

    pub fn first(&self) -> &ReviewEvent {
        self.reviews.first()
    }

    pub fn last(&self) -> &ReviewEvent {
        self.reviews.last()
    }

    pub fn reviews(&self) -> impl Iterator<Item = &ReviewEvent> {
        self.reviews.iter()
    }

}

/// Keyed by bucket first so iterating walks the buckets in order.
pub type GroupKey = (BucketIndex, CardId);

#[derive(Debug, Default)]
pub struct Grouped {
    pub groups: BTreeMap<GroupKey, BucketGroup>,
    pub first_learned: FirstLearned,
}

/// Splits reviews up by bucket and card.
///
/// Every review is used to track when cards were first learned, but reviews
/// older than `id_cutoff` are dropped after that. The rows must be sorted by
/// id. Ids only have to be unique per card, different cards may share one.
pub fn group_reviews(rows: Vec<ReviewRow>, id_cutoff: Option<EventId>) -> Result<Grouped> {
    let mut grouped = Grouped::default();
    let mut prev: Option<EventId> = None;
    let mut last_by_card: HashMap<CardId, EventId> = HashMap::new();
    let mut skipped = 0;

    for row in rows {
        if let Some(prev) = prev {
            if row.event_id < prev {
                return Err(StatsError::InvalidPrecondition(format!(
                    "reviews not in ascending order: {} came after {}",
                    row.event_id, prev
                )));
            }
        }
        prev = Some(row.event_id);

        if last_by_card.insert(row.card_id, row.event_id) == Some(row.event_id) {
            return Err(StatsError::InvalidPrecondition(format!(
                "card {} has two reviews with id {}",
                row.card_id, row.event_id
            )));
        }

        let first_learned = grouped.first_learned.observe(&row);

        if id_cutoff.is_some_and(|cutoff| row.event_id < cutoff) {
            skipped += 1;
            continue;
        }

        let review = ReviewEvent::new(row, first_learned);
        let key = (review.bucket_index, review.card_id);
        match grouped.groups.get_mut(&key) {
            Some(group) => group.push(review),
            None => {
                grouped.groups.insert(key, BucketGroup::new(review));
            }
        }
    }

    debug!(
        "grouped reviews into {} groups, {} reviews before cutoff, {} cards learned",
        grouped.groups.len(),
        skipped,
        grouped.first_learned.len()
    );

    Ok(grouped)
}
