use serde::{Deserialize, Serialize};

/// Milliseconds since epoch. Also the id of a review.
pub type EventId = i64;
/// Id of a card, equal to its creation time in milliseconds.
pub type CardId = i64;
/// 0 is the current bucket, -1 the one before it, and so on.
pub type BucketIndex = i64;

/// Cards with an interval of at least this many days are mature.
pub const MATURE_THRESHOLD: i64 = 21;

/// Coarse classification of a review as stored by the scheduler.
///
/// Not reliable. A card reviewed in a filtered deck may exit learning while
/// being flagged as something else, so this is carried around but never used
/// to decide whether a card was learned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ReviewKind {
    Learning,
    Review,
    Relearning,
    Filtered,
    Manual,
    Other(i64),
}

impl From<i64> for ReviewKind {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Learning,
            1 => Self::Review,
            2 => Self::Relearning,
            3 => Self::Filtered,
            4 => Self::Manual,
            other => Self::Other(other),
        }
    }
}

impl From<ReviewKind> for i64 {
    fn from(kind: ReviewKind) -> Self {
        match kind {
            ReviewKind::Learning => 0,
            ReviewKind::Review => 1,
            ReviewKind::Relearning => 2,
            ReviewKind::Filtered => 3,
            ReviewKind::Manual => 4,
            ReviewKind::Other(code) => code,
        }
    }
}

/// A review the way it's stored in the review log.
///
/// Intervals are days when positive and seconds when negative (learning).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevlogEntry {
    pub id: EventId,
    pub cid: CardId,
    /// 1 for again, 4 for easy.
    pub ease: u8,
    pub ivl: i64,
    #[serde(rename = "lastIvl")]
    pub last_ivl: i64,
    #[serde(rename = "type")]
    pub kind: ReviewKind,
}

impl RevlogEntry {
    pub fn is_learning_exit(&self) -> bool {
        is_learning_exit(self.last_ivl, self.ivl)
    }
}

/// A review assigned to its bucket, as handed out by a [`crate::ReviewSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRow {
    pub event_id: EventId,
    pub bucket_index: BucketIndex,
    pub card_id: CardId,
    pub ease: u8,
    pub interval_after: i64,
    pub interval_before: i64,
    pub kind: ReviewKind,
}

impl ReviewRow {
    pub fn is_learning_exit(&self) -> bool {
        is_learning_exit(self.interval_before, self.interval_after)
    }
}

/// A review together with the id of the review where its card first left
/// the learning phase, if that had happened by then.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewEvent {
    pub event_id: EventId,
    pub card_id: CardId,
    pub bucket_index: BucketIndex,
    pub ease: u8,
    pub interval_after: i64,
    pub interval_before: i64,
    pub kind: ReviewKind,
    pub first_learned_event_id: Option<EventId>,
}

impl ReviewEvent {
    pub fn new(row: ReviewRow, first_learned_event_id: Option<EventId>) -> Self {
        Self {
            event_id: row.event_id,
            card_id: row.card_id,
            bucket_index: row.bucket_index,
            ease: row.ease,
            interval_after: row.interval_after,
            interval_before: row.interval_before,
            kind: row.kind,
            first_learned_event_id,
        }
    }

    /// The review went from young to mature.
    pub fn matured(&self) -> bool {
        self.interval_before < MATURE_THRESHOLD && self.interval_after >= MATURE_THRESHOLD
    }

    /// This is the review where the card left learning for the very first time.
    pub fn first_learned(&self) -> bool {
        is_learning_exit(self.interval_before, self.interval_after)
            && Some(self.event_id) == self.first_learned_event_id
    }
}

/// Learning intervals are negative seconds, so going from negative to
/// positive means the card graduated.
pub fn is_learning_exit(interval_before: i64, interval_after: i64) -> bool {
    interval_before < 0 && interval_after > 0
}
