use std::collections::HashMap;

use crate::review::{CardId, EventId, ReviewRow};

/// Remembers the review where each card left the learning phase for the first time.
///
/// The review kind can't be trusted for this, relearning in a filtered deck
/// looks just like learning. Instead the first review going from a negative
/// to a positive interval wins, and later ones (after a lapse) are ignored.
/// Reviews must be observed oldest first.
#[derive(Default, Debug, Clone)]
pub struct FirstLearned {
    inner: HashMap<CardId, EventId>,
}

impl FirstLearned {
    /// Returns the first learned id of the card as of this review.
    pub fn observe(&mut self, row: &ReviewRow) -> Option<EventId> {
        if row.is_learning_exit() {
            self.inner.entry(row.card_id).or_insert(row.event_id);
        }

        self.get(row.card_id)
    }

    pub fn get(&self, card: CardId) -> Option<EventId> {
        self.inner.get(&card).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
