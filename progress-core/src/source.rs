use tracing::trace;

use crate::{
    error::Result,
    params::ReviewQuery,
    review::{RevlogEntry, ReviewRow},
};

/// Somewhere reviews can be loaded from.
pub trait ReviewSource {
    /// Narrows down which reviews are fetched, e.g. to a single deck.
    type Filter: ?Sized;

    /// Reviews matching the query, oldest first.
    ///
    /// Within a window this must also return older reviews where a card left
    /// the learning phase, see [`ReviewQuery::retains`].
    fn fetch(&self, query: &ReviewQuery, filter: Option<&Self::Filter>) -> Result<Vec<ReviewRow>>;
}

pub type EntryFilter = dyn Fn(&RevlogEntry) -> bool;

/// Picks out and buckets the entries a query asks for, keeping their order.
pub fn select_rows(
    entries: &[RevlogEntry],
    query: &ReviewQuery,
    filter: Option<&EntryFilter>,
) -> Vec<ReviewRow> {
    let rows: Vec<ReviewRow> = entries
        .iter()
        .filter(|entry| query.retains(entry))
        .filter(|entry| filter.map_or(true, |f| f(*entry)))
        .map(|entry| query.to_row(entry))
        .collect();

    trace!("selected {} of {} entries", rows.len(), entries.len());
    rows
}

/// Reviews kept in memory.
#[derive(Clone, Debug, Default)]
pub struct MemSource {
    entries: Vec<RevlogEntry>,
}

impl MemSource {
    pub fn new(entries: Vec<RevlogEntry>) -> Self {
        Self { entries }
    }
}

impl ReviewSource for MemSource {
    type Filter = EntryFilter;

    fn fetch(&self, query: &ReviewQuery, filter: Option<&Self::Filter>) -> Result<Vec<ReviewRow>> {
        Ok(select_rows(&self.entries, query, filter))
    }
}
