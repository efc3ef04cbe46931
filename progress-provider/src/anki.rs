use std::path::PathBuf;

use progress_core::{ReviewKind, ReviewQuery, ReviewRow, ReviewSource, RevlogEntry, StatsError};
use rusqlite::{named_params, Connection, OpenFlags, Row};
use tracing::debug;

/// The review log of an anki collection.
///
/// Filters are sql appended to the where clause, e.g. to limit the reviews to
/// the cards of one deck.
#[derive(Clone, Debug)]
pub struct AnkiSource {
    path: PathBuf,
}

impl AnkiSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    pub fn fetch_from(
        conn: &Connection,
        query: &ReviewQuery,
        filter: Option<&str>,
    ) -> rusqlite::Result<Vec<ReviewRow>> {
        let mut filters = vec![];
        if query.id_cutoff().is_some() {
            // older reviews are only needed to tell when cards were first learned
            filters.push("(id >= :cutoff OR (id < :cutoff AND ivl > 0 AND lastIvl < 0))".to_string());
        }
        if let Some(filter) = filter {
            filters.push(format!("({filter})"));
        }

        let where_clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            "SELECT id, cid, ease, ivl, lastIvl, type FROM revlog {where_clause} ORDER BY id ASC"
        );
        debug!("{sql}");

        let mut stmt = conn.prepare(&sql)?;
        let entries = match query.id_cutoff() {
            Some(cutoff) => stmt
                .query_map(named_params! { ":cutoff": cutoff }, entry_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], entry_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };

        debug!("loaded {} reviews from revlog", entries.len());
        Ok(entries.iter().map(|entry| query.to_row(entry)).collect())
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<RevlogEntry> {
    Ok(RevlogEntry {
        id: row.get(0)?,
        cid: row.get(1)?,
        ease: row.get(2)?,
        ivl: row.get(3)?,
        last_ivl: row.get(4)?,
        kind: ReviewKind::from(row.get::<_, i64>(5)?),
    })
}

impl ReviewSource for AnkiSource {
    type Filter = str;

    fn fetch(
        &self,
        query: &ReviewQuery,
        filter: Option<&Self::Filter>,
    ) -> Result<Vec<ReviewRow>, StatsError> {
        let conn = self.open().map_err(StatsError::from_source)?;
        Self::fetch_from(&conn, query, filter).map_err(StatsError::from_source)
    }
}
