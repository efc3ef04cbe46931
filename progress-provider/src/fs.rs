use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use progress_core::{
    source::{select_rows, EntryFilter},
    ReviewQuery, ReviewRow, ReviewSource, RevlogEntry, StatsError,
};
use tracing::debug;

/// A review log exported as a json array of revlog entries.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All entries in the file, oldest first.
    pub fn load(&self) -> Result<Vec<RevlogEntry>, StatsError> {
        let file = File::open(&self.path).map_err(StatsError::from_source)?;
        let mut entries: Vec<RevlogEntry> =
            serde_json::from_reader(BufReader::new(file)).map_err(StatsError::from_source)?;
        entries.sort_by_key(|entry| entry.id);

        debug!("loaded {} entries from {:?}", entries.len(), self.path);
        Ok(entries)
    }

    pub fn save(path: &Path, entries: &[RevlogEntry]) -> Result<(), StatsError> {
        let file = File::create(path).map_err(StatsError::from_source)?;
        serde_json::to_writer(file, entries).map_err(StatsError::from_source)
    }
}

impl ReviewSource for JsonFileSource {
    type Filter = EntryFilter;

    fn fetch(
        &self,
        query: &ReviewQuery,
        filter: Option<&Self::Filter>,
    ) -> Result<Vec<ReviewRow>, StatsError> {
        let entries = self.load()?;
        Ok(select_rows(&entries, query, filter))
    }
}

#[cfg(test)]
mod tests {
    use progress_core::{get_stats, Metric, ReviewKind, StatsParams};

    use super::*;

    const CUTOFF: i64 = 1_700_000_000;

    #[test]
    fn test_loads_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revlog.json");
        std::fs::write(
            &path,
            format!(
                r#"[
                    {{"id": {b}, "cid": 1, "ease": 3, "ivl": 4, "lastIvl": 1, "type": 1}},
                    {{"id": {a}, "cid": 1, "ease": 3, "ivl": 1, "lastIvl": -600, "type": 0}}
                ]"#,
                a = CUTOFF * 1000 - 1000,
                b = CUTOFF * 1000 - 500,
            ),
        )
        .unwrap();

        let source = JsonFileSource::new(&path);
        let entries = source.load().unwrap();
        assert_eq!(entries[0].kind, ReviewKind::Learning);
        assert!(entries[0].id < entries[1].id);

        let params = StatsParams::new(1, CUTOFF, Some(3)).unwrap();
        let stats = get_stats(&source, &params, None).unwrap();
        assert_eq!(
            stats.get(Metric::LearnedCards).unwrap(),
            &vec![(-2, 0), (-1, 0), (0, 1)]
        );
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revlog.json");
        let entries = vec![RevlogEntry {
            id: 5,
            cid: 2,
            ease: 1,
            ivl: -600,
            last_ivl: 3,
            kind: ReviewKind::Relearning,
        }];

        JsonFileSource::save(&path, &entries).unwrap();
        assert_eq!(JsonFileSource::new(&path).load().unwrap(), entries);
    }

    #[test]
    fn test_missing_file() {
        let source = JsonFileSource::new("/nonexistent/revlog.json");
        assert!(matches!(source.load(), Err(StatsError::Source(_))));
    }
}
