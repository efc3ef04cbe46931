use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use config::Config;
use eyre::{eyre, Result, WrapErr};
use progress_core::{
    get_stats, local_day_cutoff, EntryFilter, ProgressStats, RangeType, RevlogEntry, StatsError,
    StatsParams,
};
use progress_provider::{AnkiSource, JsonFileSource};
use tracing::{info, Level};

mod config;
mod output;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

/// Learning progress over time from a spaced repetition review log.
#[derive(Parser, Debug)]
#[command(name = "progress-stats", version)]
struct Cli {
    /// Anki collection or json review log.
    #[arg(long)]
    source: Option<PathBuf>,

    /// month, year or life.
    #[arg(long, value_parser = parse_range)]
    range: Option<RangeType>,

    /// Days per bucket, overrides the range.
    #[arg(long)]
    bucket_size: Option<i64>,

    /// How many buckets back to look, overrides the range.
    #[arg(long)]
    buckets: Option<i64>,

    /// Hour of the day when a new day starts.
    #[arg(long, conflicts_with = "cutoff")]
    cutoff_hour: Option<u32>,

    /// Start of the next day in seconds since epoch.
    #[arg(long)]
    cutoff: Option<i64>,

    /// Only count these cards.
    #[arg(long = "card")]
    cards: Vec<i64>,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_range(s: &str) -> Result<RangeType, String> {
    s.parse()
        .map_err(|_| format!("unknown range {s:?}, expected month, year or life"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

impl Cli {
    fn params(&self, config: &Config) -> Result<StatsParams> {
        let cutoff = match self.cutoff {
            Some(cutoff) => cutoff,
            None => local_day_cutoff(self.cutoff_hour.unwrap_or(config.cutoff_hour))?,
        };

        let mut params = self.range.unwrap_or(config.range).params(cutoff);
        if let Some(size) = self.bucket_size {
            params.bucket_size_days = size;
        }
        if let Some(num) = self.buckets {
            params.num_buckets = Some(num);
        }

        params.validate()?;
        Ok(params)
    }
}

fn load_stats(
    source: &Path,
    params: &StatsParams,
    cards: &[i64],
) -> std::result::Result<ProgressStats, StatsError> {
    let is_json = source.extension().is_some_and(|ext| ext == "json");

    if is_json {
        let source = JsonFileSource::new(source);
        if cards.is_empty() {
            return get_stats(&source, params, None);
        }

        let cards = cards.to_vec();
        let only_cards: &EntryFilter = &move |entry: &RevlogEntry| cards.contains(&entry.cid);
        get_stats(&source, params, Some(only_cards))
    } else {
        let filter = card_filter_sql(cards);
        get_stats(&AnkiSource::new(source), params, filter.as_deref())
    }
}

fn card_filter_sql(cards: &[i64]) -> Option<String> {
    if cards.is_empty() {
        return None;
    }

    let ids: Vec<String> = cards.iter().map(|cid| cid.to_string()).collect();
    Some(format!("cid IN ({})", ids.join(", ")))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path().ok_or_else(|| eyre!("no config directory found"))?,
    };
    let config = Config::load(&config_path)?;
    info!("using config at {config_path:?}");

    let source = cli
        .source
        .clone()
        .or_else(|| config.source.clone())
        .ok_or_else(|| eyre!("no review log given, pass --source or set source in {config_path:?}"))?;

    let params = cli.params(&config)?;
    info!("reading reviews from {source:?} with {params:?}");

    let stats = load_stats(&source, &params, &cli.cards)
        .wrap_err_with(|| format!("computing stats from {source:?}"))?;

    match cli.format {
        Format::Table => output::print_table(&stats, &params),
        Format::Json => println!("{}", output::to_json(&stats, &params)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use progress_core::{params::MS_PER_DAY, Metric, ReviewKind};

    use super::*;

    const CUTOFF: i64 = 1_700_000_000;

    #[test]
    fn test_card_filter_sql() {
        assert_eq!(card_filter_sql(&[]), None);
        assert_eq!(card_filter_sql(&[1, 22]).as_deref(), Some("cid IN (1, 22)"));
    }

    #[test]
    fn test_params_override_range() {
        let cli = Cli::try_parse_from([
            "progress-stats",
            "--range",
            "year",
            "--buckets",
            "10",
            "--cutoff",
            "1700000000",
        ])
        .unwrap();

        let params = cli.params(&Config::default()).unwrap();
        assert_eq!(params.bucket_size_days, 7);
        assert_eq!(params.num_buckets, Some(10));
        assert_eq!(params.day_cutoff_seconds, CUTOFF);
    }

    #[test]
    fn test_range_from_config() {
        let cli = Cli::try_parse_from(["progress-stats", "--cutoff", "1700000000"]).unwrap();
        let config = Config {
            range: RangeType::Life,
            ..Default::default()
        };

        let params = cli.params(&config).unwrap();
        assert_eq!(params.bucket_size_days, 30);
        assert_eq!(params.num_buckets, None);
    }

    #[test]
    fn test_invalid_args() {
        assert!(Cli::try_parse_from(["progress-stats", "--range", "decade"]).is_err());
        assert!(Cli::try_parse_from([
            "progress-stats",
            "--cutoff",
            "1",
            "--cutoff-hour",
            "4"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["progress-stats", "--cutoff", "1", "--bucket-size", "0"])
            .unwrap();
        assert!(cli.params(&Config::default()).is_err());
    }

    #[test]
    fn test_json_source_with_cards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revlog.json");
        let entry = |id: i64, cid: i64| RevlogEntry {
            id,
            cid,
            ease: 3,
            ivl: 1,
            last_ivl: -60,
            kind: ReviewKind::Learning,
        };
        let now = CUTOFF * 1000 - MS_PER_DAY / 2;
        JsonFileSource::save(&path, &[entry(now, 1), entry(now + 1, 2)]).unwrap();

        let params = StatsParams::new(1, CUTOFF, Some(1)).unwrap();
        let all = load_stats(&path, &params, &[]).unwrap();
        let some = load_stats(&path, &params, &[2]).unwrap();

        assert_eq!(all.get(Metric::LearnedCards).unwrap(), &vec![(0, 2)]);
        assert_eq!(some.get(Metric::LearnedCards).unwrap(), &vec![(0, 1)]);
    }
}
