use std::collections::BTreeMap;

use console::style;
use eyre::Result;
use progress_core::{BucketIndex, Metric, ProgressStats, StatsParams, Summary};
use serde::Serialize;
use strum::IntoEnumIterator;

/// Everything that goes into the json output.
#[derive(Serialize)]
struct Report<'a> {
    params: &'a StatsParams,
    stats: &'a ProgressStats,
    summary: BTreeMap<&'static str, Summary>,
}

pub fn summaries(stats: &ProgressStats, params: &StatsParams) -> Vec<(Metric, Summary)> {
    stats
        .iter()
        .map(|(metric, series)| (metric, Summary::new(series, params.bucket_size_days)))
        .collect()
}

pub fn to_json(stats: &ProgressStats, params: &StatsParams) -> Result<String> {
    let summary = summaries(stats, params)
        .into_iter()
        .map(|(metric, summary)| (<&'static str>::from(metric), summary))
        .collect();

    let report = Report {
        params,
        stats,
        summary,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// `-3d`, `-3w`, `-3mo` depending on bucket size.
pub fn bucket_label(bucket: BucketIndex, bucket_size_days: i64) -> String {
    match bucket_size_days {
        1 => format!("{bucket}d"),
        7 => format!("{bucket}w"),
        30 => format!("{bucket}mo"),
        size => format!("{}d", bucket * size),
    }
}

pub fn render_table(stats: &ProgressStats, params: &StatsParams) -> String {
    if stats.is_empty() {
        return "no reviews in range\n".to_string();
    }

    let mut out = String::new();
    let metrics: Vec<Metric> = Metric::iter().collect();

    out.push_str(&format!("{:>8}", "bucket"));
    for metric in &metrics {
        out.push_str(&format!(" {:>19}", metric.title()));
    }
    out.push('\n');

    for (idx, bucket) in stats.buckets().into_iter().enumerate() {
        out.push_str(&format!("{:>8}", bucket_label(bucket, params.bucket_size_days)));
        for metric in &metrics {
            let value = stats
                .get(*metric)
                .and_then(|series| series.get(idx))
                .map(|(_, value)| *value)
                .unwrap_or_default();
            out.push_str(&format!(" {value:>19}"));
        }
        out.push('\n');
    }

    out.push('\n');
    for (metric, summary) in summaries(stats, params) {
        out.push_str(&format!(
            "{:<20} average {:.1} cards/day",
            metric.title(),
            summary.average_per_day
        ));
        if metric.is_cumulative() {
            out.push_str(&format!(", total {} cards", summary.total));
        }
        out.push('\n');
    }

    out
}

pub fn print_table(stats: &ProgressStats, params: &StatsParams) {
    let table = render_table(stats, params);
    let mut lines = table.lines();
    if let Some(header) = lines.next() {
        println!("{}", style(header).bold());
    }
    for line in lines {
        println!("{line}");
    }
}
