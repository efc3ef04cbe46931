use std::collections::HashMap;

use progress_core::{
    get_stats, params::MS_PER_DAY, MemSource, Metric, ReviewKind, RevlogEntry, StatsParams,
};
use proptest::prelude::*;

const CUTOFF: i64 = 1_700_000_000;

/// Builds a review log where every card's interval before a review is the
/// interval after its previous one, like a real scheduler would.
fn revlog(steps: Vec<(i64, i64, i64)>) -> Vec<RevlogEntry> {
    let mut last_ivl: HashMap<i64, i64> = HashMap::new();
    let mut id = CUTOFF * 1000 - 90 * MS_PER_DAY;

    steps
        .into_iter()
        .map(|(cid, gap_secs, ivl)| {
            id += 1 + gap_secs * 1000;
            let before = last_ivl.insert(cid, ivl).unwrap_or(-60);
            RevlogEntry {
                id,
                cid,
                ease: 3,
                ivl,
                last_ivl: before,
                kind: ReviewKind::Review,
            }
        })
        .collect()
}

fn interval() -> impl Strategy<Value = i64> {
    prop_oneof![-1200i64..-1, 1i64..60]
}

fn steps() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
    prop::collection::vec((0i64..6, 0i64..200_000, interval()), 0..60)
}

fn num_buckets() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![Just(None), (1i64..120).prop_map(Some)]
}

proptest! {
    #[test]
    fn series_have_no_gaps(steps in steps(), num in num_buckets(), size in 1i64..31) {
        let params = StatsParams::new(size, CUTOFF, num).unwrap();
        let stats = get_stats(&MemSource::new(revlog(steps)), &params, None).unwrap();

        for (_, series) in stats.iter() {
            for pair in series.windows(2) {
                prop_assert_eq!(pair[0].0 + 1, pair[1].0);
            }
            prop_assert_eq!(series.len(), stats.buckets().len());
        }
    }

    #[test]
    fn net_is_matured_minus_lost(steps in steps(), num in num_buckets()) {
        let params = StatsParams::new(1, CUTOFF, num).unwrap();
        let stats = get_stats(&MemSource::new(revlog(steps)), &params, None).unwrap();

        if let (Some(net), Some(matured), Some(lost)) = (
            stats.get(Metric::NetMaturedCards),
            stats.get(Metric::MaturedCards),
            stats.get(Metric::LostMaturedCard),
        ) {
            for ((net, matured), lost) in net.iter().zip(matured).zip(lost) {
                prop_assert_eq!(net.1, matured.1 - lost.1);
            }
        }
    }

    #[test]
    fn matured_cards_never_exceed_matured_reviews(steps in steps()) {
        let params = StatsParams::new(1, CUTOFF, None).unwrap();
        let stats = get_stats(&MemSource::new(revlog(steps)), &params, None).unwrap();

        if let (Some(cards), Some(reviews)) =
            (stats.get(Metric::MaturedCards), stats.get(Metric::MaturedReviews))
        {
            for (cards, reviews) in cards.iter().zip(reviews) {
                prop_assert!(cards.1 <= reviews.1);
            }
        }
    }

    #[test]
    fn cards_are_learned_at_most_once(steps in steps()) {
        let entries = revlog(steps);
        let cards: std::collections::HashSet<i64> = entries.iter().map(|e| e.cid).collect();
        let params = StatsParams::new(1, CUTOFF, None).unwrap();
        let stats = get_stats(&MemSource::new(entries), &params, None).unwrap();

        let learned: i64 = stats
            .get(Metric::LearnedCards)
            .map(|series| series.iter().map(|(_, v)| v).sum())
            .unwrap_or(0);
        prop_assert!(learned <= cards.len() as i64);
    }

    #[test]
    fn same_input_same_output(steps in steps(), num in num_buckets()) {
        let source = MemSource::new(revlog(steps));
        let params = StatsParams::new(7, CUTOFF, num).unwrap();

        let first = get_stats(&source, &params, None).unwrap();
        let second = get_stats(&source, &params, None).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn empty_only_without_reviews(steps in steps()) {
        let entries = revlog(steps);
        let had_reviews = !entries.is_empty();
        let params = StatsParams::new(1, CUTOFF, None).unwrap();
        let stats = get_stats(&MemSource::new(entries), &params, None).unwrap();

        prop_assert_eq!(stats.is_empty(), !had_reviews);
    }
}
