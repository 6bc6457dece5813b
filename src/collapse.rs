//! Interval collapsing: merge runs of same-pair source fragments.
//!
//! The raw source fragments a single logical link across many rows (rate
//! changes, exchange moves, re-filings). A *run* is a maximal stretch of
//! consecutive rows — in `(firm, link_start, security, link_end)` order —
//! whose pair is unchanged; a run collapses to one span from the first
//! row's start to the latest end seen in the run. Gaps internal to a run
//! are absorbed: fragmentation is an artifact of the upstream feed, not a
//! statement about calendar coverage.
//!
//! A cleanup pass then restores the per-pair invariant: spans of the same
//! pair that overlap or touch are merged, and spans fully subsumed by a
//! wider sibling are discarded. Consolidation iterates to a fixed point,
//! so applying it to its own output changes nothing.

use chrono::NaiveDate;

use crate::model::{ConsolidatedInterval, FirmId, LinkRecord, SecurityId};
use crate::report::BuildReport;

/// Collapse normalized records into consolidated per-pair spans.
pub fn collapse(records: &[LinkRecord], report: &mut BuildReport) -> Vec<ConsolidatedInterval> {
    let spans = records
        .iter()
        .map(|r| ConsolidatedInterval {
            pair: r.pair,
            link_start: r.link_start,
            link_end: r.link_end,
            collapsed: false,
        })
        .collect();
    consolidate(spans, report)
}

/// Core consolidation over already-built spans, iterated to a fixed point.
///
/// Each round only merges or discards spans, so the span count strictly
/// decreases on every changing round and the loop terminates.
pub fn consolidate(
    mut spans: Vec<ConsolidatedInterval>,
    report: &mut BuildReport,
) -> Vec<ConsolidatedInterval> {
    loop {
        let (next, changed) = consolidate_round(spans, report);
        spans = next;
        if !changed {
            return spans;
        }
    }
}

fn consolidate_round(
    mut spans: Vec<ConsolidatedInterval>,
    report: &mut BuildReport,
) -> (Vec<ConsolidatedInterval>, bool) {
    let mut changed = false;

    // Run merge: consecutive same-pair spans in global sort order belong
    // to one run, whatever the gap between them.
    spans.sort_by_key(sort_key);
    let mut merged: Vec<ConsolidatedInterval> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(prev) if prev.pair == span.pair => {
                prev.link_end = prev.link_end.max(span.link_end);
                prev.collapsed = true;
                report.records_collapsed += 1;
                changed = true;
            }
            _ => merged.push(span),
        }
    }

    // Per-pair cleanup: runs of the same pair separated by an intervening
    // pair may still overlap or touch as spans; merge those, and drop
    // spans subsumed by a wider sibling. Sorting end-descending within a
    // start puts the widest span first so subsumed siblings follow it.
    merged.sort_by(|a, b| {
        a.pair
            .cmp(&b.pair)
            .then(a.link_start.cmp(&b.link_start))
            .then(b.link_end.cmp(&a.link_end))
    });
    let mut out: Vec<ConsolidatedInterval> = Vec::with_capacity(merged.len());
    for span in merged {
        match out.last_mut() {
            Some(prev) if prev.pair == span.pair && touches(prev.link_end, span.link_start) => {
                if span.link_end <= prev.link_end {
                    report.duplicates_discarded += 1;
                    prev.collapsed |= span.collapsed;
                } else {
                    prev.link_end = span.link_end;
                    prev.collapsed = true;
                    report.records_collapsed += 1;
                }
                changed = true;
            }
            _ => out.push(span),
        }
    }

    out.sort_by_key(sort_key);
    (out, changed)
}

fn sort_key(span: &ConsolidatedInterval) -> (FirmId, NaiveDate, SecurityId, NaiveDate) {
    (
        span.pair.firm,
        span.link_start,
        span.pair.security,
        span.link_end,
    )
}

/// Whether a span starting at `start` overlaps or is calendar-adjacent to
/// a span ending at `end`.
fn touches(end: NaiveDate, start: NaiveDate) -> bool {
    match end.succ_opt() {
        Some(next_day) => start <= next_day,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkType, PairKey};
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(firm: u32, security: u32, start: NaiveDate, end: NaiveDate) -> LinkRecord {
        LinkRecord {
            pair: PairKey::new(FirmId(firm), SecurityId(security)),
            link_start: start,
            link_end: end,
            link_type: LinkType::from("LC"),
            issue_class: None,
        }
    }

    #[test]
    fn test_contiguous_fragments_collapse_to_one_span() {
        // Three fragments of one link, including a single-day stub.
        let records = vec![
            rec(1, 10, d(1972, 1, 1), d(1976, 12, 30)),
            rec(1, 10, d(1976, 12, 31), d(1976, 12, 31)),
            rec(1, 10, d(1977, 1, 1), d(1977, 3, 30)),
        ];
        let mut report = BuildReport::default();
        let spans = collapse(&records, &mut report);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].link_start, d(1972, 1, 1));
        assert_eq!(spans[0].link_end, d(1977, 3, 30));
        assert!(spans[0].collapsed);
        assert_eq!(report.records_collapsed, 2);
    }

    #[test]
    fn test_gap_internal_to_run_is_absorbed() {
        let records = vec![
            rec(1, 10, d(1990, 1, 1), d(1992, 6, 30)),
            rec(1, 10, d(1994, 1, 1), d(1996, 6, 30)),
        ];
        let mut report = BuildReport::default();
        let spans = collapse(&records, &mut report);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].link_end, d(1996, 6, 30));
    }

    #[test]
    fn test_intervening_pair_breaks_the_run() {
        let records = vec![
            rec(1, 10, d(1970, 1, 1), d(1975, 12, 31)),
            rec(1, 20, d(1976, 1, 1), d(1980, 12, 31)),
            rec(1, 10, d(1981, 1, 1), d(1985, 12, 31)),
        ];
        let mut report = BuildReport::default();
        let spans = collapse(&records, &mut report);

        assert_eq!(spans.len(), 3);
        let tens: Vec<_> = spans
            .iter()
            .filter(|s| s.pair.security == SecurityId(10))
            .collect();
        assert_eq!(tens.len(), 2);
        assert!(tens.iter().all(|s| !s.collapsed));
    }

    #[test]
    fn test_subsumed_duplicate_discarded() {
        let records = vec![
            rec(1, 10, d(1990, 1, 1), d(1999, 12, 31)),
            rec(1, 20, d(1991, 1, 1), d(1991, 6, 30)),
            rec(1, 10, d(1992, 1, 1), d(1995, 12, 31)),
        ];
        let mut report = BuildReport::default();
        let spans = collapse(&records, &mut report);

        let tens: Vec<_> = spans
            .iter()
            .filter(|s| s.pair.security == SecurityId(10))
            .collect();
        assert_eq!(tens.len(), 1);
        assert_eq!(tens[0].link_start, d(1990, 1, 1));
        assert_eq!(tens[0].link_end, d(1999, 12, 31));
        assert_eq!(report.duplicates_discarded, 1);
    }

    #[test]
    fn test_same_pair_overlap_across_intervening_run_merges() {
        let records = vec![
            rec(1, 20, d(1965, 1, 1), d(1975, 12, 31)),
            rec(1, 10, d(1970, 1, 1), d(1975, 12, 31)),
            rec(1, 20, d(1976, 1, 1), d(1980, 12, 31)),
            rec(1, 10, d(1981, 1, 1), d(1985, 12, 31)),
        ];
        let mut report = BuildReport::default();
        let spans = collapse(&records, &mut report);

        // The two (1,20) runs touch and merge; the (1,10) spans then sit
        // adjacent in sort order and merge in the next round.
        assert_eq!(spans.len(), 2);
        for span in &spans {
            assert!(span.collapsed);
        }
    }

    #[test]
    fn test_consolidation_is_idempotent() {
        let records = vec![
            rec(1, 10, d(1972, 1, 1), d(1976, 12, 30)),
            rec(1, 10, d(1976, 12, 31), d(1976, 12, 31)),
            rec(1, 20, d(1977, 1, 1), d(1980, 3, 30)),
            rec(1, 10, d(1981, 1, 1), d(1985, 12, 31)),
            rec(2, 10, d(1960, 1, 1), d(1999, 12, 31)),
        ];
        let mut report = BuildReport::default();
        let first = collapse(&records, &mut report);
        let second = consolidate(first.clone(), &mut BuildReport::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        let mut report = BuildReport::default();
        assert!(collapse(&[], &mut report).is_empty());
    }
}
