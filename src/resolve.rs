//! Cross-pair overlap resolution: the "max rule".
//!
//! An axis identifier (a firm id or a security id) may be claimed by
//! several different pairs over time, but never by two at once. Per axis
//! value, competing intervals are ordered by `(start, end, pair)` and
//! folded against the last-kept interval:
//!
//! - disjoint → keep both;
//! - identical range → ambiguous; the lexicographically larger pair wins;
//! - nested (end no later than the kept end) → the nested interval is
//!   deleted, it adds no coverage;
//! - same start, later end → nothing of the kept interval would survive
//!   truncation; it is deleted and the newcomer takes its place;
//! - plain overlap → the later end wins: the kept interval's end is pulled
//!   back to the day before the newcomer starts.
//!
//! Truncation only ever shrinks an end, so one pass per axis suffices and
//! the second axis pass cannot reintroduce overlap on the first.

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::warn;

use crate::model::{ConsolidatedInterval, FirmId, PairKey, ResolvedInterval, SecurityId};
use crate::report::BuildReport;

/// Which side of the pair an operation groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Firm,
    Security,
}

/// An axis-tagged identifier. Carrying the tag keeps a firm key and a
/// security key with the same numeric value from ever landing in the same
/// group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKey {
    Firm(FirmId),
    Security(SecurityId),
}

impl Axis {
    /// Grouping key on this axis.
    pub fn key(self, pair: PairKey) -> AxisKey {
        match self {
            Axis::Firm => AxisKey::Firm(pair.firm),
            Axis::Security => AxisKey::Security(pair.security),
        }
    }

    /// The identifier on the other side; distinct counterparts are what
    /// make an axis value contested.
    pub fn counterpart(self, pair: PairKey) -> AxisKey {
        match self {
            Axis::Firm => AxisKey::Security(pair.security),
            Axis::Security => AxisKey::Firm(pair.firm),
        }
    }
}

/// Resolve overlaps on both axes. A pair can conflict on either side
/// independently, so the rule is applied once per axis.
pub fn resolve(
    intervals: Vec<ConsolidatedInterval>,
    report: &mut BuildReport,
) -> Vec<ResolvedInterval> {
    let resolved: Vec<ResolvedInterval> = intervals.into_iter().map(Into::into).collect();
    let resolved = resolve_axis(resolved, Axis::Security, report);
    let mut resolved = resolve_axis(resolved, Axis::Firm, report);
    resolved.sort_by_key(|iv| (iv.pair.firm, iv.link_start, iv.pair.security, iv.link_end));
    resolved
}

/// Apply the max rule to every contested value of one axis. Axis values
/// with a single counterpart for their whole history pass through
/// untouched.
pub fn resolve_axis(
    intervals: Vec<ResolvedInterval>,
    axis: Axis,
    report: &mut BuildReport,
) -> Vec<ResolvedInterval> {
    let mut groups: HashMap<AxisKey, SmallVec<[ResolvedInterval; 4]>> = HashMap::new();
    for iv in intervals {
        groups.entry(axis.key(iv.pair)).or_default().push(iv);
    }

    let mut out = Vec::new();
    for (_, mut group) in groups {
        if !is_contested(axis, &group) {
            out.extend(group);
            continue;
        }

        group.sort_by(|a, b| {
            a.link_start
                .cmp(&b.link_start)
                .then(a.link_end.cmp(&b.link_end))
                .then(a.pair.cmp(&b.pair))
        });

        let mut kept: Vec<ResolvedInterval> = Vec::with_capacity(group.len());
        for cur in group {
            let Some(prev) = kept.last_mut() else {
                kept.push(cur);
                continue;
            };

            if cur.link_start > prev.link_end {
                kept.push(cur);
            } else if cur.link_start == prev.link_start && cur.link_end == prev.link_end {
                warn!(
                    ?axis,
                    loser = %prev.pair,
                    winner = %cur.pair,
                    start = %cur.link_start,
                    end = %cur.link_end,
                    "identical competing ranges; keeping the larger pair id",
                );
                report.ambiguous_overlaps += 1;
                report.intervals_deleted += 1;
                *prev = cur;
            } else if cur.link_end <= prev.link_end {
                report.intervals_deleted += 1;
            } else if cur.link_start == prev.link_start {
                report.intervals_deleted += 1;
                *prev = cur;
            } else if let Some(day_before) = cur.link_start.pred_opt() {
                prev.link_end = day_before;
                prev.truncated = true;
                report.intervals_truncated += 1;
                kept.push(cur);
            } else {
                report.intervals_deleted += 1;
                *prev = cur;
            }
        }
        out.extend(kept);
    }
    out
}

/// More than one distinct counterpart claims this axis value.
fn is_contested(axis: Axis, group: &[ResolvedInterval]) -> bool {
    let mut seen: SmallVec<[AxisKey; 4]> = SmallVec::new();
    for iv in group {
        let counterpart = axis.counterpart(iv.pair);
        if !seen.contains(&counterpart) {
            seen.push(counterpart);
            if seen.len() > 1 {
                return true;
            }
        }
    }
    false
}
