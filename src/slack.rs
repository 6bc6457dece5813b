//! Per-axis slack: how far each interval can stretch before colliding
//! with its nearest neighbor on that axis.
//!
//! One generic routine, `axis_gaps`, does the whole job for one axis; the
//! public entry invokes it once per axis and zips the results. The gap
//! between two closed intervals `[.., a_end]` and `[b_start, ..]` is
//! `(b_start - a_end) - 1` days: the count of free days strictly between
//! them. A negative gap means residual overlap survived resolution (dirty
//! source data); it is preserved here and only clamped when an extension
//! is applied.

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::model::{ResolvedInterval, Slack, SlackBounds};
use crate::report::BuildReport;
use crate::resolve::{Axis, AxisKey};

/// Compute the four slack bounds for every surviving interval.
pub fn compute(intervals: &[ResolvedInterval], report: &mut BuildReport) -> Vec<SlackBounds> {
    let firm = axis_gaps(intervals, Axis::Firm);
    let security = axis_gaps(intervals, Axis::Security);

    let mut bounds = Vec::with_capacity(intervals.len());
    for (i, iv) in intervals.iter().enumerate() {
        let b = SlackBounds {
            max_preslack_on_firm: firm[i].0,
            max_slack_on_firm: firm[i].1,
            max_preslack_on_security: security[i].0,
            max_slack_on_security: security[i].1,
        };
        if b.any_negative() {
            debug!(pair = %iv.pair, "negative slack bound; residual overlap in source");
            report.negative_slack += 1;
        }
        bounds.push(b);
    }
    bounds
}

/// Neighbor gaps on one axis: `(preslack, slack)` per interval, indexed as
/// the input. Intervals with no neighbor in a direction get `Unbounded`.
/// Same-pair intervals on the axis count as neighbors too — an extension
/// must not collide with the pair's own other span.
fn axis_gaps(intervals: &[ResolvedInterval], axis: Axis) -> Vec<(Slack, Slack)> {
    let mut gaps = vec![(Slack::Unbounded, Slack::Unbounded); intervals.len()];

    let mut groups: HashMap<AxisKey, SmallVec<[usize; 4]>> = HashMap::new();
    for (i, iv) in intervals.iter().enumerate() {
        groups.entry(axis.key(iv.pair)).or_default().push(i);
    }

    for (_, mut idxs) in groups {
        idxs.sort_by_key(|&i| (intervals[i].link_start, intervals[i].link_end, intervals[i].pair));
        for w in idxs.windows(2) {
            let (a, b) = (w[0], w[1]);
            let gap = (intervals[b].link_start - intervals[a].link_end).num_days() - 1;
            gaps[a].1 = Slack::Days(gap);
            gaps[b].0 = Slack::Days(gap);
        }
    }
    gaps
}
