//! Interval types produced by the collapse, resolve, and synthesize stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PairKey;

/// A span of validity for one entity pair after contiguous source fragments
/// have been merged.
///
/// Invariant: for a fixed pair, no two `ConsolidatedInterval`s overlap or
/// touch — any that would have been merged by the collapser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedInterval {
    pub pair: PairKey,
    pub link_start: NaiveDate,
    pub link_end: NaiveDate,
    /// More than one source record was folded into this span.
    pub collapsed: bool,
}

impl ConsolidatedInterval {
    /// Whether `date` falls inside the closed span.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.link_start <= date && date <= self.link_end
    }
}

/// A consolidated interval after cross-pair overlap resolution. The span
/// may have been truncated; losing intervals are dropped entirely and never
/// appear at this stage.
///
/// Invariant: for a fixed axis identifier, no two surviving intervals from
/// different pairs overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInterval {
    pub pair: PairKey,
    pub link_start: NaiveDate,
    pub link_end: NaiveDate,
    pub collapsed: bool,
    /// The end date was pulled back to make room for a higher-priority
    /// neighbor.
    pub truncated: bool,
}

impl From<ConsolidatedInterval> for ResolvedInterval {
    fn from(iv: ConsolidatedInterval) -> Self {
        Self {
            pair: iv.pair,
            link_start: iv.link_start,
            link_end: iv.link_end,
            collapsed: iv.collapsed,
            truncated: false,
        }
    }
}

/// Final emitted row: the surviving raw span plus two derived extensions.
///
/// `soft_*` is bounded by the configured day budget, `extreme_*` only by
/// collision with neighbors; both are clamped to the global date window.
/// Extreme ranges of adjacent intervals sharing an axis value may overlap
/// each other — each side extends maximally into the shared gap, which is
/// an accepted property of the output, not a conflict in the raw spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRange {
    pub pair: PairKey,
    pub link_start: NaiveDate,
    pub link_end: NaiveDate,
    pub soft_start: NaiveDate,
    pub soft_end: NaiveDate,
    pub extreme_start: NaiveDate,
    pub extreme_end: NaiveDate,
}
