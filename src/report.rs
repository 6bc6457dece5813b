//! Build statistics and data-quality counters.

use serde::Serialize;

/// Counters accumulated across one pipeline run.
///
/// Nothing in here is fatal: malformed rows are skipped, ambiguous
/// overlaps are tie-broken, negative slack is clamped at application time.
/// The report is how those conditions surface to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Raw rows presented to the loader.
    pub raw_records: usize,
    /// Rows skipped for unparseable dates or a missing firm id.
    pub malformed_skipped: usize,
    /// Rows dropped because their link type is in the exclusion set.
    pub filtered_link_type: usize,
    /// Rows dropped for a missing security-side id.
    pub filtered_missing_security: usize,
    /// Rows dropped as secondary/dual-class issues.
    pub filtered_dual_class: usize,
    /// Rows whose span lies entirely outside the date window.
    pub filtered_out_of_window: usize,
    /// Open link ends replaced with the `today` sentinel.
    pub open_ends_normalized: usize,
    /// Spans trimmed at a window edge by the loader.
    pub spans_clamped_to_window: usize,
    /// Source records absorbed into a wider same-pair span.
    pub records_collapsed: usize,
    /// Same-pair spans discarded as fully subsumed duplicates.
    pub duplicates_discarded: usize,
    /// Intervals whose end was pulled back by the overlap resolver.
    pub intervals_truncated: usize,
    /// Intervals deleted outright by the overlap resolver.
    pub intervals_deleted: usize,
    /// Identical-range conflicts settled by the pair-id tie-break.
    pub ambiguous_overlaps: usize,
    /// Surviving intervals carrying at least one negative slack bound.
    pub negative_slack: usize,
}

impl BuildReport {
    /// Rows that made it past the loader.
    pub fn loaded_records(&self) -> usize {
        self.raw_records
            - self.malformed_skipped
            - self.filtered_link_type
            - self.filtered_missing_security
            - self.filtered_dual_class
            - self.filtered_out_of_window
    }
}
