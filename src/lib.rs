//! # linkspan — Linkage Interval Consolidation
//!
//! Builds a cleaned linkage table between two identifier spaces of a
//! financial database: a firm-level key and a security-level key. The raw
//! linkage feed delivers overlapping, fragmented, many-to-many validity
//! intervals; `linkspan` turns them into a conflict-free table with
//! per-interval extension bounds.
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Load + filter | `loader` | normalized `LinkRecord`s |
//! | Collapse fragments | `collapse` | `ConsolidatedInterval`s |
//! | Resolve overlaps | `resolve` | `ResolvedInterval`s |
//! | Compute slack | `slack` | `SlackBounds` per interval |
//! | Synthesize ranges | `synth` | `OutputRange`s |
//!
//! Each stage consumes the previous stage's immutable output; nothing is
//! mutated across stage boundaries and no condition short of a bad
//! configuration is fatal to a batch.
//!
//! ## Quick Start
//!
//! ```rust
//! use linkspan::{LinkConfig, LinkTable, RawLinkRecord};
//!
//! # fn example() -> linkspan::Result<()> {
//! let table = LinkTable::new(LinkConfig::default())?;
//!
//! let raw = vec![RawLinkRecord {
//!     firm: Some(1045),
//!     security: Some(20990),
//!     link_start: "1972-01-01".into(),
//!     link_end: Some("1977-03-30".into()),
//!     link_type: "LC".into(),
//!     issue_class: None,
//! }];
//!
//! let result = table.build(&raw)?;
//! for range in &result.ranges {
//!     println!("{} {} .. {}", range.pair, range.soft_start, range.soft_end);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod report;
pub mod loader;
pub mod collapse;
pub mod resolve;
pub mod slack;
pub mod synth;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    FirmId, SecurityId, PairKey,
    RawLinkRecord, LinkRecord, LinkType, IssueClass,
    ConsolidatedInterval, ResolvedInterval, OutputRange,
    Slack, SlackBounds,
};

// ============================================================================
// Re-exports: Configuration and reporting
// ============================================================================

pub use config::LinkConfig;
pub use report::BuildReport;
pub use resolve::{Axis, AxisKey};

// ============================================================================
// Top-level LinkTable handle
// ============================================================================

/// The primary entry point. A `LinkTable` wraps a validated configuration
/// and runs the five-stage pipeline over raw record batches.
pub struct LinkTable {
    config: LinkConfig,
}

/// Output of one pipeline run: the final table plus its counters.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub ranges: Vec<OutputRange>,
    pub report: BuildReport,
}

impl LinkTable {
    /// Create a table builder. Configuration errors (an inverted date
    /// window) are the only fatal condition and are caught here, before
    /// any processing.
    pub fn new(config: LinkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the full pipeline over a batch of raw records.
    pub fn build(&self, raw: &[RawLinkRecord]) -> Result<BuildResult> {
        let mut report = BuildReport::default();

        // Phase 1: filter and normalize
        let records = loader::normalize(raw, &self.config, &mut report);

        // Phase 2: collapse same-pair fragments
        let consolidated = collapse::collapse(&records, &mut report);

        // Phase 3: resolve cross-pair overlaps, once per axis
        let resolved = resolve::resolve(consolidated, &mut report);

        // Phase 4: per-axis neighbor gaps
        let bounds = slack::compute(&resolved, &mut report);

        // Phase 5: soft and extreme ranges
        let ranges = synth::synthesize(&resolved, &bounds, &self.config);

        tracing::info!(
            raw = report.raw_records,
            loaded = report.loaded_records(),
            emitted = ranges.len(),
            truncated = report.intervals_truncated,
            deleted = report.intervals_deleted,
            "linkage table built",
        );

        Ok(BuildResult { ranges, report })
    }

    /// Access the configuration this table was built with.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source row that cannot be interpreted: bad date, missing firm id.
    /// Skipped and counted by the loader, never fatal to a batch.
    #[error("malformed record at row {row}: {message}")]
    MalformedRecord { row: usize, message: String },

    /// Invalid configuration; aborts before processing begins.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
