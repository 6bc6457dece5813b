//! # Linkage Data Model
//!
//! Clean DTOs for every stage of the linkage pipeline.
//! These types cross every boundary: loader ↔ collapser ↔ resolver ↔ output.
//!
//! Design rule: this module is pure data — no I/O, no clocks, no state.
//! Each pipeline stage consumes one of these types and produces the next;
//! nothing here is mutated after its producing stage hands it off.

pub mod ids;
pub mod record;
pub mod interval;
pub mod bounds;

pub use ids::{FirmId, PairKey, SecurityId};
pub use record::{IssueClass, LinkRecord, LinkType, RawLinkRecord};
pub use interval::{ConsolidatedInterval, OutputRange, ResolvedInterval};
pub use bounds::{Slack, SlackBounds};
