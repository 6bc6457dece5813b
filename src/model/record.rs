//! Raw and normalized linkage records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FirmId, PairKey, SecurityId};

/// A linkage row as it arrives from the tabular source, before validation.
///
/// Dates are strings (`YYYY-MM-DD`); `link_end` is absent for links that
/// are still open. Either identifier may be missing in dirty source data —
/// a missing firm id is malformed, a missing security id is an expected
/// filter drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLinkRecord {
    pub firm: Option<u32>,
    pub security: Option<u32>,
    pub link_start: String,
    #[serde(default)]
    pub link_end: Option<String>,
    pub link_type: String,
    #[serde(default)]
    pub issue_class: Option<String>,
}

/// Link category code (e.g. `LC`, `LU`, `NR`). Opaque to the pipeline
/// except for membership in the configured exclusion set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkType(pub String);

impl LinkType {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LinkType {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

/// Lets a `HashSet<LinkType>` be probed with a plain `&str`.
impl std::borrow::Borrow<str> for LinkType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Issue qualifier attached to some raw rows. `Secondary` and `DualClass`
/// rows are dropped when the configuration says so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueClass {
    Primary,
    Secondary,
    DualClass,
}

impl IssueClass {
    /// Parse a source qualifier code. Unknown codes map to `None` rather
    /// than an error; the qualifier is optional metadata.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "P" | "primary" => Some(IssueClass::Primary),
            "S" | "secondary" => Some(IssueClass::Secondary),
            "D" | "dual" | "dual_class" => Some(IssueClass::DualClass),
            _ => None,
        }
    }
}

/// A validated linkage record: identifiers resolved, dates parsed, open
/// end normalized to the configured "today".
///
/// Invariant: `link_start <= link_end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub pair: PairKey,
    pub link_start: NaiveDate,
    pub link_end: NaiveDate,
    pub link_type: LinkType,
    pub issue_class: Option<IssueClass>,
}

impl LinkRecord {
    pub fn firm(&self) -> FirmId {
        self.pair.firm
    }

    pub fn security(&self) -> SecurityId {
        self.pair.security
    }
}
