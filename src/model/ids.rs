//! Identifier newtypes for the two sides of a link.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Firm-level identifier (axis A of a link).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FirmId(pub u32);

/// Security-level identifier (axis B of a link).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityId(pub u32);

/// The entity pair a link belongs to.
///
/// Derived `Ord` (firm first, then security) doubles as the deterministic
/// tie-break when two identical competing ranges must be ordered: the
/// lexicographically larger pair survives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PairKey {
    pub firm: FirmId,
    pub security: SecurityId,
}

impl PairKey {
    pub fn new(firm: FirmId, security: SecurityId) -> Self {
        Self { firm, security }
    }
}

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SecurityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.firm, self.security)
    }
}
