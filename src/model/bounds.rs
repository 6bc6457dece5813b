//! Slack bounds: how far an interval can stretch before hitting a neighbor.

use serde::{Deserialize, Serialize};

/// A day-count gap to the nearest neighboring interval on one axis, in one
/// direction, or `Unbounded` when no neighbor exists.
///
/// Variant order matters: `Unbounded` compares greater than any `Days`
/// value, so `Ord::min` across axes picks the binding constraint. Negative
/// day counts are legal — they record residual source overlap and are only
/// clamped to zero when an extension is actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slack {
    Days(i64),
    Unbounded,
}

impl Slack {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Slack::Unbounded)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Slack::Days(d) if *d < 0)
    }

    /// The extension actually applicable: bounded below by zero so that
    /// negative slack silently disables extension.
    pub fn applicable_days(&self) -> Option<i64> {
        match self {
            Slack::Days(d) => Some((*d).max(0)),
            Slack::Unbounded => None,
        }
    }
}

/// Per-interval neighbor gaps: two axes × two directions, each computed
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackBounds {
    pub max_preslack_on_firm: Slack,
    pub max_slack_on_firm: Slack,
    pub max_preslack_on_security: Slack,
    pub max_slack_on_security: Slack,
}

impl SlackBounds {
    pub const UNBOUNDED: SlackBounds = SlackBounds {
        max_preslack_on_firm: Slack::Unbounded,
        max_slack_on_firm: Slack::Unbounded,
        max_preslack_on_security: Slack::Unbounded,
        max_slack_on_security: Slack::Unbounded,
    };

    /// Backward extension available to the interval: both the pair's firm
    /// history and its security history must be respected.
    pub fn effective_preslack(&self) -> Slack {
        self.max_preslack_on_firm.min(self.max_preslack_on_security)
    }

    /// Forward extension available to the interval.
    pub fn effective_slack(&self) -> Slack {
        self.max_slack_on_firm.min(self.max_slack_on_security)
    }

    pub fn any_negative(&self) -> bool {
        self.max_preslack_on_firm.is_negative()
            || self.max_slack_on_firm.is_negative()
            || self.max_preslack_on_security.is_negative()
            || self.max_slack_on_security.is_negative()
    }
}
