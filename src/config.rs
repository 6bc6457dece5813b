//! Pipeline configuration.

use chrono::{NaiveDate, Utc};
use hashbrown::HashSet;

use crate::model::LinkType;
use crate::{Error, Result};

/// Earliest date any output range may reach, unless overridden.
pub const DEFAULT_GLOBAL_MIN_DATE: NaiveDate =
    NaiveDate::from_ymd_opt(1925, 1, 1).expect("valid epoch date");

/// Default soft extension budget, in days, for both directions.
pub const DEFAULT_SLACK_DAYS: i64 = 180;

/// Configuration for a linkage build.
///
/// `today` doubles as the sentinel for open-ended links and the upper clamp
/// for every emitted date; it is injected rather than read from the clock
/// mid-pipeline so a build is reproducible.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Requested backward extension budget (days). Sign is ignored.
    pub preslack_days: i64,
    /// Requested forward extension budget (days).
    pub slack_days: i64,
    /// Link-type category codes dropped by the loader.
    pub exclude_link_types: HashSet<LinkType>,
    /// Drop rows whose qualifier marks a secondary or dual-class issue.
    pub exclude_dual_class: bool,
    /// Lower clamp for all emitted dates.
    pub global_min_date: NaiveDate,
    /// Sentinel for open link ends and upper clamp for all emitted dates.
    pub today: NaiveDate,
}

impl Default for LinkConfig {
    fn default() -> Self {
        // Unresearched (NR, NU), duplicate (LD), and secondary
        // cross-listing (LX) categories are excluded out of the box.
        let exclude_link_types = ["NR", "NU", "LD", "LX"]
            .into_iter()
            .map(LinkType::from)
            .collect();

        Self {
            preslack_days: DEFAULT_SLACK_DAYS,
            slack_days: DEFAULT_SLACK_DAYS,
            exclude_link_types,
            exclude_dual_class: true,
            global_min_date: DEFAULT_GLOBAL_MIN_DATE,
            today: Utc::now().date_naive(),
        }
    }
}

impl LinkConfig {
    /// Fatal pre-processing check: the date window must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.global_min_date > self.today {
            return Err(Error::Config(format!(
                "global_min_date {} is after today {}",
                self.global_min_date, self.today
            )));
        }
        Ok(())
    }

    /// Clamp a derived date into the configured window.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.global_min_date, self.today)
    }
}
