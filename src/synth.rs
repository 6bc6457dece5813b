//! Range synthesis: turn slack bounds into soft and extreme output ranges.
//!
//! The soft range honors the caller's day budget; the extreme range takes
//! everything the neighbors leave free. Both are clamped into
//! `[global_min_date, today]`. An unbounded direction runs straight to the
//! clamp. Negative slack (residual source overlap) applies as zero, so a
//! dirty interval simply gets no extension on that side.

use chrono::{NaiveDate, TimeDelta};

use crate::config::LinkConfig;
use crate::model::{OutputRange, ResolvedInterval, Slack, SlackBounds};

/// Build the output row for every surviving interval. `intervals` and
/// `bounds` are parallel, as produced by the slack calculator.
pub fn synthesize(
    intervals: &[ResolvedInterval],
    bounds: &[SlackBounds],
    config: &LinkConfig,
) -> Vec<OutputRange> {
    intervals
        .iter()
        .zip(bounds)
        .map(|(iv, b)| synthesize_one(iv, b, config))
        .collect()
}

fn synthesize_one(
    iv: &ResolvedInterval,
    bounds: &SlackBounds,
    config: &LinkConfig,
) -> OutputRange {
    let pre = bounds.effective_preslack();
    let post = bounds.effective_slack();

    let soft_start = extend_back(iv.link_start, pre, Some(config.preslack_days.abs()), config);
    let soft_end = extend_forward(iv.link_end, post, Some(config.slack_days.abs()), config);
    let extreme_start = extend_back(iv.link_start, pre, None, config);
    let extreme_end = extend_forward(iv.link_end, post, None, config);

    OutputRange {
        pair: iv.pair,
        link_start: iv.link_start,
        link_end: iv.link_end,
        soft_start,
        soft_end,
        extreme_start,
        extreme_end,
    }
}

fn extend_back(
    start: NaiveDate,
    available: Slack,
    budget: Option<i64>,
    config: &LinkConfig,
) -> NaiveDate {
    let days = match (available.applicable_days(), budget) {
        (Some(avail), Some(budget)) => avail.min(budget),
        (Some(avail), None) => avail,
        (None, Some(budget)) => budget,
        // Unbounded and unbudgeted: all the way to the floor.
        (None, None) => return config.global_min_date,
    };
    let date = shift(start, -days).unwrap_or(config.global_min_date);
    config.clamp(date)
}

fn extend_forward(
    end: NaiveDate,
    available: Slack,
    budget: Option<i64>,
    config: &LinkConfig,
) -> NaiveDate {
    let days = match (available.applicable_days(), budget) {
        (Some(avail), Some(budget)) => avail.min(budget),
        (Some(avail), None) => avail,
        (None, Some(budget)) => budget,
        (None, None) => return config.today,
    };
    let date = shift(end, days).unwrap_or(config.today);
    config.clamp(date)
}

/// Date arithmetic that saturates instead of panicking on absurd budgets.
fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}
