//! Record loading, filtering, and normalization.
//!
//! The loader is the only place raw source text is trusted to be dirty:
//! excluded link types, missing security ids, and secondary/dual-class
//! issues are expected drops; unparseable dates and missing firm ids are
//! malformed rows that are warned about, counted, and skipped — never
//! fatal to the batch.
//!
//! The loader also owns the date-window policy: a span entirely outside
//! `[global_min_date, today]` is dropped and counted, and a span
//! straddling a window edge is trimmed to it. Every date that leaves the
//! loader — and therefore every date the pipeline emits — lies inside
//! the window.

use std::io::BufRead;

use chrono::NaiveDate;
use tracing::warn;

use crate::config::LinkConfig;
use crate::model::{FirmId, IssueClass, LinkRecord, LinkType, PairKey, RawLinkRecord, SecurityId};
use crate::report::BuildReport;
use crate::{Error, Result};

const DATE_FMT: &str = "%Y-%m-%d";

/// Read raw linkage rows from a JSON-lines source. Blank lines are
/// ignored; a line that is not valid JSON aborts the read (the boundary
/// between transport corruption and record-level dirt is the line parse).
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<RawLinkRecord>> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(&line)?);
    }
    Ok(rows)
}

/// Filter and normalize a batch of raw rows into validated `LinkRecord`s,
/// sorted by `(firm, link_start, security, link_end)` so every downstream
/// stage sees a deterministic order.
pub fn normalize(
    raw: &[RawLinkRecord],
    config: &LinkConfig,
    report: &mut BuildReport,
) -> Vec<LinkRecord> {
    report.raw_records += raw.len();
    let mut out = Vec::with_capacity(raw.len());

    for (row, rec) in raw.iter().enumerate() {
        if config.exclude_link_types.contains(rec.link_type.as_str()) {
            report.filtered_link_type += 1;
            continue;
        }
        let Some(security) = rec.security else {
            report.filtered_missing_security += 1;
            continue;
        };
        let issue_class = rec.issue_class.as_deref().and_then(IssueClass::from_code);
        if config.exclude_dual_class
            && matches!(
                issue_class,
                Some(IssueClass::Secondary | IssueClass::DualClass)
            )
        {
            report.filtered_dual_class += 1;
            continue;
        }

        match validate(row, rec, SecurityId(security), issue_class, config) {
            Ok((mut link, end_was_open)) => {
                if link.link_end < config.global_min_date || link.link_start > config.today {
                    report.filtered_out_of_window += 1;
                    continue;
                }
                if end_was_open {
                    report.open_ends_normalized += 1;
                }
                let mut trimmed = false;
                if link.link_start < config.global_min_date {
                    link.link_start = config.global_min_date;
                    trimmed = true;
                }
                if link.link_end > config.today {
                    link.link_end = config.today;
                    trimmed = true;
                }
                if trimmed {
                    report.spans_clamped_to_window += 1;
                }
                out.push(link);
            }
            Err(err) => {
                warn!(row, error = %err, "skipping malformed linkage row");
                report.malformed_skipped += 1;
            }
        }
    }

    out.sort_by_key(|r| (r.pair.firm, r.link_start, r.pair.security, r.link_end));
    out
}

/// Validate one surviving row. Returns the record plus whether its end
/// date was open and got the `today` sentinel.
fn validate(
    row: usize,
    rec: &RawLinkRecord,
    security: SecurityId,
    issue_class: Option<IssueClass>,
    config: &LinkConfig,
) -> Result<(LinkRecord, bool)> {
    let firm = rec.firm.ok_or_else(|| Error::MalformedRecord {
        row,
        message: "missing firm id".into(),
    })?;

    let link_start = parse_date(row, "link_start", &rec.link_start)?;
    let (link_end, end_was_open) = match rec.link_end.as_deref() {
        Some(text) => (parse_date(row, "link_end", text)?, false),
        None => (config.today, true),
    };

    if link_start > link_end {
        return Err(Error::MalformedRecord {
            row,
            message: format!("link ends {link_end} before it starts {link_start}"),
        });
    }

    let link = LinkRecord {
        pair: PairKey::new(FirmId(firm), security),
        link_start,
        link_end,
        link_type: LinkType::from(rec.link_type.as_str()),
        issue_class,
    };
    Ok((link, end_was_open))
}

fn parse_date(row: usize, field: &str, text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FMT).map_err(|err| Error::MalformedRecord {
        row,
        message: format!("bad {field} date {text:?}: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LinkConfig {
        LinkConfig {
            today: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            ..LinkConfig::default()
        }
    }

    fn raw(firm: u32, security: u32, start: &str, end: Option<&str>, ty: &str) -> RawLinkRecord {
        RawLinkRecord {
            firm: Some(firm),
            security: Some(security),
            link_start: start.into(),
            link_end: end.map(Into::into),
            link_type: ty.into(),
            issue_class: None,
        }
    }

    #[test]
    fn test_excluded_link_types_dropped() {
        let rows = vec![
            raw(1, 10, "1990-01-01", Some("1995-01-01"), "LC"),
            raw(1, 10, "1995-01-02", Some("1999-01-01"), "NR"),
        ];
        let mut report = BuildReport::default();
        let records = normalize(&rows, &config(), &mut report);
        assert_eq!(records.len(), 1);
        assert_eq!(report.filtered_link_type, 1);
    }

    #[test]
    fn test_missing_security_dropped_not_malformed() {
        let mut row = raw(1, 10, "1990-01-01", Some("1995-01-01"), "LC");
        row.security = None;
        let mut report = BuildReport::default();
        let records = normalize(&[row], &config(), &mut report);
        assert!(records.is_empty());
        assert_eq!(report.filtered_missing_security, 1);
        assert_eq!(report.malformed_skipped, 0);
    }

    #[test]
    fn test_missing_firm_is_malformed() {
        let mut row = raw(1, 10, "1990-01-01", Some("1995-01-01"), "LC");
        row.firm = None;
        let mut report = BuildReport::default();
        let records = normalize(&[row], &config(), &mut report);
        assert!(records.is_empty());
        assert_eq!(report.malformed_skipped, 1);
    }

    #[test]
    fn test_bad_date_is_skipped_batch_continues() {
        let rows = vec![
            raw(1, 10, "1990-13-45", Some("1995-01-01"), "LC"),
            raw(2, 20, "1990-01-01", Some("1995-01-01"), "LC"),
        ];
        let mut report = BuildReport::default();
        let records = normalize(&rows, &config(), &mut report);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pair.firm, FirmId(2));
        assert_eq!(report.malformed_skipped, 1);
    }

    #[test]
    fn test_open_end_normalized_to_today() {
        let rows = vec![raw(1, 10, "2020-06-01", None, "LC")];
        let mut report = BuildReport::default();
        let records = normalize(&rows, &config(), &mut report);
        assert_eq!(records[0].link_end, config().today);
        assert_eq!(report.open_ends_normalized, 1);
    }

    #[test]
    fn test_inverted_span_is_malformed() {
        let rows = vec![raw(1, 10, "1995-01-01", Some("1990-01-01"), "LC")];
        let mut report = BuildReport::default();
        let records = normalize(&rows, &config(), &mut report);
        assert!(records.is_empty());
        assert_eq!(report.malformed_skipped, 1);
    }

    #[test]
    fn test_dual_class_filter_respects_toggle() {
        let mut row = raw(1, 10, "1990-01-01", Some("1995-01-01"), "LC");
        row.issue_class = Some("D".into());

        let mut report = BuildReport::default();
        assert!(normalize(std::slice::from_ref(&row), &config(), &mut report).is_empty());
        assert_eq!(report.filtered_dual_class, 1);

        let keep_all = LinkConfig {
            exclude_dual_class: false,
            ..config()
        };
        let mut report = BuildReport::default();
        assert_eq!(normalize(&[row], &keep_all, &mut report).len(), 1);
    }

    #[test]
    fn test_span_straddling_window_floor_is_trimmed() {
        let rows = vec![raw(1, 10, "1920-01-01", Some("1930-12-31"), "LC")];
        let mut report = BuildReport::default();
        let records = normalize(&rows, &config(), &mut report);

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].link_start,
            NaiveDate::from_ymd_opt(1925, 1, 1).unwrap()
        );
        assert_eq!(report.spans_clamped_to_window, 1);
    }

    #[test]
    fn test_future_end_trimmed_to_today() {
        let rows = vec![raw(1, 10, "2020-01-01", Some("2030-01-01"), "LC")];
        let mut report = BuildReport::default();
        let records = normalize(&rows, &config(), &mut report);

        assert_eq!(records[0].link_end, config().today);
        assert_eq!(report.spans_clamped_to_window, 1);
    }

    #[test]
    fn test_span_entirely_outside_window_dropped() {
        let rows = vec![
            raw(1, 10, "1900-01-01", Some("1910-12-31"), "LC"),
            raw(2, 20, "2025-06-01", Some("2026-06-01"), "LC"),
        ];
        let mut report = BuildReport::default();
        let records = normalize(&rows, &config(), &mut report);

        assert!(records.is_empty());
        assert_eq!(report.filtered_out_of_window, 2);
        assert_eq!(report.malformed_skipped, 0);
        assert_eq!(report.loaded_records(), 0);
    }

    #[test]
    fn test_output_sorted_for_determinism() {
        let rows = vec![
            raw(2, 20, "1990-01-01", Some("1995-01-01"), "LC"),
            raw(1, 30, "1992-01-01", Some("1995-01-01"), "LC"),
            raw(1, 10, "1990-01-01", Some("1995-01-01"), "LC"),
        ];
        let mut report = BuildReport::default();
        let records = normalize(&rows, &config(), &mut report);
        let keys: Vec<_> = records.iter().map(|r| (r.pair.firm.0, r.pair.security.0)).collect();
        assert_eq!(keys, vec![(1, 10), (1, 30), (2, 20)]);
    }

    #[test]
    fn test_read_json_lines() {
        let data = concat!(
            r#"{"firm":1045,"security":20990,"link_start":"1972-01-01","link_end":"1976-12-30","link_type":"LC"}"#,
            "\n\n",
            r#"{"firm":1045,"security":20990,"link_start":"1976-12-31","link_type":"LU"}"#,
            "\n",
        );
        let rows = read_json_lines(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].link_end, None);
    }
}
