//! Report composition and error-chain behavior.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::point;
use std::error::Error;
use thiserror::Error;
use trailcheck_core::errors::is_assertion;
use trailcheck_core::notice::{ROW_HAVE, ROW_TRAIL, ROW_WANT};
use trailcheck_core::{check, Failure, Report, ReportKind};

#[derive(Error, Debug)]
#[error("loading fixture {name}")]
struct FixtureError {
    name: String,
    #[source]
    failure: Failure,
}

fn names(report: &Report) -> Vec<&str> {
    report.rows().iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn test_extend_report_from_wrapped_failure() {
    let failure = check::equal(&1, &2, &[check::with_trail("count")]).unwrap_err();
    let err: Box<dyn Error + Send + Sync> = Box::new(FixtureError {
        name: "orders".into(),
        failure,
    });

    let report = Report::from_error(err, None).append("fixture", "orders");

    assert_eq!(names(&report), vec![ROW_TRAIL, ROW_WANT, ROW_HAVE, "fixture"]);
    assert_eq!(report.row(ROW_TRAIL), Some("count"));
    assert_eq!(report.row("fixture"), Some("orders"));
    assert!(report.is_assertion());
}

#[test]
fn test_foreign_error_becomes_header() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such fixture");
    let report = Report::from_error(Box::new(io), Some("setup"));

    assert_eq!(report.header(), "[setup] no such fixture");
    assert!(report.rows().is_empty());
    assert!(report.is_assertion());
    assert_eq!(report.cause().to_string(), "no such fixture");
}

#[test]
fn test_prefix_applied_once() {
    let report = Report::new("expected values to be equal")
        .with_prefix("api")
        .with_prefix("db");
    let err: Box<dyn Error + Send + Sync> = Box::new(report);
    let report = Report::from_error(err, Some("outer"));
    assert_eq!(report.header(), "[api] expected values to be equal");
}

#[test]
fn test_extract_finds_report_in_chain() {
    let failure = check::equal(&point(1, 2), &point(1, 3), &[]).unwrap_err();
    let err = FixtureError {
        name: "points".into(),
        failure,
    };
    let report = Report::extract(&err).unwrap();
    assert_eq!(report.row(ROW_TRAIL), Some("Point.y"));

    let plain = std::fmt::Error;
    assert!(Report::extract(&plain).is_none());
    assert!(!is_assertion(&plain));
}

#[test]
fn test_multiple_reports_collapse_into_one() {
    let failure = check::equal(&point(1, 2), &point(3, 4), &[]).unwrap_err();
    let text = failure.to_string();
    let report = failure.into_report();

    assert_eq!(report.header(), "multiple expectations violated (2)");
    assert_eq!(report.row("reports"), Some(text.as_str()));
    assert_eq!(report.kind(), ReportKind::Mismatch);
    assert!(report.is_assertion());
}

#[test]
fn test_trail_stays_first_and_prepend_follows_it() {
    let report = Report::new("h")
        .want(1)
        .have(2)
        .trail("a.b")
        .prepend("note", "first after trail")
        .append(ROW_WANT, 3);

    assert_eq!(names(&report), vec![ROW_TRAIL, "note", ROW_HAVE, ROW_WANT]);
    assert_eq!(report.row(ROW_WANT), Some("3"));
}

#[test]
fn test_multi_line_values_are_aligned() {
    let report = Report::new("expected values to be equal")
        .trail("x")
        .want("[\n  1,\n]")
        .have("[]");
    assert_eq!(
        report.to_string(),
        "expected values to be equal:\n  trail: x\n   want: [\n           1,\n         ]\n   have: []"
    );
}

#[test]
fn test_report_serializes_kind_and_rows() {
    let report = Report::new("expected value to be true").with_kind(ReportKind::Usage);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["kind"], "usage");
    assert_eq!(json["header"], "expected value to be true");
    assert_eq!(json["rows"], serde_json::json!([]));
}
