//! Behavior tests for the structural equality engine.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{FixedOffset, TimeZone, Utc};
use common::{account, chain, point, Inner, Line, Outer, Point};
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc;
use trailcheck_core::check::{
    self, equal, time_exact_check, with_path_check, with_trail, with_trail_log, with_type_check,
    TrailLog,
};
use trailcheck_core::notice::{
    HEADER_EQUAL, ROW_HAVE, ROW_HAVE_LEN, ROW_TRAIL, ROW_WANT, ROW_WANT_LEN,
};
use trailcheck_core::value::{Dyn, ToValue, Type, Typed, Value, Zone};
use trailcheck_core::ReportKind;

fn trails(failure: &trailcheck_core::Failure) -> Vec<String> {
    failure
        .reports()
        .iter()
        .map(|r| r.row(ROW_TRAIL).unwrap_or_default().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Trails
// ---------------------------------------------------------------------------

#[test]
fn test_nested_field_trail() {
    let want = Outer {
        s: Inner { val: "a".into() },
    };
    let have = Outer {
        s: Inner { val: "b".into() },
    };

    let failure = equal(&want, &have, &[]).unwrap_err();

    assert_eq!(failure.len(), 1);
    let report = failure.first();
    assert_eq!(report.header(), HEADER_EQUAL);
    assert_eq!(report.row(ROW_TRAIL), Some("Outer.s.val"));
    assert_eq!(report.row(ROW_WANT), Some(r#""a""#));
    assert_eq!(report.row(ROW_HAVE), Some(r#""b""#));
}

#[test]
fn test_trail_prefix_from_options() {
    let want = vec![point(1, 2)];
    let have = vec![point(1, 5)];
    let failure = equal(&want, &have, &[with_trail("shapes")]).unwrap_err();
    assert_eq!(trails(&failure), vec!["shapes[0].y"]);
}

#[test]
fn test_map_key_trail() {
    let want = BTreeMap::from([("k", 1)]);
    let have = BTreeMap::from([("k", 2)]);
    let failure = equal(&want, &have, &[]).unwrap_err();
    assert_eq!(trails(&failure), vec![r#"["k"]"#]);

    let want = account(1, &[], &[("burst", 10)], "x");
    let have = account(1, &[], &[("burst", 20)], "x");
    let failure = equal(&want, &have, &[]).unwrap_err();
    assert_eq!(trails(&failure), vec![r#"Account.limits["burst"]"#]);
}

#[test]
fn test_deep_chain_trail() {
    let want = chain(3);
    let mut have = chain(3);
    have.next.as_mut().unwrap().next.as_mut().unwrap().val = 9;
    let failure = equal(&want, &have, &[]).unwrap_err();
    assert_eq!(trails(&failure), vec!["Node.next.next.val"]);
}

// ---------------------------------------------------------------------------
// Aggregation and short-circuits
// ---------------------------------------------------------------------------

#[test]
fn test_independent_mismatches_are_all_reported_in_order() {
    let failure = equal(&point(1, 2), &point(3, 4), &[]).unwrap_err();
    assert_eq!(failure.len(), 2);
    assert_eq!(trails(&failure), vec!["Point.x", "Point.y"]);
    assert_eq!(failure.reports()[0].row(ROW_WANT), Some("1"));
    assert_eq!(failure.reports()[1].row(ROW_HAVE), Some("4"));
}

#[test]
fn test_length_mismatch_short_circuits_elements() {
    let failure = equal(&vec![1, 2], &vec![1], &[]).unwrap_err();
    assert_eq!(failure.len(), 1);
    let report = failure.first();
    assert_eq!(report.row(ROW_WANT_LEN), Some("2"));
    assert_eq!(report.row(ROW_HAVE_LEN), Some("1"));
    assert_eq!(report.row(ROW_WANT), Some("Vec<i32>[\n  1,\n  2,\n]"));
}

#[test]
fn test_rendered_failure_text() {
    let failure = equal(&vec![1, 2], &vec![1], &[]).unwrap_err();
    let text = failure.to_string();
    assert!(text.starts_with("expected values to be equal:\n"));
    assert!(text.contains("\n  want len: 2\n"));
    assert!(text.ends_with("  have len: 1"));
}

#[test]
fn test_type_mismatch_is_a_shape_report() {
    let failure = equal(&1_u8, &1_u16, &[]).unwrap_err();
    assert_eq!(failure.first().kind(), ReportKind::Shape);
    assert_eq!(failure.first().row("want type"), Some("u8"));
}

#[test]
fn test_unexported_fields_are_ignored() {
    let want = account(1, &["a"], &[], "one");
    let have = account(1, &["a"], &[], "two");
    assert!(equal(&want, &have, &[]).is_ok());
}

#[test]
fn test_identical_handle_is_decided_without_descending() {
    let log = TrailLog::new();
    let items = vec![1, 2, 3];
    let options = [with_trail("items"), with_trail_log(log.clone())];

    assert!(equal(&items, &items, &options).is_ok());
    assert_eq!(log.entries(), vec!["items"]);

    log.clear();
    let copy = items.clone();
    assert!(equal(&items, &copy, &options).is_ok());
    assert_eq!(log.entries(), vec!["items[0]", "items[1]", "items[2]"]);
}

#[test]
fn test_identical_map_is_decided_without_descending() {
    let log = TrailLog::new();
    let limits = BTreeMap::from([("burst", 10), ("rate", 2)]);
    let options = [with_trail("limits"), with_trail_log(log.clone())];

    assert!(equal(&limits, &limits, &options).is_ok());
    assert_eq!(log.entries(), vec!["limits"]);

    log.clear();
    assert!(equal(&limits, &limits.clone(), &options).is_ok());
    assert_eq!(
        log.entries(),
        vec![r#"limits["burst"]"#, r#"limits["rate"]"#]
    );
}

fn map_of(x: i32) -> Value {
    HashMap::from([("a", x)]).to_value()
}

fn pair_of(x: i32) -> Value {
    [x, 0].to_value()
}

// Snapshots built from short-lived containers may land at the same address.
#[test]
fn test_snapshots_of_dropped_containers_are_compared_by_content() {
    let opts = check::Options::default();

    let failure = check::equal_values(&map_of(1), &map_of(2), &opts).unwrap_err();
    assert_eq!(trails(&failure), vec![r#"["a"]"#]);

    let failure = check::equal_values(&pair_of(1), &pair_of(2), &opts).unwrap_err();
    assert_eq!(trails(&failure), vec!["[0]"]);

    let want = vec![1, 2, 3].to_value();
    let have = vec![4, 5, 6].to_value();
    let failure = check::equal_values(&want, &have, &opts).unwrap_err();
    assert_eq!(trails(&failure), vec!["[0]", "[1]", "[2]"]);

    assert!(equal(&map_of(1), &map_of(2), &[]).is_err());
}

// ---------------------------------------------------------------------------
// Open handles and channels
// ---------------------------------------------------------------------------

#[test]
fn test_open_handles_compare_held_values() {
    assert!(equal(&Dyn::new(1), &Dyn::new(1), &[]).is_ok());

    let failure = equal(&Dyn::new(1), &Dyn::new(2), &[with_trail("held")]).unwrap_err();
    let report = failure.first();
    assert_eq!(report.header(), HEADER_EQUAL);
    assert_eq!(report.row(ROW_TRAIL), Some("held"));
    assert_eq!(report.row(ROW_WANT), Some("1"));
    assert_eq!(report.row(ROW_HAVE), Some("2"));

    assert!(equal(&Dyn::nil(), &Dyn::nil(), &[]).is_ok());
    assert!(equal(&Dyn::nil(), &Dyn::new(1), &[]).is_err());
}

#[test]
fn test_open_handles_holding_different_types_are_shape_reports() {
    let failure = equal(&Dyn::new(1), &Dyn::new("a"), &[with_trail("held")]).unwrap_err();
    let report = failure.first();
    assert_eq!(report.kind(), ReportKind::Shape);
    assert_eq!(report.row(ROW_TRAIL), Some("held"));
    assert_eq!(report.row("want type"), Some("i32"));
}

#[test]
fn test_channels_compare_by_identity() {
    let (tx, _rx) = mpsc::channel::<i32>();
    let (other, _other_rx) = mpsc::channel::<i32>();

    assert!(equal(&tx, &tx, &[]).is_ok());
    let snapshot = tx.to_value();
    assert!(check::equal_values(&snapshot, &snapshot.clone(), &check::Options::default()).is_ok());

    let failure = equal(&tx, &other, &[with_trail("events")]).unwrap_err();
    assert_eq!(trails(&failure), vec!["events"]);
    assert_eq!(failure.first().header(), HEADER_EQUAL);
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

#[test]
fn test_timestamps_compare_by_instant() {
    let utc = Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).unwrap();
    let plus2 = utc.with_timezone(&FixedOffset::east_opt(7200).unwrap());
    assert!(equal(&utc, &plus2, &[]).is_ok());

    let later = Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 1).unwrap();
    let failure = equal(&utc, &later, &[with_trail("at")]).unwrap_err();
    let report = failure.first();
    assert_eq!(report.header(), "expected equal dates");
    assert_eq!(report.row(ROW_TRAIL), Some("at"));
    assert_eq!(report.row("diff"), Some("1s"));
}

#[test]
fn test_same_wall_clock_in_another_zone_is_a_mismatch() {
    let utc = Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).unwrap();
    let plus2 = FixedOffset::east_opt(7200)
        .unwrap()
        .with_ymd_and_hms(2022, 1, 1, 12, 0, 0)
        .unwrap();

    let failure = equal(&utc, &plus2, &[with_trail("at")]).unwrap_err();
    assert_eq!(failure.len(), 1);
    let report = failure.first();
    assert_eq!(report.header(), "expected equal dates");
    assert_eq!(report.row(ROW_TRAIL), Some("at"));
}

#[test]
fn test_zones_compare_by_name() {
    let winter = FixedOffset::east_opt(3600).unwrap();
    let summer = FixedOffset::east_opt(7200).unwrap();
    let warsaw = Value::zone(Zone::named("Europe/Warsaw", winter));

    assert!(equal(&warsaw, &Value::zone(Zone::named("Europe/Warsaw", summer)), &[]).is_ok());

    let failure = equal(&warsaw, &Value::zone(Zone::utc()), &[with_trail("tz")]).unwrap_err();
    let report = failure.first();
    assert_eq!(report.header(), "expected same timezone");
    assert_eq!(report.row(ROW_TRAIL), Some("tz"));
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[test]
fn test_path_override_replaces_builtin_at_exact_trail() {
    let want = Line {
        a: point(1, 2),
        b: point(3, 4),
    };
    let have = Line {
        a: point(9, 9),
        b: point(3, 5),
    };
    let skip = check::check(|_, _, _| Ok(()));

    let failure = equal(&want, &have, &[with_path_check("Line.a", skip)]).unwrap_err();
    assert_eq!(trails(&failure), vec!["Line.b.y"]);
}

#[test]
fn test_type_override_applies_to_every_value_of_type() {
    let always = check::check(|_, _, _| Ok(()));
    let options = [with_type_check(Point::type_of(), always)];
    let want = vec![point(1, 2), point(3, 4)];
    let have = vec![point(5, 6), point(7, 8)];
    assert!(equal(&want, &have, &options).is_ok());
}

#[test]
fn test_path_override_wins_over_type_override() {
    let reject = check::check(|_, _, opts| {
        Err(trailcheck_core::Report::new("rejected")
            .trail(opts.trail())
            .into())
    });
    let accept = check::check(|_, _, _| Ok(()));
    let options = [
        with_type_check(Type::of::<Point>(), reject),
        with_path_check("Line.a", accept),
    ];
    let line = Line {
        a: point(1, 2),
        b: point(3, 4),
    };

    let failure = equal(&line, &line.clone(), &options).unwrap_err();
    assert_eq!(failure.len(), 1);
    assert_eq!(failure.first().header(), "rejected");
    assert_eq!(failure.first().row(ROW_TRAIL), Some("Line.b"));
}

#[test]
fn test_exact_timestamp_override_at_path() {
    let utc = Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).unwrap();
    let plus2 = utc.with_timezone(&FixedOffset::east_opt(7200).unwrap());
    let want = vec![utc.fixed_offset()];
    let have = vec![plus2];

    assert!(equal(&want, &have, &[]).is_ok());

    let failure = equal(&want, &have, &[with_path_check("[0]", time_exact_check())]).unwrap_err();
    assert_eq!(failure.len(), 1);
    assert_eq!(failure.first().header(), "expected same timezone");
    assert_eq!(failure.first().row(ROW_TRAIL), Some("[0]"));
}

#[test]
fn test_override_can_recurse_with_builtin_behavior() {
    let only_y = check::check(|want, have, opts| {
        let (Some(w), Some(h)) = (want.field("y"), have.field("y")) else {
            return Ok(());
        };
        let trail = opts.trail().field(want.type_name(), "y");
        check::equal_values(w, h, &opts.at(trail))
    });
    let options = [with_type_check(Point::type_of(), only_y)];

    assert!(equal(&point(1, 2), &point(7, 2), &options).is_ok());
    let failure = equal(&point(1, 2), &point(1, 3), &options).unwrap_err();
    assert_eq!(trails(&failure), vec!["Point.y"]);
}
