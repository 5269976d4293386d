//! Convenience checks built on the engine and the dumper.

use super::{check, equal_values, Check, CheckOption, Options};
use crate::dump::well_known::format_duration;
use crate::dump::Dump;
use crate::errors::ReportKind;
use crate::notice::{Failure, Report, ROW_HAVE_TYPE};
use crate::value::{Data, Kind, ToValue, Value, Zone};
use chrono::TimeDelta;
use regex::Regex;
use std::any::Any;
use std::panic::{catch_unwind, UnwindSafe};
use std::path::Path;

const HEADER_DATES: &str = "expected equal dates";
const HEADER_ZONE: &str = "expected same timezone";

fn unsupported(header: &str, v: &Value) -> Report {
    Report::new(header)
        .with_kind(ReportKind::Unsupported)
        .append(ROW_HAVE_TYPE, v.ty())
}

/// Expect `true`.
///
/// # Errors
///
/// Returns a report when `have` is `false`.
pub fn is_true(have: bool) -> Result<(), Failure> {
    if have {
        return Ok(());
    }
    Err(Report::new("expected value to be true").into())
}

/// Expect `false`.
///
/// # Errors
///
/// Returns a report when `have` is `true`.
pub fn is_false(have: bool) -> Result<(), Failure> {
    if !have {
        return Ok(());
    }
    Err(Report::new("expected value to be false").into())
}

/// Expect a nil handle or the untyped absence.
///
/// # Errors
///
/// Returns a report carrying the dumped value when it is not nil.
pub fn nil<T: ToValue + ?Sized>(have: &T) -> Result<(), Failure> {
    let have = have.to_value();
    if have.is_nil() {
        return Ok(());
    }
    Err(Report::new("expected value to be nil")
        .have(Dump::default().value(&have))
        .into())
}

/// Expect a value that is not nil.
///
/// # Errors
///
/// Returns a report when the value is nil.
pub fn not_nil<T: ToValue + ?Sized>(have: &T) -> Result<(), Failure> {
    let have = have.to_value();
    if !have.is_nil() {
        return Ok(());
    }
    Err(Report::new("expected non-nil value").into())
}

/// Expect a string, sequence, map or set of length `want`.
///
/// # Errors
///
/// Returns an `Unsupported` report for shapes without a length.
pub fn len<T: ToValue + ?Sized>(have: &T, want: usize) -> Result<(), Failure> {
    let value = have.to_value();
    let target = value.deref();
    let Some(have_len) = target.len().filter(|_| target.kind().has_len()) else {
        return Err(unsupported("cannot get the length of the value", target).into());
    };
    if have_len == want {
        return Ok(());
    }
    Err(Report::new(format!("expected {} length", target.kind()))
        .want(want)
        .have(have_len)
        .into())
}

/// Expect `have` to contain `want`: a substring of a string, an element of
/// a sequence or set, or a key of a map.
///
/// # Errors
///
/// Returns a report when `want` is absent, a `Usage` report when a string
/// is searched for a non-string and an `Unsupported` report for other shapes.
pub fn contain<H, W>(have: &H, want: &W) -> Result<(), Failure>
where
    H: ToValue + ?Sized,
    W: ToValue + ?Sized,
{
    let have_value = have.to_value();
    let want_value = want.to_value();
    let container = have_value.deref();
    let needle = want_value.deref();
    let opts = Options::default();

    let found = match container.data() {
        Data::Str(s) => match needle.data() {
            Data::Str(sub) => s.contains(sub.as_str()),
            Data::Char(c) => s.contains(*c),
            _ => {
                return Err(Report::new("expected a string to search for")
                    .with_kind(ReportKind::Usage)
                    .append("want type", needle.ty())
                    .into())
            }
        },
        Data::Seq { items } => items
            .iter()
            .flatten()
            .any(|item| equal_values(needle, item, &opts).is_ok()),
        Data::Map { entries } => entries
            .iter()
            .flatten()
            .any(|(key, _)| equal_values(needle, key, &opts).is_ok()),
        _ => return Err(unsupported("cannot check containment in the value", container).into()),
    };
    if found {
        return Ok(());
    }

    let dump = Dump::default();
    let what = if container.kind() == Kind::Map {
        "key"
    } else {
        "element"
    };
    Err(Report::new(format!("expected {} to contain {what}", container.kind()))
        .want(dump.value(needle))
        .have(dump.value(container))
        .into())
}

/// Expect `have` to match the regular expression `pattern`.
///
/// # Errors
///
/// Returns a `Usage` report for a malformed pattern.
pub fn regexp(pattern: &str, have: &str) -> Result<(), Failure> {
    let re = Regex::new(pattern).map_err(|err| Report::from(err).append("regexp", pattern))?;
    if re.is_match(have) {
        return Ok(());
    }
    Err(Report::new("expected regexp to match")
        .append("regexp", pattern)
        .have(format!("{have:?}"))
        .into())
}

/// Expect two floats to differ by at most `epsilon`.
///
/// # Errors
///
/// Returns a report carrying the difference.
pub fn epsilon(want: f64, have: f64, epsilon: f64) -> Result<(), Failure> {
    let diff = (want - have).abs();
    if diff <= epsilon {
        return Ok(());
    }
    Err(Report::new("expected numbers to be within epsilon")
        .want(want)
        .have(have)
        .append("epsilon", epsilon)
        .append("diff", diff)
        .into())
}

/// Decode both documents and compare them structurally.
///
/// # Errors
///
/// Returns a `Usage` report for invalid JSON, otherwise every mismatch.
pub fn json(want: &str, have: &str, options: &[CheckOption]) -> Result<(), Failure> {
    let w: serde_json::Value =
        serde_json::from_str(want).map_err(|err| Report::from(err).append("argument", "want"))?;
    let h: serde_json::Value =
        serde_json::from_str(have).map_err(|err| Report::from(err).append("argument", "have"))?;
    equal_values(&w.to_value(), &h.to_value(), &Options::new(options))
}

fn timestamp(v: &Value) -> Result<&Value, Report> {
    let target = v.deref();
    match target.data() {
        Data::Time(..) => Ok(target),
        _ => Err(Report::new("expected a timestamp")
            .with_kind(ReportKind::Usage)
            .append(ROW_HAVE_TYPE, target.ty())),
    }
}

fn zone_of(v: &Value) -> Option<&Zone> {
    match v.deref().data() {
        Data::Zone(zone) | Data::Time(_, zone) => Some(zone),
        _ => None,
    }
}

/// Instant comparison of two timestamps.
pub(super) fn instant_mismatch(want: &Value, have: &Value, dump: &Dump) -> Option<Report> {
    match (want.deref().data(), have.deref().data()) {
        (Data::Time(w, _), Data::Time(h, _)) if w == h => None,
        (Data::Time(w, _), Data::Time(h, _)) => Some(
            Report::new(HEADER_DATES)
                .want(dump.value(want))
                .have(dump.value(have))
                .append("diff", format_duration(*h - *w)),
        ),
        _ => Some(
            Report::new(HEADER_DATES)
                .with_kind(ReportKind::Usage)
                .want(want.ty())
                .have(have.ty()),
        ),
    }
}

/// Zone identity comparison of zones or timestamps.
pub(super) fn zone_mismatch(want: &Value, have: &Value, dump: &Dump) -> Option<Report> {
    match (zone_of(want), zone_of(have)) {
        (Some(w), Some(h)) if w == h => None,
        (Some(w), Some(h)) => Some(
            Report::new(HEADER_ZONE)
                .want(dump.any(w))
                .have(dump.any(h)),
        ),
        _ => Some(
            Report::new(HEADER_ZONE)
                .with_kind(ReportKind::Usage)
                .want(want.ty())
                .have(have.ty()),
        ),
    }
}

fn exact_reports(want: &Value, have: &Value, dump: &Dump) -> Vec<Report> {
    instant_mismatch(want, have, dump)
        .into_iter()
        .chain(zone_mismatch(want, have, dump))
        .collect()
}

/// Expect two timestamps to denote the same instant.
///
/// # Errors
///
/// Returns a report with the signed difference, or a `Usage` report when
/// either side is not a timestamp.
pub fn time_equal<W, H>(want: &W, have: &H) -> Result<(), Failure>
where
    W: ToValue + ?Sized,
    H: ToValue + ?Sized,
{
    let want = want.to_value();
    let have = have.to_value();
    timestamp(&want)?;
    timestamp(&have)?;
    match instant_mismatch(&want, &have, &Dump::default()) {
        Some(report) => Err(report.into()),
        None => Ok(()),
    }
}

/// Expect two timestamps to denote the same instant in the same zone.
///
/// # Errors
///
/// Returns one report per differing aspect.
pub fn time_exact<W, H>(want: &W, have: &H) -> Result<(), Failure>
where
    W: ToValue + ?Sized,
    H: ToValue + ?Sized,
{
    let want = want.to_value();
    let have = have.to_value();
    timestamp(&want)?;
    timestamp(&have)?;
    Failure::join(exact_reports(&want, &have, &Dump::default()))
}

/// Override comparing timestamps by instant and zone, for
/// [`with_path_check`](super::with_path_check) or
/// [`with_type_check`](super::with_type_check).
pub fn time_exact_check() -> Check {
    check(|want, have, opts| {
        let reports = exact_reports(want, have, opts.dump())
            .into_iter()
            .map(|r| r.trail(opts.trail()))
            .collect();
        Failure::join(reports)
    })
}

/// Expect two zones, or the zones of two timestamps, to be the same.
///
/// # Errors
///
/// Returns a report naming both zones.
pub fn zone<W, H>(want: &W, have: &H) -> Result<(), Failure>
where
    W: ToValue + ?Sized,
    H: ToValue + ?Sized,
{
    match zone_mismatch(&want.to_value(), &have.to_value(), &Dump::default()) {
        Some(report) => Err(report.into()),
        None => Ok(()),
    }
}

/// Expect two timestamps to be at most `tolerance` apart.
///
/// # Errors
///
/// Returns a report with the actual difference.
pub fn within<W, H>(want: &W, have: &H, tolerance: TimeDelta) -> Result<(), Failure>
where
    W: ToValue + ?Sized,
    H: ToValue + ?Sized,
{
    let want = want.to_value();
    let have = have.to_value();
    let (Data::Time(w, _), Data::Time(h, _)) = (timestamp(&want)?.data(), timestamp(&have)?.data())
    else {
        return Ok(());
    };
    let diff = *h - *w;
    if diff.abs() <= tolerance.abs() {
        return Ok(());
    }
    let dump = Dump::default();
    Err(Report::new("expected dates to be within tolerance")
        .want(dump.value(&want))
        .have(dump.value(&have))
        .append("within", format_duration(tolerance))
        .append("diff", format_duration(diff))
        .into())
}

/// Expect equal durations.
///
/// # Errors
///
/// Returns a report with both durations.
pub fn duration(want: TimeDelta, have: TimeDelta) -> Result<(), Failure> {
    if want == have {
        return Ok(());
    }
    Err(Report::new("expected equal time durations")
        .want(format_duration(want))
        .have(format_duration(have))
        .into())
}

fn path_report(header: &str, path: &Path, error: impl std::fmt::Display) -> Failure {
    Report::new(header)
        .append("path", path.display())
        .append("error", error)
        .into()
}

/// Expect `path` to name an existing regular file.
///
/// # Errors
///
/// Returns a report with the path and the reason.
pub fn file_exist(path: impl AsRef<Path>) -> Result<(), Failure> {
    const HEADER: &str = "expected path to an existing file";
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(path_report(HEADER, path, "path is a directory")),
        Err(err) => Err(path_report(HEADER, path, err)),
    }
}

/// Expect `path` to name an existing directory.
///
/// # Errors
///
/// Returns a report with the path and the reason.
pub fn dir_exist(path: impl AsRef<Path>) -> Result<(), Failure> {
    const HEADER: &str = "expected path to an existing directory";
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(path_report(HEADER, path, "path is a file")),
        Err(err) => Err(path_report(HEADER, path, err)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// Expect `f` to panic; returns the panic message.
///
/// # Errors
///
/// Returns a report when `f` completes normally.
pub fn panics<F: FnOnce() + UnwindSafe>(f: F) -> Result<String, Failure> {
    match catch_unwind(f) {
        Ok(()) => Err(Report::new("expected function to panic").into()),
        Err(payload) => Ok(panic_message(payload.as_ref())),
    }
}

/// Expect `f` to complete without panicking.
///
/// # Errors
///
/// Returns a report carrying the panic message.
pub fn no_panic<F: FnOnce() + UnwindSafe>(f: F) -> Result<(), Failure> {
    match catch_unwind(f) {
        Ok(()) => Ok(()),
        Err(payload) => Err(Report::new("expected function not to panic")
            .append("panic", panic_message(payload.as_ref()))
            .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::{ROW_HAVE, ROW_WANT};
    use chrono::{FixedOffset, TimeZone, Utc};
    use std::collections::{BTreeSet, HashMap};

    #[test]
    fn test_bool_checks() {
        assert!(is_true(true).is_ok());
        assert!(is_true(false).is_err());
        assert!(is_false(false).is_ok());
    }

    #[test]
    fn test_len_of_shapes() {
        assert!(len("abc", 3).is_ok());
        assert!(len(&vec![1, 2], 2).is_ok());
        assert!(len(&HashMap::from([(1, 2)]), 1).is_ok());
        let failure = len(&vec![1], 2).unwrap_err();
        assert_eq!(failure.first().header(), "expected slice length");
        assert_eq!(failure.first().row(ROW_WANT), Some("2"));
    }

    #[test]
    fn test_len_unsupported_kind() {
        let failure = len(&42, 1).unwrap_err();
        assert_eq!(failure.first().kind(), ReportKind::Unsupported);
        assert_eq!(failure.first().row(ROW_HAVE_TYPE), Some("i32"));
    }

    #[test]
    fn test_contain_per_shape() {
        assert!(contain("haystack", "st").is_ok());
        assert!(contain(&vec!["a", "b"], "b").is_ok());
        assert!(contain(&HashMap::from([("k", 1)]), "k").is_ok());
        assert!(contain(&BTreeSet::from([3, 4]), &4).is_ok());
        assert!(contain(&vec![1, 2], &3).is_err());
        assert_eq!(
            contain("abc", &1).unwrap_err().first().kind(),
            ReportKind::Usage
        );
        assert_eq!(
            contain(&1.5, &1).unwrap_err().first().kind(),
            ReportKind::Unsupported
        );
    }

    #[test]
    fn test_regexp_usage_error() {
        assert!(regexp(r"^\d+$", "123").is_ok());
        assert!(regexp(r"^\d+$", "12a").is_err());
        let failure = regexp("(", "x").unwrap_err();
        assert_eq!(failure.first().kind(), ReportKind::Usage);
        assert_eq!(failure.first().row("regexp"), Some("("));
    }

    #[test]
    fn test_epsilon() {
        assert!(epsilon(1.0, 1.05, 0.1).is_ok());
        assert!(epsilon(1.0, 1.2, 0.1).is_err());
        assert!(epsilon(1.0, f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_time_checks() {
        let utc = Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).unwrap();
        let plus2 = utc.with_timezone(&FixedOffset::east_opt(7200).unwrap());
        assert!(time_equal(&utc, &plus2).is_ok());
        let failure = time_exact(&utc, &plus2).unwrap_err();
        assert_eq!(failure.len(), 1);
        assert_eq!(failure.first().header(), HEADER_ZONE);
        assert!(within(&utc, &(utc + TimeDelta::seconds(5)), TimeDelta::seconds(10)).is_ok());
        assert!(within(&utc, &(utc + TimeDelta::seconds(15)), TimeDelta::seconds(10)).is_err());
        assert_eq!(
            time_equal(&utc, &1).unwrap_err().first().kind(),
            ReportKind::Usage
        );
    }

    #[test]
    fn test_duration_report() {
        assert!(duration(TimeDelta::seconds(1), TimeDelta::milliseconds(1000)).is_ok());
        let failure = duration(TimeDelta::seconds(1), TimeDelta::seconds(2)).unwrap_err();
        assert_eq!(failure.first().row(ROW_HAVE), Some("2s"));
    }

    #[test]
    fn test_panic_capture() {
        assert_eq!(panics(|| panic!("boom")).unwrap(), "boom");
        assert!(panics(|| {}).is_err());
        assert!(no_panic(|| {}).is_ok());
        let failure = no_panic(|| panic!("bad {}", 1)).unwrap_err();
        assert_eq!(failure.first().row("panic"), Some("bad 1"));
    }
}
