//! Dedicated renderers for timestamps, durations and timezones.
//!
//! These are registered by type name on every default [`Dump`] and bypass
//! generic record rendering entirely.

use super::{DurationFormat, Dump, TimeFormat};
use crate::errors::DumpError;
use crate::value::{Data, Value};
use chrono::{SecondsFormat, TimeDelta};
use std::fmt::Write as _;

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unexpected(v: &Value) -> DumpError {
    DumpError::UnexpectedShape {
        type_name: v.type_name().to_string(),
        kind: v.kind(),
    }
}

/// Render a timestamp in the configured [`TimeFormat`].
///
/// # Errors
///
/// Fails when the value is not a timestamp or the `strftime` pattern is
/// invalid.
pub fn render_time(d: &Dump, _level: usize, v: &Value) -> Result<String, DumpError> {
    let Data::Time(t, _) = v.data() else {
        return Err(unexpected(v));
    };
    match d.time_format() {
        TimeFormat::Rfc3339 => Ok(format!(
            "{:?}",
            t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        )),
        TimeFormat::Unix => Ok(t.timestamp().to_string()),
        TimeFormat::Strftime(pattern) => {
            let mut out = String::new();
            write!(out, "{}", t.format(pattern)).map_err(|_| DumpError::TimeFormat {
                pattern: pattern.clone(),
            })?;
            Ok(format!("{out:?}"))
        }
    }
}

/// Render a duration in the configured [`DurationFormat`].
///
/// # Errors
///
/// Fails when the value is not a duration.
pub fn render_duration(d: &Dump, _level: usize, v: &Value) -> Result<String, DumpError> {
    let Data::Duration(delta) = v.data() else {
        return Err(unexpected(v));
    };
    match d.duration_format() {
        DurationFormat::String => Ok(format!("{:?}", format_duration(*delta))),
        DurationFormat::Seconds => {
            let nanos = total_nanos(*delta);
            Ok((nanos as f64 / NANOS_PER_SEC as f64).to_string())
        }
    }
}

/// Render a timezone by its canonical name.
///
/// # Errors
///
/// Fails when the value is not a timezone.
pub fn render_zone(_d: &Dump, _level: usize, v: &Value) -> Result<String, DumpError> {
    match v.data() {
        Data::Zone(zone) => Ok(format!("{:?}", zone.name())),
        _ => Err(unexpected(v)),
    }
}

fn total_nanos(d: TimeDelta) -> i128 {
    i128::from(d.num_seconds()) * NANOS_PER_SEC as i128 + i128::from(d.subsec_nanos())
}

/// Unit string such as `1h2m3.5s`, `1.5ms` or `0s`.
pub fn format_duration(d: TimeDelta) -> String {
    let nanos = total_nanos(d);
    let sign = if nanos < 0 { "-" } else { "" };
    let u = nanos.unsigned_abs();
    if u == 0 {
        return "0s".to_string();
    }
    if u < NANOS_PER_SEC {
        let (unit, per) = if u < 1_000 {
            ("ns", 1)
        } else if u < 1_000_000 {
            ("µs", 1_000)
        } else {
            ("ms", 1_000_000)
        };
        return format!("{sign}{}{unit}", fraction(u, per));
    }

    let hours = u / (3600 * NANOS_PER_SEC);
    let rest = u % (3600 * NANOS_PER_SEC);
    let minutes = rest / (60 * NANOS_PER_SEC);
    let seconds = rest % (60 * NANOS_PER_SEC);

    let mut out = sign.to_string();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&fraction(seconds, NANOS_PER_SEC));
    out.push('s');
    out
}

/// `n / per` with the remainder as trimmed decimal digits.
fn fraction(n: u128, per: u128) -> String {
    let whole = n / per;
    let rem = n % per;
    if rem == 0 {
        return whole.to_string();
    }
    let digits = per.to_string().len() - 1;
    let frac = format!("{rem:0digits$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(TimeDelta::zero()), "0s");
        assert_eq!(format_duration(TimeDelta::nanoseconds(15)), "15ns");
        assert_eq!(format_duration(TimeDelta::microseconds(1500)), "1.5ms");
        assert_eq!(format_duration(TimeDelta::seconds(1)), "1s");
        assert_eq!(format_duration(TimeDelta::seconds(61)), "1m1s");
        assert_eq!(format_duration(TimeDelta::hours(1)), "1h0m0s");
        assert_eq!(
            format_duration(TimeDelta::seconds(3723) + TimeDelta::milliseconds(500)),
            "1h2m3.5s"
        );
        assert_eq!(format_duration(TimeDelta::seconds(-90)), "-1m30s");
    }

    #[test]
    fn test_fraction_trims_zeros() {
        assert_eq!(fraction(1_500_000_000, NANOS_PER_SEC), "1.5");
        assert_eq!(fraction(1_000_000_001, NANOS_PER_SEC), "1.000000001");
    }
}
