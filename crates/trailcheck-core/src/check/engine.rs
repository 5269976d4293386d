//! Recursive comparison over [`Value`] pairs.
//!
//! Leaf decisions record their trail in the trail log. Composite descents
//! record their own trail only when they finish without descending (nil,
//! empty, length mismatch).
//!
//! Values are owned snapshots, so identity of the source containers is
//! decided by [`equal`](super::equal) while both operands are borrowed,
//! never from anything stored in a [`Value`].

use super::{checks, Options};
use crate::errors::ReportKind;
use crate::notice::{
    Failure, Report, HEADER_EQUAL, ROW_HAVE_LEN, ROW_HAVE_TYPE, ROW_WANT_LEN, ROW_WANT_TYPE,
};
use crate::value::order::{same, sorted_entries};
use crate::value::{cmp_values, Data, Field, Value};
use std::cmp::Ordering;
use trailcheck_core_types::schema;

/// Rendered in place of the absent side of a map key.
pub(crate) const MISSING: &str = "<missing>";

pub(super) fn compare(want: &Value, have: &Value, opts: &Options) -> Result<(), Failure> {
    if let Some(check) = opts.path_check() {
        opts.log_trail();
        return check(want, have, opts);
    }

    match (want.is_invalid(), have.is_invalid()) {
        (true, true) => return leaf(opts, None),
        (true, false) | (false, true) => {
            // The untyped absence matches any nil handle.
            let present = if want.is_invalid() { have } else { want };
            let report = (!present.is_nil()).then(|| mismatch(want, have, opts));
            return leaf(opts, report);
        }
        (false, false) => {}
    }

    if want.ty() != have.ty() {
        return leaf(opts, Some(type_mismatch(want, have, opts)));
    }

    if let Some(check) = opts.type_check(want.ty()) {
        opts.log_trail();
        return check(want, have, opts);
    }

    match (want.data(), have.data()) {
        (Data::Ptr { target: w, .. }, Data::Ptr { target: h, .. })
        | (Data::Interface(w), Data::Interface(h)) => {
            indirect(want, have, w.as_deref(), h.as_deref(), opts)
        }
        (Data::Struct(w), Data::Struct(h)) => record(want, have, w, h, opts),
        (Data::Seq { items: w }, Data::Seq { items: h }) => sequence(
            want,
            have,
            w.as_deref().unwrap_or_default(),
            h.as_deref().unwrap_or_default(),
            opts,
        ),
        (Data::Map { entries: w }, Data::Map { entries: h }) => map(
            want,
            have,
            w.as_deref().unwrap_or_default(),
            h.as_deref().unwrap_or_default(),
            opts,
        ),
        (Data::Time(..), Data::Time(..)) => {
            leaf(opts, checks::instant_mismatch(want, have, opts.dump()).map(|r| r.trail(opts.trail())))
        }
        (Data::Zone(..), Data::Zone(..)) => {
            leaf(opts, checks::zone_mismatch(want, have, opts.dump()).map(|r| r.trail(opts.trail())))
        }
        (Data::Handle(w), Data::Handle(h)) => {
            leaf(opts, (w != h).then(|| mismatch(want, have, opts)))
        }
        (Data::Bool(w), Data::Bool(h)) => leaf(opts, (w != h).then(|| mismatch(want, have, opts))),
        (Data::Int(w), Data::Int(h)) => leaf(opts, (w != h).then(|| mismatch(want, have, opts))),
        (Data::Uint(w), Data::Uint(h)) => leaf(opts, (w != h).then(|| mismatch(want, have, opts))),
        (Data::Char(w), Data::Char(h)) => leaf(opts, (w != h).then(|| mismatch(want, have, opts))),
        (Data::Str(w), Data::Str(h)) => leaf(opts, (w != h).then(|| mismatch(want, have, opts))),
        (Data::Float(w), Data::Float(h)) => {
            leaf(opts, (!float_eq(*w, *h)).then(|| mismatch(want, have, opts)))
        }
        (Data::Complex(wr, wi), Data::Complex(hr, hi)) => {
            let equal = float_eq(*wr, *hr) && float_eq(*wi, *hi);
            leaf(opts, (!equal).then(|| mismatch(want, have, opts)))
        }
        (Data::Duration(w), Data::Duration(h)) => {
            leaf(opts, (w != h).then(|| mismatch(want, have, opts)))
        }
        _ => leaf(opts, (!same(want, have)).then(|| mismatch(want, have, opts))),
    }
}

/// NaN equals NaN so every value equals itself.
fn float_eq(x: f64, y: f64) -> bool {
    x == y || (x.is_nan() && y.is_nan())
}

fn leaf(opts: &Options, report: Option<Report>) -> Result<(), Failure> {
    opts.log_trail();
    match report {
        Some(report) => Err(report.into()),
        None => Ok(()),
    }
}

fn collect(reports: &mut Vec<Report>, result: Result<(), Failure>) {
    if let Err(failure) = result {
        reports.extend(failure.into_reports());
    }
}

/// Pointers and open handles are transparent to the trail.
fn indirect(
    want: &Value,
    have: &Value,
    w: Option<&Value>,
    h: Option<&Value>,
    opts: &Options,
) -> Result<(), Failure> {
    match (w, h) {
        (None, None) => leaf(opts, None),
        (Some(_), None) | (None, Some(_)) => leaf(opts, Some(mismatch(want, have, opts))),
        (Some(w), Some(h)) => compare(w, h, opts),
    }
}

fn record(
    want: &Value,
    have: &Value,
    w: &[Field],
    h: &[Field],
    opts: &Options,
) -> Result<(), Failure> {
    let aligned = w.len() == h.len() && w.iter().zip(h).all(|(a, b)| a.name == b.name);
    if !aligned {
        return leaf(opts, (!same(want, have)).then(|| mismatch(want, have, opts)));
    }

    let mut reports = Vec::new();
    let mut descended = false;
    for (wf, hf) in w.iter().zip(h).filter(|(wf, _)| wf.exported) {
        descended = true;
        let trail = opts.trail().field(want.type_name(), &wf.name);
        collect(&mut reports, compare(&wf.value, &hf.value, &opts.at(trail)));
    }
    if !descended {
        opts.log_trail();
    }
    Failure::join(reports)
}

fn sequence(
    want: &Value,
    have: &Value,
    w: &[Value],
    h: &[Value],
    opts: &Options,
) -> Result<(), Failure> {
    if w.len() != h.len() {
        return leaf(opts, Some(length_mismatch(want, have, w.len(), h.len(), opts)));
    }
    if w.is_empty() {
        return leaf(opts, None);
    }

    let mut reports = Vec::new();
    for (i, (wv, hv)) in w.iter().zip(h).enumerate() {
        let trail = opts.trail().index(i);
        collect(&mut reports, compare(wv, hv, &opts.at(trail)));
    }
    Failure::join(reports)
}

/// Walks the union of keys in key order; a key on one side only is a
/// full-value mismatch at that key's trail.
fn map(
    want: &Value,
    have: &Value,
    w: &[(Value, Value)],
    h: &[(Value, Value)],
    opts: &Options,
) -> Result<(), Failure> {
    if w.len() != h.len() {
        return leaf(opts, Some(length_mismatch(want, have, w.len(), h.len(), opts)));
    }
    if w.is_empty() {
        return leaf(opts, None);
    }

    let keys = opts
        .dump()
        .clone()
        .with_flat()
        .with_compact()
        .with_print_type(false);
    let w = sorted_entries(w);
    let h = sorted_entries(h);
    let (mut i, mut j) = (0, 0);
    let mut reports = Vec::new();

    loop {
        let ord = match (w.get(i), h.get(j)) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((wk, _)), Some((hk, _))) => cmp_values(wk, hk),
        };
        match ord {
            Ordering::Equal => {
                let (wk, wv) = w[i];
                let (_, hv) = h[j];
                let at = opts.at(opts.trail().key(&keys.value(wk)));
                collect(&mut reports, compare(wv, hv, &at));
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                let (wk, wv) = w[i];
                let at = opts.at(opts.trail().key(&keys.value(wk)));
                at.log_trail();
                reports.push(missing_key(&at, at.dump().value(wv), MISSING.to_string()));
                i += 1;
            }
            Ordering::Greater => {
                let (hk, hv) = h[j];
                let at = opts.at(opts.trail().key(&keys.value(hk)));
                at.log_trail();
                reports.push(missing_key(&at, MISSING.to_string(), at.dump().value(hv)));
                j += 1;
            }
        }
    }
    Failure::join(reports)
}

fn trace_mismatch(want: &Value, have: &Value, opts: &Options) {
    tracing::debug!(
        event = schema::EVENT_MISMATCH,
        trail = %opts.trail(),
        want_type = %want.ty(),
        have_type = %have.ty(),
    );
}

pub(super) fn mismatch(want: &Value, have: &Value, opts: &Options) -> Report {
    trace_mismatch(want, have, opts);
    Report::new(HEADER_EQUAL)
        .trail(opts.trail())
        .want(opts.dump().value(want))
        .have(opts.dump().value(have))
}

fn type_mismatch(want: &Value, have: &Value, opts: &Options) -> Report {
    mismatch(want, have, opts)
        .with_kind(ReportKind::Shape)
        .append(ROW_WANT_TYPE, want.ty())
        .append(ROW_HAVE_TYPE, have.ty())
}

fn length_mismatch(
    want: &Value,
    have: &Value,
    want_len: usize,
    have_len: usize,
    opts: &Options,
) -> Report {
    mismatch(want, have, opts)
        .append(ROW_WANT_LEN, want_len)
        .append(ROW_HAVE_LEN, have_len)
}

fn missing_key(opts: &Options, want: String, have: String) -> Report {
    tracing::debug!(event = schema::EVENT_MISMATCH, trail = %opts.trail());
    Report::new(HEADER_EQUAL)
        .trail(opts.trail())
        .want(want)
        .have(have)
}
