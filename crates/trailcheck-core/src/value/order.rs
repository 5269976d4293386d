//! Deterministic ordering of values.
//!
//! Map keys and set elements are emitted and compared in this order, never
//! in source iteration order, so identical data always yields identical
//! diagnostics.

use super::{Data, Value};
use std::cmp::Ordering;

/// Typed total order over values.
///
/// Values of the same shape compare by content (numbers numerically, floats
/// by IEEE total order, text lexicographically, instants on the timeline).
/// Values of different shapes order by shape rank, then by type name.
pub fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a.data(), b.data()) {
        (Data::Invalid, Data::Invalid) => Ordering::Equal,
        (Data::Bool(x), Data::Bool(y)) => x.cmp(y),
        (Data::Int(x), Data::Int(y)) => x.cmp(y),
        (Data::Uint(x), Data::Uint(y)) => x.cmp(y),
        (Data::Int(x), Data::Uint(y)) => cmp_mixed(*x, *y),
        (Data::Uint(x), Data::Int(y)) => cmp_mixed(*y, *x).reverse(),
        (Data::Float(x), Data::Float(y)) => x.total_cmp(y),
        (Data::Complex(xr, xi), Data::Complex(yr, yi)) => {
            xr.total_cmp(yr).then_with(|| xi.total_cmp(yi))
        }
        (Data::Char(x), Data::Char(y)) => x.cmp(y),
        (Data::Str(x), Data::Str(y)) => x.cmp(y),
        (Data::Time(x, _), Data::Time(y, _)) => x.cmp(y),
        (Data::Duration(x), Data::Duration(y)) => x.cmp(y),
        (Data::Zone(x), Data::Zone(y)) => x.name().cmp(y.name()),
        (Data::Handle(x), Data::Handle(y)) => x.cmp(y),
        (Data::Ptr { target: x, .. }, Data::Ptr { target: y, .. })
        | (Data::Interface(x), Data::Interface(y)) => match (x, y) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => cmp_values(x, y),
        },
        (Data::Seq { items: x }, Data::Seq { items: y }) => {
            let x = x.as_deref().unwrap_or_default();
            let y = y.as_deref().unwrap_or_default();
            cmp_lexicographic(x.iter(), y.iter())
        }
        (Data::Map { entries: x }, Data::Map { entries: y }) => {
            let x = sorted_entries(x.as_deref().unwrap_or_default());
            let y = sorted_entries(y.as_deref().unwrap_or_default());
            let mut ord = x.len().cmp(&y.len());
            for ((xk, xv), (yk, yv)) in x.iter().zip(y.iter()) {
                if ord != Ordering::Equal {
                    break;
                }
                ord = cmp_values(xk, yk).then_with(|| cmp_values(xv, yv));
            }
            ord
        }
        (Data::Struct(x), Data::Struct(y)) => a.type_name().cmp(b.type_name()).then_with(|| {
            cmp_lexicographic(x.iter().map(|f| &f.value), y.iter().map(|f| &f.value))
        }),
        _ => a
            .kind()
            .cmp(&b.kind())
            .then_with(|| a.type_name().cmp(b.type_name())),
    }
}

/// Structural equality ignoring addresses; NaN never equals itself.
pub fn same(a: &Value, b: &Value) -> bool {
    match (a.data(), b.data()) {
        (Data::Float(x), Data::Float(y)) => x == y,
        (Data::Complex(xr, xi), Data::Complex(yr, yi)) => xr == yr && xi == yi,
        _ => a.ty() == b.ty() && cmp_values(a, b) == Ordering::Equal,
    }
}

/// Map entries sorted by key.
pub fn sorted_entries(entries: &[(Value, Value)]) -> Vec<&(Value, Value)> {
    let mut sorted: Vec<&(Value, Value)> = entries.iter().collect();
    sorted.sort_by(|x, y| cmp_values(&x.0, &y.0));
    sorted
}

fn cmp_mixed(signed: i128, unsigned: u128) -> Ordering {
    match u128::try_from(signed) {
        Ok(s) => s.cmp(&unsigned),
        Err(_) => Ordering::Less,
    }
}

fn cmp_lexicographic<'a>(
    mut x: impl Iterator<Item = &'a Value>,
    mut y: impl Iterator<Item = &'a Value>,
) -> Ordering {
    loop {
        match (x.next(), y.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => match cmp_values(a, b) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}
