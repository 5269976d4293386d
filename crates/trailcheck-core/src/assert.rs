//! Panicking assertions for tests.
//!
//! Every function mirrors a check in [`crate::check`] and panics with the
//! rendered failure at the caller's location. [`Soft`] records failures and
//! keeps going, panicking with all of them on [`Soft::finish`].
//!
//! ```should_panic
//! use trailcheck_core::assert;
//!
//! assert::equal(&vec![1, 2], &vec![1, 3]);
//! ```

use crate::check::{self, CheckOption};
use crate::notice::Failure;
use crate::value::ToValue;
use chrono::TimeDelta;
use std::panic::UnwindSafe;
use std::path::Path;

#[track_caller]
fn require<T>(result: Result<T, Failure>) -> T {
    match result {
        Ok(v) => v,
        Err(failure) => panic!("{failure}"),
    }
}

#[track_caller]
pub fn equal<W: ToValue + ?Sized, H: ToValue + ?Sized>(want: &W, have: &H) {
    require(check::equal(want, have, &[]));
}

#[track_caller]
pub fn equal_with<W: ToValue + ?Sized, H: ToValue + ?Sized>(
    want: &W,
    have: &H,
    options: &[CheckOption],
) {
    require(check::equal(want, have, options));
}

#[track_caller]
pub fn not_equal<W: ToValue + ?Sized, H: ToValue + ?Sized>(want: &W, have: &H) {
    require(check::not_equal(want, have, &[]));
}

#[track_caller]
pub fn json(want: &str, have: &str) {
    require(check::json(want, have, &[]));
}

#[track_caller]
pub fn is_true(have: bool) {
    require(check::is_true(have));
}

#[track_caller]
pub fn is_false(have: bool) {
    require(check::is_false(have));
}

#[track_caller]
pub fn nil<T: ToValue + ?Sized>(have: &T) {
    require(check::nil(have));
}

#[track_caller]
pub fn not_nil<T: ToValue + ?Sized>(have: &T) {
    require(check::not_nil(have));
}

#[track_caller]
pub fn len<T: ToValue + ?Sized>(have: &T, want: usize) {
    require(check::len(have, want));
}

#[track_caller]
pub fn contain<H: ToValue + ?Sized, W: ToValue + ?Sized>(have: &H, want: &W) {
    require(check::contain(have, want));
}

#[track_caller]
pub fn regexp(pattern: &str, have: &str) {
    require(check::regexp(pattern, have));
}

#[track_caller]
pub fn epsilon(want: f64, have: f64, epsilon: f64) {
    require(check::epsilon(want, have, epsilon));
}

#[track_caller]
pub fn time_equal<W: ToValue + ?Sized, H: ToValue + ?Sized>(want: &W, have: &H) {
    require(check::time_equal(want, have));
}

#[track_caller]
pub fn time_exact<W: ToValue + ?Sized, H: ToValue + ?Sized>(want: &W, have: &H) {
    require(check::time_exact(want, have));
}

#[track_caller]
pub fn zone<W: ToValue + ?Sized, H: ToValue + ?Sized>(want: &W, have: &H) {
    require(check::zone(want, have));
}

#[track_caller]
pub fn within<W: ToValue + ?Sized, H: ToValue + ?Sized>(want: &W, have: &H, tolerance: TimeDelta) {
    require(check::within(want, have, tolerance));
}

#[track_caller]
pub fn duration(want: TimeDelta, have: TimeDelta) {
    require(check::duration(want, have));
}

#[track_caller]
pub fn file_exist(path: impl AsRef<Path>) {
    require(check::file_exist(path));
}

#[track_caller]
pub fn dir_exist(path: impl AsRef<Path>) {
    require(check::dir_exist(path));
}

/// Returns the panic message.
#[track_caller]
pub fn panics<F: FnOnce() + UnwindSafe>(f: F) -> String {
    require(check::panics(f))
}

#[track_caller]
pub fn no_panic<F: FnOnce() + UnwindSafe>(f: F) {
    require(check::no_panic(f));
}

/// Records failures instead of panicking on the first one.
#[derive(Debug, Default)]
pub struct Soft {
    failures: Vec<Failure>,
}

impl Soft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure, if any; returns whether the check passed
    pub fn check(&mut self, result: Result<(), Failure>) -> bool {
        match result {
            Ok(()) => true,
            Err(failure) => {
                self.failures.push(failure);
                false
            }
        }
    }

    /// Record a structural comparison
    pub fn equal<W: ToValue + ?Sized, H: ToValue + ?Sized>(&mut self, want: &W, have: &H) -> bool {
        self.check(check::equal(want, have, &[]))
    }

    /// Stop immediately on failure, reporting everything recorded so far
    #[track_caller]
    pub fn require(&mut self, result: Result<(), Failure>) {
        if !self.check(result) {
            self.fail();
        }
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Panic with every recorded failure, if any
    #[track_caller]
    pub fn finish(mut self) {
        if !self.is_ok() {
            self.fail();
        }
    }

    #[track_caller]
    fn fail(&mut self) {
        let reports = std::mem::take(&mut self.failures)
            .into_iter()
            .flat_map(Failure::into_reports)
            .collect();
        if let Err(all) = Failure::join(reports) {
            panic!("{all}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_assertions_do_not_panic() {
        equal(&vec![1, 2], &vec![1, 2]);
        not_equal(&1, &2);
        json(r#"{"a": [1, 2]}"#, r#"{"a": [1.0, 2]}"#);
        len("abc", 3);
    }

    #[test]
    #[should_panic(expected = "expected values to be equal")]
    fn test_equal_panics_with_report() {
        equal(&"a", &"b");
    }

    #[test]
    fn test_soft_records_and_continues() {
        let mut soft = Soft::new();
        assert!(!soft.equal(&1, &2));
        assert!(soft.check(check::is_true(true)));
        assert!(!soft.check(check::is_true(false)));
        assert_eq!(soft.failures().len(), 2);
        let message = check::panics(std::panic::AssertUnwindSafe(move || soft.finish())).unwrap();
        assert!(message.contains("expected values to be equal"));
        assert!(message.contains("expected value to be true"));
    }

    #[test]
    fn test_soft_finish_without_failures() {
        let soft = Soft::new();
        assert!(soft.is_ok());
        soft.finish();
    }
}
