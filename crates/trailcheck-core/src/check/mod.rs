//! Structural equality engine.
//!
//! [`equal`] converts both operands into [`Value`]s and walks them
//! together, collecting every mismatch with its location trail. Resolution
//! at each level is: path override, type override, built-in dispatch.
//!
//! ```
//! use trailcheck_core::check::{equal, with_trail};
//!
//! assert!(equal(&vec![1, 2], &vec![1, 2], &[]).is_ok());
//!
//! let failure = equal(&vec![1, 2], &vec![1, 3], &[with_trail("items")]).unwrap_err();
//! assert_eq!(failure.first().row("trail"), Some("items[1]"));
//! ```

mod checks;
mod engine;

pub use checks::{
    contain, dir_exist, duration, epsilon, file_exist, is_false, is_true, json, len, nil,
    no_panic, not_nil, panics, regexp, time_equal, time_exact, time_exact_check, within, zone,
};

use crate::dump::Dump;
use crate::notice::{Failure, Report};
use crate::value::{ToValue, Type, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use trailcheck_core_types::Trail;

/// Override comparator for a path or a type.
///
/// Receives the pair under comparison and the options positioned at its
/// trail; recursing with [`equal_values`] keeps the built-in behavior for
/// nested values.
pub type Check = Arc<dyn Fn(&Value, &Value, &Options) -> Result<(), Failure> + Send + Sync>;

/// Functional option applied to default [`Options`].
pub type CheckOption = Box<dyn Fn(&mut Options) + Send + Sync>;

/// Wrap a closure as a [`Check`]
pub fn check<F>(f: F) -> Check
where
    F: Fn(&Value, &Value, &Options) -> Result<(), Failure> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Shared sink recording every trail the engine decided on.
#[derive(Debug, Clone, Default)]
pub struct TrailLog(Arc<Mutex<Vec<String>>>);

impl TrailLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visited trail
    pub fn record(&self, trail: &Trail) {
        self.0
            .lock()
            .map(|mut entries| entries.push(trail.to_string()))
            .ok();
    }

    /// Visited trails in visit order
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        self.0.lock().map(|mut e| e.clear()).ok();
    }
}

/// Comparison options, threaded by value through the recursion.
///
/// Override tables and the render configuration are shared; descending
/// only replaces the trail.
#[derive(Clone, Default)]
pub struct Options {
    trail: Trail,
    trail_log: Option<TrailLog>,
    path_checks: Arc<BTreeMap<String, Check>>,
    type_checks: Arc<HashMap<Type, Check>>,
    dump: Arc<Dump>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("trail", &self.trail)
            .field("trail_log", &self.trail_log.is_some())
            .field("path_checks", &self.path_checks.keys().collect::<Vec<_>>())
            .field("type_checks", &self.type_checks.keys().collect::<Vec<_>>())
            .field("dump", &self.dump)
            .finish()
    }
}

impl Options {
    /// Default options with the given options applied in order
    pub fn new(options: &[CheckOption]) -> Self {
        let mut opts = Self::default();
        for option in options {
            option(&mut opts);
        }
        opts
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn trail_log(&self) -> Option<&TrailLog> {
        self.trail_log.as_ref()
    }

    pub fn dump(&self) -> &Dump {
        &self.dump
    }

    /// Same options positioned at another trail
    pub fn at(&self, trail: Trail) -> Self {
        Self {
            trail,
            ..self.clone()
        }
    }

    fn path_check(&self) -> Option<&Check> {
        self.path_checks.get(self.trail.as_str())
    }

    fn type_check(&self, ty: &Type) -> Option<&Check> {
        self.type_checks.get(ty)
    }

    fn log_trail(&self) {
        if let Some(log) = &self.trail_log {
            log.record(&self.trail);
        }
    }
}

/// Option: start comparisons at the given trail
pub fn with_trail(trail: impl Into<String>) -> CheckOption {
    let trail = Trail::from(trail.into());
    Box::new(move |o: &mut Options| o.trail = trail.clone())
}

/// Option: record every decided trail into `log`
pub fn with_trail_log(log: TrailLog) -> CheckOption {
    Box::new(move |o: &mut Options| o.trail_log = Some(log.clone()))
}

/// Option: compare the value at exactly `path` with `check`
pub fn with_path_check(path: impl Into<String>, check: Check) -> CheckOption {
    let path = path.into();
    Box::new(move |o: &mut Options| {
        Arc::make_mut(&mut o.path_checks).insert(path.clone(), check.clone());
    })
}

/// Option: compare every value of type `ty` with `check`
pub fn with_type_check(ty: Type, check: Check) -> CheckOption {
    Box::new(move |o: &mut Options| {
        Arc::make_mut(&mut o.type_checks).insert(ty.clone(), check.clone());
    })
}

/// Option: render values with `dump`
pub fn with_dump(dump: Dump) -> CheckOption {
    let dump = Arc::new(dump);
    Box::new(move |o: &mut Options| o.dump = dump.clone())
}

/// Compare two values structurally.
///
/// # Errors
///
/// Returns every independent mismatch, in encounter order.
pub fn equal<W, H>(want: &W, have: &H, options: &[CheckOption]) -> Result<(), Failure>
where
    W: ToValue + ?Sized,
    H: ToValue + ?Sized,
{
    let start = Instant::now();
    crate::log_op_start!("equal");
    let opts = Options::new(options);
    let result = if same_operand(want, have) {
        opts.log_trail();
        Ok(())
    } else {
        equal_values(&want.to_value(), &have.to_value(), &opts)
    };
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(()) => {
            crate::log_op_end!("equal", duration_ms = duration_ms);
        }
        Err(failure) => {
            crate::log_op_error!(
                "equal",
                failure,
                duration_ms = duration_ms,
                report_count = failure.len()
            );
        }
    }
    result
}

/// Both operands are the same live object of the same type; equal without
/// converting or descending. Zero-sized operands never qualify.
fn same_operand<W: ?Sized, H: ?Sized>(want: &W, have: &H) -> bool {
    let size = std::mem::size_of_val(want);
    size != 0
        && size == std::mem::size_of_val(have)
        && std::ptr::eq((want as *const W).cast::<()>(), (have as *const H).cast::<()>())
        && std::any::type_name::<W>() == std::any::type_name::<H>()
}

/// Compare two already converted values at the trail held by `opts`.
///
/// # Errors
///
/// Returns every independent mismatch, in encounter order.
pub fn equal_values(want: &Value, have: &Value, opts: &Options) -> Result<(), Failure> {
    engine::compare(want, have, opts)
}

/// Expect the values to differ.
///
/// # Errors
///
/// Returns a report when the values are structurally equal.
pub fn not_equal<W, H>(want: &W, have: &H, options: &[CheckOption]) -> Result<(), Failure>
where
    W: ToValue + ?Sized,
    H: ToValue + ?Sized,
{
    let opts = Options::new(options);
    let have = have.to_value();
    if equal_values(&want.to_value(), &have, &opts).is_err() {
        return Ok(());
    }
    Err(Report::new("expected values not to be equal")
        .trail(opts.trail())
        .have(opts.dump().value(&have))
        .into())
}
