//! Canonical logging macros
//!
//! Field names follow [`schema`](crate::schema).

/// Log the start of an operation
///
/// ```
/// # use trailcheck_core::log_op_start;
/// log_op_start!("equal");
/// log_op_start!("equal", trail = "Order.Items");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use trailcheck_core::log_op_end;
/// log_op_end!("equal", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log a failed operation with the kind and code of its report
///
/// ```
/// # use trailcheck_core::log_op_error;
/// # use trailcheck_core::notice::Report;
/// let report = Report::new("expected values to be equal");
/// log_op_error!("equal", report, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let kind = $crate::errors::Classified::report_kind(&$err);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?kind,
            err.code = kind.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let kind = $crate::errors::Classified::report_kind(&$err);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?kind,
            err.code = kind.code(),
            $($field)*
        );
    }};
}
