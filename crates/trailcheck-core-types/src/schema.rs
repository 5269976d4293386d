//! Field keys and event names shared by every structured log line.
//!
//! The logging macros and the equality engine emit these names; the test
//! capture layer reads them back. A field listed here must be spelled the
//! same way at the emitting `tracing` call site.

/// Module path of the emitting code
pub const FIELD_COMPONENT: &str = "component";
/// Top-level operation (`equal`, `json`, ...)
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Comparison context carried by `mismatch` events
pub const FIELD_TRAIL: &str = "trail";
pub const FIELD_WANT_TYPE: &str = "want_type";
pub const FIELD_HAVE_TYPE: &str = "have_type";
/// Number of reports in a failed comparison
pub const FIELD_REPORT_COUNT: &str = "report_count";

// Set on `end_error` only
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
/// One located difference, emitted at debug level
pub const EVENT_MISMATCH: &str = "mismatch";
