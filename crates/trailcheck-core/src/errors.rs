use crate::notice::{Failure, Report};
use crate::value::Kind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using Failure
pub type Result<T> = std::result::Result<T, Failure>;

// ========== Report Taxonomy ==========

/// Canonical report kind taxonomy
///
/// Every failure produced by the toolkit is a [`Report`]; the kind
/// classifies it with a stable code for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// The compared values differ
    Mismatch,
    /// Declared types differ where structural descent is impossible
    Shape,
    /// The caller misused the API (malformed pattern, bad argument)
    Usage,
    /// The operation is not supported for the value's shape
    Unsupported,
}

impl ReportKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ReportKind::Mismatch => "ERR_VALUE_MISMATCH",
            ReportKind::Shape => "ERR_SHAPE_MISMATCH",
            ReportKind::Usage => "ERR_USAGE",
            ReportKind::Unsupported => "ERR_UNSUPPORTED",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Values carrying a report kind, for structured error logging.
pub trait Classified {
    fn report_kind(&self) -> ReportKind;
}

impl Classified for Report {
    fn report_kind(&self) -> ReportKind {
        self.kind()
    }
}

/// A composite failure is classified by its first report.
impl Classified for Failure {
    fn report_kind(&self) -> ReportKind {
        self.first().kind()
    }
}

impl<T: Classified + ?Sized> Classified for &T {
    fn report_kind(&self) -> ReportKind {
        (**self).report_kind()
    }
}

/// Sentinel cause carried by every report.
///
/// [`is_assertion`] finds it anywhere in a source chain, so composed and
/// wrapped reports still identify as assertion failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("assertion error")]
pub struct AssertionError;

/// True when the error or anything in its source chain is an assertion
/// failure.
pub fn is_assertion(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<AssertionError>() || e.is::<Report>() || e.is::<Failure>() {
            return true;
        }
        current = e.source();
    }
    false
}

// ========== Dumper Errors ==========

/// Renderer failures. These are configuration defects, never reportable
/// differences between values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DumpError {
    /// A registered renderer was handed a value shape it cannot render
    #[error("renderer for {type_name} cannot render a {kind} value")]
    UnexpectedShape { type_name: String, kind: Kind },

    /// A `strftime` pattern could not be applied
    #[error("invalid time format pattern: {pattern:?}")]
    TimeFormat { pattern: String },
}

// ========== Conversions ==========

impl From<regex::Error> for Report {
    fn from(err: regex::Error) -> Self {
        Report::new("invalid regular expression")
            .with_kind(ReportKind::Usage)
            .append("error", err.to_string())
    }
}

impl From<serde_json::Error> for Report {
    fn from(err: serde_json::Error) -> Self {
        Report::new("did not expect the JSON to be invalid")
            .with_kind(ReportKind::Usage)
            .append("error", err.to_string())
    }
}
