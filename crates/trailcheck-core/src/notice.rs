//! Report builder.
//!
//! A [`Report`] is a header plus an ordered set of named rows; it renders as
//!
//! ```text
//! expected values to be equal:
//!   trail: Order.Items[1].Price
//!    want: 10
//!    have: 12
//! ```
//!
//! with row names right-aligned to the longest name and the `trail` row
//! always first. Reports from sibling comparisons are joined into one
//! [`Failure`] in encounter order.

use crate::errors::{AssertionError, ReportKind};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Header of value mismatch reports.
pub const HEADER_EQUAL: &str = "expected values to be equal";

/// Row names used across the toolkit.
pub const ROW_TRAIL: &str = "trail";
pub const ROW_WANT: &str = "want";
pub const ROW_HAVE: &str = "have";
pub const ROW_WANT_TYPE: &str = "want type";
pub const ROW_HAVE_TYPE: &str = "have type";
pub const ROW_WANT_LEN: &str = "want len";
pub const ROW_HAVE_LEN: &str = "have len";

/// One named report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub name: String,
    pub value: String,
}

/// Structured failure: header, ordered rows and a wrapped cause.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    kind: ReportKind,
    header: String,
    rows: Vec<Row>,
    #[serde(skip)]
    cause: Arc<dyn Error + Send + Sync>,
    #[serde(skip)]
    prefixed: bool,
}

impl Report {
    /// Create a mismatch report with the given header
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            kind: ReportKind::Mismatch,
            header: header.into(),
            rows: Vec::new(),
            cause: Arc::new(AssertionError),
            prefixed: false,
        }
    }

    /// Set the report kind
    pub fn with_kind(mut self, kind: ReportKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replace the header
    pub fn set_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Add a row at the end; an existing row with the same name moves there
    pub fn append(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        let name = name.into();
        self.rows.retain(|r| r.name != name);
        self.rows.push(Row {
            name,
            value: value.to_string(),
        });
        self
    }

    /// Add a row at the front, after the trail row when there is one
    pub fn prepend(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        let name = name.into();
        self.rows.retain(|r| r.name != name);
        let at = usize::from(self.rows.first().is_some_and(|r| r.name == ROW_TRAIL));
        self.rows.insert(
            at,
            Row {
                name,
                value: value.to_string(),
            },
        );
        self
    }

    /// Set the trail row, always kept first. An empty trail leaves the
    /// report unchanged.
    pub fn trail(mut self, trail: impl fmt::Display) -> Self {
        let trail = trail.to_string();
        if trail.is_empty() {
            return self;
        }
        self.rows.retain(|r| r.name != ROW_TRAIL);
        self.rows.insert(
            0,
            Row {
                name: ROW_TRAIL.to_string(),
                value: trail,
            },
        );
        self
    }

    pub fn want(self, value: impl fmt::Display) -> Self {
        self.append(ROW_WANT, value)
    }

    pub fn have(self, value: impl fmt::Display) -> Self {
        self.append(ROW_HAVE, value)
    }

    /// Wrap a cause; the report itself still identifies as an assertion
    /// failure
    pub fn wrap(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Arc::new(cause);
        self
    }

    /// Remove a row by name
    pub fn remove(mut self, name: &str) -> Self {
        self.rows.retain(|r| r.name != name);
        self
    }

    /// Prefix the header as `[prefix] header`, only once per report
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        if !self.prefixed && !prefix.is_empty() {
            self.header = format!("[{prefix}] {}", self.header);
            self.prefixed = true;
        }
        self
    }

    /// Find a report inside an arbitrary error or its source chain
    pub fn extract(err: &(dyn Error + 'static)) -> Option<Report> {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(report) = e.downcast_ref::<Report>() {
                return Some(report.clone());
            }
            if let Some(failure) = e.downcast_ref::<Failure>() {
                return Some(failure.clone().into_report());
            }
            current = e.source();
        }
        None
    }

    /// Keep building on the report carried by `err`, or start a new one
    /// wrapping it. The prefix is applied only if the report was not
    /// prefixed before.
    pub fn from_error(err: Box<dyn Error + Send + Sync>, prefix: Option<&str>) -> Report {
        let report = match Self::extract(err.as_ref()) {
            Some(report) => report,
            None => Report::new(err.to_string()).wrap(BoxedCause(err)),
        };
        match prefix {
            Some(prefix) => report.with_prefix(prefix),
            None => report,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Value of the named row
    pub fn row(&self, name: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value.as_str())
    }

    /// The wrapped cause
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Reports identify as assertion failures whatever cause they wrap
    pub fn is_assertion(&self) -> bool {
        crate::errors::is_assertion(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;
        if self.rows.is_empty() {
            return Ok(());
        }
        f.write_str(":")?;
        let width = self
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0);
        let continuation = " ".repeat(2 + width + 2);
        for row in &self.rows {
            write!(f, "\n  {:>width$}:", row.name)?;
            let mut lines = row.value.lines();
            if let Some(first) = lines.next() {
                write!(f, " {first}")?;
            }
            for line in lines {
                write!(f, "\n{continuation}{line}")?;
            }
        }
        Ok(())
    }
}

impl Error for Report {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Owned foreign error kept as a report cause.
#[derive(Debug)]
struct BoxedCause(Box<dyn Error + Send + Sync>);

impl fmt::Display for BoxedCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for BoxedCause {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

/// One or more reports from a single comparison, in encounter order.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    reports: Vec<Report>,
}

impl Failure {
    /// Join reports; `None` when there are none
    pub fn from_reports(reports: Vec<Report>) -> Option<Failure> {
        if reports.is_empty() {
            None
        } else {
            Some(Self { reports })
        }
    }

    /// `Ok` when there are no reports, otherwise the joined failure
    pub fn join(reports: Vec<Report>) -> Result<(), Failure> {
        match Self::from_reports(reports) {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<Report> {
        self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// The first report encountered
    pub fn first(&self) -> &Report {
        &self.reports[0]
    }

    /// Collapse into a single report: the only one, or one wrapping all
    pub fn into_report(self) -> Report {
        if self.reports.len() == 1 {
            return self.reports.into_iter().next().unwrap_or_else(|| Report::new(""));
        }
        let header = format!("multiple expectations violated ({})", self.reports.len());
        let kind = self.first().kind();
        Report::new(header)
            .with_kind(kind)
            .append("reports", self.to_string())
            .wrap(self)
    }
}

impl From<Report> for Failure {
    fn from(report: Report) -> Self {
        Self {
            reports: vec![report],
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, report) in self.reports.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(report, f)?;
        }
        Ok(())
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.reports.first().map(|r| r as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_row_names() {
        let report = Report::new(HEADER_EQUAL)
            .trail("T.A")
            .want("1")
            .have("2")
            .append(ROW_WANT_TYPE, "i32")
            .append(ROW_HAVE_TYPE, "i64");
        let expected = "expected values to be equal:\n      \
                        trail: T.A\n       \
                        want: 1\n       \
                        have: 2\n  \
                        want type: i32\n  \
                        have type: i64";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_header_only_without_rows() {
        assert_eq!(Report::new("boom").to_string(), "boom");
    }

    #[test]
    fn test_multiline_values_align_under_value_column() {
        let report = Report::new("h").want("[\n  1,\n]");
        assert_eq!(report.to_string(), "h:\n  want: [\n          1,\n        ]");
    }

    #[test]
    fn test_reappend_moves_row_to_end() {
        let report = Report::new("h").append("a", 1).append("b", 2).append("a", 3);
        let names: Vec<_> = report.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(report.row("a"), Some("3"));
    }

    #[test]
    fn test_prepend_stays_after_trail() {
        let report = Report::new("h")
            .want(1)
            .trail("X.Y")
            .prepend("note", "n")
            .trail("X.Z");
        let names: Vec<_> = report.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["trail", "note", "want"]);
        assert_eq!(report.row(ROW_TRAIL), Some("X.Z"));
    }

    #[test]
    fn test_empty_trail_is_ignored() {
        let report = Report::new("h").trail("A.B").trail("");
        assert_eq!(report.row(ROW_TRAIL), Some("A.B"));
    }

    #[test]
    fn test_remove_row() {
        let report = Report::new("h").want(1).have(2).remove(ROW_WANT);
        assert_eq!(report.rows().len(), 1);
        assert!(report.row(ROW_WANT).is_none());
    }

    #[test]
    fn test_prefix_applied_once() {
        let report = Report::new("h").with_prefix("user").with_prefix("again");
        assert_eq!(report.header(), "[user] h");
    }

    #[test]
    fn test_failure_joins_in_order() {
        let failure = Failure::join(vec![Report::new("a"), Report::new("b")]).unwrap_err();
        assert_eq!(failure.len(), 2);
        assert_eq!(failure.to_string(), "a\nb");
        assert!(Failure::join(Vec::new()).is_ok());
    }

    #[test]
    fn test_serialize_rows() {
        let report = Report::new("h").trail("T.A").want(1);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "mismatch");
        assert_eq!(json["rows"][0]["name"], "trail");
    }
}
