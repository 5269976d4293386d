//! Location trails inside nested values
//!
//! A trail locates a sub-value inside a larger structure using dot/bracket
//! syntax: `Order.Items[1].Price`, `Config.Limits["burst"]`. Every descent
//! extends the trail, it is never replaced.

use std::fmt;

/// Path of a sub-value relative to the root of a comparison or dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Trail(String);

impl Trail {
    /// Create an empty (root) trail
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the root trail
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend with a record field.
    ///
    /// At the root the record's type name leads the trail (`Point.X`),
    /// below the root only the field is appended (`Line.A.X`).
    pub fn field(&self, type_name: &str, field: &str) -> Self {
        if self.0.is_empty() {
            if type_name.is_empty() {
                return Self(field.to_string());
            }
            return Self(format!("{type_name}.{field}"));
        }
        Self(format!("{}.{field}", self.0))
    }

    /// Extend with a sequence index (`[3]`)
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Extend with an already rendered map key (`["key"]`, `[7]`)
    pub fn key(&self, rendered_key: &str) -> Self {
        Self(format!("{}[{rendered_key}]", self.0))
    }
}

impl From<&str> for Trail {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Trail {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
