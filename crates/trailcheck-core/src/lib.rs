//! trailcheck core - structural equality, value dumping and reports for tests
//!
//! This crate provides:
//! - A dynamic value model every Rust value converts into ([`value`])
//! - A configurable, depth-bounded value dumper ([`dump`])
//! - A report builder producing aligned, row-based diagnostics ([`notice`])
//! - A structural equality engine locating every mismatch by trail ([`check`])
//! - Panicking assertions and a soft collector for tests ([`assert`])
//!
//! ```
//! use trailcheck_core::{check, record};
//!
//! record! {
//!     pub struct Item {
//!         pub name: String,
//!         pub qty: u32,
//!     }
//! }
//!
//! let want = Item { name: "bolt".into(), qty: 2 };
//! let have = Item { name: "bolt".into(), qty: 3 };
//! let failure = check::equal(&want, &have, &[]).unwrap_err();
//! assert_eq!(
//!     failure.to_string(),
//!     "expected values to be equal:\n  trail: Item.qty\n   want: 2\n   have: 3"
//! );
//! ```

pub mod assert;
pub mod check;
pub mod dump;
pub mod errors;
pub mod logging_facility;
pub mod notice;
pub mod value;

pub use trailcheck_core_types::{schema, Trail};

// Re-export commonly used types
pub use check::{equal, not_equal, CheckOption, Options};
pub use dump::Dump;
pub use errors::{AssertionError, DumpError, ReportKind, Result};
pub use notice::{Failure, Report};
pub use value::{ToValue, Typed, Value};
