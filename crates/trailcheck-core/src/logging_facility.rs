//! Structured logging facility for trailcheck
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//!   emitted around top-level checks
//! - `mismatch` debug events from the equality engine, carrying the trail
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use trailcheck_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
