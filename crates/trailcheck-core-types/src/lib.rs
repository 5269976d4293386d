//! Core types shared across trailcheck facilities
//!
//! This crate provides foundational types used by the equality engine,
//! the value dumper and the logging facility:
//!
//! - **Trail**: location paths inside nested values (`T.Field[0]["key"]`)
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
pub mod trail;

pub use trail::Trail;
