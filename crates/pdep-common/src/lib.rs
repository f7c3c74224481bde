//! Common utilities and data structures for pdep.
//!
//! This crate provides the position types shared by every stage of the
//! PHP front end:
//! - `BytePos`: a byte offset into a source buffer
//! - `Location`: offset plus 1-based line and column
//! - `Span`: a half-open range between two locations

mod span;

pub use span::{BytePos, Location, Span};
