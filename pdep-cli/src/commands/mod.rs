//! CLI command implementations.

pub mod dialects;
pub mod parse;
pub mod tokens;
