//! Parser for PHP source.
//!
//! This crate provides a recursive descent parser that turns the token
//! stream of one PHP file into an [`Ast`]. Which constructs are accepted
//! depends on the [`Dialect`]: each dialect falls back to its predecessor
//! for anything it does not define itself.
//!
//! ## Errors
//!
//! Parsing stops at the first error. A [`ParseError`] names the file and
//! the offending token, and can be turned into a rendered diagnostic with
//! [`ParseError::to_diagnostic`].
//!
//! A [`Parser`] is single-use and owns all of its state, so independent
//! files can be parsed on separate threads without coordination.

mod config;
mod dialect;
mod error;
mod expr;
mod hooks;
mod parser;
mod stmt;

pub use config::ParserConfig;
pub use dialect::{Dialect, UnknownDialect};
pub use error::ParseError;
pub use parser::Parser;

use pdep_syntax::Ast;

/// Parse source code into an AST.
pub fn parse(source: &str, config: &ParserConfig) -> Result<Ast, ParseError> {
    Parser::new(source, config).parse()
}
