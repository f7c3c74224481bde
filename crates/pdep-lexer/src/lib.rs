//! Lexical analysis for PHP source.
//! PHP 源码词法分析模块。
//!
//! This crate turns PHP source into a stream of tokens. Inline HTML,
//! open and close tags, comments and heredocs all become tokens; only
//! whitespace inside PHP code is dropped.
//! 本 crate 将 PHP 源码转换为 token 流。

mod lexer;
mod token;
mod tokenizer;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
