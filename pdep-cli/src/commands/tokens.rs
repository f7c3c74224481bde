//! The `pdep tokens` command.
//! `pdep tokens` 命令。

use super::parse::read;
use crate::error::CliError;
use pdep_lexer::Tokenizer;
use std::fmt::Write as _;

/// Print every token of a file with its position.
/// 打印文件中的每个 token 及其位置。
pub fn run(file: &str) -> Result<(), CliError> {
    let source = read(file)?;
    print!("{}", list(&source, file));
    Ok(())
}

/// `line:column  Kind  "image"`, one token per line.
pub(crate) fn list(source: &str, file: &str) -> String {
    let mut tokenizer = Tokenizer::new(source, file);
    let mut out = String::new();
    while let Some(token) = tokenizer.next() {
        let position = format!("{:?}", token.span.start);
        let kind = format!("{:?}", token.kind);
        let _ = writeln!(out, "{position:<8} {kind:<28} {:?}", token.image);
    }
    out
}
