//! The `pdep dialects` command.
//! `pdep dialects` 命令。

use crate::error::CliError;
use pdep_parser::Dialect;

/// List every dialect; verbose output adds the fallback chain.
/// 列出所有语言版本；详细模式下附带回退链。
pub fn run(verbose: bool) -> Result<(), CliError> {
    for dialect in Dialect::ALL {
        println!("{}", describe(dialect, verbose));
    }
    Ok(())
}

fn describe(dialect: Dialect, verbose: bool) -> String {
    let mut line = format!("{:<8} {}", dialect.name(), dialect.description());
    if verbose {
        let chain: Vec<&str> = dialect.fallback_chain().into_iter().map(Dialect::name).collect();
        line.push_str(&format!("\n         falls back to: {}", chain.join(" -> ")));
    }
    line
}
