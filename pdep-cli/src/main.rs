//! pdep CLI - parse PHP files into syntax trees.
//! pdep CLI - 将 PHP 文件解析为语法树。

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use pdep_parser::Dialect;

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "pdep")]
#[command(author, version, about = "pdep - a dialect-aware PHP parser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output. / 抑制输出。
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Parse files and print their syntax trees. / 解析文件并打印语法树。
    Parse {
        /// Files to parse. / 要解析的文件。
        #[arg(required = true)]
        files: Vec<String>,

        /// Language generation (5.2 .. 7.0, generic). / 语言版本。
        #[arg(long, short, default_value_t = Dialect::Generic)]
        dialect: Dialect,

        /// Output format. / 输出格式。
        #[arg(long, short, value_enum, default_value_t = Format::Tree)]
        format: Format,
    },

    /// Print the token stream of a file. / 打印文件的 token 流。
    Tokens {
        /// The file to tokenize. / 要进行词法分析的文件。
        file: String,
    },

    /// List supported dialects. / 列出支持的语言版本。
    Dialects,
}

/// Syntax tree output format.
/// 语法树输出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Indented outline. / 缩进大纲。
    Tree,
    /// Nested JSON objects. / 嵌套的 JSON 对象。
    Json,
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            files,
            dialect,
            format,
        } => {
            let options = commands::parse::Options {
                dialect,
                format,
                verbose: cli.verbose,
                quiet: cli.quiet,
            };
            commands::parse::run(&files, &options)
        }
        Commands::Tokens { file } => commands::tokens::run(&file),
        Commands::Dialects => commands::dialects::run(cli.verbose),
    };

    if let Err(e) = result {
        if !cli.quiet {
            output::error(&e.to_string());
        }
        std::process::exit(1);
    }
}
