//! The `pdep parse` command.
//! `pdep parse` 命令。

use crate::Format;
use crate::error::CliError;
use crate::output;
use pdep_diagnostic::emit;
use pdep_parser::{Dialect, ParseError, ParserConfig, parse};
use pdep_syntax::{Ast, NodeId, NodeKind};
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::fs;

/// Settings shared by every file of one invocation.
pub struct Options {
    pub dialect: Dialect,
    pub format: Format,
    pub verbose: bool,
    pub quiet: bool,
}

/// Parse each file and print its tree; keeps going after a failure.
/// 解析每个文件并打印语法树；某个文件失败后继续处理其余文件。
pub fn run(files: &[String], options: &Options) -> Result<(), CliError> {
    let mut failed = 0;
    for file in files {
        let source = match read(file) {
            Ok(source) => source,
            Err(error) => {
                failed += 1;
                if !options.quiet {
                    output::error(&error.to_string());
                }
                continue;
            }
        };
        let config = ParserConfig::new().dialect(options.dialect).file(file.as_str());

        match parse(&source, &config) {
            Ok(ast) => {
                if options.verbose {
                    output::info(&format!(
                        "{file}: {} nodes ({})",
                        ast.len(),
                        options.dialect.description()
                    ));
                }
                if !has_code(&ast) && !options.quiet {
                    output::warning(&format!("{file}: no PHP code found"));
                }
                print!("{}", render(&ast, options.format)?);
            }
            Err(error) => {
                failed += 1;
                if !options.quiet {
                    report(&source, &error)?;
                }
            }
        }
    }

    if failed > 0 {
        return Err(CliError::ParseFailed {
            failed,
            total: files.len(),
        });
    }
    if options.verbose {
        output::success(&format!("OK - {} file(s) parsed", files.len()));
    }
    Ok(())
}

pub(crate) fn read(file: &str) -> Result<String, CliError> {
    fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_string(),
        source,
    })
}

fn report(source: &str, error: &ParseError) -> Result<(), CliError> {
    emit(source, &error.to_diagnostic(source))?;
    Ok(())
}

/// Whether the tree holds anything besides inline HTML.
fn has_code(ast: &Ast) -> bool {
    ast.children(ast.root())
        .iter()
        .any(|&id| ast.node(id).kind() != NodeKind::InlineHtml)
}

fn render(ast: &Ast, format: Format) -> Result<String, CliError> {
    match format {
        Format::Tree => Ok(render_tree(ast)),
        Format::Json => {
            let mut text = serde_json::to_string_pretty(&to_json(ast, ast.root()))?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// One line per node, children indented below their parent.
/// 每个节点一行，子节点缩进在父节点之下。
pub(crate) fn render_tree(ast: &Ast) -> String {
    let mut out = String::new();
    let mut stack = vec![(ast.root(), 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let node = ast.node(id);
        let span = node.span();
        let _ = write!(
            out,
            "{:indent$}{:?} [{:?}-{:?}]",
            "",
            node.kind(),
            span.start,
            span.end,
            indent = depth * 2
        );
        if !node.image().is_empty() {
            let _ = write!(out, " {:?}", node.image());
        }
        if !node.modifiers().is_empty() {
            let _ = write!(out, " {}", node.modifiers().names().join(" "));
        }
        out.push('\n');
        stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

pub(crate) fn to_json(ast: &Ast, id: NodeId) -> Value {
    let node = ast.node(id);
    let span = node.span();
    let children: Vec<Value> = node.children().iter().map(|&child| to_json(ast, child)).collect();
    json!({
        "kind": format!("{:?}", node.kind()),
        "image": node.image(),
        "span": {
            "start": { "line": span.start.line, "column": span.start.column },
            "end": { "line": span.end.line, "column": span.end.column },
        },
        "modifiers": node.modifiers().names(),
        "comment": node.comment(),
        "children": children,
    })
}
