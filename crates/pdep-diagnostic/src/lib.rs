//! Diagnostic and error reporting for pdep.
//! pdep 的诊断和错误报告。
//!
//! This crate turns parse failures into readable reports using ariadne.
//! 本 crate 使用 ariadne 库将解析失败渲染为易读的报告。

mod codes;
mod diagnostic;

pub use codes::ErrorCode;
pub use diagnostic::{Diagnostic, Label, Severity};

use ariadne::{ColorGenerator, Config, Label as AriadneLabel, Report, ReportKind, Source};
use std::io;

fn build_report<'a>(
    diagnostic: &'a Diagnostic,
    color: bool,
) -> Report<'a, (&'a str, std::ops::Range<usize>)> {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Note => ReportKind::Advice,
    };
    let filename = diagnostic.file.as_str();

    let mut colors = ColorGenerator::new();
    let mut report = Report::build(kind, filename, diagnostic.span.start.offset.0 as usize)
        .with_config(Config::default().with_color(color))
        .with_message(&diagnostic.message);

    if let Some(code) = &diagnostic.code {
        report = report.with_code(code.as_str());
    }

    for label in &diagnostic.labels {
        let mut ariadne_label =
            AriadneLabel::new((filename, label.span.range())).with_message(&label.message);
        if color {
            ariadne_label = ariadne_label.with_color(colors.next());
        }
        report = report.with_label(ariadne_label);
    }

    for note in &diagnostic.notes {
        report = report.with_note(note);
    }

    if let Some(help) = &diagnostic.help {
        report = report.with_help(help);
    }

    report.finish()
}

/// Render a diagnostic to stderr.
/// 将诊断信息渲染到标准错误输出。
pub fn emit(source: &str, diagnostic: &Diagnostic) -> io::Result<()> {
    build_report(diagnostic, true).eprint((diagnostic.file.as_str(), Source::from(source)))
}

/// Render a diagnostic to a plain string without colors.
/// 将诊断信息渲染为不带颜色的字符串。
pub fn render(source: &str, diagnostic: &Diagnostic) -> String {
    let mut buffer = Vec::new();
    if build_report(diagnostic, false)
        .write((diagnostic.file.as_str(), Source::from(source)), &mut buffer)
        .is_err()
    {
        return diagnostic.message.clone();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
