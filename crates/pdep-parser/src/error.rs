//! Parse errors.

use pdep_diagnostic::{Diagnostic, ErrorCode, Label};
use pdep_lexer::{Token, TokenKind};
use pdep_common::{Location, Span};
use thiserror::Error;

/// Errors that end the parse of a file.
///
/// Both variants are terminal; no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{file}: unexpected token `{}` at {}", .token.image, .token.span.start)]
    UnexpectedToken { token: Token, file: String },

    #[error("{file}: unexpected end of input")]
    UnexpectedEndOfInput { file: String },
}

impl ParseError {
    pub fn file(&self) -> &str {
        match self {
            ParseError::UnexpectedToken { file, .. } | ParseError::UnexpectedEndOfInput { file } => {
                file
            }
        }
    }

    /// The offending token, if there was one.
    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseError::UnexpectedToken { token, .. } => Some(token),
            ParseError::UnexpectedEndOfInput { .. } => None,
        }
    }

    /// Convert the error into a diagnostic pointing into `source`.
    /// 将错误转换为指向 `source` 的诊断信息。
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        match self {
            ParseError::UnexpectedToken { token, file } => {
                let code = if token.kind != TokenKind::Unknown {
                    ErrorCode::UnexpectedToken
                } else if is_unterminated(&token.image) {
                    ErrorCode::UnterminatedLiteral
                } else {
                    ErrorCode::InvalidCharacter
                };
                Diagnostic::from_code(file.as_str(), token.span, code)
                    .with_message(format!("{}: `{}`", code.description(), token.image))
                    .with_label(Label::new(token.span, "found here"))
            }
            ParseError::UnexpectedEndOfInput { file } => {
                let span = end_of(source);
                Diagnostic::from_code(file.as_str(), span, ErrorCode::UnexpectedEndOfInput)
                    .with_label(Label::new(span, "input ends here"))
            }
        }
    }
}

fn is_unterminated(image: &str) -> bool {
    ["'", "\"", "`", "<<<", "/*"]
        .iter()
        .any(|prefix| image.starts_with(prefix))
}

/// Empty span at the last position of `source`.
fn end_of(source: &str) -> Span {
    let line = source.lines().count().max(1) as u32;
    let column = source.rsplit('\n').next().map_or(0, |l| l.chars().count()) as u32 + 1;
    let line = if source.ends_with('\n') { line + 1 } else { line };
    let column = if source.ends_with('\n') { 1 } else { column };
    let end = Location::new(source.len(), line, column);
    Span::new(end, end)
}
