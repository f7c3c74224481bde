//! Error codes for pdep diagnostics.

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexical problems surfaced through the parser (E0001 - E0099)
    InvalidCharacter,
    UnterminatedLiteral,

    // Parser errors (E0100 - E0199)
    UnexpectedToken,
    UnexpectedEndOfInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCharacter => "E0001",
            ErrorCode::UnterminatedLiteral => "E0002",
            ErrorCode::UnexpectedToken => "E0100",
            ErrorCode::UnexpectedEndOfInput => "E0101",
        }
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCharacter => "invalid character in source",
            ErrorCode::UnterminatedLiteral => "string, comment or heredoc is not terminated",
            ErrorCode::UnexpectedToken => "unexpected token",
            ErrorCode::UnexpectedEndOfInput => "unexpected end of input",
        }
    }

    /// Get a suggested fix for the error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::UnterminatedLiteral => {
                Some("close the quote, `*/` or heredoc label that starts here")
            }
            ErrorCode::UnexpectedEndOfInput => {
                Some("the file ends inside a construct; check for a missing `;`, `)` or `}`")
            }
            ErrorCode::UnexpectedToken => {
                Some("the construct may not exist in the selected dialect; try `--dialect generic`")
            }
            ErrorCode::InvalidCharacter => None,
        }
    }
}
