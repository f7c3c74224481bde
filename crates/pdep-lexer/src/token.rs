//! Token definitions for PHP source.

use pdep_common::Span;
use serde::Serialize;
use std::fmt;

/// A token with its kind, source text and span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub image: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, image: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            image: image.into(),
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` ({:?}) at {}", self.image, self.kind, self.span.start)
    }
}

/// The kind of a token.
///
/// `Eof` is never produced by the lexer; it is the value
/// [`Tokenizer::peek`](crate::Tokenizer::peek) reports once the stream is
/// exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Document structure
    InlineHtml,
    OpenTag,         // <?php  <?
    OpenTagWithEcho, // <?=
    CloseTag,        // ?>
    Comment,
    DocComment,

    // Names and literals
    String, // bare identifier
    Variable,
    Dollar,
    LNumber,
    DNumber,
    ConstantEncapsedString,
    StartHeredoc,
    EncapsedAndWhitespace,
    EndHeredoc,

    // Keywords
    Abstract,
    Array,
    As,
    Break,
    Callable,
    Case,
    Catch,
    Class,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Do,
    Echo,
    Else,
    Elseif,
    Empty,
    Enddeclare,
    Endfor,
    Endforeach,
    Endif,
    Endswitch,
    Endwhile,
    Exit,
    Extends,
    False,
    Final,
    Finally,
    For,
    Foreach,
    Function,
    Global,
    Goto,
    If,
    Implements,
    Include,
    IncludeOnce,
    Instanceof,
    Insteadof,
    Interface,
    Isset,
    List,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    Namespace,
    New,
    Null,
    Parent,
    Print,
    Private,
    Protected,
    Public,
    Require,
    RequireOnce,
    Return,
    SelfKw,
    Static,
    Switch,
    Throw,
    Trait,
    True,
    Try,
    Unset,
    Use,
    Var,
    While,
    Yield,

    // Magic constants
    ClassC,  // __CLASS__
    Dir,     // __DIR__
    File,    // __FILE__
    FuncC,   // __FUNCTION__
    Line,    // __LINE__
    MethodC, // __METHOD__
    NsC,     // __NAMESPACE__
    TraitC,  // __TRAIT__

    // Casts
    IntCast,
    DoubleCast,
    StringCast,
    BoolCast,
    ArrayCast,
    ObjectCast,
    UnsetCast,

    // Delimiters
    ParenthesisOpen,     // (
    ParenthesisClose,    // )
    SquaredBracketOpen,  // [
    SquaredBracketClose, // ]
    CurlyBraceOpen,      // {
    CurlyBraceClose,     // }

    // Punctuation
    Semicolon,      // ;
    Comma,          // ,
    Colon,          // :
    DoubleColon,    // ::
    Backslash,      // \
    ObjectOperator, // ->
    DoubleArrow,    // =>
    QuestionMark,   // ?
    Ellipsis,       // ...
    At,             // @

    // Assignment operators
    Equal,       // =
    PlusEqual,   // +=
    MinusEqual,  // -=
    MulEqual,    // *=
    DivEqual,    // /=
    ConcatEqual, // .=
    ModEqual,    // %=
    AndEqual,    // &=
    OrEqual,     // |=
    XorEqual,    // ^=
    SlEqual,     // <<=
    SrEqual,     // >>=
    PowEqual,    // **=

    // Binary and unary operators
    Coalesce,           // ??
    BooleanOr,          // ||
    BooleanAnd,         // &&
    BitwiseOr,          // |
    BitwiseXor,         // ^
    BitwiseAnd,         // &
    BitwiseNot,         // ~
    BooleanNot,         // !
    IsEqual,            // ==
    IsNotEqual,         // != <>
    IsIdentical,        // ===
    IsNotIdentical,     // !==
    Spaceship,          // <=>
    IsSmaller,          // <
    IsSmallerOrEqual,   // <=
    IsGreater,          // >
    IsGreaterOrEqual,   // >=
    Sl,                 // <<
    Sr,                 // >>
    Plus,               // +
    Minus,              // -
    Mul,                // *
    Div,                // /
    Mod,                // %
    Pow,                // **
    Concat,             // .
    Inc,                // ++
    Dec,                // --

    // Special
    Unknown,
    Eof,
}

impl TokenKind {
    /// Returns the keyword or magic constant for a word, if any.
    ///
    /// PHP keywords are case-insensitive, so `word` is compared lowercased.
    pub fn keyword_from_str(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "abstract" => TokenKind::Abstract,
            "and" => TokenKind::LogicalAnd,
            "array" => TokenKind::Array,
            "as" => TokenKind::As,
            "break" => TokenKind::Break,
            "callable" => TokenKind::Callable,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "class" => TokenKind::Class,
            "clone" => TokenKind::Clone,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "declare" => TokenKind::Declare,
            "default" => TokenKind::Default,
            "die" | "exit" => TokenKind::Exit,
            "do" => TokenKind::Do,
            "echo" => TokenKind::Echo,
            "else" => TokenKind::Else,
            "elseif" => TokenKind::Elseif,
            "empty" => TokenKind::Empty,
            "enddeclare" => TokenKind::Enddeclare,
            "endfor" => TokenKind::Endfor,
            "endforeach" => TokenKind::Endforeach,
            "endif" => TokenKind::Endif,
            "endswitch" => TokenKind::Endswitch,
            "endwhile" => TokenKind::Endwhile,
            "extends" => TokenKind::Extends,
            "false" => TokenKind::False,
            "final" => TokenKind::Final,
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "foreach" => TokenKind::Foreach,
            "function" => TokenKind::Function,
            "global" => TokenKind::Global,
            "goto" => TokenKind::Goto,
            "if" => TokenKind::If,
            "implements" => TokenKind::Implements,
            "include" => TokenKind::Include,
            "include_once" => TokenKind::IncludeOnce,
            "instanceof" => TokenKind::Instanceof,
            "insteadof" => TokenKind::Insteadof,
            "interface" => TokenKind::Interface,
            "isset" => TokenKind::Isset,
            "list" => TokenKind::List,
            "namespace" => TokenKind::Namespace,
            "new" => TokenKind::New,
            "null" => TokenKind::Null,
            "or" => TokenKind::LogicalOr,
            "parent" => TokenKind::Parent,
            "print" => TokenKind::Print,
            "private" => TokenKind::Private,
            "protected" => TokenKind::Protected,
            "public" => TokenKind::Public,
            "require" => TokenKind::Require,
            "require_once" => TokenKind::RequireOnce,
            "return" => TokenKind::Return,
            "self" => TokenKind::SelfKw,
            "static" => TokenKind::Static,
            "switch" => TokenKind::Switch,
            "throw" => TokenKind::Throw,
            "trait" => TokenKind::Trait,
            "true" => TokenKind::True,
            "try" => TokenKind::Try,
            "unset" => TokenKind::Unset,
            "use" => TokenKind::Use,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            "xor" => TokenKind::LogicalXor,
            "yield" => TokenKind::Yield,
            "__class__" => TokenKind::ClassC,
            "__dir__" => TokenKind::Dir,
            "__file__" => TokenKind::File,
            "__function__" => TokenKind::FuncC,
            "__line__" => TokenKind::Line,
            "__method__" => TokenKind::MethodC,
            "__namespace__" => TokenKind::NsC,
            "__trait__" => TokenKind::TraitC,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the cast token for the word between `(` and `)`, if any.
    pub fn cast_from_str(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "int" | "integer" => TokenKind::IntCast,
            "bool" | "boolean" => TokenKind::BoolCast,
            "float" | "double" | "real" => TokenKind::DoubleCast,
            "string" | "binary" => TokenKind::StringCast,
            "array" => TokenKind::ArrayCast,
            "object" => TokenKind::ObjectCast,
            "unset" => TokenKind::UnsetCast,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true for every keyword and magic constant.
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            TokenKind::Abstract
                | TokenKind::Array
                | TokenKind::As
                | TokenKind::Break
                | TokenKind::Callable
                | TokenKind::Case
                | TokenKind::Catch
                | TokenKind::Class
                | TokenKind::Clone
                | TokenKind::Const
                | TokenKind::Continue
                | TokenKind::Declare
                | TokenKind::Default
                | TokenKind::Do
                | TokenKind::Echo
                | TokenKind::Else
                | TokenKind::Elseif
                | TokenKind::Empty
                | TokenKind::Enddeclare
                | TokenKind::Endfor
                | TokenKind::Endforeach
                | TokenKind::Endif
                | TokenKind::Endswitch
                | TokenKind::Endwhile
                | TokenKind::Exit
                | TokenKind::Extends
                | TokenKind::False
                | TokenKind::Final
                | TokenKind::Finally
                | TokenKind::For
                | TokenKind::Foreach
                | TokenKind::Function
                | TokenKind::Global
                | TokenKind::Goto
                | TokenKind::If
                | TokenKind::Implements
                | TokenKind::Include
                | TokenKind::IncludeOnce
                | TokenKind::Instanceof
                | TokenKind::Insteadof
                | TokenKind::Interface
                | TokenKind::Isset
                | TokenKind::List
                | TokenKind::LogicalAnd
                | TokenKind::LogicalOr
                | TokenKind::LogicalXor
                | TokenKind::Namespace
                | TokenKind::New
                | TokenKind::Null
                | TokenKind::Parent
                | TokenKind::Print
                | TokenKind::Private
                | TokenKind::Protected
                | TokenKind::Public
                | TokenKind::Require
                | TokenKind::RequireOnce
                | TokenKind::Return
                | TokenKind::SelfKw
                | TokenKind::Static
                | TokenKind::Switch
                | TokenKind::Throw
                | TokenKind::Trait
                | TokenKind::True
                | TokenKind::Try
                | TokenKind::Unset
                | TokenKind::Use
                | TokenKind::Var
                | TokenKind::While
                | TokenKind::Yield
                | TokenKind::ClassC
                | TokenKind::Dir
                | TokenKind::File
                | TokenKind::FuncC
                | TokenKind::Line
                | TokenKind::MethodC
                | TokenKind::NsC
                | TokenKind::TraitC
        )
    }

    /// Returns true for tokens spelled as a word: identifiers and reserved words.
    pub fn is_word(&self) -> bool {
        *self == TokenKind::String || self.is_reserved_word()
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::DocComment)
    }

    pub fn is_cast(&self) -> bool {
        matches!(
            self,
            TokenKind::IntCast
                | TokenKind::DoubleCast
                | TokenKind::StringCast
                | TokenKind::BoolCast
                | TokenKind::ArrayCast
                | TokenKind::ObjectCast
                | TokenKind::UnsetCast
        )
    }

    pub fn is_magic_constant(&self) -> bool {
        matches!(
            self,
            TokenKind::ClassC
                | TokenKind::Dir
                | TokenKind::File
                | TokenKind::FuncC
                | TokenKind::Line
                | TokenKind::MethodC
                | TokenKind::NsC
                | TokenKind::TraitC
        )
    }

    pub fn is_assignment_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::PlusEqual
                | TokenKind::MinusEqual
                | TokenKind::MulEqual
                | TokenKind::DivEqual
                | TokenKind::ConcatEqual
                | TokenKind::ModEqual
                | TokenKind::AndEqual
                | TokenKind::OrEqual
                | TokenKind::XorEqual
                | TokenKind::SlEqual
                | TokenKind::SrEqual
                | TokenKind::PowEqual
        )
    }
}
