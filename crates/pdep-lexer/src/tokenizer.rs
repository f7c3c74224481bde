//! Buffered token stream with one token of lookahead.
//! 带一个 token 前瞻的缓冲 token 流。

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// A token stream over one source buffer.
/// 单个源缓冲区上的 token 流。
///
/// `peek` never consumes; `next` hands out each token exactly once in
/// source order. Once the stream is exhausted `peek` reports
/// [`TokenKind::Eof`] and `next` returns `None`.
pub struct Tokenizer<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Token>,
    file: String,
}

impl<'src> Tokenizer<'src> {
    /// Tokenize a complete PHP file, starting in inline HTML.
    /// 对完整的 PHP 文件进行词法分析，从内联 HTML 开始。
    pub fn new(source: &'src str, file: impl Into<String>) -> Self {
        Self::from_lexer(Lexer::new(source), file)
    }

    /// Tokenize a code fragment that has no open tag.
    /// 对没有开始标签的代码片段进行词法分析。
    pub fn fragment(source: &'src str, file: impl Into<String>) -> Self {
        Self::from_lexer(Lexer::new_php(source), file)
    }

    pub fn from_lexer(lexer: Lexer<'src>, file: impl Into<String>) -> Self {
        Self {
            lexer,
            lookahead: None,
            file: file.into(),
        }
    }

    fn fill(&mut self) {
        if self.lookahead.is_none() {
            self.lookahead = self.lexer.next();
        }
    }

    /// Kind of the next token, or `Eof` when nothing is left.
    /// 下一个 token 的类型；没有剩余时返回 `Eof`。
    pub fn peek(&mut self) -> TokenKind {
        self.fill();
        self.lookahead
            .as_ref()
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    /// The next token itself, without consuming it.
    pub fn peek_token(&mut self) -> Option<&Token> {
        self.fill();
        self.lookahead.as_ref()
    }

    /// Consume and return the next token.
    /// 消耗并返回下一个 token。
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Token> {
        self.fill();
        self.lookahead.take()
    }

    /// Name of the file being tokenized.
    pub fn source_file(&self) -> &str {
        &self.file
    }
}
