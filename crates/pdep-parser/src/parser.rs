//! The PHP parser.
//! PHP 解析器。

use crate::{Dialect, ParseError, ParserConfig};
use pdep_common::Span;
use pdep_lexer::{Token, TokenKind, Tokenizer};
use pdep_syntax::{Ast, AstBuilder, NodeId, NodeKind};

/// Recursive descent parser over one source buffer.
/// 单个源缓冲区上的递归下降解析器。
///
/// The parser looks at most one significant token ahead. Comment tokens are
/// moved into a pending buffer whenever it peeks, so grammar code never
/// sees them; declarations pick their doc comment out of that buffer.
pub struct Parser<'src> {
    pub(crate) tokenizer: Tokenizer<'src>,
    pub(crate) builder: AstBuilder,
    pub(crate) dialect: Dialect,
    /// Comments seen since the last statement ended
    /// 自上一条语句结束以来遇到的注释
    comments: Vec<Token>,
    /// Span of the last consumed token
    /// 最后一个被消耗的 token 的范围
    pub(crate) last: Span,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, config: &ParserConfig) -> Self {
        Self::with_tokenizer(Tokenizer::new(source, config.file.clone()), config.dialect)
    }

    pub fn with_tokenizer(tokenizer: Tokenizer<'src>, dialect: Dialect) -> Self {
        Self {
            tokenizer,
            builder: AstBuilder::new(),
            dialect,
            comments: Vec::new(),
            last: Span::DUMMY,
        }
    }

    /// Parse the whole buffer into a tree rooted at a compilation unit.
    /// 将整个缓冲区解析为以编译单元为根的语法树。
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        let mut children = Vec::new();
        while self.peek_statement()? != TokenKind::Eof {
            children.push(self.parse_statement()?);
        }
        let file = self.tokenizer.source_file().to_string();
        let root = self.node(NodeKind::CompilationUnit, file, Span::DUMMY, children);
        Ok(self.builder.finish(root))
    }

    // ========== Token Helpers ==========

    /// Kind of the next significant token; comments go to the buffer.
    pub(crate) fn peek(&mut self) -> TokenKind {
        loop {
            let kind = self.tokenizer.peek();
            if !kind.is_comment() {
                return kind;
            }
            if let Some(comment) = self.tokenizer.next() {
                self.comments.push(comment);
            }
        }
    }

    /// Span of the next significant token, or of the last one at the end.
    pub(crate) fn peek_span(&mut self) -> Span {
        self.peek();
        self.tokenizer
            .peek_token()
            .map_or(self.last, |token| token.span)
    }

    /// Consume the next significant token.
    pub(crate) fn next(&mut self) -> Result<Token, ParseError> {
        self.peek();
        match self.tokenizer.next() {
            Some(token) => {
                self.last = token.span;
                Ok(token)
            }
            None => Err(self.end_of_input()),
        }
    }

    /// Consume a token of the given kind or fail naming what was found.
    /// 消耗指定类型的 token，否则报告实际遇到的 token。
    pub(crate) fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.next()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected_token(token))
        }
    }

    /// Consume the next token only if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek() == kind {
            self.next().ok()
        } else {
            None
        }
    }

    /// Consume the next token and report it as unexpected.
    /// 消耗下一个 token 并将其报告为意外 token。
    pub(crate) fn unexpected(&mut self) -> ParseError {
        match self.next() {
            Ok(token) => self.unexpected_token(token),
            Err(error) => error,
        }
    }

    pub(crate) fn unexpected_token(&self, token: Token) -> ParseError {
        ParseError::UnexpectedToken {
            token,
            file: self.tokenizer.source_file().to_string(),
        }
    }

    fn end_of_input(&self) -> ParseError {
        ParseError::UnexpectedEndOfInput {
            file: self.tokenizer.source_file().to_string(),
        }
    }

    /// Take a raw token straight from the tokenizer, bypassing the comment
    /// buffer and any validation.
    pub(crate) fn skip_raw_token(&mut self) {
        self.tokenizer.next();
    }

    /// The last doc comment seen, clearing the buffer.
    /// 最后一个文档注释，同时清空缓冲区。
    pub(crate) fn take_doc_comment(&mut self) -> Option<String> {
        let comment = self
            .comments
            .iter()
            .rev()
            .find(|token| token.kind == TokenKind::DocComment)
            .map(|token| token.image.clone());
        self.comments.clear();
        comment
    }

    pub(crate) fn discard_comments(&mut self) {
        self.comments.clear();
    }

    // ========== Node Helpers ==========

    /// Build a node running from `first` to the last consumed token.
    pub(crate) fn node(
        &mut self,
        kind: NodeKind,
        image: impl Into<String>,
        first: Span,
        children: Vec<NodeId>,
    ) -> NodeId {
        self.builder.build(kind, image, first, self.last, children)
    }

    pub(crate) fn leaf(&mut self, kind: NodeKind, token: &Token) -> NodeId {
        self.builder.leaf(kind, token.image.as_str(), token.span)
    }

    /// Parse `item`s separated by commas until `close`, which is not consumed.
    /// A trailing comma is accepted.
    pub(crate) fn parse_comma_list<F>(
        &mut self,
        close: TokenKind,
        mut item: F,
    ) -> Result<Vec<NodeId>, ParseError>
    where
        F: FnMut(&mut Self) -> Result<NodeId, ParseError>,
    {
        let mut items = Vec::new();
        while self.peek() != close {
            items.push(item(self)?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        Ok(items)
    }
}
