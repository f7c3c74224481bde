//! The PHP lexer.
//! PHP 词法分析器。

use crate::token::{Token, TokenKind};
use pdep_common::{Location, Span};
use std::collections::VecDeque;

/// Mode for lexer state machine.
/// 词法分析器状态机的模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerMode {
    /// Outside `<?php ... ?>` - PHP 标签之外
    InlineHtml,
    /// Inside PHP code - PHP 代码内部
    Php,
}

/// The PHP lexer.
/// PHP 词法分析器。
///
/// Tokens are produced lazily through the [`Iterator`] implementation.
/// Whitespace is skipped; comments are kept as tokens. The lexer never
/// fails: anything it cannot classify becomes a single
/// [`TokenKind::Unknown`] token.
/// 按需产生 token；空白被跳过，注释保留为 token。
pub struct Lexer<'src> {
    source: &'src str,
    /// Current byte position in source
    /// 当前在源码中的字节位置
    pos: usize,
    line: u32,
    column: u32,
    mode: LexerMode,
    /// Tokens already scanned but not yet handed out (heredoc pieces, open tags)
    /// 已扫描但尚未交出的 token（heredoc 片段、开始标签）
    pending: VecDeque<Token>,
    /// The previous significant token was `->`
    /// 上一个有效 token 是 `->`
    after_object_operator: bool,
}

impl<'src> Lexer<'src> {
    /// Create a lexer for a complete file, starting in inline HTML.
    /// 为完整文件创建词法分析器，从内联 HTML 开始。
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            mode: LexerMode::InlineHtml,
            pending: VecDeque::new(),
            after_object_operator: false,
        }
    }

    /// Create a lexer for a code fragment that has no `<?php` open tag.
    /// 为没有 `<?php` 开始标签的代码片段创建词法分析器。
    pub fn new_php(source: &'src str) -> Self {
        Self {
            mode: LexerMode::Php,
            ..Self::new(source)
        }
    }

    /// Tokenize the entire source.
    /// 对整个源代码进行词法分析。
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    fn location(&self) -> Location {
        Location::new(self.pos, self.line, self.column)
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn starts_with_ignore_case(&self, prefix: &str) -> bool {
        self.rest()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    /// Advance to the next character, keeping line and column current.
    /// 前进到下一个字符，同时维护行号和列号。
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Advance over `len` bytes of source.
    /// 前进 `len` 个字节。
    fn advance_bytes(&mut self, len: usize) {
        let target = self.pos + len;
        while self.pos < target {
            if self.advance().is_none() {
                break;
            }
        }
    }

    fn token_from(&self, kind: TokenKind, start: Location) -> Token {
        let image = &self.source[usize::from(start.offset)..self.pos];
        Token::new(kind, image, Span::new(start, self.location()))
    }

    /// Try each operator spelling in order and consume the first match.
    /// 依次尝试每个运算符写法，消耗第一个匹配项。
    fn operator(&mut self, candidates: &[(&str, TokenKind)]) -> TokenKind {
        for (spelling, kind) in candidates {
            if self.starts_with(spelling) {
                self.advance_bytes(spelling.len());
                return *kind;
            }
        }
        self.advance();
        TokenKind::Unknown
    }

    /// Scan inline HTML up to the next open tag.
    /// 扫描内联 HTML 直到下一个开始标签。
    fn inline_html(&mut self) -> Option<Token> {
        let start = self.location();
        while !self.at_end() && !self.starts_with("<?") {
            self.advance();
        }

        let html = (self.pos > usize::from(start.offset))
            .then(|| self.token_from(TokenKind::InlineHtml, start));

        let tag = if self.at_end() {
            None
        } else {
            Some(self.open_tag())
        };

        match (html, tag) {
            (Some(html), Some(tag)) => {
                self.pending.push_back(tag);
                Some(html)
            }
            (html, tag) => html.or(tag),
        }
    }

    fn open_tag(&mut self) -> Token {
        let start = self.location();
        let kind = if self.starts_with_ignore_case("<?php")
            && self.peek_nth(5).is_none_or(|c| c.is_ascii_whitespace())
        {
            self.advance_bytes(5);
            if self.starts_with("\r\n") {
                self.advance_bytes(2);
            } else if self.peek_char().is_some_and(|c| c.is_ascii_whitespace()) {
                self.advance();
            }
            TokenKind::OpenTag
        } else if self.starts_with("<?=") {
            self.advance_bytes(3);
            TokenKind::OpenTagWithEcho
        } else {
            self.advance_bytes(2);
            TokenKind::OpenTag
        };
        self.mode = LexerMode::Php;
        self.token_from(kind, start)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_whitespace()) {
            self.advance();
        }
    }

    /// Scan one token in PHP mode.
    /// 在 PHP 模式下扫描一个 token。
    fn php_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let start = self.location();
        let ch = self.peek_char()?;

        if ch == '<' && self.starts_with("<<<") {
            if let Some(token) = self.heredoc(start) {
                self.after_object_operator = false;
                return Some(token);
            }
        }

        let kind = match ch {
            '(' => self.cast_or_parenthesis(),
            ')' => self.single(TokenKind::ParenthesisClose),
            '[' => self.single(TokenKind::SquaredBracketOpen),
            ']' => self.single(TokenKind::SquaredBracketClose),
            '{' => self.single(TokenKind::CurlyBraceOpen),
            '}' => self.single(TokenKind::CurlyBraceClose),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '@' => self.single(TokenKind::At),
            '~' => self.single(TokenKind::BitwiseNot),
            '\\' => self.single(TokenKind::Backslash),
            ':' => self.operator(&[("::", TokenKind::DoubleColon), (":", TokenKind::Colon)]),
            '?' => {
                if self.starts_with("?>") {
                    self.close_tag()
                } else {
                    self.operator(&[("??", TokenKind::Coalesce), ("?", TokenKind::QuestionMark)])
                }
            }
            '$' => self.variable(),
            '#' => self.line_comment(),
            '/' => {
                if self.starts_with("//") {
                    self.line_comment()
                } else if self.starts_with("/*") {
                    self.block_comment()
                } else {
                    self.operator(&[("/=", TokenKind::DivEqual), ("/", TokenKind::Div)])
                }
            }
            '"' | '\'' | '`' => self.quoted_string(ch),
            '<' => self.operator(&[
                ("<<=", TokenKind::SlEqual),
                ("<=>", TokenKind::Spaceship),
                ("<<", TokenKind::Sl),
                ("<=", TokenKind::IsSmallerOrEqual),
                ("<>", TokenKind::IsNotEqual),
                ("<", TokenKind::IsSmaller),
            ]),
            '>' => self.operator(&[
                (">>=", TokenKind::SrEqual),
                (">>", TokenKind::Sr),
                (">=", TokenKind::IsGreaterOrEqual),
                (">", TokenKind::IsGreater),
            ]),
            '=' => self.operator(&[
                ("===", TokenKind::IsIdentical),
                ("==", TokenKind::IsEqual),
                ("=>", TokenKind::DoubleArrow),
                ("=", TokenKind::Equal),
            ]),
            '!' => self.operator(&[
                ("!==", TokenKind::IsNotIdentical),
                ("!=", TokenKind::IsNotEqual),
                ("!", TokenKind::BooleanNot),
            ]),
            '+' => self.operator(&[
                ("++", TokenKind::Inc),
                ("+=", TokenKind::PlusEqual),
                ("+", TokenKind::Plus),
            ]),
            '-' => self.operator(&[
                ("--", TokenKind::Dec),
                ("-=", TokenKind::MinusEqual),
                ("->", TokenKind::ObjectOperator),
                ("-", TokenKind::Minus),
            ]),
            '*' => self.operator(&[
                ("**=", TokenKind::PowEqual),
                ("**", TokenKind::Pow),
                ("*=", TokenKind::MulEqual),
                ("*", TokenKind::Mul),
            ]),
            '%' => self.operator(&[("%=", TokenKind::ModEqual), ("%", TokenKind::Mod)]),
            '&' => self.operator(&[
                ("&&", TokenKind::BooleanAnd),
                ("&=", TokenKind::AndEqual),
                ("&", TokenKind::BitwiseAnd),
            ]),
            '|' => self.operator(&[
                ("||", TokenKind::BooleanOr),
                ("|=", TokenKind::OrEqual),
                ("|", TokenKind::BitwiseOr),
            ]),
            '^' => self.operator(&[("^=", TokenKind::XorEqual), ("^", TokenKind::BitwiseXor)]),
            '.' => {
                if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.number()
                } else {
                    self.operator(&[
                        ("...", TokenKind::Ellipsis),
                        (".=", TokenKind::ConcatEqual),
                        (".", TokenKind::Concat),
                    ])
                }
            }
            '0'..='9' => self.number(),
            c if is_ident_start(c) => self.word(),
            _ => self.single(TokenKind::Unknown),
        };

        let token = self.token_from(kind, start);
        if !kind.is_comment() {
            self.after_object_operator = kind == TokenKind::ObjectOperator;
        }
        Some(token)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// `?>` also swallows one directly following newline.
    fn close_tag(&mut self) -> TokenKind {
        self.advance_bytes(2);
        if self.starts_with("\r\n") {
            self.advance_bytes(2);
        } else if self.starts_with("\n") {
            self.advance();
        }
        self.mode = LexerMode::InlineHtml;
        TokenKind::CloseTag
    }

    /// `(int)`, `( string )` and friends, otherwise a plain `(`.
    /// 类型转换 `(int)` 等，否则为普通的 `(`。
    fn cast_or_parenthesis(&mut self) -> TokenKind {
        let rest = self.rest();
        let is_blank = |c: char| c == ' ' || c == '\t';
        let inner = rest[1..].trim_start_matches(is_blank);
        let word_len = inner
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(inner.len());
        let word = &inner[..word_len];
        let after = inner[word_len..].trim_start_matches(is_blank);

        if !word.is_empty() && after.starts_with(')') {
            if let Some(kind) = TokenKind::cast_from_str(word) {
                let len = rest.len() - after.len() + 1;
                self.advance_bytes(len);
                return kind;
            }
        }
        self.single(TokenKind::ParenthesisOpen)
    }

    fn variable(&mut self) -> TokenKind {
        self.advance(); // $
        if self.peek_char().is_some_and(is_ident_start) {
            while self.peek_char().is_some_and(is_ident_char) {
                self.advance();
            }
            TokenKind::Variable
        } else {
            TokenKind::Dollar
        }
    }

    /// Skip a `//` or `#` comment; it ends before a newline or `?>`.
    /// 跳过 `//` 或 `#` 注释；在换行或 `?>` 之前结束。
    fn line_comment(&mut self) -> TokenKind {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' || self.starts_with("?>") {
                break;
            }
            self.advance();
        }
        TokenKind::Comment
    }

    fn block_comment(&mut self) -> TokenKind {
        let is_doc = self.starts_with("/**") && !self.starts_with("/**/");
        self.advance_bytes(2);
        loop {
            if self.starts_with("*/") {
                self.advance_bytes(2);
                break;
            }
            if self.advance().is_none() {
                return TokenKind::Unknown;
            }
        }
        if is_doc {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        }
    }

    fn quoted_string(&mut self, quote: char) -> TokenKind {
        self.advance();
        loop {
            match self.advance() {
                None => return TokenKind::Unknown,
                Some('\\') => {
                    if self.advance().is_none() {
                        return TokenKind::Unknown;
                    }
                }
                Some(ch) if ch == quote => return TokenKind::ConstantEncapsedString,
                Some('{') if quote != '\'' && self.peek_char() == Some('$') => {
                    if !self.interpolation() {
                        return TokenKind::Unknown;
                    }
                }
                Some('$') if quote != '\'' && self.peek_char() == Some('{') => {
                    self.advance();
                    if !self.interpolation() {
                        return TokenKind::Unknown;
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Skip a `{$...}` or `${...}` interpolation whose opening brace is
    /// already consumed. Quotes inside it open nested strings.
    /// 跳过字符串中的 `{$...}` 插值，内部引号开启嵌套字符串。
    fn interpolation(&mut self) -> bool {
        let mut depth = 1usize;
        loop {
            match self.peek_char() {
                None => return false,
                Some(quote @ ('\'' | '"' | '`')) => {
                    if self.quoted_string(quote) == TokenKind::Unknown {
                        return false;
                    }
                }
                Some(ch) => {
                    self.advance();
                    match ch {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                return true;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Parse a number literal (integer or float).
    /// 解析数字字面量（整数或浮点数）。
    fn number(&mut self) -> TokenKind {
        let radix_digits: Option<fn(char) -> bool> = if self.starts_with_ignore_case("0x") {
            Some(|c: char| c.is_ascii_hexdigit())
        } else if self.starts_with_ignore_case("0b") {
            Some(|c: char| c == '0' || c == '1')
        } else {
            None
        };

        if let Some(is_digit) = radix_digits {
            if self.peek_nth(2).is_some_and(is_digit) {
                self.advance_bytes(2);
                while self.peek_char().is_some_and(|c| is_digit(c) || c == '_') {
                    self.advance();
                }
                return TokenKind::LNumber;
            }
        }

        let mut is_float = false;
        self.digits();

        // Decimal part - 小数部分
        if self.peek_char() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.digits();
            is_float = true;
        }

        // Exponent - 指数部分
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.advance_bytes(digit_at);
                self.digits();
                is_float = true;
            }
        }

        if is_float {
            TokenKind::DNumber
        } else {
            TokenKind::LNumber
        }
    }

    fn digits(&mut self) {
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_digit() || c == '_')
        {
            self.advance();
        }
    }

    /// Parse an identifier or keyword.
    /// 解析标识符或关键字。
    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek_char().is_some_and(is_ident_char) {
            self.advance();
        }
        if self.after_object_operator {
            return TokenKind::String;
        }
        TokenKind::keyword_from_str(&self.source[start..self.pos]).unwrap_or(TokenKind::String)
    }

    /// Scan a heredoc or nowdoc into start, body and end tokens.
    /// 将 heredoc 或 nowdoc 扫描为开始、正文和结束三个 token。
    ///
    /// Returns `None` when the text after `<<<` is not a valid header, in
    /// which case the caller lexes `<<` as an operator.
    fn heredoc(&mut self, start: Location) -> Option<Token> {
        let (header_len, label) = heredoc_header(self.rest())?;
        let body = &self.rest()[header_len..];

        let Some(closing_at) = find_heredoc_terminator(body, &label) else {
            // Unterminated heredoc - 未终止的 heredoc
            self.advance_bytes(self.rest().len());
            return Some(self.token_from(TokenKind::Unknown, start));
        };

        let mut body_len = closing_at.saturating_sub(1);
        if body[..body_len].ends_with('\r') {
            body_len -= 1;
        }
        let closing_line = &body[closing_at..];
        let indent_len = closing_line.len()
            - closing_line
                .trim_start_matches(|c: char| c == ' ' || c == '\t')
                .len();

        self.advance_bytes(header_len);
        let head = self.token_from(TokenKind::StartHeredoc, start);

        if body_len > 0 {
            let body_start = self.location();
            self.advance_bytes(body_len);
            let token = self.token_from(TokenKind::EncapsedAndWhitespace, body_start);
            self.pending.push_back(token);
        }

        self.advance_bytes(closing_at - body_len + indent_len);
        let label_start = self.location();
        self.advance_bytes(label.len());
        let tail = self.token_from(TokenKind::EndHeredoc, label_start);
        self.pending.push_back(tail);

        Some(head)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.at_end() {
            return None;
        }
        match self.mode {
            LexerMode::InlineHtml => self.inline_html(),
            LexerMode::Php => self.php_token(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Parse `<<<ID\n`, `<<<"ID"\n` or `<<<'ID'\n`, returning the header
/// length in bytes (newline included) and the label.
fn heredoc_header(text: &str) -> Option<(usize, String)> {
    let after = text.strip_prefix("<<<")?;
    let after = after.trim_start_matches(|c: char| c == ' ' || c == '\t');
    let quote = after.chars().next().filter(|c| *c == '\'' || *c == '"');
    let label_src = match quote {
        Some(_) => &after[1..],
        None => after,
    };

    if !label_src.chars().next().is_some_and(is_ident_start) {
        return None;
    }
    let label_len = label_src
        .find(|c: char| !is_ident_char(c))
        .unwrap_or(label_src.len());
    let label = &label_src[..label_len];

    let mut tail = &label_src[label_len..];
    if let Some(q) = quote {
        tail = tail.strip_prefix(q)?;
    }
    let newline_len = if tail.starts_with("\r\n") {
        2
    } else if tail.starts_with('\n') {
        1
    } else {
        return None;
    };

    let header_len = text.len() - tail.len() + newline_len;
    Some((header_len, label.to_string()))
}

/// Byte offset (within `body`) of the line holding the closing label.
fn find_heredoc_terminator(body: &str, label: &str) -> Option<usize> {
    let mut offset = 0;
    loop {
        let line = &body[offset..];
        let candidate = line.trim_start_matches(|c: char| c == ' ' || c == '\t');
        if let Some(after) = candidate.strip_prefix(label) {
            if !after.chars().next().is_some_and(is_ident_char) {
                return Some(offset);
            }
        }
        offset += line.find('\n')? + 1;
    }
}
