//! Statements and declarations.
//! 语句和声明。

use crate::{Dialect, ParseError, Parser};
use pdep_common::Span;
use pdep_lexer::{Token, TokenKind};
use pdep_syntax::{Modifiers, NodeId, NodeKind};

type Result<T> = std::result::Result<T, ParseError>;

impl Parser<'_> {
    /// Skip open and close tags in statement position and peek past them.
    /// 跳过语句位置上的开始和结束标签，并查看其后的 token。
    pub(crate) fn peek_statement(&mut self) -> Result<TokenKind> {
        loop {
            match self.peek() {
                TokenKind::OpenTag | TokenKind::CloseTag => {
                    self.next()?;
                }
                kind => return Ok(kind),
            }
        }
    }

    /// `;` or a `?>` close tag.
    pub(crate) fn parse_statement_end(&mut self) -> Result<()> {
        match self.peek() {
            TokenKind::Semicolon | TokenKind::CloseTag => {
                self.next()?;
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parse one statement, including declarations.
    /// 解析一条语句（包括声明）。
    pub(crate) fn parse_statement(&mut self) -> Result<NodeId> {
        let statement = self.parse_statement_inner()?;
        self.discard_comments();
        Ok(statement)
    }

    fn parse_statement_inner(&mut self) -> Result<NodeId> {
        match self.peek_statement()? {
            TokenKind::InlineHtml => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::InlineHtml, &token))
            }
            TokenKind::OpenTagWithEcho => self.parse_echo_statement(),
            TokenKind::CurlyBraceOpen => self.parse_scope(),
            TokenKind::Semicolon => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::EmptyStatement, &token))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Foreach => self.parse_foreach_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Break => self.parse_jump_statement(NodeKind::BreakStatement),
            TokenKind::Continue => self.parse_jump_statement(NodeKind::ContinueStatement),
            TokenKind::Return => self.parse_jump_statement(NodeKind::ReturnStatement),
            TokenKind::Echo => self.parse_echo_statement(),
            TokenKind::Global => self.parse_global_statement(),
            TokenKind::Unset => self.parse_unset_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Goto => self.parse_goto_statement(),
            TokenKind::Declare => self.parse_declare_statement(),
            TokenKind::Use if self.dialect.has_namespaces() => self.parse_use_statement(),
            TokenKind::Const => {
                let comment = self.take_doc_comment();
                self.parse_constant_definition(comment)
            }
            TokenKind::Namespace if self.dialect.has_namespaces() => {
                self.parse_namespace_or_expression()
            }
            TokenKind::Function => self.parse_function_or_closure(),
            TokenKind::Static => self.parse_static_or_expression(),
            TokenKind::Abstract | TokenKind::Final | TokenKind::Class => {
                self.parse_class_declaration()
            }
            TokenKind::Interface => self.parse_interface_declaration(),
            TokenKind::Trait if self.dialect >= Dialect::Php54 => self.parse_trait_declaration(),
            TokenKind::String => self.parse_label_or_expression(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<NodeId> {
        let expression = self.parse_expression()?;
        self.finish_expression_statement(expression)
    }

    fn finish_expression_statement(&mut self, expression: NodeId) -> Result<NodeId> {
        self.parse_statement_end()?;
        let first = self.builder.span(expression);
        Ok(self.node(NodeKind::ExpressionStatement, "", first, vec![expression]))
    }

    /// `{ statements }`
    pub(crate) fn parse_scope(&mut self) -> Result<NodeId> {
        let open = self.consume(TokenKind::CurlyBraceOpen)?;
        let mut children = Vec::new();
        while self.peek_statement()? != TokenKind::CurlyBraceClose {
            children.push(self.parse_statement()?);
        }
        self.consume(TokenKind::CurlyBraceClose)?;
        Ok(self.node(NodeKind::ScopeStatement, "", open.span, children))
    }

    /// Statements of an alternative-syntax body, up to one of `terminators`.
    /// 替代语法主体中的语句，直到遇到某个终止符。
    fn parse_alternative_scope(&mut self, terminators: &[TokenKind]) -> Result<NodeId> {
        let colon = self.last;
        let mut children = Vec::new();
        loop {
            let kind = self.peek_statement()?;
            if terminators.contains(&kind) {
                break;
            }
            children.push(self.parse_statement()?);
        }
        Ok(self.node(NodeKind::ScopeStatement, "", colon, children))
    }

    /// Body of `while`, `for`, `foreach` and `declare`, in either syntax.
    fn parse_loop_body(&mut self, end: TokenKind) -> Result<NodeId> {
        if self.eat(TokenKind::Colon).is_none() {
            return self.parse_statement();
        }
        let body = self.parse_alternative_scope(&[end])?;
        self.consume(end)?;
        self.parse_statement_end()?;
        Ok(body)
    }

    /// `( expression )` around a condition.
    pub(crate) fn parse_condition(&mut self) -> Result<NodeId> {
        self.consume(TokenKind::ParenthesisOpen)?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::ParenthesisClose)?;
        Ok(condition)
    }

    // ========== Control Flow ==========

    fn parse_if_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::If)?.span;
        self.parse_if_rest(NodeKind::IfStatement, "if", first)
    }

    fn parse_if_rest(&mut self, kind: NodeKind, image: &str, first: Span) -> Result<NodeId> {
        let condition = self.parse_condition()?;
        if self.eat(TokenKind::Colon).is_some() {
            return self.parse_alternative_if_rest(kind, image, first, condition);
        }

        let mut children = vec![condition, self.parse_statement()?];
        match self.peek() {
            TokenKind::Elseif => {
                let token = self.next()?;
                children.push(self.parse_if_rest(NodeKind::ElseIfStatement, "elseif", token.span)?);
            }
            TokenKind::Else => {
                self.next()?;
                children.push(self.parse_statement()?);
            }
            _ => {}
        }
        Ok(self.node(kind, image, first, children))
    }

    /// `if (...): ... elseif (...): ... else: ... endif;`
    fn parse_alternative_if_rest(
        &mut self,
        kind: NodeKind,
        image: &str,
        first: Span,
        condition: NodeId,
    ) -> Result<NodeId> {
        use TokenKind::{Else, Elseif, Endif};

        let body = self.parse_alternative_scope(&[Elseif, Else, Endif])?;
        let mut children = vec![condition, body];
        match self.peek() {
            Elseif => {
                let token = self.next()?;
                let condition = self.parse_condition()?;
                self.consume(TokenKind::Colon)?;
                children.push(self.parse_alternative_if_rest(
                    NodeKind::ElseIfStatement,
                    "elseif",
                    token.span,
                    condition,
                )?);
            }
            Else => {
                self.next()?;
                self.consume(TokenKind::Colon)?;
                children.push(self.parse_alternative_scope(&[Endif])?);
                self.consume(Endif)?;
                self.parse_statement_end()?;
            }
            _ => {
                self.consume(Endif)?;
                self.parse_statement_end()?;
            }
        }
        Ok(self.node(kind, image, first, children))
    }

    fn parse_while_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::While)?.span;
        let condition = self.parse_condition()?;
        let body = self.parse_loop_body(TokenKind::Endwhile)?;
        Ok(self.node(NodeKind::WhileStatement, "while", first, vec![condition, body]))
    }

    fn parse_do_while_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Do)?.span;
        let body = self.parse_statement()?;
        self.consume(TokenKind::While)?;
        let condition = self.parse_condition()?;
        self.parse_statement_end()?;
        Ok(self.node(NodeKind::DoWhileStatement, "do", first, vec![body, condition]))
    }

    fn parse_for_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::For)?.span;
        self.consume(TokenKind::ParenthesisOpen)?;

        let mut children = Vec::new();
        let clauses = [
            (NodeKind::ForInit, TokenKind::Semicolon),
            (NodeKind::ForCondition, TokenKind::Semicolon),
            (NodeKind::ForUpdate, TokenKind::ParenthesisClose),
        ];
        for (kind, close) in clauses {
            let expressions = self.parse_comma_list(close, |p| p.parse_expression())?;
            if let Some(&head) = expressions.first() {
                let span = self.builder.span(head);
                children.push(self.node(kind, "", span, expressions));
            }
            self.consume(close)?;
        }

        children.push(self.parse_loop_body(TokenKind::Endfor)?);
        Ok(self.node(NodeKind::ForStatement, "for", first, children))
    }

    fn parse_foreach_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Foreach)?.span;
        self.consume(TokenKind::ParenthesisOpen)?;
        let mut children = vec![self.parse_expression()?];
        self.consume(TokenKind::As)?;

        let target = self.parse_foreach_target()?;
        if self.eat(TokenKind::DoubleArrow).is_some() {
            children.push(target);
            children.push(self.parse_foreach_target()?);
        } else {
            children.push(target);
        }
        self.consume(TokenKind::ParenthesisClose)?;

        children.push(self.parse_loop_body(TokenKind::Endforeach)?);
        Ok(self.node(NodeKind::ForeachStatement, "foreach", first, children))
    }

    /// Key or value of a `foreach`: `$v`, `&$v` or `list(...)`.
    fn parse_foreach_target(&mut self) -> Result<NodeId> {
        let by_reference = self.eat(TokenKind::BitwiseAnd).is_some();
        let target = self.parse_expression()?;
        if by_reference {
            self.builder.add_modifiers(target, Modifiers::BY_REFERENCE);
        }
        Ok(target)
    }

    fn parse_switch_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Switch)?.span;
        let mut children = vec![self.parse_condition()?];

        let alternative = match self.peek() {
            TokenKind::Colon => true,
            TokenKind::CurlyBraceOpen => false,
            _ => return Err(self.unexpected()),
        };
        self.next()?;
        self.eat(TokenKind::Semicolon);

        let close = if alternative {
            TokenKind::Endswitch
        } else {
            TokenKind::CurlyBraceClose
        };
        while self.peek_statement()? != close {
            children.push(self.parse_switch_label(close)?);
        }
        self.consume(close)?;
        if alternative {
            self.parse_statement_end()?;
        }
        Ok(self.node(NodeKind::SwitchStatement, "switch", first, children))
    }

    /// `case expr:` or `default:` with the statements that follow it.
    fn parse_switch_label(&mut self, close: TokenKind) -> Result<NodeId> {
        let token = self.next()?;
        let mut children = Vec::new();
        match token.kind {
            TokenKind::Case => children.push(self.parse_expression()?),
            TokenKind::Default => {}
            _ => return Err(self.unexpected_token(token)),
        }
        match self.peek() {
            TokenKind::Colon | TokenKind::Semicolon => {
                self.next()?;
            }
            _ => return Err(self.unexpected()),
        }

        loop {
            let kind = self.peek_statement()?;
            if kind == close || kind == TokenKind::Case || kind == TokenKind::Default {
                break;
            }
            children.push(self.parse_statement()?);
        }
        let image = token.image.to_ascii_lowercase();
        Ok(self.node(NodeKind::SwitchLabel, image, token.span, children))
    }

    /// `break`, `continue` and `return` with an optional expression.
    fn parse_jump_statement(&mut self, kind: NodeKind) -> Result<NodeId> {
        let token = self.next()?;
        let mut children = Vec::new();
        if !matches!(self.peek(), TokenKind::Semicolon | TokenKind::CloseTag) {
            children.push(self.parse_expression()?);
        }
        self.parse_statement_end()?;
        let image = token.image.to_ascii_lowercase();
        Ok(self.node(kind, image, token.span, children))
    }

    /// `echo a, b;` and `<?= a, b ?>`.
    fn parse_echo_statement(&mut self) -> Result<NodeId> {
        let token = self.next()?;
        let mut children = vec![self.parse_expression()?];
        while self.eat(TokenKind::Comma).is_some() {
            children.push(self.parse_expression()?);
        }
        self.parse_statement_end()?;
        Ok(self.node(NodeKind::EchoStatement, "echo", token.span, children))
    }

    fn parse_global_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Global)?.span;
        let mut children = vec![self.parse_compound_variable_or_variable_variable_or_variable()?];
        while self.eat(TokenKind::Comma).is_some() {
            children.push(self.parse_compound_variable_or_variable_variable_or_variable()?);
        }
        self.parse_statement_end()?;
        Ok(self.node(NodeKind::GlobalStatement, "global", first, children))
    }

    fn parse_unset_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Unset)?.span;
        self.consume(TokenKind::ParenthesisOpen)?;
        let children = self.parse_comma_list(TokenKind::ParenthesisClose, |p| p.parse_expression())?;
        self.consume(TokenKind::ParenthesisClose)?;
        self.parse_statement_end()?;
        Ok(self.node(NodeKind::UnsetStatement, "unset", first, children))
    }

    fn parse_throw_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Throw)?.span;
        let expression = self.parse_expression()?;
        self.parse_statement_end()?;
        Ok(self.node(NodeKind::ThrowStatement, "throw", first, vec![expression]))
    }

    fn parse_try_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Try)?.span;
        let mut children = vec![self.parse_scope()?];

        while self.peek() == TokenKind::Catch {
            children.push(self.parse_catch_statement()?);
        }
        if self.dialect.has_finally() && self.peek() == TokenKind::Finally {
            let token = self.next()?;
            let body = self.parse_scope()?;
            children.push(self.node(NodeKind::FinallyStatement, "finally", token.span, vec![body]));
        }
        if children.len() == 1 {
            return Err(self.unexpected());
        }
        Ok(self.node(NodeKind::TryStatement, "try", first, children))
    }

    /// `catch (A | B $e) { ... }`; the `|` form is only tolerated by `Generic`.
    fn parse_catch_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Catch)?.span;
        self.consume(TokenKind::ParenthesisOpen)?;

        let mut children = vec![self.parse_class_or_interface_reference()?];
        while self.dialect == Dialect::Generic && self.eat(TokenKind::BitwiseOr).is_some() {
            children.push(self.parse_class_or_interface_reference()?);
        }
        let variable = self.consume(TokenKind::Variable)?;
        children.push(self.leaf(NodeKind::Variable, &variable));
        self.consume(TokenKind::ParenthesisClose)?;
        children.push(self.parse_scope()?);

        Ok(self.node(NodeKind::CatchStatement, "catch", first, children))
    }

    fn parse_goto_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Goto)?.span;
        let label = self.consume(TokenKind::String)?;
        self.parse_statement_end()?;
        Ok(self.node(NodeKind::GotoStatement, label.image, first, vec![]))
    }

    /// A bare name is either a `label:` or the start of an expression.
    /// 裸名称要么是 `label:`，要么是表达式的开头。
    fn parse_label_or_expression(&mut self) -> Result<NodeId> {
        let name = self.consume(TokenKind::String)?;
        if self.eat(TokenKind::Colon).is_some() {
            return Ok(self.node(NodeKind::LabelStatement, name.image, name.span, vec![]));
        }
        let primary = self.parse_name_primary_from(name.image, name.span)?;
        let expression = self.parse_expression_from(primary)?;
        self.finish_expression_statement(expression)
    }

    /// `declare(ticks=1);`, `declare(ticks=1) { }` or `declare(ticks=1): enddeclare;`
    fn parse_declare_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Declare)?.span;
        self.consume(TokenKind::ParenthesisOpen)?;
        let mut children =
            self.parse_comma_list(TokenKind::ParenthesisClose, |p| p.parse_constant_declarator())?;
        self.consume(TokenKind::ParenthesisClose)?;

        match self.peek() {
            TokenKind::Semicolon | TokenKind::CloseTag => self.parse_statement_end()?,
            _ => children.push(self.parse_loop_body(TokenKind::Enddeclare)?),
        }
        Ok(self.node(NodeKind::DeclareStatement, "declare", first, children))
    }

    // ========== Names and Imports ==========

    /// `Foo`, `\Foo\Bar` or `namespace\Foo`.
    /// 限定名称。
    pub(crate) fn parse_qualified_name(&mut self) -> Result<(String, Span)> {
        let token = self.next()?;
        let first = token.span;
        let image = match token.kind {
            TokenKind::Backslash | TokenKind::Namespace if !self.dialect.has_namespaces() => {
                return Err(self.unexpected_token(token));
            }
            TokenKind::Backslash => {
                let segment = self.next()?;
                if !segment.kind.is_word() {
                    return Err(self.unexpected_token(segment));
                }
                format!("\\{}", segment.image)
            }
            TokenKind::Namespace => {
                if self.peek() != TokenKind::Backslash {
                    return Err(self.unexpected());
                }
                token.image
            }
            kind if kind.is_word() => token.image,
            _ => return Err(self.unexpected_token(token)),
        };
        Ok((self.continue_qualified_name(image)?, first))
    }

    /// Append `\segment` parts to a name whose first part is consumed.
    ///
    /// Stops after a `\` that is followed by `{`, leaving the trailing
    /// backslash in the name for group use declarations.
    pub(crate) fn continue_qualified_name(&mut self, mut image: String) -> Result<String> {
        while self.dialect.has_namespaces() && self.eat(TokenKind::Backslash).is_some() {
            image.push('\\');
            if self.peek() == TokenKind::CurlyBraceOpen {
                break;
            }
            let segment = self.next()?;
            if !segment.kind.is_word() {
                return Err(self.unexpected_token(segment));
            }
            image.push_str(&segment.image);
        }
        Ok(image)
    }

    pub(crate) fn parse_class_or_interface_reference(&mut self) -> Result<NodeId> {
        let (name, first) = self.parse_qualified_name()?;
        Ok(self.node(NodeKind::ClassOrInterfaceReference, name, first, vec![]))
    }

    fn parse_namespace_or_expression(&mut self) -> Result<NodeId> {
        let comment = self.take_doc_comment();
        let token = self.consume(TokenKind::Namespace)?;
        if self.peek() == TokenKind::Backslash {
            let name = self.continue_qualified_name(token.image)?;
            let primary = self.finish_name_primary(name, token.span)?;
            let expression = self.parse_expression_from(primary)?;
            return self.finish_expression_statement(expression);
        }

        let name = if self.peek() == TokenKind::CurlyBraceOpen {
            String::new()
        } else {
            self.parse_qualified_name()?.0
        };

        let mut children = Vec::new();
        if self.eat(TokenKind::CurlyBraceOpen).is_some() {
            while self.peek_statement()? != TokenKind::CurlyBraceClose {
                children.push(self.parse_statement()?);
            }
            self.consume(TokenKind::CurlyBraceClose)?;
        } else {
            self.parse_statement_end()?;
        }

        let namespace = self.node(NodeKind::Namespace, name, token.span, children);
        self.builder.set_comment(namespace, comment);
        Ok(namespace)
    }

    /// `use A\B as C, D;`, `use function f;`, `use const X;`, `use A\{B, C as D};`
    fn parse_use_statement(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Use)?.span;
        let image = self.parse_use_type();

        let mut children = vec![self.parse_use_import()?];
        while self.eat(TokenKind::Comma).is_some() {
            children.push(self.parse_use_import()?);
        }
        self.parse_statement_end()?;

        let mut imports = Vec::with_capacity(children.len());
        for child in children {
            imports.extend(child);
        }
        Ok(self.node(NodeKind::UseStatement, image, first, imports))
    }

    /// Optional `function` or `const` after `use`.
    fn parse_use_type(&mut self) -> &'static str {
        if self.eat(TokenKind::Function).is_some() {
            "function"
        } else if self.eat(TokenKind::Const).is_some() {
            "const"
        } else {
            ""
        }
    }

    /// One import clause; a group clause yields several imports.
    fn parse_use_import(&mut self) -> Result<Vec<NodeId>> {
        let (name, first) = self.parse_qualified_name()?;
        if !name.ends_with('\\') {
            return Ok(vec![self.finish_use_import(name, first)?]);
        }

        self.consume(TokenKind::CurlyBraceOpen)?;
        let mut imports = Vec::new();
        while self.peek() != TokenKind::CurlyBraceClose {
            self.parse_use_type();
            let (suffix, _) = self.parse_qualified_name()?;
            imports.push(self.finish_use_import(format!("{name}{suffix}"), first)?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.consume(TokenKind::CurlyBraceClose)?;
        Ok(imports)
    }

    fn finish_use_import(&mut self, name: String, first: Span) -> Result<NodeId> {
        let mut children = Vec::new();
        if self.eat(TokenKind::As).is_some() {
            let alias = self.next()?;
            if !alias.kind.is_word() {
                return Err(self.unexpected_token(alias));
            }
            children.push(self.leaf(NodeKind::Identifier, &alias));
        }
        Ok(self.node(NodeKind::UseImport, name, first, children))
    }

    /// `const A = 1, B = 2;` at file level or inside a class body.
    fn parse_constant_definition(&mut self, comment: Option<String>) -> Result<NodeId> {
        let first = self.consume(TokenKind::Const)?.span;
        let mut children = vec![self.parse_constant_declarator()?];
        while self.eat(TokenKind::Comma).is_some() {
            children.push(self.parse_constant_declarator()?);
        }
        self.parse_statement_end()?;

        let definition = self.node(NodeKind::ConstantDefinition, "const", first, children);
        self.builder.set_comment(definition, comment);
        Ok(definition)
    }

    /// `NAME = static-value`
    fn parse_constant_declarator(&mut self) -> Result<NodeId> {
        let name = self.parse_member_name()?;
        self.consume(TokenKind::Equal)?;
        let value = self.parse_static_value()?;
        Ok(self.node(NodeKind::ConstantDeclarator, name.image, name.span, vec![value]))
    }

    /// A word usable as a member or constant name in this dialect.
    /// 在当前版本中可用作成员名或常量名的单词。
    fn parse_member_name(&mut self) -> Result<Token> {
        let token = self.next()?;
        if token.kind == TokenKind::String
            || (token.kind.is_word() && !self.dialect.is_keyword(token.kind))
        {
            Ok(token)
        } else {
            Err(self.unexpected_token(token))
        }
    }

    // ========== Functions ==========

    /// `function name(...)` declares; `function (...)` starts a closure.
    /// `function name(...)` 是声明；`function (...)` 开始一个闭包。
    fn parse_function_or_closure(&mut self) -> Result<NodeId> {
        let comment = self.take_doc_comment();
        let first = self.consume(TokenKind::Function)?.span;
        let by_reference = self.eat(TokenKind::BitwiseAnd).is_some();

        if self.peek() == TokenKind::ParenthesisOpen {
            if !self.dialect.has_closures() {
                return Err(self.unexpected());
            }
            let closure = self.parse_closure_rest(first, by_reference, false)?;
            let expression = self.parse_expression_from(closure)?;
            return self.finish_expression_statement(expression);
        }

        let name = self.next()?;
        if !self.dialect.is_function_name(name.kind) {
            return Err(self.unexpected_token(name));
        }

        let mut children = vec![self.parse_formal_parameters()?];
        self.parse_callable_declaration_addition(&mut children)?;
        children.push(self.parse_scope()?);

        let function = self.node(NodeKind::Function, name.image, first, children);
        if by_reference {
            self.builder.set_modifiers(function, Modifiers::BY_REFERENCE);
        }
        self.builder.set_comment(function, comment);
        Ok(function)
    }

    /// `( parameter, ... )`
    pub(crate) fn parse_formal_parameters(&mut self) -> Result<NodeId> {
        let open = self.consume(TokenKind::ParenthesisOpen)?;
        let parameters = self.parse_comma_list(TokenKind::ParenthesisClose, |p| {
            p.parse_formal_parameter_or_type_hint()
        })?;
        self.consume(TokenKind::ParenthesisClose)?;
        Ok(self.node(NodeKind::FormalParameters, "", open.span, parameters))
    }

    /// Optional type, optional `&`, then the version specific remainder.
    fn parse_formal_parameter_or_type_hint(&mut self) -> Result<NodeId> {
        let first = self.peek_span();
        let type_hint = match self.peek() {
            TokenKind::Array => {
                let token = self.next()?;
                Some(self.builder.leaf(NodeKind::TypeArray, "array", token.span))
            }
            TokenKind::SelfKw => {
                let token = self.next()?;
                Some(self.leaf(NodeKind::SelfReference, &token))
            }
            TokenKind::Parent => {
                let token = self.next()?;
                Some(self.leaf(NodeKind::ParentReference, &token))
            }
            kind if self.dialect.is_type_hint(kind) => Some(self.parse_type_hint()?),
            _ => None,
        };

        let by_reference = self.eat(TokenKind::BitwiseAnd).is_some();
        let (declarator, mut modifiers) = self.parse_formal_parameter()?;
        if by_reference {
            modifiers |= Modifiers::BY_REFERENCE;
        }

        let image = self.builder.image(declarator).to_string();
        let children = type_hint.into_iter().chain([declarator]).collect();

        let parameter = self.node(NodeKind::FormalParameter, image, first, children);
        self.builder.set_modifiers(parameter, modifiers);
        Ok(parameter)
    }

    /// `$name` with an optional `= static-value`.
    pub(crate) fn parse_variable_declarator(&mut self) -> Result<NodeId> {
        let variable = self.consume(TokenKind::Variable)?;
        let mut children = Vec::new();
        if self.eat(TokenKind::Equal).is_some() {
            children.push(self.parse_static_value()?);
        }
        Ok(self.node(NodeKind::VariableDeclarator, variable.image, variable.span, children))
    }

    /// After `static` at statement start: variables, or an expression.
    fn parse_static_or_expression(&mut self) -> Result<NodeId> {
        let token = self.consume(TokenKind::Static)?;
        if self.peek() != TokenKind::Variable {
            let primary = self.parse_static_primary(token)?;
            let expression = self.parse_expression_from(primary)?;
            return self.finish_expression_statement(expression);
        }

        let mut children = vec![self.parse_variable_declarator()?];
        while self.eat(TokenKind::Comma).is_some() {
            children.push(self.parse_variable_declarator()?);
        }
        self.parse_statement_end()?;
        Ok(self.node(NodeKind::StaticVariableDeclaration, "static", token.span, children))
    }

    // ========== Classes ==========

    fn parse_class_declaration(&mut self) -> Result<NodeId> {
        let comment = self.take_doc_comment();
        let mut modifiers = Modifiers::NONE;
        let mut first = None;
        loop {
            let token = self.next()?;
            first.get_or_insert(token.span);
            match token.kind {
                TokenKind::Abstract => modifiers |= Modifiers::ABSTRACT,
                TokenKind::Final => modifiers |= Modifiers::FINAL,
                TokenKind::Class => break,
                _ => return Err(self.unexpected_token(token)),
            }
        }
        let first = first.unwrap_or(self.last);
        let name = self.parse_class_name()?;

        let mut children = Vec::new();
        if self.eat(TokenKind::Extends).is_some() {
            let (parent, span) = self.parse_qualified_name()?;
            children.push(self.node(NodeKind::ClassReference, parent, span, vec![]));
        }
        if self.eat(TokenKind::Implements).is_some() {
            children.push(self.parse_class_or_interface_reference()?);
            while self.eat(TokenKind::Comma).is_some() {
                children.push(self.parse_class_or_interface_reference()?);
            }
        }
        self.parse_class_body(&mut children)?;

        let class = self.node(NodeKind::Class, name.image, first, children);
        self.builder.set_modifiers(class, modifiers);
        self.builder.set_comment(class, comment);
        Ok(class)
    }

    fn parse_interface_declaration(&mut self) -> Result<NodeId> {
        let comment = self.take_doc_comment();
        let first = self.consume(TokenKind::Interface)?.span;
        let name = self.parse_class_name()?;

        let mut children = Vec::new();
        if self.eat(TokenKind::Extends).is_some() {
            children.push(self.parse_class_or_interface_reference()?);
            while self.eat(TokenKind::Comma).is_some() {
                children.push(self.parse_class_or_interface_reference()?);
            }
        }
        self.parse_class_body(&mut children)?;

        let interface = self.node(NodeKind::Interface, name.image, first, children);
        self.builder.set_comment(interface, comment);
        Ok(interface)
    }

    fn parse_trait_declaration(&mut self) -> Result<NodeId> {
        let comment = self.take_doc_comment();
        let first = self.consume(TokenKind::Trait)?.span;
        let name = self.parse_class_name()?;

        let mut children = Vec::new();
        self.parse_class_body(&mut children)?;

        let declaration = self.node(NodeKind::Trait, name.image, first, children);
        self.builder.set_comment(declaration, comment);
        Ok(declaration)
    }

    fn parse_class_name(&mut self) -> Result<Token> {
        let token = self.next()?;
        if self.dialect.is_class_name(token.kind) {
            Ok(token)
        } else {
            Err(self.unexpected_token(token))
        }
    }

    /// `{ members }`; members are appended to `children`.
    fn parse_class_body(&mut self, children: &mut Vec<NodeId>) -> Result<()> {
        self.consume(TokenKind::CurlyBraceOpen)?;
        while self.peek() != TokenKind::CurlyBraceClose {
            children.push(self.parse_class_member()?);
        }
        self.consume(TokenKind::CurlyBraceClose)?;
        self.discard_comments();
        Ok(())
    }

    /// A method, property declaration, constant definition or trait use.
    /// 方法、属性声明、常量定义或 trait 引用。
    fn parse_class_member(&mut self) -> Result<NodeId> {
        let comment = self.take_doc_comment();
        match self.peek() {
            TokenKind::Use => return self.parse_trait_use(),
            TokenKind::Const => return self.parse_constant_definition(comment),
            _ => {}
        }

        let mut modifiers = Modifiers::NONE;
        let mut first = None;
        loop {
            let flag = match self.peek() {
                TokenKind::Public | TokenKind::Var => Modifiers::PUBLIC,
                TokenKind::Protected => Modifiers::PROTECTED,
                TokenKind::Private => Modifiers::PRIVATE,
                TokenKind::Static => Modifiers::STATIC,
                TokenKind::Abstract => Modifiers::ABSTRACT,
                TokenKind::Final => Modifiers::FINAL,
                _ => break,
            };
            let token = self.next()?;
            first.get_or_insert(token.span);
            modifiers |= flag;
        }

        match self.peek() {
            TokenKind::Function => {
                let token = self.next()?;
                self.parse_method(first.unwrap_or(token.span), modifiers, comment)
            }
            TokenKind::Variable if first.is_some() => {
                let first = first.unwrap_or(self.last);
                self.parse_field_declaration(first, modifiers, comment)
            }
            TokenKind::Const if first.is_some() && self.dialect == Dialect::Generic => {
                let constant = self.parse_constant_definition(comment)?;
                self.builder.set_modifiers(constant, modifiers);
                Ok(constant)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_method(
        &mut self,
        first: Span,
        modifiers: Modifiers,
        comment: Option<String>,
    ) -> Result<NodeId> {
        let mut modifiers = modifiers.with_implicit_visibility();
        if self.eat(TokenKind::BitwiseAnd).is_some() {
            modifiers |= Modifiers::BY_REFERENCE;
        }
        let name = self.parse_member_name()?;

        let mut children = vec![self.parse_formal_parameters()?];
        self.parse_callable_declaration_addition(&mut children)?;
        if self.peek() == TokenKind::CurlyBraceOpen {
            children.push(self.parse_scope()?);
        } else {
            self.parse_statement_end()?;
        }

        let method = self.node(NodeKind::Method, name.image, first, children);
        self.builder.set_modifiers(method, modifiers);
        self.builder.set_comment(method, comment);
        Ok(method)
    }

    /// `private static $a = 1, $b;`
    fn parse_field_declaration(
        &mut self,
        first: Span,
        modifiers: Modifiers,
        comment: Option<String>,
    ) -> Result<NodeId> {
        let mut children = vec![self.parse_variable_declarator()?];
        while self.eat(TokenKind::Comma).is_some() {
            children.push(self.parse_variable_declarator()?);
        }
        self.parse_statement_end()?;

        let field = self.node(NodeKind::FieldDeclaration, "", first, children);
        self.builder.set_modifiers(field, modifiers.with_implicit_visibility());
        self.builder.set_comment(field, comment);
        Ok(field)
    }

    /// `use A, B;` or `use A, B { adaptations }` inside a class body.
    fn parse_trait_use(&mut self) -> Result<NodeId> {
        let first = self.consume(TokenKind::Use)?.span;
        let mut children = vec![self.parse_trait_reference()?];
        while self.eat(TokenKind::Comma).is_some() {
            children.push(self.parse_trait_reference()?);
        }

        if let Some(open) = self.eat(TokenKind::CurlyBraceOpen) {
            let mut adaptations = Vec::new();
            while self.peek() != TokenKind::CurlyBraceClose {
                adaptations.push(self.parse_trait_adaptation_rule()?);
            }
            self.consume(TokenKind::CurlyBraceClose)?;
            children.push(self.node(NodeKind::TraitAdaptation, "", open.span, adaptations));
        } else {
            self.parse_statement_end()?;
        }
        Ok(self.node(NodeKind::TraitUse, "use", first, children))
    }

    fn parse_trait_reference(&mut self) -> Result<NodeId> {
        let (name, first) = self.parse_qualified_name()?;
        Ok(self.node(NodeKind::TraitReference, name, first, vec![]))
    }

    /// `[A::]m insteadof B, C;` or `[A::]m as [visibility] [alias];`
    fn parse_trait_adaptation_rule(&mut self) -> Result<NodeId> {
        let (name, first) = self.parse_qualified_name()?;
        let mut children = Vec::new();
        let method = if self.eat(TokenKind::DoubleColon).is_some() {
            let name_end = self.last;
            let reference = self.builder.build(NodeKind::TraitReference, name, first, name_end, vec![]);
            children.push(reference);
            let method = self.next()?;
            if !method.kind.is_word() {
                return Err(self.unexpected_token(method));
            }
            method.image
        } else {
            name
        };

        let token = self.next()?;
        let rule = match token.kind {
            TokenKind::Insteadof => {
                children.push(self.parse_trait_reference()?);
                while self.eat(TokenKind::Comma).is_some() {
                    children.push(self.parse_trait_reference()?);
                }
                self.parse_statement_end()?;
                self.node(NodeKind::TraitAdaptationPrecedence, method, first, children)
            }
            TokenKind::As => {
                let visibility = match self.peek() {
                    TokenKind::Public => Modifiers::PUBLIC,
                    TokenKind::Protected => Modifiers::PROTECTED,
                    TokenKind::Private => Modifiers::PRIVATE,
                    _ => Modifiers::NONE,
                };
                if !visibility.is_empty() {
                    self.next()?;
                }
                if !matches!(self.peek(), TokenKind::Semicolon | TokenKind::CloseTag) {
                    let alias = self.parse_member_name()?;
                    children.push(self.leaf(NodeKind::Identifier, &alias));
                }
                self.parse_statement_end()?;
                let alias = self.node(NodeKind::TraitAdaptationAlias, method, first, children);
                self.builder.set_modifiers(alias, visibility);
                alias
            }
            _ => return Err(self.unexpected_token(token)),
        };
        Ok(rule)
    }
}
