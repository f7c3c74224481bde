//! Grammar decisions that differ between dialects.
//! 因语言版本而异的语法决策。
//!
//! Every production here consults `self.dialect`, either through one of
//! its predicates or by walking its fallback chain.

use crate::{Dialect, ParseError, Parser};
use pdep_common::Span;
use pdep_lexer::TokenKind;
use pdep_syntax::{ArrayStyle, Modifiers, NodeId, NodeKind};

type Result<T> = std::result::Result<T, ParseError>;

impl Parser<'_> {
    // ========== Types ==========

    /// `callable`, a class or interface name, or from 7.0 on a scalar type.
    /// `callable`、类或接口名称，或从 7.0 起的标量类型。
    pub(crate) fn parse_type_hint(&mut self) -> Result<NodeId> {
        match self.peek() {
            TokenKind::Callable if self.dialect.has_callable_type() => {
                let token = self.next()?;
                Ok(self.builder.leaf(NodeKind::TypeCallable, "callable", token.span))
            }
            TokenKind::Callable => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::ClassOrInterfaceReference, &token))
            }
            TokenKind::String | TokenKind::Backslash | TokenKind::Namespace => {
                let (name, first) = self.parse_qualified_name()?;
                let kind = if self.dialect.has_scalar_type_hints() {
                    match name.to_ascii_lowercase().as_str() {
                        "int" | "bool" | "float" | "string" => NodeKind::ScalarType,
                        "callable" => NodeKind::TypeCallable,
                        _ => NodeKind::ClassOrInterfaceReference,
                    }
                } else {
                    NodeKind::ClassOrInterfaceReference
                };
                let image = if kind == NodeKind::TypeCallable {
                    "callable".to_string()
                } else {
                    name
                };
                Ok(self.node(kind, image, first, vec![]))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Type after the `:` of a function, method or closure.
    pub(crate) fn parse_return_type_hint(&mut self) -> Result<NodeId> {
        let kind = match self.peek() {
            TokenKind::Array => NodeKind::TypeArray,
            TokenKind::SelfKw => NodeKind::SelfReference,
            TokenKind::Parent => NodeKind::ParentReference,
            _ => return self.parse_type_hint(),
        };
        let token = self.next()?;
        let image = token.image.to_ascii_lowercase();
        Ok(self.builder.leaf(kind, image, token.span))
    }

    /// Extra parts of a callable after its parameter list: the return type.
    /// 可调用对象参数列表之后的附加部分：返回类型。
    pub(crate) fn parse_callable_declaration_addition(
        &mut self,
        children: &mut Vec<NodeId>,
    ) -> Result<()> {
        if !self.dialect.has_return_types() || self.peek() != TokenKind::Colon {
            return Ok(());
        }
        self.next()?;
        children.push(self.parse_return_type_hint()?);
        Ok(())
    }

    // ========== Parameters ==========

    /// The declarator of a formal parameter, with `...` from 5.6 on.
    /// 形式参数的声明符；从 5.6 起支持 `...`。
    pub(crate) fn parse_formal_parameter(&mut self) -> Result<(NodeId, Modifiers)> {
        let mut modifiers = Modifiers::NONE;
        if self.peek() == TokenKind::Ellipsis {
            if !self.dialect.has_variadics() {
                return Err(self.unexpected());
            }
            self.next()?;
            modifiers |= Modifiers::VARIADIC;
        }
        let declarator = self.parse_variable_declarator()?;
        Ok((declarator, modifiers))
    }

    // ========== Arrays ==========

    pub(crate) fn is_array_start_delimiter(&mut self) -> bool {
        match self.peek() {
            TokenKind::Array => true,
            TokenKind::SquaredBracketOpen => self.dialect.has_short_arrays(),
            _ => false,
        }
    }

    /// `array(...)` or, from 5.4 on, `[...]`.
    /// `array(...)`，或从 5.4 起的 `[...]`。
    pub(crate) fn parse_array(&mut self, static_context: bool) -> Result<NodeId> {
        let (style, close) = match self.peek() {
            TokenKind::Array => (ArrayStyle::Call, TokenKind::ParenthesisClose),
            TokenKind::SquaredBracketOpen if self.dialect.has_short_arrays() => {
                (ArrayStyle::Bracket, TokenKind::SquaredBracketClose)
            }
            _ => return Err(self.unexpected()),
        };

        let first = self.next()?.span;
        if style == ArrayStyle::Call {
            self.consume(TokenKind::ParenthesisOpen)?;
        }
        let elements = self.parse_array_elements(close, static_context)?;
        self.consume(close)?;
        Ok(self.node(NodeKind::Array(style), "", first, elements))
    }

    /// Elements up to `close`, which is left for the caller.
    ///
    /// A comma with nothing before it is an empty slot, as in `list(, $b)`.
    pub(crate) fn parse_array_elements(
        &mut self,
        close: TokenKind,
        static_context: bool,
    ) -> Result<Vec<NodeId>> {
        let mut elements = Vec::new();
        loop {
            let kind = self.peek();
            if kind == close {
                break;
            }
            if kind == TokenKind::Comma {
                let comma = self.next()?;
                let at = Span::new(comma.span.start, comma.span.start);
                elements.push(self.builder.leaf(NodeKind::ArrayElement, "", at));
                continue;
            }

            elements.push(self.parse_array_element(static_context)?);
            if self.peek() != close {
                self.consume(TokenKind::Comma)?;
            }
        }
        Ok(elements)
    }

    /// `value`, `key => value`, `&value` or `key => &value`.
    fn parse_array_element(&mut self, static_context: bool) -> Result<NodeId> {
        let first = self.peek_span();
        let mut by_reference = !static_context && self.eat(TokenKind::BitwiseAnd).is_some();
        let mut children = vec![self.parse_array_value(static_context)?];

        if !by_reference && self.eat(TokenKind::DoubleArrow).is_some() {
            by_reference = !static_context && self.eat(TokenKind::BitwiseAnd).is_some();
            children.push(self.parse_array_value(static_context)?);
        }

        let element = self.node(NodeKind::ArrayElement, "", first, children);
        if by_reference {
            self.builder.set_modifiers(element, Modifiers::BY_REFERENCE);
        }
        Ok(element)
    }

    fn parse_array_value(&mut self, static_context: bool) -> Result<NodeId> {
        if static_context {
            self.parse_static_value()
        } else {
            self.parse_expression()
        }
    }

    // ========== Static Values ==========

    /// A constant expression: parameter and property defaults, constants,
    /// static variables and declare directives.
    /// 常量表达式：参数和属性默认值、常量、静态变量和 declare 指令。
    pub(crate) fn parse_static_value(&mut self) -> Result<NodeId> {
        self.parse_static_value_bp(0)
    }

    fn parse_static_value_bp(&mut self, min_bp: u8) -> Result<NodeId> {
        let mut value = self.parse_static_operand()?;
        loop {
            match self.peek() {
                TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::ParenthesisClose
                | TokenKind::SquaredBracketClose
                | TokenKind::DoubleArrow
                | TokenKind::CloseTag => return Ok(value),
                _ => {}
            }
            let (l_bp, r_bp) = self.parse_static_value_version_specific()?;
            if l_bp < min_bp {
                return Ok(value);
            }

            let op = self.next()?;
            let rhs = self.parse_static_value_bp(r_bp)?;
            value = self.builder.build(
                NodeKind::BinaryExpression,
                op.image.as_str(),
                op.span,
                op.span,
                vec![value, rhs],
            );
        }
    }

    fn parse_static_operand(&mut self) -> Result<NodeId> {
        use TokenKind::*;
        match self.peek() {
            Minus | Plus => {
                let sign = self.next()?;
                let operand = self.parse_static_operand()?;
                Ok(self.node(NodeKind::UnaryExpression, sign.image, sign.span, vec![operand]))
            }
            LNumber | DNumber | ConstantEncapsedString | True | False | Null => self.parse_literal(),
            StartHeredoc => self.parse_heredoc(),
            kind if kind.is_magic_constant() => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::MagicConstant, &token))
            }
            Array | SquaredBracketOpen if self.is_array_start_delimiter() => self.parse_array(true),
            ParenthesisOpen if self.dialect >= Dialect::Php56 => {
                let open = self.next()?;
                let value = self.parse_static_value()?;
                self.consume(ParenthesisClose)?;
                Ok(self.node(NodeKind::ParenthesizedExpression, "", open.span, vec![value]))
            }
            SelfKw | Parent | Static => {
                let token = self.next()?;
                let kind = match token.kind {
                    SelfKw => NodeKind::SelfReference,
                    Parent => NodeKind::ParentReference,
                    _ => NodeKind::StaticReference,
                };
                let reference = self.leaf(kind, &token);
                self.parse_class_constant(reference)
            }
            kind if kind == Backslash || kind == Namespace || self.dialect.is_class_name(kind) => {
                let (name, first) = self.parse_qualified_name()?;
                let span = first.merge(self.last);
                if self.peek() == DoubleColon {
                    let reference = self.builder.leaf(NodeKind::ClassReference, name, span);
                    self.parse_class_constant(reference)
                } else {
                    Ok(self.builder.leaf(NodeKind::Constant, name, span))
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `::NAME` after a class reference.
    fn parse_class_constant(&mut self, reference: NodeId) -> Result<NodeId> {
        let op = self.consume(TokenKind::DoubleColon)?;
        let name = self.next()?;
        if !name.kind.is_word() {
            return Err(self.unexpected_token(name));
        }
        let identifier = self.leaf(NodeKind::Identifier, &name);
        let constant = self.node(NodeKind::ConstantPostfix, name.image, name.span, vec![identifier]);
        Ok(self.member_primary_prefix(reference, &op, constant))
    }

    /// Binding power of the operator a constant expression continues with.
    /// 常量表达式后续运算符的结合力。
    ///
    /// The dialect chain is searched for a generation that adds the next
    /// token as a binary operator. If none does it is reported as unexpected;
    /// otherwise precedence follows the ordinary expression table.
    pub(crate) fn parse_static_value_version_specific(&mut self) -> Result<(u8, u8)> {
        let kind = self.peek();
        let supported = self
            .dialect
            .fallback_chain()
            .into_iter()
            .any(|dialect| dialect.static_binary_operators().contains(&kind));
        match self.infix_binding_power(kind) {
            Some(bp) if supported => Ok(bp),
            _ => Err(self.unexpected()),
        }
    }

    // ========== Expressions ==========

    /// Binding power of an operator newer than the base table, if some
    /// generation in the chain introduced it.
    /// 如果链中某个版本引入了该运算符，返回其结合力。
    pub(crate) fn parse_optional_expression_for_version(
        &self,
        kind: TokenKind,
    ) -> Option<(u8, u8)> {
        self.dialect
            .fallback_chain()
            .into_iter()
            .find(|dialect| dialect.extra_binary_operators().contains(&kind))?;

        match kind {
            TokenKind::Coalesce => Some((12, 11)),
            TokenKind::Spaceship => Some((23, 24)),
            TokenKind::Pow => Some((40, 39)),
            _ => None,
        }
    }

    /// Member name after `->`: an identifier, `{expr}` or a variable,
    /// followed by any index expressions.
    /// `->` 之后的成员名：标识符、`{expr}` 或变量，及其后的索引表达式。
    pub(crate) fn parse_postfix_identifier(&mut self) -> Result<NodeId> {
        let node = match self.peek() {
            TokenKind::String => {
                let token = self.next()?;
                self.leaf(NodeKind::Identifier, &token)
            }
            TokenKind::CurlyBraceOpen => self.parse_compound_expression()?,
            _ => self.parse_compound_variable_or_variable_variable_or_variable()?,
        };
        self.parse_optional_index_expression(node)
    }

    /// `<<<ID ... ID`; under 5.2 one raw token after the label is dropped.
    /// heredoc；在 5.2 下会丢弃结束标签之后的一个原始 token。
    pub(crate) fn parse_heredoc(&mut self) -> Result<NodeId> {
        let start = self.consume(TokenKind::StartHeredoc)?;
        let body = match self.peek() {
            TokenKind::EncapsedAndWhitespace => self.next()?.image,
            _ => String::new(),
        };
        self.consume(TokenKind::EndHeredoc)?;

        let heredoc = self.node(NodeKind::Heredoc, body, start.span, vec![]);
        if self.dialect.has_legacy_heredoc_terminator() {
            self.skip_raw_token();
        }
        Ok(heredoc)
    }
}
