//! Expressions.
//! 表达式。
//!
//! Binary operators are parsed by binding power. Assignment is the one
//! exception: it binds whenever its left side is writable, whatever the
//! surrounding power, so `!$a = f()` reads as `!($a = f())`.

use crate::{ParseError, Parser};
use pdep_common::Span;
use pdep_lexer::{Token, TokenKind};
use pdep_syntax::{LiteralKind, Modifiers, NodeId, NodeKind};

type Result<T> = std::result::Result<T, ParseError>;

/// Right side of an assignment, `print`, `include` and `yield`.
const ASSIGNMENT_BP: u8 = 7;
/// Operand of `!`.
const NOT_BP: u8 = 34;
/// Operand of the other prefix operators and casts.
const PREFIX_BP: u8 = 37;

impl Parser<'_> {
    pub(crate) fn parse_expression(&mut self) -> Result<NodeId> {
        self.parse_expression_bp(0)
    }

    fn parse_expression_bp(&mut self, min_bp: u8) -> Result<NodeId> {
        let lhs = self.parse_unary()?;
        self.parse_infix(lhs, min_bp)
    }

    /// Continue a full expression from an already parsed primary.
    /// 从已解析的基本表达式继续解析完整表达式。
    pub(crate) fn parse_expression_from(&mut self, primary: NodeId) -> Result<NodeId> {
        let lhs = self.parse_postfix(primary)?;
        self.parse_infix(lhs, 0)
    }

    /// Binding powers of the base operator table, low to high.
    /// 基础运算符表的结合力，从低到高。
    pub(crate) fn infix_binding_power(&self, kind: TokenKind) -> Option<(u8, u8)> {
        use TokenKind::*;
        let bp = match kind {
            LogicalOr => (1, 2),
            LogicalXor => (3, 4),
            LogicalAnd => (5, 6),
            QuestionMark => (9, 10),
            BooleanOr => (13, 14),
            BooleanAnd => (15, 16),
            BitwiseOr => (17, 18),
            BitwiseXor => (19, 20),
            BitwiseAnd => (21, 22),
            IsEqual | IsNotEqual | IsIdentical | IsNotIdentical => (23, 24),
            IsSmaller | IsSmallerOrEqual | IsGreater | IsGreaterOrEqual => (25, 26),
            Sl | Sr => (27, 28),
            Plus | Minus | Concat => (29, 30),
            Mul | Div | Mod => (31, 32),
            Instanceof => (35, 36),
            _ => return self.parse_optional_expression_for_version(kind),
        };
        Some(bp)
    }

    fn parse_infix(&mut self, mut lhs: NodeId, min_bp: u8) -> Result<NodeId> {
        loop {
            let kind = self.peek();

            if kind.is_assignment_operator() && self.builder.kind(lhs).is_writable() {
                if kind == TokenKind::PowEqual && !self.dialect.has_pow() {
                    return Err(self.unexpected());
                }
                lhs = self.parse_assignment(lhs)?;
                continue;
            }

            let Some((l_bp, r_bp)) = self.infix_binding_power(kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            let op = self.next()?;
            lhs = match kind {
                TokenKind::QuestionMark => self.parse_conditional(lhs, &op, r_bp)?,
                TokenKind::Instanceof => {
                    let class = self.parse_class_reference()?;
                    self.builder.build(
                        NodeKind::InstanceOfExpression,
                        "instanceof",
                        op.span,
                        op.span,
                        vec![lhs, class],
                    )
                }
                _ => {
                    let rhs = self.parse_expression_bp(r_bp)?;
                    self.builder.build(
                        NodeKind::BinaryExpression,
                        op.image.as_str(),
                        op.span,
                        op.span,
                        vec![lhs, rhs],
                    )
                }
            };
        }
        Ok(lhs)
    }

    /// `$a = b`, `$a += b`, `$a = &$b`
    fn parse_assignment(&mut self, lhs: NodeId) -> Result<NodeId> {
        let op = self.next()?;
        let by_reference = op.kind == TokenKind::Equal && self.eat(TokenKind::BitwiseAnd).is_some();
        let rhs = self.parse_expression_bp(ASSIGNMENT_BP)?;

        let image = if by_reference { "=&" } else { op.image.as_str() };
        let assignment = self.builder.build(
            NodeKind::AssignmentExpression,
            image,
            op.span,
            op.span,
            vec![lhs, rhs],
        );
        if by_reference {
            self.builder.set_modifiers(assignment, Modifiers::BY_REFERENCE);
        }
        Ok(assignment)
    }

    /// `c ? a : b` and `c ?: b`
    fn parse_conditional(&mut self, condition: NodeId, op: &Token, r_bp: u8) -> Result<NodeId> {
        let mut children = vec![condition];
        if self.peek() != TokenKind::Colon {
            children.push(self.parse_expression()?);
        }
        self.consume(TokenKind::Colon)?;
        children.push(self.parse_expression_bp(r_bp)?);
        Ok(self
            .builder
            .build(NodeKind::ConditionalExpression, "?", op.span, self.last, children))
    }

    // ========== Prefix ==========

    fn parse_unary(&mut self) -> Result<NodeId> {
        use TokenKind::*;
        match self.peek() {
            BooleanNot => self.parse_prefix(NodeKind::UnaryExpression, NOT_BP),
            BitwiseNot | Minus | Plus | At => self.parse_prefix(NodeKind::UnaryExpression, PREFIX_BP),
            kind if kind.is_cast() => self.parse_prefix(NodeKind::CastExpression, PREFIX_BP),
            Inc => self.parse_prefix(NodeKind::PreIncrementExpression, PREFIX_BP),
            Dec => self.parse_prefix(NodeKind::PreDecrementExpression, PREFIX_BP),
            Clone => self.parse_prefix(NodeKind::CloneExpression, PREFIX_BP),
            Print => self.parse_prefix(NodeKind::PrintExpression, ASSIGNMENT_BP),
            Include | IncludeOnce => self.parse_prefix(NodeKind::IncludeExpression, ASSIGNMENT_BP),
            Require | RequireOnce => self.parse_prefix(NodeKind::RequireExpression, ASSIGNMENT_BP),
            New => {
                let allocation = self.parse_allocation()?;
                self.parse_postfix(allocation)
            }
            Yield if self.dialect.has_generators() => self.parse_yield(),
            _ => {
                let primary = self.parse_primary()?;
                self.parse_postfix(primary)
            }
        }
    }

    fn parse_prefix(&mut self, kind: NodeKind, bp: u8) -> Result<NodeId> {
        let op = self.next()?;
        let operand = self.parse_expression_bp(bp)?;
        let image = op.image.to_ascii_lowercase();
        Ok(self.node(kind, image, op.span, vec![operand]))
    }

    /// `yield`, `yield $v`, `yield $k => $v`
    fn parse_yield(&mut self) -> Result<NodeId> {
        let token = self.consume(TokenKind::Yield)?;
        let mut children = Vec::new();
        let ends = [
            TokenKind::Semicolon,
            TokenKind::CloseTag,
            TokenKind::ParenthesisClose,
            TokenKind::SquaredBracketClose,
            TokenKind::Comma,
        ];
        if !ends.contains(&self.peek()) {
            children.push(self.parse_expression_bp(ASSIGNMENT_BP)?);
            if self.eat(TokenKind::DoubleArrow).is_some() {
                children.push(self.parse_expression_bp(ASSIGNMENT_BP)?);
            }
        }
        Ok(self.node(NodeKind::YieldExpression, "yield", token.span, children))
    }

    // ========== Primary ==========

    fn parse_primary(&mut self) -> Result<NodeId> {
        use TokenKind::*;
        match self.peek() {
            Variable | Dollar => self.parse_compound_variable_or_variable_variable_or_variable(),
            LNumber | DNumber | ConstantEncapsedString | True | False | Null => self.parse_literal(),
            StartHeredoc => self.parse_heredoc(),
            kind if kind.is_magic_constant() => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::MagicConstant, &token))
            }
            Array | SquaredBracketOpen if self.is_array_start_delimiter() => self.parse_array(false),
            List => self.parse_list(),
            Isset => {
                let token = self.next()?;
                self.consume(ParenthesisOpen)?;
                let children = self.parse_comma_list(ParenthesisClose, |p| p.parse_expression())?;
                self.consume(ParenthesisClose)?;
                Ok(self.node(NodeKind::IssetExpression, "isset", token.span, children))
            }
            Empty => {
                let token = self.next()?;
                let expression = self.parse_condition()?;
                Ok(self.node(NodeKind::EmptyExpression, "empty", token.span, vec![expression]))
            }
            Exit => self.parse_exit(),
            ParenthesisOpen => {
                let open = self.next()?;
                let expression = self.parse_expression()?;
                self.consume(ParenthesisClose)?;
                Ok(self.node(NodeKind::ParenthesizedExpression, "", open.span, vec![expression]))
            }
            Function if self.dialect.has_closures() => {
                let first = self.next()?.span;
                let by_reference = self.eat(BitwiseAnd).is_some();
                self.parse_closure_rest(first, by_reference, false)
            }
            Static => {
                let token = self.next()?;
                self.parse_static_primary(token)
            }
            SelfKw => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::SelfReference, &token))
            }
            Parent => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::ParentReference, &token))
            }
            String | Backslash | Namespace => self.parse_name_primary(),
            kind if self.dialect.is_function_name(kind) || self.dialect.is_class_name(kind) => {
                self.parse_name_primary()
            }
            _ => Err(self.unexpected()),
        }
    }

    pub(crate) fn parse_literal(&mut self) -> Result<NodeId> {
        let token = self.next()?;
        let kind = match token.kind {
            TokenKind::LNumber => LiteralKind::Integer,
            TokenKind::DNumber => LiteralKind::Float,
            TokenKind::ConstantEncapsedString => LiteralKind::String,
            TokenKind::True | TokenKind::False => LiteralKind::Boolean,
            TokenKind::Null => LiteralKind::Null,
            _ => return Err(self.unexpected_token(token)),
        };
        Ok(self.leaf(NodeKind::Literal(kind), &token))
    }

    /// `exit`, `exit(1)`, `die("message")`
    fn parse_exit(&mut self) -> Result<NodeId> {
        let token = self.consume(TokenKind::Exit)?;
        let mut children = Vec::new();
        if self.eat(TokenKind::ParenthesisOpen).is_some() {
            if self.peek() != TokenKind::ParenthesisClose {
                children.push(self.parse_expression()?);
            }
            self.consume(TokenKind::ParenthesisClose)?;
        }
        let image = token.image.to_ascii_lowercase();
        Ok(self.node(NodeKind::ExitExpression, image, token.span, children))
    }

    /// `list($a, , list($b, $c))`
    fn parse_list(&mut self) -> Result<NodeId> {
        let token = self.consume(TokenKind::List)?;
        self.consume(TokenKind::ParenthesisOpen)?;
        let elements = self.parse_array_elements(TokenKind::ParenthesisClose, false)?;
        self.consume(TokenKind::ParenthesisClose)?;
        Ok(self.node(NodeKind::ListExpression, "list", token.span, elements))
    }

    fn parse_name_primary(&mut self) -> Result<NodeId> {
        let (name, first) = self.parse_qualified_name()?;
        self.finish_name_primary(name, first)
    }

    /// Continue a name whose first segment was consumed as `image`.
    pub(crate) fn parse_name_primary_from(&mut self, image: String, first: Span) -> Result<NodeId> {
        let name = self.continue_qualified_name(image)?;
        self.finish_name_primary(name, first)
    }

    /// A complete name is a function call, a class reference before `::`,
    /// or a constant.
    /// 完整名称可能是函数调用、`::` 之前的类引用或常量。
    pub(crate) fn finish_name_primary(&mut self, name: String, first: Span) -> Result<NodeId> {
        let name_span = first.merge(self.last);
        match self.peek() {
            TokenKind::ParenthesisOpen => {
                let identifier = self.builder.leaf(NodeKind::Identifier, name.as_str(), name_span);
                let arguments = self.parse_arguments()?;
                Ok(self.node(NodeKind::FunctionPostfix, name, first, vec![identifier, arguments]))
            }
            TokenKind::DoubleColon => {
                Ok(self.builder.leaf(NodeKind::ClassReference, name, name_span))
            }
            _ => Ok(self.builder.leaf(NodeKind::Constant, name, name_span)),
        }
    }

    /// After a consumed `static`: a static closure or `static::`.
    pub(crate) fn parse_static_primary(&mut self, token: Token) -> Result<NodeId> {
        if !self.dialect.has_closures() {
            return Err(self.unexpected());
        }
        match self.peek() {
            TokenKind::Function => {
                self.next()?;
                let by_reference = self.eat(TokenKind::BitwiseAnd).is_some();
                self.parse_closure_rest(token.span, by_reference, true)
            }
            TokenKind::DoubleColon => Ok(self.leaf(NodeKind::StaticReference, &token)),
            _ => Err(self.unexpected()),
        }
    }

    /// Parameters, `use (...)`, return type and body of a closure.
    /// 闭包的参数、`use (...)`、返回类型和主体。
    pub(crate) fn parse_closure_rest(
        &mut self,
        first: Span,
        by_reference: bool,
        is_static: bool,
    ) -> Result<NodeId> {
        let mut children = vec![self.parse_formal_parameters()?];

        if let Some(token) = self.eat(TokenKind::Use) {
            self.consume(TokenKind::ParenthesisOpen)?;
            let variables = self.parse_comma_list(TokenKind::ParenthesisClose, |p| {
                let by_reference = p.eat(TokenKind::BitwiseAnd).is_some();
                let variable = p.consume(TokenKind::Variable)?;
                let node = p.leaf(NodeKind::Variable, &variable);
                if by_reference {
                    p.builder.set_modifiers(node, Modifiers::BY_REFERENCE);
                }
                Ok(node)
            })?;
            self.consume(TokenKind::ParenthesisClose)?;
            children.push(self.node(NodeKind::ClosureUses, "use", token.span, variables));
        }

        self.parse_callable_declaration_addition(&mut children)?;
        children.push(self.parse_scope()?);

        let closure = self.node(NodeKind::Closure, "", first, children);
        let mut modifiers = Modifiers::NONE;
        if by_reference {
            modifiers |= Modifiers::BY_REFERENCE;
        }
        if is_static {
            modifiers |= Modifiers::STATIC;
        }
        self.builder.set_modifiers(closure, modifiers);
        Ok(closure)
    }

    /// `$a`, `$$a` or `${expr}`
    pub(crate) fn parse_compound_variable_or_variable_variable_or_variable(
        &mut self,
    ) -> Result<NodeId> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Variable => Ok(self.leaf(NodeKind::Variable, &token)),
            TokenKind::Dollar => match self.peek() {
                TokenKind::CurlyBraceOpen => {
                    self.next()?;
                    let expression = self.parse_expression()?;
                    self.consume(TokenKind::CurlyBraceClose)?;
                    Ok(self.node(NodeKind::CompoundVariable, "$", token.span, vec![expression]))
                }
                TokenKind::Variable | TokenKind::Dollar => {
                    let inner = self.parse_compound_variable_or_variable_variable_or_variable()?;
                    Ok(self.node(NodeKind::VariableVariable, "$", token.span, vec![inner]))
                }
                _ => Err(self.unexpected()),
            },
            _ => Err(self.unexpected_token(token)),
        }
    }

    /// `{ expr }` used as a member name.
    pub(crate) fn parse_compound_expression(&mut self) -> Result<NodeId> {
        let open = self.consume(TokenKind::CurlyBraceOpen)?;
        let expression = self.parse_expression()?;
        self.consume(TokenKind::CurlyBraceClose)?;
        Ok(self.node(NodeKind::CompoundExpression, "", open.span, vec![expression]))
    }

    /// `( argument, ... )`; `...$x` unpacks, `&$x` passes by reference.
    /// 参数列表；`...$x` 展开参数，`&$x` 按引用传递。
    pub(crate) fn parse_arguments(&mut self) -> Result<NodeId> {
        let open = self.consume(TokenKind::ParenthesisOpen)?;
        let arguments = self.parse_comma_list(TokenKind::ParenthesisClose, |p| {
            let mut modifiers = Modifiers::NONE;
            match p.peek() {
                TokenKind::Ellipsis if p.dialect.has_variadics() => {
                    p.next()?;
                    modifiers = Modifiers::VARIADIC;
                }
                TokenKind::Ellipsis => return Err(p.unexpected()),
                TokenKind::BitwiseAnd => {
                    p.next()?;
                    modifiers = Modifiers::BY_REFERENCE;
                }
                _ => {}
            }
            let argument = p.parse_expression()?;
            if !modifiers.is_empty() {
                p.builder.add_modifiers(argument, modifiers);
            }
            Ok(argument)
        })?;
        self.consume(TokenKind::ParenthesisClose)?;
        Ok(self.node(NodeKind::Arguments, "", open.span, arguments))
    }

    // ========== Postfix ==========

    fn parse_postfix(&mut self, mut node: NodeId) -> Result<NodeId> {
        loop {
            node = match self.peek() {
                TokenKind::SquaredBracketOpen => self.parse_index(node)?,
                TokenKind::CurlyBraceOpen if self.builder.kind(node).is_writable() => {
                    self.parse_index(node)?
                }
                TokenKind::ObjectOperator => {
                    let op = self.next()?;
                    let identifier = self.parse_postfix_identifier()?;
                    let member = self.parse_member_postfix(identifier, false)?;
                    self.member_primary_prefix(node, &op, member)
                }
                TokenKind::DoubleColon => {
                    let op = self.next()?;
                    let member = self.parse_static_member()?;
                    self.member_primary_prefix(node, &op, member)
                }
                TokenKind::ParenthesisOpen => {
                    let arguments = self.parse_arguments()?;
                    let image = self.builder.image(node).to_string();
                    let first = self.builder.span(node);
                    self.node(NodeKind::FunctionPostfix, image, first, vec![node, arguments])
                }
                TokenKind::Inc | TokenKind::Dec => {
                    let op = self.next()?;
                    let kind = if op.kind == TokenKind::Inc {
                        NodeKind::PostIncrementExpression
                    } else {
                        NodeKind::PostDecrementExpression
                    };
                    self.builder
                        .build(kind, op.image.as_str(), op.span, op.span, vec![node])
                }
                _ => return Ok(node),
            };
        }
    }

    /// `[expr]`, `[]` or `{expr}` after `node`.
    /// 在 `node` 之后的索引访问。
    pub(crate) fn parse_index(&mut self, node: NodeId) -> Result<NodeId> {
        let first = self.builder.span(node);
        let open = self.next()?;
        let (kind, close) = match open.kind {
            TokenKind::SquaredBracketOpen => {
                (NodeKind::ArrayIndexExpression, TokenKind::SquaredBracketClose)
            }
            TokenKind::CurlyBraceOpen => {
                (NodeKind::StringIndexExpression, TokenKind::CurlyBraceClose)
            }
            _ => return Err(self.unexpected_token(open)),
        };

        let mut children = vec![node];
        if self.peek() != close {
            children.push(self.parse_expression()?);
        }
        self.consume(close)?;
        Ok(self.node(kind, "", first, children))
    }

    /// Apply any number of trailing `[...]` / `{...}` indexes.
    pub(crate) fn parse_optional_index_expression(&mut self, mut node: NodeId) -> Result<NodeId> {
        while matches!(
            self.peek(),
            TokenKind::SquaredBracketOpen | TokenKind::CurlyBraceOpen
        ) {
            node = self.parse_index(node)?;
        }
        Ok(node)
    }

    /// Method call if arguments follow, otherwise a property access.
    fn parse_member_postfix(&mut self, identifier: NodeId, is_constant: bool) -> Result<NodeId> {
        let first = self.builder.span(identifier);
        let image = self.member_name(identifier);
        if self.peek() == TokenKind::ParenthesisOpen {
            let arguments = self.parse_arguments()?;
            return Ok(self.node(NodeKind::MethodPostfix, image, first, vec![identifier, arguments]));
        }
        let kind = if is_constant {
            NodeKind::ConstantPostfix
        } else {
            NodeKind::PropertyPostfix
        };
        Ok(self.node(kind, image, first, vec![identifier]))
    }

    /// Member after `::`: `$prop`, `CONST`, `class`, `method()` or `{expr}()`.
    fn parse_static_member(&mut self) -> Result<NodeId> {
        match self.peek() {
            TokenKind::Variable | TokenKind::Dollar => {
                let variable = self.parse_compound_variable_or_variable_variable_or_variable()?;
                self.parse_member_postfix(variable, false)
            }
            TokenKind::CurlyBraceOpen => {
                let expression = self.parse_compound_expression()?;
                self.parse_member_postfix(expression, false)
            }
            kind if kind.is_word() => {
                let token = self.next()?;
                let identifier = self.leaf(NodeKind::Identifier, &token);
                self.parse_member_postfix(identifier, true)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Name of a member, looking through trailing index expressions.
    fn member_name(&self, mut id: NodeId) -> String {
        while matches!(
            self.builder.kind(id),
            NodeKind::ArrayIndexExpression | NodeKind::StringIndexExpression
        ) {
            match self.builder.children(id).first() {
                Some(&inner) => id = inner,
                None => break,
            }
        }
        self.builder.image(id).to_string()
    }

    pub(crate) fn member_primary_prefix(&mut self, node: NodeId, op: &Token, member: NodeId) -> NodeId {
        let first = self.builder.span(node);
        self.builder.build(
            NodeKind::MemberPrimaryPrefix,
            op.image.as_str(),
            first,
            self.last,
            vec![node, member],
        )
    }

    // ========== Allocation ==========

    /// `new Foo(...)`, `new static`, `new $class->name(...)`
    fn parse_allocation(&mut self) -> Result<NodeId> {
        let token = self.consume(TokenKind::New)?;
        let mut children = vec![self.parse_class_reference()?];
        if self.peek() == TokenKind::ParenthesisOpen {
            children.push(self.parse_arguments()?);
        }
        Ok(self.node(NodeKind::AllocationExpression, "new", token.span, children))
    }

    /// Class operand of `new` and `instanceof`.
    /// `new` 和 `instanceof` 的类操作数。
    fn parse_class_reference(&mut self) -> Result<NodeId> {
        match self.peek() {
            TokenKind::Static if self.dialect.has_closures() => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::StaticReference, &token))
            }
            TokenKind::SelfKw => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::SelfReference, &token))
            }
            TokenKind::Parent => {
                let token = self.next()?;
                Ok(self.leaf(NodeKind::ParentReference, &token))
            }
            TokenKind::Variable | TokenKind::Dollar => self.parse_variable_class_reference(),
            kind if kind == TokenKind::Backslash
                || kind == TokenKind::Namespace
                || self.dialect.is_class_name(kind) =>
            {
                let (name, first) = self.parse_qualified_name()?;
                Ok(self.node(NodeKind::ClassReference, name, first, vec![]))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// A variable with member and index accesses but no calls.
    fn parse_variable_class_reference(&mut self) -> Result<NodeId> {
        let mut node = self.parse_compound_variable_or_variable_variable_or_variable()?;
        loop {
            node = match self.peek() {
                TokenKind::ObjectOperator => {
                    let op = self.next()?;
                    let identifier = self.parse_postfix_identifier()?;
                    let first = self.builder.span(identifier);
                    let image = self.member_name(identifier);
                    let property = self.node(NodeKind::PropertyPostfix, image, first, vec![identifier]);
                    self.member_primary_prefix(node, &op, property)
                }
                TokenKind::DoubleColon => {
                    let op = self.next()?;
                    let variable = self.parse_compound_variable_or_variable_variable_or_variable()?;
                    let first = self.builder.span(variable);
                    let image = self.builder.image(variable).to_string();
                    let property = self.node(NodeKind::PropertyPostfix, image, first, vec![variable]);
                    self.member_primary_prefix(node, &op, property)
                }
                TokenKind::SquaredBracketOpen | TokenKind::CurlyBraceOpen => self.parse_index(node)?,
                _ => return Ok(node),
            };
        }
    }
}
