//! Node kinds.
//! 节点类型。

use serde::Serialize;

/// Kind of literal.
/// 字面量的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
    Boolean,
    Null,
}

/// Surface syntax of an array literal.
/// 数组字面量的书写形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArrayStyle {
    /// `array(...)`
    Call,
    /// `[...]`
    Bracket,
}

/// Kind of an AST node.
/// AST 节点的类型。
///
/// The node image holds the name or operator where one exists: the class
/// name for `Class`, the operator for `BinaryExpression`, the variable for
/// `Variable`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    // File structure - 文件结构
    CompilationUnit,
    InlineHtml,
    Namespace,
    UseStatement,
    /// One imported name; an alias is an `Identifier` child.
    UseImport,
    ConstantDefinition,
    ConstantDeclarator,

    // Declarations - 声明
    Class,
    Interface,
    Trait,
    Function,
    Method,
    Closure,
    FormalParameters,
    FormalParameter,
    VariableDeclarator,
    FieldDeclaration,
    TraitUse,
    TraitAdaptation,
    TraitAdaptationAlias,
    TraitAdaptationPrecedence,
    TraitReference,

    // Types - 类型
    ScalarType,
    TypeCallable,
    TypeArray,
    ClassOrInterfaceReference,
    ClassReference,
    SelfReference,
    ParentReference,
    StaticReference,

    // Statements - 语句
    ScopeStatement,
    ExpressionStatement,
    EmptyStatement,
    IfStatement,
    ElseIfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForInit,
    ForCondition,
    ForUpdate,
    ForeachStatement,
    SwitchStatement,
    SwitchLabel,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    EchoStatement,
    GlobalStatement,
    StaticVariableDeclaration,
    UnsetStatement,
    ThrowStatement,
    TryStatement,
    CatchStatement,
    FinallyStatement,
    GotoStatement,
    LabelStatement,
    DeclareStatement,

    // Expressions - 表达式
    BinaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    UnaryExpression,
    CastExpression,
    PreIncrementExpression,
    PreDecrementExpression,
    PostIncrementExpression,
    PostDecrementExpression,
    InstanceOfExpression,
    Variable,
    VariableVariable,
    CompoundVariable,
    CompoundExpression,
    Literal(LiteralKind),
    Heredoc,
    Constant,
    MagicConstant,
    FunctionPostfix,
    MethodPostfix,
    PropertyPostfix,
    ConstantPostfix,
    MemberPrimaryPrefix,
    AllocationExpression,
    CloneExpression,
    Array(ArrayStyle),
    ArrayElement,
    ArrayIndexExpression,
    StringIndexExpression,
    ListExpression,
    IssetExpression,
    EmptyExpression,
    ExitExpression,
    PrintExpression,
    IncludeExpression,
    RequireExpression,
    YieldExpression,
    ClosureUses,
    Arguments,
    ParenthesizedExpression,
    Identifier,
}

impl NodeKind {
    /// Returns true for nodes that may appear on the left of an assignment.
    /// 如果节点可以出现在赋值左侧则返回 true。
    pub fn is_writable(&self) -> bool {
        matches!(
            self,
            NodeKind::Variable
                | NodeKind::VariableVariable
                | NodeKind::CompoundVariable
                | NodeKind::ArrayIndexExpression
                | NodeKind::StringIndexExpression
                | NodeKind::MemberPrimaryPrefix
                | NodeKind::PropertyPostfix
                | NodeKind::ListExpression
        )
    }

    /// Returns true for the type nodes produced by type hints.
    /// 如果是类型提示产生的类型节点则返回 true。
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::ScalarType
                | NodeKind::TypeCallable
                | NodeKind::TypeArray
                | NodeKind::ClassOrInterfaceReference
                | NodeKind::ClassReference
                | NodeKind::SelfReference
                | NodeKind::ParentReference
                | NodeKind::StaticReference
        )
    }

    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::Class
                | NodeKind::Interface
                | NodeKind::Trait
                | NodeKind::Function
                | NodeKind::Method
        )
    }
}
