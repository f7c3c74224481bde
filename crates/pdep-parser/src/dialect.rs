//! Language generations understood by the parser.
//! 解析器支持的语言版本。
//!
//! Each PHP generation is a [`Dialect`]. Token-level decisions are pure
//! functions of `(dialect, token kind)`; grammar extensions are looked up
//! by walking [`Dialect::fallback_chain`], newest generation first.

use pdep_lexer::TokenKind;
use std::fmt;
use std::str::FromStr;

/// A supported PHP language generation.
/// 支持的 PHP 语言版本。
///
/// Variants are ordered by age, with `Generic` newest, so `dialect >=
/// Dialect::Php54` reads as "5.4 or later".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Dialect {
    Php52,
    Php53,
    Php54,
    Php55,
    Php56,
    Php70,
    /// Accepts the union of every generation plus some forward-looking forms.
    /// 接受所有版本的并集以及一些前瞻性的写法。
    #[default]
    Generic,
}

impl Dialect {
    pub const ALL: [Dialect; 7] = [
        Dialect::Php52,
        Dialect::Php53,
        Dialect::Php54,
        Dialect::Php55,
        Dialect::Php56,
        Dialect::Php70,
        Dialect::Generic,
    ];

    /// The generation this one overrides, if any.
    /// 当前版本所覆盖的上一版本。
    pub fn parent(self) -> Option<Dialect> {
        match self {
            Dialect::Php52 => None,
            Dialect::Php53 => Some(Dialect::Php52),
            Dialect::Php54 => Some(Dialect::Php53),
            Dialect::Php55 => Some(Dialect::Php54),
            Dialect::Php56 => Some(Dialect::Php55),
            Dialect::Php70 => Some(Dialect::Php56),
            Dialect::Generic => Some(Dialect::Php70),
        }
    }

    /// This dialect followed by every generation it builds on, newest first.
    /// 当前版本及其所继承的所有版本，从新到旧排列。
    pub fn fallback_chain(self) -> Vec<Dialect> {
        std::iter::successors(Some(self), |d| d.parent()).collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Php52 => "php52",
            Dialect::Php53 => "php53",
            Dialect::Php54 => "php54",
            Dialect::Php55 => "php55",
            Dialect::Php56 => "php56",
            Dialect::Php70 => "php70",
            Dialect::Generic => "generic",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Dialect::Php52 => "PHP 5.2",
            Dialect::Php53 => "PHP 5.3, namespaces and closures",
            Dialect::Php54 => "PHP 5.4, traits, short arrays and callable",
            Dialect::Php55 => "PHP 5.5, generators and finally",
            Dialect::Php56 => "PHP 5.6, variadics, `**` and constant expressions",
            Dialect::Php70 => "PHP 7.0, scalar and return types, `<=>` and `??`",
            Dialect::Generic => "tolerant union of all generations",
        }
    }

    /// Reserved in this dialect, so it cannot name a member.
    /// 在此版本中为保留字，因此不能用作成员名。
    pub fn is_keyword(self, kind: TokenKind) -> bool {
        match self {
            Dialect::Php70 | Dialect::Generic => {
                matches!(kind, TokenKind::Class | TokenKind::Interface)
            }
            _ => kind.is_reserved_word(),
        }
    }

    /// Tokens that may spell a class name.
    /// 可以作为类名的 token。
    pub fn is_class_name(self, kind: TokenKind) -> bool {
        use TokenKind::*;
        match self {
            Dialect::Generic => matches!(
                kind,
                String
                    | Dir
                    | Use
                    | Goto
                    | Null
                    | NsC
                    | True
                    | Clone
                    | False
                    | Trait
                    | TraitC
                    | Insteadof
                    | Namespace
            ),
            // `trait`, `insteadof` and `callable` were not reserved yet
            Dialect::Php52 | Dialect::Php53 => matches!(
                kind,
                String | Null | True | False | Dir | NsC | Trait | TraitC | Insteadof | Callable
            ),
            _ => matches!(kind, String | Null | True | False | Dir | NsC | TraitC),
        }
    }

    /// Tokens that may spell a function name.
    /// 可以作为函数名的 token。
    pub fn is_function_name(self, kind: TokenKind) -> bool {
        use TokenKind::*;
        match self {
            Dialect::Generic => {
                self.is_class_name(kind) || matches!(kind, SelfKw | Parent | Yield)
            }
            _ => self.is_class_name(kind) || matches!(kind, SelfKw | Parent),
        }
    }

    /// Tokens that may start a type hint.
    /// 可以开始类型提示的 token。
    pub fn is_type_hint(self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::String | TokenKind::Backslash | TokenKind::Namespace | TokenKind::Callable => {
                true
            }
            _ => false,
        }
    }

    /// `callable` as a type of its own; earlier it names a class.
    /// `callable` 作为独立类型；更早版本中它只是类名。
    pub fn has_callable_type(self) -> bool {
        self >= Dialect::Php54
    }

    /// `int`, `bool`, `float` and `string` type hints.
    pub fn has_scalar_type_hints(self) -> bool {
        self >= Dialect::Php70
    }

    /// `function f(): T`.
    pub fn has_return_types(self) -> bool {
        self >= Dialect::Php70
    }

    /// `[1, 2]`.
    pub fn has_short_arrays(self) -> bool {
        self >= Dialect::Php54
    }

    /// Variadic parameters and argument unpacking with `...`.
    pub fn has_variadics(self) -> bool {
        self >= Dialect::Php56
    }

    /// `namespace` declarations, qualified names and `use` imports.
    /// `namespace` 声明、限定名称和 `use` 导入。
    pub fn has_namespaces(self) -> bool {
        self >= Dialect::Php53
    }

    /// Closures and late static binding through `static::`.
    /// 闭包以及通过 `static::` 的后期静态绑定。
    pub fn has_closures(self) -> bool {
        self >= Dialect::Php53
    }

    /// `yield`.
    pub fn has_generators(self) -> bool {
        self >= Dialect::Php55
    }

    /// `try {} finally {}`.
    pub fn has_finally(self) -> bool {
        self >= Dialect::Php55
    }

    /// `**` and `**=`.
    pub fn has_pow(self) -> bool {
        self >= Dialect::Php56
    }

    /// The 5.2 generation leaves one dangling token after a heredoc label.
    /// 5.2 版本在 heredoc 结束标签之后会遗留一个 token。
    pub fn has_legacy_heredoc_terminator(self) -> bool {
        self == Dialect::Php52
    }

    /// Binary operators added to constant expressions by this exact generation.
    /// 此版本本身为常量表达式添加的二元运算符。
    pub(crate) fn static_binary_operators(self) -> &'static [TokenKind] {
        use TokenKind::*;
        match self {
            Dialect::Php56 => &[
                Plus, Minus, Mul, Div, Mod, Concat, BitwiseAnd, BitwiseOr, BitwiseXor,
            ],
            Dialect::Generic => &[Sl, Sr],
            _ => &[],
        }
    }

    /// Binary operators introduced by this exact generation.
    /// 此版本本身引入的二元运算符。
    pub(crate) fn extra_binary_operators(self) -> &'static [TokenKind] {
        match self {
            Dialect::Php56 => &[TokenKind::Pow],
            Dialect::Php70 => &[TokenKind::Spaceship, TokenKind::Coalesce],
            _ => &[],
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}` (expected one of 5.2, 5.3, 5.4, 5.5, 5.6, 7.0, generic)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let version = normalized
            .strip_prefix("php")
            .unwrap_or(&normalized)
            .replace('.', "");
        match version.as_str() {
            "52" => Ok(Dialect::Php52),
            "53" => Ok(Dialect::Php53),
            "54" => Ok(Dialect::Php54),
            "55" => Ok(Dialect::Php55),
            "56" => Ok(Dialect::Php56),
            "70" | "7" => Ok(Dialect::Php70),
            "generic" | "latest" => Ok(Dialect::Generic),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
