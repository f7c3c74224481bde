//! Declaration modifiers.
//! 声明修饰符。

use serde::Serialize;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of modifier flags on a node.
/// 节点上的修饰符标志集合。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const PUBLIC: Modifiers = Modifiers(1 << 0);
    pub const PROTECTED: Modifiers = Modifiers(1 << 1);
    pub const PRIVATE: Modifiers = Modifiers(1 << 2);
    pub const STATIC: Modifiers = Modifiers(1 << 3);
    pub const ABSTRACT: Modifiers = Modifiers(1 << 4);
    pub const FINAL: Modifiers = Modifiers(1 << 5);
    pub const VARIADIC: Modifiers = Modifiers(1 << 6);
    pub const BY_REFERENCE: Modifiers = Modifiers(1 << 7);

    const NAMES: [(Modifiers, &'static str); 8] = [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PROTECTED, "protected"),
        (Modifiers::PRIVATE, "private"),
        (Modifiers::STATIC, "static"),
        (Modifiers::ABSTRACT, "abstract"),
        (Modifiers::FINAL, "final"),
        (Modifiers::VARIADIC, "variadic"),
        (Modifiers::BY_REFERENCE, "by-reference"),
    ];

    pub const VISIBILITY: Modifiers = Modifiers(
        Modifiers::PUBLIC.0 | Modifiers::PROTECTED.0 | Modifiers::PRIVATE.0,
    );

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every flag of `other` is set.
    /// 如果 `other` 的所有标志都已设置则返回 true。
    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Class members without explicit visibility are public.
    /// 没有显式可见性的类成员为 public。
    pub fn with_implicit_visibility(self) -> Modifiers {
        if self.0 & Modifiers::VISIBILITY.0 == 0 {
            self | Modifiers::PUBLIC
        } else {
            self
        }
    }

    /// Names of all set flags, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifiers({})", self.names().join(" | "))
    }
}
