//! Arena-allocated syntax tree.
//! 基于 arena 分配的语法树。

use crate::{Modifiers, NodeKind};
use pdep_common::Span;
use serde::Serialize;

/// Index of a node inside its [`Ast`].
/// 节点在其 [`Ast`] 中的索引。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the syntax tree.
/// 语法树节点。
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) image: String,
    pub(crate) span: Span,
    pub(crate) children: Vec<NodeId>,
    pub(crate) modifiers: Modifiers,
    pub(crate) parent: Option<NodeId>,
    pub(crate) comment: Option<String>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Name, operator or literal text of the node; empty when it has none.
    /// 节点的名称、运算符或字面量文本；没有时为空。
    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The enclosing node; `None` only for the root.
    /// 外层节点；只有根节点为 `None`。
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Doc comment attached to a declaration.
    /// 附加在声明上的文档注释。
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// A complete syntax tree for one file.
/// 单个文件的完整语法树。
///
/// Nodes refer to each other through [`NodeId`]s into the same arena, so
/// parent links never own their targets.
#[derive(Debug, Clone, Serialize)]
pub struct Ast {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Ast {
    /// The compilation unit.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` comes from a different tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    /// Child nodes of `id` together with their ids.
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.children(id).iter().map(|&child| (child, self.node(child)))
    }

    /// The first child of `id` with the given kind.
    /// `id` 的第一个指定类型的子节点。
    pub fn first_child_of(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.node(child).kind == kind)
    }

    /// Depth-first, pre-order walk of the subtree below `id` (excluded).
    /// 对 `id` 之下的子树进行深度优先先序遍历（不含 `id` 本身）。
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = self.children(id).to_vec();
        stack.reverse();
        Descendants { ast: self, stack }
    }

    /// All nodes of the tree whose kind satisfies `predicate`, in source order.
    /// 类型满足 `predicate` 的所有节点，按源码顺序排列。
    pub fn find_all<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(NodeKind) -> bool,
    {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|&id| predicate(self.node(id).kind))
            .collect()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::new(index), node))
    }
}

/// Iterator returned by [`Ast::descendants`].
pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.ast.children(id).iter().rev().copied());
        Some(id)
    }
}
