//! Node factory used by the parser.
//! 解析器使用的节点工厂。

use crate::{Ast, Modifiers, Node, NodeId, NodeKind};
use pdep_common::Span;

/// Builds the nodes of one [`Ast`].
/// 构建单个 [`Ast`] 的节点。
///
/// The builder never sees tokens; callers pass the spans of the first and
/// last token of a construct. Children must be built before their parent,
/// and each child can be adopted by exactly one parent.
#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and adopt `children`.
    /// 创建一个节点并收养 `children`。
    ///
    /// The span runs from `first` to `last` and is widened to cover every
    /// child.
    pub fn build(
        &mut self,
        kind: NodeKind,
        image: impl Into<String>,
        first: Span,
        last: Span,
        children: Vec<NodeId>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let span = children
            .iter()
            .fold(first.merge(last), |span, child| span.merge(self.nodes[child.index()].span));

        for child in &children {
            self.adopt(id, *child);
        }

        self.nodes.push(Node {
            kind,
            image: image.into(),
            span,
            children,
            modifiers: Modifiers::NONE,
            parent: None,
            comment: None,
        });
        id
    }

    /// Create a node covering a single token.
    pub fn leaf(&mut self, kind: NodeKind, image: impl Into<String>, span: Span) -> NodeId {
        self.build(kind, image, span, span, Vec::new())
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        let node = &mut self.nodes[child.index()];
        debug_assert!(node.parent.is_none(), "node {child:?} adopted twice");
        node.parent = Some(parent);
    }

    /// Append `child` to an existing node, widening spans up the parent chain.
    /// 向已有节点追加 `child`，并沿父链扩展范围。
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.adopt(parent, child);
        let child_span = self.nodes[child.index()].span;
        self.nodes[parent.index()].children.push(child);

        let mut current = Some(parent);
        while let Some(id) = current {
            let node = &mut self.nodes[id.index()];
            if node.span.contains(child_span) {
                break;
            }
            node.span = node.span.merge(child_span);
            current = node.parent;
        }
    }

    pub fn set_modifiers(&mut self, id: NodeId, modifiers: Modifiers) {
        self.nodes[id.index()].modifiers = modifiers;
    }

    pub fn add_modifiers(&mut self, id: NodeId, modifiers: Modifiers) {
        self.nodes[id.index()].modifiers |= modifiers;
    }

    pub fn set_comment(&mut self, id: NodeId, comment: Option<String>) {
        self.nodes[id.index()].comment = comment;
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn image(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].image
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Seal the arena with `root` as its compilation unit.
    /// 以 `root` 作为编译单元封存 arena。
    pub fn finish(self, root: NodeId) -> Ast {
        Ast {
            nodes: self.nodes,
            root,
        }
    }
}
