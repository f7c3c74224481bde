//! Syntax tree for PHP source.
//!
//! This crate defines the arena-based AST produced by the parser and the
//! builder that fills it. Every node records its kind, image, span,
//! children, modifiers and a non-owning link to its parent.

mod ast;
mod builder;
mod kind;
mod modifiers;

pub use ast::{Ast, Descendants, Node, NodeId};
pub use builder::AstBuilder;
pub use kind::{ArrayStyle, LiteralKind, NodeKind};
pub use modifiers::Modifiers;
