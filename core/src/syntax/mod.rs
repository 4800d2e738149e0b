//! Expression-tree node and operator types.

mod node;
mod ops;

pub use node::{LiteralValue, Node, NodeKind, RegexLiteral, TemplateElementValue};
pub use ops::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};

#[cfg(test)]
mod node_test;
