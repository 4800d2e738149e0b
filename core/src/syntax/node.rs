//! The expression-tree node model.
//!
//! [`Node`] is a closed enum over the ESTree/babel node kinds the
//! evaluator understands, deserializable straight from babel's JSON output
//! via the `type` tag:
//!
//! ```
//! use estree_eval_core::syntax::Node;
//!
//! let tree: Node = serde_json::from_str(
//!     r#"{"type": "BinaryExpression", "operator": "+",
//!         "left": {"type": "NumericLiteral", "value": 1},
//!         "right": {"type": "NumericLiteral", "value": 2}}"#,
//! ).unwrap();
//! assert_eq!(tree.kind().name(), "BinaryExpression");
//! ```
//!
//! Unknown JSON fields (source locations, `start`/`end`, comments) are
//! ignored, so full parser output deserializes without stripping.

use core::fmt;

use ecow::EcoString;
use serde::{Deserialize, Serialize};

use super::ops::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};

/// One node of an ESTree expression tree.
///
/// The enum is closed: a `type` tag outside this set fails to
/// deserialize, which is the first line of defense against statement-level
/// constructs reaching the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    // Literals (babel flavor).
    NumericLiteral {
        value: f64,
    },
    StringLiteral {
        value: EcoString,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,
    BigIntLiteral {
        /// Digits without the trailing `n`.
        value: EcoString,
    },
    RegExpLiteral {
        pattern: EcoString,
        #[serde(default)]
        flags: EcoString,
    },
    /// Plain ESTree `Literal`, produced by esprima-family parsers.
    Literal {
        #[serde(default)]
        value: LiteralValue,
        #[serde(default)]
        regex: Option<RegexLiteral>,
    },

    // Names and scope.
    Identifier {
        name: EcoString,
    },
    ThisExpression,

    // Templates.
    TemplateLiteral {
        quasis: Vec<Node>,
        expressions: Vec<Node>,
    },
    TemplateElement {
        value: TemplateElementValue,
        #[serde(default)]
        tail: bool,
    },

    // Containers.
    ArrayExpression {
        /// `None` marks an elision (`[,1]`).
        elements: Vec<Option<Node>>,
    },
    ObjectExpression {
        properties: Vec<Node>,
    },
    #[serde(alias = "Property")]
    ObjectProperty {
        key: Box<Node>,
        value: Box<Node>,
        #[serde(default)]
        computed: bool,
        #[serde(default)]
        shorthand: bool,
    },
    SpreadElement {
        argument: Box<Node>,
    },

    // Member access.
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        #[serde(default)]
        computed: bool,
        #[serde(default)]
        optional: bool,
    },
    OptionalMemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        #[serde(default)]
        computed: bool,
    },

    // Operators.
    BinaryExpression {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: LogicalOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryExpression {
        operator: UnaryOperator,
        argument: Box<Node>,
    },
    UpdateExpression {
        operator: UpdateOperator,
        argument: Box<Node>,
        #[serde(default)]
        prefix: bool,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    AssignmentExpression {
        operator: AssignmentOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    SequenceExpression {
        expressions: Vec<Node>,
    },

    // Invocation (gated behind `EvalOptions::functions`).
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
        #[serde(default)]
        optional: bool,
    },
    OptionalCallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        callee: Box<Node>,
        #[serde(default)]
        arguments: Vec<Node>,
    },
    FunctionExpression {
        params: Vec<Node>,
        body: Box<Node>,
    },
    ArrowFunctionExpression {
        params: Vec<Node>,
        body: Box<Node>,
    },
    AwaitExpression {
        argument: Box<Node>,
    },
    TaggedTemplateExpression {
        tag: Box<Node>,
        quasi: Box<Node>,
    },

    // The statement kinds that can appear inside a function-expression body.
    BlockStatement {
        body: Vec<Node>,
    },
    ReturnStatement {
        #[serde(default)]
        argument: Option<Box<Node>>,
    },
    ExpressionStatement {
        expression: Box<Node>,
    },
}

/// The `value` payload of a plain ESTree `Literal`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(EcoString),
}

/// The `regex` payload of a plain ESTree `Literal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexLiteral {
    pub pattern: EcoString,
    #[serde(default)]
    pub flags: EcoString,
}

/// The `value` payload of a `TemplateElement`.
///
/// `cooked` is null in babel output when the raw text contains an invalid
/// escape sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateElementValue {
    #[serde(default)]
    pub cooked: Option<EcoString>,
    #[serde(default)]
    pub raw: EcoString,
}

impl Node {
    /// The node's kind tag, for dispatch and messages.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::NumericLiteral { .. } => NodeKind::NumericLiteral,
            Node::StringLiteral { .. } => NodeKind::StringLiteral,
            Node::BooleanLiteral { .. } => NodeKind::BooleanLiteral,
            Node::NullLiteral => NodeKind::NullLiteral,
            Node::BigIntLiteral { .. } => NodeKind::BigIntLiteral,
            Node::RegExpLiteral { .. } => NodeKind::RegExpLiteral,
            Node::Literal { .. } => NodeKind::Literal,
            Node::Identifier { .. } => NodeKind::Identifier,
            Node::ThisExpression => NodeKind::ThisExpression,
            Node::TemplateLiteral { .. } => NodeKind::TemplateLiteral,
            Node::TemplateElement { .. } => NodeKind::TemplateElement,
            Node::ArrayExpression { .. } => NodeKind::ArrayExpression,
            Node::ObjectExpression { .. } => NodeKind::ObjectExpression,
            Node::ObjectProperty { .. } => NodeKind::ObjectProperty,
            Node::SpreadElement { .. } => NodeKind::SpreadElement,
            Node::MemberExpression { .. } => NodeKind::MemberExpression,
            Node::OptionalMemberExpression { .. } => NodeKind::OptionalMemberExpression,
            Node::BinaryExpression { .. } => NodeKind::BinaryExpression,
            Node::LogicalExpression { .. } => NodeKind::LogicalExpression,
            Node::UnaryExpression { .. } => NodeKind::UnaryExpression,
            Node::UpdateExpression { .. } => NodeKind::UpdateExpression,
            Node::ConditionalExpression { .. } => NodeKind::ConditionalExpression,
            Node::AssignmentExpression { .. } => NodeKind::AssignmentExpression,
            Node::SequenceExpression { .. } => NodeKind::SequenceExpression,
            Node::CallExpression { .. } => NodeKind::CallExpression,
            Node::OptionalCallExpression { .. } => NodeKind::OptionalCallExpression,
            Node::NewExpression { .. } => NodeKind::NewExpression,
            Node::FunctionExpression { .. } => NodeKind::FunctionExpression,
            Node::ArrowFunctionExpression { .. } => NodeKind::ArrowFunctionExpression,
            Node::AwaitExpression { .. } => NodeKind::AwaitExpression,
            Node::TaggedTemplateExpression { .. } => NodeKind::TaggedTemplateExpression,
            Node::BlockStatement { .. } => NodeKind::BlockStatement,
            Node::ReturnStatement { .. } => NodeKind::ReturnStatement,
            Node::ExpressionStatement { .. } => NodeKind::ExpressionStatement,
        }
    }

    /// True for the container kinds whose construction opens an
    /// escalation region for unresolved identifiers.
    pub(crate) fn is_container(&self) -> bool {
        matches!(
            self,
            Node::ArrayExpression { .. } | Node::ObjectExpression { .. }
        )
    }
}

/// Kind tag for a [`Node`], usable as a map key (e.g. for visitor
/// overrides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    NumericLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    BigIntLiteral,
    RegExpLiteral,
    Literal,
    Identifier,
    ThisExpression,
    TemplateLiteral,
    TemplateElement,
    ArrayExpression,
    ObjectExpression,
    ObjectProperty,
    SpreadElement,
    MemberExpression,
    OptionalMemberExpression,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression,
    UpdateExpression,
    ConditionalExpression,
    AssignmentExpression,
    SequenceExpression,
    CallExpression,
    OptionalCallExpression,
    NewExpression,
    FunctionExpression,
    ArrowFunctionExpression,
    AwaitExpression,
    TaggedTemplateExpression,
    BlockStatement,
    ReturnStatement,
    ExpressionStatement,
}

impl NodeKind {
    /// The ESTree `type` string for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NumericLiteral => "NumericLiteral",
            Self::StringLiteral => "StringLiteral",
            Self::BooleanLiteral => "BooleanLiteral",
            Self::NullLiteral => "NullLiteral",
            Self::BigIntLiteral => "BigIntLiteral",
            Self::RegExpLiteral => "RegExpLiteral",
            Self::Literal => "Literal",
            Self::Identifier => "Identifier",
            Self::ThisExpression => "ThisExpression",
            Self::TemplateLiteral => "TemplateLiteral",
            Self::TemplateElement => "TemplateElement",
            Self::ArrayExpression => "ArrayExpression",
            Self::ObjectExpression => "ObjectExpression",
            Self::ObjectProperty => "ObjectProperty",
            Self::SpreadElement => "SpreadElement",
            Self::MemberExpression => "MemberExpression",
            Self::OptionalMemberExpression => "OptionalMemberExpression",
            Self::BinaryExpression => "BinaryExpression",
            Self::LogicalExpression => "LogicalExpression",
            Self::UnaryExpression => "UnaryExpression",
            Self::UpdateExpression => "UpdateExpression",
            Self::ConditionalExpression => "ConditionalExpression",
            Self::AssignmentExpression => "AssignmentExpression",
            Self::SequenceExpression => "SequenceExpression",
            Self::CallExpression => "CallExpression",
            Self::OptionalCallExpression => "OptionalCallExpression",
            Self::NewExpression => "NewExpression",
            Self::FunctionExpression => "FunctionExpression",
            Self::ArrowFunctionExpression => "ArrowFunctionExpression",
            Self::AwaitExpression => "AwaitExpression",
            Self::TaggedTemplateExpression => "TaggedTemplateExpression",
            Self::BlockStatement => "BlockStatement",
            Self::ReturnStatement => "ReturnStatement",
            Self::ExpressionStatement => "ExpressionStatement",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
