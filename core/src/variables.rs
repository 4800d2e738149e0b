//! Free-variable extraction.
//!
//! Walks a tree without evaluating it and reports the identifier names an
//! evaluation would try to resolve, in source order. With `with_members`
//! set, member chains collapse into dotted paths (`a.b.c`) instead of
//! reporting only the root object.
//!
//! The walk visits children right-to-left and reverses at the end, so
//! that `a + b` reports `["a", "b"]` while member paths still assemble
//! left-to-right.

use ecow::EcoString;

use crate::syntax::Node;

/// The identifier names `tree` depends on.
///
/// # Example
///
/// ```
/// use estree_eval_core::syntax::Node;
/// use estree_eval_core::variables;
///
/// let tree: Node = serde_json::from_str(
///     r#"{"type": "BinaryExpression", "operator": "+",
///         "left": {"type": "Identifier", "name": "a"},
///         "right": {"type": "Identifier", "name": "b"}}"#,
/// ).unwrap();
/// assert_eq!(variables(&tree, false), vec!["a", "b"]);
/// ```
pub fn variables(tree: &Node, with_members: bool) -> Vec<EcoString> {
    let mut names: Vec<EcoString> = Vec::new();
    walk(tree, &mut names, with_members, false);
    let mut out: Vec<EcoString> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out.reverse();
    out
}

fn walk(node: &Node, names: &mut Vec<EcoString>, with_members: bool, is_property: bool) {
    match node {
        Node::Identifier { name } => {
            if is_property {
                // The property leg of a member chain extends the path
                // built by the object leg.
                if with_members {
                    if let Some(last) = names.pop() {
                        names.push(ecow::eco_format!("{last}.{name}"));
                    }
                }
                return;
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.clone());
            }
        }
        Node::BinaryExpression { left, right, .. }
        | Node::LogicalExpression { left, right, .. }
        | Node::AssignmentExpression { left, right, .. } => {
            walk(right, names, with_members, false);
            walk(left, names, with_members, false);
        }
        Node::MemberExpression {
            object, property, ..
        }
        | Node::OptionalMemberExpression {
            object, property, ..
        } => {
            walk(object, names, with_members, false);
            walk(property, names, with_members, true);
        }
        Node::CallExpression {
            callee, arguments, ..
        }
        | Node::OptionalCallExpression { callee, arguments }
        | Node::NewExpression { callee, arguments } => {
            walk(callee, names, with_members, false);
            for argument in arguments {
                walk(argument, names, with_members, false);
            }
        }
        Node::UnaryExpression { argument, .. }
        | Node::UpdateExpression { argument, .. }
        | Node::SpreadElement { argument }
        | Node::AwaitExpression { argument } => {
            walk(argument, names, with_members, false);
        }
        Node::ReturnStatement { argument } => {
            if let Some(argument) = argument {
                walk(argument, names, with_members, false);
            }
        }
        Node::ConditionalExpression {
            test,
            consequent,
            alternate,
        } => {
            walk(alternate, names, with_members, false);
            walk(consequent, names, with_members, false);
            walk(test, names, with_members, false);
        }
        Node::TemplateLiteral { expressions, .. }
        | Node::SequenceExpression { expressions } => {
            for expr in expressions {
                walk(expr, names, with_members, false);
            }
        }
        Node::ArrayExpression { elements } => {
            for element in elements.iter().flatten() {
                walk(element, names, with_members, false);
            }
        }
        // Object-literal keys and values are intentionally opaque here:
        // only spreads inside them contribute.
        Node::ObjectExpression { properties } => {
            for property in properties {
                if let Node::SpreadElement { argument } = property {
                    walk(argument, names, with_members, false);
                }
            }
        }
        Node::BlockStatement { body } => {
            for stmt in body {
                walk(stmt, names, with_members, false);
            }
        }
        Node::ExpressionStatement { expression } => {
            walk(expression, names, with_members, false);
        }
        _ => {}
    }
}
