use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn tree(value: serde_json::Value) -> Node {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_deserialize_binary_expression() {
    let node = tree(json!({
        "type": "BinaryExpression",
        "operator": "+",
        "left": {"type": "NumericLiteral", "value": 1},
        "right": {"type": "NumericLiteral", "value": 2},
    }));
    assert_eq!(
        node,
        Node::BinaryExpression {
            operator: BinaryOperator::Add,
            left: Box::new(Node::NumericLiteral { value: 1.0 }),
            right: Box::new(Node::NumericLiteral { value: 2.0 }),
        }
    );
}

#[test]
fn test_parser_metadata_is_ignored() {
    // Full babel output carries start/end/loc on every node.
    let node = tree(json!({
        "type": "Identifier",
        "name": "user",
        "start": 0,
        "end": 4,
        "loc": {"start": {"line": 1, "column": 0}, "end": {"line": 1, "column": 4}},
    }));
    assert_eq!(node.kind(), NodeKind::Identifier);
}

#[test]
fn test_operator_spellings_round_trip() {
    for (spelling, expected) in [
        ("===", BinaryOperator::StrictEq),
        ("!==", BinaryOperator::StrictNotEq),
        (">>>", BinaryOperator::UnsignedShiftRight),
        ("**", BinaryOperator::Exp),
        ("in", BinaryOperator::In),
        ("instanceof", BinaryOperator::Instanceof),
    ] {
        let parsed: BinaryOperator =
            serde_json::from_value(json!(spelling)).unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), spelling);
    }
    let nullish: LogicalOperator = serde_json::from_value(json!("??")).unwrap();
    assert_eq!(nullish, LogicalOperator::NullishCoalescing);
}

#[test]
fn test_estree_property_alias() {
    // esprima-family parsers emit "Property" where babel says
    // "ObjectProperty".
    let node = tree(json!({
        "type": "ObjectExpression",
        "properties": [{
            "type": "Property",
            "key": {"type": "Identifier", "name": "a"},
            "value": {"type": "NumericLiteral", "value": 1},
        }],
    }));
    let Node::ObjectExpression { properties } = node else {
        panic!("expected object expression");
    };
    assert_eq!(properties[0].kind(), NodeKind::ObjectProperty);
}

#[test]
fn test_plain_literal_variants() {
    assert_eq!(
        tree(json!({"type": "Literal", "value": 2.5})),
        Node::Literal {
            value: LiteralValue::Number(2.5),
            regex: None,
        }
    );
    assert_eq!(
        tree(json!({"type": "Literal", "value": null, "regex": {"pattern": "ab", "flags": "i"}})),
        Node::Literal {
            value: LiteralValue::Null,
            regex: Some(RegexLiteral {
                pattern: "ab".into(),
                flags: "i".into(),
            }),
        }
    );
}

#[test]
fn test_array_elisions() {
    let node = tree(json!({
        "type": "ArrayExpression",
        "elements": [null, {"type": "NumericLiteral", "value": 1}],
    }));
    let Node::ArrayExpression { elements } = node else {
        panic!("expected array expression");
    };
    assert_eq!(elements[0], None);
    assert_eq!(elements[1], Some(Node::NumericLiteral { value: 1.0 }));
}

#[test]
fn test_statement_types_are_rejected() {
    let result: Result<Node, _> = serde_json::from_value(json!({
        "type": "ForStatement",
        "body": [],
    }));
    assert!(result.is_err());
}

#[test]
fn test_template_literal_shape() {
    let node = tree(json!({
        "type": "TemplateLiteral",
        "quasis": [
            {"type": "TemplateElement", "value": {"raw": "a ", "cooked": "a "}, "tail": false},
            {"type": "TemplateElement", "value": {"raw": ""}, "tail": true},
        ],
        "expressions": [{"type": "Identifier", "name": "x"}],
    }));
    let Node::TemplateLiteral { quasis, expressions } = node else {
        panic!("expected template literal");
    };
    assert_eq!(quasis.len(), 2);
    assert_eq!(expressions.len(), 1);
}
