use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::{evaluate_sync, EvalError, ResourceError};
use crate::api::{Context, EvalOptions};
use crate::syntax::{Node, NodeKind};
use crate::values::Value;

// ============================================================================
// Helpers
// ============================================================================

fn tree(value: serde_json::Value) -> Node {
    serde_json::from_value(value).unwrap()
}

fn eval(node: serde_json::Value, cx: &Context) -> Result<Value, EvalError> {
    evaluate_sync(&tree(node), cx, &EvalOptions::default())
}

fn eval_with(
    node: serde_json::Value,
    cx: &Context,
    options: &EvalOptions,
) -> Result<Value, EvalError> {
    evaluate_sync(&tree(node), cx, options)
}

fn num(n: f64) -> serde_json::Value {
    json!({"type": "NumericLiteral", "value": n})
}

fn string(s: &str) -> serde_json::Value {
    json!({"type": "StringLiteral", "value": s})
}

fn ident(name: &str) -> serde_json::Value {
    json!({"type": "Identifier", "name": name})
}

fn binary(op: &str, left: serde_json::Value, right: serde_json::Value) -> serde_json::Value {
    json!({"type": "BinaryExpression", "operator": op, "left": left, "right": right})
}

fn logical(op: &str, left: serde_json::Value, right: serde_json::Value) -> serde_json::Value {
    json!({"type": "LogicalExpression", "operator": op, "left": left, "right": right})
}

fn dot(object: serde_json::Value, name: &str) -> serde_json::Value {
    json!({
        "type": "MemberExpression",
        "object": object,
        "property": ident(name),
        "computed": false,
    })
}

fn index(object: serde_json::Value, key: serde_json::Value) -> serde_json::Value {
    json!({
        "type": "MemberExpression",
        "object": object,
        "property": key,
        "computed": true,
    })
}

fn call(callee: serde_json::Value, arguments: Vec<serde_json::Value>) -> serde_json::Value {
    json!({"type": "CallExpression", "callee": callee, "arguments": arguments})
}

fn functions_on() -> EvalOptions {
    EvalOptions {
        functions: true,
        ..EvalOptions::default()
    }
}

// ============================================================================
// Literals and templates
// ============================================================================

#[test]
fn test_literals() {
    let cx = Context::new();
    assert_eq!(eval(num(2.5), &cx).unwrap(), Value::Number(2.5));
    assert_eq!(eval(string("hi"), &cx).unwrap(), Value::from("hi"));
    assert_eq!(
        eval(json!({"type": "BooleanLiteral", "value": true}), &cx).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(eval(json!({"type": "NullLiteral"}), &cx).unwrap(), Value::Null);
}

#[test]
fn test_bigint_literal() {
    let cx = Context::new();
    let sum = binary(
        "+",
        json!({"type": "BigIntLiteral", "value": "9007199254740993"}),
        json!({"type": "BigIntLiteral", "value": "1"}),
    );
    assert_eq!(
        eval(sum, &cx).unwrap(),
        Value::bigint("9007199254740994".parse().unwrap())
    );
    let bad = eval(json!({"type": "BigIntLiteral", "value": "12x"}), &cx);
    assert_eq!(
        bad,
        Err(EvalError::Syntax("Invalid BigInt literal \"12x\"".into()))
    );
}

#[test]
fn test_regexp_literal() {
    let cx = Context::new();
    let re = eval(
        json!({"type": "RegExpLiteral", "pattern": "^a+$", "flags": "i"}),
        &cx,
    )
    .unwrap();
    let Value::Regex(re) = re else {
        panic!("expected a regex value");
    };
    assert!(re.is_match("AAA"));
}

#[test]
fn test_template_literal_interpolation() {
    let cx = Context::from_iter([("name", Value::from("world"))]);
    let node = json!({
        "type": "TemplateLiteral",
        "quasis": [
            {"type": "TemplateElement", "value": {"raw": "hello ", "cooked": "hello "}, "tail": false},
            {"type": "TemplateElement", "value": {"raw": "!", "cooked": "!"}, "tail": true},
        ],
        "expressions": [ident("name")],
    });
    assert_eq!(eval(node, &cx).unwrap(), Value::from("hello world!"));
}

// ============================================================================
// Identifier resolution
// ============================================================================

#[test]
fn test_identifier_resolution() {
    crate::test_utils::init_test_logging();
    let cx = Context::from_iter([("a", Value::Number(7.0))]);
    assert_eq!(eval(ident("a"), &cx).unwrap(), Value::Number(7.0));
    // `undefined` is the value, not a lookup.
    assert_eq!(eval(ident("undefined"), &cx).unwrap(), Value::Undefined);
    // A bare unresolved name resolves to undefined at the top level.
    assert_eq!(eval(ident("missing"), &cx).unwrap(), Value::Undefined);
}

#[test]
fn test_unresolved_name_in_container_is_a_reference_error() {
    let cx = Context::new();
    let node = json!({"type": "ArrayExpression", "elements": [ident("b")]});
    assert_eq!(
        eval(node.clone(), &cx),
        Err(EvalError::Reference("b is undefined".into()))
    );
    // With strictness turned off the whole expression fails softly.
    let lax = EvalOptions {
        strict: Some(false),
        ..EvalOptions::default()
    };
    assert_eq!(eval_with(node, &cx, &lax).unwrap(), Value::Undefined);
}

#[test]
fn test_undefined_spelling_escalates_inside_containers() {
    let cx = Context::new();
    let node = json!({"type": "ArrayExpression", "elements": [ident("undefined")]});
    assert!(matches!(eval(node, &cx), Err(EvalError::Reference(_))));
}

#[test]
fn test_explicit_strict_bare_identifier() {
    let cx = Context::new();
    let strict = EvalOptions {
        strict: Some(true),
        ..EvalOptions::default()
    };
    assert_eq!(
        eval_with(ident("user"), &cx, &strict),
        Err(EvalError::Type("Cannot read property 'user' of undefined".into()))
    );
}

#[test]
fn test_resolver_backed_context() {
    let cx = Context::with_resolver(|name| match name {
        "answer" => Some(Value::Number(42.0)),
        _ => None,
    });
    assert_eq!(eval(ident("answer"), &cx).unwrap(), Value::Number(42.0));
}

#[test]
fn test_this_expression() {
    let cx = Context::from_iter([("this", Value::object([("n", Value::Number(1.0))]))]);
    let node = dot(json!({"type": "ThisExpression"}), "n");
    assert_eq!(eval(node, &cx).unwrap(), Value::Number(1.0));
}

// ============================================================================
// Guard
// ============================================================================

#[test]
fn test_guard_poisons_the_whole_expression() {
    let cx = Context::from_iter([("a", Value::object([("b", Value::Number(1.0))]))]);
    // The denied access cannot be rescued by a fallback.
    let node = logical("||", dot(ident("a"), "constructor"), num(9.0));
    assert_eq!(eval(node, &cx).unwrap(), Value::Undefined);
}

#[test]
fn test_guard_identifier_is_silently_undefined() {
    let cx = Context::from_iter([("__proto__", Value::Number(1.0))]);
    assert_eq!(eval(ident("__proto__"), &cx).unwrap(), Value::Undefined);
}

#[test]
fn test_computed_guard_key_resolves_softly() {
    let cx = Context::from_iter([
        ("a", Value::object([("b", Value::Number(1.0))])),
        ("k", Value::from("__proto__")),
    ]);
    // A computed probe sees plain undefined, so the fallback still runs.
    let node = logical("||", index(ident("a"), ident("k")), num(9.0));
    assert_eq!(eval(node, &cx).unwrap(), Value::Number(9.0));
}

#[test]
fn test_string_literal_keys_normalize_unless_allowed() {
    let cx = Context::from_iter([("a", Value::object([("b", Value::Number(1.0))]))]);
    let node = logical("||", index(ident("a"), string("constructor")), num(9.0));
    // Normalized to a static key, the denied access poisons everything.
    assert_eq!(eval(node.clone(), &cx).unwrap(), Value::Undefined);
    // Left on the computed path, it degrades to undefined.
    let allow = EvalOptions {
        allow_context_string_literals: true,
        ..EvalOptions::default()
    };
    assert_eq!(eval_with(node, &cx, &allow).unwrap(), Value::Number(9.0));
}

// ============================================================================
// Member access
// ============================================================================

#[test]
fn test_member_access() {
    let cx = Context::from_iter([
        ("user", Value::object([("name", Value::from("ada"))])),
        ("items", Value::array(vec![Value::Number(10.0), Value::Number(20.0)])),
        ("word", Value::from("héllo")),
    ]);
    assert_eq!(eval(dot(ident("user"), "name"), &cx).unwrap(), Value::from("ada"));
    assert_eq!(eval(dot(ident("items"), "length"), &cx).unwrap(), Value::Number(2.0));
    assert_eq!(eval(index(ident("items"), num(1.0)), &cx).unwrap(), Value::Number(20.0));
    assert_eq!(eval(dot(ident("word"), "length"), &cx).unwrap(), Value::Number(5.0));
    assert_eq!(eval(index(ident("word"), num(1.0)), &cx).unwrap(), Value::from("é"));
    assert_eq!(eval(dot(ident("user"), "missing"), &cx).unwrap(), Value::Undefined);
}

#[test]
fn test_member_on_nullish_object() {
    let cx = Context::from_iter([("a", Value::Null)]);
    assert_eq!(
        eval(dot(ident("a"), "b"), &cx),
        Err(EvalError::Type("Cannot read property 'b' of undefined".into()))
    );
    let lax = EvalOptions {
        strict: Some(false),
        ..EvalOptions::default()
    };
    assert_eq!(
        eval_with(dot(ident("a"), "b"), &cx, &lax).unwrap(),
        Value::Undefined
    );
}

#[test]
fn test_member_on_falsy_object_cancels_under_functions() {
    let cx = Context::from_iter([("a", Value::Number(0.0)), ("k", Value::from("x"))]);
    // Invocation disabled: a falsy receiver reads as plain undefined,
    // static and computed alike.
    let static_access = logical("||", dot(ident("a"), "x"), num(9.0));
    let computed_access = logical("||", index(ident("a"), ident("k")), num(9.0));
    assert_eq!(eval(static_access.clone(), &cx).unwrap(), Value::Number(9.0));
    assert_eq!(eval(computed_access.clone(), &cx).unwrap(), Value::Number(9.0));
    // Invocation enabled: both paths cancel the enclosing expression.
    assert_eq!(
        eval_with(static_access, &cx, &functions_on()).unwrap(),
        Value::Undefined
    );
    assert_eq!(
        eval_with(computed_access, &cx, &functions_on()).unwrap(),
        Value::Undefined
    );
}

#[test]
fn test_optional_chaining_short_circuits() {
    let cx = Context::from_iter([("a", Value::Null)]);
    let node = json!({
        "type": "OptionalMemberExpression",
        "object": ident("a"),
        "property": ident("b"),
        "computed": false,
    });
    assert_eq!(eval(node, &cx).unwrap(), Value::Undefined);
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_array_literals() {
    let cx = Context::from_iter([("rest", Value::array(vec![Value::Number(3.0), Value::Number(4.0)]))]);
    let node = json!({
        "type": "ArrayExpression",
        "elements": [
            num(1.0),
            null,
            {"type": "SpreadElement", "argument": ident("rest")},
        ],
    });
    assert_eq!(
        eval(node, &cx).unwrap(),
        Value::array(vec![
            Value::Number(1.0),
            Value::Undefined,
            Value::Number(3.0),
            Value::Number(4.0),
        ])
    );
}

#[test]
fn test_object_literals() {
    let cx = Context::from_iter([
        ("b", Value::Number(2.0)),
        ("key", Value::from("c")),
        ("base", Value::object([("z", Value::Number(9.0))])),
    ]);
    let node = json!({
        "type": "ObjectExpression",
        "properties": [
            {"type": "SpreadElement", "argument": ident("base")},
            {
                "type": "ObjectProperty",
                "key": ident("a"),
                "value": num(1.0),
            },
            {
                "type": "ObjectProperty",
                "key": ident("b"),
                "value": ident("b"),
                "shorthand": true,
            },
            {
                "type": "ObjectProperty",
                "key": ident("key"),
                "value": num(3.0),
                "computed": true,
            },
        ],
    });
    assert_eq!(
        eval(node, &cx).unwrap(),
        Value::object([
            ("z", Value::Number(9.0)),
            ("a", Value::Number(1.0)),
            ("b", Value::Number(2.0)),
            ("c", Value::Number(3.0)),
        ])
    );
}

#[test]
fn test_shorthand_property_requires_a_binding() {
    let cx = Context::new();
    let node = json!({
        "type": "ObjectExpression",
        "properties": [{
            "type": "ObjectProperty",
            "key": ident("a"),
            "value": ident("a"),
            "shorthand": true,
        }],
    });
    assert_eq!(
        eval(node, &cx),
        Err(EvalError::Reference("a is undefined".into()))
    );
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_binary_operators_end_to_end() {
    let cx = Context::new();
    assert_eq!(eval(binary("+", string("1"), num(2.0)), &cx).unwrap(), Value::from("12"));
    assert_eq!(eval(binary("**", num(2.0), num(10.0)), &cx).unwrap(), Value::Number(1024.0));
    assert_eq!(eval(binary("==", string("1"), num(1.0)), &cx).unwrap(), Value::Bool(true));
    assert_eq!(eval(binary("===", string("1"), num(1.0)), &cx).unwrap(), Value::Bool(false));
    assert_eq!(eval(binary("<", string("a"), string("b")), &cx).unwrap(), Value::Bool(true));
}

#[test]
fn test_in_operator_strictness() {
    let cx = Context::from_iter([
        ("s", Value::from("abcd")),
        ("xs", Value::array(vec![Value::Number(5.0), Value::Number(6.0)])),
        ("o", Value::object([("a", Value::Number(1.0))])),
    ]);
    // Default strictness keeps containment semantics for `in`.
    assert_eq!(eval(binary("in", string("bc"), ident("s")), &cx).unwrap(), Value::Bool(true));
    assert_eq!(eval(binary("in", num(5.0), ident("xs")), &cx).unwrap(), Value::Bool(true));
    assert_eq!(eval(binary("in", string("a"), ident("o")), &cx).unwrap(), Value::Bool(true));
    // Explicit strict switches arrays to index presence.
    let strict = EvalOptions {
        strict: Some(true),
        ..EvalOptions::default()
    };
    assert_eq!(
        eval_with(binary("in", num(5.0), ident("xs")), &cx, &strict).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        eval_with(binary("in", num(1.0), ident("xs")), &cx, &strict).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_unary_operators() {
    let cx = Context::from_iter([("n", Value::from("5"))]);
    assert_eq!(
        eval(json!({"type": "UnaryExpression", "operator": "-", "argument": ident("n")}), &cx)
            .unwrap(),
        Value::Number(-5.0)
    );
    assert_eq!(
        eval(json!({"type": "UnaryExpression", "operator": "typeof", "argument": ident("n")}), &cx)
            .unwrap(),
        Value::from("string")
    );
    assert_eq!(
        eval(json!({"type": "UnaryExpression", "operator": "void", "argument": num(1.0)}), &cx)
            .unwrap(),
        Value::Undefined
    );
}

#[test]
fn test_logical_short_circuit_is_observable() {
    // `false && b++` must not touch b.
    let cx = Context::from_iter([("b", Value::Number(0.0))]);
    let increment = json!({
        "type": "UpdateExpression",
        "operator": "++",
        "argument": ident("b"),
        "prefix": false,
    });
    let node = logical("&&", json!({"type": "BooleanLiteral", "value": false}), increment.clone());
    assert_eq!(eval(node, &cx).unwrap(), Value::Bool(false));
    assert_eq!(cx.get("b"), Some(Value::Number(0.0)));

    let node = logical("||", json!({"type": "BooleanLiteral", "value": false}), increment);
    assert_eq!(eval(node, &cx).unwrap(), Value::Number(0.0));
    assert_eq!(cx.get("b"), Some(Value::Number(1.0)));
}

#[test]
fn test_nullish_coalescing() {
    let cx = Context::from_iter([("a", Value::Number(0.0))]);
    assert_eq!(eval(logical("??", ident("a"), num(9.0)), &cx).unwrap(), Value::Number(0.0));
    let cx = Context::from_iter([("a", Value::Null)]);
    assert_eq!(eval(logical("??", ident("a"), num(9.0)), &cx).unwrap(), Value::Number(9.0));
}

#[test]
fn test_boolean_logical_operators_option() {
    let cx = Context::from_iter([("a", Value::from("x"))]);
    let options = EvalOptions {
        boolean_logical_operators: true,
        ..EvalOptions::default()
    };
    assert_eq!(
        eval_with(logical("||", ident("a"), num(2.0)), &cx, &options).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_conditional_and_sequence() {
    let cx = Context::from_iter([("n", Value::Number(3.0))]);
    let node = json!({
        "type": "ConditionalExpression",
        "test": binary(">", ident("n"), num(2.0)),
        "consequent": string("big"),
        "alternate": string("small"),
    });
    assert_eq!(eval(node, &cx).unwrap(), Value::from("big"));
    let node = json!({
        "type": "SequenceExpression",
        "expressions": [num(1.0), num(2.0), num(3.0)],
    });
    assert_eq!(eval(node, &cx).unwrap(), Value::Number(3.0));
}

#[test]
fn test_update_writes_back_to_the_context() {
    let cx = Context::from_iter([("i", Value::Number(5.0))]);
    let prefix = json!({
        "type": "UpdateExpression",
        "operator": "--",
        "argument": ident("i"),
        "prefix": true,
    });
    assert_eq!(eval(prefix, &cx).unwrap(), Value::Number(4.0));
    assert_eq!(cx.get("i"), Some(Value::Number(4.0)));

    let postfix = json!({
        "type": "UpdateExpression",
        "operator": "++",
        "argument": ident("i"),
        "prefix": false,
    });
    assert_eq!(eval(postfix, &cx).unwrap(), Value::Number(4.0));
    assert_eq!(cx.get("i"), Some(Value::Number(5.0)));
}

#[test]
fn test_delete() {
    let cx = Context::from_iter([("o", Value::object([("k", Value::Number(1.0))]))]);
    let node = json!({
        "type": "UnaryExpression",
        "operator": "delete",
        "argument": dot(ident("o"), "k"),
    });
    assert_eq!(eval(node, &cx).unwrap(), Value::Bool(true));
    assert_eq!(
        eval(dot(ident("o"), "k"), &cx).unwrap(),
        Value::Undefined
    );
    // Non-member targets are a no-op false.
    let node = json!({
        "type": "UnaryExpression",
        "operator": "delete",
        "argument": ident("o"),
    });
    assert_eq!(eval(node, &cx).unwrap(), Value::Bool(false));
}

#[test]
fn test_delete_guard_key_fails() {
    let cx = Context::from_iter([("o", Value::object([("k", Value::Number(1.0))]))]);
    let node = json!({
        "type": "UnaryExpression",
        "operator": "delete",
        "argument": dot(ident("o"), "__proto__"),
    });
    assert_eq!(eval(node, &cx).unwrap(), Value::Undefined);
}

// ============================================================================
// Assignment and the regex operator
// ============================================================================

#[test]
fn test_assignment_is_rejected() {
    let cx = Context::new();
    let node = json!({
        "type": "AssignmentExpression",
        "operator": "+=",
        "left": ident("a"),
        "right": num(1.0),
    });
    assert_eq!(
        eval(node, &cx),
        Err(EvalError::Syntax("Assignment expression \"+=\" is not supported".into()))
    );
}

#[test]
fn test_regex_match_operator() {
    let cx = Context::from_iter([("name", Value::from("brian"))]);
    let node = json!({
        "type": "AssignmentExpression",
        "operator": "=",
        "left": ident("name"),
        "right": {
            "type": "UnaryExpression",
            "operator": "~",
            "argument": {"type": "RegExpLiteral", "pattern": "^br", "flags": ""},
        },
    });
    assert_eq!(eval(node.clone(), &cx).unwrap(), Value::Bool(true));
    let off = EvalOptions {
        regex_operator: false,
        ..EvalOptions::default()
    };
    assert!(matches!(eval_with(node, &cx, &off), Err(EvalError::Syntax(_))));
}

// ============================================================================
// Resource governor
// ============================================================================

#[test]
fn test_depth_limit() {
    let cx = Context::new();
    let mut node = num(1.0);
    for _ in 0..60 {
        node = json!({"type": "ArrayExpression", "elements": [node]});
    }
    let err = eval(node, &cx).unwrap_err();
    assert_eq!(err, EvalError::Resource(ResourceError::DepthExceeded { max: 50 }));
    assert!(err.is_resource());
}

#[test]
fn test_visit_budget() {
    let cx = Context::new();
    let options = EvalOptions {
        budget: Some(1),
        ..EvalOptions::default()
    };
    assert_eq!(eval_with(num(1.0), &cx, &options).unwrap(), Value::Number(1.0));
    let options = EvalOptions {
        budget: Some(2),
        ..EvalOptions::default()
    };
    assert_eq!(
        eval_with(binary("+", num(1.0), num(2.0)), &cx, &options),
        Err(EvalError::Resource(ResourceError::BudgetExceeded { budget: 2 }))
    );
}

#[test]
fn test_array_length_limit() {
    let cx = Context::from_iter([("s", Value::from("abc"))]);
    let options = EvalOptions {
        max_array_length: 2,
        ..EvalOptions::default()
    };
    let literal = json!({
        "type": "ArrayExpression",
        "elements": [num(1.0), num(2.0), num(3.0)],
    });
    assert_eq!(
        eval_with(literal, &cx, &options),
        Err(EvalError::Resource(ResourceError::ArrayLengthExceeded { max: 2 }))
    );
    let spread = json!({
        "type": "ArrayExpression",
        "elements": [{"type": "SpreadElement", "argument": ident("s")}],
    });
    assert_eq!(
        eval_with(spread, &cx, &options),
        Err(EvalError::Resource(ResourceError::ArrayLengthExceeded { max: 2 }))
    );
}

#[test]
fn test_array_exactly_at_limit_builds() {
    let cx = Context::new();
    let options = EvalOptions {
        max_array_length: 3,
        ..EvalOptions::default()
    };
    let literal = json!({
        "type": "ArrayExpression",
        "elements": [num(1.0), num(2.0), num(3.0)],
    });
    assert_eq!(
        eval_with(literal, &cx, &options).unwrap(),
        Value::array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)])
    );
}

#[test]
fn test_depth_exactly_at_limit_evaluates() {
    let cx = Context::new();
    // 49 nested negations put the innermost literal at depth 50, the
    // default cap; one more would exceed it (test_depth_limit).
    let mut node = num(1.0);
    for _ in 0..49 {
        node = json!({"type": "UnaryExpression", "operator": "-", "argument": node});
    }
    assert_eq!(eval(node, &cx).unwrap(), Value::Number(-1.0));

    let options = EvalOptions {
        max_expression_depth: 3,
        ..EvalOptions::default()
    };
    let nested = json!({
        "type": "ArrayExpression",
        "elements": [{"type": "ArrayExpression", "elements": [num(1.0)]}],
    });
    assert_eq!(
        eval_with(nested.clone(), &cx, &options).unwrap(),
        Value::array(vec![Value::array(vec![Value::Number(1.0)])])
    );
    let too_deep = json!({"type": "ArrayExpression", "elements": [nested]});
    assert_eq!(
        eval_with(too_deep, &cx, &options),
        Err(EvalError::Resource(ResourceError::DepthExceeded { max: 3 }))
    );
}

// ============================================================================
// Visitor overrides
// ============================================================================

#[test]
fn test_visitor_override() {
    let cx = Context::from_iter([("scale", Value::Number(10.0))]);
    let mut options = EvalOptions::default();
    options.visitors.insert(
        NodeKind::NumericLiteral,
        Rc::new(|node, cx| {
            let Node::NumericLiteral { value } = node else {
                return Ok(Value::Undefined);
            };
            let scale = cx.get("scale").and_then(|v| v.as_number()).unwrap_or(1.0);
            Ok(Value::Number(value * scale))
        }),
    );
    assert_eq!(
        eval_with(binary("+", num(1.0), num(2.0)), &cx, &options).unwrap(),
        Value::Number(30.0)
    );
}

// ============================================================================
// Function invocation
// ============================================================================

#[test]
fn test_calls_are_off_by_default() {
    let cx = Context::from_iter([("f", Value::function("f", |_, _| Ok(Value::Number(1.0))))]);
    assert_eq!(
        eval(call(ident("f"), vec![]), &cx),
        Err(EvalError::Syntax("Functions are not supported".into()))
    );
}

#[test]
fn test_call_a_context_function() {
    let cx = Context::from_iter([(
        "add",
        Value::function("add", |_, args| {
            let mut total = 0.0;
            for arg in args {
                total += arg.as_number().unwrap_or(f64::NAN);
            }
            Ok(Value::Number(total))
        }),
    )]);
    let node = call(ident("add"), vec![num(1.0), num(2.0), num(3.0)]);
    assert_eq!(eval_with(node, &cx, &functions_on()).unwrap(), Value::Number(6.0));
}

#[test]
fn test_spread_call_arguments() {
    let cx = Context::from_iter([
        (
            "count",
            Value::function("count", |_, args| Ok(Value::Number(args.len() as f64))),
        ),
        ("xs", Value::array(vec![Value::Number(1.0), Value::Number(2.0)])),
    ]);
    let node = call(
        ident("count"),
        vec![num(0.0), json!({"type": "SpreadElement", "argument": ident("xs")})],
    );
    assert_eq!(eval_with(node, &cx, &functions_on()).unwrap(), Value::Number(3.0));
}

#[test]
fn test_method_call_binds_the_receiver() {
    let owner = Value::object([
        ("n", Value::Number(41.0)),
        (
            "next",
            Value::function("next", |receiver, _| {
                let Some(Value::Object(map)) = receiver else {
                    return Ok(Value::Undefined);
                };
                let n = map.borrow().get("n").cloned().unwrap_or_default();
                Ok(Value::Number(n.as_number().unwrap_or(f64::NAN) + 1.0))
            }),
        ),
    ]);
    let cx = Context::from_iter([("obj", owner)]);
    let node = call(dot(ident("obj"), "next"), vec![]);
    assert_eq!(eval_with(node, &cx, &functions_on()).unwrap(), Value::Number(42.0));
}

#[test]
fn test_optional_call_on_nullish_callee() {
    let cx = Context::new();
    let node = json!({
        "type": "OptionalCallExpression",
        "callee": ident("missing"),
        "arguments": [],
    });
    assert_eq!(eval_with(node, &cx, &functions_on()).unwrap(), Value::Undefined);
}

#[test]
fn test_calling_a_non_function_fails_softly() {
    let cx = Context::from_iter([("n", Value::Number(1.0))]);
    let node = call(ident("n"), vec![]);
    assert_eq!(eval_with(node, &cx, &functions_on()).unwrap(), Value::Undefined);
}

#[test]
fn test_new_expression_invokes_like_a_call() {
    let hits = Rc::new(Cell::new(0));
    let observed = hits.clone();
    let cx = Context::from_iter([(
        "Make",
        Value::function("Make", move |_, args| {
            observed.set(observed.get() + 1);
            Ok(args.first().cloned().unwrap_or_default())
        }),
    )]);
    let node = json!({
        "type": "NewExpression",
        "callee": ident("Make"),
        "arguments": [num(5.0)],
    });
    assert_eq!(eval_with(node, &cx, &functions_on()).unwrap(), Value::Number(5.0));
    assert_eq!(hits.get(), 1);
}

#[test]
fn test_tagged_template() {
    let cx = Context::from_iter([
        (
            "tag",
            Value::function("tag", |_, args| {
                // strings array first, then the interpolated values
                let Some(Value::Array(strings)) = args.first() else {
                    return Ok(Value::Undefined);
                };
                let first = strings.borrow().first().cloned().unwrap_or_default();
                let mut out = first.to_string();
                for value in &args[1..] {
                    out.push_str(&value.to_string());
                }
                Ok(Value::from(out))
            }),
        ),
        ("n", Value::Number(3.0)),
    ]);
    let node = json!({
        "type": "TaggedTemplateExpression",
        "tag": ident("tag"),
        "quasi": {
            "type": "TemplateLiteral",
            "quasis": [
                {"type": "TemplateElement", "value": {"raw": "n=", "cooked": "n="}, "tail": false},
                {"type": "TemplateElement", "value": {"raw": "", "cooked": ""}, "tail": true},
            ],
            "expressions": [ident("n")],
        },
    });
    assert_eq!(eval_with(node, &cx, &functions_on()).unwrap(), Value::from("n=3"));
}

// ============================================================================
// Function literals
// ============================================================================

fn arrow(params: Vec<serde_json::Value>, body: serde_json::Value) -> serde_json::Value {
    json!({"type": "ArrowFunctionExpression", "params": params, "body": body})
}

#[test]
fn test_function_literal_requires_the_compile_capability() {
    let cx = Context::new();
    let node = arrow(vec![ident("x")], binary("+", ident("x"), num(1.0)));
    let err = eval_with(node, &cx, &functions_on()).unwrap_err();
    assert!(matches!(err, EvalError::Type(ref msg) if msg.contains("compile")));
}

#[test]
fn test_function_literal_compiles_after_validation() {
    let cx = Context::new();
    let mut options = functions_on();
    options.compile = Some(Rc::new(|_node, _bindings| {
        Ok(Value::function("compiled", |_, args| {
            Ok(args.first().cloned().unwrap_or_default())
        }))
    }));
    let node = call(
        arrow(vec![ident("x")], binary("+", ident("x"), num(1.0))),
        vec![num(7.0)],
    );
    assert_eq!(eval_with(node, &cx, &options).unwrap(), Value::Number(7.0));
}

#[test]
fn test_function_body_is_validated_before_compiling() {
    let hits = Rc::new(Cell::new(0));
    let observed = hits.clone();
    let cx = Context::new();
    let mut options = functions_on();
    options.compile = Some(Rc::new(move |_node, _bindings| {
        observed.set(observed.get() + 1);
        Ok(Value::Undefined)
    }));
    // A guard violation in the body cancels compilation.
    let node = arrow(vec![ident("x")], dot(ident("x"), "constructor"));
    assert_eq!(eval_with(node, &cx, &options).unwrap(), Value::Undefined);
    assert_eq!(hits.get(), 0);
    // Assignments in the body are still syntax errors.
    let node = arrow(
        vec![ident("x")],
        json!({
            "type": "AssignmentExpression",
            "operator": "=",
            "left": ident("x"),
            "right": num(1.0),
        }),
    );
    assert!(matches!(eval_with(node, &cx, &options), Err(EvalError::Syntax(_))));
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_validation_does_not_invoke_calls() {
    let hits = Rc::new(Cell::new(0));
    let observed = hits.clone();
    let cx = Context::from_iter([(
        "probe",
        Value::function("probe", move |_, _| {
            observed.set(observed.get() + 1);
            Ok(Value::Undefined)
        }),
    )]);
    let mut options = functions_on();
    options.compile = Some(Rc::new(|_node, _bindings| Ok(Value::Undefined)));
    let node = arrow(vec![], call(ident("probe"), vec![]));
    assert_eq!(eval_with(node, &cx, &options).unwrap(), Value::Undefined);
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_destructuring_params_fail_softly() {
    let cx = Context::new();
    let mut options = functions_on();
    options.compile = Some(Rc::new(|_node, _bindings| Ok(Value::Number(1.0))));
    let node = arrow(
        vec![json!({
            "type": "ObjectExpression",
            "properties": [],
        })],
        num(1.0),
    );
    assert_eq!(eval_with(node, &cx, &options).unwrap(), Value::Undefined);
}

// ============================================================================
// Pending values
// ============================================================================

#[test]
fn test_pending_values_are_rejected_synchronously() {
    let cx = Context::from_iter([("a", Value::pending(async { Value::Number(1.0) }))]);
    assert_eq!(
        eval(binary("+", ident("a"), num(1.0)), &cx),
        Err(EvalError::Type(
            "Cannot resolve a pending value during synchronous evaluation".into()
        ))
    );
}
