use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_constructors_and_accessors() {
    assert_eq!(Value::from(2i64).as_number(), Some(2.0));
    assert_eq!(Value::from("hi").as_str(), Some("hi"));
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert!(Value::Undefined.is_undefined());
    assert!(Value::Null.is_nullish());
    assert!(!Value::Number(0.0).is_nullish());
}

#[test]
fn test_typeof_tags() {
    assert_eq!(Value::Undefined.type_of(), "undefined");
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::Number(1.0).type_of(), "number");
    assert_eq!(Value::from("x").type_of(), "string");
    assert_eq!(Value::array(vec![]).type_of(), "object");
    assert_eq!(
        Value::function("f", |_, _| Ok(Value::Undefined)).type_of(),
        "function"
    );
    assert_eq!(Value::bigint(1.into()).type_of(), "bigint");
}

#[test]
fn test_structural_equality() {
    assert_eq!(
        Value::array(vec![Value::Number(1.0), Value::from("a")]),
        Value::array(vec![Value::Number(1.0), Value::from("a")]),
    );
    assert_eq!(
        Value::object([("a", Value::Number(1.0))]),
        Value::object([("a", Value::Number(1.0))]),
    );
    assert_ne!(
        Value::object([("a", Value::Number(1.0))]),
        Value::object([("a", Value::Number(2.0))]),
    );
    // IEEE semantics survive structural comparison.
    assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
}

#[test]
fn test_functions_compare_by_identity() {
    let f = Value::function("f", |_, _| Ok(Value::Undefined));
    let g = Value::function("f", |_, _| Ok(Value::Undefined));
    assert_eq!(f, f.clone());
    assert_ne!(f, g);
}

#[test]
fn test_display_is_js_tostring() {
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::Number(1.5).to_string(), "1.5");
    assert_eq!(Value::Number(3.0).to_string(), "3");
    assert_eq!(
        Value::array(vec![Value::Number(1.0), Value::Null, Value::Number(2.0)]).to_string(),
        "1,,2"
    );
    assert_eq!(Value::object([("a", Value::Null)]).to_string(), "[object Object]");
}

#[test]
fn test_function_binding_fixes_receiver() {
    let owner = Value::object([("n", Value::Number(7.0))]);
    let fun = FunctionValue::new(Some("get".into()), |receiver, _| {
        let Some(Value::Object(map)) = receiver else {
            return Ok(Value::Undefined);
        };
        Ok(map.borrow().get("n").cloned().unwrap_or_default())
    });
    let bound = std::rc::Rc::new(fun).bind(owner);
    assert_eq!(bound.call(None, &[]).unwrap(), Value::Number(7.0));
}

#[test]
fn test_regex_flags() {
    let re = RegexValue::new("^ab", "i").unwrap();
    assert!(re.is_match("ABc"));
    assert!(!re.is_match("cab"));
    assert!(RegexValue::new("(", "").is_err());
    assert!(RegexValue::new("a", "x").is_err());
}
