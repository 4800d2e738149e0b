use pretty_assertions::assert_eq;

use super::coerce::*;
use super::Value;

// ============================================================================
// ToBoolean / ToNumber / ToString
// ============================================================================

#[test]
fn test_to_boolean() {
    assert!(!to_boolean(&Value::Undefined));
    assert!(!to_boolean(&Value::Null));
    assert!(!to_boolean(&Value::Number(0.0)));
    assert!(!to_boolean(&Value::Number(f64::NAN)));
    assert!(!to_boolean(&Value::from("")));
    assert!(!to_boolean(&Value::bigint(0.into())));
    assert!(to_boolean(&Value::Number(-1.0)));
    assert!(to_boolean(&Value::from("0")));
    assert!(to_boolean(&Value::array(vec![])));
    assert!(to_boolean(&Value::object::<&str>([])));
}

#[test]
fn test_to_number() {
    assert_eq!(to_number(&Value::Null).unwrap(), 0.0);
    assert!(to_number(&Value::Undefined).unwrap().is_nan());
    assert_eq!(to_number(&Value::Bool(true)).unwrap(), 1.0);
    assert_eq!(to_number(&Value::from(" 42 ")).unwrap(), 42.0);
    assert_eq!(to_number(&Value::from("")).unwrap(), 0.0);
    assert_eq!(to_number(&Value::from("0x10")).unwrap(), 16.0);
    assert_eq!(to_number(&Value::from("-Infinity")).unwrap(), f64::NEG_INFINITY);
    assert!(to_number(&Value::from("12px")).unwrap().is_nan());
    // Arrays convert through their string form.
    assert_eq!(to_number(&Value::array(vec![])).unwrap(), 0.0);
    assert_eq!(to_number(&Value::array(vec![Value::Number(5.0)])).unwrap(), 5.0);
    assert!(to_number(&Value::array(vec![Value::Number(1.0), Value::Number(2.0)]))
        .unwrap()
        .is_nan());
    // BigInts refuse to narrow.
    assert!(to_number(&Value::bigint(1.into())).is_err());
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(1.5), "1.5");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
    assert_eq!(format_number(1e20), "100000000000000000000");
}

#[test]
fn test_to_int32_wraps() {
    assert_eq!(to_int32(&Value::Number(f64::NAN)).unwrap(), 0);
    assert_eq!(to_int32(&Value::Number(f64::INFINITY)).unwrap(), 0);
    assert_eq!(to_int32(&Value::Number(-1.9)).unwrap(), -1);
    assert_eq!(to_int32(&Value::Number(4294967296.0)).unwrap(), 0);
    assert_eq!(to_int32(&Value::Number(2147483648.0)).unwrap(), -2147483648);
    assert_eq!(to_uint32(&Value::Number(-1.0)).unwrap(), 4294967295);
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_strict_eq() {
    assert!(strict_eq(&Value::Number(1.0), &Value::Number(1.0)));
    assert!(!strict_eq(&Value::Number(1.0), &Value::from("1")));
    assert!(!strict_eq(&Value::Null, &Value::Undefined));
    assert!(!strict_eq(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    // Reference types compare by identity, not structure.
    let a = Value::array(vec![Value::Number(1.0)]);
    assert!(strict_eq(&a, &a.clone()));
    assert!(!strict_eq(&a, &Value::array(vec![Value::Number(1.0)])));
    assert!(strict_eq(
        &Value::bigint(10.into()),
        &Value::bigint(10.into())
    ));
}

#[test]
fn test_loose_eq() {
    assert!(loose_eq(&Value::Null, &Value::Undefined));
    assert!(loose_eq(&Value::Number(1.0), &Value::from("1")));
    assert!(loose_eq(&Value::Bool(true), &Value::Number(1.0)));
    assert!(loose_eq(&Value::Bool(false), &Value::from("")));
    assert!(!loose_eq(&Value::Null, &Value::Number(0.0)));
    assert!(!loose_eq(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    // Objects coerce to primitives against primitives.
    assert!(loose_eq(&Value::array(vec![Value::Number(1.0)]), &Value::Number(1.0)));
    assert!(loose_eq(&Value::array(vec![]), &Value::from("")));
    // BigInt arms compare mathematically.
    assert!(loose_eq(&Value::bigint(1.into()), &Value::Number(1.0)));
    assert!(loose_eq(&Value::bigint(10.into()), &Value::from("10")));
    assert!(!loose_eq(&Value::bigint(1.into()), &Value::Number(1.5)));
}

#[test]
fn test_to_primitive_and_property_key() {
    assert_eq!(
        to_primitive(&Value::array(vec![Value::Number(1.0), Value::Number(2.0)])),
        Value::from("1,2")
    );
    assert_eq!(to_property_key(&Value::Number(0.0)), "0");
    assert_eq!(to_property_key(&Value::Undefined), "undefined");
}
