//! JavaScript abstract-operation coercions: ToBoolean, ToNumber,
//! ToString, ToInt32/ToUint32, and the two equality algorithms.
//!
//! Every operator funnels its operands through these so that both
//! evaluators agree on coercion behavior down to `NaN`, signed zero, and
//! bigint mixing.

use ecow::EcoString;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use std::rc::Rc;

use super::value::Value;
use crate::evaluator::EvalError;

/// ToBoolean.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::BigInt(n) => !n.is_zero(),
        Value::Str(s) => !s.is_empty(),
        _ => true,
    }
}

/// ToString, i.e. what `String(value)` produces.
pub fn to_string(value: &Value) -> EcoString {
    match value {
        Value::Undefined => "undefined".into(),
        Value::Null => "null".into(),
        Value::Bool(true) => "true".into(),
        Value::Bool(false) => "false".into(),
        Value::Number(n) => format_number(*n),
        Value::BigInt(n) => n.to_string().into(),
        Value::Str(s) => s.clone(),
        Value::Regex(r) => ecow::eco_format!("/{}/{}", r.source, r.flags),
        Value::Array(items) => {
            let items = items.borrow();
            let mut out = EcoString::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if !item.is_nullish() {
                    out.push_str(&to_string(item));
                }
            }
            out
        }
        Value::Object(_) => "[object Object]".into(),
        Value::Function(fun) => match fun.name() {
            Some(name) => ecow::eco_format!("function {name}() {{ [native code] }}"),
            None => "function () { [native code] }".into(),
        },
        Value::Pending(_) => "[object Promise]".into(),
    }
}

/// Number-to-string the way JavaScript prints numbers: no trailing `.0`,
/// `NaN`/`Infinity` spelled out, `-0` printed as `0`.
pub fn format_number(n: f64) -> EcoString {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if n == 0.0 {
        return "0".into();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return ecow::eco_format!("{}", n as i128);
    }
    ecow::eco_format!("{n}")
}

/// ToNumber. Errors only for bigints, which JavaScript refuses to
/// silently narrow.
pub fn to_number(value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Undefined => Ok(f64::NAN),
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(*n),
        Value::BigInt(_) => Err(EvalError::Type(
            "Cannot convert a BigInt value to a number".into(),
        )),
        Value::Str(s) => Ok(parse_number_str(s)),
        Value::Array(_) | Value::Object(_) => Ok(parse_number_str(&to_string(value))),
        Value::Regex(_) | Value::Function(_) | Value::Pending(_) => Ok(f64::NAN),
    }
}

/// The string grammar `Number("...")` accepts: optional sign, decimal or
/// radix-prefixed digits, `Infinity`, empty-or-whitespace meaning zero.
pub(crate) fn parse_number_str(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }
    if let Some(oct) = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")) {
        return i64::from_str_radix(oct, 8).map_or(f64::NAN, |n| n as f64);
    }
    if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        return i64::from_str_radix(bin, 2).map_or(f64::NAN, |n| n as f64);
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// ToInt32 (for `|`, `&`, `^`, `~`, `<<`, `>>`).
pub fn to_int32(value: &Value) -> Result<i32, EvalError> {
    Ok(double_to_int32(to_number(value)?))
}

/// ToUint32 (for `>>>`).
pub fn to_uint32(value: &Value) -> Result<u32, EvalError> {
    Ok(double_to_uint32(to_number(value)?))
}

fn double_to_int32(n: f64) -> i32 {
    let m = double_to_uint32(n);
    if m >= 0x8000_0000 {
        (m as i64 - 0x1_0000_0000) as i32
    } else {
        m as i32
    }
}

fn double_to_uint32(n: f64) -> u32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    n.trunc().rem_euclid(4294967296.0) as u32
}

/// ToPrimitive with string hint, used by `+` to decide between
/// concatenation and addition.
pub fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Regex(_)
        | Value::Array(_)
        | Value::Object(_)
        | Value::Function(_)
        | Value::Pending(_) => Value::Str(to_string(value)),
        other => other.clone(),
    }
}

/// ToPropertyKey.
pub fn to_property_key(value: &Value) -> EcoString {
    to_string(value)
}

fn is_object_like(value: &Value) -> bool {
    matches!(
        value,
        Value::Regex(_) | Value::Array(_) | Value::Object(_) | Value::Function(_)
            | Value::Pending(_)
    )
}

/// Strict equality (`===`): same type, same value; reference types by
/// identity.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Regex(x), Value::Regex(y)) => Rc::ptr_eq(x, y),
        (Value::Array(x), Value::Array(y)) => Rc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) => Rc::ptr_eq(x, y),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Pending(x), Value::Pending(y)) => x.ptr_eq(y),
        _ => false,
    }
}

/// Loose equality (`==`), the full abstract-equality ladder including the
/// bigint arms.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Bool(x), _) => loose_eq(&Value::Number(if *x { 1.0 } else { 0.0 }), b),
        (_, Value::Bool(y)) => loose_eq(a, &Value::Number(if *y { 1.0 } else { 0.0 })),
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Number(x), Value::BigInt(y)) | (Value::BigInt(y), Value::Number(x)) => {
            number_eq_bigint(*x, y)
        }
        (Value::Str(s), Value::BigInt(y)) | (Value::BigInt(y), Value::Str(s)) => s
            .trim()
            .parse::<num_bigint::BigInt>()
            .map(|parsed| parsed == **y)
            .unwrap_or(false),
        (Value::Number(x), Value::Str(s)) | (Value::Str(s), Value::Number(x)) => {
            *x == parse_number_str(s)
        }
        _ => {
            if is_object_like(a) && is_object_like(b) {
                strict_eq(a, b)
            } else if is_object_like(a) {
                loose_eq(&to_primitive(a), b)
            } else {
                loose_eq(a, &to_primitive(b))
            }
        }
    }
}

fn number_eq_bigint(x: f64, y: &num_bigint::BigInt) -> bool {
    if !x.is_finite() || x.fract() != 0.0 {
        return false;
    }
    num_bigint::BigInt::from_f64(x).is_some_and(|bx| bx == *y)
}

/// Narrow a bigint to `u32`, for shift counts and exponents.
pub fn bigint_to_u32(n: &num_bigint::BigInt, what: &str) -> Result<u32, EvalError> {
    n.to_u32()
        .ok_or_else(|| EvalError::Type(format!("BigInt {what} out of range")))
}
