//! Binary, unary, and update operator semantics.
//!
//! These are pure value-to-value functions shared verbatim by the
//! synchronous and asynchronous evaluators; laziness (`&&`, `||`, `??`,
//! conditional branches) lives in the walkers, which decide what to
//! evaluate before anything reaches this module.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

use super::error::EvalError;
use crate::syntax::{BinaryOperator, UnaryOperator, UpdateOperator};
use crate::values::coerce;
use crate::values::Value;

/// Apply a binary operator to two evaluated operands.
///
/// `strict` is the resolved strictness of the call; it only changes `in`,
/// which does containment on strings and arrays when not strict.
pub(crate) fn binary(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    strict: bool,
) -> Result<Value, EvalError> {
    use BinaryOperator::*;
    match op {
        Eq => Ok(Value::Bool(coerce::loose_eq(left, right))),
        NotEq => Ok(Value::Bool(!coerce::loose_eq(left, right))),
        StrictEq => Ok(Value::Bool(coerce::strict_eq(left, right))),
        StrictNotEq => Ok(Value::Bool(!coerce::strict_eq(left, right))),
        Lt | LtEq | Gt | GtEq => relational(op, left, right),
        Add => add(left, right),
        Sub | Mul | Div | Rem | Exp => arithmetic(op, left, right),
        ShiftLeft | ShiftRight | UnsignedShiftRight => shift(op, left, right),
        BitOr | BitXor | BitAnd => bitwise(op, left, right),
        In => contains(left, right, strict),
        Instanceof => match right {
            Value::Function(_) => Ok(Value::Bool(false)),
            _ => Err(EvalError::Type(
                "Right-hand side of 'instanceof' is not callable".into(),
            )),
        },
    }
}

fn relational(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let lp = coerce::to_primitive(left);
    let rp = coerce::to_primitive(right);
    let ordering = match (&lp, &rp) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::BigInt(a), _) => {
            let b = coerce::to_number(&rp)?;
            a.to_f64().unwrap_or(f64::NAN).partial_cmp(&b)
        }
        (_, Value::BigInt(b)) => {
            let a = coerce::to_number(&lp)?;
            a.partial_cmp(&b.to_f64().unwrap_or(f64::NAN))
        }
        _ => coerce::to_number(&lp)?.partial_cmp(&coerce::to_number(&rp)?),
    };
    // Incomparable (NaN involved) is false for every relational operator.
    let result = match ordering {
        None => false,
        Some(ord) => match op {
            BinaryOperator::Lt => ord == Ordering::Less,
            BinaryOperator::LtEq => ord != Ordering::Greater,
            BinaryOperator::Gt => ord == Ordering::Greater,
            _ => ord != Ordering::Less,
        },
    };
    Ok(Value::Bool(result))
}

fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let lp = coerce::to_primitive(left);
    let rp = coerce::to_primitive(right);
    if matches!(lp, Value::Str(_)) || matches!(rp, Value::Str(_)) {
        let mut out = coerce::to_string(&lp);
        out.push_str(&coerce::to_string(&rp));
        return Ok(Value::Str(out));
    }
    match (&lp, &rp) {
        (Value::BigInt(a), Value::BigInt(b)) => Ok(Value::bigint(&**a + &**b)),
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => Err(bigint_mix_error()),
        _ => Ok(Value::Number(coerce::to_number(&lp)? + coerce::to_number(&rp)?)),
    }
}

fn arithmetic(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    use BinaryOperator::*;
    match (left, right) {
        (Value::BigInt(a), Value::BigInt(b)) => {
            let result = match op {
                Sub => &**a - &**b,
                Mul => &**a * &**b,
                Div => {
                    if b.is_zero() {
                        return Err(EvalError::Type("Division by zero".into()));
                    }
                    &**a / &**b
                }
                Rem => {
                    if b.is_zero() {
                        return Err(EvalError::Type("Division by zero".into()));
                    }
                    &**a % &**b
                }
                _ => {
                    if b.is_negative() {
                        return Err(EvalError::Type(
                            "Exponent must be non-negative".into(),
                        ));
                    }
                    let exp = coerce::bigint_to_u32(b, "exponent")?;
                    num_traits::pow((**a).clone(), exp as usize)
                }
            };
            Ok(Value::bigint(result))
        }
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => Err(bigint_mix_error()),
        _ => {
            let a = coerce::to_number(left)?;
            let b = coerce::to_number(right)?;
            let result = match op {
                Sub => a - b,
                Mul => a * b,
                Div => a / b,
                Rem => a % b,
                _ => a.powf(b),
            };
            Ok(Value::Number(result))
        }
    }
}

fn shift(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    use BinaryOperator::*;
    match (left, right) {
        (Value::BigInt(a), Value::BigInt(b)) => {
            if matches!(op, UnsignedShiftRight) {
                return Err(EvalError::Type(
                    "BigInts have no unsigned right shift, use >> instead".into(),
                ));
            }
            let count = coerce::bigint_to_u32(b, "shift count")?;
            let result = match op {
                ShiftLeft => &**a << count,
                _ => &**a >> count,
            };
            Ok(Value::bigint(result))
        }
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => Err(bigint_mix_error()),
        _ => {
            let count = coerce::to_uint32(right)? & 31;
            let result = match op {
                ShiftLeft => (coerce::to_int32(left)? << count) as f64,
                ShiftRight => (coerce::to_int32(left)? >> count) as f64,
                _ => (coerce::to_uint32(left)? >> count) as f64,
            };
            Ok(Value::Number(result))
        }
    }
}

fn bitwise(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    use BinaryOperator::*;
    match (left, right) {
        (Value::BigInt(a), Value::BigInt(b)) => {
            let result = match op {
                BitOr => &**a | &**b,
                BitXor => &**a ^ &**b,
                _ => &**a & &**b,
            };
            Ok(Value::bigint(result))
        }
        (Value::BigInt(_), _) | (_, Value::BigInt(_)) => Err(bigint_mix_error()),
        _ => {
            let a = coerce::to_int32(left)?;
            let b = coerce::to_int32(right)?;
            let result = match op {
                BitOr => a | b,
                BitXor => a ^ b,
                _ => a & b,
            };
            Ok(Value::Number(result as f64))
        }
    }
}

/// `left in right`. Non-strict calls get containment semantics on strings
/// and arrays; everything else is key/index presence on the right operand.
fn contains(left: &Value, right: &Value, strict: bool) -> Result<Value, EvalError> {
    if !strict {
        match right {
            Value::Str(s) => {
                return Ok(Value::Bool(s.contains(coerce::to_string(left).as_str())));
            }
            Value::Array(items) => {
                return Ok(Value::Bool(items.borrow().iter().any(|item| item == left)));
            }
            _ => {}
        }
    }
    match right {
        Value::Object(map) => {
            let key = coerce::to_property_key(left);
            Ok(Value::Bool(map.borrow().contains_key(&key)))
        }
        Value::Array(items) => {
            let key = coerce::to_property_key(left);
            if key == "length" {
                return Ok(Value::Bool(true));
            }
            let present = key
                .parse::<usize>()
                .map(|index| index < items.borrow().len())
                .unwrap_or(false);
            Ok(Value::Bool(present))
        }
        _ => Err(EvalError::Type(format!(
            "Cannot use 'in' operator to search for '{left}' in {right}"
        ))),
    }
}

fn bigint_mix_error() -> EvalError {
    EvalError::Type("Cannot mix BigInt and other types, use explicit conversions".into())
}

/// Apply a unary operator to an evaluated operand. `delete` never reaches
/// here; the walkers resolve it against the member target directly.
pub(crate) fn unary(op: UnaryOperator, value: &Value) -> Result<Value, EvalError> {
    use UnaryOperator::*;
    match op {
        Not => Ok(Value::Bool(!coerce::to_boolean(value))),
        Minus => match value {
            Value::BigInt(n) => Ok(Value::bigint(-(**n).clone())),
            _ => Ok(Value::Number(-coerce::to_number(value)?)),
        },
        Plus => Ok(Value::Number(coerce::to_number(value)?)),
        BitNot => match value {
            Value::BigInt(n) => Ok(Value::bigint(-((**n).clone() + BigInt::from(1)))),
            _ => Ok(Value::Number(!coerce::to_int32(value)? as f64)),
        },
        Typeof => Ok(Value::Str(value.type_of().into())),
        Void => Ok(Value::Undefined),
        Delete => Ok(Value::Bool(false)),
    }
}

/// `++`/`--`. Returns `(value to store, value of the expression)`; the
/// stored value is always the updated one, the expression value depends
/// on prefix/postfix position.
pub(crate) fn update(
    op: UpdateOperator,
    prefix: bool,
    current: &Value,
) -> Result<(Value, Value), EvalError> {
    let delta = match op {
        UpdateOperator::Increment => 1,
        UpdateOperator::Decrement => -1,
    };
    match current {
        Value::BigInt(n) => {
            let updated = Value::bigint(&**n + BigInt::from(delta));
            let result = if prefix {
                updated.clone()
            } else {
                current.clone()
            };
            Ok((updated, result))
        }
        _ => {
            let old = coerce::to_number(current)?;
            let updated = old + delta as f64;
            let result = if prefix { updated } else { old };
            Ok((Value::Number(updated), Value::Number(result)))
        }
    }
}
