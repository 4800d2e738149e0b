//! The dynamic value produced and consumed by evaluation.
//!
//! [`Value`] mirrors the JavaScript value universe the expression language
//! can reach: primitives, regex objects, arrays, plain objects, callables,
//! and pending asynchronous results. Arrays and objects are
//! reference-counted with interior mutability so that `delete` and `++`/`--`
//! observe shared state the way expressions expect.
//!
//! # Example
//!
//! ```
//! use estree_eval_core::values::Value;
//!
//! let v = Value::object([("tags", Value::array(vec![Value::from("a")]))]);
//! assert_eq!(v.to_string(), "[object Object]");
//! ```

use core::cell::RefCell;
use core::fmt;
use std::future::Future;
use std::rc::Rc;

use ecow::EcoString;
use num_bigint::BigInt;
use regex::RegexBuilder;

use super::coerce;
use super::function::FunctionValue;
use super::pending::Pending;
use crate::evaluator::EvalError;

/// Plain objects are string-keyed maps preserving nothing beyond the
/// entries themselves: no prototype, no property attributes.
pub type ObjectMap = hashbrown::HashMap<EcoString, Value>;

/// A compiled regular expression carrying its source spelling.
#[derive(Debug)]
pub struct RegexValue {
    pub source: EcoString,
    pub flags: EcoString,
    regex: regex::Regex,
}

impl RegexValue {
    /// Compile from an ESTree `RegExpLiteral` pattern and flag string.
    ///
    /// `g`, `y`, and `u` change nothing here (matching is one-shot and
    /// patterns are already Unicode); unknown flags are a syntax error.
    pub fn new(pattern: &str, flags: &str) -> Result<Self, EvalError> {
        let mut builder = RegexBuilder::new(pattern);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'g' | 'y' | 'u' => {}
                other => {
                    return Err(EvalError::Syntax(format!(
                        "Invalid regular expression flag \"{other}\""
                    )));
                }
            }
        }
        let regex = builder
            .build()
            .map_err(|err| EvalError::Syntax(format!("Invalid regular expression: {err}")))?;
        Ok(Self {
            source: pattern.into(),
            flags: flags.into(),
            regex,
        })
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

/// A single evaluated value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(Rc<BigInt>),
    Str(EcoString),
    Regex(Rc<RegexValue>),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<ObjectMap>>),
    Function(Rc<FunctionValue>),
    Pending(Pending),
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn object<K: Into<EcoString>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    pub fn bigint(value: BigInt) -> Value {
        Value::BigInt(Rc::new(value))
    }

    pub fn regex(pattern: &str, flags: &str) -> Result<Value, EvalError> {
        Ok(Value::Regex(Rc::new(RegexValue::new(pattern, flags)?)))
    }

    pub fn function(
        name: impl Into<EcoString>,
        body: impl Fn(Option<&Value>, &[Value]) -> Result<Value, EvalError> + 'static,
    ) -> Value {
        Value::Function(Rc::new(FunctionValue::new(Some(name.into()), body)))
    }

    pub fn pending(future: impl Future<Output = Value> + 'static) -> Value {
        Value::Pending(Pending::new(future))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn truthy(&self) -> bool {
        coerce::to_boolean(self)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The `typeof` tag.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::Str(_) => "string",
            Value::Function(_) => "function",
            Value::Regex(_) | Value::Array(_) | Value::Object(_) | Value::Pending(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.into())
    }
}

impl From<EcoString> for Value {
    fn from(s: EcoString) -> Value {
        Value::Str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Value {
        Value::array(elements)
    }
}

/// Structural equality, for assertions and `includes`-style containment.
///
/// Numbers follow IEEE (`NaN != NaN`); arrays and objects compare deeply;
/// functions, regexes, and pending values compare by identity. This is
/// deliberately not `===`; see `coerce::strict_eq` for that.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Regex(a), Value::Regex(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Pending(a), Value::Pending(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::BigInt(n) => f.debug_tuple("BigInt").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Regex(r) => write!(f, "Regex(/{}/{})", r.source, r.flags),
            Value::Array(items) => f.debug_list().entries(items.borrow().iter()).finish(),
            Value::Object(map) => f.debug_map().entries(map.borrow().iter()).finish(),
            Value::Function(fun) => fun.fmt(f),
            Value::Pending(p) => p.fmt(f),
        }
    }
}

/// JavaScript `String()` conversion.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&coerce::to_string(self))
    }
}
