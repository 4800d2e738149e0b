//! The expression-tree evaluator.
//!
//! Two walkers share one set of semantics: [`evaluate_sync`] refuses
//! pending values, [`evaluate`] awaits them at the point of use. Operator
//! behavior, identifier and member resolution, the safety guard, and the
//! resource governor are common modules, so the two forms can only
//! disagree about asynchrony.
//!
//! # Example
//!
//! ```
//! use estree_eval_core::api::{Context, EvalOptions};
//! use estree_eval_core::evaluator::evaluate_sync;
//! use estree_eval_core::syntax::Node;
//! use estree_eval_core::values::Value;
//!
//! let tree: Node = serde_json::from_str(
//!     r#"{"type": "BinaryExpression", "operator": "+",
//!         "left": {"type": "NumericLiteral", "value": 1},
//!         "right": {"type": "NumericLiteral", "value": 2}}"#,
//! ).unwrap();
//! let result = evaluate_sync(&tree, &Context::new(), &EvalOptions::default()).unwrap();
//! assert_eq!(result, Value::Number(3.0));
//! ```

mod error;
mod eval;
mod eval_async;
mod functions;
mod member;
mod operators;
mod state;

pub use error::{EvalError, ResourceError};

#[cfg(test)]
mod eval_test;

use num_bigint::BigInt;

use crate::api::{Context, EvalOptions};
use crate::syntax::{LiteralValue, Node, RegexLiteral};
use crate::values::Value;

/// Evaluate a tree synchronously. Pending context values are a type
/// error here; everything else behaves exactly like [`evaluate`].
pub fn evaluate_sync(
    tree: &Node,
    context: &Context,
    options: &EvalOptions,
) -> Result<Value, EvalError> {
    tracing::debug!(kind = tree.kind().name(), "evaluating expression tree");
    eval::Evaluator::new(options).run(tree, context)
}

/// Evaluate a tree, awaiting pending context values wherever they are
/// used.
pub async fn evaluate(
    tree: &Node,
    context: &Context,
    options: &EvalOptions,
) -> Result<Value, EvalError> {
    tracing::debug!(kind = tree.kind().name(), "evaluating expression tree");
    eval_async::AsyncEvaluator::new(options).run(tree, context).await
}

/// What one node visit produced: a value, or the soft-failure sentinel
/// that cancels the enclosing expression without raising.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    Value(Value),
    Fail,
}

pub(crate) type EvalResult = Result<Outcome, EvalError>;

/// Unwrap a visit result, propagating errors and the failure sentinel.
macro_rules! try_value {
    ($outcome:expr) => {
        match $outcome? {
            $crate::evaluator::Outcome::Value(value) => value,
            $crate::evaluator::Outcome::Fail => {
                return Ok($crate::evaluator::Outcome::Fail);
            }
        }
    };
}
pub(crate) use try_value;

pub(crate) fn emit(value: Value) -> EvalResult {
    Ok(Outcome::Value(value))
}

pub(crate) fn parse_bigint(digits: &str) -> Result<Value, EvalError> {
    digits
        .parse::<BigInt>()
        .map(Value::bigint)
        .map_err(|_| EvalError::Syntax(format!("Invalid BigInt literal \"{digits}\"")))
}

/// The value of a plain ESTree `Literal` node.
pub(crate) fn literal_value(
    value: &LiteralValue,
    regex: &Option<RegexLiteral>,
) -> Result<Value, EvalError> {
    if let Some(re) = regex {
        return Value::regex(&re.pattern, &re.flags);
    }
    Ok(match value {
        LiteralValue::Null => Value::Null,
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::String(s) => Value::Str(s.clone()),
    })
}

/// Expand a spread source into `out`, under the governor's length limit.
pub(crate) fn spread_into(
    out: &mut Vec<Value>,
    value: &Value,
    state: &state::EvalState,
    options: &EvalOptions,
) -> Result<(), EvalError> {
    match value {
        Value::Array(items) => {
            let items = items.borrow();
            state.check_growth(out.len(), items.len(), options)?;
            out.extend(items.iter().cloned());
            Ok(())
        }
        Value::Str(s) => {
            state.check_growth(out.len(), s.chars().count(), options)?;
            out.extend(s.chars().map(|c| Value::Str(ecow::eco_format!("{c}"))));
            Ok(())
        }
        other => Err(EvalError::Type(format!("{other} is not iterable"))),
    }
}

/// Merge a spread source into an object under construction. Non-objects
/// contribute nothing, like `Object.assign` with a primitive.
pub(crate) fn merge_into(map: &mut crate::values::ObjectMap, value: &Value) {
    if let Value::Object(src) = value {
        for (key, entry) in src.borrow().iter() {
            map.insert(key.clone(), entry.clone());
        }
    }
}
