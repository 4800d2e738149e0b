//! Helpers for the function-invocation subsystem.
//!
//! The walkers own the recursion (argument evaluation, the no-execute
//! pass over function-literal bodies); this module holds the shared
//! non-recursive pieces.

use ecow::EcoString;

use super::error::EvalError;
use crate::api::Context;
use crate::syntax::Node;
use crate::values::Value;

/// Extract parameter names from a function literal. `None` when any
/// parameter is not a plain identifier (destructuring, defaults), which
/// cancels the literal.
pub(crate) fn param_names(params: &[Node]) -> Option<Vec<EcoString>> {
    params
        .iter()
        .map(|param| match param {
            Node::Identifier { name } => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// The scope a function-literal body is validated in: the enclosing
/// bindings plus each parameter bound to a placeholder object, so
/// parameter references resolve without escalating.
pub(crate) fn params_scope(cx: &Context, params: &[EcoString]) -> Context {
    let scope = cx.child();
    for name in params {
        scope.set(name.clone(), Value::object::<EcoString>([]));
    }
    scope
}

/// The strings argument of a tagged template: the cooked text of each
/// quasi, in order.
pub(crate) fn cooked_strings(quasis: &[Node]) -> Value {
    Value::array(
        quasis
            .iter()
            .map(|quasi| match quasi {
                Node::TemplateElement { value, .. } => Value::Str(
                    value.cooked.clone().unwrap_or_else(|| value.raw.clone()),
                ),
                _ => Value::Undefined,
            })
            .collect(),
    )
}

pub(crate) fn missing_compile_error() -> EvalError {
    EvalError::Type(
        "Function expressions require the compile capability (EvalOptions::compile)".into(),
    )
}
