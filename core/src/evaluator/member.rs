//! Identifier and member-access resolution, shared by both evaluators.
//!
//! Nothing here recurses into the tree; the walkers evaluate object and
//! key subexpressions first and hand the values over. This keeps the
//! guard checks and escalation rules in exactly one place.

use ecow::EcoString;

use super::error::EvalError;
use super::state::EvalState;
use super::Outcome;
use crate::api::{Context, EvalOptions};
use crate::guard::is_safe_key;
use crate::syntax::Node;
use crate::values::coerce;
use crate::values::Value;

/// Read one own property off a value. Arrays and strings expose `length`
/// and numeric indices; everything else resolves to undefined.
pub(crate) fn read_property(value: &Value, key: &str) -> Value {
    match value {
        Value::Object(map) => map.borrow().get(key).cloned().unwrap_or_default(),
        Value::Array(items) => {
            if key == "length" {
                return Value::Number(items.borrow().len() as f64);
            }
            key.parse::<usize>()
                .ok()
                .and_then(|index| items.borrow().get(index).cloned())
                .unwrap_or_default()
        }
        Value::Str(s) => {
            if key == "length" {
                return Value::Number(s.chars().count() as f64);
            }
            key.parse::<usize>()
                .ok()
                .and_then(|index| s.chars().nth(index))
                .map(|c| Value::Str(ecow::eco_format!("{c}")))
                .unwrap_or_default()
        }
        Value::Regex(r) => match key {
            "source" => Value::Str(r.source.clone()),
            "flags" => Value::Str(r.flags.clone()),
            _ => Value::Undefined,
        },
        _ => Value::Undefined,
    }
}

/// Resolve a bare identifier against the context.
///
/// `shorthand_parent` marks the value position of a shorthand object
/// property (`{ a }`), which escalates like a container element.
pub(crate) fn resolve_identifier(
    name: &str,
    cx: &Context,
    shorthand_parent: bool,
    state: &mut EvalState,
    options: &EvalOptions,
) -> Result<Outcome, EvalError> {
    if !is_safe_key(name) {
        return Ok(Outcome::Value(Value::Undefined));
    }
    // The spelling `undefined` is the value undefined, except inside a
    // container, where only context bindings resolve.
    if name == "undefined" && !state.in_container() {
        return Ok(Outcome::Value(Value::Undefined));
    }
    if let Some(value) = cx.get(name) {
        return Ok(Outcome::Value(value));
    }
    if shorthand_parent || state.in_container() {
        if options.strict_resolution() {
            return Err(EvalError::undefined_identifier(name));
        }
        state.fail = true;
        return Ok(Outcome::Fail);
    }
    if options.strict_explicit() && !options.functions {
        return Err(EvalError::undefined_context(name));
    }
    Ok(Outcome::Value(Value::Undefined))
}

/// The statically-spelled key of a member access, if it has one: a dot
/// access, or a string-literal key being normalized to one.
pub(crate) fn static_key(
    property: &Node,
    computed: bool,
    options: &EvalOptions,
) -> Option<EcoString> {
    match property {
        Node::Identifier { name } if !computed => Some(name.clone()),
        Node::StringLiteral { value } if !options.allow_context_string_literals => {
            Some(value.clone())
        }
        Node::NumericLiteral { value } => Some(coerce::format_number(*value)),
        _ => None,
    }
}

/// Resolve a statically-spelled member key against an evaluated object.
/// Unsafe keys cancel the enclosing expression.
pub(crate) fn resolve_static(
    object: &Value,
    key: &str,
    state: &mut EvalState,
    options: &EvalOptions,
) -> Result<Outcome, EvalError> {
    if !is_safe_key(key) {
        state.fail = true;
        return Ok(Outcome::Fail);
    }
    if options.functions && !object.truthy() {
        return Ok(Outcome::Fail);
    }
    if object.is_nullish() {
        return nullish_object(key, state, options);
    }
    Ok(Outcome::Value(read_property(object, key)))
}

/// Resolve a computed member key (already evaluated to a value) against
/// an evaluated object. Unsafe keys resolve softly to undefined here, so
/// a computed probe cannot distinguish the denylist from a missing key.
pub(crate) fn resolve_computed(
    object: &Value,
    key: &Value,
    state: &mut EvalState,
    options: &EvalOptions,
) -> Result<Outcome, EvalError> {
    let key = coerce::to_property_key(key);
    if !is_safe_key(&key) {
        return Ok(Outcome::Value(Value::Undefined));
    }
    if options.functions && !object.truthy() {
        return Ok(Outcome::Fail);
    }
    if object.is_nullish() {
        return nullish_object(&key, state, options);
    }
    Ok(Outcome::Value(read_property(object, &key)))
}

fn nullish_object(
    key: &str,
    state: &mut EvalState,
    options: &EvalOptions,
) -> Result<Outcome, EvalError> {
    if options.strict_resolution() {
        return Err(EvalError::undefined_context(key));
    }
    if state.in_container() {
        state.fail = true;
        return Ok(Outcome::Fail);
    }
    Ok(Outcome::Value(Value::Undefined))
}

/// Method binding: when invocation is enabled, a function read off an
/// object keeps that object as its receiver.
pub(crate) fn bind_if_function(result: Value, owner: &Value, options: &EvalOptions) -> Value {
    match (&result, options.functions) {
        (Value::Function(fun), true) => Value::Function(fun.bind(owner.clone())),
        _ => result,
    }
}
