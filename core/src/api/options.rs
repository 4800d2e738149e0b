//! Per-call evaluation options.

use core::fmt;
use std::rc::Rc;

use ecow::EcoString;
use hashbrown::HashMap;

use super::context::Context;
use crate::evaluator::EvalError;
use crate::syntax::{Node, NodeKind};
use crate::values::Value;

/// A caller-supplied handler replacing the built-in behavior for one node
/// kind, given the node and the ambient bindings.
pub type VisitorFn = Rc<dyn Fn(&Node, &Context) -> Result<Value, EvalError>>;

/// The opt-in compile capability for function-literal bodies: given the
/// validated node and a snapshot of the context bindings, produce the
/// callable (or other value) the literal evaluates to.
pub type CompileFn = Rc<dyn Fn(&Node, &[(EcoString, Value)]) -> Result<Value, EvalError>>;

/// Options for one evaluation call.
///
/// The defaults are the safe ones: strict-by-default identifier
/// resolution, function invocation disabled, governor limits on.
///
/// # Example
///
/// ```
/// use estree_eval_core::api::EvalOptions;
///
/// let options = EvalOptions {
///     functions: true,
///     budget: Some(10_000),
///     ..EvalOptions::default()
/// };
/// ```
#[derive(Clone)]
pub struct EvalOptions {
    /// Tri-state strictness. `None` (the default) resolves identifiers
    /// strictly but keeps non-strict `in` containment; `Some(true)` is
    /// fully strict; `Some(false)` trades errors for soft failures.
    pub strict: Option<bool>,

    /// Make `&&`, `||`, and `??` return booleans instead of the deciding
    /// operand.
    pub boolean_logical_operators: bool,

    /// Enable the function-invocation subsystem (calls, `new`, function
    /// literals, `await`, tagged templates).
    pub functions: bool,

    /// Let string-literal member keys resolve through the computed
    /// (context-first) path instead of normalizing to static keys.
    pub allow_context_string_literals: bool,

    /// Recognize `x = ~/re/` as a regex-match test. On by default.
    pub regex_operator: bool,

    /// Maximum tree nesting depth.
    ///
    /// Default: 50
    pub max_expression_depth: usize,

    /// Maximum length of any array built during evaluation (literals and
    /// spreads).
    ///
    /// Default: 10 000
    pub max_array_length: usize,

    /// Total node-visit budget for the call (if `Some`).
    ///
    /// Default: None
    pub budget: Option<u64>,

    /// Per-kind visitor overrides, consulted before built-in dispatch.
    pub visitors: HashMap<NodeKind, VisitorFn>,

    /// Compile capability for function literals; without it they fail
    /// after static validation.
    pub compile: Option<CompileFn>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            strict: None,
            boolean_logical_operators: false,
            functions: false,
            allow_context_string_literals: false,
            regex_operator: true,
            max_expression_depth: 50,
            max_array_length: 10_000,
            budget: None,
            visitors: HashMap::new(),
            compile: None,
        }
    }
}

impl EvalOptions {
    /// Identifier resolution is strict unless strictness was explicitly
    /// turned off.
    pub(crate) fn strict_resolution(&self) -> bool {
        self.strict != Some(false)
    }

    /// Behaviors gated on strictness being explicitly requested
    /// (`in` key-presence semantics, bare-identifier type errors).
    pub(crate) fn strict_explicit(&self) -> bool {
        self.strict == Some(true)
    }
}

impl fmt::Debug for EvalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalOptions")
            .field("strict", &self.strict)
            .field("boolean_logical_operators", &self.boolean_logical_operators)
            .field("functions", &self.functions)
            .field(
                "allow_context_string_literals",
                &self.allow_context_string_literals,
            )
            .field("regex_operator", &self.regex_operator)
            .field("max_expression_depth", &self.max_expression_depth)
            .field("max_array_length", &self.max_array_length)
            .field("budget", &self.budget)
            .field("visitors", &self.visitors.len())
            .field("compile", &self.compile.is_some())
            .finish()
    }
}
