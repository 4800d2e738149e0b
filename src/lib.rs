//! estree-eval - Sandboxed evaluation of ESTree expression trees
//!
//! # Overview
//!
//! estree-eval takes an already-parsed JavaScript *expression* tree (the
//! ESTree/babel JSON any JS parser produces) and evaluates it against
//! caller-supplied bindings, without giving the expression access to a
//! host object model. Common use cases include:
//!
//! - Filter and routing rules over structured data
//! - Feature flags and conditional logic
//! - Template-style interpolation with real expression semantics
//!
//! Three safety mechanisms are always on:
//!
//! 1. A **guard** denylists `constructor`, `prototype`, and `__proto__`
//!    everywhere a property key can appear, and soft-fails instead of
//!    raising so the denylist cannot be probed.
//! 2. A **resource governor** bounds tree depth, array growth, and
//!    (optionally) total node visits.
//! 3. **Function invocation is off by default**; enabling it still runs
//!    function literals through a static no-execute pass, and compiling
//!    them requires an explicit capability.
//!
//! # Quick Start
//!
//! ```
//! use estree_eval::{evaluate_sync, Context, EvalOptions, Value};
//! use estree_eval::syntax::Node;
//!
//! // `1 + 2`, as parsed by babel.
//! let tree: Node = serde_json::from_str(
//!     r#"{"type": "BinaryExpression", "operator": "+",
//!         "left": {"type": "NumericLiteral", "value": 1},
//!         "right": {"type": "NumericLiteral", "value": 2}}"#,
//! ).unwrap();
//!
//! let cx = Context::new();
//! let result = evaluate_sync(&tree, &cx, &EvalOptions::default()).unwrap();
//! assert_eq!(result, Value::Number(3.0));
//! ```
//!
//! # Asynchronous contexts
//!
//! A context value may be [`Value::pending`]: work that has not finished
//! yet. [`evaluate`] awaits such values at their point of use;
//! [`evaluate_sync`] reports them as a type error.

// Re-export the public API from estree-eval-core
pub use estree_eval_core::api::{CompileFn, Context, EvalOptions, VisitorFn};
pub use estree_eval_core::evaluator::{evaluate, evaluate_sync, EvalError, ResourceError};
pub use estree_eval_core::values::{self, FunctionValue, Pending, Value};
pub use estree_eval_core::{guard, preprocessor, syntax, variables};
