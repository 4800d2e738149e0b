//! Sandboxed evaluation of ESTree expression trees.
//!
//! Takes an already-parsed JavaScript *expression* tree (babel/ESTree
//! JSON) and evaluates it against caller-supplied bindings, with no
//! access to the host object model: a denylist guard keeps prototype
//! machinery unreachable, a resource governor bounds depth, array
//! growth, and total node visits, and function invocation is off unless
//! explicitly enabled. Parsing is out of scope; any ESTree-producing
//! parser works.
//!
//! The same semantics are available synchronously
//! ([`evaluator::evaluate_sync`]) and asynchronously
//! ([`evaluator::evaluate`]), which additionally awaits pending values
//! supplied by the context.

pub mod api;
pub mod evaluator;
pub mod guard;
pub mod preprocessor;
pub mod syntax;
pub mod values;

mod variables;

pub use api::{Context, EvalOptions};
pub use evaluator::{evaluate, evaluate_sync, EvalError, ResourceError};
pub use values::Value;
pub use variables::variables;
