//! Public API surface: contexts and options.

mod context;
mod options;

pub use context::Context;
pub use options::{CompileFn, EvalOptions, VisitorFn};
