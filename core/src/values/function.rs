//! Callable values.
//!
//! Contexts expose host behavior to expressions as [`FunctionValue`]s:
//! plain Rust closures over a receiver and an argument slice. A function
//! that needs to do asynchronous work returns a pending value; the
//! asynchronous evaluator awaits it like any other.

use core::fmt;
use std::rc::Rc;

use ecow::EcoString;

use super::value::Value;
use crate::evaluator::EvalError;

type NativeFn = Box<dyn Fn(Option<&Value>, &[Value]) -> Result<Value, EvalError>>;

/// A callable backed by a host closure.
pub struct FunctionValue {
    name: Option<EcoString>,
    body: NativeFn,
}

impl FunctionValue {
    pub fn new(
        name: Option<EcoString>,
        body: impl Fn(Option<&Value>, &[Value]) -> Result<Value, EvalError> + 'static,
    ) -> Self {
        Self {
            name,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invoke with an optional receiver (the `this` of a method call).
    pub fn call(&self, receiver: Option<&Value>, args: &[Value]) -> Result<Value, EvalError> {
        (self.body)(receiver, args)
    }

    /// A new callable with the receiver fixed, as produced by method
    /// member access when function invocation is enabled.
    pub fn bind(self: &Rc<Self>, receiver: Value) -> Rc<FunctionValue> {
        let inner = Rc::clone(self);
        Rc::new(FunctionValue {
            name: self.name.clone(),
            body: Box::new(move |_, args| inner.call(Some(&receiver), args)),
        })
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "FunctionValue({name})"),
            None => f.write_str("FunctionValue(<anonymous>)"),
        }
    }
}
