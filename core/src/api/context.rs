//! The binding environment an expression is evaluated against.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use ecow::EcoString;

use crate::values::{ObjectMap, Value};

type Resolver = Rc<dyn Fn(&str) -> Option<Value>>;

/// Name-to-value bindings for one evaluation.
///
/// Cloning is shallow: clones share the same mutable binding table, which
/// is what lets `++a` and `delete obj.k` be observed by the caller
/// afterwards. An optional resolver closure serves names that are not in
/// the table (lazy or computed bindings).
///
/// # Example
///
/// ```
/// use estree_eval_core::api::Context;
/// use estree_eval_core::values::Value;
///
/// let cx = Context::new();
/// cx.set("a", 2i64);
/// assert_eq!(cx.get("a"), Some(Value::Number(2.0)));
/// assert_eq!(cx.get("b"), None);
/// ```
#[derive(Clone, Default)]
pub struct Context {
    bindings: Rc<RefCell<ObjectMap>>,
    resolver: Option<Resolver>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that consults `resolver` for names missing from the
    /// binding table. Returning `None` means unbound; returning
    /// `Some(Value::Undefined)` means bound-to-undefined, which resolves
    /// without escalation even under strict resolution.
    pub fn with_resolver(resolver: impl Fn(&str) -> Option<Value> + 'static) -> Self {
        Self {
            bindings: Rc::default(),
            resolver: Some(Rc::new(resolver)),
        }
    }

    pub fn set(&self, name: impl Into<EcoString>, value: impl Into<Value>) {
        self.bindings.borrow_mut().insert(name.into(), value.into());
    }

    /// `None` when the name is unbound (as opposed to bound to undefined).
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.resolver.as_ref().and_then(|resolve| resolve(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
            || self
                .resolver
                .as_ref()
                .is_some_and(|resolve| resolve(name).is_some())
    }

    /// An independent copy of the current bindings, for scopes whose
    /// mutations must not leak back (function-literal parameter scopes).
    pub(crate) fn child(&self) -> Context {
        Context {
            bindings: Rc::new(RefCell::new(self.bindings.borrow().clone())),
            resolver: self.resolver.clone(),
        }
    }

    /// Snapshot of the direct bindings, for the compile capability.
    pub(crate) fn entries(&self) -> Vec<(EcoString, Value)> {
        self.bindings
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<EcoString>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let cx = Context::new();
        for (name, value) in iter {
            cx.set(name, value);
        }
        cx
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bindings", &self.bindings.borrow())
            .field("resolver", &self.resolver.as_ref().map(|_| ".."))
            .finish()
    }
}
