//! Pending values: asynchronous results supplied by the context.
//!
//! A context may bind a name to work that has not finished yet. The
//! asynchronous evaluator awaits such values at the point of use; the
//! synchronous evaluator reports them as a type error, since it has no way
//! to wait.

use core::fmt;
use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use super::value::Value;

/// A value that is still being produced.
///
/// Cloning is cheap and all clones resolve to the same result; the
/// underlying future runs at most once.
#[derive(Clone)]
pub struct Pending {
    inner: Shared<LocalBoxFuture<'static, Value>>,
}

impl Pending {
    pub fn new(future: impl Future<Output = Value> + 'static) -> Self {
        Self {
            inner: future.boxed_local().shared(),
        }
    }

    /// Resolve to the final value, chasing nested pending results.
    pub async fn wait(&self) -> Value {
        let mut value = self.inner.clone().await;
        while let Value::Pending(next) = value {
            value = next.inner.clone().await;
        }
        value
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pending(..)")
    }
}
