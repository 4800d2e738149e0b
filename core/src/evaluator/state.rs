//! Per-call mutable evaluation state: the resource governor's counters,
//! the soft-failure flag, and the container stack that decides how
//! unresolved identifiers escalate.

use smallvec::SmallVec;

use super::error::{EvalError, ResourceError};
use crate::api::EvalOptions;
use crate::syntax::NodeKind;

pub(crate) struct EvalState {
    depth: usize,
    visits: u64,
    /// Once set, the whole call is poisoned: every subsequent visit
    /// propagates the failure sentinel and no further side-effecting work
    /// runs.
    pub fail: bool,
    /// Set during the static validation pass over function-literal
    /// bodies; suppresses actual invocation.
    pub no_execute: bool,
    containers: SmallVec<[NodeKind; 8]>,
}

impl EvalState {
    pub fn new() -> Self {
        Self {
            depth: 0,
            visits: 0,
            fail: false,
            no_execute: false,
            containers: SmallVec::new(),
        }
    }

    /// Account for one node visit. Raises when the visit budget or the
    /// depth cap is exceeded; both checks happen before the node's
    /// handler runs, so partial effects never precede a governor error.
    pub fn enter(&mut self, options: &EvalOptions) -> Result<(), EvalError> {
        self.visits += 1;
        if let Some(budget) = options.budget {
            if self.visits > budget {
                return Err(ResourceError::BudgetExceeded { budget }.into());
            }
        }
        self.depth += 1;
        if self.depth > options.max_expression_depth {
            return Err(ResourceError::DepthExceeded {
                max: options.max_expression_depth,
            }
            .into());
        }
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth -= 1;
    }

    pub fn push_container(&mut self, kind: NodeKind) {
        self.containers.push(kind);
    }

    pub fn pop_container(&mut self) {
        self.containers.pop();
    }

    /// Whether evaluation is currently inside an array or object literal
    /// under construction.
    pub fn in_container(&self) -> bool {
        !self.containers.is_empty()
    }

    /// Check that a collection may grow by `additional` elements.
    pub fn check_growth(
        &self,
        len: usize,
        additional: usize,
        options: &EvalOptions,
    ) -> Result<(), EvalError> {
        if len + additional > options.max_array_length {
            return Err(ResourceError::ArrayLengthExceeded {
                max: options.max_array_length,
            }
            .into());
        }
        Ok(())
    }
}
