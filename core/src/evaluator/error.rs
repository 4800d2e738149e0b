//! Evaluation errors.
//!
//! Four families, mirroring how failures surface to callers: syntax
//! (tree shapes the evaluator refuses outright), reference (unresolvable
//! names under strict resolution), type (coercion and capability
//! failures), and resource (a governor limit was hit).
//!
//! Guard rejections are *not* errors; they soft-fail to undefined so the
//! denylist cannot be probed. See the `guard` module.

use thiserror::Error;

use crate::syntax::{AssignmentOperator, NodeKind};

/// Any error raised during evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("{0}")]
    Syntax(String),
    #[error("{0}")]
    Reference(String),
    #[error("{0}")]
    Type(String),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// A limit enforced by the resource governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("Maximum expression depth of {max} exceeded")]
    DepthExceeded { max: usize },
    #[error("Array length limit of {max} exceeded")]
    ArrayLengthExceeded { max: usize },
    #[error("Expression complexity budget exceeded")]
    BudgetExceeded { budget: u64 },
}

impl EvalError {
    pub(crate) fn unsupported(kind: NodeKind) -> Self {
        EvalError::Syntax(format!("visitor \"{kind}\" is not supported"))
    }

    pub(crate) fn functions_not_supported() -> Self {
        EvalError::Syntax("Functions are not supported".into())
    }

    pub(crate) fn assignment_not_supported(op: AssignmentOperator) -> Self {
        EvalError::Syntax(format!("Assignment expression \"{op}\" is not supported"))
    }

    pub(crate) fn undefined_identifier(name: &str) -> Self {
        EvalError::Reference(format!("{name} is undefined"))
    }

    pub(crate) fn undefined_context(name: &str) -> Self {
        EvalError::Type(format!("Cannot read property '{name}' of undefined"))
    }

    pub(crate) fn pending_in_sync() -> Self {
        EvalError::Type("Cannot resolve a pending value during synchronous evaluation".into())
    }

    /// Whether this error came from the resource governor.
    pub fn is_resource(&self) -> bool {
        matches!(self, EvalError::Resource(_))
    }
}
