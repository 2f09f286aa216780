//! Error types for the UPLC evaluator.
//!
//! `UplcError` is the single result-carrying error type for both the CEK
//! machine and the JIT evaluator. The JIT's stack-overflow recovery signal
//! is not a variant here: it is `JitError::Overflow` (`src/jit/evaluator.rs`),
//! an internal signal the hybrid driver intercepts before it can reach a
//! caller, never converted into a `UplcError`.

use thiserror::Error;

use crate::term::BuiltinId;

/// Convenience alias used throughout the crate.
pub type UplcResult<T> = Result<T, UplcError>;

/// All user-visible failure kinds an evaluation can terminate with.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UplcError {
    /// The term explicitly evaluated to `Error`.
    #[error("evaluation failure: user error")]
    UserError,

    /// The budget would have gone negative before a charged step executed.
    #[error("out of budget")]
    OutOfBudget,

    /// A non-function value (constant, data, constructor value, ...) was
    /// applied to an argument.
    #[error("applied a non-function value")]
    NonFunctionApplied,

    /// `Force` was applied to a value that is neither a thunk nor a partial
    /// builtin awaiting forces.
    #[error("force applied to a non-polymorphic value")]
    NonPolymorphicInstantiation,

    /// A saturated builtin's arguments failed to match its type schema.
    #[error("builtin {0:?} received arguments of the wrong type")]
    BuiltinTypeError(BuiltinId),

    /// A saturated builtin's reduction rule failed at runtime (e.g. integer
    /// division by zero, signature verification input malformed).
    #[error("builtin {0:?} failed: {1}")]
    BuiltinRuntimeError(BuiltinId, String),

    /// `Case` selected a tag with no corresponding branch.
    #[error("case has no branch for tag {0}")]
    CaseMissingBranch(i64),

    /// A `Builtin` term referenced a tag outside the known builtin range.
    #[error("unknown builtin tag {0}")]
    UnknownBuiltin(u8),

    /// The term was structurally invalid, e.g. a `Var` escaping its lexical
    /// scope, or a `Case` over a non-constructor.
    #[error("malformed program: {0}")]
    MalformedProgram(String),
}

impl UplcError {
    pub fn builtin_type_error(id: BuiltinId) -> Self {
        UplcError::BuiltinTypeError(id)
    }

    pub fn builtin_runtime_error(id: BuiltinId, msg: impl Into<String>) -> Self {
        UplcError::BuiltinRuntimeError(id, msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        UplcError::MalformedProgram(msg.into())
    }

    /// Whether this error kind originates from the builtin table rather
    /// than from core machine transitions.
    pub fn is_builtin_error(&self) -> bool {
        matches!(
            self,
            UplcError::BuiltinTypeError(_) | UplcError::BuiltinRuntimeError(_, _)
        )
    }

    /// A short category label, used for metrics/logging, not for matching.
    pub fn category(&self) -> &'static str {
        match self {
            UplcError::UserError => "user_error",
            UplcError::OutOfBudget => "out_of_budget",
            UplcError::NonFunctionApplied => "non_function_applied",
            UplcError::NonPolymorphicInstantiation => "non_polymorphic_instantiation",
            UplcError::BuiltinTypeError(_) => "builtin_type_error",
            UplcError::BuiltinRuntimeError(_, _) => "builtin_runtime_error",
            UplcError::CaseMissingBranch(_) => "case_missing_branch",
            UplcError::UnknownBuiltin(_) => "unknown_builtin",
            UplcError::MalformedProgram(_) => "malformed_program",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_stable_per_variant() {
        assert_eq!(UplcError::OutOfBudget.category(), "out_of_budget");
        assert_eq!(
            UplcError::CaseMissingBranch(3).category(),
            "case_missing_branch"
        );
    }

    #[test]
    fn builtin_errors_are_classified() {
        assert!(UplcError::builtin_type_error(BuiltinId(0)).is_builtin_error());
        assert!(!UplcError::OutOfBudget.is_builtin_error());
    }
}
