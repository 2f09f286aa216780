//! The defunctionalized JIT evaluator: compiles a `Term` once into a flat
//! instruction stream (`compiler`) and then runs it with an explicit
//! frame/value stack instead of the host call stack (`evaluator`),
//! trading the CEK machine's simplicity for roughly an order of magnitude
//! less overhead per step. Both evaluators share the same builtin table,
//! budget accountant, and logger, and are checked against each other in
//! `tests/agreement.rs`.

pub mod compiler;
pub mod evaluator;
pub mod opcode;

pub use compiler::{compile, Program};
pub use evaluator::{JitError, JitEvaluator};
