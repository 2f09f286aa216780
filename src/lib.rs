//! # Untyped Plutus Core evaluator
//!
//! A from-scratch evaluator for Untyped Plutus Core (UPLC): a de Bruijn
//! indexed lambda calculus extended with constants, forcing/delaying,
//! saturating builtin functions, and sum-type constructors/case
//! expressions. This crate provides two evaluators over the same term
//! model, sharing one budget accountant, cost model, trace logger, and
//! builtin function table.
//!
//! ## Features
//!
//! - **CEK reference interpreter**: a tree-walking Compute/Return/Done
//!   machine, the correctness oracle and the safety fallback.
//! - **Defunctionalized JIT evaluator**: a flat instruction stream and
//!   snippet table run over an explicit frame/value stack, trading the
//!   CEK machine's simplicity for much less overhead per step.
//! - **Hybrid driver**: runs the JIT first, falling back to CEK on the
//!   JIT's internal stack-safety signal.
//! - **Shared budget accounting**: a `(cpu, mem)` pair debited
//!   before every step and every builtin application, never after.
//! - **~90 builtin functions**: arithmetic, bytestrings, strings,
//!   cryptographic hashes and signatures, `Data` operations, pairs,
//!   lists, arrays, and BLS12-381 pairing primitives.
//!
//! ## Architecture
//!
//! - **term**: the `Term` AST and de Bruijn variable indices.
//! - **constant / data**: the literal constant and `Data` encodings a
//!   program can embed.
//! - **value**: the runtime `Value` produced by evaluation, plus the
//!   persistent, `Rc`-shared environment the CEK machine closes over.
//! - **size**: the consensus-critical size measure fed to builtin cost
//!   functions.
//! - **cost_model / budget**: per-step and per-builtin cost functions and
//!   the two monotonically-decreasing counters they debit.
//! - **builtin**: the builtin function table, shared by both evaluators
//!   through `apply_saturated`.
//! - **cek**: the reference interpreter.
//! - **jit**: the compiler (`jit::compiler`) and the defunctionalized
//!   evaluator (`jit::evaluator`).
//! - **hybrid**: the JIT-first, CEK-fallback driver.
//! - **logger**: the trace sink `Builtin::Trace` writes to.
//!
//! ## Example
//!
//! ```rust
//! use plutus_vm::{Budget, HybridDriver, MachineParameters, NoopLogger, Term};
//! use plutus_vm::builtin::Builtin;
//! use plutus_vm::constant::Constant;
//! use plutus_vm::term::BuiltinId;
//! use num_bigint::BigInt;
//!
//! # fn example() {
//! // (add 2 3)
//! let add = Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()));
//! let program = Term::apply(
//!     Term::apply(add, Term::constant(Constant::Integer(BigInt::from(2)))),
//!     Term::constant(Constant::Integer(BigInt::from(3))),
//! );
//!
//! let params = MachineParameters::default();
//! let mut logger = NoopLogger;
//! let mut driver = HybridDriver::new(&params, Budget::new(1_000_000, 1_000_000), &mut logger);
//! let result = driver.evaluate(&program).unwrap();
//! assert_eq!(result, plutus_vm::Value::Integer(BigInt::from(5)));
//! # }
//! ```
//!
//! ## Agreement
//!
//! The CEK machine and the JIT evaluator are checked against each other
//! in `tests/agreement.rs`: every term in the seed-scenario corpus must
//! produce the same value and the same budget spend under both.

#![warn(rustdoc::missing_crate_level_docs)]

extern crate std;

/// Resource budget: the two monotonically-decreasing counters that bound
/// an evaluation.
pub mod budget;
/// The builtin function table shared by both evaluators.
pub mod builtin;
/// The CEK reference interpreter.
pub mod cek;
/// Literal constants a `Term` can embed.
pub mod constant;
/// Per-step and per-builtin cost functions.
pub mod cost_model;
/// The `Data` encoding used by `Constant::Data`/`Value::Data`.
pub mod data;
/// Evaluator error types and result handling.
pub mod error;
/// The hybrid JIT-first, CEK-fallback driver.
pub mod hybrid;
/// The defunctionalized JIT compiler and evaluator.
pub mod jit;
/// The trace sink `Builtin::Trace` writes to.
pub mod logger;
/// The consensus-critical value-size measure.
pub mod size;
/// The `Term` AST and de Bruijn variable indices.
pub mod term;
/// The runtime `Value` and the CEK machine's persistent environment.
pub mod value;

pub use budget::{Budget, ExBudget, StepKind};
pub use builtin::Builtin;
pub use cek::CekMachine;
pub use constant::Constant;
pub use cost_model::MachineParameters;
pub use data::Data;
pub use error::{UplcError, UplcResult};
pub use hybrid::HybridDriver;
pub use jit::{compile, JitError, JitEvaluator, Program};
pub use logger::{Logger, NoopLogger, VecLogger};
pub use term::Term;
pub use value::{Env, Value};
