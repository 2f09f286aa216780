//! Bytecode shape for the defunctionalized JIT evaluator: the instruction
//! set, the snippet table entries `EXEC_SNIPPET` indexes into, and the
//! frame descriptors pushed onto `frame_stack`.
//!
//! The runtime-state description enumerates five frame types —
//! `APPLY_ARG`, `APPLY_EXEC`, `FORCE`, `RESTORE_ENV`, `CASE_CONT` — as the
//! ones `OP_APPLY` and `OP_FORCE` need. Threading control back through the
//! shared `OP_RETURN` dispatch after evaluating a `Case` scrutinee or a
//! `Constr` field needs two more of the same shape; `CaseDispatch` and
//! `ConstrField` below play that role and are recorded as such in the
//! design ledger rather than silently folded into the other five.

use std::rc::Rc;

use crate::constant::Constant;
use crate::term::BuiltinId;
use crate::value::Value;

/// One instruction in a compiled program. `ip` is simply an index into the
/// owning `Program::ops` vector.
#[derive(Debug, Clone)]
pub enum Op {
    /// Run `snippets[index]` against the current `value_stack`/`acc` and
    /// fall through to the next instruction.
    ExecSnippet(usize),
    /// Entry point of an `Apply` term. Phase 1 of the three-phase protocol:
    /// push `Frame::ApplyArg(arg_ip)`, jump to `fun_ip`.
    Apply { fun_ip: usize, arg_ip: usize },
    /// Entry point of a `Force` term: push `Frame::Force`, jump to
    /// `target_ip`.
    Force { target_ip: usize },
    /// Entry point of a `LamAbs` term: write a closure capturing the
    /// current `value_stack` depth and `body_ip` into `acc`, fall through
    /// to the adjacent `OP_RETURN`. `body_ip` is filled in by a second
    /// pass once the body has been compiled (it follows this instruction).
    Lambda { body_ip: usize },
    /// Entry point of a `Delay` term, the `Force`-side mirror of `Lambda`.
    Delay { body_ip: usize },
    /// Entry point of a `Constr` term. `field_ips` lists the entry ip of
    /// each field in order; empty for a nullary constructor (writes the
    /// value directly and falls through instead of pushing a frame).
    Constr { tag: i64, field_ips: Vec<usize> },
    /// Entry point of a `Case` term: push `Frame::CaseDispatch(branches)`,
    /// jump to `scrutinee_ip`. `branches[tag]` is the entry ip of the
    /// branch for constructor tag `tag`.
    Case {
        scrutinee_ip: usize,
        branches: Vec<usize>,
    },
    /// Terminates a compiled term's instruction range: pop `frame_stack`
    /// and dispatch on what's found, or halt if it's empty.
    Return,
}

/// An operation attached to `EXEC_SNIPPET`. `Var`/`Const`/`Builtin` mirror
/// the corresponding leaf term forms; `InlineBuiltin` is a compiler-
/// recognized fast path for a saturated builtin application whose
/// arguments are all simple leaves, reduced through the same
/// `apply_saturated` the generic partial-application path uses so its
/// cost and result can never diverge from it.
#[derive(Debug, Clone)]
pub enum Snippet {
    /// Read `value_stack[value_stack.len() - 1 - index]`.
    Var(usize),
    Const(Rc<Constant>),
    /// Start accumulating a fresh partial application of this builtin.
    Builtin(BuiltinId),
    InlineBuiltin {
        builtin: BuiltinId,
        args: Vec<LeafArg>,
    },
    /// The unconditional `Error` term: aborts evaluation with `UserError`.
    Error,
}

/// An argument to an inlined builtin application: resolved directly
/// against the current environment/constant table without emitting or
/// entering any further instructions.
#[derive(Debug, Clone)]
pub enum LeafArg {
    Var(usize),
    Const(Rc<Constant>),
}

/// A frame-stack entry. Carries exactly the data its `OP_RETURN` handler
/// needs to resume whatever was suspended when it was pushed.
#[derive(Debug)]
pub enum Frame {
    /// Pushed by `OP_APPLY` phase 1. On return (the function term's value
    /// now in `acc`): save it, push `ApplyExec`, jump to `arg_ip`.
    ApplyArg { arg_ip: usize },
    /// Pushed by `OP_APPLY` phase 2. On return (the argument's value now in
    /// `acc`): dispatch `fun_value` against it (phase 3).
    ApplyExec { fun_value: Value },
    /// Pushed by `OP_FORCE`. On return: if `acc` is a thunk, jump into its
    /// body (the captured depth already matches, so no stack adjustment is
    /// needed); if it's a partial builtin awaiting forces, consume one and
    /// saturate or re-suspend; anything else is `NonPolymorphicInstantiation`.
    Force,
    /// Pushed after a closure application or a `Case` branch binds its
    /// fields: `n` values were pushed onto `value_stack` and must be popped
    /// again before resuming whatever is under this frame.
    RestoreEnv { n: usize },
    /// Pushed by `OP_CASE`'s entry instruction before the scrutinee runs.
    /// On return: `acc` must be a constructor; look up its tag in
    /// `branches`, push the fields onto `value_stack`, push
    /// `RestoreEnv(fields.len())`, jump to the selected branch.
    CaseDispatch { branches: Rc<[usize]> },
    /// Pushed while evaluating `Constr` fields left to right. On return:
    /// record the field's value, then either move on to the next field or,
    /// if this was the last one, produce the finished constructor value.
    ConstrField {
        tag: i64,
        collected: Vec<Value>,
        remaining_ips: Vec<usize>,
    },
}
