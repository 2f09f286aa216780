//! The defunctionalized JIT evaluator: a single loop over a flat
//! instruction stream (`Op`), a growable accumulator (`acc`), a
//! `value_stack` that doubles as the lexical environment, and a
//! `frame_stack` of continuations. No term is ever walked twice and no
//! environment is ever copied; both stacks are bounded so a pathological
//! program fails fast with `JitError::Overflow` instead of blowing the
//! host stack (the hybrid driver recovers from this by falling back to
//! the CEK machine — see `crate::hybrid`).

use std::rc::Rc;

use crate::budget::{Budget, StepKind};
use crate::builtin::{apply_saturated, Builtin};
use crate::cost_model::MachineParameters;
use crate::error::{UplcError, UplcResult};
use crate::logger::Logger;
use crate::value::Value;

use super::compiler::Program;
use super::opcode::{Frame, LeafArg, Op, Snippet};

/// Default bound on `value_stack.len()` and `frame_stack.len()`. Generous
/// enough for ordinary validator scripts; deeply recursive or badly
/// written ones hit `Overflow` and fall back to the CEK machine rather
/// than risk a host stack overflow (this machine never recurses, but an
/// unbounded stack could still exhaust memory).
pub const DEFAULT_STACK_LIMIT: usize = 8192;

/// Failure of a JIT run. `Overflow` is never surfaced to a caller of
/// `HybridDriver` — it is caught and turned into a CEK retry.
#[derive(Debug)]
pub enum JitError {
    Eval(UplcError),
    Overflow,
}

impl From<UplcError> for JitError {
    fn from(e: UplcError) -> Self {
        JitError::Eval(e)
    }
}

enum Flow {
    Jump(usize),
    Halt(Value),
}

pub struct JitEvaluator<'a> {
    params: &'a MachineParameters,
    budget: Budget,
    logger: &'a mut dyn Logger,
    value_stack: Vec<Value>,
    frame_stack: Vec<Frame>,
    stack_limit: usize,
}

impl<'a> JitEvaluator<'a> {
    pub fn new(params: &'a MachineParameters, budget: Budget, logger: &'a mut dyn Logger) -> Self {
        JitEvaluator::with_stack_limit(params, budget, logger, DEFAULT_STACK_LIMIT)
    }

    pub fn with_stack_limit(
        params: &'a MachineParameters,
        budget: Budget,
        logger: &'a mut dyn Logger,
        stack_limit: usize,
    ) -> Self {
        JitEvaluator {
            params,
            budget,
            logger,
            value_stack: Vec::new(),
            frame_stack: Vec::new(),
            stack_limit,
        }
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    fn charge(&mut self, kind: StepKind) -> Result<(), JitError> {
        self.budget.spend(self.params.cost_of(kind))?;
        Ok(())
    }

    fn push_value(&mut self, v: Value) -> Result<(), JitError> {
        if self.value_stack.len() >= self.stack_limit {
            return Err(JitError::Overflow);
        }
        self.value_stack.push(v);
        Ok(())
    }

    fn push_frame(&mut self, f: Frame) -> Result<(), JitError> {
        if self.frame_stack.len() >= self.stack_limit {
            return Err(JitError::Overflow);
        }
        self.frame_stack.push(f);
        Ok(())
    }

    /// Run a compiled program to completion. `frame_stack` and
    /// `value_stack` are empty again on every return path, matching the
    /// frame-balance invariant: a program that halts has used its stacks
    /// purely as scratch space.
    pub fn run(&mut self, program: &Program) -> Result<Value, JitError> {
        self.budget.spend(self.params.startup_cost)?;
        let mut ip = program.entry_ip;
        let mut acc = Value::Unit;

        loop {
            match &program.ops[ip] {
                Op::ExecSnippet(idx) => {
                    acc = self.exec_snippet(&program.snippets[*idx])?;
                    ip += 1;
                }
                Op::Apply { fun_ip, arg_ip } => {
                    self.charge(StepKind::Apply)?;
                    self.push_frame(Frame::ApplyArg { arg_ip: *arg_ip })?;
                    ip = *fun_ip;
                }
                Op::Force { target_ip } => {
                    self.charge(StepKind::Force)?;
                    self.push_frame(Frame::Force)?;
                    ip = *target_ip;
                }
                Op::Lambda { body_ip } => {
                    self.charge(StepKind::Lambda)?;
                    acc = Value::JitClosure {
                        body_ip: *body_ip,
                        captured_depth: self.value_stack.len(),
                    };
                    ip += 1;
                }
                Op::Delay { body_ip } => {
                    self.charge(StepKind::Delay)?;
                    acc = Value::JitThunk {
                        body_ip: *body_ip,
                        captured_depth: self.value_stack.len(),
                    };
                    ip += 1;
                }
                Op::Constr { tag, field_ips } => {
                    self.charge(StepKind::Constr)?;
                    if field_ips.is_empty() {
                        acc = Value::Constr(*tag, Vec::new());
                        ip += 1;
                    } else {
                        let mut remaining_ips = field_ips.clone();
                        let first = remaining_ips.remove(0);
                        self.push_frame(Frame::ConstrField {
                            tag: *tag,
                            collected: Vec::with_capacity(field_ips.len()),
                            remaining_ips,
                        })?;
                        ip = first;
                    }
                }
                Op::Case {
                    scrutinee_ip,
                    branches,
                } => {
                    self.charge(StepKind::Case)?;
                    self.push_frame(Frame::CaseDispatch {
                        branches: Rc::from(branches.as_slice()),
                    })?;
                    ip = *scrutinee_ip;
                }
                Op::Return => match self.dispatch_return(acc)? {
                    Flow::Jump(next) => {
                        ip = next;
                        acc = Value::Unit;
                    }
                    Flow::Halt(v) => return Ok(v),
                },
            }
        }
    }

    /// Pop and handle frames until one requests a jump (returning
    /// `Flow::Jump`) or the stack is empty (`Flow::Halt`). A frame whose
    /// handling only updates `acc`/`value_stack` (`RestoreEnv`, a
    /// saturating builtin, the last field of a `Constr`) loops back around
    /// to pop the next frame with that new `acc`, exactly as if the inner
    /// term had itself executed an `OP_RETURN`.
    fn dispatch_return(&mut self, mut acc: Value) -> Result<Flow, JitError> {
        loop {
            let frame = match self.frame_stack.pop() {
                None => return Ok(Flow::Halt(acc)),
                Some(f) => f,
            };
            match frame {
                Frame::ApplyArg { arg_ip } => {
                    self.push_frame(Frame::ApplyExec { fun_value: acc })?;
                    return Ok(Flow::Jump(arg_ip));
                }
                Frame::ApplyExec { fun_value } => match fun_value {
                    Value::JitClosure { body_ip, .. } => {
                        self.push_value(acc)?;
                        self.push_frame(Frame::RestoreEnv { n: 1 })?;
                        return Ok(Flow::Jump(body_ip));
                    }
                    Value::PartialBuiltin {
                        id,
                        mut args,
                        remaining_args,
                        remaining_forces,
                    } => {
                        if remaining_args == 0 {
                            return Err(UplcError::NonFunctionApplied.into());
                        }
                        args.push(acc);
                        let remaining_args = remaining_args - 1;
                        acc = if remaining_args == 0 && remaining_forces == 0 {
                            let builtin = Builtin::from_id(id)?;
                            apply_saturated(builtin, &args, &mut self.budget, self.logger)?
                        } else {
                            Value::PartialBuiltin {
                                id,
                                args,
                                remaining_args,
                                remaining_forces,
                            }
                        };
                    }
                    _ => return Err(UplcError::NonFunctionApplied.into()),
                },
                Frame::Force => match acc {
                    Value::JitThunk { body_ip, .. } => return Ok(Flow::Jump(body_ip)),
                    Value::PartialBuiltin {
                        id,
                        args,
                        remaining_args,
                        remaining_forces,
                    } => {
                        if remaining_forces == 0 {
                            return Err(UplcError::NonPolymorphicInstantiation.into());
                        }
                        let remaining_forces = remaining_forces - 1;
                        acc = if remaining_args == 0 && remaining_forces == 0 {
                            let builtin = Builtin::from_id(id)?;
                            apply_saturated(builtin, &args, &mut self.budget, self.logger)?
                        } else {
                            Value::PartialBuiltin {
                                id,
                                args,
                                remaining_args,
                                remaining_forces,
                            }
                        };
                    }
                    _ => return Err(UplcError::NonPolymorphicInstantiation.into()),
                },
                Frame::RestoreEnv { n } => {
                    let new_len = self.value_stack.len().saturating_sub(n);
                    self.value_stack.truncate(new_len);
                }
                Frame::CaseDispatch { branches } => {
                    let (tag, fields) = acc
                        .as_constr()
                        .map(|(t, f)| (t, f.to_vec()))
                        .ok_or_else(|| UplcError::malformed("case scrutinee is not a constructor"))?;
                    let branch_ip = *branches
                        .get(tag as usize)
                        .ok_or(UplcError::CaseMissingBranch(tag))?;
                    let n = fields.len();
                    for field in fields {
                        self.push_value(field)?;
                    }
                    self.push_frame(Frame::RestoreEnv { n })?;
                    return Ok(Flow::Jump(branch_ip));
                }
                Frame::ConstrField {
                    tag,
                    mut collected,
                    mut remaining_ips,
                } => {
                    collected.push(acc);
                    if remaining_ips.is_empty() {
                        acc = Value::Constr(tag, collected);
                    } else {
                        let next = remaining_ips.remove(0);
                        self.push_frame(Frame::ConstrField {
                            tag,
                            collected,
                            remaining_ips,
                        })?;
                        return Ok(Flow::Jump(next));
                    }
                }
            }
        }
    }

    fn exec_snippet(&mut self, snippet: &Snippet) -> Result<Value, JitError> {
        match snippet {
            Snippet::Var(i) => {
                self.charge(StepKind::Var)?;
                let depth = self.value_stack.len();
                let value = depth
                    .checked_sub(1 + i)
                    .and_then(|idx| self.value_stack.get(idx))
                    .cloned()
                    .ok_or_else(|| UplcError::malformed("unbound variable"))?;
                Ok(value)
            }
            Snippet::Const(c) => {
                self.charge(StepKind::Const)?;
                Ok(Value::from_constant(c)?)
            }
            Snippet::Builtin(id) => {
                self.charge(StepKind::Builtin)?;
                let b = Builtin::from_id(*id)?;
                Ok(Value::PartialBuiltin {
                    id: *id,
                    args: Vec::new(),
                    remaining_args: b.n_args() as usize,
                    remaining_forces: b.n_forces() as usize,
                })
            }
            Snippet::InlineBuiltin { builtin, args } => {
                // Charge exactly what the generic path would have: one
                // reference to the builtin, one Apply per argument, one
                // Force per required force, then the builtin's own cost.
                self.charge(StepKind::Builtin)?;
                let b = Builtin::from_id(*builtin)?;
                for _ in 0..b.n_forces() {
                    self.charge(StepKind::Force)?;
                }
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    self.charge(StepKind::Apply)?;
                    values.push(self.resolve_leaf(arg)?);
                }
                Ok(apply_saturated(b, &values, &mut self.budget, self.logger)?)
            }
            Snippet::Error => Err(JitError::Eval(UplcError::UserError)),
        }
    }

    fn resolve_leaf(&self, arg: &LeafArg) -> UplcResult<Value> {
        match arg {
            LeafArg::Var(i) => {
                let depth = self.value_stack.len();
                depth
                    .checked_sub(1 + i)
                    .and_then(|idx| self.value_stack.get(idx))
                    .cloned()
                    .ok_or_else(|| UplcError::malformed("unbound variable"))
            }
            LeafArg::Const(c) => Value::from_constant(c),
        }
    }
}
