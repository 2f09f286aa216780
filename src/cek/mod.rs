//! The CEK reference interpreter: a tree-walking Compute/Return/Done
//! machine over `Term`, kept deliberately simple so it can serve as the
//! semantic ground truth the JIT evaluator is checked against.

use std::rc::Rc;

use crate::budget::{Budget, StepKind};
use crate::builtin::{apply_saturated, Builtin};
use crate::cost_model::MachineParameters;
use crate::error::{UplcError, UplcResult};
use crate::logger::Logger;
use crate::term::Term;
use crate::value::{Env, Value};

/// A context-stack frame: what to do with the value a `Compute` step is
/// about to produce.
enum Frame {
    /// Evaluate `term` in `env` next, applying its value to the value
    /// already on top of the return once it's computed (see `Frame::Fun`).
    Arg { env: Rc<Env>, term: Rc<Term> },
    /// Apply `fun` to the value about to be returned.
    Fun { fun: Value },
    /// Resume the force of the value about to be returned.
    Force,
    /// Accumulate one more evaluated field of a `Constr`.
    Constr {
        tag: i64,
        env: Rc<Env>,
        done: Vec<Value>,
        pending: Vec<Rc<Term>>,
    },
    /// Dispatch the value about to be returned (expected to be a
    /// constructor) to the matching `Case` branch.
    Case { env: Rc<Env>, branches: Vec<Rc<Term>> },
}

/// What the machine should do next: evaluate a term in an environment, or
/// propagate an already-computed value up the context stack.
enum Step {
    Compute(Rc<Env>, Rc<Term>),
    Return(Value),
}

/// The CEK machine. Holds the budget and the trace sink for one
/// evaluation; terms and environments are borrowed/shared via `Rc`.
pub struct CekMachine<'a> {
    params: &'a MachineParameters,
    budget: Budget,
    logger: &'a mut dyn Logger,
}

impl<'a> CekMachine<'a> {
    pub fn new(params: &'a MachineParameters, budget: Budget, logger: &'a mut dyn Logger) -> Self {
        CekMachine {
            params,
            budget,
            logger,
        }
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Evaluate a closed term to a value, consuming budget as it goes.
    pub fn evaluate(&mut self, term: &Rc<Term>) -> UplcResult<Value> {
        if !term.is_closed_under(0) {
            return Err(UplcError::malformed("program has a free variable"));
        }
        self.budget.spend(self.params.startup_cost)?;

        let mut ctx: Vec<Frame> = Vec::new();
        let mut step = Step::Compute(Env::empty(), Rc::clone(term));

        loop {
            step = match step {
                Step::Compute(env, t) => self.compute(&mut ctx, env, t)?,
                Step::Return(v) => match ctx.pop() {
                    None => return Ok(v),
                    Some(frame) => self.apply_frame(&mut ctx, frame, v)?,
                },
            };
        }
    }

    fn charge(&mut self, kind: StepKind) -> UplcResult<()> {
        self.budget.spend(self.params.cost_of(kind))
    }

    fn compute(&mut self, ctx: &mut Vec<Frame>, env: Rc<Env>, term: Rc<Term>) -> UplcResult<Step> {
        match term.as_ref() {
            Term::Var(i) => {
                self.charge(StepKind::Var)?;
                let v = env
                    .get(*i)
                    .cloned()
                    .ok_or_else(|| UplcError::malformed("unbound variable"))?;
                Ok(Step::Return(v))
            }
            Term::LamAbs(body) => {
                self.charge(StepKind::Lambda)?;
                Ok(Step::Return(Value::Closure(Rc::clone(body), env)))
            }
            Term::Apply(f, a) => {
                self.charge(StepKind::Apply)?;
                ctx.push(Frame::Arg {
                    env: Rc::clone(&env),
                    term: Rc::clone(a),
                });
                Ok(Step::Compute(env, Rc::clone(f)))
            }
            Term::Const(c) => {
                self.charge(StepKind::Const)?;
                Ok(Step::Return(Value::from_constant(c)?))
            }
            Term::Builtin(id) => {
                self.charge(StepKind::Builtin)?;
                let b = Builtin::from_id(*id)?;
                Ok(Step::Return(start_partial(b)))
            }
            Term::Delay(body) => {
                self.charge(StepKind::Delay)?;
                Ok(Step::Return(Value::Thunk(Rc::clone(body), env)))
            }
            Term::Force(t) => {
                self.charge(StepKind::Force)?;
                ctx.push(Frame::Force);
                Ok(Step::Compute(env, Rc::clone(t)))
            }
            Term::Constr(tag, fields) => {
                self.charge(StepKind::Constr)?;
                if fields.is_empty() {
                    return Ok(Step::Return(Value::Constr(*tag, vec![])));
                }
                let mut pending = fields.clone();
                let first = pending.remove(0);
                ctx.push(Frame::Constr {
                    tag: *tag,
                    env: Rc::clone(&env),
                    done: Vec::with_capacity(fields.len()),
                    pending,
                });
                Ok(Step::Compute(env, first))
            }
            Term::Case(scrutinee, branches) => {
                self.charge(StepKind::Case)?;
                ctx.push(Frame::Case {
                    env: Rc::clone(&env),
                    branches: branches.clone(),
                });
                Ok(Step::Compute(env, Rc::clone(scrutinee)))
            }
            Term::Error => Err(UplcError::UserError),
        }
    }

    fn apply_frame(&mut self, ctx: &mut Vec<Frame>, frame: Frame, value: Value) -> UplcResult<Step> {
        match frame {
            Frame::Arg { env, term } => {
                ctx.push(Frame::Fun { fun: value });
                Ok(Step::Compute(env, term))
            }
            Frame::Fun { fun } => self.apply(fun, value),
            Frame::Force => self.force(value),
            Frame::Constr {
                tag,
                env,
                mut done,
                mut pending,
            } => {
                done.push(value);
                if pending.is_empty() {
                    Ok(Step::Return(Value::Constr(tag, done)))
                } else {
                    let next = pending.remove(0);
                    ctx.push(Frame::Constr {
                        tag,
                        env: Rc::clone(&env),
                        done,
                        pending,
                    });
                    Ok(Step::Compute(env, next))
                }
            }
            Frame::Case { env, branches } => {
                let (tag, fields) = value
                    .as_constr()
                    .ok_or_else(|| UplcError::malformed("case scrutinee is not a constructor"))?;
                let branch = branches
                    .get(tag as usize)
                    .cloned()
                    .ok_or(UplcError::CaseMissingBranch(tag))?;
                // A branch of arity n is evaluated as if it were the body of
                // n nested lambdas applied to the fields in order: the last
                // field bound becomes Var 0, matching ordinary application.
                let mut branch_env = env;
                for field in fields {
                    branch_env = branch_env.extend(field.clone());
                }
                Ok(Step::Compute(branch_env, branch))
            }
        }
    }

    /// Apply an already-evaluated function value to an already-evaluated
    /// argument value.
    fn apply(&mut self, fun: Value, arg: Value) -> UplcResult<Step> {
        match fun {
            Value::Closure(body, env) => Ok(Step::Compute(env.extend(arg), body)),
            Value::PartialBuiltin {
                id,
                mut args,
                remaining_args,
                remaining_forces,
            } => {
                if remaining_args == 0 {
                    return Err(UplcError::NonFunctionApplied);
                }
                args.push(arg);
                let remaining_args = remaining_args - 1;
                if remaining_args == 0 && remaining_forces == 0 {
                    let builtin = Builtin::from_id(id)?;
                    let result = apply_saturated(builtin, &args, &mut self.budget, self.logger)?;
                    Ok(Step::Return(result))
                } else {
                    Ok(Step::Return(Value::PartialBuiltin {
                        id,
                        args,
                        remaining_args,
                        remaining_forces,
                    }))
                }
            }
            _ => Err(UplcError::NonFunctionApplied),
        }
    }

    fn force(&mut self, value: Value) -> UplcResult<Step> {
        match value {
            Value::Thunk(body, env) => Ok(Step::Compute(env, body)),
            Value::PartialBuiltin {
                id,
                args,
                remaining_args,
                remaining_forces,
            } => {
                if remaining_forces == 0 {
                    return Err(UplcError::NonPolymorphicInstantiation);
                }
                let remaining_forces = remaining_forces - 1;
                if remaining_args == 0 && remaining_forces == 0 {
                    let builtin = Builtin::from_id(id)?;
                    let result = apply_saturated(builtin, &args, &mut self.budget, self.logger)?;
                    Ok(Step::Return(result))
                } else {
                    Ok(Step::Return(Value::PartialBuiltin {
                        id,
                        args,
                        remaining_args,
                        remaining_forces,
                    }))
                }
            }
            _ => Err(UplcError::NonPolymorphicInstantiation),
        }
    }
}

/// The initial `PartialBuiltin` for a freshly-referenced builtin, already
/// saturated for nullary-force-and-arg builtins (none exist in the
/// catalogue today, but the check costs nothing to keep general).
fn start_partial(b: Builtin) -> Value {
    Value::PartialBuiltin {
        id: b.id(),
        args: Vec::new(),
        remaining_args: b.n_args() as usize,
        remaining_forces: b.n_forces() as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::Constant;
    use crate::logger::{NoopLogger, VecLogger};
    use crate::term::Term;
    use num_bigint::BigInt;

    fn run(term: &Rc<Term>) -> UplcResult<Value> {
        let params = MachineParameters::default();
        let mut logger = NoopLogger;
        let mut machine = CekMachine::new(&params, Budget::new(1_000_000_000, 1_000_000_000), &mut logger);
        machine.evaluate(term)
    }

    #[test]
    fn identity_function_returns_its_argument() {
        let id = Term::lambda(Term::var(0));
        let applied = Term::apply(id, Term::constant(Constant::Integer(BigInt::from(42))));
        assert_eq!(run(&applied).unwrap(), Value::Integer(BigInt::from(42)));
    }

    #[test]
    fn add_integer_builtin_reduces_when_saturated() {
        use crate::term::BuiltinId;
        let add = Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()));
        let applied = Term::apply(
            Term::apply(add, Term::constant(Constant::Integer(BigInt::from(2)))),
            Term::constant(Constant::Integer(BigInt::from(3))),
        );
        assert_eq!(run(&applied).unwrap(), Value::Integer(BigInt::from(5)));
    }

    #[test]
    fn force_of_delay_resumes_the_suspended_term() {
        let delayed = Term::delay(Term::constant(Constant::Integer(BigInt::from(7))));
        let forced = Term::force(delayed);
        assert_eq!(run(&forced).unwrap(), Value::Integer(BigInt::from(7)));
    }

    #[test]
    fn case_dispatches_to_the_branch_matching_the_constructor_tag() {
        let constr = Term::constr(1, vec![Term::constant(Constant::Integer(BigInt::from(9)))]);
        let branch0 = Term::constant(Constant::Integer(BigInt::from(0)));
        let branch1 = Term::var(0);
        let case = Term::case(constr, vec![branch0, branch1]);
        assert_eq!(run(&case).unwrap(), Value::Integer(BigInt::from(9)));
    }

    #[test]
    fn case_binds_constructor_fields_as_if_applied_to_the_branch_in_order() {
        let constr = Term::constr(
            1,
            vec![
                Term::constant(Constant::Integer(BigInt::from(3))),
                Term::constant(Constant::Integer(BigInt::from(4))),
            ],
        );
        use crate::term::BuiltinId;
        let add = Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()));
        let mul = Term::builtin(BuiltinId::new(Builtin::MultiplyInteger.id().tag()));
        let branch0 = Term::apply(Term::apply(add, Term::var(1)), Term::var(0));
        let branch1 = Term::apply(Term::apply(mul, Term::var(1)), Term::var(0));
        let case = Term::case(constr, vec![branch0, branch1]);
        assert_eq!(run(&case).unwrap(), Value::Integer(BigInt::from(12)));
    }

    #[test]
    fn error_term_aborts_with_user_error() {
        assert_eq!(run(&Term::error()).unwrap_err(), UplcError::UserError);
    }

    #[test]
    fn applying_a_non_function_value_fails() {
        let bad = Term::apply(
            Term::constant(Constant::Integer(BigInt::from(1))),
            Term::constant(Constant::Unit),
        );
        assert_eq!(run(&bad).unwrap_err(), UplcError::NonFunctionApplied);
    }

    #[test]
    fn budget_exhaustion_is_reported_as_out_of_budget() {
        let params = MachineParameters::default();
        let mut logger = NoopLogger;
        let mut machine = CekMachine::new(&params, Budget::new(1, 1), &mut logger);
        let term = Term::constant(Constant::Integer(BigInt::from(1)));
        assert_eq!(machine.evaluate(&term).unwrap_err(), UplcError::OutOfBudget);
    }

    #[test]
    fn trace_emits_its_message_through_the_logger() {
        use crate::term::BuiltinId;
        let params = MachineParameters::default();
        let mut logger = VecLogger::new();
        let mut machine = CekMachine::new(&params, Budget::new(1_000_000_000, 1_000_000_000), &mut logger);
        let trace = Term::builtin(BuiltinId::new(Builtin::Trace.id().tag()));
        let applied = Term::apply(
            Term::apply(trace, Term::constant(Constant::String("hi".into()))),
            Term::constant(Constant::Unit),
        );
        let result = machine.evaluate(&applied).unwrap();
        assert_eq!(result, Value::Unit);
        assert_eq!(logger.messages(), &["hi".to_string()]);
    }
}
