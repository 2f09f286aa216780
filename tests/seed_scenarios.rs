//! The canonical worked examples: one test per scenario, each checked
//! against both evaluators so a regression in either shows up here
//! first, before `agreement.rs`'s broader cross-check.

use num_bigint::BigInt;

use plutus_vm::builtin::Builtin;
use plutus_vm::cek::CekMachine;
use plutus_vm::constant::Constant;
use plutus_vm::jit::{compile, JitEvaluator};
use plutus_vm::logger::{NoopLogger, VecLogger};
use plutus_vm::term::BuiltinId;
use plutus_vm::{Budget, MachineParameters, Term, UplcError, Value};

fn run_cek(term: &std::rc::Rc<plutus_vm::Term>) -> plutus_vm::UplcResult<Value> {
    let params = MachineParameters::default();
    let mut logger = NoopLogger;
    let mut machine = CekMachine::new(&params, Budget::new(1_000_000_000, 1_000_000_000), &mut logger);
    machine.evaluate(term)
}

fn run_jit(term: &std::rc::Rc<plutus_vm::Term>) -> Result<Value, plutus_vm::JitError> {
    let params = MachineParameters::default();
    let mut logger = NoopLogger;
    let program = compile(term);
    let mut machine = JitEvaluator::new(&params, Budget::new(1_000_000_000, 1_000_000_000), &mut logger);
    machine.run(&program)
}

fn add_builtin() -> std::rc::Rc<Term> {
    Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()))
}

fn mul_builtin() -> std::rc::Rc<Term> {
    Term::builtin(BuiltinId::new(Builtin::MultiplyInteger.id().tag()))
}

fn int(n: i64) -> Constant {
    Constant::Integer(BigInt::from(n))
}

#[test]
fn scenario_1_identity() {
    let term = Term::apply(Term::lambda(Term::var(0)), Term::constant(int(42)));
    assert_eq!(run_cek(&term).unwrap(), Value::Integer(BigInt::from(42)));
    assert_eq!(run_jit(&term).unwrap(), Value::Integer(BigInt::from(42)));
}

#[test]
fn scenario_2_arithmetic() {
    let term = Term::apply(
        Term::apply(add_builtin(), Term::constant(int(5))),
        Term::constant(int(10)),
    );
    assert_eq!(run_cek(&term).unwrap(), Value::Integer(BigInt::from(15)));
    assert_eq!(run_jit(&term).unwrap(), Value::Integer(BigInt::from(15)));
}

#[test]
fn scenario_3_curried_arithmetic_under_a_lambda() {
    let body = Term::apply(
        Term::apply(add_builtin(), Term::var(0)),
        Term::constant(int(1)),
    );
    let term = Term::apply(Term::lambda(body), Term::constant(int(5)));
    assert_eq!(run_cek(&term).unwrap(), Value::Integer(BigInt::from(6)));
    assert_eq!(run_jit(&term).unwrap(), Value::Integer(BigInt::from(6)));
}

#[test]
fn scenario_4_force_delay_round_trip() {
    let term = Term::force(Term::delay(Term::constant(int(7))));
    assert_eq!(run_cek(&term).unwrap(), Value::Integer(BigInt::from(7)));
    assert_eq!(run_jit(&term).unwrap(), Value::Integer(BigInt::from(7)));
}

#[test]
fn scenario_5_case() {
    let constr = Term::constr(1, vec![Term::constant(int(3)), Term::constant(int(4))]);
    let branch0 = Term::apply(Term::apply(add_builtin(), Term::var(1)), Term::var(0));
    let branch1 = Term::apply(Term::apply(mul_builtin(), Term::var(1)), Term::var(0));
    let term = Term::case(constr, vec![branch0, branch1]);
    assert_eq!(run_cek(&term).unwrap(), Value::Integer(BigInt::from(12)));
    assert_eq!(run_jit(&term).unwrap(), Value::Integer(BigInt::from(12)));
}

#[test]
fn scenario_6_budget_exhaustion_leaves_the_log_empty() {
    let term = Term::apply(
        Term::apply(add_builtin(), Term::constant(int(5))),
        Term::constant(int(10)),
    );
    let params = MachineParameters::default();
    let mut logger = VecLogger::new();
    let mut machine = CekMachine::new(&params, Budget::new(0, 0), &mut logger);
    let err = machine.evaluate(&term).unwrap_err();
    assert!(matches!(err, UplcError::OutOfBudget));
    assert!(logger.messages().is_empty());
}
