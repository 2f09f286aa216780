//! Exercises the hybrid driver end to end: the ordinary path runs on the
//! JIT, and a term deep enough to overflow a bounded frame stack falls
//! back to the CEK machine and still produces the right answer.

use num_bigint::BigInt;
use std::rc::Rc;

use plutus_vm::builtin::Builtin;
use plutus_vm::constant::Constant;
use plutus_vm::logger::NoopLogger;
use plutus_vm::term::BuiltinId;
use plutus_vm::{Budget, HybridDriver, MachineParameters, Term, Value};

fn int(n: i64) -> Rc<Term> {
    Term::constant(Constant::Integer(BigInt::from(n)))
}

fn add_builtin() -> Rc<Term> {
    Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()))
}

#[test]
fn ordinary_terms_succeed() {
    let params = MachineParameters::default();
    let mut logger = NoopLogger;
    let mut driver = HybridDriver::new(&params, Budget::new(1_000_000, 1_000_000), &mut logger);

    let term = Term::apply(Term::apply(add_builtin(), int(5)), int(10));
    assert_eq!(driver.evaluate(&term).unwrap(), Value::Integer(BigInt::from(15)));
}

#[test]
fn deeply_recursive_term_recovers_through_the_cek_fallback() {
    let params = MachineParameters::default();
    let mut logger = NoopLogger;
    let mut driver = HybridDriver::new(
        &params,
        Budget::new(1_000_000_000_000, 1_000_000_000_000),
        &mut logger,
    );

    let add = add_builtin();
    let depth = 20_000;
    let mut term = int(0);
    for _ in 0..depth {
        term = Term::apply(Term::apply(add.clone(), int(1)), term);
    }

    assert_eq!(
        driver.evaluate(&term).unwrap(),
        Value::Integer(BigInt::from(depth as i64))
    );
}

#[test]
fn budget_exhaustion_is_not_retried_through_the_fallback() {
    let params = MachineParameters::default();
    let mut logger = NoopLogger;
    let mut driver = HybridDriver::new(&params, Budget::new(0, 0), &mut logger);

    let term = Term::apply(Term::apply(add_builtin(), int(5)), int(10));
    assert!(driver.evaluate(&term).is_err());
}
