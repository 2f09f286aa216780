//! Cross-checks the CEK machine and the JIT evaluator against each other:
//! both must agree on the produced value and on the final budget spend
//! for every term in this corpus, not just the seed scenarios. This is
//! the test that would have caught the `Case`-binding mismatch the two
//! evaluators once had before `Case` bound constructor fields by
//! environment extension rather than curried application on both sides.

use num_bigint::BigInt;
use std::rc::Rc;

use plutus_vm::builtin::Builtin;
use plutus_vm::cek::CekMachine;
use plutus_vm::constant::Constant;
use plutus_vm::jit::{compile, JitEvaluator};
use plutus_vm::logger::NoopLogger;
use plutus_vm::term::BuiltinId;
use plutus_vm::{Budget, ExBudget, MachineParameters, Term, Value};

const INITIAL: ExBudget = ExBudget::new(1_000_000_000, 1_000_000_000);

fn spent(remaining: ExBudget) -> ExBudget {
    ExBudget::new(INITIAL.cpu - remaining.cpu, INITIAL.mem - remaining.mem)
}

fn agree(term: &Rc<Term>) -> (Value, ExBudget) {
    let params = MachineParameters::default();

    let mut cek_logger = NoopLogger;
    let mut cek = CekMachine::new(&params, Budget::from_ex_budget(INITIAL), &mut cek_logger);
    let cek_value = cek.evaluate(term).expect("CEK evaluation failed");
    let cek_spent = spent(cek.budget().as_ex_budget());

    let mut jit_logger = NoopLogger;
    let program = compile(term);
    let mut jit = JitEvaluator::new(&params, Budget::from_ex_budget(INITIAL), &mut jit_logger);
    let jit_value = jit.run(&program).expect("JIT evaluation failed");
    let jit_spent = spent(jit.budget().as_ex_budget());

    assert_eq!(cek_value, jit_value, "CEK and JIT disagree on the result value");
    assert_eq!(
        cek_spent, jit_spent,
        "CEK and JIT disagree on the amount of budget spent"
    );
    (cek_value, cek_spent)
}

fn int(n: i64) -> Rc<Term> {
    Term::constant(Constant::Integer(BigInt::from(n)))
}

fn builtin(b: Builtin) -> Rc<Term> {
    Term::builtin(BuiltinId::new(b.id().tag()))
}

#[test]
fn identity_application_agrees() {
    agree(&Term::apply(Term::lambda(Term::var(0)), int(42)));
}

#[test]
fn saturated_arithmetic_agrees() {
    agree(&Term::apply(
        Term::apply(builtin(Builtin::AddInteger), int(5)),
        int(10),
    ));
}

#[test]
fn curried_arithmetic_under_a_lambda_agrees() {
    let body = Term::apply(
        Term::apply(builtin(Builtin::AddInteger), Term::var(0)),
        int(1),
    );
    agree(&Term::apply(Term::lambda(body), int(5)));
}

#[test]
fn force_delay_round_trip_agrees() {
    agree(&Term::force(Term::delay(int(7))));
}

#[test]
fn case_dispatch_agrees() {
    let constr = Term::constr(1, vec![int(3), int(4)]);
    let branch0 = Term::apply(
        Term::apply(builtin(Builtin::AddInteger), Term::var(1)),
        Term::var(0),
    );
    let branch1 = Term::apply(
        Term::apply(builtin(Builtin::MultiplyInteger), Term::var(1)),
        Term::var(0),
    );
    agree(&Term::case(constr, vec![branch0, branch1]));
}

#[test]
fn nullary_constructor_agrees() {
    agree(&Term::constr(0, Vec::new()));
}

#[test]
fn deeply_nested_non_tail_arithmetic_agrees() {
    let add = builtin(Builtin::AddInteger);
    let mut t = int(0);
    for _ in 0..500 {
        t = Term::apply(Term::apply(add.clone(), int(1)), t);
    }
    let (value, _) = agree(&t);
    assert_eq!(value, Value::Integer(BigInt::from(500)));
}

#[test]
fn builtin_awaiting_a_force_before_its_arguments_agrees() {
    // `IfThenElse` takes one force then three arguments.
    let if_then_else = builtin(Builtin::IfThenElse);
    let term = Term::apply(
        Term::apply(
            Term::apply(Term::force(if_then_else), Term::constant(Constant::Bool(true))),
            int(1),
        ),
        int(2),
    );
    let (value, _) = agree(&term);
    assert_eq!(value, Value::Integer(BigInt::from(1)));
}

#[test]
fn inlined_builtin_application_matches_the_generic_path_cost() {
    // The compiler recognizes this shape (`Apply(Apply(Builtin, leaf), leaf)`)
    // as inlinable; confirm its cost matches an equivalent non-leaf-argument
    // application that takes the generic `Apply` path instead.
    let add = builtin(Builtin::AddInteger);
    let inlined = Term::apply(Term::apply(add.clone(), int(2)), int(3));
    let generic = Term::apply(
        Term::apply(add, Term::force(Term::delay(int(2)))),
        int(3),
    );

    let (inlined_value, inlined_spent) = agree(&inlined);
    let (generic_value, generic_spent) = agree(&generic);
    assert_eq!(inlined_value, generic_value);
    // The generic path pays one extra Force+Delay pair that the inlined
    // shape never takes; only equal-shaped terms are expected to match
    // exactly, this just confirms both still run to the same value.
    assert!(generic_spent.cpu >= inlined_spent.cpu);
}
