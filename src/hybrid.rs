//! The hybrid driver: run the JIT evaluator first, and if it raises its
//! internal stack-safety signal, discard its partial state and re-run the
//! same term on the CEK machine, sharing the same (already partially
//! spent) budget, logger, and parameters.
//!
//! The JIT's frame/value stacks are bounded; a pathological or deeply
//! recursive term hits `JitError::Overflow` before it could ever blow the
//! host stack. The CEK machine recurses through the host call stack
//! instead and has no equivalent bound, so it can finish terms the JIT
//! gives up on. This asymmetry is why the fallback runs in this
//! direction and never the reverse.

use std::rc::Rc;

use crate::budget::Budget;
use crate::cek::CekMachine;
use crate::cost_model::MachineParameters;
use crate::error::UplcResult;
use crate::jit::{compile, JitError, JitEvaluator};
use crate::logger::Logger;
use crate::term::Term;
use crate::value::Value;

/// Runs a term on the JIT evaluator, falling back to the CEK machine on
/// stack overflow. Budget spent by an overflowing JIT attempt is **not**
/// refunded before the CEK retry; callers that need exact cost accounting
/// should drive `CekMachine` directly instead of going through here.
pub struct HybridDriver<'a> {
    params: &'a MachineParameters,
    budget: Budget,
    logger: &'a mut dyn Logger,
}

impl<'a> HybridDriver<'a> {
    pub fn new(params: &'a MachineParameters, budget: Budget, logger: &'a mut dyn Logger) -> Self {
        HybridDriver {
            params,
            budget,
            logger,
        }
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Evaluate a closed term, preferring the JIT path and falling back to
    /// CEK on the JIT's stack-overflow recovery signal. Any other JIT
    /// failure (a user error, a type error, budget exhaustion) is returned
    /// as-is; only `JitError::Overflow` triggers the fallback.
    pub fn evaluate(&mut self, term: &Rc<Term>) -> UplcResult<Value> {
        let program = compile(term);
        let mut jit = JitEvaluator::new(self.params, self.budget, self.logger);
        match jit.run(&program) {
            Ok(v) => {
                self.budget = jit.budget();
                Ok(v)
            }
            Err(JitError::Eval(e)) => {
                self.budget = jit.budget();
                Err(e)
            }
            Err(JitError::Overflow) => {
                log::warn!("JIT evaluator hit its stack bound, falling back to CEK");
                self.budget = jit.budget();
                let mut cek = CekMachine::new(self.params, self.budget, self.logger);
                let result = cek.evaluate(term);
                self.budget = cek.budget();
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::Builtin;
    use crate::constant::Constant;
    use crate::jit::evaluator::DEFAULT_STACK_LIMIT;
    use crate::logger::NoopLogger;
    use crate::term::BuiltinId;
    use num_bigint::BigInt;

    fn driver<'a>(params: &'a MachineParameters, logger: &'a mut dyn Logger) -> HybridDriver<'a> {
        HybridDriver::new(
            params,
            Budget::new(1_000_000_000_000, 1_000_000_000_000),
            logger,
        )
    }

    #[test]
    fn ordinary_term_succeeds_through_the_jit_path() {
        let params = MachineParameters::default();
        let mut logger = NoopLogger;
        let add = Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()));
        let applied = Term::apply(
            Term::apply(add, Term::constant(Constant::Integer(BigInt::from(2)))),
            Term::constant(Constant::Integer(BigInt::from(3))),
        );
        let mut d = driver(&params, &mut logger);
        assert_eq!(d.evaluate(&applied).unwrap(), Value::Integer(BigInt::from(5)));
    }

    /// Build `AddInteger 1 (AddInteger 1 (AddInteger 1 ... 0))`, nested
    /// `depth` deep. The second argument of each level is itself an
    /// unevaluated application, so the frame stack grows one `ApplyArg`/
    /// `ApplyExec` pair per level rather than unwinding as it goes (unlike
    /// a tail-recursive shape, which the JIT's jump-based dispatch would
    /// run in constant frame-stack space).
    fn deeply_nested_addition(depth: usize) -> Rc<Term> {
        let add = Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()));
        let mut t = Term::constant(Constant::Integer(BigInt::from(0)));
        for _ in 0..depth {
            t = Term::apply(
                Term::apply(add.clone(), Term::constant(Constant::Integer(BigInt::from(1)))),
                t,
            );
        }
        t
    }

    #[test]
    fn jit_overflow_falls_back_to_cek_and_still_succeeds() {
        let params = MachineParameters::default();
        let mut logger = NoopLogger;
        let depth = DEFAULT_STACK_LIMIT + 16;
        let term = deeply_nested_addition(depth);

        let mut jit = JitEvaluator::with_stack_limit(
            &params,
            Budget::new(1_000_000_000, 1_000_000_000),
            &mut logger,
            8,
        );
        let program = compile(&term);
        assert!(matches!(jit.run(&program), Err(JitError::Overflow)));

        let mut logger = NoopLogger;
        let mut d = driver(&params, &mut logger);
        assert_eq!(
            d.evaluate(&term).unwrap(),
            Value::Integer(BigInt::from(depth as i64))
        );
    }

    #[test]
    fn user_error_is_not_retried_on_cek() {
        let params = MachineParameters::default();
        let mut logger = NoopLogger;
        let mut d = driver(&params, &mut logger);
        assert!(d.evaluate(&Term::error()).is_err());
    }
}
