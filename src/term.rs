//! The UPLC term AST: the input to both evaluators.
//!
//! Terms are produced by an external deserializer/compiler and are assumed
//! closed (no free `Var`) and immutable for the lifetime of an evaluation.

use std::rc::Rc;

use crate::constant::Constant;

/// Reference to one of the builtin functions, by its table index.
///
/// The tag is a plain `u8` rather than a fieldless enum so that a term
/// deserialized with an out-of-range tag can still be represented; range
/// validation happens when the builtin is looked up (`UnknownBuiltin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuiltinId(pub u8);

impl BuiltinId {
    pub fn new(tag: u8) -> Self {
        BuiltinId(tag)
    }

    pub fn tag(self) -> u8 {
        self.0
    }
}

/// A UPLC term. Cheaply cloneable: recursive positions are `Rc`-wrapped so
/// that sharing a sub-term (e.g. a closure's captured environment) never
/// requires a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// De Bruijn index into the lexical environment; 0 is innermost.
    Var(usize),
    /// Single-argument abstraction; binds index 0 in `body`.
    LamAbs(Rc<Term>),
    /// Function application; call-by-value.
    Apply(Rc<Term>, Rc<Term>),
    /// A literal constant.
    Const(Rc<Constant>),
    /// Reference to a builtin by tag.
    Builtin(BuiltinId),
    /// Suspends a computation; produces a delayed value.
    Delay(Rc<Term>),
    /// Resumes a delayed value.
    Force(Rc<Term>),
    /// Constructs a data-carrying value with an integer tag and an ordered
    /// list of argument terms.
    Constr(i64, Vec<Rc<Term>>),
    /// Branches on a constructor tag; branch index equals constructor tag.
    Case(Rc<Term>, Vec<Rc<Term>>),
    /// Aborts evaluation unconditionally.
    Error,
}

impl Term {
    pub fn var(i: usize) -> Rc<Term> {
        Rc::new(Term::Var(i))
    }

    pub fn lambda(body: Rc<Term>) -> Rc<Term> {
        Rc::new(Term::LamAbs(body))
    }

    pub fn apply(fun: Rc<Term>, arg: Rc<Term>) -> Rc<Term> {
        Rc::new(Term::Apply(fun, arg))
    }

    pub fn constant(c: Constant) -> Rc<Term> {
        Rc::new(Term::Const(Rc::new(c)))
    }

    pub fn builtin(id: BuiltinId) -> Rc<Term> {
        Rc::new(Term::Builtin(id))
    }

    pub fn delay(body: Rc<Term>) -> Rc<Term> {
        Rc::new(Term::Delay(body))
    }

    pub fn force(t: Rc<Term>) -> Rc<Term> {
        Rc::new(Term::Force(t))
    }

    pub fn constr(tag: i64, fields: Vec<Rc<Term>>) -> Rc<Term> {
        Rc::new(Term::Constr(tag, fields))
    }

    pub fn case(scrutinee: Rc<Term>, branches: Vec<Rc<Term>>) -> Rc<Term> {
        Rc::new(Term::Case(scrutinee, branches))
    }

    pub fn error() -> Rc<Term> {
        Rc::new(Term::Error)
    }

    /// Whether this term contains no free variables under the given
    /// lexical depth. Used by `MalformedProgram` validation at evaluator
    /// entry points; not invoked on every sub-term during evaluation.
    pub fn is_closed_under(&self, depth: usize) -> bool {
        match self {
            Term::Var(i) => *i < depth,
            Term::LamAbs(body) => body.is_closed_under(depth + 1),
            Term::Apply(f, a) => f.is_closed_under(depth) && a.is_closed_under(depth),
            Term::Const(_) | Term::Builtin(_) | Term::Error => true,
            Term::Delay(body) => body.is_closed_under(depth),
            Term::Force(t) => t.is_closed_under(depth),
            Term::Constr(_, fields) => fields.iter().all(|f| f.is_closed_under(depth)),
            Term::Case(scrutinee, branches) => {
                scrutinee.is_closed_under(depth) && branches.iter().all(|b| b.is_closed_under(depth))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn closed_term_under_zero_depth() {
        let t = Term::lambda(Term::var(0));
        assert!(t.is_closed_under(0));
    }

    #[test]
    fn free_var_is_not_closed() {
        let t = Term::var(0);
        assert!(!t.is_closed_under(0));
        assert!(t.is_closed_under(1));
    }

    #[test]
    fn constant_integer_is_always_closed() {
        let t = Term::constant(Constant::Integer(BigInt::from(42)));
        assert!(t.is_closed_under(0));
    }
}
