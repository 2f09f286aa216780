//! Lowers a `Term` into a flat instruction stream plus a snippet table.
//!
//! Every term form compiles to a range of instructions whose first entry is
//! this term's entry ip and whose last is an `OP_RETURN` (except `Case`,
//! which has no instructions of its own after its entry — the selected
//! branch's own `OP_RETURN` serves as the `Case` term's return). Forward
//! references (a `Lambda`'s `body_ip`, a `Constr`'s `field_ips`, a `Case`'s
//! `branches`) are filled in by back-patching: the referencing instruction
//! is pushed as a placeholder, the referenced range is compiled, and the
//! placeholder is overwritten with the indices now known.

use std::rc::Rc;

use super::opcode::{LeafArg, Op, Snippet};
use crate::builtin::Builtin;
use crate::term::Term;

/// A compiled program: an instruction stream and the snippet table
/// `Op::ExecSnippet` indexes into.
#[derive(Debug, Clone)]
pub struct Program {
    pub ops: Vec<Op>,
    pub snippets: Vec<Snippet>,
    pub entry_ip: usize,
}

/// Compile a closed term into a program ready for `jit::evaluator::run`.
pub fn compile(term: &Rc<Term>) -> Program {
    let mut c = Compiler {
        ops: Vec::new(),
        snippets: Vec::new(),
    };
    let entry_ip = c.compile_term(term);
    Program {
        ops: c.ops,
        snippets: c.snippets,
        entry_ip,
    }
}

struct Compiler {
    ops: Vec<Op>,
    snippets: Vec<Snippet>,
}

impl Compiler {
    fn snippet(&mut self, s: Snippet) -> usize {
        self.snippets.push(s);
        self.snippets.len() - 1
    }

    /// Emit a single `ExecSnippet` + `Return` pair, the shape every leaf
    /// term form (`Var`, `Const`, `Builtin`, inlined builtin application,
    /// `Error`) compiles to.
    fn leaf(&mut self, s: Snippet) -> usize {
        let entry = self.ops.len();
        let idx = self.snippet(s);
        self.ops.push(Op::ExecSnippet(idx));
        self.ops.push(Op::Return);
        entry
    }

    fn compile_term(&mut self, term: &Rc<Term>) -> usize {
        match term.as_ref() {
            Term::Var(i) => self.leaf(Snippet::Var(*i)),
            Term::Const(c) => self.leaf(Snippet::Const(Rc::clone(c))),
            Term::Builtin(id) => self.leaf(Snippet::Builtin(*id)),
            Term::Error => self.leaf(Snippet::Error),
            Term::LamAbs(body) => {
                let entry = self.ops.len();
                self.ops.push(Op::Lambda { body_ip: 0 });
                self.ops.push(Op::Return);
                let body_ip = self.compile_term(body);
                self.ops[entry] = Op::Lambda { body_ip };
                entry
            }
            Term::Delay(body) => {
                let entry = self.ops.len();
                self.ops.push(Op::Delay { body_ip: 0 });
                self.ops.push(Op::Return);
                let body_ip = self.compile_term(body);
                self.ops[entry] = Op::Delay { body_ip };
                entry
            }
            Term::Force(t) => {
                if let Some(snip) = try_inline(term) {
                    return self.leaf(snip);
                }
                let entry = self.ops.len();
                self.ops.push(Op::Force { target_ip: 0 });
                self.ops.push(Op::Return);
                let target_ip = self.compile_term(t);
                self.ops[entry] = Op::Force { target_ip };
                entry
            }
            Term::Apply(f, a) => {
                if let Some(snip) = try_inline(term) {
                    return self.leaf(snip);
                }
                let entry = self.ops.len();
                self.ops.push(Op::Apply { fun_ip: 0, arg_ip: 0 });
                self.ops.push(Op::Return);
                let fun_ip = self.compile_term(f);
                let arg_ip = self.compile_term(a);
                self.ops[entry] = Op::Apply { fun_ip, arg_ip };
                entry
            }
            Term::Constr(tag, fields) => {
                let entry = self.ops.len();
                self.ops.push(Op::Constr {
                    tag: *tag,
                    field_ips: Vec::new(),
                });
                self.ops.push(Op::Return);
                let field_ips: Vec<usize> = fields.iter().map(|f| self.compile_term(f)).collect();
                self.ops[entry] = Op::Constr {
                    tag: *tag,
                    field_ips,
                };
                entry
            }
            Term::Case(scrutinee, branches) => {
                // No adjacent `Return`: a `Case` term is never resumed
                // directly, only via its selected branch's own `Return`
                // (through `CaseDispatch` + `RestoreEnv`), so there is no
                // live path that would ever execute one.
                let entry = self.ops.len();
                self.ops.push(Op::Case {
                    scrutinee_ip: 0,
                    branches: Vec::new(),
                });
                let scrutinee_ip = self.compile_term(scrutinee);
                let branch_ips: Vec<usize> = branches.iter().map(|b| self.compile_term(b)).collect();
                self.ops[entry] = Op::Case {
                    scrutinee_ip,
                    branches: branch_ips,
                };
                entry
            }
        }
    }
}

/// Recognize `term` as a saturated application of a builtin (optionally
/// wrapped in the builtin's required number of `Force`s) to arguments that
/// are all `Var`/`Const` leaves, and if so produce the `InlineBuiltin`
/// snippet for it. Anything else — non-leaf arguments, an under- or
/// over-applied builtin, a non-builtin head — falls through to the
/// generic `Apply`/`Force` compilation, which is always correct, just
/// slower.
fn try_inline(term: &Rc<Term>) -> Option<Snippet> {
    let mut args = Vec::new();
    let mut head = term;
    loop {
        match head.as_ref() {
            Term::Apply(f, a) => {
                args.push(Rc::clone(a));
                head = f;
            }
            _ => break,
        }
    }
    args.reverse();

    let mut forces = 0usize;
    let mut core = head;
    loop {
        match core.as_ref() {
            Term::Force(inner) => {
                forces += 1;
                core = inner;
            }
            _ => break,
        }
    }

    let id = match core.as_ref() {
        Term::Builtin(id) => *id,
        _ => return None,
    };
    let builtin = Builtin::from_id(id).ok()?;
    if forces != builtin.n_forces() as usize || args.len() != builtin.n_args() as usize {
        return None;
    }

    let leaves: Option<Vec<LeafArg>> = args
        .iter()
        .map(|a| match a.as_ref() {
            Term::Var(i) => Some(LeafArg::Var(*i)),
            Term::Const(c) => Some(LeafArg::Const(Rc::clone(c))),
            _ => None,
        })
        .collect();

    let args = leaves?;
    log::debug!("inlining saturated application of builtin tag {}", id.tag());
    Some(Snippet::InlineBuiltin { builtin: id, args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::Constant;
    use crate::term::BuiltinId;
    use num_bigint::BigInt;

    #[test]
    fn identity_application_compiles_to_apply_and_lambda() {
        let id = Term::lambda(Term::var(0));
        let applied = Term::apply(id, Term::constant(Constant::Integer(BigInt::from(1))));
        let program = compile(&applied);
        assert!(matches!(program.ops[program.entry_ip], Op::Apply { .. }));
    }

    #[test]
    fn saturated_leaf_builtin_application_is_inlined() {
        let add = Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()));
        let applied = Term::apply(
            Term::apply(add, Term::constant(Constant::Integer(BigInt::from(2)))),
            Term::constant(Constant::Integer(BigInt::from(3))),
        );
        let program = compile(&applied);
        match &program.ops[program.entry_ip] {
            Op::ExecSnippet(idx) => {
                assert!(matches!(program.snippets[*idx], Snippet::InlineBuiltin { .. }));
            }
            other => panic!("expected an inlined snippet, got {other:?}"),
        }
    }

    #[test]
    fn under_applied_builtin_is_not_inlined() {
        let add = Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()));
        let partial = Term::apply(add, Term::constant(Constant::Integer(BigInt::from(2))));
        let program = compile(&partial);
        assert!(matches!(program.ops[program.entry_ip], Op::Apply { .. }));
    }

    #[test]
    fn builtin_application_with_a_non_leaf_argument_is_not_inlined() {
        let add = Term::builtin(BuiltinId::new(Builtin::AddInteger.id().tag()));
        let nested = Term::apply(
            Term::apply(add.clone(), Term::constant(Constant::Integer(BigInt::from(2)))),
            Term::apply(add, Term::constant(Constant::Integer(BigInt::from(3)))),
        );
        let program = compile(&nested);
        assert!(matches!(program.ops[program.entry_ip], Op::Apply { .. }));
    }
}
