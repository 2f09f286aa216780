//! Runtime values shared conceptually by the CEK machine and the JIT
//! evaluator. The CEK machine uses `Env` directly (§ below); the JIT
//! evaluator keeps an equivalent notion of environment in its value stack
//! (see `jit::evaluator`) and only materializes a `Value::Closure`/
//! `Value::Thunk` pair of (entry ip, captured depth) rather than this
//! `Env` chain — the two representations agree on observable behavior.

use std::rc::Rc;

use crate::constant::Constant;
use crate::data::Data;
use crate::error::{UplcError, UplcResult};
use crate::term::{BuiltinId, Term};

/// A persistent, shared lexical environment: a linked list of values
/// indexed by de Bruijn depth. Cloning an `Env` is O(1) (it clones an
/// `Rc`), which is what lets closures capture their defining environment
/// without copying it.
#[derive(Debug, Clone, PartialEq)]
pub enum Env {
    Empty,
    Cons(Value, Rc<Env>),
}

impl Env {
    pub fn empty() -> Rc<Env> {
        Rc::new(Env::Empty)
    }

    /// Extend at index 0, matching the spec's `env ++ [arg]` ordering.
    pub fn extend(self: &Rc<Env>, value: Value) -> Rc<Env> {
        Rc::new(Env::Cons(value, Rc::clone(self)))
    }

    /// Look up a de Bruijn index; `None` means the term was not closed.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match (self, index) {
            (Env::Cons(v, _), 0) => Some(v),
            (Env::Cons(_, rest), n) => rest.get(n - 1),
            (Env::Empty, _) => None,
        }
    }
}

/// A runtime value produced during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(num_bigint::BigInt),
    ByteString(Vec<u8>),
    String(String),
    Bool(bool),
    Unit,
    Data(Data),
    List(Vec<Value>),
    Pair(Box<Value>, Box<Value>),
    /// A closure: an unevaluated body plus the environment it was formed
    /// in. Applying it extends the captured environment by one binding.
    Closure(Rc<Term>, Rc<Env>),
    /// A suspended computation formed by `Delay`; resumed by `Force`.
    Thunk(Rc<Term>, Rc<Env>),
    /// A builtin awaiting more arguments and/or forces before it can
    /// reduce. `remaining_args`/`remaining_forces` both reaching zero is
    /// the saturation condition checked by the CEK applier and the JIT's
    /// `OP_APPLY` phase 3 / `OP_FORCE`.
    PartialBuiltin {
        id: BuiltinId,
        args: Vec<Value>,
        remaining_args: usize,
        remaining_forces: usize,
    },
    /// A data-carrying value built by `Constr`.
    Constr(i64, Vec<Value>),
    /// The JIT evaluator's closure representation: an entry instruction
    /// index plus the `value_stack` depth captured at creation time,
    /// rather than a term + linked environment (see `jit::evaluator`).
    JitClosure { body_ip: usize, captured_depth: usize },
    /// The JIT evaluator's thunk representation, analogous to `JitClosure`.
    JitThunk { body_ip: usize, captured_depth: usize },
    Bls12_381G1(Box<bls12_381::G1Affine>),
    Bls12_381G2(Box<bls12_381::G2Affine>),
    Bls12_381MlResult(Box<bls12_381::Gt>),
}

impl Value {
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            Value::Closure(_, _) | Value::PartialBuiltin { .. } | Value::JitClosure { .. }
        )
    }

    pub fn as_constr(&self) -> Option<(i64, &[Value])> {
        match self {
            Value::Constr(tag, fields) => Some((*tag, fields)),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&num_bigint::BigInt> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bytestring(&self) -> Option<&[u8]> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&Data> {
        match self {
            Value::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(xs) => Some(xs),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Pair(a, b) => Some((a, b)),
            _ => None,
        }
    }

    /// Lift a literal constant into a runtime value. Fallible only for the
    /// BLS12-381 variants, whose compressed encoding may not describe a
    /// point on the curve.
    pub fn from_constant(c: &Constant) -> UplcResult<Value> {
        Ok(match c {
            Constant::Integer(n) => Value::Integer(n.clone()),
            Constant::ByteString(b) => Value::ByteString(b.clone()),
            Constant::String(s) => Value::String(s.clone()),
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Unit => Value::Unit,
            Constant::Data(d) => Value::Data(d.clone()),
            Constant::ProtoList(items) => Value::List(
                items
                    .iter()
                    .map(Value::from_constant)
                    .collect::<UplcResult<Vec<_>>>()?,
            ),
            Constant::ProtoPair(a, b) => Value::Pair(
                Box::new(Value::from_constant(a)?),
                Box::new(Value::from_constant(b)?),
            ),
            Constant::Bls12_381G1(g) => {
                let point = bls12_381::G1Affine::from_compressed(&g.0);
                if bool::from(point.is_some()) {
                    Value::Bls12_381G1(Box::new(point.unwrap()))
                } else {
                    return Err(UplcError::malformed("invalid compressed G1 constant"));
                }
            }
            Constant::Bls12_381G2(g) => {
                let point = bls12_381::G2Affine::from_compressed(&g.0);
                if bool::from(point.is_some()) {
                    Value::Bls12_381G2(Box::new(point.unwrap()))
                } else {
                    return Err(UplcError::malformed("invalid compressed G2 constant"));
                }
            }
            Constant::Bls12_381MlResult(_) => {
                return Err(UplcError::malformed(
                    "Bls12_381MlResult cannot appear as a program literal",
                ));
            }
        })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::ByteString(_) => "bytestring",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Unit => "unit",
            Value::Data(_) => "data",
            Value::List(_) => "list",
            Value::Pair(_, _) => "pair",
            Value::Closure(_, _) => "closure",
            Value::Thunk(_, _) => "thunk",
            Value::PartialBuiltin { .. } => "partial_builtin",
            Value::JitClosure { .. } => "closure",
            Value::JitThunk { .. } => "thunk",
            Value::Constr(_, _) => "constructor",
            Value::Bls12_381G1(_) => "bls12_381_G1_element",
            Value::Bls12_381G2(_) => "bls12_381_G2_element",
            Value::Bls12_381MlResult(_) => "bls12_381_MlResult",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_lookup_resolves_innermost_first() {
        let env = Env::empty();
        let env = env.extend(Value::Integer(1.into()));
        let env = env.extend(Value::Integer(2.into()));
        assert_eq!(env.get(0), Some(&Value::Integer(2.into())));
        assert_eq!(env.get(1), Some(&Value::Integer(1.into())));
        assert_eq!(env.get(2), None);
    }

    #[test]
    fn from_constant_lifts_nested_lists() {
        let c = Constant::ProtoList(vec![Constant::Integer(1.into()), Constant::Integer(2.into())]);
        let v = Value::from_constant(&c).unwrap();
        assert_eq!(v, Value::List(vec![Value::Integer(1.into()), Value::Integer(2.into())]));
    }

    #[test]
    fn sharing_an_env_does_not_copy_it() {
        let base = Env::empty().extend(Value::Unit);
        let left = base.extend(Value::Bool(true));
        let right = base.extend(Value::Bool(false));
        assert_eq!(left.get(1), Some(&Value::Unit));
        assert_eq!(right.get(1), Some(&Value::Unit));
    }
}
