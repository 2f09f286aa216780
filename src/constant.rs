//! `Constant`: the closed set of primitive literal types a UPLC term can
//! carry directly.

use std::rc::Rc;

use num_bigint::BigInt;

use crate::data::Data;

/// A BLS12-381 G1 group element, stored compressed. Arithmetic on it goes
/// through `builtin::bls`, which decompresses lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bls12_381G1(pub [u8; 48]);

/// A BLS12-381 G2 group element, stored compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bls12_381G2(pub [u8; 96]);

/// The opaque result of a BLS12-381 Miller loop; only equality and
/// multiplication-in-the-target-group are defined over it.
#[derive(Debug, Clone, PartialEq)]
pub struct MlResult(pub Vec<u8>);

/// A primitive literal, closed under the universe Plutus constants range
/// over. Each variant carries its own universe tag implicitly via the enum
/// discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Integer(BigInt),
    ByteString(Vec<u8>),
    String(String),
    Bool(bool),
    Unit,
    Data(Data),
    ProtoList(Vec<Constant>),
    ProtoPair(Rc<Constant>, Rc<Constant>),
    Bls12_381G1(Bls12_381G1),
    Bls12_381G2(Bls12_381G2),
    Bls12_381MlResult(MlResult),
}

impl Constant {
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Constant::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bytestring(&self) -> Option<&[u8]> {
        match self {
            Constant::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Constant::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Constant::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&Data> {
        match self {
            Constant::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Constant]> {
        match self {
            Constant::ProtoList(xs) => Some(xs),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Constant, &Constant)> {
        match self {
            Constant::ProtoPair(a, b) => Some((a, b)),
            _ => None,
        }
    }

    /// A short name of the type this constant inhabits, used in
    /// `BuiltinTypeError` messages and `Display`-free debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Integer(_) => "integer",
            Constant::ByteString(_) => "bytestring",
            Constant::String(_) => "string",
            Constant::Bool(_) => "bool",
            Constant::Unit => "unit",
            Constant::Data(_) => "data",
            Constant::ProtoList(_) => "list",
            Constant::ProtoPair(_, _) => "pair",
            Constant::Bls12_381G1(_) => "bls12_381_G1_element",
            Constant::Bls12_381G2(_) => "bls12_381_G2_element",
            Constant::Bls12_381MlResult(_) => "bls12_381_MlResult",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_reject_mismatched_variants() {
        let c = Constant::Bool(true);
        assert_eq!(c.as_bool(), Some(true));
        assert_eq!(c.as_integer(), None);
    }

    #[test]
    fn type_name_is_stable() {
        assert_eq!(Constant::Unit.type_name(), "unit");
    }
}
