//! The value-size measure fed to builtin cost functions.
//!
//! These measures are consensus-critical: they must match the reference
//! exactly, so sizes are computed directly from the underlying
//! representation rather than from an intermediate wrapper, to avoid both
//! allocation and any risk of drift from a second code path.

use num_bigint::BigInt;

use crate::constant::Constant;
use crate::data::Data;
use crate::value::Value;

/// `ceil(bit_length / 64)` 64-bit words, minimum 1.
pub fn integer_size(i: &BigInt) -> u64 {
    let bits = i.bits();
    ((bits + 63) / 64).max(1)
}

/// Byte count, minimum 1.
pub fn bytestring_size(b: &[u8]) -> u64 {
    (b.len() as u64).max(1)
}

/// UTF-8 byte count.
pub fn string_size(s: &str) -> u64 {
    s.len() as u64
}

pub fn data_size(d: &Data) -> u64 {
    d.structural_size()
}

/// Size of a runtime `Value`, used by the builtin table when measuring
/// already-evaluated arguments.
pub fn value_size(v: &Value) -> u64 {
    match v {
        Value::Integer(i) => integer_size(i),
        Value::ByteString(b) => bytestring_size(b),
        Value::String(s) => string_size(s),
        Value::Bool(_) | Value::Unit => 1,
        Value::Data(d) => data_size(d),
        Value::List(xs) => xs.iter().map(value_size).sum::<u64>().max(1),
        Value::Pair(a, b) => value_size(a) + value_size(b),
        Value::Closure(_, _)
        | Value::Thunk(_, _)
        | Value::PartialBuiltin { .. }
        | Value::JitClosure { .. }
        | Value::JitThunk { .. } => 1,
        Value::Constr(_, fields) => fields.iter().map(value_size).sum::<u64>().max(1),
        Value::Bls12_381G1(_) => 1,
        Value::Bls12_381G2(_) => 1,
        Value::Bls12_381MlResult(_) => 1,
    }
}

/// Size of a `Constant`, used when a builtin argument has not yet been
/// lifted into a `Value` (e.g. during compiler-time constant folding, not
/// currently performed, but kept symmetric with `value_size`).
pub fn constant_size(c: &Constant) -> u64 {
    match c {
        Constant::Integer(i) => integer_size(i),
        Constant::ByteString(b) => bytestring_size(b),
        Constant::String(s) => string_size(s),
        Constant::Bool(_) | Constant::Unit => 1,
        Constant::Data(d) => data_size(d),
        Constant::ProtoList(xs) => xs.iter().map(constant_size).sum::<u64>().max(1),
        Constant::ProtoPair(a, b) => constant_size(a) + constant_size(b),
        Constant::Bls12_381G1(_) | Constant::Bls12_381G2(_) | Constant::Bls12_381MlResult(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_size_is_at_least_one() {
        assert_eq!(integer_size(&BigInt::from(0)), 1);
        assert_eq!(integer_size(&BigInt::from(1)), 1);
    }

    #[test]
    fn integer_size_grows_with_bit_length() {
        let big = BigInt::from(1) << 70;
        assert_eq!(integer_size(&big), 2);
    }

    #[test]
    fn bytestring_size_counts_bytes() {
        assert_eq!(bytestring_size(&[1, 2, 3]), 3);
        assert_eq!(bytestring_size(&[]), 1);
    }
}
