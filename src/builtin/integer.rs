//! Integer arithmetic, comparison, and conversion builtins.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use super::{runtime_error, type_error, Builtin};
use crate::error::UplcResult;
use crate::value::Value;

fn int2(b: Builtin, args: &[Value]) -> UplcResult<(BigInt, BigInt)> {
    match (args.first(), args.get(1)) {
        (Some(Value::Integer(x)), Some(Value::Integer(y))) => Ok((x.clone(), y.clone())),
        _ => Err(type_error(b)),
    }
}

pub fn add(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    Ok(Value::Integer(x + y))
}

pub fn subtract(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    Ok(Value::Integer(x - y))
}

pub fn multiply(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    Ok(Value::Integer(x * y))
}

/// Truncates toward negative infinity, as the Plutus reference `divide`
/// does (distinct from `quotient`, which truncates toward zero).
pub fn divide(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    if y.is_zero() {
        return Err(runtime_error(b, "division by zero"));
    }
    let (q, _r) = x.div_rem_euclid_like(&y);
    Ok(Value::Integer(q))
}

pub fn quotient(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    if y.is_zero() {
        return Err(runtime_error(b, "division by zero"));
    }
    Ok(Value::Integer(&x / &y))
}

pub fn remainder(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    if y.is_zero() {
        return Err(runtime_error(b, "division by zero"));
    }
    Ok(Value::Integer(&x % &y))
}

pub fn modulo(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    if y.is_zero() {
        return Err(runtime_error(b, "division by zero"));
    }
    let (_, m) = x.div_rem_euclid_like(&y);
    Ok(Value::Integer(m))
}

pub fn equals(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    Ok(Value::Bool(x == y))
}

pub fn less_than(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    Ok(Value::Bool(x < y))
}

pub fn less_than_equals(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = int2(b, args)?;
    Ok(Value::Bool(x <= y))
}

/// Computes `(base^exponent) mod modulus`. Plutus requires `modulus > 0`
/// and treats a non-positive exponent as an error unless `modulus == 1`.
pub fn exp_mod(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    match (args.first(), args.get(1), args.get(2)) {
        (Some(Value::Integer(base)), Some(Value::Integer(exp)), Some(Value::Integer(modulus))) => {
            if *modulus <= BigInt::from(0) {
                return Err(runtime_error(b, "modulus must be positive"));
            }
            if *exp < BigInt::from(0) {
                return Err(runtime_error(b, "negative exponent not supported"));
            }
            Ok(Value::Integer(mod_pow(base, exp, modulus)))
        }
        _ => Err(type_error(b)),
    }
}

fn mod_pow(base: &BigInt, exp: &BigInt, modulus: &BigInt) -> BigInt {
    let mut result = BigInt::from(1);
    let mut base = ((base % modulus) + modulus) % modulus;
    let mut exp = exp.clone();
    let two = BigInt::from(2);
    while exp > BigInt::from(0) {
        if (&exp % &two) == BigInt::from(1) {
            result = (result * &base) % modulus;
        }
        exp /= &two;
        base = (&base * &base) % modulus;
    }
    result
}

/// A small helper trait giving Euclidean (floor) division/remainder on
/// `BigInt`, matching Plutus `divMod`/`quotRem` semantics for `divide`
/// and `modulo` (which floor-divide) as distinct from `quotient`/
/// `remainder` (which truncate toward zero, i.e. plain `Div`/`Rem`).
trait EuclidLike {
    fn div_rem_euclid_like(&self, rhs: &BigInt) -> (BigInt, BigInt);
}

impl EuclidLike for BigInt {
    fn div_rem_euclid_like(&self, rhs: &BigInt) -> (BigInt, BigInt) {
        let q = self / rhs;
        let r = self - &q * rhs;
        if r.is_zero() || (r.is_negative() == rhs.is_negative()) {
            (q, r)
        } else {
            (q - 1, r + rhs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: i64) -> Value {
        Value::Integer(BigInt::from(i))
    }

    #[test]
    fn add_integer() {
        assert_eq!(add(Builtin::AddInteger, &[v(5), v(10)]).unwrap(), v(15));
    }

    #[test]
    fn divide_floors_toward_negative_infinity() {
        assert_eq!(divide(Builtin::DivideInteger, &[v(-7), v(2)]).unwrap(), v(-4));
    }

    #[test]
    fn quotient_truncates_toward_zero() {
        assert_eq!(quotient(Builtin::QuotientInteger, &[v(-7), v(2)]).unwrap(), v(-3));
    }

    #[test]
    fn modulo_is_always_same_sign_as_divisor() {
        assert_eq!(modulo(Builtin::ModInteger, &[v(-7), v(2)]).unwrap(), v(1));
    }

    #[test]
    fn division_by_zero_is_runtime_error() {
        assert!(quotient(Builtin::QuotientInteger, &[v(1), v(0)]).is_err());
    }

    #[test]
    fn exp_mod_computes_modular_exponentiation() {
        assert_eq!(exp_mod(Builtin::ExpModInteger, &[v(4), v(13), v(497)]).unwrap(), v(445));
    }
}
