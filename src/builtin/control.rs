//! Control builtins: `ifThenElse`, `chooseUnit`, `trace`.
//!
//! `trace`'s actual message emission to the caller-supplied `Logger` is
//! handled by `apply_saturated` (see `builtin::mod`), not here — this
//! module only implements the pure value-returning half of its contract
//! so that `Builtin::reduce` stays a total function of its arguments.

use super::{type_error, Builtin};
use crate::error::UplcResult;
use crate::value::Value;

pub fn if_then_else(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let cond = args.first().and_then(Value::as_bool).ok_or_else(|| type_error(b))?;
    let then_branch = args.get(1).ok_or_else(|| type_error(b))?;
    let else_branch = args.get(2).ok_or_else(|| type_error(b))?;
    Ok(if cond { then_branch.clone() } else { else_branch.clone() })
}

pub fn choose_unit(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    match args.first() {
        Some(Value::Unit) => args.get(1).cloned().ok_or_else(|| type_error(b)),
        _ => Err(type_error(b)),
    }
}

pub fn trace(_b: Builtin, args: &[Value]) -> UplcResult<Value> {
    args.get(1).cloned().ok_or_else(|| type_error(Builtin::Trace))
}

/// The message `trace` would log, if its first argument is a string.
pub fn message(args: &[Value]) -> Option<&str> {
    match args.first() {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_then_else_selects_branch() {
        let r = if_then_else(
            Builtin::IfThenElse,
            &[Value::Bool(false), Value::Integer(1.into()), Value::Integer(2.into())],
        )
        .unwrap();
        assert_eq!(r, Value::Integer(2.into()));
    }

    #[test]
    fn trace_passes_through_second_argument() {
        let r = trace(Builtin::Trace, &[Value::String("msg".into()), Value::Unit]).unwrap();
        assert_eq!(r, Value::Unit);
    }
}
