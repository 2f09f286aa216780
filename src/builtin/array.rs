//! Array builtins. `Value` has no dedicated array representation; arrays
//! are lists that happen to have come from `listToArray`, so these
//! operate on `Value::List` the same way the list builtins do.

use super::{runtime_error, type_error, Builtin};
use crate::error::UplcResult;
use crate::value::Value;

fn list<'a>(b: Builtin, args: &'a [Value], i: usize) -> UplcResult<&'a [Value]> {
    args.get(i).and_then(Value::as_list).ok_or_else(|| type_error(b))
}

pub fn length(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let xs = list(b, args, 0)?;
    Ok(Value::Integer(xs.len().into()))
}

pub fn to_array(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let xs = list(b, args, 0)?;
    Ok(Value::List(xs.to_vec()))
}

pub fn index(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let xs = list(b, args, 0)?;
    let i = args.get(1).and_then(Value::as_integer).ok_or_else(|| type_error(b))?;
    let i: usize = i
        .to_string()
        .parse()
        .map_err(|_| runtime_error(b, "array index out of range"))?;
    xs.get(i).cloned().ok_or_else(|| runtime_error(b, "array index out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_and_index_agree_with_source_list() {
        let xs = Value::List(vec![Value::Integer(10.into()), Value::Integer(20.into())]);
        assert_eq!(length(Builtin::LengthOfArray, &[xs.clone()]).unwrap(), Value::Integer(2.into()));
        assert_eq!(
            index(Builtin::IndexArray, &[xs, Value::Integer(1.into())]).unwrap(),
            Value::Integer(20.into())
        );
    }

    #[test]
    fn index_out_of_range_errors() {
        let xs = Value::List(vec![]);
        assert!(index(Builtin::IndexArray, &[xs, Value::Integer(0.into())]).is_err());
    }
}
