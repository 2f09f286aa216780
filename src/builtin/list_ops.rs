//! Pair and list builtins. The quantifier (`Force`) arguments that make
//! these polymorphic over element types are consumed before saturation
//! (see `Builtin::n_forces`) and carry no runtime representation here —
//! only the value arguments reach `reduce`.

use super::{type_error, Builtin};
use crate::error::UplcResult;
use crate::value::Value;

fn pair<'a>(b: Builtin, args: &'a [Value]) -> UplcResult<(&'a Value, &'a Value)> {
    args.first().and_then(Value::as_pair).ok_or_else(|| type_error(b))
}

fn list<'a>(b: Builtin, args: &'a [Value], i: usize) -> UplcResult<&'a [Value]> {
    args.get(i).and_then(Value::as_list).ok_or_else(|| type_error(b))
}

pub fn fst_pair(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (a, _) = pair(b, args)?;
    Ok(a.clone())
}

pub fn snd_pair(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (_, c) = pair(b, args)?;
    Ok(c.clone())
}

pub fn choose_list(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let xs = list(b, args, 0)?;
    let branch = if xs.is_empty() { args.get(1) } else { args.get(2) };
    branch.cloned().ok_or_else(|| type_error(b))
}

pub fn mk_cons(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let head = args.first().ok_or_else(|| type_error(b))?;
    let tail = list(b, args, 1)?;
    let mut xs = Vec::with_capacity(tail.len() + 1);
    xs.push(head.clone());
    xs.extend_from_slice(tail);
    Ok(Value::List(xs))
}

pub fn head_list(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let xs = list(b, args, 0)?;
    xs.first().cloned().ok_or_else(|| type_error(b))
}

pub fn tail_list(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let xs = list(b, args, 0)?;
    if xs.is_empty() {
        return Err(type_error(b));
    }
    Ok(Value::List(xs[1..].to_vec()))
}

pub fn null_list(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let xs = list(b, args, 0)?;
    Ok(Value::Bool(xs.is_empty()))
}

pub fn drop_list(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let n = args.first().and_then(Value::as_integer).ok_or_else(|| type_error(b))?;
    let xs = list(b, args, 1)?;
    let n = n.to_string().parse::<usize>().unwrap_or(usize::MAX).min(xs.len());
    Ok(Value::List(xs[n..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mk_cons_prepends_and_head_tail_invert_it() {
        let xs = Value::List(vec![Value::Integer(2.into())]);
        let consed = mk_cons(Builtin::MkCons, &[Value::Integer(1.into()), xs]).unwrap();
        assert_eq!(head_list(Builtin::HeadList, &[consed.clone()]).unwrap(), Value::Integer(1.into()));
        assert_eq!(
            tail_list(Builtin::TailList, &[consed]).unwrap(),
            Value::List(vec![Value::Integer(2.into())])
        );
    }

    #[test]
    fn choose_list_picks_branch_by_emptiness() {
        let empty = Value::List(vec![]);
        let r = choose_list(
            Builtin::ChooseList,
            &[empty, Value::Bool(true), Value::Bool(false)],
        )
        .unwrap();
        assert_eq!(r, Value::Bool(true));
    }

    #[test]
    fn head_list_on_empty_list_errors() {
        assert!(head_list(Builtin::HeadList, &[Value::List(vec![])]).is_err());
    }
}
