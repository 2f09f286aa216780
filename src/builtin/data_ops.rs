//! `Data` constructors, destructors, and serialisation builtins.

use num_bigint::BigInt;

use super::{runtime_error, type_error, Builtin};
use crate::data::Data;
use crate::error::UplcResult;
use crate::value::Value;

fn data1<'a>(b: Builtin, args: &'a [Value]) -> UplcResult<&'a Data> {
    args.first().and_then(Value::as_data).ok_or_else(|| type_error(b))
}

pub fn choose_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let d = data1(b, args)?;
    let index = match d {
        Data::Constr(_, _) => 1,
        Data::Map(_) => 2,
        Data::List(_) => 3,
        Data::Integer(_) => 4,
        Data::ByteString(_) => 5,
    };
    args.get(index).cloned().ok_or_else(|| type_error(b))
}

pub fn constr_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let tag = args.first().and_then(Value::as_integer).ok_or_else(|| type_error(b))?;
    let fields = args.get(1).and_then(Value::as_list).ok_or_else(|| type_error(b))?;
    let tag = bigint_to_i64(b, tag)?;
    let fields = fields
        .iter()
        .map(|v| v.as_data().cloned().ok_or_else(|| type_error(b)))
        .collect::<UplcResult<Vec<_>>>()?;
    Ok(Value::Data(Data::Constr(tag, fields)))
}

pub fn map_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let pairs = args.first().and_then(Value::as_list).ok_or_else(|| type_error(b))?;
    let entries = pairs
        .iter()
        .map(|v| {
            let (k, val) = v.as_pair().ok_or_else(|| type_error(b))?;
            let k = k.as_data().cloned().ok_or_else(|| type_error(b))?;
            let val = val.as_data().cloned().ok_or_else(|| type_error(b))?;
            Ok((k, val))
        })
        .collect::<UplcResult<Vec<_>>>()?;
    Ok(Value::Data(Data::Map(entries)))
}

pub fn list_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let xs = args.first().and_then(Value::as_list).ok_or_else(|| type_error(b))?;
    let items = xs
        .iter()
        .map(|v| v.as_data().cloned().ok_or_else(|| type_error(b)))
        .collect::<UplcResult<Vec<_>>>()?;
    Ok(Value::Data(Data::List(items)))
}

pub fn i_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let n = args.first().and_then(Value::as_integer).ok_or_else(|| type_error(b))?;
    Ok(Value::Data(Data::Integer(n.clone())))
}

pub fn b_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    Ok(Value::Data(Data::ByteString(bytes.to_vec())))
}

pub fn un_constr_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    match data1(b, args)? {
        Data::Constr(tag, fields) => Ok(Value::Pair(
            Box::new(Value::Integer(BigInt::from(*tag))),
            Box::new(Value::List(fields.iter().cloned().map(Value::Data).collect())),
        )),
        _ => Err(type_error(b)),
    }
}

pub fn un_map_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    match data1(b, args)? {
        Data::Map(entries) => Ok(Value::List(
            entries
                .iter()
                .map(|(k, v)| Value::Pair(Box::new(Value::Data(k.clone())), Box::new(Value::Data(v.clone()))))
                .collect(),
        )),
        _ => Err(type_error(b)),
    }
}

pub fn un_list_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    match data1(b, args)? {
        Data::List(items) => Ok(Value::List(items.iter().cloned().map(Value::Data).collect())),
        _ => Err(type_error(b)),
    }
}

pub fn un_i_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    match data1(b, args)? {
        Data::Integer(n) => Ok(Value::Integer(n.clone())),
        _ => Err(type_error(b)),
    }
}

pub fn un_b_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    match data1(b, args)? {
        Data::ByteString(bytes) => Ok(Value::ByteString(bytes.clone())),
        _ => Err(type_error(b)),
    }
}

pub fn equals_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let x = data1(b, args)?;
    let y = args.get(1).and_then(Value::as_data).ok_or_else(|| type_error(b))?;
    Ok(Value::Bool(x == y))
}

pub fn mk_pair_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let x = data1(b, args)?.clone();
    let y = args.get(1).and_then(Value::as_data).ok_or_else(|| type_error(b))?.clone();
    Ok(Value::Pair(Box::new(Value::Data(x)), Box::new(Value::Data(y))))
}

pub fn mk_nil_data(_b: Builtin, _args: &[Value]) -> UplcResult<Value> {
    Ok(Value::List(vec![]))
}

pub fn mk_nil_pair_data(_b: Builtin, _args: &[Value]) -> UplcResult<Value> {
    Ok(Value::List(vec![]))
}

pub fn serialise_data(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let d = data1(b, args)?;
    Ok(Value::ByteString(encode(d)))
}

fn bigint_to_i64(b: Builtin, n: &BigInt) -> UplcResult<i64> {
    n.to_string()
        .parse::<i64>()
        .map_err(|_| runtime_error(b, "constructor tag does not fit in i64"))
}

/// A deterministic, self-describing flat encoding of `Data`. Not the wire
/// format used on-chain (which is CBOR); this exists so `serialiseData`
/// has a concrete, round-trippable byte representation without pulling in
/// a CBOR implementation the rest of the catalogue has no other use for.
fn encode(d: &Data) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(d, &mut out);
    out
}

fn encode_into(d: &Data, out: &mut Vec<u8>) {
    match d {
        Data::Constr(tag, fields) => {
            out.push(0);
            out.extend_from_slice(&tag.to_be_bytes());
            out.extend_from_slice(&(fields.len() as u32).to_be_bytes());
            for f in fields {
                encode_into(f, out);
            }
        }
        Data::Map(entries) => {
            out.push(1);
            out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
            for (k, v) in entries {
                encode_into(k, out);
                encode_into(v, out);
            }
        }
        Data::List(items) => {
            out.push(2);
            out.extend_from_slice(&(items.len() as u32).to_be_bytes());
            for item in items {
                encode_into(item, out);
            }
        }
        Data::Integer(n) => {
            out.push(3);
            let (sign, bytes) = n.to_bytes_be();
            out.push(matches!(sign, num_bigint::Sign::Minus) as u8);
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(&bytes);
        }
        Data::ByteString(bytes) => {
            out.push(4);
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constr_round_trips_through_un_constr() {
        let fields = Value::List(vec![Value::Data(Data::Integer(7.into()))]);
        let constructed = constr_data(
            Builtin::ConstrData,
            &[Value::Integer(2.into()), fields],
        )
        .unwrap();
        let unpacked = un_constr_data(Builtin::UnConstrData, &[constructed]).unwrap();
        let (tag, list) = unpacked.as_pair().unwrap();
        assert_eq!(*tag, Value::Integer(2.into()));
        assert_eq!(list, &Value::List(vec![Value::Data(Data::Integer(7.into()))]));
    }

    #[test]
    fn choose_data_picks_branch_by_constructor_shape() {
        let d = Value::Data(Data::Integer(5.into()));
        let mut branches = vec![Value::Bool(false); 5];
        branches[3] = Value::Bool(true);
        let mut call_args = vec![d];
        call_args.extend(branches);
        let r = choose_data(Builtin::ChooseData, &call_args).unwrap();
        assert_eq!(r, Value::Bool(true));
    }

    #[test]
    fn serialise_data_is_deterministic() {
        let d = Data::List(vec![Data::ByteString(vec![1, 2, 3])]);
        assert_eq!(serialise_data(Builtin::SerialiseData, &[Value::Data(d.clone())]).unwrap(),
                   serialise_data(Builtin::SerialiseData, &[Value::Data(d)]).unwrap());
    }
}
