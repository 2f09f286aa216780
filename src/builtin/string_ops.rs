//! UTF-8 string builtins.

use super::{runtime_error, type_error, Builtin};
use crate::error::UplcResult;
use crate::value::Value;

fn str2<'a>(b: Builtin, args: &'a [Value]) -> UplcResult<(&'a str, &'a str)> {
    match (args.first(), args.get(1)) {
        (Some(Value::String(x)), Some(Value::String(y))) => Ok((x, y)),
        _ => Err(type_error(b)),
    }
}

pub fn append(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = str2(b, args)?;
    Ok(Value::String(format!("{x}{y}")))
}

pub fn equals(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = str2(b, args)?;
    Ok(Value::Bool(x == y))
}

pub fn encode_utf8(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let s = args.first().and_then(Value::as_string).ok_or_else(|| type_error(b))?;
    Ok(Value::ByteString(s.as_bytes().to_vec()))
}

pub fn decode_utf8(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    let s = std::str::from_utf8(bytes).map_err(|e| runtime_error(b, format!("invalid utf-8: {e}")))?;
    Ok(Value::String(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let encoded = encode_utf8(Builtin::EncodeUtf8, &[Value::String("hi".into())]).unwrap();
        let decoded = decode_utf8(Builtin::DecodeUtf8, &[encoded]).unwrap();
        assert_eq!(decoded, Value::String("hi".into()));
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert!(decode_utf8(Builtin::DecodeUtf8, &[Value::ByteString(vec![0xff, 0xfe])]).is_err());
    }
}
