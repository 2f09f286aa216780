//! Byte-string manipulation, bitwise, and conversion builtins.

use num_bigint::{BigInt, Sign};
use num_traits::Signed;

use super::{runtime_error, type_error, Builtin};
use crate::error::UplcResult;
use crate::value::Value;

fn bytes1<'a>(b: Builtin, args: &'a [Value]) -> UplcResult<&'a [u8]> {
    args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))
}

fn bytes2<'a>(b: Builtin, args: &'a [Value]) -> UplcResult<(&'a [u8], &'a [u8])> {
    match (args.first(), args.get(1)) {
        (Some(Value::ByteString(x)), Some(Value::ByteString(y))) => Ok((x, y)),
        _ => Err(type_error(b)),
    }
}

fn int_arg(b: Builtin, args: &[Value], i: usize) -> UplcResult<i64> {
    match args.get(i) {
        Some(Value::Integer(n)) => {
            let (_, digits) = n.to_u64_digits();
            let v = digits.first().copied().unwrap_or(0) as i64;
            Ok(if n.is_negative() { -v } else { v })
        }
        _ => Err(type_error(b)),
    }
}

pub fn append(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = bytes2(b, args)?;
    Ok(Value::ByteString([x, y].concat()))
}

pub fn cons(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let byte = int_arg(b, args, 0)?;
    let rest = args.get(1).and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    if !(0..=255).contains(&byte) {
        return Err(runtime_error(b, "byte out of range"));
    }
    let mut out = Vec::with_capacity(rest.len() + 1);
    out.push(byte as u8);
    out.extend_from_slice(rest);
    Ok(Value::ByteString(out))
}

pub fn slice(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let start = int_arg(b, args, 0)?.max(0) as usize;
    let len = int_arg(b, args, 1)?.max(0) as usize;
    let bytes = args.get(2).and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    let end = (start + len).min(bytes.len());
    let start = start.min(bytes.len());
    Ok(Value::ByteString(bytes[start..end].to_vec()))
}

pub fn length(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = bytes1(b, args)?;
    Ok(Value::Integer(BigInt::from(bytes.len())))
}

pub fn index(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    let i = int_arg(b, args, 1)?;
    if i < 0 || i as usize >= bytes.len() {
        return Err(runtime_error(b, "index out of bounds"));
    }
    Ok(Value::Integer(BigInt::from(bytes[i as usize])))
}

pub fn equals(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = bytes2(b, args)?;
    Ok(Value::Bool(x == y))
}

pub fn less_than(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = bytes2(b, args)?;
    Ok(Value::Bool(x < y))
}

pub fn less_than_equals(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let (x, y) = bytes2(b, args)?;
    Ok(Value::Bool(x <= y))
}

fn zip_bitwise(x: &[u8], y: &[u8], truncate: bool, f: impl Fn(u8, u8) -> u8) -> Vec<u8> {
    let len = if truncate { x.len().min(y.len()) } else { x.len().max(y.len()) };
    (0..len)
        .map(|i| f(x.get(i).copied().unwrap_or(0), y.get(i).copied().unwrap_or(0)))
        .collect()
}

pub fn and(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let truncate = args.first().and_then(Value::as_bool).ok_or_else(|| type_error(b))?;
    let (x, y) = match (args.get(1), args.get(2)) {
        (Some(Value::ByteString(x)), Some(Value::ByteString(y))) => (x, y),
        _ => return Err(type_error(b)),
    };
    Ok(Value::ByteString(zip_bitwise(x, y, truncate, |a, c| a & c)))
}

pub fn or(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let truncate = args.first().and_then(Value::as_bool).ok_or_else(|| type_error(b))?;
    let (x, y) = match (args.get(1), args.get(2)) {
        (Some(Value::ByteString(x)), Some(Value::ByteString(y))) => (x, y),
        _ => return Err(type_error(b)),
    };
    Ok(Value::ByteString(zip_bitwise(x, y, truncate, |a, c| a | c)))
}

pub fn xor(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let truncate = args.first().and_then(Value::as_bool).ok_or_else(|| type_error(b))?;
    let (x, y) = match (args.get(1), args.get(2)) {
        (Some(Value::ByteString(x)), Some(Value::ByteString(y))) => (x, y),
        _ => return Err(type_error(b)),
    };
    Ok(Value::ByteString(zip_bitwise(x, y, truncate, |a, c| a ^ c)))
}

pub fn complement(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = bytes1(b, args)?;
    Ok(Value::ByteString(bytes.iter().map(|b| !b).collect()))
}

/// Bits are numbered from the most-significant bit of the last byte
/// (index 0) upward, matching the reference `readBit`/`writeBits` layout.
fn bit_position(bytes: &[u8], index: i64) -> Option<(usize, u8)> {
    if index < 0 {
        return None;
    }
    let index = index as usize;
    let byte_from_end = index / 8;
    if byte_from_end >= bytes.len() {
        return None;
    }
    let byte_index = bytes.len() - 1 - byte_from_end;
    let bit_in_byte = (index % 8) as u8;
    Some((byte_index, bit_in_byte))
}

pub fn read_bit(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    let index = int_arg(b, args, 1)?;
    let (byte_index, bit) = bit_position(bytes, index).ok_or_else(|| runtime_error(b, "bit index out of bounds"))?;
    Ok(Value::Bool((bytes[byte_index] >> bit) & 1 == 1))
}

pub fn write_bits(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    let indices = args.get(1).and_then(Value::as_list).ok_or_else(|| type_error(b))?;
    let set_to = args.get(2).and_then(Value::as_bool).ok_or_else(|| type_error(b))?;
    let mut out = bytes.to_vec();
    for idx in indices {
        let index = idx.as_integer().ok_or_else(|| type_error(b))?;
        let index: i64 = index.try_into().map_err(|_| runtime_error(b, "index out of range"))?;
        let (byte_index, bit) = bit_position(&out, index).ok_or_else(|| runtime_error(b, "bit index out of bounds"))?;
        if set_to {
            out[byte_index] |= 1 << bit;
        } else {
            out[byte_index] &= !(1 << bit);
        }
    }
    Ok(Value::ByteString(out))
}

pub fn replicate_byte(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let len = int_arg(b, args, 0)?;
    let byte = int_arg(b, args, 1)?;
    if len < 0 || !(0..=255).contains(&byte) {
        return Err(runtime_error(b, "invalid length or byte value"));
    }
    Ok(Value::ByteString(vec![byte as u8; len as usize]))
}

pub fn shift(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    let n = int_arg(b, args, 1)?;
    let bit_len = bytes.len() * 8;
    if bit_len == 0 {
        return Ok(Value::ByteString(bytes.to_vec()));
    }
    let mut bits = vec![false; bit_len];
    for (i, byte) in bytes.iter().enumerate() {
        for bit in 0..8 {
            bits[i * 8 + bit] = (byte >> (7 - bit)) & 1 == 1;
        }
    }
    let mut shifted = vec![false; bit_len];
    for i in 0..bit_len {
        let src = i as i64 + n;
        if src >= 0 && (src as usize) < bit_len {
            shifted[i] = bits[src as usize];
        }
    }
    Ok(Value::ByteString(bits_to_bytes(&shifted)))
}

pub fn rotate(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = args.first().and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    let n = int_arg(b, args, 1)?;
    let bit_len = bytes.len() * 8;
    if bit_len == 0 {
        return Ok(Value::ByteString(bytes.to_vec()));
    }
    let mut bits = vec![false; bit_len];
    for (i, byte) in bytes.iter().enumerate() {
        for bit in 0..8 {
            bits[i * 8 + bit] = (byte >> (7 - bit)) & 1 == 1;
        }
    }
    let mut rotated = vec![false; bit_len];
    for i in 0..bit_len {
        let src = (i as i64 + n).rem_euclid(bit_len as i64) as usize;
        rotated[i] = bits[src];
    }
    Ok(Value::ByteString(bits_to_bytes(&rotated)))
}

fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| chunk.iter().enumerate().fold(0u8, |acc, (i, &b)| acc | ((b as u8) << (7 - i))))
        .collect()
}

pub fn count_set_bits(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = bytes1(b, args)?;
    Ok(Value::Integer(BigInt::from(
        bytes.iter().map(|b| b.count_ones()).sum::<u32>(),
    )))
}

pub fn find_first_set_bit(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let bytes = bytes1(b, args)?;
    let bit_len = bytes.len() * 8;
    for index in 0..bit_len {
        let byte_from_end = index / 8;
        let byte_index = bytes.len() - 1 - byte_from_end;
        let bit_in_byte = (index % 8) as u8;
        if (bytes[byte_index] >> bit_in_byte) & 1 == 1 {
            return Ok(Value::Integer(BigInt::from(index)));
        }
    }
    Ok(Value::Integer(BigInt::from(-1)))
}

pub fn integer_to_bytestring(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let big_endian = args.first().and_then(Value::as_bool).ok_or_else(|| type_error(b))?;
    let width = int_arg(b, args, 1)?;
    let n = args.get(2).and_then(Value::as_integer).ok_or_else(|| type_error(b))?;
    if n.is_negative() {
        return Err(runtime_error(b, "cannot convert a negative integer"));
    }
    if width < 0 {
        return Err(runtime_error(b, "width must be non-negative"));
    }
    let (_, mut be_bytes) = n.to_bytes_be();
    if be_bytes.is_empty() {
        be_bytes.push(0);
    }
    if width as usize > be_bytes.len() {
        let mut padded = vec![0u8; width as usize - be_bytes.len()];
        padded.extend_from_slice(&be_bytes);
        be_bytes = padded;
    } else if width != 0 && (width as usize) < be_bytes.len() {
        return Err(runtime_error(b, "integer does not fit in requested width"));
    }
    if !big_endian {
        be_bytes.reverse();
    }
    Ok(Value::ByteString(be_bytes))
}

pub fn bytestring_to_integer(b: Builtin, args: &[Value]) -> UplcResult<Value> {
    let big_endian = args.first().and_then(Value::as_bool).ok_or_else(|| type_error(b))?;
    let bytes = args.get(1).and_then(Value::as_bytestring).ok_or_else(|| type_error(b))?;
    let mut owned = bytes.to_vec();
    if !big_endian {
        owned.reverse();
    }
    Ok(Value::Integer(BigInt::from_bytes_be(Sign::Plus, &owned)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_concatenates_in_order() {
        let r = append(
            Builtin::AppendByteString,
            &[Value::ByteString(vec![1, 2]), Value::ByteString(vec![3, 4])],
        )
        .unwrap();
        assert_eq!(r, Value::ByteString(vec![1, 2, 3, 4]));
    }

    #[test]
    fn slice_clamps_to_bounds() {
        let r = slice(
            Builtin::SliceByteString,
            &[
                Value::Integer(BigInt::from(1)),
                Value::Integer(BigInt::from(10)),
                Value::ByteString(vec![1, 2, 3, 4]),
            ],
        )
        .unwrap();
        assert_eq!(r, Value::ByteString(vec![2, 3, 4]));
    }

    #[test]
    fn integer_to_bytestring_round_trips() {
        let encoded = integer_to_bytestring(
            Builtin::IntegerToByteString,
            &[Value::Bool(true), Value::Integer(BigInt::from(0)), Value::Integer(BigInt::from(256))],
        )
        .unwrap();
        let decoded = bytestring_to_integer(
            Builtin::ByteStringToInteger,
            &[Value::Bool(true), encoded],
        )
        .unwrap();
        assert_eq!(decoded, Value::Integer(BigInt::from(256)));
    }

    #[test]
    fn count_set_bits_counts_ones() {
        let r = count_set_bits(Builtin::CountSetBits, &[Value::ByteString(vec![0b1011])]).unwrap();
        assert_eq!(r, Value::Integer(BigInt::from(3)));
    }
}
